//! Planner output: per-class diagnostics and console/JSON rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::assembler::{BalanceAdjustment, FinalSchedule};
use crate::algorithms::statistics::SubjectStatistics;
use crate::core::domain::Subject;
use crate::error::Result;

/// Statistics, weights, and extra hours of one subject in one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectReport {
    pub subject: Subject,
    pub name: String,
    pub statistics: SubjectStatistics,
    /// Weight before the correlation adjustment; `None` for unweighted subjects.
    pub base_weight: Option<f64>,
    pub adjusted_weight: Option<f64>,
    pub allocated_hours: i32,
}

/// Planning result for one class group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub class_id: String,
    pub students: usize,
    pub subjects: Vec<SubjectReport>,
    pub balance: Option<BalanceAdjustment>,
    pub schedule: FinalSchedule,
}

/// Planning result for a whole score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    /// SHA-256 of the raw input, when it came from a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_checksum: Option<String>,
    pub total_hours: u32,
    /// Records excluded before planning because of blank cells.
    pub dropped_records: usize,
    pub warnings: Vec<String>,
    pub classes: Vec<ClassReport>,
}

impl ScheduleReport {
    pub fn class(&self, class_id: &str) -> Option<&ClassReport> {
        self.classes.iter().find(|c| c.class_id == class_id)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Console rendering; same text as the [`Display`](fmt::Display) impl.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

/// One block per class, subjects by descending hours.
///
/// ```text
/// Class 1 weekly hours (total 39):
///   数学: 8
///   语文: 6
///   ...
/// ```
impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(
                f,
                "Class {} weekly hours (total {}):",
                class.class_id,
                class.schedule.total()
            )?;
            for (name, hours) in class.schedule.ranked() {
                writeln!(f, "  {}: {}", name, hours)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurriculumConfig;
    use crate::scheduler::assembler::ScheduleAssembler;

    fn report() -> ScheduleReport {
        let config = CurriculumConfig::default();
        let schedule = ScheduleAssembler::new(&config).baseline().unwrap();
        ScheduleReport {
            source_checksum: None,
            total_hours: 39,
            dropped_records: 0,
            warnings: vec![],
            classes: vec![
                ClassReport {
                    class_id: "1".to_string(),
                    students: 30,
                    subjects: vec![],
                    balance: None,
                    schedule: schedule.clone(),
                },
                ClassReport {
                    class_id: "2".to_string(),
                    students: 28,
                    subjects: vec![],
                    balance: None,
                    schedule,
                },
            ],
        }
    }

    #[test]
    fn test_render_text() {
        let text = report().render_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Class 1 weekly hours (total 33):");
        assert_eq!(lines[1], "  数学: 6");
        assert_eq!(lines[2], "  语文: 5");
        assert!(text.contains("\nClass 2 weekly hours"));
        assert_eq!(text.matches("通用技术: 1").count(), 2);
    }

    #[test]
    fn test_display_matches_render_text() {
        let report = report();
        assert_eq!(format!("{}", report), report.render_text());

        let empty = ScheduleReport {
            classes: vec![],
            ..report
        };
        assert_eq!(empty.render_text(), "");
    }

    #[test]
    fn test_json_shape() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("source_checksum").is_none());
        assert_eq!(value["classes"][0]["class_id"], "1");
        assert_eq!(value["classes"][0]["schedule"]["entries"][0]["name"], "语文");
        assert_eq!(value["classes"][0]["schedule"]["entries"][0]["subject"], "chinese");
        assert!(value["classes"][0]["schedule"]["entries"][12].get("subject").is_none());
    }

    #[test]
    fn test_class_lookup() {
        let report = report();
        assert_eq!(report.class("2").map(|c| c.students), Some(28));
        assert!(report.class("3").is_none());
    }
}
