//! Merging baseline hours with allocated hours, and the balancing step.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithms::allocation::HourAllocation;
use crate::config::CurriculumConfig;
use crate::core::domain::Subject;
use crate::error::{Error, Result};

/// One line of a weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Display name, as printed.
    pub name: String,
    /// Analysed subject behind the entry; `None` for fixed subjects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    pub hours: i32,
}

/// Weekly hours of one class, in curriculum order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalSchedule {
    entries: Vec<ScheduleEntry>,
}

impl FinalSchedule {
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Sum of all entries, saturating at the `i32` bounds.
    pub fn total(&self) -> i32 {
        self.entries
            .iter()
            .fold(0i32, |acc, e| acc.saturating_add(e.hours))
    }

    pub fn hours_of(&self, name: &str) -> Option<i32> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.hours)
    }

    pub fn hours_of_subject(&self, subject: Subject) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.subject == Some(subject))
            .map(|e| e.hours)
    }

    /// `(name, hours)` pairs by descending hours; ties keep curriculum order.
    pub fn ranked(&self) -> Vec<(&str, i32)> {
        let mut ranked: Vec<(&str, i32)> = self
            .entries
            .iter()
            .map(|e| (e.name.as_str(), e.hours))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    fn entry_mut(&mut self, subject: Subject) -> Option<&mut ScheduleEntry> {
        self.entries.iter_mut().find(|e| e.subject == Some(subject))
    }
}

/// Correction applied by the balancing step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    pub subject: Subject,
    pub name: String,
    /// Hours added (negative when removed).
    pub delta: i32,
}

/// Schedule plus the balancing correction that produced it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledSchedule {
    pub schedule: FinalSchedule,
    pub adjustment: Option<BalanceAdjustment>,
}

/// Builds a class's final schedule from the configured baseline.
#[derive(Debug, Clone)]
pub struct ScheduleAssembler<'a> {
    config: &'a CurriculumConfig,
}

impl<'a> ScheduleAssembler<'a> {
    pub fn new(config: &'a CurriculumConfig) -> Self {
        Self { config }
    }

    /// Baseline schedule: every subject at its baseline, then the fixed subjects.
    ///
    /// # Errors
    ///
    /// `Config` if an hour count does not fit in `i32`.
    pub fn baseline(&self) -> Result<FinalSchedule> {
        let subjects = Subject::ALL.iter().map(|&s| -> Result<ScheduleEntry> {
            let name = self.config.display_name(s);
            Ok(ScheduleEntry {
                name: name.to_string(),
                subject: Some(s),
                hours: signed_hours(name, *self.config.baseline.get(s))?,
            })
        });
        let fixed = self.config.fixed_subjects.iter().map(|f| -> Result<ScheduleEntry> {
            Ok(ScheduleEntry {
                name: f.name.clone(),
                subject: None,
                hours: signed_hours(&f.name, f.hours)?,
            })
        });

        Ok(FinalSchedule {
            entries: subjects.chain(fixed).collect::<Result<Vec<_>>>()?,
        })
    }

    /// Add `allocation` to the baseline and force the total to the budget.
    ///
    /// # Errors
    ///
    /// * `NegativeHours` if balancing leaves a subject below zero and the
    ///   configuration forbids it
    /// * `Config` if the budget or a baseline entry is out of `i32` range
    pub fn assemble(&self, allocation: &HourAllocation) -> Result<AssembledSchedule> {
        let mut schedule = self.baseline()?;
        for (subject, hours) in allocation.iter() {
            if let Some(entry) = schedule.entry_mut(subject) {
                entry.hours = entry.hours.saturating_add(hours);
            }
        }

        let adjustment = self.balance(&mut schedule)?;
        Ok(AssembledSchedule {
            schedule,
            adjustment,
        })
    }

    /// One-shot correction: the primary subject holding the most hours
    /// absorbs the whole difference to the budget.
    fn balance(&self, schedule: &mut FinalSchedule) -> Result<Option<BalanceAdjustment>> {
        let target = signed_hours("total_hours", self.config.total_hours)?;
        let diff = target.checked_sub(schedule.total()).ok_or_else(|| {
            Error::Config(format!(
                "Schedule total {} is out of range for a {}-hour budget",
                schedule.total(),
                target
            ))
        })?;
        if diff == 0 {
            return Ok(None);
        }

        // max_by_key keeps the last maximum; scan in reverse so the first wins
        let Some(subject) = Subject::PRIMARY
            .iter()
            .rev()
            .copied()
            .max_by_key(|&s| schedule.hours_of_subject(s).unwrap_or(i32::MIN))
        else {
            return Ok(None);
        };

        let Some(entry) = schedule.entry_mut(subject) else {
            return Ok(None);
        };
        entry.hours = entry.hours.saturating_add(diff);
        debug!(
            "Balancing moved {} hours onto '{}' (now {})",
            diff, entry.name, entry.hours
        );

        if entry.hours < 0 && self.config.balancing.forbid_negative_hours {
            return Err(Error::NegativeHours {
                name: entry.name.clone(),
                hours: entry.hours,
            });
        }

        Ok(Some(BalanceAdjustment {
            subject,
            name: entry.name.clone(),
            delta: diff,
        }))
    }
}

fn signed_hours(name: &str, hours: u32) -> Result<i32> {
    i32::try_from(hours)
        .map_err(|_| Error::Config(format!("Hour count {} for '{}' is out of range", hours, name)))
}
