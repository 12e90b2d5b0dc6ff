//! Domain models for student score tables and curriculum subjects.
//!
//! This module provides the data structures the planner works on: the fixed
//! nine-subject curriculum, per-subject value tables, student score records,
//! and the per-class partition of a score table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Curriculum track a subject belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectGroup {
    /// Core subjects scored out of 150.
    Primary,
    /// Science electives (secondary-A), scored out of 100.
    Science,
    /// Humanities electives (secondary-B), scored out of 100. Never weighted.
    Humanities,
}

/// One of the nine analysed subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Chinese,
    Math,
    English,
    Physics,
    Chemistry,
    Biology,
    History,
    Politics,
    Geography,
}

impl Subject {
    /// All subjects in curriculum order.
    pub const ALL: [Subject; 9] = [
        Subject::Chinese,
        Subject::Math,
        Subject::English,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::History,
        Subject::Politics,
        Subject::Geography,
    ];

    /// Subjects that receive a need weight and extra hours.
    pub const WEIGHTED: [Subject; 6] = [
        Subject::Chinese,
        Subject::Math,
        Subject::English,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
    ];

    /// Primary subjects, in the order balancing breaks ties.
    pub const PRIMARY: [Subject; 3] = [Subject::Chinese, Subject::Math, Subject::English];

    /// Column / config key of the subject.
    pub fn key(self) -> &'static str {
        match self {
            Subject::Chinese => "chinese",
            Subject::Math => "math",
            Subject::English => "english",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::Biology => "biology",
            Subject::History => "history",
            Subject::Politics => "politics",
            Subject::Geography => "geography",
        }
    }

    /// Look a subject up by its column key (case-insensitive).
    pub fn from_key(key: &str) -> Option<Subject> {
        let key = key.trim().to_lowercase();
        Subject::ALL.iter().copied().find(|s| s.key() == key)
    }

    pub fn group(self) -> SubjectGroup {
        match self {
            Subject::Chinese | Subject::Math | Subject::English => SubjectGroup::Primary,
            Subject::Physics | Subject::Chemistry | Subject::Biology => SubjectGroup::Science,
            Subject::History | Subject::Politics | Subject::Geography => SubjectGroup::Humanities,
        }
    }

    pub fn is_primary(self) -> bool {
        self.group() == SubjectGroup::Primary
    }

    /// Whether the subject takes part in weighting and allocation.
    pub fn is_weighted(self) -> bool {
        self.group() != SubjectGroup::Humanities
    }

    /// Position in [`Subject::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One value per subject.
///
/// Serializes as a flat object keyed by subject key, which is the shape used
/// both for score rows and for the `[baseline]` / `[display_names]` config
/// tables.
///
/// # Examples
///
/// ```
/// use class_hours::core::domain::{PerSubject, Subject};
///
/// let mut hours = PerSubject::from_fn(|_| 1u32);
/// *hours.get_mut(Subject::Math) += 2;
/// assert_eq!(*hours.get(Subject::Math), 3);
/// assert_eq!(hours.iter().map(|(_, h)| *h).sum::<u32>(), 11);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerSubject<T> {
    pub chinese: T,
    pub math: T,
    pub english: T,
    pub physics: T,
    pub chemistry: T,
    pub biology: T,
    pub history: T,
    pub politics: T,
    pub geography: T,
}

impl<T> PerSubject<T> {
    /// Build a table by evaluating `f` for every subject in curriculum order.
    pub fn from_fn(mut f: impl FnMut(Subject) -> T) -> Self {
        Self {
            chinese: f(Subject::Chinese),
            math: f(Subject::Math),
            english: f(Subject::English),
            physics: f(Subject::Physics),
            chemistry: f(Subject::Chemistry),
            biology: f(Subject::Biology),
            history: f(Subject::History),
            politics: f(Subject::Politics),
            geography: f(Subject::Geography),
        }
    }

    /// Fallible variant of [`PerSubject::from_fn`]; stops at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Subject) -> std::result::Result<T, E>) -> std::result::Result<Self, E> {
        Ok(Self {
            chinese: f(Subject::Chinese)?,
            math: f(Subject::Math)?,
            english: f(Subject::English)?,
            physics: f(Subject::Physics)?,
            chemistry: f(Subject::Chemistry)?,
            biology: f(Subject::Biology)?,
            history: f(Subject::History)?,
            politics: f(Subject::Politics)?,
            geography: f(Subject::Geography)?,
        })
    }

    pub fn get(&self, subject: Subject) -> &T {
        match subject {
            Subject::Chinese => &self.chinese,
            Subject::Math => &self.math,
            Subject::English => &self.english,
            Subject::Physics => &self.physics,
            Subject::Chemistry => &self.chemistry,
            Subject::Biology => &self.biology,
            Subject::History => &self.history,
            Subject::Politics => &self.politics,
            Subject::Geography => &self.geography,
        }
    }

    pub fn get_mut(&mut self, subject: Subject) -> &mut T {
        match subject {
            Subject::Chinese => &mut self.chinese,
            Subject::Math => &mut self.math,
            Subject::English => &mut self.english,
            Subject::Physics => &mut self.physics,
            Subject::Chemistry => &mut self.chemistry,
            Subject::Biology => &mut self.biology,
            Subject::History => &mut self.history,
            Subject::Politics => &mut self.politics,
            Subject::Geography => &mut self.geography,
        }
    }

    /// Iterate `(subject, value)` pairs in curriculum order.
    pub fn iter(&self) -> impl Iterator<Item = (Subject, &T)> + '_ {
        Subject::ALL.iter().map(move |&s| (s, self.get(s)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Subject, &T) -> U) -> PerSubject<U> {
        PerSubject::from_fn(|s| f(s, self.get(s)))
    }
}

/// One student's row: class identifier plus an optional score per subject.
///
/// A `None` score marks a blank cell in the source sheet. Such records are
/// excluded before the core runs; if one slips through, statistics for its
/// class fail with [`Error::MissingSubjectData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "class")]
    pub class_id: String,
    #[serde(flatten)]
    pub scores: PerSubject<Option<f64>>,
}

impl StudentRecord {
    /// Build a record with every score present.
    pub fn new(class_id: impl Into<String>, scores: PerSubject<f64>) -> Self {
        Self {
            class_id: class_id.into(),
            scores: scores.map(|_, v| Some(*v)),
        }
    }

    /// True when every subject has a finite score.
    pub fn is_complete(&self) -> bool {
        self.scores
            .iter()
            .all(|(_, score)| score.map(f64::is_finite).unwrap_or(false))
    }

    pub fn missing_subjects(&self) -> Vec<Subject> {
        self.scores
            .iter()
            .filter(|(_, score)| !score.map(f64::is_finite).unwrap_or(false))
            .map(|(subject, _)| subject)
            .collect()
    }
}

/// Table of student records, as produced by the score loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub records: Vec<StudentRecord>,
}

impl ScoreTable {
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy of the table with incomplete records removed.
    ///
    /// Returns the filtered table and the number of records dropped.
    pub fn complete_records(&self) -> (ScoreTable, usize) {
        let records: Vec<StudentRecord> = self
            .records
            .iter()
            .filter(|r| r.is_complete())
            .cloned()
            .collect();
        let dropped = self.records.len() - records.len();
        (ScoreTable::new(records), dropped)
    }

    /// Partition the table by class id, in ascending class-id order.
    ///
    /// Class ids that parse as integers sort numerically ("2" before "10");
    /// everything else sorts lexically after them.
    pub fn group_by_class(&self) -> Vec<ClassGroup> {
        let mut groups: BTreeMap<ClassKey, Vec<StudentRecord>> = BTreeMap::new();
        for record in &self.records {
            groups
                .entry(ClassKey::new(&record.class_id))
                .or_default()
                .push(record.clone());
        }
        groups
            .into_iter()
            .map(|(key, records)| ClassGroup::new(key.into_id(), records))
            .collect()
    }
}

/// Sort key that orders numeric class ids numerically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ClassKey {
    Numeric(i64, String),
    Text(String),
}

impl ClassKey {
    fn new(id: &str) -> Self {
        match id.trim().parse::<i64>() {
            Ok(n) => ClassKey::Numeric(n, id.to_string()),
            Err(_) => ClassKey::Text(id.to_string()),
        }
    }

    fn into_id(self) -> String {
        match self {
            ClassKey::Numeric(_, id) | ClassKey::Text(id) => id,
        }
    }
}

/// All records of one class. Each group is planned independently.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassGroup {
    pub class_id: String,
    pub records: Vec<StudentRecord>,
}

impl ClassGroup {
    pub fn new(class_id: impl Into<String>, records: Vec<StudentRecord>) -> Self {
        Self {
            class_id: class_id.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw score column for one subject.
    ///
    /// # Errors
    ///
    /// [`Error::MissingSubjectData`] if the group is empty or any record lacks
    /// a finite score for `subject`.
    pub fn column(&self, subject: Subject) -> Result<Vec<f64>> {
        let missing = || Error::MissingSubjectData {
            class_id: self.class_id.clone(),
            subject,
        };
        if self.records.is_empty() {
            return Err(missing());
        }
        self.records
            .iter()
            .map(|r| {
                r.scores
                    .get(subject)
                    .filter(|v| v.is_finite())
                    .ok_or_else(missing)
            })
            .collect()
    }
}
