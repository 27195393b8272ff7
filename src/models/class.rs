//! School class model.
//!
//! A class record lists the weekly subject requirements of one class and
//! any lessons whose slot is fixed in advance.

use serde::{Deserialize, Serialize};

use crate::text::{normalize_text, parse_subjects, ParseError, SubjectRequirement};

/// A lesson pinned to a slot before search.
///
/// Day and period are grid labels; they are resolved against the
/// [`SlotGrid`](super::SlotGrid) when the class is solved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FixedSlotFields")]
pub struct FixedSlot {
    /// Day label.
    pub day: String,
    /// Period label.
    pub period: String,
    /// Subject name.
    pub subject: String,
    /// Teacher identifier; `None` or empty means unassigned.
    pub teacher: Option<String>,
}

#[derive(Deserialize)]
struct FixedSlotFields {
    day: String,
    period: String,
    subject: String,
    #[serde(default)]
    teacher: Option<String>,
}

impl From<FixedSlotFields> for FixedSlot {
    fn from(fields: FixedSlotFields) -> Self {
        let fixed = FixedSlot::new(fields.day, fields.period, fields.subject);
        match fields.teacher {
            Some(teacher) => fixed.with_teacher(teacher),
            None => fixed,
        }
    }
}

impl FixedSlot {
    /// Creates an unassigned fixed lesson. All fields are normalized.
    pub fn new(day: impl AsRef<str>, period: impl AsRef<str>, subject: impl AsRef<str>) -> Self {
        Self {
            day: normalize_text(day.as_ref()),
            period: normalize_text(period.as_ref()),
            subject: normalize_text(subject.as_ref()),
            teacher: None,
        }
    }

    /// Sets the teacher.
    pub fn with_teacher(mut self, teacher: impl AsRef<str>) -> Self {
        self.teacher = Some(normalize_text(teacher.as_ref()));
        self
    }

    /// Normalized teacher id, treating an empty string as unassigned.
    pub fn teacher_id(&self) -> Option<String> {
        self.teacher
            .as_deref()
            .map(normalize_text)
            .filter(|t| !t.is_empty())
    }
}

/// A school class to be timetabled.
///
/// Deserialized records are normalized the same way as built ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ClassFields")]
pub struct ClassRecord {
    /// Unique class identifier (normalized).
    pub id: String,
    /// Weekly subject requirements, in input order.
    pub requirements: Vec<SubjectRequirement>,
    /// Lessons fixed before search.
    pub fixed_slots: Vec<FixedSlot>,
}

#[derive(Deserialize)]
struct ClassFields {
    id: String,
    #[serde(default)]
    requirements: Vec<SubjectRequirement>,
    #[serde(default)]
    fixed_slots: Vec<FixedSlot>,
}

impl From<ClassFields> for ClassRecord {
    fn from(fields: ClassFields) -> Self {
        Self {
            requirements: fields.requirements,
            fixed_slots: fields.fixed_slots,
            ..ClassRecord::new(fields.id)
        }
    }
}

impl ClassRecord {
    /// Creates a class with no requirements.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self {
            id: normalize_text(id.as_ref()),
            requirements: Vec::new(),
            fixed_slots: Vec::new(),
        }
    }

    /// Creates a class from raw `"subject:count, ..."` text.
    ///
    /// # Example
    /// ```
    /// use u_timetable::models::ClassRecord;
    ///
    /// let class = ClassRecord::from_text("5A", "math:2, art").unwrap();
    /// assert_eq!(class.id, "5a");
    /// assert_eq!(class.required_lessons(), 3);
    /// ```
    pub fn from_text(id: impl AsRef<str>, subjects: &str) -> Result<Self, ParseError> {
        let mut class = Self::new(id);
        class.requirements = parse_subjects(subjects)?;
        Ok(class)
    }

    /// Adds a subject requirement.
    pub fn with_subject(mut self, subject: impl AsRef<str>, count: u32) -> Self {
        self.requirements.push(SubjectRequirement::new(subject, count));
        self
    }

    /// Adds a fixed lesson.
    pub fn with_fixed_slot(mut self, fixed: FixedSlot) -> Self {
        self.fixed_slots.push(fixed);
        self
    }

    /// Total number of lessons the search must place.
    pub fn required_lessons(&self) -> usize {
        self.requirements.iter().map(|r| r.count as usize).sum()
    }

    /// Required count for `subject` (0 if not required).
    pub fn required_count(&self, subject: &str) -> u32 {
        let subject = normalize_text(subject);
        self.requirements
            .iter()
            .filter(|r| r.subject == subject)
            .map(|r| r.count)
            .sum()
    }
}
