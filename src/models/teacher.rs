//! Teacher model.
//!
//! Teachers are the shared resource of a timetable: one teacher can serve
//! many classes but only one class per slot. A teacher qualifies for a
//! subject when the subject name occurs in the teacher's free-text
//! specialization.

use serde::{Deserialize, Serialize};

use crate::text::normalize_text;

/// A teacher that can be assigned to lessons.
///
/// Deserialization goes through [`Teacher::new`], so ids and
/// specializations read from JSON are normalized like built ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TeacherFields")]
pub struct Teacher {
    /// Unique teacher identifier (normalized).
    pub id: String,
    /// Free-text specialization, e.g. `"math, physics"` (normalized).
    pub specialization: String,
}

#[derive(Deserialize)]
struct TeacherFields {
    id: String,
    #[serde(default)]
    specialization: String,
}

impl From<TeacherFields> for Teacher {
    fn from(fields: TeacherFields) -> Self {
        Teacher::new(fields.id).with_specialization(fields.specialization)
    }
}

impl Teacher {
    /// Creates a teacher with no specialization.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self {
            id: normalize_text(id.as_ref()),
            specialization: String::new(),
        }
    }

    /// Sets the specialization text.
    pub fn with_specialization(mut self, specialization: impl AsRef<str>) -> Self {
        self.specialization = normalize_text(specialization.as_ref());
        self
    }

    /// Whether the specialization text mentions `subject`.
    ///
    /// This is a substring match on normalized text, so `"math"` also
    /// matches a specialization of `"mathematics"`. An empty subject never
    /// matches.
    pub fn can_teach(&self, subject: &str) -> bool {
        let subject = normalize_text(subject);
        !subject.is_empty() && self.specialization.contains(&subject)
    }
}

/// Number of teachers in `teachers` qualified for `subject`.
pub fn qualified_count(teachers: &[Teacher], subject: &str) -> usize {
    teachers.iter().filter(|t| t.can_teach(subject)).count()
}

/// First teacher in roster order qualified for `subject`.
pub fn first_qualified<'a>(teachers: &'a [Teacher], subject: &str) -> Option<&'a Teacher> {
    teachers.iter().find(|t| t.can_teach(subject))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_builder() {
        let t = Teacher::new(" Ivanova ").with_specialization("Math, Physics");

        assert_eq!(t.id, "ivanova");
        assert_eq!(t.specialization, "math, physics");
    }

    #[test]
    fn test_deserialize_normalizes() {
        let t: Teacher =
            serde_json::from_str(r#"{"id": " Sidorov ", "specialization": "PE, Math"}"#).unwrap();
        assert_eq!(t, Teacher::new("sidorov").with_specialization("pe, math"));
        assert!(t.can_teach("math"));

        let bare: Teacher = serde_json::from_str(r#"{"id": "Petrov"}"#).unwrap();
        assert_eq!(bare.id, "petrov");
        assert!(!bare.can_teach("math"));
    }

    #[test]
    fn test_can_teach_substring() {
        let t = Teacher::new("t1").with_specialization("Mathematics and Art");
        assert!(t.can_teach("math"));
        assert!(t.can_teach(" ART "));
        assert!(!t.can_teach("music"));
        assert!(!t.can_teach(""));
    }

    #[test]
    fn test_qualified_lookup_is_roster_ordered() {
        let roster = vec![
            Teacher::new("a").with_specialization("history"),
            Teacher::new("b").with_specialization("math"),
            Teacher::new("c").with_specialization("math, art"),
        ];
        assert_eq!(qualified_count(&roster, "math"), 2);
        assert_eq!(qualified_count(&roster, "art"), 1);
        assert_eq!(qualified_count(&roster, "music"), 0);
        assert_eq!(first_qualified(&roster, "math").unwrap().id, "b");
        assert!(first_qualified(&roster, "music").is_none());
    }
}
