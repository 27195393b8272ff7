//! Text normalization and requirement parsing.
//!
//! All identifiers entering the crate (class ids, teacher ids, subjects,
//! day and period labels) pass through [`normalize_text`] so that
//! `" Math "` and `"math"` refer to the same subject.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalizes free text for comparison: trims surrounding whitespace and
/// lower-cases (Unicode-aware).
///
/// # Example
/// ```
/// use u_timetable::text::normalize_text;
///
/// assert_eq!(normalize_text("  Физика "), "физика");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A subject and how many weekly lessons of it a class needs.
///
/// When deserialized the subject is normalized and a missing count is 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RequirementFields")]
pub struct SubjectRequirement {
    /// Normalized subject name.
    pub subject: String,
    /// Weekly lesson count.
    pub count: u32,
}

#[derive(Deserialize)]
struct RequirementFields {
    subject: String,
    #[serde(default = "default_count")]
    count: u32,
}

fn default_count() -> u32 {
    1
}

impl From<RequirementFields> for SubjectRequirement {
    fn from(fields: RequirementFields) -> Self {
        SubjectRequirement::new(fields.subject, fields.count)
    }
}

impl SubjectRequirement {
    /// Creates a requirement, normalizing the subject name.
    pub fn new(subject: impl AsRef<str>, count: u32) -> Self {
        Self {
            subject: normalize_text(subject.as_ref()),
            count,
        }
    }
}

/// Error raised by [`parse_subjects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    piece: String,
}

impl ParseError {
    /// The offending `subject:count` fragment.
    pub fn piece(&self) -> &str {
        &self.piece
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid subject requirement '{}'", self.piece)
    }
}

impl std::error::Error for ParseError {}

/// Parses `"subject:count, subject:count, ..."` into requirements.
///
/// - A piece without `:` counts once.
/// - Empty pieces are skipped.
/// - A repeated subject keeps its first position and takes the last count.
/// - An empty subject name or a non-numeric count is an error.
///
/// # Example
/// ```
/// use u_timetable::text::parse_subjects;
///
/// let reqs = parse_subjects("Math:3, physics:2, art").unwrap();
/// assert_eq!(reqs.len(), 3);
/// assert_eq!(reqs[0].subject, "math");
/// assert_eq!(reqs[0].count, 3);
/// assert_eq!(reqs[2].count, 1);
/// ```
pub fn parse_subjects(raw: &str) -> Result<Vec<SubjectRequirement>, ParseError> {
    let mut result: Vec<SubjectRequirement> = Vec::new();

    for piece in raw.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }

        let (subject, count) = match piece.split_once(':') {
            Some((subject, count)) => {
                let count = count.trim().parse::<u32>().map_err(|_| ParseError {
                    piece: piece.to_string(),
                })?;
                (normalize_text(subject), count)
            }
            None => (normalize_text(piece), 1),
        };

        if subject.is_empty() {
            return Err(ParseError {
                piece: piece.to_string(),
            });
        }

        match result.iter_mut().find(|r| r.subject == subject) {
            Some(existing) => existing.count = count,
            None => result.push(SubjectRequirement { subject, count }),
        }
    }

    Ok(result)
}
