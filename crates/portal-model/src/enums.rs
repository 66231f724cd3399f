//! Type-safe enumerations for resource metadata.
//!
//! The catalog and the navigation flow exchange these as short tokens
//! (`nep`, `ug`, `lecture note`). Parsing is case-insensitive and accepts
//! the aliases students actually type; display goes through `label()`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::ModelError;

/// Kind of downloadable document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    /// Previous-year question paper.
    PastPaper,
    /// Lecture or study notes.
    Note,
    /// Course syllabus.
    Syllabus,
}

impl ResourceType {
    pub const ALL: [Self; 3] = [Self::PastPaper, Self::Note, Self::Syllabus];

    /// Canonical token used on the wire and in scripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PastPaper => "past-paper",
            Self::Note => "note",
            Self::Syllabus => "syllabus",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PastPaper => "Past Paper",
            Self::Note => "Lecture Note",
            Self::Syllabus => "Syllabus",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_token(s);
        match normalized.as_str() {
            "past paper" | "pastpaper" | "paper" | "pyq" | "question paper" => Ok(Self::PastPaper),
            "note" | "notes" | "lecture note" | "lecture notes" => Ok(Self::Note),
            "syllabus" => Ok(Self::Syllabus),
            _ => Err(ModelError::UnknownResourceType(s.to_string())),
        }
    }
}

/// Curriculum scheme a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    /// Old scheme (CBCS).
    OldScheme,
    /// New scheme (NEP).
    NewScheme,
}

impl Pattern {
    pub const ALL: [Self; 2] = [Self::OldScheme, Self::NewScheme];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OldScheme => "old",
            Self::NewScheme => "new",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OldScheme => "Old Scheme (CBCS)",
            Self::NewScheme => "New Scheme (NEP)",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Pattern {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "old" | "old scheme" | "oldscheme" | "cbcs" => Ok(Self::OldScheme),
            "new" | "new scheme" | "newscheme" | "nep" => Ok(Self::NewScheme),
            _ => Err(ModelError::UnknownPattern(s.to_string())),
        }
    }
}

/// Degree level of the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegreeLevel {
    Undergraduate,
    Postgraduate,
}

impl DegreeLevel {
    pub const ALL: [Self; 2] = [Self::Undergraduate, Self::Postgraduate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undergraduate => "ug",
            Self::Postgraduate => "pg",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Undergraduate => "Undergraduate",
            Self::Postgraduate => "Postgraduate",
        }
    }
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DegreeLevel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "ug" | "undergraduate" | "under graduate" => Ok(Self::Undergraduate),
            "pg" | "postgraduate" | "post graduate" => Ok(Self::Postgraduate),
            _ => Err(ModelError::UnknownDegreeLevel(s.to_string())),
        }
    }
}

/// Highest semester offered for a pattern/degree combination.
///
/// Postgraduate programmes run four semesters under either scheme.
pub fn max_semester(pattern: Pattern, degree: DegreeLevel) -> u8 {
    match (degree, pattern) {
        (DegreeLevel::Postgraduate, _) => 4,
        (DegreeLevel::Undergraduate, Pattern::OldScheme) => 6,
        (DegreeLevel::Undergraduate, Pattern::NewScheme) => 8,
    }
}

/// Semesters a student can pick for a pattern/degree combination.
pub fn semester_options(pattern: Pattern, degree: DegreeLevel) -> RangeInclusive<u8> {
    1..=max_semester(pattern, degree)
}

/// Moderation status of a student submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_reviewed(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ModelError::UnknownSubmissionStatus(s.to_string())),
        }
    }
}

/// Lowercase, trim, and treat `-`/`_` as spaces.
fn normalize_token(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
