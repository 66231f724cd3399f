//! Accumulated drill-down choices.
//!
//! Every field is `None` until its step has been taken. Subject and college
//! additionally accept an explicit "all" scope; for college, "all" and unset
//! filter identically. Empty strings are treated as unset at parse time so
//! only one "no filter" representation exists past this module.

use std::fmt;
use std::str::FromStr;

use portal_model::{CollegeId, DegreeLevel, Pattern, ResourceType, SubjectId};

/// A selection that is either a specific value or the "all" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Scope<T> {
    /// Does `value` fall inside this scope?
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl<T> Scope<T>
where
    T: FromStr,
{
    /// Parse a scope token: `all` is the sentinel, blank is unset.
    pub fn parse_token(token: &str) -> Result<Option<Self>, T::Err> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Some(Self::All));
        }
        trimmed.parse().map(|value| Some(Self::Only(value)))
    }
}

impl<T: fmt::Display> fmt::Display for Scope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

/// One drill-down dimension, used to report a missing prerequisite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Subject,
    Pattern,
    Degree,
    College,
    Semester,
    ResourceType,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Pattern => "pattern",
            Self::Degree => "degree",
            Self::College => "college",
            Self::Semester => "semester",
            Self::ResourceType => "resource type",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's current navigation path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub subject: Option<Scope<SubjectId>>,
    pub pattern: Option<Pattern>,
    pub degree: Option<DegreeLevel>,
    pub college: Option<Scope<CollegeId>>,
    pub semester: Option<u8>,
    pub resource_type: Option<ResourceType>,
    pub year: Option<u16>,
}

impl Selection {
    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::Subject => self.subject.is_some(),
            Field::Pattern => self.pattern.is_some(),
            Field::Degree => self.degree.is_some(),
            Field::College => self.college.is_some(),
            Field::Semester => self.semester.is_some(),
            Field::ResourceType => self.resource_type.is_some(),
        }
    }

    /// First field in `required` that has not been chosen.
    pub fn first_missing(&self, required: &[Field]) -> Option<Field> {
        required.iter().copied().find(|field| !self.is_set(*field))
    }

    /// Whether the list filter has every choice it needs.
    ///
    /// College is not part of this: an unset college filters like "all".
    pub fn is_list_complete(&self) -> bool {
        self.subject.is_some()
            && self.pattern.is_some()
            && self.degree.is_some()
            && self.semester.is_some()
            && self.resource_type.is_some()
    }

    /// Reset every field, including year.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
