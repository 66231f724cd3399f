//! Navigation events.
//!
//! Each user action in the browsing flow is one `NavEvent`. Events also have
//! a one-line text form (`subject phy`, `navigate resources lecture note`)
//! used by scripted sessions.

use std::fmt;
use std::str::FromStr;

use portal_model::{CollegeId, DegreeLevel, Pattern, ResourceType, SubjectId};

use crate::error::NavError;
use crate::selection::Scope;
use crate::view::{Section, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    SelectSubject(Scope<SubjectId>),
    SelectPattern(Pattern),
    SelectDegree(DegreeLevel),
    SelectCollege(Scope<CollegeId>),
    SelectSemester(u8),
    SelectType(ResourceType),
    /// Narrow the list to one year, or clear the year filter with `None`.
    SelectYear(Option<u16>),
    BreadcrumbClick(View),
    Navigate {
        section: Section,
        /// Pre-seeds the resource type when navigating to `resources`.
        resource_type: Option<ResourceType>,
    },
}

impl NavEvent {
    pub fn navigate(section: Section) -> Self {
        Self::Navigate {
            section,
            resource_type: None,
        }
    }

    pub fn navigate_with_type(section: Section, resource_type: ResourceType) -> Self {
        Self::Navigate {
            section,
            resource_type: Some(resource_type),
        }
    }
}

impl fmt::Display for NavEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectSubject(scope) => write!(f, "subject {scope}"),
            Self::SelectPattern(pattern) => write!(f, "pattern {}", pattern.as_str()),
            Self::SelectDegree(degree) => write!(f, "degree {}", degree.as_str()),
            Self::SelectCollege(scope) => write!(f, "college {scope}"),
            Self::SelectSemester(semester) => write!(f, "semester {semester}"),
            Self::SelectType(kind) => write!(f, "type {}", kind.as_str()),
            Self::SelectYear(Some(year)) => write!(f, "year {year}"),
            Self::SelectYear(None) => f.write_str("year all"),
            Self::BreadcrumbClick(view) => write!(f, "crumb {view}"),
            Self::Navigate {
                section,
                resource_type: Some(kind),
            } => write!(f, "navigate {section} {}", kind.as_str()),
            Self::Navigate {
                section,
                resource_type: None,
            } => write!(f, "navigate {section}"),
        }
    }
}

impl FromStr for NavEvent {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let invalid = || NavError::InvalidEvent(line.to_string());

        match verb.to_lowercase().as_str() {
            "subject" => Scope::<SubjectId>::parse_token(rest)?
                .map(Self::SelectSubject)
                .ok_or_else(invalid),
            "pattern" => Ok(Self::SelectPattern(rest.parse()?)),
            "degree" => Ok(Self::SelectDegree(rest.parse()?)),
            "college" => Scope::<CollegeId>::parse_token(rest)?
                .map(Self::SelectCollege)
                .ok_or_else(invalid),
            "semester" => rest
                .parse::<u8>()
                .map(Self::SelectSemester)
                .map_err(|_| invalid()),
            "type" => Ok(Self::SelectType(rest.parse()?)),
            "year" => match rest.to_lowercase().as_str() {
                "" | "all" | "any" | "none" => Ok(Self::SelectYear(None)),
                value => value
                    .parse::<u16>()
                    .map(|year| Self::SelectYear(Some(year)))
                    .map_err(|_| invalid()),
            },
            "crumb" | "breadcrumb" => Ok(Self::BreadcrumbClick(rest.parse()?)),
            "navigate" | "nav" => {
                let (section, kind) = match rest.split_once(char::is_whitespace) {
                    Some((section, kind)) => (section, Some(kind.trim())),
                    None => (rest, None),
                };
                Ok(Self::Navigate {
                    section: section.parse()?,
                    resource_type: kind.map(str::parse::<ResourceType>).transpose()?,
                })
            }
            _ => Err(invalid()),
        }
    }
}
