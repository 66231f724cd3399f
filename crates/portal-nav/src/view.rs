//! Navigation state types.
//!
//! This module contains enums for application navigation:
//! - `View`: Current screen/route
//! - `Section`: Top-level navigation links accepted by `navigate`

use std::fmt;
use std::str::FromStr;

use crate::error::NavError;
use crate::selection::Field;

// =============================================================================
// VIEW ENUM
// =============================================================================

/// Current view/screen in the portal.
///
/// The first seven variants form the subject drill-down chain, in order.
/// The rest are independent top-level screens.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Subject picker (root of the drill-down).
    #[default]
    Subjects,
    Patterns,
    Degrees,
    Colleges,
    Semesters,
    ResourceTypes,
    /// Filtered resource list.
    List,

    Planner,
    About,
    Submit,
    Admin,
    Terms,
    Assessments,
    AssessmentHistory,
    /// Saved resources of the logged-in user.
    Profile,
}

impl View {
    /// The drill-down chain in navigation order.
    pub const DRILL_DOWN: [View; 7] = [
        Self::Subjects,
        Self::Patterns,
        Self::Degrees,
        Self::Colleges,
        Self::Semesters,
        Self::ResourceTypes,
        Self::List,
    ];

    /// Every view, drill-down chain first.
    pub const ALL: [View; 15] = [
        Self::Subjects,
        Self::Patterns,
        Self::Degrees,
        Self::Colleges,
        Self::Semesters,
        Self::ResourceTypes,
        Self::List,
        Self::Planner,
        Self::About,
        Self::Submit,
        Self::Admin,
        Self::Terms,
        Self::Assessments,
        Self::AssessmentHistory,
        Self::Profile,
    ];

    /// Stable token used in scripts and breadcrumbs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subjects => "subjects",
            Self::Patterns => "patterns",
            Self::Degrees => "degrees",
            Self::Colleges => "colleges",
            Self::Semesters => "semesters",
            Self::ResourceTypes => "resource-types",
            Self::List => "list",
            Self::Planner => "planner",
            Self::About => "about",
            Self::Submit => "submit",
            Self::Admin => "admin",
            Self::Terms => "terms",
            Self::Assessments => "assessments",
            Self::AssessmentHistory => "assessment-history",
            Self::Profile => "profile",
        }
    }

    /// Screen title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Subjects => "Subjects",
            Self::Patterns => "Choose Pattern",
            Self::Degrees => "Choose Degree",
            Self::Colleges => "Choose College",
            Self::Semesters => "Choose Semester",
            Self::ResourceTypes => "Choose Resource Type",
            Self::List => "Resources",
            Self::Planner => "Study Planner",
            Self::About => "About",
            Self::Submit => "Submit Paper",
            Self::Admin => "Admin Dashboard",
            Self::Terms => "Terms",
            Self::Assessments => "Assessments",
            Self::AssessmentHistory => "Assessment History",
            Self::Profile => "My Profile",
        }
    }

    /// Check if this view is part of the subject drill-down chain.
    pub fn is_drill_down(&self) -> bool {
        Self::DRILL_DOWN.contains(self)
    }

    /// Check if this is an independent top-level screen.
    pub fn is_independent(&self) -> bool {
        !self.is_drill_down()
    }

    /// Whether only a logged-in user may see this view.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Profile)
    }

    /// Selections that must exist before this view can be shown.
    ///
    /// Each drill-down step needs every choice made on the steps before it.
    pub fn prerequisites(&self) -> &'static [Field] {
        const CHAIN: [Field; 6] = [
            Field::Subject,
            Field::Pattern,
            Field::Degree,
            Field::College,
            Field::Semester,
            Field::ResourceType,
        ];
        match self {
            Self::Patterns => &CHAIN[..1],
            Self::Degrees => &CHAIN[..2],
            Self::Colleges => &CHAIN[..3],
            Self::Semesters => &CHAIN[..4],
            Self::ResourceTypes => &CHAIN[..5],
            Self::List => &CHAIN,
            _ => &[],
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|view| view.as_str() == token)
            .ok_or_else(|| NavError::UnknownView(s.to_string()))
    }
}

// =============================================================================
// SECTION ENUM
// =============================================================================

/// Top-level navigation link.
///
/// `navigate(section)` maps each of these onto a view; some also clear or
/// seed selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Submit,
    Saved,
    Profile,
    Admin,
    About,
    Terms,
    Assessments,
    AssessmentHistory,
    Hero,
    Home,
    Resources,
    Planner,
}

impl Section {
    pub const ALL: [Section; 12] = [
        Self::Submit,
        Self::Saved,
        Self::Profile,
        Self::Admin,
        Self::About,
        Self::Terms,
        Self::Assessments,
        Self::AssessmentHistory,
        Self::Hero,
        Self::Home,
        Self::Resources,
        Self::Planner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Saved => "saved",
            Self::Profile => "profile",
            Self::Admin => "admin",
            Self::About => "about",
            Self::Terms => "terms",
            Self::Assessments => "assessments",
            Self::AssessmentHistory => "assessment-history",
            Self::Hero => "hero",
            Self::Home => "home",
            Self::Resources => "resources",
            Self::Planner => "planner",
        }
    }

    /// View this section lands on.
    pub fn target(&self) -> View {
        match self {
            Self::Submit => View::Submit,
            Self::Saved | Self::Profile => View::Profile,
            Self::Admin => View::Admin,
            Self::About => View::About,
            Self::Terms => View::Terms,
            Self::Assessments => View::Assessments,
            Self::AssessmentHistory => View::AssessmentHistory,
            Self::Hero | Self::Home | Self::Resources => View::Subjects,
            Self::Planner => View::Planner,
        }
    }

    /// Whether the section is only reachable by a logged-in user.
    pub fn requires_login(&self) -> bool {
        self.target().requires_login()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == token)
            .ok_or_else(|| NavError::UnknownSection(s.to_string()))
    }
}
