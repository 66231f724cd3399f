//! Breadcrumb trail for the current screen.

use portal_model::Subject;

use crate::machine::NavState;
use crate::selection::Scope;
use crate::view::View;

/// Icon shown next to a breadcrumb (Lucide icon names).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrumbIcon {
    Home,
    BookOpen,
    Calendar,
    Info,
    Upload,
    Shield,
    FileText,
    ClipboardCheck,
    History,
    User,
}

impl CrumbIcon {
    pub fn token(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::BookOpen => "book-open",
            Self::Calendar => "calendar",
            Self::Info => "info",
            Self::Upload => "upload",
            Self::Shield => "shield",
            Self::FileText => "file-text",
            Self::ClipboardCheck => "clipboard-check",
            Self::History => "history",
            Self::User => "user",
        }
    }

    fn for_view(view: View) -> Self {
        match view {
            View::Planner => Self::Calendar,
            View::About => Self::Info,
            View::Submit => Self::Upload,
            View::Admin => Self::Shield,
            View::Terms => Self::FileText,
            View::Assessments => Self::ClipboardCheck,
            View::AssessmentHistory => Self::History,
            View::Profile => Self::User,
            _ => Self::BookOpen,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub icon: CrumbIcon,
    pub clickable: bool,
    /// View a click on this crumb navigates to.
    pub target: View,
}

/// Project the breadcrumb trail for `state`.
///
/// Always starts with Home. Independent screens add their own title;
/// drill-down screens past the subject picker add the active subject,
/// which leads back to the pattern step. `subjects` resolves display names.
pub fn breadcrumbs(state: &NavState, subjects: &[Subject]) -> Vec<Breadcrumb> {
    let mut trail = vec![Breadcrumb {
        label: "Home".to_string(),
        icon: CrumbIcon::Home,
        clickable: true,
        target: View::Subjects,
    }];

    if state.view.is_independent() {
        trail.push(Breadcrumb {
            label: state.view.title().to_string(),
            icon: CrumbIcon::for_view(state.view),
            clickable: false,
            target: state.view,
        });
    } else if state.view != View::Subjects {
        if let Some(scope) = &state.selection.subject {
            let label = match scope {
                Scope::All => "All Subjects".to_string(),
                Scope::Only(id) => subjects
                    .iter()
                    .find(|subject| &subject.id == id)
                    .map_or_else(|| id.to_string(), |subject| subject.name.clone()),
            };
            trail.push(Breadcrumb {
                label,
                icon: CrumbIcon::BookOpen,
                clickable: true,
                target: View::Patterns,
            });
        }
    }

    trail
}

/// Plain-text rendering, e.g. `Home > Physics`.
pub fn trail_text(trail: &[Breadcrumb]) -> String {
    trail
        .iter()
        .map(|crumb| crumb.label.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}
