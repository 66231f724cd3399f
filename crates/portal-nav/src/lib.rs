//! Drill-down navigation for the study resource portal.
//!
//! Browsing works as a sequence of choices: subject, pattern, degree,
//! college, semester and resource type, ending at a filtered list. This
//! crate models that flow as plain data with no I/O:
//!
//! - [`NavState`] / [`NavEvent`]: the state machine and its reducer
//! - [`visible_resources`] / [`FilterCache`]: which resources a view shows
//! - [`breadcrumbs`]: the navigable trail for the current view
//!
//! # Example
//!
//! ```
//! use portal_nav::{NavEvent, NavState, Section, View};
//! use portal_model::ResourceType;
//!
//! let mut state = NavState::new();
//! state
//!     .apply(&NavEvent::navigate_with_type(Section::Resources, ResourceType::Note), false)
//!     .unwrap();
//! assert_eq!(state.view, View::Subjects);
//! assert_eq!(state.selection.resource_type, Some(ResourceType::Note));
//! ```

mod breadcrumb;
mod error;
mod event;
mod filter;
mod machine;
mod selection;
mod view;

pub use breadcrumb::{Breadcrumb, CrumbIcon, breadcrumbs, trail_text};
pub use error::{NavError, Result};
pub use event::NavEvent;
pub use filter::{Catalog, FilterCache, available_years, matches_selection, visible_resources};
pub use machine::{NavState, Outcome, Transition};
pub use selection::{Field, Scope, Selection};
pub use view::{Section, View};
