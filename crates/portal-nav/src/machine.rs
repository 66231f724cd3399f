//! The view/selection state machine.
//!
//! `NavState` holds the current view and the accumulated selections.
//! `NavState::reduce` is a pure function from (state, event) to the next
//! state; `NavState::apply` is the in-place convenience wrapper the session
//! uses.
//!
//! Forward steps are checked against the selections they build on, not
//! against the current view. After a breadcrumb click back to `patterns`
//! the student may pick a different pattern while later choices stay in
//! place, exactly as if the controls were clicked again.

use portal_model::max_semester;
use tracing::debug;

use crate::error::{NavError, Result};
use crate::event::NavEvent;
use crate::selection::Selection;
use crate::view::{Section, View};

/// Current view plus drill-down selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NavState {
    pub view: View,
    pub selection: Selection,
}

/// Result of reducing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The event was accepted; this is the new state.
    Moved(NavState),
    /// The section needs a logged-in user. State is unchanged and the caller
    /// should open its login prompt.
    LoginRequired,
}

/// What `apply` did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved { from: View, to: View },
    LoginRequired,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the state that follows `event`.
    ///
    /// `logged_in` gates the `saved`/`profile` sections and any breadcrumb
    /// back to the profile.
    pub fn reduce(&self, event: &NavEvent, logged_in: bool) -> Result<Transition> {
        let mut next = self.clone();
        let selection = &mut next.selection;

        match event {
            NavEvent::SelectSubject(scope) => {
                selection.subject = Some(scope.clone());
                next.view = View::Patterns;
            }
            NavEvent::SelectPattern(pattern) => {
                self.require(View::Patterns)?;
                selection.pattern = Some(*pattern);
                next.view = View::Degrees;
            }
            NavEvent::SelectDegree(degree) => {
                self.require(View::Degrees)?;
                selection.degree = Some(*degree);
                next.view = View::Colleges;
            }
            NavEvent::SelectCollege(scope) => {
                self.require(View::Colleges)?;
                selection.college = Some(scope.clone());
                next.view = View::Semesters;
            }
            NavEvent::SelectSemester(semester) => {
                self.require(View::Semesters)?;
                self.check_semester(*semester)?;
                selection.semester = Some(*semester);
                // A type seeded from the `resources` link skips the type step.
                next.view = if selection.resource_type.is_some() {
                    View::List
                } else {
                    View::ResourceTypes
                };
            }
            NavEvent::SelectType(kind) => {
                self.require(View::ResourceTypes)?;
                selection.resource_type = Some(*kind);
                next.view = View::List;
            }
            NavEvent::SelectYear(year) => {
                self.require(View::List)?;
                selection.year = *year;
                next.view = View::List;
            }
            NavEvent::BreadcrumbClick(target) => {
                if target.requires_login() && !logged_in {
                    debug!(view = %target, "breadcrumb target needs a logged-in user");
                    return Ok(Transition::LoginRequired);
                }
                if *target == View::Subjects {
                    selection.clear();
                } else {
                    self.require(*target)?;
                }
                next.view = *target;
            }
            NavEvent::Navigate {
                section,
                resource_type,
            } => {
                if section.requires_login() && !logged_in {
                    debug!(section = %section, "navigation needs a logged-in user");
                    return Ok(Transition::LoginRequired);
                }
                match section {
                    Section::Submit | Section::Hero | Section::Home => {
                        selection.subject = None;
                    }
                    Section::Resources => {
                        selection.subject = None;
                        if let Some(kind) = resource_type {
                            selection.resource_type = Some(*kind);
                        }
                    }
                    _ => {}
                }
                next.view = section.target();
            }
        }

        debug!(from = %self.view, to = %next.view, event = %event, "navigation transition");
        Ok(Transition::Moved(next))
    }

    /// Apply `event` in place.
    ///
    /// On error the state is left untouched.
    pub fn apply(&mut self, event: &NavEvent, logged_in: bool) -> Result<Outcome> {
        match self.reduce(event, logged_in)? {
            Transition::Moved(next) => {
                let from = self.view;
                *self = next;
                Ok(Outcome::Moved {
                    from,
                    to: self.view,
                })
            }
            Transition::LoginRequired => Ok(Outcome::LoginRequired),
        }
    }

    /// Fail unless every selection `target` depends on has been made.
    fn require(&self, target: View) -> Result<()> {
        match self.selection.first_missing(target.prerequisites()) {
            Some(missing) => Err(NavError::MissingSelection { target, missing }),
            None => Ok(()),
        }
    }

    fn check_semester(&self, semester: u8) -> Result<()> {
        let (Some(pattern), Some(degree)) = (self.selection.pattern, self.selection.degree) else {
            return Ok(());
        };
        let max = max_semester(pattern, degree);
        if semester == 0 || semester > max {
            return Err(NavError::SemesterOutOfRange { semester, max });
        }
        Ok(())
    }
}
