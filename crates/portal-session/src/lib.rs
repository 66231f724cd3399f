//! One student's (or admin's) session with the study resource portal.
//!
//! A `Session` owns the navigation state, an in-memory `Catalog` loaded
//! from the store at open, and the logged-in user. Reads are served from
//! memory. Mutations follow a two-phase pattern:
//!
//! 1. the change is applied locally and is visible immediately;
//! 2. the matching store write runs on tokio's blocking pool, after every
//!    write dispatched before it.
//!
//! `Session::settle` awaits every dispatched write and returns a
//! `WriteReport`. Failed writes are logged and reported, never retried, and
//! the local change is not rolled back.
//!
//! Methods that dispatch writes must be called from within a tokio runtime.

mod admin;
mod assessment;
mod error;
mod session;
mod writes;

pub use assessment::Assessment;
pub use error::{Result, SessionError};
pub use session::{Backend, PaperDraft, Session, display_size};
pub use writes::{WriteFailure, WriteReport};

/// Credits awarded to a student when one of their submissions is approved.
pub const CREDITS_PER_APPROVAL: u32 = 10;
