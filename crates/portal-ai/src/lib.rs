//! Study assistant for the study resource portal.
//!
//! Three things are asked of a hosted chat model: answer a free-form study
//! question, generate assessment questions for a subject and topic, and
//! grade a student's answers. `AiService` is the seam; `HttpAiClient`
//! talks to any OpenAI-compatible `/chat/completions` endpoint.
//!
//! The model's replies are untrusted text. `parse` pulls JSON out of them
//! and normalizes what it finds (question numbering, score bounds) before
//! anything reaches the rest of the portal.

mod client;
mod config;
mod error;
pub mod parse;
pub mod prompts;

pub use client::HttpAiClient;
pub use config::AiSettings;
pub use error::{AiError, Result};

use portal_model::{Evaluation, Question};

/// Hosted-model operations the portal relies on.
///
/// Calls block; async callers should run them on the blocking pool.
pub trait AiService: Send + Sync {
    /// Free-form study help.
    fn ask_question(&self, text: &str) -> Result<String>;

    /// Questions for a subject, semester and topic, numbered from 1.
    fn generate_questions(&self, subject: &str, semester: u8, topic: &str)
    -> Result<Vec<Question>>;

    /// Grade `answers` (one per question, same order).
    ///
    /// Fails with `AnswerCountMismatch` before any request is made if the
    /// counts differ.
    fn evaluate(&self, questions: &[Question], answers: &[String]) -> Result<Evaluation>;
}

/// Check that every question has exactly one answer.
pub fn check_answer_count(questions: &[Question], answers: &[String]) -> Result<()> {
    if questions.len() == answers.len() {
        Ok(())
    } else {
        Err(AiError::AnswerCountMismatch {
            questions: questions.len(),
            answers: answers.len(),
        })
    }
}
