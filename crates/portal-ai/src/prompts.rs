//! Prompt construction.
//!
//! Each builder returns the system and user messages for one request.

use std::fmt::Write as _;

use portal_model::Question;

/// A system/user message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const TUTOR_ROLE: &str = "You are a patient university tutor. Answer clearly and concisely, \
     using short paragraphs and examples where they help.";

const EXAMINER_ROLE: &str = "You are a university examiner. Reply with JSON only, no commentary.";

/// Free-form study question.
pub fn ask(text: &str) -> Prompt {
    Prompt {
        system: TUTOR_ROLE.to_string(),
        user: text.trim().to_string(),
    }
}

/// Ask for `count` short-answer questions as a JSON array of
/// `{"text": ..., "marks": ...}` objects.
pub fn generate_questions(subject: &str, semester: u8, topic: &str, count: u32) -> Prompt {
    Prompt {
        system: EXAMINER_ROLE.to_string(),
        user: format!(
            "Write {count} short-answer exam questions on \"{topic}\" for semester {semester} \
             {subject} students. Return a JSON array where each element is an object with \
             a \"text\" string and an integer \"marks\" between 1 and 10."
        ),
    }
}

/// Ask for a grade as a JSON object `{"score", "total", "feedback"}`.
pub fn evaluate(questions: &[Question], answers: &[String]) -> Prompt {
    let mut user = String::from(
        "Grade the student's answers. Return a JSON object with an integer \"score\", \
         the integer \"total\" of available marks, and a short \"feedback\" string.\n",
    );
    for (question, answer) in questions.iter().zip(answers) {
        let answer = answer.trim();
        let answer = if answer.is_empty() { "(no answer)" } else { answer };
        // Writing to a String cannot fail.
        let _ = write!(
            user,
            "\nQ{} ({} marks): {}\nAnswer: {}\n",
            question.number, question.marks, question.text, answer
        );
    }
    Prompt {
        system: EXAMINER_ROLE.to_string(),
        user,
    }
}
