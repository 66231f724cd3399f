//! Reading structured data out of model replies.

use portal_model::{Evaluation, Question, total_marks};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::debug;

use crate::error::{AiError, Result};

/// Marks assumed for a generated question that does not state any.
pub const DEFAULT_MARKS: u32 = 1;

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(alias = "question")]
    text: String,
    #[serde(default)]
    marks: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawEvaluation {
    score: f64,
    #[serde(default)]
    feedback: String,
}

/// Extract the JSON value from a model reply.
///
/// Accepts bare JSON, JSON inside a Markdown code fence, or JSON surrounded
/// by prose. Returns the first span that is a complete JSON array or object.
pub fn extract_json(reply: &str) -> Result<&str> {
    json_spans(reply)
        .next()
        .ok_or_else(|| AiError::InvalidResponse("no JSON found in reply".to_string()))
}

/// Deserialize the first JSON span in `reply` that has the shape of `T`.
///
/// Bracketed prose such as `[out of 10]` is skipped. If no span fits, the
/// error is the one from the first well-formed span.
fn parse_reply<T: DeserializeOwned>(reply: &str) -> Result<T> {
    let mut first_error = None;
    for span in json_spans(reply) {
        match serde_json::from_str(span) {
            Ok(value) => return Ok(value),
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }
    Err(match first_error {
        Some(err) => err.into(),
        None => AiError::InvalidResponse("no JSON found in reply".to_string()),
    })
}

/// Spans of `reply` holding one complete JSON array or object, in order of
/// their opening bracket.
fn json_spans(reply: &str) -> impl Iterator<Item = &str> {
    let body = strip_fence(reply.trim());
    body.match_indices(['[', '{']).filter_map(move |(start, _)| {
        let rest = &body[start..];
        let mut values = serde_json::Deserializer::from_str(rest).into_iter::<IgnoredAny>();
        match values.next() {
            Some(Ok(_)) => Some(&rest[..values.byte_offset()]),
            _ => None,
        }
    })
}

fn strip_fence(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after = &text[open + 3..];
    // Skip the info string ("json") up to the end of the fence line.
    let after = after.split_once('\n').map_or(after, |(_, rest)| rest);
    match after.find("```") {
        Some(close) => &after[..close],
        None => after,
    }
}

/// Parse generated questions, numbering them from 1.
///
/// Blank questions are dropped. Missing or non-positive marks become
/// `DEFAULT_MARKS`.
pub fn parse_questions(reply: &str) -> Result<Vec<Question>> {
    let raw: Vec<RawQuestion> = parse_reply(reply)?;
    let questions: Vec<Question> = raw
        .into_iter()
        .map(|q| (q.text.trim().to_string(), q.marks))
        .filter(|(text, _)| !text.is_empty())
        .zip(1u32..)
        .map(|((text, marks), number)| Question {
            number,
            text,
            marks: marks_from(marks),
        })
        .collect();

    if questions.is_empty() {
        return Err(AiError::InvalidResponse(
            "reply contained no questions".to_string(),
        ));
    }
    debug!(count = questions.len(), "parsed generated questions");
    Ok(questions)
}

fn marks_from(value: Option<f64>) -> u32 {
    match value {
        Some(marks) if marks.is_finite() && marks >= 1.0 => {
            // Clamped to a sane range before the cast.
            marks.round().min(100.0) as u32
        }
        _ => DEFAULT_MARKS,
    }
}

/// Parse a grade for `questions`.
///
/// The total is always the questions' own mark total, whatever the model
/// claims, and the score is clamped into `0..=total`.
pub fn parse_evaluation(reply: &str, questions: &[Question]) -> Result<Evaluation> {
    let raw: RawEvaluation = parse_reply(reply)?;
    let total = total_marks(questions);
    let score = if raw.score.is_finite() && raw.score > 0.0 {
        (raw.score.round().min(f64::from(total))) as u32
    } else {
        0
    };
    Ok(Evaluation::new(score, total, raw.feedback.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question {
                number: 1,
                text: "a".to_string(),
                marks: 4,
            },
            Question {
                number: 2,
                text: "b".to_string(),
                marks: 6,
            },
        ]
    }

    #[test]
    fn extracts_from_code_fence_and_prose() {
        let reply = "Here you go:\n```json\n[{\"text\": \"x\"}]\n```\nGood luck!";
        assert_eq!(extract_json(reply).unwrap(), "[{\"text\": \"x\"}]");

        let reply = "Result: {\"score\": 3} as requested";
        assert_eq!(extract_json(reply).unwrap(), "{\"score\": 3}");
    }

    #[test]
    fn bracketed_prose_is_skipped() {
        let reply = r#"Score [out of 10]: {"score": 3} (see {rubric} below)"#;
        assert_eq!(extract_json(reply).unwrap(), r#"{"score": 3}"#);
        let evaluation = parse_evaluation(reply, &questions()).unwrap();
        assert_eq!(evaluation.score, 3);
    }

    #[test]
    fn first_span_of_the_right_shape_wins() {
        let reply = r#"Marks [10]: {"score": 7, "feedback": "Good"} {"score": 1}"#;
        let evaluation = parse_evaluation(reply, &questions()).unwrap();
        assert_eq!((evaluation.score, evaluation.feedback.as_str()), (7, "Good"));

        let reply = "Questions:\n[{\"text\": \"Define entropy.\"}]\nEnd of list }";
        assert_eq!(parse_questions(reply).unwrap().len(), 1);
    }

    #[test]
    fn reply_without_json_is_invalid() {
        assert!(matches!(
            extract_json("I cannot help with that."),
            Err(AiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn questions_are_renumbered_and_defaulted() {
        let reply = r#"[
            {"text": "What is entropy?", "marks": 3},
            {"text": "   "},
            {"question": "State Hess's law.", "marks": 0},
            {"text": "Define enthalpy.", "marks": 2.6}
        ]"#;
        let parsed = parse_questions(reply).unwrap();
        let summary: Vec<(u32, u32)> = parsed.iter().map(|q| (q.number, q.marks)).collect();
        assert_eq!(summary, [(1, 3), (2, DEFAULT_MARKS), (3, 3)]);
        assert_eq!(parsed[1].text, "State Hess's law.");
    }

    #[test]
    fn empty_question_list_is_invalid() {
        assert!(matches!(
            parse_questions("[]"),
            Err(AiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn evaluation_uses_question_total_and_clamps() {
        let reply = r#"{"score": 14, "total": 20, "feedback": " Solid work. "}"#;
        let evaluation = parse_evaluation(reply, &questions()).unwrap();
        assert_eq!((evaluation.score, evaluation.total), (10, 10));
        assert_eq!(evaluation.feedback, "Solid work.");

        let evaluation = parse_evaluation(r#"{"score": -2}"#, &questions()).unwrap();
        assert_eq!(evaluation.score, 0);
        assert_eq!(evaluation.feedback, "");
    }

    #[test]
    fn malformed_evaluation_is_a_parse_error() {
        assert!(matches!(
            parse_evaluation(r#"{"grade": "A"}"#, &questions()),
            Err(AiError::JsonParse(_))
        ));
    }
}
