//! AI study help and self-assessments.

use std::sync::Arc;

use portal_ai::{AiService, check_answer_count};
use portal_model::{AssessmentRecord, Question, SubjectId, total_marks};
use tracing::info;

use crate::error::{Result, SessionError};
use crate::session::{Backend, Session};

/// A generated assessment waiting for answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub subject_id: SubjectId,
    /// Display name used in the prompt.
    pub subject_name: String,
    pub semester: u8,
    pub topic: String,
    pub questions: Vec<Question>,
}

impl Assessment {
    pub fn total_marks(&self) -> u32 {
        total_marks(&self.questions)
    }
}

impl<B: Backend> Session<B> {
    fn assistant(&self) -> Result<Arc<dyn AiService>> {
        self.ai.clone().ok_or(SessionError::AiUnavailable)
    }

    /// Ask the study assistant a free-form question.
    pub async fn ask(&self, text: &str) -> Result<String> {
        let ai = self.assistant()?;
        let text = text.to_string();
        Ok(tokio::task::spawn_blocking(move || ai.ask_question(&text))
            .await
            .map_err(|e| SessionError::Task(e.to_string()))??)
    }

    /// Generate questions for `subject`, `semester` and `topic`.
    pub async fn generate_assessment(
        &self,
        subject: &SubjectId,
        semester: u8,
        topic: &str,
    ) -> Result<Assessment> {
        self.require_user("take assessments")?;
        let ai = self.assistant()?;
        let subject_name = self
            .catalog
            .subject(subject)
            .map_or_else(|| subject.to_string(), |s| s.name.clone());

        let (name, prompt_topic) = (subject_name.clone(), topic.to_string());
        let questions = tokio::task::spawn_blocking(move || {
            ai.generate_questions(&name, semester, &prompt_topic)
        })
        .await
        .map_err(|e| SessionError::Task(e.to_string()))??;

        Ok(Assessment {
            subject_id: subject.clone(),
            subject_name,
            semester,
            topic: topic.to_string(),
            questions,
        })
    }

    /// Grade `answers` and record the result for the current user.
    pub async fn submit_assessment(
        &mut self,
        assessment: &Assessment,
        answers: Vec<String>,
    ) -> Result<AssessmentRecord> {
        let user_id = self.require_user("take assessments")?.id.clone();
        check_answer_count(&assessment.questions, &answers)?;
        let ai = self.assistant()?;

        let questions = assessment.questions.clone();
        let evaluation = tokio::task::spawn_blocking(move || ai.evaluate(&questions, &answers))
            .await
            .map_err(|e| SessionError::Task(e.to_string()))??;

        let record = AssessmentRecord::from_evaluation(
            user_id,
            assessment.subject_id.clone(),
            assessment.semester,
            assessment.topic.clone(),
            &evaluation,
        );
        info!(
            subject = %record.subject_id,
            score = record.score,
            total = record.total,
            "assessment graded"
        );

        self.recorded.push(record.clone());
        let stored = record.clone();
        self.dispatch_write("record_assessment", move |store| {
            store.record_assessment(&stored)
        });
        Ok(record)
    }

    /// Generate, answer and grade in one go.
    ///
    /// `answer` is shown the questions and returns one answer per question.
    pub async fn take_assessment(
        &mut self,
        subject: &SubjectId,
        semester: u8,
        topic: &str,
        answer: impl FnOnce(&Assessment) -> Vec<String>,
    ) -> Result<AssessmentRecord> {
        let assessment = self.generate_assessment(subject, semester, topic).await?;
        let answers = answer(&assessment);
        self.submit_assessment(&assessment, answers).await
    }

    /// The current user's past assessments, oldest first.
    ///
    /// Includes results recorded this session whose write has not landed.
    pub async fn assessment_history(&self) -> Result<Vec<AssessmentRecord>> {
        let user_id = self.require_user("view assessment history")?.id.clone();
        let lookup = user_id.clone();
        let mut history = self
            .read(move |store| store.list_assessments(&lookup))
            .await?;
        for record in self.recorded.iter().filter(|r| r.user_id == user_id) {
            if !history.iter().any(|stored| stored.id == record.id) {
                history.push(record.clone());
            }
        }
        history.sort_by_key(|record| record.taken_at);
        Ok(history)
    }
}
