use pathways_schema::{
    ApiErrorBody, QuizQuestionsResponse, QuizType, SubmitQuizRequest, SubmitQuizResponse,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::client::{ApiClient, ApiRequest};
use crate::error::ClientError;

const QUIZ_PATH: &str = "/api/quiz";
const SUBMIT_PATH: &str = "/api/quiz/submit-quiz";
const ATTEMPTS_PATH: &str = "/api/quiz/attempts";

/// Answers collected for one quiz, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSubmission {
    pub quiz_type: QuizType,
    /// One entry per question; unanswered questions are blank.
    pub answers: Vec<String>,
    /// Current stream of the student; required by the career quiz.
    pub stream: Option<String>,
}

impl QuizSubmission {
    pub fn new(quiz_type: QuizType, answers: Vec<String>) -> Self {
        Self {
            quiz_type,
            answers,
            stream: None,
        }
    }

    #[must_use]
    pub fn with_stream(mut self, stream: impl Into<String>) -> Self {
        self.stream = Some(stream.into());
        self
    }

    pub fn into_request(self) -> Result<SubmitQuizRequest, ClientError> {
        let responses: Vec<String> = self
            .answers
            .into_iter()
            .filter(|a| !a.trim().is_empty())
            .collect();
        if responses.is_empty() {
            return Err(ClientError::InvalidRequest(
                "Please answer at least one question",
            ));
        }

        let quiz_type = self.quiz_type.submission_type();
        let stream = self.stream.filter(|s| !s.trim().is_empty());
        if quiz_type.requires_stream() && stream.is_none() {
            return Err(ClientError::InvalidRequest(
                "Please select your current stream",
            ));
        }

        Ok(SubmitQuizRequest {
            quiz_type,
            responses,
            stream: stream.filter(|_| quiz_type.requires_stream()),
        })
    }
}

impl ApiClient {
    pub async fn quiz_questions(
        &self,
        quiz_type: QuizType,
    ) -> Result<QuizQuestionsResponse, ClientError> {
        let req = ApiRequest::get(QUIZ_PATH).segment(quiz_type.slug());
        self.send_json(req).await
    }

    /// Submits answers and returns the recommendation.
    ///
    /// A `success: false` payload is reported as [`ClientError::Rejected`].
    pub async fn submit_quiz(
        &self,
        submission: QuizSubmission,
    ) -> Result<SubmitQuizResponse, ClientError> {
        let body = submission.into_request()?;
        let answered = body.responses.len();
        let req = ApiRequest::post(SUBMIT_PATH).json(&body)?;

        let bytes = self.send(req).await?.bytes().await?;
        let resp: SubmitQuizResponse = serde_json::from_slice(&bytes)?;
        if !resp.success {
            let body = ApiErrorBody::from_bytes(&bytes);
            warn!(
                message = body.message.as_deref().unwrap_or("<none>"),
                "Quiz submission reported failure"
            );
            return Err(ClientError::Rejected { body });
        }

        info!(
            answered,
            recommended = resp
                .suggestions
                .as_ref()
                .map_or("<none>", |s| s.recommended_stream.as_str()),
            "Quiz submitted"
        );
        Ok(resp)
    }

    pub async fn quiz_attempts(&self) -> Result<Value, ClientError> {
        self.send_json(ApiRequest::get(ATTEMPTS_PATH)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathways_schema::SubmissionType;

    fn answers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn blank_answers_are_dropped() {
        let req = QuizSubmission::new(QuizType::Class10, answers(&["Science", " ", "", "Maths"]))
            .into_request()
            .unwrap();
        assert_eq!(req.quiz_type, SubmissionType::Tenth);
        assert_eq!(req.responses, answers(&["Science", "Maths"]));
        assert!(req.stream.is_none());
    }

    #[test]
    fn empty_submission_is_refused() {
        let err = QuizSubmission::new(QuizType::Class10, answers(&["", "  "]))
            .into_request()
            .unwrap_err();
        assert_eq!(err.user_message(), "Please answer at least one question");
    }

    #[test]
    fn career_quiz_needs_a_stream() {
        let err = QuizSubmission::new(QuizType::Class12, answers(&["Coding"]))
            .into_request()
            .unwrap_err();
        assert_eq!(err.user_message(), "Please select your current stream");

        let req = QuizSubmission::new(QuizType::Class12, answers(&["Coding"]))
            .with_stream("Science")
            .into_request()
            .unwrap();
        assert_eq!(req.quiz_type, SubmissionType::Career);
        assert_eq!(req.stream.as_deref(), Some("Science"));
    }

    #[test]
    fn class10_never_sends_a_stream() {
        let req = QuizSubmission::new(QuizType::Class10, answers(&["Art"]))
            .with_stream("Arts")
            .into_request()
            .unwrap();
        assert!(req.stream.is_none());
    }
}
