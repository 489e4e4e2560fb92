use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Quiz selectable on the quiz page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    /// Stream selection quiz for class 10 students.
    Class10,
    /// Career quiz for class 12 students; needs the student's current stream.
    Class12,
}

impl QuizType {
    /// Path segment used by `GET /api/quiz/:quizType`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Class10 => "class10",
            Self::Class12 => "class12",
        }
    }

    /// `quizType` value expected by `POST /api/quiz/submit-quiz`.
    pub fn submission_type(self) -> SubmissionType {
        match self {
            Self::Class10 => SubmissionType::Tenth,
            Self::Class12 => SubmissionType::Career,
        }
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SubmissionType {
    #[serde(rename = "10th")]
    Tenth,
    #[serde(rename = "career")]
    Career,
}

impl SubmissionType {
    pub fn requires_stream(self) -> bool {
        matches!(self, Self::Career)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct QuizQuestion {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub options: Vec<String>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct QuizQuestionsResponse {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

/// Body of `POST /api/quiz/submit-quiz`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub quiz_type: SubmissionType,
    pub responses: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSuggestions {
    #[serde(default)]
    pub recommended_stream: String,

    /// Only present for the career quiz.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_courses: Vec<String>,

    #[serde(default)]
    pub ai_insights: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SubmitQuizResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<QuizSuggestions>,
}
