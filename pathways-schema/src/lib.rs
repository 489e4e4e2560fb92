pub mod auth;
pub mod catalog;
pub mod error;
pub mod quiz;

pub use auth::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequest, TokenPair, UserProfile,
};
pub use catalog::{
    College, CollegeFilters, Course, CourseFilters, Listing, Record, TimelineEvent,
    TimelineFilters,
};
pub use error::{ApiErrorBody, FieldError, KnownFailure};
pub use quiz::{
    QuizQuestion, QuizQuestionsResponse, QuizSuggestions, QuizType, SubmissionType,
    SubmitQuizRequest, SubmitQuizResponse,
};
