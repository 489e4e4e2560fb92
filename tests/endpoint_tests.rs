use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
};
use pathways::config::RetryConfig;
use pathways::{ApiClient, ClientError, Credentials, MemoryStore, QuizSubmission};
use pathways_schema::{CollegeFilters, CourseFilters, QuizType, TimelineFilters};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

#[derive(Clone, Default)]
struct CaptureState {
    requests: Arc<Mutex<Vec<Captured>>>,
}

#[derive(Debug, Clone)]
struct Captured {
    method: Method,
    /// Path plus query, exactly as received.
    target: String,
    authorization: Option<String>,
    body: Value,
}

impl CaptureState {
    fn last(&self) -> Captured {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one request")
    }

    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn spawn_test_server(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{}", addr)).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

async fn setup() -> (ApiClient, CaptureState) {
    let captured = CaptureState::default();
    let app = Router::new()
        .fallback(api_handler)
        .with_state(captured.clone());
    let base = spawn_test_server(app).await;

    let store = Arc::new(MemoryStore::with_credentials(&Credentials::new(
        "access-1",
        "refresh-1",
    )));
    let client = ApiClient::with_http_client(
        reqwest::Client::new(),
        base,
        &RetryConfig::default(),
        store,
    );
    (client, captured)
}

async fn api_handler(
    State(state): State<CaptureState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> (StatusCode, Json<Value>) {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
    state.requests.lock().unwrap().push(Captured {
        method: method.clone(),
        target,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    match uri.path() {
        "/api/quiz/class10" | "/api/quiz/class12" => (
            StatusCode::OK,
            Json(json!({"questions": [
                {"_id": 1, "question": "Which subject do you enjoy most?", "options": ["Maths", "Biology"]}
            ]})),
        ),
        "/api/quiz/submit-quiz" if payload["responses"][0] == "trigger-gemini" => (
            StatusCode::OK,
            Json(json!({"success": false, "message": "Gemini error"})),
        ),
        "/api/quiz/submit-quiz" => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Career quiz processed successfully",
                "suggestions": {
                    "recommendedStream": "Computer Science Engineering",
                    "topCourses": ["B.Tech CSE", "B.Sc Data Science"],
                    "aiInsights": "Strong analytical interest."
                }
            })),
        ),
        "/api/courses/streams" => (StatusCode::OK, Json(json!(["Science", "Commerce", "Arts"]))),
        "/api/colleges/c1" => (
            StatusCode::OK,
            Json(json!({"success": true, "data": {"_id": "c1", "name": "NIT Trichy", "type": "Government"}})),
        ),
        "/api/colleges/missing" => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "College not found"})),
        ),
        "/api/users/profile" if method == Method::PUT => (
            StatusCode::OK,
            Json(json!({"success": true, "user": payload})),
        ),
        "/api/users/profile" => (
            StatusCode::OK,
            Json(json!({"user": {"_id": "u1", "name": "Asha", "email": "asha@example.com"}})),
        ),
        _ => (StatusCode::OK, Json(json!({"success": true, "data": []}))),
    }
}

#[tokio::test]
async fn catalog_requests_use_expected_paths_and_queries() {
    let (client, captured) = setup().await;

    let filters = CourseFilters {
        stream: Some("Science".to_string()),
        level: None,
    };
    assert!(client.courses(&filters).await.unwrap().is_empty());
    assert_eq!(captured.last().target, "/api/courses?stream=Science");

    assert_eq!(
        client.course_streams().await.unwrap(),
        vec!["Science", "Commerce", "Arts"]
    );

    client.search_courses("data science").await.unwrap();
    assert_eq!(captured.last().target, "/api/courses/search/data%20science");

    let filters = CollegeFilters {
        location: Some("Delhi".to_string()),
        kind: Some("Government".to_string()),
    };
    client.colleges(&filters).await.unwrap();
    assert_eq!(
        captured.last().target,
        "/api/colleges?location=Delhi&type=Government"
    );

    client.top_colleges(10).await.unwrap();
    assert_eq!(captured.last().target, "/api/colleges/top/10");

    client.college_locations().await.unwrap();
    assert_eq!(captured.last().target, "/api/colleges/locations");

    client.timeline(&TimelineFilters::default()).await.unwrap();
    assert_eq!(captured.last().target, "/api/timeline");

    client.upcoming_events(5).await.unwrap();
    assert_eq!(captured.last().target, "/api/timeline/upcoming?limit=5");

    client.month_events(2025, 3).await.unwrap();
    assert_eq!(captured.last().target, "/api/timeline/month/2025/3");

    client.search_events("JEE").await.unwrap();
    let last = captured.last();
    assert_eq!(last.target, "/api/timeline/search/JEE");
    assert_eq!(last.method, Method::GET);
    assert_eq!(last.authorization.as_deref(), Some("Bearer access-1"));
}

#[tokio::test]
async fn invalid_catalog_arguments_are_caught_locally() {
    let (client, captured) = setup().await;

    let err = client.month_events(2025, 13).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
    let err = client.search_colleges("   ").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));

    assert_eq!(captured.count(), 0, "nothing should reach the server");
}

#[tokio::test]
async fn records_are_unwrapped_and_missing_ones_pass_through() {
    let (client, _captured) = setup().await;

    let college = client.college("c1").await.unwrap();
    assert_eq!(college.name, "NIT Trichy");
    assert_eq!(college.kind.as_deref(), Some("Government"));

    let err = client.college("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    assert_eq!(err.user_message(), "College not found");
}

#[tokio::test]
async fn quiz_flow_sends_wire_payload() {
    let (client, captured) = setup().await;

    let questions = client.quiz_questions(QuizType::Class12).await.unwrap();
    assert_eq!(questions.questions.len(), 1);
    assert_eq!(captured.last().target, "/api/quiz/class12");

    let submission = QuizSubmission::new(
        QuizType::Class12,
        vec!["I enjoy programming".to_string(), String::new()],
    )
    .with_stream("Science");
    let resp = client.submit_quiz(submission).await.unwrap();
    assert_eq!(
        resp.suggestions.map(|s| s.recommended_stream).as_deref(),
        Some("Computer Science Engineering")
    );

    let sent = captured.last();
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.target, "/api/quiz/submit-quiz");
    assert_eq!(
        sent.body,
        json!({
            "quizType": "career",
            "responses": ["I enjoy programming"],
            "stream": "Science"
        })
    );

    client.quiz_attempts().await.unwrap();
    assert_eq!(captured.last().target, "/api/quiz/attempts");
}

#[tokio::test]
async fn unsuccessful_submission_is_reported_as_rejected() {
    let (client, _captured) = setup().await;

    let submission = QuizSubmission::new(QuizType::Class10, vec!["trigger-gemini".to_string()]);
    let err = client.submit_quiz(submission).await.unwrap_err();

    assert!(matches!(err, ClientError::Rejected { .. }), "got {err:?}");
    assert_eq!(
        err.user_message(),
        "AI analysis is temporarily unavailable. Your quiz was saved, but recommendations may not be available."
    );
}

#[tokio::test]
async fn profile_is_fetched_and_cached() {
    let (client, captured) = setup().await;

    let user = client.profile().await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Asha"));
    assert_eq!(
        client.current_user().await.unwrap().and_then(|u| u.email),
        Some("asha@example.com".to_string())
    );

    let mut update = user.clone();
    update.name = Some("Asha R".to_string());
    let updated = client.update_profile(&update).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("Asha R"));

    let sent = captured.last();
    assert_eq!(sent.method, Method::PUT);
    assert_eq!(sent.target, "/api/users/profile");
    assert_eq!(sent.body["name"], "Asha R");
    assert_eq!(
        client.current_user().await.unwrap().and_then(|u| u.name),
        Some("Asha R".to_string())
    );
}
