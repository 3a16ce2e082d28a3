//! REST adapter tests against a local stub upstream

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use core_kernel::{PortError, SubmissionId};
use domain_session::{AuthService, AuthToken, Credentials, SessionError, SessionStore};
use domain_submission::{
    Application, Assessment, AssessmentOutcome, SubmissionFilter, SubmissionPort, VersionSelector,
};
use infra_http::{ApiClient, AssessmentMethod, AuthHeaderScheme, HttpClientConfig};
use test_utils::{ApplicationBuilder, IdFixtures, ReviewBuilder};

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: String,
    api_key: Option<String>,
    authorization: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct Stub {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responses: Arc<Mutex<HashMap<String, (u16, String)>>>,
}

impl Stub {
    fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{method} {path}"), (status, body.into()));
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn last(&self) -> Recorded {
        self.requests().pop().expect("no request reached the stub")
    }
}

async fn handle(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(String::from);
    stub.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        api_key: header("x-api-key"),
        authorization: header("authorization"),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let key = format!("{method} {}", uri.path());
    let (status, body) = stub
        .responses
        .lock()
        .unwrap()
        .get(&key)
        .cloned()
        .unwrap_or((200, String::new()));
    (StatusCode::from_u16(status).unwrap(), body)
}

/// Serves the stub on an ephemeral port and returns its base URL
async fn serve(stub: Stub) -> String {
    let app = Router::new().fallback(handle).with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client_with(stub: &Stub, configure: impl FnOnce(HttpClientConfig) -> HttpClientConfig) -> ApiClient {
    let base_url = serve(stub.clone()).await;
    let config = configure(HttpClientConfig::new(base_url).timeout(Duration::from_secs(5)));
    ApiClient::new(config).unwrap()
}

fn token() -> AuthToken {
    AuthToken::new("upstream-secret")
}

#[tokio::test]
async fn test_list_submissions_sends_api_key_and_collection() {
    let stub = Stub::default();
    let submission = ApplicationBuilder::new().submitted().build();
    stub.respond(
        Method::GET,
        "/submissions/latest",
        200,
        serde_json::to_string(&vec![submission.clone()]).unwrap(),
    );
    let port = client_with(&stub, |c| c).await.submissions(token());

    let listed = port.list_submissions(&SubmissionFilter::default()).await.unwrap();

    assert_eq!(listed, vec![submission]);
    let request = stub.last();
    assert_eq!(request.api_key.as_deref(), Some("upstream-secret"));
    assert!(request.authorization.is_none());
    assert!(request.query.contains("collection_name=submissions"));
    assert!(request.query.contains("carrier=Llyod"));
}

#[tokio::test]
async fn test_list_submissions_reads_drafts_with_blank_financials() {
    let stub = Stub::default();
    let draft = Application::new_draft();
    let submitted = ApplicationBuilder::new().submitted().build();
    let body = serde_json::to_string(&vec![draft.clone(), submitted.clone()]).unwrap();
    assert!(body.contains(r#""end_ebit":null"#));
    stub.respond(Method::GET, "/submissions/latest", 200, body.clone());
    let port = client_with(&stub, |c| c).await.submissions(token());

    let listed = port.list_submissions(&SubmissionFilter::default()).await.unwrap();
    assert_eq!(listed, vec![draft.clone(), submitted.clone()]);

    stub.respond(Method::GET, "/submissions/latest", 200, format!(r#"{{"results": {body}}}"#));
    let listed = port.list_submissions(&SubmissionFilter::default()).await.unwrap();
    assert_eq!(listed, vec![draft, submitted]);
}

#[tokio::test]
async fn test_list_quotes_accepts_wrapped_listing_with_bearer_token() {
    let stub = Stub::default();
    let review = ReviewBuilder::for_id(&IdFixtures::submission_id())
        .with_assessment(Assessment::Approved)
        .build();
    stub.respond(
        Method::GET,
        "/submissions/latest",
        200,
        serde_json::json!({ "data": [review.clone()] }).to_string(),
    );
    let port = client_with(&stub, |c| c.auth_scheme(AuthHeaderScheme::Bearer))
        .await
        .submissions(token());

    let quotes = port.list_quotes(&SubmissionFilter::default()).await.unwrap();

    assert_eq!(quotes, vec![review]);
    let request = stub.last();
    assert_eq!(request.authorization.as_deref(), Some("Bearer upstream-secret"));
    assert!(request.api_key.is_none());
    assert!(request.query.contains("collection_name=quotes"));
}

#[tokio::test]
async fn test_fetch_exact_revision() {
    let stub = Stub::default();
    let submission = ApplicationBuilder::new().submitted().build();
    let id = IdFixtures::submission_id();
    stub.respond(
        Method::GET,
        &format!("/submissions/{id}/1.0"),
        200,
        serde_json::to_string(&submission).unwrap(),
    );
    let port = client_with(&stub, |c| c).await.submissions(token());

    let fetched = port
        .fetch_submission(&id, "Llyod", &VersionSelector::Exact(IdFixtures::first_version()))
        .await
        .unwrap();

    assert_eq!(fetched, submission);
    assert_eq!(stub.last().query, "carrier=Llyod");
}

#[tokio::test]
async fn test_fetch_missing_submission_is_not_found() {
    let stub = Stub::default();
    let id: SubmissionId = IdFixtures::other_submission_id();
    stub.respond(Method::GET, &format!("/submissions/{id}/latest"), 404, r#"{"detail":"no such submission"}"#);
    let port = client_with(&stub, |c| c).await.submissions(token());

    let err = port
        .fetch_submission(&id, "Llyod", &VersionSelector::Latest)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_save_posts_application_body() {
    let stub = Stub::default();
    let application = ApplicationBuilder::new().with_insured_name("Harbor Labs").build();
    let port = client_with(&stub, |c| c).await.submissions(token());

    port.save_submission(&application).await.unwrap();

    let request = stub.last();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/submissions");
    assert!(request.body.contains("Harbor Labs"));
}

#[tokio::test]
async fn test_server_error_maps_to_upstream() {
    let stub = Stub::default();
    stub.respond(Method::POST, "/submissions", 500, r#"{"message":"database offline"}"#);
    let port = client_with(&stub, |c| c).await.submissions(token());

    let err = port
        .save_submission(&ApplicationBuilder::new().build())
        .await
        .unwrap_err();

    match err {
        PortError::Upstream { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database offline");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_reads_synchronous_outcome() {
    let stub = Stub::default();
    let outcome = AssessmentOutcome {
        assessment: Assessment::Approved,
        explanation: "Within appetite".into(),
        issue_date: None,
    };
    stub.respond(
        Method::POST,
        "/submissions/assessment",
        200,
        serde_json::to_string(&outcome).unwrap(),
    );
    let port = client_with(&stub, |c| c).await.submissions(token());

    let result = port
        .submit_for_assessment(&ApplicationBuilder::new().submitted().build())
        .await
        .unwrap();

    assert_eq!(result, Some(outcome));
}

#[tokio::test]
async fn test_submit_without_outcome() {
    let stub = Stub::default();
    stub.respond(Method::POST, "/submissions/assessment", 201, r#"{"status":"queued"}"#);
    let port = client_with(&stub, |c| c).await.submissions(token());

    let result = port
        .submit_for_assessment(&ApplicationBuilder::new().submitted().build())
        .await
        .unwrap();

    assert_eq!(result, None);
}

#[tokio::test]
async fn test_update_assessment_uses_configured_verb() {
    let id = IdFixtures::submission_id();
    let review = ReviewBuilder::for_id(&id)
        .with_assessment(Assessment::Rejected)
        .with_explanation("Outside appetite")
        .build();

    for (method, expected) in [
        (AssessmentMethod::Put, Method::PUT),
        (AssessmentMethod::Post, Method::POST),
    ] {
        let stub = Stub::default();
        let port = client_with(&stub, |c| c.assessment_method(method))
            .await
            .submissions(token());

        let outcome = port.update_assessment(&id, &review).await.unwrap();

        // An empty answer confirms the review as sent
        assert_eq!(outcome, AssessmentOutcome::from(review.clone()));
        let request = stub.last();
        assert_eq!(request.method, expected);
        assert_eq!(request.path, format!("/submissions/{id}/assessment"));
        assert!(request.body.contains("Outside appetite"));
    }
}

#[tokio::test]
async fn test_login_returns_token_without_auth_header() {
    let stub = Stub::default();
    stub.respond(Method::POST, "/auth/login", 200, r#"{"token":"fresh-token"}"#);
    let client = client_with(&stub, |c| c).await;
    let service = AuthService::new(Arc::new(client.auth()), Arc::new(SessionStore::new()));

    let handle = service
        .login(Credentials::new("underwriter", "correct horse"))
        .await
        .unwrap();

    assert_eq!(handle.lock().await.upstream_token.expose(), "fresh-token");
    let request = stub.last();
    assert!(request.api_key.is_none());
    assert!(request.body.contains("\"username\":\"underwriter\""));
}

#[tokio::test]
async fn test_rejected_login_is_invalid_credentials() {
    let stub = Stub::default();
    stub.respond(Method::POST, "/auth/login", 401, r#"{"detail":"bad password"}"#);
    let client = client_with(&stub, |c| c).await;
    let sessions = Arc::new(SessionStore::new());
    let service = AuthService::new(Arc::new(client.auth()), sessions.clone());

    let err = service
        .login(Credentials::new("admin", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::InvalidCredentials));
    assert!(sessions.is_empty().await);
    assert_eq!(stub.requests().len(), 1);
}
