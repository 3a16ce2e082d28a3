//! Router tests against in-memory upstream ports

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use core_kernel::{HealthCheckResult, HealthCheckable};
use domain_session::{AuthPort, AuthToken};
use domain_submission::{Assessment, SubmissionPort};
use interface_api::auth::validate_token;
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState, UpstreamPorts};
use test_utils::{
    ApplicationBuilder, FinanceFixtures, IdFixtures, MockAuthPort, MockSubmissionPort, PartyFixtures,
    ReviewBuilder,
};

const USERNAME: &str = "underwriter";
const PASSWORD: &str = "correct horse";

struct MockUpstream {
    auth: MockAuthPort,
    submissions: MockSubmissionPort,
}

#[async_trait]
impl HealthCheckable for MockUpstream {
    async fn health_check(&self) -> HealthCheckResult {
        self.submissions.health_check().await
    }
}

impl UpstreamPorts for MockUpstream {
    fn auth(&self) -> Arc<dyn AuthPort> {
        Arc::new(self.auth.clone())
    }

    fn submissions(&self, _token: &AuthToken) -> Arc<dyn SubmissionPort> {
        Arc::new(self.submissions.clone())
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    submissions: MockSubmissionPort,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_submissions(MockSubmissionPort::new()).await
    }

    async fn with_submissions(submissions: MockSubmissionPort) -> Self {
        let upstream = MockUpstream {
            auth: MockAuthPort::with_user(USERNAME, PASSWORD).await,
            submissions: submissions.clone(),
        };
        let config = ApiConfig {
            jwt_secret: "test-secret".into(),
            ..Default::default()
        };
        let state = AppState::new(config, Arc::new(upstream));
        Self {
            router: create_router(state.clone()),
            state,
            submissions,
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn login(&self) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "username": USERNAME, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Signs in and opens a blank wizard
    async fn login_with_wizard(&self) -> String {
        let token = self.login().await;
        let (status, _) = self.send(Method::POST, "/api/v1/wizard", Some(&token), None).await;
        assert_eq!(status, StatusCode::CREATED);
        token
    }

    /// Fills every step and submits, leaving the wizard on the decision step
    async fn submit_full_application(&self, token: &str) -> Value {
        let t = Some(token);
        self.send(Method::PUT, "/api/v1/wizard/broker", t, Some(json!(PartyFixtures::broker()))).await;
        self.send(Method::POST, "/api/v1/wizard/next", t, None).await;
        self.send(Method::PUT, "/api/v1/wizard/insured", t, Some(json!(PartyFixtures::insured()))).await;
        self.send(Method::POST, "/api/v1/wizard/next", t, None).await;
        self.send(
            Method::PUT,
            "/api/v1/wizard/financials",
            t,
            Some(json!({
                "financials": FinanceFixtures::finance(),
                "coverage": FinanceFixtures::coverage(),
            })),
        )
        .await;
        let (status, body) = self
            .send(Method::POST, "/api/v1/wizard/next", t, Some(json!({ "action": "submit" })))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.send(Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
    assert!(app.state.sessions().is_empty().await);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(Method::POST, "/api/v1/auth/login", None, Some(json!({ "password": "x" })))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "username");
    assert_eq!(body["details"][0]["message"], "Username is required");
}

#[tokio::test]
async fn test_forgot_password_is_silent() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/auth/forgot-password",
            None,
            Some(json!({ "email": "nobody@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/forgot-password",
            None,
            Some(json!({ "email": "not-an-email" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/v1/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = app.send(Method::GET, "/api/v1/activity", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = TestApp::new().await;
    let token = app.login().await;

    let (status, body) = app.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], USERNAME);

    let (status, _) = app.send(Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_preferences_persist_per_session() {
    let app = TestApp::new().await;
    let token = app.login().await;
    let t = Some(token.as_str());

    let (_, body) = app.send(Method::POST, "/api/v1/preferences/theme/toggle", t, None).await;
    assert_eq!(body["theme"], "g10");

    let (_, body) = app
        .send(Method::POST, "/api/v1/preferences/sidebar/toggle", t, Some(json!({ "open": false })))
        .await;
    assert_eq!(body["sidebar_open"], false);

    let (_, body) = app.send(Method::POST, "/api/v1/preferences/sidebar/toggle", t, None).await;
    assert_eq!(body["sidebar_open"], true);

    let (_, body) = app.send(Method::GET, "/api/v1/preferences", t, None).await;
    assert_eq!(body["theme"], "g10");

    // A second sign-in starts from the defaults
    let other = app.login().await;
    let (_, body) = app.send(Method::GET, "/api/v1/preferences", Some(&other), None).await;
    assert_eq!(body["theme"], "white");
}

#[tokio::test]
async fn test_wizard_flow_through_decision() {
    let app = TestApp::new().await;
    let token = app.login_with_wizard().await;
    let t = Some(token.as_str());

    let body = app.submit_full_application(&token).await;
    assert_eq!(body["step"]["key"], "decision");
    assert_eq!(body["application"]["assessment"], "CREATED");
    assert_eq!(body["application"]["submission_reference"]["version"], "1.0");
    assert!(body["application"]["submission_reference"]["id"]
        .as_str()
        .unwrap()
        .starts_with("LYD"));
    assert_eq!(body["locked"], false);

    let (status, body) = app.send(Method::POST, "/api/v1/wizard/decision/accept", t, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["application"]["assessment"], "ACCEPTED");
    assert_eq!(body["locked"], true);

    let (status, body) = app
        .send(Method::PUT, "/api/v1/wizard/broker", t, Some(json!(PartyFixtures::broker())))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_step_validation_reports_fields() {
    let app = TestApp::new().await;
    let token = app.login_with_wizard().await;

    let mut broker = PartyFixtures::broker();
    broker.zipcode = "12".into();
    let (status, body) = app
        .send(Method::PUT, "/api/v1/wizard/broker", Some(&token), Some(json!(broker)))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["broker.zipcode"]);

    let (_, body) = app.send(Method::GET, "/api/v1/wizard", Some(&token), None).await;
    assert_eq!(body["application"]["broker"]["zipcode"], "");
}

#[tokio::test]
async fn test_submit_only_from_financial_step() {
    let app = TestApp::new().await;
    let token = app.login_with_wizard().await;

    let (status, _) = app
        .send(Method::POST, "/api/v1/wizard/next", Some(&token), Some(json!({ "action": "submit" })))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(app.submissions.calls().await.is_empty());
}

#[tokio::test]
async fn test_reject_needs_a_reason() {
    let app = TestApp::new().await;
    let token = app.login_with_wizard().await;
    app.submit_full_application(&token).await;

    let (status, body) = app
        .send(Method::POST, "/api/v1/wizard/decision/reject", Some(&token), Some(json!({ "reason": "  " })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "reason");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/wizard/decision/reject",
            Some(&token),
            Some(json!({ "reason": "Outside appetite" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application"]["assessment"], "REJECTED");
    assert_eq!(body["application"]["explanation"], "Outside appetite");
}

#[tokio::test]
async fn test_upstream_failure_keeps_wizard_in_place() {
    let app = TestApp::new().await;
    let token = app.login_with_wizard().await;
    app.send(Method::POST, "/api/v1/wizard/save", Some(&token), None).await;
    app.submissions.fail_with("backend offline").await;

    let (status, body) = app.send(Method::POST, "/api/v1/wizard/save", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "upstream_error");

    let (_, body) = app.send(Method::GET, "/api/v1/wizard", Some(&token), None).await;
    assert_eq!(body["step"]["key"], "broker");
}

#[tokio::test]
async fn test_busy_session_is_rejected() {
    let app = TestApp::new().await;
    let token = app.login_with_wizard().await;

    let session_id = validate_token(&token, "test-secret").unwrap().session_id().unwrap();
    let session = app.state.sessions().get(&session_id).await.unwrap();
    let _in_flight = session.lock().await;

    let (status, body) = app.send(Method::POST, "/api/v1/wizard/back", Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Another action on this session is still in progress");
}

#[tokio::test]
async fn test_open_submitted_application_and_resume() {
    let submitted = ApplicationBuilder::new().submitted().build();
    let app = TestApp::with_submissions(MockSubmissionPort::with_data(vec![submitted], vec![]).await).await;
    let token = app.login().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/wizard",
            Some(&token),
            Some(json!({ "submission_id": IdFixtures::submission_id().as_str() })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["step"]["key"], "decision");
    let resume_token = body["resume_token"].clone();

    let (status, body) = app
        .send(Method::POST, "/api/v1/wizard", Some(&token), Some(json!({ "resume_token": resume_token })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["resume_token"], resume_token);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/wizard",
            Some(&token),
            Some(json!({ "submission_id": IdFixtures::other_submission_id().as_str() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_activity_listing() {
    let other = IdFixtures::other_submission_id();
    let submissions = vec![
        ApplicationBuilder::new().submitted().build(),
        ApplicationBuilder::new()
            .with_reference(other.as_str(), "1.0")
            .with_insured_name("Beacon Labs")
            .build(),
    ];
    let quotes = vec![ReviewBuilder::for_id(&other)
        .with_assessment(Assessment::Accepted)
        .build()];
    let app = TestApp::with_submissions(MockSubmissionPort::with_data(submissions, quotes).await).await;
    let token = app.login().await;

    let (status, body) = app
        .send(Method::GET, "/api/v1/activity?search=BEACON", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["unfiltered_items"], 2);
    assert_eq!(body["rows"][0]["insured_name"], "Beacon Labs");
    assert_eq!(body["rows"][0]["assessment"], "ACCEPTED");
    assert_eq!(body["rows"][0]["editable"], false);
    assert_eq!(body["page_size_options"], json!([10, 20, 50]));

    let (_, body) = app
        .send(Method::GET, "/api/v1/activity?sort=insured_name&direction=desc", Some(&token), None)
        .await;
    assert_eq!(body["rows"][0]["insured_name"], "Beacon Labs");
    assert_eq!(body["rows"][1]["editable"], true);

    let (status, _) = app
        .send(Method::GET, "/api/v1/activity?page=0", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activity_upstream_failure() {
    let app = TestApp::new().await;
    let token = app.login().await;
    app.submissions.fail_with("backend offline").await;

    let (status, body) = app.send(Method::GET, "/api/v1/activity", Some(&token), None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "upstream_error");
}
