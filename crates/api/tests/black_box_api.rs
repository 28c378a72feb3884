use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use campusgate_api::app::{build_app, AppConfig};
use campusgate_identity::RegistrationPolicy;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = build_app(AppConfig {
            jwt_secret: jwt_secret.to_string(),
            policy: RegistrationPolicy::default(),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register_student(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    roll: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/api/auth/register-student", base_url))
        .json(&json!({
            "name": "Alice",
            "email": email,
            "password": "secret123",
            "rollNumber": roll,
            "idCardImageRef": "uploads/alice.png",
        }))
        .send()
        .await
        .unwrap()
}

async fn register_admin(client: &reqwest::Client, base_url: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/auth/register-admin", base_url))
        .json(&json!({
            "name": "Ward",
            "email": "ward@vnit.ac.in",
            "password": "secret123",
            "adminId": "GTVNIT001",
        }))
        .send()
        .await
        .unwrap()
}

async fn login(client: &reqwest::Client, base_url: &str, email: &str) -> String {
    let res = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": email, "password": "secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

async fn create_pass(client: &reqwest::Client, base_url: &str, token: &str) -> serde_json::Value {
    let res = client
        .post(format!("{}/api/gatepass/create", base_url))
        .bearer_auth(token)
        .json(&json!({
            "name": "Alice",
            "hostelBlock": "H5",
            "journeyDate": "2025-03-14",
            "leavingTime": "14:30",
            "destination": "Nagpur station",
            "reason": "Semester break",
            "luggageDetails": "One suitcase",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: serde_json::Value = res.json().await.unwrap();
    body["gatePass"].clone()
}

/// Mint a raw HS256 token with arbitrary claims, bypassing the API.
fn mint_token(secret: &str, sub: &str, role: &str, iat: i64, exp: i64) -> String {
    let claims = json!({ "sub": sub, "role": role, "iat": iat, "exp": exp });
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/gatepass/my-requests", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Access denied. No token provided.");
}

#[tokio::test]
async fn expired_and_forged_tokens_are_rejected() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let now = chrono::Utc::now().timestamp();
    let sub = uuid::Uuid::now_v7().to_string();

    let expired = mint_token(jwt_secret, &sub, "student", now - 7200, now - 3600);
    let res = client
        .get(format!("{}/api/gatepass/my-requests", srv.base_url))
        .bearer_auth(&expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Token expired");

    let forged = mint_token("other-secret", &sub, "student", now, now + 3600);
    let res = client
        .get(format!("{}/api/gatepass/my-requests", srv.base_url))
        .bearer_auth(&forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn role_guards_separate_student_and_admin_routes() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    assert_eq!(
        register_student(&client, &srv.base_url, "alice@vnit.ac.in", "BT20MEC001")
            .await
            .status(),
        StatusCode::CREATED
    );
    assert_eq!(
        register_admin(&client, &srv.base_url).await.status(),
        StatusCode::CREATED
    );

    let student_token = login(&client, &srv.base_url, "alice@vnit.ac.in").await;
    let admin_token = login(&client, &srv.base_url, "ward@vnit.ac.in").await;

    // Student on an admin listing.
    let res = client
        .get(format!("{}/api/gatepass/pending", srv.base_url))
        .bearer_auth(&student_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Access denied. admin role required.");

    // Admin on a student-only route.
    let res = client
        .get(format!("{}/api/gatepass/my-requests", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn registration_validation_and_duplicates() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    // Foreign email domain.
    let res = register_student(&client, &srv.base_url, "alice@gmail.com", "BT20MEC001").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Please use your institute email (@vnit.ac.in)");

    // Malformed roll number.
    let res = register_student(&client, &srv.base_url, "alice@vnit.ac.in", "BT20ME001").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Invalid roll number format. Use format like BT20MEC001"
    );

    // First registration succeeds, duplicate email is rejected.
    let res = register_student(&client, &srv.base_url, "alice@vnit.ac.in", "BT20MEC001").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = register_student(&client, &srv.base_url, "alice@vnit.ac.in", "BT20MEC002").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User already exists");

    // Unknown admin ID.
    let res = client
        .post(format!("{}/api/auth/register-admin", srv.base_url))
        .json(&json!({
            "name": "Ward",
            "email": "ward2@vnit.ac.in",
            "password": "secret123",
            "adminId": "GTVNIT999",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Wrong password never reveals which part failed.
    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "email": "alice@vnit.ac.in", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn gate_pass_lifecycle_end_to_end() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    register_student(&client, &srv.base_url, "alice@vnit.ac.in", "BT20MEC001").await;
    register_admin(&client, &srv.base_url).await;
    let student_token = login(&client, &srv.base_url, "alice@vnit.ac.in").await;
    let admin_token = login(&client, &srv.base_url, "ward@vnit.ac.in").await;

    // Create: pending, owner populated.
    let pass = create_pass(&client, &srv.base_url, &student_token).await;
    let id = pass["id"].as_str().unwrap().to_string();
    assert_eq!(pass["status"], "pending");
    assert_eq!(pass["studentId"]["rollNumber"], "BT20MEC001");
    assert_eq!(pass["guardVerified"], false);

    // Transport before approval is blocked.
    let res = client
        .put(format!(
            "{}/api/gatepass/student/update-transport/{}",
            srv.base_url, id
        ))
        .bearer_auth(&student_token)
        .json(&json!({ "cabNumber": "CAB12" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Transport details can be filled only after approval"
    );

    // Approve.
    let res = client
        .post(format!("{}/api/gatepass/approve/{}", srv.base_url, id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["gatePass"]["status"], "approved");
    assert_eq!(body["gatePass"]["approvedBy"]["name"], "Ward");

    // A second decision conflicts.
    let res = client
        .post(format!("{}/api/gatepass/reject/{}", srv.base_url, id))
        .bearer_auth(&admin_token)
        .json(&json!({ "rejectionReason": "too late" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Gate pass already processed");

    // Owner records transport.
    let res = client
        .put(format!(
            "{}/api/gatepass/student/update-transport/{}",
            srv.base_url, id
        ))
        .bearer_auth(&student_token)
        .json(&json!({
            "cabNumber": "CAB12",
            "transportMode": "Train",
            "ticketNumber": "PNR-1234",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["gatePass"]["cabNumber"], "CAB12");

    // Guard verification flips the flag exactly once.
    let res = client
        .put(format!("{}/api/gatepass/verify/final/{}", srv.base_url, id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["gatePass"]["guardVerified"], true);

    let res = client
        .put(format!("{}/api/gatepass/verify/final/{}", srv.base_url, id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Gate pass already verified");

    // Student sees the final state on their own pass.
    let res = client
        .get(format!("{}/api/gatepass/{}", srv.base_url, id))
        .bearer_auth(&student_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "approved");
    assert_eq!(body["ticketNumber"], "PNR-1234");

    // Public noticeboard exposes the pass without authentication.
    let res = client
        .get(format!("{}/api/gatepass/public/all", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let board: serde_json::Value = res.json().await.unwrap();
    assert!(board.as_array().unwrap().iter().any(|p| p["id"] == id.as_str()));
}

#[tokio::test]
async fn students_cannot_read_each_others_passes() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    register_student(&client, &srv.base_url, "alice@vnit.ac.in", "BT20MEC001").await;
    let res = client
        .post(format!("{}/api/auth/register-student", srv.base_url))
        .json(&json!({
            "name": "Bob",
            "email": "bob@vnit.ac.in",
            "password": "secret123",
            "rollNumber": "BT20MEC002",
            "idCardImageRef": "uploads/bob.png",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let alice_token = login(&client, &srv.base_url, "alice@vnit.ac.in").await;
    let bob_token = login(&client, &srv.base_url, "bob@vnit.ac.in").await;

    let pass = create_pass(&client, &srv.base_url, &alice_token).await;
    let id = pass["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/api/gatepass/{}", srv.base_url, id))
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Access denied");

    // Bob's own listing stays empty.
    let res = client
        .get(format!("{}/api/gatepass/my-requests", srv.base_url))
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}
