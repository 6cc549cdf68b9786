// Integration tests for the HTTP surface, backed by the in-memory store

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use advisory_crm::auth::AuthVerifier;
use advisory_crm::config::AuthSettings;
use advisory_crm::core::Matcher;
use advisory_crm::error::{handle_json_payload_error, handle_query_payload_error};
use advisory_crm::routes::{configure_routes, AppState};
use advisory_crm::services::{MatchCache, MemoryStore, PipelineBoard};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

const SECRET: &str = "integration-secret";

fn create_state() -> AppState {
    create_state_with_secret(SECRET)
}

fn create_state_with_secret(secret: &str) -> AppState {
    let auth = AuthSettings {
        jwt_secret: secret.to_string(),
        audience: Some("authenticated".to_string()),
        admin_emails: vec!["partner@advisory.example".to_string()],
    };

    let mut documents = HashMap::new();
    documents.insert(
        "fund-overview".to_string(),
        "https://files.example.com/fund-overview.pdf".to_string(),
    );

    AppState {
        store: Arc::new(MemoryStore::new()),
        board: Arc::new(PipelineBoard::new()),
        matcher: Matcher::with_default_weights(),
        cache: Arc::new(MatchCache::new(16, 300)),
        notifier: None,
        auth: Arc::new(AuthVerifier::new(&auth)),
        documents: Arc::new(documents),
    }
}

fn token(sub: &str, email: &str) -> String {
    let claims = json!({
        "sub": sub,
        "email": email,
        "aud": "authenticated",
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

fn admin_token() -> String {
    token("admin-1", "partner@advisory.example")
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
                .configure(configure_routes),
        )
        .await
    };
}

fn gp_form() -> Value {
    json!({
        "name": "Helen Park",
        "email": "Helen@Northgate.example",
        "firm": "Northgate Capital",
        "aumBracket": "1B+",
        "strategies": ["AI", "Fintech"],
        "fundInMarket": "Fund III"
    })
}

fn lp_form() -> Value {
    json!({
        "name": "Omar Reyes",
        "email": "omar@pension.example",
        "organization": "Civic Pension Trust",
        "investorType": "Institutional",
        "interests": ["AI", "Healthcare"],
        "jurisdiction": "UK"
    })
}

#[actix_web::test]
async fn test_health_check() {
    let app = init_app!(create_state());

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_registration_to_ranked_match() {
    let app = init_app!(create_state());

    let req = test::TestRequest::post()
        .uri("/api/v1/registrations/gp")
        .set_json(gp_form())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let gp: Value = test::read_body_json(resp).await;
    assert_eq!(gp["email"], "helen@northgate.example");
    assert_eq!(gp["approval"], "pending");

    let req = test::TestRequest::post()
        .uri("/api/v1/registrations/lp")
        .set_json(lp_form())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let lp: Value = test::read_body_json(resp).await;
    assert_eq!(lp["stage"], "To Contact");

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/matches")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalPairs"], 1);
    assert_eq!(body["totalResults"], 1);
    assert_eq!(body["matches"][0]["score"], 80);
    assert_eq!(body["matches"][0]["quality"], "Excellent");
    assert_eq!(body["matches"][0]["gpId"], gp["id"]);
    assert_eq!(body["matches"][0]["lpId"], lp["id"]);
}

#[actix_web::test]
async fn test_match_filters_apply_to_cached_list() {
    let app = init_app!(create_state());

    for form in [gp_form(), lp_form()] {
        let uri = if form.get("firm").is_some() {
            "/api/v1/registrations/gp"
        } else {
            "/api/v1/registrations/lp"
        };
        let req = test::TestRequest::post().uri(uri).set_json(form).to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/matches?minScore=90")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalResults"], 0);
    assert_eq!(body["totalPairs"], 1);
}

#[actix_web::test]
async fn test_admin_routes_require_session() {
    let app = init_app!(create_state());

    let req = test::TestRequest::get().uri("/api/v1/admin/gps").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/gps")
        .insert_header(bearer("not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_unset_secret_refuses_forged_admin_token() {
    let app = init_app!(create_state_with_secret(""));

    let claims = json!({
        "sub": "intruder",
        "aud": "authenticated",
        "exp": chrono::Utc::now().timestamp() + 3600,
        "app_metadata": {"role": "admin"},
    });
    let forged = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"")).unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/gps")
        .insert_header(bearer(&forged))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_non_admin_is_redirected() {
    let app = init_app!(create_state());

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/pipeline")
        .insert_header(bearer(&token("lp-user", "omar@pension.example")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["redirectTo"], "/");
}

#[actix_web::test]
async fn test_invalid_registration_lists_fields() {
    let app = init_app!(create_state());

    let mut form = gp_form();
    form["email"] = json!("not-an-email");
    form["strategies"] = json!([]);

    let req = test::TestRequest::post()
        .uri("/api/v1/registrations/gp")
        .set_json(form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_failed");
    assert!(body["fields"]["email"].is_array());
    assert!(body["fields"]["strategies"].is_array());
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = init_app!(create_state());

    let req = test::TestRequest::post()
        .uri("/api/v1/contact")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_document_access() {
    let app = init_app!(create_state());

    let req = test::TestRequest::post()
        .uri("/api/v1/documents/access")
        .set_json(json!({"name": "Ada", "email": "ada@example.com", "document": "missing-deck"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/documents/access")
        .set_json(json!({"name": "Ada", "email": "ada@example.com", "document": "fund-overview"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["url"], "https://files.example.com/fund-overview.pdf");

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/document-requests")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let requests: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(requests.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_csv_export() {
    let app = init_app!(create_state());

    let req = test::TestRequest::post()
        .uri("/api/v1/registrations/lp")
        .set_json(lp_form())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/export/lp")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("lp-registrations-"));
    assert!(disposition.contains(".csv"));

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Name,Email,Organization,Investor Type,Interests,Jurisdiction,Stage,Approval,Created At")
    );
    assert!(lines.next().unwrap().starts_with("Omar Reyes,omar@pension.example,Civic Pension Trust"));

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/export/contacts")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_pipeline_move_and_rejected_conflict() {
    let app = init_app!(create_state());

    let req = test::TestRequest::post()
        .uri("/api/v1/registrations/lp")
        .set_json(lp_form())
        .to_request();
    let lp: Value = test::call_and_read_body_json(&app, req).await;
    let id = lp["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/pipeline/{}/move", id))
        .insert_header(bearer(&admin_token()))
        .set_json(json!({"stage": "Meeting Scheduled"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["changed"], true);
    assert_eq!(body["investor"]["stage"], "Meeting Scheduled");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/admin/lps/{}/approval", id))
        .insert_header(bearer(&admin_token()))
        .set_json(json!({"approval": "rejected"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/pipeline/{}/move", id))
        .insert_header(bearer(&admin_token()))
        .set_json(json!({"stage": "Closed"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/pipeline")
        .insert_header(bearer(&admin_token()))
        .to_request();
    let board: Value = test::call_and_read_body_json(&app, req).await;
    let columns = board["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 7);

    let meeting = columns
        .iter()
        .find(|c| c["stage"] == "Meeting Scheduled")
        .unwrap();
    assert_eq!(meeting["investors"][0]["id"], json!(id));
}

#[actix_web::test]
async fn test_messages_mark_current_user() {
    let app = init_app!(create_state());

    let req = test::TestRequest::post()
        .uri("/api/v1/registrations/lp")
        .set_json(lp_form())
        .to_request();
    let lp: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/v1/investors/{}/messages", lp["id"].as_str().unwrap());

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&admin_token()))
        .set_json(json!({"body": "Thanks for registering, are you free next week?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&token("lp-user", "omar@pension.example")))
        .set_json(json!({"body": "Tuesday works."}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&admin_token()))
        .to_request();
    let thread: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(thread[0]["fromCurrentUser"], true);
    assert_eq!(thread[0]["authorId"], "admin-1");
    assert_eq!(thread[1]["fromCurrentUser"], false);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&admin_token()))
        .set_json(json!({"body": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_taxonomy_is_public() {
    let app = init_app!(create_state());

    let req = test::TestRequest::get().uri("/api/v1/taxonomy").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["version"], 1);
    assert!(body["tags"].as_array().map(|t| !t.is_empty()).unwrap_or(false));
}
