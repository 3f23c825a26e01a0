use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::build_router;
use crate::api_services::build_session_layer;
use crate::test_support::{ADMIN_ID, MEMBER_ID, TEMPLATE_ID, app_state};

const ADMIN_NNI: &str = "B00001";
const MEMBER_NNI: &str = "A12345";

fn router() -> Router {
    build_router(
        app_state(),
        "http://localhost:3000",
        build_session_layer(false),
    )
    .unwrap_or_else(|_| unreachable!())
}

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap_or_else(|_| unreachable!())
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!());
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(|body| body.to_bytes())
        .unwrap_or_default();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body)
}

/// Logs in and returns the session cookie to send back.
async fn login(router: &Router, identifier: &str) -> String {
    let response = router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"identifier": identifier, "password": "secret"})),
        ))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| unreachable!())
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(&router(), request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "csrd-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let (status, body) = send(&router(), request(Method::GET, "/api/forms", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn forged_identity_cannot_reach_admin_routes() {
    let router = router();
    let uri = format!("/api/forms/{TEMPLATE_ID}");

    let forged_header = Request::builder()
        .method(Method::DELETE)
        .uri(&uri)
        .header("x-user-id", ADMIN_ID)
        .body(Body::empty())
        .unwrap_or_else(|_| unreachable!());
    let (with_header, _) = send(&router, forged_header).await;
    let (with_cookie, _) = send(
        &router,
        request(Method::DELETE, &uri, Some(&format!("id={ADMIN_ID}")), None),
    )
    .await;

    assert_eq!(with_header, StatusCode::UNAUTHORIZED);
    assert_eq!(with_cookie, StatusCode::UNAUTHORIZED);

    let admin = login(&router, ADMIN_NNI).await;
    let (still_there, _) = send(&router, request(Method::GET, &uri, Some(&admin), None)).await;
    assert_eq!(still_there, StatusCode::OK);
}

#[tokio::test]
async fn session_identifies_the_logged_in_user_until_logout() {
    let router = router();
    let cookie = login(&router, MEMBER_NNI).await;

    let (status, me) = send(
        &router,
        request(Method::GET, "/api/auth/me", Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], MEMBER_ID);
    assert!(me.get("password").is_none());

    let (logged_out, _) = send(
        &router,
        request(Method::POST, "/api/auth/logout", Some(&cookie), None),
    )
    .await;
    let (after_logout, _) = send(
        &router,
        request(Method::GET, "/api/auth/me", Some(&cookie), None),
    )
    .await;

    assert_eq!(logged_out, StatusCode::NO_CONTENT);
    assert_eq!(after_logout, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_reports_identifier_and_password_errors_separately() {
    let router = router();

    let (wrong_password, wrong_password_body) = send(
        &router,
        request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"identifier": MEMBER_NNI, "password": "nope"})),
        ),
    )
    .await;
    let (unknown, unknown_body) = send(
        &router,
        request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"identifier": "Z99999", "password": "secret"})),
        ),
    )
    .await;

    assert_eq!(wrong_password, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password_body["message"], "Mot de passe incorrect");
    assert_eq!(unknown, StatusCode::NOT_FOUND);
    assert_eq!(unknown_body["message"], "Identifiant incorrect");
}

#[tokio::test]
async fn declaration_goes_from_draft_to_validated() {
    let router = router();
    let member = login(&router, MEMBER_NNI).await;
    let admin = login(&router, ADMIN_NNI).await;

    let (created, declaration) = send(
        &router,
        request(
            Method::POST,
            "/api/declarations",
            Some(&member),
            Some(json!({"formTemplateId": TEMPLATE_ID, "formData": {"has_waste": "yes"}})),
        ),
    )
    .await;
    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(declaration["authorId"], MEMBER_ID);
    let id = declaration["id"].as_str().unwrap_or_default().to_owned();
    let submit_uri = format!("/api/declarations/{id}/submit");
    let validate_uri = format!("/api/declarations/{id}/validate");

    let (rejected, errors) = send(
        &router,
        request(Method::POST, &submit_uri, Some(&member), None),
    )
    .await;
    assert_eq!(rejected, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(errors["errors"]["volume"], "required");

    let (updated, _) = send(
        &router,
        request(
            Method::PUT,
            &format!("/api/declarations/{id}"),
            Some(&member),
            Some(json!({"formData": {"has_waste": "yes", "volume": "3"}})),
        ),
    )
    .await;
    assert_eq!(updated, StatusCode::OK);

    let (submitted, pending) = send(
        &router,
        request(Method::POST, &submit_uri, Some(&member), None),
    )
    .await;
    assert_eq!(submitted, StatusCode::OK);
    assert_eq!(pending["status"], "pending");
    assert_eq!(pending["formData"]["volume"], 3);

    let (forbidden, _) = send(
        &router,
        request(Method::POST, &validate_uri, Some(&member), None),
    )
    .await;
    assert_eq!(forbidden, StatusCode::FORBIDDEN);

    let (validated, body) = send(
        &router,
        request(Method::POST, &validate_uri, Some(&admin), None),
    )
    .await;
    assert_eq!(validated, StatusCode::OK);
    assert_eq!(body["status"], "validated");

    let (_, stats) = send(
        &router,
        request(Method::GET, "/api/declarations/stats", Some(&admin), None),
    )
    .await;
    assert_eq!(
        stats,
        json!({"declarationsAFaire": 0, "declarationsEffectuees": 1, "declarationsModifiees": 0})
    );
}

#[tokio::test]
async fn publishing_is_reserved_to_admins() {
    let router = router();
    let member = login(&router, MEMBER_NNI).await;
    let admin = login(&router, ADMIN_NNI).await;
    let uri = format!("/api/forms/{TEMPLATE_ID}/publish");

    let (as_member, _) = send(&router, request(Method::POST, &uri, Some(&member), None)).await;
    let (as_admin, template) =
        send(&router, request(Method::POST, &uri, Some(&admin), None)).await;

    assert_eq!(as_member, StatusCode::FORBIDDEN);
    assert_eq!(as_admin, StatusCode::OK);
    assert_eq!(template["isPublished"], true);
}

#[tokio::test]
async fn categories_include_default_and_template_codes() {
    let router = router();
    let member = login(&router, MEMBER_NNI).await;

    let (status, body) = send(
        &router,
        request(Method::GET, "/api/categories", Some(&member), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["E2-4", "E5-5"]));
}

#[tokio::test]
async fn preview_hides_unselected_branches() {
    let router = router();
    let member = login(&router, MEMBER_NNI).await;

    let (status, body) = send(
        &router,
        request(
            Method::POST,
            &format!("/api/forms/{TEMPLATE_ID}/preview"),
            Some(&member),
            Some(json!({"answers": {"has_waste": "no"}})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["isValid"], true);
}

#[tokio::test]
async fn org_units_below_directions_need_a_parent() {
    let router = router();
    let member = login(&router, MEMBER_NNI).await;

    let (missing_parent, _) = send(
        &router,
        request(Method::GET, "/api/org-units/gmrs", Some(&member), None),
    )
    .await;
    let (unknown_level, _) = send(
        &router,
        request(Method::GET, "/api/org-units/regions", Some(&member), None),
    )
    .await;
    let (directions, body) = send(
        &router,
        request(Method::GET, "/api/org-units/directions", Some(&member), None),
    )
    .await;

    assert_eq!(missing_parent, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_level, StatusCode::BAD_REQUEST);
    assert_eq!(directions, StatusCode::OK);
    assert_eq!(body, json!([]));
}
