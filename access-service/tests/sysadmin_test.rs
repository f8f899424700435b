mod common;

use axum::http::StatusCode;
use common::{body_json, get_request, TestApp};
use tower::util::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn test_operator_domain_passes_admin_route() {
    let app = TestApp::spawn();
    app.identity.add_session("tok-op", "op1", "session-op");
    app.identity
        .add_profile("op1", &["staff@tryequipped.com"], "Ops", "Staff");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/admin/overview", Some("tok-op"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sys_admin"], true);
    assert_eq!(body["operator"]["email"], "staff@tryequipped.com");
}

#[tokio::test]
async fn test_domain_match_is_case_insensitive() {
    let app = TestApp::spawn();
    app.identity.add_session("tok-op", "op1", "session-op");
    app.identity
        .add_profile("op1", &["ADMIN@TRYEQUIPPED.COM"], "Ops", "Staff");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/admin/overview", Some("tok-op"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_lookalike_domain_is_rejected() {
    let app = TestApp::spawn();
    app.identity.add_session("tok-evil", "e1", "session-e");
    app.identity
        .add_profile("e1", &["staff@evil-tryequipped.com"], "Not", "Ops");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/admin/overview", Some("tok-evil"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "system administrator access required.");
}

#[tokio::test]
async fn test_non_operator_domain_is_403() {
    let app = TestApp::spawn();
    app.identity.add_session("tok-u", "u1", "session-u");
    app.identity
        .add_profile("u1", &["user@company.com"], "Reg", "User");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/admin/overview", Some("tok-u"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_no_session_on_admin_route_is_401() {
    let app = TestApp::spawn();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/admin/overview", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_identity_down_on_admin_route_is_503() {
    let app = TestApp::spawn();
    app.identity.add_session("tok-op", "op1", "session-op");
    app.identity.set_unavailable(true);

    let response = app
        .router
        .clone()
        .oneshot(get_request("/admin/overview", Some("tok-op"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_tenant_role_never_grants_operator_access() {
    // Even an account owner is not a platform operator.
    let app = TestApp::spawn();
    let account_id = Uuid::new_v4();
    app.grant_access("tok-1", "u1", account_id, "owner");
    app.identity
        .add_profile("u1", &["user@company.com"], "Reg", "User");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/admin/overview", Some("tok-1"), Some(account_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_operator_status_never_grants_tenant_access() {
    // A platform operator with no access record stays out of tenant routes.
    let app = TestApp::spawn();
    let account_id = Uuid::new_v4();
    app.identity.add_session("tok-op", "op1", "session-op");
    app.identity
        .add_profile("op1", &["staff@tryequipped.com"], "Ops", "Staff");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/access/context", Some("tok-op"), Some(account_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "no access to this account.");
}

#[tokio::test]
async fn test_non_blocking_check_flags_operator_in_context() {
    let app = TestApp::spawn();
    let account_id = Uuid::new_v4();
    app.grant_access("tok-op", "op1", account_id, "member");
    app.identity
        .add_profile("op1", &["staff@tryequipped.com"], "Ops", "Staff");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/access/context", Some("tok-op"), Some(account_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sys_admin"], true);
}

#[tokio::test]
async fn test_non_blocking_check_is_false_for_regular_user() {
    let app = TestApp::spawn();
    let account_id = Uuid::new_v4();
    app.grant_access("tok-1", "u1", account_id, "member");
    app.identity
        .add_profile("u1", &["user@company.com"], "Reg", "User");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/access/context", Some("tok-1"), Some(account_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sys_admin"], false);
}

#[tokio::test]
async fn test_non_blocking_check_swallows_profile_failures() {
    // No profile registered: the lookup fails, but the request still
    // succeeds with sys_admin=false instead of aborting.
    let app = TestApp::spawn();
    let account_id = Uuid::new_v4();
    app.grant_access("tok-1", "u1", account_id, "member");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/access/context", Some("tok-1"), Some(account_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sys_admin"], false);
}

#[tokio::test]
async fn test_empty_email_list_is_not_operator() {
    let app = TestApp::spawn();
    app.identity.add_session("tok-x", "x1", "session-x");
    app.identity.add_profile("x1", &[], "No", "Email");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/admin/overview", Some("tok-x"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
