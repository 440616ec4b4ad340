//! REST surface: routing, DTO shapes and Problem Details

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::{print_test_header, Harness};
use serde_json::{json, Value};
use theme_engine::api::rest::register_routes;
use tower::ServiceExt;
use uuid::Uuid;

fn app(h: &Harness) -> Router {
    register_routes(Router::new(), h.service.clone())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_theme_setup_and_resolution_over_http() {
    print_test_header(
        "test_theme_setup_and_resolution_over_http",
        "Register, activate, resolve and compile through the HTTP routes",
    );
    let h = Harness::new();
    let app = app(&h);
    let store_id = Uuid::new_v4();

    let (status, theme) = send(
        &app,
        Method::POST,
        "/themes",
        Some(json!({"code": "dawn", "name": "Dawn", "version": "1.0.0"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(theme["package_code"], "dawn");
    assert_eq!(theme["settings"][0], "colors.primary");

    let (status, customization) = send(
        &app,
        Method::PUT,
        &format!("/stores/{}/theme", store_id),
        Some(json!({"theme_code": "dawn"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(customization["settings"]["colors"]["primary"], "#000000");

    let (status, resolution) = send(
        &app,
        Method::GET,
        &format!("/stores/{}/templates/homepage/resolve", store_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolution["source"], "theme-default");
    assert_eq!(resolution["persisted"], false);

    let (status, compiled) = send(
        &app,
        Method::GET,
        &format!("/stores/{}/themes/dawn/templates/homepage/compiled", store_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(compiled["sections"][1]["type"], "slideshow");
    assert_eq!(compiled["sections"][1]["blocks"][0]["children"][0]["type"], "button");
    assert_eq!(compiled["global_sections"]["header"]["source"], "theme-default");

    let (_, compiled) = send(
        &app,
        Method::GET,
        &format!(
            "/stores/{}/themes/dawn/templates/homepage/compiled?include_global=false",
            store_id
        ),
        None,
    )
    .await;
    assert!(compiled.get("global_sections").map_or(true, Value::is_null));

    let (status, problem) = send(
        &app,
        Method::GET,
        &format!("/stores/{}/themes/dawn/templates/blog/compiled", store_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["status"], 404);
}

#[tokio::test]
async fn test_section_editing_over_http() {
    let h = Harness::new();
    let store_id = h.store_on_theme("dawn").await;
    let app = app(&h);

    let (status, template) = send(
        &app,
        Method::POST,
        &format!("/stores/{}/themes/dawn/templates/homepage/materialize", store_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let template_id = template["id"].as_str().unwrap().to_string();

    let (status, section) = send(
        &app,
        Method::POST,
        &format!("/templates/{}/sections", template_id),
        Some(json!({
            "section": {"type": "multicolumn", "blocks": [{"type": "column", "children": [{"type": "image"}]}]},
            "position": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(section["position"], 0);
    let section_id = section["id"].as_str().unwrap().to_string();

    let (status, blocks) = send(
        &app,
        Method::GET,
        &format!("/sections/{}/blocks", section_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(blocks[0]["type"], "column");
    assert_eq!(blocks[0]["children"][0]["type"], "image");

    let (status, saved) = send(
        &app,
        Method::PUT,
        &format!("/sections/{}/blocks", section_id),
        Some(json!([{"type": "text", "settings": {"body": "Hi"}}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved.as_array().unwrap().len(), 1);
    assert!(saved[0]["id"].is_string());

    let (status, problem) = send(
        &app,
        Method::POST,
        &format!("/templates/{}/sections", template_id),
        Some(json!({"section": {"type": "hero", "settings": {"heading": 7}}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["title"], "Validation Error");

    let (status, report) = send(
        &app,
        Method::POST,
        &format!("/templates/{}/sections/import", template_id),
        Some(json!({"sections": [{"type": "video"}, {"type": "Bad"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["imported"].as_array().unwrap().len(), 1);
    assert_eq!(report["failed"][0]["index"], 1);

    let (status, problem) = send(&app, Method::DELETE, &format!("/templates/{}", template_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["type"], "https://httpstatuses.io/409");
}

#[tokio::test]
async fn test_backups_and_files_over_http() {
    let h = Harness::new();
    let store_id = h.store_on_theme("dawn").await;
    let app = app(&h);

    let (status, backup) = send(
        &app,
        Method::POST,
        &format!("/stores/{}/themes/dawn/backups", store_id),
        Some(json!({"name": "nightly"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let backup_id = backup["id"].as_str().unwrap().to_string();

    let (status, verified) = send(&app, Method::GET, &format!("/backups/{}", backup_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["intact"], true);

    h.store.tamper_backup(
        backup_id.parse().unwrap(),
        json!({"colors": {"primary": "#ff0000"}}),
    );
    let (_, verified) = send(&app, Method::GET, &format!("/backups/{}", backup_id), None).await;
    assert_eq!(verified["intact"], false);
    assert!(verified["warning"]["message"].is_string());
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/backups/{}/restore", backup_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let files = format!("/stores/{}/themes/dawn/files", store_id);
    let (status, first) = send(
        &app,
        Method::PUT,
        &files,
        Some(json!({"path": "assets/base.css", "content": "a"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["change_type"], "create");
    send(
        &app,
        Method::PUT,
        &files,
        Some(json!({"path": "assets/base.css", "content": "b"})),
    )
    .await;

    let (status, restored) = send(
        &app,
        Method::POST,
        &format!("{}/restore", files),
        Some(json!({"path": "assets/base.css", "history_id": first["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored["change_type"], "restore");

    let (_, content) = send(&app, Method::GET, &format!("{}?path=assets/base.css", files), None).await;
    assert_eq!(content["content"], "a");

    let (_, history) = send(
        &app,
        Method::GET,
        &format!("{}/history?path=assets/base.css", files),
        None,
    )
    .await;
    assert_eq!(history["total"], 4);
    assert_eq!(history["items"][1]["change_type"], "pre_restore");

    let (status, diff) = send(
        &app,
        Method::GET,
        &format!("{}/diff?path=assets/base.css&from=1&to=2", files),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(diff[0]["status"], "removed");
    assert_eq!(diff[1]["status"], "added");

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("{}?path=../../etc/passwd", files),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preset_over_http() {
    let h = Harness::new();
    let store_id = h.store_on_theme("dawn").await;
    let app = app(&h);

    let (status, outcome) = send(
        &app,
        Method::POST,
        &format!("/stores/{}/presets/fashion/apply", store_id),
        Some(json!({"preserve_existing": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["created_templates"], json!(["collection", "homepage"]));

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/stores/{}/presets/unknown/apply", store_id),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
