//! Moderation, editing, deletion, and stats under `/api/admin`.

mod common;

use std::path::Path;

use axum::http::{Method, StatusCode};
use common::{
    assert_envelope, body_json, build_test_app, create_admin, delete, get, json_request,
    patch_json, seed_project, token_for, VALID_ABSTRACT,
};
use fyparchive_core::lookup::ProjectLookup;
use fyparchive_core::project::ProjectStatus;
use fyparchive_db::models::comment::CreateComment;
use fyparchive_db::repositories::{CommentRepo, ProjectRepo};
use serde_json::json;
use sqlx::PgPool;

fn patch(uri: &str, token: &str) -> axum::http::Request<axum::body::Body> {
    json_request(Method::PATCH, uri, json!({}), Some(token))
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approve_publishes_a_pending_project(pool: PgPool) {
    let admin = create_admin(&pool, "moderator@fyp.edu").await;
    let token = token_for(&admin);
    let app = build_test_app(pool.clone());
    let project = seed_project(
        &pool,
        &app.upload_dir(),
        "Geodetic Control for Road Alignment",
        "Surveying",
        2024,
        ProjectStatus::Pending,
    )
    .await;

    let response = app.send(get("/api/admin/pending", Some(&token))).await;
    let json = body_json(response).await;
    assert_eq!(json["message"], "Pending projects retrieved");
    assert_eq!(json["data"]["pagination"]["total"], 1);

    let response = app
        .send(patch(&format!("/api/admin/{}/approve", project.id), &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_envelope(&json, StatusCode::OK, true);
    assert_eq!(json["message"], "Project approved successfully");
    assert_eq!(json["data"]["status"], "approved");

    let response = app
        .send(get(&format!("/api/projects/{}", project.project_id), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // A second moderation attempt is refused.
    let response = app
        .send(patch(&format!("/api/admin/{}/approve", project.id), &token))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let response = app
        .send(patch(&format!("/api/admin/{}/reject", project.id), &token))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "Project is already approved and cannot be rejected"
    );
    assert!(Path::new(&project.file_path).exists(), "approved file must stay");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reject_removes_the_stored_file(pool: PgPool) {
    let admin = create_admin(&pool, "moderator@fyp.edu").await;
    let token = token_for(&admin);
    let app = build_test_app(pool.clone());
    let project = seed_project(
        &pool,
        &app.upload_dir(),
        "Incomplete Traverse Adjustment",
        "Surveying",
        2023,
        ProjectStatus::Pending,
    )
    .await;

    let response = app
        .send(patch(&format!("/api/admin/{}/reject", project.id), &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Project rejected");
    assert_eq!(json["data"]["status"], "rejected");
    assert!(!Path::new(&project.file_path).exists());

    let stored = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ProjectStatus::Rejected);

    let response = app
        .send(get(&format!("/api/projects/{}", project.id), None))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_routes_only_accept_numeric_ids(pool: PgPool) {
    let admin = create_admin(&pool, "moderator@fyp.edu").await;
    let token = token_for(&admin);
    let app = build_test_app(pool.clone());
    let project = seed_project(
        &pool,
        &app.upload_dir(),
        "Spatial Data Infrastructure Audit",
        "Geoinformatics",
        2022,
        ProjectStatus::Pending,
    )
    .await;

    let response = app
        .send(patch(&format!("/api/admin/{}/approve", project.project_id), &token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(patch("/api/admin/999999/approve", &token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Project not found");

    let stored = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ProjectStatus::Pending);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_updates_only_supplied_fields(pool: PgPool) {
    let admin = create_admin(&pool, "moderator@fyp.edu").await;
    let token = token_for(&admin);
    let app = build_test_app(pool.clone());
    let project = seed_project(
        &pool,
        &app.upload_dir(),
        "Topographic Mapping Draft Title",
        "Surveying",
        2024,
        ProjectStatus::Approved,
    )
    .await;
    let uri = format!("/api/admin/{}", project.id);

    let response = app
        .send(patch_json(
            &uri,
            json!({ "title": "Topographic Mapping of <i>Kumasi</i>", "supervisor": "  " }),
            Some(&token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Project updated successfully");
    assert_eq!(json["data"]["title"], "Topographic Mapping of &lt;i&gt;Kumasi&lt;/i&gt;");
    assert_eq!(json["data"]["supervisor"], "Prof. Adjei Boateng");
    assert_eq!(json["data"]["abstract"], VALID_ABSTRACT);

    let response = app
        .send(patch_json(&uri, json!({ "abstract": "short" }), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Abstract must be between 50 and 5000 characters");

    let response = app
        .send(patch_json("/api/admin/999999", json!({ "title": "Valid Title" }), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_row_comments_and_file(pool: PgPool) {
    let admin = create_admin(&pool, "moderator@fyp.edu").await;
    let token = token_for(&admin);
    let app = build_test_app(pool.clone());
    let project = seed_project(
        &pool,
        &app.upload_dir(),
        "Duplicate Submission To Remove",
        "Other",
        2021,
        ProjectStatus::Approved,
    )
    .await;
    let comment = CreateComment {
        staff_name: "Dr. Ama Serwaa".to_string(),
        staff_email: "a.serwaa@uni.edu".to_string(),
        body: "Looks like a duplicate.".to_string(),
    };
    CommentRepo::create_for_lookup(&pool, &ProjectLookup::parse(&project.project_id), &comment)
        .await
        .unwrap()
        .unwrap();

    let uri = format!("/api/admin/{}", project.id);
    let response = app.send(delete(&uri, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Project deleted successfully");
    assert!(json.get("data").is_none());

    assert!(ProjectRepo::find_by_id(&pool, project.id).await.unwrap().is_none());
    assert!(CommentRepo::list_for_project(&pool, project.id).await.unwrap().is_empty());
    assert!(!Path::new(&project.file_path).exists());

    let response = app.send(delete(&uri, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_count_every_status_and_rank_downloads(pool: PgPool) {
    let admin = create_admin(&pool, "moderator@fyp.edu").await;
    let token = token_for(&admin);
    let app = build_test_app(pool.clone());
    let dir = app.upload_dir();

    let popular = seed_project(
        &pool,
        &dir,
        "Popular Cadastral Study",
        "Cadastral Survey",
        2024,
        ProjectStatus::Approved,
    )
    .await;
    let quiet = seed_project(
        &pool,
        &dir,
        "Quiet Geodesy Study",
        "Surveying",
        2023,
        ProjectStatus::Approved,
    )
    .await;
    let others = [
        ("Waiting Remote Sensing Study", ProjectStatus::Pending),
        ("Rejected Photogrammetry Study", ProjectStatus::Rejected),
    ];
    for (title, status) in others {
        seed_project(&pool, &dir, title, "Geoinformatics", 2022, status).await;
    }

    for _ in 0..3 {
        ProjectRepo::record_download(&pool, popular.id).await.unwrap();
    }
    ProjectRepo::record_download(&pool, quiet.id).await.unwrap();
    ProjectRepo::find_approved_and_record_view(&pool, &ProjectLookup::parse(&quiet.project_id))
        .await
        .unwrap();

    let response = app.send(get("/api/admin/stats", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Stats retrieved successfully");

    let data = &json["data"];
    assert_eq!(data["total"], 4);
    assert_eq!(data["approved"], 2);
    assert_eq!(data["pending"], 1);
    assert_eq!(data["rejected"], 1);
    assert_eq!(data["totalDownloads"], 4);
    assert_eq!(data["totalViews"], 1);

    let top = data["topProjects"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["title"], "Popular Cadastral Study");
    assert_eq!(top[0]["downloads"], 3);
}
