//! Repository tests for comments and admin accounts.

use assert_matches::assert_matches;
use fyparchive_core::lookup::ProjectLookup;
use fyparchive_db::models::admin::CreateAdmin;
use fyparchive_db::models::comment::CreateComment;
use fyparchive_db::models::project::CreateProject;
use fyparchive_db::repositories::{AdminRepo, CommentRepo, ProjectRepo};
use sqlx::PgPool;

fn comment(name: &str, body: &str) -> CreateComment {
    CreateComment {
        staff_name: name.to_string(),
        staff_email: "staff@uni.edu".to_string(),
        body: body.to_string(),
    }
}

async fn project(pool: &PgPool, code: &str) -> i64 {
    let input = CreateProject {
        project_id: code.to_string(),
        title: "Commented Survey Project".to_string(),
        author: "Esi Mensah".to_string(),
        department: "Surveying".to_string(),
        year: 2022,
        abstract_text: "An assessment of total station accuracy for boundary \
                        demarcation in rapidly urbanizing areas."
            .to_string(),
        supervisor: "Dr. Kwame Nkansah".to_string(),
        file_path: format!("/tmp/{code}.pdf"),
        file_name: "thesis.pdf".to_string(),
        file_size: 1024,
    };
    ProjectRepo::create(pool, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn comments_attach_by_either_identifier(pool: PgPool) {
    let id = project(&pool, "PROJ_C1").await;

    let by_pk = ProjectLookup::parse(&id.to_string());
    let by_code = ProjectLookup::parse("PROJ_C1");

    CommentRepo::create_for_lookup(&pool, &by_pk, &comment("First", "one"))
        .await
        .unwrap()
        .unwrap();
    let second = CommentRepo::create_for_lookup(&pool, &by_code, &comment("Second", "two"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.project_id, id);
    assert_eq!(second.body, "two");

    let listed = CommentRepo::list_for_project(&pool, id).await.unwrap();
    let names: Vec<_> = listed.iter().map(|c| c.staff_name.as_str()).collect();
    assert_eq!(names, ["First", "Second"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_on_missing_project_inserts_nothing(pool: PgPool) {
    let lookup = ProjectLookup::parse("PROJ_GHOST");
    let result = CommentRepo::create_for_lookup(&pool, &lookup, &comment("Nobody", "lost"))
        .await
        .unwrap();
    assert!(result.is_none());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_project_cascades_to_comments(pool: PgPool) {
    let id = project(&pool, "PROJ_C2").await;
    let lookup = ProjectLookup::parse("PROJ_C2");
    CommentRepo::create_for_lookup(&pool, &lookup, &comment("Kofi", "note"))
        .await
        .unwrap()
        .unwrap();

    ProjectRepo::delete(&pool, id).await.unwrap().unwrap();

    assert!(CommentRepo::list_for_project(&pool, id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn schema_rejects_oversized_comment(pool: PgPool) {
    project(&pool, "PROJ_C3").await;
    let lookup = ProjectLookup::parse("PROJ_C3");
    let err = CommentRepo::create_for_lookup(&pool, &lookup, &comment("Kofi", &"x".repeat(2001)))
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(db) if db.constraint() == Some("ck_project_comments_body_length"));
}

// ---------------------------------------------------------------------------
// Admins
// ---------------------------------------------------------------------------

fn admin(email: &str) -> CreateAdmin {
    CreateAdmin {
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo".to_string(),
        role: "admin".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_emails_are_normalized(pool: PgPool) {
    let created = AdminRepo::create(&pool, &admin("  Dean@FYP.Edu ")).await.unwrap();
    assert_eq!(created.email, "dean@fyp.edu");
    assert!(created.last_login_at.is_none());

    let found = AdminRepo::find_by_email(&pool, "DEAN@fyp.edu").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);

    let err = AdminRepo::create(&pool, &admin("dean@fyp.edu")).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn schema_rejects_unknown_role(pool: PgPool) {
    let mut input = admin("clerk@fyp.edu");
    input.role = "clerk".to_string();
    let err = AdminRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23514"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn successful_login_is_stamped(pool: PgPool) {
    let created = AdminRepo::create(&pool, &admin("dean@fyp.edu")).await.unwrap();

    let stamped = AdminRepo::record_successful_login(&pool, created.id).await.unwrap();
    assert!(stamped.is_some());

    let stored = AdminRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(stored.last_login_at, stamped);

    let missing = AdminRepo::record_successful_login(&pool, 999_999).await.unwrap();
    assert!(missing.is_none());
}
