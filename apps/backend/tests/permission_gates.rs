mod support;

use actix_web::test;
use serde_json::{json, Value};

use blog_backend::auth::permissions::Permission;
use blog_backend::config::db::DbProfile;
use blog_backend::infra::state::build_state;
use support::auth::{bearer, seeded_account};
use support::create_test_app;

#[tokio::test]
async fn test_editor_desk_requires_editor() {
    let state = build_state().with_db(DbProfile::Test).build().await.unwrap();
    let db = state.db.clone().unwrap();
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    let (_, reader_token) = seeded_account(&app, &db, "reader", &[]).await;
    let (_, editor_token) = seeded_account(&app, &db, "editor1", &[Permission::Editor]).await;

    let req = test::TestRequest::get()
        .uri("/api/posts/editor")
        .insert_header(bearer(&reader_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "FORBIDDEN");

    let req = test::TestRequest::get()
        .uri("/api/posts/editor")
        .insert_header(bearer(&editor_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "editor1");
}

#[tokio::test]
async fn test_manage_desk_accepts_any_of_admin_or_editor() {
    let state = build_state().with_db(DbProfile::Test).build().await.unwrap();
    let db = state.db.clone().unwrap();
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    let (_, editor_token) = seeded_account(&app, &db, "editor2", &[Permission::Editor]).await;
    let (_, admin_token) = seeded_account(&app, &db, "admin1", &[Permission::Admin]).await;
    let (_, reader_token) = seeded_account(&app, &db, "reader2", &[]).await;

    // Holding either label is enough
    for token in [&editor_token, &admin_token] {
        let req = test::TestRequest::get()
            .uri("/api/posts/manage")
            .insert_header(bearer(token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
    }

    let req = test::TestRequest::get()
        .uri("/api/posts/manage")
        .insert_header(bearer(&reader_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);

    // Admin alone does not open the editor-only desk
    let req = test::TestRequest::get()
        .uri("/api/posts/editor")
        .insert_header(bearer(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn test_full_post_requires_subscription() {
    let state = build_state().with_db(DbProfile::Test).build().await.unwrap();
    let db = state.db.clone().unwrap();
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    let (_, author_token) = seeded_account(&app, &db, "author1", &[]).await;
    let (_, sub_token) = seeded_account(&app, &db, "sub1", &[Permission::Subscribed]).await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&author_token))
        .set_json(json!({ "title": "Paywalled", "content": "Members only" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let post: Value = test::read_body_json(resp).await;
    let post_id = post["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}/full"))
        .insert_header(bearer(&author_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}/full"))
        .insert_header(bearer(&sub_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["content"], "Members only");
}

#[tokio::test]
async fn test_user_listing_is_admin_only() {
    let state = build_state().with_db(DbProfile::Test).build().await.unwrap();
    let db = state.db.clone().unwrap();
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    let (_, reader_token) = seeded_account(&app, &db, "reader3", &[]).await;
    let (_, admin_token) = seeded_account(&app, &db, "admin2", &[Permission::Admin]).await;

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(bearer(&reader_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(bearer(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    let listed = body.as_array().unwrap();
    assert!(listed.len() >= 2);
    // Credentials never serialize
    for user in listed {
        assert!(user.get("password_hash").is_none());
        assert!(user.get("email").is_none());
    }
}

#[tokio::test]
async fn test_admin_delete_and_stale_token_forbidden() {
    let state = build_state().with_db(DbProfile::Test).build().await.unwrap();
    let db = state.db.clone().unwrap();
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    let (victim_id, victim_token) = seeded_account(&app, &db, "victim", &[]).await;
    let (_, reader_token) = seeded_account(&app, &db, "reader4", &[]).await;
    let (_, admin_token) = seeded_account(&app, &db, "admin3", &[Permission::Admin]).await;

    // Non-admin cannot delete
    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{victim_id}"))
        .insert_header(bearer(&reader_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);

    // Admin can
    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{victim_id}"))
        .insert_header(bearer(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 204);

    // The deleted user's still-unexpired token authenticates but resolves
    // to no account: 403, not 401
    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{victim_id}"))
        .insert_header(bearer(&victim_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "FORBIDDEN_USER_NOT_FOUND");
}
