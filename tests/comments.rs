//! Comment Tests
//!
//! Covers adding comments to posts and the comment detail endpoints.

mod common;

use axum::http::StatusCode;
use common::app;
use serde_json::json;

#[tokio::test]
async fn add_comment_to_published_post() {
    let app = app().await;
    let author = app.create_user("comment_add_author").await;
    let reader = app.create_user("comment_add_reader").await;
    let post_id = app
        .create_post_for_user(author.id, "Open", "published")
        .await;

    let resp = app
        .post_json(
            &format!("/api/posts/{}/add_comment/", post_id),
            json!({ "body": "Great read" }),
            Some(&reader.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"], "Comment added");

    let resp = app.get(&format!("/api/posts/{}/", post_id), None).await;
    let comments = &resp.json()["comments"];
    assert_eq!(comments["count"], 1);
    assert_eq!(comments["results"][0]["body"], "Great read");
    assert_eq!(
        comments["results"][0]["author"]["id"].as_str().unwrap(),
        reader.id.to_string()
    );
}

#[tokio::test]
async fn add_comment_requires_auth_and_body() {
    let app = app().await;
    let author = app.create_user("comment_rules").await;
    let post_id = app
        .create_post_for_user(author.id, "Rules", "published")
        .await;
    let path = format!("/api/posts/{}/add_comment/", post_id);

    let resp = app.post_json(&path, json!({ "body": "hi" }), None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app
        .post_json(&path, json!({}), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["fields"]["body"][0], "This field is required.");

    let resp = app
        .post_json(&path, json!({ "body": "  " }), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json()["fields"]["body"][0],
        "This field may not be blank."
    );
}

#[tokio::test]
async fn cannot_comment_on_someone_elses_draft() {
    let app = app().await;
    let author = app.create_user("comment_draft_author").await;
    let other = app.create_user("comment_draft_other").await;
    let post_id = app.create_post_for_user(author.id, "WIP", "draft").await;
    let path = format!("/api/posts/{}/add_comment/", post_id);

    let resp = app
        .post_json(&path, json!({ "body": "peek" }), Some(&other.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app
        .post_json(&path, json!({ "body": "note to self" }), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn add_comment_to_missing_post() {
    let app = app().await;
    let user = app.create_user("comment_missing").await;

    let resp = app
        .post_json(
            "/api/posts/999999999/add_comment/",
            json!({ "body": "hello?" }),
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_detail_depends_on_requester() {
    let app = app().await;
    let author = app.create_user("comment_detail_author").await;
    let other = app.create_user("comment_detail_other").await;
    let staff = app.create_staff("comment_detail_staff").await;
    let post_id = app
        .create_post_for_user(author.id, "Detail", "published")
        .await;
    let comment_id = app.create_comment(author.id, post_id, "mine").await;
    let path = format!("/api/comments/{}/", comment_id);

    let resp = app.get(&path, Some(&author.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["id"], comment_id);
    assert_eq!(body["body"], "mine");
    assert!(body.get("author").is_none());

    let resp = app.get(&path, Some(&staff.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.json()["author"]["id"].as_str().unwrap(),
        author.id.to_string()
    );

    let resp = app.get(&path, Some(&other.access_token)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.get(&path, None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app.get("/api/comments/999999999/", Some(&staff.access_token)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_comment() {
    let app = app().await;
    let author = app.create_user("comment_update_author").await;
    let other = app.create_user("comment_update_other").await;
    let post_id = app
        .create_post_for_user(author.id, "Edits", "published")
        .await;
    let comment_id = app.create_comment(author.id, post_id, "tpyo").await;
    let path = format!("/api/comments/{}/", comment_id);

    let resp = app
        .patch_json(&path, json!({ "body": "hijack" }), Some(&other.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app
        .patch_json(&path, json!({ "body": "typo" }), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["body"], "typo");

    let resp = app
        .put_json(&path, json!({}), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    // An empty partial update changes nothing
    let resp = app
        .patch_json(&path, json!({}), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["body"], "typo");
}

#[tokio::test]
async fn delete_comment_by_owner_or_staff() {
    let app = app().await;
    let author = app.create_user("comment_delete_author").await;
    let other = app.create_user("comment_delete_other").await;
    let staff = app.create_staff("comment_delete_staff").await;
    let post_id = app
        .create_post_for_user(author.id, "Deletes", "published")
        .await;
    let first = app.create_comment(author.id, post_id, "first").await;
    let second = app.create_comment(author.id, post_id, "second").await;

    let resp = app
        .delete(&format!("/api/comments/{}/", first), Some(&other.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app
        .delete(&format!("/api/comments/{}/", first), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = app
        .delete(&format!("/api/comments/{}/", second), Some(&staff.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = app.get(&format!("/api/posts/{}/", post_id), None).await;
    assert_eq!(resp.json()["comments"]["count"], 0);
}

#[tokio::test]
async fn deleting_a_post_removes_its_comments() {
    let app = app().await;
    let author = app.create_user("comment_cascade").await;
    let post_id = app
        .create_post_for_user(author.id, "Cascade", "published")
        .await;
    let comment_id = app.create_comment(author.id, post_id, "gone soon").await;

    let resp = app
        .delete(&format!("/api/posts/{}/", post_id), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = app
        .get(&format!("/api/comments/{}/", comment_id), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn my_comments_lists_only_own_comments() {
    let app = app().await;
    let author = app.create_user("comment_mine").await;
    let other = app.create_user("comment_mine_other").await;
    let post_id = app
        .create_post_for_user(other.id, "Thread", "published")
        .await;
    app.create_comment(author.id, post_id, "mine 1").await;
    app.create_comment(other.id, post_id, "theirs").await;
    app.create_comment(author.id, post_id, "mine 2").await;

    let resp = app
        .get("/api/comments/my_comments/", Some(&author.access_token))
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["body"], "mine 1");
    assert_eq!(body["results"][1]["body"], "mine 2");
    assert!(body["results"][0].get("author").is_none());

    let resp = app.get("/api/comments/my_comments/", None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn comment_body_must_be_text() {
    let app = app().await;
    let author = app.create_user("comment_types").await;
    let post_id = app
        .create_post_for_user(author.id, "Typed comments", "published")
        .await;

    let resp = app
        .post_json(
            &format!("/api/posts/{}/add_comment/", post_id),
            json!({ "body": false }),
            Some(&author.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["fields"]["body"][0], "Not a valid string.");
}
