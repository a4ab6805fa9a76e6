use axum::{routing::get, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn auth() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/refresh", post(handlers::refresh_token))
        .route("/auth/revoke", post(handlers::revoke_token))
        .route("/auth/me", get(handlers::get_current_user))
}

pub fn users() -> Router<AppState> {
    Router::new().route("/users/", post(handlers::create_user))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route(
            "/posts/",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/posts/my_posts/", get(handlers::my_posts))
        .route(
            "/posts/:id/",
            get(handlers::get_post)
                .patch(handlers::patch_post)
                .put(handlers::put_post)
                .delete(handlers::delete_post),
        )
        .route("/posts/:id/add_comment/", post(handlers::add_comment))
}

pub fn comments() -> Router<AppState> {
    Router::new()
        .route("/comments/my_comments/", get(handlers::my_comments))
        .route(
            "/comments/:id/",
            get(handlers::get_comment)
                .patch(handlers::patch_comment)
                .put(handlers::put_comment)
                .delete(handlers::delete_comment),
        )
}

pub fn relations() -> Router<AppState> {
    Router::new().route(
        "/relations/:post_id/",
        axum::routing::patch(handlers::update_relation).put(handlers::update_relation),
    )
}
