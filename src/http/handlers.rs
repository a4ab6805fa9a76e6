use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::app::access::{decide, Action};
use crate::app::auth::AuthService;
use crate::app::engagement::EngagementService;
use crate::app::posts::{NewPost, PostService};
use crate::app::visibility::{
    comment_detail_view, post_detail_view, CommentDetail, CommentItem, MyPostItem, Paginated,
    PostDetail, PostFull, PostListItem, RelationView,
};
use crate::domain::post::{search_terms, PostChanges, PostFilter, PostOrdering, PostStatus};
use crate::domain::user::{Requester, User};
use crate::http::auth::{requester, OptionalAuthUser};
use crate::http::error::{AppJson, FieldErrors};
use crate::http::pagination::{paginate, PageParams, RequestUrl, COMMENT_KEYS, LIST_KEYS};
use crate::http::{AppError, AuthUser};
use crate::AppState;

const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";
const FIELD_REQUIRED: &str = "This field is required.";
const FIELD_BLANK: &str = "This field may not be blank.";
const MAX_TITLE_LEN: usize = 250;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

/// Query string of every paginated post or comment list. Values are kept raw;
/// a malformed number is an invalid page, not a rejected query.
#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Deserialize)]
pub struct DetailQuery {
    pub comments_page: Option<String>,
    pub comments_page_size: Option<String>,
}

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        state.db.clone(),
        state.paseto_access_key,
        state.paseto_refresh_key,
        state.access_ttl_minutes,
        state.refresh_ttl_days,
    )
}

fn ensure_allowed(requester: &Requester, action: Action) -> Result<(), AppError> {
    if decide(requester, action).is_allowed() {
        Ok(())
    } else {
        Err(AppError::forbidden(PERMISSION_DENIED))
    }
}

fn add_field_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

/// Checks a text field and returns it with surrounding whitespace removed,
/// recording what is wrong with it otherwise.
fn check_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    required: bool,
    max_len: Option<usize>,
) -> Option<String> {
    let Some(value) = value else {
        if required {
            add_field_error(errors, field, FIELD_REQUIRED);
        }
        return None;
    };

    let value = value.trim();
    if value.is_empty() {
        add_field_error(errors, field, FIELD_BLANK);
        return None;
    }
    match max_len {
        Some(max) if value.chars().count() > max => {
            add_field_error(
                errors,
                field,
                format!("Ensure this field has no more than {} characters.", max),
            );
            None
        }
        _ => Some(value.to_string()),
    }
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match state.db.ping().await {
        Ok(()) => "ok",
        Err(err) => {
            tracing::warn!(error = ?err, "database ping failed");
            "degraded"
        }
    };

    Json(HealthResponse { status })
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub access_expires_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub refresh_expires_at: OffsetDateTime,
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    const MAX_PASSWORD_LEN: usize = 128;

    if payload.username.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::bad_request("username and password are required"));
    }
    if payload.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at most 128 characters"));
    }

    let tokens = auth_service(&state)
        .login(&payload.username, &payload.password)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to login");
            AppError::internal("failed to login")
        })?;

    match tokens {
        Some(tokens) => Ok(Json(AuthTokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
        })),
        None => Err(AppError::unauthorized("invalid credentials")),
    }
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    if payload.refresh_token.trim().is_empty() {
        return Err(AppError::bad_request("refresh_token is required"));
    }

    let tokens = auth_service(&state)
        .refresh(&payload.refresh_token)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to refresh token");
            AppError::internal("failed to refresh token")
        })?;

    match tokens {
        Some(tokens) => Ok(Json(AuthTokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
        })),
        None => Err(AppError::unauthorized("invalid refresh token")),
    }
}

pub async fn revoke_token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> Result<StatusCode, AppError> {
    if payload.refresh_token.trim().is_empty() {
        return Err(AppError::bad_request("refresh_token is required"));
    }

    let revoked = auth_service(&state)
        .revoke_refresh_token(&payload.refresh_token)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to revoke token");
            AppError::internal("failed to revoke token")
        })?;

    // Revoking an unknown or already revoked token is not an error.
    if !revoked {
        tracing::debug!("refresh token was not active");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_current_user(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let user = auth_service(&state)
        .get_current_user(auth.user_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, "failed to fetch current user");
            AppError::internal("failed to fetch current user")
        })?;

    match user {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::not_found("user not found")),
    }
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    const MAX_USERNAME_LEN: usize = 150;
    const MIN_PASSWORD_LEN: usize = 8;
    const MAX_PASSWORD_LEN: usize = 128;

    let mut errors = FieldErrors::new();
    let username = check_text(
        &mut errors,
        "username",
        payload.username,
        true,
        Some(MAX_USERNAME_LEN),
    );
    // Passwords are kept verbatim; check_text only gates presence and length.
    let password = check_text(
        &mut errors,
        "password",
        payload.password.clone(),
        true,
        Some(MAX_PASSWORD_LEN),
    )
    .and(payload.password);
    if let Some(password) = &password {
        if password.chars().count() < MIN_PASSWORD_LEN {
            add_field_error(
                &mut errors,
                "password",
                format!("Ensure this field has at least {} characters.", MIN_PASSWORD_LEN),
            );
        }
    }
    let (Some(username), Some(password), true) = (username, password, errors.is_empty()) else {
        return Err(AppError::validation(errors));
    };

    let user = auth_service(&state)
        .signup(
            username,
            payload.first_name,
            payload.last_name,
            password,
        )
        .await
        .map_err(|err| {
            if let Some(sqlx_err) = err.downcast_ref::<sqlx::Error>() {
                if let Some(db_err) = sqlx_err.as_database_error() {
                    if db_err.code().as_deref() == Some("23505") {
                        return AppError::conflict("username already taken");
                    }
                }
            }
            tracing::error!(error = ?err, "failed to create user");
            AppError::internal("failed to create user")
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct PostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<String>,
    pub publish: Option<String>,
}

impl PostRequest {
    /// Status as far as the permission check is concerned: anything that
    /// does not parse is simply not a request to go back to draft.
    fn requested_status(&self) -> Option<PostStatus> {
        self.status.as_deref().and_then(|status| status.parse().ok())
    }
}

/// Validates a post body. With `partial` unset, title and body are required.
fn validate_post(payload: PostRequest, partial: bool) -> Result<PostChanges, AppError> {
    let mut errors = FieldErrors::new();

    let title = check_text(
        &mut errors,
        "title",
        payload.title,
        !partial,
        Some(MAX_TITLE_LEN),
    );
    let body = check_text(&mut errors, "body", payload.body, !partial, None);

    let status = match payload.status.as_deref().map(str::parse::<PostStatus>) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(message)) => {
            add_field_error(&mut errors, "status", message);
            None
        }
    };

    let publish = match payload.publish.as_deref() {
        None => None,
        Some(raw) => match OffsetDateTime::parse(raw, &Rfc3339) {
            Ok(publish) => Some(publish),
            Err(_) => {
                add_field_error(
                    &mut errors,
                    "publish",
                    "Datetime has wrong format. Use RFC 3339.",
                );
                None
            }
        },
    };

    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    Ok(PostChanges {
        title,
        body,
        status,
        publish,
    })
}

fn post_filter(query: &ListQuery) -> PostFilter {
    PostFilter {
        author_id: None,
        status: None,
        search_terms: search_terms(query.search.as_deref()),
        ordering: PostOrdering::parse(query.ordering.as_deref()),
    }
}

pub async fn list_posts(
    Query(query): Query<ListQuery>,
    RequestUrl(url): RequestUrl,
    State(state): State<AppState>,
) -> Result<Json<Paginated<PostListItem>>, AppError> {
    let params = PageParams::parse(
        query.page.as_deref(),
        query.page_size.as_deref(),
        state.pagination,
    )?;
    let filter = PostFilter {
        status: Some(PostStatus::Published),
        ..post_filter(&query)
    };

    let service = PostService::new(state.db.clone());
    let slice = service
        .list_posts(&filter, params.limit(), params.offset())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to list posts");
            AppError::internal("failed to list posts")
        })?;

    Ok(Json(paginate(slice, params, LIST_KEYS, &url)?))
}

pub async fn my_posts(
    auth: AuthUser,
    Query(query): Query<ListQuery>,
    RequestUrl(url): RequestUrl,
    State(state): State<AppState>,
) -> Result<Json<Paginated<MyPostItem>>, AppError> {
    let params = PageParams::parse(
        query.page.as_deref(),
        query.page_size.as_deref(),
        state.pagination,
    )?;
    let filter = PostFilter {
        author_id: Some(auth.user_id),
        ..post_filter(&query)
    };

    let service = PostService::new(state.db.clone());
    let slice = service
        .list_posts(&filter, params.limit(), params.offset())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, "failed to list own posts");
            AppError::internal("failed to list posts")
        })?;

    Ok(Json(paginate(slice, params, LIST_KEYS, &url)?))
}

pub async fn get_post(
    Path(id): Path<i64>,
    OptionalAuthUser(auth): OptionalAuthUser,
    Query(query): Query<DetailQuery>,
    RequestUrl(url): RequestUrl,
    State(state): State<AppState>,
) -> Result<Json<PostDetail>, AppError> {
    let requester = requester(auth.as_ref());

    let service = PostService::new(state.db.clone());
    let post = service.get_post(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to fetch post");
        AppError::internal("failed to fetch post")
    })?;
    let post = post.ok_or_else(|| AppError::not_found("post not found"))?;

    ensure_allowed(
        &requester,
        Action::ReadPost {
            author_id: post.author_id(),
            status: post.status,
        },
    )?;

    // Comment paging is only looked at once the post itself is readable.
    let params = PageParams::parse(
        query.comments_page.as_deref(),
        query.comments_page_size.as_deref(),
        state.pagination,
    )?;
    let engagement = EngagementService::new(state.db.clone());
    let comments = engagement
        .list_comments(post.id, params.limit(), params.offset())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, post_id = id, "failed to list comments");
            AppError::internal("failed to fetch post")
        })?;
    let comments = paginate(comments, params, COMMENT_KEYS, &url)?;

    Ok(Json(post_detail_view(post, &requester, comments)))
}

pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<PostRequest>,
) -> Result<(StatusCode, Json<PostFull>), AppError> {
    let changes = validate_post(payload, false)?;
    let (Some(title), Some(body)) = (changes.title, changes.body) else {
        return Err(AppError::bad_request("title and body are required"));
    };

    let service = PostService::new(state.db.clone());
    let post = service
        .create_post(
            auth.user_id,
            NewPost {
                title,
                body,
                status: changes.status.unwrap_or_default(),
                publish: changes.publish,
            },
        )
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, author_id = %auth.user_id, "failed to create post");
            AppError::internal("failed to create post")
        })?;

    tracing::info!(post_id = post.id, author_id = %auth.user_id, "post created");
    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn patch_post(
    path: Path<i64>,
    auth: AuthUser,
    state: State<AppState>,
    payload: Result<AppJson<PostRequest>, AppError>,
) -> Result<Json<PostFull>, AppError> {
    update_post(path, auth, state, payload, true).await
}

pub async fn put_post(
    path: Path<i64>,
    auth: AuthUser,
    state: State<AppState>,
    payload: Result<AppJson<PostRequest>, AppError>,
) -> Result<Json<PostFull>, AppError> {
    update_post(path, auth, state, payload, false).await
}

async fn update_post(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<AppJson<PostRequest>, AppError>,
    partial: bool,
) -> Result<Json<PostFull>, AppError> {
    let service = PostService::new(state.db.clone());
    let post = service.get_post(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to fetch post");
        AppError::internal("failed to update post")
    })?;
    let post = post.ok_or_else(|| AppError::not_found("post not found"))?;

    // Permission is checked before the payload is validated.
    let requested = payload
        .as_ref()
        .ok()
        .and_then(|AppJson(payload)| payload.requested_status());
    ensure_allowed(
        &auth.requester(),
        Action::UpdatePost {
            author_id: post.author_id(),
            current: post.status,
            requested,
        },
    )?;

    let AppJson(payload) = payload?;
    let changes = validate_post(payload, partial)?;
    let updated = service.update_post(id, changes).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to update post");
        AppError::internal("failed to update post")
    })?;

    // The row was published by someone else between the check and the write.
    let updated = updated.ok_or_else(|| AppError::forbidden(PERMISSION_DENIED))?;
    Ok(Json(updated.into()))
}

pub async fn delete_post(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = PostService::new(state.db.clone());
    let post = service.get_post(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to fetch post");
        AppError::internal("failed to delete post")
    })?;
    let post = post.ok_or_else(|| AppError::not_found("post not found"))?;

    ensure_allowed(
        &auth.requester(),
        Action::DeletePost {
            author_id: post.author_id(),
        },
    )?;

    let deleted = service.delete_post(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to delete post");
        AppError::internal("failed to delete post")
    })?;

    if deleted {
        tracing::info!(post_id = id, user_id = %auth.user_id, "post deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("post not found"))
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CommentRequest {
    pub body: Option<String>,
}

#[derive(Serialize)]
pub struct CommentAddedResponse {
    pub status: &'static str,
}

pub async fn add_comment(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<AppJson<CommentRequest>, AppError>,
) -> Result<Json<CommentAddedResponse>, AppError> {
    let posts = PostService::new(state.db.clone());
    let post = posts.get_post(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to fetch post");
        AppError::internal("failed to comment")
    })?;
    let post = post.ok_or_else(|| AppError::not_found("post not found"))?;

    ensure_allowed(
        &auth.requester(),
        Action::CommentOnPost {
            author_id: post.author_id(),
            status: post.status,
        },
    )?;

    let AppJson(payload) = payload?;
    let mut errors = FieldErrors::new();
    let Some(body) = check_text(&mut errors, "body", payload.body, true, None) else {
        return Err(AppError::validation(errors));
    };

    let service = EngagementService::new(state.db.clone());
    let comment = service
        .comment_post(auth.user_id, post.id, body)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, post_id = id, "failed to comment");
            AppError::internal("failed to comment")
        })?;

    tracing::info!(comment_id = comment.id, post_id = id, "comment added");
    Ok(Json(CommentAddedResponse {
        status: "Comment added",
    }))
}

pub async fn my_comments(
    auth: AuthUser,
    Query(query): Query<ListQuery>,
    RequestUrl(url): RequestUrl,
    State(state): State<AppState>,
) -> Result<Json<Paginated<CommentItem>>, AppError> {
    let params = PageParams::parse(
        query.page.as_deref(),
        query.page_size.as_deref(),
        state.pagination,
    )?;

    let service = EngagementService::new(state.db.clone());
    let slice = service
        .list_by_author(auth.user_id, params.limit(), params.offset())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, "failed to list own comments");
            AppError::internal("failed to list comments")
        })?;

    Ok(Json(paginate(slice, params, LIST_KEYS, &url)?))
}

pub async fn get_comment(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<CommentDetail>, AppError> {
    let service = EngagementService::new(state.db.clone());
    let comment = service.get_comment(id).await.map_err(|err| {
        tracing::error!(error = ?err, comment_id = id, "failed to fetch comment");
        AppError::internal("failed to fetch comment")
    })?;
    let comment = comment.ok_or_else(|| AppError::not_found("comment not found"))?;

    let requester = auth.requester();
    ensure_allowed(
        &requester,
        Action::ReadComment {
            author_id: comment.author_id(),
        },
    )?;

    Ok(Json(comment_detail_view(comment, &requester)))
}

pub async fn patch_comment(
    path: Path<i64>,
    auth: AuthUser,
    state: State<AppState>,
    payload: Result<AppJson<CommentRequest>, AppError>,
) -> Result<Json<CommentDetail>, AppError> {
    update_comment(path, auth, state, payload, true).await
}

pub async fn put_comment(
    path: Path<i64>,
    auth: AuthUser,
    state: State<AppState>,
    payload: Result<AppJson<CommentRequest>, AppError>,
) -> Result<Json<CommentDetail>, AppError> {
    update_comment(path, auth, state, payload, false).await
}

async fn update_comment(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<AppJson<CommentRequest>, AppError>,
    partial: bool,
) -> Result<Json<CommentDetail>, AppError> {
    let service = EngagementService::new(state.db.clone());
    let comment = service.get_comment(id).await.map_err(|err| {
        tracing::error!(error = ?err, comment_id = id, "failed to fetch comment");
        AppError::internal("failed to update comment")
    })?;
    let comment = comment.ok_or_else(|| AppError::not_found("comment not found"))?;

    let requester = auth.requester();
    ensure_allowed(
        &requester,
        Action::UpdateComment {
            author_id: comment.author_id(),
        },
    )?;

    let AppJson(payload) = payload?;
    let mut errors = FieldErrors::new();
    let body = check_text(&mut errors, "body", payload.body, !partial, None);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }
    // A partial update without a body leaves the comment as it is.
    let Some(body) = body else {
        return Ok(Json(comment_detail_view(comment, &requester)));
    };

    let updated = service.update_comment(id, body).await.map_err(|err| {
        tracing::error!(error = ?err, comment_id = id, "failed to update comment");
        AppError::internal("failed to update comment")
    })?;
    let updated = updated.ok_or_else(|| AppError::not_found("comment not found"))?;

    Ok(Json(comment_detail_view(updated, &requester)))
}

pub async fn delete_comment(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = EngagementService::new(state.db.clone());
    let comment = service.get_comment(id).await.map_err(|err| {
        tracing::error!(error = ?err, comment_id = id, "failed to fetch comment");
        AppError::internal("failed to delete comment")
    })?;
    let comment = comment.ok_or_else(|| AppError::not_found("comment not found"))?;

    ensure_allowed(
        &auth.requester(),
        Action::DeleteComment {
            author_id: comment.author_id(),
        },
    )?;

    let deleted = service.delete_comment(id).await.map_err(|err| {
        tracing::error!(error = ?err, comment_id = id, "failed to delete comment");
        AppError::internal("failed to delete comment")
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("comment not found"))
    }
}

// ---------------------------------------------------------------------------
// Likes and bookmarks
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct RelationRequest {
    pub like: Option<bool>,
    pub in_bookmarks: Option<bool>,
}

pub async fn update_relation(
    Path(post_id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<AppJson<RelationRequest>, AppError>,
) -> Result<Json<RelationView>, AppError> {
    let posts = PostService::new(state.db.clone());
    let post = posts.get_post(post_id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id, "failed to fetch post");
        AppError::internal("failed to update relation")
    })?;
    let post = post.ok_or_else(|| AppError::not_found("post not found"))?;

    ensure_allowed(
        &auth.requester(),
        Action::UpsertRelation {
            post_author_id: post.author_id(),
            post_status: post.status,
        },
    )?;

    let AppJson(payload) = payload?;
    let service = EngagementService::new(state.db.clone());
    let relation = service
        .upsert_relation(auth.user_id, post.id, payload.like, payload.in_bookmarks)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = %auth.user_id, post_id, "failed to update relation");
            AppError::internal("failed to update relation")
        })?;

    Ok(Json(relation.into()))
}
