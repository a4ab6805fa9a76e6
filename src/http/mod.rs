use axum::Router;

use crate::AppState;

mod auth;
mod error;
mod handlers;
pub mod pagination;
mod routes;

pub use auth::AuthUser;
pub use error::AppError;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::auth())
        .merge(routes::users())
        .merge(routes::posts())
        .merge(routes::comments())
        .merge(routes::relations());

    Router::new()
        .merge(routes::health())
        .nest("/api", api)
        .with_state(state)
}
