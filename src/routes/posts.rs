use axum::routing::get;
use axum::{Json, Router};

use crate::feed;
use crate::models::Post;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/posts", get(list))
}

/// GET /api/posts — the static feed. Open to anonymous callers.
pub async fn list() -> Json<Vec<Post>> {
    Json(feed::posts())
}
