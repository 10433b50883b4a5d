use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::extractors::MaybeUser;
use crate::shell::ShellView;

/// Render the chosen view as an HTML response.
impl IntoResponse for ShellView {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// GET / — login view or feed view, depending on the session
pub async fn index(maybe_user: MaybeUser) -> ShellView {
    ShellView::for_session(maybe_user.0.map(|current| current.user))
}
