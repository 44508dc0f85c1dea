//! Static file serving for the widget build artifact

use std::path::{Component, Path, PathBuf};

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Try to serve a request path from the widget dist directory.
/// Returns `None` when the path escapes the dist dir or no file exists,
/// so the caller can fall through to its 404.
pub async fn serve_widget_asset(dist: &Path, request_path: &str) -> Option<Response> {
    let relative = sanitize(request_path)?;
    let full_path = dist.join(relative);

    match tokio::fs::read(&full_path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&full_path).first_or_octet_stream();
            Some(
                (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                    bytes,
                )
                    .into_response(),
            )
        }
        Err(_) => None,
    }
}

/// Strip the leading slash and reject any path that tries to climb out
/// of the dist directory.
fn sanitize(request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let path = Path::new(trimmed);
    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            _ => return None,
        }
    }
    Some(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_accepts_plain_relative_paths() {
        assert_eq!(sanitize("/main.js"), Some(PathBuf::from("main.js")));
        assert_eq!(
            sanitize("/assets/chunk.js"),
            Some(PathBuf::from("assets/chunk.js"))
        );
    }

    #[test]
    fn sanitize_rejects_traversal_and_empty_paths() {
        assert_eq!(sanitize("/../etc/passwd"), None);
        assert_eq!(sanitize("/a/../../b"), None);
        assert_eq!(sanitize("/"), None);
    }

    #[tokio::test]
    async fn serves_existing_files_with_guessed_content_type() {
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(dist.path().join("main.js"), "export {};").unwrap();

        let response = serve_widget_asset(dist.path(), "/main.js").await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert!(serve_widget_asset(dist.path(), "/missing.js").await.is_none());
    }
}
