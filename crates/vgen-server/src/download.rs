//! Download proxy
//!
//! Streams an externally hosted video back with `Content-Disposition: attachment` so
//! mobile browsers save it instead of refusing the cross-origin download.

use crate::error::AppError;
use crate::rest::AppState;
use crate::types::DownloadQuery;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        HeaderValue,
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT},
    },
    response::Response,
};
use url::Url;

const PROXY_USER_AGENT: &str = "Mozilla/5.0 (compatible; VideoDownloadProxy/1.0)";
const DEFAULT_FILENAME: &str = "video.mp4";

pub async fn download_proxy(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let raw = query
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing 'url' query parameter"))?;

    let url = parse_http_url(&raw).ok_or_else(|| AppError::bad_request("Invalid URL format"))?;
    let filename = filename_from_url(&url);

    let upstream = state
        .http
        .get(url.clone())
        .header(USER_AGENT, PROXY_USER_AGENT)
        .send()
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch video: {}", e)))?;

    let status = upstream.status();
    if !status.is_success() {
        tracing::error!(url = %url, %status, "Failed to fetch video");
        return Err(AppError::new(status, format!("Failed to fetch video: {}", status)));
    }

    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("video/mp4"));
    let content_length = upstream.headers().get(CONTENT_LENGTH).cloned();
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| AppError::internal(format!("Invalid filename: {}", e)))?;

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CONTENT_DISPOSITION, disposition);
    if let Some(length) = content_length {
        headers.insert(CONTENT_LENGTH, length);
    }

    Ok(response)
}

fn parse_http_url(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Last path segment when it looks like a file name, else `video.mp4`
fn filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|last| last.contains('.'))
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
