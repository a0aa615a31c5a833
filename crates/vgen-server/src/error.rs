use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error rendered as `{ "error": "<message>" }`
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<vgen_core::Error> for AppError {
    fn from(err: vgen_core::Error) -> Self {
        let status = if err.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        AppError::new(status, err.to_string())
    }
}

/// Oversize or unreadable request bodies keep axum's status but get the JSON shape
impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let json = serde_json::json!({
            "error": self.message
        });
        (self.status, Json(json)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgen_core::Error;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(Error::validation("no prompt")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(Error::provider("kie", "boom")).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(Error::MalformedProviderResponse { raw: "{}".into() }).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
