use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized (401): {0}")]
    Unauthorized(String),

    #[error("Access denied (403): {0}")]
    AccessDenied(String),

    #[error("Resource not found (404): {0}")]
    NotFound(String),

    #[error("Rate limited (429): {0}")]
    RateLimited(String),

    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(truncated),
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited(truncated),
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                body: truncated,
            },
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// HTTP status reported by the Pi-hole, if the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited(_) => Some(429),
            ApiError::ServerError { status, .. } => Some(*status),
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_keeps_body() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"error":"password incorrect"}"#);
        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert!(err.to_string().contains("password incorrect"));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_from_status_server_error() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "Server error (502): upstream down");
    }

    #[test]
    fn test_from_status_unmapped() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "bad");
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with(&format!("(truncated, {} total bytes)", long.len())));

        // Multi-byte char straddling the limit must not panic
        let tricky = format!("{}é{}", "a".repeat(MAX_ERROR_BODY_LENGTH - 1), "b".repeat(10));
        let truncated = ApiError::truncate_body(&tricky);
        assert!(truncated.contains("truncated"));
    }
}
