use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable failure class carried in an [`ErrorBody`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    AppNotFound,
    InvalidRequest,
    Unavailable,
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not found",
            Self::AppNotFound => "app not found",
            Self::InvalidRequest => "invalid request",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Error document returned by the registry service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_json_shape() {
        let body = ErrorBody::new(ErrorCode::AppNotFound, "ap-1");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "app_not_found");
        assert_eq!(json["message"], "ap-1");
    }
}
