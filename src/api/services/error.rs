//! 对外错误响应
//!
//! 所有失败都在这里统一映射为 HTTP 状态码与 `{code, message, provider}`。

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::errors::LookupError;
use crate::services::{ProviderKind, QueryError};

const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred while processing the request.";

/// Failure body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub provider: Option<ProviderKind>,
}

#[derive(Debug)]
pub enum ApiError {
    /// Provider 返回的分类错误
    Lookup {
        error: LookupError,
        provider: ProviderKind,
    },
    /// 请求参数校验失败，provider 不回显
    Validation(QueryError),
    Internal { provider: Option<ProviderKind> },
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Lookup { error, .. } => error.code(),
            ApiError::Validation(err) => err.code(),
            ApiError::Internal { .. } => "internal_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Lookup { error, .. } => error.message(),
            ApiError::Validation(err) => err.message(),
            ApiError::Internal { .. } => INTERNAL_ERROR_MESSAGE,
        }
    }

    pub fn provider(&self) -> Option<ProviderKind> {
        match self {
            ApiError::Lookup { provider, .. } => Some(*provider),
            ApiError::Validation(_) => None,
            ApiError::Internal { provider } => *provider,
        }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.message().to_string(),
            provider: self.provider(),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Validation(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Lookup { error, .. } => match error {
                LookupError::InvalidIp(_) | LookupError::ReservedIp(_) => StatusCode::BAD_REQUEST,
                LookupError::IpNotFound(_) => StatusCode::NOT_FOUND,
                LookupError::Upstream(_) => StatusCode::BAD_GATEWAY,
            },
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(self.to_response_body())
    }
}
