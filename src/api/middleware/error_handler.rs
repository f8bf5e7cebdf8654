//! 兜底的 500 响应
//!
//! `ApiError` 之外产生的 500（例如 app_data 缺失、extractor 内部错误）
//! 统一改写为 `internal_error` JSON body，已经是 JSON 的 500 保持原样。

use actix_web::{
    ResponseError, Result,
    body::MessageBody,
    dev::ServiceResponse,
    http::{StatusCode, header},
    middleware::{ErrorHandlerResponse, ErrorHandlers},
};
use tracing::error;

use crate::api::services::ApiError;

pub fn internal_error_handlers<B: MessageBody + 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(
        StatusCode::INTERNAL_SERVER_ERROR,
        render_internal_error::<B>,
    )
}

fn render_internal_error<B: MessageBody + 'static>(
    res: ServiceResponse<B>,
) -> Result<ErrorHandlerResponse<B>> {
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let (req, response) = res.into_parts();
    match response.error() {
        Some(err) => error!("Unhandled error on {} {}: {}", req.method(), req.path(), err),
        None => error!("Unhandled 500 on {} {}", req.method(), req.path()),
    }

    let body = ApiError::Internal { provider: None }.error_response();
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, body).map_into_right_body(),
    ))
}
