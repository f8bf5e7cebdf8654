use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use super::error::ApiError;
use crate::services::{GeoRecord, LookupQuery, LookupService, ProviderKind, QueryError};
use crate::utils::extract_client_hint;

/// Raw query parameters of `/v1/ip/lookup`, validated into [`LookupQuery`].
#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub ip: Option<String>,
    pub provider: Option<String>,
}

/// 成功响应：provider 回显 + 归一化记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub provider: ProviderKind,
    #[serde(flatten)]
    pub record: GeoRecord,
}

pub struct LookupHandler;

impl LookupHandler {
    pub async fn lookup(
        req: HttpRequest,
        params: web::Query<LookupParams>,
        service: web::Data<Arc<LookupService>>,
    ) -> Result<HttpResponse, ApiError> {
        let params = params.into_inner();
        trace!("Received lookup request: {:?}", params);

        let query = LookupQuery::new(params.ip.as_deref(), params.provider.as_deref())?;
        let provider = query.provider;
        let hint = extract_client_hint(&req);

        // provider 内部 panic 时返回 500，而不是断开连接
        let outcome = AssertUnwindSafe(service.lookup(&query, hint.as_deref()))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(record)) => Ok(HttpResponse::Ok()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(LookupResponse { provider, record })),
            Ok(Err(error)) => Err(ApiError::Lookup { error, provider }),
            Err(_) => {
                error!("Lookup via {} panicked", provider);
                Err(ApiError::Internal {
                    provider: Some(provider),
                })
            }
        }
    }
}

/// Lookup 路由配置
///
/// 查询串无法解析（如参数重复）时返回 invalid_request
pub fn lookup_routes() -> actix_web::Scope {
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(QueryError::Malformed(err.to_string())).into()
    });

    web::scope("/v1/ip")
        .app_data(query_config)
        .route("/lookup", web::get().to(LookupHandler::lookup))
}
