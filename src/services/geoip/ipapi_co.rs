//! ipapi.co provider
//!
//! ipapi.co 即使返回 HTTP 200，也可能在 body 中携带 `"error": true`：
//!
//! ```text
//! { "error": true, "reason": "Invalid IP Address", "ip": "..." }
//! { "error": true, "reason": "Reserved IP Address", "ip": "127.0.0.1", "reserved": true }
//! { "error": true, "reason": "RateLimited", "message": "..." }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::provider::{GeoIpLookup, ProviderKind};
use super::record::{
    GeoRecord, coerce_coordinate, first_truthy_text, is_truthy, optional_text, required_text,
};
use super::transport::{self, HttpTransport, RawResponse};
use crate::errors::{LookupError, Result};
use crate::services::IpLiteral;

pub struct IpapiCoProvider {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl IpapiCoProvider {
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    async fn request(&self, url: &str) -> Result<GeoRecord> {
        let response = transport::send(self.transport.as_ref(), url).await?;
        check_status(&response)?;

        let data = transport::parse_object(&response.body)?;
        check_error_flag(&data)?;

        Ok(normalize(&data))
    }
}

#[async_trait]
impl GeoIpLookup for IpapiCoProvider {
    async fn lookup_ip(&self, ip: &IpLiteral) -> Result<GeoRecord> {
        self.request(&format!("{}/{}/json/", self.base_url, ip)).await
    }

    async fn lookup_caller(&self) -> Result<GeoRecord> {
        self.request(&format!("{}/json/", self.base_url)).await
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::IpapiCo
    }
}

/// ipapi.co 文档中列出的状态码有专门的错误信息，其余交给通用映射
fn check_status(response: &RawResponse) -> Result<()> {
    match response.status {
        400 => Err(LookupError::upstream(format!(
            "IP provider returned HTTP 400 Bad Request: {}",
            response.text()
        ))),
        403 => Err(LookupError::upstream(
            "Authentication with IP provider failed (HTTP 403).",
        )),
        405 => Err(LookupError::upstream(
            "HTTP method not allowed when calling IP provider (HTTP 405).",
        )),
        _ => transport::check_status(response),
    }
}

fn check_error_flag(data: &Map<String, Value>) -> Result<()> {
    if !data.get("error").is_some_and(is_truthy) {
        return Ok(());
    }

    let reason = first_truthy_text(data, &["reason", "message"])
        .unwrap_or_else(|| "Unknown error from ipapi.co".to_string());
    let reserved_flag = data.get("reserved") == Some(&Value::Bool(true));

    Err(classify(reason, reserved_flag))
}

/// 按优先级匹配：invalid > reserved > 限流 > 其它
fn classify(reason: String, reserved_flag: bool) -> LookupError {
    let lower = reason.to_lowercase();

    if lower.contains("invalid") {
        return LookupError::InvalidIp(reason);
    }
    if lower.contains("reserved") || reserved_flag {
        return LookupError::ReservedIp(reason);
    }
    if lower.contains("ratelimited") || lower.contains("quota") {
        return LookupError::upstream(format!(
            "IP provider rate limit or quota exceeded: {}",
            reason
        ));
    }

    LookupError::Upstream(reason)
}

fn normalize(data: &Map<String, Value>) -> GeoRecord {
    GeoRecord {
        ip: required_text(data, "ip"),
        country: required_text(data, "country"),
        country_name: required_text(data, "country_name"),
        region: optional_text(data.get("region")),
        city: optional_text(data.get("city")),
        postal_code: optional_text(data.get("postal")),
        latitude: coerce_coordinate(data.get("latitude")),
        longitude: coerce_coordinate(data.get("longitude")),
        timezone: optional_text(data.get("timezone")),
        // ipapi.co 通过 org 字段提供运营商信息
        isp: optional_text(data.get("org")),
    }
}
