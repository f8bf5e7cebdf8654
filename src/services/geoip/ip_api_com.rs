//! ip-api.com provider
//!
//! 响应体中的 `status` 字段为 `"success"` 或 `"fail"`，失败原因在 `message` 中。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::provider::{GeoIpLookup, ProviderKind};
use super::record::{
    GeoRecord, coerce_coordinate, first_truthy, first_truthy_text, optional_text, required_text,
};
use super::transport::{self, HttpTransport};
use crate::errors::{LookupError, Result};
use crate::services::IpLiteral;

pub struct IpApiComProvider {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl IpApiComProvider {
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    async fn request(&self, url: &str) -> Result<GeoRecord> {
        let response = transport::send(self.transport.as_ref(), url).await?;
        transport::check_status(&response)?;

        let data = transport::parse_object(&response.body)?;
        check_status_field(&data)?;

        Ok(normalize(&data))
    }
}

#[async_trait]
impl GeoIpLookup for IpApiComProvider {
    async fn lookup_ip(&self, ip: &IpLiteral) -> Result<GeoRecord> {
        self.request(&format!("{}/json/{}", self.base_url, ip)).await
    }

    async fn lookup_caller(&self) -> Result<GeoRecord> {
        self.request(&format!("{}/json/", self.base_url)).await
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::IpApiCom
    }
}

fn check_status_field(data: &Map<String, Value>) -> Result<()> {
    let status = first_truthy_text(data, &["status"])
        .unwrap_or_default()
        .to_lowercase();
    if status == "success" {
        return Ok(());
    }

    let message = first_truthy_text(data, &["message"])
        .unwrap_or_else(|| "Unknown error from ip-api.com".to_string());

    Err(classify(message))
}

/// 按优先级匹配：invalid > private/reserved range > 限流 > not found > 其它
fn classify(message: String) -> LookupError {
    let lower = message.to_lowercase();

    if lower.contains("invalid") {
        return LookupError::InvalidIp(message);
    }
    if lower.contains("private range") || lower.contains("reserved range") {
        return LookupError::ReservedIp(message);
    }
    if lower.contains("quota") || lower.contains("limit") {
        return LookupError::upstream(format!(
            "IP provider rate limit or quota exceeded: {}",
            message
        ));
    }
    if lower.contains("not found") {
        return LookupError::IpNotFound(message);
    }

    LookupError::Upstream(message)
}

fn normalize(data: &Map<String, Value>) -> GeoRecord {
    GeoRecord {
        ip: required_text(data, "query"),
        country: required_text(data, "countryCode"),
        country_name: required_text(data, "country"),
        // 完整地区名缺失时退回到地区代码
        region: first_truthy_text(data, &["regionName", "region"]),
        city: optional_text(data.get("city")),
        postal_code: first_truthy_text(data, &["zip"]),
        latitude: coerce_coordinate(data.get("lat")),
        longitude: coerce_coordinate(data.get("lon")),
        timezone: optional_text(data.get("timezone")),
        isp: optional_text(first_truthy(data, &["isp", "org"])),
    }
}
