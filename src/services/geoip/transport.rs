//! 出站 HTTP 传输层
//!
//! 每个 provider 只发起一次 GET 请求，不做重试。
//! 生产环境使用 ureq（同步，在 spawn_blocking 中执行），测试中可替换为桩实现。

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{trace, warn};
use ureq::Agent;

use crate::errors::{LookupError, Result};

/// Status code and raw body bytes of an upstream response.
///
/// 编码问题留给 JSON 解析阶段处理，传输层不做 UTF-8 校验。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// body 文本，非法 UTF-8 以替换字符显示（用于错误信息）
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Connection, DNS, TLS, timeout or body read failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(String);

impl TransportError {
    pub fn new<T: Into<String>>(msg: T) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

/// 出站 GET 抽象
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<RawResponse, TransportError>;
}

/// ureq 实现
///
/// 非 2xx 状态码不会被当作错误，由 provider 自行解释。
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }

    fn get_sync(agent: Agent, url: String) -> std::result::Result<RawResponse, TransportError> {
        let mut response = agent
            .get(&url)
            .call()
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for UreqTransport {
    async fn get(&self, url: &str) -> std::result::Result<RawResponse, TransportError> {
        let agent = self.agent.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || Self::get_sync(agent, url))
            .await
            .unwrap_or_else(|e| {
                warn!("GeoIP spawn_blocking failed: {}", e);
                Err(TransportError::new(format!("request task failed: {}", e)))
            })
    }
}

/// 发送请求，把传输失败映射为 Upstream 错误
pub(crate) async fn send(transport: &dyn HttpTransport, url: &str) -> Result<RawResponse> {
    trace!("GeoIP request: GET {}", url);

    let response = transport
        .get(url)
        .await
        .map_err(|e| LookupError::upstream(format!("Request to IP provider failed: {}", e)))?;

    trace!("GeoIP response: HTTP {} from {}", response.status, url);
    Ok(response)
}

/// 通用 HTTP 状态码映射（在解析 body 之前执行）
///
/// 404 → IpNotFound，429 → 限流，其它 4xx / 5xx → Upstream，其余放行。
pub(crate) fn check_status(response: &RawResponse) -> Result<()> {
    match response.status {
        404 => Err(LookupError::ip_not_found(
            "No geolocation information found for this IP address.",
        )),
        429 => Err(LookupError::upstream(
            "IP provider rate limit or quota exceeded (HTTP 429).",
        )),
        status if status >= 400 => Err(LookupError::upstream(format!(
            "IP provider returned HTTP {}: {}",
            status,
            response.text()
        ))),
        _ => Ok(()),
    }
}

/// 解析 JSON body，要求顶层为对象
pub(crate) fn parse_object(body: &[u8]) -> Result<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(LookupError::upstream(
            "IP provider returned an unexpected JSON payload",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status_passes_any_2xx() {
        assert!(check_status(&RawResponse::new(200, "{}")).is_ok());
        assert!(check_status(&RawResponse::new(203, "{}")).is_ok());
        assert!(check_status(&RawResponse::new(204, "")).is_ok());
    }

    #[test]
    fn test_check_status_mapping() {
        let not_found = check_status(&RawResponse::new(404, "")).unwrap_err();
        assert!(matches!(not_found, LookupError::IpNotFound(_)));

        let limited = check_status(&RawResponse::new(429, "slow down")).unwrap_err();
        assert!(matches!(limited, LookupError::Upstream(_)));
        assert!(limited.message().contains("429"));

        let teapot = check_status(&RawResponse::new(418, "teapot")).unwrap_err();
        assert_eq!(
            teapot,
            LookupError::upstream("IP provider returned HTTP 418: teapot")
        );

        let outage = check_status(&RawResponse::new(503, "down")).unwrap_err();
        assert!(outage.message().contains("503"));
        assert!(outage.message().contains("down"));
    }

    #[test]
    fn test_parse_object() {
        assert_eq!(parse_object(br#"{"ip":"1.1.1.1"}"#).unwrap()["ip"], "1.1.1.1");

        let bad = parse_object(b"<html>").unwrap_err();
        assert!(
            bad.message()
                .starts_with("Failed to decode IP provider response as JSON")
        );

        let not_object = parse_object(b"[1, 2]").unwrap_err();
        assert!(matches!(not_object, LookupError::Upstream(_)));
    }

    #[test]
    fn test_parse_object_rejects_invalid_utf8() {
        let err = parse_object(&[0xff, 0xfe, b'{', b'}']).unwrap_err();
        assert!(matches!(err, LookupError::Upstream(_)));
        assert!(
            err.message()
                .starts_with("Failed to decode IP provider response as JSON")
        );
    }

    #[test]
    fn test_status_message_tolerates_invalid_utf8() {
        let err = check_status(&RawResponse::new(500, vec![b'o', b'k', 0xff])).unwrap_err();
        assert_eq!(err.message(), "IP provider returned HTTP 500: ok\u{fffd}");
    }
}
