//! GeoIP Provider 抽象层
//!
//! 每个上游 provider 实现 [`GeoIpLookup`]，
//! [`GeoIpRegistry`] 按 [`ProviderKind`] 选出对应实现。

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};
use tracing::info;

use super::ip_api_com::IpApiComProvider;
use super::ipapi_co::IpapiCoProvider;
use super::record::GeoRecord;
use super::transport::{HttpTransport, UreqTransport};
use crate::config::ProvidersConfig;
use crate::errors::Result;
use crate::services::IpLiteral;

/// 支持的上游 provider
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    AsRefStr,
)]
pub enum ProviderKind {
    #[default]
    #[serde(rename = "ipapi.co")]
    #[strum(serialize = "ipapi.co")]
    IpapiCo,
    #[serde(rename = "ip-api.com")]
    #[strum(serialize = "ip-api.com")]
    IpApiCom,
}

impl ProviderKind {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::IpapiCo => "https://ipapi.co",
            Self::IpApiCom => "http://ip-api.com",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::iter().find(|kind| kind.as_ref() == s).ok_or_else(|| {
            let valid: Vec<String> = Self::iter().map(|kind| kind.to_string()).collect();
            format!("Invalid provider: '{}'. Valid: {}", s, valid.join(", "))
        })
    }
}

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    /// 查询指定 IP 的地理位置
    async fn lookup_ip(&self, ip: &IpLiteral) -> Result<GeoRecord>;

    /// 由上游自行识别调用方地址
    async fn lookup_caller(&self) -> Result<GeoRecord>;

    fn kind(&self) -> ProviderKind;
}

/// ProviderKind → provider 实现
///
/// `resolve` 对枚举做穷尽匹配，新增 provider 而未注册会在编译期报错。
#[derive(Clone)]
pub struct GeoIpRegistry {
    ipapi_co: Arc<dyn GeoIpLookup>,
    ip_api_com: Arc<dyn GeoIpLookup>,
}

impl GeoIpRegistry {
    pub fn new(ipapi_co: Arc<dyn GeoIpLookup>, ip_api_com: Arc<dyn GeoIpLookup>) -> Self {
        Self {
            ipapi_co,
            ip_api_com,
        }
    }

    /// 根据配置创建，每个 provider 使用独立超时的 ureq transport
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let transport_for = |kind: ProviderKind| -> Arc<dyn HttpTransport> {
            Arc::new(UreqTransport::new(config.timeout(kind)))
        };

        let ipapi_co = IpapiCoProvider::new(
            config.base_url(ProviderKind::IpapiCo),
            transport_for(ProviderKind::IpapiCo),
        );
        let ip_api_com = IpApiComProvider::new(
            config.base_url(ProviderKind::IpApiCom),
            transport_for(ProviderKind::IpApiCom),
        );

        for kind in ProviderKind::iter() {
            info!(
                "GeoIP: {} provider at {} (timeout {:?})",
                kind,
                config.base_url(kind),
                config.timeout(kind)
            );
        }

        Self::new(Arc::new(ipapi_co), Arc::new(ip_api_com))
    }

    pub fn resolve(&self, kind: ProviderKind) -> Arc<dyn GeoIpLookup> {
        match kind {
            ProviderKind::IpapiCo => Arc::clone(&self.ipapi_co),
            ProviderKind::IpApiCom => Arc::clone(&self.ip_api_com),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_round_trip_names() {
        assert_eq!("ipapi.co".parse::<ProviderKind>(), Ok(ProviderKind::IpapiCo));
        assert_eq!(
            "ip-api.com".parse::<ProviderKind>(),
            Ok(ProviderKind::IpApiCom)
        );
        assert_eq!(ProviderKind::IpApiCom.to_string(), "ip-api.com");
        assert_eq!(ProviderKind::default(), ProviderKind::IpapiCo);
    }

    #[test]
    fn test_provider_kind_rejects_unknown() {
        let err = "maxmind".parse::<ProviderKind>().unwrap_err();
        assert!(err.contains("maxmind"));
        assert!(err.contains("ipapi.co, ip-api.com"));
        assert!("IPAPI.CO".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::IpapiCo).unwrap(),
            "\"ipapi.co\""
        );
        let kind: ProviderKind = serde_json::from_str("\"ip-api.com\"").unwrap();
        assert_eq!(kind, ProviderKind::IpApiCom);
    }

    #[test]
    fn test_registry_from_config_resolves_every_kind() {
        let registry = GeoIpRegistry::from_config(&ProvidersConfig::default());
        for kind in ProviderKind::iter() {
            assert_eq!(registry.resolve(kind).kind(), kind);
        }
    }
}
