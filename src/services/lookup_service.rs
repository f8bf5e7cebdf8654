use std::time::Instant;

use tracing::{debug, info, warn};

use super::geoip::{GeoIpRegistry, GeoRecord};
use super::query::LookupQuery;
use crate::errors::Result;
use crate::utils::ip::is_private_or_local;

/// Lookup Service
///
/// 单次查询的编排：选 provider → 按 IP 或调用方查询 → 记录结果。
/// 每次查询只发起一次上游请求，不缓存、不重试。
pub struct LookupService {
    registry: GeoIpRegistry,
}

impl LookupService {
    pub fn new(registry: GeoIpRegistry) -> Self {
        Self { registry }
    }

    /// `caller_hint` 仅用于日志，不会传给 provider
    pub async fn lookup(&self, query: &LookupQuery, caller_hint: Option<&str>) -> Result<GeoRecord> {
        let provider = self.registry.resolve(query.provider);
        let start = Instant::now();

        let result = match &query.ip {
            Some(ip) => {
                if is_private_or_local(&ip.addr()) {
                    debug!("Lookup for private/local address {} via {}", ip, query.provider);
                }
                provider.lookup_ip(ip).await
            }
            None => {
                debug!(
                    "Caller lookup via {} (client hint: {})",
                    query.provider,
                    caller_hint.unwrap_or("unknown")
                );
                provider.lookup_caller().await
            }
        };

        let target = query
            .ip
            .as_ref()
            .map(|ip| ip.as_str())
            .unwrap_or("caller");

        match &result {
            Ok(record) => info!(
                "Lookup {} via {} resolved to {} in {:?}",
                target,
                query.provider,
                record.country,
                start.elapsed()
            ),
            Err(e) => warn!(
                "Lookup {} via {} failed [{}]: {}",
                target,
                query.provider,
                e.code(),
                e.message()
            ),
        }

        result
    }
}
