use std::sync::Arc;

use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{GeoIpRegistry, LookupService};

pub struct StartupContext {
    pub lookup_service: Arc<LookupService>,
}

/// 准备服务器启动的上下文（provider 注册表与查询服务）
pub fn prepare_server_startup(config: &StaticConfig) -> StartupContext {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let registry = GeoIpRegistry::from_config(&config.providers);
    let lookup_service = Arc::new(LookupService::new(registry));

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    StartupContext { lookup_service }
}
