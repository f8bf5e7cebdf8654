use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::services::ProviderKind;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，示例：IPGEO__SERVER__PORT=9000
pub const ENV_PREFIX: &str = "IPGEO";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 服务器地址、端口、worker 数量
/// - logging: 日志配置
/// - providers: 各上游 provider 的地址与超时
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > 配置文件 > 默认值
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" 或 "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 上游 provider 配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub ipapi_co: ProviderEndpoint,
    #[serde(default)]
    pub ip_api_com: ProviderEndpoint,
}

/// 单个 provider 的地址与超时
///
/// `base_url` 未配置时使用 provider 的官方地址
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEndpoint {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProvidersConfig {
    pub fn endpoint(&self, kind: ProviderKind) -> &ProviderEndpoint {
        match kind {
            ProviderKind::IpapiCo => &self.ipapi_co,
            ProviderKind::IpApiCom => &self.ip_api_com,
        }
    }

    pub fn base_url(&self, kind: ProviderKind) -> &str {
        self.endpoint(kind)
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| kind.default_base_url())
    }

    pub fn timeout(&self, kind: ProviderKind) -> Duration {
        Duration::from_secs(self.endpoint(kind).timeout_secs.max(1))
    }
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_provider_timeout_secs() -> u64 {
    5
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for ProviderEndpoint {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.providers.base_url(ProviderKind::IpapiCo),
            "https://ipapi.co"
        );
        assert_eq!(
            config.providers.base_url(ProviderKind::IpApiCom),
            "http://ip-api.com"
        );
        assert_eq!(
            config.providers.timeout(ProviderKind::IpApiCom),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_blank_base_url_falls_back() {
        let mut providers = ProvidersConfig::default();
        providers.ipapi_co.base_url = Some("  ".to_string());
        providers.ip_api_com.base_url = Some("http://localhost:9999".to_string());

        assert_eq!(providers.base_url(ProviderKind::IpapiCo), "https://ipapi.co");
        assert_eq!(
            providers.base_url(ProviderKind::IpApiCom),
            "http://localhost:9999"
        );
    }

    #[test]
    fn test_sample_config_is_valid_toml() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.server.port, 8000);
        assert_eq!(parsed.providers.ipapi_co.timeout_secs, 5);
    }
}
