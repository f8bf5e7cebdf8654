//! GeoIP 服务模块
//!
//! 通过第三方 HTTP API 查询 IP 地理位置，并把不同 provider 的响应
//! 归一化为统一的 [`GeoRecord`] 或 [`LookupError`](crate::errors::LookupError)：
//! - ipapi.co（body 内嵌 error 标志）
//! - ip-api.com（body 内 status 字符串）

mod ip_api_com;
mod ipapi_co;
mod provider;
mod record;
mod transport;

pub use ip_api_com::IpApiComProvider;
pub use ipapi_co::IpapiCoProvider;
pub use provider::{GeoIpLookup, GeoIpRegistry, ProviderKind};
pub use record::{GeoRecord, coerce_coordinate};
pub use transport::{HttpTransport, RawResponse, TransportError, UreqTransport};
