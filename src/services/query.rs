//! 查询参数校验
//!
//! `ip` 为空 / 全空白 / 缺失时表示查询调用方地址；
//! 非空时必须是合法的 IPv4 或 IPv6 字面量，否则在调用 provider 之前拒绝。

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use super::geoip::ProviderKind;

/// A trimmed string that is known to parse as an IPv4 or IPv6 address.
///
/// The trimmed text is kept as given, without canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpLiteral {
    text: String,
    addr: IpAddr,
}

impl IpLiteral {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }
}

impl FromStr for IpLiteral {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let addr = text.parse::<IpAddr>().map_err(|_| QueryError::InvalidIp)?;
        Ok(Self {
            text: text.to_string(),
            addr,
        })
    }
}

impl fmt::Display for IpLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// 请求参数校验失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidIp,
    InvalidProvider(String),
    /// 查询串本身无法解析（如重复的参数）
    Malformed(String),
}

impl QueryError {
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidIp => "invalid_ip",
            QueryError::InvalidProvider(_) | QueryError::Malformed(_) => "invalid_request",
        }
    }

    /// 对外的固定提示，不暴露内部细节
    pub fn message(&self) -> &'static str {
        match self {
            QueryError::InvalidIp => {
                "The supplied IP address is not a valid IPv4 or IPv6 address."
            }
            QueryError::InvalidProvider(_) | QueryError::Malformed(_) => {
                "Invalid request parameters"
            }
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidIp => f.write_str(self.message()),
            QueryError::InvalidProvider(detail) | QueryError::Malformed(detail) => {
                write!(f, "{}: {}", self.message(), detail)
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Validated input of a single lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LookupQuery {
    /// `None` 表示查询调用方地址
    pub ip: Option<IpLiteral>,
    pub provider: ProviderKind,
}

impl LookupQuery {
    /// 从原始查询参数构建
    ///
    /// `ip` 的错误优先于 `provider` 的错误。
    pub fn new(ip: Option<&str>, provider: Option<&str>) -> Result<Self, QueryError> {
        let ip = match ip.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<IpLiteral>()?),
        };

        let provider = match provider {
            None => ProviderKind::default(),
            Some(raw) => raw.parse().map_err(QueryError::InvalidProvider)?,
        };

        Ok(Self { ip, provider })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_literals_unchanged() {
        for raw in [
            "8.8.8.8",
            "0.0.0.0",
            "2001:4860:4860::8888",
            "2001:4860:4860:0:0:0:0:8888",
            "::1",
            "::ffff:192.0.2.1",
        ] {
            let query = LookupQuery::new(Some(raw), None).unwrap();
            assert_eq!(query.ip.unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let query = LookupQuery::new(Some("  1.1.1.1 \t"), None).unwrap();
        assert_eq!(query.ip.unwrap().as_str(), "1.1.1.1");
    }

    #[test]
    fn test_blank_means_caller() {
        for raw in [None, Some(""), Some("   "), Some("\n\t")] {
            let query = LookupQuery::new(raw, None).unwrap();
            assert_eq!(query.ip, None);
            assert_eq!(query.provider, ProviderKind::IpapiCo);
        }
    }

    #[test]
    fn test_rejects_invalid_literals() {
        for raw in [
            "qwerty",
            "999.999.999.999",
            "1.2.3",
            "8.8.8.8/32",
            "8.8.8.8:80",
            "[::1]",
            "2001:::1",
        ] {
            assert_eq!(
                LookupQuery::new(Some(raw), None),
                Err(QueryError::InvalidIp),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_provider_selection() {
        let query = LookupQuery::new(None, Some("ip-api.com")).unwrap();
        assert_eq!(query.provider, ProviderKind::IpApiCom);

        let err = LookupQuery::new(None, Some("maxmind")).unwrap_err();
        assert!(matches!(err, QueryError::InvalidProvider(_)));
        assert_eq!(err.code(), "invalid_request");

        let empty = LookupQuery::new(None, Some("")).unwrap_err();
        assert!(matches!(empty, QueryError::InvalidProvider(_)));
    }

    #[test]
    fn test_ip_error_wins_over_provider_error() {
        let err = LookupQuery::new(Some("nope"), Some("nope")).unwrap_err();
        assert_eq!(err, QueryError::InvalidIp);
        assert_eq!(err.code(), "invalid_ip");
    }
}
