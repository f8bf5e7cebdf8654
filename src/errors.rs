use std::fmt;

/// Failure kinds shared by every geolocation provider.
///
/// Adapters classify whatever the upstream reports into one of these four
/// kinds; the HTTP layer is the only place that turns them into a status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Upstream rejected the address as syntactically invalid
    InvalidIp(String),
    /// Private, loopback or otherwise reserved address
    ReservedIp(String),
    /// No geolocation data for this address
    IpNotFound(String),
    /// Transport failure, malformed payload, rate limiting or any unrecognized provider error
    Upstream(String),
}

impl LookupError {
    /// 机器可读的错误码
    pub fn code(&self) -> &'static str {
        match self {
            LookupError::InvalidIp(_) => "invalid_ip",
            LookupError::ReservedIp(_) => "reserved_ip",
            LookupError::IpNotFound(_) => "ip_not_found",
            LookupError::Upstream(_) => "upstream_error",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LookupError::InvalidIp(_) => "Invalid IP Address",
            LookupError::ReservedIp(_) => "Reserved IP Address",
            LookupError::IpNotFound(_) => "IP Not Found",
            LookupError::Upstream(_) => "Upstream Service Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LookupError::InvalidIp(msg) => msg,
            LookupError::ReservedIp(msg) => msg,
            LookupError::IpNotFound(msg) => msg,
            LookupError::Upstream(msg) => msg,
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for LookupError {}

// 便捷的构造函数
impl LookupError {
    pub fn invalid_ip<T: Into<String>>(msg: T) -> Self {
        LookupError::InvalidIp(msg.into())
    }

    pub fn reserved_ip<T: Into<String>>(msg: T) -> Self {
        LookupError::ReservedIp(msg.into())
    }

    pub fn ip_not_found<T: Into<String>>(msg: T) -> Self {
        LookupError::IpNotFound(msg.into())
    }

    pub fn upstream<T: Into<String>>(msg: T) -> Self {
        LookupError::Upstream(msg.into())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Upstream(format!(
            "Failed to decode IP provider response as JSON: {}",
            err
        ))
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(LookupError::invalid_ip("x").code(), "invalid_ip");
        assert_eq!(LookupError::reserved_ip("x").code(), "reserved_ip");
        assert_eq!(LookupError::ip_not_found("x").code(), "ip_not_found");
        assert_eq!(LookupError::upstream("x").code(), "upstream_error");
    }

    #[test]
    fn test_display_includes_message() {
        let err = LookupError::reserved_ip("Reserved IP Address");
        assert_eq!(err.message(), "Reserved IP Address");
        assert!(err.to_string().contains("Reserved IP Address"));
    }

    #[test]
    fn test_json_error_becomes_upstream() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = LookupError::from(json_err);
        assert!(matches!(err, LookupError::Upstream(_)));
        assert!(
            err.message()
                .starts_with("Failed to decode IP provider response as JSON")
        );
    }
}
