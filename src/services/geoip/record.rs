//! 归一化的地理位置记录
//!
//! 所有 provider 的响应最终都映射为 [`GeoRecord`]，
//! 这里同时提供把上游 JSON 字段转换为记录字段的宽松解析函数。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 经纬度保留的小数位数
const COORDINATE_SCALE: f64 = 1_000_000.0;

/// Provider-agnostic geolocation result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoRecord {
    pub ip: String,
    /// ISO 3166-1 alpha-2 国家代码 (e.g., "US")
    pub country: String,
    pub country_name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
}

/// Coerce a latitude/longitude value into a rounded float.
///
/// Accepts JSON numbers and numeric-looking strings. Everything else,
/// including strings that parse to a non-finite value, yields `None`.
pub fn coerce_coordinate(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !parsed.is_finite() {
        return None;
    }

    Some(round_coordinate(parsed))
}

fn round_coordinate(value: f64) -> f64 {
    (value * COORDINATE_SCALE).round() / COORDINATE_SCALE
}

/// JSON 真值判断（null / false / 0 / "" / 空数组 / 空对象 为假）
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 按顺序取第一个为真的字段
pub(crate) fn first_truthy<'a>(data: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| data.get(*key))
        .find(|value| is_truthy(value))
}

/// 第一个为真的字段，渲染为文本
pub(crate) fn first_truthy_text(data: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_truthy(data, keys).map(render)
}

/// 必填字符串字段：缺失或为假时返回空串
pub(crate) fn required_text(data: &Map<String, Value>, key: &str) -> String {
    first_truthy_text(data, &[key]).unwrap_or_default()
}

/// 可选字符串字段：字符串原样保留，数字/布尔转为文本，其它为 None
pub(crate) fn optional_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        v @ (Value::Number(_) | Value::Bool(_)) => Some(v.to_string()),
        _ => None,
    }
}
