//! 日期时间工具
//!
//! `DNSPod` 两套 API 都使用 `YYYY-MM-DD HH:MM:SS`（北京时间，不带时区）表示时间。
//! 提供：
//! - 格式化/解析该格式
//! - 自定义 Serde 序列化/反序列化：字符串（本格式、RFC3339、纯日期）或 Unix 时间戳 -> `NaiveDateTime`

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Wire format for timestamps.
pub const TENCENT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 格式化为 `YYYY-MM-DD HH:MM:SS`
pub fn format_tencent(dt: &NaiveDateTime) -> String {
    dt.format(TENCENT_DATETIME_FORMAT).to_string()
}

/// 宽松解析：本格式 / RFC3339 / 纯日期 / Unix 秒
pub fn parse_tencent(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, TENCENT_DATETIME_FORMAT) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    s.parse::<i64>()
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.naive_utc())
}

/// 序列化 Option<`NaiveDateTime`> 为 Option<`YYYY-MM-DD HH:MM:SS`>
pub fn serialize<S>(dt: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&format_tencent(dt)),
        None => serializer.serialize_none(),
    }
}

/// 反序列化：无法识别的字符串视为 `None`，不让整条记录解析失败
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        String(String),
        I64(i64),
    }

    Ok(
        match Option::<RawTimestamp>::deserialize(deserializer)? {
            Some(RawTimestamp::String(s)) => parse_tencent(&s),
            Some(RawTimestamp::I64(ts)) => DateTime::from_timestamp(ts, 0).map(|dt| dt.naive_utc()),
            None => None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super", default)]
        at: Option<NaiveDateTime>,
    }

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 28)
            .unwrap()
            .and_hms_opt(11, 27, 9)
            .unwrap()
    }

    #[test]
    fn test_format() {
        assert_eq!(format_tencent(&sample()), "2021-03-28 11:27:09");
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(parse_tencent("2021-03-28 11:27:09"), Some(sample()));
        assert_eq!(parse_tencent("2021-03-28T11:27:09Z"), Some(sample()));
        assert_eq!(parse_tencent("2021-03-28T19:27:09+08:00"), Some(sample()));
        assert_eq!(
            parse_tencent("2021-03-28"),
            NaiveDate::from_ymd_opt(2021, 3, 28).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_tencent("1616930829"), Some(sample()));
        assert_eq!(parse_tencent(""), None);
        assert_eq!(parse_tencent("yesterday"), None);
    }

    #[test]
    fn test_serde_roundtrip() {
        let w = Wrapper { at: Some(sample()) };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"at":"2021-03-28 11:27:09"}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.at, Some(sample()));
    }

    #[test]
    fn test_deserialize_tolerant() {
        let w: Wrapper = serde_json::from_str(r#"{"at":"not a date"}"#).unwrap();
        assert!(w.at.is_none());
        let w: Wrapper = serde_json::from_str(r#"{"at":1616930829}"#).unwrap();
        assert_eq!(w.at, Some(sample()));
        let w: Wrapper = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert!(w.at.is_none());
        let w: Wrapper = serde_json::from_str("{}").unwrap();
        assert!(w.at.is_none());
    }
}
