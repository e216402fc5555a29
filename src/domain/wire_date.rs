// ==========================================
// 线上日期格式 (YYYY-MM-DD)
// ==========================================
// 远程表格会把本地午夜序列化为 UTC 时间戳（如 2025-01-09T17:00:00.000Z），
// 带时区的时间戳先换算到机构所在时区（UTC+7）再取日期
// ==========================================

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 机构所在时区（Asia/Bangkok，无夏令时）
pub const LOCAL_UTC_OFFSET_SECS: i64 = 7 * 3600;

pub fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        let local = timestamp.naive_utc() + Duration::seconds(LOCAL_UTC_OFFSET_SECS);
        return Ok(local.date());
    }
    // 无时区的时间戳按本地时间处理
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date())
}

pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse("2025-01-09").unwrap(), ymd(2025, 1, 9));
        assert_eq!(parse(" 2025-01-09 ").unwrap(), ymd(2025, 1, 9));
        assert!(parse("09/01/2025").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_utc_timestamp_of_local_midnight() {
        // UTC+7 的 1 月 10 日零点
        assert_eq!(parse("2025-01-09T17:00:00.000Z").unwrap(), ymd(2025, 1, 10));
        assert_eq!(parse("2025-01-10T16:59:59Z").unwrap(), ymd(2025, 1, 10));
        assert_eq!(parse("2025-01-10T17:00:00Z").unwrap(), ymd(2025, 1, 11));
        // 跨月
        assert_eq!(parse("2025-02-28T17:00:00.000Z").unwrap(), ymd(2025, 3, 1));
    }

    #[test]
    fn test_offset_timestamp_and_naive_timestamp() {
        assert_eq!(parse("2025-01-10T00:00:00+07:00").unwrap(), ymd(2025, 1, 10));
        assert_eq!(parse("2025-01-10T00:00:00").unwrap(), ymd(2025, 1, 10));
    }
}
