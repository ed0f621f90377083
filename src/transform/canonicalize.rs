//! 标量规范化
//!
//! YAML 头部中未加引号的日期/时间标量统一渲染为 ISO 8601 文本：
//! 零偏移写作 `Z`，非零偏移写作 `±HH:MM`，无时区信息的时间不带偏移。
//! 加引号的字符串与其他值原样返回，嵌套的序列和映射递归处理。

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::models::scalar_style::{ScalarPaths, pointer_child};
use serde_json::Value;
use std::fmt;

/// YAML 1.1 日期：`YYYY-MM-DD`
static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("date pattern is valid")
});

/// YAML 1.1 时间戳：分隔符可为 `T`/`t`/空白，小数秒与时区均可选
static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{1,2})-(?P<day>[0-9]{1,2})",
        r"(?:[Tt]|[ \t]+)(?P<hour>[0-9]{1,2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})",
        r"(?:\.(?P<fraction>[0-9]*))?",
        r"(?:[ \t]*(?P<tz>Z|(?P<sign>[-+])(?P<tz_hour>[0-9]{1,2})(?::(?P<tz_minute>[0-9]{2}))?))?$",
    ))
    .expect("timestamp pattern is valid")
});

/// 识别出的时间值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Date(NaiveDate),
    DateTime {
        local: NaiveDateTime,
        offset: Option<FixedOffset>,
    },
}

impl Temporal {
    /// 按 YAML 时间戳语法解析；语法匹配但数值非法（如 13 月）时返回 `None`
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(caps) = DATE.captures(text) {
            let date = NaiveDate::from_ymd_opt(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            )?;
            return Some(Temporal::Date(date));
        }

        let caps = DATE_TIME.captures(text)?;
        let date = NaiveDate::from_ymd_opt(
            caps["year"].parse().ok()?,
            caps["month"].parse().ok()?,
            caps["day"].parse().ok()?,
        )?;

        // 小数秒截断到微秒精度
        let micros = match caps.name("fraction").map(|m| m.as_str()) {
            Some(fraction) if !fraction.is_empty() => {
                let digits: String = fraction.chars().take(6).collect();
                format!("{digits:0<6}").parse().ok()?
            }
            _ => 0,
        };
        let time = NaiveTime::from_hms_micro_opt(
            caps["hour"].parse().ok()?,
            caps["minute"].parse().ok()?,
            caps["second"].parse().ok()?,
            micros,
        )?;

        let offset = match caps.name("tz").map(|m| m.as_str()) {
            None => None,
            Some("Z") => Some(FixedOffset::east_opt(0)?),
            Some(_) => {
                let hours: i32 = caps["tz_hour"].parse().ok()?;
                let minutes: i32 = match caps.name("tz_minute") {
                    Some(m) => m.as_str().parse().ok()?,
                    None => 0,
                };
                let seconds = hours * 3600 + minutes * 60;
                let signed = if &caps["sign"] == "-" { -seconds } else { seconds };
                Some(FixedOffset::east_opt(signed)?)
            }
        };

        Some(Temporal::DateTime {
            local: NaiveDateTime::new(date, time),
            offset,
        })
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temporal::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Temporal::DateTime { local, offset } => {
                write!(f, "{}", local.format("%Y-%m-%dT%H:%M:%S"))?;
                let micros = local.nanosecond() / 1_000;
                if micros != 0 {
                    write!(f, ".{micros:06}")?;
                }
                match offset.map(|o| o.local_minus_utc()) {
                    None => Ok(()),
                    Some(0) => f.write_str("Z"),
                    Some(seconds) => {
                        let sign = if seconds < 0 { '-' } else { '+' };
                        let seconds = seconds.abs();
                        write!(f, "{sign}{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60)
                    }
                }
            }
        }
    }
}

/// 规范化单个字符串；非时间值返回 `None`
pub fn canonical_timestamp(text: &str) -> Option<String> {
    Temporal::parse(text).map(|temporal| temporal.to_string())
}

/// 递归规范化任意嵌套值
///
/// 只改写位置在 `plain` 中的字符串；`plain` 由 [`plain_scalar_paths`](crate::models::plain_scalar_paths) 给出。
pub fn canonicalize(value: &Value, plain: &ScalarPaths) -> Value {
    canonicalize_at(value, "", plain)
}

fn canonicalize_at(value: &Value, pointer: &str, plain: &ScalarPaths) -> Value {
    match value {
        Value::String(text) if plain.contains(pointer) => {
            Value::String(canonical_timestamp(text).unwrap_or_else(|| text.clone()))
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    canonicalize_at(item, &pointer_child(pointer, &index.to_string()), plain)
                })
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    let child = pointer_child(pointer, key);
                    (key.clone(), canonicalize_at(item, &child, plain))
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::plain_scalar_paths;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn canonical_yaml(text: &str) -> Value {
        let value: Value = serde_yaml::from_str(text).unwrap();
        canonicalize(&value, &plain_scalar_paths(text).unwrap())
    }

    #[rstest]
    #[case("2024-01-01", "2024-01-01")]
    #[case("2024-01-01T00:00:00+00:00", "2024-01-01T00:00:00Z")]
    #[case("2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z")]
    #[case("2024-01-01t00:00:00-00:00", "2024-01-01T00:00:00Z")]
    #[case("2024-01-01T10:30:00+05:30", "2024-01-01T10:30:00+05:30")]
    #[case("2024-01-01T10:30:00-7", "2024-01-01T10:30:00-07:00")]
    #[case("2024-01-01 10:30:00", "2024-01-01T10:30:00")]
    #[case("2024-1-5 3:04:05 Z", "2024-01-05T03:04:05Z")]
    #[case("2024-01-01T10:30:00.5Z", "2024-01-01T10:30:00.500000Z")]
    #[case("2024-01-01T10:30:00.1234567", "2024-01-01T10:30:00.123456")]
    #[case("2024-01-01T10:30:00.000", "2024-01-01T10:30:00")]
    fn test_timestamp_rendering(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(canonical_timestamp(input).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("hello")]
    #[case("2024-13-01")]
    #[case("2024-02-30T00:00:00Z")]
    #[case("2024-1-5")]
    #[case("v2024-01-01")]
    #[case("2024-01-01T25:00:00")]
    fn test_non_temporal_strings_untouched(#[case] input: &str) {
        let plain: ScalarPaths = [String::new()].into();
        assert_eq!(canonical_timestamp(input), None);
        assert_eq!(canonicalize(&json!(input), &plain), json!(input));
    }

    #[test]
    fn test_recurses_through_nesting() {
        let output = canonical_yaml(
            "created: 2024-01-01T00:00:00+00:00\ntemporal:\n  valid_from: 2024-02-01\n  history:\n    - at: 2024-03-01 12:00:00+01:00\n    - 42\n    - null\n    - true\ntitle: note\n",
        );

        let expected = json!({
            "created": "2024-01-01T00:00:00Z",
            "temporal": {
                "valid_from": "2024-02-01",
                "history": [{"at": "2024-03-01T12:00:00+01:00"}, 42, null, true]
            },
            "title": "note"
        });

        assert_eq!(output, expected);
    }

    #[test]
    fn test_quoted_timestamps_untouched() {
        let output = canonical_yaml(
            "created: 2024-01-01T00:00:00+00:00\ntitle: \"2024-01-01 10:00:00\"\ntags:\n  - \"2024-01-01T00:00:00+00:00\"\n  - 2024-01-01 10:00:00\n",
        );

        assert_eq!(
            output,
            json!({
                "created": "2024-01-01T00:00:00Z",
                "title": "2024-01-01 10:00:00",
                "tags": ["2024-01-01T00:00:00+00:00", "2024-01-01T10:00:00"]
            })
        );
    }

    #[test]
    fn test_unlisted_paths_untouched() {
        let input = json!({"a": "2024-01-01T00:00:00+00:00", "b": ["2024-01-01T00:00:00+00:00"]});
        assert_eq!(canonicalize(&input, &ScalarPaths::new()), input);

        let plain: ScalarPaths = ["/b/0".to_string()].into();
        assert_eq!(
            canonicalize(&input, &plain),
            json!({"a": "2024-01-01T00:00:00+00:00", "b": ["2024-01-01T00:00:00Z"]})
        );
    }

    #[test]
    fn test_idempotent() {
        let text = "a: 2024-1-5 3:04:05.25 -02:30\nb:\n  - 2024-01-01\n  - 2024-01-01T00:00:00+00:00\n  - text\nc:\n  d: 1.5\n";
        let plain = plain_scalar_paths(text).unwrap();
        let input: Value = serde_yaml::from_str(text).unwrap();

        let once = canonicalize(&input, &plain);
        assert_eq!(canonicalize(&once, &plain), once);
    }
}
