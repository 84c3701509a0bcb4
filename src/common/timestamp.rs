use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Creation timestamp as the backend sends it.
///
/// The wire format is not uniform across endpoints: the same field arrives as
/// an ISO-8601 string, a comma-joined numeric tuple ("2025,5,3,14,22,7"), a
/// JSON array of integers, or a compact digit string (yyyyMMddHHmmss). The raw
/// value is kept around because backward pagination echoes it verbatim as the
/// `beforeCreatedAt` cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireTimestamp(Value);

impl WireTimestamp {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(Value::String(dt.to_rfc3339()))
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Raw form suitable for the `beforeCreatedAt` query parameter.
    pub fn cursor_value(&self) -> Option<String> {
        match &self.0 {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|v| v.as_i64().map(|n| n.to_string()))
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(","))
                }
            }
            _ => None,
        }
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match &self.0 {
            Value::Array(items) => {
                let parts: Vec<i64> = items.iter().filter_map(Value::as_i64).collect();
                datetime_from_parts(&parts)
            }
            Value::String(s) => parse_string(s),
            Value::Number(n) => {
                let raw = n.as_i64()?;
                // Heuristic: epoch values past ~2001-09 in millis.
                if raw >= 1_000_000_000_000 {
                    Utc.timestamp_millis_opt(raw).single()
                } else {
                    Utc.timestamp_opt(raw, 0).single()
                }
            }
            _ => None,
        }
    }

    /// "HH:MM" label for message bubbles; empty when unparsable.
    pub fn time_label(&self) -> String {
        self.to_datetime()
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_default()
    }

    /// Calendar-day label used for day separators; empty when unparsable.
    pub fn date_label(&self) -> String {
        self.to_datetime()
            .map(|dt| dt.format("%Y-%m-%d (%a)").to_string())
            .unwrap_or_default()
    }
}

fn parse_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.contains(',') {
        let parts: Vec<i64> = s
            .split(',')
            .filter_map(|p| p.trim().parse::<i64>().ok())
            .collect();
        return datetime_from_parts(&parts);
    }
    if s.len() >= 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        return parse_compact_digits(s);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // ISO local datetime without offset; the backend reports wall-clock time.
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// [year, month, day, hour, minute, second, ...]; month is 1-based on the wire.
fn datetime_from_parts(parts: &[i64]) -> Option<DateTime<Utc>> {
    if parts.len() < 3 {
        return None;
    }
    let get = |i: usize| parts.get(i).copied().unwrap_or(0);
    Utc.with_ymd_and_hms(
        get(0) as i32,
        get(1) as u32,
        get(2) as u32,
        get(3) as u32,
        get(4) as u32,
        get(5) as u32,
    )
    .single()
}

fn parse_compact_digits(s: &str) -> Option<DateTime<Utc>> {
    let digit = |range: std::ops::Range<usize>| -> i64 {
        s.get(range).and_then(|p| p.parse::<i64>().ok()).unwrap_or(0)
    };
    let parts = [
        digit(0..4),
        digit(4..6),
        digit(6..8),
        if s.len() >= 10 { digit(8..10) } else { 0 },
        if s.len() >= 12 { digit(10..12) } else { 0 },
        if s.len() >= 14 { digit(12..14) } else { 0 },
    ];
    datetime_from_parts(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use chrono::Timelike;
    use serde_json::json;

    fn ts(v: Value) -> WireTimestamp {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn parses_iso_string() {
        let dt = ts(json!("2025-05-03T14:22:07")).to_datetime().unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 5, 3));
        assert_eq!((dt.hour(), dt.minute()), (14, 22));
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = ts(json!("2025-05-03T14:22:07+00:00")).to_datetime().unwrap();
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn parses_comma_tuple() {
        let dt = ts(json!("2025,5,3,14,22,7")).to_datetime().unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 5, 3));
        assert_eq!(dt.second(), 7);
    }

    #[test]
    fn parses_int_array() {
        let dt = ts(json!([2025, 5, 3, 14, 22, 7])).to_datetime().unwrap();
        assert_eq!((dt.year(), dt.hour()), (2025, 14));
    }

    #[test]
    fn parses_compact_digits() {
        let dt = ts(json!("20250503142207")).to_datetime().unwrap();
        assert_eq!((dt.month(), dt.minute()), (5, 22));
        // Date-only compact form.
        let dt = ts(json!("20250503")).to_datetime().unwrap();
        assert_eq!((dt.day(), dt.hour()), (3, 0));
    }

    #[test]
    fn garbage_is_none_not_panic() {
        assert!(ts(json!("not a date")).to_datetime().is_none());
        assert!(ts(json!(null)).to_datetime().is_none());
        assert!(ts(json!([2025])).to_datetime().is_none());
        assert!(ts(json!({"y": 2025})).to_datetime().is_none());
        assert_eq!(ts(json!("not a date")).time_label(), "");
    }

    #[test]
    fn cursor_value_echoes_wire_shape() {
        assert_eq!(
            ts(json!("2025-05-03T14:22:07")).cursor_value().unwrap(),
            "2025-05-03T14:22:07"
        );
        assert_eq!(
            ts(json!([2025, 5, 3, 14, 22, 7])).cursor_value().unwrap(),
            "2025,5,3,14,22,7"
        );
        assert!(ts(json!(null)).cursor_value().is_none());
    }
}
