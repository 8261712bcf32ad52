//! Parses the `range` query parameter (`1m,5m,15m,30m,60m,1h,6h,24h,7d,30d,90d`)
//! into a lookback [`chrono::Duration`] from now.

use chrono::Duration;

pub fn parse_range(range: &str) -> Option<Duration> {
    let (value, unit) = range.split_at(range.len().saturating_sub(1));
    let n: i64 = value.parse().ok()?;

    match unit {
        "m" => Some(Duration::minutes(n)),
        "h" => Some(Duration::hours(n)),
        "d" => Some(Duration::days(n)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minute_and_hour_and_day_ranges() {
        assert_eq!(parse_range("1m"), Some(Duration::minutes(1)));
        assert_eq!(parse_range("60m"), Some(Duration::minutes(60)));
        assert_eq!(parse_range("6h"), Some(Duration::hours(6)));
        assert_eq!(parse_range("90d"), Some(Duration::days(90)));
    }

    #[test]
    fn rejects_unrecognized_units() {
        assert_eq!(parse_range("1w"), None);
        assert_eq!(parse_range(""), None);
    }
}
