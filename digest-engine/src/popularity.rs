//! Popularity magnitude parsing

use digest_core::Popularity;

const YI: f64 = 100_000_000.0;
const WAN: f64 = 10_000.0;

/// Parse a heat value such as `"1.2万"`, `"3亿"` or `"45,678"`
///
/// Everything except ASCII digits and `.` is ignored once the magnitude
/// suffix has been read. Returns `None` when no positive number remains.
pub fn parse_popularity(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let multiplier = if s.contains('亿') {
        YI
    } else if s.contains('万') {
        WAN
    } else {
        1.0
    };

    let digits: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value = digits.parse::<f64>().ok()? * multiplier;

    (value.is_finite() && value > 0.0).then_some(value)
}

/// Numeric value of a reported popularity, `None` when absent or unusable
pub fn popularity_value(popularity: &Popularity) -> Option<f64> {
    match popularity {
        Popularity::Count(value) => (value.is_finite() && *value > 0.0).then_some(*value),
        Popularity::Text(text) => parse_popularity(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_popularity("12345"), Some(12345.0));
        assert_eq!(parse_popularity("45,678"), Some(45678.0));
        assert_eq!(parse_popularity(" 98.5 "), Some(98.5));
    }

    #[test]
    fn test_chinese_magnitudes() {
        assert_eq!(parse_popularity("1.2万"), Some(12_000.0));
        assert_eq!(parse_popularity("3亿"), Some(300_000_000.0));
        assert_eq!(parse_popularity("热度 520万"), Some(5_200_000.0));
    }

    #[test]
    fn test_unparsable_is_none() {
        assert_eq!(parse_popularity(""), None);
        assert_eq!(parse_popularity("爆"), None);
        assert_eq!(parse_popularity("1.2.3万"), None);
        assert_eq!(parse_popularity("0"), None);
    }

    #[test]
    fn test_popularity_value() {
        assert_eq!(popularity_value(&Popularity::Count(500.0)), Some(500.0));
        assert_eq!(popularity_value(&Popularity::Count(-1.0)), None);
        assert_eq!(popularity_value(&Popularity::Text("2万".into())), Some(20_000.0));
    }
}
