//! Display helpers for the dashboard page.

const TIME_UNITS: [(&str, i64); 7] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// "3 minutes ago", "1 day ago", or "just now". Both arguments in epoch millis.
pub fn format_time_ago(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = now_ms.saturating_sub(timestamp_ms).div_euclid(1000);
    for (unit, unit_secs) in TIME_UNITS {
        let n = seconds / unit_secs;
        if n >= 1 {
            return if n == 1 {
                format!("1 {} ago", unit)
            } else {
                format!("{} {}s ago", n, unit)
            };
        }
    }
    "just now".to_string()
}

pub fn format_eth_amount(amount: f64) -> String {
    format!("{:.6}", amount)
}

/// `0x1234...cdef` style. `chars` characters are kept on each side of the
/// ellipsis, not counting the `0x` prefix.
pub fn shorten_address(address: &str, chars: usize) -> String {
    if address.is_empty() {
        return String::new();
    }
    let head = chars + 2;
    if address.len() <= head + chars || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..head], &address[address.len() - chars..])
}

pub fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_time_ago() {
        assert_eq!(format_time_ago(NOW, NOW), "just now");
        assert_eq!(format_time_ago(NOW - 999, NOW), "just now");
        assert_eq!(format_time_ago(NOW - 1_000, NOW), "1 second ago");
        assert_eq!(format_time_ago(NOW - 45_000, NOW), "45 seconds ago");
        assert_eq!(format_time_ago(NOW - 60_000, NOW), "1 minute ago");
        assert_eq!(format_time_ago(NOW - 2 * 3_600_000, NOW), "2 hours ago");
        assert_eq!(format_time_ago(NOW - 8 * 86_400_000, NOW), "1 week ago");
        assert_eq!(format_time_ago(NOW - 400 * 86_400_000, NOW), "1 year ago");
        // clock skew: a future timestamp is still "just now"
        assert_eq!(format_time_ago(NOW + 5_000, NOW), "just now");
    }

    #[test]
    fn test_time_ago_extreme_timestamps() {
        let ancient = format_time_ago(i64::MIN, NOW);
        assert!(ancient.ends_with(" years ago"), "{}", ancient);
        assert_eq!(format_time_ago(i64::MAX, NOW), "just now");
        assert_eq!(format_time_ago(i64::MAX, i64::MIN), "just now");
    }

    #[test]
    fn test_eth_amount() {
        assert_eq!(format_eth_amount(1.5), "1.500000");
        assert_eq!(format_eth_amount(0.01), "0.010000");
        assert_eq!(format_eth_amount(0.0000001), "0.000000");
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("0x1111111111111111111111111111111111112222", 4),
            "0x1111...2222"
        );
        assert_eq!(shorten_address("", 4), "");
        assert_eq!(shorten_address("0xabc", 4), "0xabc");
    }

    #[test]
    fn test_uptime() {
        assert_eq!(format_uptime(5), "5s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3_725), "1h 2m 5s");
    }
}
