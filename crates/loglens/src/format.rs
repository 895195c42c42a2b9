//! Data-shaping helpers shared by the console views and the `list` command.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::ContainerSummary;

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

/// Formats a byte count as `B`, `KB` or `MB`, with two decimals above one kilobyte.
pub fn format_size(bytes: u64) -> String {
    if bytes >= MB {
        format!("{:.2}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2}KB", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Age of an image created at `created` (unix seconds) in whole days, weeks or months.
pub fn image_age(created: i64, now: DateTime<Utc>) -> String {
    let created = Utc
        .timestamp_opt(created, 0)
        .single()
        .unwrap_or(now);
    let days = (now - created).num_days().abs();

    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        7..=29 => {
            let weeks = days / 7;
            if weeks == 1 {
                "1 week ago".to_string()
            } else {
                format!("{} weeks ago", weeks)
            }
        }
        _ => {
            let months = days / 30;
            if months == 1 {
                "1 month ago".to_string()
            } else {
                format!("{} months ago", months)
            }
        }
    }
}

/// Human-readable creation time for an RFC 3339 timestamp.
///
/// Anything that does not parse is returned unchanged, so values the backend
/// has already formatted pass straight through.
pub fn relative_created(raw: &str, now: DateTime<Utc>) -> String {
    let Ok(created) = DateTime::parse_from_rfc3339(raw) else {
        return raw.to_string();
    };
    let elapsed = now.signed_duration_since(created);

    if elapsed < Duration::minutes(1) {
        "Just now".to_string()
    } else if elapsed < Duration::hours(1) {
        let minutes = elapsed.num_minutes();
        if minutes == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{} minutes ago", minutes)
        }
    } else if elapsed < Duration::hours(24) {
        let hours = elapsed.num_hours();
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if elapsed < Duration::hours(48) {
        "Yesterday".to_string()
    } else if elapsed < Duration::days(7) {
        format!("{} days ago", elapsed.num_days())
    } else {
        created.format("%b %-d, %Y at %-I:%M %p").to_string()
    }
}

/// First 12 characters of an identifier, without a `sha256:` digest prefix.
pub fn short_id(id: &str) -> String {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    id.chars().take(12).collect()
}

/// Display name for a container: its first name without the leading `/`, or its ID.
pub fn container_name(container: &ContainerSummary) -> String {
    match container.names.first() {
        Some(name) if !name.is_empty() => name.replacen('/', "", 1),
        _ => container.id.clone(),
    }
}

/// Volume names longer than 20 characters (usually hashes) are cut to 12 plus `...`.
pub fn volume_display_name(name: &str) -> String {
    if name.chars().count() > 20 {
        let head: String = name.chars().take(12).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-20T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(1024), "1.00KB");
        assert_eq!(format_size(1536), "1.50KB");
        assert_eq!(format_size(5 * MB + MB / 4), "5.25MB");
    }

    #[test]
    fn test_image_age_buckets() {
        let now = now();
        let ts = |days: i64| (now - Duration::days(days)).timestamp();
        assert_eq!(image_age(ts(0), now), "Today");
        assert_eq!(image_age(ts(1), now), "Yesterday");
        assert_eq!(image_age(ts(4), now), "4 days ago");
        assert_eq!(image_age(ts(7), now), "1 week ago");
        assert_eq!(image_age(ts(20), now), "2 weeks ago");
        assert_eq!(image_age(ts(35), now), "1 month ago");
        assert_eq!(image_age(ts(95), now), "3 months ago");
    }

    #[test]
    fn test_relative_created() {
        let now = now();
        assert_eq!(relative_created("2024-03-20T11:59:30Z", now), "Just now");
        assert_eq!(relative_created("2024-03-20T11:59:00Z", now), "1 minute ago");
        assert_eq!(relative_created("2024-03-20T11:15:00Z", now), "45 minutes ago");
        assert_eq!(relative_created("2024-03-20T09:00:00Z", now), "3 hours ago");
        assert_eq!(relative_created("2024-03-19T06:00:00Z", now), "Yesterday");
        assert_eq!(relative_created("2024-03-16T12:00:00Z", now), "4 days ago");
        assert_eq!(
            relative_created("2024-01-02T15:04:05Z", now),
            "Jan 2, 2024 at 3:04 PM"
        );
        assert_eq!(relative_created("2 hours ago", now), "2 hours ago");
    }

    #[test]
    fn test_identifiers_and_names() {
        assert_eq!(short_id("sha256:0123456789abcdef0123"), "0123456789ab");
        assert_eq!(short_id("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");

        let named = ContainerSummary {
            id: "0123456789ab".into(),
            names: vec!["/web".into()],
            ..Default::default()
        };
        assert_eq!(container_name(&named), "web");
        let unnamed = ContainerSummary {
            id: "0123456789ab".into(),
            ..Default::default()
        };
        assert_eq!(container_name(&unnamed), "0123456789ab");

        assert_eq!(volume_display_name("data"), "data");
        assert_eq!(
            volume_display_name("3f1c2b7a9d0e4f5a6b7c8d9e0f1a2b3c"),
            "3f1c2b7a9d0e..."
        );
    }
}
