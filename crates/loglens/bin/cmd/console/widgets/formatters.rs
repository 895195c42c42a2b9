use loglens::views::StatusClass;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
};
use std::time::Duration;

pub(crate) fn truncate_left(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        let tail: String = s.chars().skip(len - keep).collect();
        format!("...{}", tail)
    }
}

pub(crate) fn truncate_right(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

pub(crate) fn status_style(status: StatusClass) -> Style {
    let color = match status {
        StatusClass::Running => Color::Green,
        StatusClass::Paused | StatusClass::Restarting => Color::Yellow,
        StatusClass::Exited | StatusClass::Dead => Color::Red,
        StatusClass::Created => Color::Blue,
        StatusClass::Other => Color::Gray,
    };
    Style::default().fg(color)
}

/// Formats the time since the last refresh as "now", "1s ago", "2m ago", etc.
pub(crate) fn format_time_ago(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs == 0 {
        "now".to_string()
    } else if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

/// A rectangle centered in `area`, sized as a percentage of it.
pub(crate) fn centered_rect(area: Rect, width_pct: u16, height: u16) -> Rect {
    let width = (area.width as u32 * width_pct as u32 / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
