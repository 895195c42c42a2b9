use loglens::views::DashboardView;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, Paragraph, TableState},
    Frame,
};

use super::containers::render_container_grid;
use super::placeholder::render_placeholder;

fn metric_card(title: &str, value: Option<u64>, area: Rect, frame: &mut Frame) {
    let value = value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    let text = vec![Line::from(value.bold().cyan()).centered()];
    let block = Block::bordered()
        .title(format!(" {} ", title))
        .border_set(border::PLAIN);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// Renders the summary counters and the running containers
pub(crate) fn render_dashboard(
    view: Option<&DashboardView>,
    area: Rect,
    frame: &mut Frame,
    table_state: &mut TableState,
) {
    let Some(view) = view else {
        render_placeholder("Dashboard", "Loading dashboard...", Color::DarkGray, area, frame);
        return;
    };

    let [metrics_area, list_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
    let [total_area, running_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(metrics_area);

    metric_card("Total Containers", view.total_containers, total_area, frame);
    metric_card("Running Containers", view.running_containers, running_area, frame);

    render_container_grid(
        Some(&view.running),
        "Running Containers",
        list_area,
        frame,
        table_state,
    );
}
