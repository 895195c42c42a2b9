use crate::cmd::console::widgets::formatters::truncate_right;
use loglens::views::{Grid, VolumeCard};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::Text,
    widgets::{Block, HighlightSpacing, Row, Table, TableState},
    Frame,
};

use super::placeholder::render_placeholder;

pub(crate) fn render_volumes_panel(
    grid: Option<&Grid<VolumeCard>>,
    area: Rect,
    frame: &mut Frame,
    table_state: &mut TableState,
) {
    let cards = match grid {
        None => return render_placeholder("Volumes", "Loading...", Color::DarkGray, area, frame),
        Some(Grid::Cards(cards)) => cards,
        Some(Grid::Empty(message)) => {
            return render_placeholder("Volumes", message, Color::DarkGray, area, frame)
        }
        Some(Grid::Failed(message)) => {
            return render_placeholder("Volumes", message, Color::Red, area, frame)
        }
    };

    let header = Row::new(vec!["Name", "Scope", "Driver", "Mountpoint"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .height(1);

    let mountpoint_width = (area.width.saturating_sub(50) as usize).max(20);

    let rows: Vec<Row> = cards
        .iter()
        .map(|card| {
            let mountpoint = if card.mountpoint == "Not mounted" {
                Text::from(card.mountpoint.clone()).style(Style::default().fg(Color::DarkGray))
            } else {
                Text::from(truncate_right(&card.mountpoint, mountpoint_width))
            };
            Row::new(vec![
                Text::from(card.display_name.clone()),
                Text::from(card.scope.clone()),
                Text::from(card.driver.clone()),
                mountpoint,
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(24),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Min(20),
    ];

    let position = table_state.selected().map(|i| i + 1).unwrap_or(0);
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::bordered()
                .title(format!(" Volumes [{}/{}] ", position, cards.len()))
                .border_set(border::THICK),
        )
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .bg(Color::DarkGray),
        )
        .highlight_symbol(Text::from(">"))
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(table, area, table_state);
}
