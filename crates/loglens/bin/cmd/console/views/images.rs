use crate::cmd::console::widgets::formatters::truncate_left;
use loglens::views::{Grid, ImageCard};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::Text,
    widgets::{Block, HighlightSpacing, Row, Table, TableState},
    Frame,
};

use super::placeholder::render_placeholder;

/// Renders the image list with age and size
pub(crate) fn render_images_panel(
    grid: Option<&Grid<ImageCard>>,
    area: Rect,
    frame: &mut Frame,
    table_state: &mut TableState,
) {
    let cards = match grid {
        None => return render_placeholder("Images", "Loading...", Color::DarkGray, area, frame),
        Some(Grid::Cards(cards)) => cards,
        Some(Grid::Empty(message)) => {
            return render_placeholder("Images", message, Color::DarkGray, area, frame)
        }
        Some(Grid::Failed(message)) => {
            return render_placeholder("Images", message, Color::Red, area, frame)
        }
    };

    let name_width = ((area.width.saturating_sub(10) as f32 * 0.45) as usize).max(20);

    let header = Row::new(vec!["Name", "ID", "Created", "Size"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .height(1);

    let rows: Vec<Row> = cards
        .iter()
        .map(|card| {
            Row::new(vec![
                truncate_left(&card.name, name_width),
                card.short_id.clone(),
                card.created.clone(),
                card.size.clone(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(45),
        Constraint::Length(14),
        Constraint::Percentage(25),
        Constraint::Min(10),
    ];

    let position = table_state.selected().map(|i| i + 1).unwrap_or(0);
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::bordered()
                .title(format!(" Images [{}/{}] ", position, cards.len()))
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
