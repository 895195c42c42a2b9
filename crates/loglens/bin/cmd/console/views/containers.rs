use crate::cmd::console::widgets::formatters::{status_style, truncate_left};
use loglens::views::{ContainerCard, Grid};
use loglens::ContainerFilter;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::Text,
    widgets::{Block, Cell, HighlightSpacing, Row, Table, TableState, Tabs},
    Frame,
};

use super::placeholder::render_placeholder;

fn filter_title(filter: ContainerFilter) -> &'static str {
    match filter {
        ContainerFilter::All => "All",
        ContainerFilter::Running => "Running",
        ContainerFilter::Stopped => "Stopped",
    }
}

/// Renders the filter tabs and the container list below them
pub(crate) fn render_containers_screen(
    filter: ContainerFilter,
    grid: Option<&Grid<ContainerCard>>,
    area: Rect,
    frame: &mut Frame,
    table_state: &mut TableState,
) {
    let [tabs_area, list_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let selected = ContainerFilter::ALL
        .iter()
        .position(|f| *f == filter)
        .unwrap_or(0);
    let tabs = Tabs::new(ContainerFilter::ALL.iter().map(|f| filter_title(*f)))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::bordered()
                .title(" Filter ")
                .border_set(border::PLAIN),
        );
    frame.render_widget(tabs, tabs_area);

    render_container_grid(grid, "Containers", list_area, frame, table_state);
}

/// Renders a container grid: a table, an empty-state message or an error
pub(crate) fn render_container_grid(
    grid: Option<&Grid<ContainerCard>>,
    title: &str,
    area: Rect,
    frame: &mut Frame,
    table_state: &mut TableState,
) {
    match grid {
        None => render_placeholder(title, "Loading...", Color::DarkGray, area, frame),
        Some(Grid::Cards(cards)) => render_container_table(cards, title, area, frame, table_state),
        Some(Grid::Empty(message)) => render_placeholder(title, message, Color::DarkGray, area, frame),
        Some(Grid::Failed(message)) => render_placeholder(title, message, Color::Red, area, frame),
    }
}

fn render_container_table(
    cards: &[ContainerCard],
    title: &str,
    area: Rect,
    frame: &mut Frame,
    table_state: &mut TableState,
) {
    let image_width = ((area.width.saturating_sub(10) as f32 * 0.35) as usize).max(16);

    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Name"),
        Cell::from("Image"),
        Cell::from("State"),
    ])
    .style(header_style)
    .height(1);

    let rows: Vec<Row> = cards
        .iter()
        .map(|card| {
            Row::new(vec![
                Cell::from(card.short_id.clone()),
                Cell::from(card.name.clone()),
                Cell::from(truncate_left(&card.image, image_width)),
                Cell::from(card.state.clone()).style(status_style(card.status)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(14),     // ID
        Constraint::Percentage(30), // Name
        Constraint::Percentage(40), // Image
        Constraint::Min(10),        // State
    ];

    let selected_row_style = Style::default()
        .add_modifier(Modifier::REVERSED)
        .bg(Color::DarkGray);

    let position = table_state.selected().map(|i| i + 1).unwrap_or(0);
    let block = Block::bordered()
        .title(format!(" {} [{}/{}] ", title, position, cards.len()))
        .border_set(border::THICK);

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(selected_row_style)
        .highlight_symbol(Text::from(">"))
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(table, area, table_state);
}
