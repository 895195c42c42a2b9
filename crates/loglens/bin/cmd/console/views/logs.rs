use loglens::{LoadPhase, LogRow, LogStreamLoader};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

fn row_style(row: &LogRow) -> Style {
    match row {
        LogRow::Line(_) | LogRow::Sentinel => Style::default(),
        LogRow::Loading => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        LogRow::Error(_) => Style::default().fg(Color::Red),
        LogRow::End(_) => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

/// Renders the visible slice of the log buffer.
///
/// The buffer is resized to the panel first, so wrapping and the scroll
/// range always match what is on screen.
pub(crate) fn render_logs_panel(loader: &mut LogStreamLoader, area: Rect, frame: &mut Frame) {
    let state = loader.state();
    let phase = loader.phase();

    let mut title = vec![Span::raw(format!(" Logs (page {}) ", state.current_page))];
    match phase {
        LoadPhase::Loading => title.push(Span::styled("loading ", Style::default().fg(Color::Yellow))),
        LoadPhase::Errored => title.push(Span::styled("error ", Style::default().fg(Color::Red))),
        LoadPhase::Exhausted | LoadPhase::Idle => {}
    }

    let block = Block::bordered()
        .title(Line::from(title))
        .border_set(border::THICK);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    loader
        .buffer_mut()
        .resize(inner_area.width as usize, inner_area.height as usize);

    let buffer = loader.buffer();
    let lines: Vec<Line> = buffer
        .visible_segments()
        .into_iter()
        .map(|(row, text)| Line::from(Span::styled(text, row_style(row))))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner_area);

    if buffer.max_offset() > 0 && area.width > 20 {
        let position = format!(" {}/{} ", buffer.scroll_offset(), buffer.max_offset());
        let x = area.x + area.width.saturating_sub(position.len() as u16 + 2);
        let y = area.y + area.height.saturating_sub(1);
        frame
            .buffer_mut()
            .set_string(x, y, position, Style::default().fg(Color::DarkGray));
    }
}
