use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::border,
    widgets::Block,
    Frame,
};

/// Renders a bordered panel with a single centered message
pub(crate) fn render_placeholder(title: &str, message: &str, color: Color, area: Rect, frame: &mut Frame) {
    let block = Block::bordered()
        .title(format!(" {} ", title))
        .border_set(border::THICK);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let message_width = message.chars().count() as u16;
    let x = inner_area.x + (inner_area.width.saturating_sub(message_width)) / 2;
    let y = inner_area.y + inner_area.height / 2;

    if x < inner_area.x + inner_area.width && y < inner_area.y + inner_area.height {
        frame.buffer_mut().set_stringn(
            x,
            y,
            message,
            inner_area.width as usize,
            Style::default().fg(color),
        );
    }
}
