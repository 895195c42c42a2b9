use crate::cmd::console::state::Modal;
use crate::cmd::console::widgets::formatters::centered_rect;
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

/// Renders a centered popup over the current screen
pub(crate) fn render_modal(modal: &Modal, area: Rect, frame: &mut Frame) {
    let (title, body, hint, color) = match modal {
        Modal::Confirm(action) => (
            format!(" {} {} ", action.icon(), action.label()),
            action.confirm_message().to_string(),
            Line::from(vec![
                " Confirm ".into(),
                "<y/Enter> ".blue().bold(),
                " Cancel ".into(),
                "<n/Esc> ".blue().bold(),
            ]),
            Color::Yellow,
        ),
        Modal::Pending(action) => (
            format!(" {} {} ", action.icon(), action.label()),
            format!("Waiting for the {} request...", action.verb()),
            Line::from(""),
            Color::DarkGray,
        ),
        Modal::Alert { message, follow_up } => (
            " Result ".to_string(),
            message.clone(),
            Line::from(vec![" Close ".into(), "<Enter/Esc> ".blue().bold()]),
            if follow_up.is_some() {
                Color::Green
            } else {
                Color::Red
            },
        ),
    };

    let popup_area = centered_rect(area, 60, 8);

    // Clear the area to create a complete overlay
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(title)
        .title_bottom(hint)
        .border_set(border::DOUBLE)
        .border_style(Style::default().fg(color));

    let text = vec![Line::from(""), Line::from(body).centered()];
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}
