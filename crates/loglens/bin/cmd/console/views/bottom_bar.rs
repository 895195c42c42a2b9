use ratatui::{
    layout::Rect,
    style::Stylize,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::cmd::console::state::{DetailTab, Modal, Screen};

/// Renders the bottom controls bar showing context-aware keybindings
pub fn render_bottom_bar(
    frame: &mut Frame,
    area: Rect,
    screen: Screen,
    tab: Option<DetailTab>,
    modal: Option<&Modal>,
    refresh_status: Option<String>,
) {
    let mut spans: Vec<Span> = match (modal, screen, tab) {
        (Some(Modal::Confirm(_)), _, _) => vec![
            " Confirm ".into(),
            "<y> ".blue().bold(),
            " | Cancel ".into(),
            "<n/Esc> ".blue().bold(),
        ],
        (Some(Modal::Pending(_)), _, _) => vec![" Working... ".into()],
        (Some(Modal::Alert { .. }), _, _) => vec![" Close ".into(), "<Enter/Esc> ".blue().bold()],
        (None, Screen::Detail, Some(DetailTab::Logs)) => vec![
            " Back ".into(),
            "<Esc> ".blue().bold(),
            " | Tab ".into(),
            "<Tab> ".blue().bold(),
            " | Scroll ".into(),
            "<↑↓/jk PgUp PgDn> ".blue().bold(),
            " | Top/Bottom ".into(),
            "<g/G> ".blue().bold(),
        ],
        (None, Screen::Detail, _) => vec![
            " Back ".into(),
            "<Esc> ".blue().bold(),
            " | Tab ".into(),
            "<Tab> ".blue().bold(),
            " | Start/Stop ".into(),
            "<s> ".blue().bold(),
            " | Restart ".into(),
            "<R> ".blue().bold(),
            " | Delete ".into(),
            "<D> ".blue().bold(),
            " | Refresh ".into(),
            "<r> ".blue().bold(),
        ],
        (None, Screen::Containers, _) => vec![
            " Quit ".into(),
            "<q> ".blue().bold(),
            " | Screens ".into(),
            "<1-4> ".blue().bold(),
            " | Navigate ".into(),
            "<↑↓/jk> ".blue().bold(),
            " | Filter ".into(),
            "<←→/hl> ".blue().bold(),
            " | Open ".into(),
            "<Enter> ".blue().bold(),
            " | Refresh ".into(),
            "<r> ".blue().bold(),
        ],
        (None, Screen::Dashboard, _) => vec![
            " Quit ".into(),
            "<q> ".blue().bold(),
            " | Screens ".into(),
            "<1-4> ".blue().bold(),
            " | Navigate ".into(),
            "<↑↓/jk> ".blue().bold(),
            " | Open ".into(),
            "<Enter> ".blue().bold(),
            " | Refresh ".into(),
            "<r> ".blue().bold(),
        ],
        (None, Screen::Images | Screen::Volumes, _) => vec![
            " Quit ".into(),
            "<q> ".blue().bold(),
            " | Screens ".into(),
            "<1-4> ".blue().bold(),
            " | Navigate ".into(),
            "<↑↓/jk> ".blue().bold(),
            " | Refresh ".into(),
            "<r> ".blue().bold(),
        ],
    };

    if let Some(status) = refresh_status {
        spans.push(" | ".into());
        spans.push(status.yellow());
    }

    let block = Block::bordered()
        .title(" Controls ")
        .border_set(border::PLAIN);

    let paragraph = Paragraph::new(Line::from(spans)).block(block).left_aligned();

    frame.render_widget(paragraph, area);
}
