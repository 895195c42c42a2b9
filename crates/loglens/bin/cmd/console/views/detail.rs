use crate::cmd::console::state::{DetailState, DetailTab};
use crate::cmd::console::widgets::formatters::status_style;
use loglens::views::{ContainerOverview, DetailView, StatsView};
use loglens::ContainerAction;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use super::logs::render_logs_panel;
use super::placeholder::render_placeholder;

/// Renders the container header, the tab strip and the active tab
pub(crate) fn render_detail(detail: &mut DetailState, area: Rect, frame: &mut Frame) {
    let [header_area, tabs_area, body_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    match &detail.view {
        None => {
            render_placeholder("Container", "Loading container...", Color::DarkGray, area, frame);
            return;
        }
        Some(DetailView::Failed { title, message }) => {
            let text = vec![
                Line::from(""),
                Line::from(*title).red().bold().centered(),
                Line::from(""),
                Line::from(message.as_str()).red().centered(),
            ];
            let block = Block::bordered().border_set(border::THICK);
            frame.render_widget(
                Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
                area,
            );
            return;
        }
        Some(DetailView::Loaded(overview)) => render_header(overview, header_area, frame),
    }

    let tabs = Tabs::new(DetailTab::ALL.iter().map(|tab| tab.title()))
        .select(detail.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::bordered().border_set(border::PLAIN));
    frame.render_widget(tabs, tabs_area);

    match detail.tab {
        DetailTab::Overview => {
            if let Some(DetailView::Loaded(overview)) = &detail.view {
                render_overview(overview, body_area, frame);
            }
        }
        DetailTab::Logs => render_logs_panel(&mut detail.loader, body_area, frame),
        DetailTab::Stats => match &detail.stats {
            None => render_placeholder("Stats", "Loading stats...", Color::DarkGray, body_area, frame),
            Some(Err(message)) => render_placeholder("Stats", message, Color::Red, body_area, frame),
            Some(Ok(stats)) => render_stats(stats, body_area, frame),
        },
    }
}

fn action_hint(action: ContainerAction, key: &'static str) -> Vec<Span<'static>> {
    vec![
        format!(" {} {} ", action.icon(), action.label()).into(),
        format!("<{}>", key).blue().bold(),
        " ".into(),
    ]
}

fn render_header(overview: &ContainerOverview, area: Rect, frame: &mut Frame) {
    let mut spans = vec![
        Span::from(format!(" {} ", overview.title)).bold(),
        Span::styled(
            format!("[{}] ", overview.status),
            status_style(overview.status_class),
        ),
        "|".dark_gray(),
    ];
    spans.extend(action_hint(overview.toggle, "s"));
    spans.extend(action_hint(ContainerAction::Restart, "R"));
    spans.extend(action_hint(ContainerAction::Delete, "D"));

    let block = Block::bordered()
        .title(" Container ")
        .border_set(border::THICK);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_overview(overview: &ContainerOverview, area: Rect, frame: &mut Frame) {
    let rows: Vec<Row> = overview
        .rows
        .iter()
        .map(|(label, value)| {
            let value_style = if *label == "Status" {
                status_style(overview.status_class)
            } else {
                Style::default()
            };
            Row::new(vec![
                Span::styled(*label, Style::default().fg(Color::Yellow)),
                Span::styled(value.clone(), value_style),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(10), Constraint::Min(10)])
        .block(
            Block::bordered()
                .title(" Overview ")
                .border_set(border::THICK),
        )
        .column_spacing(2);

    frame.render_widget(table, area);
}

fn render_stats(stats: &StatsView, area: Rect, frame: &mut Frame) {
    let block = Block::bordered()
        .title(" Stats ")
        .border_set(border::THICK);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let [cpu_area, memory_area, gauge_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(inner_area);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Yellow));
    let cpu = vec![
        Line::from("CPU".bold()),
        Line::from(vec![label("  Total usage:  "), stats.cpu_total.clone().into()]),
        Line::from(vec![label("  User mode:    "), stats.cpu_user.clone().into()]),
        Line::from(vec![label("  System CPU:   "), stats.system_cpu.clone().into()]),
    ];
    frame.render_widget(Paragraph::new(cpu), cpu_area);

    let memory = vec![
        Line::from("Memory".bold()),
        Line::from(vec![label("  Usage:        "), stats.memory_usage.clone().into()]),
        Line::from(vec![label("  Limit:        "), stats.memory_limit.clone().into()]),
    ];
    frame.render_widget(Paragraph::new(memory), memory_area);

    if let Some(percent) = stats.memory_percent {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio((percent / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.1}%", percent));
        frame.render_widget(gauge, gauge_area);
    }
}
