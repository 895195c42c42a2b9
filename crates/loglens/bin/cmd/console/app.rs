use chrono::Utc;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use eyre::Result;
use loglens::views::{
    containers_grid, dashboard_view, detail_view, images_grid, stats_view, volumes_grid,
    ContainerCard, DashboardView, Grid, ImageCard, VolumeCard,
};
use loglens::{Completion, ContainerAction, ContainerFilter, Fetcher, FollowUp, Job, PageRequest};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, TableState, Tabs},
    DefaultTerminal, Frame,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::state::{DetailState, DetailTab, Modal, Screen};
use super::views::bottom_bar::render_bottom_bar;
use super::views::containers::render_containers_screen;
use super::views::dashboard::render_dashboard;
use super::views::detail::render_detail;
use super::views::images::render_images_panel;
use super::views::popup::render_modal;
use super::views::volumes::render_volumes_panel;
use super::widgets::formatters::format_time_ago;
use crate::cmd::BackendArgs;

#[derive(Debug, Parser)]
pub struct ConsoleArgs {
    /// Seconds between dashboard refreshes
    #[arg(long, default_value = "30")]
    pub refresh_secs: u64,
}

impl Default for ConsoleArgs {
    fn default() -> Self {
        Self { refresh_secs: 30 }
    }
}

pub(crate) struct App {
    fetcher: Fetcher,
    base_url: String,
    exit: bool,
    refresh_interval: Duration,
    last_dashboard_fetch: Option<Instant>,
    last_render_duration: Duration,
    screen: Screen,
    table_state: TableState,
    filter: ContainerFilter,
    dashboard: Option<DashboardView>,
    containers: Option<Grid<ContainerCard>>,
    images: Option<Grid<ImageCard>>,
    volumes: Option<Grid<VolumeCard>>,
    detail: Option<DetailState>,
    modal: Option<Modal>,
}

impl ConsoleArgs {
    pub fn run(&self, backend_args: &BackendArgs) -> Result<()> {
        let backend = backend_args.backend();
        let base_url = backend.base_url().to_string();
        let fetcher = Fetcher::spawn(backend)?;
        info!(url = %base_url, "starting console");

        let mut app = App {
            fetcher,
            base_url,
            exit: false,
            refresh_interval: Duration::from_secs(self.refresh_secs.max(1)),
            last_dashboard_fetch: None,
            last_render_duration: Duration::from_millis(0),
            screen: Screen::Dashboard,
            table_state: TableState::default().with_selected(0),
            filter: ContainerFilter::All,
            dashboard: None,
            containers: None,
            images: None,
            volumes: None,
            detail: None,
            modal: None,
        };

        let mut terminal = ratatui::init();
        let app_result = app.run(&mut terminal);
        ratatui::restore();
        app_result.map_err(|e| eyre::eyre!("TUI error: {}", e))
    }
}

impl App {
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        self.refresh_screen();

        while !self.exit {
            while let Some(completion) = self.fetcher.try_recv() {
                self.apply(completion);
            }

            if self.screen == Screen::Dashboard && self.dashboard_is_stale() {
                self.request_dashboard();
            }

            let render_start = Instant::now();
            terminal.draw(|frame| self.draw(frame))?;
            self.last_render_duration = render_start.elapsed();

            self.handle_events()?;
        }
        Ok(())
    }

    fn dashboard_is_stale(&self) -> bool {
        self.last_dashboard_fetch
            .map(|at| at.elapsed() >= self.refresh_interval)
            .unwrap_or(true)
    }

    fn request_dashboard(&mut self) {
        self.last_dashboard_fetch = Some(Instant::now());
        self.fetcher.submit(Job::Dashboard);
    }

    /// Re-requests whatever the current screen shows.
    fn refresh_screen(&mut self) {
        match self.screen {
            Screen::Dashboard => self.request_dashboard(),
            Screen::Containers => self.fetcher.submit(Job::Containers(self.filter)),
            Screen::Images => self.fetcher.submit(Job::Images),
            Screen::Volumes => self.fetcher.submit(Job::Volumes),
            Screen::Detail => {
                if let Some(detail) = self.detail.as_mut() {
                    self.fetcher.submit(Job::Detail(detail.container_id.clone()));
                    match detail.tab {
                        DetailTab::Overview => {}
                        DetailTab::Logs => {
                            if let Some(request) = detail.loader.mount() {
                                self.fetcher.submit(Job::Logs(request));
                            }
                        }
                        DetailTab::Stats => {
                            detail.stats = None;
                            self.fetcher.submit(Job::Stats(detail.container_id.clone()));
                        }
                    }
                }
            }
        }
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Dashboard(result) => {
                self.dashboard = Some(dashboard_view(result));
                self.clamp_selection();
            }
            Completion::Containers(filter, result) => {
                if filter == self.filter {
                    self.containers = Some(containers_grid(result));
                    self.clamp_selection();
                } else {
                    debug!(?filter, "dropping containers for an old filter");
                }
            }
            Completion::Images(result) => {
                self.images = Some(images_grid(result, Utc::now()));
                self.clamp_selection();
            }
            Completion::Volumes(result) => {
                self.volumes = Some(volumes_grid(result));
                self.clamp_selection();
            }
            Completion::Detail(id, result) => {
                if let Some(detail) = self.detail.as_mut().filter(|d| d.container_id == id) {
                    detail.view = Some(detail_view(&id, result, Utc::now()));
                }
            }
            Completion::Stats(id, result) => {
                if let Some(detail) = self.detail.as_mut().filter(|d| d.container_id == id) {
                    detail.stats = Some(stats_view(result));
                }
            }
            Completion::Logs(request, result) => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.loader.finish(&request, result);
                }
            }
            Completion::Action(id, outcome) => {
                info!(container = %id, message = %outcome.message, "action finished");
                self.modal = Some(Modal::Alert {
                    message: outcome.message,
                    follow_up: outcome.follow_up,
                });
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        self.render_ui(frame);
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    self.handle_key_event(key_event);
                }
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if let Some(modal) = self.modal.clone() {
            self.handle_modal_key(modal, key_event);
            return;
        }

        if self.screen == Screen::Detail {
            self.handle_detail_key(key_event);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.exit(),
            KeyCode::Char('1') => self.open_screen(Screen::Dashboard),
            KeyCode::Char('2') => self.open_screen(Screen::Containers),
            KeyCode::Char('3') => self.open_screen(Screen::Images),
            KeyCode::Char('4') => self.open_screen(Screen::Volumes),
            KeyCode::Char('r') | KeyCode::F(5) => self.refresh_screen(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Left | KeyCode::Char('h') if self.screen == Screen::Containers => {
                self.set_filter(self.filter.previous())
            }
            KeyCode::Right | KeyCode::Char('l') if self.screen == Screen::Containers => {
                self.set_filter(self.filter.next())
            }
            KeyCode::Enter => self.open_selected_container(),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key_event: KeyEvent) {
        let Some(detail) = self.detail.as_ref() else {
            self.screen = Screen::Dashboard;
            return;
        };
        let tab = detail.tab;
        let toggle = detail.toggle_action();

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.exit(),
            KeyCode::Esc | KeyCode::Backspace => self.close_detail(),
            KeyCode::Tab => self.select_tab(tab.next()),
            KeyCode::Char('r') | KeyCode::F(5) => self.refresh_screen(),
            KeyCode::Char('s') => {
                if let Some(action) = toggle {
                    self.modal = Some(Modal::Confirm(action));
                }
            }
            KeyCode::Char('R') if toggle.is_some() => {
                self.modal = Some(Modal::Confirm(ContainerAction::Restart));
            }
            KeyCode::Char('D') if toggle.is_some() => {
                self.modal = Some(Modal::Confirm(ContainerAction::Delete));
            }
            _ if tab == DetailTab::Logs => self.handle_logs_key(key_event),
            _ => {}
        }
    }

    fn handle_logs_key(&mut self, key_event: KeyEvent) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        let buffer = detail.loader.buffer_mut();
        let page = buffer.client_height().max(1) as isize;

        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => buffer.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => buffer.scroll_by(1),
            KeyCode::PageUp => buffer.scroll_by(-page),
            KeyCode::PageDown => buffer.scroll_by(page),
            KeyCode::Home | KeyCode::Char('g') => buffer.set_scroll_offset(0),
            KeyCode::End | KeyCode::Char('G') => buffer.scroll_to_bottom(),
            _ => return,
        }

        if let Some(request) = detail.loader.on_scroll() {
            self.submit_logs(request);
        }
    }

    fn handle_modal_key(&mut self, modal: Modal, key_event: KeyEvent) {
        match modal {
            Modal::Confirm(action) => match key_event.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    if let Some(detail) = self.detail.as_ref() {
                        self.fetcher
                            .submit(Job::Action(action, detail.container_id.clone()));
                        self.modal = Some(Modal::Pending(action));
                    } else {
                        self.modal = None;
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.modal = None,
                _ => {}
            },
            Modal::Pending(_) => {}
            Modal::Alert { follow_up, .. } => {
                if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
                    self.modal = None;
                    match follow_up {
                        Some(FollowUp::RefreshDetail) => self.refresh_screen(),
                        Some(FollowUp::NavigateAway) => {
                            self.detail = None;
                            self.open_screen(Screen::Containers);
                        }
                        None => {}
                    }
                }
            }
        }
    }

    fn submit_logs(&self, request: PageRequest) {
        debug!(container = %request.container_id, page = request.page, "requesting log page");
        self.fetcher.submit(Job::Logs(request));
    }

    fn select_tab(&mut self, tab: DetailTab) {
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        detail.tab = tab;
        match tab {
            DetailTab::Overview => {}
            DetailTab::Logs => {
                // Every activation starts over from the newest page.
                if let Some(request) = detail.loader.mount() {
                    self.submit_logs(request);
                }
            }
            DetailTab::Stats => {
                detail.stats = None;
                self.fetcher.submit(Job::Stats(detail.container_id.clone()));
            }
        }
    }

    fn open_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.table_state.select(Some(0));
        }
        self.screen = screen;
        self.refresh_screen();
    }

    fn set_filter(&mut self, filter: ContainerFilter) {
        self.filter = filter;
        self.containers = None;
        self.table_state.select(Some(0));
        self.fetcher.submit(Job::Containers(filter));
    }

    fn open_selected_container(&mut self) {
        let cards = match self.screen {
            Screen::Dashboard => self.dashboard.as_ref().map(|d| d.running.cards()),
            Screen::Containers => self.containers.as_ref().map(|g| g.cards()),
            _ => None,
        };
        let Some(card) = cards
            .zip(self.table_state.selected())
            .and_then(|(cards, i)| cards.get(i))
        else {
            return;
        };

        let detail = DetailState::new(card.id.clone(), self.screen);
        info!(container = %detail.container_id, "opening container");
        self.detail = Some(detail);
        self.screen = Screen::Detail;
        self.refresh_screen();
    }

    fn close_detail(&mut self) {
        let back_to = self
            .detail
            .take()
            .map(|d| d.back_to)
            .unwrap_or(Screen::Dashboard);
        self.screen = back_to;
        self.refresh_screen();
    }

    fn visible_len(&self) -> usize {
        match self.screen {
            Screen::Dashboard => self.dashboard.as_ref().map_or(0, |d| d.running.cards().len()),
            Screen::Containers => self.containers.as_ref().map_or(0, |g| g.cards().len()),
            Screen::Images => self.images.as_ref().map_or(0, |g| g.cards().len()),
            Screen::Volumes => self.volumes.as_ref().map_or(0, |g| g.cards().len()),
            Screen::Detail => 0,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if let Some(selected) = self.table_state.selected() {
            if selected >= len && len > 0 {
                self.table_state.select(Some(len - 1));
            }
        }
    }

    fn select_previous(&mut self) {
        if self.visible_len() > 0 {
            let i = match self.table_state.selected() {
                Some(i) => i.saturating_sub(1),
                None => 0,
            };
            self.table_state.select(Some(i));
        }
    }

    fn select_next(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            let i = match self.table_state.selected() {
                Some(i) => (i + 1).min(len - 1),
                None => 0,
            };
            self.table_state.select(Some(i));
        }
    }

    fn exit(&mut self) {
        self.exit = true;
    }
}

impl App {
    fn render_ui(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let [tabs_area, main_area, bottom_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .areas(area);

        let selected = Screen::TABS
            .iter()
            .position(|screen| *screen == self.screen)
            .or_else(|| {
                let back_to = self.detail.as_ref()?.back_to;
                Screen::TABS.iter().position(|screen| *screen == back_to)
            })
            .unwrap_or(0);

        let title = Line::from(" loglens ".bold());
        let mut block = Block::bordered()
            .title(title.centered())
            .title(Line::from(format!(" {} ", self.base_url).dark_gray()).right_aligned())
            .border_set(border::THICK);
        if cfg!(feature = "dev") {
            block = block.title_bottom(
                Line::from(format!(" {}ms ", self.last_render_duration.as_millis())).right_aligned(),
            );
        }

        let tabs = Tabs::new(
            Screen::TABS
                .iter()
                .enumerate()
                .map(|(i, screen)| format!("{} {}", i + 1, screen.title())),
        )
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(block);
        frame.render_widget(tabs, tabs_area);

        match self.screen {
            Screen::Dashboard => {
                render_dashboard(self.dashboard.as_ref(), main_area, frame, &mut self.table_state)
            }
            Screen::Containers => render_containers_screen(
                self.filter,
                self.containers.as_ref(),
                main_area,
                frame,
                &mut self.table_state,
            ),
            Screen::Images => {
                render_images_panel(self.images.as_ref(), main_area, frame, &mut self.table_state)
            }
            Screen::Volumes => {
                render_volumes_panel(self.volumes.as_ref(), main_area, frame, &mut self.table_state)
            }
            Screen::Detail => {
                if let Some(detail) = self.detail.as_mut() {
                    render_detail(detail, main_area, frame);
                }
            }
        }

        let refresh_status = match (self.screen, self.last_dashboard_fetch) {
            (Screen::Dashboard, Some(at)) => Some(format!("refreshed {}", format_time_ago(at.elapsed()))),
            _ => None,
        };

        render_bottom_bar(
            frame,
            bottom_area,
            self.screen,
            self.detail.as_ref().map(|d| d.tab),
            self.modal.as_ref(),
            refresh_status,
        );

        if let Some(modal) = &self.modal {
            render_modal(modal, area, frame);
        }
    }
}
