//! Paginated log viewer state.
//!
//! Page 1 is the most recent chunk of a container's log; higher pages go back
//! in time. The loader mounts with page 1 (appended, view pinned to the
//! bottom) and fetches older pages when the viewport reaches the top edge,
//! inserting them below a fixed sentinel row while keeping the visible content
//! in place.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::{Backend, FetchError};

/// Distance from the top, in rows, that counts as reaching the edge.
pub const EDGE_THRESHOLD: usize = 3;

pub const LOADING_TEXT: &str = "Loading logs...";
pub const NO_LOGS_TEXT: &str = "No logs available";
pub const NO_MORE_LOGS_TEXT: &str = "No more logs";

/// Shared by every loader, so a request from a dropped loader never matches a new one.
static GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Which end of the log a page is added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Further back in time, inserted above the current content.
    Older,
    /// More recent, appended below the current content.
    Newer,
}

/// Pagination state of one log view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogPageState {
    pub current_page: u32,
    pub is_loading: bool,
    pub has_more: bool,
}

impl Default for LogPageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            is_loading: false,
            has_more: true,
        }
    }
}

/// `Idle -> Loading -> {Idle | Exhausted | Errored}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    /// The backend ran out of pages. Nothing more is fetched until a reset.
    Exhausted,
    /// The last fetch failed. The next boundary crossing retries it.
    Errored,
}

/// A page fetch handed out by [`LogStreamLoader::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub container_id: String,
    pub direction: Direction,
    pub page: u32,
    generation: u64,
}

/// One entry of the rendered log list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRow {
    /// Fixed zero-height anchor at the top; older pages are inserted right after it.
    Sentinel,
    Line(String),
    Loading,
    Error(String),
    /// Terminal "no more logs" marker.
    End(String),
}

impl LogRow {
    pub fn text(&self) -> &str {
        match self {
            LogRow::Sentinel => "",
            LogRow::Line(text) | LogRow::Error(text) | LogRow::End(text) => text,
            LogRow::Loading => LOADING_TEXT,
        }
    }
}

/// Ordered rows plus a scrolling viewport.
///
/// Rows wrap at `width` columns, so the scroll height is measured in wrapped
/// rows and generally differs from the number of log lines.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    rows: Vec<LogRow>,
    width: usize,
    client_height: usize,
    offset: usize,
}

impl LogBuffer {
    pub fn new(width: usize, client_height: usize) -> Self {
        Self {
            rows: vec![LogRow::Sentinel],
            width: width.max(1),
            client_height,
            offset: 0,
        }
    }

    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }

    /// Log lines in display order, without markers.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|row| match row {
            LogRow::Line(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    pub fn row_height(&self, row: &LogRow) -> usize {
        match row {
            LogRow::Sentinel => 0,
            other => other.text().chars().count().div_ceil(self.width).max(1),
        }
    }

    pub fn scroll_height(&self) -> usize {
        self.rows.iter().map(|row| self.row_height(row)).sum()
    }

    pub fn client_height(&self) -> usize {
        self.client_height
    }

    pub fn scroll_offset(&self) -> usize {
        self.offset
    }

    pub fn max_offset(&self) -> usize {
        self.scroll_height().saturating_sub(self.client_height)
    }

    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let offset = self.offset.saturating_add_signed(delta);
        self.set_scroll_offset(offset);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn is_near_top(&self) -> bool {
        self.offset <= EDGE_THRESHOLD
    }

    /// Adapts the viewport to a new surface size, keeping the offset in range.
    pub fn resize(&mut self, width: usize, client_height: usize) {
        let pinned = self.offset >= self.max_offset();
        self.width = width.max(1);
        self.client_height = client_height;
        if pinned {
            self.scroll_to_bottom();
        } else {
            self.set_scroll_offset(self.offset);
        }
    }

    pub fn clear(&mut self) {
        self.rows.truncate(1);
        self.offset = 0;
    }

    /// Index of the row covering visual line `y`.
    pub fn row_at(&self, y: usize) -> Option<usize> {
        let mut top = 0;
        for (index, row) in self.rows.iter().enumerate() {
            let height = self.row_height(row);
            if y < top + height {
                return Some(index);
            }
            top += height;
        }
        None
    }

    /// Wrapped text segments inside the viewport, top to bottom.
    pub fn visible_segments(&self) -> Vec<(&LogRow, String)> {
        let end = self.offset + self.client_height;
        let mut segments = Vec::new();
        let mut top = 0;

        for row in &self.rows {
            let height = self.row_height(row);
            if top >= end {
                break;
            }
            if top + height > self.offset {
                let chars: Vec<char> = row.text().chars().collect();
                for (i, chunk) in chars.chunks(self.width).enumerate() {
                    let y = top + i;
                    if y >= self.offset && y < end {
                        segments.push((row, chunk.iter().collect()));
                    }
                }
            }
            top += height;
        }
        segments
    }

    /// Applies `mutate` to the rows and shifts the offset by the change in
    /// scroll height, so content below the mutation stays where it was.
    fn preserve_anchor(&mut self, mutate: impl FnOnce(&mut Vec<LogRow>)) {
        let height_before = self.scroll_height() as i64;
        let offset_before = self.offset as i64;

        mutate(&mut self.rows);

        let height_after = self.scroll_height() as i64;
        let offset_after = (offset_before + (height_after - height_before)).max(0) as usize;
        self.set_scroll_offset(offset_after);
    }

    fn take_transient_rows(rows: &mut Vec<LogRow>) -> Option<usize> {
        let position = rows
            .iter()
            .position(|row| matches!(row, LogRow::Loading | LogRow::Error(_)));
        rows.retain(|row| !matches!(row, LogRow::Loading | LogRow::Error(_)));
        position
    }

    fn show_loading(&mut self, direction: Direction) {
        match direction {
            Direction::Older => self.preserve_anchor(|rows| {
                Self::take_transient_rows(rows);
                rows.insert(1, LogRow::Loading);
            }),
            Direction::Newer => {
                Self::take_transient_rows(&mut self.rows);
                self.rows.push(LogRow::Loading);
                self.set_scroll_offset(self.offset);
            }
        }
    }

    fn show_error(&mut self, direction: Direction, message: String) {
        let replace = |rows: &mut Vec<LogRow>| {
            let position = Self::take_transient_rows(rows).unwrap_or(rows.len());
            rows.insert(position.min(rows.len()), LogRow::Error(message));
        };
        match direction {
            Direction::Older => self.preserve_anchor(replace),
            Direction::Newer => {
                replace(&mut self.rows);
                self.set_scroll_offset(self.offset);
            }
        }
    }

    fn show_end(&mut self) {
        let text = if self.line_count() == 0 {
            NO_LOGS_TEXT
        } else {
            NO_MORE_LOGS_TEXT
        };
        self.preserve_anchor(|rows| {
            Self::take_transient_rows(rows);
            if !rows.iter().any(|row| matches!(row, LogRow::End(_))) {
                rows.insert(1, LogRow::End(text.to_string()));
            }
        });
    }

    /// Inserts an older page directly below the sentinel, keeping the viewport anchored.
    pub fn prepend_lines(&mut self, lines: Vec<String>) {
        self.preserve_anchor(|rows| {
            Self::take_transient_rows(rows);
            rows.splice(1..1, lines.into_iter().map(LogRow::Line));
        });
    }

    /// Appends a newer page and scrolls to the bottom.
    pub fn append_lines(&mut self, lines: Vec<String>) {
        Self::take_transient_rows(&mut self.rows);
        self.rows.extend(lines.into_iter().map(LogRow::Line));
        self.scroll_to_bottom();
    }
}

/// Splits a page body into displayable lines, dropping blank ones.
///
/// A page past the end comes back as the JSON body `{"logs":""}`, which
/// yields no lines.
pub fn page_lines(body: &str) -> Vec<String> {
    if is_empty_page_marker(body) {
        return Vec::new();
    }
    body.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

fn is_empty_page_marker(body: &str) -> bool {
    let trimmed = body.trim();
    if !trimmed.starts_with('{') {
        return false;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => {
            map.len() == 1
                && map
                    .get("logs")
                    .and_then(|logs| logs.as_str())
                    .is_some_and(|logs| logs.trim().is_empty())
        }
        _ => false,
    }
}

/// Drives [`LogPageState`] and a [`LogBuffer`] for one container.
///
/// Fetching is split in two so the caller decides where the request runs:
/// [`begin`](Self::begin) hands out a [`PageRequest`] (or nothing, if one is
/// already in flight) and [`finish`](Self::finish) applies its result.
#[derive(Debug, Clone)]
pub struct LogStreamLoader {
    container_id: String,
    state: LogPageState,
    phase: LoadPhase,
    generation: u64,
    /// Direction and page of the last failed fetch, re-issued on the next scroll.
    failed: Option<(Direction, u32)>,
    buffer: LogBuffer,
}

impl LogStreamLoader {
    pub fn new(container_id: impl Into<String>, width: usize, client_height: usize) -> Self {
        Self {
            container_id: container_id.into(),
            state: LogPageState::default(),
            phase: LoadPhase::Idle,
            generation: next_generation(),
            failed: None,
            buffer: LogBuffer::new(width, client_height),
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn state(&self) -> LogPageState {
        self.state
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut LogBuffer {
        &mut self.buffer
    }

    /// Back to `{page 1, idle, has more}` with an empty list. Any request
    /// still pending is abandoned; its completion will be ignored.
    pub fn reset(&mut self) {
        self.state = LogPageState::default();
        self.phase = LoadPhase::Idle;
        self.generation = next_generation();
        self.failed = None;
        self.buffer.clear();
    }

    /// Resets and requests the most recent page.
    pub fn mount(&mut self) -> Option<PageRequest> {
        self.reset();
        self.begin(Direction::Newer, 1)
    }

    /// Starts a page fetch unless one is in flight or the log is exhausted.
    pub fn begin(&mut self, direction: Direction, page: u32) -> Option<PageRequest> {
        if self.state.is_loading {
            debug!(container = %self.container_id, page, "log page already loading, dropping request");
            return None;
        }
        if !self.state.has_more {
            return None;
        }

        self.state.is_loading = true;
        self.phase = LoadPhase::Loading;
        self.buffer.show_loading(direction);

        Some(PageRequest {
            container_id: self.container_id.clone(),
            direction,
            page,
            generation: self.generation,
        })
    }

    /// Scroll hook: reaching the top edge asks for the next older page.
    /// After a failure the failed request is retried instead; a failed
    /// newest page is retried without waiting for the top edge.
    pub fn on_scroll(&mut self) -> Option<PageRequest> {
        let (direction, page) = match (self.phase, self.failed) {
            (LoadPhase::Errored, Some(failed)) => failed,
            _ => (Direction::Older, self.state.current_page + 1),
        };
        if direction == Direction::Older && !self.buffer.is_near_top() {
            return None;
        }
        self.begin(direction, page)
    }

    /// Applies a completed fetch. Returns `false` for a stale request.
    pub fn finish(&mut self, request: &PageRequest, result: Result<String, FetchError>) -> bool {
        if request.generation != self.generation || request.container_id != self.container_id {
            debug!(container = %request.container_id, page = request.page, "ignoring stale log page");
            return false;
        }

        self.state.is_loading = false;

        match result {
            Err(error) => {
                warn!(container = %self.container_id, page = request.page, %error, "failed to load logs");
                self.buffer
                    .show_error(request.direction, format!("Failed to load logs: {}", error));
                self.failed = Some((request.direction, request.page));
                self.phase = LoadPhase::Errored;
            }
            Ok(body) => {
                self.failed = None;
                let lines = page_lines(&body);
                if lines.is_empty() {
                    self.state.has_more = false;
                    self.buffer.show_end();
                    self.phase = LoadPhase::Exhausted;
                } else {
                    debug!(container = %self.container_id, page = request.page, lines = lines.len(), "log page loaded");
                    self.state.current_page = request.page;
                    match request.direction {
                        Direction::Older => self.buffer.prepend_lines(lines),
                        Direction::Newer => self.buffer.append_lines(lines),
                    }
                    self.phase = LoadPhase::Idle;
                }
            }
        }
        true
    }

    /// `begin`, fetch and `finish` in one blocking step. Returns whether a request was made.
    pub fn load_page<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        direction: Direction,
        page: u32,
    ) -> bool {
        let Some(request) = self.begin(direction, page) else {
            return false;
        };
        let result = backend.container_logs(&request.container_id, request.page);
        self.finish(&request, result);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubBackend;

    fn numbered(prefix: &str, count: usize) -> String {
        (1..=count)
            .map(|i| format!("{} line {}", prefix, i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn mounted(backend: &StubBackend, width: usize, height: usize) -> LogStreamLoader {
        let mut loader = LogStreamLoader::new("abc123", width, height);
        let request = loader.mount().unwrap();
        let result = backend.container_logs(&request.container_id, request.page);
        loader.finish(&request, result);
        loader
    }

    #[test]
    fn test_initial_page_appends_in_order_and_pins_bottom() {
        let backend = StubBackend::default().with_page(1, Ok("first\n\nsecond\r\nthird\n".into()));
        let loader = mounted(&backend, 80, 2);

        let lines: Vec<&str> = loader.buffer().lines().collect();
        assert_eq!(lines, vec!["first", "second", "third"]);
        assert_eq!(loader.buffer().scroll_offset(), loader.buffer().max_offset());
        assert_eq!(loader.buffer().scroll_offset(), 1);
        assert_eq!(loader.phase(), LoadPhase::Idle);
        assert_eq!(loader.state().current_page, 1);
    }

    #[test]
    fn test_blank_page_exhausts_with_single_marker() {
        let backend = StubBackend::default()
            .with_page(1, Ok(numbered("p1", 3)))
            .with_page(2, Ok("\n   \n\n".into()));
        let mut loader = mounted(&backend, 80, 10);

        assert!(loader.load_page(&backend, Direction::Older, 2));
        assert!(!loader.state().has_more);
        assert_eq!(loader.phase(), LoadPhase::Exhausted);

        assert!(!loader.load_page(&backend, Direction::Older, 3));
        assert!(loader.on_scroll().is_none());

        let markers: Vec<&LogRow> = loader
            .buffer()
            .rows()
            .iter()
            .filter(|row| matches!(row, LogRow::End(_)))
            .collect();
        assert_eq!(markers, vec![&LogRow::End(NO_MORE_LOGS_TEXT.to_string())]);
        assert_eq!(backend.log_calls(), 2);
    }

    #[test]
    fn test_empty_first_page_says_no_logs() {
        let backend = StubBackend::default().with_page(1, Ok(String::new()));
        let loader = mounted(&backend, 80, 10);

        assert!(!loader.state().has_more);
        assert_eq!(
            loader.buffer().rows(),
            &[LogRow::Sentinel, LogRow::End(NO_LOGS_TEXT.to_string())]
        );
    }

    #[test]
    fn test_json_page_past_end_is_empty() {
        assert!(page_lines(r#"{"logs":""}"#).is_empty());
        assert_eq!(page_lines(r#"{"level":"info","logs":""}"#).len(), 1);
        assert_eq!(page_lines("{not json"), vec!["{not json".to_string()]);
    }

    #[test]
    fn test_older_pages_keep_viewport_anchored() {
        // Lines of varying length wrap at 10 columns, so heights differ from line counts.
        let page2 = "a\nbbbbbbbbbbbbbbbbbbbbbbbbb\ncc\ndddddddddddd";
        let page3 = "eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee\nf";
        let backend = StubBackend::default()
            .with_page(1, Ok(numbered("p1", 12)))
            .with_page(2, Ok(page2.into()))
            .with_page(3, Ok(page3.into()));
        let mut loader = mounted(&backend, 10, 4);

        for page in [2, 3] {
            loader.buffer_mut().set_scroll_offset(2);
            let top_row = loader.buffer().row_at(2).unwrap();
            let anchored = loader.buffer().rows()[top_row].clone();
            let height_before = loader.buffer().scroll_height();
            let offset_before = loader.buffer().scroll_offset();

            let request = loader.on_scroll().expect("near the top edge");
            assert_eq!(request.page, page);
            assert_eq!(request.direction, Direction::Older);
            let result = backend.container_logs(&request.container_id, request.page);
            assert!(loader.finish(&request, result));

            let buffer = loader.buffer();
            let height_after = buffer.scroll_height();
            assert_ne!(height_after - height_before, buffer.line_count());
            assert_eq!(
                buffer.scroll_offset(),
                offset_before + (height_after - height_before)
            );
            let top_row = buffer.row_at(buffer.scroll_offset()).unwrap();
            assert_eq!(buffer.rows()[top_row], anchored);
        }

        let lines: Vec<&str> = loader.buffer().lines().collect();
        assert_eq!(lines[0], "eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");
        assert_eq!(lines[1], "f");
        assert_eq!(lines[2], "a");
        assert_eq!(lines[5], "dddddddddddd");
        assert_eq!(lines[6], "p1 line 1");
        assert_eq!(loader.state().current_page, 3);
    }

    #[test]
    fn test_single_request_in_flight() {
        let backend = StubBackend::default().with_page(1, Ok("only".into()));
        let mut loader = mounted(&backend, 80, 10);
        let calls_after_mount = backend.log_calls();

        let first = loader.on_scroll();
        let second = loader.on_scroll();
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(loader.begin(Direction::Newer, 1).is_none());
        assert!(!loader.load_page(&backend, Direction::Older, 2));
        assert_eq!(backend.log_calls(), calls_after_mount);
        assert_eq!(loader.phase(), LoadPhase::Loading);
    }

    #[test]
    fn test_failed_page_shows_error_and_allows_retry() {
        let backend = StubBackend::default()
            .with_page(1, Ok(numbered("p1", 2)))
            .with_page(2, Err(FetchError::Status(502)));
        let mut loader = mounted(&backend, 80, 10);

        assert!(loader.load_page(&backend, Direction::Older, 2));
        assert_eq!(loader.phase(), LoadPhase::Errored);
        assert!(loader.state().has_more);
        assert!(!loader.state().is_loading);
        assert_eq!(loader.state().current_page, 1);
        assert_eq!(
            loader.buffer().rows()[1],
            LogRow::Error("Failed to load logs: HTTP error! Status: 502".to_string())
        );
        assert!(!loader
            .buffer()
            .rows()
            .iter()
            .any(|row| matches!(row, LogRow::Loading)));

        let retry = loader.on_scroll().expect("retry after an error");
        assert_eq!(retry.page, 2);
        assert_eq!(loader.buffer().rows()[1], LogRow::Loading);
        assert!(!loader
            .buffer()
            .rows()
            .iter()
            .any(|row| matches!(row, LogRow::Error(_))));
    }

    #[test]
    fn test_reset_discards_pending_completion() {
        let backend = StubBackend::default().with_page(1, Ok("fresh".into()));
        let mut loader = LogStreamLoader::new("abc123", 80, 10);

        let abandoned = loader.mount().unwrap();
        let current = loader.mount().unwrap();
        assert!(!loader.finish(&abandoned, Ok("stale".into())));
        assert!(loader.state().is_loading);

        let result = backend.container_logs(&current.container_id, current.page);
        assert!(loader.finish(&current, result));
        let lines: Vec<&str> = loader.buffer().lines().collect();
        assert_eq!(lines, vec!["fresh"]);
        assert_eq!(loader.state(), LogPageState::default());
    }

    #[test]
    fn test_reopened_container_ignores_previous_loader() {
        let mut closed = LogStreamLoader::new("abc123", 80, 10);
        let mut reopened = LogStreamLoader::new("abc123", 80, 10);

        let abandoned = closed.mount().unwrap();
        let current = reopened.mount().unwrap();
        assert!(!reopened.finish(&abandoned, Ok("l1\nl2".into())));
        assert!(reopened.state().is_loading);
        assert_eq!(reopened.buffer().line_count(), 0);

        assert!(reopened.finish(&current, Ok("l1\nl2".into())));
        let lines: Vec<&str> = reopened.buffer().lines().collect();
        assert_eq!(lines, vec!["l1", "l2"]);
    }

    #[test]
    fn test_failed_mount_retries_newest_page() {
        let mut loader = LogStreamLoader::new("abc123", 80, 10);
        let request = loader.mount().unwrap();
        assert!(loader.finish(&request, Err(FetchError::Status(500))));
        assert_eq!(loader.phase(), LoadPhase::Errored);

        let retry = loader.on_scroll().expect("retry the newest page");
        assert_eq!((retry.direction, retry.page), (Direction::Newer, 1));
        assert!(loader.finish(&retry, Ok("newest".into())));

        let lines: Vec<&str> = loader.buffer().lines().collect();
        assert_eq!(lines, vec!["newest"]);
        assert_eq!(loader.state().current_page, 1);
        assert_eq!(loader.phase(), LoadPhase::Idle);

        // Back to normal paging once the retry succeeded.
        let next = loader.on_scroll().unwrap();
        assert_eq!((next.direction, next.page), (Direction::Older, 2));
    }

    #[test]
    fn test_newer_failure_keeps_offset() {
        let backend = StubBackend::default().with_page(1, Ok(numbered("p", 6)));
        let mut loader = mounted(&backend, 10, 3);
        loader.buffer_mut().set_scroll_offset(0);

        let request = loader.begin(Direction::Newer, 1).unwrap();
        assert!(loader.finish(&request, Err(FetchError::Status(500))));

        assert_eq!(loader.buffer().scroll_offset(), 0);
        assert!(matches!(
            loader.buffer().rows().last(),
            Some(LogRow::Error(_))
        ));
    }

    #[test]
    fn test_visible_segments_wrap_rows() {
        let mut buffer = LogBuffer::new(4, 3);
        buffer.append_lines(vec!["abcdefgh".into(), "ij".into()]);
        assert_eq!(buffer.scroll_height(), 3);
        let texts: Vec<String> = buffer
            .visible_segments()
            .into_iter()
            .map(|(_, text)| text)
            .collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
    }
}
