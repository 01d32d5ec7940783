use crate::error::MatchError;
use crate::index::{build_index_cancellable, FileId, FileRecord, IndexSummary, PartIndex, ScanConfig};
use crate::launch::{Launcher, SystemLauncher};
use crate::query::{sort_file_ids, FileSort, Scope, SCOPE_MARKER};
use crate::session::Session;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    /// Typing a directory to scan
    Browse,
    Help,
}

/// Which list the arrow keys move in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Parts,
    Files,
}

type ScanOutcome = Result<(PartIndex, IndexSummary), MatchError>;

/// Background scan state
pub enum ScanState {
    Idle,
    /// A scan is running on another thread; the current index stays live
    /// until it reports back
    Scanning {
        root: PathBuf,
        receiver: Receiver<ScanOutcome>,
        cancel: Arc<AtomicBool>,
        start_time: Instant,
    },
}

/// Rows moved by PageUp / PageDown
const PAGE: usize = 10;

/// Application state
pub struct App {
    session: Session,
    launcher: Box<dyn Launcher>,
    /// Directory of the index on screen; F5 and browse start from here
    pub root_path: PathBuf,
    pub query: String,
    pub parts: Vec<String>,
    pub part_selected: usize,
    /// Files of the selected part, as ids into the session's index
    pub files: Vec<FileId>,
    pub file_selected: usize,
    pub sort: FileSort,
    pub descending: bool,
    pub focus: Focus,
    pub mode: Mode,
    /// Mode to return to when help is closed
    pub previous_mode: Mode,
    /// Directory being typed in browse mode
    pub browse_input: String,
    pub status_message: String,
    /// Query to apply once the first scan lands
    pending_query: Option<String>,
    scan_state: ScanState,
}

impl App {
    /// Create the app and start scanning `path` in the background.
    pub fn new(path: PathBuf, config: ScanConfig) -> Self {
        let mut app = Self::with_session(Session::new(config), Box::new(SystemLauncher));
        app.root_path = path.clone();
        app.start_scan(path);
        app
    }

    /// Create the app around an existing session without scanning.
    pub fn with_session(session: Session, launcher: Box<dyn Launcher>) -> Self {
        let root_path = session.root().map(PathBuf::from).unwrap_or_default();
        let mut app = Self {
            session,
            launcher,
            root_path,
            query: String::new(),
            parts: Vec::new(),
            part_selected: 0,
            files: Vec::new(),
            file_selected: 0,
            sort: FileSort::Key,
            descending: false,
            focus: Focus::Parts,
            mode: Mode::Search,
            previous_mode: Mode::Search,
            browse_input: String::new(),
            status_message: String::new(),
            pending_query: None,
            scan_state: ScanState::Idle,
        };
        app.refresh_parts();
        app
    }

    pub fn index(&self) -> &Arc<PartIndex> {
        self.session.index()
    }

    pub fn scope(&self) -> &Scope {
        self.session.scope()
    }

    /// Scan `path` on a worker thread, cancelling any scan still running.
    pub fn start_scan(&mut self, path: PathBuf) {
        self.cancel_scan();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_for_thread = Arc::clone(&cancel);
        let root_for_thread = path.clone();
        let config = self.session.config().clone();

        thread::spawn(move || {
            let result = build_index_cancellable(&root_for_thread, &config, &cancel_for_thread);
            let _ = tx.send(result);
        });

        self.status_message = format!("Scanning {}...", path.display());
        self.scan_state = ScanState::Scanning {
            root: path,
            receiver: rx,
            cancel,
            start_time: Instant::now(),
        };
    }

    /// Show `query` as soon as the running scan completes.
    pub fn set_initial_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.pending_query = Some(query.to_string());
    }

    pub fn rescan(&mut self) {
        self.start_scan(self.root_path.clone());
    }

    fn cancel_scan(&mut self) {
        if let ScanState::Scanning { ref cancel, .. } = self.scan_state {
            cancel.store(true, Ordering::Relaxed);
        }
        self.scan_state = ScanState::Idle;
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self.scan_state, ScanState::Scanning { .. })
    }

    /// Seconds the running scan has taken so far
    pub fn scan_elapsed_secs(&self) -> Option<f64> {
        match &self.scan_state {
            ScanState::Scanning { start_time, .. } => Some(start_time.elapsed().as_secs_f64()),
            ScanState::Idle => None,
        }
    }

    /// Check for background scan completion (call this in the event loop)
    pub fn poll_scan(&mut self) {
        let current_state = std::mem::replace(&mut self.scan_state, ScanState::Idle);

        match current_state {
            ScanState::Scanning {
                root,
                receiver,
                cancel,
                start_time,
            } => match receiver.try_recv() {
                Ok(Ok((index, summary))) => {
                    self.session.publish(Arc::new(index), summary);
                    self.root_path = self.session.index().root().to_path_buf();
                    self.query = self.pending_query.take().unwrap_or_default();
                    self.focus = Focus::Parts;
                    self.refresh_parts();
                    self.status_message = format!(
                        "{}: found {} parts among {} files in {:.2} seconds",
                        self.session.index().root().display(),
                        summary.part_count,
                        summary.file_count,
                        summary.elapsed_seconds()
                    );
                }
                Ok(Err(MatchError::Cancelled)) => {}
                Ok(Err(e)) => {
                    self.status_message = format!("Scan failed: {}", e);
                }
                Err(TryRecvError::Empty) => {
                    self.scan_state = ScanState::Scanning {
                        root,
                        receiver,
                        cancel,
                        start_time,
                    };
                }
                Err(TryRecvError::Disconnected) => {
                    self.status_message = "Scan thread terminated unexpectedly".to_string();
                }
            },
            ScanState::Idle => {}
        }
    }

    /// Re-run the query and select the first matching part.
    pub fn refresh_parts(&mut self) {
        self.parts = self.session.set_query(&self.query);
        self.part_selected = 0;
        self.update_files();
    }

    /// Load the files of the selected part in the current sort order.
    pub fn update_files(&mut self) {
        self.files = match self.parts.get(self.part_selected) {
            Some(part) => {
                let index = self.session.index();
                let mut ids = index.file_ids_for_part(part);
                if self.sort != FileSort::Key || self.descending {
                    sort_file_ids(index, &mut ids, self.sort, self.descending);
                }
                ids
            }
            None => Vec::new(),
        };
        self.file_selected = 0;
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refresh_parts();
    }

    pub fn backspace(&mut self) {
        self.query.pop();
        self.refresh_parts();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.focus = Focus::Parts;
        self.refresh_parts();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Parts if !self.files.is_empty() => Focus::Files,
            _ => Focus::Parts,
        };
    }

    pub fn select_next(&mut self) {
        self.move_selection(1, true);
    }

    pub fn select_prev(&mut self) {
        self.move_selection(1, false);
    }

    pub fn select_page_down(&mut self) {
        self.move_selection(PAGE, true);
    }

    pub fn select_page_up(&mut self) {
        self.move_selection(PAGE, false);
    }

    fn move_selection(&mut self, step: usize, forward: bool) {
        let (selected, len) = match self.focus {
            Focus::Parts => (self.part_selected, self.parts.len()),
            Focus::Files => (self.file_selected, self.files.len()),
        };
        if len == 0 {
            return;
        }

        let next = if forward {
            (selected + step).min(len - 1)
        } else {
            selected.saturating_sub(step)
        };

        match self.focus {
            Focus::Parts => {
                if next != self.part_selected {
                    self.part_selected = next;
                    self.update_files();
                }
            }
            Focus::Files => self.file_selected = next,
        }
    }

    pub fn selected_part(&self) -> Option<&str> {
        self.parts.get(self.part_selected).map(String::as_str)
    }

    pub fn selected_file(&self) -> Option<&FileRecord> {
        self.files
            .get(self.file_selected)
            .and_then(|id| self.session.index().file(*id))
    }

    /// Records of the current listing, for rendering
    pub fn file_records(&self) -> impl Iterator<Item = &FileRecord> {
        let index = self.session.index();
        self.files.iter().filter_map(move |id| index.file(*id))
    }

    pub fn open_selected(&mut self) {
        let Some(record) = self.selected_file() else {
            return;
        };
        self.status_message = match self.session.open_file(record, self.launcher.as_ref()) {
            Ok(()) => format!("Opened {}", record.relative_path),
            Err(e) => e.to_string(),
        };
    }

    pub fn open_selected_folder(&mut self) {
        let Some(record) = self.selected_file() else {
            return;
        };
        self.status_message = match self
            .session
            .open_containing_folder(record, self.launcher.as_ref())
        {
            Ok(()) => format!("Opened folder of {}", record.relative_path),
            Err(e) => e.to_string(),
        };
    }

    /// Scope the part list to the selected file's parts.
    pub fn explore_laterally(&mut self) {
        let index = Arc::clone(self.session.index());
        let Some(record) = self.files.get(self.file_selected).and_then(|id| index.file(*id)) else {
            return;
        };

        self.parts = self.session.explore_laterally(record);
        self.query = SCOPE_MARKER.to_string();
        self.part_selected = 0;
        self.focus = Focus::Parts;
        self.update_files();
        self.status_message = format!("Exploring parts of {}", record.relative_path);
    }

    /// Advance to the next sort column, keeping the direction.
    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.resort_files();
    }

    pub fn reverse_sort(&mut self) {
        self.descending = !self.descending;
        self.resort_files();
    }

    fn resort_files(&mut self) {
        let selected = self.files.get(self.file_selected).copied();
        sort_file_ids(self.session.index(), &mut self.files, self.sort, self.descending);
        self.file_selected = selected
            .and_then(|id| self.files.iter().position(|f| *f == id))
            .unwrap_or(0);
        self.status_message = format!(
            "Sorted by {} ({})",
            self.sort.label(),
            if self.descending { "descending" } else { "ascending" }
        );
    }

    pub fn start_browse(&mut self) {
        self.browse_input = self.root_path.to_string_lossy().into_owned();
        self.mode = Mode::Browse;
    }

    pub fn cancel_browse(&mut self) {
        self.mode = Mode::Search;
    }

    /// Scan the typed directory and leave browse mode.
    pub fn confirm_browse(&mut self) {
        self.mode = Mode::Search;
        let input = self.browse_input.trim();
        if input.is_empty() {
            return;
        }
        self.start_scan(PathBuf::from(input));
    }

    pub fn show_help(&mut self) {
        if self.mode != Mode::Help {
            self.previous_mode = self.mode;
            self.mode = Mode::Help;
        }
    }

    pub fn hide_help(&mut self) {
        if self.mode == Mode::Help {
            self.mode = self.previous_mode;
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cancel_scan();
    }
}
