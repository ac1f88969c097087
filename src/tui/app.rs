use std::time::{Duration, Instant};

use crate::backend::{Pick, Snapshot};
use crate::catalog::Category;
use crate::scoring::PickKind;
use crate::state::{AppState, View};
use crate::tui::theme::ThemeColors;

const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Success,
    Error,
}

pub struct App {
    pub state: AppState,
    /// Selected category in My Picks
    pub category_index: usize,
    /// Highlighted nominee within the selected category
    pub nominee_index: usize,
    /// Scroll offset for Community and Leaderboard
    pub scroll: u16,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, FlashKind, Instant)>,
    pub last_refresh: Instant,
    pub last_interaction: Instant,
    pub refresh_interval: Duration,
    pub needs_refresh: bool,
    pub force_refresh: bool,
    pub should_quit: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub theme: ThemeColors,
}

impl App {
    /// New App in loading state; data arrives with the first fetch
    pub fn new(state: AppState, refresh_interval: Duration, theme: ThemeColors) -> Self {
        Self {
            state,
            category_index: 0,
            nominee_index: 0,
            scroll: 0,
            input_mode: InputMode::Normal,
            flash_message: None,
            last_refresh: Instant::now(),
            last_interaction: Instant::now(),
            refresh_interval,
            needs_refresh: false,
            force_refresh: false,
            should_quit: false,
            is_loading: true,
            spinner_frame: 0,
            theme,
        }
    }

    pub fn current_category(&self) -> Option<&Category> {
        self.state.catalog.categories.get(self.category_index)
    }

    pub fn selected_nominee(&self) -> Option<&str> {
        self.current_category()
            .and_then(|c| c.nominees.get(self.nominee_index))
            .map(String::as_str)
    }

    fn category_count(&self) -> usize {
        self.state.catalog.categories.len()
    }

    fn nominee_count(&self) -> usize {
        self.current_category().map_or(0, |c| c.nominees.len())
    }

    pub fn next_category(&mut self) {
        let count = self.category_count();
        if count == 0 {
            return;
        }
        self.category_index = (self.category_index + 1) % count;
        self.nominee_index = 0;
    }

    pub fn previous_category(&mut self) {
        let count = self.category_count();
        if count == 0 {
            return;
        }
        self.category_index = (self.category_index + count - 1) % count;
        self.nominee_index = 0;
    }

    pub fn next_row(&mut self) {
        match self.state.view {
            View::Picks => {
                let count = self.nominee_count();
                if count > 0 {
                    self.nominee_index = (self.nominee_index + 1) % count;
                }
            }
            View::Community | View::Leaderboard => {
                self.scroll = self.scroll.saturating_add(1);
            }
        }
    }

    pub fn previous_row(&mut self) {
        match self.state.view {
            View::Picks => {
                let count = self.nominee_count();
                if count > 0 {
                    self.nominee_index = (self.nominee_index + count - 1) % count;
                }
            }
            View::Community | View::Leaderboard => {
                self.scroll = self.scroll.saturating_sub(1);
            }
        }
    }

    pub fn next_view(&mut self) {
        self.state.view = self.state.view.next();
        self.scroll = 0;
    }

    /// Toggle the highlighted nominee. Returns the row to save, or flashes
    /// why the edit was refused.
    pub fn toggle_selected(&mut self, kind: PickKind) -> Option<Pick> {
        if self.state.view != View::Picks {
            return None;
        }
        let category_id = self.current_category()?.id.clone();
        let nominee = self.selected_nominee()?.to_string();

        match self.state.toggle_pick(&category_id, kind, &nominee) {
            Ok(row) => {
                let message = match kind {
                    PickKind::WillWin => row.will_win.as_deref(),
                    PickKind::ShouldWin => row.should_win.as_deref(),
                }
                .map(|n| format!("{} {}: {}", kind.symbol(), kind.label(), n))
                .unwrap_or_else(|| format!("{} cleared", kind.label()));
                self.show_flash(message, FlashKind::Info);
                self.state.saving += 1;
                Some(row)
            }
            Err(e) => {
                self.show_flash(e.to_string(), FlashKind::Error);
                None
            }
        }
    }

    /// A background save finished
    pub fn finish_save(&mut self, result: Result<(), String>) {
        self.state.saving = self.state.saving.saturating_sub(1);
        match result {
            Ok(()) => {
                if self.state.saving == 0 {
                    self.show_flash("Saved".to_string(), FlashKind::Success);
                }
            }
            Err(e) => {
                self.show_flash(format!("Failed to save: {}", e), FlashKind::Error);
                // Resync with what the backend actually holds
                self.needs_refresh = true;
                self.force_refresh = true;
            }
        }
    }

    /// Replace view data with fresh data from fetch
    pub fn apply_snapshot(&mut self, snapshot: Snapshot, from_cache: bool) {
        self.state.apply_snapshot(snapshot, from_cache);
        self.last_refresh = Instant::now();

        if from_cache {
            self.show_flash(
                "Offline - showing cached ballots".to_string(),
                FlashKind::Error,
            );
        } else {
            self.show_flash(
                format!("Refreshed ({})", self.state.progress.summary()),
                FlashKind::Success,
            );
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, _, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String, kind: FlashKind) {
        self.flash_message = Some((msg, kind, Instant::now()));
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Dismiss help overlay
    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ShowStatus;
    use crate::catalog::Catalog;

    fn app(user: Option<&str>) -> App {
        let mut state = AppState::new(Catalog::default(), user.map(str::to_string));
        state.apply_snapshot(
            Snapshot {
                show_id: "oscars-2026".to_string(),
                ..Default::default()
            },
            false,
        );
        App::new(state, Duration::from_secs(300), ThemeColors::dark())
    }

    #[test]
    fn test_category_navigation_wraps() {
        let mut app = app(Some("me"));
        app.previous_category();
        assert_eq!(app.category_index, 23);
        app.next_category();
        assert_eq!(app.category_index, 0);
        assert_eq!(app.current_category().map(|c| c.id.as_str()), Some("best_picture"));
    }

    #[test]
    fn test_nominee_navigation_resets_on_category_change() {
        let mut app = app(Some("me"));
        app.next_row();
        app.next_row();
        assert_eq!(app.nominee_index, 2);
        assert_eq!(app.selected_nominee(), Some("Frankenstein"));
        app.next_category();
        assert_eq!(app.nominee_index, 0);
    }

    #[test]
    fn test_scroll_in_other_views() {
        let mut app = app(Some("me"));
        app.next_view();
        assert_eq!(app.state.view, View::Community);
        app.previous_row();
        assert_eq!(app.scroll, 0);
        app.next_row();
        assert_eq!(app.scroll, 1);
        app.next_view();
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_toggle_selected_returns_row_and_counts_save() {
        let mut app = app(Some("me"));
        let row = app.toggle_selected(PickKind::WillWin).unwrap();
        assert_eq!(row.will_win.as_deref(), Some("Bugonia"));
        assert_eq!(app.state.saving, 1);

        app.finish_save(Ok(()));
        assert_eq!(app.state.saving, 0);
        assert!(matches!(app.flash_message, Some((_, FlashKind::Success, _))));
    }

    #[test]
    fn test_toggle_refused_when_locked() {
        let mut app = app(Some("me"));
        app.state.apply_snapshot(
            Snapshot {
                show_id: "oscars-2026".to_string(),
                status: ShowStatus {
                    ballots_closed: true,
                    results_published: false,
                },
                ..Default::default()
            },
            false,
        );
        assert!(app.toggle_selected(PickKind::ShouldWin).is_none());
        assert_eq!(app.state.saving, 0);
        assert!(matches!(app.flash_message, Some((_, FlashKind::Error, _))));
    }

    #[test]
    fn test_failed_save_requests_refresh() {
        let mut app = app(Some("me"));
        app.toggle_selected(PickKind::WillWin);
        app.finish_save(Err("boom".to_string()));
        assert!(app.needs_refresh);
        assert!(app.force_refresh);
        assert_eq!(app.state.saving, 0);
    }

    #[test]
    fn test_toggle_ignored_outside_picks_view() {
        let mut app = app(Some("me"));
        app.next_view();
        assert!(app.toggle_selected(PickKind::WillWin).is_none());
    }
}
