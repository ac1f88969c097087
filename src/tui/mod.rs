pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::cache::CacheConfig;
use crate::backend::{create_client, rest, BackendClient, Pick, Snapshot};
use crate::credentials::Credentials;
use crate::fetch::Source;
use crate::scoring::PickKind;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);
const TICK_RATE: Duration = Duration::from_millis(250);

type FetchResult = Result<anyhow::Result<(Snapshot, Source)>, tokio::time::error::Elapsed>;

/// What the TUI needs to talk to the backend and to rebuild its client
pub struct Connection {
    pub client: BackendClient,
    pub base_url: String,
    pub credentials: Credentials,
    pub cache_config: CacheConfig,
}

fn spawn_fetch(conn: &Connection, show_id: &str) -> JoinHandle<FetchResult> {
    let client = conn.client.clone();
    let cache_config = conn.cache_config.clone();
    let show_id = show_id.to_string();
    tokio::spawn(async move {
        tokio::time::timeout(
            FETCH_TIMEOUT,
            crate::fetch::load_snapshot_or_cached(&client, &show_id, &cache_config),
        )
        .await
    })
}

fn spawn_save(conn: &Connection, row: Pick) -> JoinHandle<Result<(), String>> {
    let client = conn.client.clone();
    tokio::spawn(async move {
        rest::upsert_pick(&client, &row)
            .await
            .map_err(|e| e.to_string())
    })
}

/// Restore the terminal, ask for a new access token, rebuild the client.
/// The terminal is re-initialized whether or not this succeeds.
fn reauthenticate(
    conn: &mut Connection,
    terminal: &mut ratatui::DefaultTerminal,
) -> anyhow::Result<()> {
    ratatui::restore();
    let result = crate::credentials::prompt_for_access_token().and_then(|token| {
        let mut credentials = conn.credentials.clone();
        credentials.access_token = Some(token);
        let client = create_client(&conn.base_url, &credentials)?;
        conn.credentials = credentials;
        conn.client = client;
        Ok(())
    });
    *terminal = ratatui::init();
    result
}

pub async fn run_tui(mut app: App, mut conn: Connection) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(TICK_RATE, app.refresh_interval);

    let show_id = app.state.catalog.id.clone();
    let mut pending_fetch: Option<JoinHandle<FetchResult>> = Some(spawn_fetch(&conn, &show_id));
    let mut pending_saves: Vec<JoinHandle<Result<(), String>>> = Vec::new();
    app.is_loading = true;

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        match events.next().await {
            Event::Key(key) => {
                app.last_interaction = std::time::Instant::now();
                if let Some(row) = handle_key_event(&mut app, key) {
                    debug!(category = %row.category_id, "saving pick");
                    pending_saves.push(spawn_save(&conn, row));
                }
            }
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
            Event::Refresh => {
                app.needs_refresh = true;
            }
        }

        // Apply finished saves
        let mut still_running = Vec::with_capacity(pending_saves.len());
        for handle in pending_saves.drain(..) {
            if handle.is_finished() {
                let result = match handle.await {
                    Ok(result) => result,
                    Err(e) => Err(format!("save task panicked: {}", e)),
                };
                if let Err(ref e) = result {
                    warn!(error = %e, "pick was not saved");
                }
                app.finish_save(result);
            } else {
                still_running.push(handle);
            }
        }
        pending_saves = still_running;

        // Apply a finished fetch; a later fetch always replaces an earlier one
        if pending_fetch.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(handle) = pending_fetch.take() {
                match handle.await {
                    Ok(Ok(Ok((snapshot, source)))) => {
                        app.apply_snapshot(snapshot, source == Source::Cache);
                    }
                    Ok(Ok(Err(e))) => {
                        if crate::fetch::is_auth_failure(&e) {
                            match reauthenticate(&mut conn, &mut terminal) {
                                Ok(()) => {
                                    app.needs_refresh = true;
                                    app.force_refresh = true;
                                    app.show_flash(
                                        "Re-authenticated. Refreshing...".to_string(),
                                        app::FlashKind::Info,
                                    );
                                }
                                Err(re) => app.show_flash(
                                    format!("Re-auth cancelled: {}", re),
                                    app::FlashKind::Error,
                                ),
                            }
                        } else {
                            app.show_flash(format!("Refresh failed: {:#}", e), app::FlashKind::Error);
                        }
                    }
                    Ok(Err(_elapsed)) => {
                        app.show_flash(
                            "Refresh timed out (20s). Will retry on next refresh.".to_string(),
                            app::FlashKind::Error,
                        );
                    }
                    Err(e) => {
                        app.show_flash(format!("Refresh task panicked: {}", e), app::FlashKind::Error);
                    }
                }
                app.is_loading = false;
            }
        }

        // Spawn a new refresh if needed and no fetch is pending
        if app.needs_refresh && pending_fetch.is_none() {
            let is_manual = app.force_refresh;
            let modal_open = app.input_mode != app::InputMode::Normal;
            let recent_interaction = app.last_interaction.elapsed() < Duration::from_secs(10);
            let saving = !pending_saves.is_empty();

            // Auto-refresh waits for modals, recent keypresses and in-flight saves;
            // needs_refresh stays set so it retries on the next tick.
            if is_manual || (!modal_open && !recent_interaction && !saving) {
                app.needs_refresh = false;
                app.force_refresh = false;
                pending_fetch = Some(spawn_fetch(&conn, &show_id));
                app.is_loading = true;
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    if !pending_saves.is_empty() {
        eprintln!("Waiting for {} pending save(s)...", pending_saves.len());
        for handle in pending_saves {
            if let Ok(Err(e)) = handle.await {
                eprintln!("Failed to save pick: {}", e);
            }
        }
    }

    Ok(())
}

/// Apply a key press. Returns a pick row when the press changed the ballot.
fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Pick> {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            // Quit
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            KeyCode::Char('l') | KeyCode::Right => app.next_category(),
            KeyCode::Char('h') | KeyCode::Left => app.previous_category(),
            KeyCode::Tab => app.next_view(),

            // Picks
            KeyCode::Char('w') | KeyCode::Enter => return app.toggle_selected(PickKind::WillWin),
            KeyCode::Char('s') => return app.toggle_selected(PickKind::ShouldWin),

            // Refresh (manual)
            KeyCode::Char('r') => {
                app.needs_refresh = true;
                app.force_refresh = true;
                app.show_flash("Refreshing...".to_string(), app::FlashKind::Info);
            }

            // Help
            KeyCode::Char('?') => app.show_help(),

            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::state::{AppState, View};

    fn app() -> App {
        let mut state = AppState::new(Catalog::default(), Some("me".to_string()));
        state.apply_snapshot(
            Snapshot {
                show_id: "oscars-2026".to_string(),
                ..Default::default()
            },
            false,
        );
        App::new(state, Duration::from_secs(300), ThemeColors::dark())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_keys_toggle_picks() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('j')));
        let row = handle_key_event(&mut app, press(KeyCode::Char('s'))).unwrap();
        assert_eq!(row.category_id, "best_picture");
        assert_eq!(row.should_win.as_deref(), Some("F1"));

        // Same key again clears the pick
        let row = handle_key_event(&mut app, press(KeyCode::Char('s'))).unwrap();
        assert_eq!(row.should_win, None);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('?')));
        assert_eq!(app.input_mode, app::InputMode::Help);
        assert!(handle_key_event(&mut app, press(KeyCode::Char('w'))).is_none());
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }

    #[test]
    fn test_tab_and_quit() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.state.view, View::Community);
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_manual_refresh_flags() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::Char('r')));
        assert!(app.needs_refresh);
        assert!(app.force_refresh);
    }
}
