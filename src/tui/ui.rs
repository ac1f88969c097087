use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs};

use crate::output::formatter::truncate;
use crate::scoring::{ranked_nominees, ranks, PickKind, Standings};
use crate::state::View;
use crate::tui::app::{App, FlashKind, InputMode};

const APP_TITLE: &str = "Will Win · Should Win";

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.state.view {
        View::Picks => render_picks(frame, chunks[2], app),
        View::Community => render_community(frame, chunks[2], app),
        View::Leaderboard => render_leaderboard(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, app);
    }

    // Loading overlay appears on top of everything
    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.theme;
    let right = format!(
        "{} · {}",
        app.state.catalog.headline(),
        app.state.phase().label()
    );
    let left_len = APP_TITLE.chars().count();
    let right_len = right.chars().count();
    let padding_len = (area.width as usize).saturating_sub(left_len + right_len);

    let title = Line::from(vec![
        Span::styled(APP_TITLE, Style::default().fg(colors.title_color).bold()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right, Style::default().fg(colors.muted)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let views = [View::Picks, View::Community, View::Leaderboard];
    let selected = views.iter().position(|v| *v == app.state.view).unwrap_or(0);

    let tabs = Tabs::new(views.iter().map(|v| v.title()))
        .select(selected)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

/// Bar of `width` cells filled to `pct` percent
fn share_bar(pct: f64, width: usize, color: Color, empty: Color) -> Vec<Span<'static>> {
    let filled = ((pct / 100.0).clamp(0.0, 1.0) * width as f64).round() as usize;
    let rest = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(color)));
    }
    if rest > 0 {
        spans.push(Span::styled("░".repeat(rest), Style::default().fg(empty)));
    }
    spans
}

fn render_picks(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.theme;
    let state = &app.state;

    let columns = Layout::horizontal([Constraint::Length(34), Constraint::Fill(1)]).split(area);

    // Category list with completion markers
    let items: Vec<ListItem> = state
        .catalog
        .categories
        .iter()
        .map(|category| {
            let entry = state.ballot.entry(&category.id);
            let (marker, color) = match entry {
                Some(e) if e.is_complete() => ("●", colors.flash_success),
                Some(e) if e.is_started() => ("◐", colors.will_color),
                _ => ("○", colors.muted),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", marker), Style::default().fg(color)),
                Span::raw(category.name.clone()),
            ]))
        })
        .collect();

    let mut list_state = ListState::default().with_selected(Some(app.category_index));
    let list = List::new(items)
        .block(Block::bordered().title(format!(" {} ", state.progress.summary())))
        .highlight_style(colors.row_selected);
    frame.render_stateful_widget(list, columns[0], &mut list_state);

    let Some(category) = app.current_category() else {
        return;
    };

    let consensus = state.aggregates.get(&category.id);
    let rows: Vec<Row> = category
        .nominees
        .iter()
        .map(|nominee| {
            let will = state.ballot.get(&category.id, PickKind::WillWin) == Some(nominee.as_str());
            let should =
                state.ballot.get(&category.id, PickKind::ShouldWin) == Some(nominee.as_str());
            let share = consensus.and_then(|c| c.nominees.get(nominee));
            let will_pct = share.map_or(0.0, |s| s.will_win_pct);
            let should_pct = share.map_or(0.0, |s| s.should_win_pct);

            let marker = |on: bool, kind: PickKind, color: Color| {
                if on {
                    Span::styled(kind.symbol(), Style::default().fg(color).bold())
                } else {
                    Span::styled("·", Style::default().fg(colors.muted))
                }
            };

            Row::new(vec![
                Cell::from(Line::from(vec![
                    marker(will, PickKind::WillWin, colors.will_color),
                    Span::raw(" "),
                    marker(should, PickKind::ShouldWin, colors.should_color),
                ])),
                Cell::from(nominee.clone()),
                Cell::from(Span::styled(
                    format!("{:>4.0}%", will_pct),
                    Style::default().fg(colors.share_color(will_pct, colors.will_color)),
                )),
                Cell::from(Span::styled(
                    format!("{:>4.0}%", should_pct),
                    Style::default().fg(colors.share_color(should_pct, colors.should_color)),
                )),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Length(6),
    ];
    let title = if state.phase().accepts_picks() {
        format!(" {} ", category.name)
    } else {
        format!(" {} (locked) ", category.name)
    };
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["", "Nominee", "  ★", "  ♥"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .block(Block::bordered().title(title))
        .row_highlight_style(colors.row_selected);

    let mut table_state = TableState::default().with_selected(Some(app.nominee_index));
    frame.render_stateful_widget(table, columns[1], &mut table_state);
}

fn render_community(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.theme;
    let state = &app.state;
    let mut lines: Vec<Line> = Vec::new();

    for category in &state.catalog.categories {
        let Some(consensus) = state.aggregates.get(&category.id) else {
            continue;
        };
        let ranked = ranked_nominees(consensus, Some(category));
        if ranked.is_empty() {
            continue;
        }

        lines.push(Line::from(Span::styled(category.name.clone(), colors.header_style)));
        for row in ranked {
            let mut spans = vec![Span::raw(format!("  {:<28} ", truncate(&row.nominee, 28)))];
            spans.push(Span::styled("★ ", Style::default().fg(colors.will_color)));
            spans.extend(share_bar(row.will_win_pct, 10, colors.will_color, colors.bar_empty));
            spans.push(Span::raw(format!(" {:>4.0}%   ", row.will_win_pct)));
            spans.push(Span::styled("♥ ", Style::default().fg(colors.should_color)));
            spans.extend(share_bar(row.should_win_pct, 10, colors.should_color, colors.bar_empty));
            spans.push(Span::raw(format!(" {:>4.0}%", row.should_win_pct)));
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
    }

    if lines.is_empty() {
        let empty = Paragraph::new("No picks yet").alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    frame.render_widget(Paragraph::new(lines).scroll((app.scroll, 0)), area);
}

fn render_leaderboard(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.theme;
    let me = app.state.user_id.as_deref();

    if app.state.standings.is_empty() {
        let empty = Paragraph::new("No picks yet").alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    match &app.state.standings {
        Standings::Pending { entrants } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "Results pending - scores appear once winners are published",
                    Style::default().fg(colors.muted).italic(),
                )),
                Line::from(""),
            ];
            for entrant in entrants {
                let style = if Some(entrant.user_id.as_str()) == me {
                    Style::default().fg(colors.you_color).bold()
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(format!("  {}", entrant.name), style)));
            }
            frame.render_widget(Paragraph::new(lines).scroll((app.scroll, 0)), area);
        }
        Standings::Final { entries } => {
            let rows: Vec<Row> = entries
                .iter()
                .zip(ranks(entries))
                .skip(app.scroll as usize)
                .map(|(entry, rank)| {
                    let style = if Some(entry.user_id.as_str()) == me {
                        Style::default().fg(colors.you_color).bold()
                    } else {
                        Style::default()
                    };
                    Row::new(vec![
                        Cell::from(format!("{}.", rank)).style(Style::default().fg(colors.index_color)),
                        Cell::from(entry.name.clone()),
                        Cell::from(format!("{:>3}", entry.will_win_correct)),
                        Cell::from(format!("{:>3}", entry.should_win_correct)),
                        Cell::from(format!("{:>5}", entry.total)),
                    ])
                    .style(style)
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Fill(1),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(6),
            ];
            let table = Table::new(rows, widths).header(
                Row::new(vec!["#", "Name", "  ★", "  ♥", "Total"])
                    .style(colors.header_style)
                    .bottom_margin(1),
            );
            frame.render_widget(table, area);
        }
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.theme;

    let text = if let Some((ref msg, kind, _)) = app.flash_message {
        let msg_color = match kind {
            FlashKind::Error => colors.flash_error,
            FlashKind::Success => colors.flash_success,
            FlashKind::Info => colors.status_key_color,
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let elapsed = app.last_refresh.elapsed();
        let mut refresh_time = if elapsed.as_secs() < 60 {
            format!("refreshed {}s ago", elapsed.as_secs())
        } else {
            format!("refreshed {}m ago", elapsed.as_secs() / 60)
        };
        if app.state.from_cache {
            refresh_time.push_str(" (cached)");
        }
        if app.state.saving > 0 {
            refresh_time.push_str(" · saving...");
        }

        // Build hints with colored shortcut keys
        let hints: &[(&str, &str)] = match app.state.view {
            View::Picks => &[
                ("j/k", ":nominee "),
                ("h/l", ":category "),
                ("w", ":will "),
                ("s", ":should "),
                ("Tab", ":view "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            View::Community | View::Leaderboard => &[
                ("j/k", ":scroll "),
                ("r", ":refresh "),
                ("Tab", ":view "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = vec![
            Span::styled(refresh_time, Style::default().fg(colors.muted)),
            Span::raw("  "),
        ];
        for (key, label) in hints {
            spans.push(Span::styled(*key, Style::default().fg(colors.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_help_popup(frame: &mut Frame, app: &App) {
    let colors = &app.theme;
    let popup_area = centered_rect_fixed(50, 15, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", colors.popup_title))
        .border_style(Style::default().fg(colors.popup_border))
        .style(Style::default().bg(colors.popup_bg));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(colors.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Next nominee / scroll down"),
        ("k / Up        ", "Previous nominee / scroll up"),
        ("l / Right     ", "Next category"),
        ("h / Left      ", "Previous category"),
        ("w             ", "Toggle Will Win pick"),
        ("s             ", "Toggle Should Win pick"),
        ("Tab           ", "Switch view"),
        ("r             ", "Refresh"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, label)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*label)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % spinner_chars.len()];

    let text = if app.state.loading {
        format!("{} Loading ballots...", spinner)
    } else {
        format!("{} Refreshing...", spinner)
    };

    let loading_text = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.title_color));

    frame.render_widget(loading_text, inner);
}
