use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap};

use saturday_signal::config::{SlateConfig, load_dotenv};
use saturday_signal::feed::{SlateSource, spawn_provider};
use saturday_signal::model::{Game, SourceTag};
use saturday_signal::state::{
    self, AppState, ProviderCommand, Screen, WEIGHT_MAX, WEIGHT_STEP, WeightField, apply_delta,
    weight_value,
};
use saturday_signal::weights::{RankedGame, normalize_weights};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('p') | KeyCode::Char('P') => self.state.toggle_screen(),
            KeyCode::Char('1') => self.state.screen = Screen::Slate,
            KeyCode::Char('2') => self.state.screen = Screen::Planner,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Tab => self.state.focus_next_weight(),
            KeyCode::BackTab => self.state.focus_prev_weight(),
            KeyCode::Char('h') | KeyCode::Left => self.state.adjust_focused_weight(-WEIGHT_STEP),
            KeyCode::Char('l') | KeyCode::Right => self.state.adjust_focused_weight(WEIGHT_STEP),
            KeyCode::Char('0') => {
                self.state.reset_weights();
                self.state.push_log("[INFO] Weights reset");
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_refresh(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn request_refresh(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Refresh unavailable");
            return;
        };
        if tx.send(ProviderCommand::Refresh).is_err() {
            self.state.push_log("[WARN] Refresh request failed");
        } else {
            self.state.push_log("[INFO] Refresh requested");
        }
    }
}

fn main() -> io::Result<()> {
    load_dotenv();
    let cfg = SlateConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(SlateSource::from_config(&cfg), tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(header_lines(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(1)])
        .split(chunks[1]);
    render_weights(frame, body[0], &app.state);
    match app.state.screen {
        Screen::Slate => render_slate(frame, body[1], &app.state),
        Screen::Planner => render_planner(frame, body[1], &app.state),
    }

    render_console(frame, chunks[2], &app.state);

    let footer = Paragraph::new(
        "1 Slate | 2/p Planner | j/k Move | Tab Weight | ←/→ Adjust | 0 Reset | r Refresh | ? Help | q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, area);
    }
}

fn header_lines(state: &AppState) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(
        "SATURDAY SIGNAL",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    title.push(Span::raw(match state.screen {
        Screen::Slate => " | Slate",
        Screen::Planner => " | Planner",
    }));
    if state.is_demo() {
        title.push(Span::raw("  "));
        title.push(Span::styled(
            "[Demo Mode]",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }

    let updated = state
        .slate
        .as_ref()
        .map(|s| local_time_label(&s.updated_at))
        .unwrap_or_else(|| "-".to_string());
    let mut status = format!("Last updated: {updated}");
    if state.loading {
        status.push_str("  Loading…");
    }

    vec![
        Line::from(title),
        Line::from(Span::styled(status, Style::default().fg(Color::Gray))),
    ]
}

fn local_time_label(iso: &str) -> String {
    DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.with_timezone(&Local).format("%-I:%M:%S %p").to_string())
        .unwrap_or_else(|_| iso.to_string())
}

fn render_weights(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Scoring Weights");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = Vec::new();
    for _ in WeightField::ALL {
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let normalized = normalize_weights(&state.weights);
    for (i, field) in WeightField::ALL.iter().enumerate() {
        let raw = weight_value(&state.weights, *field);
        let share = match field {
            WeightField::Importance => normalized.importance,
            WeightField::Prospect => normalized.prospect,
            WeightField::Watchability => normalized.watchability,
            WeightField::Drama => normalized.drama,
        };
        let focused = *field == state.focus;
        let marker = if focused { ">" } else { " " };
        let label_style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let label = Paragraph::new(format!(
            "{marker} {:<17}{:>3}%",
            field.label(),
            raw.round() as i64
        ))
        .style(label_style);
        frame.render_widget(label, rows[i * 2]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(if focused { Color::Cyan } else { Color::Gray }))
            .ratio((raw / WEIGHT_MAX).clamp(0.0, 1.0))
            .label(format!("{:.0}% of score", share * 100.0));
        frame.render_widget(gauge, rows[i * 2 + 1]);
    }

    let hint = Paragraph::new("Weights auto-normalize; list re-ranks live.")
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    frame.render_widget(hint, rows[WeightField::ALL.len() * 2 + 1]);
}

fn render_slate(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Top ranked by your weights");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.slate.is_none() {
        let msg = if state.loading {
            "Loading slate…"
        } else {
            "No slate loaded. Press r to retry."
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let selected_id = state.selected_game().map(|r| r.game.id.as_str());
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0usize;
    for (window, games) in state.by_window() {
        lines.push(Line::from(Span::styled(
            format!("{} Window", window.label()),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        if games.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No games found.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for ranked in games {
            let selected = Some(ranked.game.id.as_str()) == selected_id;
            if selected {
                selected_line = lines.len();
            }
            lines.extend(game_lines(ranked, selected));
        }
        lines.push(Line::raw(""));
    }

    let visible = inner.height as usize;
    let scroll = if visible == 0 {
        0
    } else {
        (selected_line + 4).saturating_sub(visible)
    };
    let list = Paragraph::new(lines).scroll((scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(list, inner);
}

fn game_lines(ranked: &RankedGame, selected: bool) -> Vec<Line<'static>> {
    let g = &ranked.game;
    let row_style = if selected {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    };

    let title = Line::from(vec![
        Span::styled(
            format!("  [WatchScore {:>3}] ", ranked.score),
            row_style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(g.matchup_label(), row_style),
    ]);

    let mut meta = format!("    {} ET", g.kickoff_et);
    if let Some(date) = &g.kickoff_date {
        meta.push_str(&format!(" • {date}"));
    }
    if let Some(network) = &g.network {
        meta.push_str(&format!(" • {network}"));
    }
    if let Some(spread) = g.spread {
        meta.push_str(&format!(" • Spread {spread:+.1}"));
    }
    if let Some(total) = g.total {
        meta.push_str(&format!(" • O/U {total:.1}"));
    }

    let bars = Line::from(vec![
        Span::raw("    "),
        category_span("Imp", g.importance, g.importance_src),
        category_span("Pro", g.prospect_density, g.prospect_density_src),
        category_span("Wat", g.watchability, g.watchability_src),
        category_span("Dra", g.drama, g.drama_src),
    ]);

    let mut out = vec![
        title,
        Line::from(Span::styled(meta, Style::default().fg(Color::Gray))),
        bars,
    ];
    if let Some(why) = &g.why {
        out.push(Line::from(Span::styled(
            format!("    {why}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    out
}

fn category_span(label: &str, value: f64, src: Option<SourceTag>) -> Span<'static> {
    let tag = src.map(|s| format!(" {}", s.label())).unwrap_or_default();
    let style = match src {
        Some(SourceTag::Computed) | None => Style::default().fg(Color::Gray),
        Some(_) => Style::default().fg(Color::Cyan),
    };
    Span::styled(format!("{label} {:>3}{tag}  ", value.round() as i64), style)
}

fn render_planner(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Time-boxed Viewing (best per window)");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(inner);

    for (pick, cell) in state.picks().iter().zip(cells.iter()) {
        let cell_block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} • Recommended", pick.window.label()));
        let lines: Vec<Line> = match (pick.primary, pick.alternate) {
            (None, _) => vec![Line::from(Span::styled(
                "No games in this window.",
                Style::default().fg(Color::DarkGray),
            ))],
            (Some(primary), alternate) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        format!("{} vs {}", primary.game.team_a, primary.game.team_b),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!(
                        "Kick {} ET • Score {}",
                        primary.game.kickoff_et, primary.score
                    )),
                ];
                if let Some(alt) = alternate {
                    lines.push(Line::from(Span::styled(
                        format!(
                            "Alt: {} • Score {}",
                            short_matchup(&alt.game),
                            alt.score
                        ),
                        Style::default().fg(Color::Gray),
                    )));
                }
                lines
            }
        };
        frame.render_widget(Paragraph::new(lines).block(cell_block), *cell);
    }
}

fn short_matchup(game: &Game) -> String {
    format!("{} vs {}", game.team_a, game.team_b)
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Console");
    let height = block.inner(area).height as usize;
    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(height)
        .rev()
        .map(|msg| {
            let style = if msg.starts_with("[WARN]") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(msg.clone(), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 60, area);
    let text = vec![
        Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
        Line::raw("1 / 2 / p     Slate, Planner, toggle"),
        Line::raw("j k ↑ ↓       Move selection"),
        Line::raw("Tab / S-Tab   Focus next / previous weight"),
        Line::raw("← → / h l     Adjust focused weight by 5"),
        Line::raw("0             Reset weights to 35/30/20/15"),
        Line::raw("r             Refresh slate"),
        Line::raw("q             Quit"),
        Line::raw(""),
        Line::raw("WatchScore = weighted mean of Importance, Prospect"),
        Line::raw("Density, Watchability and Drama (each 0-100)."),
        Line::raw("Tags: AP poll, Odds market, Computed estimate."),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false }),
        popup,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
