use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use fpl_leagues::config::AppConfig;
use fpl_leagues::model::Manager;
use fpl_leagues::palette::LeagueColor;
use fpl_leagues::sort::SortKey;
use fpl_leagues::source;
use fpl_leagues::state::{AppState, Delta, ExportFormat, Focus, apply_delta};

const TABLE_COLUMNS: [(SortKey, &str, u16); 7] = [
    (SortKey::Id, "ID", 9),
    (SortKey::PlayerName, "Manager", 24),
    (SortKey::Fpl, "FPL", 8),
    (SortKey::Md, "MD", 7),
    (SortKey::Odds, "Odds", 7),
    (SortKey::XG, "xG", 8),
    (SortKey::Variance, "σ2", 8),
];
const RANK_WIDTH: u16 = 5;

struct App {
    state: AppState,
    export_dir: PathBuf,
    should_quit: bool,
    header_hitboxes: Vec<(Rect, SortKey)>,
}

impl App {
    fn new(state: AppState, export_dir: PathBuf) -> Self {
        Self {
            state,
            export_dir,
            should_quit: false,
            header_hitboxes: Vec::new(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.state.help_overlay = false;
            }
            return;
        }
        if key.code == KeyCode::Tab {
            self.leave_search();
            self.state.cycle_focus();
            return;
        }
        match self.state.focus {
            Focus::Search => self.on_search_key(key, now),
            Focus::Leagues => self.on_leagues_key(key, now),
            Focus::Table => self.on_table_key(key, now),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.leave_search();
                self.state.focus = Focus::Table;
            }
            KeyCode::Backspace => self.state.search_backspace(now),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.search_clear(now)
            }
            KeyCode::Char(c) => self.state.search_push(c, now),
            _ => {}
        }
    }

    fn on_leagues_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.league_cursor_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.league_cursor_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => self.state.toggle_league_at_cursor(),
            KeyCode::Char('a') => self.state.toggle_all_leagues(),
            KeyCode::Esc => self.state.focus = Focus::Table,
            _ => self.on_common_key(key, now),
        }
    }

    fn on_table_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('/') => self.state.focus = Focus::Search,
            KeyCode::Char('l') => self.state.focus = Focus::Leagues,
            KeyCode::Char('a') => self.state.toggle_all_leagues(),
            KeyCode::Char(c @ '1'..='7') => {
                let idx = c as usize - '1' as usize;
                self.state.click_column(TABLE_COLUMNS[idx].0);
            }
            _ => self.on_common_key(key, now),
        }
    }

    fn on_common_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('e') => {
                self.state
                    .export_visible(&self.export_dir, ExportFormat::Csv, now)
            }
            KeyCode::Char('x') => {
                self.state
                    .export_visible(&self.export_dir, ExportFormat::Workbook, now)
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let hit = self.header_hitboxes.iter().find(|(rect, _)| {
            mouse.column >= rect.x
                && mouse.column < rect.x + rect.width
                && mouse.row >= rect.y
                && mouse.row < rect.y + rect.height
        });
        if let Some((_, key)) = hit {
            let key = *key;
            self.state.click_column(key);
        }
    }

    fn leave_search(&mut self) {
        if self.state.focus == Focus::Search {
            self.state.commit_search();
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let mut state = AppState::new(config.league_colors.clone(), config.filter_debounce);
    state.source_label = config.source.label();
    state.push_log(format!("[INFO] Loading {}", state.source_label));

    let (tx, rx) = mpsc::channel();
    source::spawn_loader(config.source.clone(), config.http_timeout, tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state, config.export_dir);
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
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.state.tick(Instant::now());

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(chunks[1]);
    render_sidebar(frame, body[0], &app.state);
    app.header_hitboxes = render_table(frame, body[1], &app.state);

    render_logs(frame, chunks[2], &app.state);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let view = &state.view;
    let sort = view.sort();
    let status = if state.loading {
        "loading…".to_string()
    } else if let Some(err) = &state.config_error {
        format!("config error: {err}")
    } else {
        format!(
            "{} of {} managers | updated {}",
            view.visible().len(),
            view.dataset().managers.len(),
            view.dataset().updated_label()
        )
    };
    format!(
        " FPL LEAGUES | {} | Sort: {} {} | {}",
        state.source_label,
        column_label(sort.key),
        sort.direction.arrow(),
        status
    )
}

fn footer_text(state: &AppState) -> String {
    match state.focus {
        Focus::Table => {
            "j/k Move | 1-7 Sort | / Search | l Leagues | a All | e CSV | x XLSX | Tab Focus | ? Help | q Quit".to_string()
        }
        Focus::Search => "Type to filter | Backspace | Ctrl-u Clear | Enter/Esc Done".to_string(),
        Focus::Leagues => {
            "j/k Move | Space Toggle | a All | e CSV | x XLSX | Esc Table | q Quit".to_string()
        }
    }
}

fn column_label(key: SortKey) -> &'static str {
    TABLE_COLUMNS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, label, _)| *label)
        .unwrap_or("?")
}

fn league_color(color: LeagueColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(6),
        ])
        .split(area);

    let pending = if state.search_debounce.is_pending() {
        "…"
    } else {
        ""
    };
    let cursor = if state.focus == Focus::Search { "▏" } else { "" };
    let search = Paragraph::new(format!("{}{cursor}{pending}", state.search_input))
        .block(focus_block("Search", state.focus == Focus::Search));
    frame.render_widget(search, sections[0]);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, league) in state.leagues().iter().enumerate() {
        let checked = if state.view.is_active(league.id) {
            "[x]"
        } else {
            "[ ]"
        };
        let mut style = match state.view.palette().color(league.id) {
            Ok(color) => Style::default().bg(league_color(color)).fg(Color::White),
            Err(_) => Style::default(),
        };
        if state.focus == Focus::Leagues && idx == state.league_cursor {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(
            format!("{checked} {}", league.name),
            style,
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No leagues",
            Style::default().fg(Color::DarkGray),
        )));
    }
    let leagues =
        Paragraph::new(lines).block(focus_block("Leagues", state.focus == Focus::Leagues));
    frame.render_widget(leagues, sections[1]);

    let detail = match state.selected_manager() {
        Some(m) => manager_detail(state, m),
        None => "No manager selected".to_string(),
    };
    let detail = Paragraph::new(detail)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Selected"));
    frame.render_widget(detail, sections[2]);
}

fn manager_detail(state: &AppState, m: &Manager) -> String {
    let leagues = state
        .view
        .badge(m)
        .ids()
        .map(|id| {
            state
                .view
                .dataset()
                .league_name(id)
                .unwrap_or("?")
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(", ");
    let v = &m.scores.variability;
    format!(
        "{}\n{}\nsd {} | {:.1}% | abs {}\n{}",
        m.player_name,
        leagues,
        v.sd,
        v.perc * 100.0,
        v.abs_sd,
        m.profile_url()
    )
}

fn table_constraints() -> Vec<Constraint> {
    let mut widths = vec![Constraint::Length(RANK_WIDTH)];
    widths.extend(TABLE_COLUMNS.iter().map(|(_, _, w)| Constraint::Length(*w)));
    widths.push(Constraint::Min(6));
    widths
}

fn render_table(frame: &mut Frame, area: Rect, state: &AppState) -> Vec<(Rect, SortKey)> {
    let block = focus_block("Managers", state.focus == Focus::Table);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let widths = table_constraints();
    let hitboxes = render_table_header(frame, sections[0], &widths, state);

    let list_area = sections[1];
    let visible = state.visible();
    if visible.is_empty() {
        let msg = if state.loading {
            "Loading…"
        } else if state.view.dataset().is_empty() {
            "No data"
        } else {
            "No managers match the current leagues and search"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return hitboxes;
    }
    if list_area.height == 0 {
        return hitboxes;
    }

    let rows = list_area.height as usize;
    let (start, end) = visible_range(state.selected, visible.len(), rows);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        render_manager_row(frame, row_area, &widths, state, idx, &visible[idx]);
    }
    hitboxes
}

fn render_table_header(
    frame: &mut Frame,
    area: Rect,
    widths: &[Constraint],
    state: &AppState,
) -> Vec<(Rect, SortKey)> {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);
    let sort = state.view.sort();

    render_cell_text(frame, cols[0], "#", style);
    let mut hitboxes = Vec::with_capacity(TABLE_COLUMNS.len());
    for (offset, (key, label, _)) in TABLE_COLUMNS.iter().enumerate() {
        let col = cols[offset + 1];
        let text = if *key == sort.key {
            format!("{label}{}", sort.direction.arrow())
        } else {
            label.to_string()
        };
        render_cell_text(frame, col, &text, style);
        hitboxes.push((col, *key));
    }
    render_cell_text(frame, cols[TABLE_COLUMNS.len() + 1], "Also", style);
    hitboxes
}

fn render_manager_row(
    frame: &mut Frame,
    area: Rect,
    widths: &[Constraint],
    state: &AppState,
    idx: usize,
    m: &Manager,
) {
    let paint = state.view.paint(m).ok();
    let mut row_style = match paint.as_ref().and_then(|p| p.primary) {
        Some(color) => Style::default().bg(league_color(color)).fg(Color::White),
        None => Style::default(),
    };
    if idx == state.selected {
        row_style = row_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }
    frame.render_widget(Block::default().style(row_style), area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let s = &m.scores;
    let cells = [
        format!("{}", idx + 1),
        m.id.to_string(),
        m.player_name.clone(),
        s.fpl.to_string(),
        s.md.to_string(),
        s.odds.to_string(),
        s.xg.to_string(),
        s.variance.to_string(),
    ];
    for (col, text) in cols.iter().zip(cells.iter()) {
        render_cell_text(frame, *col, text, row_style);
    }

    let markers: Vec<Span> = paint
        .map(|p| p.markers)
        .unwrap_or_default()
        .into_iter()
        .map(|(_, color)| Span::styled("■ ", row_style.fg(league_color(color))))
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(markers)).style(row_style),
        cols[TABLE_COLUMNS.len() + 1],
    );
}

fn render_logs(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    if let Some(path) = &state.export.path {
        lines.push(Line::from(Span::styled(
            format!("Exported {} rows → {path}", state.export.rows),
            Style::default().fg(Color::Green),
        )));
    } else if let Some(err) = &state.export.error {
        lines.push(Line::from(Span::styled(
            format!("Export failed: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    let room = (area.height as usize).saturating_sub(2 + lines.len());
    let skip = state.logs.len().saturating_sub(room);
    for entry in state.logs.iter().skip(skip) {
        let style = if entry.starts_with("[ERROR]") {
            Style::default().fg(Color::Red)
        } else if entry.starts_with("[WARN]") {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(entry.clone(), style)));
    }
    let logs = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Log"));
    frame.render_widget(logs, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup);
    let text = [
        "FPL Leagues - Help",
        "",
        "Table:",
        "  j/k or ↑/↓   Move selection",
        "  1-7          Sort by ID, Manager, FPL, MD, Odds, xG, σ2",
        "               (same column again flips the direction)",
        "  click        Header cells sort too",
        "  /            Search manager names",
        "  l            League panel",
        "  a            Show all leagues / hide all",
        "  e            Export visible rows to fpl-leagues.csv",
        "  x            Export visible rows to fpl-leagues.xlsx",
        "",
        "Leagues:",
        "  j/k          Move",
        "  Space        Show / hide league",
        "",
        "Tab cycles focus, ? closes this help, q quits.",
    ]
    .join("\n");
    let help = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    frame.render_widget(help, popup);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total <= visible {
        return (0, total);
    }
    let half = visible / 2;
    let start = selected.saturating_sub(half).min(total - visible);
    (start, start + visible)
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
