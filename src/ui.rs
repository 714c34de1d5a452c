use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

use savings_circle::{format_naira, GroupLedger, TierKey, MAX_MEMBERS, TIERS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    EditingName,
    ConfirmWithdraw { id: String, name: String, amount: String },
    ConfirmReset,
}

pub struct App {
    pub ledger: GroupLedger,
    pub state: TableState,
    pub mode: Mode,
    pub name_input: String,
    pub selected_tier: Option<TierKey>,
    pub status: Option<String>,
}

impl App {
    pub fn new(ledger: GroupLedger) -> Self {
        let mut state = TableState::default();
        if ledger.member_count() > 0 {
            state.select(Some(0));
        }

        Self {
            ledger,
            state,
            mode: Mode::Normal,
            name_input: String::new(),
            selected_tier: None,
            status: None,
        }
    }

    pub fn selected_member_id(&self) -> Option<String> {
        self.state
            .selected()
            .and_then(|i| self.ledger.members().get(i))
            .map(|m| m.id.clone())
    }

    pub fn clear_form(&mut self) {
        self.name_input.clear();
        self.selected_tier = None;
    }

    /// Register from the form fields, surfacing validation as a status
    /// message instead of letting the keypress through.
    pub fn register_from_form(&mut self) {
        let tier_key = self.selected_tier.map(|t| t.as_str()).unwrap_or("");
        match self.ledger.register_member_by_key(&self.name_input, tier_key) {
            Ok(member) => {
                self.status = Some(format!(
                    "Registered {} into {}.",
                    member.name,
                    member.tier_label()
                ));
                self.clear_form();
                if self.state.selected().is_none() {
                    self.state.select(Some(0));
                }
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn simulate_week(&mut self) {
        match self.ledger.simulate_week() {
            Ok(updated) => {
                self.status = Some(format!(
                    "Applied 1 week of interest to {} member(s).",
                    updated.len()
                ));
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    /// Ask before removing: the ledger itself withdraws unconditionally.
    pub fn request_withdraw(&mut self) {
        let member = self
            .selected_member_id()
            .and_then(|id| self.ledger.find_member(&id).cloned());

        match member {
            Some(member) => {
                self.mode = Mode::ConfirmWithdraw {
                    id: member.id.clone(),
                    name: member.name.clone(),
                    amount: format_naira(member.contribution),
                };
            }
            None => self.status = Some("No member selected.".to_string()),
        }
    }

    pub fn confirm_withdraw(&mut self, id: &str) {
        match self.ledger.withdraw_member(id) {
            Ok(member) => {
                self.status = Some(format!(
                    "{} withdrew ₦{} and has been removed.",
                    member.name,
                    format_naira(member.contribution)
                ));
                self.fix_selection();
            }
            Err(err) => self.status = Some(err.to_string()),
        }
        self.mode = Mode::Normal;
    }

    pub fn confirm_reset(&mut self) {
        self.ledger.reset_group();
        self.state.select(None);
        self.status = Some("Group reset. All members cleared.".to_string());
        self.mode = Mode::Normal;
    }

    fn fix_selection(&mut self) {
        let len = self.ledger.member_count();
        if len == 0 {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= len {
                self.state.select(Some(len - 1));
            }
        }
    }

    pub fn next(&mut self) {
        let len = self.ledger.member_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.ledger.member_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.mode.clone() {
                Mode::ConfirmWithdraw { id, .. } => match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_withdraw(&id),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        app.mode = Mode::Normal;
                        app.status = Some("Withdrawal cancelled.".to_string());
                    }
                    _ => {}
                },
                Mode::ConfirmReset => match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_reset(),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        app.mode = Mode::Normal;
                        app.status = Some("Reset cancelled.".to_string());
                    }
                    _ => {}
                },
                Mode::EditingName => match key.code {
                    KeyCode::Enter | KeyCode::Esc => app.mode = Mode::Normal,
                    KeyCode::Backspace => {
                        app.name_input.pop();
                    }
                    KeyCode::Char(c) => app.name_input.push(c),
                    _ => {}
                },
                Mode::Normal => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('n') => {
                        app.status = None;
                        app.mode = Mode::EditingName;
                    }
                    KeyCode::Char('1') => app.selected_tier = Some(TierKey::Tier1),
                    KeyCode::Char('2') => app.selected_tier = Some(TierKey::Tier2),
                    KeyCode::Char('3') => app.selected_tier = Some(TierKey::Tier3),
                    KeyCode::Char('r') | KeyCode::Enter => app.register_from_form(),
                    KeyCode::Char('c') => {
                        app.clear_form();
                        app.status = None;
                    }
                    KeyCode::Char('s') => app.simulate_week(),
                    KeyCode::Char('w') => app.request_withdraw(),
                    KeyCode::Char('x') => app.mode = Mode::ConfirmReset,
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    _ => {}
                },
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with totals
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Registration form
            Constraint::Percentage(60), // Roster
        ])
        .split(chunks[1]);

    render_registration(f, content_chunks[0], app);
    render_roster(f, content_chunks[1], app);

    render_status_bar(f, chunks[2], app);

    match &app.mode {
        Mode::ConfirmWithdraw { name, amount, .. } => {
            let question = format!("Withdraw ₦{} for {}?", amount, name);
            render_confirm(f, &question);
        }
        Mode::ConfirmReset => render_confirm(f, "Reset all members?"),
        _ => {}
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let header_spans = vec![
        Span::styled(
            "💰 Savings Group Dashboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Total Saved: ₦{}", format_naira(app.ledger.total_saved())),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Members: {}/{}", app.ledger.member_count(), MAX_MEMBERS),
            Style::default().fg(Color::White),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(header_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_registration(f: &mut Frame, area: Rect, app: &App) {
    let name_display = if app.mode == Mode::EditingName {
        format!("{}_", app.name_input)
    } else if app.name_input.is_empty() {
        "<press n to type>".to_string()
    } else {
        app.name_input.clone()
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(Color::Yellow)),
            Span::raw(name_display),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Tier (press 1/2/3):",
            Style::default().fg(Color::Yellow),
        )),
    ];

    for tier in TIERS.iter() {
        let selected = app.selected_tier == Some(tier.key);
        let marker = if selected { "→ " } else { "  " };
        let style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", marker, tier.label),
            style,
        )));
    }

    lines.push(Line::from(""));

    match app.selected_tier {
        Some(tier) => {
            let preview = tier.definition().preview();
            lines.push(Line::from(Span::styled(
                "💡 Tier preview",
                Style::default().fg(Color::Magenta),
            )));
            lines.push(Line::from(format!(
                "   Amount: ₦{}",
                format_naira(preview.amount)
            )));
            lines.push(Line::from(format!(
                "   Weekly Interest: {:.0}%",
                preview.weekly_rate * 100.0
            )));
            lines.push(Line::from(format!(
                "   After 1 Week: ₦{}",
                format_naira(preview.after_one_week)
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Select a tier to view details.",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Registration 🧾 "),
    );

    f.render_widget(form, area);
}

fn render_roster(f: &mut Frame, area: Rect, app: &mut App) {
    if app.ledger.member_count() == 0 {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No members yet — register someone to start.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Savings Dashboard 📊 "),
        );
        f.render_widget(empty, area);
        return;
    }

    let header_cells = ["Name", "Tier", "Current", "Interest", "Next Week"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.ledger.members().iter().map(|m| {
        let cells = vec![
            Cell::from(m.name.clone()),
            Cell::from(m.tier_label()),
            Cell::from(format!("₦{}", format_naira(m.contribution)))
                .style(Style::default().fg(Color::Green)),
            Cell::from(format!("₦{}", format_naira(m.weekly_interest()))),
            Cell::from(format!("₦{}", format_naira(m.projected_next_week())))
                .style(Style::default().fg(Color::Cyan)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(18),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Savings Dashboard 📊 "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(message) = &app.status {
        status_spans.push(Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Magenta),
        ));
        status_spans.push(Span::raw("| "));
    }

    status_spans.push(Span::styled("n", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Name | "));
    status_spans.push(Span::styled("1-3", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Tier | "));
    status_spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Register | "));
    status_spans.push(Span::styled("s", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Simulate | "));
    status_spans.push(Span::styled("w", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Withdraw | "));
    status_spans.push(Span::styled("x", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Reset | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_confirm(f: &mut Frame, question: &str) {
    let area = centered_rect(50, f.size());

    let lines = vec![
        Line::from(Span::styled(
            question.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(Color::Red)),
            Span::raw(" No"),
        ]),
    ];

    let dialog = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Confirm "),
    );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, parent: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(parent);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
