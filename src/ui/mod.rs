pub mod chart;

use std::collections::VecDeque;

use rand::Rng;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::scenario::TICKER_MESSAGES;
use crate::session::{Phase, Session};
use chart::{CandleChart, PriceLines};

const MAX_LOG_LINES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    NameEntry,
    Dashboard,
}

#[derive(Debug, Clone)]
pub struct Popup {
    pub title: String,
    pub body: String,
}

/// Presentation-only state. Everything market- or money-shaped lives in the
/// engine; this is cursor positions, popups, and the message log.
pub struct AppState {
    pub screen: Screen,
    pub name_input: String,
    pub selected: usize,
    pub show_all_chart: bool,
    pub popup: Option<Popup>,
    pub ticker_offset: usize,
    log: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::NameEntry,
            name_input: String::new(),
            selected: 0,
            show_all_chart: false,
            popup: None,
            ticker_offset: 0,
            log: VecDeque::new(),
        }
    }
}

impl AppState {
    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.log.len() >= MAX_LOG_LINES {
            self.log.pop_front();
        }
        self.log.push_back(msg.into());
    }

    pub fn advance_ticker(&mut self) {
        self.ticker_offset = (self.ticker_offset + 1) % TICKER_MESSAGES.len();
    }

    fn ticker_line(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        for i in 0..3 {
            parts.push(TICKER_MESSAGES[(self.ticker_offset + i) % TICKER_MESSAGES.len()]);
        }
        format!("BREAKING: {}", parts.join("   |   "))
    }
}

pub fn render<R: Rng>(frame: &mut Frame, app: &AppState, session: &Session<R>) {
    match app.screen {
        Screen::NameEntry => render_name_entry(frame, app),
        Screen::Dashboard => render_dashboard(frame, app, session),
    }
    if let Some(popup) = &app.popup {
        render_popup(frame, popup);
    }
}

fn render_name_entry(frame: &mut Frame, app: &AppState) {
    let area = centered_rect(frame.area(), 50, 8);
    let lines = vec![
        Line::from("2008 Crisis Market"),
        Line::from(""),
        Line::from("Enter a username and press Enter to start:"),
        Line::from(Span::styled(
            format!("> {}_", app.name_input),
            Style::default().fg(Color::Cyan),
        )),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Welcome "));
    frame.render_widget(widget, area);
}

fn render_dashboard<R: Rng>(frame: &mut Frame, app: &AppState, session: &Session<R>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, rows[0], session);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(30)])
        .split(rows[1]);

    render_company_table(frame, columns[0], app, session);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(10)])
        .split(columns[1]);

    render_chart(frame, right[0], app, session);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[1]);

    render_leaderboard(frame, bottom[0], session);
    render_log(frame, bottom[1], app);

    let ticker = Paragraph::new(app.ticker_line())
        .style(Style::default().fg(Color::Yellow).bg(Color::Black));
    frame.render_widget(ticker, rows[2]);

    let help = Paragraph::new(
        "n/Enter next day  b buy  s sell  j/k select  a all-chart  c force crash  x reset board  q quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[3]);
}

fn render_header<R: Rng>(frame: &mut Frame, area: Rect, session: &Session<R>) {
    let phase = match session.phase() {
        Phase::NotStarted => "not started",
        Phase::InProgress => "in progress",
        Phase::Finished => "finished",
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" Day {} / {} ", session.day(), session.total_days()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Balance ${:.2}", session.ledger().balance()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Net worth ${:.2}", session.net_worth()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::raw(format!(
            "Player: {}  ({})",
            session.username().unwrap_or("-"),
            phase
        )),
    ]);
    let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_company_table<R: Rng>(frame: &mut Frame, area: Rect, app: &AppState, session: &Session<R>) {
    let market = session.market();
    let ledger = session.ledger();
    let mut rows = Vec::with_capacity(market.companies().len());
    for (i, company) in market.companies().iter().enumerate() {
        let history = market.history(&company.name).unwrap_or(&[]);
        let current = history.last().copied().unwrap_or(0.0);
        let prev = if history.len() > 1 {
            history[history.len() - 2]
        } else {
            current
        };
        let price_color = if current >= prev {
            Color::Green
        } else {
            Color::Red
        };
        let style = if i == app.selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        rows.push(
            Row::new(vec![
                Cell::from(company.abbr.clone()),
                Cell::from(format!("{:>9.2}", current))
                    .style(Style::default().fg(price_color)),
                Cell::from(format!("{:>6}", ledger.shares_held(&company.name))),
            ])
            .style(style),
        );
    }
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(7),
        ],
    )
    .header(
        Row::new(vec!["Sym", "Price", "Shares"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" Companies "));
    frame.render_widget(table, area);
}

fn render_chart<R: Rng>(frame: &mut Frame, area: Rect, app: &AppState, session: &Session<R>) {
    let market = session.market();
    if app.show_all_chart {
        let series: Vec<(&str, &[f64])> = market
            .companies()
            .iter()
            .filter_map(|c| {
                market
                    .history(&c.name)
                    .ok()
                    .map(|h| (c.abbr.as_str(), h))
            })
            .collect();
        frame.render_widget(PriceLines::new("All companies", series), area);
        return;
    }

    let Some(company) = market.companies().get(app.selected) else {
        return;
    };
    match market.candles(&company.name) {
        Ok(candles) => {
            let title = format!("{} ({})", company.name, company.abbr);
            frame.render_widget(CandleChart::new(title, candles), area);
        }
        Err(_) => {
            frame.render_widget(
                Block::default().borders(Borders::ALL).title(" Chart "),
                area,
            );
        }
    }
}

fn render_leaderboard<R: Rng>(frame: &mut Frame, area: Rect, session: &Session<R>) {
    let entries = session.leaderboard().sorted_entries();
    let rows: Vec<Row> = entries
        .iter()
        .take(area.height.saturating_sub(3) as usize)
        .map(|(name, score)| {
            let color = if *score >= 0.0 { Color::Green } else { Color::Red };
            Row::new(vec![
                Cell::from(name.clone()),
                Cell::from(format!("{:+.2}", score)).style(Style::default().fg(color)),
            ])
        })
        .collect();
    let table = Table::new(rows, [Constraint::Min(10), Constraint::Length(12)])
        .header(Row::new(vec!["Player", "P/L"]).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(Block::default().borders(Borders::ALL).title(" Leaderboard "));
    frame.render_widget(table, area);
}

fn render_log(frame: &mut Frame, area: Rect, app: &AppState) {
    let lines: Vec<Line> = app.log.iter().map(|m| Line::from(m.as_str())).collect();
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Log "));
    frame.render_widget(widget, area);
}

fn render_popup(frame: &mut Frame, popup: &Popup) {
    let area = centered_rect(frame.area(), 60, 12);
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            popup.title.clone(),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(popup.body.clone()),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Breaking News "),
        );
    frame.render_widget(widget, area);
}

fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height: height.min(area.height),
    }
}
