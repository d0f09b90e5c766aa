use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};

use crisis_market::config::Config;
use crisis_market::input::{
    parse_main_command, parse_name_command, parse_popup_command, NameCommand, PopupCommand,
    UiCommand,
};
use crisis_market::leaderboard::LeaderboardStore;
use crisis_market::model::trade::TradeSide;
use crisis_market::scenario::endgame_verdict;
use crisis_market::session::{DayOutcome, Session};
use crisis_market::ui::{self, AppState, Popup, Screen};

const TICKER_ROTATE_SECS: u64 = 5;
const FORCED_CRASH_MULTIPLIER: f64 = 0.5;

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // Log to a file so tracing output does not interfere with the TUI.
    let log_file = std::sync::Arc::new(std::fs::File::create("crisis-market.log")?);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let leaderboard = LeaderboardStore::open_default()?;
    tracing::info!(
        companies = config.market.companies.len(),
        total_days = config.session.total_days,
        leaderboard_entries = leaderboard.len(),
        "starting crisis-market"
    );

    let mut session = Session::new(&config, leaderboard, StdRng::from_entropy());
    let mut app = AppState::default();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut app, &mut session);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    session: &mut Session<StdRng>,
) -> Result<()> {
    let mut last_ticker = Instant::now();
    loop {
        terminal.draw(|frame| ui::render(frame, app, session))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.popup.is_some() {
                    match parse_popup_command(&key.code) {
                        Some(PopupCommand::Dismiss) => app.popup = None,
                        Some(PopupCommand::Quit) => break,
                        None => {}
                    }
                    continue;
                }
                match app.screen {
                    Screen::NameEntry => {
                        if !handle_name_key(&key.code, app, session) {
                            break;
                        }
                    }
                    Screen::Dashboard => {
                        if !handle_dashboard_key(&key.code, app, session) {
                            break;
                        }
                    }
                }
            }
        }

        if last_ticker.elapsed() >= Duration::from_secs(TICKER_ROTATE_SECS) {
            app.advance_ticker();
            last_ticker = Instant::now();
        }
    }
    Ok(())
}

fn handle_name_key(
    key_code: &crossterm::event::KeyCode,
    app: &mut AppState,
    session: &mut Session<StdRng>,
) -> bool {
    match parse_name_command(key_code) {
        Some(NameCommand::Push(c)) => {
            app.name_input.push(c);
        }
        Some(NameCommand::Backspace) => {
            app.name_input.pop();
        }
        Some(NameCommand::Submit) => match session.start(&app.name_input) {
            Ok(()) => {
                app.screen = Screen::Dashboard;
                app.push_log(format!(
                    "Welcome, {}. {} trading days ahead.",
                    app.name_input.trim(),
                    session.total_days()
                ));
            }
            Err(e) => {
                app.popup = Some(Popup {
                    title: "Cannot start".to_string(),
                    body: e.to_string(),
                });
            }
        },
        Some(NameCommand::Quit) => return false,
        None => {}
    }
    true
}

fn handle_dashboard_key(
    key_code: &crossterm::event::KeyCode,
    app: &mut AppState,
    session: &mut Session<StdRng>,
) -> bool {
    let roster_len = session.market().companies().len();
    match parse_main_command(key_code) {
        Some(UiCommand::Quit) => return false,
        Some(UiCommand::CompanyUp) => {
            app.selected = app.selected.saturating_sub(1);
        }
        Some(UiCommand::CompanyDown) => {
            app.selected = (app.selected + 1).min(roster_len.saturating_sub(1));
        }
        Some(UiCommand::ToggleAllChart) => {
            app.show_all_chart = !app.show_all_chart;
        }
        Some(UiCommand::NextDay) => match session.advance() {
            Ok(DayOutcome::Advanced { day }) => {
                app.push_log(format!("Day {} played.", day));
            }
            Ok(DayOutcome::CrisisStruck { day, event }) => {
                app.push_log(format!("Day {}: {}", day, event.headline));
                app.popup = Some(Popup {
                    title: event.headline,
                    body: event.body,
                });
            }
            Ok(DayOutcome::Finished(settlement)) => {
                let (title, blurb) = endgame_verdict(settlement.profit_loss);
                app.push_log(format!(
                    "Session over. Net worth ${:.2} ({:+.2}).",
                    settlement.net_worth, settlement.profit_loss
                ));
                app.popup = Some(Popup {
                    title: title.to_string(),
                    body: format!(
                        "{}\n\nFinal net worth: ${:.2}\nProfit/loss: {:+.2}",
                        blurb, settlement.net_worth, settlement.profit_loss
                    ),
                });
            }
            Err(e) => app.push_log(format!("Rejected: {}", e)),
        },
        Some(cmd @ (UiCommand::Buy | UiCommand::Sell)) => {
            let side = if cmd == UiCommand::Buy {
                TradeSide::Buy
            } else {
                TradeSide::Sell
            };
            let Some(company) = session
                .market()
                .companies()
                .get(app.selected)
                .map(|c| c.name.clone())
            else {
                return true;
            };
            match session.trade(&company, side) {
                Ok(receipt) => app.push_log(format!(
                    "{} 1 {} @ {:.2}, balance {:.2}, held {}",
                    side.as_label(),
                    company,
                    receipt.price,
                    receipt.balance,
                    receipt.shares_held
                )),
                Err(e) => app.push_log(format!("Rejected: {}", e)),
            }
        }
        Some(UiCommand::ForceCrash) => match session.force_shock(FORCED_CRASH_MULTIPLIER) {
            Ok(()) => app.push_log("Forced market crash applied."),
            Err(e) => app.push_log(format!("Rejected: {}", e)),
        },
        Some(UiCommand::ResetLeaderboard) => {
            match session.leaderboard_mut().reset() {
                Ok(()) => app.push_log("Leaderboard reset."),
                Err(e) => app.push_log(format!("Leaderboard reset failed: {}", e)),
            }
        }
        None => {}
    }
    true
}
