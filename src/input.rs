use crossterm::event::KeyCode;

/// Commands available while the session is on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    NextDay,
    Buy,
    Sell,
    CompanyUp,
    CompanyDown,
    ToggleAllChart,
    ForceCrash,
    ResetLeaderboard,
}

/// Commands available on the username entry screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCommand {
    Push(char),
    Backspace,
    Submit,
    Quit,
}

/// Commands available while a headline popup is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupCommand {
    Dismiss,
    Quit,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Up => Some(UiCommand::CompanyUp),
        KeyCode::Down => Some(UiCommand::CompanyDown),
        KeyCode::Enter => Some(UiCommand::NextDay),
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'n' => Some(UiCommand::NextDay),
            'b' => Some(UiCommand::Buy),
            's' => Some(UiCommand::Sell),
            'k' => Some(UiCommand::CompanyUp),
            'j' => Some(UiCommand::CompanyDown),
            'a' => Some(UiCommand::ToggleAllChart),
            'c' => Some(UiCommand::ForceCrash),
            'x' => Some(UiCommand::ResetLeaderboard),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_name_command(key_code: &KeyCode) -> Option<NameCommand> {
    match key_code {
        KeyCode::Enter => Some(NameCommand::Submit),
        KeyCode::Backspace => Some(NameCommand::Backspace),
        KeyCode::Esc => Some(NameCommand::Quit),
        KeyCode::Char(c) if c.is_ascii_graphic() || *c == ' ' => Some(NameCommand::Push(*c)),
        _ => None,
    }
}

pub fn parse_popup_command(key_code: &KeyCode) -> Option<PopupCommand> {
    match key_code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(PopupCommand::Dismiss),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(PopupCommand::Quit),
        _ => None,
    }
}
