//! Keyboard input handling for the TUI.
//!
//! Digits and separators go to the focused field; letters are commands,
//! since no amount contains them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            false
        }
        AppState::EditingSettings => {
            handle_settings_input(app, key);
            false
        }
        AppState::Normal => handle_converter_input(app, key),
        AppState::Quitting => true,
    }
}

fn handle_converter_input(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('l') {
            app.clear_price();
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('s') => app.open_settings(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.toggle_focus(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Esc | KeyCode::Delete => app.clear_price(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
    false
}

fn handle_settings_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('s') => app.close_settings(),
        KeyCode::Enter => app.save_settings(),
        KeyCode::Up | KeyCode::BackTab => app.draft.row = app.draft.row.prev(),
        KeyCode::Down | KeyCode::Tab => app.draft.row = app.draft.row.next(),
        KeyCode::Left => app.draft.cycle(false),
        KeyCode::Right | KeyCode::Char(' ') => app.draft.cycle(true),
        _ => {}
    }
}
