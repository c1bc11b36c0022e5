//! Key bindings: maps key events to application actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::layout::AppMode;

/// Application-level actions triggered by key events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Play the next step.
    Advance,
    /// Play the previous step.
    Retreat,
    /// Jump back to the first step.
    Reset,
    /// Switch between Edit and Perform.
    ToggleMode,
    /// Show or hide the log overlay.
    ToggleLog,
    /// Save the script now.
    Save,
    EditorInsert(char),
    EditorBackspace,
    EditorDelete,
    EditorNewline,
    EditorLeft,
    EditorRight,
    EditorUp,
    EditorDown,
    EditorHome,
    EditorEnd,
}

/// Map a key event to an action for the current mode.
///
/// While the log overlay is open, Esc closes it instead of its usual meaning.
pub fn map_key(key: KeyEvent, mode: AppMode, log_visible: bool) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if log_visible && key.code == KeyCode::Esc {
        return Some(Action::ToggleLog);
    }

    // Bindings shared by both modes.
    match key.code {
        KeyCode::Char('l') if ctrl => return Some(Action::ToggleLog),
        KeyCode::Char('s') if ctrl => return Some(Action::Save),
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => return Some(Action::Quit),
        KeyCode::Tab => return Some(Action::ToggleMode),
        KeyCode::PageDown => return Some(Action::Advance),
        KeyCode::PageUp => return Some(Action::Retreat),
        _ => {}
    }

    match mode {
        AppMode::Perform => map_perform(key),
        AppMode::Edit if !ctrl => map_edit(key),
        AppMode::Edit => None,
    }
}

fn map_perform(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Advance),
        KeyCode::Left | KeyCode::Backspace => Some(Action::Retreat),
        KeyCode::Char('0') | KeyCode::Home => Some(Action::Reset),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('e') => Some(Action::ToggleMode),
        _ => None,
    }
}

fn map_edit(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::ToggleMode),
        KeyCode::Char(c) => Some(Action::EditorInsert(c)),
        KeyCode::Enter => Some(Action::EditorNewline),
        KeyCode::Backspace => Some(Action::EditorBackspace),
        KeyCode::Delete => Some(Action::EditorDelete),
        KeyCode::Left => Some(Action::EditorLeft),
        KeyCode::Right => Some(Action::EditorRight),
        KeyCode::Up => Some(Action::EditorUp),
        KeyCode::Down => Some(Action::EditorDown),
        KeyCode::Home => Some(Action::EditorHome),
        KeyCode::End => Some(Action::EditorEnd),
        _ => None,
    }
}
