//! Tastenbelegung der Engine.
//!
//! Übersetzt eine Taste plus Modifier in eine zustandsunabhängige
//! `KeyAction`. Ob die Aktion greift (z.B. nur während einer Textbearbeitung),
//! entscheidet das Intent-Mapping.

use super::{FormatCommand, Key, Modifiers};
use crate::core::Granularity;

/// Caret-Bewegung innerhalb des Text-Puffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaretMotion {
    Left,
    Right,
    Home,
    End,
}

/// Editor-Aktion einer Tastenkombination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Ctrl+B / Ctrl+I / Ctrl+U / Ctrl+\
    Format(FormatCommand),
    /// Ctrl+Alt+1 (Simple) / Ctrl+Alt+2 (Normal)
    SetGranularity(Granularity),
    /// Ctrl+Shift+D
    DebugDump,
    /// Ctrl+Shift+M
    TogglePlacementMode,
    /// Ctrl+Shift+A
    AutoArrange,
    /// Ctrl+A
    SelectAll,
    /// Enter ohne Shift
    Commit,
    /// Shift+Enter
    LineBreak,
    Escape,
    Backspace,
    Delete,
    MoveCaret { motion: CaretMotion, extend: bool },
}

/// Löst eine Tastenkombination auf. Reine Zeichen ohne Ctrl/Cmd liefern
/// `None`; sie kommen als Texteingabe beim Editor an.
pub fn resolve_key(key: Key, modifiers: Modifiers) -> Option<KeyAction> {
    if modifiers.command() {
        return resolve_command_chord(key, modifiers);
    }

    match key {
        Key::Enter if modifiers.shift => Some(KeyAction::LineBreak),
        Key::Enter => Some(KeyAction::Commit),
        Key::Escape => Some(KeyAction::Escape),
        Key::Backspace => Some(KeyAction::Backspace),
        Key::Delete => Some(KeyAction::Delete),
        Key::ArrowLeft => caret(CaretMotion::Left, modifiers),
        Key::ArrowRight => caret(CaretMotion::Right, modifiers),
        Key::Home | Key::ArrowUp => caret(CaretMotion::Home, modifiers),
        Key::End | Key::ArrowDown => caret(CaretMotion::End, modifiers),
        Key::Tab | Key::Char(_) => None,
    }
}

fn caret(motion: CaretMotion, modifiers: Modifiers) -> Option<KeyAction> {
    Some(KeyAction::MoveCaret {
        motion,
        extend: modifiers.shift,
    })
}

fn resolve_command_chord(key: Key, modifiers: Modifiers) -> Option<KeyAction> {
    let Key::Char(ch) = key else {
        return None;
    };
    let ch = ch.to_ascii_lowercase();

    if modifiers.alt {
        return match ch {
            '1' => Some(KeyAction::SetGranularity(Granularity::Simple)),
            '2' => Some(KeyAction::SetGranularity(Granularity::Normal)),
            _ => None,
        };
    }

    if modifiers.shift {
        return match ch {
            'd' => Some(KeyAction::DebugDump),
            'm' => Some(KeyAction::TogglePlacementMode),
            'a' => Some(KeyAction::AutoArrange),
            _ => None,
        };
    }

    match ch {
        'b' => Some(KeyAction::Format(FormatCommand::Bold)),
        'i' => Some(KeyAction::Format(FormatCommand::Italic)),
        'u' => Some(KeyAction::Format(FormatCommand::Underline)),
        '\\' => Some(KeyAction::Format(FormatCommand::RemoveFormat)),
        'a' => Some(KeyAction::SelectAll),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(ctrl: bool, shift: bool, alt: bool) -> Modifiers {
        Modifiers {
            ctrl,
            shift,
            alt,
            meta: false,
        }
    }

    #[test]
    fn formatting_shortcuts() {
        assert_eq!(
            resolve_key(Key::Char('b'), Modifiers::ctrl()),
            Some(KeyAction::Format(FormatCommand::Bold))
        );
        assert_eq!(
            resolve_key(Key::Char('U'), Modifiers::ctrl()),
            Some(KeyAction::Format(FormatCommand::Underline))
        );
        assert_eq!(
            resolve_key(Key::Char('\\'), Modifiers::ctrl()),
            Some(KeyAction::Format(FormatCommand::RemoveFormat))
        );
    }

    #[test]
    fn granularity_pair_and_debug_dump() {
        assert_eq!(
            resolve_key(Key::Char('1'), with(true, false, true)),
            Some(KeyAction::SetGranularity(Granularity::Simple))
        );
        assert_eq!(
            resolve_key(Key::Char('2'), with(true, false, true)),
            Some(KeyAction::SetGranularity(Granularity::Normal))
        );
        assert_eq!(
            resolve_key(Key::Char('d'), with(true, true, false)),
            Some(KeyAction::DebugDump)
        );
    }

    #[test]
    fn enter_commits_unless_shift() {
        assert_eq!(resolve_key(Key::Enter, Modifiers::NONE), Some(KeyAction::Commit));
        assert_eq!(resolve_key(Key::Enter, Modifiers::shift()), Some(KeyAction::LineBreak));
    }

    #[test]
    fn plain_characters_are_text_input() {
        assert_eq!(resolve_key(Key::Char('x'), Modifiers::NONE), None);
        assert_eq!(resolve_key(Key::Char('b'), Modifiers::shift()), None);
    }
}
