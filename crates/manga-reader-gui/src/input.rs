//! egui input to view commands
//!
//! Key names follow the X keysym spelling used by the configured bindings
//! (`Left`, `Prior`, `space`, `F11`, ...).

use eframe::egui;
use manga_reader::{Command, KeyModifiers, ScreenPoint, ScreenRect};

/// Keysym name of an egui key
pub fn key_name(key: egui::Key) -> String {
    use egui::Key;

    let name = match key {
        Key::ArrowLeft => "Left",
        Key::ArrowRight => "Right",
        Key::ArrowUp => "Up",
        Key::ArrowDown => "Down",
        Key::PageUp => "Prior",
        Key::PageDown => "Next",
        Key::Home => "Home",
        Key::End => "End",
        Key::Insert => "Insert",
        Key::Delete => "Delete",
        Key::Escape => "Escape",
        Key::Tab => "Tab",
        Key::Backspace => "BackSpace",
        Key::Enter => "Return",
        Key::Space => "space",
        Key::Minus => "minus",
        Key::Plus => "plus",
        Key::Equals => "equal",
        Key::Comma => "comma",
        Key::Period => "period",
        Key::Slash => "slash",
        Key::Backslash => "backslash",
        Key::Semicolon => "semicolon",
        Key::Colon => "colon",
        Key::OpenBracket => "bracketleft",
        Key::CloseBracket => "bracketright",
        Key::Backtick => "grave",
        Key::Questionmark => "question",
        Key::Pipe => "bar",
        other => {
            let name = other.name();
            return if name.chars().count() == 1 {
                name.to_lowercase()
            } else {
                name.to_string()
            };
        }
    };
    name.to_string()
}

pub fn key_modifiers(modifiers: egui::Modifiers) -> KeyModifiers {
    KeyModifiers {
        shift: modifiers.shift,
        control: modifiers.ctrl || modifiers.mac_cmd,
        alt: modifiers.alt,
    }
}

/// Canvas-relative point
pub fn to_screen(origin: egui::Pos2, pos: egui::Pos2) -> ScreenPoint {
    ScreenPoint::new(pos.x - origin.x, pos.y - origin.y)
}

/// Commands for this frame's pointer activity on the canvas.
///
/// A primary press inside one of `clear_areas` (overlay text, selection box)
/// dismisses them; anywhere else it starts a new selection. Middle and right
/// clicks turn pages by screen half.
pub fn pointer_commands(
    ui: &egui::Ui,
    response: &egui::Response,
    clear_areas: &[ScreenRect],
    drawing: bool,
) -> Vec<Command> {
    let origin = response.rect.min;
    let mut commands = Vec::new();

    let (pressed, released, down, moved, press_origin, latest) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.primary_down(),
            i.pointer.delta() != egui::Vec2::ZERO,
            i.pointer.press_origin(),
            i.pointer.latest_pos(),
        )
    });

    if pressed {
        if let Some(pos) = press_origin.filter(|pos| response.rect.contains(*pos)) {
            let point = to_screen(origin, pos);
            if clear_areas.iter().any(|area| area.contains(point)) {
                commands.push(Command::ClearOverlay);
            } else {
                commands.push(Command::SelectionStart(point));
            }
        }
    }

    if down && moved && (drawing || commands.iter().any(is_start)) {
        if let Some(pos) = latest {
            commands.push(Command::SelectionDrag(to_screen(origin, pos)));
        }
    }

    if released && (drawing || commands.iter().any(is_start)) {
        commands.push(Command::SelectionEnd);
    }

    if response.double_clicked() {
        commands.push(Command::ClearOverlay);
    }

    if response.secondary_clicked() || response.middle_clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            commands.push(Command::SideTap { x: pos.x - origin.x });
        }
    }

    commands
}

fn is_start(command: &Command) -> bool {
    matches!(command, Command::SelectionStart(_))
}
