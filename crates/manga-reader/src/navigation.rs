//! Page index arithmetic
//!
//! Pure functions deciding how far a command moves the page index. The view
//! state calls into these and then re-runs the layout for the new index.

use crate::state::Command;
use crate::types::{FitMode, ReadingDirection, StepDirection};

/// The facts a navigation decision depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavContext {
    pub index: usize,
    pub page_count: usize,
    /// Spread mode as configured by the user
    pub spread: bool,
    /// Validity reported by the layout of the current index
    pub width_valid: bool,
}

/// Signed distance of a next/previous page command.
///
/// Moving forward goes one page at a time when spreads are off, when the
/// current pair could not be shown together, or from the pair just before
/// the final pair (so the last two pages still pair up). Moving backward
/// from the first two pages returns to the first page.
pub fn advance_amount(ctx: NavContext, direction: StepDirection) -> isize {
    match direction {
        StepDirection::Forward => {
            let before_final_pair = ctx.page_count >= 3 && ctx.index == ctx.page_count - 3;
            if (before_final_pair && ctx.width_valid) || !ctx.width_valid || !ctx.spread {
                1
            } else {
                2
            }
        }
        StepDirection::Backward => {
            if ctx.index < 2 {
                -(ctx.index as isize)
            } else if !ctx.width_valid || !ctx.spread {
                -1
            } else {
                -2
            }
        }
    }
}

/// Index after moving by `amount`, or `None` when that leaves the archive
pub fn move_target(index: usize, page_count: usize, amount: isize) -> Option<usize> {
    let target = index as isize + amount;
    if target < 0 || target >= page_count as isize {
        None
    } else {
        Some(target as usize)
    }
}

/// First guess for the last view: the final pair in spread mode, otherwise
/// the final page.
pub fn jump_to_end_index(page_count: usize, spread: bool) -> usize {
    if spread && page_count >= 2 {
        page_count - 2
    } else {
        page_count.saturating_sub(1)
    }
}

/// A tap on the left half of the canvas moves forward, the right half moves
/// backward, whatever the reading direction.
pub fn side_tap_direction(x: f32, viewport_width: u32) -> StepDirection {
    if x < viewport_width as f32 / 2.0 {
        StepDirection::Forward
    } else {
        StepDirection::Backward
    }
}

/// Named actions a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NextImage,
    PrevImage,
    SingleStepForward,
    SingleStepBackward,
    JumpToBeginning,
    JumpToEnd,
    Rotate,
    SetBestFit,
    SetHeightFit,
    SetWidthFit,
    ToggleDoublePage,
    ToggleMangaMode,
    ToggleFullscreen,
}

const MANGA_BINDINGS: [(KeyAction, Command); 4] = [
    (KeyAction::NextImage, Command::Advance(StepDirection::Forward)),
    (KeyAction::PrevImage, Command::Advance(StepDirection::Backward)),
    (KeyAction::SingleStepForward, Command::Step(StepDirection::Forward)),
    (KeyAction::SingleStepBackward, Command::Step(StepDirection::Backward)),
];

const WESTERN_BINDINGS: [(KeyAction, Command); 4] = [
    (KeyAction::NextImage, Command::Advance(StepDirection::Backward)),
    (KeyAction::PrevImage, Command::Advance(StepDirection::Forward)),
    (KeyAction::SingleStepForward, Command::Step(StepDirection::Backward)),
    (KeyAction::SingleStepBackward, Command::Step(StepDirection::Forward)),
];

/// Direction-dependent bindings of the four paging actions
pub fn direction_bindings(direction: ReadingDirection) -> &'static [(KeyAction, Command); 4] {
    match direction {
        ReadingDirection::Manga => &MANGA_BINDINGS,
        ReadingDirection::Western => &WESTERN_BINDINGS,
    }
}

impl KeyAction {
    /// Resolve the action to a view command under `direction`
    pub fn command(self, direction: ReadingDirection) -> Command {
        if let Some((_, command)) = direction_bindings(direction)
            .iter()
            .find(|(action, _)| *action == self)
        {
            return *command;
        }

        match self {
            KeyAction::JumpToBeginning => Command::JumpStart,
            KeyAction::JumpToEnd => Command::JumpEnd,
            KeyAction::Rotate => Command::Rotate,
            KeyAction::SetBestFit => Command::SetFitMode(FitMode::Best),
            KeyAction::SetHeightFit => Command::SetFitMode(FitMode::Height),
            KeyAction::SetWidthFit => Command::SetFitMode(FitMode::Width),
            KeyAction::ToggleDoublePage => Command::ToggleSpread,
            KeyAction::ToggleMangaMode => Command::ToggleDirection,
            KeyAction::ToggleFullscreen => Command::ToggleFullscreen,
            // Paging actions are all covered by the direction tables
            KeyAction::NextImage
            | KeyAction::PrevImage
            | KeyAction::SingleStepForward
            | KeyAction::SingleStepBackward => Command::Redraw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(index: usize, page_count: usize, spread: bool, width_valid: bool) -> NavContext {
        NavContext {
            index,
            page_count,
            spread,
            width_valid,
        }
    }

    #[test]
    fn test_single_page_moves_by_one() {
        assert_eq!(advance_amount(ctx(4, 10, false, true), StepDirection::Forward), 1);
        assert_eq!(advance_amount(ctx(4, 10, false, true), StepDirection::Backward), -1);
    }

    #[test]
    fn test_spread_moves_by_two() {
        assert_eq!(advance_amount(ctx(4, 10, true, true), StepDirection::Forward), 2);
        assert_eq!(advance_amount(ctx(4, 10, true, true), StepDirection::Backward), -2);
    }

    #[test]
    fn test_invalid_spread_moves_by_one() {
        assert_eq!(advance_amount(ctx(4, 10, true, false), StepDirection::Forward), 1);
        assert_eq!(advance_amount(ctx(4, 10, true, false), StepDirection::Backward), -1);
    }

    #[test]
    fn test_pair_before_final_pair_moves_by_one() {
        assert_eq!(advance_amount(ctx(7, 10, true, true), StepDirection::Forward), 1);
    }

    #[test]
    fn test_backward_from_second_page_returns_to_first() {
        assert_eq!(advance_amount(ctx(1, 10, true, true), StepDirection::Backward), -1);
        assert_eq!(advance_amount(ctx(0, 10, true, true), StepDirection::Backward), 0);
    }

    #[test]
    fn test_move_target_bounds() {
        assert_eq!(move_target(0, 5, -1), None);
        assert_eq!(move_target(4, 5, 1), None);
        assert_eq!(move_target(3, 5, 2), None);
        assert_eq!(move_target(3, 5, 1), Some(4));
        assert_eq!(move_target(2, 5, 0), Some(2));
    }

    #[test]
    fn test_jump_to_end_index() {
        assert_eq!(jump_to_end_index(10, true), 8);
        assert_eq!(jump_to_end_index(10, false), 9);
        assert_eq!(jump_to_end_index(1, true), 0);
        assert_eq!(jump_to_end_index(0, false), 0);
    }

    #[test]
    fn test_side_tap_halves() {
        assert_eq!(side_tap_direction(10.0, 500), StepDirection::Forward);
        assert_eq!(side_tap_direction(249.0, 500), StepDirection::Forward);
        assert_eq!(side_tap_direction(250.0, 500), StepDirection::Backward);
    }

    #[test]
    fn test_direction_tables_are_mirrored() {
        for (action, manga) in direction_bindings(ReadingDirection::Manga) {
            let western = action.command(ReadingDirection::Western);
            let flipped = match manga {
                Command::Advance(dir) => Command::Advance(flip(*dir)),
                Command::Step(dir) => Command::Step(flip(*dir)),
                other => *other,
            };
            assert_eq!(western, flipped, "{:?}", action);
        }
    }

    fn flip(direction: StepDirection) -> StepDirection {
        match direction {
            StepDirection::Forward => StepDirection::Backward,
            StepDirection::Backward => StepDirection::Forward,
        }
    }
}
