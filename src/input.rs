use winit::keyboard::KeyCode;

use crate::snake::Direction;
use crate::SnakeInputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Game(SnakeInputs),
    Quit,
}

/// Arrows and WASD steer, P or Pause toggles pause, Space restarts, Escape quits.
pub fn map_key(code: KeyCode) -> Option<KeyAction> {
    let action = match code {
        KeyCode::ArrowUp | KeyCode::KeyW => KeyAction::Game(SnakeInputs::Turn(Direction::Up)),
        KeyCode::ArrowDown | KeyCode::KeyS => KeyAction::Game(SnakeInputs::Turn(Direction::Down)),
        KeyCode::ArrowLeft | KeyCode::KeyA => KeyAction::Game(SnakeInputs::Turn(Direction::Left)),
        KeyCode::ArrowRight | KeyCode::KeyD => {
            KeyAction::Game(SnakeInputs::Turn(Direction::Right))
        }
        KeyCode::KeyP | KeyCode::Pause => KeyAction::Game(SnakeInputs::Pause),
        KeyCode::Space => KeyAction::Game(SnakeInputs::Restart),
        KeyCode::Escape => KeyAction::Quit,
        _ => return None,
    };
    Some(action)
}
