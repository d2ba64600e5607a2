//! Fixed game constants. The board, timings and rewards are not configurable.

use std::time::Duration;

// Board
pub const CELL_SIZE: u32 = 25;
pub const GRID_WIDTH: i32 = 30;
pub const GRID_HEIGHT: i32 = 20;

// Window, in pixels
pub const BOARD_WIDTH: u32 = GRID_WIDTH as u32 * CELL_SIZE;
pub const BOARD_HEIGHT: u32 = GRID_HEIGHT as u32 * CELL_SIZE;
pub const WINDOW_TITLE: &str = "Snake Game";
/// Room for the border on the right and the score line below the board.
pub const WINDOW_WIDTH: u32 = BOARD_WIDTH + 4;
pub const WINDOW_HEIGHT: u32 = BOARD_HEIGHT + 40;

// Timing, in milliseconds
pub const INITIAL_SPEED: u64 = 150;
pub const SPEED_INCREMENT: u64 = 5;
pub const MIN_SPEED: u64 = 50;
/// Points needed per speed step.
pub const SPEED_STEP_SCORE: u32 = 50;

// Scoring
pub const FOOD_REWARD: u32 = 10;
pub const SPECIAL_FOOD_REWARD: u32 = 50;
/// Special food spawns with probability 1 in this many food generations.
pub const SPECIAL_FOOD_CHANCE: u32 = 5;

// Starting snake, head first
pub const INITIAL_BODY: [(i32, i32); 3] = [(5, 5), (4, 5), (3, 5)];

/// Tick interval in milliseconds for a given score.
pub fn speed_for_score(score: u32) -> u64 {
    let steps = u64::from(score / SPEED_STEP_SCORE);
    INITIAL_SPEED
        .saturating_sub(steps * SPEED_INCREMENT)
        .max(MIN_SPEED)
}

pub fn tick_interval(speed: u64) -> Duration {
    Duration::from_millis(speed)
}
