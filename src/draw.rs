//! Backend-independent drawing of a [`GameState`].
//!
//! [`draw_game`] issues everything as filled rectangles onto a [`Canvas`], so
//! the same scene can be recorded into a [`RectBatch`] for the GPU or for tests.

use rand::Rng;

use crate::config::{BOARD_HEIGHT, BOARD_WIDTH, CELL_SIZE, GRID_HEIGHT, GRID_WIDTH};
use crate::font;
use crate::snake::{GameState, RunState, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const BACKGROUND: Rgb = Rgb::new(30, 30, 30);
pub const GRID_LINE: Rgb = Rgb::new(50, 50, 50);
pub const BORDER: Rgb = Rgb::new(80, 80, 80);
pub const FOOD: Rgb = Rgb::new(255, 80, 80);
pub const SPECIAL_FOOD: Rgb = Rgb::new(255, 215, 0);
pub const SNAKE_HEAD: Rgb = Rgb::new(100, 255, 100);
pub const SNAKE_BODY: Rgb = Rgb::new(0, 200, 0);
pub const GAME_OVER_TEXT: Rgb = Rgb::new(255, 100, 100);
pub const PAUSED_TEXT: Rgb = Rgb::new(200, 200, 100);

const BORDER_WIDTH: f32 = 3.0;
const CELL_INSET: f32 = 2.0;
const SCORE_SCALE: u32 = 2;
const OVERLAY_SCALE: u32 = 3;
const HINT_SCALE: u32 = 2;

/// Axis-aligned rectangle in pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// A drawable surface sized to the current viewport.
pub trait Canvas {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);
    fn clear(&mut self, color: Rgb);
    fn fill_rect(&mut self, rect: Rect, color: Rgb);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilledRect {
    pub rect: Rect,
    pub color: Rgb,
}

/// Records a frame as a clear colour plus rectangles in paint order.
#[derive(Debug, Clone, Default)]
pub struct RectBatch {
    width: u32,
    height: u32,
    clear: Option<Rgb>,
    rects: Vec<FilledRect>,
}

impl RectBatch {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear: None,
            rects: Vec::new(),
        }
    }

    pub fn clear_color(&self) -> Option<Rgb> {
        self.clear
    }

    pub fn rects(&self) -> &[FilledRect] {
        &self.rects
    }

    pub fn with_color(&self, color: Rgb) -> impl Iterator<Item = &FilledRect> + '_ {
        self.rects.iter().filter(move |filled| filled.color == color)
    }
}

impl Canvas for RectBatch {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgb) {
        self.clear = Some(color);
        self.rects.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        if rect.w > 0.0 && rect.h > 0.0 {
            self.rects.push(FilledRect { rect, color });
        }
    }
}

/// Outline of `rect` with the stroke centred on its edges.
pub fn stroke_rect(canvas: &mut impl Canvas, rect: Rect, width: f32, color: Rgb) {
    let half = width / 2.0;
    let (left, top) = (rect.x - half, rect.y - half);
    let (outer_w, outer_h) = (rect.w + width, rect.h + width);
    canvas.fill_rect(Rect::new(left, top, outer_w, width), color);
    canvas.fill_rect(Rect::new(left, rect.y + rect.h - half, outer_w, width), color);
    canvas.fill_rect(Rect::new(left, top + width, width, outer_h - 2.0 * width), color);
    canvas.fill_rect(
        Rect::new(rect.x + rect.w - half, top + width, width, outer_h - 2.0 * width),
        color,
    );
}

fn cell_rect(cell: Segment) -> Rect {
    let size = CELL_SIZE as f32;
    Rect::new(
        cell.x as f32 * size + CELL_INSET,
        cell.y as f32 * size + CELL_INSET,
        size - 2.0 * CELL_INSET,
        size - 2.0 * CELL_INSET,
    )
}

fn draw_centered(canvas: &mut impl Canvas, text: &str, y: f32, scale: u32, color: Rgb) {
    let (width, _) = canvas.size();
    let x = ((width as f32 - font::text_width(text, scale)) / 2.0).max(0.0);
    font::draw_text(canvas, text, x.floor(), y, scale, color);
}

/// Paints one frame. Reads the state only.
pub fn draw_game<R: Rng>(game: &GameState<R>, canvas: &mut impl Canvas) {
    let (board_w, board_h) = (BOARD_WIDTH as f32, BOARD_HEIGHT as f32);
    let cell = CELL_SIZE as f32;

    canvas.clear(BACKGROUND);

    for x in 0..=GRID_WIDTH {
        canvas.fill_rect(Rect::new(x as f32 * cell, 0.0, 1.0, board_h), GRID_LINE);
    }
    for y in 0..=GRID_HEIGHT {
        canvas.fill_rect(Rect::new(0.0, y as f32 * cell, board_w, 1.0), GRID_LINE);
    }

    stroke_rect(canvas, Rect::new(1.0, 1.0, board_w, board_h), BORDER_WIDTH, BORDER);

    canvas.fill_rect(cell_rect(game.food), FOOD);
    if let Some(special) = game.special_food {
        canvas.fill_rect(cell_rect(special), SPECIAL_FOOD);
    }

    for (index, &segment) in game.body.iter().enumerate() {
        let color = if index == 0 { SNAKE_HEAD } else { SNAKE_BODY };
        canvas.fill_rect(cell_rect(segment), color);
    }

    font::draw_text(
        canvas,
        &format!("SCORE: {}", game.score),
        10.0,
        board_h + 10.0,
        SCORE_SCALE,
        Rgb::WHITE,
    );

    let banner_y = board_h / 2.0 - 30.0;
    match game.run_state {
        RunState::Running => {}
        RunState::GameOver => {
            draw_centered(canvas, "GAME OVER", banner_y, OVERLAY_SCALE, GAME_OVER_TEXT);
            draw_centered(canvas, "PRESS SPACE", banner_y + 35.0, HINT_SCALE, Rgb::WHITE);
        }
        RunState::Paused => {
            draw_centered(canvas, "PAUSED", banner_y, OVERLAY_SCALE, PAUSED_TEXT);
        }
    }
}
