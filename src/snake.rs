use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info, trace};
use rand::{distributions::Uniform, prelude::Distribution, rngs::StdRng, Rng, SeedableRng};

use crate::config::{
    self, FOOD_REWARD, GRID_HEIGHT, GRID_WIDTH, INITIAL_BODY, INITIAL_SPEED, SPECIAL_FOOD_CHANCE,
    SPECIAL_FOOD_REWARD,
};
use crate::SnakeInputs;

/// Random samples tried before falling back to a scan of the board.
const MAX_FOOD_ATTEMPTS: usize = (GRID_WIDTH * GRID_HEIGHT) as usize * 4;

/// A cell on the board. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub x: i32,
    pub y: i32,
}

impl Segment {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(self) -> bool {
        (0..GRID_WIDTH).contains(&self.x) && (0..GRID_HEIGHT).contains(&self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Wall,
    SelfCollision,
}

/// What a single call to [`GameState::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not running; nothing changed.
    Idle,
    Moved,
    AteFood,
    AteSpecialFood,
    Collided(CollisionKind),
    /// The snake covers every cell, so no food can be placed.
    BoardFilled,
}

/// The whole game. Owned by the host loop and borrowed by the renderer.
#[derive(Debug, Clone)]
pub struct GameState<R = StdRng> {
    /// Head first.
    pub body: VecDeque<Segment>,
    pub direction: Direction,
    pub food: Segment,
    pub special_food: Option<Segment>,
    pub score: u32,
    /// Tick interval in milliseconds.
    pub speed: u64,
    pub run_state: RunState,
    rng: R,
}

impl GameState<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for GameState<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(rng: R) -> Self {
        let mut state = Self {
            body: VecDeque::new(),
            direction: Direction::Right,
            food: Segment::new(0, 0),
            special_food: None,
            score: 0,
            speed: INITIAL_SPEED,
            run_state: RunState::Running,
            rng,
        };
        state.reset();
        state
    }

    fn reset(&mut self) {
        self.body = INITIAL_BODY
            .iter()
            .map(|&(x, y)| Segment::new(x, y))
            .collect();
        self.direction = Direction::Right;
        self.score = 0;
        self.speed = INITIAL_SPEED;
        self.run_state = RunState::Running;
        self.special_food = None;
        self.generate_food();
    }

    pub fn head(&self) -> Segment {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn tick_interval(&self) -> Duration {
        config::tick_interval(self.speed)
    }

    pub fn occupies(&self, cell: Segment) -> bool {
        self.body.contains(&cell)
    }

    /// Moves the snake one cell. A no-op unless the game is running.
    pub fn advance(&mut self) -> TickOutcome {
        if self.run_state != RunState::Running {
            return TickOutcome::Idle;
        }

        let new_head = self.head().moved(self.direction);

        if !new_head.in_bounds() {
            return self.game_over(TickOutcome::Collided(CollisionKind::Wall));
        }
        if self.occupies(new_head) {
            return self.game_over(TickOutcome::Collided(CollisionKind::SelfCollision));
        }

        self.body.push_front(new_head);
        trace!("head moved to ({}, {})", new_head.x, new_head.y);

        if new_head == self.food {
            self.score += FOOD_REWARD;
            let speed = config::speed_for_score(self.score);
            if speed != self.speed {
                debug!("speed {}ms -> {}ms", self.speed, speed);
                self.speed = speed;
            }
            debug!("food eaten, score {}", self.score);
            if !self.generate_food() {
                return self.game_over(TickOutcome::BoardFilled);
            }
            TickOutcome::AteFood
        } else if self.special_food == Some(new_head) {
            self.score += SPECIAL_FOOD_REWARD;
            self.special_food = None;
            debug!("special food eaten, score {}", self.score);
            TickOutcome::AteSpecialFood
        } else {
            self.body.pop_back();
            TickOutcome::Moved
        }
    }

    fn game_over(&mut self, outcome: TickOutcome) -> TickOutcome {
        self.run_state = RunState::GameOver;
        info!("game over ({:?}), score {}", outcome, self.score);
        outcome
    }

    /// Places the mandatory food on a free cell and maybe spawns special food.
    /// Returns false when the snake leaves no free cell.
    pub fn generate_food(&mut self) -> bool {
        let food = match self.free_cell() {
            Some(cell) => cell,
            None => return false,
        };
        self.food = food;

        if self.special_food.is_none() && self.rng.gen_ratio(1, SPECIAL_FOOD_CHANCE) {
            // one shot only, an occupied cell means no special food this time
            let cell = self.random_cell();
            if !self.occupies(cell) {
                debug!("special food at ({}, {})", cell.x, cell.y);
                self.special_food = Some(cell);
            }
        }
        true
    }

    fn random_cell(&mut self) -> Segment {
        let xs = Uniform::new(0, GRID_WIDTH);
        let ys = Uniform::new(0, GRID_HEIGHT);
        Segment::new(xs.sample(&mut self.rng), ys.sample(&mut self.rng))
    }

    fn free_cell(&mut self) -> Option<Segment> {
        for _ in 0..MAX_FOOD_ATTEMPTS {
            let cell = self.random_cell();
            if !self.occupies(cell) {
                return Some(cell);
            }
        }
        (0..GRID_HEIGHT)
            .flat_map(|y| (0..GRID_WIDTH).map(move |x| Segment::new(x, y)))
            .find(|&cell| !self.occupies(cell))
    }

    /// Accepted only while running and never as a straight reversal.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if self.run_state != RunState::Running || direction == self.direction.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.run_state = match self.run_state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::GameOver => return false,
        };
        debug!("run state now {:?}", self.run_state);
        true
    }

    /// Starts a fresh game. Only valid after a game over.
    pub fn restart(&mut self) -> bool {
        if self.run_state != RunState::GameOver {
            return false;
        }
        self.reset();
        info!("game restarted");
        true
    }

    /// Applies a player command. Returns whether anything changed.
    pub fn apply(&mut self, input: SnakeInputs) -> bool {
        match input {
            SnakeInputs::Turn(direction) => self.change_direction(direction),
            SnakeInputs::Pause => self.toggle_pause(),
            SnakeInputs::Restart => self.restart(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> GameState {
        GameState::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Snake laid out from `cells`, heading `direction`, food parked out of the way.
    fn with_body(cells: &[(i32, i32)], direction: Direction) -> GameState {
        let mut state = seeded(7);
        state.body = cells.iter().map(|&(x, y)| Segment::new(x, y)).collect();
        state.direction = direction;
        state.food = Segment::new(GRID_WIDTH - 1, GRID_HEIGHT - 1);
        state.special_food = None;
        state
    }

    #[test]
    fn test_initial_state() {
        let state = seeded(1);
        let body: Vec<_> = state.body.iter().copied().collect();
        assert_eq!(
            body,
            vec![Segment::new(5, 5), Segment::new(4, 5), Segment::new(3, 5)]
        );
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, 150);
        assert_eq!(state.run_state, RunState::Running);
        assert!(state.food.in_bounds());
        assert!(!state.occupies(state.food));
    }

    #[test]
    fn test_plain_move_shifts_every_segment() {
        let mut state = with_body(&[(5, 5), (4, 5), (3, 5)], Direction::Right);

        assert_eq!(state.advance(), TickOutcome::Moved);

        let body: Vec<_> = state.body.iter().copied().collect();
        assert_eq!(
            body,
            vec![Segment::new(6, 5), Segment::new(5, 5), Segment::new(4, 5)]
        );
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_straight_line_keeps_length() {
        let mut state = with_body(&[(5, 10), (4, 10), (3, 10)], Direction::Right);
        for step in 1..=10 {
            assert_eq!(state.advance(), TickOutcome::Moved);
            assert_eq!(state.len(), 3);
            assert_eq!(state.head(), Segment::new(5 + step, 10));
            assert_eq!(state.body[2], Segment::new(3 + step, 10));
        }
    }

    #[test]
    fn test_eating_food_grows_and_scores() {
        let mut state = with_body(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        state.food = Segment::new(6, 5);

        assert_eq!(state.advance(), TickOutcome::AteFood);

        assert_eq!(state.score, 10);
        assert_eq!(state.len(), 4);
        assert_eq!(state.head(), Segment::new(6, 5));
        assert_eq!(state.body[3], Segment::new(3, 5));
        assert!(!state.occupies(state.food));
        assert!(state.food.in_bounds());
    }

    #[test]
    fn test_food_raises_speed_at_threshold() {
        let mut state = with_body(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        state.score = 40;
        state.food = Segment::new(6, 5);

        state.advance();

        assert_eq!(state.score, 50);
        assert_eq!(state.speed, 145);
        assert_eq!(state.tick_interval(), Duration::from_millis(145));
    }

    #[test]
    fn test_eating_special_food() {
        let mut state = with_body(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        state.special_food = Some(Segment::new(6, 5));
        let food = state.food;

        assert_eq!(state.advance(), TickOutcome::AteSpecialFood);

        assert_eq!(state.score, 50);
        assert_eq!(state.special_food, None);
        assert_eq!(state.len(), 4);
        assert_eq!(state.food, food);
        assert_eq!(state.speed, 150);
    }

    #[test]
    fn test_mandatory_food_wins_when_cells_overlap() {
        let mut state = with_body(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        state.food = Segment::new(6, 5);
        state.special_food = Some(Segment::new(6, 5));

        assert_eq!(state.advance(), TickOutcome::AteFood);
        assert_eq!(state.score, 10);
        assert_eq!(state.special_food, Some(Segment::new(6, 5)));
    }

    #[test]
    fn test_wall_collision() {
        let mut state = with_body(&[(29, 5), (28, 5), (27, 5)], Direction::Right);
        let before = state.body.clone();

        assert_eq!(
            state.advance(),
            TickOutcome::Collided(CollisionKind::Wall)
        );
        assert_eq!(state.run_state, RunState::GameOver);
        assert_eq!(state.body, before);
    }

    #[test]
    fn test_wall_collision_on_every_edge() {
        let cases = [
            ((0, 5), (1, 5), Direction::Left),
            ((5, 0), (5, 1), Direction::Up),
            ((5, 19), (5, 18), Direction::Down),
        ];
        for &(head, neck, direction) in cases.iter() {
            let mut state = with_body(&[head, neck], direction);
            assert_eq!(
                state.advance(),
                TickOutcome::Collided(CollisionKind::Wall)
            );
        }
    }

    #[test]
    fn test_self_collision() {
        // Head at (5,5) heading Up into (5,4), which is part of the body.
        let mut state = with_body(
            &[(5, 5), (6, 5), (6, 4), (5, 4), (4, 4)],
            Direction::Up,
        );

        assert_eq!(
            state.advance(),
            TickOutcome::Collided(CollisionKind::SelfCollision)
        );
        assert_eq!(state.run_state, RunState::GameOver);
        assert_eq!(state.len(), 5);
    }

    #[test]
    fn test_moving_into_tail_is_fatal() {
        let mut state = with_body(&[(5, 5), (6, 5), (6, 6), (5, 6)], Direction::Down);
        assert_eq!(
            state.advance(),
            TickOutcome::Collided(CollisionKind::SelfCollision)
        );
    }

    #[test]
    fn test_advance_is_noop_when_not_running() {
        let mut state = with_body(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        state.run_state = RunState::Paused;
        let before = state.body.clone();

        assert_eq!(state.advance(), TickOutcome::Idle);
        assert_eq!(state.body, before);

        state.run_state = RunState::GameOver;
        assert_eq!(state.advance(), TickOutcome::Idle);
        assert_eq!(state.body, before);
    }

    #[test]
    fn test_reverse_direction_is_ignored() {
        let mut state = with_body(&[(5, 5), (4, 5), (3, 5)], Direction::Right);

        assert!(!state.change_direction(Direction::Left));
        assert_eq!(state.direction, Direction::Right);

        assert!(state.change_direction(Direction::Up));
        assert_eq!(state.direction, Direction::Up);
        assert!(!state.change_direction(Direction::Down));
        assert_eq!(state.direction, Direction::Up);
    }

    #[test]
    fn test_direction_ignored_unless_running() {
        let mut state = with_body(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
        state.run_state = RunState::Paused;
        assert!(!state.change_direction(Direction::Up));
        assert_eq!(state.direction, Direction::Right);

        state.run_state = RunState::GameOver;
        assert!(!state.change_direction(Direction::Down));
        assert_eq!(state.direction, Direction::Right);
    }

    #[test]
    fn test_pause_round_trip_only_touches_run_state() {
        let mut state = seeded(3);
        let body = state.body.clone();
        let (food, special, score, speed, direction) = (
            state.food,
            state.special_food,
            state.score,
            state.speed,
            state.direction,
        );

        assert!(state.toggle_pause());
        assert_eq!(state.run_state, RunState::Paused);
        assert!(state.toggle_pause());
        assert_eq!(state.run_state, RunState::Running);

        assert_eq!(state.body, body);
        assert_eq!(state.food, food);
        assert_eq!(state.special_food, special);
        assert_eq!(state.score, score);
        assert_eq!(state.speed, speed);
        assert_eq!(state.direction, direction);
    }

    #[test]
    fn test_pause_does_not_leave_game_over() {
        let mut state = seeded(3);
        state.run_state = RunState::GameOver;
        assert!(!state.toggle_pause());
        assert_eq!(state.run_state, RunState::GameOver);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut state = with_body(&[(10, 10), (9, 10), (8, 10), (7, 10)], Direction::Up);
        state.score = 120;
        state.speed = 140;

        assert!(!state.restart());
        assert_eq!(state.score, 120);

        state.run_state = RunState::GameOver;
        assert!(state.restart());

        let body: Vec<_> = state.body.iter().copied().collect();
        assert_eq!(
            body,
            vec![Segment::new(5, 5), Segment::new(4, 5), Segment::new(3, 5)]
        );
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, 150);
        assert_eq!(state.run_state, RunState::Running);
        assert!(!state.occupies(state.food));
    }

    #[test]
    fn test_restart_clears_stale_special_food() {
        let mut state = seeded(11);
        // (4, 5) is part of the starting body, so a kept cell would sit on the snake
        let stale = Segment::new(4, 5);
        state.special_food = Some(stale);
        state.run_state = RunState::GameOver;
        assert!(state.restart());

        assert_ne!(state.special_food, Some(stale));
        if let Some(cell) = state.special_food {
            assert!(!state.occupies(cell));
        }
    }

    #[test]
    fn test_special_food_abandoned_when_draw_hits_snake() {
        let mut state = seeded(13);
        let free = Segment::new(17, 12);
        state.body = (0..GRID_HEIGHT)
            .flat_map(|y| (0..GRID_WIDTH).map(move |x| Segment::new(x, y)))
            .filter(|&cell| cell != free)
            .collect();

        // Every special draw lands on the snake except the rare hit on `free`.
        // Resampling instead of abandoning would place it on roughly one call in five.
        let mut placed = 0;
        for _ in 0..200 {
            state.special_food = None;
            assert!(state.generate_food());
            assert_eq!(state.food, free);
            if let Some(cell) = state.special_food {
                assert_eq!(cell, free);
                placed += 1;
            }
        }
        assert!(placed <= 3, "special food placed {} times", placed);
    }

    #[test]
    fn test_special_food_never_on_snake_and_never_replaced() {
        let mut state = seeded(42);
        let mut seen = 0;
        for _ in 0..500 {
            let before = state.special_food;
            assert!(state.generate_food());
            assert!(!state.occupies(state.food));
            if let Some(cell) = before {
                assert_eq!(state.special_food, Some(cell));
                state.special_food = None;
            } else if let Some(cell) = state.special_food {
                assert!(cell.in_bounds());
                assert!(!state.occupies(cell));
                seen += 1;
            }
        }
        // roughly one in five, allowing for the occupied-cell abandon
        assert!(seen > 20, "special food spawned {} times", seen);
    }

    #[test]
    fn test_food_finds_last_free_cell() {
        let mut state = seeded(5);
        state.body = (0..GRID_HEIGHT)
            .flat_map(|y| (0..GRID_WIDTH).map(move |x| Segment::new(x, y)))
            .filter(|&cell| cell != Segment::new(17, 12))
            .collect();

        assert!(state.generate_food());
        assert_eq!(state.food, Segment::new(17, 12));
    }

    #[test]
    fn test_full_board_ends_game() {
        let mut state = seeded(5);
        // Snake snaked over every cell but (1, 0), head at (0, 0) heading Right.
        let mut body: VecDeque<Segment> = VecDeque::new();
        body.push_back(Segment::new(0, 0));
        for y in 1..GRID_HEIGHT {
            let xs: Vec<i32> = if y % 2 == 1 {
                (0..GRID_WIDTH).collect()
            } else {
                (0..GRID_WIDTH).rev().collect()
            };
            for x in xs {
                body.push_back(Segment::new(x, y));
            }
        }
        for x in (2..GRID_WIDTH).rev() {
            body.push_back(Segment::new(x, 0));
        }
        state.body = body;
        state.direction = Direction::Right;
        state.food = Segment::new(1, 0);
        state.special_food = None;

        assert_eq!(state.advance(), TickOutcome::BoardFilled);
        assert_eq!(state.run_state, RunState::GameOver);
        assert_eq!(state.len(), (GRID_WIDTH * GRID_HEIGHT) as usize);
    }

    #[test]
    fn test_apply_routes_commands() {
        let mut state = seeded(9);
        assert!(state.apply(SnakeInputs::Turn(Direction::Down)));
        assert_eq!(state.direction, Direction::Down);
        assert!(!state.apply(SnakeInputs::Restart));
        assert!(state.apply(SnakeInputs::Pause));
        assert_eq!(state.run_state, RunState::Paused);
        assert!(!state.apply(SnakeInputs::Turn(Direction::Left)));
    }

    #[test]
    fn test_direction_opposites() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }
}
