use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::snake::{Direction, MoveResult, Position, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Tail,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Lost(Collision),
    Won,
}

/// What a single tick did to the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No direction yet, nothing moved
    Idle,
    Moved,
    Ate,
    Crashed(Collision),
    Won,
    /// The game had already ended before this tick
    Over,
}

pub struct GameState {
    width: i32,
    height: i32,
    snake: Snake,
    food: Position,
    score: u32,
    win_spots: usize,
    status: Status,
    rng: StdRng,
}

impl GameState {
    /// Expects a config that passed `GameConfig::validate`.
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let start = Position::new(config.height / 2, config.width / 2);

        let mut state = GameState {
            width: config.width,
            height: config.height,
            snake: Snake::new(start),
            food: start,
            score: 0,
            win_spots: config.win_spots,
            status: Status::Running,
            rng,
        };

        match state.place_food() {
            Some(food) => state.food = food,
            None => state.status = Status::Won,
        }
        info!(width = state.width, height = state.height, win_spots = state.win_spots, "New game");

        state
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status != Status::Running
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        (0..self.height).contains(&pos.row) && (0..self.width).contains(&pos.col)
    }

    /// Advance the game by one step, first applying the player's requested
    /// direction if there is one.
    pub fn tick(&mut self, request: Option<Direction>) -> TickOutcome {
        if self.is_over() {
            return TickOutcome::Over;
        }

        if let Some(dir) = request {
            if !self.snake.set_direction(dir) {
                debug!(?dir, "Ignoring reversal");
            }
        }

        let next = match self.snake.next_head() {
            Some(pos) => pos,
            None => return TickOutcome::Idle,
        };

        if !self.in_bounds(next) {
            return self.lose(Collision::Wall);
        }

        if let MoveResult::Moved { new_head, old_tail } = self.snake.move_step() {
            trace!(?new_head, ?old_tail, "Moved");
        }

        if self.snake.bites_itself() {
            return self.lose(Collision::Tail);
        }

        let ate = self.snake.head() == self.food;
        if ate {
            self.snake.grow();
            self.score += 1;
        }

        // Checked before relocating the food so a full board never has to
        // look for a free cell.
        if self.has_won() {
            self.status = Status::Won;
            info!(score = self.score, "Game won");
            return TickOutcome::Won;
        }

        if ate {
            match self.place_food() {
                Some(food) => self.food = food,
                None => {
                    self.status = Status::Won;
                    return TickOutcome::Won;
                }
            }
            return TickOutcome::Ate;
        }

        TickOutcome::Moved
    }

    /// Cells not covered by the snake. The food cell counts as empty.
    pub fn empty_cells(&self) -> usize {
        let mut empty = 0;
        for row in 0..self.height {
            for col in 0..self.width {
                if !self.snake.occupies(Position::new(row, col)) {
                    empty += 1;
                }
            }
        }
        empty
    }

    pub fn has_won(&self) -> bool {
        self.empty_cells() <= self.win_spots
    }

    /// Pick a random cell the snake doesn't cover, retrying until one is
    /// found. `None` when the snake fills the board.
    fn place_food(&mut self) -> Option<Position> {
        if self.empty_cells() == 0 {
            return None;
        }

        loop {
            let pos = Position::new(
                self.rng.gen_range(0..self.height),
                self.rng.gen_range(0..self.width),
            );
            if !self.snake.occupies(pos) {
                debug!(?pos, "Placed food");
                return Some(pos);
            }
        }
    }

    fn lose(&mut self, collision: Collision) -> TickOutcome {
        self.status = Status::Lost(collision);
        info!(?collision, score = self.score, "Game over");
        TickOutcome::Crashed(collision)
    }
}
