use std::{cmp::max, io::{self, BufRead, Write}, thread::sleep, time::Duration};

use crate::{Coords, TermInt};
use crate::config::{Difficulty, GameConfig};
use crate::error::SnakeError;
use crate::snake::{Direction::{*, self}, Position};
use crate::state::{GameState, Status, TickOutcome};
use crate::term::TermManager;

use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use tracing::{debug, info};

const TICK_INTERVAL_MS: u64 = 5;
const SPEEDUP_EVERY_POINTS: u64 = 7;
const VERTICAL_SLOWDOWN: f64 = 1.35;

const SNAKE_BODY_CHAR: char = 'O';
const FOOD_CHAR: char = '*';
const DEAD_SNAKE_CHAR: char = 'X';

/// Score line on the first row, the framed board right below it.
const HEADER_POS: Coords = (0, 0);
const BOARD_ORIGIN: Coords = (0, 1);

pub enum Flow {
    Continue,
    Quit,
}

pub struct SnakeGame {
    config: GameConfig,
    difficulty: Difficulty,
    paused: bool,
    term: TermManager,
}

impl SnakeGame {
    pub fn new(config: GameConfig, difficulty: Difficulty) -> Result<Self, SnakeError> {
        config.validate()?;
        let term = TermManager::new()?;

        let (frame_w, frame_h) = frame_size(&config);
        let needed = (frame_w, frame_h.saturating_add(1));
        let actual = term.get_terminal_size();
        if actual.0 < needed.0 || actual.1 < needed.1 {
            return Err(SnakeError::TerminalTooSmall { needed, actual });
        }

        Ok(SnakeGame { config, difficulty, paused: false, term })
    }

    /// Runs rounds until the player quits. The terminal is put back the way
    /// it was whether or not the game loop fails.
    pub fn run(&mut self) -> Result<(), SnakeError> {
        run_restoring(
            self,
            |game| game.term.setup(),
            SnakeGame::run_rounds,
            |game| game.term.restore(),
        )
    }

    fn run_rounds(&mut self) -> Result<(), SnakeError> {
        if let Flow::Quit = self.show_intro()? {
            return Ok(());
        }

        while let Flow::Continue = self.play()? {}
        info!("Player quit");
        Ok(())
    }

    fn show_intro(&mut self) -> Result<Flow, SnakeError> {
        self.term.clear()?;
        let win_line = format!("Win with {} empty spots left", self.config.win_spots);
        let lines = &[
            "Welcome to Snake Game!",
            "",
            "Arrow keys or WASD to move",
            "Eat the red food (*) to grow",
            "Avoid the walls and your own tail",
            &*win_line,
            "P to pause, Esc to quit",
            "",
            "Press any key to begin"
        ];

        self.show_board_message(lines, Color::Cyan)?;

        if is_quit(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }

        self.term.hide_message()?;
        Ok(Flow::Continue)
    }

    fn play(&mut self) -> Result<Flow, SnakeError> {
        self.term.clear()?;
        self.paused = false;
        let (frame_w, frame_h) = frame_size(&self.config);
        self.term.draw_borders(BOARD_ORIGIN, frame_w, frame_h)?;

        let mut state = GameState::new(&self.config);
        let mut dir_change: Option<Direction> = None;
        let base_ticks = base_ticks(self.config.step_interval);
        let mut ticks_until_step = base_ticks;

        self.draw(&state)?;

        loop {
            sleep(Duration::from_millis(TICK_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                match &key_ev {
                    ev if is_quit(ev) => return Ok(Flow::Quit),
                    KeyEvent { code, .. } => match code {
                        KeyCode::Char('w') | KeyCode::Up => dir_change = Some(Up),
                        KeyCode::Char('a') | KeyCode::Left => dir_change = Some(Left),
                        KeyCode::Char('s') | KeyCode::Down => dir_change = Some(Down),
                        KeyCode::Char('d') | KeyCode::Right => dir_change = Some(Right),
                        KeyCode::Char('p') | KeyCode::Char('P') => self.toggle_pause()?,
                        _ => {}
                    }
                }
            }

            if self.paused { continue; }

            // Not paused, count down til the next game update
            ticks_until_step -= 1;
            if ticks_until_step > 0 { continue; }

            if let Some(dir) = dir_change {
                debug!(?dir, "Direction requested");
            }
            let outcome = state.tick(dir_change.take());
            ticks_until_step = ticks_for_step(base_ticks, state.score(), state.snake().get_direction());

            match outcome {
                TickOutcome::Idle => {},
                TickOutcome::Moved | TickOutcome::Ate => self.draw(&state)?,
                TickOutcome::Crashed(_) | TickOutcome::Won | TickOutcome::Over => {
                    self.draw(&state)?;
                    break;
                }
            }
        } // Game loop

        self.game_over(&state)?;

        if is_quit(&self.term.read_key_blocking()?) {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self, state: &GameState) -> Result<(), SnakeError> {
        let (s, color) = match state.status() {
            Status::Won => ("You won!", Color::Green),
            _ => ("Game over!", Color::Red),
        };

        self.show_board_message(&[
            s,
            &*format!("Score: {}", state.score()),
            "",
            "Press any key to play again,",
            "or Esc to quit."
        ], color)
    }

    fn draw(&mut self, state: &GameState) -> Result<(), SnakeError> {
        let (frame_w, _) = frame_size(&self.config);
        let header = format!("Score: {}  Level: {}", state.score(), self.difficulty);
        let header = format!("{:<width$}", header, width = frame_w as usize);
        self.term.print_str_at(HEADER_POS, &header, Color::Yellow)?;

        for row in 0..state.height() {
            for col in 0..state.width() {
                let pos = Position::new(row, col);
                let (ch, color) = glyph_at(state, pos);
                self.term.print_at(cell_coords(pos), ch, color)?;
            }
        }

        self.term.flush()?;
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<(), SnakeError> {
        if !self.paused {
            self.show_board_message(&["Paused", "Press P to resume", "or Esc to quit"], Color::Cyan)?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }

    fn show_board_message(&mut self, lines: &[&str], color: Color) -> Result<(), SnakeError> {
        let frame = frame_size(&self.config);
        self.term.show_message(lines, color, BOARD_ORIGIN, frame)?;
        Ok(())
    }
}

/// Asks for the difficulty on a plain line-buffered terminal. Anything that
/// isn't a known level falls back to easy.
pub fn prompt_difficulty<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Difficulty> {
    execute!(
        output,
        SetForegroundColor(Color::Magenta),
        Print("Choose difficulty level\n[1 - easy (default), 2 - medium, 3 - hard]:\n"),
        ResetColor
    )?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    match line.parse::<Difficulty>() {
        Ok(difficulty) => Ok(difficulty),
        Err(_) => {
            writeln!(output, "Defaulting to level 1...")?;
            Ok(Difficulty::default())
        }
    }
}

/// Runs `body` between `setup` and `restore`. `restore` runs even when
/// `setup` itself fails half way; the first error is the one reported.
fn run_restoring<T>(
    target: &mut T,
    setup: impl FnOnce(&mut T) -> io::Result<()>,
    body: impl FnOnce(&mut T) -> Result<(), SnakeError>,
    restore: impl FnOnce(&mut T) -> io::Result<()>,
) -> Result<(), SnakeError> {
    let res = setup(target).map_err(SnakeError::from).and_then(|_| body(target));
    let restored = restore(target);
    res?;
    restored?;
    Ok(())
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Esc, .. })
        || matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL, .. })
}

/// Size of the board including its border.
fn frame_size(config: &GameConfig) -> Coords {
    let to_term = |n: i32| TermInt::try_from(n.saturating_add(2)).unwrap_or(TermInt::MAX);
    (to_term(config.width), to_term(config.height))
}

fn cell_coords(pos: Position) -> Coords {
    ((pos.col + 1) as TermInt + BOARD_ORIGIN.0, (pos.row + 1) as TermInt + BOARD_ORIGIN.1)
}

fn base_ticks(step_interval: Duration) -> u64 {
    max(step_interval.as_millis() as u64 / TICK_INTERVAL_MS, 1)
}

/// Polls to wait before the next step: faster with higher scores, slower
/// going vertically since terminal characters are taller than they are wide.
fn ticks_for_step(base_ticks: u64, score: u32, direction: Option<Direction>) -> u64 {
    let ticks = max(base_ticks.saturating_sub(score as u64 / SPEEDUP_EVERY_POINTS), 1);

    if direction.map_or(false, Direction::is_vertical) {
        (ticks as f64 * VERTICAL_SLOWDOWN).ceil() as u64
    } else {
        ticks
    }
}

fn glyph_at(state: &GameState, pos: Position) -> (char, Color) {
    let snake = state.snake();

    if snake.occupies(pos) {
        if matches!(state.status(), Status::Lost(_)) {
            (DEAD_SNAKE_CHAR, Color::Red)
        } else if pos == snake.head() {
            (snake.head_char(), Color::Green)
        } else {
            (SNAKE_BODY_CHAR, Color::Green)
        }
    } else if pos == state.food() {
        (FOOD_CHAR, Color::Red)
    } else {
        (' ', Color::Reset)
    }
}
