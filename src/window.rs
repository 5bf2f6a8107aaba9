use macroquad::prelude::*;
use tracing::info;

use crate::config::GameConfig;
use crate::snake::{Direction, Position};
use crate::state::{GameState, Status, TickOutcome};

/// Pixel size of one grid cell.
const CELL_SIZE: i32 = 20;

const FOOD_COLOR: Color = RED;
const BODY_COLOR: Color = GREEN;
const HEAD_COLOR: Color = Color::new(0.6, 1.0, 0.6, 1.0);
const TEXT_COLOR: Color = WHITE;

pub fn window_conf(config: &GameConfig) -> Conf {
    Conf {
        window_title: "Snake Game".to_owned(),
        window_width: config.width * CELL_SIZE,
        window_height: config.height * CELL_SIZE,
        window_resizable: false,
        ..Default::default()
    }
}

/// Main loop of the windowed game. Returns when the player presses Esc.
pub async fn run(config: GameConfig) {
    let step = config.step_interval.as_secs_f32();
    let mut state = GameState::new(&config);
    let mut pending: Option<Direction> = None;
    let mut since_step = 0.0;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            info!("Window closed by player");
            break;
        }

        if state.is_over() {
            if is_key_pressed(KeyCode::R) {
                state = GameState::new(&config);
                pending = None;
                since_step = 0.0;
            }
        } else {
            if let Some(dir) = read_direction() {
                pending = Some(dir);
            }

            since_step += get_frame_time();
            while since_step >= step && !state.is_over() {
                since_step -= step;
                if state.tick(pending.take()) == TickOutcome::Idle {
                    // Nothing to catch up on until the first key press
                    since_step = 0.0;
                }
            }
        }

        draw(&state);
        next_frame().await;
    }
}

/// The last arrow pressed this frame wins.
fn read_direction() -> Option<Direction> {
    let mut dir = None;
    if is_key_pressed(KeyCode::Up) {
        dir = Some(Direction::Up);
    }
    if is_key_pressed(KeyCode::Down) {
        dir = Some(Direction::Down);
    }
    if is_key_pressed(KeyCode::Left) {
        dir = Some(Direction::Left);
    }
    if is_key_pressed(KeyCode::Right) {
        dir = Some(Direction::Right);
    }
    dir
}

fn draw(state: &GameState) {
    clear_background(BLACK);

    draw_cell(state.food(), FOOD_COLOR);

    let snake = state.snake();
    for pos in snake.body().iter().skip(1) {
        draw_cell(*pos, BODY_COLOR);
    }
    draw_cell(snake.head(), HEAD_COLOR);

    draw_text(&format!("Score: {}", state.score()), 4.0, 16.0, 20.0, TEXT_COLOR);
    if let Some(msg) = status_line(state.status()) {
        draw_text(msg, 4.0, 34.0, 20.0, TEXT_COLOR);
    }
}

fn draw_cell(pos: Position, color: Color) {
    let size = CELL_SIZE as f32;
    draw_rectangle(pos.col as f32 * size, pos.row as f32 * size, size, size, color);
}

fn status_line(status: Status) -> Option<&'static str> {
    match status {
        Status::Running => None,
        Status::Won => Some("You Win! Press R to restart."),
        Status::Lost(_) => Some("Game Over! Press R to restart."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Collision;

    #[test]
    fn test_window_conf_matches_board() {
        let conf = window_conf(&GameConfig::window());
        assert_eq!(conf.window_title, "Snake Game");
        assert_eq!(conf.window_width, 400);
        assert_eq!(conf.window_height, 200);
        assert!(!conf.window_resizable);
    }

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(Status::Running), None);
        assert_eq!(status_line(Status::Won), Some("You Win! Press R to restart."));
        assert_eq!(
            status_line(Status::Lost(Collision::Wall)),
            Some("Game Over! Press R to restart.")
        );
    }
}
