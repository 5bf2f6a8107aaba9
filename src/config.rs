use std::{fmt, str::FromStr, time::Duration};

use crate::error::ConfigError;

/// Board size of the terminal game, inside the border.
const TERMINAL_WIDTH: i32 = 18;
const TERMINAL_HEIGHT: i32 = 8;

const WINDOW_WIDTH: i32 = 20;
const WINDOW_HEIGHT: i32 = 10;
const WINDOW_WIN_SPOTS: usize = 40;

const DEFAULT_STEP_MS: u64 = 150;

/// Upper bound on either board side, keeps pixel and terminal sizes in range.
pub const MAX_BOARD_SIDE: i32 = 1000;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Number of empty cells left on the board at which the player wins.
    pub fn win_spots(self) -> usize {
        match self {
            Difficulty::Easy => 80,
            Difficulty::Medium => 60,
            Difficulty::Hard => 40,
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "easy" => Ok(Difficulty::Easy),
            "2" | "medium" => Ok(Difficulty::Medium),
            "3" | "hard" => Ok(Difficulty::Hard),
            other => Err(ConfigError::UnknownDifficulty(other.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

/// Game configuration shared by both front ends.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Board columns
    pub width: i32,
    /// Board rows
    pub height: i32,
    /// Empty cells remaining at which the game is won
    pub win_spots: usize,
    /// Time between two snake steps
    pub step_interval: Duration,
    /// Fixed seed for food placement, random when unset
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn terminal(difficulty: Difficulty) -> Self {
        Self {
            width: TERMINAL_WIDTH,
            height: TERMINAL_HEIGHT,
            win_spots: difficulty.win_spots(),
            step_interval: Duration::from_millis(DEFAULT_STEP_MS),
            seed: None,
        }
    }

    pub fn window() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            win_spots: WINDOW_WIN_SPOTS,
            step_interval: Duration::from_millis(DEFAULT_STEP_MS),
            seed: None,
        }
    }

    /// Apply `SNAKE_*` environment overrides on top of a preset
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(width) = env_parse::<i32>("SNAKE_WIDTH") {
            self.width = width;
        }
        if let Some(height) = env_parse::<i32>("SNAKE_HEIGHT") {
            self.height = height;
        }
        if let Some(win_spots) = env_parse::<usize>("SNAKE_WIN_SPOTS") {
            self.win_spots = win_spots;
        }
        if let Some(step_ms) = env_parse::<u64>("SNAKE_STEP_MS") {
            self.step_interval = Duration::from_millis(step_ms);
        }
        if let Some(seed) = env_parse::<u64>("SNAKE_SEED") {
            self.seed = Some(seed);
        }

        self
    }

    pub fn cells(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 1 || self.height < 1 || self.cells() < 2 {
            return Err(ConfigError::BoardTooSmall { width: self.width, height: self.height });
        }
        if self.width > MAX_BOARD_SIDE || self.height > MAX_BOARD_SIDE {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_SIDE,
            });
        }
        // A fresh snake covers one cell, so cells - 1 are empty at start
        if self.win_spots >= self.cells() - 1 {
            return Err(ConfigError::ThresholdTooHigh { win_spots: self.win_spots, cells: self.cells() });
        }
        if self.step_interval.is_zero() {
            return Err(ConfigError::ZeroStep);
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("1".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" 2\n".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(
            "4".parse::<Difficulty>(),
            Err(ConfigError::UnknownDifficulty("4".to_string()))
        );
    }

    #[test]
    fn test_difficulty_win_spots() {
        assert_eq!(Difficulty::Easy.win_spots(), 80);
        assert_eq!(Difficulty::Medium.win_spots(), 60);
        assert_eq!(Difficulty::Hard.win_spots(), 40);
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn test_presets_are_valid() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(GameConfig::terminal(difficulty).validate(), Ok(()));
        }
        let window = GameConfig::window();
        assert_eq!(window.cells(), 200);
        assert_eq!(window.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_tiny_board() {
        let mut config = GameConfig::window();
        config.width = 1;
        config.height = 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardTooSmall { width: 1, height: 1 })
        );

        config.height = -3;
        assert!(matches!(config.validate(), Err(ConfigError::BoardTooSmall { .. })));
    }

    #[test]
    fn test_validate_rejects_huge_board() {
        let mut config = GameConfig::window();
        config.width = 200_000_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardTooLarge { width: 200_000_000, height: 10, max: MAX_BOARD_SIDE })
        );

        config.width = 10;
        config.height = MAX_BOARD_SIDE + 1;
        assert!(matches!(config.validate(), Err(ConfigError::BoardTooLarge { .. })));

        config.height = MAX_BOARD_SIDE;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_threshold_won_at_start() {
        let mut config = GameConfig::window();
        config.width = 3;
        config.height = 3;
        config.win_spots = 8;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ThresholdTooHigh { win_spots: 8, cells: 9 })
        );

        config.win_spots = 7;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_zero_step() {
        let mut config = GameConfig::window();
        config.step_interval = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroStep));
    }

    #[test]
    fn test_env_parse() {
        std::env::set_var("SNAKE_TEST_ENV_PARSE_OK", " 42 ");
        std::env::set_var("SNAKE_TEST_ENV_PARSE_BAD", "forty-two");
        assert_eq!(env_parse::<u64>("SNAKE_TEST_ENV_PARSE_OK"), Some(42));
        assert_eq!(env_parse::<u64>("SNAKE_TEST_ENV_PARSE_BAD"), None);
        assert_eq!(env_parse::<u64>("SNAKE_TEST_ENV_PARSE_MISSING"), None);
    }

    #[test]
    fn test_with_env_overrides() {
        std::env::set_var("SNAKE_WIDTH", "30");
        std::env::set_var("SNAKE_HEIGHT", "not-a-number");
        std::env::set_var("SNAKE_WIN_SPOTS", "12");
        std::env::set_var("SNAKE_STEP_MS", "90");
        std::env::set_var("SNAKE_SEED", "5");

        let config = GameConfig::window().with_env_overrides();

        for key in ["SNAKE_WIDTH", "SNAKE_HEIGHT", "SNAKE_WIN_SPOTS", "SNAKE_STEP_MS", "SNAKE_SEED"] {
            std::env::remove_var(key);
        }

        assert_eq!(config.width, 30);
        // Unparseable values keep the preset
        assert_eq!(config.height, WINDOW_HEIGHT);
        assert_eq!(config.win_spots, 12);
        assert_eq!(config.step_interval, Duration::from_millis(90));
        assert_eq!(config.seed, Some(5));
    }
}
