use Direction::*;
use MoveResult::*;

/// A cell on the board. Signed so a step past the edge is still a value we
/// can check against the walls.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        Position { row: self.row + d_row, col: self.col + d_col }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit vector as (row, col).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Up | Down)
    }
}

pub enum MoveResult {
    Moved { new_head: Position, old_tail: Position },
    Idle
}

/// Body is stored head first. A `None` direction means the snake hasn't
/// been told to go anywhere yet.
#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Position>,
    direction: Option<Direction>,
}

impl Snake {
    pub fn new(pos: Position) -> Self {
        Snake { body: vec![pos], direction: None }
    }

    #[cfg(test)]
    pub fn from_body(body: Vec<Position>, direction: Option<Direction>) -> Self {
        assert!(!body.is_empty());
        Snake { body, direction }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Where the head goes on the next move, or `None` while idle.
    pub fn next_head(&self) -> Option<Position> {
        self.direction.map(|dir| self.head().step(dir))
    }

    /// Every segment takes the place of the one in front of it and the head
    /// steps in the current direction.
    pub fn move_step(&mut self) -> MoveResult {
        let new_head = match self.next_head() {
            Some(pos) => pos,
            None => return Idle,
        };

        let old_tail = self.body[self.body.len() - 1];
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = new_head;

        Moved { new_head, old_tail }
    }

    /// Returns whether the direction was accepted. Turning back onto the
    /// neck is refused once there is a neck.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        match self.direction {
            Some(current) if self.len() > 1 && current.opposite() == new_direction => false,
            _ => {
                self.direction = Some(new_direction);
                true
            }
        }
    }

    pub fn get_direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Appends a copy of the tail; it separates from the body on the next move.
    pub fn grow(&mut self) {
        let tail = self.body[self.body.len() - 1];
        self.body.push(tail);
    }

    pub fn bites_itself(&self) -> bool {
        self.body[1..].contains(&self.head())
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Some(Up) => '^',
            Some(Down) => 'v',
            Some(Left) => '<',
            Some(Right) => '>',
            None => '@',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_idle_snake_does_not_move() {
        let mut snake = Snake::new(p(4, 4));
        assert!(matches!(snake.move_step(), Idle));
        assert_eq!(snake.body(), &[p(4, 4)]);
    }

    #[test]
    fn test_head_moves_by_direction_vector() {
        for dir in [Up, Down, Left, Right] {
            let mut snake = Snake::new(p(4, 4));
            snake.set_direction(dir);
            let old_head = snake.head();
            snake.move_step();
            let (d_row, d_col) = dir.delta();
            assert_eq!(snake.head(), p(old_head.row + d_row, old_head.col + d_col));
        }
    }

    #[test]
    fn test_body_follows_head() {
        let mut snake = Snake::from_body(vec![p(2, 3), p(2, 2), p(2, 1)], Some(Right));
        match snake.move_step() {
            Moved { new_head, old_tail } => {
                assert_eq!(new_head, p(2, 4));
                assert_eq!(old_tail, p(2, 1));
            }
            Idle => panic!("snake should have moved"),
        }
        assert_eq!(snake.body(), &[p(2, 4), p(2, 3), p(2, 2)]);
    }

    #[test]
    fn test_grow_adds_one_segment_and_keeps_shape() {
        let mut snake = Snake::from_body(vec![p(2, 3), p(2, 2)], Some(Right));
        snake.grow();
        assert_eq!(snake.body(), &[p(2, 3), p(2, 2), p(2, 2)]);

        snake.move_step();
        assert_eq!(snake.body(), &[p(2, 4), p(2, 3), p(2, 2)]);
    }

    #[test]
    fn test_reverse_refused_with_a_neck() {
        let mut snake = Snake::from_body(vec![p(2, 3), p(2, 2)], Some(Right));
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Some(Right));
        assert!(snake.set_direction(Up));
        assert_eq!(snake.get_direction(), Some(Up));
    }

    #[test]
    fn test_reverse_allowed_for_single_segment() {
        let mut snake = Snake::new(p(2, 2));
        snake.set_direction(Right);
        assert!(snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Some(Left));
    }

    #[test]
    fn test_bites_itself() {
        // Head at (1,1) walking down into the segment at (2,1)
        let mut snake = Snake::from_body(
            vec![p(1, 1), p(1, 2), p(2, 2), p(2, 1), p(3, 1)],
            Some(Down),
        );
        snake.move_step();
        assert!(snake.bites_itself());
    }

    #[test]
    fn test_following_own_tail_is_safe() {
        // A closed loop of four: the head enters the cell the tail just left.
        let mut snake = Snake::from_body(vec![p(1, 1), p(1, 2), p(2, 2), p(2, 1)], Some(Down));
        snake.move_step();
        assert_eq!(snake.head(), p(2, 1));
        assert!(!snake.bites_itself());
    }

    #[test]
    fn test_head_char() {
        let mut snake = Snake::new(p(0, 0));
        assert_eq!(snake.head_char(), '@');
        snake.set_direction(Up);
        assert_eq!(snake.head_char(), '^');
    }
}
