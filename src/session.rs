use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::board::Board;
use crate::clock::GameClock;
use crate::config::{INITIAL_DIRECTION, INITIAL_SNAKE, WIN_LENGTH};
use crate::food::{FoodGenerator, FoodItem, FoodKind};
use crate::frontend::Frame;
use crate::snake::{Direction, Snake};
use crate::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Lost,
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved { head: Position, eaten: Option<FoodKind> },
    Lost { length: usize, elapsed_seconds: u64 },
    Won { elapsed_seconds: u64 },
    /// The game had already ended; nothing happened
    Halted,
}

/// One game from start to Lost/Won. Owns the snake, the food, the clock and
/// the random source used to place food.
pub struct Session {
    board: Board,
    snake: Snake,
    food: Vec<FoodItem>,
    generator: FoodGenerator<StdRng>,
    clock: GameClock,
    status: GameStatus,
}

impl Session {
    /// A fresh game on the default board. A seed makes food placement
    /// repeatable.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let board = Board::default();
        let mut generator = FoodGenerator::new(board, rng);
        let food = generator.initial_food();
        let snake = Snake::new(&INITIAL_SNAKE, INITIAL_DIRECTION);

        info!(?seed, food = food.len(), "new game");
        Session::with_generator(board, snake, food, generator)
    }

    /// A game in an arbitrary starting position.
    pub fn from_parts(board: Board, snake: Snake, food: Vec<FoodItem>, rng: StdRng) -> Self {
        Session::with_generator(board, snake, food, FoodGenerator::new(board, rng))
    }

    fn with_generator(board: Board, snake: Snake, food: Vec<FoodItem>, generator: FoodGenerator<StdRng>) -> Self {
        Session { board, snake, food, generator, clock: GameClock::new(), status: GameStatus::Running }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &[FoodItem] {
        &self.food
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.elapsed_seconds()
    }

    pub fn update_interval(&self) -> Duration {
        self.clock.update_interval()
    }

    /// Advances the snake by one cell.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Halted;
        }

        let new_head = self.snake.next_head(self.board.cell_size);

        // Checked against the snake before it moves, tail included
        if !self.board.contains(new_head) || self.snake.occupies(new_head) {
            self.finish(GameStatus::Lost);
            return TickOutcome::Lost {
                length: self.snake.len(),
                elapsed_seconds: self.elapsed_seconds(),
            };
        }

        if self.snake.len() >= WIN_LENGTH {
            self.finish(GameStatus::Won);
            return TickOutcome::Won { elapsed_seconds: self.elapsed_seconds() };
        }

        let eaten = self.consume_food_at(new_head);
        self.snake.advance(new_head, eaten.map_or(0, FoodKind::growth));
        debug!(?new_head, length = self.snake.len(), "tick");

        TickOutcome::Moved { head: new_head, eaten }
    }

    /// The clock's opening beat, due right after the first tick. Speeds the
    /// game up once; elapsed time stays at zero.
    pub fn start_clock(&mut self) {
        if self.is_running() {
            self.clock.start();
        }
    }

    /// One second of game time went by.
    pub fn on_second(&mut self) {
        if self.is_running() {
            self.clock.advance_second();
        }
    }

    /// Feeds a raw key name in. Returns whether it became the new heading;
    /// reversals, unknown keys and keys after the game ended are dropped.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if !self.is_running() {
            return false;
        }

        match Direction::from_key(key) {
            Some(dir) => self.snake.set_direction(dir),
            None => false,
        }
    }

    pub fn status_message(&self) -> Option<Vec<String>> {
        match self.status {
            GameStatus::Running => None,
            GameStatus::Lost => Some(vec![
                "Game Over!".to_string(),
                format!("Length: {}", self.snake.len()),
                format!("Time used: {}s", self.elapsed_seconds()),
            ]),
            GameStatus::Won => Some(vec![
                "You Win!".to_string(),
                format!("Time used: {}s", self.elapsed_seconds()),
            ]),
        }
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            board: self.board,
            snake: &self.snake,
            food: &self.food,
            length: self.snake.len(),
            elapsed_seconds: self.elapsed_seconds(),
            status: self.status,
            message: self.status_message(),
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn consume_food_at(&mut self, pos: Position) -> Option<FoodKind> {
        let idx = self.food.iter().position(|f| f.position == pos)?;
        let kind = self.food.remove(idx).kind;
        let replacement = self.generator.spawn(kind);

        info!(?pos, ?kind, replacement = ?replacement.position, "food eaten");
        self.food.push(replacement);
        Some(kind)
    }

    fn finish(&mut self, status: GameStatus) {
        self.status = status;
        self.clock.stop();
        info!(?status, length = self.snake.len(), elapsed = self.elapsed_seconds(), "game over");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{INITIAL_CIRCULAR_FOOD, INITIAL_STAR_FOOD};
    use crate::snake::Direction::*;

    fn session(snake: &[Position], dir: Direction, food: Vec<FoodItem>) -> Session {
        Session::from_parts(Board::default(), Snake::new(snake, dir), food, StdRng::seed_from_u64(1))
    }

    fn count(food: &[FoodItem], kind: FoodKind) -> usize {
        food.iter().filter(|f| f.kind == kind).count()
    }

    #[test]
    fn new_game_layout() {
        let s = Session::new(Some(5));
        assert_eq!(s.snake().segments(), vec![(100, 100), (80, 100), (60, 100)]);
        assert_eq!(s.snake().get_direction(), Right);
        assert_eq!(count(s.food(), FoodKind::Circular), INITIAL_CIRCULAR_FOOD);
        assert_eq!(count(s.food(), FoodKind::Star), INITIAL_STAR_FOOD);
        assert_eq!(s.status(), GameStatus::Running);
        assert_eq!(s.elapsed_seconds(), 0);
        assert!(s.status_message().is_none());
    }

    #[test]
    fn moves_right_without_food() {
        let mut s = session(&[(100, 100), (80, 100), (60, 100)], Right, vec![]);
        let outcome = s.tick();
        assert_eq!(outcome, TickOutcome::Moved { head: (120, 100), eaten: None });
        assert_eq!(s.snake().segments(), vec![(120, 100), (100, 100), (80, 100)]);
    }

    #[test]
    fn circular_food_grows_by_one_and_is_replaced() {
        let food = vec![
            FoodItem::new((400, 400), FoodKind::Star),
            FoodItem::new((120, 100), FoodKind::Circular),
            FoodItem::new((500, 500), FoodKind::Circular),
        ];
        let mut s = session(&[(100, 100), (80, 100), (60, 100)], Right, food);

        let outcome = s.tick();
        assert_eq!(outcome, TickOutcome::Moved { head: (120, 100), eaten: Some(FoodKind::Circular) });
        assert_eq!(s.snake().segments(), vec![(120, 100), (100, 100), (80, 100), (60, 100)]);

        assert_eq!(s.food().len(), 3);
        assert_eq!(s.food()[0], FoodItem::new((400, 400), FoodKind::Star));
        assert_eq!(s.food()[1], FoodItem::new((500, 500), FoodKind::Circular));
        let replacement = s.food()[2];
        assert_eq!(replacement.kind, FoodKind::Circular);
        assert!(s.board().contains(replacement.position));
    }

    #[test]
    fn star_food_grows_by_two_along_the_tail() {
        let food = vec![FoodItem::new((120, 100), FoodKind::Star)];
        let mut s = session(&[(100, 100), (80, 100), (60, 100)], Right, food);

        s.tick();
        assert_eq!(
            s.snake().segments(),
            vec![(120, 100), (100, 100), (80, 100), (60, 100), (40, 100)]
        );
        assert_eq!(count(s.food(), FoodKind::Star), 1);
    }

    #[test]
    fn only_the_first_of_stacked_food_is_eaten() {
        let food = vec![
            FoodItem::new((120, 100), FoodKind::Star),
            FoodItem::new((120, 100), FoodKind::Circular),
        ];
        let mut s = session(&[(100, 100), (80, 100), (60, 100)], Right, food);

        assert_eq!(s.tick(), TickOutcome::Moved { head: (120, 100), eaten: Some(FoodKind::Star) });
        assert_eq!(s.snake().len(), 5);
        assert_eq!(s.food()[0], FoodItem::new((120, 100), FoodKind::Circular));
        assert_eq!(s.food()[1].kind, FoodKind::Star);
    }

    #[test]
    fn leaving_the_board_loses() {
        let mut s = session(&[(0, 100), (20, 100), (40, 100)], Left, vec![]);
        assert_eq!(s.tick(), TickOutcome::Lost { length: 3, elapsed_seconds: 0 });
        assert_eq!(s.status(), GameStatus::Lost);
        assert_eq!(s.tick(), TickOutcome::Halted);
        assert_eq!(s.snake().head(), (0, 100));
    }

    #[test]
    fn bottom_and_right_edges_are_exclusive() {
        let mut s = session(&[(780, 100), (760, 100), (740, 100)], Right, vec![]);
        assert!(matches!(s.tick(), TickOutcome::Lost { .. }));

        let mut s = session(&[(100, 780), (100, 760), (100, 740)], Down, vec![]);
        assert!(matches!(s.tick(), TickOutcome::Lost { .. }));
    }

    #[test]
    fn running_into_the_body_loses() {
        // Head at (100,100) heading Up into (100,80)
        let body = [(100, 100), (120, 100), (120, 80), (100, 80), (80, 80)];
        let mut s = session(&body, Up, vec![]);
        assert_eq!(s.tick(), TickOutcome::Lost { length: 5, elapsed_seconds: 0 });
    }

    #[test]
    fn chasing_the_tail_still_loses() {
        // The tail would move out of the way, but the check is pre-shift
        let body = [(100, 100), (120, 100), (120, 80), (100, 80)];
        let mut s = session(&body, Up, vec![]);
        assert!(matches!(s.tick(), TickOutcome::Lost { .. }));
    }

    #[test]
    fn win_is_checked_before_food() {
        let body = [(300, 100), (280, 100), (260, 100), (240, 100), (220, 100), (200, 100), (180, 100), (160, 100)];
        let food = vec![FoodItem::new((320, 100), FoodKind::Circular)];
        let mut s = session(&body, Right, food.clone());

        assert_eq!(s.tick(), TickOutcome::Won { elapsed_seconds: 0 });
        assert_eq!(s.status(), GameStatus::Won);
        assert_eq!(s.snake().head(), (300, 100));
        assert_eq!(s.food(), &food[..]);
    }

    #[test]
    fn collision_beats_win() {
        let body = [(780, 100), (760, 100), (740, 100), (720, 100), (700, 100), (680, 100), (660, 100), (640, 100)];
        let mut s = session(&body, Right, vec![]);
        assert!(matches!(s.tick(), TickOutcome::Lost { length: 8, .. }));
    }

    #[test]
    fn reaching_eight_wins_on_the_following_tick() {
        let body = [(200, 100), (180, 100), (160, 100), (140, 100), (120, 100), (100, 100), (80, 100)];
        let food = vec![FoodItem::new((220, 100), FoodKind::Circular)];
        let mut s = session(&body, Right, food);

        assert!(matches!(s.tick(), TickOutcome::Moved { eaten: Some(FoodKind::Circular), .. }));
        assert_eq!(s.snake().len(), 8);
        assert_eq!(s.status(), GameStatus::Running);
        assert!(matches!(s.tick(), TickOutcome::Won { .. }));
    }

    #[test]
    fn opposite_key_is_ignored() {
        let mut s = session(&[(100, 100), (80, 100), (60, 100)], Right, vec![]);
        assert!(!s.handle_key("Left"));
        assert_eq!(s.snake().get_direction(), Right);

        assert!(!s.handle_key("Escape"));
        assert!(s.handle_key("Down"));
        assert_eq!(s.tick(), TickOutcome::Moved { head: (100, 120), eaten: None });
    }

    #[test]
    fn only_the_last_key_before_a_tick_counts() {
        let mut s = session(&[(100, 100), (80, 100), (60, 100)], Right, vec![]);
        s.handle_key("Up");
        s.handle_key("Right");
        assert_eq!(s.tick(), TickOutcome::Moved { head: (120, 100), eaten: None });
    }

    #[test]
    fn keys_are_dropped_after_the_game_ends() {
        let mut s = session(&[(0, 100), (20, 100), (40, 100)], Left, vec![]);
        s.tick();
        assert!(!s.handle_key("Up"));
        assert_eq!(s.snake().get_direction(), Left);
    }

    #[test]
    fn clock_freezes_when_the_game_ends() {
        let mut s = session(&[(0, 100), (20, 100), (40, 100)], Left, vec![]);
        s.on_second();
        s.on_second();
        s.tick();
        s.on_second();
        assert_eq!(s.elapsed_seconds(), 2);
        assert_eq!(s.update_interval(), Duration::from_millis(92));
    }

    #[test]
    fn end_messages() {
        let mut s = session(&[(0, 100), (20, 100), (40, 100)], Left, vec![]);
        s.on_second();
        s.tick();
        assert_eq!(
            s.status_message(),
            Some(vec!["Game Over!".to_string(), "Length: 3".to_string(), "Time used: 1s".to_string()])
        );

        let body = [(300, 100), (280, 100), (260, 100), (240, 100), (220, 100), (200, 100), (180, 100), (160, 100)];
        let mut s = session(&body, Right, vec![]);
        s.tick();
        assert_eq!(s.status_message(), Some(vec!["You Win!".to_string(), "Time used: 0s".to_string()]));
        assert_eq!(s.frame().status, GameStatus::Won);
    }

    #[test]
    fn opening_beat_speeds_up_without_counting_a_second() {
        let mut s = session(&[(100, 100), (80, 100), (60, 100)], Right, vec![]);
        s.start_clock();
        assert_eq!(s.elapsed_seconds(), 0);
        assert_eq!(s.update_interval(), Duration::from_millis(96));

        s.start_clock();
        assert_eq!(s.update_interval(), Duration::from_millis(96));
    }

    #[test]
    fn food_counts_hold_while_eating_both_kinds() {
        // Enough on the snake's row to reach eight: 3 -> 4 -> 6 -> 7 -> 8
        let food = vec![
            FoodItem::new((120, 100), FoodKind::Circular),
            FoodItem::new((160, 100), FoodKind::Star),
            FoodItem::new((200, 100), FoodKind::Circular),
            FoodItem::new((240, 100), FoodKind::Circular),
            FoodItem::new((700, 700), FoodKind::Circular),
            FoodItem::new((720, 700), FoodKind::Circular),
            FoodItem::new((760, 700), FoodKind::Star),
        ];
        let mut s = session(&[(100, 100), (80, 100), (60, 100)], Right, food);
        let (mut circles, mut stars) = (0, 0);

        loop {
            let before = s.snake().len();
            match s.tick() {
                TickOutcome::Moved { eaten, .. } => {
                    assert_eq!(s.snake().len() - before, eaten.map_or(0, FoodKind::growth));
                    match eaten {
                        Some(FoodKind::Circular) => circles += 1,
                        Some(FoodKind::Star) => stars += 1,
                        None => {}
                    }
                }
                TickOutcome::Won { .. } => break,
                other => panic!("unexpected {:?}", other),
            }
            assert_eq!(count(s.food(), FoodKind::Circular), INITIAL_CIRCULAR_FOOD);
            assert_eq!(count(s.food(), FoodKind::Star), INITIAL_STAR_FOOD);
        }

        assert!(circles >= 1, "ate {} circles", circles);
        assert!(stars >= 1, "ate {} stars", stars);
        assert_eq!(s.status(), GameStatus::Won);
    }
}
