use std::fmt;
use std::time::Duration;

use log::info;

use crate::ai::TwoPlySearcher;
use crate::board::{Board, Placement, Side};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::rules::{Move, generate_moves, has_legal_move, is_legal, moves_from};
use crate::timer::TurnTimer;
use crate::types::{GameResult, GameState, MoveView, Position};

/// Picks a move for `side`, or `None` to pass.
pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board, side: Side) -> Option<Move>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The named side has no pieces left.
    Eliminated(Side),
    BoardFull,
    /// Two passes in a row.
    NoMovesForEither,
    /// The human ran out of time right after a pass.
    TimeoutAfterPass,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eliminated(side) => write!(f, "{side} has no pieces left"),
            Self::BoardFull => f.write_str("board is full"),
            Self::NoMovesForEither => f.write_str("neither side can move"),
            Self::TimeoutAfterPass => f.write_str("time ran out after a pass"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// `None` is a draw.
    pub winner: Option<Side>,
    pub reason: EndReason,
}

impl Outcome {
    fn by_count(board: &Board, reason: EndReason) -> Self {
        let winner = match board.differential(Side::Red) {
            d if d > 0 => Some(Side::Red),
            d if d < 0 => Some(Side::Blue),
            _ => None,
        };
        Self { winner, reason }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingHuman(Side),
    AiThinking(Side),
    Terminal(Outcome),
}

/// Notifications for the rendering layer, drained with
/// [`GameInstance::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    BoardChanged(Board),
    TurnChanged(Side),
    MovesAvailable { side: Side, moves: Vec<Move> },
    PassOccurred(Side),
    GameEnded(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTurn {
    Moved(Move),
    Passed,
}

/// Owns one game: the live board, whose turn it is, the pass flag and the
/// outcome once the game is over. Nothing else mutates it.
pub struct GameInstance {
    config: GameConfig,
    board: Board,
    side_to_move: Side,
    is_pass: bool,
    outcome: Option<Outcome>,
    last_move: Option<Move>,
    flipped: Vec<Position>,
    timer: TurnTimer,
    events: Vec<GameEvent>,
    selector: Box<dyn MoveSelector>,
}

impl GameInstance {
    /// Starts a game from the initial board; the human moves first.
    pub fn new(config: GameConfig, selector: Box<dyn MoveSelector>) -> Result<Self, GameError> {
        config.validate()?;
        let board = Board::with_size(config.board_size);
        let side = config.human_side;
        Ok(Self::start(config, board, side, selector))
    }

    pub fn new_with_default_selector(config: GameConfig) -> Result<Self, GameError> {
        Self::new(config, Box::new(TwoPlySearcher::new()))
    }

    /// Starts a game from an arbitrary position. The position is settled
    /// at once, so it may come back already passed or finished.
    pub fn with_position(
        config: GameConfig,
        board: Board,
        side_to_move: Side,
        selector: Box<dyn MoveSelector>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let size = board.size();
        if size != config.board_size {
            return Err(GameError::InvalidConfig(format!(
                "board is {size}x{size} but config says {}",
                config.board_size
            )));
        }
        Ok(Self::start(config, board, side_to_move, selector))
    }

    fn start(
        config: GameConfig,
        board: Board,
        side_to_move: Side,
        selector: Box<dyn MoveSelector>,
    ) -> Self {
        let timer = TurnTimer::start(config.human_time_limit());
        let mut game = Self {
            config,
            board,
            side_to_move,
            is_pass: false,
            outcome: None,
            last_move: None,
            flipped: Vec::new(),
            timer,
            events: Vec::new(),
            selector,
        };
        game.events.push(GameEvent::BoardChanged(game.board.clone()));
        game.settle();
        game
    }

    /// Throws the current game away and starts over with the same config.
    pub fn reset(&mut self) {
        self.board = Board::with_size(self.config.board_size);
        self.side_to_move = self.config.human_side;
        self.is_pass = false;
        self.outcome = None;
        self.last_move = None;
        self.flipped.clear();
        self.events.clear();
        self.events.push(GameEvent::BoardChanged(self.board.clone()));
        self.settle();
    }

    /// Plays a human move. Any rejection leaves the game untouched.
    pub fn attempt_move(
        &mut self,
        source: Position,
        destination: Position,
    ) -> Result<Placement, GameError> {
        self.ensure_running()?;
        let human = self.config.human_side;
        if self.side_to_move != human {
            return Err(GameError::NotYourTurn(human));
        }
        for pos in [source, destination] {
            if !self.board.contains(pos) {
                return Err(GameError::OutOfBounds {
                    row: pos.row,
                    col: pos.col,
                });
            }
        }

        let mv = Move::new(source, destination);
        if !is_legal(&self.board, mv, human) {
            return Err(GameError::IllegalMove {
                from: source,
                to: destination,
            });
        }

        Ok(self.play(mv, human))
    }

    /// Lets the selector move for the AI side. A selector that finds no
    /// move passes.
    pub fn request_ai_move(&mut self) -> Result<AiTurn, GameError> {
        self.ensure_running()?;
        let ai = self.config.ai_side();
        if self.side_to_move != ai {
            return Err(GameError::NotYourTurn(ai));
        }

        match self.selector.select_move(&self.board, ai) {
            Some(mv) if is_legal(&self.board, mv, ai) => {
                self.play(mv, ai);
                Ok(AiTurn::Moved(mv))
            }
            Some(mv) => Err(GameError::IllegalMove {
                from: mv.source,
                to: mv.destination,
            }),
            None => {
                info!("{ai} passes");
                self.pass(EndReason::NoMovesForEither);
                Ok(AiTurn::Passed)
            }
        }
    }

    /// Human ran out of time: same as a pass.
    pub fn pass_on_timeout(&mut self) -> Result<(), GameError> {
        self.ensure_running()?;
        let human = self.config.human_side;
        if self.side_to_move != human {
            return Err(GameError::NotYourTurn(human));
        }

        info!("{human} ran out of time");
        self.pass(EndReason::TimeoutAfterPass);
        Ok(())
    }

    /// Feeds the time spent on the current human turn. Returns `true` when
    /// it used up the limit and the turn was passed.
    pub fn handle_time_elapsed(&mut self, elapsed: Duration) -> bool {
        if !self.is_human_turn() || !self.timer.is_expired_after(elapsed) {
            return false;
        }
        self.pass_on_timeout().is_ok()
    }

    /// Same as [`Self::handle_time_elapsed`] using the wall clock.
    pub fn poll_timer(&mut self) -> bool {
        self.handle_time_elapsed(self.timer.elapsed())
    }

    pub fn phase(&self) -> Phase {
        match self.outcome {
            Some(outcome) => Phase::Terminal(outcome),
            None if self.side_to_move == self.config.human_side => {
                Phase::AwaitingHuman(self.side_to_move)
            }
            None => Phase::AiThinking(self.side_to_move),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_pass(&self) -> bool {
        self.is_pass
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Cells flipped by the last move; empty after a pass.
    pub fn flipped(&self) -> &[Position] {
        &self.flipped
    }

    /// Legal moves for the side to move; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        generate_moves(&self.board, self.side_to_move)
    }

    /// Legal moves of the side to move starting at `source`.
    pub fn moves_from(&self, source: Position) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        moves_from(&self.board, source, self.side_to_move)
    }

    pub fn time_remaining_secs(&self) -> Option<u64> {
        self.is_human_turn().then(|| self.timer.remaining_secs())
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn to_game_state(&self) -> GameState {
        let (red_count, blue_count) = self.board.counts();
        let size = u16::from(self.board.size());
        GameState {
            board_size: self.board.size(),
            board: self.board.to_array(),
            current_player: self.side_to_move.code(),
            human_player: self.config.human_side.code(),
            red_count: red_count as u16,
            blue_count: blue_count as u16,
            is_game_over: self.is_game_over(),
            is_pass: self.is_pass,
            flipped: self
                .flipped
                .iter()
                .map(|pos| u16::from(pos.row) * size + u16::from(pos.col))
                .collect(),
            last_move: self.last_move.map(MoveView::from),
            time_remaining_secs: self.time_remaining_secs(),
        }
    }

    /// `None` while the game is still running.
    pub fn to_game_result(&self) -> Option<GameResult> {
        let (red_count, blue_count) = self.board.counts();
        self.outcome
            .as_ref()
            .map(|outcome| GameResult::new(outcome, red_count, blue_count))
    }

    fn is_human_turn(&self) -> bool {
        self.outcome.is_none() && self.side_to_move == self.config.human_side
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    fn play(&mut self, mv: Move, side: Side) -> Placement {
        let placement = self.board.apply(mv, side);

        self.is_pass = false;
        self.last_move = Some(mv);
        self.flipped = placement.flipped.clone();
        self.events.push(GameEvent::BoardChanged(self.board.clone()));
        self.side_to_move = side.opponent();
        self.settle();

        placement
    }

    /// Passes for the side to move. A second pass in a row ends the game
    /// with `reason`.
    fn pass(&mut self, reason: EndReason) {
        if self.is_pass {
            self.finish(Outcome::by_count(&self.board, reason));
            return;
        }
        self.mark_pass();
        self.settle();
    }

    fn mark_pass(&mut self) {
        let side = self.side_to_move;
        self.is_pass = true;
        self.flipped.clear();
        self.events.push(GameEvent::PassOccurred(side));
        self.side_to_move = side.opponent();
    }

    /// Checks terminal conditions for the side to move, passing automatically
    /// while it has no legal move, then opens its turn.
    fn settle(&mut self) {
        loop {
            let (red, blue) = self.board.counts();
            if red == 0 || blue == 0 {
                let loser = if red == 0 { Side::Red } else { Side::Blue };
                self.finish(Outcome {
                    winner: Some(loser.opponent()),
                    reason: EndReason::Eliminated(loser),
                });
                return;
            }
            if self.board.is_full() {
                self.finish(Outcome::by_count(&self.board, EndReason::BoardFull));
                return;
            }
            if has_legal_move(&self.board, self.side_to_move) {
                self.begin_turn();
                return;
            }
            if self.is_pass {
                self.finish(Outcome::by_count(&self.board, EndReason::NoMovesForEither));
                return;
            }
            info!("{} has no legal move and passes", self.side_to_move);
            self.mark_pass();
        }
    }

    fn begin_turn(&mut self) {
        let side = self.side_to_move;
        self.timer.restart();
        self.events.push(GameEvent::TurnChanged(side));
        self.events.push(GameEvent::MovesAvailable {
            side,
            moves: generate_moves(&self.board, side),
        });
    }

    fn finish(&mut self, outcome: Outcome) {
        let (red, blue) = self.board.counts();
        match outcome.winner {
            Some(winner) => info!("game over, {winner} wins {red}-{blue}: {}", outcome.reason),
            None => info!("game over, draw {red}-{blue}: {}", outcome.reason),
        }
        self.outcome = Some(outcome);
        self.events.push(GameEvent::GameEnded(outcome));
    }
}
