use log::debug;

use crate::board::{Board, Side};
use crate::game::MoveSelector;
use crate::rules::{Move, generate_moves};

/// Score sheet for one root move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub mv: Move,
    /// Worst piece differential (mover minus opponent) over every opponent
    /// reply, or the differential right after the move when there is none.
    pub branch_score: i32,
    pub immediate_flips: usize,
}

/// Exhaustive two-ply minimax: our move, then the opponent's best reply.
/// No pruning; the board is small enough that every pair is simulated.
#[derive(Debug, Default, Clone, Copy)]
pub struct TwoPlySearcher;

impl TwoPlySearcher {
    pub fn new() -> Self {
        Self
    }

    /// Returns `None` when `side` has no legal move.
    pub fn search(&self, board: &Board, side: Side) -> Option<Move> {
        let candidates = evaluate_candidates(board, side);
        let best = pick_best(&candidates)?;

        debug!(
            "{side} picks {} from {} candidates (branch score {}, flips {})",
            best.mv,
            candidates.len(),
            best.branch_score,
            best.immediate_flips
        );

        Some(best.mv)
    }
}

impl MoveSelector for TwoPlySearcher {
    fn select_move(&self, board: &Board, side: Side) -> Option<Move> {
        self.search(board, side)
    }
}

/// Scores every legal move of `side`, in generation order. `board` is only
/// read; each simulation runs on its own clone.
pub fn evaluate_candidates(board: &Board, side: Side) -> Vec<Candidate> {
    generate_moves(board, side)
        .into_iter()
        .map(|mv| score_candidate(board, mv, side))
        .collect()
}

fn score_candidate(board: &Board, mv: Move, side: Side) -> Candidate {
    let mut after_move = board.clone();
    let immediate_flips = after_move.apply(mv, side).flipped_count();

    let opponent = side.opponent();
    let branch_score = generate_moves(&after_move, opponent)
        .into_iter()
        .map(|reply| {
            let mut after_reply = after_move.clone();
            after_reply.apply(reply, opponent);
            after_reply.differential(side)
        })
        .min()
        .unwrap_or_else(|| after_move.differential(side));

    Candidate {
        mv,
        branch_score,
        immediate_flips,
    }
}

fn pick_best(candidates: &[Candidate]) -> Option<Candidate> {
    let (first, rest) = candidates.split_first()?;
    Some(rest.iter().fold(*first, |best, &challenger| {
        if is_better_candidate(&challenger, &best) {
            challenger
        } else {
            best
        }
    }))
}

/// Higher branch score, then more flips, then a clone move displaces a jump.
/// A jump never displaces a clone move, and any other tie keeps the
/// earlier candidate.
fn is_better_candidate(challenger: &Candidate, best: &Candidate) -> bool {
    if challenger.branch_score != best.branch_score {
        return challenger.branch_score > best.branch_score;
    }
    if challenger.immediate_flips != best.immediate_flips {
        return challenger.immediate_flips > best.immediate_flips;
    }
    best.mv.is_jump() && !challenger.mv.is_jump()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn mv(sr: u8, sc: u8, tr: u8, tc: u8) -> Move {
        Move::new(Position::new(sr, sc), Position::new(tr, tc))
    }

    fn candidate(mv: Move, branch_score: i32, immediate_flips: usize) -> Candidate {
        Candidate {
            mv,
            branch_score,
            immediate_flips,
        }
    }

    #[test]
    fn search_returns_none_without_legal_moves() {
        let board = Board::from_rows(&["RBBB", "BBBB", "BBB.", "...."]).unwrap();

        assert_eq!(TwoPlySearcher::new().search(&board, Side::Red), None);
    }

    #[test]
    fn search_prefers_jump_that_wipes_out_the_opponent() {
        let board = Board::from_rows(&["R...", "....", "....", "...B"]).unwrap();

        let candidates = evaluate_candidates(&board, Side::Red);
        let chosen = TwoPlySearcher::new().search(&board, Side::Red);

        assert_eq!(chosen, Some(mv(0, 0, 2, 2)));
        let winner = candidates.iter().find(|c| c.mv == mv(0, 0, 2, 2)).unwrap();
        assert_eq!(winner.branch_score, 2);
        assert_eq!(winner.immediate_flips, 1);
        // Cloning next to the corner lets blue jump in and flip back.
        let clone = candidates.iter().find(|c| c.mv == mv(0, 0, 1, 1)).unwrap();
        assert_eq!(clone.branch_score, -2);
    }

    #[test]
    fn search_leaves_the_input_board_untouched() {
        let board = Board::new();
        let before = board.clone();

        let _ = TwoPlySearcher::new().search(&board, Side::Blue);

        assert_eq!(board, before);
    }

    #[test]
    fn search_is_deterministic() {
        let board = Board::from_rows(&[
            "R.......",
            "..B.....",
            "....R...",
            ".B......",
            "......B.",
            "...R....",
            "........",
            "B......R",
        ])
        .unwrap();
        let searcher = TwoPlySearcher::new();

        let first = searcher.search(&board, Side::Blue);
        for _ in 0..5 {
            assert_eq!(searcher.search(&board, Side::Blue), first);
        }
        assert!(first.is_some());
    }

    #[test]
    fn equal_branch_score_prefers_more_immediate_flips() {
        let few = candidate(mv(0, 0, 0, 1), 3, 1);
        let many = candidate(mv(7, 7, 6, 6), 3, 2);

        assert_eq!(pick_best(&[few, many]), Some(many));
        assert_eq!(pick_best(&[many, few]), Some(many));
    }

    #[test]
    fn full_tie_switches_from_jump_to_clone_move() {
        let jump = candidate(mv(0, 0, 0, 2), 1, 0);
        let clone = candidate(mv(7, 7, 6, 7), 1, 0);

        assert_eq!(pick_best(&[jump, clone]), Some(clone));
    }

    #[test]
    fn full_tie_never_switches_from_clone_move_to_jump() {
        let clone = candidate(mv(0, 0, 0, 1), 1, 0);
        let jump = candidate(mv(7, 7, 5, 7), 1, 0);
        let later_clone = candidate(mv(7, 7, 6, 7), 1, 0);

        assert_eq!(pick_best(&[clone, jump]), Some(clone));
        assert_eq!(pick_best(&[clone, later_clone]), Some(clone));
    }

    #[test]
    fn higher_branch_score_beats_flips() {
        let greedy = candidate(mv(0, 0, 1, 1), -1, 5);
        let safe = candidate(mv(7, 7, 6, 6), 0, 0);

        assert_eq!(pick_best(&[greedy, safe]), Some(safe));
    }
}
