use log::trace;

use crate::board::{Board, Cell, Color, Piece, PieceKind};
use crate::error::{EngineError, EngineResult};

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];
pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];
pub const KING_STEPS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const WHITE_PAWN_START_ROW: i8 = 1;
const BLACK_PAWN_START_ROW: i8 = 6;

/// Generates the cells a piece can reach and filters them for legality.
///
/// Reachable cells ignore king safety; `legal_moves` additionally simulates
/// each candidate against the board and keeps only the moves that do not
/// leave the mover's own king in check.
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// All cells `piece` could occupy next, ignoring king safety.
    ///
    /// Every returned cell is in bounds and either empty or holds an enemy
    /// piece. The list is recomputed on every call; board state changes
    /// between calls.
    pub fn reachable_cells<B: Board>(&self, board: &B, piece: &Piece) -> EngineResult<Vec<Cell>> {
        let from = piece.cell.ok_or(EngineError::UnplacedPiece)?;
        match piece.kind {
            PieceKind::Pawn => self.pawn_reachable(board, piece, from),
            PieceKind::Knight => self.step_reachable(board, piece, from, &KNIGHT_JUMPS),
            PieceKind::King => self.step_reachable(board, piece, from, &KING_STEPS),
            PieceKind::Rook => self.sliding_reachable(board, piece, from, &ROOK_DIRECTIONS),
            PieceKind::Bishop => self.sliding_reachable(board, piece, from, &BISHOP_DIRECTIONS),
            PieceKind::Queen => self.sliding_reachable(board, piece, from, &QUEEN_DIRECTIONS),
        }
    }

    /// The subset of `reachable_cells` that leaves the mover's own king safe.
    ///
    /// Each candidate is simulated with a scoped relocation that rolls back
    /// when dropped, so the board is exactly in its pre-call state when this
    /// returns, on the error path too. Candidates are simulated strictly one
    /// at a time, which is why this takes the board mutably for the whole
    /// call.
    pub fn legal_moves<B: Board>(&self, board: &mut B, piece: &Piece) -> EngineResult<Vec<Cell>> {
        let reachable = self.reachable_cells(board, piece)?;
        let candidates = reachable.len();

        let mut legal = Vec::with_capacity(candidates);
        for target in reachable {
            let simulation = Simulation::begin(board, piece, target)?;
            let in_check = simulation.own_king_in_check()?;
            drop(simulation);
            if !in_check {
                legal.push(target);
            }
        }

        trace!(
            "{:?} {:?}: {} of {} reachable cells are legal",
            piece.color,
            piece.kind,
            legal.len(),
            candidates
        );
        Ok(legal)
    }

    fn pawn_reachable<B: Board>(
        &self,
        board: &B,
        piece: &Piece,
        from: Cell,
    ) -> EngineResult<Vec<Cell>> {
        let mut reachable = Vec::new();
        let (direction, start_row) = match piece.color {
            Color::White => (1, WHITE_PAWN_START_ROW),
            Color::Black => (-1, BLACK_PAWN_START_ROW),
        };

        // One step forward, onto an empty cell only.
        let one_step = from.offset(direction, 0);
        if board.cell_is_valid_and_empty(one_step)? {
            reachable.push(one_step);

            // Two steps forward, from the start row only; the intermediate
            // cell was already checked above.
            let two_step = from.offset(2 * direction, 0);
            if from.row == start_row && board.cell_is_valid_and_empty(two_step)? {
                reachable.push(two_step);
            }
        }

        // Diagonals are capture-only; an empty diagonal is never a candidate.
        for dc in [-1, 1] {
            let diagonal = from.offset(direction, dc);
            if board.piece_can_hit_on_cell(piece, diagonal)? {
                reachable.push(diagonal);
            }
        }

        Ok(reachable)
    }

    fn step_reachable<B: Board>(
        &self,
        board: &B,
        piece: &Piece,
        from: Cell,
        steps: &[(i8, i8)],
    ) -> EngineResult<Vec<Cell>> {
        let mut reachable = Vec::new();
        for &(dr, dc) in steps {
            let target = from.offset(dr, dc);
            if board.piece_can_enter_cell(piece, target)?
                || board.piece_can_hit_on_cell(piece, target)?
            {
                reachable.push(target);
            }
        }
        Ok(reachable)
    }

    fn sliding_reachable<B: Board>(
        &self,
        board: &B,
        piece: &Piece,
        from: Cell,
        directions: &[(i8, i8)],
    ) -> EngineResult<Vec<Cell>> {
        let mut reachable = Vec::new();
        for &(dr, dc) in directions {
            let mut target = from.offset(dr, dc);
            loop {
                if board.cell_is_valid_and_empty(target)? {
                    reachable.push(target);
                } else if board.piece_can_hit_on_cell(piece, target)? {
                    // Inclusive stop on a capture.
                    reachable.push(target);
                    break;
                } else {
                    // Friendly piece or the board edge.
                    break;
                }
                target = target.offset(dr, dc);
            }
        }
        Ok(reachable)
    }
}

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A hypothetical relocation of `mover` onto `target`, rolled back when the
/// guard drops. Rollback order matters: the mover goes back to its origin
/// first, then the captured occupant goes back onto the target.
struct Simulation<'a, B: Board> {
    board: &'a mut B,
    mover: Piece,
    origin: Cell,
    target: Cell,
    captured: Option<Piece>,
}

impl<'a, B: Board> Simulation<'a, B> {
    fn begin(board: &'a mut B, piece: &Piece, target: Cell) -> EngineResult<Self> {
        let origin = piece.cell.ok_or(EngineError::UnplacedPiece)?;
        let captured = board.get_cell(target)?;
        board.set_cell(target, Some(*piece));
        Ok(Self {
            board,
            mover: *piece,
            origin,
            target,
            captured,
        })
    }

    fn own_king_in_check(&self) -> EngineResult<bool> {
        Ok(self.board.is_king_check_cached(self.mover.color)?)
    }
}

impl<B: Board> Drop for Simulation<'_, B> {
    fn drop(&mut self) {
        self.board.set_cell(self.origin, Some(self.mover));
        self.board.set_cell(self.target, self.captured);
    }
}
