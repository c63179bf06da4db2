use log::warn;

use crate::board::{Board, Cell, Piece, PieceKind};
use crate::error::BoardQueryError;
use crate::movegen::MoveGenerator;

/// Static per-piece evaluation: material plus mobility plus tactical
/// pressure, color independent. The caller applies sign and perspective.
pub struct Evaluator {
    // Base material values
    pub pawn_value: f64,
    pub knight_value: f64,
    pub bishop_value: f64,
    pub rook_value: f64,
    pub queen_value: f64,
    pub king_value: f64,

    // Per-cell weights on the unfiltered reachable list
    pub mobility_weight: f64,
    pub pressure_weight: f64,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            pawn_value: 1.0,
            knight_value: 3.0,
            bishop_value: 3.2,
            rook_value: 5.0,
            queen_value: 9.0,
            // Large enough to dominate any summed score and discourage
            // king exposure in a downstream search.
            king_value: 200.0,

            mobility_weight: 0.05,
            pressure_weight: 0.10,
        }
    }

    pub fn base_material(&self, kind: PieceKind) -> f64 {
        match kind {
            PieceKind::Pawn => self.pawn_value,
            PieceKind::Knight => self.knight_value,
            PieceKind::Bishop => self.bishop_value,
            PieceKind::Rook => self.rook_value,
            PieceKind::Queen => self.queen_value,
            PieceKind::King => self.king_value,
        }
    }

    /// Score a single piece in the current position.
    ///
    /// Mobility and pressure are computed from the raw reachable-cell list,
    /// before any legality filtering. A failing board query zeroes the
    /// affected term instead of propagating; evaluation always returns a
    /// usable number. Swallowed failures are logged so the caller can still
    /// see them.
    pub fn evaluate<B: Board>(&self, board: &B, piece: &Piece) -> f64 {
        let base = self.base_material(piece.kind);

        let generator = MoveGenerator::new();
        let reachable = match generator.reachable_cells(board, piece) {
            Ok(cells) => cells,
            Err(err) => {
                warn!("mobility term unavailable for {:?}: {}", piece.kind, err);
                return base;
            }
        };
        let mobility = self.mobility_weight * reachable.len() as f64;

        let pressure = match self.count_hits(board, piece, &reachable) {
            Ok(hits) => self.pressure_weight * hits as f64,
            Err(err) => {
                warn!("pressure term unavailable for {:?}: {}", piece.kind, err);
                0.0
            }
        };

        base + mobility + pressure
    }

    fn count_hits<B: Board>(
        &self,
        board: &B,
        piece: &Piece,
        reachable: &[Cell],
    ) -> Result<usize, BoardQueryError> {
        let mut hits = 0;
        for &cell in reachable {
            if board.piece_can_hit_on_cell(piece, cell)? {
                hits += 1;
            }
        }
        Ok(hits)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
