pub mod board;
pub mod error;
pub mod evaluation;
pub mod movegen;

#[cfg(test)]
mod tests {
    use crate::board::{ArrayBoard, Board, Cell, Color, Piece, PieceKind};
    use crate::error::{BoardQueryError, EngineError};
    use crate::evaluation::Evaluator;
    use crate::movegen::MoveGenerator;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn pinned_rook_may_only_move_along_the_pin_line() -> anyhow::Result<()> {
        let mut board = ArrayBoard::new();
        board.place(PieceKind::King, Color::White, Cell::new(0, 0));
        let rook = board.place(PieceKind::Rook, Color::White, Cell::new(0, 3));
        board.place(PieceKind::Rook, Color::Black, Cell::new(0, 7));

        let generator = MoveGenerator::new();
        let reachable = generator.reachable_cells(&board, &rook)?;
        let legal = generator.legal_moves(&mut board, &rook)?;

        // Leaving the file is reachable but not legal.
        assert!(reachable.contains(&Cell::new(1, 3)));
        assert!(legal.iter().all(|cell| cell.row == 0));
        // Sliding along the pin line and capturing the pinning rook are fine.
        assert!(legal.contains(&Cell::new(0, 4)));
        assert!(legal.contains(&Cell::new(0, 7)));
        Ok(())
    }

    #[test]
    fn legality_filter_restores_the_board_exactly() -> anyhow::Result<()> {
        let mut board = ArrayBoard::new();
        board.place(PieceKind::King, Color::White, Cell::new(0, 0));
        let queen = board.place(PieceKind::Queen, Color::White, Cell::new(3, 3));
        board.place(PieceKind::Pawn, Color::Black, Cell::new(6, 6));
        board.place(PieceKind::Rook, Color::Black, Cell::new(3, 7));
        let snapshot = board.clone();

        MoveGenerator::new().legal_moves(&mut board, &queen)?;
        assert_eq!(board, snapshot);
        Ok(())
    }

    #[test]
    fn legality_filter_with_zero_candidates_restores_the_board() -> anyhow::Result<()> {
        let mut board = ArrayBoard::new();
        let rook = board.place(PieceKind::Rook, Color::White, Cell::new(0, 0));
        board.place(PieceKind::Pawn, Color::White, Cell::new(0, 1));
        board.place(PieceKind::Pawn, Color::White, Cell::new(1, 0));
        let snapshot = board.clone();

        let legal = MoveGenerator::new().legal_moves(&mut board, &rook)?;
        assert!(legal.is_empty());
        assert_eq!(board, snapshot);
        Ok(())
    }

    #[test]
    fn legality_filter_restores_random_positions() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let kinds = [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ];
        let generator = MoveGenerator::new();

        for _ in 0..50 {
            let mut board = ArrayBoard::new();
            let mut pieces = vec![
                board.place(PieceKind::King, Color::White, Cell::new(0, 4)),
                board.place(PieceKind::King, Color::Black, Cell::new(7, 4)),
            ];
            for _ in 0..10 {
                let cell = Cell::new(rng.gen_range(0..8), rng.gen_range(0..8));
                if board.cell_is_valid_and_empty(cell)? {
                    let kind = kinds[rng.gen_range(0..kinds.len())];
                    let color = if rng.gen_bool(0.5) {
                        Color::White
                    } else {
                        Color::Black
                    };
                    pieces.push(board.place(kind, color, cell));
                }
            }

            let snapshot = board.clone();
            for piece in &pieces {
                generator.legal_moves(&mut board, piece)?;
                assert_eq!(board, snapshot);
            }
        }
        Ok(())
    }

    #[test]
    fn cornered_king_with_no_moves_while_in_check_is_mated() -> anyhow::Result<()> {
        let mut board = ArrayBoard::new();
        let king = board.place(PieceKind::King, Color::Black, Cell::new(7, 0));
        board.place(PieceKind::Queen, Color::White, Cell::new(6, 1));
        board.place(PieceKind::King, Color::White, Cell::new(5, 2));

        let legal = MoveGenerator::new().legal_moves(&mut board, &king)?;
        assert!(legal.is_empty());
        assert!(board.is_king_check_cached(Color::Black)?);
        Ok(())
    }

    #[test]
    fn cornered_king_with_no_moves_and_no_check_is_stalemated() -> anyhow::Result<()> {
        let mut board = ArrayBoard::new();
        let king = board.place(PieceKind::King, Color::Black, Cell::new(7, 0));
        board.place(PieceKind::Queen, Color::White, Cell::new(5, 1));
        board.place(PieceKind::King, Color::White, Cell::new(0, 7));

        let legal = MoveGenerator::new().legal_moves(&mut board, &king)?;
        assert!(legal.is_empty());
        assert!(!board.is_king_check_cached(Color::Black)?);
        Ok(())
    }

    #[test]
    fn king_may_not_step_into_an_attacked_cell() -> anyhow::Result<()> {
        let mut board = ArrayBoard::new();
        let king = board.place(PieceKind::King, Color::Black, Cell::new(4, 4));
        board.place(PieceKind::Rook, Color::White, Cell::new(0, 3));

        let legal = MoveGenerator::new().legal_moves(&mut board, &king)?;
        assert!(!legal.contains(&Cell::new(3, 3)));
        assert!(!legal.contains(&Cell::new(4, 3)));
        assert!(!legal.contains(&Cell::new(5, 3)));
        assert!(legal.contains(&Cell::new(4, 5)));
        Ok(())
    }

    #[test]
    fn capturing_the_checking_piece_is_legal() -> anyhow::Result<()> {
        let mut board = ArrayBoard::new();
        board.place(PieceKind::King, Color::White, Cell::new(0, 0));
        board.place(PieceKind::Queen, Color::Black, Cell::new(0, 5));
        let rook = board.place(PieceKind::Rook, Color::White, Cell::new(5, 5));

        // The rook can only resolve the check: capture the queen or block.
        let legal = MoveGenerator::new().legal_moves(&mut board, &rook)?;
        assert!(legal.contains(&Cell::new(0, 5)));
        assert!(legal.iter().all(|cell| cell.col == 5 && cell.row < 5));
        Ok(())
    }

    /// Wrapper whose check predicate always fails, for exercising error
    /// propagation out of the legality filter.
    struct NoCheckAnswerBoard {
        inner: ArrayBoard,
    }

    impl Board for NoCheckAnswerBoard {
        fn cell_is_valid_and_empty(&self, cell: Cell) -> Result<bool, BoardQueryError> {
            self.inner.cell_is_valid_and_empty(cell)
        }

        fn piece_can_enter_cell(&self, piece: &Piece, cell: Cell) -> Result<bool, BoardQueryError> {
            self.inner.piece_can_enter_cell(piece, cell)
        }

        fn piece_can_hit_on_cell(&self, piece: &Piece, cell: Cell) -> Result<bool, BoardQueryError> {
            self.inner.piece_can_hit_on_cell(piece, cell)
        }

        fn get_cell(&self, cell: Cell) -> Result<Option<Piece>, BoardQueryError> {
            self.inner.get_cell(cell)
        }

        fn set_cell(&mut self, cell: Cell, occupant: Option<Piece>) {
            self.inner.set_cell(cell, occupant)
        }

        fn is_king_check_cached(&self, _color: Color) -> Result<bool, BoardQueryError> {
            Err(BoardQueryError::new("check status unavailable"))
        }
    }

    #[test]
    fn failing_check_predicate_propagates_and_still_restores() {
        let mut inner = ArrayBoard::new();
        let rook = inner.place(PieceKind::Rook, Color::White, Cell::new(0, 0));
        let snapshot = inner.clone();
        let mut board = NoCheckAnswerBoard { inner };

        let result = MoveGenerator::new().legal_moves(&mut board, &rook);
        assert!(matches!(result, Err(EngineError::BoardQuery(_))));
        // The aborted simulation must have rolled back.
        assert_eq!(board.inner, snapshot);
    }

    #[test]
    fn evaluation_reflects_mobility_and_pressure() {
        let mut board = ArrayBoard::new();
        let rook = board.place(PieceKind::Rook, Color::White, Cell::new(0, 0));
        let evaluator = Evaluator::new();

        let open = evaluator.evaluate(&board, &rook);
        assert!((open - 5.70).abs() < 1e-9);

        board.place(PieceKind::Pawn, Color::Black, Cell::new(7, 0));
        let pressured = evaluator.evaluate(&board, &rook);
        assert!((pressured - 5.80).abs() < 1e-9);
    }

    #[test]
    fn evaluation_uses_unfiltered_reachability() {
        // The pinned rook has few legal moves but full mobility; the score
        // must reflect the latter.
        let mut board = ArrayBoard::new();
        board.place(PieceKind::King, Color::White, Cell::new(0, 0));
        let rook = board.place(PieceKind::Rook, Color::White, Cell::new(0, 3));
        board.place(PieceKind::Queen, Color::Black, Cell::new(0, 7));

        let reachable = MoveGenerator::new().reachable_cells(&board, &rook).unwrap();
        let expected = 5.0 + 0.05 * reachable.len() as f64 + 0.10;
        let score = Evaluator::new().evaluate(&board, &rook);
        assert!((score - expected).abs() < 1e-9);
    }
}
