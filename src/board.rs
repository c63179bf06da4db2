use std::cell::RefCell;
use std::fmt;

use crate::error::BoardQueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// A board coordinate. Rows and columns are 0-indexed and signed so that
/// candidate cells may step off the board; the validity predicates reject
/// those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: i8,
    pub col: i8,
}

impl Cell {
    pub fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, dr: i8, dc: i8) -> Cell {
        Cell::new(self.row + dr, self.col + dc)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A piece on (or off) the board. The board is not owned by the piece;
/// movement and evaluation take the board as a separate argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub cell: Option<Cell>,
}

impl Piece {
    /// A piece that has not been placed on any cell yet.
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            cell: None,
        }
    }

    pub fn placed_at(self, cell: Cell) -> Self {
        Self {
            cell: Some(cell),
            ..self
        }
    }

    fn letter(&self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        };
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }
}

/// The board collaborator contract required by the movement generator,
/// legality filter and evaluator.
///
/// Queries may fail (a remote or cached board may be unable to answer);
/// `set_cell` is the infallible relocation/restoration primitive the
/// legality filter's rollback relies on.
pub trait Board {
    /// In bounds and unoccupied.
    fn cell_is_valid_and_empty(&self, cell: Cell) -> Result<bool, BoardQueryError>;

    /// In bounds and not occupied by a piece of `piece`'s own color.
    fn piece_can_enter_cell(&self, piece: &Piece, cell: Cell) -> Result<bool, BoardQueryError>;

    /// In bounds and occupied by a piece of the enemy color.
    fn piece_can_hit_on_cell(&self, piece: &Piece, cell: Cell) -> Result<bool, BoardQueryError>;

    fn get_cell(&self, cell: Cell) -> Result<Option<Piece>, BoardQueryError>;

    fn set_cell(&mut self, cell: Cell, occupant: Option<Piece>);

    /// Whether the king of `color` is currently attacked. Implementations
    /// own their caching; every `set_cell` must invalidate it.
    fn is_king_check_cached(&self, color: Color) -> Result<bool, BoardQueryError>;
}

pub const BOARD_SIZE: i8 = 8;

const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Reference 8x8 mailbox board.
///
/// Stores one `Option<Piece>` per square. `set_cell` keeps each occupant's
/// recorded cell in sync and clears the occupant's previous square, so a
/// relocation never leaves a duplicate behind.
pub struct ArrayBoard {
    squares: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    check_cache: RefCell<[Option<bool>; 2]>,
}

impl ArrayBoard {
    pub fn new() -> Self {
        Self {
            squares: Default::default(),
            check_cache: RefCell::new([None; 2]),
        }
    }

    /// Create a piece, place it, and return the placed copy.
    pub fn place(&mut self, kind: PieceKind, color: Color, cell: Cell) -> Piece {
        let piece = Piece::new(kind, color).placed_at(cell);
        self.set_cell(cell, Some(piece));
        piece
    }

    fn in_bounds(cell: Cell) -> bool {
        cell.row >= 0 && cell.row < BOARD_SIZE && cell.col >= 0 && cell.col < BOARD_SIZE
    }

    fn occupant(&self, cell: Cell) -> Option<&Piece> {
        if !Self::in_bounds(cell) {
            return None;
        }
        self.squares[cell.row as usize][cell.col as usize].as_ref()
    }

    fn find_king(&self, color: Color) -> Option<Cell> {
        for row in self.squares.iter() {
            for occupant in row.iter().flatten() {
                if occupant.kind == PieceKind::King && occupant.color == color {
                    return occupant.cell;
                }
            }
        }
        None
    }

    fn holds(&self, cell: Cell, kinds: &[PieceKind], color: Color) -> bool {
        self.occupant(cell)
            .map(|p| p.color == color && kinds.contains(&p.kind))
            .unwrap_or(false)
    }

    /// Whether `cell` is attacked by any piece of `attacker`.
    pub fn is_cell_attacked(&self, cell: Cell, attacker: Color) -> bool {
        // Pawn captures. A white pawn attacks the two cells one row above it,
        // so in the white case the attacking pawn sits one row below `cell`.
        let pawn_row = match attacker {
            Color::White => -1,
            Color::Black => 1,
        };
        for dc in [-1, 1] {
            if self.holds(cell.offset(pawn_row, dc), &[PieceKind::Pawn], attacker) {
                return true;
            }
        }

        // Knight jumps.
        for &(dr, dc) in &KNIGHT_JUMPS {
            if self.holds(cell.offset(dr, dc), &[PieceKind::Knight], attacker) {
                return true;
            }
        }

        // Adjacent enemy king.
        for dr in -1..=1 {
            for dc in -1..=1 {
                if (dr, dc) == (0, 0) {
                    continue;
                }
                if self.holds(cell.offset(dr, dc), &[PieceKind::King], attacker) {
                    return true;
                }
            }
        }

        // Sliding attacks: walk each ray until the first occupant.
        let sliders: [(&[(i8, i8)], [PieceKind; 2]); 2] = [
            (&ORTHOGONAL_DIRECTIONS, [PieceKind::Rook, PieceKind::Queen]),
            (&DIAGONAL_DIRECTIONS, [PieceKind::Bishop, PieceKind::Queen]),
        ];
        for (directions, kinds) in sliders {
            for &(dr, dc) in directions {
                let mut probe = cell.offset(dr, dc);
                while Self::in_bounds(probe) {
                    if let Some(occupant) = self.occupant(probe) {
                        if occupant.color == attacker && kinds.contains(&occupant.kind) {
                            return true;
                        }
                        break;
                    }
                    probe = probe.offset(dr, dc);
                }
            }
        }

        false
    }
}

impl Default for ArrayBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for ArrayBoard {
    fn cell_is_valid_and_empty(&self, cell: Cell) -> Result<bool, BoardQueryError> {
        Ok(Self::in_bounds(cell) && self.occupant(cell).is_none())
    }

    fn piece_can_enter_cell(&self, piece: &Piece, cell: Cell) -> Result<bool, BoardQueryError> {
        if !Self::in_bounds(cell) {
            return Ok(false);
        }
        Ok(match self.occupant(cell) {
            Some(occupant) => occupant.color != piece.color,
            None => true,
        })
    }

    fn piece_can_hit_on_cell(&self, piece: &Piece, cell: Cell) -> Result<bool, BoardQueryError> {
        Ok(self
            .occupant(cell)
            .map(|occupant| occupant.color != piece.color)
            .unwrap_or(false))
    }

    fn get_cell(&self, cell: Cell) -> Result<Option<Piece>, BoardQueryError> {
        if !Self::in_bounds(cell) {
            return Err(BoardQueryError::new(format!("cell {cell} is off the board")));
        }
        Ok(self.squares[cell.row as usize][cell.col as usize])
    }

    fn set_cell(&mut self, cell: Cell, occupant: Option<Piece>) {
        if !Self::in_bounds(cell) {
            return;
        }
        if let Some(piece) = occupant {
            // A relocation: clear the square the piece came from.
            if let Some(prev) = piece.cell {
                if prev != cell && Self::in_bounds(prev) {
                    self.squares[prev.row as usize][prev.col as usize] = None;
                }
            }
            self.squares[cell.row as usize][cell.col as usize] = Some(piece.placed_at(cell));
        } else {
            self.squares[cell.row as usize][cell.col as usize] = None;
        }
        *self.check_cache.borrow_mut() = [None; 2];
    }

    fn is_king_check_cached(&self, color: Color) -> Result<bool, BoardQueryError> {
        let slot = match color {
            Color::White => 0,
            Color::Black => 1,
        };
        if let Some(answer) = self.check_cache.borrow()[slot] {
            return Ok(answer);
        }
        let answer = match self.find_king(color) {
            Some(king_cell) => self.is_cell_attacked(king_cell, color.opposite()),
            // No king on the board (shouldn't happen in a valid position).
            None => false,
        };
        self.check_cache.borrow_mut()[slot] = Some(answer);
        Ok(answer)
    }
}

impl PartialEq for ArrayBoard {
    fn eq(&self, other: &Self) -> bool {
        // The check cache is derived state and does not take part in equality.
        self.squares == other.squares
    }
}

impl Clone for ArrayBoard {
    fn clone(&self) -> Self {
        Self {
            squares: self.squares,
            check_cache: RefCell::new([None; 2]),
        }
    }
}

impl fmt::Debug for ArrayBoard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for ArrayBoard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for row in (0..BOARD_SIZE).rev() {
            for col in 0..BOARD_SIZE {
                match self.occupant(Cell::new(row, col)) {
                    Some(piece) => result.push(piece.letter()),
                    None => result.push('.'),
                }
                if col < BOARD_SIZE - 1 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        write!(f, "{}", result)
    }
}
