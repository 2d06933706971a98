use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A move is the index of the cell to mark, `0..=8`, row-major.
pub type Move = u8;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Cell indices of the eight lines that win the game.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// The content of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }
}

/// One of the two sides.
///
/// Scores are always reported from O's point of view: O is the maximizing
/// side, X the minimizing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    /// Returns `true` for the side whose wins score positive.
    pub fn is_maximizing(self) -> bool {
        self == Player::O
    }
}

/// The state of the game as read off a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The game is still ongoing.
    InProgress,
    XWins,
    OWins,
    /// Every cell is filled and nobody completed a line.
    Draw,
}

impl Outcome {
    /// Returns `true` once the game is decided.
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::XWins => Some(Player::X),
            Outcome::OWins => Some(Player::O),
            Outcome::InProgress | Outcome::Draw => None,
        }
    }
}

/// A 3x3 board.
///
/// `Board` is a small `Copy` value: every transformation returns a new board,
/// so hypothetical positions explored by the search never alias the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from its cells in row-major order.
    pub const fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Returns the cell at `pos`, or `None` when `pos` is off the board.
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    /// Counts the cells holding `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Returns `true` when no move has been played yet.
    pub fn is_empty_board(&self) -> bool {
        self.cells.iter().all(|&c| c == Cell::Empty)
    }

    /// Returns every empty cell in ascending index order.
    ///
    /// The order is part of the contract: the search breaks ties in favour of
    /// the first move it sees.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Empty)
            .map(|(i, _)| i as Move)
            .collect()
    }

    /// Returns a copy of the board with `mv` marked for `side`.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` when `mv` is outside `0..=8`, `InvalidMove` when the
    /// cell is already taken. `self` is left untouched either way.
    pub fn apply_move(&self, mv: Move, side: Player) -> Result<Board> {
        let position = mv as usize;
        match self.cells.get(position) {
            None => Err(Error::InvalidPosition { position }),
            Some(Cell::Empty) => {
                let mut next = *self;
                next.cells[position] = side.to_cell();
                Ok(next)
            }
            Some(_) => Err(Error::InvalidMove { position }),
        }
    }

    /// Evaluates the eight lines, then emptiness.
    pub fn outcome(&self) -> Outcome {
        if let Some(line) = self.winning_line() {
            return match self.cells[line[0]] {
                Cell::X => Outcome::XWins,
                _ => Outcome::OWins,
            };
        }

        if self.cells.contains(&Cell::Empty) {
            Outcome::InProgress
        } else {
            Outcome::Draw
        }
    }

    /// Returns the first completed line, if any.
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        WINNING_LINES.iter().copied().find(|&[a, b, c]| {
            self.cells[a] != Cell::Empty
                && self.cells[a] == self.cells[b]
                && self.cells[a] == self.cells[c]
        })
    }

    /// Returns `true` if `player` occupies a full line.
    pub fn has_won(&self, player: Player) -> bool {
        let target = player.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| self.cells[idx] == target))
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parses nine cells such as `"OO.XX...."` or `"OO.|XX.|..."`.
    ///
    /// Row separators (`|`, `/`) and line breaks are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s
            .chars()
            .filter(|c| !matches!(c, '|' | '/' | '\n' | '\r'))
            .collect();
        if chars.len() != CELL_COUNT {
            return Err(Error::InvalidBoardLength {
                expected: CELL_COUNT,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; CELL_COUNT];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        Ok(Board { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in chunk {
                write!(f, "{}", cell.to_char())?;
            }
        }
        Ok(())
    }
}
