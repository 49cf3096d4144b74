//! Grid state: cell values plus per-cell provenance.
//!
//! A cell is either empty, filled by the user (still editable), or filled
//! from a solver result ("derived", always read-only). The reveal and undo
//! scans both walk the grid in row-major order, so `Position` carries the
//! two canonical iteration orders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rows/columns.
pub const SIZE: usize = 9;

/// Total number of cells.
pub const CELLS: usize = SIZE * SIZE;

/// A cell coordinate; row and column are in `[0, 8]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a position.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn new(row: usize, col: usize) -> Self {
        assert!(row < SIZE && col < SIZE, "position out of range");
        Self { row, col }
    }

    /// Create a position, returning `None` when out of range.
    pub fn try_new(row: usize, col: usize) -> Option<Self> {
        (row < SIZE && col < SIZE).then_some(Self { row, col })
    }

    /// All 81 positions, (0,0) first, column-fastest.
    pub fn row_major() -> impl Iterator<Item = Position> {
        (0..CELLS).map(|i| Position {
            row: i / SIZE,
            col: i % SIZE,
        })
    }

    /// All 81 positions, (8,8) first, column-fastest backwards.
    pub fn reverse_row_major() -> impl Iterator<Item = Position> {
        (0..CELLS).rev().map(|i| Position {
            row: i / SIZE,
            col: i % SIZE,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-based, matching what the front end shows
        write!(f, "r{}c{}", self.row + 1, self.col + 1)
    }
}

/// A single cell: optional digit plus provenance flags.
///
/// Invariant: `derived` implies not `editable`. All mutation goes through
/// the methods below, which preserve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    value: Option<u8>,
    editable: bool,
    derived: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            value: None,
            editable: true,
            derived: false,
        }
    }
}

impl Cell {
    /// The digit 1–9, or `None` when empty.
    pub fn value(&self) -> Option<u8> {
        self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    /// Whether direct edits are currently accepted.
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Whether the value came from the solver rather than the user.
    pub fn is_derived(&self) -> bool {
        self.derived
    }

    /// Set or clear the value on the user-edit path. Caller checks `editable`.
    pub(crate) fn set_value(&mut self, value: Option<u8>) {
        self.value = value;
    }

    /// Fill from a solver result: derived and read-only.
    pub(crate) fn fill_derived(&mut self, digit: u8) {
        self.value = Some(digit);
        self.derived = true;
        self.editable = false;
    }

    /// Reverse `fill_derived`: empty, underived, editable again.
    pub(crate) fn undo_derived(&mut self) {
        self.value = None;
        self.derived = false;
        self.editable = true;
    }

    pub(crate) fn lock(&mut self) {
        self.editable = false;
    }

    /// Make editable again. Only valid on non-derived cells.
    pub(crate) fn unlock(&mut self) {
        debug_assert!(!self.derived);
        self.editable = true;
    }
}

/// The 9×9 board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Cell; SIZE]; SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// A fresh grid: 81 empty, editable, underived cells.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::default(); SIZE]; SIZE],
        }
    }

    /// Parse a grid from an 81-character string, `0` or `.` meaning empty.
    /// Whitespace is ignored. Filled cells come back user-entered and
    /// editable. Returns `None` on bad length or characters.
    pub fn from_string(s: &str) -> Option<Self> {
        let mut grid = Self::new();
        let mut positions = Position::row_major();
        for ch in s.chars() {
            if ch.is_whitespace() {
                continue;
            }
            let pos = positions.next()?;
            match ch {
                '0' | '.' => {}
                '1'..='9' => {
                    grid.cell_mut(pos).set_value(Some(ch as u8 - b'0'));
                }
                _ => return None,
            }
        }
        // all 81 cells must have been consumed
        positions.next().is_none().then_some(grid)
    }

    /// Render as an 81-character string with `0` for empty cells.
    pub fn to_string_compact(&self) -> String {
        Position::row_major()
            .map(|pos| match self.value(pos) {
                Some(d) => (b'0' + d) as char,
                None => '0',
            })
            .collect()
    }

    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.row][pos.col]
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.row][pos.col]
    }

    /// The digit at `pos`, or `None` when empty.
    pub fn value(&self, pos: Position) -> Option<u8> {
        self.cell(pos).value()
    }

    /// True when all 81 cells hold a digit.
    pub fn is_full(&self) -> bool {
        Position::row_major().all(|pos| self.cell(pos).is_filled())
    }

    /// True when no cell holds a digit.
    pub fn is_empty(&self) -> bool {
        Position::row_major().all(|pos| self.cell(pos).is_empty())
    }

    pub fn filled_count(&self) -> usize {
        Position::row_major()
            .filter(|pos| self.cell(*pos).is_filled())
            .count()
    }

    /// Whether any cell is solver-derived.
    pub fn any_derived(&self) -> bool {
        Position::row_major().any(|pos| self.cell(pos).is_derived())
    }

    /// User edit: set a digit 1–9 or clear with `None`. Refused (returning
    /// `false`) on read-only cells and out-of-range digits.
    pub fn set_user_value(&mut self, pos: Position, value: Option<u8>) -> bool {
        if let Some(d) = value {
            if !(1..=9).contains(&d) {
                return false;
            }
        }
        let cell = self.cell_mut(pos);
        if !cell.is_editable() {
            return false;
        }
        cell.set_value(value);
        true
    }

    /// Reset every cell to empty and editable.
    pub fn reset(&mut self) {
        self.cells = [[Cell::default(); SIZE]; SIZE];
    }

    /// Make every cell read-only.
    pub(crate) fn lock_all(&mut self) {
        for row in self.cells.iter_mut() {
            for cell in row.iter_mut() {
                cell.lock();
            }
        }
    }
}
