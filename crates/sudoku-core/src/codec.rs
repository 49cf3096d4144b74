//! Wire codec for the external solver's term syntax.
//!
//! The solver consumes a Prolog fact of the form
//! `problem(1,[[5,3,_,...],[...],...]).` with `_` for empty cells, and
//! produces the bare bracketed matrix fully filled with digits. All
//! knowledge of that grammar lives here; the rest of the crate only sees
//! `Grid` and `Solution`.

use crate::error::FormatError;
use crate::grid::{Grid, Position, CELLS, SIZE};
use std::iter::Peekable;
use std::str::CharIndices;

/// Token the solver understands as "empty cell".
pub const WILDCARD: char = '_';

/// A puzzle rendered in the solver's input grammar, plus the filled-cell
/// count the encoder tallies along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedPuzzle {
    text: String,
    filled: usize,
}

impl SerializedPuzzle {
    /// The solver-input text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// How many cells held a digit when the puzzle was encoded.
    pub fn filled_cells(&self) -> usize {
        self.filled
    }

    /// True when every cell was filled, leaving nothing to solve.
    pub fn is_complete(&self) -> bool {
        self.filled == CELLS
    }
}

/// A fully solved 9×9 digit matrix as parsed from solver output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    digits: [[u8; SIZE]; SIZE],
}

impl Solution {
    pub fn from_rows(digits: [[u8; SIZE]; SIZE]) -> Self {
        Self { digits }
    }

    /// The digit 1–9 at `pos`.
    pub fn digit(&self, pos: Position) -> u8 {
        self.digits[pos.row][pos.col]
    }
}

/// Serialize a grid into the solver's input format.
///
/// Row-major scan; the encoding is deterministic and lossless for values.
/// Provenance flags are not encoded; the solver only needs digits.
pub fn encode(grid: &Grid) -> SerializedPuzzle {
    let mut text = String::with_capacity(220);
    text.push_str("problem(1,[");
    let mut filled = 0;
    for row in 0..SIZE {
        text.push('[');
        for col in 0..SIZE {
            match grid.value(Position::new(row, col)) {
                Some(d) => {
                    filled += 1;
                    text.push((b'0' + d) as char);
                }
                None => text.push(WILDCARD),
            }
            if col + 1 < SIZE {
                text.push(',');
            }
        }
        if row + 1 < SIZE {
            text.push_str("],\n");
        } else {
            text.push(']');
        }
    }
    text.push_str("]).");
    SerializedPuzzle { text, filled }
}

/// Parse solver output: a bracketed 9×9 matrix of comma-separated digits
/// 1–9, whitespace-tolerant, optionally closed by a Prolog full stop.
///
/// Empty input is a `FormatError` too; the gateway classifies emptiness
/// as "unsolvable" before ever calling this.
pub fn decode(raw: &str) -> Result<Solution, FormatError> {
    if raw.trim().is_empty() {
        return Err(FormatError::Empty);
    }

    let mut cur = Cursor::new(raw);
    let mut digits = [[0u8; SIZE]; SIZE];

    cur.expect('[', "`[` opening the matrix")?;
    for row in 0..SIZE {
        cur.expect('[', "`[` opening a row")?;
        for col in 0..SIZE {
            let (offset, found) = cur.next_token()?;
            match found {
                '1'..='9' => digits[row][col] = found as u8 - b'0',
                _ => {
                    return Err(FormatError::Unexpected {
                        found,
                        offset,
                        expected: "a digit 1-9",
                    })
                }
            }
            if col + 1 < SIZE {
                cur.expect(',', "`,` between digits")?;
            }
        }
        cur.expect(']', "`]` closing a row")?;
        if row + 1 < SIZE {
            cur.expect(',', "`,` between rows")?;
        }
    }
    cur.expect(']', "`]` closing the matrix")?;

    // A full stop and whitespace may follow the matrix, nothing else.
    cur.eat('.');
    if let Some((offset, found)) = cur.rest() {
        return Err(FormatError::Trailing { found, offset });
    }

    Ok(Solution { digits })
}

struct Cursor<'a> {
    iter: Peekable<CharIndices<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            iter: s.char_indices().peekable(),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.iter.peek(), Some((_, c)) if c.is_whitespace()) {
            self.iter.next();
        }
    }

    /// Next non-whitespace character, or `Truncated` at end of input.
    fn next_token(&mut self) -> Result<(usize, char), FormatError> {
        self.skip_ws();
        self.iter.next().ok_or(FormatError::Truncated)
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), FormatError> {
        let (offset, found) = self.next_token()?;
        if found == want {
            Ok(())
        } else {
            Err(FormatError::Unexpected {
                found,
                offset,
                expected,
            })
        }
    }

    /// Consume `want` if it is the next non-whitespace character.
    fn eat(&mut self, want: char) -> bool {
        self.skip_ws();
        if matches!(self.iter.peek(), Some((_, c)) if *c == want) {
            self.iter.next();
            true
        } else {
            false
        }
    }

    /// First remaining non-whitespace character, if any.
    fn rest(&mut self) -> Option<(usize, char)> {
        self.skip_ws();
        self.iter.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn full_grid() -> Grid {
        Grid::from_string(SOLVED).unwrap()
    }

    #[test]
    fn test_encode_empty_grid() {
        let puzzle = encode(&Grid::new());
        assert_eq!(puzzle.filled_cells(), 0);
        assert!(!puzzle.is_complete());
        assert!(puzzle.text().starts_with("problem(1,[[_,_,_,_,_,_,_,_,_],"));
        assert!(puzzle.text().ends_with("])."));
        assert_eq!(puzzle.text().matches(WILDCARD).count(), 81);
    }

    #[test]
    fn test_encode_is_row_major() {
        let mut grid = Grid::new();
        grid.set_user_value(Position::new(0, 0), Some(1));
        grid.set_user_value(Position::new(0, 1), Some(2));
        grid.set_user_value(Position::new(1, 0), Some(3));
        let puzzle = encode(&grid);
        assert!(puzzle.text().starts_with("problem(1,[[1,2,_,_,_,_,_,_,_],\n[3,"));
        assert_eq!(puzzle.filled_cells(), 3);
    }

    #[test]
    fn test_encode_full_grid_reports_complete() {
        let puzzle = encode(&full_grid());
        assert_eq!(puzzle.filled_cells(), 81);
        assert!(puzzle.is_complete());
        assert!(!puzzle.text().contains(WILDCARD));
    }

    #[test]
    fn test_round_trip_through_solver_grammar() {
        // A full grid encodes to the same matrix grammar the solver emits;
        // stripping the fact envelope must leave decodable text.
        let grid = full_grid();
        let puzzle = encode(&grid);
        let matrix = puzzle
            .text()
            .strip_prefix("problem(1,")
            .unwrap()
            .strip_suffix(").")
            .unwrap();
        let solution = decode(matrix).unwrap();
        for pos in Position::row_major() {
            assert_eq!(Some(solution.digit(pos)), grid.value(pos), "mismatch at {pos}");
        }
    }

    #[test]
    fn test_decode_tolerates_layout() {
        let rows: Vec<String> = (0..9)
            .map(|r| {
                let digits: Vec<String> = (0..9)
                    .map(|c| (SOLVED.as_bytes()[r * 9 + c] as char).to_string())
                    .collect();
                format!("  [ {} ] ", digits.join(" , "))
            })
            .collect();
        let text = format!("[\n{}\n] .\n", rows.join(",\n"));
        let solution = decode(&text).unwrap();
        assert_eq!(solution.digit(Position::new(0, 0)), 5);
        assert_eq!(solution.digit(Position::new(8, 8)), 9);
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert_eq!(decode(""), Err(FormatError::Empty));
        assert_eq!(decode("  \n\t "), Err(FormatError::Empty));
    }

    #[test]
    fn test_decode_rejects_truncation() {
        assert_eq!(decode("[[1,2,3"), Err(FormatError::Truncated));
        assert_eq!(decode("["), Err(FormatError::Truncated));
    }

    #[test]
    fn test_decode_rejects_wildcard_in_output() {
        let text = "[[_,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                    [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                    [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9]]";
        assert!(matches!(
            decode(text),
            Err(FormatError::Unexpected { found: '_', .. })
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        // a row with only eight digits
        let short_row = "[[1,2,3,4,5,6,7,8],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                         [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                         [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9]]";
        assert!(matches!(
            decode(short_row),
            Err(FormatError::Unexpected { found: ']', .. })
        ));

        // a row with ten digits
        let long_row = "[[1,2,3,4,5,6,7,8,9,1],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                        [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                        [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9]]";
        assert!(matches!(
            decode(long_row),
            Err(FormatError::Unexpected { found: ',', .. })
        ));

        // only eight rows
        let eight_rows = "[[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                          [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                          [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9]]";
        assert!(matches!(
            decode(eight_rows),
            Err(FormatError::Unexpected { found: ']', .. })
        ));
    }

    #[test]
    fn test_decode_rejects_trailing_garbage() {
        let good = "[[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                    [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                    [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9]]";
        assert!(decode(good).is_ok());
        assert!(decode(&format!("{good}.")).is_ok());
        assert!(matches!(
            decode(&format!("{good}). extra")),
            Err(FormatError::Trailing { found: ')', .. })
        ));
    }

    #[test]
    fn test_decode_rejects_non_digit_token() {
        let text = "[[1,2,3,4,5,6,7,8,x],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                    [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],\
                    [1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9],[1,2,3,4,5,6,7,8,9]]";
        assert!(matches!(
            decode(text),
            Err(FormatError::Unexpected {
                found: 'x',
                expected: "a digit 1-9",
                ..
            })
        ));
    }
}
