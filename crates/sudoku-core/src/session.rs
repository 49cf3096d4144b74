//! Application session: the surface the front end talks to.
//!
//! Owns the grid, the reveal controller and the solver gateway, all built
//! explicitly by the caller, never as globals. Entry points return typed
//! outcomes; presenting them to the user is the front end's job, the core
//! never renders anything.

use crate::error::SolveError;
use crate::gateway::SolverGateway;
use crate::grid::{Cell, Grid, Position};
use crate::reveal::RevealController;

/// One puzzle-entry session against a solver gateway.
pub struct Session<G> {
    grid: Grid,
    controller: RevealController,
    gateway: G,
}

impl<G: SolverGateway> Session<G> {
    /// Start with an empty grid.
    pub fn new(gateway: G) -> Self {
        Self {
            grid: Grid::new(),
            controller: RevealController::new(),
            gateway,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Read one cell's displayed state.
    pub fn cell(&self, pos: Position) -> Cell {
        *self.grid.cell(pos)
    }

    /// User edit: set a digit 1–9 or clear with `None`. Returns `false`
    /// when the cell is read-only or the digit out of range.
    pub fn set_cell(&mut self, pos: Position, value: Option<u8>) -> bool {
        self.grid.set_user_value(pos, value)
    }

    /// Reveal the whole solution. Returns how many cells were filled.
    pub fn solve(&mut self) -> Result<usize, SolveError> {
        self.controller.reveal_all(&mut self.grid, &self.gateway)
    }

    /// Reveal the next empty cell. Returns its coordinate.
    pub fn tip(&mut self) -> Result<Position, SolveError> {
        self.controller.reveal_next(&mut self.grid, &self.gateway)
    }

    /// Undo the last revealed cell, if any.
    pub fn undo_tip(&mut self) -> Option<Position> {
        self.controller.undo_last(&mut self.grid)
    }

    /// Start over: every cell empty and editable, tip history gone.
    pub fn new_puzzle(&mut self) {
        self.grid.reset();
        self.controller.reset();
        log::info!("started a new puzzle");
    }

    /// Bulk entry from an 81-character string (`0`/`.` = empty). Replaces
    /// the current grid; all cells come back user-entered and editable.
    pub fn load_puzzle(&mut self, s: &str) -> bool {
        match Grid::from_string(s) {
            Some(grid) => {
                self.grid = grid;
                self.controller.reset();
                true
            }
            None => false,
        }
    }

    /// Coordinates revealed by tips and not yet undone, oldest first.
    pub fn history(&self) -> &[Position] {
        self.controller.history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{SerializedPuzzle, Solution};
    use crate::error::GatewayError;
    use crate::gateway::SolverResult;

    const SOLVED: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    struct FixedSolver;

    impl SolverGateway for FixedSolver {
        fn solve(&self, _puzzle: &SerializedPuzzle) -> Result<SolverResult, GatewayError> {
            let mut digits = [[0u8; 9]; 9];
            for (i, b) in SOLVED.bytes().enumerate() {
                digits[i / 9][i % 9] = b - b'0';
            }
            Ok(SolverResult::Solved(Solution::from_rows(digits)))
        }
    }

    #[test]
    fn test_edit_then_tip_then_edits_refused() {
        let mut session = Session::new(FixedSolver);
        let pos = Position::new(0, 0);
        assert!(session.set_cell(pos, Some(5)));
        assert_eq!(session.cell(pos).value(), Some(5));

        let tipped = session.tip().unwrap();
        assert_eq!(tipped, Position::new(0, 1));
        // the tip locked the grid, user edits bounce
        assert!(!session.set_cell(Position::new(2, 2), Some(1)));
        assert!(!session.set_cell(pos, None));
    }

    #[test]
    fn test_new_puzzle_resets_everything() {
        let mut session = Session::new(FixedSolver);
        session.set_cell(Position::new(0, 0), Some(5));
        session.tip().unwrap();
        assert!(!session.history().is_empty());

        session.new_puzzle();
        assert!(session.grid().is_empty());
        assert!(session.history().is_empty());
        assert!(session.set_cell(Position::new(0, 0), Some(1)));
    }

    #[test]
    fn test_load_puzzle() {
        let mut session = Session::new(FixedSolver);
        assert!(!session.load_puzzle("garbage"));
        assert!(session.grid().is_empty());

        let puzzle =
            "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
        assert!(session.load_puzzle(puzzle));
        assert_eq!(session.grid().filled_count(), 30);
        assert!(session.cell(Position::new(0, 0)).is_editable());

        let filled = session.solve().unwrap();
        assert_eq!(filled, 51);
        assert_eq!(session.grid().to_string_compact(), SOLVED);
    }

    #[test]
    fn test_undo_roundtrip_through_session() {
        let mut session = Session::new(FixedSolver);
        let pos = session.tip().unwrap();
        assert_eq!(session.undo_tip(), Some(pos));
        assert_eq!(session.undo_tip(), None);
    }
}
