//! Reveal orchestration: full solve, single tip, and undo.
//!
//! Every operation here is atomic: the grid and the tip history are only
//! touched after the solver round-trip has fully succeeded. The undo
//! operation is positional: it walks the grid backwards and
//! clears the first derived cell it meets, which is the "last" tip in
//! row-major terms, not necessarily in time order.

use crate::codec::{self, Solution};
use crate::error::SolveError;
use crate::gateway::{SolverGateway, SolverResult};
use crate::grid::{Grid, Position};

/// Orchestrates reveals against a solver gateway and tracks which cells
/// tips have filled.
#[derive(Debug, Default)]
pub struct RevealController {
    history: Vec<Position>,
}

impl RevealController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinates revealed by tips and not yet undone, oldest first.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Forget all tip history (new puzzle).
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Fill every empty cell from the solver's solution and lock the whole
    /// grid, user entries included. Returns how many cells were revealed.
    ///
    /// A full reveal finalizes the puzzle; it does not extend the tip
    /// history.
    pub fn reveal_all<G: SolverGateway>(
        &mut self,
        grid: &mut Grid,
        gateway: &G,
    ) -> Result<usize, SolveError> {
        let solution = self.solve(grid, gateway)?;
        let mut revealed = 0;
        for pos in Position::row_major() {
            if grid.cell(pos).is_empty() {
                grid.cell_mut(pos).fill_derived(solution.digit(pos));
                revealed += 1;
            }
        }
        grid.lock_all();
        log::info!("revealed all {revealed} remaining cells");
        Ok(revealed)
    }

    /// Reveal the first empty cell in row-major order from the solver's
    /// solution and push it onto the tip history.
    ///
    /// Deliberate quirk: one successful tip
    /// read-locks the entire grid, not just the revealed cell. Undo
    /// unlocks progressively.
    pub fn reveal_next<G: SolverGateway>(
        &mut self,
        grid: &mut Grid,
        gateway: &G,
    ) -> Result<Position, SolveError> {
        let solution = self.solve(grid, gateway)?;
        match Position::row_major().find(|pos| grid.cell(*pos).is_empty()) {
            Some(pos) => {
                grid.lock_all();
                grid.cell_mut(pos).fill_derived(solution.digit(pos));
                self.history.push(pos);
                log::info!("revealed {pos}");
                Ok(pos)
            }
            // solve() already rejects full grids; kept for totality
            None => Err(SolveError::AlreadyComplete),
        }
    }

    /// Undo the last revealed cell, positionally.
    ///
    /// Scans from (8,8) back to (0,0), unlocking every cell it passes,
    /// and stops at the first derived cell: that one is cleared and made
    /// editable again, and cells earlier in row-major order keep their
    /// state. With no derived cell anywhere this is a no-op. Returns the
    /// cleared coordinate, if any.
    pub fn undo_last(&mut self, grid: &mut Grid) -> Option<Position> {
        if !grid.any_derived() {
            return None;
        }
        for pos in Position::reverse_row_major() {
            if grid.cell(pos).is_derived() {
                grid.cell_mut(pos).undo_derived();
                self.history.retain(|p| *p != pos);
                log::info!("undid reveal of {pos}");
                return Some(pos);
            }
            grid.cell_mut(pos).unlock();
        }
        None
    }

    /// Encode, check for "nothing to solve", run the gateway, classify.
    fn solve<G: SolverGateway>(
        &self,
        grid: &Grid,
        gateway: &G,
    ) -> Result<Solution, SolveError> {
        let puzzle = codec::encode(grid);
        if puzzle.is_complete() {
            return Err(SolveError::AlreadyComplete);
        }
        match gateway.solve(&puzzle)? {
            SolverResult::Solved(solution) => Ok(solution),
            SolverResult::Unsolvable => Err(SolveError::NoSolution),
        }
    }
}
