//! Core engine for a Sudoku entry pad.
//!
//! The user types a partial 9×9 grid; solving is delegated to an external
//! logic-programming solver through a text-file exchange. Solutions come
//! back either all at once or one cell at a time ("tips"), and revealed
//! cells can be undone. The crate tracks which cells were user-entered
//! versus solver-derived across repeated reveals and undos.
//!
//! Layers, bottom up:
//! - [`Grid`]: cell values plus per-cell provenance flags.
//! - [`codec`]: the solver's term grammar (encode problems, decode
//!   solutions).
//! - [`SolverGateway`] / [`PrologSolver`]: black-box solver boundary and
//!   the SWI-Prolog subprocess implementation behind it.
//! - [`RevealController`]: reveal-all / reveal-next / undo state machine.
//! - [`Session`]: the facade a front end wires its controls to.

mod codec;
mod error;
mod gateway;
mod grid;
mod reveal;
mod session;

pub use codec::{decode, encode, SerializedPuzzle, Solution, WILDCARD};
pub use error::{FormatError, GatewayError, IntegrationError, Result, SolveError};
pub use gateway::{PrologSolver, SolverGateway, SolverResult};
pub use grid::{Cell, Grid, Position, CELLS, SIZE};
pub use reveal::RevealController;
pub use session::Session;
