//! Invocation of the external Prolog solver over a temp-file exchange.
//!
//! One solve request = one scoped exchange directory holding the problem
//! fact and the solution the solver writes back. The directory is removed
//! when the request ends, on every path. The solver process is waited on
//! with a deadline; an unresponsive interpreter is killed rather than
//! hanging the caller.

use crate::codec::{self, SerializedPuzzle, Solution};
use crate::error::{GatewayError, IntegrationError};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Outcome of one solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverResult {
    Solved(Solution),
    Unsolvable,
}

/// Black-box view of the external solver: a serialized puzzle in, a
/// solved matrix or "unsolvable" out. The reveal controller depends on
/// this seam only; tests substitute scripted gateways.
pub trait SolverGateway {
    fn solve(&self, puzzle: &SerializedPuzzle) -> Result<SolverResult, GatewayError>;
}

const PROBLEM_FILE: &str = "sudoku_problem.pro";
const SOLUTION_FILE: &str = "solution.txt";
const DEFAULT_PROGRAM: &str = "swipl";
const DEFAULT_RULES: &str = "sudoku.pro";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Scoped problem/solution file pair. Dropping it removes the directory
/// and both files, so cleanup happens on success, unsolvable, and error
/// paths alike.
struct Exchange {
    dir: TempDir,
}

impl Exchange {
    fn create() -> Result<Self, IntegrationError> {
        TempDir::new()
            .map(|dir| Self { dir })
            .map_err(IntegrationError::Exchange)
    }

    fn problem_path(&self) -> PathBuf {
        self.dir.path().join(PROBLEM_FILE)
    }

    fn solution_path(&self) -> PathBuf {
        self.dir.path().join(SOLUTION_FILE)
    }

    fn write_problem(&self, puzzle: &SerializedPuzzle) -> Result<(), IntegrationError> {
        fs::write(self.problem_path(), puzzle.text()).map_err(IntegrationError::Exchange)
    }

    /// The solution text, or `None` when the solver wrote nothing at all.
    fn read_solution(&self) -> Result<Option<String>, IntegrationError> {
        match fs::read_to_string(self.solution_path()) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IntegrationError::Exchange(e)),
        }
    }
}

/// Gateway that shells out to SWI-Prolog, consulting the problem file and
/// asking the rules' `sud/1` to write the solution file.
pub struct PrologSolver {
    program: PathBuf,
    rules: PathBuf,
    timeout: Duration,
}

impl PrologSolver {
    /// Gateway using the default interpreter (`swipl`), rules file and
    /// timeout.
    pub fn new(rules: impl Into<PathBuf>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.into(),
            rules: rules.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different interpreter binary.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Bound the solver run; expiry kills the process.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PrologSolver {
    fn default() -> Self {
        Self::new(DEFAULT_RULES)
    }
}

impl SolverGateway for PrologSolver {
    fn solve(&self, puzzle: &SerializedPuzzle) -> Result<SolverResult, GatewayError> {
        let exchange = Exchange::create()?;
        exchange.write_problem(puzzle)?;

        let goal = format!(
            "consult('{}'), sud('{}'), halt; halt.",
            exchange.problem_path().display(),
            exchange.solution_path().display()
        );
        let mut command = Command::new(&self.program);
        command
            .arg("-f")
            .arg(&self.rules)
            .arg("-g")
            .arg(goal)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        log::debug!("running solver: {:?}", command);

        run_with_deadline(command, self.timeout)?;

        match exchange.read_solution()? {
            Some(raw) if !raw.trim().is_empty() => {
                Ok(SolverResult::Solved(codec::decode(&raw)?))
            }
            _ => Ok(SolverResult::Unsolvable),
        }
    }
}

/// Run a command to completion, killing it when the deadline passes.
fn run_with_deadline(mut command: Command, timeout: Duration) -> Result<(), IntegrationError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .spawn()
        .map_err(|source| IntegrationError::Launch { program, source })?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait().map_err(IntegrationError::Exchange)? {
            Some(status) if status.success() => return Ok(()),
            Some(status) => return Err(IntegrationError::SolverExit(status)),
            None => {}
        }
        if Instant::now() >= deadline {
            log::warn!("solver exceeded {timeout:?}, killing it");
            let _ = child.kill();
            let _ = child.wait();
            return Err(IntegrationError::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    }
}
