//! Line-oriented front end for the Sudoku entry engine.
//!
//! Plays the role of the UI collaborator: it wires typed commands to the
//! session entry points and presents the typed outcomes. All puzzle logic
//! lives in `sudoku-core`.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use sudoku_core::{Position, PrologSolver, Session, SolveError, SolverGateway, SIZE};

#[derive(Parser)]
#[command(name = "sudoku", about = "Sudoku entry pad backed by an external Prolog solver")]
struct Args {
    /// Prolog interpreter used to run the solver.
    #[arg(long, default_value = "swipl")]
    program: PathBuf,

    /// Solver rules file consulted for every request.
    #[arg(long, default_value = "sudoku.pro")]
    rules: PathBuf,

    /// Seconds to wait for the solver before giving up.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let gateway = PrologSolver::new(args.rules)
        .with_program(args.program)
        .with_timeout(Duration::from_secs(args.timeout));
    let mut session = Session::new(gateway);

    print_help();
    print_grid(&session);

    let result = run(&mut session);
    if let Err(e) = result {
        eprintln!("Error: {e}");
    }
    Ok(())
}

fn run<G: SolverGateway>(session: &mut Session<G>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["help"] => print_help(),
            ["show"] => print_grid(session),
            ["set", r, c, d] => match (parse_pos(r, c), parse_digit(d)) {
                (Some(pos), Some(digit)) => {
                    if session.set_cell(pos, Some(digit)) {
                        print_grid(session);
                    } else {
                        println!("{pos} is read-only");
                    }
                }
                _ => println!("usage: set <row 1-9> <col 1-9> <digit 1-9>"),
            },
            ["clear", r, c] => match parse_pos(r, c) {
                Some(pos) => {
                    if session.set_cell(pos, None) {
                        print_grid(session);
                    } else {
                        println!("{pos} is read-only");
                    }
                }
                None => println!("usage: clear <row 1-9> <col 1-9>"),
            },
            ["load", s] => {
                if session.load_puzzle(s) {
                    print_grid(session);
                } else {
                    println!("expected 81 characters of digits, `0` or `.` for empty");
                }
            }
            ["solve"] => match session.solve() {
                Ok(revealed) => {
                    println!("revealed {revealed} cells");
                    print_grid(session);
                }
                Err(e) => report(&e),
            },
            ["tip"] => match session.tip() {
                Ok(pos) => {
                    println!("revealed {pos}");
                    print_grid(session);
                }
                Err(e) => report(&e),
            },
            ["undo"] => match session.undo_tip() {
                Some(pos) => {
                    println!("cleared {pos}");
                    print_grid(session);
                }
                None => println!("nothing to undo"),
            },
            ["new"] => {
                session.new_puzzle();
                print_grid(session);
            }
            _ => println!("unknown command, try `help`"),
        }
    }
    Ok(())
}

fn parse_pos(r: &str, c: &str) -> Option<Position> {
    let row: usize = r.parse().ok()?;
    let col: usize = c.parse().ok()?;
    if row == 0 || col == 0 {
        return None;
    }
    Position::try_new(row - 1, col - 1)
}

fn parse_digit(s: &str) -> Option<u8> {
    s.parse().ok().filter(|d| (1..=9).contains(d))
}

/// Puzzle-level outcomes are plain messages; integration defects go to
/// stderr and the log.
fn report(err: &SolveError) {
    if err.is_fatal() {
        log::error!("solver integration failure: {err:?}");
        eprintln!("solver failure: {err}");
    } else {
        println!("{err}");
    }
}

fn print_grid<G: SolverGateway>(session: &Session<G>) {
    let grid = session.grid();
    println!("     1  2  3   4  5  6   7  8  9");
    println!("   +---------+---------+---------+");
    for row in 0..SIZE {
        let mut line = format!(" {} |", row + 1);
        for col in 0..SIZE {
            let cell = grid.cell(Position::new(row, col));
            let digit = match cell.value() {
                Some(d) => (b'0' + d) as char,
                None => '.',
            };
            line.push(' ');
            line.push(digit);
            line.push(if cell.is_derived() { '*' } else { ' ' });
            if col % 3 == 2 {
                line.push('|');
            }
        }
        println!("{line}");
        if row % 3 == 2 {
            println!("   +---------+---------+---------+");
        }
    }
    println!("   * = solver-derived, read-only");
}

fn print_help() {
    println!("commands:");
    println!("  set <row> <col> <digit>   enter a digit (1-9)");
    println!("  clear <row> <col>         erase an entry");
    println!("  load <81 chars>           enter a whole puzzle, 0/. = empty");
    println!("  solve                     reveal the full solution");
    println!("  tip                       reveal the next empty cell");
    println!("  undo                      take back the last revealed cell");
    println!("  new                       start over");
    println!("  show                      redraw the grid");
    println!("  quit                      leave");
}
