//! tbas-interp - Execution engine for the tbas BASIC dialect.
//!
//! The engine consumes an in-memory source text plus an I/O pair and runs
//! the program to completion. There is no AST: statements execute straight
//! off the token stream, and control flow (GOTO, GOSUB/RETURN, FOR/NEXT)
//! repositions the shared program cursor through saved snapshots.
//!
//! A run reports at most one dialect error, rendered as `ERROR: <message>`
//! on program output; host I/O failures use a separate channel and reach
//! the driver.

mod expr;
mod stmt;

pub mod vars;

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use tbas_lex::{CursorSnapshot, LabelIndex, Scanner, TokenKind};

use crate::vars::{Var, Variables};

pub use tbas_util::RunError;

/// Interpreter-level failure: the dialect's own error, or a host I/O
/// failure while writing program output or reading program input.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{0}")]
    Run(#[from] RunError),

    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
}

/// One active FOR loop: its counter, upper bound, and the position where
/// the body resumes on each iteration.
#[derive(Clone, Copy, Debug)]
pub struct ForFrame {
    pub var: Var,
    pub target: i64,
    pub body: CursorSnapshot,
}

/// One run of a BASIC program.
///
/// Everything a run touches lives here for exactly the lifetime of the run:
/// the scanner with its cursor and token slot, the label table from the
/// pre-scan, the 26 variables, the loop and call stacks, and the I/O pair.
pub struct Interpreter<'a, R, W> {
    scanner: Scanner<'a>,
    labels: LabelIndex<'a>,
    vars: Variables,
    for_stack: Vec<ForFrame>,
    gosub_stack: Vec<CursorSnapshot>,
    input: R,
    output: W,
    halted: bool,
}

impl<'a, R: BufRead, W: Write> Interpreter<'a, R, W> {
    pub fn new(source: &'a str, input: R, output: W) -> Self {
        Self {
            scanner: Scanner::new(source),
            labels: LabelIndex::default(),
            vars: Variables::new(),
            for_stack: Vec::new(),
            gosub_stack: Vec::new(),
            input,
            output,
            halted: false,
        }
    }

    /// Runs the program to completion.
    ///
    /// A dialect error ends the run after one `ERROR:` line on program
    /// output and still counts as a completed run; only host I/O failures
    /// are returned to the caller.
    pub fn run(&mut self) -> io::Result<()> {
        match self.exec() {
            Ok(()) => {}
            Err(ExecError::Run(error)) => {
                debug!(code = error.code(), "run stopped: {error}");
                writeln!(self.output, "ERROR: {error}")?;
            }
            Err(ExecError::Io(error)) => return Err(error),
        }
        self.output.flush()
    }

    fn exec(&mut self) -> Result<(), ExecError> {
        self.labels = LabelIndex::scan(&mut self.scanner)?;
        self.scanner.advance()?;
        while !self.halted {
            self.statement()?;
        }
        Ok(())
    }

    /// One trip through the dispatcher: route on the current token.
    ///
    /// Keywords are consumed before their handler runs; assignment is the
    /// exception, entered with the variable name still in the slot.
    fn statement(&mut self) -> Result<(), ExecError> {
        match self.scanner.token().kind {
            TokenKind::Variable => self.stmt_assign(),
            TokenKind::Let => {
                self.scanner.advance()?;
                self.stmt_assign()
            }
            TokenKind::Print => {
                self.scanner.advance()?;
                self.stmt_print()
            }
            TokenKind::Input => {
                self.scanner.advance()?;
                self.stmt_input()
            }
            TokenKind::If => {
                self.scanner.advance()?;
                self.stmt_if()
            }
            TokenKind::Goto => {
                self.scanner.advance()?;
                self.stmt_goto()
            }
            TokenKind::Gosub => {
                self.scanner.advance()?;
                self.stmt_gosub()
            }
            TokenKind::Return => {
                self.scanner.advance()?;
                self.stmt_return()
            }
            TokenKind::For => {
                self.scanner.advance()?;
                self.stmt_for()
            }
            TokenKind::Next => {
                self.scanner.advance()?;
                self.stmt_next()
            }
            TokenKind::End => {
                self.halted = true;
                Ok(())
            }
            // Line numbers, end-of-line markers, and stray clause keywords
            // are no-ops at statement position.
            _ => {
                self.scanner.advance()?;
                Ok(())
            }
        }
    }
}
