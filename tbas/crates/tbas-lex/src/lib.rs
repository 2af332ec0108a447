//! tbas-lex - Scanner for the tbas BASIC dialect.
//!
//! Turns source text into tokens one at a time through a mutable cursor
//! that the rest of the interpreter repositions for control flow: GOTO,
//! GOSUB, RETURN, and FOR re-entry all work by restoring a saved cursor
//! position and scanning again. The label pre-scan lives here too, since it
//! shares the cursor machinery.

pub mod cursor;
pub mod labels;
pub mod scanner;
pub mod token;

mod edge_cases;

pub use cursor::{Cursor, CursorSnapshot};
pub use labels::LabelIndex;
pub use scanner::Scanner;
pub use token::{keyword_from_ident, Token, TokenKind};
