//! The dialect's runtime error set.
//!
//! A run reports at most one error: the dispatcher renders the first failure
//! as `ERROR: <message>` on program output and the process still exits 0.
//! The message text is the stable surface of the interpreter, so each
//! variant spells its message exactly.

use thiserror::Error;

/// Every error the interpreter can report, in code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("Syntax error")]
    Syntax,

    /// Also raised for an unterminated string literal.
    #[error("Unbalanced parentheses")]
    Parens,

    /// An expression was required but the current token cannot start one.
    #[error("No expression present")]
    NoExpression,

    #[error("Equals sign expected")]
    EqualsExpected,

    /// An assignment, FOR, or INPUT target did not start with a letter.
    #[error("Not a variable")]
    NotVariable,

    /// The pre-scan found more labeled lines than the table holds.
    #[error("Label table full")]
    LabelTableFull,

    /// Present for dialect completeness. Duplicate labels are not detected;
    /// lookup resolves to the first occurrence.
    #[error("Duplicate label")]
    DuplicateLabel,

    #[error("Undefined label")]
    UndefinedLabel,

    #[error("THEN expected")]
    ThenExpected,

    #[error("TO expected")]
    ToExpected,

    #[error("Too many nested FOR loops")]
    ForDepthExceeded,

    /// Raised by a bare NEXT and by a zero-iteration FOR whose body skip
    /// runs off the end of the program.
    #[error("NEXT without FOR")]
    NextWithoutFor,

    #[error("Too many nested GOSUBs")]
    GosubDepthExceeded,

    #[error("RETURN without GOSUB")]
    ReturnWithoutGosub,
}

impl RunError {
    /// Stable numeric code for logs and tooling.
    pub fn code(self) -> u8 {
        match self {
            RunError::Syntax => 0,
            RunError::Parens => 1,
            RunError::NoExpression => 2,
            RunError::EqualsExpected => 3,
            RunError::NotVariable => 4,
            RunError::LabelTableFull => 5,
            RunError::DuplicateLabel => 6,
            RunError::UndefinedLabel => 7,
            RunError::ThenExpected => 8,
            RunError::ToExpected => 9,
            RunError::ForDepthExceeded => 10,
            RunError::NextWithoutFor => 11,
            RunError::GosubDepthExceeded => 12,
            RunError::ReturnWithoutGosub => 13,
        }
    }
}
