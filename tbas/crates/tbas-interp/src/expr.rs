//! Expression evaluation.
//!
//! Recursive descent directly over the token stream; there is no AST and no
//! lookahead beyond the token slot. The additive tier takes each right
//! operand at unary tier and then folds trailing multiplicative operators
//! into the running value, so `10 - 2 * 3` evaluates as `(10 - 2) * 3`.
//! Power binds tightest and applies at most once per factor.
//!
//! Addition, subtraction, multiplication, negation, and power wrap on
//! overflow. Division and modulo keep host semantics, including the trap on
//! a zero divisor.

use std::io::{BufRead, Write};

use tbas_lex::TokenKind;
use tbas_util::RunError;

use crate::vars::Var;
use crate::{ExecError, Interpreter};

impl<'a, R: BufRead, W: Write> Interpreter<'a, R, W> {
    /// Evaluates an expression starting at the current token. On return the
    /// slot holds the first token that is not part of the expression.
    pub(crate) fn expression(&mut self) -> Result<i64, ExecError> {
        let mut value = self.term()?;
        loop {
            let subtract = if self.scanner.accept_delim("+")? {
                false
            } else if self.scanner.accept_delim("-")? {
                true
            } else {
                break;
            };
            let rhs = self.primary()?;
            value = if subtract {
                value.wrapping_sub(rhs)
            } else {
                value.wrapping_add(rhs)
            };
            value = self.term_rest(value)?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<i64, ExecError> {
        let value = self.factor()?;
        self.term_rest(value)
    }

    /// Folds `* / %` continuations into an already-evaluated left side.
    fn term_rest(&mut self, mut value: i64) -> Result<i64, ExecError> {
        loop {
            if self.scanner.accept_delim("*")? {
                value = value.wrapping_mul(self.factor()?);
            } else if self.scanner.accept_delim("/")? {
                value /= self.factor()?;
            } else if self.scanner.accept_delim("%")? {
                value %= self.factor()?;
            } else {
                break;
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<i64, ExecError> {
        let value = self.primary()?;
        if self.scanner.accept_delim("^")? {
            let exponent = self.primary()?;
            return Ok(power(value, exponent));
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<i64, ExecError> {
        if self.scanner.accept_delim("-")? {
            return Ok(self.primary()?.wrapping_neg());
        }
        if self.scanner.accept_delim("(")? {
            let value = self.expression()?;
            if !self.scanner.accept_delim(")")? {
                return Err(RunError::Parens.into());
            }
            return Ok(value);
        }
        let token = self.scanner.token();
        match token.kind {
            TokenKind::Variable => {
                let var = Var::from_name(token.text).ok_or(RunError::NotVariable)?;
                let value = self.vars.get(var);
                self.scanner.advance()?;
                Ok(value)
            }
            TokenKind::Number => {
                let value = parse_number(token.text);
                self.scanner.advance()?;
                Ok(value)
            }
            _ => Err(RunError::NoExpression.into()),
        }
    }
}

/// Folds a decimal digit run with wrapping arithmetic. The scanner
/// guarantees the text is a nonempty run of ASCII digits.
pub(crate) fn parse_number(text: &str) -> i64 {
    text.bytes().fold(0i64, |value, digit| {
        value.wrapping_mul(10).wrapping_add(i64::from(digit - b'0'))
    })
}

/// Power by repeated multiplication. A zero exponent yields 1; a negative
/// exponent leaves the base unchanged.
fn power(base: i64, exponent: i64) -> i64 {
    if exponent == 0 {
        return 1;
    }
    let mut value = base;
    let mut remaining = exponent;
    while remaining > 1 {
        value = value.wrapping_mul(base);
        remaining -= 1;
    }
    value
}
