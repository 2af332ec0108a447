//! Statement handlers.
//!
//! Each handler is entered with its keyword already consumed — assignment
//! is the exception, entered with the variable name still in the slot — and
//! leaves the slot on the first token it does not understand.

use std::io::{self, BufRead, Write};

use tracing::trace;

use tbas_lex::TokenKind;
use tbas_util::{limits, RunError};

use crate::vars::Var;
use crate::{ExecError, ForFrame, Interpreter};

impl<'a, R: BufRead, W: Write> Interpreter<'a, R, W> {
    /// `[LET] var = expr` — also the implicit form.
    pub(crate) fn stmt_assign(&mut self) -> Result<(), ExecError> {
        let var = Var::from_name(self.scanner.token().text).ok_or(RunError::NotVariable)?;
        self.scanner.advance()?;
        if !self.scanner.accept_delim("=")? {
            return Err(RunError::EqualsExpected.into());
        }
        let value = self.expression()?;
        self.vars.set(var, value);
        Ok(())
    }

    /// `PRINT` list: quotes verbatim, expressions in decimal. `;` emits a
    /// tab, `,` a single space, and a list ending on either suppresses the
    /// trailing newline.
    pub(crate) fn stmt_print(&mut self) -> Result<(), ExecError> {
        let mut last_delim = "";
        loop {
            let token = self.scanner.token();
            match token.kind {
                TokenKind::Eol | TokenKind::End => break,
                TokenKind::Quote => {
                    self.output.write_all(token.text.as_bytes())?;
                    self.scanner.advance()?;
                }
                _ => {
                    let value = self.expression()?;
                    write!(self.output, "{value}")?;
                }
            }
            last_delim = self.scanner.token().text;
            if self.scanner.accept_delim(";")? {
                self.output.write_all(b"\t")?;
            } else if self.scanner.accept_delim(",")? {
                self.output.write_all(b" ")?;
            } else {
                break;
            }
        }
        match self.scanner.token().kind {
            TokenKind::Eol | TokenKind::End => {
                if last_delim != ";" && last_delim != "," {
                    self.output.write_all(b"\n")?;
                }
                Ok(())
            }
            _ => Err(RunError::Syntax.into()),
        }
    }

    /// `INPUT ["prompt",] var` — prompts on program output, then reads one
    /// decimal integer from program input.
    pub(crate) fn stmt_input(&mut self) -> Result<(), ExecError> {
        if self.scanner.token().kind == TokenKind::Quote {
            write!(self.output, "{} ? ", self.scanner.token().text)?;
            self.scanner.advance()?;
            if !self.scanner.accept_delim(",")? {
                return Err(RunError::Parens.into());
            }
        } else {
            self.output.write_all(b"? ")?;
        }
        self.output.flush()?;

        let var = Var::from_name(self.scanner.token().text).ok_or(RunError::NotVariable)?;
        if let Some(value) = read_integer(&mut self.input)? {
            self.vars.set(var, value);
        }
        self.scanner.advance()?;
        Ok(())
    }

    /// `IF lhs op rhs THEN …` — falls through on true, skips the rest of
    /// the line on false.
    pub(crate) fn stmt_if(&mut self) -> Result<(), ExecError> {
        let lhs = self.expression()?;
        let op = self.scanner.token().text;
        self.scanner.advance()?;
        let rhs = self.expression()?;

        let holds = match op {
            "=" => lhs == rhs,
            "<>" => lhs != rhs,
            "<" => lhs < rhs,
            "<=" => lhs <= rhs,
            ">" => lhs > rhs,
            ">=" => lhs >= rhs,
            _ => return Err(RunError::Syntax.into()),
        };

        if holds {
            if !self.scanner.accept_kind(TokenKind::Then)? {
                return Err(RunError::ThenExpected.into());
            }
        } else {
            self.scanner.skip_line()?;
        }
        Ok(())
    }

    /// `GOTO label`.
    pub(crate) fn stmt_goto(&mut self) -> Result<(), ExecError> {
        let label = self.scanner.token().text;
        let target = self.labels.find(label).ok_or(RunError::UndefinedLabel)?;
        trace!(label, line = self.scanner.line(), "goto");
        self.scanner.jump(target)?;
        Ok(())
    }

    /// `GOSUB label` — the return point is the position just past the
    /// label token.
    pub(crate) fn stmt_gosub(&mut self) -> Result<(), ExecError> {
        let label = self.scanner.token().text;
        let target = self.labels.find(label).ok_or(RunError::UndefinedLabel)?;
        if self.gosub_stack.len() == limits::GOSUB_DEPTH {
            return Err(RunError::GosubDepthExceeded.into());
        }
        self.gosub_stack.push(self.scanner.here());
        trace!(label, depth = self.gosub_stack.len(), "gosub");
        self.scanner.jump(target)?;
        Ok(())
    }

    /// `RETURN`.
    pub(crate) fn stmt_return(&mut self) -> Result<(), ExecError> {
        let target = self
            .gosub_stack
            .pop()
            .ok_or(RunError::ReturnWithoutGosub)?;
        self.scanner.jump(target)?;
        Ok(())
    }

    /// `FOR var = start TO target` — runs the body when `start <= target`,
    /// otherwise skips to the matching `NEXT`. The step is always +1.
    pub(crate) fn stmt_for(&mut self) -> Result<(), ExecError> {
        let var = Var::from_name(self.scanner.token().text).ok_or(RunError::NotVariable)?;
        self.scanner.advance()?;
        if !self.scanner.accept_delim("=")? {
            return Err(RunError::EqualsExpected.into());
        }
        let start = self.expression()?;
        self.vars.set(var, start);
        if !self.scanner.accept_kind(TokenKind::To)? {
            return Err(RunError::ToExpected.into());
        }
        let target = self.expression()?;

        if start <= target {
            if self.for_stack.len() == limits::FOR_DEPTH {
                return Err(RunError::ForDepthExceeded.into());
            }
            self.for_stack.push(ForFrame {
                var,
                target,
                body: self.scanner.here(),
            });
        } else {
            trace!(%var, "zero-iteration loop, skipping body");
            self.skip_loop_body()?;
        }
        Ok(())
    }

    /// Advances past the matching `NEXT`, counting nesting on the way.
    fn skip_loop_body(&mut self) -> Result<(), ExecError> {
        let mut depth = 1usize;
        loop {
            if self.scanner.accept_kind(TokenKind::For)? {
                depth += 1;
            } else if self.scanner.accept_kind(TokenKind::Next)? {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            } else if self.scanner.token().kind == TokenKind::End {
                // Ran off the program without finding the matching NEXT.
                return Err(RunError::NextWithoutFor.into());
            } else {
                self.scanner.advance()?;
            }
        }
        self.skip_loop_counter()
    }

    /// `NEXT` may name its counter (`NEXT I`); the name is decorative and
    /// skipped wherever a NEXT is consumed.
    fn skip_loop_counter(&mut self) -> Result<(), ExecError> {
        if self.scanner.token().kind == TokenKind::Variable {
            self.scanner.advance()?;
        }
        Ok(())
    }

    /// `NEXT [var]` — steps the innermost loop.
    pub(crate) fn stmt_next(&mut self) -> Result<(), ExecError> {
        let frame = *self.for_stack.last().ok_or(RunError::NextWithoutFor)?;
        let value = self.vars.get(frame.var).wrapping_add(1);
        self.vars.set(frame.var, value);
        if value > frame.target {
            self.for_stack.pop();
            self.skip_loop_counter()
        } else {
            self.scanner.jump(frame.body)?;
            Ok(())
        }
    }
}

/// Reads one integer the way a C `scanf("%d")` would: lines are consumed
/// until one with non-whitespace content arrives, then an optional sign and
/// leading digit run are taken from it. `None` — end of input, or a line
/// with no leading number — leaves the caller's variable untouched.
fn read_integer<R: BufRead>(input: &mut R) -> io::Result<Option<i64>> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let text = line.trim_start();
        if text.is_empty() {
            continue;
        }
        return Ok(parse_leading_integer(text));
    }
}

fn parse_leading_integer(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = crate::expr::parse_number(&digits[..end]);
    Some(if negative { value.wrapping_neg() } else { value })
}
