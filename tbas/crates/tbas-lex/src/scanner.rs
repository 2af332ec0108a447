//! The scanner: advances the program cursor and fills the token slot.

use tbas_util::limits::MAX_IDENT_BYTES;
use tbas_util::RunError;

use crate::cursor::{Cursor, CursorSnapshot};
use crate::token::{keyword_from_ident, Token, TokenKind};

/// Tokenizer over a BASIC program, exposing the current token as a slot.
///
/// Control flow in the dialect works by repositioning the cursor and
/// re-scanning, so the scanner owns the cursor and hands out snapshots as
/// jump targets. The slot is overwritten by every [`Scanner::advance`];
/// consumers must read it before requesting the next token.
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    token: Token<'a>,
}

/// Single bytes that form delimiter tokens.
const DELIMITERS: &[u8] = b"+-*^/%=;(),<>";

/// Horizontal whitespace: control bytes and space, but not newline and not
/// the end sentinel.
fn is_blank(byte: u8) -> bool {
    byte <= b' ' && byte != b'\n' && byte != 0
}

fn is_two_byte_operator(first: u8, second: u8) -> bool {
    matches!((first, second), (b'<', b'=') | (b'>', b'=') | (b'<', b'>'))
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token: Token::END,
        }
    }

    /// The current token slot.
    pub fn token(&self) -> Token<'a> {
        self.token
    }

    /// Snapshot of the cursor, one past the current token. Stored by FOR,
    /// GOSUB, and the label pre-scan as a jump target.
    pub fn here(&self) -> CursorSnapshot {
        self.cursor.snapshot()
    }

    /// Source line of the cursor (1-based).
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// True when the cursor has consumed the whole source.
    pub fn at_source_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Scans the next token into the slot.
    ///
    /// An unrecognized byte leaves the end-of-program token in the slot
    /// without advancing; the dispatcher halts on it. The only scan error
    /// is an unterminated string literal.
    pub fn advance(&mut self) -> Result<(), RunError> {
        self.token = Token::END;
        while is_blank(self.cursor.current()) {
            self.cursor.advance();
        }

        let start = self.cursor.position();
        let byte = self.cursor.current();
        match byte {
            0 => {}
            b'\n' => {
                self.cursor.advance();
                self.token = Token {
                    text: self.cursor.slice_from(start),
                    kind: TokenKind::Eol,
                };
            }
            b'"' => return self.scan_quote(),
            b'0'..=b'9' => {
                while self.cursor.current().is_ascii_digit() {
                    self.cursor.advance();
                }
                self.token = Token {
                    text: self.cursor.slice_from(start),
                    kind: TokenKind::Number,
                };
            }
            _ if DELIMITERS.contains(&byte) => {
                self.cursor.advance();
                if is_two_byte_operator(byte, self.cursor.current()) {
                    self.cursor.advance();
                }
                self.token = Token {
                    text: self.cursor.slice_from(start),
                    kind: TokenKind::Delimiter,
                };
            }
            _ if byte.is_ascii_alphabetic() => return self.scan_word(start),
            _ => {}
        }
        Ok(())
    }

    fn scan_quote(&mut self) -> Result<(), RunError> {
        self.cursor.advance();
        let start = self.cursor.position();
        while !matches!(self.cursor.current(), b'"' | b'\n' | 0) {
            self.cursor.advance();
        }
        if self.cursor.current() != b'"' {
            // The dialect reports a string left open with the same message
            // as a mismatched parenthesis.
            return Err(RunError::Parens);
        }
        self.token = Token {
            text: self.cursor.slice_from(start),
            kind: TokenKind::Quote,
        };
        self.cursor.advance();
        Ok(())
    }

    fn scan_word(&mut self, start: usize) -> Result<(), RunError> {
        while self.cursor.current().is_ascii_alphanumeric() {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        if text.len() > MAX_IDENT_BYTES {
            return Err(RunError::Syntax);
        }
        let kind = keyword_from_ident(text).unwrap_or(TokenKind::Variable);
        self.token = Token { text, kind };
        Ok(())
    }

    /// Consumes the current token when its kind matches.
    pub fn accept_kind(&mut self, kind: TokenKind) -> Result<bool, RunError> {
        if self.token.kind == kind {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consumes the current token when it is the given delimiter.
    pub fn accept_delim(&mut self, text: &str) -> Result<bool, RunError> {
        if self.token.is_delim(text) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Discards the rest of the current line and scans the first token of
    /// the next one.
    pub fn skip_line(&mut self) -> Result<(), RunError> {
        self.cursor.seek_next_line();
        self.advance()
    }

    /// Repositions to a saved snapshot and scans the token there.
    pub fn jump(&mut self, target: CursorSnapshot) -> Result<(), RunError> {
        self.cursor.restore(target);
        self.advance()
    }

    /// Repositions without scanning; the slot is cleared. Used by the label
    /// pre-scan, which walks the source without executing it.
    pub fn rewind(&mut self, target: CursorSnapshot) {
        self.cursor.restore(target);
        self.token = Token::END;
    }

    /// Moves the raw cursor to the start of the next line without scanning.
    pub fn seek_next_line(&mut self) {
        self.cursor.seek_next_line();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_one(source: &str) -> Token<'_> {
        let mut scanner = Scanner::new(source);
        scanner.advance().expect("scan");
        scanner.token()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(source);
        let mut kinds = Vec::new();
        loop {
            scanner.advance().expect("scan");
            if scanner.token().kind == TokenKind::End {
                break;
            }
            kinds.push(scanner.token().kind);
        }
        kinds
    }

    #[test]
    fn test_number_token() {
        let token = scan_one("  120 ");
        assert_eq!(token.kind, TokenKind::Number);
        assert_eq!(token.text, "120");
    }

    #[test]
    fn test_variable_token() {
        let token = scan_one("COUNT");
        assert_eq!(token.kind, TokenKind::Variable);
        assert_eq!(token.text, "COUNT");
    }

    #[test]
    fn test_keyword_case_insensitive() {
        assert_eq!(scan_one("Print").kind, TokenKind::Print);
        assert_eq!(scan_one("GOSUB").kind, TokenKind::Gosub);
        assert_eq!(scan_one("next").kind, TokenKind::Next);
    }

    #[test]
    fn test_single_delimiters() {
        for delim in ["+", "-", "*", "^", "/", "%", "=", ";", "(", ")", ",", "<", ">"] {
            let token = scan_one(delim);
            assert_eq!(token.kind, TokenKind::Delimiter, "delimiter {delim}");
            assert_eq!(token.text, delim);
        }
    }

    #[test]
    fn test_two_byte_operators() {
        assert_eq!(scan_one("<=").text, "<=");
        assert_eq!(scan_one(">=").text, ">=");
        assert_eq!(scan_one("<>").text, "<>");
        // `=<` is two tokens, not one operator.
        let mut scanner = Scanner::new("=<");
        scanner.advance().unwrap();
        assert_eq!(scanner.token().text, "=");
        scanner.advance().unwrap();
        assert_eq!(scanner.token().text, "<");
    }

    #[test]
    fn test_quote_strips_quotes() {
        let token = scan_one("\"HELLO, WORLD\"");
        assert_eq!(token.kind, TokenKind::Quote);
        assert_eq!(token.text, "HELLO, WORLD");
    }

    #[test]
    fn test_unterminated_quote() {
        let mut scanner = Scanner::new("\"OOPS\n");
        assert_eq!(scanner.advance(), Err(RunError::Parens));
    }

    #[test]
    fn test_eol_token() {
        let token = scan_one("\nPRINT");
        assert_eq!(token.kind, TokenKind::Eol);
        assert_eq!(token.text, "\n");
    }

    #[test]
    fn test_end_of_source() {
        let mut scanner = Scanner::new("   ");
        scanner.advance().unwrap();
        assert_eq!(scanner.token(), Token::END);
        // Scanning again at the end is idempotent.
        scanner.advance().unwrap();
        assert_eq!(scanner.token().kind, TokenKind::End);
    }

    #[test]
    fn test_unrecognized_byte_halts() {
        let mut scanner = Scanner::new("@");
        scanner.advance().unwrap();
        assert_eq!(scanner.token().kind, TokenKind::End);
    }

    #[test]
    fn test_identifier_length_bound() {
        let long = "A".repeat(33);
        let mut scanner = Scanner::new(&long);
        assert_eq!(scanner.advance(), Err(RunError::Syntax));

        let max = "B".repeat(32);
        let mut scanner = Scanner::new(&max);
        scanner.advance().unwrap();
        assert_eq!(scanner.token().kind, TokenKind::Variable);
    }

    #[test]
    fn test_statement_token_sequence() {
        assert_eq!(
            kinds("10 IF A >= 2 THEN PRINT \"YES\"\n"),
            vec![
                TokenKind::Number,
                TokenKind::If,
                TokenKind::Variable,
                TokenKind::Delimiter,
                TokenKind::Number,
                TokenKind::Then,
                TokenKind::Print,
                TokenKind::Quote,
                TokenKind::Eol,
            ]
        );
    }

    #[test]
    fn test_accept_delim() {
        let mut scanner = Scanner::new("= 5");
        scanner.advance().unwrap();
        assert!(!scanner.accept_delim("+").unwrap());
        assert!(scanner.accept_delim("=").unwrap());
        assert_eq!(scanner.token().text, "5");
    }

    #[test]
    fn test_accept_kind() {
        let mut scanner = Scanner::new("TO 10");
        scanner.advance().unwrap();
        assert!(scanner.accept_kind(TokenKind::To).unwrap());
        assert_eq!(scanner.token().kind, TokenKind::Number);
    }

    #[test]
    fn test_skip_line() {
        let mut scanner = Scanner::new("10 PRINT A\n20 END\n");
        scanner.advance().unwrap();
        scanner.skip_line().unwrap();
        assert_eq!(scanner.token().text, "20");
    }

    #[test]
    fn test_jump_rescans() {
        let mut scanner = Scanner::new("10 A\n20 B\n");
        let start = scanner.here();
        scanner.advance().unwrap();
        scanner.skip_line().unwrap();
        assert_eq!(scanner.token().text, "20");

        scanner.jump(start).unwrap();
        assert_eq!(scanner.token().text, "10");
        assert_eq!(scanner.line(), 1);
    }
}
