//! Label index: the pre-scan that maps line numbers to source positions.

use tracing::debug;

use tbas_util::limits::MAX_LABELS;
use tbas_util::RunError;

use crate::cursor::CursorSnapshot;
use crate::scanner::Scanner;
use crate::token::TokenKind;

/// One labeled line: the number's text and the start of its line.
#[derive(Clone, Copy, Debug)]
struct Label<'a> {
    name: &'a str,
    at: CursorSnapshot,
}

/// Jump-target table built once before execution.
///
/// Lookup is linear and the first entry wins, so a duplicated line number
/// always resolves to its earliest occurrence.
#[derive(Default)]
pub struct LabelIndex<'a> {
    entries: Vec<Label<'a>>,
}

impl<'a> LabelIndex<'a> {
    /// Walks the program line by line, recording every line whose first
    /// token is a number.
    ///
    /// Scanner errors inside a line are ignored here; execution surfaces
    /// them when the line is actually reached. The scanner is rewound to
    /// its starting position afterwards, whether the scan filled the table
    /// or not.
    pub fn scan(scanner: &mut Scanner<'a>) -> Result<Self, RunError> {
        let origin = scanner.here();
        let mut entries = Vec::new();
        while !scanner.at_source_end() {
            let line_start = scanner.here();
            if scanner.advance().is_ok() && scanner.token().kind == TokenKind::Number {
                if entries.len() == MAX_LABELS {
                    scanner.rewind(origin);
                    return Err(RunError::LabelTableFull);
                }
                entries.push(Label {
                    name: scanner.token().text,
                    at: line_start,
                });
            }
            scanner.rewind(line_start);
            scanner.seek_next_line();
        }
        scanner.rewind(origin);
        debug!(labels = entries.len(), "label pre-scan complete");
        Ok(LabelIndex { entries })
    }

    /// Position of the first entry recorded under `name`.
    pub fn find(&self, name: &str) -> Option<CursorSnapshot> {
        self.entries
            .iter()
            .find(|label| label.name == name)
            .map(|label| label.at)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(source: &str) -> (Scanner<'_>, LabelIndex<'_>) {
        let mut scanner = Scanner::new(source);
        let index = LabelIndex::scan(&mut scanner).expect("pre-scan");
        (scanner, index)
    }

    #[test]
    fn test_labels_recorded_at_line_start() {
        let source = "10 PRINT A\n20 END\n";
        let (_, index) = index_of(source);
        assert_eq!(index.len(), 2);
        assert_eq!(index.find("10").unwrap().position, 0);
        assert_eq!(index.find("20").unwrap().position, source.find("20").unwrap());
        assert_eq!(index.find("20").unwrap().line, 2);
    }

    #[test]
    fn test_unlabeled_lines_skipped() {
        let (_, index) = index_of("PRINT A\n10 END\n");
        assert_eq!(index.len(), 1);
        assert!(index.find("10").is_some());
    }

    #[test]
    fn test_blank_line_does_not_hide_next_label() {
        let (_, index) = index_of("\n10 PRINT A\n\n20 END\n");
        assert_eq!(index.len(), 2);
        assert!(index.find("10").is_some());
        assert!(index.find("20").is_some());
    }

    #[test]
    fn test_missing_label() {
        let (_, index) = index_of("10 END\n");
        assert!(index.find("99").is_none());
    }

    #[test]
    fn test_duplicate_label_first_wins() {
        let source = "10 PRINT A\n10 PRINT B\n";
        let (_, index) = index_of(source);
        assert_eq!(index.len(), 2);
        assert_eq!(index.find("10").unwrap().position, 0);
    }

    #[test]
    fn test_lookup_idempotent() {
        let (_, index) = index_of("10 A = 1\n20 GOTO 10\n");
        assert_eq!(index.find("10"), index.find("10"));
        assert_eq!(index.find("20"), index.find("20"));
    }

    #[test]
    fn test_scanner_rewound_after_scan() {
        let (mut scanner, _) = index_of("10 PRINT A\n");
        scanner.advance().unwrap();
        assert_eq!(scanner.token().text, "10");
    }

    #[test]
    fn test_scan_errors_suppressed() {
        // The unterminated string on line one must not abort the pre-scan.
        let (_, index) = index_of("\"OOPS\n10 END\n");
        assert_eq!(index.len(), 1);
        assert!(index.find("10").is_some());
    }

    #[test]
    fn test_table_full() {
        let mut source = String::new();
        for line in 0..=MAX_LABELS {
            source.push_str(&format!("{} A = 1\n", line + 1));
        }
        let mut scanner = Scanner::new(&source);
        let result = LabelIndex::scan(&mut scanner);
        assert_eq!(result.err(), Some(RunError::LabelTableFull));
    }

    #[test]
    fn test_exactly_full_table_is_fine() {
        let mut source = String::new();
        for line in 0..MAX_LABELS {
            source.push_str(&format!("{} A = 1\n", line + 1));
        }
        let mut scanner = Scanner::new(&source);
        let index = LabelIndex::scan(&mut scanner).expect("pre-scan");
        assert_eq!(index.len(), MAX_LABELS);
        assert!(index.find("512").is_some());
    }
}
