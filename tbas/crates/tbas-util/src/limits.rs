//! Static resource bounds of a run.
//!
//! All interpreter state is sized up front; there is no growth during
//! execution and exceeding a bound is fatal.

/// Largest source program the driver will load, in bytes.
pub const MAX_PROGRAM_BYTES: usize = 64_000;

/// Capacity of the label table built by the pre-scan.
pub const MAX_LABELS: usize = 512;

/// Longest identifier the scanner accepts, in bytes. Only the first letter
/// is significant for storage.
pub const MAX_IDENT_BYTES: usize = 32;

/// Deepest FOR-loop nesting.
pub const FOR_DEPTH: usize = 32;

/// Deepest GOSUB nesting.
pub const GOSUB_DEPTH: usize = 32;
