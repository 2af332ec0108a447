//! Edge case tests for tbas-lex.
