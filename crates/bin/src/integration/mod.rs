//! File input for the CLI.
//!
//! Reads date-indexed CSV tables and JSON weight files into the library types.

pub(crate) mod csv_loader;
