//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Description                                          |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | CLI usage error (bad args, reported by clap)         |
//! | 3    | Input files could not be processed                   |
//! | 4    | Invalid config (parse, validation, missing column)   |
//! | 5    | Significant deviations found (`--fail-on-deviation`) |
//! | 6    | Duplicate ledger code under the `reject` policy      |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (e.g. cannot write output).
pub const EXIT_ERROR: u8 = 1;

/// Ledger or count file unreadable, or not a spreadsheet.
pub const EXIT_INGEST: u8 = 3;

/// Config file unreadable, malformed, or inconsistent with the ledger header.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// At least one product deviates more than the significance threshold.
pub const EXIT_DEVIATION: u8 = 5;

/// Same code on several ledger rows with `duplicate_codes = "reject"`.
pub const EXIT_DUPLICATE_CODE: u8 = 6;
