//! Fuzz target for the DSN parser.
//!
//! Feeds arbitrary strings to the parser and formats whatever parses.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_dsn_parser
//! ```

#![no_main]

use dsn_core::dsn::CANONICAL_KEYS;
use dsn_core::{DataSource, marshal};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // The parser should never panic, only return errors
        if let Ok(ds) = DataSource::parse(input) {
            assert_eq!(DataSource::parse(input).ok().as_ref(), Some(&ds));
            for name in ds.option_names() {
                assert!(!CANONICAL_KEYS.iter().any(|key| *key == name));
            }
            let _ = marshal(&ds);
            let _ = ds.port();
        }
    }
});
