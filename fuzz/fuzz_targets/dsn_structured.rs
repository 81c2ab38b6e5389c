//! Structured fuzz target for the DSN parser.
//!
//! Builds DSNs from arbitrary components so that most inputs reach the
//! field-splitting logic rather than failing the grammar.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_dsn_structured
//! ```

#![no_main]

use arbitrary::Arbitrary;
use dsn_core::dsn::CANONICAL_KEYS;
use dsn_core::parse;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzDsn {
    driver: Option<String>,
    credentials: Option<String>,
    instance: Option<String>,
    path: Option<String>,
    params: Vec<(String, String)>,
}

impl FuzzDsn {
    fn render(&self) -> String {
        let mut dsn = String::new();
        if let Some(driver) = &self.driver {
            dsn.push_str(driver);
            dsn.push(':');
        }
        if let Some(instance) = &self.instance {
            dsn.push_str("//");
            if let Some(credentials) = &self.credentials {
                dsn.push_str(credentials);
                dsn.push('@');
            }
            dsn.push_str(instance);
        }
        if let Some(path) = &self.path {
            dsn.push('/');
            dsn.push_str(path);
        }
        if !self.params.is_empty() {
            let pairs: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            dsn.push('?');
            dsn.push_str(&pairs.join("&"));
        }
        dsn
    }
}

fuzz_target!(|input: FuzzDsn| {
    let dsn = input.render();
    if let Ok(ds) = parse(&dsn) {
        // Canonical fields are always populated after a successful parse
        let map = ds.to_map();
        for key in CANONICAL_KEYS {
            assert!(map.contains_key(key));
        }
        let _ = ds.addr(Some(1));
        let _ = ds.auth_basic_base64();
    }
});
