//! Console logging using env_logger
//!
//! Defaults to `info`; `RUST_LOG` overrides the filter.

use env_logger::{Builder, Env};

pub fn init() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}
