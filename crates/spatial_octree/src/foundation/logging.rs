//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Initialize logging from `RUST_LOG`
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::try_init();
}

/// Initialize logging with a fallback level used when `RUST_LOG` is not set
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        init();
        init_with_level("debug");
        init();
        info!("logger initialized");
    }
}
