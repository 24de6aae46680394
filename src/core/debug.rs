//! Lightweight debug logging gated by RANDFIT_DEBUG=1.
use std::sync::OnceLock;

static ENABLED: OnceLock<bool> = OnceLock::new();

pub fn is_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("RANDFIT_DEBUG").ok().as_deref() == Some("1"))
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        if $crate::core::debug::is_enabled() { eprintln!("[debug] {}", format_args!($($arg)*)); }
    }};
}

/// Yellow `warn:` prefix on stderr, same as the CLI's other diagnostics.
pub fn warn(message: &str) {
    use colored::Colorize;
    eprintln!("{} {}", "warn:".yellow().bold(), message);
}
