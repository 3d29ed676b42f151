//! Tracing subscriber setup.
//!
//! Colored human-readable output by default, JSON when `LOG_FORMAT=json`.
//! Everything goes to stderr so rendered panels on stdout stay clean.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default directive when `RUST_LOG` does not mention our crates.
const DEFAULT_DIRECTIVE: &str = "tryon=info";

/// Whether `LOG_FORMAT` asks for JSON output.
pub fn json_requested(value: Option<&str>) -> bool {
    value.map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false)
}

/// Build the env filter, falling back to [`DEFAULT_DIRECTIVE`].
pub fn env_filter(verbose: bool) -> EnvFilter {
    let mut filter = EnvFilter::from_default_env();
    for directive in [
        if verbose { "tryon=debug" } else { DEFAULT_DIRECTIVE },
        "hyper=warn",
        "reqwest=warn",
    ] {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }
    filter
}

/// Install the global subscriber. Safe to call once per process.
pub fn init(verbose: bool) {
    let use_json = json_requested(std::env::var("LOG_FORMAT").ok().as_deref());
    let env_filter = env_filter(verbose);

    let result = if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}
