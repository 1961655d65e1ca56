use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Filter used with `--verbose` when `RUST_LOG` is unset.
pub const VERBOSE_FILTER: &str = "herald=trace,debug";

/// Filter used when neither `RUST_LOG`, `--verbose` nor the config sets one.
pub const DEFAULT_FILTER: &str = "herald=debug,info";

/// Picks the filter directives: `--verbose`, then the configured filter, then the default.
pub fn filter_directives(verbose: bool, configured: Option<&str>) -> &str {
	match configured {
		_ if verbose => VERBOSE_FILTER,
		Some(directives) if !directives.trim().is_empty() => directives,
		_ => DEFAULT_FILTER,
	}
}

/// Installs the stderr subscriber. `RUST_LOG` overrides everything else.
pub fn setup_tracing(verbose: bool, configured: Option<&str>) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(verbose, configured)));

	let installed = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_span_events(if verbose { FmtSpan::CLOSE } else { FmtSpan::NONE })
		.with_target(true)
		.try_init();
	if installed.is_err() {
		tracing::debug!("tracing subscriber already installed");
	}
}
