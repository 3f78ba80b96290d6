//! Process-wide tracing setup for jobcfg binaries.

/// Install the default subscriber (JSON, `RUST_LOG`, default `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Subscriber configuration.
pub mod tracing;
