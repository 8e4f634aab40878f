// ABOUTME: Library half of the FlowInsight terminal front end
// ABOUTME: Application wiring, logging setup and display formatting shared by the binary

pub mod app;
pub mod format;

pub use app::App;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `warn` level so log lines don't drown command output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
