use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "holo=info,holo_engine=info,holo_operators=info,holo_sdk=info";

/// Console logging on stderr. `RUST_LOG` replaces the default directives.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = if verbose {
            DEFAULT_DIRECTIVES.replace("=info", "=debug")
        } else {
            DEFAULT_DIRECTIVES.to_string()
        };
        EnvFilter::new(directives)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
