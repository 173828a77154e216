mod commands;
mod dispatch;
mod error;
mod invocation;
mod registry;
#[cfg(test)]
mod testing;

use std::io;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use registry::Parsed;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let registry = commands::registry();

    let (descriptor, invocation) = match registry.parse(&args) {
        Ok(Parsed::Display(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Ok(Parsed::Run {
            descriptor,
            invocation,
        }) => (descriptor, invocation),
        Err(err) => {
            error::report(&err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_tracing(invocation.globals().verbose) {
        eprintln!("{err}");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match dispatch::execute(descriptor, invocation, &dispatch::HttpConnector, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error::report(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose {
        "info,lamp=debug,opsgenie_lamp_api=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}
