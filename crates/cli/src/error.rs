use colored::Colorize;
use opsgenie_lamp_api::error::ApiError;
use thiserror::Error;

/// Everything that can end a `lamp` invocation with a non-zero exit code.
#[derive(Debug, Error)]
pub enum LampError {
    /// Malformed or unknown flags, with the usage text of the command they
    /// were given to.
    #[error("{error}")]
    Usage { error: clap::Error, usage: String },

    #[error("No command given\n\n{usage}")]
    MissingCommand { usage: String },

    #[error("Unknown command '{name}'\n\n{usage}")]
    UnknownCommand { name: String, usage: String },

    #[error("Unable to create the OpsGenie client: {0:#}")]
    Client(anyhow::Error),

    #[error(transparent)]
    Remote(#[from] ApiError),

    #[error("{0}")]
    Validation(String),

    #[error("Unable to render the response: {0:#}")]
    Output(anyhow::Error),
}

impl LampError {
    pub fn validation(message: impl Into<String>) -> Self {
        LampError::Validation(message.into())
    }
}

/// Writes `err` to stderr.
pub fn report(err: &LampError) {
    if let LampError::Usage { error, usage } = err {
        // clap already knows how to lay out its own errors
        let _ = error.print();
        eprintln!("\n{usage}");
        return;
    }

    eprintln!("{} {}", "error:".red().bold(), err);

    if let LampError::Remote(api_err) = err {
        if let Some(suggestion) = api_err.suggestion() {
            eprintln!("  {} {}", "hint:".yellow(), suggestion);
        }
    }
}
