use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Result};
use opsgenie_lamp_api::retry::RetryConfig;
use opsgenie_lamp_api::{OpsgenieApi, OpsgenieClient, DEFAULT_API_URL};
use opsgenie_lamp_config::{Config, API_KEY_ENV};
use opsgenie_lamp_output::{OutputFormat, OutputRenderer};
use tracing::debug;

use crate::commands::flags::{OUTPUT_FORMAT, PRETTY};
use crate::error::LampError;
use crate::invocation::{GlobalOptions, Invocation};
use crate::registry::CommandDescriptor;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A ready client plus the user alert actions default to.
pub struct Session {
    pub client: Box<dyn OpsgenieApi>,
    pub user: Option<String>,
}

/// Builds the client for one invocation from the global flags.
pub trait Connector {
    fn connect(&self, globals: &GlobalOptions) -> Result<Session>;
}

/// Talks to the OpsGenie HTTP API using the config file and the global flags.
pub struct HttpConnector;

impl Connector for HttpConnector {
    fn connect(&self, globals: &GlobalOptions) -> Result<Session> {
        let config = Config::load(globals.config.as_ref())?;

        let api_key = config
            .resolve_api_key(globals.api_key.as_deref())
            .ok_or_else(|| {
                let path = globals.config.clone().unwrap_or_else(Config::default_path);
                anyhow!(
                    "No API key found. Pass --apiKey, set {} or add api_key to {}",
                    API_KEY_ENV,
                    path.display()
                )
            })?;

        let api_url = config.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let timeout = config
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let retry_config = match config.max_retries {
            Some(retries) => RetryConfig::default().with_max_retries(retries),
            None => RetryConfig::default(),
        };

        let client = OpsgenieClient::with_timeout(api_url, timeout)?
            .with_api_key(api_key)
            .with_retry_config(retry_config);
        debug!(api_url, "OpsGenie client ready");

        Ok(Session {
            client: Box::new(client),
            user: config.resolve_user(globals.user.as_deref()),
        })
    }
}

/// Runs one parsed command: connect, bind, invoke, render.
pub async fn execute(
    descriptor: &CommandDescriptor,
    mut invocation: Invocation,
    connector: &dyn Connector,
    out: &mut dyn Write,
) -> Result<(), LampError> {
    let session = connector
        .connect(&invocation.globals())
        .map_err(LampError::Client)?;
    invocation.set_default_user(session.user.clone());

    let call = descriptor.bind(&invocation)?;
    debug!(
        command = descriptor.name(),
        operation = call.operation(),
        "Request prepared from flags, sending request to OpsGenie"
    );

    let reply = call.invoke(session.client.as_ref()).await?;
    reply.write(&renderer(&invocation)?, out)
}

fn renderer(invocation: &Invocation) -> Result<OutputRenderer, LampError> {
    let format = match invocation.text(OUTPUT_FORMAT) {
        Some(name) => OutputFormat::parse(name).map_err(LampError::Output)?,
        None => OutputFormat::default(),
    };
    Ok(OutputRenderer::new(format).pretty(invocation.switch(PRETTY)))
}
