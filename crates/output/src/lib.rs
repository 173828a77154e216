use std::io::Write;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Names accepted by `--output-format`.
    pub const NAMES: [&'static str; 2] = ["json", "yaml"];

    pub fn parse(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name, true).map_err(|_| {
            anyhow!(
                "Invalid output format '{}'. Must be one of: {}",
                name,
                Self::NAMES.join(", ")
            )
        })
    }
}

pub struct OutputRenderer {
    format: OutputFormat,
    pretty: bool,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Indent JSON output. YAML is always rendered in block style.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render_to<W, T>(&self, out: &mut W, value: &T) -> Result<()>
    where
        W: Write + ?Sized,
        T: Serialize + ?Sized,
    {
        let text = self.to_text(value)?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Renders `value` to a newline-terminated string.
    pub fn to_text<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json_value = serde_json::to_value(value)?;

        let mut text = match self.format {
            OutputFormat::Json if self.pretty => serde_json::to_string_pretty(&json_value)?,
            OutputFormat::Json => serde_json::to_string(&json_value)?,
            OutputFormat::Yaml => serde_yaml::to_string(&json_value)?,
        };

        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }
}
