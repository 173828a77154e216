use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use clap::parser::ValueSource;
use clap::ArgMatches;

use crate::error::LampError;
use crate::registry::{FlagKind, FlagSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Text(Option<String>),
    Switch(bool),
    List(Vec<String>),
}

#[derive(Debug, Clone)]
struct Bound {
    value: FlagValue,
    supplied: bool,
}

/// The flags of one invocation, keyed by canonical flag name.
///
/// Binders only copy values the user supplied on the command line; defaults
/// are visible through [`Invocation::text`] for the few flags that steer the
/// CLI itself (such as the output format).
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    values: HashMap<&'static str, Bound>,
    default_user: Option<String>,
}

/// Flags shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub verbose: bool,
    pub api_key: Option<String>,
    pub user: Option<String>,
    pub config: Option<PathBuf>,
}

impl Invocation {
    pub fn from_matches<'a>(
        matches: &ArgMatches,
        schema: impl IntoIterator<Item = &'a FlagSpec>,
    ) -> Self {
        let mut values = HashMap::new();

        for flag in schema {
            let id = flag.id();
            let supplied = matches.value_source(id) == Some(ValueSource::CommandLine);
            let value = match flag.kind() {
                FlagKind::Text => FlagValue::Text(matches.get_one::<String>(id).cloned()),
                FlagKind::Switch => FlagValue::Switch(matches.get_flag(id)),
                FlagKind::List { .. } => FlagValue::List(
                    matches
                        .get_many::<String>(id)
                        .map(|values| values.cloned().collect())
                        .unwrap_or_default(),
                ),
            };
            values.insert(id, Bound { value, supplied });
        }

        Self {
            values,
            default_user: None,
        }
    }

    pub fn value(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(name).map(|bound| &bound.value)
    }

    /// The value of a text flag given on the command line. Blank values count
    /// as not given.
    pub fn supplied(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(Bound {
                value: FlagValue::Text(Some(value)),
                supplied: true,
            }) if !value.trim().is_empty() => Some(value.as_str()),
            _ => None,
        }
    }

    /// Owned form of [`Invocation::supplied`], ready to drop into a request.
    pub fn string(&self, name: &str) -> Option<String> {
        self.supplied(name).map(str::to_string)
    }

    /// The value of a text flag including its declared default.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.value(name) {
            Some(FlagValue::Text(value)) => value.as_deref(),
            _ => None,
        }
    }

    pub fn switch(&self, name: &str) -> bool {
        matches!(self.value(name), Some(FlagValue::Switch(true)))
    }

    /// Every value of a list flag in the order given, with blank entries
    /// dropped.
    pub fn list(&self, name: &str) -> Vec<String> {
        match self.value(name) {
            Some(FlagValue::List(values)) => values
                .iter()
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Parses a supplied text flag as a number.
    pub fn number<T: FromStr>(&self, name: &str) -> Result<Option<T>, LampError> {
        self.supplied(name)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|_| {
                    LampError::validation(format!(
                        "Invalid value '{raw}' for --{name}: expected a non-negative integer"
                    ))
                })
            })
            .transpose()
    }

    pub fn globals(&self) -> GlobalOptions {
        GlobalOptions {
            verbose: self.switch("v"),
            api_key: self.string("apiKey"),
            user: self.string("user"),
            config: self.supplied("config").map(PathBuf::from),
        }
    }

    /// Sets the user that alert actions fall back to when `--user` is absent.
    pub fn set_default_user(&mut self, user: Option<String>) {
        self.default_user = user;
    }

    pub fn user(&self) -> Option<String> {
        self.string("user").or_else(|| self.default_user.clone())
    }
}
