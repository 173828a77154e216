//! The command table and the flag parser built on top of clap.
//!
//! Commands are plain data: a name, a usage line, a flag schema and a binder
//! that turns parsed flags into a [`Call`]. The registry owns the ordered list
//! of descriptors plus the global flags every command accepts, and builds a
//! clap [`Command`] for the one descriptor selected by `argv[1]`.

use std::collections::HashSet;

use clap::builder::PossibleValuesParser;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};

use crate::commands::Call;
use crate::error::LampError;
use crate::invocation::Invocation;

pub const PROGRAM: &str = "lamp";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
const ABOUT: &str = "Command line interface for OpsGenie";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Text,
    Switch,
    /// Repeatable. With a delimiter, every occurrence is also split on it.
    List { delimiter: Option<char> },
}

/// One flag of a command's schema. The first name is the canonical one that
/// binders look values up by; the rest are aliases.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    names: &'static [&'static str],
    kind: FlagKind,
    help: String,
    default: Option<&'static str>,
    choices: Option<&'static [&'static str]>,
}

impl FlagSpec {
    fn new(names: &'static [&'static str], kind: FlagKind, help: impl Into<String>) -> Self {
        assert!(!names.is_empty(), "a flag needs at least one name");
        Self {
            names,
            kind,
            help: help.into(),
            default: None,
            choices: None,
        }
    }

    pub fn text(names: &'static [&'static str], help: impl Into<String>) -> Self {
        Self::new(names, FlagKind::Text, help)
    }

    pub fn switch(names: &'static [&'static str], help: impl Into<String>) -> Self {
        Self::new(names, FlagKind::Switch, help)
    }

    pub fn list(names: &'static [&'static str], help: impl Into<String>) -> Self {
        Self::new(names, FlagKind::List { delimiter: None }, help)
    }

    /// A repeatable list flag whose values may also be comma separated.
    pub fn comma_list(names: &'static [&'static str], help: impl Into<String>) -> Self {
        Self::new(names, FlagKind::List { delimiter: Some(',') }, help)
    }

    pub fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn id(&self) -> &'static str {
        self.names[0]
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.id()).help(self.help.clone());

        for (position, name) in self.names.iter().enumerate() {
            let mut chars = name.chars();
            arg = match (chars.next(), chars.next(), position) {
                (Some(c), None, 0) => arg.short(c),
                (Some(c), None, _) => arg.visible_short_alias(c),
                (_, _, 0) => arg.long(*name),
                _ => arg.visible_alias(*name),
            };
        }

        arg = match self.kind {
            FlagKind::Text => arg.action(ArgAction::Set).allow_hyphen_values(true),
            FlagKind::Switch => arg.action(ArgAction::SetTrue),
            FlagKind::List { delimiter } => {
                let arg = arg.action(ArgAction::Append).allow_hyphen_values(true);
                match delimiter {
                    Some(delimiter) => arg.value_delimiter(delimiter),
                    None => arg,
                }
            }
        };

        if let Some(default) = self.default {
            arg = arg.default_value(default);
        }
        if let Some(choices) = self.choices {
            arg = arg
                .value_parser(PossibleValuesParser::new(choices.iter().copied()))
                .ignore_case(true);
        }
        arg
    }
}

/// Turns the flags of one invocation into the call it describes.
pub type Binder = fn(&Invocation) -> Result<Call, LampError>;

pub struct CommandDescriptor {
    name: &'static str,
    usage: &'static str,
    flags: Vec<FlagSpec>,
    bind: Binder,
}

impl CommandDescriptor {
    pub fn new(name: &'static str, usage: &'static str, bind: Binder) -> Self {
        Self {
            name,
            usage,
            flags: Vec::new(),
            bind,
        }
    }

    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn flags(mut self, flags: impl IntoIterator<Item = FlagSpec>) -> Self {
        self.flags.extend(flags);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn usage(&self) -> &'static str {
        self.usage
    }

    pub fn bind(&self, invocation: &Invocation) -> Result<Call, LampError> {
        (self.bind)(invocation)
    }
}

/// Outcome of parsing the process arguments.
pub enum Parsed<'a> {
    /// Help or version text. Printed to stdout, exit 0.
    Display(String),
    Run {
        descriptor: &'a CommandDescriptor,
        invocation: Invocation,
    },
}

pub struct Registry {
    globals: Vec<FlagSpec>,
    commands: Vec<CommandDescriptor>,
}

impl Registry {
    /// Builds the command table.
    ///
    /// # Panics
    ///
    /// When two commands share a name, or when a flag name appears twice in
    /// the combined schema of one command. Both are programming errors.
    pub fn register(globals: Vec<FlagSpec>, commands: Vec<CommandDescriptor>) -> Self {
        let mut seen = HashSet::new();
        for command in &commands {
            assert!(
                seen.insert(command.name),
                "command '{}' is registered twice",
                command.name
            );

            let mut flag_names = HashSet::new();
            for flag in globals.iter().chain(&command.flags) {
                for name in flag.names() {
                    assert!(
                        flag_names.insert(*name),
                        "flag '{}' is declared twice on command '{}'",
                        name,
                        command.name
                    );
                }
            }
        }

        Self { globals, commands }
    }

    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    pub fn find(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|command| command.name == name)
    }

    /// Selects the descriptor named by `argv[1]` and returns it with the
    /// remaining raw arguments.
    pub fn resolve<'a, 'b>(
        &'a self,
        argv: &'b [String],
    ) -> Result<(&'a CommandDescriptor, &'b [String]), LampError> {
        let name = argv.get(1).ok_or_else(|| LampError::MissingCommand {
            usage: self.usage(),
        })?;

        let descriptor = self
            .find(name)
            .ok_or_else(|| LampError::UnknownCommand {
                name: name.clone(),
                usage: self.usage(),
            })?;

        Ok((descriptor, &argv[2..]))
    }

    pub fn parse(&self, argv: &[String]) -> Result<Parsed<'_>, LampError> {
        match argv.get(1).map(String::as_str) {
            Some("help" | "--help" | "-h" | "-help") => return self.help(argv.get(2)),
            Some("--version" | "-V" | "-version") => {
                return Ok(Parsed::Display(format!("{PROGRAM} version {VERSION}\n")))
            }
            _ => {}
        }

        let (descriptor, raw) = self.resolve(argv)?;
        let tokens = normalize_args(self.schema(descriptor), raw);

        let matches = self
            .command_line(descriptor)
            .try_get_matches_from(std::iter::once(descriptor.name.to_string()).chain(tokens));

        let matches = match matches {
            Ok(matches) => matches,
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                return Ok(Parsed::Display(err.render().to_string()))
            }
            Err(error) => {
                return Err(LampError::Usage {
                    error,
                    usage: self.command_usage(descriptor),
                })
            }
        };

        Ok(Parsed::Run {
            descriptor,
            invocation: Invocation::from_matches(&matches, self.schema(descriptor)),
        })
    }

    /// Top-level usage: every command with its usage line.
    pub fn usage(&self) -> String {
        let mut app = Command::new(PROGRAM)
            .version(VERSION)
            .about(ABOUT)
            .override_usage(format!("{PROGRAM} <command> [flags]"));

        for command in self.commands() {
            app = app.subcommand(Command::new(command.name()).about(command.usage()));
        }

        app.render_help().to_string()
    }

    pub fn command_usage(&self, descriptor: &CommandDescriptor) -> String {
        self.command_line(descriptor).render_help().to_string()
    }

    fn help(&self, topic: Option<&String>) -> Result<Parsed<'_>, LampError> {
        let Some(name) = topic else {
            return Ok(Parsed::Display(self.usage()));
        };

        let descriptor = self.find(name).ok_or_else(|| LampError::UnknownCommand {
            name: name.clone(),
            usage: self.usage(),
        })?;
        Ok(Parsed::Display(self.command_usage(descriptor)))
    }

    fn schema<'a>(&'a self, descriptor: &'a CommandDescriptor) -> impl Iterator<Item = &'a FlagSpec> {
        self.globals.iter().chain(&descriptor.flags)
    }

    fn command_line(&self, descriptor: &CommandDescriptor) -> Command {
        Command::new(descriptor.name)
            .bin_name(format!("{PROGRAM} {}", descriptor.name))
            .about(descriptor.usage)
            .disable_version_flag(true)
            .args_override_self(true)
            .args(self.schema(descriptor).map(FlagSpec::to_arg))
    }
}

/// Rewrites single-dash long flags (`-alertId`) and double-dash short flags
/// (`--v`) into the spelling clap expects. The token following a flag that
/// takes a value is that flag's value and is passed through untouched, as is
/// everything after `--`.
fn normalize_args<'a>(
    schema: impl Iterator<Item = &'a FlagSpec>,
    raw: &[String],
) -> Vec<String> {
    let mut longs: HashSet<&str> = HashSet::from(["help"]);
    let mut shorts: HashSet<&str> = HashSet::new();
    let mut valued: HashSet<&str> = HashSet::new();
    for flag in schema {
        for name in flag.names() {
            if name.chars().count() == 1 {
                shorts.insert(*name);
            } else {
                longs.insert(*name);
            }
            if flag.kind() != FlagKind::Switch {
                valued.insert(*name);
            }
        }
    }

    let mut tokens = Vec::with_capacity(raw.len());
    let mut rest = raw.iter();
    while let Some(token) = rest.next() {
        if token == "--" {
            tokens.push(token.clone());
            tokens.extend(rest.cloned());
            break;
        }

        let token = normalize_token(token, &longs, &shorts);
        let awaits_value = awaits_value(&token, &valued);
        tokens.push(token);
        if awaits_value {
            if let Some(value) = rest.next() {
                tokens.push(value.clone());
            }
        }
    }
    tokens
}

fn normalize_token(token: &str, longs: &HashSet<&str>, shorts: &HashSet<&str>) -> String {
    if let Some(body) = token.strip_prefix("--") {
        if shorts.contains(flag_name(body)) {
            return format!("-{body}");
        }
    } else if let Some(body) = token.strip_prefix('-') {
        let name = flag_name(body);
        if name.chars().count() > 1 && longs.contains(name) {
            return format!("-{token}");
        }
    }
    token.to_string()
}

/// Whether a normalized token is a value-taking flag whose value is the next
/// token (`--alias x`, `-D k=v`), as opposed to `--alias=x` or `-Dk=v`.
fn awaits_value(token: &str, valued: &HashSet<&str>) -> bool {
    let name = match token.strip_prefix("--") {
        Some(body) => body,
        None => match token.strip_prefix('-') {
            Some(body) if body.chars().count() == 1 => body,
            _ => return false,
        },
    };
    !name.contains('=') && valued.contains(name)
}

fn flag_name(body: &str) -> &str {
    body.split_once('=').map_or(body, |(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsgenie_lamp_api::customer_log::ListLogsRequest;

    fn noop(_: &Invocation) -> Result<Call, LampError> {
        Ok(Call::ListLogs(ListLogsRequest::default()))
    }

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once(PROGRAM)
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    fn sample() -> Registry {
        Registry::register(
            vec![
                FlagSpec::switch(&["v"], "Verbose"),
                FlagSpec::text(&["apiKey"], "API key"),
            ],
            vec![
                CommandDescriptor::new("getAlert", "Gets an alert", noop)
                    .flag(FlagSpec::text(&["alertId", "id"], "Alert id"))
                    .flag(FlagSpec::text(&["alias"], "Alias"))
                    .flag(FlagSpec::switch(&["pretty"], "Pretty"))
                    .flag(FlagSpec::comma_list(&["tags"], "Tags"))
                    .flag(FlagSpec::list(&["D"], "Details"))
                    .flag(
                        FlagSpec::text(&["output-format"], "Format")
                            .with_default("json")
                            .with_choices(&["json", "yaml"]),
                    ),
                CommandDescriptor::new("listLogs", "Lists logs", noop),
            ],
        )
    }

    fn run(registry: &Registry, args: &[&str]) -> Invocation {
        match registry.parse(&argv(args)) {
            Ok(Parsed::Run { invocation, .. }) => invocation,
            Ok(Parsed::Display(text)) => panic!("unexpected display output: {text}"),
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn test_resolve_every_registered_name() {
        let registry = crate::commands::registry();
        for descriptor in registry.commands() {
            let args = argv(&[descriptor.name(), "--alias", "x"]);
            let (found, rest) = registry.resolve(&args).unwrap();
            assert_eq!(found.name(), descriptor.name());
            assert!(std::ptr::eq(found, descriptor));
            assert_eq!(rest, &args[2..]);
        }
    }

    #[test]
    fn test_resolve_unknown_command() {
        let registry = sample();
        let err = registry.resolve(&argv(&["frobnicate"])).err().unwrap();
        match err {
            LampError::UnknownCommand { name, usage } => {
                assert_eq!(name, "frobnicate");
                assert!(usage.contains("getAlert"));
                assert!(usage.contains("listLogs"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let registry = sample();
        assert!(matches!(
            registry.resolve(&argv(&["getalert"])),
            Err(LampError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn test_missing_command() {
        let registry = sample();
        assert!(matches!(
            registry.parse(&argv(&[])),
            Err(LampError::MissingCommand { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_command_names_panic() {
        Registry::register(
            Vec::new(),
            vec![
                CommandDescriptor::new("getAlert", "a", noop),
                CommandDescriptor::new("getAlert", "b", noop),
            ],
        );
    }

    #[test]
    #[should_panic(expected = "declared twice")]
    fn test_flag_colliding_with_global_panics() {
        Registry::register(
            vec![FlagSpec::text(&["user"], "User")],
            vec![CommandDescriptor::new("assign", "a", noop)
                .flag(FlagSpec::text(&["user"], "Again"))],
        );
    }

    #[test]
    fn test_every_alias_binds_the_same_value() {
        let registry = sample();
        for spelling in ["--alertId", "--id", "-alertId", "-id"] {
            let invocation = run(&registry, &["getAlert", spelling, "abc123"]);
            assert_eq!(invocation.supplied("alertId"), Some("abc123"), "{spelling}");
        }
    }

    #[test]
    fn test_last_alias_wins() {
        let registry = sample();
        let invocation = run(&registry, &["getAlert", "--alertId", "first", "--id", "second"]);
        assert_eq!(invocation.supplied("alertId"), Some("second"));

        let invocation = run(&registry, &["getAlert", "--alias", "a", "--alias", "b"]);
        assert_eq!(invocation.supplied("alias"), Some("b"));
    }

    #[test]
    fn test_equals_form() {
        let registry = sample();
        let invocation = run(&registry, &["getAlert", "--alias=db down", "-apiKey=k"]);
        assert_eq!(invocation.supplied("alias"), Some("db down"));
        assert_eq!(invocation.supplied("apiKey"), Some("k"));
    }

    #[test]
    fn test_list_keeps_every_occurrence_in_order() {
        let registry = sample();
        let invocation = run(
            &registry,
            &["getAlert", "-D", "a=1", "-D", "b=2", "-D", "c=3,4"],
        );
        assert_eq!(invocation.list("D"), vec!["a=1", "b=2", "c=3,4"]);
    }

    #[test]
    fn test_comma_list_splits_and_repeats() {
        let registry = sample();
        let invocation = run(&registry, &["getAlert", "--tags", "disk,prod", "--tags", "db"]);
        assert_eq!(invocation.list("tags"), vec!["disk", "prod", "db"]);
    }

    #[test]
    fn test_switch_absent_and_present() {
        let registry = sample();
        let invocation = run(&registry, &["getAlert"]);
        assert!(!invocation.switch("pretty"));
        assert!(!invocation.switch("v"));

        let invocation = run(&registry, &["getAlert", "--pretty", "--v"]);
        assert!(invocation.switch("pretty"));
        assert!(invocation.switch("v"));
    }

    #[test]
    fn test_default_value_is_not_supplied() {
        let registry = sample();
        let invocation = run(&registry, &["getAlert"]);
        assert_eq!(invocation.text("output-format"), Some("json"));
        assert_eq!(invocation.supplied("output-format"), None);

        let invocation = run(&registry, &["getAlert", "--output-format", "yaml"]);
        assert_eq!(invocation.supplied("output-format"), Some("yaml"));
    }

    #[test]
    fn test_rejects_value_outside_choices() {
        let registry = sample();
        let err = registry
            .parse(&argv(&["getAlert", "--output-format", "xml"]))
            .err()
            .unwrap();
        assert!(matches!(err, LampError::Usage { .. }));
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let registry = sample();
        let err = registry
            .parse(&argv(&["getAlert", "--bogus", "1"]))
            .err()
            .unwrap();
        match err {
            LampError::Usage { error, usage } => {
                assert_eq!(error.kind(), ErrorKind::UnknownArgument);
                assert!(error.to_string().contains("--bogus"));
                assert!(usage.contains("--alertId"));
                assert!(usage.contains("--apiKey"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_help_and_version_are_display() {
        let registry = sample();

        for args in [vec!["help"], vec!["--help"], vec!["-h"]] {
            match registry.parse(&argv(&args)).unwrap() {
                Parsed::Display(text) => assert!(text.contains("getAlert")),
                Parsed::Run { .. } => panic!("expected help text"),
            }
        }

        match registry.parse(&argv(&["help", "getAlert"])).unwrap() {
            Parsed::Display(text) => assert!(text.contains("--alertId")),
            Parsed::Run { .. } => panic!("expected command help"),
        }

        match registry.parse(&argv(&["getAlert", "--help"])).unwrap() {
            Parsed::Display(text) => assert!(text.contains("--alias")),
            Parsed::Run { .. } => panic!("expected command help"),
        }

        match registry.parse(&argv(&["--version"])).unwrap() {
            Parsed::Display(text) => assert_eq!(text, format!("lamp version {VERSION}\n")),
            Parsed::Run { .. } => panic!("expected version"),
        }
    }

    #[test]
    fn test_help_for_unknown_command() {
        let registry = sample();
        assert!(matches!(
            registry.parse(&argv(&["help", "nope"])),
            Err(LampError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn test_normalize_token() {
        let longs = HashSet::from(["alertId", "apiKey"]);
        let shorts = HashSet::from(["v", "D"]);

        assert_eq!(normalize_token("-alertId", &longs, &shorts), "--alertId");
        assert_eq!(normalize_token("-apiKey=k", &longs, &shorts), "--apiKey=k");
        assert_eq!(normalize_token("--v", &longs, &shorts), "-v");
        assert_eq!(normalize_token("-D", &longs, &shorts), "-D");
        assert_eq!(normalize_token("--alertId", &longs, &shorts), "--alertId");
        assert_eq!(normalize_token("-unknown", &longs, &shorts), "-unknown");
        assert_eq!(normalize_token("disk full", &longs, &shorts), "disk full");
        assert_eq!(normalize_token("-", &longs, &shorts), "-");
    }

    #[test]
    fn test_values_that_spell_flags_are_kept() {
        let registry = crate::commands::registry();

        let invocation = run(
            &registry,
            &[
                "createAlert",
                "--message",
                "-alias",
                "--description",
                "--v",
                "-note",
                "-source",
                "-source",
                "api",
            ],
        );
        assert_eq!(invocation.supplied("message"), Some("-alias"));
        assert_eq!(invocation.supplied("description"), Some("--v"));
        assert_eq!(invocation.supplied("note"), Some("-source"));
        assert_eq!(invocation.supplied("source"), Some("api"));
        assert_eq!(invocation.supplied("alias"), None);
        assert!(!invocation.switch("v"));
    }

    #[test]
    fn test_list_values_that_spell_flags_are_kept() {
        let registry = sample();
        let invocation = run(&registry, &["getAlert", "-D", "-alias", "--tags", "--v", "-v"]);
        assert_eq!(invocation.list("D"), vec!["-alias"]);
        assert_eq!(invocation.list("tags"), vec!["--v"]);
        assert!(invocation.switch("v"));
    }

    #[test]
    fn test_normalize_skips_flag_values() {
        let flags = [
            FlagSpec::text(&["message"], "Message"),
            FlagSpec::text(&["alias"], "Alias"),
            FlagSpec::switch(&["v"], "Verbose"),
            FlagSpec::list(&["D"], "Details"),
        ];
        let raw: Vec<String> = [
            "-message", "-alias", "-alias=x", "-v", "-D", "--v", "--v", "-message=a", "-alias",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(
            normalize_args(flags.iter(), &raw),
            vec!["--message", "-alias", "--alias=x", "-v", "-D", "--v", "-v", "--message=a", "--alias"]
        );
    }

    #[test]
    fn test_normalize_stops_at_separator() {
        let flags = [FlagSpec::text(&["alias"], "Alias")];
        let raw: Vec<String> = ["-alias", "x", "--", "-alias"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            normalize_args(flags.iter(), &raw),
            vec!["--alias", "x", "--", "-alias"]
        );
    }
}
