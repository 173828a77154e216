//! Flag groups shared between commands.

use opsgenie_lamp_output::OutputFormat;

use crate::registry::FlagSpec;

pub const ALERT_ID: &str = "alertId";
pub const ALIAS: &str = "alias";
pub const TINY_ID: &str = "tinyId";
pub const OUTPUT_FORMAT: &str = "output-format";
pub const PRETTY: &str = "pretty";

/// Flags every command accepts.
pub fn global() -> Vec<FlagSpec> {
    vec![
        FlagSpec::switch(&["v"], "Execute commands in verbose mode"),
        FlagSpec::text(
            &["apiKey"],
            "API key used for authenticating API requests. If not given, OPSGENIE_API_KEY or the api key in the config file is used",
        ),
        FlagSpec::text(&["user"], "Owner of the execution"),
        FlagSpec::text(&["config"], "Configuration file path"),
    ]
}

/// Identifies an alert. `subject` completes "Id of the alert ...".
pub fn alert_target(subject: &str) -> Vec<FlagSpec> {
    vec![
        FlagSpec::text(
            &["alertId", "id"],
            format!("Id of the alert {subject}. Either id, alias or tinyId must be provided"),
        ),
        FlagSpec::text(
            &["alias"],
            format!("Alias of the alert {subject}. Either id, alias or tinyId must be provided"),
        ),
        FlagSpec::text(
            &["tinyId"],
            format!("Short id of the alert {subject}. Either id, alias or tinyId must be provided"),
        ),
    ]
}

pub fn note_source() -> Vec<FlagSpec> {
    vec![
        FlagSpec::text(&["note"], "Additional alert note"),
        FlagSpec::text(&["source"], "Source of the action"),
    ]
}

pub fn output() -> Vec<FlagSpec> {
    vec![
        FlagSpec::text(&["output-format"], "Prints the output in json or yaml formats")
            .with_default("json")
            .with_choices(&OutputFormat::NAMES),
        FlagSpec::switch(&["pretty"], "For more readable JSON output"),
    ]
}

pub fn time_window() -> Vec<FlagSpec> {
    vec![
        FlagSpec::text(
            &["createdAfter"],
            "Unix timestamp. Only alerts created after this time are returned",
        ),
        FlagSpec::text(
            &["createdBefore"],
            "Unix timestamp. Only alerts created before this time are returned",
        ),
        FlagSpec::text(
            &["updatedAfter"],
            "Unix timestamp. Only alerts updated after this time are returned",
        ),
        FlagSpec::text(
            &["updatedBefore"],
            "Unix timestamp. Only alerts updated before this time are returned",
        ),
    ]
}

pub fn status_filter() -> Vec<FlagSpec> {
    vec![
        FlagSpec::text(
            &["limit"],
            "Page size. Default is 20. Max value for this parameter is 100",
        ),
        FlagSpec::text(
            &["status"],
            "Only alerts with this status. One of open, acked, unacked, seen, notseen, closed",
        ),
    ]
}

pub fn tag_filter() -> Vec<FlagSpec> {
    vec![
        FlagSpec::comma_list(&["tags"], "A comma separated list of labels attached to the alert"),
        FlagSpec::text(
            &["tagsOperator"],
            "How tags are combined when filtering. Accepted values: and/or, default: and",
        ),
    ]
}

pub fn paging() -> Vec<FlagSpec> {
    vec![
        FlagSpec::text(&["limit"], "Page size. Default is 100"),
        FlagSpec::text(&["order"], "asc/desc, default: desc"),
        FlagSpec::text(&["lastKey"], "Key which will be used in pagination"),
    ]
}

pub fn details() -> FlagSpec {
    FlagSpec::list(&["D"], "Additional alert properties. Syntax: -D key=value")
}
