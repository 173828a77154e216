use std::collections::BTreeMap;

use opsgenie_lamp_api::alert::{ActionContext, AlertTarget};

use super::flags::{ALERT_ID, ALIAS, TINY_ID};
use crate::error::LampError;
use crate::invocation::Invocation;

/// Requires exactly one of `names` to be supplied and returns its name and
/// value.
pub(super) fn exactly_one<'a>(
    invocation: &'a Invocation,
    names: &[&'static str],
) -> Result<(&'static str, &'a str), LampError> {
    let supplied: Vec<(&'static str, &str)> = names
        .iter()
        .filter_map(|name| invocation.supplied(name).map(|value| (*name, value)))
        .collect();

    match supplied.as_slice() {
        [one] => Ok(*one),
        [] => Err(LampError::validation(format!(
            "Either {} must be provided",
            either(names)
        ))),
        many => Err(LampError::validation(format!(
            "Only one of {} can be provided, got {}",
            either(names),
            many.iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(" and ")
        ))),
    }
}

pub(super) fn required<'a>(invocation: &'a Invocation, name: &str) -> Result<&'a str, LampError> {
    invocation
        .supplied(name)
        .ok_or_else(|| LampError::validation(format!("{name} must be provided")))
}

pub(super) fn alert_target(invocation: &Invocation) -> Result<AlertTarget, LampError> {
    let target = match exactly_one(invocation, &[ALERT_ID, ALIAS, TINY_ID])? {
        (ALERT_ID, id) => AlertTarget::by_id(id),
        (ALIAS, alias) => AlertTarget::by_alias(alias),
        (_, tiny_id) => AlertTarget::by_tiny_id(tiny_id),
    };
    Ok(target)
}

pub(super) fn action_context(invocation: &Invocation) -> ActionContext {
    ActionContext {
        user: invocation.user(),
        note: invocation.string("note"),
        source: invocation.string("source"),
    }
}

/// Collects `-D key=value` entries. Later keys replace earlier ones.
pub(super) fn details(invocation: &Invocation) -> Result<BTreeMap<String, String>, LampError> {
    invocation
        .list("D")
        .into_iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(LampError::validation(format!(
                "Invalid detail '{entry}'. Expected the form key=value"
            ))),
        })
        .collect()
}

/// "a or b", "a, b or c".
fn either(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_either() {
        assert_eq!(either(&["alertId"]), "alertId");
        assert_eq!(either(&["id", "name"]), "id or name");
        assert_eq!(either(&["alertId", "alias", "tinyId"]), "alertId, alias or tinyId");
    }
}
