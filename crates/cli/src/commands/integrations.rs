//! Heartbeats and enabling or disabling integrations and alert policies.

use opsgenie_lamp_api::integration::{HeartbeatRequest, ResourceKind, ToggleRequest};

use super::utils::{exactly_one, required};
use super::Call;
use crate::error::LampError;
use crate::invocation::Invocation;
use crate::registry::{CommandDescriptor, FlagSpec};

const RESOURCE_KINDS: &[&str] = &["integration", "policy"];

pub fn heartbeat() -> CommandDescriptor {
    CommandDescriptor::new("heartbeat", "Sends heartbeat to OpsGenie", |invocation| {
        Ok(Call::Heartbeat(HeartbeatRequest {
            name: invocation.string("name"),
        }))
    })
    .flag(FlagSpec::text(&["name"], "Name of the heartbeat on OpsGenie"))
}

pub fn enable() -> CommandDescriptor {
    CommandDescriptor::new(
        "enable",
        "Enables OpsGenie Integration and Policy",
        |invocation| {
            let (kind, request) = toggle(invocation)?;
            Ok(Call::Enable(kind, request))
        },
    )
    .flags(toggle_flags("enabled"))
}

pub fn disable() -> CommandDescriptor {
    CommandDescriptor::new(
        "disable",
        "Disables OpsGenie Integration and Policy",
        |invocation| {
            let (kind, request) = toggle(invocation)?;
            Ok(Call::Disable(kind, request))
        },
    )
    .flags(toggle_flags("disabled"))
}

fn toggle_flags(verb: &str) -> Vec<FlagSpec> {
    vec![
        FlagSpec::text(
            &["id"],
            format!(
                "Id of the integration/policy that will be {verb}. Either id or name must be provided"
            ),
        ),
        FlagSpec::text(
            &["name"],
            format!(
                "Name of the integration/policy that will be {verb}. Either id or name must be provided"
            ),
        ),
        FlagSpec::text(&["type"], "integration or policy").with_choices(RESOURCE_KINDS),
    ]
}

fn toggle(invocation: &Invocation) -> Result<(ResourceKind, ToggleRequest), LampError> {
    let kind = required(invocation, "type")?
        .parse::<ResourceKind>()
        .map_err(LampError::Validation)?;

    let request = match exactly_one(invocation, &["id", "name"])? {
        ("id", id) => ToggleRequest {
            id: Some(id.to_string()),
            name: None,
        },
        (_, name) => ToggleRequest {
            id: None,
            name: Some(name.to_string()),
        },
    };
    Ok((kind, request))
}
