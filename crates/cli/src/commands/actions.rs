//! Commands that act on one existing alert. They all take an alert
//! identifier plus an optional note and source.

use std::path::PathBuf;

use opsgenie_lamp_api::alert::{
    AddDetailsRequest, AddRecipientRequest, AddTeamRequest, AlertActionRequest,
    AssignOwnerRequest, AttachFileRequest, EscalateToNextRequest, ExecuteActionRequest,
    RemoveDetailsRequest, RenotifyRequest, SnoozeRequest, TagsRequest,
};

use super::flags;
use super::utils::{action_context, alert_target, details, exactly_one, required};
use super::Call;
use crate::error::LampError;
use crate::invocation::Invocation;
use crate::registry::{CommandDescriptor, FlagSpec};

fn simple_action(invocation: &Invocation) -> Result<AlertActionRequest, LampError> {
    Ok(AlertActionRequest {
        target: alert_target(invocation)?,
        context: action_context(invocation),
    })
}

pub fn acknowledge() -> CommandDescriptor {
    CommandDescriptor::new("acknowledge", "Acknowledges an alert at OpsGenie", |invocation| {
        Ok(Call::Acknowledge(simple_action(invocation)?))
    })
    .flags(flags::alert_target("that will be acknowledged"))
    .flags(flags::note_source())
}

pub fn unacknowledge() -> CommandDescriptor {
    CommandDescriptor::new(
        "unacknowledge",
        "Unacknowledges an alert at OpsGenie",
        |invocation| Ok(Call::Unacknowledge(simple_action(invocation)?)),
    )
    .flags(flags::alert_target("that will be unacknowledged"))
    .flags(flags::note_source())
}

pub fn take_ownership() -> CommandDescriptor {
    CommandDescriptor::new(
        "takeOwnership",
        "Takes the ownership of an alert at OpsGenie",
        |invocation| Ok(Call::TakeOwnership(simple_action(invocation)?)),
    )
    .flags(flags::alert_target("that will be owned"))
    .flags(flags::note_source())
}

pub fn add_note() -> CommandDescriptor {
    CommandDescriptor::new("addNote", "Adds a user comment for an alert", |invocation| {
        Ok(Call::AddNote(simple_action(invocation)?))
    })
    .flags(flags::alert_target("that the note will be added to"))
    .flag(FlagSpec::text(&["note"], "Note text"))
    .flag(FlagSpec::text(&["source"], "Source of the action"))
}

pub fn attach_file() -> CommandDescriptor {
    CommandDescriptor::new("attachFile", "Attaches files to an alert", bind_attach_file)
        .flags(flags::alert_target("that the file will be attached to"))
        .flag(FlagSpec::text(
            &["attachment"],
            "Absolute or relative path to the file",
        ))
        .flag(FlagSpec::text(
            &["indexFile"],
            "Name of the file inside an attached archive to show as the entry page",
        ))
        .flags(flags::note_source())
}

fn bind_attach_file(invocation: &Invocation) -> Result<Call, LampError> {
    let target = alert_target(invocation)?;
    let attachment = PathBuf::from(required(invocation, "attachment")?);
    if !attachment.is_file() {
        return Err(LampError::validation(format!(
            "Attachment {} does not exist or is not a file",
            attachment.display()
        )));
    }

    Ok(Call::AttachFile(AttachFileRequest {
        target,
        attachment,
        index_file: invocation.string("indexFile"),
        context: action_context(invocation),
    }))
}

pub fn renotify() -> CommandDescriptor {
    CommandDescriptor::new("renotify", "Renotifies recipients at OpsGenie", |invocation| {
        Ok(Call::Renotify(RenotifyRequest {
            target: alert_target(invocation)?,
            recipients: invocation.list("recipients"),
            context: action_context(invocation),
        }))
    })
    .flags(flags::alert_target("that recipients will be renotified for"))
    .flag(FlagSpec::comma_list(
        &["recipients"],
        "The user names of individual users or names of groups that will be renotified",
    ))
    .flags(flags::note_source())
}

pub fn assign() -> CommandDescriptor {
    CommandDescriptor::new(
        "assign",
        "Assigns the ownership of an alert to the specified user",
        |invocation| {
            Ok(Call::AssignOwner(AssignOwnerRequest {
                target: alert_target(invocation)?,
                owner: invocation.string("owner"),
                context: action_context(invocation),
            }))
        },
    )
    .flags(flags::alert_target("that will be assigned"))
    .flag(FlagSpec::text(
        &["owner"],
        "The user who will be the owner of the alert after the execution",
    ))
    .flags(flags::note_source())
}

pub fn add_team() -> CommandDescriptor {
    CommandDescriptor::new("addTeam", "Adds a new team to an alert", |invocation| {
        Ok(Call::AddTeam(AddTeamRequest {
            target: alert_target(invocation)?,
            team: invocation.string("team"),
            context: action_context(invocation),
        }))
    })
    .flags(flags::alert_target("that the team will be added to"))
    .flag(FlagSpec::text(&["team"], "The team that will be added to the alert"))
    .flags(flags::note_source())
}

pub fn add_recipient() -> CommandDescriptor {
    CommandDescriptor::new("addRecipient", "Adds a new recipient to an alert", |invocation| {
        Ok(Call::AddRecipient(AddRecipientRequest {
            target: alert_target(invocation)?,
            recipient: invocation.string("recipient"),
            context: action_context(invocation),
        }))
    })
    .flags(flags::alert_target("that the recipient will be added to"))
    .flag(FlagSpec::text(
        &["recipient"],
        "The recipient that will be added to the alert",
    ))
    .flags(flags::note_source())
}

fn tags(invocation: &Invocation) -> Result<TagsRequest, LampError> {
    Ok(TagsRequest {
        target: alert_target(invocation)?,
        tags: invocation.list("tags"),
        context: action_context(invocation),
    })
}

pub fn add_tags() -> CommandDescriptor {
    CommandDescriptor::new("addTags", "Adds tags to an alert", |invocation| {
        Ok(Call::AddTags(tags(invocation)?))
    })
    .flags(flags::alert_target("that the tags will be added to"))
    .flag(FlagSpec::comma_list(
        &["tags"],
        "A comma separated list of labels attached to the alert",
    ))
    .flags(flags::note_source())
}

pub fn remove_tags() -> CommandDescriptor {
    CommandDescriptor::new("removeTags", "Removes tags from an alert at OpsGenie", |invocation| {
        Ok(Call::RemoveTags(tags(invocation)?))
    })
    .flags(flags::alert_target("that the tags will be removed from"))
    .flag(FlagSpec::comma_list(
        &["tags"],
        "A comma separated list of labels to remove from the alert",
    ))
    .flags(flags::note_source())
}

pub fn add_details() -> CommandDescriptor {
    CommandDescriptor::new("addDetails", "Adds details to an alert at OpsGenie", |invocation| {
        Ok(Call::AddDetails(AddDetailsRequest {
            target: alert_target(invocation)?,
            details: details(invocation)?,
            context: action_context(invocation),
        }))
    })
    .flags(flags::alert_target("that the details will be added to"))
    .flags(flags::note_source())
    .flag(flags::details())
}

pub fn remove_details() -> CommandDescriptor {
    CommandDescriptor::new(
        "removeDetails",
        "Removes details from an alert at OpsGenie",
        |invocation| {
            Ok(Call::RemoveDetails(RemoveDetailsRequest {
                target: alert_target(invocation)?,
                keys: invocation.list("keys"),
                context: action_context(invocation),
            }))
        },
    )
    .flags(flags::alert_target("that the details will be removed from"))
    .flag(FlagSpec::comma_list(
        &["keys"],
        "Set of properties to be removed from alert details",
    ))
    .flags(flags::note_source())
}

pub fn execute_action() -> CommandDescriptor {
    CommandDescriptor::new("executeAction", "Executes alert actions at OpsGenie", |invocation| {
        Ok(Call::ExecuteAction(ExecuteActionRequest {
            target: alert_target(invocation)?,
            action: invocation.string("action"),
            context: action_context(invocation),
        }))
    })
    .flags(flags::alert_target("that the action will be executed on"))
    .flag(FlagSpec::text(&["action"], "Action to execute"))
    .flags(flags::note_source())
}

pub fn snooze() -> CommandDescriptor {
    CommandDescriptor::new("snooze", "Snoozes an alert at OpsGenie", |invocation| {
        Ok(Call::Snooze(SnoozeRequest {
            target: alert_target(invocation)?,
            end_date: invocation.string("endDate"),
            timezone: invocation.string("timezone"),
            context: action_context(invocation),
        }))
    })
    .flags(flags::alert_target("that will be snoozed"))
    .flag(FlagSpec::text(&["endDate"], "The date and time snooze will end"))
    .flag(FlagSpec::text(&["timezone"], "Timezone of the endDate parameter"))
    .flags(flags::note_source())
}

pub fn escalate_to_next() -> CommandDescriptor {
    CommandDescriptor::new(
        "escalateToNext",
        "Escalates to the next rule in the specified escalation at OpsGenie",
        bind_escalate_to_next,
    )
    .flags(flags::alert_target("that will be escalated"))
    .flag(FlagSpec::text(
        &["escalationId"],
        "Id of the escalation. Either escalationId or escalationName must be provided",
    ))
    .flag(FlagSpec::text(
        &["escalationName"],
        "Name of the escalation. Either escalationId or escalationName must be provided",
    ))
    .flags(flags::note_source())
}

fn bind_escalate_to_next(invocation: &Invocation) -> Result<Call, LampError> {
    let target = alert_target(invocation)?;
    let mut request = EscalateToNextRequest {
        target,
        context: action_context(invocation),
        ..Default::default()
    };

    match exactly_one(invocation, &["escalationId", "escalationName"])? {
        ("escalationId", id) => request.escalation_id = Some(id.to_string()),
        (_, name) => request.escalation_name = Some(name.to_string()),
    }
    Ok(Call::EscalateToNext(request))
}
