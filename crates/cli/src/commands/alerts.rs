//! Commands that create, read, list and remove alerts.

use opsgenie_lamp_api::alert::{
    AlertHistoryRequest, CloseAlertRequest, CountAlertsRequest, CreateAlertRequest,
    DeleteAlertRequest, GetAlertRequest, ListAlertsRequest,
};

use super::flags::{self, ALERT_ID};
use super::utils::{action_context, alert_target, details, required};
use super::Call;
use crate::error::LampError;
use crate::invocation::Invocation;
use crate::registry::{CommandDescriptor, FlagSpec};

pub fn create_alert() -> CommandDescriptor {
    CommandDescriptor::new("createAlert", "Creates an alert at OpsGenie", bind_create_alert)
        .flag(FlagSpec::text(&["message"], "Alert text limited to 130 characters"))
        .flag(FlagSpec::comma_list(
            &["recipients"],
            "The user names of individual users or names of groups",
        ))
        .flag(FlagSpec::comma_list(&["teams"], "A comma separated list of teams"))
        .flag(FlagSpec::text(
            &["alias"],
            "A user defined identifier for the alert. Only one open alert can have a given alias",
        ))
        .flag(FlagSpec::comma_list(
            &["actions"],
            "A comma separated list of actions that can be executed",
        ))
        .flag(FlagSpec::text(
            &["source"],
            "Source of the alert. Defaults to the IP address of the incoming request",
        ))
        .flag(FlagSpec::comma_list(
            &["tags"],
            "A comma separated list of labels attached to the alert",
        ))
        .flag(FlagSpec::text(
            &["description"],
            "Alert text in long form. Unlike the message field, not limited to 130 characters",
        ))
        .flag(FlagSpec::text(&["entity"], "The entity the alert is related to"))
        .flag(FlagSpec::text(&["note"], "Additional alert note"))
        .flag(FlagSpec::text(&["priority"], "Priority of the alert, P1 to P5"))
        .flag(flags::details())
}

fn bind_create_alert(invocation: &Invocation) -> Result<Call, LampError> {
    Ok(Call::CreateAlert(CreateAlertRequest {
        message: invocation.string("message"),
        recipients: invocation.list("recipients"),
        teams: invocation.list("teams"),
        alias: invocation.string("alias"),
        actions: invocation.list("actions"),
        source: invocation.string("source"),
        tags: invocation.list("tags"),
        description: invocation.string("description"),
        entity: invocation.string("entity"),
        priority: invocation.string("priority"),
        user: invocation.user(),
        note: invocation.string("note"),
        details: details(invocation)?,
    }))
}

pub fn get_alert() -> CommandDescriptor {
    CommandDescriptor::new("getAlert", "Gets an alert content from OpsGenie", |invocation| {
        Ok(Call::GetAlert(GetAlertRequest {
            target: alert_target(invocation)?,
        }))
    })
    .flags(flags::alert_target("that will be retrieved"))
    .flags(flags::output())
}

pub fn list_alerts() -> CommandDescriptor {
    CommandDescriptor::new("listAlerts", "Lists alerts from OpsGenie", bind_list_alerts)
        .flags(flags::time_window())
        .flags(flags::status_filter())
        .flag(FlagSpec::text(&["sortBy"], "createdAt or updatedAt, default is createdAt"))
        .flag(FlagSpec::text(&["order"], "asc/desc, default: desc"))
        .flag(FlagSpec::comma_list(&["teams"], "A comma separated list of teams"))
        .flags(flags::tag_filter())
        .flags(flags::output())
}

fn bind_list_alerts(invocation: &Invocation) -> Result<Call, LampError> {
    Ok(Call::ListAlerts(ListAlertsRequest {
        created_after: invocation.number("createdAfter")?,
        created_before: invocation.number("createdBefore")?,
        updated_after: invocation.number("updatedAfter")?,
        updated_before: invocation.number("updatedBefore")?,
        limit: invocation.number("limit")?,
        status: invocation.string("status"),
        sort_by: invocation.string("sortBy"),
        order: invocation.string("order"),
        teams: invocation.list("teams"),
        tags: invocation.list("tags"),
        tags_operator: invocation.string("tagsOperator"),
    }))
}

pub fn count_alerts() -> CommandDescriptor {
    CommandDescriptor::new("countAlerts", "Counts alerts at OpsGenie", bind_count_alerts)
        .flags(flags::time_window())
        .flags(flags::status_filter())
        .flags(flags::tag_filter())
}

fn bind_count_alerts(invocation: &Invocation) -> Result<Call, LampError> {
    Ok(Call::CountAlerts(CountAlertsRequest {
        created_after: invocation.number("createdAfter")?,
        created_before: invocation.number("createdBefore")?,
        updated_after: invocation.number("updatedAfter")?,
        updated_before: invocation.number("updatedBefore")?,
        limit: invocation.number("limit")?,
        status: invocation.string("status"),
        tags: invocation.list("tags"),
        tags_operator: invocation.string("tagsOperator"),
    }))
}

pub fn list_alert_notes() -> CommandDescriptor {
    CommandDescriptor::new("listAlertNotes", "Lists alert notes from OpsGenie", |invocation| {
        Ok(Call::ListAlertNotes(history(invocation)?))
    })
    .flags(flags::alert_target("whose notes will be listed"))
    .flags(flags::paging())
    .flags(flags::output())
}

pub fn list_alert_logs() -> CommandDescriptor {
    CommandDescriptor::new("listAlertLogs", "Lists alert logs from OpsGenie", |invocation| {
        Ok(Call::ListAlertLogs(history(invocation)?))
    })
    .flags(flags::alert_target("whose logs will be listed"))
    .flags(flags::paging())
    .flags(flags::output())
}

fn history(invocation: &Invocation) -> Result<AlertHistoryRequest, LampError> {
    Ok(AlertHistoryRequest {
        target: alert_target(invocation)?,
        limit: invocation.number("limit")?,
        order: invocation.string("order"),
        last_key: invocation.string("lastKey"),
    })
}

pub fn list_alert_recipients() -> CommandDescriptor {
    CommandDescriptor::new(
        "listAlertRecipients",
        "Lists alert recipients from OpsGenie",
        |invocation| {
            Ok(Call::ListAlertRecipients(GetAlertRequest {
                target: alert_target(invocation)?,
            }))
        },
    )
    .flags(flags::alert_target("whose recipients will be listed"))
    .flags(flags::output())
}

pub fn close_alert() -> CommandDescriptor {
    CommandDescriptor::new("closeAlert", "Closes an alert at OpsGenie", |invocation| {
        Ok(Call::CloseAlert(CloseAlertRequest {
            target: alert_target(invocation)?,
            notify: invocation.list("notify"),
            context: action_context(invocation),
        }))
    })
    .flags(flags::alert_target("that will be closed"))
    .flag(FlagSpec::comma_list(
        &["notify"],
        "Comma separated list of users and groups to notify. The special values all, recipients and owner are accepted",
    ))
    .flags(flags::note_source())
}

pub fn delete_alert() -> CommandDescriptor {
    CommandDescriptor::new("deleteAlert", "Deletes an alert at OpsGenie", |invocation| {
        Ok(Call::DeleteAlert(DeleteAlertRequest {
            id: Some(required(invocation, ALERT_ID)?.to_string()),
            user: invocation.user(),
            source: invocation.string("source"),
        }))
    })
    .flag(FlagSpec::text(&["alertId", "id"], "Id of the alert that will be deleted"))
    .flag(FlagSpec::text(&["source"], "Source of the action"))
}
