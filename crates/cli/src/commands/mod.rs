pub mod actions;
pub mod alerts;
pub mod customer_log;
pub mod flags;
pub mod integrations;
pub mod users;
mod utils;

use std::io::Write;

use anyhow::Context;
use opsgenie_lamp_api::alert::{
    AddDetailsRequest, AddRecipientRequest, AddTeamRequest, AlertActionRequest,
    AlertHistoryRequest, AssignOwnerRequest, AttachFileRequest, CloseAlertRequest,
    CountAlertsRequest, CreateAlertRequest, DeleteAlertRequest, EscalateToNextRequest,
    ExecuteActionRequest, GetAlertRequest, ListAlertsRequest, RemoveDetailsRequest,
    RenotifyRequest, SnoozeRequest, TagsRequest,
};
use opsgenie_lamp_api::customer_log::{ListLogsRequest, LogLinkRequest};
use opsgenie_lamp_api::integration::{HeartbeatRequest, ResourceKind, ToggleRequest};
use opsgenie_lamp_api::user::ListUsersRequest;
use opsgenie_lamp_api::OpsgenieApi;
use opsgenie_lamp_output::OutputRenderer;
use serde::Serialize;
use serde_json::Value;

use crate::error::LampError;
use crate::registry::Registry;

/// The full command table, in the order `lamp help` lists it.
pub fn registry() -> Registry {
    Registry::register(
        flags::global(),
        vec![
            alerts::create_alert(),
            alerts::get_alert(),
            actions::attach_file(),
            actions::acknowledge(),
            actions::renotify(),
            actions::take_ownership(),
            actions::assign(),
            actions::add_team(),
            actions::add_recipient(),
            actions::add_tags(),
            actions::add_note(),
            actions::execute_action(),
            alerts::close_alert(),
            alerts::delete_alert(),
            integrations::heartbeat(),
            integrations::enable(),
            integrations::disable(),
            alerts::list_alerts(),
            alerts::count_alerts(),
            alerts::list_alert_notes(),
            alerts::list_alert_logs(),
            alerts::list_alert_recipients(),
            actions::unacknowledge(),
            actions::snooze(),
            actions::remove_tags(),
            actions::add_details(),
            actions::remove_details(),
            actions::escalate_to_next(),
            customer_log::get_log_link(),
            customer_log::list_logs(),
            users::export_users(),
        ],
    )
}

/// A bound request: exactly one remote operation and its input.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateAlert(CreateAlertRequest),
    GetAlert(GetAlertRequest),
    ListAlerts(ListAlertsRequest),
    CountAlerts(CountAlertsRequest),
    ListAlertNotes(AlertHistoryRequest),
    ListAlertLogs(AlertHistoryRequest),
    ListAlertRecipients(GetAlertRequest),
    CloseAlert(CloseAlertRequest),
    DeleteAlert(DeleteAlertRequest),
    Acknowledge(AlertActionRequest),
    Unacknowledge(AlertActionRequest),
    Snooze(SnoozeRequest),
    Renotify(RenotifyRequest),
    TakeOwnership(AlertActionRequest),
    AssignOwner(AssignOwnerRequest),
    AddTeam(AddTeamRequest),
    AddRecipient(AddRecipientRequest),
    AddNote(AlertActionRequest),
    AddTags(TagsRequest),
    RemoveTags(TagsRequest),
    AddDetails(AddDetailsRequest),
    RemoveDetails(RemoveDetailsRequest),
    ExecuteAction(ExecuteActionRequest),
    EscalateToNext(EscalateToNextRequest),
    AttachFile(AttachFileRequest),
    Heartbeat(HeartbeatRequest),
    Enable(ResourceKind, ToggleRequest),
    Disable(ResourceKind, ToggleRequest),
    ListLogs(ListLogsRequest),
    GetLogLink(LogLinkRequest),
    ListUsers(ListUsersRequest),
}

impl Call {
    pub fn operation(&self) -> &'static str {
        match self {
            Call::CreateAlert(_) => "create_alert",
            Call::GetAlert(_) => "get_alert",
            Call::ListAlerts(_) => "list_alerts",
            Call::CountAlerts(_) => "count_alerts",
            Call::ListAlertNotes(_) => "list_alert_notes",
            Call::ListAlertLogs(_) => "list_alert_logs",
            Call::ListAlertRecipients(_) => "list_alert_recipients",
            Call::CloseAlert(_) => "close_alert",
            Call::DeleteAlert(_) => "delete_alert",
            Call::Acknowledge(_) => "acknowledge",
            Call::Unacknowledge(_) => "unacknowledge",
            Call::Snooze(_) => "snooze",
            Call::Renotify(_) => "renotify",
            Call::TakeOwnership(_) => "take_ownership",
            Call::AssignOwner(_) => "assign_owner",
            Call::AddTeam(_) => "add_team",
            Call::AddRecipient(_) => "add_recipient",
            Call::AddNote(_) => "add_note",
            Call::AddTags(_) => "add_tags",
            Call::RemoveTags(_) => "remove_tags",
            Call::AddDetails(_) => "add_details",
            Call::RemoveDetails(_) => "remove_details",
            Call::ExecuteAction(_) => "execute_action",
            Call::EscalateToNext(_) => "escalate_to_next",
            Call::AttachFile(_) => "attach_file",
            Call::Heartbeat(_) => "send_heartbeat",
            Call::Enable(..) => "enable",
            Call::Disable(..) => "disable",
            Call::ListLogs(_) => "list_logs",
            Call::GetLogLink(_) => "get_log_link",
            Call::ListUsers(_) => "list_users",
        }
    }

    /// Issues the single remote operation this call stands for.
    pub async fn invoke(&self, api: &dyn OpsgenieApi) -> Result<Reply, LampError> {
        match self {
            Call::CreateAlert(req) => Reply::document(&api.create_alert(req).await?),
            Call::GetAlert(req) => Reply::document(&api.get_alert(req).await?),
            Call::ListAlerts(req) => Reply::document(&api.list_alerts(req).await?),
            Call::CountAlerts(req) => Reply::document(&api.count_alerts(req).await?),
            Call::ListAlertNotes(req) => Reply::document(&api.list_alert_notes(req).await?),
            Call::ListAlertLogs(req) => Reply::document(&api.list_alert_logs(req).await?),
            Call::ListAlertRecipients(req) => {
                Reply::document(&api.list_alert_recipients(req).await?)
            }
            Call::CloseAlert(req) => Reply::document(&api.close_alert(req).await?),
            Call::DeleteAlert(req) => Reply::document(&api.delete_alert(req).await?),
            Call::Acknowledge(req) => Reply::document(&api.acknowledge(req).await?),
            Call::Unacknowledge(req) => Reply::document(&api.unacknowledge(req).await?),
            Call::Snooze(req) => Reply::document(&api.snooze(req).await?),
            Call::Renotify(req) => Reply::document(&api.renotify(req).await?),
            Call::TakeOwnership(req) => Reply::document(&api.take_ownership(req).await?),
            Call::AssignOwner(req) => Reply::document(&api.assign_owner(req).await?),
            Call::AddTeam(req) => Reply::document(&api.add_team(req).await?),
            Call::AddRecipient(req) => Reply::document(&api.add_recipient(req).await?),
            Call::AddNote(req) => Reply::document(&api.add_note(req).await?),
            Call::AddTags(req) => Reply::document(&api.add_tags(req).await?),
            Call::RemoveTags(req) => Reply::document(&api.remove_tags(req).await?),
            Call::AddDetails(req) => Reply::document(&api.add_details(req).await?),
            Call::RemoveDetails(req) => Reply::document(&api.remove_details(req).await?),
            Call::ExecuteAction(req) => Reply::document(&api.execute_action(req).await?),
            Call::EscalateToNext(req) => Reply::document(&api.escalate_to_next(req).await?),
            Call::AttachFile(req) => Reply::document(&api.attach_file(req).await?),
            Call::Heartbeat(req) => Reply::document(&api.send_heartbeat(req).await?),
            Call::Enable(kind, req) => Reply::document(&api.enable(*kind, req).await?),
            Call::Disable(kind, req) => Reply::document(&api.disable(*kind, req).await?),
            Call::ListLogs(req) => {
                let response = api.list_logs(req).await?;
                Ok(Reply::Line(response.downloadables.join(", ")))
            }
            Call::GetLogLink(req) => {
                let response = api.get_log_link(req).await?;
                Ok(Reply::Line(format!("URL={}", response.url)))
            }
            Call::ListUsers(req) => Reply::document(&api.list_users(req).await?),
        }
    }
}

/// What a successful call prints.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Rendered as JSON or YAML.
    Document(Value),
    /// Printed as is.
    Line(String),
}

impl Reply {
    fn document<T: Serialize>(response: &T) -> Result<Self, LampError> {
        serde_json::to_value(response)
            .map(Reply::Document)
            .map_err(|err| LampError::Output(err.into()))
    }

    pub fn write(&self, renderer: &OutputRenderer, out: &mut dyn Write) -> Result<(), LampError> {
        match self {
            Reply::Document(value) => renderer.render_to(out, value).map_err(LampError::Output),
            Reply::Line(line) => writeln!(out, "{line}")
                .and_then(|_| out.flush())
                .context("Unable to write to stdout")
                .map_err(LampError::Output),
        }
    }
}
