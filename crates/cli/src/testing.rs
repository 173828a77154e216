//! Test doubles: a recording stand-in for the OpsGenie client and helpers
//! that drive a command line through the registry.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use opsgenie_lamp_api::alert::{
    ActionResponse, AddDetailsRequest, AddRecipientRequest, AddTeamRequest, Alert,
    AlertActionRequest, AlertCount, AlertHistoryRequest, AlertList, AlertLogs, AlertNotes,
    AlertRecipients, AssignOwnerRequest, AttachFileRequest, CloseAlertRequest,
    CountAlertsRequest, CreateAlertRequest, CreateAlertResponse, DeleteAlertRequest,
    EscalateToNextRequest, ExecuteActionRequest, GetAlertRequest, ListAlertsRequest,
    RemoveDetailsRequest, RenotifyRequest, SnoozeRequest, TagsRequest,
};
use opsgenie_lamp_api::customer_log::{
    ListLogsRequest, ListLogsResponse, LogLinkRequest, LogLinkResponse,
};
use opsgenie_lamp_api::error::{ApiError, Result};
use opsgenie_lamp_api::integration::{
    HeartbeatRequest, HeartbeatResponse, ResourceKind, ToggleRequest,
};
use opsgenie_lamp_api::user::{ListUsersRequest, UserList};
use opsgenie_lamp_api::OpsgenieApi;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::commands::{self, Call};
use crate::dispatch::{self, Connector, Session};
use crate::error::LampError;
use crate::invocation::GlobalOptions;
use crate::registry::Parsed;

type Shared<T> = Arc<Mutex<T>>;

/// Records every call and answers each with the same canned JSON document.
struct StubApi {
    calls: Shared<Vec<Call>>,
    response: Value,
    failure: Shared<Option<ApiError>>,
}

impl StubApi {
    fn answer<T: DeserializeOwned>(&self, call: Call) -> Result<T> {
        self.calls.lock().unwrap().push(call);
        if let Some(err) = self.failure.lock().unwrap().take() {
            return Err(err);
        }
        Ok(serde_json::from_value(self.response.clone())?)
    }
}

#[async_trait]
impl OpsgenieApi for StubApi {
    async fn create_alert(&self, request: &CreateAlertRequest) -> Result<CreateAlertResponse> {
        self.answer(Call::CreateAlert(request.clone()))
    }

    async fn get_alert(&self, request: &GetAlertRequest) -> Result<Alert> {
        self.answer(Call::GetAlert(request.clone()))
    }

    async fn list_alerts(&self, request: &ListAlertsRequest) -> Result<AlertList> {
        self.answer(Call::ListAlerts(request.clone()))
    }

    async fn count_alerts(&self, request: &CountAlertsRequest) -> Result<AlertCount> {
        self.answer(Call::CountAlerts(request.clone()))
    }

    async fn list_alert_notes(&self, request: &AlertHistoryRequest) -> Result<AlertNotes> {
        self.answer(Call::ListAlertNotes(request.clone()))
    }

    async fn list_alert_logs(&self, request: &AlertHistoryRequest) -> Result<AlertLogs> {
        self.answer(Call::ListAlertLogs(request.clone()))
    }

    async fn list_alert_recipients(&self, request: &GetAlertRequest) -> Result<AlertRecipients> {
        self.answer(Call::ListAlertRecipients(request.clone()))
    }

    async fn close_alert(&self, request: &CloseAlertRequest) -> Result<ActionResponse> {
        self.answer(Call::CloseAlert(request.clone()))
    }

    async fn delete_alert(&self, request: &DeleteAlertRequest) -> Result<ActionResponse> {
        self.answer(Call::DeleteAlert(request.clone()))
    }

    async fn acknowledge(&self, request: &AlertActionRequest) -> Result<ActionResponse> {
        self.answer(Call::Acknowledge(request.clone()))
    }

    async fn unacknowledge(&self, request: &AlertActionRequest) -> Result<ActionResponse> {
        self.answer(Call::Unacknowledge(request.clone()))
    }

    async fn snooze(&self, request: &SnoozeRequest) -> Result<ActionResponse> {
        self.answer(Call::Snooze(request.clone()))
    }

    async fn renotify(&self, request: &RenotifyRequest) -> Result<ActionResponse> {
        self.answer(Call::Renotify(request.clone()))
    }

    async fn take_ownership(&self, request: &AlertActionRequest) -> Result<ActionResponse> {
        self.answer(Call::TakeOwnership(request.clone()))
    }

    async fn assign_owner(&self, request: &AssignOwnerRequest) -> Result<ActionResponse> {
        self.answer(Call::AssignOwner(request.clone()))
    }

    async fn add_team(&self, request: &AddTeamRequest) -> Result<ActionResponse> {
        self.answer(Call::AddTeam(request.clone()))
    }

    async fn add_recipient(&self, request: &AddRecipientRequest) -> Result<ActionResponse> {
        self.answer(Call::AddRecipient(request.clone()))
    }

    async fn add_note(&self, request: &AlertActionRequest) -> Result<ActionResponse> {
        self.answer(Call::AddNote(request.clone()))
    }

    async fn add_tags(&self, request: &TagsRequest) -> Result<ActionResponse> {
        self.answer(Call::AddTags(request.clone()))
    }

    async fn remove_tags(&self, request: &TagsRequest) -> Result<ActionResponse> {
        self.answer(Call::RemoveTags(request.clone()))
    }

    async fn add_details(&self, request: &AddDetailsRequest) -> Result<ActionResponse> {
        self.answer(Call::AddDetails(request.clone()))
    }

    async fn remove_details(&self, request: &RemoveDetailsRequest) -> Result<ActionResponse> {
        self.answer(Call::RemoveDetails(request.clone()))
    }

    async fn execute_action(&self, request: &ExecuteActionRequest) -> Result<ActionResponse> {
        self.answer(Call::ExecuteAction(request.clone()))
    }

    async fn escalate_to_next(&self, request: &EscalateToNextRequest) -> Result<ActionResponse> {
        self.answer(Call::EscalateToNext(request.clone()))
    }

    async fn attach_file(&self, request: &AttachFileRequest) -> Result<ActionResponse> {
        self.answer(Call::AttachFile(request.clone()))
    }

    async fn send_heartbeat(&self, request: &HeartbeatRequest) -> Result<HeartbeatResponse> {
        self.answer(Call::Heartbeat(request.clone()))
    }

    async fn enable(&self, kind: ResourceKind, request: &ToggleRequest) -> Result<ActionResponse> {
        self.answer(Call::Enable(kind, request.clone()))
    }

    async fn disable(
        &self,
        kind: ResourceKind,
        request: &ToggleRequest,
    ) -> Result<ActionResponse> {
        self.answer(Call::Disable(kind, request.clone()))
    }

    async fn list_logs(&self, request: &ListLogsRequest) -> Result<ListLogsResponse> {
        self.answer(Call::ListLogs(request.clone()))
    }

    async fn get_log_link(&self, request: &LogLinkRequest) -> Result<LogLinkResponse> {
        self.answer(Call::GetLogLink(request.clone()))
    }

    async fn list_users(&self, request: &ListUsersRequest) -> Result<UserList> {
        self.answer(Call::ListUsers(request.clone()))
    }
}

/// Hands out [`StubApi`] sessions that share one call log.
pub struct StubConnector {
    calls: Shared<Vec<Call>>,
    response: Value,
    failure: Shared<Option<ApiError>>,
    connect_error: Option<String>,
    user: Option<String>,
}

impl StubConnector {
    pub fn responding(response: Value) -> Self {
        Self {
            calls: Arc::default(),
            response,
            failure: Arc::default(),
            connect_error: None,
            user: None,
        }
    }

    /// Every call fails with `err`.
    pub fn failing(err: ApiError) -> Self {
        let connector = Self::responding(Value::Null);
        *connector.failure.lock().unwrap() = Some(err);
        connector
    }

    /// Client construction itself fails.
    pub fn unreachable(message: &str) -> Self {
        Self {
            connect_error: Some(message.to_string()),
            ..Self::responding(Value::Null)
        }
    }

    /// The user a config file would provide.
    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Connector for StubConnector {
    fn connect(&self, globals: &GlobalOptions) -> anyhow::Result<Session> {
        if let Some(message) = &self.connect_error {
            anyhow::bail!("{message}");
        }

        Ok(Session {
            client: Box::new(StubApi {
                calls: Arc::clone(&self.calls),
                response: self.response.clone(),
                failure: Arc::clone(&self.failure),
            }),
            user: globals.user.clone().or_else(|| self.user.clone()),
        })
    }
}

fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("lamp")
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect()
}

/// Parses `args` (without the program name) and binds the selected command.
pub fn bind(args: &[&str]) -> std::result::Result<Call, LampError> {
    bind_inner(args, None)
}

/// Like [`bind`], with `user` standing in for the user from the config file.
pub fn bind_with_user(args: &[&str], user: &str) -> std::result::Result<Call, LampError> {
    bind_inner(args, Some(user.to_string()))
}

fn bind_inner(args: &[&str], user: Option<String>) -> std::result::Result<Call, LampError> {
    let registry = commands::registry();
    let argv = argv(args);
    match registry.parse(&argv)? {
        Parsed::Run {
            descriptor,
            mut invocation,
        } => {
            invocation.set_default_user(user);
            descriptor.bind(&invocation)
        }
        Parsed::Display(text) => panic!("expected a command, got display output: {text}"),
    }
}

/// Runs `args` end to end against `connector` and returns what was printed.
pub async fn run(
    connector: &StubConnector,
    args: &[&str],
) -> std::result::Result<String, LampError> {
    let registry = commands::registry();
    let argv = argv(args);
    match registry.parse(&argv)? {
        Parsed::Display(text) => Ok(text),
        Parsed::Run {
            descriptor,
            invocation,
        } => {
            let mut out = Vec::new();
            dispatch::execute(descriptor, invocation, connector, &mut out).await?;
            Ok(String::from_utf8(out).expect("output is UTF-8"))
        }
    }
}
