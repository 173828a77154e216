use async_trait::async_trait;

use crate::alert::{
    ActionResponse, AddDetailsRequest, AddRecipientRequest, AddTeamRequest, Alert,
    AlertActionRequest, AlertCount, AlertHistoryRequest, AlertList, AlertLogs, AlertNotes,
    AlertRecipients, AssignOwnerRequest, AttachFileRequest, CloseAlertRequest,
    CountAlertsRequest, CreateAlertRequest, CreateAlertResponse, DeleteAlertRequest,
    EscalateToNextRequest, ExecuteActionRequest, GetAlertRequest, ListAlertsRequest,
    RemoveDetailsRequest, RenotifyRequest, SnoozeRequest, TagsRequest,
};
use crate::customer_log::{ListLogsRequest, ListLogsResponse, LogLinkRequest, LogLinkResponse};
use crate::error::Result;
use crate::integration::{HeartbeatRequest, HeartbeatResponse, ResourceKind, ToggleRequest};
use crate::user::{ListUsersRequest, UserList};
use crate::OpsgenieClient;

const ALERT: &str = "/v1/json/alert";

/// Every remote operation the CLI can issue, one method per operation.
#[async_trait]
pub trait OpsgenieApi: Send + Sync {
    async fn create_alert(&self, request: &CreateAlertRequest) -> Result<CreateAlertResponse>;
    async fn get_alert(&self, request: &GetAlertRequest) -> Result<Alert>;
    async fn list_alerts(&self, request: &ListAlertsRequest) -> Result<AlertList>;
    async fn count_alerts(&self, request: &CountAlertsRequest) -> Result<AlertCount>;
    async fn list_alert_notes(&self, request: &AlertHistoryRequest) -> Result<AlertNotes>;
    async fn list_alert_logs(&self, request: &AlertHistoryRequest) -> Result<AlertLogs>;
    async fn list_alert_recipients(&self, request: &GetAlertRequest) -> Result<AlertRecipients>;
    async fn close_alert(&self, request: &CloseAlertRequest) -> Result<ActionResponse>;
    async fn delete_alert(&self, request: &DeleteAlertRequest) -> Result<ActionResponse>;
    async fn acknowledge(&self, request: &AlertActionRequest) -> Result<ActionResponse>;
    async fn unacknowledge(&self, request: &AlertActionRequest) -> Result<ActionResponse>;
    async fn snooze(&self, request: &SnoozeRequest) -> Result<ActionResponse>;
    async fn renotify(&self, request: &RenotifyRequest) -> Result<ActionResponse>;
    async fn take_ownership(&self, request: &AlertActionRequest) -> Result<ActionResponse>;
    async fn assign_owner(&self, request: &AssignOwnerRequest) -> Result<ActionResponse>;
    async fn add_team(&self, request: &AddTeamRequest) -> Result<ActionResponse>;
    async fn add_recipient(&self, request: &AddRecipientRequest) -> Result<ActionResponse>;
    async fn add_note(&self, request: &AlertActionRequest) -> Result<ActionResponse>;
    async fn add_tags(&self, request: &TagsRequest) -> Result<ActionResponse>;
    async fn remove_tags(&self, request: &TagsRequest) -> Result<ActionResponse>;
    async fn add_details(&self, request: &AddDetailsRequest) -> Result<ActionResponse>;
    async fn remove_details(&self, request: &RemoveDetailsRequest) -> Result<ActionResponse>;
    async fn execute_action(&self, request: &ExecuteActionRequest) -> Result<ActionResponse>;
    async fn escalate_to_next(&self, request: &EscalateToNextRequest) -> Result<ActionResponse>;
    async fn attach_file(&self, request: &AttachFileRequest) -> Result<ActionResponse>;
    async fn send_heartbeat(&self, request: &HeartbeatRequest) -> Result<HeartbeatResponse>;
    async fn enable(&self, kind: ResourceKind, request: &ToggleRequest) -> Result<ActionResponse>;
    async fn disable(&self, kind: ResourceKind, request: &ToggleRequest)
        -> Result<ActionResponse>;
    async fn list_logs(&self, request: &ListLogsRequest) -> Result<ListLogsResponse>;
    async fn get_log_link(&self, request: &LogLinkRequest) -> Result<LogLinkResponse>;
    async fn list_users(&self, request: &ListUsersRequest) -> Result<UserList>;
}

#[async_trait]
impl OpsgenieApi for OpsgenieClient {
    async fn create_alert(&self, request: &CreateAlertRequest) -> Result<CreateAlertResponse> {
        // OpsGenie deduplicates open alerts by alias.
        match request.alias {
            Some(_) => self.post(ALERT, request).await,
            None => self.post_once(ALERT, request).await,
        }
    }

    async fn get_alert(&self, request: &GetAlertRequest) -> Result<Alert> {
        self.get(ALERT, request).await
    }

    async fn list_alerts(&self, request: &ListAlertsRequest) -> Result<AlertList> {
        self.get(ALERT, request).await
    }

    async fn count_alerts(&self, request: &CountAlertsRequest) -> Result<AlertCount> {
        self.get(&format!("{ALERT}/count"), request).await
    }

    async fn list_alert_notes(&self, request: &AlertHistoryRequest) -> Result<AlertNotes> {
        self.get(&format!("{ALERT}/note"), request).await
    }

    async fn list_alert_logs(&self, request: &AlertHistoryRequest) -> Result<AlertLogs> {
        self.get(&format!("{ALERT}/log"), request).await
    }

    async fn list_alert_recipients(&self, request: &GetAlertRequest) -> Result<AlertRecipients> {
        self.get(&format!("{ALERT}/recipient"), request).await
    }

    async fn close_alert(&self, request: &CloseAlertRequest) -> Result<ActionResponse> {
        self.post(&format!("{ALERT}/close"), request).await
    }

    async fn delete_alert(&self, request: &DeleteAlertRequest) -> Result<ActionResponse> {
        self.delete(ALERT, request).await
    }

    async fn acknowledge(&self, request: &AlertActionRequest) -> Result<ActionResponse> {
        self.post(&format!("{ALERT}/acknowledge"), request).await
    }

    async fn unacknowledge(&self, request: &AlertActionRequest) -> Result<ActionResponse> {
        self.post(&format!("{ALERT}/unacknowledge"), request).await
    }

    async fn snooze(&self, request: &SnoozeRequest) -> Result<ActionResponse> {
        self.post(&format!("{ALERT}/snooze"), request).await
    }

    async fn renotify(&self, request: &RenotifyRequest) -> Result<ActionResponse> {
        self.post_once(&format!("{ALERT}/renotify"), request).await
    }

    async fn take_ownership(&self, request: &AlertActionRequest) -> Result<ActionResponse> {
        self.post(&format!("{ALERT}/takeOwnership"), request).await
    }

    async fn assign_owner(&self, request: &AssignOwnerRequest) -> Result<ActionResponse> {
        self.post(&format!("{ALERT}/assign"), request).await
    }

    async fn add_team(&self, request: &AddTeamRequest) -> Result<ActionResponse> {
        self.post(&format!("{ALERT}/team"), request).await
    }

    async fn add_recipient(&self, request: &AddRecipientRequest) -> Result<ActionResponse> {
        self.post(&format!("{ALERT}/recipient"), request).await
    }

    async fn add_note(&self, request: &AlertActionRequest) -> Result<ActionResponse> {
        self.post_once(&format!("{ALERT}/note"), request).await
    }

    async fn add_tags(&self, request: &TagsRequest) -> Result<ActionResponse> {
        self.post(&format!("{ALERT}/tags"), request).await
    }

    async fn remove_tags(&self, request: &TagsRequest) -> Result<ActionResponse> {
        self.delete(&format!("{ALERT}/tags"), request).await
    }

    async fn add_details(&self, request: &AddDetailsRequest) -> Result<ActionResponse> {
        self.post(&format!("{ALERT}/details"), request).await
    }

    async fn remove_details(&self, request: &RemoveDetailsRequest) -> Result<ActionResponse> {
        self.delete(&format!("{ALERT}/details"), request).await
    }

    async fn execute_action(&self, request: &ExecuteActionRequest) -> Result<ActionResponse> {
        self.post_once(&format!("{ALERT}/executeAction"), request).await
    }

    async fn escalate_to_next(&self, request: &EscalateToNextRequest) -> Result<ActionResponse> {
        self.post_once(&format!("{ALERT}/escalateToNext"), request).await
    }

    async fn attach_file(&self, request: &AttachFileRequest) -> Result<ActionResponse> {
        self.post_multipart(&format!("{ALERT}/attach"), request, &request.attachment)
            .await
    }

    async fn send_heartbeat(&self, request: &HeartbeatRequest) -> Result<HeartbeatResponse> {
        self.post("/v1/json/heartbeat/send", request).await
    }

    async fn enable(&self, kind: ResourceKind, request: &ToggleRequest) -> Result<ActionResponse> {
        self.post(&format!("{}/enable", kind.path()), request).await
    }

    async fn disable(
        &self,
        kind: ResourceKind,
        request: &ToggleRequest,
    ) -> Result<ActionResponse> {
        self.post(&format!("{}/disable", kind.path()), request).await
    }

    async fn list_logs(&self, request: &ListLogsRequest) -> Result<ListLogsResponse> {
        self.get("/v1/json/customerLog/listLogFiles", request).await
    }

    async fn get_log_link(&self, request: &LogLinkRequest) -> Result<LogLinkResponse> {
        self.get("/v1/json/customerLog/downloadLog", request).await
    }

    async fn list_users(&self, request: &ListUsersRequest) -> Result<UserList> {
        self.get("/v1/json/user", request).await
    }
}
