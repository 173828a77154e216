//! Downloadable customer logs. Unlike the other commands these print a
//! plain line instead of a JSON or YAML document.

use opsgenie_lamp_api::customer_log::{ListLogsRequest, LogLinkRequest};

use super::Call;
use crate::registry::{CommandDescriptor, FlagSpec};

pub fn get_log_link() -> CommandDescriptor {
    CommandDescriptor::new("getlogLink", "Get link of log file", |invocation| {
        Ok(Call::GetLogLink(LogLinkRequest {
            log_file: invocation.string("logFile"),
        }))
    })
    .flag(FlagSpec::text(
        &["logFile"],
        "Name of the log file, as printed by listLogs",
    ))
}

pub fn list_logs() -> CommandDescriptor {
    CommandDescriptor::new("listLogs", "List Downloadable Customer Logs", |invocation| {
        Ok(Call::ListLogs(ListLogsRequest {
            after: invocation.string("after"),
        }))
    })
    .flag(FlagSpec::text(&["after"], "Log files after this date"))
}
