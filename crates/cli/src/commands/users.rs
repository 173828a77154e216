use opsgenie_lamp_api::user::ListUsersRequest;

use super::flags;
use super::Call;
use crate::registry::{CommandDescriptor, FlagSpec};

pub fn export_users() -> CommandDescriptor {
    CommandDescriptor::new("exportUsers", "Exports the users of the account", |invocation| {
        Ok(Call::ListUsers(ListUsersRequest {
            query: invocation.string("query"),
            limit: invocation.number("limit")?,
            offset: invocation.number("offset")?,
        }))
    })
    .flag(FlagSpec::text(&["query"], "Only users matching this search text"))
    .flag(FlagSpec::text(&["limit"], "Page size"))
    .flag(FlagSpec::text(&["offset"], "Number of users to skip"))
    .flags(flags::output())
}
