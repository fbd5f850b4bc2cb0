use crate::api::audit_log::{AuditEntryResponse, AuditListResponse};
use crate::api::leave_request::{ActionBody, CreateLeave, LeaveListResponse, LeaveResponse};
use crate::api::user::{UserListResponse, UserResponse};
use crate::model::leave_request::{LeaveStatus, LeaveType};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Workflow API",
        version = "1.0.0",
        description = r#"
## Leave Request Approval Workflow

This API manages employee leave requests through a multi-step approval
workflow with role-based permissions and an append-only audit trail.

### Workflow
`draft` → `submitted` → `approved_manager` → `approved_hr`, with `rejected`
and `cancelled` as the other terminal statuses.

- **Employees** create, edit and submit their own requests, and may cancel
  them any time before HR approval.
- **Managers** approve or reject requests from their direct reports. Nobody
  can approve their own request.
- **HR** gives the final approval after the manager step and has read access
  to everything, including the audit log.

### Security
All endpoints except registration and token issuance require **JWT Bearer
authentication**.

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::delete_leave,
        crate::api::leave_request::submit_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,

        crate::api::audit_log::audit_list,
        crate::api::audit_log::audit_detail,

        crate::api::user::list_users,
        crate::api::user::get_user
    ),
    components(
        schemas(
            LeaveStatus,
            LeaveType,
            CreateLeave,
            ActionBody,
            LeaveResponse,
            LeaveListResponse,
            AuditEntryResponse,
            AuditListResponse,
            UserResponse,
            UserListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request workflow APIs"),
        (name = "Audit Log", description = "Transition audit trail (HR only)"),
        (name = "Users", description = "Read-only user APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
