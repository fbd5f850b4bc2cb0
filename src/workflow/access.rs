//! Role-based visibility, kept apart from the state machine so both can be
//! tested on their own.

use crate::model::{leave_request::LeaveStatus, role::Role};

/// Which rows a listing may return.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ListScope {
    /// HR: everything.
    All,
    /// Manager: own requests plus direct reports'.
    Team(u64),
    /// Employee: own requests only.
    Own(u64),
}

pub fn list_scope(role: Role, user_id: u64) -> ListScope {
    match role {
        Role::Hr => ListScope::All,
        Role::Manager => ListScope::Team(user_id),
        Role::Employee => ListScope::Own(user_id),
    }
}

/// Whether one request is visible to the actor at all. Requests outside this
/// scope read as not-found, never as forbidden.
pub fn can_view(
    actor_role: Role,
    actor_id: u64,
    owner_id: u64,
    owner_manager_id: Option<u64>,
) -> bool {
    match actor_role {
        Role::Hr => true,
        Role::Manager => actor_id == owner_id || owner_manager_id == Some(actor_id),
        Role::Employee => actor_id == owner_id,
    }
}

/// Field-level mutation (update, delete): owner only, and only while the
/// request is still a draft. Approvers touch the status column exclusively,
/// through the workflow engine.
pub fn can_modify(actor_id: u64, owner_id: u64, status: LeaveStatus) -> bool {
    actor_id == owner_id && status == LeaveStatus::Draft
}

pub fn can_read_audit(role: Role) -> bool {
    role == Role::Hr
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: u64 = 1;
    const BOB: u64 = 2;

    #[test]
    fn scopes_per_role() {
        assert_eq!(list_scope(Role::Hr, 9), ListScope::All);
        assert_eq!(list_scope(Role::Manager, 9), ListScope::Team(9));
        assert_eq!(list_scope(Role::Employee, 9), ListScope::Own(9));
    }

    #[test]
    fn employee_sees_only_own() {
        assert!(can_view(Role::Employee, ALICE, ALICE, Some(BOB)));
        assert!(!can_view(Role::Employee, ALICE, BOB, None));
    }

    #[test]
    fn manager_sees_team_and_own() {
        assert!(can_view(Role::Manager, BOB, ALICE, Some(BOB)));
        assert!(can_view(Role::Manager, BOB, BOB, None));
        // someone else's report
        assert!(!can_view(Role::Manager, BOB, ALICE, Some(99)));
        assert!(!can_view(Role::Manager, BOB, ALICE, None));
    }

    #[test]
    fn hr_sees_everything() {
        assert!(can_view(Role::Hr, 42, ALICE, Some(BOB)));
        assert!(can_view(Role::Hr, 42, BOB, None));
    }

    #[test]
    fn modification_is_owner_and_draft_only() {
        assert!(can_modify(ALICE, ALICE, LeaveStatus::Draft));
        assert!(!can_modify(BOB, ALICE, LeaveStatus::Draft));
        assert!(!can_modify(ALICE, ALICE, LeaveStatus::Submitted));
        assert!(!can_modify(ALICE, ALICE, LeaveStatus::Cancelled));
    }

    #[test]
    fn audit_trail_is_hr_only() {
        assert!(can_read_audit(Role::Hr));
        assert!(!can_read_audit(Role::Manager));
        assert!(!can_read_audit(Role::Employee));
    }
}
