//! Leave request state machine.
//!
//! The allowed moves are one flat table of
//! `(from status, action, to status, actor rule)` rows. `plan_transition`
//! resolves an attempt against that table and returns the status to write;
//! actually writing it (together with the audit entry) is the caller's job,
//! conditioned on the status still being `from` at write time.

use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::model::{leave_request::LeaveStatus, role::Role};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum LeaveAction {
    Submit,
    Approve,
    Reject,
    Cancel,
}

/// Who may drive a transition, evaluated against a [`TransitionCtx`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ActorRule {
    /// The request's owner.
    Owner,
    /// The owner's direct manager. Never the owner themselves.
    ManagerOfOwner,
    /// The owner's direct manager or any HR user. Never the owner.
    ManagerOfOwnerOrHr,
    /// Any HR user. Never the owner.
    Hr,
}

/// Everything the actor rules need to know about one transition attempt.
#[derive(Debug, Copy, Clone)]
pub struct TransitionCtx {
    pub actor_id: u64,
    pub actor_role: Role,
    pub owner_id: u64,
    pub owner_manager_id: Option<u64>,
}

impl TransitionCtx {
    fn is_owner(&self) -> bool {
        self.actor_id == self.owner_id
    }

    fn manages_owner(&self) -> bool {
        self.actor_role == Role::Manager && self.owner_manager_id == Some(self.actor_id)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum WorkflowError {
    #[error("action `{action}` is not valid from status `{from}`")]
    InvalidTransition {
        from: LeaveStatus,
        action: LeaveAction,
    },
    #[error("{0}")]
    Forbidden(&'static str),
}

/// Source of truth for the workflow. Statuses absent from the `from` column
/// for a given action reject that action outright; terminal statuses have no
/// rows at all.
pub const TRANSITIONS: &[(LeaveStatus, LeaveAction, LeaveStatus, ActorRule)] = &[
    (
        LeaveStatus::Draft,
        LeaveAction::Submit,
        LeaveStatus::Submitted,
        ActorRule::Owner,
    ),
    (
        LeaveStatus::Submitted,
        LeaveAction::Approve,
        LeaveStatus::ApprovedManager,
        ActorRule::ManagerOfOwner,
    ),
    (
        LeaveStatus::Submitted,
        LeaveAction::Reject,
        LeaveStatus::Rejected,
        ActorRule::ManagerOfOwnerOrHr,
    ),
    (
        LeaveStatus::ApprovedManager,
        LeaveAction::Approve,
        LeaveStatus::ApprovedHr,
        ActorRule::Hr,
    ),
    (
        LeaveStatus::ApprovedManager,
        LeaveAction::Reject,
        LeaveStatus::Rejected,
        ActorRule::Hr,
    ),
    (
        LeaveStatus::Draft,
        LeaveAction::Cancel,
        LeaveStatus::Cancelled,
        ActorRule::Owner,
    ),
    (
        LeaveStatus::Submitted,
        LeaveAction::Cancel,
        LeaveStatus::Cancelled,
        ActorRule::Owner,
    ),
    (
        LeaveStatus::ApprovedManager,
        LeaveAction::Cancel,
        LeaveStatus::Cancelled,
        ActorRule::Owner,
    ),
];

/// Resolve one transition attempt.
///
/// Checks run in order: the (status, action) pair must exist in the table,
/// then the actor rule must hold. The returned status is what the caller
/// must write, conditioned on the current status still being `current`.
pub fn plan_transition(
    current: LeaveStatus,
    action: LeaveAction,
    ctx: &TransitionCtx,
) -> Result<LeaveStatus, WorkflowError> {
    let (_, _, next, rule) = TRANSITIONS
        .iter()
        .find(|(from, act, _, _)| *from == current && *act == action)
        .ok_or(WorkflowError::InvalidTransition {
            from: current,
            action,
        })?;

    check_rule(*rule, ctx)?;
    Ok(*next)
}

fn check_rule(rule: ActorRule, ctx: &TransitionCtx) -> Result<(), WorkflowError> {
    match rule {
        ActorRule::Owner => {
            if ctx.is_owner() {
                Ok(())
            } else {
                Err(WorkflowError::Forbidden(
                    "only the owner may perform this action",
                ))
            }
        }
        // Approval rules never apply to the owner, whatever their role.
        ActorRule::ManagerOfOwner => {
            if ctx.is_owner() {
                Err(WorkflowError::Forbidden(
                    "cannot approve or reject your own request",
                ))
            } else if ctx.manages_owner() {
                Ok(())
            } else {
                Err(WorkflowError::Forbidden(
                    "only the owner's manager may perform this action",
                ))
            }
        }
        ActorRule::ManagerOfOwnerOrHr => {
            if ctx.is_owner() {
                Err(WorkflowError::Forbidden(
                    "cannot approve or reject your own request",
                ))
            } else if ctx.manages_owner() || ctx.actor_role == Role::Hr {
                Ok(())
            } else {
                Err(WorkflowError::Forbidden(
                    "only the owner's manager or HR may perform this action",
                ))
            }
        }
        ActorRule::Hr => {
            if ctx.is_owner() {
                Err(WorkflowError::Forbidden(
                    "cannot approve or reject your own request",
                ))
            } else if ctx.actor_role == Role::Hr {
                Ok(())
            } else {
                Err(WorkflowError::Forbidden("only HR may perform this action"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const ALICE: u64 = 1; // employee, reports to BOB
    const BOB: u64 = 2; // manager of ALICE
    const CAROL: u64 = 3; // HR
    const DAVE: u64 = 4; // manager of nobody relevant

    fn ctx(actor_id: u64, actor_role: Role) -> TransitionCtx {
        TransitionCtx {
            actor_id,
            actor_role,
            owner_id: ALICE,
            owner_manager_id: Some(BOB),
        }
    }

    fn owner() -> TransitionCtx {
        ctx(ALICE, Role::Employee)
    }

    fn manager() -> TransitionCtx {
        ctx(BOB, Role::Manager)
    }

    fn hr() -> TransitionCtx {
        ctx(CAROL, Role::Hr)
    }

    #[test]
    fn happy_path_reaches_hr_approval() {
        let s1 = plan_transition(LeaveStatus::Draft, LeaveAction::Submit, &owner()).unwrap();
        assert_eq!(s1, LeaveStatus::Submitted);

        let s2 = plan_transition(s1, LeaveAction::Approve, &manager()).unwrap();
        assert_eq!(s2, LeaveStatus::ApprovedManager);

        let s3 = plan_transition(s2, LeaveAction::Approve, &hr()).unwrap();
        assert_eq!(s3, LeaveStatus::ApprovedHr);
    }

    #[test]
    fn terminal_statuses_reject_every_action() {
        for status in [
            LeaveStatus::ApprovedHr,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
        ] {
            for action in LeaveAction::iter() {
                for who in [owner(), manager(), hr()] {
                    assert_eq!(
                        plan_transition(status, action, &who),
                        Err(WorkflowError::InvalidTransition {
                            from: status,
                            action
                        }),
                        "{status} should admit no {action}"
                    );
                }
            }
        }
    }

    #[test]
    fn table_has_no_rows_out_of_terminal_statuses() {
        for (from, _, _, _) in TRANSITIONS {
            assert!(!from.is_terminal());
        }
    }

    #[test]
    fn submit_is_owner_only_and_draft_only() {
        assert_eq!(
            plan_transition(LeaveStatus::Draft, LeaveAction::Submit, &manager()),
            Err(WorkflowError::Forbidden(
                "only the owner may perform this action"
            ))
        );
        assert_eq!(
            plan_transition(LeaveStatus::Submitted, LeaveAction::Submit, &owner()),
            Err(WorkflowError::InvalidTransition {
                from: LeaveStatus::Submitted,
                action: LeaveAction::Submit
            })
        );
    }

    #[test]
    fn hr_cannot_skip_the_manager_step() {
        // approve on `submitted` is reserved for the owner's manager
        let err = plan_transition(LeaveStatus::Submitted, LeaveAction::Approve, &hr());
        assert!(matches!(err, Err(WorkflowError::Forbidden(_))));
    }

    #[test]
    fn manager_cannot_reach_hr_approval() {
        let err = plan_transition(LeaveStatus::ApprovedManager, LeaveAction::Approve, &manager());
        assert!(matches!(err, Err(WorkflowError::Forbidden(_))));
    }

    #[test]
    fn foreign_manager_cannot_approve_or_reject() {
        for action in [LeaveAction::Approve, LeaveAction::Reject] {
            let err = plan_transition(LeaveStatus::Submitted, action, &ctx(DAVE, Role::Manager));
            assert!(matches!(err, Err(WorkflowError::Forbidden(_))));
        }
    }

    #[test]
    fn self_approval_is_forbidden_for_every_role() {
        // actor owns the request; role grants alone must never be enough
        for role in [Role::Employee, Role::Manager, Role::Hr] {
            let own = TransitionCtx {
                actor_id: ALICE,
                actor_role: role,
                owner_id: ALICE,
                owner_manager_id: Some(ALICE), // even as the approver on record
            };
            for (status, action) in [
                (LeaveStatus::Submitted, LeaveAction::Approve),
                (LeaveStatus::Submitted, LeaveAction::Reject),
                (LeaveStatus::ApprovedManager, LeaveAction::Approve),
                (LeaveStatus::ApprovedManager, LeaveAction::Reject),
            ] {
                assert_eq!(
                    plan_transition(status, action, &own),
                    Err(WorkflowError::Forbidden(
                        "cannot approve or reject your own request"
                    )),
                    "self-{action} from {status} as {role:?}"
                );
            }
        }
    }

    #[test]
    fn hr_can_reject_submitted_requests() {
        assert_eq!(
            plan_transition(LeaveStatus::Submitted, LeaveAction::Reject, &hr()),
            Ok(LeaveStatus::Rejected)
        );
    }

    #[test]
    fn owner_can_cancel_until_hr_approves() {
        for status in [
            LeaveStatus::Draft,
            LeaveStatus::Submitted,
            LeaveStatus::ApprovedManager,
        ] {
            assert_eq!(
                plan_transition(status, LeaveAction::Cancel, &owner()),
                Ok(LeaveStatus::Cancelled)
            );
        }
        for who in [manager(), hr()] {
            assert!(matches!(
                plan_transition(LeaveStatus::Submitted, LeaveAction::Cancel, &who),
                Err(WorkflowError::Forbidden(_))
            ));
        }
    }

    #[test]
    fn employee_cannot_approve_a_visible_request() {
        let err = plan_transition(
            LeaveStatus::Submitted,
            LeaveAction::Approve,
            &ctx(DAVE, Role::Employee),
        );
        assert!(matches!(err, Err(WorkflowError::Forbidden(_))));
    }

    /// Minimal compare-and-swap store mirroring how the API applies a planned
    /// transition: the write only lands if the status is still the one the
    /// plan was made against, and every landed write appends one audit pair.
    struct MemStore {
        status: LeaveStatus,
        audit: Vec<(LeaveStatus, LeaveStatus)>,
    }

    impl MemStore {
        fn new(status: LeaveStatus) -> Self {
            Self {
                status,
                audit: Vec::new(),
            }
        }

        fn apply(&mut self, expected: LeaveStatus, next: LeaveStatus) -> bool {
            if self.status != expected {
                return false;
            }
            self.status = next;
            self.audit.push((expected, next));
            true
        }
    }

    #[test]
    fn full_scenario_leaves_one_audit_entry_per_transition() {
        let mut store = MemStore::new(LeaveStatus::Draft);

        for (action, who) in [
            (LeaveAction::Submit, owner()),
            (LeaveAction::Approve, manager()),
            (LeaveAction::Approve, hr()),
        ] {
            let from = store.status;
            let next = plan_transition(from, action, &who).unwrap();
            assert!(store.apply(from, next));
        }

        assert_eq!(store.status, LeaveStatus::ApprovedHr);
        assert_eq!(
            store.audit,
            vec![
                (LeaveStatus::Draft, LeaveStatus::Submitted),
                (LeaveStatus::Submitted, LeaveStatus::ApprovedManager),
                (LeaveStatus::ApprovedManager, LeaveStatus::ApprovedHr),
            ]
        );

        // terminal: a late cancel is rejected before any write is attempted
        assert_eq!(
            plan_transition(store.status, LeaveAction::Cancel, &owner()),
            Err(WorkflowError::InvalidTransition {
                from: LeaveStatus::ApprovedHr,
                action: LeaveAction::Cancel
            })
        );
        assert_eq!(store.audit.len(), 3);
    }

    #[test]
    fn competing_transitions_one_wins_one_observes_stale_status() {
        let mut store = MemStore::new(LeaveStatus::Submitted);

        // both actors plan against the same snapshot
        let a = plan_transition(LeaveStatus::Submitted, LeaveAction::Approve, &manager()).unwrap();
        let b = plan_transition(LeaveStatus::Submitted, LeaveAction::Cancel, &owner()).unwrap();

        assert!(store.apply(LeaveStatus::Submitted, a));
        // the loser's conditional write misses; the caller surfaces a conflict
        assert!(!store.apply(LeaveStatus::Submitted, b));

        assert_eq!(store.status, LeaveStatus::ApprovedManager);
        assert_eq!(store.audit.len(), 1);
    }

    #[test]
    fn cancelled_request_cannot_be_approved_afterwards() {
        let mut store = MemStore::new(LeaveStatus::Submitted);
        let next = plan_transition(store.status, LeaveAction::Cancel, &owner()).unwrap();
        assert!(store.apply(LeaveStatus::Submitted, next));

        assert_eq!(
            plan_transition(store.status, LeaveAction::Approve, &manager()),
            Err(WorkflowError::InvalidTransition {
                from: LeaveStatus::Cancelled,
                action: LeaveAction::Approve
            })
        );
    }
}
