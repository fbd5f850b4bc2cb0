use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Lifecycle of a leave request.
///
/// `Draft` is the initial status; `ApprovedHr`, `Rejected` and `Cancelled`
/// are terminal. The allowed moves between statuses live in
/// `workflow::engine::TRANSITIONS`.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveStatus {
    Draft,
    Submitted,
    ApprovedManager,
    ApprovedHr,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Draft => "draft",
            LeaveStatus::Submitted => "submitted",
            LeaveStatus::ApprovedManager => "approved_manager",
            LeaveStatus::ApprovedHr => "approved_hr",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LeaveStatus::ApprovedHr | LeaveStatus::Rejected | LeaveStatus::Cancelled
        )
    }
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LeaveType {
    /// Casual leave
    Cl,
    /// Sick leave
    Sl,
    /// Privilege leave
    Pl,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Cl => "CL",
            LeaveType::Sl => "SL",
            LeaveType::Pl => "PL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn status_strings_round_trip() {
        for status in LeaveStatus::iter() {
            let parsed: LeaveStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
            assert_eq!(status.to_string(), status.as_str());
        }
    }

    #[test]
    fn leave_type_strings_round_trip() {
        for lt in LeaveType::iter() {
            let parsed: LeaveType = lt.as_str().parse().unwrap();
            assert_eq!(parsed, lt);
            assert_eq!(lt.to_string(), lt.as_str());
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(!LeaveStatus::Draft.is_terminal());
        assert!(!LeaveStatus::Submitted.is_terminal());
        assert!(!LeaveStatus::ApprovedManager.is_terminal());
        assert!(LeaveStatus::ApprovedHr.is_terminal());
        assert!(LeaveStatus::Rejected.is_terminal());
        assert!(LeaveStatus::Cancelled.is_terminal());
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        assert!("pending".parse::<LeaveStatus>().is_err());
        assert!("approved_hr ".parse::<LeaveStatus>().is_err());
    }
}
