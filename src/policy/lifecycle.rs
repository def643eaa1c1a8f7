//! Application status rules and the side effects bound to interview and offer events.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;
use crate::models::interview::InterviewStatus;

/// Status an application falls back to once it no longer has interviews.
pub const STATUS_WITHOUT_INTERVIEWS: ApplicationStatus = ApplicationStatus::Reviewed;

/// Which manual status changes are accepted.
///
/// `Permissive` accepts any allow-listed status regardless of the current
/// one, so HR can override freely. `Strict` only allows one forward step, or
/// rejection/withdrawal from a non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    Strict,
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            other => Err(format!("unknown transition policy '{}'", other)),
        }
    }
}

impl TransitionPolicy {
    pub fn allows(self, from: ApplicationStatus, to: ApplicationStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => {
                if from == to {
                    return true;
                }
                if from.is_terminal() {
                    return false;
                }
                matches!(to, ApplicationStatus::Rejected | ApplicationStatus::Withdrawn)
                    || next_in_pipeline(from) == Some(to)
            }
        }
    }

    pub fn check(self, from: ApplicationStatus, to: ApplicationStatus) -> Result<()> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(Error::InvalidOperation(format!(
                "application cannot move from {} to {}",
                from, to
            )))
        }
    }
}

/// The forward step of the hiring pipeline, if any.
pub fn next_in_pipeline(status: ApplicationStatus) -> Option<ApplicationStatus> {
    use ApplicationStatus::*;

    match status {
        Submitted => Some(Screening),
        Screening => Some(Reviewed),
        Reviewed => Some(Interview),
        Interview => Some(Interviewed),
        Interviewed => Some(Completed),
        Completed => Some(Offered),
        Offered => Some(Hired),
        Hired | Rejected | Withdrawn => None,
    }
}

/// Scheduling an interview always puts the application into `INTERVIEW`.
pub fn on_interview_scheduled(_current: ApplicationStatus) -> ApplicationStatus {
    ApplicationStatus::Interview
}

/// Status implied by an interview changing status; `other_active` counts the
/// application's other scheduled or in-progress interviews. Terminal
/// applications are left alone.
pub fn on_interview_status_changed(
    current: ApplicationStatus,
    status: InterviewStatus,
    other_active: i64,
) -> Option<ApplicationStatus> {
    if current.is_terminal() {
        return None;
    }
    match status {
        InterviewStatus::Scheduled | InterviewStatus::InProgress => Some(ApplicationStatus::Interview),
        InterviewStatus::Completed => Some(ApplicationStatus::Interviewed),
        InterviewStatus::Cancelled if other_active == 0 => Some(STATUS_WITHOUT_INTERVIEWS),
        InterviewStatus::Cancelled => None,
    }
}

/// Deleting the last interview reverts the application; otherwise nothing changes.
pub fn on_interview_removed(remaining: i64) -> Option<ApplicationStatus> {
    (remaining == 0).then_some(STATUS_WITHOUT_INTERVIEWS)
}

pub fn on_offer_extended() -> ApplicationStatus {
    ApplicationStatus::Offered
}

pub fn on_offer_accepted() -> ApplicationStatus {
    ApplicationStatus::Hired
}

/// Candidates may withdraw until the application reaches a terminal status.
pub fn check_withdrawal(current: ApplicationStatus) -> Result<()> {
    if current.is_terminal() {
        Err(Error::InvalidOperation(format!(
            "application is already {} and cannot be withdrawn",
            current
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    #[test]
    fn permissive_policy_accepts_any_jump() {
        assert!(TransitionPolicy::Permissive.allows(Submitted, Hired));
        assert!(TransitionPolicy::Permissive.allows(Rejected, Screening));
    }

    #[test]
    fn strict_policy_follows_pipeline() {
        let strict = TransitionPolicy::Strict;
        assert!(strict.allows(Submitted, Screening));
        assert!(strict.allows(Offered, Hired));
        assert!(!strict.allows(Submitted, Hired));
        assert!(strict.allows(Interview, Rejected));
        assert!(strict.allows(Screening, Withdrawn));
        assert!(!strict.allows(Withdrawn, Screening));
        assert!(!strict.allows(Hired, Rejected));
        assert!(matches!(
            strict.check(Submitted, Offered),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn scheduling_forces_interview_from_any_status() {
        for status in ApplicationStatus::ALL {
            assert_eq!(on_interview_scheduled(status), Interview);
        }
    }

    #[test]
    fn removing_last_interview_reverts_to_reviewed() {
        assert_eq!(on_interview_removed(0), Some(Reviewed));
        assert_eq!(on_interview_removed(2), None);
    }

    #[test]
    fn interview_status_changes_drive_application() {
        assert_eq!(
            on_interview_status_changed(Interview, InterviewStatus::Completed, 0),
            Some(Interviewed)
        );
        assert_eq!(
            on_interview_status_changed(Interview, InterviewStatus::Cancelled, 0),
            Some(Reviewed)
        );
        assert_eq!(
            on_interview_status_changed(Interview, InterviewStatus::Cancelled, 1),
            None
        );
        assert_eq!(
            on_interview_status_changed(Reviewed, InterviewStatus::InProgress, 0),
            Some(Interview)
        );
    }

    #[test]
    fn interview_status_changes_leave_terminal_applications() {
        for current in [Hired, Rejected, Withdrawn] {
            for status in [
                InterviewStatus::Scheduled,
                InterviewStatus::InProgress,
                InterviewStatus::Completed,
                InterviewStatus::Cancelled,
            ] {
                assert_eq!(on_interview_status_changed(current, status, 0), None);
            }
        }
    }

    #[test]
    fn withdrawal_blocked_once_terminal() {
        assert!(check_withdrawal(Interview).is_ok());
        assert!(check_withdrawal(Hired).is_err());
        assert!(check_withdrawal(Withdrawn).is_err());
    }

    #[test]
    fn policy_parses_from_config_value() {
        assert_eq!("STRICT".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Strict));
        assert!("lenient".parse::<TransitionPolicy>().is_err());
    }
}
