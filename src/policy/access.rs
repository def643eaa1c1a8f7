use crate::error::{Error, Result};
use crate::models::account::Role;

/// An operation class guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageJobs,
    ManageApplications,
    ManageInterviews,
    ManageAssessments,
    ManageOffers,
    ManageEmployees,
    ManageAccounts,
    ViewRecruitment,
    ViewAssessments,
    ViewEmployees,
    ViewOwnApplications,
    WithdrawOwnApplication,
    RespondToOffers,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageJobs => "manage_jobs",
            Capability::ManageApplications => "manage_applications",
            Capability::ManageInterviews => "manage_interviews",
            Capability::ManageAssessments => "manage_assessments",
            Capability::ManageOffers => "manage_offers",
            Capability::ManageEmployees => "manage_employees",
            Capability::ManageAccounts => "manage_accounts",
            Capability::ViewRecruitment => "view_recruitment",
            Capability::ViewAssessments => "view_assessments",
            Capability::ViewEmployees => "view_employees",
            Capability::ViewOwnApplications => "view_own_applications",
            Capability::WithdrawOwnApplication => "withdraw_own_application",
            Capability::RespondToOffers => "respond_to_offers",
        }
    }
}

/// The fixed role/capability table.
pub fn permits(role: Role, capability: Capability) -> bool {
    use Capability::*;

    match capability {
        ManageJobs | ManageApplications | ManageInterviews | ManageAssessments | ManageOffers
        | ManageEmployees | ViewEmployees => role.is_privileged(),
        ManageAccounts => role == Role::Admin,
        ViewRecruitment | ViewAssessments => role != Role::Candidate,
        ViewOwnApplications | WithdrawOwnApplication | RespondToOffers => role == Role::Candidate,
    }
}

pub fn authorize(role: Role, capability: Capability) -> Result<()> {
    if permits(role, capability) {
        Ok(())
    } else {
        Err(Error::Forbidden(format!(
            "role {} lacks capability '{}'",
            role,
            capability.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUTATIONS: [Capability; 6] = [
        Capability::ManageJobs,
        Capability::ManageApplications,
        Capability::ManageInterviews,
        Capability::ManageAssessments,
        Capability::ManageOffers,
        Capability::ManageEmployees,
    ];

    #[test]
    fn only_admin_and_hr_may_mutate_recruitment_entities() {
        for capability in MUTATIONS {
            assert!(permits(Role::Admin, capability));
            assert!(permits(Role::HrManager, capability));
            assert!(!permits(Role::Employee, capability));
            assert!(!permits(Role::Candidate, capability));
        }
    }

    #[test]
    fn employees_read_but_candidates_do_not() {
        assert!(permits(Role::Employee, Capability::ViewRecruitment));
        assert!(permits(Role::Employee, Capability::ViewAssessments));
        assert!(!permits(Role::Candidate, Capability::ViewRecruitment));
        assert!(!permits(Role::Employee, Capability::ViewEmployees));
    }

    #[test]
    fn candidate_capabilities_are_exclusive() {
        for role in [Role::Admin, Role::HrManager, Role::Employee] {
            assert!(!permits(role, Capability::RespondToOffers));
            assert!(!permits(role, Capability::WithdrawOwnApplication));
        }
        assert!(permits(Role::Candidate, Capability::RespondToOffers));
        assert!(permits(Role::Candidate, Capability::ViewOwnApplications));
    }

    #[test]
    fn account_management_is_admin_only() {
        assert!(permits(Role::Admin, Capability::ManageAccounts));
        assert!(!permits(Role::HrManager, Capability::ManageAccounts));
    }

    #[test]
    fn authorize_reports_forbidden() {
        let err = authorize(Role::Employee, Capability::ManageJobs).unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }
}
