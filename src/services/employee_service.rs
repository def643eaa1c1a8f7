use std::sync::Arc;

use uuid::Uuid;

use crate::dto::employee_dto::{CreateEmployeePayload, EmployeeListQuery, UpdateEmployeePayload};
use crate::error::{field_error, Error, Result};
use crate::middleware::auth::Session;
use crate::models::account::{Account, NewAccount, Role};
use crate::models::employee::{EmployeeFilter, EmployeeRecord, NewEmployeeProfile};
use crate::policy::access::Capability;
use crate::repository::Store;
use crate::utils::crypto::hash_password;
use crate::utils::validation::{non_blank, normalize_email, validate};

#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn Store>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a staff account together with its employee profile.
    /// Admin and HR roles may only be granted by an administrator.
    pub async fn provision(
        &self,
        session: &Session,
        payload: CreateEmployeePayload,
    ) -> Result<EmployeeRecord> {
        validate(&payload)?;
        let role = payload.role.unwrap_or(Role::Employee);
        match role {
            Role::Candidate => {
                return Err(field_error(
                    "role",
                    "invalid_role",
                    "Employees cannot be provisioned with the CANDIDATE role",
                ))
            }
            Role::Admin | Role::HrManager => session.require(Capability::ManageAccounts)?,
            Role::Employee => {}
        }

        let record = self
            .store
            .provision_employee(
                NewAccount {
                    email: normalize_email(&payload.email),
                    password_hash: hash_password(&payload.password)?,
                    full_name: payload.full_name.trim().to_string(),
                    role,
                },
                NewEmployeeProfile {
                    department: payload.department.trim().to_string(),
                    position: payload.position.trim().to_string(),
                    hire_date: payload.hire_date,
                    salary: payload.salary,
                },
            )
            .await?;
        tracing::info!(
            employee_id = %record.profile.id,
            account_id = %record.profile.account_id,
            role = %record.role,
            "Employee provisioned"
        );
        Ok(record)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<EmployeeRecord> {
        self.store
            .find_employee(id)
            .await?
            .ok_or_else(|| Error::not_found("Employee", id))
    }

    pub async fn list(&self, query: EmployeeListQuery) -> Result<Vec<EmployeeRecord>> {
        let filter = EmployeeFilter {
            department: non_blank(query.department),
            status: query.status,
        };
        self.store.list_employees(&filter).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateEmployeePayload) -> Result<EmployeeRecord> {
        validate(&payload)?;
        self.store.update_employee(id, payload.into()).await
    }

    /// Accounts are never deleted, only deactivated.
    pub async fn deactivate_account(&self, session: &Session, account_id: Uuid) -> Result<Account> {
        session.require(Capability::ManageAccounts)?;
        if session.account_id == account_id {
            return Err(Error::InvalidOperation(
                "You cannot deactivate your own account".to_string(),
            ));
        }
        let account = self.store.set_account_active(account_id, false).await?;
        tracing::info!(account_id = %account.id, "Account deactivated");
        Ok(account)
    }
}
