use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::account::Role;
use crate::models::employee::{EmployeeChanges, EmployeeProfile, EmployeeRecord, EmployeeStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEmployeePayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    pub role: Option<Role>,
    #[validate(length(min = 1, max = 255))]
    pub department: String,
    #[validate(length(min = 1, max = 255))]
    pub position: String,
    pub hire_date: NaiveDate,
    pub salary: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 1, max = 255))]
    pub department: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub position: Option<String>,
    pub salary: Option<Decimal>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProfileResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub department: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub salary: Option<Decimal>,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
    #[serde(flatten)]
    pub profile: EmployeeProfileResponse,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EmployeeListQuery {
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
}

impl From<EmployeeProfile> for EmployeeProfileResponse {
    fn from(value: EmployeeProfile) -> Self {
        Self {
            id: value.id,
            account_id: value.account_id,
            department: value.department,
            position: value.position,
            hire_date: value.hire_date,
            salary: value.salary,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<EmployeeRecord> for EmployeeResponse {
    fn from(value: EmployeeRecord) -> Self {
        Self {
            profile: value.profile.into(),
            email: value.email,
            full_name: value.full_name,
            role: value.role,
            is_active: value.is_active,
        }
    }
}

impl From<UpdateEmployeePayload> for EmployeeChanges {
    fn from(value: UpdateEmployeePayload) -> Self {
        Self {
            department: value.department,
            position: value.position,
            salary: value.salary,
            status: value.status,
        }
    }
}
