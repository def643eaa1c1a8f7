use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::account::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Active,
    OnLeave,
    Terminated,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeProfile {
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

/// Employee profile joined with the owning account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeRecord {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub profile: EmployeeProfile,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewEmployeeProfile {
    pub department: String,
    pub position: String,
    pub hire_date: NaiveDate,
    pub salary: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary: Option<Decimal>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
}
