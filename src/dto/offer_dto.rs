use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::application_dto::ApplicationResponse;
use crate::dto::employee_dto::EmployeeProfileResponse;
use crate::models::offer::{Offer, OfferAcceptance, OfferStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOfferPayload {
    pub application_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub position_title: String,
    #[validate(length(min = 1, max = 255))]
    pub department: String,
    pub salary: Decimal,
    #[validate(length(equal = 3, message = "Currency must be a three-letter code"))]
    pub currency: Option<String>,
    pub start_date: NaiveDate,
    pub expires_at: Option<DateTime<Utc>>,
    pub benefits: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RespondOfferPayload {
    #[validate(length(min = 1))]
    pub decision: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferResponse {
    pub id: Uuid,
    pub application_id: Uuid,
    pub candidate_email: String,
    pub position_title: String,
    pub department: String,
    pub salary: Decimal,
    pub currency: String,
    pub start_date: NaiveDate,
    pub expires_at: Option<DateTime<Utc>>,
    pub benefits: Option<String>,
    pub notes: Option<String>,
    pub status: OfferStatus,
    pub created_by: Option<Uuid>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDecisionResponse {
    pub offer: OfferResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<ApplicationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<EmployeeProfileResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OfferListQuery {
    pub application_id: Option<Uuid>,
    pub email: Option<String>,
    pub status: Option<OfferStatus>,
}

impl From<Offer> for OfferResponse {
    fn from(value: Offer) -> Self {
        Self {
            id: value.id,
            application_id: value.application_id,
            candidate_email: value.candidate_email,
            position_title: value.position_title,
            department: value.department,
            salary: value.salary,
            currency: value.currency,
            start_date: value.start_date,
            expires_at: value.expires_at,
            benefits: value.benefits,
            notes: value.notes,
            status: value.status,
            created_by: value.created_by,
            responded_at: value.responded_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<Offer> for OfferDecisionResponse {
    fn from(value: Offer) -> Self {
        Self {
            offer: value.into(),
            application: None,
            employee: None,
        }
    }
}

impl From<OfferAcceptance> for OfferDecisionResponse {
    fn from(value: OfferAcceptance) -> Self {
        Self {
            offer: value.offer.into(),
            application: Some(value.application.into()),
            employee: Some(value.employee.into()),
        }
    }
}
