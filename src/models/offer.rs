use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::application::Application;
use super::employee::EmployeeProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "offer_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Pending,
    Sent,
    Accepted,
    Rejected,
}

impl OfferStatus {
    /// Pending and sent offers still await the candidate.
    pub fn awaits_response(&self) -> bool {
        matches!(self, OfferStatus::Pending | OfferStatus::Sent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferDecision {
    Accept,
    Reject,
}

impl std::str::FromStr for OfferDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" | "accepted" => Ok(OfferDecision::Accept),
            "reject" | "rejected" => Ok(OfferDecision::Reject),
            other => Err(format!("'{}' is not a valid decision (accept or reject)", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Offer {
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

#[derive(Debug, Clone)]
pub struct NewOffer {
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
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct OfferFilter {
    pub application_id: Option<Uuid>,
    pub candidate_email: Option<String>,
    pub status: Option<OfferStatus>,
}

/// Everything written by the offer-acceptance transaction.
#[derive(Debug, Clone)]
pub struct OfferAcceptance {
    pub offer: Offer,
    pub application: Application,
    pub employee: EmployeeProfile,
}
