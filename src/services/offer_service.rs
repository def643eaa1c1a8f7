use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::offer_dto::{CreateOfferPayload, OfferDecisionResponse, OfferListQuery};
use crate::error::{field_error, Error, Result};
use crate::middleware::auth::Session;
use crate::models::employee::NewEmployeeProfile;
use crate::models::offer::{NewOffer, Offer, OfferDecision, OfferFilter, OfferStatus};
use crate::policy::access::Capability;
use crate::policy::lifecycle;
use crate::repository::Store;
use crate::services::application_service::ApplicationService;
use crate::services::notification_service::NotificationService;
use crate::utils::validation::{non_blank, normalize_email, validate};

const DEFAULT_CURRENCY: &str = "USD";

#[derive(Clone)]
pub struct OfferService {
    store: Arc<dyn Store>,
    applications: ApplicationService,
    notifications: NotificationService,
}

impl OfferService {
    pub fn new(
        store: Arc<dyn Store>,
        applications: ApplicationService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            store,
            applications,
            notifications,
        }
    }

    pub async fn create(&self, created_by: Uuid, payload: CreateOfferPayload) -> Result<Offer> {
        validate(&payload)?;
        if payload.salary <= Decimal::ZERO {
            return Err(field_error("salary", "range", "Salary must be positive"));
        }

        let application = self.applications.get_by_id(payload.application_id).await?;
        if application.status.is_terminal() {
            return Err(Error::InvalidOperation(format!(
                "Cannot extend an offer to an application that is {}",
                application.status
            )));
        }
        if let Some(existing) = self
            .store
            .find_open_offer_for_application(application.id)
            .await?
        {
            return Err(Error::conflict(
                "An offer is already open for this application",
                existing.id,
            ));
        }

        let offer = self
            .store
            .insert_offer(NewOffer {
                application_id: application.id,
                candidate_email: application.candidate_email.clone(),
                position_title: payload.position_title.trim().to_string(),
                department: payload.department.trim().to_string(),
                salary: payload.salary,
                currency: payload
                    .currency
                    .map(|c| c.to_ascii_uppercase())
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                start_date: payload.start_date,
                expires_at: payload.expires_at,
                benefits: non_blank(payload.benefits),
                notes: non_blank(payload.notes),
                created_by: Some(created_by),
            })
            .await?;
        tracing::info!(offer_id = %offer.id, application_id = %application.id, "Offer created");

        self.applications
            .transition(application, lifecycle::on_offer_extended(), None)
            .await?;
        Ok(offer)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Offer> {
        self.store
            .find_offer(id)
            .await?
            .ok_or_else(|| Error::not_found("Offer", id))
    }

    pub async fn list(&self, query: OfferListQuery) -> Result<Vec<Offer>> {
        let filter = OfferFilter {
            application_id: query.application_id,
            candidate_email: non_blank(query.email).map(|e| normalize_email(&e)),
            status: query.status,
        };
        self.store.list_offers(&filter).await
    }

    pub async fn send(&self, id: Uuid) -> Result<Offer> {
        let offer = self.get_by_id(id).await?;
        if offer.status != OfferStatus::Pending {
            return Err(Error::InvalidOperation(format!(
                "Only pending offers can be sent; this one is {:?}",
                offer.status
            )));
        }
        let offer = self.store.set_offer_status(id, OfferStatus::Sent).await?;
        tracing::info!(offer_id = %offer.id, "Offer sent to candidate");
        self.notifications.offer_sent(&offer).await;
        Ok(offer)
    }

    pub async fn list_for_candidate(&self, session: &Session) -> Result<Vec<Offer>> {
        session.require(Capability::RespondToOffers)?;
        let filter = OfferFilter {
            candidate_email: Some(normalize_email(&session.email)),
            ..Default::default()
        };
        self.store.list_offers(&filter).await
    }

    /// Acceptance hires the candidate in one transaction; rejection only
    /// closes the offer.
    pub async fn respond(
        &self,
        session: &Session,
        id: Uuid,
        raw_decision: &str,
    ) -> Result<OfferDecisionResponse> {
        session.require(Capability::RespondToOffers)?;
        let decision = raw_decision
            .parse::<OfferDecision>()
            .map_err(|msg| field_error("decision", "invalid_decision", msg))?;

        let offer = self.get_by_id(id).await?;
        if !session.owns_email(&offer.candidate_email) {
            return Err(Error::Forbidden(
                "This offer was not extended to you".to_string(),
            ));
        }
        if !offer.status.awaits_response() {
            return Err(Error::InvalidOperation(format!(
                "Offer has already been {:?}",
                offer.status
            )));
        }
        if offer.expires_at.is_some_and(|at| at <= Utc::now()) {
            return Err(Error::InvalidOperation("Offer has expired".to_string()));
        }

        match decision {
            OfferDecision::Accept => {
                let profile = NewEmployeeProfile {
                    department: offer.department.clone(),
                    position: offer.position_title.clone(),
                    hire_date: offer.start_date,
                    salary: Some(offer.salary),
                };
                let accepted = self
                    .store
                    .accept_offer(offer.id, session.account_id, profile)
                    .await?;
                tracing::info!(
                    offer_id = %offer.id,
                    account_id = %session.account_id,
                    "Offer accepted; candidate hired"
                );
                self.notifications
                    .application_status_changed(&accepted.application)
                    .await;
                Ok(accepted.into())
            }
            OfferDecision::Reject => {
                let rejected = self.store.set_offer_status(offer.id, OfferStatus::Rejected).await?;
                tracing::info!(offer_id = %offer.id, "Offer rejected by candidate");
                Ok(rejected.into())
            }
        }
    }
}
