use std::sync::Arc;

use crate::dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::Session;
use crate::models::account::{Account, NewAccount, Role};
use crate::repository::Store;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::TokenService;
use crate::utils::validation::{normalize_email, validate};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<AuthResponse> {
        validate(&payload)?;
        let email = normalize_email(&payload.email);

        let account = self
            .store
            .find_account_by_email(&email)
            .await?
            .filter(|account| verify_password(&payload.password, &account.password_hash))
            .ok_or_else(|| {
                tracing::info!(email = %email, "Rejected login attempt");
                Error::Unauthenticated("invalid_credentials".to_string())
            })?;
        if !account.is_active {
            return Err(Error::Unauthenticated("account_deactivated".to_string()));
        }

        let issued = self.tokens.issue(account.id, &account.email, account.role)?;
        tracing::info!(account_id = %account.id, role = %account.role, "Issued session token");
        Ok(AuthResponse::new(issued, account))
    }

    /// Self-registration always creates a candidate account.
    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthResponse> {
        validate(&payload)?;
        let account = self
            .store
            .insert_account(NewAccount {
                email: normalize_email(&payload.email),
                password_hash: hash_password(&payload.password)?,
                full_name: payload.full_name.trim().to_string(),
                role: Role::Candidate,
            })
            .await?;

        let issued = self.tokens.issue(account.id, &account.email, account.role)?;
        tracing::info!(account_id = %account.id, "Registered candidate account");
        Ok(AuthResponse::new(issued, account))
    }

    pub async fn current_account(&self, session: &Session) -> Result<Account> {
        let account = self
            .store
            .find_account(session.account_id)
            .await?
            .ok_or_else(|| Error::Unauthenticated("account_not_found".to_string()))?;
        if !account.is_active {
            return Err(Error::Unauthenticated("account_deactivated".to_string()));
        }
        Ok(account)
    }

    /// Creates the bootstrap administrator when no admin exists yet.
    pub async fn seed_admin(&self, email: &str, password: &str) -> Result<Option<Account>> {
        if self.store.count_accounts_with_role(Role::Admin).await? > 0 {
            return Ok(None);
        }
        let account = self
            .store
            .insert_account(NewAccount {
                email: normalize_email(email),
                password_hash: hash_password(password)?,
                full_name: "Administrator".to_string(),
                role: Role::Admin,
            })
            .await?;
        tracing::info!(account_id = %account.id, email = %account.email, "Seeded administrator account");
        Ok(Some(account))
    }
}
