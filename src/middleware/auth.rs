use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::account::Role;
use crate::policy::access::{authorize, Capability};
use crate::utils::token::Claims;
use crate::AppState;

/// The caller identity decoded from a verified bearer token.
///
/// Inserted into request extensions by [`authenticate`]; handlers take it as
/// `Extension<Session>` and pass it down explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub account_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn require(&self, capability: Capability) -> Result<()> {
        authorize(self.role, capability)
    }

    pub fn owns_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

fn bearer_token(req: &Request) -> Result<&str> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::Unauthenticated("missing_authorization".to_string()))?;
    let value = header
        .to_str()
        .map_err(|_| Error::Unauthenticated("bad_authorization".to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Unauthenticated("unsupported_scheme".to_string()))?
        .trim();
    if token.is_empty() {
        return Err(Error::Unauthenticated("missing_token".to_string()));
    }
    Ok(token)
}

pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let session = match bearer_token(&req).and_then(|token| state.tokens.verify(token)) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };
    // Tokens outlive deactivation; the account must still be active.
    if let Err(err) = state.auth_service.current_account(&session).await {
        tracing::debug!(account_id = %session.account_id, error = %err, "Rejected token");
        return err.into_response();
    }
    tracing::debug!(account_id = %session.account_id, role = %session.role, "Authenticated request");
    req.extensions_mut().insert(session);
    next.run(req).await
}

/// Route layer rejecting sessions that lack `capability` before the handler
/// extracts the request body. Must run inside [`authenticate`].
pub async fn require_capability(
    State(capability): State<Capability>,
    req: Request,
    next: Next,
) -> Response {
    let checked = req
        .extensions()
        .get::<Session>()
        .ok_or_else(|| Error::Unauthenticated("missing_session".to_string()))
        .and_then(|session| session.require(capability));
    match checked {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}
