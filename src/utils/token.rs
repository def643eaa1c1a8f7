use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::auth::Session;
use crate::models::account::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: chrono::DateTime<Utc>,
}

/// Signs and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, subject: Uuid, email: &str, role: Role) -> Result<IssuedToken> {
        self.issue_with_ttl(subject, email, role, self.ttl)
    }

    pub fn issue_with_ttl(
        &self,
        subject: Uuid,
        email: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + ttl;
        let claims = Claims {
            sub: subject,
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("token signing failed: {}", e)))?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<Session> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            Error::Unauthenticated("invalid_token".to_string())
        })?;
        Ok(Session::from(data.claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", 60)
    }

    #[test]
    fn issued_token_round_trips_identity() {
        let svc = service();
        let id = Uuid::new_v4();
        let issued = svc.issue(id, "hr@example.com", Role::HrManager).unwrap();
        let session = svc.verify(&issued.token).unwrap();
        assert_eq!(session.account_id, id);
        assert_eq!(session.email, "hr@example.com");
        assert_eq!(session.role, Role::HrManager);
    }

    #[test]
    fn expired_token_is_unauthenticated() {
        let svc = service();
        let issued = svc
            .issue_with_ttl(Uuid::new_v4(), "a@x.com", Role::Admin, Duration::minutes(-10))
            .unwrap();
        assert!(matches!(svc.verify(&issued.token), Err(Error::Unauthenticated(_))));
    }

    #[test]
    fn foreign_signature_is_unauthenticated() {
        let other = TokenService::new("some-other-secret", 60);
        let issued = other.issue(Uuid::new_v4(), "a@x.com", Role::Admin).unwrap();
        assert!(matches!(service().verify(&issued.token), Err(Error::Unauthenticated(_))));
        assert!(matches!(service().verify("not.a.jwt"), Err(Error::Unauthenticated(_))));
    }
}
