use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::user::UserId;

use super::IdentityVerifier;

/// Google's signing keys for Firebase ID tokens, in JWK form.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
}

/// Verifies Firebase Authentication ID tokens: RS256 JWTs signed by one of
/// Google's published keys, issued for this project, and not expired. The
/// token's subject is the Firebase `uid`.
#[derive(Debug, Clone)]
pub struct FirebaseVerifier {
    client: reqwest::Client,
    project_id: String,
    jwks_url: String,
}

impl FirebaseVerifier {
    pub fn new(project_id: String) -> FirebaseVerifier {
        FirebaseVerifier::with_jwks_url(project_id, FIREBASE_JWKS_URL.to_string())
    }

    pub fn with_jwks_url(project_id: String, jwks_url: String) -> FirebaseVerifier {
        FirebaseVerifier {
            client: reqwest::Client::new(),
            project_id,
            jwks_url,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("{}{}", FIREBASE_ISSUER_PREFIX, self.project_id)]);
        validation
    }

    async fn fetch_keys(&self) -> Result<JwkSet, Error> {
        let keys = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(keys)
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    #[tracing::instrument(skip(self, token))]
    async fn verify(&self, token: &str) -> Result<UserId, Error> {
        let header = jsonwebtoken::decode_header(token).map_err(|err| {
            debug!(%err, "rejected token with unreadable header");
            Error::InvalidToken
        })?;

        if header.alg != Algorithm::RS256 {
            debug!(alg = ?header.alg, "rejected token with unexpected algorithm");
            return Err(Error::InvalidToken);
        }

        let kid = header.kid.ok_or_else(|| {
            debug!("rejected token without key id");
            Error::InvalidToken
        })?;

        let keys = self.fetch_keys().await?;
        let jwk = keys.find(&kid).ok_or_else(|| {
            debug!(%kid, "rejected token signed by unknown key");
            Error::InvalidToken
        })?;
        let key = DecodingKey::from_jwk(jwk).map_err(|err| {
            debug!(%err, %kid, "could not use published signing key");
            Error::InvalidToken
        })?;

        let data = jsonwebtoken::decode::<FirebaseClaims>(token, &key, &self.validation())
            .map_err(|err| {
                debug!(%err, "rejected token");
                Error::InvalidToken
            })?;

        if data.claims.sub.is_empty() {
            debug!("rejected token with empty subject");
            return Err(Error::InvalidToken);
        }

        Ok(UserId::from(data.claims.sub))
    }
}
