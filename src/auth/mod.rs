//! Bearer-token authentication for owner-scoped routes.
//!
//! Handlers opt in by taking a [`VerifiedUser`] argument. Extraction pulls the
//! token out of `Authorization: Bearer <token>` and asks the configured
//! [`IdentityVerifier`] who it belongs to; the handler then scopes its store
//! operation to that user. Put the extractor after any `Path` argument so a
//! malformed path is rejected before the identity provider is consulted.

use actix_web::dev::Payload;
use actix_web::http::header::{self, HeaderMap};
use actix_web::web::Data;
use actix_web::{FromRequest, HttpRequest};
use async_trait::async_trait;
use futures::future::LocalBoxFuture;

use crate::error::Error;
use crate::user::UserId;

pub mod firebase;

pub use firebase::FirebaseVerifier;

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolves a bearer token to the user it was issued to. Rejected tokens
    /// yield `Error::InvalidToken`; other errors mean the check itself could
    /// not be carried out.
    async fn verify(&self, token: &str) -> Result<UserId, Error>;
}

/// The caller's identity, proven by a bearer token.
#[derive(Clone, Debug)]
pub struct VerifiedUser(pub UserId);

impl VerifiedUser {
    pub fn into_inner(self) -> UserId {
        self.0
    }
}

impl FromRequest for VerifiedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<VerifiedUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = extract_bearer(req.headers()).map(str::to_owned);
        let verifier = req.app_data::<Data<Box<dyn IdentityVerifier>>>().cloned();

        Box::pin(async move {
            let token = token?;
            let verifier = verifier.ok_or_else(|| {
                Error::ExistentialState("no identity verifier registered".to_string())
            })?;

            let user_id = verifier.verify(&token).await?;
            tracing::debug!(%user_id, "verified bearer token");

            Ok(VerifiedUser(user_id))
        })
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Error> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(Error::MissingToken)?
        .to_str()
        .map_err(|_| Error::MissingToken)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(Error::MissingToken)?
        .trim();

    if token.is_empty() {
        return Err(Error::MissingToken);
    }

    Ok(token)
}
