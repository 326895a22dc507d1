use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

use crate::fields;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type CampaignId = TypedId<Campaign>;

/// A fundraising campaign. Only the id is interpreted; the owner's `userId`,
/// title, goal and anything else the client sends ride along in `fields`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: CampaignId,
    #[serde(flatten)]
    pub fields: Document,
}

impl Campaign {
    /// The owning user, if `userId` holds a string.
    pub fn owner(&self) -> Option<&str> {
        fields::owner(&self.fields)
    }
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CPN"
    }
}
