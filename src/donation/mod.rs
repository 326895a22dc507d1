use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

use crate::fields;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type DonationId = TypedId<Donation>;

/// A recorded donation. The donor's `userId`, the amount and the campaign
/// reference live in `fields` and are not checked against anything.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Donation {
    #[serde(rename = "_id")]
    pub id: DonationId,
    #[serde(flatten)]
    pub fields: Document,
}

impl Donation {
    pub fn owner(&self) -> Option<&str> {
        fields::owner(&self.fields)
    }
}

impl TypedIdMarker for Donation {
    fn tag() -> &'static str {
        "DON"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc, oid::ObjectId};

    #[test]
    fn decodes_donations_with_any_owner_type() {
        for owner in [bson::Bson::from("u1"), bson::Bson::Int32(7), bson::Bson::Null] {
            let bytes =
                bson::to_vec(&doc! { "_id": ObjectId::new(), "amount": 10, "userId": owner.clone() })
                    .unwrap();

            let donation: Donation = bson::from_slice(&bytes).unwrap();

            assert_eq!(donation.fields.get("userId"), Some(&owner));
        }
    }
}
