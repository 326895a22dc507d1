use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

/// A profile in the `people` collection. The collection is filled outside
/// this service, so the id is whatever the writer chose.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: Bson,
    #[serde(flatten)]
    pub fields: Document,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc, oid::ObjectId};

    fn decode(document: Document) -> Person {
        let bytes = bson::to_vec(&document).unwrap();
        bson::from_slice(&bytes).unwrap()
    }

    #[test]
    fn decodes_object_id_and_foreign_ids() {
        let oid = ObjectId::new();

        let by_oid = decode(doc! { "_id": oid, "name": "Ada" });
        let by_uid = decode(doc! { "_id": "firebase-uid-abc", "name": "Grace" });

        assert_eq!(by_oid.id, Bson::ObjectId(oid));
        assert_eq!(by_uid.id, Bson::String("firebase-uid-abc".to_string()));
        assert_eq!(by_uid.fields, doc! { "name": "Grace" });
    }
}
