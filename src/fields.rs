//! Free-form record fields. Everything the client sends beyond the id,
//! including the owner's `userId`, is kept as a BSON document and handed
//! back untouched.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};

/// The server assigns record ids; a client-supplied `_id` is dropped.
pub fn without_id(mut fields: Document) -> Document {
    fields.remove("_id");
    fields
}

/// The owning user recorded under `userId`. Owners are only ever matched
/// as strings, so any other stored value means "no owner".
pub fn owner(fields: &Document) -> Option<&str> {
    fields.get_str("userId").ok()
}

/// Renders a record id: ObjectIds as their bare hex string, anything else
/// as relaxed extended JSON.
pub fn id_into_json(id: Bson) -> Value {
    match id {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        other => other.into_relaxed_extjson(),
    }
}

/// Renders stored fields as relaxed extended JSON, so numbers stay numbers
/// and ObjectIds or dates come out as `{"$oid": ...}` / `{"$date": ...}`.
pub fn into_json(fields: Document) -> Map<String, Value> {
    match Bson::Document(fields).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
