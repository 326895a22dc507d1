use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::Bson;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub trait TypedIdMarker {
    fn tag() -> &'static str;
}

/// A record id bound to the record kind it identifies. Stored as a plain
/// ObjectId, so the marker only exists at compile time.
pub struct TypedId<T: TypedIdMarker>(ObjectId, PhantomData<T>);

impl<T: TypedIdMarker> TypedId<T> {
    pub fn new() -> TypedId<T> {
        TypedId(ObjectId::new(), PhantomData)
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl<T: TypedIdMarker> Default for TypedId<T> {
    fn default() -> TypedId<T> {
        TypedId::new()
    }
}

impl<T: TypedIdMarker> Copy for TypedId<T> {}

impl<T: TypedIdMarker> Clone for TypedId<T> {
    fn clone(&self) -> TypedId<T> {
        *self
    }
}

impl<T: TypedIdMarker> PartialEq for TypedId<T> {
    fn eq(&self, other: &TypedId<T>) -> bool {
        self.0 == other.0
    }
}

impl<T: TypedIdMarker> Eq for TypedId<T> {}

impl<T: TypedIdMarker> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T: TypedIdMarker> Display for TypedId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0.to_hex())
    }
}

impl<T: TypedIdMarker> Debug for TypedId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}-{}", T::tag(), self.0.to_hex())
    }
}

impl<T: TypedIdMarker> FromStr for TypedId<T> {
    type Err = TypedIdParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 24 {
            return Err(TypedIdParseError::InvalidLength);
        }

        let oid = ObjectId::parse_str(s).map_err(|_| TypedIdParseError::InvalidHex)?;

        Ok(TypedId(oid, PhantomData))
    }
}

impl<T: TypedIdMarker> From<ObjectId> for TypedId<T> {
    fn from(oid: ObjectId) -> TypedId<T> {
        TypedId(oid, PhantomData)
    }
}

// serializes as a real ObjectId when talking to the database, and as
// `{"$oid": ...}` elsewhere; use `typedid::hex` for plain strings
impl<T: TypedIdMarker> Serialize for TypedId<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, T: TypedIdMarker> Deserialize<'de> for TypedId<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TypedIdVisitor(PhantomData))
    }
}

struct TypedIdVisitor<T>(PhantomData<T>);

impl<'de, T: TypedIdMarker> Visitor<'de> for TypedIdVisitor<T> {
    type Value = TypedId<T>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a {} id as a 24 character hex string", T::tag())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<TypedId<T>, E> {
        TypedId::from_str(v)
            .map_err(|err| E::custom(format!("invalid {} id format: {}", T::tag(), err)))
    }

    // bson hands ObjectIds over as `{"$oid": "<hex>"}`
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TypedId<T>, A::Error> {
        let key: String = map
            .next_key()?
            .ok_or_else(|| de::Error::missing_field("$oid"))?;
        if key != "$oid" {
            return Err(de::Error::unknown_field(&key, &["$oid"]));
        }

        let hex: String = map.next_value()?;
        self.visit_str(&hex)
    }
}

impl<T: TypedIdMarker> From<TypedId<T>> for Bson {
    fn from(id: TypedId<T>) -> Bson {
        Bson::ObjectId(id.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypedIdParseError {
    InvalidLength,
    InvalidHex,
}

impl Display for TypedIdParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            TypedIdParseError::InvalidLength => f.write_str("expected 24 hex characters"),
            TypedIdParseError::InvalidHex => f.write_str("not a hex string"),
        }
    }
}

/// Serde helpers rendering a `TypedId` as its bare hex string, for JSON
/// bodies.
pub mod hex {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{TypedId, TypedIdMarker};

    pub fn serialize<T, S>(id: &TypedId<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: TypedIdMarker,
        S: Serializer,
    {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<TypedId<T>, D::Error>
    where
        T: TypedIdMarker,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    struct Thing;

    impl TypedIdMarker for Thing {
        fn tag() -> &'static str {
            "THG"
        }
    }

    type ThingId = TypedId<Thing>;

    #[test]
    fn parses_hex_object_ids() {
        let id: ThingId = "65f1c2a4b7e3d90012ab34cd".parse().unwrap();

        assert_eq!(id.to_string(), "65f1c2a4b7e3d90012ab34cd");
        assert_eq!(format!("{:?}", id), "THG-65f1c2a4b7e3d90012ab34cd");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert_eq!(
            "abc".parse::<ThingId>().unwrap_err(),
            TypedIdParseError::InvalidLength
        );
        assert_eq!(
            "zzzzzzzzzzzzzzzzzzzzzzzz".parse::<ThingId>().unwrap_err(),
            TypedIdParseError::InvalidHex
        );
    }

    #[test]
    fn stores_as_object_id() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            #[serde(rename = "_id")]
            id: ThingId,
        }

        let id = ThingId::new();
        let doc = bson::to_document(&Wrapper { id }).unwrap();
        assert_eq!(doc.get_object_id("_id").unwrap(), id.object_id());

        let back: Wrapper = bson::from_document(doc).unwrap();
        assert_eq!(back.id, id);
    }

    #[test]
    fn hex_helper_renders_plain_string() {
        #[derive(Serialize, Deserialize)]
        struct Body {
            #[serde(with = "hex")]
            id: ThingId,
        }

        let id: ThingId = "65f1c2a4b7e3d90012ab34cd".parse().unwrap();
        let json = serde_json::to_value(Body { id }).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "65f1c2a4b7e3d90012ab34cd" }));

        let back: Body = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, id);
    }
}
