use serde::{Deserialize, Serialize};

/// `{"message": ...}`, returned by endpoints that have nothing else to say.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: &str) -> MessageBody {
        MessageBody {
            message: message.to_owned(),
        }
    }
}

/// Body of a `201 Created`: a confirmation plus the generated record id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatedBody {
    pub message: String,
    pub id: String,
}
