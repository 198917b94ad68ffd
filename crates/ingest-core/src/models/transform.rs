use serde::{Deserialize, Serialize};

/// Notification body sent to the transform service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    pub location: String,
    pub mime_type: String,
    pub metacard_location: String,
}

/// Optional acknowledgement returned with a 202 from the transform service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformAck {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
