use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// Account data as served by `GET /api/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}
