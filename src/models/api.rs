use serde::{ Serialize, Deserialize };

/// Body of `POST /chat`. Both fields are required.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
}
