use axum::Json;

use super::MessageData;

pub async fn root() -> Json<MessageData> {
    Json(MessageData::new("Welcome to the Bookmark Manager API"))
}
