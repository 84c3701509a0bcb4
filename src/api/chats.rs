use serde::Serialize;
use serde_json::{Value, json};

use super::{ApiClient, ApiError};
use crate::common::types::{ChatMessage, ChatRoom, HistoryCursor, RoomType};

pub const HISTORY_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_type: RoomType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_user_name: Option<String>,
}

impl CreateRoomRequest {
    pub fn group(title: &str) -> Self {
        Self {
            room_type: RoomType::Group,
            title: Some(title.to_string()),
            invite_user_id: None,
            invited_user_name: None,
        }
    }

    pub fn direct(user_id: &str, user_name: &str) -> Self {
        Self {
            room_type: RoomType::Direct,
            title: None,
            invite_user_id: Some(user_id.to_string()),
            invited_user_name: Some(user_name.to_string()),
        }
    }

    pub fn ai(user_id: &str) -> Self {
        Self {
            room_type: RoomType::Ai,
            title: None,
            invite_user_id: Some(user_id.to_string()),
            invited_user_name: None,
        }
    }
}

/// The chat endpoints are not enveloped consistently: lists arrive as a bare
/// array, under `rooms`/`messages`, or under `result`.
fn extract_list(value: Value, keys: &[&str]) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in keys {
                if let Some(Value::Array(items)) = map.remove(*key) {
                    return items;
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

impl ApiClient {
    pub async fn list_rooms(&self, room_type: RoomType) -> Result<Vec<ChatRoom>, ApiError> {
        let raw: Value = self
            .get_query(
                "/v1/chats/room",
                &[("roomType", room_type.as_str().to_string())],
            )
            .await?;
        let mut rooms: Vec<ChatRoom> = extract_list(raw, &["rooms", "result"])
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .filter(|room: &ChatRoom| !room.id.is_empty())
            .collect();
        // The backend occasionally lists the same room twice.
        let mut seen = std::collections::HashSet::new();
        rooms.retain(|room| seen.insert(room.id.clone()));
        Ok(rooms)
    }

    pub async fn create_room(&self, req: &CreateRoomRequest) -> Result<ChatRoom, ApiError> {
        let raw: Value = self.post_json("/v1/chats/room", req).await?;
        let payload = match raw {
            Value::Object(ref map) if map.contains_key("result") => {
                raw.get("result").cloned().unwrap_or(Value::Null)
            }
            other => other,
        };
        serde_json::from_value(payload).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Marks membership server-side. The response body carries no payload the
    /// client needs.
    pub async fn join_room(&self, room_id: &str) -> Result<(), ApiError> {
        let _: Value = self
            .post_json(&format!("/v1/chats/room/{room_id}/join"), &json!({}))
            .await?;
        Ok(())
    }

    pub async fn leave_room(&self, room_id: &str, user_id: &str) -> Result<(), ApiError> {
        let _: Value = self
            .post_json(
                &format!("/v1/chats/room/{room_id}/leave"),
                &json!({ "userId": user_id }),
            )
            .await?;
        Ok(())
    }

    /// One history page, newest-first. `before` is the oldest loaded
    /// message's (id, raw created-at) pair for backward pagination.
    pub async fn message_history(
        &self,
        room_id: &str,
        size: usize,
        before: Option<&HistoryCursor>,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        let mut query = vec![("size", size.to_string())];
        if let Some(cursor) = before {
            query.push(("beforeMessageId", cursor.message_id.clone()));
            query.push(("beforeCreatedAt", cursor.created_at.clone()));
        }
        let raw: Value = self
            .get_query(&format!("/v1/chats/message/{room_id}"), &query)
            .await?;
        Ok(extract_list(raw, &["messages", "result"])
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Some("tkn".to_string()))
    }

    #[tokio::test]
    async fn list_rooms_sends_bearer_and_dedups() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/chats/room"))
            .and(query_param("roomType", "GROUP"))
            .and(header("Authorization", "Bearer tkn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [
                    {"chatRoomId": 1, "title": "a"},
                    {"chatRoomId": 1, "title": "a"},
                    {"chatRoomId": 2, "title": "b"}
                ]
            })))
            .mount(&server)
            .await;

        let rooms = client(&server).list_rooms(RoomType::Group).await.unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id, "1");
    }

    #[tokio::test]
    async fn list_rooms_accepts_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/chats/room"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": "r1", "name": "direct"}])),
            )
            .mount(&server)
            .await;

        let rooms = client(&server).list_rooms(RoomType::Direct).await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].title, "direct");
    }

    #[tokio::test]
    async fn history_passes_cursor_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/chats/message/r1"))
            .and(query_param("size", "20"))
            .and(query_param("beforeMessageId", "m-5"))
            .and(query_param("beforeCreatedAt", "2025,5,3,10,0,0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [{"chatMessageId": "m-4", "content": "older"}]
            })))
            .mount(&server)
            .await;

        let cursor = HistoryCursor {
            message_id: "m-5".to_string(),
            created_at: "2025,5,3,10,0,0".to_string(),
        };
        let page = client(&server)
            .message_history("r1", HISTORY_PAGE_SIZE, Some(&cursor))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "m-4");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_typed_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/chats/room"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client(&server).list_rooms(RoomType::Group).await.unwrap_err();
        assert!(err.is_unauthorized());
    }
}
