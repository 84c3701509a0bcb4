use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::timestamp::WireTimestamp;

/// Identifiers arrive as either JSON strings or numbers depending on the
/// endpoint; normalize to `String`.
pub fn de_flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoomType {
    Group,
    Direct,
    Ai,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Group => "GROUP",
            RoomType::Direct => "DIRECT",
            RoomType::Ai => "AI",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Group => "Group channels",
            RoomType::Direct => "Direct messages",
            RoomType::Ai => "AI advisor",
        }
    }
}

/// A chat channel. Lifecycle is backend-owned; the client only lists, joins
/// and leaves rooms.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "WireRoom")]
pub struct ChatRoom {
    pub id: String,
    pub title: String,
    pub room_type: RoomType,
    pub last_message: Option<String>,
    /// For DIRECT rooms, the other participant when the backend reports one.
    pub counterpart_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireRoom {
    chat_room_id: Option<Value>,
    id: Option<Value>,
    title: Option<String>,
    name: Option<String>,
    room_type: Option<RoomType>,
    #[serde(rename = "type")]
    type_alias: Option<RoomType>,
    last_message: Option<String>,
    last_chat_message: Option<WireLastMessage>,
    invited_user_id: Option<Value>,
    opponent_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireLastMessage {
    content: Option<String>,
}

impl From<WireRoom> for ChatRoom {
    fn from(wire: WireRoom) -> Self {
        let id = wire
            .chat_room_id
            .as_ref()
            .and_then(id_from_value)
            .or_else(|| wire.id.as_ref().and_then(id_from_value))
            .unwrap_or_default();
        ChatRoom {
            id,
            title: wire.title.or(wire.name).unwrap_or_default(),
            room_type: wire.room_type.or(wire.type_alias).unwrap_or(RoomType::Group),
            last_message: wire
                .last_message
                .or(wire.last_chat_message.and_then(|m| m.content)),
            counterpart_id: wire
                .invited_user_id
                .as_ref()
                .and_then(id_from_value)
                .or_else(|| wire.opponent_id.as_ref().and_then(id_from_value)),
        }
    }
}

/// One chat message. `ENTER` messages are join notices rendered as a banner,
/// not as a bubble.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "WireMessage")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: Option<String>,
    pub sender_name: Option<String>,
    pub content: String,
    pub created_at: Option<WireTimestamp>,
    pub is_enter: bool,
}

impl ChatMessage {
    /// Local join notice shown immediately after entering a room.
    pub fn enter_notice(room_id: &str, sender_id: &str, sender_name: &str) -> Self {
        Self {
            id: format!("enter-{room_id}-{}", uuid::Uuid::new_v4()),
            sender_id: Some(sender_id.to_string()),
            sender_name: Some(sender_name.to_string()),
            content: "joined the room".to_string(),
            created_at: Some(WireTimestamp::now()),
            is_enter: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireMessage {
    chat_message_id: Option<Value>,
    message_id: Option<WireNestedId>,
    sender_id: Option<Value>,
    user_id: Option<Value>,
    sender_name: Option<String>,
    content: Option<String>,
    created_at: Option<WireTimestamp>,
    #[serde(rename = "type")]
    type_tag: Option<String>,
    message_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireNestedId {
    chat_message_id: Option<Value>,
    created_at: Option<WireTimestamp>,
}

impl From<WireMessage> for ChatMessage {
    fn from(wire: WireMessage) -> Self {
        let nested = wire.message_id.unwrap_or_default();
        let id = wire
            .chat_message_id
            .as_ref()
            .and_then(id_from_value)
            .or_else(|| nested.chat_message_id.as_ref().and_then(id_from_value))
            // A message without any identifier still needs a stable key for
            // de-duplication within this process.
            .unwrap_or_else(|| format!("local-{}", uuid::Uuid::new_v4()));
        let is_enter = wire
            .type_tag
            .as_deref()
            .or(wire.message_type.as_deref())
            .is_some_and(|t| t == "ENTER");
        ChatMessage {
            id,
            sender_id: wire
                .sender_id
                .as_ref()
                .and_then(id_from_value)
                .or_else(|| wire.user_id.as_ref().and_then(id_from_value)),
            sender_name: wire.sender_name,
            content: wire.content.unwrap_or_default(),
            created_at: wire.created_at.or(nested.created_at),
            is_enter,
        }
    }
}

/// Cursor for backward history pagination: oldest known message id plus its
/// raw created-at value, echoed back to the server verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryCursor {
    pub message_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PromotionState {
    Scheduled,
    Active,
    Ended,
}

impl PromotionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionState::Scheduled => "SCHEDULED",
            PromotionState::Active => "ACTIVE",
            PromotionState::Ended => "ENDED",
        }
    }
}

/// A point lottery event. Status transitions are backend-authoritative; the
/// client only requests them and polls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    #[serde(deserialize_with = "de_flexible_id", default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub point_amount: i64,
    #[serde(default)]
    pub total_stock: i64,
    #[serde(default)]
    pub remaining_stock: Option<i64>,
    #[serde(default)]
    pub start_time: Option<WireTimestamp>,
    #[serde(default)]
    pub end_time: Option<WireTimestamp>,
    pub status: PromotionState,
}

/// Outcome of joining a promotion, as reported by the participations endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Participation {
    #[serde(alias = "winner")]
    pub is_winner: Option<bool>,
    pub queue_position: Option<i64>,
    pub point_amount: Option<i64>,
    #[serde(deserialize_with = "de_flexible_id")]
    pub promotion_id: Option<String>,
}

/// Live counters for a running promotion (admin monitoring).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromotionLiveStatus {
    pub status: Option<String>,
    pub remaining_stock: Option<i64>,
    pub participant_count: Option<i64>,
    pub winner_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Winner {
    #[serde(deserialize_with = "de_flexible_id")]
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub queue_position: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointSummary {
    #[serde(deserialize_with = "de_flexible_id")]
    pub user_id: Option<String>,
    pub total_points: i64,
    pub earned_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointHistory {
    #[serde(deserialize_with = "de_flexible_id")]
    pub point_id: Option<String>,
    #[serde(deserialize_with = "de_flexible_id")]
    pub promotion_id: Option<String>,
    pub promotion_name: Option<String>,
    pub amount: i64,
    pub queue_position: Option<i64>,
    pub earned_at: Option<WireTimestamp>,
}

/// An advisor-offered consultation service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    #[serde(deserialize_with = "de_flexible_id")]
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub price: Option<i64>,
    #[serde(deserialize_with = "de_flexible_id")]
    pub advisor_id: Option<String>,
    pub advisor_name: Option<String>,
    pub start_time: Option<WireTimestamp>,
    pub end_time: Option<WireTimestamp>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reservation {
    #[serde(deserialize_with = "de_flexible_id")]
    pub reservation_id: Option<String>,
    #[serde(deserialize_with = "de_flexible_id")]
    pub product_id: Option<String>,
    #[serde(deserialize_with = "de_flexible_id")]
    pub user_id: Option<String>,
    pub product_name: Option<String>,
    pub status: Option<String>,
}

/// Result of initializing a payment: the order the hosted checkout settles.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentInit {
    pub order_id: String,
    pub amount: i64,
    pub checkout_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserGoal {
    pub age: Option<i64>,
    pub job: Option<String>,
    pub capital: Option<i64>,
    pub monthly_income: Option<i64>,
    pub fixed_expenses: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalReport {
    #[serde(deserialize_with = "de_flexible_id")]
    pub report_id: Option<String>,
    pub question: Option<String>,
    pub result_report: Option<String>,
    pub created_at: Option<WireTimestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(deserialize_with = "de_flexible_id")]
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub user_name: Option<String>,
    #[serde(alias = "roles")]
    pub role: Option<String>,
    pub slack_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginResult {
    pub access_token: Option<String>,
    #[serde(alias = "roles")]
    pub role: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "de_flexible_id")]
    pub user_id: Option<String>,
}

/// A linked bank account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    #[serde(deserialize_with = "de_flexible_id")]
    pub account_id: Option<String>,
    pub organization: Option<String>,
    pub account_number: Option<String>,
    pub balance: Option<i64>,
    pub is_transaction_sync: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    #[serde(deserialize_with = "de_flexible_id")]
    pub account_id: Option<String>,
    pub amount: Option<i64>,
    pub description: Option<String>,
    pub tran_type: Option<String>,
    pub occurred_at: Option<WireTimestamp>,
}

/// Paged envelope payload (`{content, totalElements}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn room_tolerates_both_id_and_title_spellings() {
        let a: ChatRoom =
            serde_json::from_value(json!({"chatRoomId": 7, "title": "Savings club"})).unwrap();
        assert_eq!(a.id, "7");
        assert_eq!(a.title, "Savings club");

        let b: ChatRoom = serde_json::from_value(
            json!({"id": "room-9", "name": "Advice", "type": "DIRECT"}),
        )
        .unwrap();
        assert_eq!(b.id, "room-9");
        assert_eq!(b.room_type, RoomType::Direct);
    }

    #[test]
    fn room_preview_falls_back_to_nested_last_message() {
        let room: ChatRoom = serde_json::from_value(
            json!({"chatRoomId": 1, "title": "t", "lastChatMessage": {"content": "hello"}}),
        )
        .unwrap();
        assert_eq!(room.last_message.as_deref(), Some("hello"));
    }

    #[test]
    fn message_id_falls_back_to_nested_message_id() {
        let msg: ChatMessage = serde_json::from_value(json!({
            "messageId": {"chatMessageId": "m-1", "createdAt": [2025, 5, 3, 10, 0, 0]},
            "senderId": 42,
            "content": "hi"
        }))
        .unwrap();
        assert_eq!(msg.id, "m-1");
        assert_eq!(msg.sender_id.as_deref(), Some("42"));
        assert!(msg.created_at.unwrap().to_datetime().is_some());
    }

    #[test]
    fn enter_tag_is_recognized_in_both_fields() {
        let a: ChatMessage =
            serde_json::from_value(json!({"chatMessageId": "1", "type": "ENTER"})).unwrap();
        let b: ChatMessage =
            serde_json::from_value(json!({"chatMessageId": "2", "messageType": "ENTER"}))
                .unwrap();
        let c: ChatMessage =
            serde_json::from_value(json!({"chatMessageId": "3", "type": "TALK"})).unwrap();
        assert!(a.is_enter && b.is_enter && !c.is_enter);
    }

    #[test]
    fn message_without_id_gets_a_local_one() {
        let msg: ChatMessage = serde_json::from_value(json!({"content": "x"})).unwrap();
        assert!(msg.id.starts_with("local-"));
    }

    #[test]
    fn promotion_numeric_id_is_stringified() {
        let promo: Promotion = serde_json::from_value(json!({
            "id": 12,
            "name": "Spring draw",
            "pointAmount": 500,
            "totalStock": 100,
            "status": "ACTIVE"
        }))
        .unwrap();
        assert_eq!(promo.id.as_deref(), Some("12"));
        assert_eq!(promo.status, PromotionState::Active);
    }
}
