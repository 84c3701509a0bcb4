use std::collections::HashSet;

use crate::common::types::{ChatMessage, ChatRoom, HistoryCursor};

pub use crate::api::chats::HISTORY_PAGE_SIZE;

/// Bookkeeping for the active chat room: the ordered, de-duplicated message
/// list, the backward-pagination cursor and the single in-flight guard.
///
/// History pages and live pushes arrive concurrently; a message id seen in
/// both (an echo of our own send landing in a later history fetch, or pages
/// overlapping) must render exactly once. All merging is id-based, so the
/// session never trusts ordering across sources beyond "pages are
/// newest-first, pushes are append".
#[derive(Debug, Default)]
pub struct RoomSession {
    room: Option<ChatRoom>,
    messages: Vec<ChatMessage>,
    seen: HashSet<String>,
    cursor: Option<HistoryCursor>,
    has_more: bool,
    loading: bool,
}

impl RoomSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room(&self) -> Option<&ChatRoom> {
        self.room.as_ref()
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room.as_ref().map(|r| r.id.as_str())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Switch to a room. Cursors, the seen-set and the message list reset;
    /// the initial history load counts as in-flight until it lands.
    pub fn begin_room(&mut self, room: ChatRoom) {
        self.room = Some(room);
        self.messages.clear();
        self.seen.clear();
        self.cursor = None;
        self.has_more = true;
        self.loading = true;
    }

    /// Back to "no room selected".
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Claims the in-flight slot for a backward-pagination request and hands
    /// out the cursor. `None` while a request is outstanding, when the
    /// backend has no older pages, or before the first page has landed.
    pub fn try_begin_older(&mut self) -> Option<HistoryCursor> {
        if self.loading || !self.has_more {
            return None;
        }
        let cursor = self.cursor.clone()?;
        self.loading = true;
        Some(cursor)
    }

    /// Clears the in-flight flag after a failed request so the user can
    /// retry by scrolling again.
    pub fn abort_loading(&mut self) {
        self.loading = false;
    }

    /// Applies one history page (newest-first, as served). Initial pages
    /// replace the list; older pages are prepended. A response tagged with a
    /// different room id is stale — it raced a room switch — and is dropped.
    pub fn apply_history(&mut self, room_id: &str, page: Vec<ChatMessage>, older: bool) {
        if self.room_id() != Some(room_id) {
            log::debug!("dropping stale history page for room {room_id}");
            return;
        }
        self.loading = false;
        self.has_more = page.len() == HISTORY_PAGE_SIZE;
        if let Some(oldest) = page.last() {
            let created_at = oldest
                .created_at
                .as_ref()
                .and_then(|ts| ts.cursor_value())
                .unwrap_or_default();
            self.cursor = Some(HistoryCursor {
                message_id: oldest.id.clone(),
                created_at,
            });
        }
        let mut chronological: Vec<ChatMessage> = page
            .into_iter()
            .rev()
            .filter(|msg| self.seen.insert(msg.id.clone()))
            .collect();
        if older {
            chronological.append(&mut self.messages);
            self.messages = chronological;
        } else {
            self.messages = chronological;
        }
    }

    /// Applies a live push. Returns false when the message is for another
    /// room or a duplicate of one already rendered.
    pub fn apply_push(&mut self, room_id: &str, message: ChatMessage) -> bool {
        if self.room_id() != Some(room_id) {
            return false;
        }
        if !self.seen.insert(message.id.clone()) {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Appends a client-side notice (e.g. the ENTER banner after a join).
    pub fn push_local_notice(&mut self, message: ChatMessage) {
        if self.seen.insert(message.id.clone()) {
            self.messages.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::RoomType;
    use serde_json::json;

    fn room(id: &str) -> ChatRoom {
        serde_json::from_value(json!({
            "chatRoomId": id,
            "title": format!("room {id}"),
            "roomType": "GROUP"
        }))
        .unwrap()
    }

    fn msg(id: u32) -> ChatMessage {
        serde_json::from_value(json!({
            "chatMessageId": format!("m-{id}"),
            "senderId": 1,
            "content": format!("message {id}"),
            "createdAt": format!("2025-05-03T10:{:02}:00", id % 60)
        }))
        .unwrap()
    }

    /// Newest-first page covering ids `range` (ascending chronological ids).
    fn page(range: std::ops::Range<u32>) -> Vec<ChatMessage> {
        range.rev().map(msg).collect()
    }

    #[test]
    fn room_has_group_type() {
        assert_eq!(room("r").room_type, RoomType::Group);
    }

    #[test]
    fn initial_page_is_rendered_chronologically() {
        let mut session = RoomSession::new();
        session.begin_room(room("r1"));
        session.apply_history("r1", page(5..25), false);
        let ids: Vec<&str> = session.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"m-5"));
        assert_eq!(ids.last(), Some(&"m-24"));
        assert!(session.has_more());
        assert!(!session.is_loading());
    }

    #[test]
    fn scenario_25_messages_two_pages() {
        // Room with 25 stored messages: opening loads the latest 20,
        // scrolling up fetches the remaining 5 via the oldest-loaded cursor.
        let mut session = RoomSession::new();
        session.begin_room(room("r1"));
        session.apply_history("r1", page(5..25), false);

        let cursor = session.try_begin_older().expect("cursor after first page");
        assert_eq!(cursor.message_id, "m-5");
        assert_eq!(cursor.created_at, "2025-05-03T10:05:00");

        session.apply_history("r1", page(0..5), true);
        assert_eq!(session.messages().len(), 25);
        let ids: Vec<&str> = session.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"m-0"));
        assert_eq!(ids.last(), Some(&"m-24"));
        // Short page: no more history.
        assert!(!session.has_more());
        assert!(session.try_begin_older().is_none());
    }

    #[test]
    fn only_one_older_request_in_flight() {
        let mut session = RoomSession::new();
        session.begin_room(room("r1"));
        session.apply_history("r1", page(0..20), false);

        assert!(session.try_begin_older().is_some());
        // Second rapid trigger before the first resolves: no request.
        assert!(session.try_begin_older().is_none());

        session.apply_history("r1", page(0..0), true);
        // Empty page means exhausted, still no second request.
        assert!(session.try_begin_older().is_none());
    }

    #[test]
    fn failed_request_releases_the_guard() {
        let mut session = RoomSession::new();
        session.begin_room(room("r1"));
        session.apply_history("r1", page(0..20), false);
        assert!(session.try_begin_older().is_some());
        session.abort_loading();
        assert!(session.try_begin_older().is_some());
    }

    #[test]
    fn push_and_history_overlap_renders_once() {
        let mut session = RoomSession::new();
        session.begin_room(room("r1"));
        session.apply_history("r1", page(0..20), false);

        // Echo of our own send arrives over the topic...
        assert!(session.apply_push("r1", msg(20)));
        // ...then again inside a refetched page.
        session.apply_history("r1", page(1..21), true);
        let count = session
            .messages()
            .iter()
            .filter(|m| m.id == "m-20")
            .count();
        assert_eq!(count, 1);
        // And a duplicate push is ignored outright.
        assert!(!session.apply_push("r1", msg(20)));
    }

    #[test]
    fn stale_history_for_previous_room_is_dropped() {
        let mut session = RoomSession::new();
        session.begin_room(room("r1"));
        session.begin_room(room("r2"));
        // The slow response for r1 lands after the switch.
        session.apply_history("r1", page(0..20), false);
        assert!(session.messages().is_empty());
        // r2's own page applies normally.
        session.apply_history("r2", page(0..20), false);
        assert_eq!(session.messages().len(), 20);
    }

    #[test]
    fn push_for_other_room_is_ignored() {
        let mut session = RoomSession::new();
        session.begin_room(room("r2"));
        session.apply_history("r2", vec![], false);
        assert!(!session.apply_push("r1", msg(1)));
        assert!(session.messages().is_empty());
    }

    #[test]
    fn leave_clears_everything() {
        let mut session = RoomSession::new();
        session.begin_room(room("r1"));
        session.apply_history("r1", page(0..20), false);
        session.clear();
        assert!(session.room().is_none());
        assert!(session.messages().is_empty());
        assert!(session.try_begin_older().is_none());
    }

    #[test]
    fn enter_notice_is_kept_after_history() {
        let mut session = RoomSession::new();
        session.begin_room(room("r1"));
        session.apply_history("r1", page(0..20), false);
        session.push_local_notice(ChatMessage::enter_notice("r1", "u1", "Jun"));
        assert!(session.messages().last().unwrap().is_enter);
        assert_eq!(session.messages().len(), 21);
    }
}
