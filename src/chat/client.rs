use std::error::Error;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::api::ApiClient;
use crate::chat::session::HISTORY_PAGE_SIZE;
use crate::chat::stomp;
use crate::common::types::{ChatMessage, ChatRoom};
use crate::common::{ChatCommand, ChatEvent};
use crate::config::AppConfig;

/// Fixed reconnect delay; retries never give up and never back off further.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);
const CONNECT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;
type WsError = tokio_tungstenite::tungstenite::Error;

struct ActiveRoom {
    room: ChatRoom,
    sub_id: String,
    topic: String,
}

/// The chat task: owns the STOMP session and the room subscription
/// lifecycle. Talks to the UI exclusively through the command/event channels.
pub struct ChatClient {
    api_base: String,
    ws_url: String,
    event_tx: mpsc::Sender<ChatEvent>,
    command_rx: mpsc::Receiver<ChatCommand>,
}

impl ChatClient {
    pub fn new(
        config: &AppConfig,
        event_tx: mpsc::Sender<ChatEvent>,
        command_rx: mpsc::Receiver<ChatCommand>,
    ) -> Self {
        Self {
            api_base: config.api_base.clone(),
            ws_url: config.ws_url.clone(),
            event_tx,
            command_rx,
        }
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        // The broker rejects anonymous sessions, so nothing to do until the
        // UI hands over a token.
        let token = loop {
            match self.command_rx.recv().await {
                Some(ChatCommand::Connect { token }) => break token,
                Some(other) => log::warn!("chat command before connect: {other:?}"),
                None => return Ok(()),
            }
        };
        let api = ApiClient::new(&self.api_base, Some(token.clone()));
        let host = url::Url::parse(&self.ws_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "localhost".to_string());

        let mut active: Option<ActiveRoom> = None;
        let mut sub_seq: u64 = 0;

        // One iteration per (re)connection.
        loop {
            let ws = match tokio_tungstenite::connect_async(self.ws_url.as_str()).await {
                Ok((ws, _resp)) => ws,
                Err(err) => {
                    log::warn!("broker dial failed: {err}");
                    self.emit(ChatEvent::Disconnected).await;
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    continue;
                }
            };
            let (mut write, mut read) = ws.split();

            let connect = stomp::connect_frame(&host, &token);
            if write.send(Message::text(connect.encode())).await.is_err()
                || !await_connected(&mut read).await
            {
                log::warn!("STOMP handshake failed");
                self.emit(ChatEvent::Disconnected).await;
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
            log::info!("STOMP session established");
            self.emit(ChatEvent::Connected).await;

            // Re-open the subscription lost with the previous socket.
            if let Some(active) = active.as_mut() {
                sub_seq += 1;
                active.sub_id = format!("sub-{sub_seq}");
                let frame = stomp::subscribe_frame(&active.sub_id, &active.topic);
                if write.send(Message::text(frame.encode())).await.is_err() {
                    self.emit(ChatEvent::Disconnected).await;
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    continue;
                }
            }

            loop {
                tokio::select! {
                    command = self.command_rx.recv() => {
                        let Some(command) = command else {
                            // UI is gone; close politely and stop.
                            let _ = write.close().await;
                            return Ok(());
                        };
                        if let Err(err) = self
                            .handle_command(command, &api, &mut write, &mut active, &mut sub_seq)
                            .await
                        {
                            log::warn!("socket write failed: {err}");
                            break;
                        }
                    }
                    incoming = read.next() => {
                        match incoming {
                            Some(Ok(Message::Text(text))) => {
                                self.handle_frame(text.as_str(), active.as_ref()).await;
                            }
                            Some(Ok(Message::Close(_))) | None => break,
                            Some(Ok(_)) => {}
                            Some(Err(err)) => {
                                log::warn!("socket error: {err}");
                                break;
                            }
                        }
                    }
                }
            }

            self.emit(ChatEvent::Disconnected).await;
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    async fn handle_command(
        &self,
        command: ChatCommand,
        api: &ApiClient,
        write: &mut WsWriter,
        active: &mut Option<ActiveRoom>,
        sub_seq: &mut u64,
    ) -> Result<(), WsError> {
        match command {
            ChatCommand::Connect { .. } => {
                log::warn!("already connected; ignoring Connect");
            }
            ChatCommand::JoinRoom { room } => {
                if let Err(err) = api.join_room(&room.id).await {
                    log::error!("joining room {} failed: {err}", room.id);
                    self.emit(ChatEvent::Error(format!("could not join room: {err}")))
                        .await;
                    return Ok(());
                }
                if let Some(prev) = active.take() {
                    let frame = stomp::unsubscribe_frame(&prev.sub_id);
                    write.send(Message::text(frame.encode())).await?;
                }
                self.emit(ChatEvent::RoomJoined(room.clone())).await;

                match api.message_history(&room.id, HISTORY_PAGE_SIZE, None).await {
                    Ok(page) => {
                        self.emit(ChatEvent::HistoryLoaded {
                            room_id: room.id.clone(),
                            page,
                            older: false,
                        })
                        .await;
                    }
                    Err(err) => {
                        log::error!("history load for room {} failed: {err}", room.id);
                        self.emit(ChatEvent::Error(format!("could not load history: {err}")))
                            .await;
                    }
                }

                // Subscribe only after the history page went out, so a push
                // can never reach the UI ahead of the history it follows.
                *sub_seq += 1;
                let sub_id = format!("sub-{sub_seq}");
                let topic = format!("/topic/chat.room.{}", room.id);
                let frame = stomp::subscribe_frame(&sub_id, &topic);
                write.send(Message::text(frame.encode())).await?;
                *active = Some(ActiveRoom { room, sub_id, topic });
            }
            ChatCommand::LoadOlder { room_id, cursor } => {
                if active.as_ref().map(|a| a.room.id.as_str()) != Some(room_id.as_str()) {
                    log::debug!("older-history request for inactive room {room_id}");
                    return Ok(());
                }
                match api
                    .message_history(&room_id, HISTORY_PAGE_SIZE, Some(&cursor))
                    .await
                {
                    Ok(page) => {
                        self.emit(ChatEvent::HistoryLoaded {
                            room_id,
                            page,
                            older: true,
                        })
                        .await;
                    }
                    Err(err) => {
                        log::error!("older history for room {room_id} failed: {err}");
                        self.emit(ChatEvent::Error(format!("could not load history: {err}")))
                            .await;
                    }
                }
            }
            ChatCommand::SendMessage { content, room_type } => {
                let Some(active) = active.as_ref() else {
                    log::warn!("send with no active room");
                    return Ok(());
                };
                let body = serde_json::json!({
                    "content": content,
                    "roomType": room_type,
                })
                .to_string();
                let destination = format!("/app/chat.send/{}", active.room.id);
                let frame = stomp::send_frame(&destination, &body);
                write.send(Message::text(frame.encode())).await?;
            }
            ChatCommand::LeaveRoom { user_id } => {
                let Some(prev) = active.take() else {
                    return Ok(());
                };
                if let Err(err) = api.leave_room(&prev.room.id, &user_id).await {
                    // Tear down locally anyway; membership cleanup is the
                    // backend's problem on the next join.
                    log::error!("leaving room {} failed: {err}", prev.room.id);
                }
                let frame = stomp::unsubscribe_frame(&prev.sub_id);
                write.send(Message::text(frame.encode())).await?;
                self.emit(ChatEvent::RoomLeft {
                    room_id: prev.room.id,
                })
                .await;
            }
        }
        Ok(())
    }

    async fn handle_frame(&self, text: &str, active: Option<&ActiveRoom>) {
        let frame = match stomp::Frame::parse(text) {
            Ok(Some(frame)) => frame,
            Ok(None) => return, // heartbeat
            Err(err) => {
                log::warn!("bad STOMP frame: {err}");
                return;
            }
        };
        match frame.command.as_str() {
            "MESSAGE" => {
                let Some(active) = active else { return };
                let for_active_room = frame.get("destination") == Some(active.topic.as_str())
                    || frame.get("subscription") == Some(active.sub_id.as_str());
                if !for_active_room {
                    return;
                }
                match serde_json::from_str::<ChatMessage>(&frame.body) {
                    Ok(message) => {
                        self.emit(ChatEvent::MessageReceived {
                            room_id: active.room.id.clone(),
                            message,
                        })
                        .await;
                    }
                    Err(err) => log::warn!("undecodable chat push: {err}"),
                }
            }
            "ERROR" => {
                let detail = frame.get("message").unwrap_or("unknown broker error");
                log::error!("broker error frame: {detail}");
                self.emit(ChatEvent::Error(detail.to_string())).await;
            }
            other => log::debug!("ignoring {other} frame"),
        }
    }

    async fn emit(&self, event: ChatEvent) {
        if let Err(err) = self.event_tx.send(event).await {
            log::warn!("failed to notify UI: {err}");
        }
    }
}

/// Waits for the broker's CONNECTED frame after our CONNECT.
async fn await_connected(read: &mut WsReader) -> bool {
    let handshake = async {
        while let Some(incoming) = read.next().await {
            match incoming {
                Ok(Message::Text(text)) => match stomp::Frame::parse(text.as_str()) {
                    Ok(Some(frame)) if frame.command == "CONNECTED" => return true,
                    Ok(Some(frame)) if frame.command == "ERROR" => {
                        log::error!(
                            "broker refused session: {}",
                            frame.get("message").unwrap_or("unknown")
                        );
                        return false;
                    }
                    Ok(_) => continue,
                    Err(err) => {
                        log::warn!("bad frame during handshake: {err}");
                        return false;
                    }
                },
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
        false
    };
    tokio::time::timeout(CONNECT_HANDSHAKE_TIMEOUT, handshake)
        .await
        .unwrap_or(false)
}
