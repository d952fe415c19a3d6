//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching subscribe/unsubscribe commands and forwarding filtered
//! live events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{LiveEvent, SessionId};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads subscribe/unsubscribe commands from the client.
/// - Forwards matching events from the [`broadcast::Receiver`] to the
///   client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<LiveEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from the bus
            event = event_rx.recv() => {
                match event {
                    Ok(live_event) => {
                        if subs.matches(live_event.session_id()) {
                            let msg = WsMessage {
                                id: uuid::Uuid::new_v4().to_string(),
                                msg_type: WsMessageType::Event,
                                timestamp: chrono::Utc::now(),
                                payload: serde_json::to_value(&live_event).unwrap_or_default(),
                            };
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON
/// response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = WsMessage {
            id: String::new(),
            msg_type: WsMessageType::Error,
            timestamp: chrono::Utc::now(),
            payload: serde_json::json!({
                "code": 400,
                "message": "malformed JSON"
            }),
        };
        return serde_json::to_string(&err).ok();
    };

    if let Some(session_ids) = msg.payload.get("session_ids").and_then(|v| v.as_array()) {
        let command = msg
            .payload
            .get("command")
            .and_then(|v| v.as_str())
            .unwrap_or("subscribe");

        match command {
            "subscribe" => {
                let mut ids = Vec::new();
                let mut wildcard = false;
                for id_val in session_ids {
                    if let Some(s) = id_val.as_str() {
                        if s == "*" {
                            wildcard = true;
                        } else if let Ok(uuid) = s.parse::<uuid::Uuid>() {
                            ids.push(SessionId::from_uuid(uuid));
                        }
                    }
                }
                subs.subscribe(&ids, wildcard);
                let response = WsMessage {
                    id: msg.id,
                    msg_type: WsMessageType::Response,
                    timestamp: chrono::Utc::now(),
                    payload: serde_json::json!({
                        "subscribed": ids.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
                        "count": subs.count(),
                        "wildcard": subs.is_subscribed_all(),
                    }),
                };
                return serde_json::to_string(&response).ok();
            }
            "unsubscribe" => {
                let mut ids = Vec::new();
                for id_val in session_ids {
                    if let Some(s) = id_val.as_str()
                        && let Ok(uuid) = s.parse::<uuid::Uuid>()
                    {
                        ids.push(SessionId::from_uuid(uuid));
                    }
                }
                subs.unsubscribe(&ids);
                let response = WsMessage {
                    id: msg.id,
                    msg_type: WsMessageType::Response,
                    timestamp: chrono::Utc::now(),
                    payload: serde_json::json!({
                        "unsubscribed": ids.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
                        "remaining_count": subs.count(),
                    }),
                };
                return serde_json::to_string(&response).ok();
            }
            _ => {}
        }
    }

    // Unknown command
    let err = WsMessage {
        id: msg.id,
        msg_type: WsMessageType::Error,
        timestamp: chrono::Utc::now(),
        payload: serde_json::json!({
            "code": 404,
            "message": "unknown command"
        }),
    };
    serde_json::to_string(&err).ok()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn command(payload: serde_json::Value) -> String {
        serde_json::to_string(&WsMessage {
            id: "req-1".to_string(),
            msg_type: WsMessageType::Command,
            timestamp: chrono::Utc::now(),
            payload,
        })
        .unwrap_or_default()
    }

    #[test]
    fn subscribe_command_updates_filter() {
        let mut subs = SubscriptionManager::new();
        let id = SessionId::new();
        let text = command(serde_json::json!({
            "command": "subscribe",
            "session_ids": [id.to_string()],
        }));

        let response = handle_text_message(&text, &mut subs);
        assert!(response.is_some());
        assert!(subs.matches(Some(id)));
        assert_eq!(subs.count(), 1);
    }

    #[test]
    fn wildcard_subscribe() {
        let mut subs = SubscriptionManager::new();
        let text = command(serde_json::json!({
            "command": "subscribe",
            "session_ids": ["*"],
        }));

        let _ = handle_text_message(&text, &mut subs);
        assert!(subs.is_subscribed_all());
        assert!(subs.matches(None));
    }

    #[test]
    fn unsubscribe_command_removes() {
        let mut subs = SubscriptionManager::new();
        let id = SessionId::new();
        subs.subscribe(&[id], false);

        let text = command(serde_json::json!({
            "command": "unsubscribe",
            "session_ids": [id.to_string()],
        }));
        let _ = handle_text_message(&text, &mut subs);
        assert!(!subs.matches(Some(id)));
    }

    #[test]
    fn malformed_json_gets_error_response() {
        let mut subs = SubscriptionManager::new();
        let response = handle_text_message("not json", &mut subs);
        let Some(response) = response else {
            panic!("expected an error response");
        };
        assert!(response.contains("malformed JSON"));
    }
}
