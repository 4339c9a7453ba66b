use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{broadcast::error::RecvError, mpsc};

use super::http::{error_body, SharedService};
use crate::application::{DeliveryService, Subscription};

/// Order ids arrive as numbers from some clients and strings from others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireOrderId {
    Number(u64),
    Text(String),
}

impl WireOrderId {
    fn to_id_string(&self) -> String {
        match self {
            WireOrderId::Number(n) => n.to_string(),
            WireOrderId::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    Control {
        cmd: String,
    },
    Execute {
        #[serde(rename = "orderId")]
        order_id: WireOrderId,
    },
}

pub async fn push_channel(ws: WebSocketUpgrade, State(service): State<SharedService>) -> Response {
    ws.on_upgrade(move |socket| serve_observer(socket, service))
}

/// Maps one inbound frame onto the same operations the REST surface exposes and
/// returns the reply frame.
pub async fn handle_client_message(service: &DeliveryService, text: &str) -> Value {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            return json!({ "event": "error", "error": "BadRequest", "message": e.to_string() });
        }
    };

    let outcome = match message {
        ClientMessage::Control { cmd } => service
            .manual_command(Some(&cmd))
            .await
            .map(|robot| json!({ "event": "ack", "request": "control", "robot": robot })),
        ClientMessage::Execute { order_id } => service
            .execute_order(&order_id.to_id_string())
            .await
            .map(|handle| json!({ "event": "ack", "request": "execute", "order": handle.order })),
    };

    outcome.unwrap_or_else(|e| {
        let (_, mut body) = error_body(&e);
        body["event"] = json!("error");
        body
    })
}

async fn serve_observer(socket: WebSocket, service: SharedService) {
    let Subscription { init, mut updates } = service.subscribe().await;
    let (mut sink, mut stream) = socket.split();

    let init = match serde_json::to_string(&init) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("could not encode initial snapshot: {}", e);
            return;
        }
    };
    if sink.send(Message::Text(init)).await.is_err() {
        return;
    }

    let (reply_tx, mut reply_rx) = mpsc::channel::<Value>(16);

    let mut outbound = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                update = updates.recv() => match update {
                    Ok(envelope) => serde_json::to_string(&envelope),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "observer fell behind; updates skipped");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                reply = reply_rx.recv() => match reply {
                    Some(value) => serde_json::to_string(&value),
                    None => break,
                },
            };
            match frame {
                Ok(text) => {
                    if sink.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::error!("could not encode push frame: {}", e),
            }
        }
    });

    let mut inbound = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => {
                    let reply = handle_client_message(&service, &text).await;
                    if reply_tx.send(reply).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut outbound => inbound.abort(),
        _ = &mut inbound => outbound.abort(),
    }
    tracing::debug!("observer disconnected");
}
