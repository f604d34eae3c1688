use crate::{
    ledger::AccountUpdate,
    models::Address,
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use dashmap::DashSet;
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast::error::RecvError, mpsc};

/// WebSocket upgrade handler. Account data is public, so no session is needed.
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);
    let subscriptions: Arc<DashSet<Address>> = Arc::new(DashSet::new());

    tracing::info!("WebSocket connection established");

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Forward committed account changes the client subscribed to
    let mut updates = state.ledger.subscribe();
    let notify_tx = tx.clone();
    let notify_subscriptions = subscriptions.clone();
    let mut notify_task = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => {
                    let Some(msg) = notification_for(update, &notify_subscriptions) else {
                        continue;
                    };
                    if notify_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Subscriber lagged, skipped {} account updates", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Handle incoming messages from the client
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    let reply = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(client_msg) => handle_client_message(client_msg, &subscriptions),
                        Err(e) => {
                            tracing::error!("Failed to parse message: {}", e);
                            ServerMessage::Error {
                                message: format!("Invalid message format: {}", e),
                            }
                        }
                    };
                    if tx.send(reply).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Client disconnected");
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for any task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            notify_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
            notify_task.abort();
        }
        _ = (&mut notify_task) => {
            send_task.abort();
            recv_task.abort();
        }
    }

    tracing::info!("WebSocket connection closed");
}

/// Notification for `update`, if the client subscribed to its address
fn notification_for(
    update: AccountUpdate,
    subscriptions: &DashSet<Address>,
) -> Option<ServerMessage> {
    if !subscriptions.contains(&update.address) {
        return None;
    }
    Some(ServerMessage::AccountNotification {
        address: update.address,
        slot: update.slot,
        account: update.account,
    })
}

/// Apply a subscription request and build the acknowledgement
fn handle_client_message(msg: ClientMessage, subscriptions: &DashSet<Address>) -> ServerMessage {
    match msg {
        ClientMessage::AccountSubscribe { address } => {
            tracing::debug!(%address, "Account subscribe");
            subscriptions.insert(address);
            ServerMessage::Subscribed { address }
        }
        ClientMessage::AccountUnsubscribe { address } => {
            if subscriptions.remove(&address).is_some() {
                tracing::debug!(%address, "Account unsubscribe");
                ServerMessage::Unsubscribed { address }
            } else {
                ServerMessage::Error {
                    message: format!("Not subscribed to {}", address),
                }
            }
        }
    }
}
