//! Application context and message dispatching utilities.
//!
//! The context holds the cart API client and provides helpers for sending
//! replies and notifications back to the frontend bridge.

use std::sync::Arc;

use cherrydine_bridge::{
    MessageFromBackend, MessageToBackend,
    notification::{NotificationMessage, Severity},
};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::{api::CartApi, services};

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext {
    /// Client for the site's cart endpoints.
    pub api: Arc<dyn CartApi>,
    /// Outbound channel to the frontend bridge.
    pub tx: Sender<MessageFromBackend>,
}

impl AppContext {
    /// Read and dispatch messages from the frontend bridge until it closes.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: Receiver<MessageToBackend>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a frontend message: {message:?}");
            self.dispatch_message(message);
        }
        log::info!("Frontend bridge closed, stopping backend");
    }

    /// Dispatches the received message from frontend down to individual
    /// service handlers. Every request runs in its own task, so a slow
    /// response never holds back the others.
    fn dispatch_message(self: &Arc<Self>, message: MessageToBackend) {
        let context = self.clone();
        match message {
            MessageToBackend::AddToCartRequest { dish_id, quantity } => {
                tokio::spawn(services::cart_service::handle_add_to_cart(
                    context, dish_id, quantity,
                ));
            }
            MessageToBackend::UpdateQuantityRequest {
                request_id,
                item_id,
                quantity,
            } => {
                tokio::spawn(services::cart_service::handle_update_quantity(
                    context, request_id, item_id, quantity,
                ));
            }
            MessageToBackend::RemoveLineRequest { item_id } => {
                tokio::spawn(services::cart_service::handle_remove_line(
                    context, item_id,
                ));
            }
        }
    }

    /// Send a message to the frontend bridge.
    pub async fn send(&self, message: MessageFromBackend) {
        if let Err(e) = self.tx.send(message).await {
            log::warn!("Frontend is gone, dropping {:?}", e.0);
        }
    }

    /// Send a notification message to the frontend bridge.
    pub async fn send_notification(&self, severity: Severity, content: impl Into<String>) {
        self.send(MessageFromBackend::NotificationMessage(
            NotificationMessage {
                severity,
                message: content.into(),
            },
        ))
        .await;
    }
}
