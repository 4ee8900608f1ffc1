//! Communication bridge between frontend and backend.
//!
//! This crate defines the types and protocols used to connect the frontend
//! event loop (cart controls, notifications, rendering) with an asynchronous
//! backend responsible for talking to the restaurant's HTTP endpoints.
//!
//! The design is lightweight and unidirectional:
//! - The frontend sends commands (e.g., add a dish, update a cart line).
//! - The backend pushes replies and events (e.g., the outcome of a cart
//!   request, notifications about the connection).
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`], providing back-pressure, async compatibility, and
//! clean separation of concerns.

pub mod cart;
pub mod config;
pub mod notification;

use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::cart::{AddedToCart, DishId, ItemId, LineRemoved, QuantityUpdated, RequestFailure};

/// Messages emitted by the backend to inform the frontend of state updates.
///
/// Every cart request is answered by exactly one reply carrying the identity
/// of the request, so the frontend can reconcile the control that issued it.
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// Generic message for notifications not tied to a specific control.
    NotificationMessage(notification::NotificationMessage),
    /// Outcome of [`MessageToBackend::AddToCartRequest`].
    AddToCartResponse {
        dish_id: DishId,
        result: Result<AddedToCart, RequestFailure>,
    },
    /// Outcome of [`MessageToBackend::UpdateQuantityRequest`].
    UpdateQuantityResponse {
        /// Identifier of the request this reply belongs to.
        request_id: u64,
        item_id: ItemId,
        /// Quantity that was requested.
        quantity: u8,
        result: Result<QuantityUpdated, RequestFailure>,
    },
    /// Outcome of [`MessageToBackend::RemoveLineRequest`].
    RemoveLineResponse {
        item_id: ItemId,
        result: Result<LineRemoved, RequestFailure>,
    },
}

/// Commands issued by the frontend to the backend.
#[derive(Debug, Clone)]
pub enum MessageToBackend {
    /// Request to add `quantity` portions of a dish to the cart.
    AddToCartRequest { dish_id: DishId, quantity: u8 },
    /// Request to set the quantity of a committed cart line.
    UpdateQuantityRequest {
        request_id: u64,
        item_id: ItemId,
        quantity: u8,
    },
    /// Request to remove a cart line entirely.
    RemoveLineRequest { item_id: ItemId },
}

/// Paired `tokio::mpsc` channels for bidirectional communication between
/// frontend and backend.
pub struct BridgeChannels {
    /// Receiver used by the frontend to get messages from the backend.
    pub frontend_rx: Receiver<MessageFromBackend>,
    /// Sender used by the frontend to send commands to the backend.
    pub frontend_tx: Sender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the frontend.
    pub backend_rx: Receiver<MessageToBackend>,
    /// Sender used by the backend to send events/responses to the frontend.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::channel(buffer);
        let (to_frontend_tx, to_frontend_rx) = mpsc::channel(buffer);
        Self {
            frontend_tx: to_backend_tx,
            frontend_rx: to_frontend_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_frontend_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
