//! Cart payloads exchanged with the site and between the bridge ends.
//!
//! The `*Reply` structs mirror the JSON bodies returned by the cart endpoints.
//! They are converted into typed outcomes with `into_result`, which is where
//! an application-level refusal (`success: false`) becomes a
//! [`RequestFailure`].

use serde::{Deserialize, Serialize};

/// Identifier of a dish in the menu.
pub type DishId = u32;

/// Identifier of a cart line. The site keys cart lines by dish, but the two
/// are kept apart on the client since they come from different controls.
pub type ItemId = u32;

/// Lowest quantity a cart line or a quantity selector may hold.
pub const MIN_QUANTITY: u8 = 1;

/// Highest quantity a cart line or a quantity selector may hold.
pub const MAX_QUANTITY: u8 = 99;

/// Body of the add and update requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantityBody {
    pub quantity: u8,
}

/// Response body of `POST /cart/add/{dish_id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Number of items in the whole cart after the addition.
    #[serde(default)]
    pub cart_total: Option<u32>,
}

/// Response body of `POST /cart/update/{item_id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuantityReply {
    pub success: bool,
    /// Subtotal of the line, as computed by the site.
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body of `POST /cart/remove/{item_id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveLineReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// A dish was added to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedToCart {
    pub message: String,
    pub cart_total: u32,
}

/// A cart line now holds the requested quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityUpdated {
    pub subtotal: f64,
    pub message: Option<String>,
}

/// A cart line was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRemoved {
    pub message: String,
}

/// Why a cart request did not go through.
///
/// Only [`RequestFailure::Rejected`] carries a message the site meant to show
/// to the user; every other variant is described by the caller's fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestFailure {
    /// The request never reached the site or the response never came back.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The site answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(u16),
    /// The site answered 2xx with `success: false`.
    #[error("rejected: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),
    /// The site answered 2xx with a body that does not fit the endpoint.
    #[error("malformed reply: {0}")]
    Malformed(String),
}

impl RequestFailure {
    /// Message from the site that can be shown as is, if there is one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RequestFailure::Rejected(Some(message)) if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Shown after a successful addition the site did not describe.
pub const ADDED_MESSAGE: &str = "Блюдо добавлено в корзину";
/// Shown after a successful removal the site did not describe.
pub const REMOVED_MESSAGE: &str = "Блюдо удалено из корзины";

fn message_or(message: Option<String>, fallback: &str) -> String {
    match message {
        Some(message) if !message.trim().is_empty() => message,
        _ => fallback.to_string(),
    }
}

impl AddToCartReply {
    pub fn into_result(self) -> Result<AddedToCart, RequestFailure> {
        if !self.success {
            return Err(RequestFailure::Rejected(self.message));
        }
        let cart_total = self
            .cart_total
            .ok_or_else(|| RequestFailure::Malformed("missing cart_total".to_string()))?;
        Ok(AddedToCart {
            message: message_or(self.message, ADDED_MESSAGE),
            cart_total,
        })
    }
}

impl UpdateQuantityReply {
    pub fn into_result(self) -> Result<QuantityUpdated, RequestFailure> {
        if !self.success {
            return Err(RequestFailure::Rejected(self.message));
        }
        match self.subtotal {
            Some(subtotal) if subtotal.is_finite() => Ok(QuantityUpdated {
                subtotal,
                message: self.message,
            }),
            _ => Err(RequestFailure::Malformed("missing subtotal".to_string())),
        }
    }
}

impl RemoveLineReply {
    pub fn into_result(self) -> Result<LineRemoved, RequestFailure> {
        if !self.success {
            return Err(RequestFailure::Rejected(self.message));
        }
        Ok(LineRemoved {
            message: message_or(self.message, REMOVED_MESSAGE),
        })
    }
}
