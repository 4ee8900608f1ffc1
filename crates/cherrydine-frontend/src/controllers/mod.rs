//! Controllers turning user actions into bridge requests and bridge replies
//! into rendered state and notifications.

pub mod add_to_cart;
pub mod cart_sync;

use cherrydine_bridge::cart::{DishId, ItemId, MAX_QUANTITY, MIN_QUANTITY};

/// Shown after a successful quantity update.
pub const QUANTITY_UPDATED_MESSAGE: &str = "Количество обновлено";
/// Shown when adding to the cart fails without a message from the site.
pub const ADD_FAILED_MESSAGE: &str = "Произошла ошибка при добавлении в корзину";
/// Shown when a quantity update fails without a message from the site.
pub const UPDATE_FAILED_MESSAGE: &str = "Произошла ошибка при обновлении количества";
/// Shown when removing a line fails without a message from the site.
pub const REMOVE_FAILED_MESSAGE: &str = "Произошла ошибка при удалении из корзины";

/// Errors of the local side of a cart action. Failures reported by the site
/// are never errors here; they become notifications.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity is outside the range a line may hold; nothing
    /// was sent.
    #[error("quantity {0} is outside 1..=99")]
    QuantityOutOfRange(u8),
    /// No cart row is rendered for this item.
    #[error("no cart line for item {0}")]
    UnknownLine(ItemId),
    /// No add to cart control is rendered for this dish.
    #[error("no add to cart control for dish {0}")]
    UnknownControl(DishId),
    /// The backend stopped listening; the request could not be sent.
    #[error("backend is not running")]
    BackendClosed,
}

pub(crate) fn check_quantity(quantity: u8) -> Result<u8, CartError> {
    if (MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        Ok(quantity)
    } else {
        Err(CartError::QuantityOutOfRange(quantity))
    }
}
