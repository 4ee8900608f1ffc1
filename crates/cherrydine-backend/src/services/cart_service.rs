//! Handlers for the cart requests issued by the frontend controls.
//!
//! Each handler performs exactly one request and answers with exactly one
//! reply message, successful or not, so the control that issued the request
//! can always leave its pending state.

use cherrydine_bridge::{
    MessageFromBackend,
    cart::{DishId, ItemId, RequestFailure},
};

use crate::api::ApiError;

/// Converts a transport-level error into the cloneable description that
/// travels over the bridge.
fn describe_failure(error: ApiError) -> RequestFailure {
    match error {
        ApiError::Transport(e) | ApiError::Client(e) => {
            RequestFailure::Transport(e.without_url().to_string())
        }
        ApiError::InvalidUrl(url) => RequestFailure::Transport(url),
        ApiError::Status(status) => RequestFailure::Status(status.as_u16()),
        ApiError::Decode(e) => RequestFailure::Malformed(e.without_url().to_string()),
    }
}

/// Handles an incoming add to cart request (see
/// [`cherrydine_bridge::MessageToBackend::AddToCartRequest`]).
pub async fn handle_add_to_cart(context: super::AppContextHandle, dish_id: DishId, quantity: u8) {
    let result = match context.api.add_to_cart(dish_id, quantity).await {
        Ok(reply) => reply.into_result(),
        Err(e) => Err(describe_failure(e)),
    };
    if let Err(ref failure) = result {
        log::warn!("Adding dish {dish_id} x{quantity} failed: {failure}");
    }

    context
        .send(MessageFromBackend::AddToCartResponse { dish_id, result })
        .await;
}

/// Handles an incoming quantity update request (see
/// [`cherrydine_bridge::MessageToBackend::UpdateQuantityRequest`]).
pub async fn handle_update_quantity(
    context: super::AppContextHandle,
    request_id: u64,
    item_id: ItemId,
    quantity: u8,
) {
    let result = match context.api.update_quantity(item_id, quantity).await {
        Ok(reply) => reply.into_result(),
        Err(e) => Err(describe_failure(e)),
    };
    if let Err(ref failure) = result {
        log::warn!("Updating line {item_id} to x{quantity} failed: {failure}");
    }

    context
        .send(MessageFromBackend::UpdateQuantityResponse {
            request_id,
            item_id,
            quantity,
            result,
        })
        .await;
}

/// Handles an incoming line removal request (see
/// [`cherrydine_bridge::MessageToBackend::RemoveLineRequest`]).
pub async fn handle_remove_line(context: super::AppContextHandle, item_id: ItemId) {
    let result = match context.api.remove_line(item_id).await {
        Ok(reply) => reply.into_result(),
        Err(e) => Err(describe_failure(e)),
    };
    if let Err(ref failure) = result {
        log::warn!("Removing line {item_id} failed: {failure}");
    }

    context
        .send(MessageFromBackend::RemoveLineResponse { item_id, result })
        .await;
}
