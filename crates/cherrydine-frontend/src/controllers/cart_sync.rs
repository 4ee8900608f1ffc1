//! Reconciliation of the rendered cart table with the site.
//!
//! Quantities and subtotals are only rendered once the site confirms them.
//! The subtotal is always the one reported by the site and the total is
//! recomputed from the rendered subtotals, never kept separately.
//!
//! Updates to the same line are sequenced: every request gets an id, and a
//! reply is applied only if it answers the latest request issued for its
//! line. Replies to superseded requests are dropped without a notification,
//! so the last request issued wins regardless of the order replies arrive in.

use std::collections::{HashMap, HashSet};

use cherrydine_bridge::cart::{
    ItemId, LineRemoved, MAX_QUANTITY, MIN_QUANTITY, QuantityUpdated, RequestFailure,
};

use super::{
    CartError, QUANTITY_UPDATED_MESSAGE, REMOVE_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE,
    check_quantity,
};
use crate::{
    BackendBridge,
    entities::cart_entity::{CartRow, CartTable},
    notifications::NotificationCenter,
};

/// Steps a quantity selector by `delta`, clamped to the range a cart line may
/// hold. Nothing is sent to the site.
pub fn adjust_quantity_locally(current: u8, delta: i32) -> u8 {
    i32::from(current)
        .saturating_add(delta)
        .clamp(i32::from(MIN_QUANTITY), i32::from(MAX_QUANTITY)) as u8
}

#[derive(Debug, Clone, Copy)]
struct PendingUpdate {
    request_id: u64,
    quantity: u8,
}

/// Owns the rendered cart table and keeps it in step with the site.
pub struct CartSyncController {
    table: CartTable,
    bridge: BackendBridge,
    next_request_id: u64,
    pending: HashMap<ItemId, PendingUpdate>,
    removing: HashSet<ItemId>,
}

impl CartSyncController {
    pub fn new(bridge: BackendBridge) -> Self {
        Self {
            table: CartTable::default(),
            bridge,
            next_request_id: 0,
            pending: HashMap::new(),
            removing: HashSet::new(),
        }
    }

    pub fn table(&self) -> &CartTable {
        &self.table
    }

    /// Renders a line as delivered with the page.
    pub fn render_row(
        &mut self,
        item_id: ItemId,
        quantity: u8,
        subtotal: f64,
    ) -> Result<(), CartError> {
        let quantity = check_quantity(quantity)?;
        self.table.insert_row(CartRow::new(item_id, quantity, subtotal));
        Ok(())
    }

    /// Quantity the next stepper click starts from: the one still in flight
    /// for the line, else the rendered one.
    fn stepper_quantity(&self, item_id: ItemId) -> Result<u8, CartError> {
        if let Some(pending) = self.pending.get(&item_id) {
            return Ok(pending.quantity);
        }
        self.table
            .row(item_id)
            .map(CartRow::quantity)
            .ok_or(CartError::UnknownLine(item_id))
    }

    /// The `+` button of a cart line.
    pub async fn increase_quantity(
        &mut self,
        item_id: ItemId,
        notifications: &mut NotificationCenter,
    ) -> Result<(), CartError> {
        let current = self.stepper_quantity(item_id)?;
        if current >= MAX_QUANTITY {
            return Ok(());
        }
        self.request_quantity_update(item_id, current + 1, notifications).await
    }

    /// The `-` button of a cart line. A line never goes below one portion;
    /// use [`CartSyncController::remove_line`] instead.
    pub async fn decrease_quantity(
        &mut self,
        item_id: ItemId,
        notifications: &mut NotificationCenter,
    ) -> Result<(), CartError> {
        let current = self.stepper_quantity(item_id)?;
        if current <= MIN_QUANTITY {
            return Ok(());
        }
        self.request_quantity_update(item_id, current - 1, notifications).await
    }

    /// Asks the site to set the quantity of a line. The rendered line is left
    /// alone until the reply arrives in
    /// [`CartSyncController::apply_quantity_update`].
    pub async fn request_quantity_update(
        &mut self,
        item_id: ItemId,
        new_quantity: u8,
        notifications: &mut NotificationCenter,
    ) -> Result<(), CartError> {
        let new_quantity = check_quantity(new_quantity)?;
        if self.table.row(item_id).is_none() {
            return Err(CartError::UnknownLine(item_id));
        }

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        if let Err(e) = self.bridge.update_quantity(request_id, item_id, new_quantity).await {
            notifications.danger(UPDATE_FAILED_MESSAGE);
            return Err(e);
        }

        self.pending.insert(
            item_id,
            PendingUpdate {
                request_id,
                quantity: new_quantity,
            },
        );
        Ok(())
    }

    /// Applies the site's reply to a quantity update. Returns whether the
    /// table changed.
    pub fn apply_quantity_update(
        &mut self,
        request_id: u64,
        item_id: ItemId,
        quantity: u8,
        result: Result<QuantityUpdated, RequestFailure>,
        notifications: &mut NotificationCenter,
    ) -> bool {
        match self.pending.get(&item_id) {
            Some(pending) if pending.request_id == request_id => {
                self.pending.remove(&item_id);
            }
            Some(pending) => {
                log::debug!(
                    "Dropping reply to request {request_id} for line {item_id}, superseded by request {}",
                    pending.request_id
                );
                return false;
            }
            None => {
                log::debug!(
                    "Dropping reply to request {request_id}, line {item_id} has no update in flight"
                );
                return false;
            }
        }

        match result {
            Ok(updated) => {
                let Some(row) = self.table.row_mut(item_id) else {
                    log::warn!("Line {item_id} is no longer rendered, dropping its update");
                    return false;
                };
                row.set_quantity(quantity);
                row.set_subtotal(updated.subtotal);
                self.table.recompute_total();
                notifications.success(QUANTITY_UPDATED_MESSAGE);
                true
            }
            Err(failure) => {
                log::warn!("Quantity update of line {item_id} failed: {failure}");
                notifications.danger(failure.server_message().unwrap_or(UPDATE_FAILED_MESSAGE));
                false
            }
        }
    }

    /// Asks the site to remove a line. The row stays rendered until the reply
    /// arrives in [`CartSyncController::apply_removal`]; clicks on a line
    /// already being removed send nothing.
    pub async fn remove_line(
        &mut self,
        item_id: ItemId,
        notifications: &mut NotificationCenter,
    ) -> Result<(), CartError> {
        if self.table.row(item_id).is_none() {
            return Err(CartError::UnknownLine(item_id));
        }
        if self.removing.contains(&item_id) {
            log::debug!("Line {item_id} is already being removed");
            return Ok(());
        }
        if let Err(e) = self.bridge.remove_line(item_id).await {
            notifications.danger(REMOVE_FAILED_MESSAGE);
            return Err(e);
        }
        self.removing.insert(item_id);
        Ok(())
    }

    /// Applies the site's reply to a removal. Returns whether the table
    /// changed.
    pub fn apply_removal(
        &mut self,
        item_id: ItemId,
        result: Result<LineRemoved, RequestFailure>,
        notifications: &mut NotificationCenter,
    ) -> bool {
        self.removing.remove(&item_id);
        match result {
            Ok(removed) => {
                // a quantity reply still in flight has nothing left to update
                self.pending.remove(&item_id);
                if self.table.remove_row(item_id).is_none() {
                    log::debug!("Line {item_id} was already gone");
                    return false;
                }
                notifications.success(removed.message);
                true
            }
            Err(failure) => {
                log::warn!("Removal of line {item_id} failed: {failure}");
                notifications.danger(failure.server_message().unwrap_or(REMOVE_FAILED_MESSAGE));
                false
            }
        }
    }
}
