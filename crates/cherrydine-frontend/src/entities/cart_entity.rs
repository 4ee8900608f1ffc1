use cherrydine_bridge::cart::ItemId;

use crate::formatting::{format_price, parse_price};

/// One rendered row of the cart table.
#[derive(Debug, Clone, PartialEq)]
pub struct CartRow {
    item_id: ItemId,
    quantity: u8,
    subtotal_text: String,
}

impl CartRow {
    pub fn new(item_id: ItemId, quantity: u8, subtotal: f64) -> Self {
        Self {
            item_id,
            quantity,
            subtotal_text: format_price(subtotal),
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn quantity(&self) -> u8 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: u8) {
        self.quantity = quantity;
    }

    /// Subtotal exactly as rendered.
    pub fn subtotal_text(&self) -> &str {
        &self.subtotal_text
    }

    pub fn set_subtotal(&mut self, subtotal: f64) {
        self.subtotal_text = format_price(subtotal);
    }

    /// Subtotal read back from its rendered text; unreadable text counts as
    /// zero.
    pub fn subtotal(&self) -> f64 {
        parse_price(&self.subtotal_text).unwrap_or(0.0)
    }
}

/// The rendered cart table with its total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartTable {
    rows: Vec<CartRow>,
    total_text: String,
}

impl CartTable {
    pub fn rows(&self) -> &[CartRow] {
        &self.rows
    }

    pub fn row(&self, item_id: ItemId) -> Option<&CartRow> {
        self.rows.iter().find(|row| row.item_id == item_id)
    }

    pub fn row_mut(&mut self, item_id: ItemId) -> Option<&mut CartRow> {
        self.rows.iter_mut().find(|row| row.item_id == item_id)
    }

    /// Renders a row, replacing the row of the same item if there is one.
    pub fn insert_row(&mut self, row: CartRow) {
        match self.row_mut(row.item_id) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
        self.recompute_total();
    }

    pub fn remove_row(&mut self, item_id: ItemId) -> Option<CartRow> {
        let position = self.rows.iter().position(|row| row.item_id == item_id)?;
        let row = self.rows.remove(position);
        self.recompute_total();
        Some(row)
    }

    /// Total as rendered below the table.
    pub fn total_text(&self) -> &str {
        &self.total_text
    }

    /// Recomputes the total from the subtotals currently rendered.
    pub fn recompute_total(&mut self) {
        let total: f64 = self.rows.iter().map(CartRow::subtotal).sum();
        self.total_text = format_price(total);
    }
}
