//! Typed handles for the rendered cart state.
//!
//! Controllers read and write these instead of looking up cells of a rendered
//! table; surfaces only read them.

pub mod add_to_cart_entity;
pub mod cart_entity;
