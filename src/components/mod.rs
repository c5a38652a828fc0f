//! UI components.

pub mod product_card;
