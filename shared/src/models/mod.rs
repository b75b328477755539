//! Domain models shared between the server and API clients

pub mod item;
pub mod order;

pub use item::{Category, Item, ItemUpsert, Variant, VariantInput};
pub use order::{FulfillReceipt, Order, OrderLine, OrderLineInput, PlaceOrderRequest};
