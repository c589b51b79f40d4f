//! Order records as received from the storefront.
//!
//! Orders arrive as loosely shaped JSON. Decoding them into these types is
//! where malformed data is caught: once an [`Order`] exists, every field the
//! email payload needs is present.

mod money;
mod types;
mod wrapped;

pub use money::{format_money, Money, MoneyError};
pub use types::{
    Address, Adjustment, Country, LineItem, Order, OrderNumber, Quantity, Region, StateRef,
    Variant,
};
pub use wrapped::{unwrap_record, Wrapped};
