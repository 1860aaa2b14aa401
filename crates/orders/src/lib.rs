//! Orders domain module.
//!
//! This crate contains the business rules for order intake, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage): the customer-code
//! and control-number rules, default filling, tiered discount pricing and the
//! selection of the query filter.

pub mod order;
pub mod pricing;
pub mod query;

pub use order::{
    ControlNumber, CustomerCode, NewOrder, Order, OrderDraft, OrderError, OrderRecord,
    DEFAULT_QUANTITY,
};
pub use pricing::{DiscountTier, discount_rate, line_total};
pub use query::{OrderQuery, day_bounds};
