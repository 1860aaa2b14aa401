//! Quantity-based discount pricing.
//!
//! The discount applies to the whole line (`unit_price × quantity`), never to the
//! unit price alone:
//!
//! | quantity      | tier       | discount |
//! |---------------|------------|----------|
//! | `q ≤ 5`       | `Standard` | 0%       |
//! | `5 < q < 10`  | `Volume`   | 5%       |
//! | `q ≥ 10`      | `Bulk`     | 10%      |

use rust_decimal::Decimal;

/// Discount tier selected by the ordered quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountTier {
    Standard,
    Volume,
    Bulk,
}

impl DiscountTier {
    /// Largest quantity still priced without discount.
    pub const STANDARD_MAX_QUANTITY: i32 = 5;
    /// Smallest quantity priced at the bulk tier.
    pub const BULK_MIN_QUANTITY: i32 = 10;

    pub fn for_quantity(quantity: i32) -> Self {
        if quantity >= Self::BULK_MIN_QUANTITY {
            DiscountTier::Bulk
        } else if quantity > Self::STANDARD_MAX_QUANTITY {
            DiscountTier::Volume
        } else {
            DiscountTier::Standard
        }
    }

    /// Discount rate as a fraction (`0.05` is 5%).
    pub fn rate(self) -> Decimal {
        match self {
            DiscountTier::Standard => Decimal::ZERO,
            DiscountTier::Volume => Decimal::new(5, 2),
            DiscountTier::Bulk => Decimal::new(10, 2),
        }
    }
}

/// Discount rate applied to an order line of `quantity` units.
pub fn discount_rate(quantity: i32) -> Decimal {
    DiscountTier::for_quantity(quantity).rate()
}

/// Discounted line total: `unit_price × quantity × (1 − discount_rate(quantity))`.
///
/// `None` when the gross line does not fit in a `Decimal`.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Option<Decimal> {
    let factor = Decimal::ONE - discount_rate(quantity);
    unit_price
        .checked_mul(Decimal::from(quantity))?
        .checked_mul(factor)
}
