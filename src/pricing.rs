//! Order money arithmetic.
//!
//! Every write path that touches an order's items or discounts runs these
//! functions inside the same transaction as the write, so a reader never
//! observes `line_total` or `final_price` out of sync with their inputs.

use rust_decimal::Decimal;

use crate::entity::discounts;

/// Quantities below 1 are coerced to 1, never rejected.
pub fn clamp_quantity(quantity: i32) -> i32 {
    quantity.max(1)
}

/// Ratings outside [1, 5] are coerced to the nearest bound, never rejected.
pub fn clamp_rating(rating: i32) -> i32 {
    rating.clamp(1, 5)
}

/// `line_total = unit_price * quantity`, floored at zero.
///
/// The floor cannot trigger while unit prices are non-negative, but it is
/// part of the stored invariant and stays.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    let total = unit_price * Decimal::from(clamp_quantity(quantity));
    total.max(Decimal::ZERO)
}

/// `final_price = max(0, original_price - discount_amount)`.
pub fn final_price(original_price: Decimal, discount_amount: Decimal) -> Decimal {
    (original_price - discount_amount).max(Decimal::ZERO)
}

/// Seam for deriving an order's discount amount from its attached discounts.
///
/// The store has never defined how PERCENT and FIXED_AMOUNT codes combine;
/// the amount is supplied by the caller and passed through unchanged. A real
/// derivation slots in here without touching the order service.
pub trait DiscountPolicy: Send + Sync {
    fn amount(&self, original_price: Decimal, discounts: &[discounts::Model]) -> Decimal;
}

/// Pass-through policy: the caller-supplied amount wins, clamped at zero.
pub struct ExplicitAmount(pub Decimal);

impl DiscountPolicy for ExplicitAmount {
    fn amount(&self, _original_price: Decimal, _discounts: &[discounts::Model]) -> Decimal {
        self.0.max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_total_multiplies_unit_price_by_quantity() {
        assert_eq!(line_total(dec!(19.99), 3), dec!(59.97));
    }

    #[test]
    fn line_total_treats_non_positive_quantity_as_one() {
        assert_eq!(line_total(dec!(10.00), 0), dec!(10.00));
        assert_eq!(line_total(dec!(10.00), -4), dec!(10.00));
    }

    #[test]
    fn line_total_of_zero_priced_product_is_zero() {
        assert_eq!(line_total(Decimal::ZERO, 7), Decimal::ZERO);
    }

    #[test]
    fn final_price_subtracts_discount() {
        assert_eq!(final_price(dec!(100.00), dec!(25.50)), dec!(74.50));
    }

    #[test]
    fn final_price_never_goes_negative() {
        assert_eq!(final_price(dec!(100.00), dec!(150.00)), dec!(0.00));
    }

    #[test]
    fn rating_clamps_to_bounds() {
        assert_eq!(clamp_rating(7), 5);
        assert_eq!(clamp_rating(-3), 1);
        assert_eq!(clamp_rating(4), 4);
    }

    #[test]
    fn explicit_amount_policy_passes_through() {
        let policy = ExplicitAmount(dec!(12.34));
        assert_eq!(policy.amount(dec!(100.00), &[]), dec!(12.34));
    }

    #[test]
    fn explicit_amount_policy_floors_negative_input() {
        let policy = ExplicitAmount(dec!(-5.00));
        assert_eq!(policy.amount(dec!(100.00), &[]), Decimal::ZERO);
    }
}
