//! Cost items attached to a destination.

use uuid::Uuid;

use super::amount::{ParsedAmount, parse_amount};
use super::currency::Currency;

/// One charge associated with a destination.
///
/// `original_amount`/`original_currency` are set when the cost is entered or
/// edited and are the source of truth. `amount` is the display rendering in
/// the trip's current display currency; it is a cache, re-derived by the
/// cost resolver, never edited independently.
#[derive(Debug, Clone, PartialEq)]
pub struct CostItem {
    /// Stable identifier, assigned at creation.
    pub id: String,
    /// Free-text description ("entrance fee", "lunch").
    pub detail: String,
    /// Display amount in the trip's display currency.
    pub amount: String,
    /// Amount as originally entered.
    pub original_amount: String,
    /// Currency the amount was originally entered in.
    pub original_currency: Currency,
}

impl CostItem {
    /// Create a cost item from user input. The entered amount becomes both
    /// the original and the initial display value.
    pub fn new(
        detail: impl Into<String>,
        amount: impl Into<String>,
        currency: Currency,
    ) -> Self {
        let amount = amount.into();
        Self {
            id: Uuid::new_v4().to_string(),
            detail: detail.into(),
            amount: amount.clone(),
            original_amount: amount,
            original_currency: currency,
        }
    }

    /// A fresh zero-valued cost, used when a destination is created.
    pub fn zero(currency: Currency) -> Self {
        Self::new("", "0", currency)
    }

    /// Numeric interpretation of the display amount.
    pub fn parsed(&self) -> ParsedAmount {
        parse_amount(&self.amount)
    }

    /// Numeric interpretation of the original amount.
    pub fn parsed_original(&self) -> ParsedAmount {
        parse_amount(&self.original_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Currency {
        Currency::parse("USD").unwrap()
    }

    #[test]
    fn new_seeds_original_from_entry() {
        let cost = CostItem::new("lunch", "12.50", usd());
        assert_eq!(cost.detail, "lunch");
        assert_eq!(cost.amount, "12.50");
        assert_eq!(cost.original_amount, "12.50");
        assert_eq!(cost.original_currency, usd());
        assert!(!cost.id.is_empty());
    }

    #[test]
    fn zero_cost() {
        let cost = CostItem::zero(usd());
        assert!(cost.parsed().is_zero());
        assert!(!cost.parsed().is_approx);
    }

    #[test]
    fn ids_are_unique() {
        let a = CostItem::zero(usd());
        let b = CostItem::zero(usd());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn parsed_reads_display_and_original_independently() {
        let mut cost = CostItem::new("ticket", "10-20", usd());
        cost.amount = "250000-500000".to_string();

        let display = cost.parsed();
        assert_eq!((display.min, display.max), (250_000.0, 500_000.0));

        let original = cost.parsed_original();
        assert_eq!((original.min, original.max), (10.0, 20.0));
        assert!(original.is_approx);
    }
}
