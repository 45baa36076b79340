//! Cart total for the food currently on screen.

use crate::ledger::Ledger;
use crate::money::{CurrencyFormat, Money};

/// `Σ(extra.value × extra.quantity) + unit_price × food_quantity`.
pub fn cart_total(unit_price: Money, ledger: &Ledger) -> Money {
    ledger.extras_total() + unit_price.times(ledger.food_quantity())
}

pub fn formatted_total(unit_price: Money, ledger: &Ledger, format: &CurrencyFormat) -> String {
    format.format(cart_total(unit_price, ledger))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Extra;

    #[test]
    fn total_combines_food_and_extras_exactly() {
        let ledger = Ledger::new(&[Extra {
            id: 1,
            name: "Bacon".to_string(),
            value: Money::from_minor(250),
        }])
        .increment_food()
        .increment_extra(1)
        .increment_extra(1)
        .increment_extra(1);

        let total = cart_total(Money::from_minor(1000), &ledger);
        assert_eq!(total, Money::from_minor(2750));
        assert_eq!(
            formatted_total(Money::from_minor(1000), &ledger, &CurrencyFormat::usd()),
            "$27.50"
        );
    }

    #[test]
    fn total_is_idempotent() {
        let ledger = Ledger::default().increment_food();
        let format = CurrencyFormat::brl();
        let first = formatted_total(Money::from_minor(1990), &ledger, &format);
        let second = formatted_total(Money::from_minor(1990), &ledger, &format);
        assert_eq!(first, "R$ 39,80");
        assert_eq!(first, second);
    }
}
