//! Quantities chosen for the base food and each of its extras.
//!
//! # Design
//! A `Ledger` is a value. Every transition takes `&self` and returns the next
//! ledger, leaving the previous one untouched, so a host can keep old
//! ledgers around to diff or replay. The extras catalog is shared behind an
//! `Arc` and never copied; only the keyed quantity map is.
//!
//! Invariants: the base quantity is at least 1, extra quantities are at
//! least 0, and only extras from the catalog have a quantity.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::money::Money;
use crate::types::{Extra, ExtraId, OrderExtra};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    catalog: Arc<[Extra]>,
    quantities: BTreeMap<ExtraId, u32>,
    food_quantity: u32,
}

impl Ledger {
    /// A ledger for `extras`, every extra at zero and the food at one.
    /// Repeated extra ids keep their first catalog entry.
    pub fn new(extras: &[Extra]) -> Self {
        let mut quantities = BTreeMap::new();
        let mut catalog = Vec::with_capacity(extras.len());
        for extra in extras {
            if quantities.insert(extra.id, 0).is_none() {
                catalog.push(extra.clone());
            }
        }
        Self {
            catalog: catalog.into(),
            quantities,
            food_quantity: 1,
        }
    }

    pub fn food_quantity(&self) -> u32 {
        self.food_quantity
    }

    /// Quantity of one extra, or `None` if the food does not offer it.
    pub fn extra_quantity(&self, id: ExtraId) -> Option<u32> {
        self.quantities.get(&id).copied()
    }

    /// Catalog entries with their quantities, in catalog order.
    pub fn lines(&self) -> impl Iterator<Item = (&Extra, u32)> + '_ {
        self.catalog
            .iter()
            .map(|extra| (extra, self.quantities.get(&extra.id).copied().unwrap_or(0)))
    }

    #[must_use]
    pub fn increment_extra(&self, id: ExtraId) -> Self {
        self.with_extra(id, |q| q.saturating_add(1))
    }

    #[must_use]
    pub fn decrement_extra(&self, id: ExtraId) -> Self {
        self.with_extra(id, |q| q.saturating_sub(1))
    }

    #[must_use]
    pub fn increment_food(&self) -> Self {
        Self {
            food_quantity: self.food_quantity.saturating_add(1),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn decrement_food(&self) -> Self {
        Self {
            food_quantity: self.food_quantity.saturating_sub(1).max(1),
            ..self.clone()
        }
    }

    /// `Σ(value × quantity)` over the extras.
    pub fn extras_total(&self) -> Money {
        self.lines().map(|(extra, quantity)| extra.value.times(quantity)).sum()
    }

    /// Every extra with its current quantity, zero included.
    pub fn snapshot(&self) -> Vec<OrderExtra> {
        self.lines()
            .map(|(extra, quantity)| OrderExtra {
                id: extra.id,
                name: extra.name.clone(),
                value: extra.value,
                quantity,
            })
            .collect()
    }

    fn with_extra(&self, id: ExtraId, step: impl FnOnce(u32) -> u32) -> Self {
        let mut next = self.clone();
        if let Some(quantity) = next.quantities.get_mut(&id) {
            *quantity = step(*quantity);
        }
        next
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extra(id: ExtraId, value: i64) -> Extra {
        Extra {
            id,
            name: format!("extra {id}"),
            value: Money::from_minor(value),
        }
    }

    fn ledger() -> Ledger {
        Ledger::new(&[extra(1, 250), extra(2, 100)])
    }

    #[test]
    fn new_ledger_starts_at_zero_extras_and_one_food() {
        let ledger = ledger();
        assert_eq!(ledger.food_quantity(), 1);
        assert_eq!(ledger.extra_quantity(1), Some(0));
        assert_eq!(ledger.extra_quantity(2), Some(0));
        assert_eq!(ledger.extra_quantity(3), None);
    }

    #[test]
    fn decrement_extra_at_zero_is_noop() {
        let ledger = ledger().decrement_extra(1);
        assert_eq!(ledger.extra_quantity(1), Some(0));
    }

    #[test]
    fn decrement_then_increment_restores_quantity() {
        for q in 1..=5 {
            let mut ledger = ledger();
            for _ in 0..q {
                ledger = ledger.increment_extra(2);
            }
            let back = ledger.decrement_extra(2).increment_extra(2);
            assert_eq!(back.extra_quantity(2), Some(q));
        }
    }

    #[test]
    fn unknown_extra_is_ignored() {
        let before = ledger();
        assert_eq!(before.increment_extra(42), before);
        assert_eq!(before.decrement_extra(42), before);
    }

    #[test]
    fn food_quantity_never_drops_below_one() {
        let mut ledger = ledger().increment_food().increment_food();
        assert_eq!(ledger.food_quantity(), 3);
        for _ in 0..10 {
            ledger = ledger.decrement_food();
            assert!(ledger.food_quantity() >= 1);
        }
        assert_eq!(ledger.food_quantity(), 1);
    }

    #[test]
    fn transitions_leave_the_previous_ledger_untouched() {
        let before = ledger();
        let after = before.increment_extra(1).increment_food();
        assert_eq!(before.extra_quantity(1), Some(0));
        assert_eq!(before.food_quantity(), 1);
        assert_eq!(after.extra_quantity(1), Some(1));
        assert_eq!(after.food_quantity(), 2);
    }

    #[test]
    fn duplicate_catalog_ids_keep_first_entry() {
        let ledger = Ledger::new(&[extra(1, 250), extra(1, 999)]);
        assert_eq!(ledger.lines().count(), 1);
        assert_eq!(ledger.increment_extra(1).extras_total(), Money::from_minor(250));
    }

    #[test]
    fn snapshot_keeps_catalog_order_and_zero_quantities() {
        let snapshot = Ledger::new(&[extra(7, 100), extra(3, 200)])
            .increment_extra(3)
            .snapshot();
        let ids: Vec<_> = snapshot.iter().map(|e| (e.id, e.quantity)).collect();
        assert_eq!(ids, vec![(7, 0), (3, 1)]);
    }
}
