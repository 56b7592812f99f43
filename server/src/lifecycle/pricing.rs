use common::types::dtos::{OrderItemDTO, PromotionDTO};

/// Result of the one-shot totals computation at order creation. Frozen into
/// the order afterwards; catalog price changes never re-run this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    /// Promotions that failed their minimum-order check, by ID. Dropped
    /// silently from the discount; callers may log them.
    pub dropped: Vec<String>,
}

/// Sum of unit-price snapshots times quantities over all items.
pub fn subtotal(items: &[OrderItemDTO]) -> i64 {
    items
        .iter()
        .map(|item| item.unit_price * item.quantity as i64)
        .sum()
}

/// Subtotal restricted to one store's items within a mixed-store cart.
fn store_subtotal(items: &[OrderItemDTO], store_id: &str) -> i64 {
    items
        .iter()
        .filter(|item| item.store_id == store_id)
        .map(|item| item.unit_price * item.quantity as i64)
        .sum()
}

/// Each promotion validates independently: store-scoped ones against that
/// store's subtotal, system-wide ones against the full cart subtotal.
fn promotion_applies(promo: &PromotionDTO, items: &[OrderItemDTO], cart_subtotal: i64) -> bool {
    let base = match &promo.store_id {
        Some(store_id) => store_subtotal(items, store_id),
        None => cart_subtotal,
    };
    base >= promo.minimum_order
}

/// Computes subtotal, aggregate discount and grand total for an order.
/// Ineligible promotions are dropped, not errored. The discount is capped so
/// stacked promotions can never drive the total negative, keeping
/// `total == subtotal + shipping_fee - discount` and `total >= 0` both true.
pub fn compute_totals(
    items: &[OrderItemDTO],
    shipping_fee: i64,
    promotions: &[PromotionDTO],
) -> Totals {
    let subtotal = subtotal(items);
    let mut discount = 0;
    let mut dropped = Vec::new();
    for promo in promotions {
        if promotion_applies(promo, items, subtotal) {
            discount += promo.discount_amount;
        } else {
            dropped.push(promo.promo_id.clone());
        }
    }
    let discount = discount.min(subtotal + shipping_fee);
    Totals {
        subtotal,
        discount,
        total: subtotal + shipping_fee - discount,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(store_id: &str, quantity: u32, unit_price: i64) -> OrderItemDTO {
        OrderItemDTO {
            food_id: "f1".to_string(),
            food_name: "Bun cha".to_string(),
            store_id: store_id.to_string(),
            size: None,
            quantity,
            unit_price,
        }
    }

    fn promo(id: &str, store_id: Option<&str>, minimum: i64, discount: i64) -> PromotionDTO {
        PromotionDTO {
            promo_id: id.to_string(),
            store_id: store_id.map(str::to_string),
            minimum_order: minimum,
            discount_amount: discount,
        }
    }

    #[test]
    fn subtotal_is_price_times_quantity() {
        let items = [item("a", 2, 40_000), item("a", 1, 20_000)];
        assert_eq!(subtotal(&items), 100_000);
    }

    #[test]
    fn no_promotions_means_no_discount() {
        let totals = compute_totals(&[item("a", 2, 50_000)], 15_000, &[]);
        assert_eq!(totals.subtotal, 100_000);
        assert_eq!(totals.discount, 0);
        assert_eq!(totals.total, 115_000);
        assert!(totals.dropped.is_empty());
    }

    #[test]
    fn promotion_below_minimum_is_dropped_silently() {
        // Cart subtotal 180k against a 200k minimum: promo dropped, no error.
        let items = [item("a", 3, 60_000)];
        let totals = compute_totals(&items, 15_000, &[promo("p1", None, 200_000, 30_000)]);
        assert_eq!(totals.discount, 0);
        assert_eq!(totals.total, 195_000);
        assert_eq!(totals.dropped, vec!["p1".to_string()]);
    }

    #[test]
    fn store_scoped_promo_checks_only_that_store() {
        // Mixed cart: store a holds 90k, store b holds 110k, cart 200k.
        let items = [item("a", 3, 30_000), item("b", 1, 110_000)];
        let promos = [
            promo("pa", Some("a"), 100_000, 10_000), // a has only 90k: dropped
            promo("pb", Some("b"), 100_000, 20_000), // b has 110k: applies
            promo("sys", None, 150_000, 5_000),      // cart has 200k: applies
        ];
        let totals = compute_totals(&items, 15_000, &promos);
        assert_eq!(totals.discount, 25_000);
        assert_eq!(totals.total, 190_000);
        assert_eq!(totals.dropped, vec!["pa".to_string()]);
    }

    #[test]
    fn stacked_discounts_never_drive_total_negative() {
        let items = [item("a", 1, 30_000)];
        let promos = [
            promo("p1", None, 10_000, 25_000),
            promo("p2", None, 10_000, 25_000),
        ];
        let totals = compute_totals(&items, 5_000, &promos);
        assert_eq!(totals.discount, 35_000);
        assert_eq!(totals.total, 0);
        assert_eq!(
            totals.total,
            totals.subtotal + 5_000 - totals.discount
        );
    }
}
