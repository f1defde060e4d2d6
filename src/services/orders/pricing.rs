//! Order totals.

use serde::Serialize;

use crate::domain::entities::orders::OrderItem;
use crate::utils::format_utils::round_money;

/// Money breakdown of an order, every field rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub shipping_fee: f64,
    pub discount: f64,
    pub total: f64,
}

impl OrderTotals {
    /// `total = subtotal + shipping_fee - discount`, floored at zero.
    ///
    /// Shipping is waived when `free_shipping_threshold` is set and the
    /// discounted subtotal reaches it.
    pub fn compute(
        items: &[OrderItem],
        discount: f64,
        shipping_fee: f64,
        free_shipping_threshold: Option<f64>,
    ) -> Self {
        let subtotal = round_money(
            items
                .iter()
                .map(|item| item.price * item.quantity as f64)
                .sum(),
        );
        let discount = round_money(discount.clamp(0.0, subtotal));

        let shipping_fee = match free_shipping_threshold {
            Some(threshold) if subtotal - discount >= threshold => 0.0,
            _ => round_money(shipping_fee.max(0.0)),
        };

        let total = round_money((subtotal + shipping_fee - discount).max(0.0));

        Self {
            subtotal,
            shipping_fee,
            discount,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn item(price: f64, quantity: i64) -> OrderItem {
        OrderItem {
            product_id: ObjectId::new(),
            title: "Oud Royal".to_string(),
            image: None,
            price,
            quantity,
            is_sample: false,
        }
    }

    #[test]
    fn test_total_adds_shipping_and_subtracts_discount() {
        let totals = OrderTotals::compute(&[item(120.0, 2), item(35.5, 1)], 20.0, 30.0, None);

        assert_eq!(totals.subtotal, 275.5);
        assert_eq!(totals.discount, 20.0);
        assert_eq!(totals.shipping_fee, 30.0);
        assert_eq!(totals.total, 285.5);
    }

    #[test]
    fn test_free_shipping_uses_discounted_subtotal() {
        let items = [item(100.0, 2)];

        let free = OrderTotals::compute(&items, 0.0, 30.0, Some(200.0));
        assert_eq!(free.shipping_fee, 0.0);
        assert_eq!(free.total, 200.0);

        let charged = OrderTotals::compute(&items, 10.0, 30.0, Some(200.0));
        assert_eq!(charged.shipping_fee, 30.0);
        assert_eq!(charged.total, 220.0);
    }

    #[test]
    fn test_discount_never_exceeds_subtotal() {
        let totals = OrderTotals::compute(&[item(15.0, 1)], 50.0, 0.0, None);
        assert_eq!(totals.discount, 15.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn test_sample_order_pays_only_shipping() {
        let mut sample = item(0.0, 1);
        sample.is_sample = true;

        let totals = OrderTotals::compute(&[sample], 0.0, 30.0, Some(100.0));
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.total, 30.0);
    }

    #[test]
    fn test_rounding_to_cents() {
        let totals = OrderTotals::compute(&[item(33.333, 3)], 0.0, 0.0, None);
        assert_eq!(totals.subtotal, 100.0);
        assert_eq!(totals.total, 100.0);
    }
}
