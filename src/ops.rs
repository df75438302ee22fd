use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{
    MemoryCatalog, Order, PaymentMethod, Product, ProductCatalog, ProductKind, CASH_DISCOUNT,
    MAX_ORDER_ITEMS,
};

impl Product {
    /// Returns the base price with tax applied: `base_price * (1 + tax_rate)`
    #[must_use]
    #[inline]
    pub fn price_with_tax(&self) -> Decimal {
        self.price_with_tax
    }

    /// Returns whether the product had expired by `reference`.
    ///
    /// A perishable product is expired only if its expiry date is strictly before
    /// `reference`. Common products never expire.
    #[must_use]
    pub fn is_expired(&self, reference: NaiveDate) -> bool {
        match self.kind {
            ProductKind::Common => false,
            ProductKind::Perishable { expiry } => expiry < reference,
        }
    }
}

impl<'c> Order<'c> {
    /// Appends a product to the order.
    ///
    /// Returns `false`, leaving the order untouched, once [`MAX_ORDER_ITEMS`]
    /// products are already present. This is not an error; callers decide what to
    /// do with a full order.
    #[must_use]
    pub fn add_item(&mut self, product: &'c Product) -> bool {
        if self.items.len() >= MAX_ORDER_ITEMS {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Returns the sum of every item's price with tax.
    ///
    /// Products are validated so that [`MAX_ORDER_ITEMS`] of them fit in a
    /// [`Decimal`], so the sum can't saturate.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.price_with_tax()))
    }

    /// Returns the amount due: the subtotal, less [`CASH_DISCOUNT`] for cash payments
    #[must_use]
    pub fn total(&self) -> Decimal {
        let subtotal = self.subtotal();
        match self.payment_method {
            PaymentMethod::CashOrEquivalent => subtotal.saturating_mul(Decimal::ONE - CASH_DISCOUNT),
            PaymentMethod::Installment => subtotal,
        }
    }

    /// Legacy identity rule: two orders count as the same order when placed on
    /// the same day. Not used for equality; two different orders can share a day.
    #[must_use]
    #[inline]
    pub fn same_date_as(&self, other: &Order<'_>) -> bool {
        self.date == other.date
    }
}

/// Returns the orders placed exactly on `date`, in their original order.
///
/// No matches is an empty result, not an error.
#[must_use]
pub fn find_orders_by_date<'o, 'c>(orders: &'o [Order<'c>], date: NaiveDate) -> Vec<&'o Order<'c>> {
    orders.iter().filter(|order| order.date == date).collect()
}

impl ProductCatalog for MemoryCatalog {
    fn product(&self, name: &str) -> Option<&Product> {
        self.index.get(name).map(|&position| &self.products[position])
    }

    fn insert(&mut self, product: Product) -> Option<Product> {
        match self.index.get(&product.name) {
            Some(&position) => Some(std::mem::replace(&mut self.products[position], product)),
            None => {
                self.index.insert(product.name.clone(), self.products.len());
                self.products.push(product);
                None
            }
        }
    }

    fn len(&self) -> usize {
        self.products.len()
    }
}

impl<'a> IntoIterator for &'a MemoryCatalog {
    type Item = &'a Product;

    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

impl IntoIterator for MemoryCatalog {
    type Item = Product;
    type IntoIter = std::vec::IntoIter<Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.into_iter()
    }
}
