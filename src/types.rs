//! Common datatypes supporting functions throughout the order desk

use std::{collections::HashMap, fmt::Display};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::ValidationError;

/// The most items a single [`Order`] can hold
pub const MAX_ORDER_ITEMS: usize = 10;

/// Fraction taken off the subtotal of orders paid with [`PaymentMethod::CashOrEquivalent`]
pub const CASH_DISCOUNT: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// The variant-specific part of a [`Product`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    /// An ordinary product with no extra data
    Common,
    /// A product that goes off after its expiry date
    Perishable {
        /// Last day on which the product is still good
        expiry: NaiveDate,
    },
}

/// A catalog entry.
///
/// Products are built once while the catalog loads and never change afterwards;
/// [`Order`]s only ever borrow them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Trimmed, non-blank name; the catalog key
    pub(crate) name: String,
    /// Price before tax, never negative
    pub(crate) base_price: Decimal,
    /// Tax as a fraction of the base price (0.15 is 15%), never negative
    pub(crate) tax_rate: Decimal,
    /// `base_price * (1 + tax_rate)`, small enough that a full order can be summed
    pub(crate) price_with_tax: Decimal,
    /// Common or perishable
    pub(crate) kind: ProductKind,
}

impl Product {
    /// Creates a product, trimming its name.
    /// # Errors
    /// [`ValidationError::BlankName`] if the name is blank,
    /// [`ValidationError::NegativePrice`] or [`ValidationError::NegativeTaxRate`]
    /// if either amount is below zero, [`ValidationError::PriceTooLarge`] if
    /// [`MAX_ORDER_ITEMS`] of it would overflow a [`Decimal`].
    pub fn new(
        name: &str,
        base_price: Decimal,
        tax_rate: Decimal,
        kind: ProductKind,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankName);
        }
        if base_price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice {
                name: name.to_owned(),
                price: base_price,
            });
        }
        if tax_rate < Decimal::ZERO {
            return Err(ValidationError::NegativeTaxRate {
                name: name.to_owned(),
                rate: tax_rate,
            });
        }
        let price_with_tax = Decimal::ONE
            .checked_add(tax_rate)
            .and_then(|factor| base_price.checked_mul(factor))
            .filter(|price| price.checked_mul(Decimal::from(MAX_ORDER_ITEMS)).is_some())
            .ok_or_else(|| ValidationError::PriceTooLarge {
                name: name.to_owned(),
            })?;
        Ok(Self {
            name: name.to_owned(),
            base_price,
            tax_rate,
            price_with_tax,
            kind,
        })
    }

    /// Creates a [`ProductKind::Common`] product
    /// # Errors
    /// See [`Product::new`]
    pub fn common(name: &str, base_price: Decimal, tax_rate: Decimal) -> Result<Self, ValidationError> {
        Self::new(name, base_price, tax_rate, ProductKind::Common)
    }

    /// Creates a [`ProductKind::Perishable`] product.
    /// # Errors
    /// [`ValidationError::MissingExpiry`] if `expiry` is `None`, otherwise see [`Product::new`]
    pub fn perishable(
        name: &str,
        base_price: Decimal,
        tax_rate: Decimal,
        expiry: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        let expiry = expiry.ok_or_else(|| ValidationError::MissingExpiry(name.trim().to_owned()))?;
        Self::new(name, base_price, tax_rate, ProductKind::Perishable { expiry })
    }

    /// Returns the product's name
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price before tax
    #[must_use]
    #[inline]
    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    /// Returns the tax rate as a fraction
    #[must_use]
    #[inline]
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Returns the variant of this product
    #[must_use]
    #[inline]
    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    /// Returns the expiry date, for perishable products
    #[must_use]
    pub fn expiry(&self) -> Option<NaiveDate> {
        match self.kind {
            ProductKind::Common => None,
            ProductKind::Perishable { expiry } => Some(expiry),
        }
    }

    /// Returns whether this is a [`ProductKind::Perishable`] product
    #[must_use]
    #[inline]
    pub fn is_perishable(&self) -> bool {
        matches!(self.kind, ProductKind::Perishable { .. })
    }
}

/// How an order was paid for. The numeric codes are the ones used in the order feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Cash or an equivalent; gets [`CASH_DISCOUNT`] off the subtotal
    CashOrEquivalent = 1,
    /// Paid in installments, at full price
    Installment = 2,
}

impl PaymentMethod {
    /// Interprets a payment code from the order feed.
    ///
    /// Anything that isn't an integer is read as code 0, which is then rejected
    /// like any other unknown code.
    /// # Errors
    /// [`ValidationError::InvalidPaymentMethod`] for codes other than 1 and 2
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code.trim().parse::<i64>().unwrap_or(0) {
            1 => Ok(Self::CashOrEquivalent),
            2 => Ok(Self::Installment),
            _ => Err(ValidationError::InvalidPaymentMethod(code.trim().to_owned())),
        }
    }

    /// Returns the feed code for this method
    #[must_use]
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CashOrEquivalent => write!(f, "Cash (15% off)"),
            Self::Installment => write!(f, "Installments"),
        }
    }
}

/// A purchase: a date, a payment method and up to [`MAX_ORDER_ITEMS`] products
/// borrowed from a catalog.
///
/// Equality is structural. Use [`Order::same_date_as`] for the looser
/// "same order if same day" comparison found in older feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order<'c> {
    /// The day the order was placed
    pub(crate) date: NaiveDate,
    /// How it was paid for
    pub(crate) payment_method: PaymentMethod,
    /// Products in insertion order
    pub(crate) items: Vec<&'c Product>,
}

impl<'c> Order<'c> {
    /// Creates a new, empty order
    #[must_use]
    pub fn new(date: NaiveDate, payment_method: PaymentMethod) -> Self {
        Self {
            date,
            payment_method,
            items: Vec::with_capacity(MAX_ORDER_ITEMS),
        }
    }

    /// Creates a new, empty order from possibly-missing feed values.
    /// # Errors
    /// [`ValidationError::MissingOrderDate`] without a date, or
    /// [`ValidationError::InvalidPaymentMethod`] for an unknown payment code
    pub fn try_new(date: Option<NaiveDate>, payment_code: &str) -> Result<Self, ValidationError> {
        let date = date.ok_or(ValidationError::MissingOrderDate)?;
        Ok(Self::new(date, PaymentMethod::from_code(payment_code)?))
    }

    /// Returns the day the order was placed
    #[must_use]
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns how the order was paid for
    #[must_use]
    #[inline]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Returns the products in this order
    #[must_use]
    #[inline]
    pub fn items(&self) -> &[&'c Product] {
        &self.items
    }

    /// Returns how many products are in this order
    #[must_use]
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Which feed a [`Warning`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// The product catalog feed
    Products,
    /// The purchase order feed
    Orders,
}

impl Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Products => write!(f, "products"),
            Self::Orders => write!(f, "orders"),
        }
    }
}

/// Something odd in a feed that did not stop it from loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The count on the first line didn't match what was read
    DeclaredCountMismatch {
        /// The feed in question
        feed: Feed,
        /// Count from the first line (0 if unreadable)
        declared: i64,
        /// Records actually loaded
        loaded: usize,
    },
    /// A row had too few fields and was skipped
    ShortRecord {
        /// The feed in question
        feed: Feed,
        /// 1-based line number
        line: u64,
    },
    /// An order named a product that isn't in the catalog; the item was skipped
    UnknownProduct {
        /// The name as written in the order feed
        name: String,
        /// Date of the order naming it
        order_date: NaiveDate,
    },
    /// An order hit [`MAX_ORDER_ITEMS`]; the rest of its row was dropped
    CapacityReached {
        /// Date of the full order
        order_date: NaiveDate,
        /// How many item names were left unprocessed
        dropped: usize,
    },
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeclaredCountMismatch {
                feed,
                declared,
                loaded,
            } => write!(f, "Declared {feed} count ({declared}) differs from loaded ({loaded})"),
            Self::ShortRecord { feed, line } => {
                write!(f, "Skipped short {feed} record on line {line}")
            }
            Self::UnknownProduct { name, order_date } => write!(
                f,
                "Product not found in catalog: {name:?} (order {})",
                order_date.format("%d/%m/%Y")
            ),
            Self::CapacityReached {
                order_date,
                dropped,
            } => write!(
                f,
                "Order {} reached the item limit; {dropped} item(s) dropped",
                order_date.format("%d/%m/%Y")
            ),
        }
    }
}

/// The outcome of a load that succeeded, possibly with [`Warning`]s
#[derive(Debug)]
pub struct Loaded<T> {
    /// Whatever could be loaded
    pub value: T,
    /// Everything recoverable that went wrong, in feed order
    pub warnings: Vec<Warning>,
}

/// An interface to a name-keyed collection of products
pub trait ProductCatalog: IntoIterator<Item = Product>
where
    for<'a> &'a Self: IntoIterator<Item = &'a Product>,
    Self: Sized,
{
    /// Fetches a product by exact name
    fn product(&self, name: &str) -> Option<&Product>;

    /// Adds a product. A product with the same name is replaced, keeping its
    /// original position, and returned.
    fn insert(&mut self, product: Product) -> Option<Product>;

    /// Returns the number of distinct products
    fn len(&self) -> usize;

    /// Returns whether the catalog holds no products
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Holds all products in an in-memory arena, in insertion order.
///
/// # Limitations
/// No persistence.
///
/// Read-only once loaded; orders hold plain references into it.
#[derive(Default, Debug)]
pub struct MemoryCatalog {
    /// The products, in the order their names were first seen
    pub(crate) products: Vec<Product>,
    /// Position of each product in `products`, by name
    pub(crate) index: HashMap<String, usize>,
}

impl MemoryCatalog {
    /// Creates a new, empty [`MemoryCatalog`]
    #[must_use]
    pub fn new() -> Self {
        MemoryCatalog::default()
    }
}
