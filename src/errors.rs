use rust_decimal::Decimal;

/// Error type that can be returned by fallible operations in this crate.
///
/// Every variant is fatal: a load that returns one of these produced no result.
/// Recoverable conditions are reported as [`Warning`](crate::types::Warning)s instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error reading a feed; could wrap IO or CSV reader errors
    #[error("Error reading feed: {0}")]
    Load(#[from] csv::Error),
    /// Error writing a report or reading from the prompt
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A date or number in a feed could not be parsed
    #[error("Line {line}: invalid {field} {value:?}")]
    Parse {
        /// The 1-based line number in the feed
        line: u64,
        /// Which field was being parsed
        field: &'static str,
        /// The raw text that failed to parse
        value: String,
    },
    /// The date given to search by is not in dd/mm/yyyy form
    #[error("Invalid search date {0:?}, expected dd/mm/yyyy")]
    QueryDate(String),
    /// A record parsed, but did not describe a valid product or order
    #[error("Line {line}: {source}")]
    Validation {
        /// The 1-based line number in the feed
        line: u64,
        /// What was wrong with the record
        source: ValidationError,
    },
}

/// Rejections raised when constructing a [`Product`](crate::types::Product) or
/// an [`Order`](crate::types::Order).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Product names must contain something other than whitespace
    #[error("Product name is blank")]
    BlankName,
    /// Base prices can't be negative
    #[error("Product {name:?} has negative base price {price}")]
    NegativePrice {
        /// Name of the offending product
        name: String,
        /// The rejected price
        price: Decimal,
    },
    /// Tax rates can't be negative (rates above 1.0 are fine)
    #[error("Product {name:?} has negative tax rate {rate}")]
    NegativeTaxRate {
        /// Name of the offending product
        name: String,
        /// The rejected rate
        rate: Decimal,
    },
    /// The price with tax is too large to total up a full order
    #[error("Product {name:?} is priced too high to total")]
    PriceTooLarge {
        /// Name of the offending product
        name: String,
    },
    /// Perishable products must carry an expiry date
    #[error("Perishable product {0:?} has no expiry date")]
    MissingExpiry(String),
    /// Orders must carry a date
    #[error("Order has no date")]
    MissingOrderDate,
    /// Only codes 1 (cash) and 2 (installment) are accepted
    #[error("Invalid payment method {0:?}")]
    InvalidPaymentMethod(String),
}
