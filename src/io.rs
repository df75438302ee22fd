//! Helpers for reading the product and order feeds, and outputting reports

use std::{
    borrow::Cow,
    fmt::Display,
    io::{Read, Write},
    str::FromStr,
};

use chrono::NaiveDate;
use csv::{StringRecord, Trim};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::{
    errors::Error,
    types::{Feed, Loaded, Order, Product, ProductCatalog, Warning},
};

/// The one date format both feeds and the search prompt use
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Builds a reader for a semicolon-delimited feed with no header row and no quoting.
fn feed_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader)
}

/// Returns the fields of a record, dropping trailing empty ones the way a
/// plain split on `;` does. A blank line comes back empty.
fn fields(record: &StringRecord) -> Vec<&str> {
    let mut fields: Vec<&str> = record.iter().collect();
    while fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }
    fields
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

/// Replaces a comma decimal separator with a point, so `"2,50"` reads as `2.50`
#[must_use]
pub fn normalize_decimal(raw: &str) -> Cow<'_, str> {
    if raw.contains(',') {
        Cow::Owned(raw.replace(',', "."))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Parses a decimal that may use either `.` or `,` as its separator
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let normalized = normalize_decimal(raw.trim());
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Parses a date in strict `dd/mm/yyyy` form: two-digit day, two-digit month,
/// four-digit year.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Reads the declared record count on a feed's first line. Anything unreadable counts as 0.
#[must_use]
pub fn parse_declared_count(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

fn decimal_field(value: &str, line: u64, field: &'static str) -> Result<Decimal, Error> {
    parse_decimal(value).ok_or_else(|| Error::Parse {
        line,
        field,
        value: value.to_owned(),
    })
}

fn date_field(value: &str, line: u64, field: &'static str) -> Result<NaiveDate, Error> {
    parse_date(value).ok_or_else(|| Error::Parse {
        line,
        field,
        value: value.to_owned(),
    })
}

/// Reads every record of a feed. The declared count is taken from line 1 if
/// that line holds anything; otherwise it is 0 and every record is data.
fn read_feed<R: Read>(reader: R) -> Result<(i64, Vec<StringRecord>), Error> {
    let mut records = feed_reader(reader)
        .into_records()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .peekable();
    let has_count_line = records.peek().is_some_and(|first| line_of(first) == 1);
    let declared = if has_count_line {
        records
            .next()
            .map_or(0, |first| parse_declared_count(first.get(0).unwrap_or_default()))
    } else {
        0
    };
    Ok((declared, records.collect()))
}

/// Loads a product catalog from a feed.
///
/// The whole feed is read before anything is returned: either every valid
/// record ends up in the catalog, or the load fails and nothing is returned.
///
/// Expects input data in this format, where a first field of `2` marks a
/// perishable product (which must carry an expiry date) and anything else a
/// common one:
/// ```text
/// 3
/// 1;Apple;2.00;0.10
/// 2;Milk;3,00;0,05;01/01/2024
/// 1;Rice;12.5;0
/// ```
///
/// # Errors
/// - [`Error::Load`] if the feed can't be read
/// - [`Error::Parse`] for a malformed number or expiry date
/// - [`Error::Validation`] for a blank name, a negative amount, a price too large
///   to total, or a perishable product without an expiry date
pub fn load_products_from_csv<R, C>(reader: &mut R) -> Result<Loaded<C>, Error>
where
    R: Read,
    C: ProductCatalog + Default,
    for<'a> &'a C: IntoIterator<Item = &'a Product>,
{
    let (declared, records) = read_feed(reader)?;
    let mut catalog = C::default();
    let mut warnings = Vec::new();
    let mut parsed = 0;
    for record in &records {
        let line = line_of(record);
        let fields = fields(record);
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 4 {
            warnings.push(Warning::ShortRecord {
                feed: Feed::Products,
                line,
            });
            continue;
        }
        let name = fields[1];
        let base_price = decimal_field(fields[2], line, "base price")?;
        let tax_rate = decimal_field(fields[3], line, "tax rate")?;
        let product = if fields[0].parse::<i64>() == Ok(2) {
            let expiry = fields
                .get(4)
                .map(|raw| date_field(raw, line, "expiry date"))
                .transpose()?;
            Product::perishable(name, base_price, tax_rate, expiry)
        } else {
            Product::common(name, base_price, tax_rate)
        }
        .map_err(|source| Error::Validation { line, source })?;
        tracing::debug!(line, name = product.name(), "loaded product");
        if let Some(replaced) = catalog.insert(product) {
            tracing::debug!(line, name = replaced.name(), "replaced earlier product");
        }
        parsed += 1;
    }
    if declared != parsed as i64 {
        warnings.push(Warning::DeclaredCountMismatch {
            feed: Feed::Products,
            declared,
            loaded: parsed,
        });
    }
    Ok(Loaded {
        value: catalog,
        warnings,
    })
}

/// Loads purchase orders from a feed, resolving item names against `catalog`.
///
/// Unknown item names are skipped with a warning. Once an order is full, the
/// rest of its row is dropped with a warning, but the order itself is kept.
///
/// Expects input data in this format, where payment method `1` is cash and `2`
/// is installments:
/// ```text
/// 2
/// 15/03/2024;1;Apple;Milk
/// 16/03/2024;2;Rice
/// ```
///
/// # Errors
/// - [`Error::Load`] if the feed can't be read
/// - [`Error::Parse`] for a malformed order date
/// - [`Error::Validation`] for a missing date or a payment method other than 1 or 2
pub fn load_orders_from_csv<'c, R, C>(
    reader: &mut R,
    catalog: &'c C,
) -> Result<Loaded<Vec<Order<'c>>>, Error>
where
    R: Read,
    C: ProductCatalog,
    for<'a> &'a C: IntoIterator<Item = &'a Product>,
{
    let (declared, records) = read_feed(reader)?;
    let mut orders = Vec::new();
    let mut warnings = Vec::new();
    for record in &records {
        let line = line_of(record);
        let fields = fields(record);
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 2 {
            warnings.push(Warning::ShortRecord {
                feed: Feed::Orders,
                line,
            });
            continue;
        }
        let date = match fields[0] {
            "" => None,
            raw => Some(date_field(raw, line, "order date")?),
        };
        let mut order =
            Order::try_new(date, fields[1]).map_err(|source| Error::Validation { line, source })?;
        let names = &fields[2..];
        for (position, name) in names.iter().enumerate() {
            let Some(product) = catalog.product(name) else {
                warnings.push(Warning::UnknownProduct {
                    name: (*name).to_owned(),
                    order_date: order.date(),
                });
                continue;
            };
            if !order.add_item(product) {
                warnings.push(Warning::CapacityReached {
                    order_date: order.date(),
                    dropped: names.len() - position,
                });
                break;
            }
        }
        tracing::debug!(line, items = order.item_count(), "loaded order");
        orders.push(order);
    }
    if declared != orders.len() as i64 {
        warnings.push(Warning::DeclaredCountMismatch {
            feed: Feed::Orders,
            declared,
            loaded: orders.len(),
        });
    }
    Ok(Loaded {
        value: orders,
        warnings,
    })
}

/// Parses the date an operator asked to search by.
/// # Errors
/// [`Error::QueryDate`] unless the answer is a `dd/mm/yyyy` date
pub fn parse_query_date(raw: &str) -> Result<NaiveDate, Error> {
    parse_date(raw).ok_or_else(|| Error::QueryDate(raw.trim().to_owned()))
}

/// Rounds for display only, with halves going away from zero
fn rounded(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Money is shown with two decimals; the underlying amounts stay exact
struct Money(Decimal);

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R$ {:.2}", rounded(self.0, 2))
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, tax {:.0}%)",
            self.name,
            Money(self.base_price),
            rounded(self.tax_rate.saturating_mul(Decimal::ONE_HUNDRED), 0)
        )?;
        if let Some(expiry) = self.expiry() {
            write!(f, " - expires: {}", expiry.format(DATE_FORMAT))?;
        }
        Ok(())
    }
}

impl Display for Order<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Date: {}", self.date.format(DATE_FORMAT))?;
        writeln!(f, "Payment: {}", self.payment_method)?;
        writeln!(f, "Items ({}):", self.items.len())?;
        for item in &self.items {
            writeln!(f, "  - {item} -> {}", Money(item.price_with_tax()))?;
        }
        writeln!(f, "Subtotal: {}", Money(self.subtotal()))?;
        write!(f, "Total:    {}", Money(self.total()))
    }
}

/// Outputs a human-readable report of the orders found for `date`.
///
/// Output will be in the form:
/// ```text
/// Orders on 15/03/2024:
/// --------------------------------
/// Date: 15/03/2024
/// Payment: Cash (15% off)
/// Items (1):
///   - Apple (R$ 2.00, tax 10%) -> R$ 2.20
/// Subtotal: R$ 2.20
/// Total:    R$ 1.87
/// ```
pub fn write_orders_report<W: Write>(
    writer: &mut W,
    date: NaiveDate,
    orders: &[&Order<'_>],
) -> Result<(), Error> {
    writeln!(writer, "Orders on {}:", date.format(DATE_FORMAT))?;
    if orders.is_empty() {
        writeln!(writer, "(no orders found for this date)")?;
    }
    for order in orders {
        writeln!(writer, "--------------------------------")?;
        writeln!(writer, "{order}")?;
    }
    Ok(())
}

/// Type used for serializing an [`Order`] as one CSV row with its totals.
#[derive(Serialize, Debug)]
struct OrderSummary {
    /// The order date, `dd/mm/yyyy`
    date: String,
    /// The payment method code, 1 or 2
    payment_method: u8,
    /// Number of products in the order
    items: usize,
    /// Sum of item prices with tax
    subtotal: Decimal,
    /// Amount due after any discount
    total: Decimal,
}

impl From<&Order<'_>> for OrderSummary {
    fn from(order: &Order<'_>) -> Self {
        Self {
            date: order.date().format(DATE_FORMAT).to_string(),
            payment_method: order.payment_method().code(),
            items: order.item_count(),
            subtotal: order.subtotal(),
            total: order.total(),
        }
    }
}

/// Outputs the supplied orders to CSV.
///
/// Output data will be in the form:
/// ```csv
/// date,payment_method,items,subtotal,total
/// 15/03/2024,1,2,5.35,4.5475
/// ```
pub fn write_orders_to_csv<W: Write>(writer: &mut W, orders: &[&Order<'_>]) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for order in orders {
        csv_writer.serialize(OrderSummary::from(*order))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rust_decimal_macros::dec;

    use crate::{
        errors::ValidationError,
        ops::find_orders_by_date,
        types::{MemoryCatalog, PaymentMethod, MAX_ORDER_ITEMS},
    };

    use super::*;

    const TEST_PRODUCTS: &[u8] = b"3
1;Apple;2.00;0.10
2;Milk;3,00;0,05;01/01/2024

1;Rice;12.5;0
";

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn load_catalog(input: &[u8]) -> Result<Loaded<MemoryCatalog>, Error> {
        load_products_from_csv(&mut Cursor::new(input))
    }

    fn test_catalog() -> MemoryCatalog {
        load_catalog(TEST_PRODUCTS).unwrap().value
    }

    #[test]
    fn test_normalize_decimal() {
        assert_eq!(normalize_decimal("2,50"), "2.50");
        assert_eq!(normalize_decimal("2.50"), "2.50");
        assert_eq!(parse_decimal("2,50"), Some(dec!(2.5)));
        assert_eq!(parse_decimal(" 0.15 "), Some(dec!(0.15)));
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_parse_date_is_strict() {
        assert_eq!(parse_date("01/01/2024"), Some(date(2024, 1, 1)));
        assert_eq!(parse_date(" 15/03/2024 "), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("1/1/2024"), None);
        assert_eq!(parse_date("2024-01-01"), None);
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date("01/01/24"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_declared_count_is_lenient() {
        assert_eq!(parse_declared_count(" 4 "), 4);
        assert_eq!(parse_declared_count("four"), 0);
        assert_eq!(parse_declared_count(""), 0);
    }

    #[test]
    fn test_load_products() {
        let loaded = load_catalog(TEST_PRODUCTS).unwrap();
        assert!(loaded.warnings.is_empty());
        let catalog = loaded.value;
        assert_eq!(catalog.len(), 3);
        let apple = catalog.product("Apple").unwrap();
        assert!(!apple.is_perishable());
        assert_eq!(apple.price_with_tax(), dec!(2.20));
        let milk = catalog.product("Milk").unwrap();
        assert_eq!(milk.expiry(), Some(date(2024, 1, 1)));
        assert_eq!(milk.base_price(), dec!(3.00));
        assert!(milk.is_expired(date(2024, 6, 1)));
    }

    #[test]
    fn test_load_products_skips_short_records() {
        let loaded = load_catalog(b"2\n1;Apple;2.00;0.10\n1;Pear;3\n   \n").unwrap();
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(
            loaded.warnings,
            vec![
                Warning::ShortRecord {
                    feed: Feed::Products,
                    line: 3
                },
                Warning::DeclaredCountMismatch {
                    feed: Feed::Products,
                    declared: 2,
                    loaded: 1
                },
            ]
        );
    }

    #[test]
    fn test_load_products_unparsable_count() {
        let loaded = load_catalog(b"lots\n1;Apple;2.00;0.10\n").unwrap();
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(
            loaded.warnings,
            vec![Warning::DeclaredCountMismatch {
                feed: Feed::Products,
                declared: 0,
                loaded: 1
            }]
        );
    }

    #[test]
    fn test_load_products_duplicate_names() {
        let loaded = load_catalog(b"2\n1;Apple;2.00;0.10\n1;Apple;4.00;0.10\n").unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.value.product("Apple").unwrap().base_price(), dec!(4));
    }

    #[test]
    fn test_load_products_empty_feed() {
        let loaded = load_catalog(b"").unwrap();
        assert!(loaded.value.is_empty());
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_perishable_without_expiry_fails() {
        let err = load_catalog(b"1\n2;Milk;3.00;0.05\n").unwrap_err();
        match err {
            Error::Validation { line, source } => {
                assert_eq!(line, 2);
                assert_eq!(source, ValidationError::MissingExpiry("Milk".into()));
            }
            other => panic!("Unexpected error {other:?}"),
        }
        assert!(load_catalog(b"1\n2;Milk;3.00;0.05;\n").is_err());
    }

    #[test]
    fn test_malformed_expiry_fails() {
        let err = load_catalog(b"1\n2;Milk;3.00;0.05;2024-01-01\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, field: "expiry date", .. }));
    }

    #[test]
    fn test_malformed_number_fails() {
        let err = load_catalog(b"1\n1;Apple;two;0.10\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, field: "base price", .. }));
    }

    #[test]
    fn test_invalid_product_fails() {
        let err = load_catalog(b"1\n1;Apple;-2.00;0.10\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                source: ValidationError::NegativePrice { .. },
                ..
            }
        ));
        let err = load_catalog(b"1\n1; ;2.00;0.10\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                source: ValidationError::BlankName,
                ..
            }
        ));
    }

    #[test]
    fn test_price_too_large_fails() {
        let err = load_catalog(b"1\n1;Yacht;1e20;1e10\n").unwrap_err();
        match err {
            Error::Validation { line, source } => {
                assert_eq!(line, 2);
                assert_eq!(
                    source,
                    ValidationError::PriceTooLarge {
                        name: "Yacht".into()
                    }
                );
            }
            other => panic!("Unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_report_for_full_order_of_large_prices() {
        let catalog = load_catalog(b"1\n1;Jet;1e26;0\n").unwrap().value;
        let mut input = String::from("1\n15/03/2024;1");
        for _ in 0..MAX_ORDER_ITEMS {
            input.push_str(";Jet");
        }
        input.push('\n');
        let orders = load_orders_from_csv(&mut Cursor::new(input.as_bytes()), &catalog)
            .unwrap()
            .value;
        let expected_subtotal = Decimal::from_scientific("1e27").unwrap();
        assert_eq!(orders[0].subtotal(), expected_subtotal);
        assert_eq!(orders[0].total(), expected_subtotal * dec!(0.85));
        let found = find_orders_by_date(&orders, date(2024, 3, 15));
        let mut output = vec![];
        write_orders_report(&mut output, date(2024, 3, 15), &found).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Items (10):"));
        assert!(output.contains("Subtotal: R$ 1000000000000000000000000000.00"));
    }

    #[test]
    fn test_display_rounds_halves_up() {
        let gum = Product::common("Gum", dec!(0.125), dec!(0.125)).unwrap();
        assert_eq!(gum.to_string(), "Gum (R$ 0.13, tax 13%)");
    }

    #[test]
    fn test_load_orders() {
        let catalog = test_catalog();
        let input = b"2\n15/03/2024;1;Apple;Milk\n16/03/2024;2;Rice;Apple\n";
        let loaded = load_orders_from_csv(&mut Cursor::new(&input[..]), &catalog).unwrap();
        assert!(loaded.warnings.is_empty());
        let orders = loaded.value;
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].payment_method(), PaymentMethod::CashOrEquivalent);
        assert_eq!(orders[0].subtotal(), dec!(5.35));
        assert_eq!(orders[0].total(), dec!(4.5475));
        assert_eq!(orders[1].payment_method(), PaymentMethod::Installment);
        assert_eq!(orders[1].total(), dec!(14.70));
    }

    #[test]
    fn test_load_orders_unknown_product() {
        let catalog = test_catalog();
        let input = b"1\n15/03/2024;2;Bread;Apple\n";
        let loaded = load_orders_from_csv(&mut Cursor::new(&input[..]), &catalog).unwrap();
        assert_eq!(
            loaded.warnings,
            vec![Warning::UnknownProduct {
                name: "Bread".into(),
                order_date: date(2024, 3, 15)
            }]
        );
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.value[0].item_count(), 1);
        assert_eq!(loaded.value[0].items()[0].name(), "Apple");
    }

    #[test]
    fn test_load_orders_capacity() {
        let catalog = test_catalog();
        let mut input = String::from("2\n15/03/2024;2");
        for _ in 0..12 {
            input.push_str(";Apple");
        }
        input.push_str("\n16/03/2024;1;Rice\n");
        let loaded = load_orders_from_csv(&mut Cursor::new(input.as_bytes()), &catalog).unwrap();
        assert_eq!(
            loaded.warnings,
            vec![Warning::CapacityReached {
                order_date: date(2024, 3, 15),
                dropped: 2
            }]
        );
        assert_eq!(loaded.value.len(), 2);
        assert_eq!(loaded.value[0].item_count(), MAX_ORDER_ITEMS);
        assert_eq!(loaded.value[1].item_count(), 1);
    }

    #[test]
    fn test_load_orders_unknown_product_after_full() {
        let catalog = test_catalog();
        let mut input = String::from("1\n15/03/2024;2");
        for _ in 0..MAX_ORDER_ITEMS {
            input.push_str(";Apple");
        }
        input.push_str(";Bread;Apple\n");
        let loaded = load_orders_from_csv(&mut Cursor::new(input.as_bytes()), &catalog).unwrap();
        assert_eq!(
            loaded.warnings,
            vec![
                Warning::UnknownProduct {
                    name: "Bread".into(),
                    order_date: date(2024, 3, 15)
                },
                Warning::CapacityReached {
                    order_date: date(2024, 3, 15),
                    dropped: 1
                },
            ]
        );
        assert_eq!(loaded.value[0].item_count(), MAX_ORDER_ITEMS);
    }

    #[test]
    fn test_load_orders_without_items_and_short_rows() {
        let catalog = test_catalog();
        let input = b"3\n15/03/2024;1\n15/03/2024\n";
        let loaded = load_orders_from_csv(&mut Cursor::new(&input[..]), &catalog).unwrap();
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.value[0].item_count(), 0);
        assert_eq!(
            loaded.warnings,
            vec![
                Warning::ShortRecord {
                    feed: Feed::Orders,
                    line: 3
                },
                Warning::DeclaredCountMismatch {
                    feed: Feed::Orders,
                    declared: 3,
                    loaded: 1
                },
            ]
        );
    }

    #[test]
    fn test_load_orders_fatal_errors() {
        let catalog = test_catalog();
        let err = load_orders_from_csv(&mut Cursor::new(&b"1\n15-03-2024;1;Apple\n"[..]), &catalog)
            .unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, field: "order date", .. }));
        let err = load_orders_from_csv(&mut Cursor::new(&b"1\n15/03/2024;3;Apple\n"[..]), &catalog)
            .unwrap_err();
        match err {
            Error::Validation { line, source } => {
                assert_eq!(line, 2);
                assert_eq!(source, ValidationError::InvalidPaymentMethod("3".into()));
            }
            other => panic!("Unexpected error {other:?}"),
        }
        let err = load_orders_from_csv(&mut Cursor::new(&b"1\n;1;Apple\n"[..]), &catalog).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                source: ValidationError::MissingOrderDate,
                ..
            }
        ));
    }

    #[test]
    fn test_report_for_matching_date() {
        let catalog = test_catalog();
        let input = b"2\n15/03/2024;1;Apple;Milk\n16/03/2024;2;Rice\n";
        let orders = load_orders_from_csv(&mut Cursor::new(&input[..]), &catalog)
            .unwrap()
            .value;
        let found = find_orders_by_date(&orders, date(2024, 3, 15));
        let mut output = vec![];
        write_orders_report(&mut output, date(2024, 3, 15), &found).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "Orders on 15/03/2024:
--------------------------------
Date: 15/03/2024
Payment: Cash (15% off)
Items (2):
  - Apple (R$ 2.00, tax 10%) -> R$ 2.20
  - Milk (R$ 3.00, tax 5%) - expires: 01/01/2024 -> R$ 3.15
Subtotal: R$ 5.35
Total:    R$ 4.55
"
        );
    }

    #[test]
    fn test_report_without_matches() {
        let mut output = vec![];
        write_orders_report(&mut output, date(2024, 1, 1), &[]).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Orders on 01/01/2024:\n(no orders found for this date)\n"
        );
    }

    #[test]
    fn test_write_orders_to_csv() {
        let catalog = test_catalog();
        let input = b"1\n15/03/2024;1;Apple;Milk\n";
        let orders = load_orders_from_csv(&mut Cursor::new(&input[..]), &catalog)
            .unwrap()
            .value;
        let found = find_orders_by_date(&orders, date(2024, 3, 15));
        let mut output = vec![];
        write_orders_to_csv(&mut output, &found).unwrap();

        let mut csv_reader = csv::Reader::from_reader(Cursor::new(&output));
        let mut record = StringRecord::new();
        assert!(csv_reader.read_record(&mut record).unwrap());
        assert_eq!(record.get(0), Some("15/03/2024"));
        assert_eq!(record.get(1), Some("1"));
        assert_eq!(record.get(2), Some("2"));
        assert_eq!(parse_decimal(record.get(3).unwrap()), Some(dec!(5.35)));
        assert_eq!(parse_decimal(record.get(4).unwrap()), Some(dec!(4.5475)));
        assert!(!csv_reader.read_record(&mut record).unwrap());
    }
}
