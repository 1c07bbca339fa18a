//! Cart Builder
//!
//! Turns the quantity inputs of the selection screen (one per catalog row)
//! into a cart. Zero-quantity rows are dropped, so the total and the receipt
//! only show what was bought.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::CatalogItem;

use crate::error::ValidationError;

/// One purchased game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub game_id: i64,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub duration_minutes: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Built cart; recompute from inputs rather than mutating it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    total: Decimal,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Minutes booked across all lines
    pub fn total_minutes(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.duration_minutes) * u64::from(line.quantity))
            .sum()
    }
}

/// Coerce free-form quantity text to a count
///
/// Negative or non-numeric input is 0; fractions are truncated.
pub fn parse_quantity(input: &str) -> u32 {
    let input = input.trim();
    if let Ok(n) = input.parse::<i64>() {
        return u32::try_from(n.max(0)).unwrap_or(u32::MAX);
    }
    match input.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => {
            // `as` saturates at u32::MAX
            n.trunc() as u32
        }
        _ => 0,
    }
}

/// Build the cart from the catalog and its parallel quantity inputs
///
/// Missing inputs count as 0. An empty result refuses checkout.
pub fn build_cart<S: AsRef<str>>(
    catalog: &[CatalogItem],
    quantities: &[S],
) -> Result<Cart, ValidationError> {
    let lines: Vec<CartLine> = catalog
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let quantity = quantities
                .get(index)
                .map(|q| parse_quantity(q.as_ref()))
                .unwrap_or(0);
            (quantity > 0).then(|| CartLine {
                game_id: item.id,
                title: item.title.clone(),
                unit_price: item.unit_price,
                quantity,
                duration_minutes: item.duration_minutes,
            })
        })
        .collect();

    if lines.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    let total = lines.iter().map(CartLine::line_total).sum();
    Ok(Cart { lines, total })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem {
                id: 1,
                title: "Racing".into(),
                unit_price: Decimal::from(500),
                url: None,
                duration_minutes: 10,
            },
            CatalogItem {
                id: 2,
                title: "VR".into(),
                unit_price: Decimal::from(800),
                url: None,
                duration_minutes: 15,
            },
        ]
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" 4 "), 4);
        assert_eq!(parse_quantity("-2"), 0);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("2.7"), 2);
        assert_eq!(parse_quantity("-0.5"), 0);
        assert_eq!(parse_quantity("NaN"), 0);
    }

    #[test]
    fn test_zero_lines_dropped() {
        let cart = build_cart(&catalog(), &["2", "0"]).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].title, "Racing");
        assert_eq!(cart.lines()[0].unit_price, Decimal::from(500));
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total(), Decimal::from(1000));
    }

    #[test]
    fn test_total_is_sum_of_line_totals() {
        let cart = build_cart(&catalog(), &["3", "2"]).unwrap();
        let expected: Decimal = cart.lines().iter().map(CartLine::line_total).sum();
        assert_eq!(cart.total(), expected);
        assert_eq!(cart.total(), Decimal::from(3100));
        assert_eq!(cart.total_minutes(), 60);
    }

    #[test]
    fn test_empty_cart_refused() {
        assert_eq!(
            build_cart::<&str>(&catalog(), &[]),
            Err(ValidationError::EmptyCart)
        );
        assert_eq!(
            build_cart(&catalog(), &["0", "-1"]),
            Err(ValidationError::EmptyCart)
        );
        assert_eq!(
            build_cart::<&str>(&[], &["5"]),
            Err(ValidationError::EmptyCart)
        );
    }

    #[test]
    fn test_short_input_array() {
        let cart = build_cart(&catalog(), &["1"]).unwrap();
        assert_eq!(cart.total(), Decimal::from(500));
    }
}
