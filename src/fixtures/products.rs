//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, INR, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Product, ProductVariant},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Category id
    #[serde(default)]
    pub category: Option<String>,

    /// Base price (e.g., "2.99 GBP")
    #[serde(default)]
    pub price: Option<String>,

    /// Sale price
    #[serde(default)]
    pub sale_price: Option<String>,

    /// Variants keyed by variant id
    #[serde(default)]
    pub variants: FxHashMap<String, VariantFixture>,
}

/// Product variant fixture from YAML
#[derive(Debug, Deserialize)]
pub struct VariantFixture {
    /// Stock keeping unit
    #[serde(default)]
    pub sku: Option<String>,

    /// Variant price
    #[serde(default)]
    pub price: Option<String>,

    /// Variant sale price
    #[serde(default)]
    pub sale_price: Option<String>,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,

    /// Size
    #[serde(default)]
    pub size: Option<String>,

    /// Colour
    #[serde(default)]
    pub color: Option<String>,

    /// Material
    #[serde(default)]
    pub material: Option<String>,
}

impl ProductFixture {
    /// Every price string set on the product and its variants.
    pub fn price_strs(&self) -> impl Iterator<Item = &str> {
        let variant_prices = self
            .variants
            .values()
            .flat_map(|variant| [variant.price.as_deref(), variant.sale_price.as_deref()]);

        [self.price.as_deref(), self.sale_price.as_deref()]
            .into_iter()
            .chain(variant_prices)
            .flatten()
    }

    /// Convert to a product, keyed by `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed.
    pub fn try_into_product(&self, id: &str) -> Result<Product<'static>, FixtureError> {
        Ok(Product {
            id: id.into(),
            name: self.name.clone(),
            category_id: self.category.as_deref().map(Into::into),
            base_price: parse_money(self.price.as_deref())?,
            sale_price: parse_money(self.sale_price.as_deref())?,
        })
    }
}

impl VariantFixture {
    /// Convert to a variant, keyed by `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed.
    pub fn try_into_variant(&self, id: &str) -> Result<ProductVariant<'static>, FixtureError> {
        Ok(ProductVariant {
            id: id.into(),
            sku: self.sku.clone(),
            price: parse_money(self.price.as_deref())?,
            sale_price: parse_money(self.sale_price.as_deref())?,
            stock: self.stock,
            size: self.size.clone(),
            color: self.color.clone(),
            material: self.material.clone(),
        })
    }
}

/// Parse an optional price string into money.
///
/// # Errors
///
/// Returns an error if the price string is invalid.
pub fn parse_money(s: Option<&str>) -> Result<Option<Money<'static, Currency>>, FixtureError> {
    s.map(|s| {
        let (minor, currency) = parse_price(s)?;

        Ok(Money::from_minor(minor, currency))
    })
    .transpose()
}

/// Parse a price string like "2.99 GBP" into (`minor_units`, currency).
///
/// # Errors
///
/// Returns an error if the price format is invalid, the currency is unknown,
/// or the amount has more decimal places than the currency allows.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match currency_code {
        "INR" => INR,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() || amount.scale() > currency.exponent {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}
