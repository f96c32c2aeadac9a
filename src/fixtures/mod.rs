//! Fixtures
//!
//! YAML fixture sets for catalogs, carts and coupons. A set named `demo` is
//! read from `products/demo.yml`, `carts/demo.yml` and `coupons/demo.yml`
//! under the base path.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    coupons::{Coupon, CouponCode},
    fixtures::{carts::CartFixture, coupons::CouponsFixture, products::ProductsFixture},
    items::CartItem,
    products::{Product, ProductVariant},
};

pub mod carts;
pub mod coupons;
pub mod products;

/// Fixture directory used when none is given
pub const DEFAULT_BASE_PATH: &str = "./fixtures";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage
    #[error("Invalid percentage, expected 0 to 100: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Variant not found on its product
    #[error("Variant {variant} not found on product {product}")]
    VariantNotFound {
        /// Product key
        product: String,

        /// Variant key
        variant: String,
    },

    /// Coupon not found
    #[error("Coupon not found: {0}")]
    CouponNotFound(String),

    /// Scoped coupon without an id for its scope (coupon code, scope)
    #[error("Coupon {0} applies to a {1} but names none")]
    MissingScopeId(String, &'static str),

    /// Currency mismatch between fixtures
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// A catalog product together with its variants.
#[derive(Debug, Clone)]
struct CatalogEntry<'a> {
    product: Product<'a>,
    variants: FxHashMap<String, ProductVariant<'a>>,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog keyed by product key
    catalog: FxHashMap<String, CatalogEntry<'a>>,

    /// Cart lines, in fixture order
    items: Vec<CartItem<'a>>,

    /// Coupons keyed by code
    coupons: FxHashMap<String, Coupon<'a>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture<'static> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path(DEFAULT_BASE_PATH)
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: FxHashMap::default(),
            items: Vec::new(),
            coupons: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load products (and their variants) from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            for price in product_fixture.price_strs() {
                self.check_currency(price)?;
            }

            let product = product_fixture.try_into_product(&key)?;

            let variants: FxHashMap<String, ProductVariant<'static>> = product_fixture
                .variants
                .iter()
                .map(|(variant_key, variant)| {
                    Ok((variant_key.clone(), variant.try_into_variant(variant_key)?))
                })
                .collect::<Result<_, FixtureError>>()?;

            self.catalog.insert(key, CatalogEntry { product, variants });
        }

        Ok(self)
    }

    /// Load cart lines from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if referenced
    /// products or variants don't exist.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        for line in fixture.items {
            let entry = self
                .catalog
                .get(&line.product)
                .ok_or_else(|| FixtureError::ProductNotFound(line.product.clone()))?;

            let item = match &line.variant {
                Some(variant_key) => {
                    let variant = entry.variants.get(variant_key).ok_or_else(|| {
                        FixtureError::VariantNotFound {
                            product: line.product.clone(),
                            variant: variant_key.clone(),
                        }
                    })?;

                    CartItem::with_variant(entry.product.clone(), variant.clone(), line.quantity)
                }
                None => CartItem::new(entry.product.clone(), line.quantity),
            };

            self.items.push(item);
        }

        Ok(self)
    }

    /// Load coupons from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if a coupon is invalid.
    pub fn load_coupons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("coupons").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CouponsFixture = serde_norway::from_str(&contents)?;

        for (code, coupon_fixture) in fixture.coupons {
            for price in coupon_fixture.price_strs() {
                self.check_currency(price)?;
            }

            let coupon = coupon_fixture.try_into_coupon(&code)?;

            self.coupons.insert(code, coupon);
        }

        Ok(self)
    }

    /// Load a fixture set, using the cart of the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in(DEFAULT_BASE_PATH, name, name)
    }

    /// Load a fixture set from a base path, with a named cart.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(
        base_path: impl Into<PathBuf>,
        name: &str,
        cart: &str,
    ) -> Result<Self, FixtureError> {
        let mut fixture = Self::catalog_in(base_path, name)?;

        fixture.load_cart(cart)?;

        Ok(fixture)
    }

    /// Load the products and coupons of a fixture set from a base path,
    /// without a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the product or coupon files cannot be loaded.
    pub fn catalog_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture.load_products(name)?.load_coupons(name)?;

        Ok(fixture)
    }

    /// Record the currency of a fixture price, failing if it differs from
    /// the currency seen so far.
    fn check_currency(&mut self, price: &str) -> Result<(), FixtureError> {
        let (_minor_units, currency) = products::parse_price(price)?;

        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);

                Ok(())
            }
        }
    }
}

impl<'a> Fixture<'a> {
    /// Get a product by its key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product<'a>, FixtureError> {
        self.catalog
            .get(key)
            .map(|entry| &entry.product)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a variant by its product and variant keys
    ///
    /// # Errors
    ///
    /// Returns an error if the product or variant is not found.
    pub fn variant(&self, product: &str, variant: &str) -> Result<&ProductVariant<'a>, FixtureError> {
        let entry = self
            .catalog
            .get(product)
            .ok_or_else(|| FixtureError::ProductNotFound(product.to_string()))?;

        entry
            .variants
            .get(variant)
            .ok_or_else(|| FixtureError::VariantNotFound {
                product: product.to_string(),
                variant: variant.to_string(),
            })
    }

    /// Get a coupon by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the coupon is not found.
    pub fn coupon(&self, code: &str) -> Result<&Coupon<'a>, FixtureError> {
        self.coupons
            .get(code)
            .ok_or_else(|| FixtureError::CouponNotFound(code.to_string()))
    }

    /// Get all coupons, ordered by code
    pub fn coupons(&self) -> Vec<&Coupon<'a>> {
        let mut coupons: Vec<&Coupon<'a>> = self.coupons.values().collect();

        coupons.sort_by(|a, b| a.code.cmp(&b.code));

        coupons
    }

    /// Get the codes of all coupons, ordered
    pub fn coupon_codes(&self) -> Vec<CouponCode> {
        self.coupons()
            .into_iter()
            .map(|coupon| coupon.code.clone())
            .collect()
    }

    /// Get all cart lines
    pub fn items(&self) -> &[CartItem<'a>] {
        &self.items
    }

    /// Create a cart from the loaded lines
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded or if cart creation fails.
    pub fn cart(&self) -> Result<Cart<'a>, FixtureError> {
        let currency = self.currency()?;

        Ok(Cart::with_items(self.items.clone(), currency)?)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no priced products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture<'static> {
    fn default() -> Self {
        Self::new()
    }
}
