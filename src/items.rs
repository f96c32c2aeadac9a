//! Cart Items

use rusty_money::{Money, iso::Currency};

use crate::products::{Product, ProductId, ProductVariant, VariantId};

/// A line in a cart: a product, optionally one of its variants, and a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    product: Product<'a>,
    variant: Option<ProductVariant<'a>>,
    quantity: u32,
}

impl<'a> CartItem<'a> {
    /// Creates a line for a product without a variant.
    pub fn new(product: Product<'a>, quantity: u32) -> Self {
        Self {
            product,
            variant: None,
            quantity,
        }
    }

    /// Creates a line for a specific product variant.
    pub fn with_variant(product: Product<'a>, variant: ProductVariant<'a>, quantity: u32) -> Self {
        Self {
            product,
            variant: Some(variant),
            quantity,
        }
    }

    /// Returns the product
    pub fn product(&self) -> &Product<'a> {
        &self.product
    }

    /// Returns the variant, if the line is for a specific variant
    pub fn variant(&self) -> Option<&ProductVariant<'a>> {
        self.variant.as_ref()
    }

    /// Returns the product id
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Returns the variant id, if any
    pub fn variant_id(&self) -> Option<&VariantId> {
        self.variant.as_ref().map(|variant| &variant.id)
    }

    /// Returns the quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns a copy of this line carrying a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Whether this line is for the given product / variant pair.
    pub fn is_line_for(&self, product_id: &ProductId, variant_id: Option<&VariantId>) -> bool {
        self.product_id() == product_id && self.variant_id() == variant_id
    }

    /// Effective unit price of the line.
    ///
    /// Variant sale price, then variant price, then product sale price, then
    /// product base price. `None` when nothing is priced, which callers treat
    /// as zero.
    pub fn unit_price(&self) -> Option<Money<'a, Currency>> {
        self.variant
            .as_ref()
            .and_then(|variant| variant.sale_price.or(variant.price))
            .or(self.product.sale_price)
            .or(self.product.base_price)
    }

    /// Effective unit price in minor units, zero when unpriced.
    pub fn unit_price_minor(&self) -> i64 {
        self.unit_price().map_or(0, |price| price.to_minor_units())
    }

    /// Every price set on the line, used for currency validation.
    pub(crate) fn prices(&self) -> impl Iterator<Item = &Money<'a, Currency>> {
        let variant_prices = self
            .variant
            .iter()
            .flat_map(|variant| variant.sale_price.iter().chain(variant.price.iter()));

        variant_prices
            .chain(self.product.sale_price.iter())
            .chain(self.product.base_price.iter())
    }
}
