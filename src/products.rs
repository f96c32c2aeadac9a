//! Products

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::ids::Id;

/// Product identifier
pub type ProductId = Id<Product<'static>>;

/// Product variant identifier
pub type VariantId = Id<ProductVariant<'static>>;

/// Category identifier
pub type CategoryId = Id<Category>;

/// Marker for category identifiers.
///
/// Categories are owned by the catalog; the coupon engine only ever needs
/// their ids.
#[derive(Debug)]
pub enum Category {}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Category the product is listed under, if any
    pub category_id: Option<CategoryId>,

    /// Base (list) price
    pub base_price: Option<Money<'a, Currency>>,

    /// Sale price, when the product is on sale
    pub sale_price: Option<Money<'a, Currency>>,
}

impl<'a> Product<'a> {
    /// Create a product with a base price and no category.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        base_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_id: None,
            base_price: Some(base_price),
            sale_price: None,
        }
    }

    /// Set the category.
    #[must_use]
    pub fn in_category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Set the sale price.
    #[must_use]
    pub fn on_sale(mut self, sale_price: Money<'a, Currency>) -> Self {
        self.sale_price = Some(sale_price);
        self
    }

    /// Whether the product is listed under the given category.
    pub fn is_in_category(&self, category_id: &CategoryId) -> bool {
        self.category_id.as_ref() == Some(category_id)
    }
}

/// A purchasable variant of a product (size, colour, material...).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariant<'a> {
    /// Variant id
    pub id: VariantId,

    /// Stock keeping unit
    pub sku: Option<String>,

    /// Variant price, overriding the product prices
    pub price: Option<Money<'a, Currency>>,

    /// Variant sale price
    pub sale_price: Option<Money<'a, Currency>>,

    /// Units in stock
    pub stock: u32,

    /// Size
    pub size: Option<String>,

    /// Colour
    pub color: Option<String>,

    /// Material
    pub material: Option<String>,
}

impl<'a> ProductVariant<'a> {
    /// Create a variant with no price override.
    pub fn new(id: impl Into<VariantId>, stock: u32) -> Self {
        Self {
            id: id.into(),
            sku: None,
            price: None,
            sale_price: None,
            stock,
            size: None,
            color: None,
            material: None,
        }
    }

    /// Set the variant price.
    #[must_use]
    pub fn priced(mut self, price: Money<'a, Currency>) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the variant sale price.
    #[must_use]
    pub fn on_sale(mut self, sale_price: Money<'a, Currency>) -> Self {
        self.sale_price = Some(sale_price);
        self
    }

    /// Human readable label built from size, colour and material, e.g. `M / White`.
    pub fn label(&self) -> String {
        let parts: SmallVec<[&str; 3]> = [&self.size, &self.color, &self.material]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect();

        if parts.is_empty() {
            self.sku.clone().unwrap_or_else(|| self.id.to_string())
        } else {
            parts.join(" / ")
        }
    }
}
