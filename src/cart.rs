//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    items::CartItem,
    pricing::{TotalPriceError, total_price},
    products::{ProductId, VariantId},
};

/// Errors related to cart construction or updates.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A line's price currency differs from the cart currency (index, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line carries a negative price (index).
    #[error("Item {0} has a negative price")]
    NegativePrice(usize),

    /// A line was added with a zero quantity.
    #[error("Item {0} has a quantity of zero")]
    ZeroQuantity(usize),

    /// More units of a variant were requested than are in stock.
    #[error("Only {available} of {variant} in stock, {requested} requested")]
    InsufficientStock {
        /// Variant that ran out
        variant: VariantId,

        /// Units in stock
        available: u32,

        /// Units requested
        requested: u32,
    },

    /// No line exists for the product / variant pair.
    #[error("Product {0} is not in the cart")]
    ItemNotFound(ProductId),

    /// Merging quantities overflowed.
    #[error("Quantity overflowed")]
    QuantityOverflow,
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: Vec<CartItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new, empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given lines.
    ///
    /// Lines are taken as given; lines for the same product / variant are not merged.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if a line has a currency mismatch, a negative
    /// price, a zero quantity or more units than its variant has in stock.
    pub fn with_items(
        items: impl Into<Vec<CartItem<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| validate_item(i, item, currency))?;

        Ok(Cart { items, currency })
    }

    /// Add a line to the cart, merging it into an existing line for the same
    /// product / variant.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the line is invalid or the merged quantity
    /// exceeds the variant's stock.
    pub fn add_item(&mut self, item: CartItem<'a>) -> Result<(), CartError> {
        let currency = self.currency;

        if let Some((idx, line)) = self
            .items
            .iter_mut()
            .enumerate()
            .find(|(_, line)| line.is_line_for(item.product_id(), item.variant_id()))
        {
            let quantity = line
                .quantity()
                .checked_add(item.quantity())
                .ok_or(CartError::QuantityOverflow)?;

            validate_item(idx, &line.with_quantity(quantity), currency)?;

            line.set_quantity(quantity);

            return Ok(());
        }

        validate_item(self.items.len(), &item, currency)?;

        self.items.push(item);

        Ok(())
    }

    /// Set the quantity of a line. A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no such line, or
    /// [`CartError::InsufficientStock`] if the variant cannot cover the quantity.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_item(product_id, variant_id).map(|_| ());
        }

        let currency = self.currency;

        let (idx, line) = self
            .items
            .iter_mut()
            .enumerate()
            .find(|(_, line)| line.is_line_for(product_id, variant_id))
            .ok_or_else(|| CartError::ItemNotFound(product_id.clone()))?;

        validate_item(idx, &line.with_quantity(quantity), currency)?;

        line.set_quantity(quantity);

        Ok(())
    }

    /// Remove a line from the cart, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if there is no such line.
    pub fn remove_item(
        &mut self,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
    ) -> Result<CartItem<'a>, CartError> {
        let idx = self
            .items
            .iter()
            .position(|line| line.is_line_for(product_id, variant_id))
            .ok_or_else(|| CartError::ItemNotFound(product_id.clone()))?;

        Ok(self.items.remove(idx))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if there was a money arithmetic or overflow error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        total_price(&self.items, self.currency)
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem<'a>> {
        self.items.iter()
    }

    /// The lines in the cart.
    pub fn items(&self) -> &[CartItem<'a>] {
        &self.items
    }

    /// Get a line by its index.
    pub fn get(&self, idx: usize) -> Option<&CartItem<'a>> {
        self.items.get(idx)
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

fn validate_item(
    idx: usize,
    item: &CartItem<'_>,
    currency: &'static Currency,
) -> Result<(), CartError> {
    if item.quantity() == 0 {
        return Err(CartError::ZeroQuantity(idx));
    }

    if let Some(price) = item.prices().find(|price| price.currency() != currency) {
        return Err(CartError::CurrencyMismatch(
            idx,
            price.currency().iso_alpha_code,
            currency.iso_alpha_code,
        ));
    }

    if item.prices().any(Money::is_negative) {
        return Err(CartError::NegativePrice(idx));
    }

    if let Some(variant) = item
        .variant()
        .filter(|variant| item.quantity() > variant.stock)
    {
        return Err(CartError::InsufficientStock {
            variant: variant.id.clone(),
            available: variant.stock,
            requested: item.quantity(),
        });
    }

    Ok(())
}
