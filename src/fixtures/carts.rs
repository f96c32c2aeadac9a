//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for cart lines in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart lines, in order
    pub items: Vec<CartLineFixture>,
}

/// Cart line fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product key
    pub product: String,

    /// Variant key, for variant lines
    #[serde(default)]
    pub variant: Option<String>,

    /// Units of the product
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn cart_fixture_defaults_quantity_to_one() -> TestResult {
        let yaml = r"
items:
  - product: tee
    variant: tee-m-white
    quantity: 3
  - product: mug
";
        let fixture: CartFixture = serde_norway::from_str(yaml)?;

        let lines: Vec<(&str, Option<&str>, u32)> = fixture
            .items
            .iter()
            .map(|line| (line.product.as_str(), line.variant.as_deref(), line.quantity))
            .collect();

        assert_eq!(
            lines,
            vec![("tee", Some("tee-m-white"), 3), ("mug", None, 1)]
        );

        Ok(())
    }
}
