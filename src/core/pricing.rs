//! Price calculation for custom prints.
//!
//! The formula is shared with the storefront quote widget, so it must stay
//! bit-for-bit identical: floating point throughout, no rounding of
//! intermediate values. Rounding only happens when amounts are formatted.

use crate::{
    core::{
        catalog::{
            self, DEFAULT_DENSITY, GRAMS_PER_HOUR, LABOR_RATE_PER_HOUR, MAX_QUANTITY,
            MIN_ORDER_VALUE, SETUP_FEE, SETUP_FEE_WAIVER_THRESHOLD,
        },
        mesh::{Dimensions, ModelInfo},
    },
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};

/// Print settings chosen by the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintConfig {
    /// Material id from the catalog
    pub material: String,
    /// Quality tier id from the catalog
    pub quality: String,
    /// Infill percentage, 0-100
    pub infill: f64,
    /// Uniform scale multiplier applied to the model
    pub scale: f64,
    /// Number of copies
    pub quantity: i32,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            material: "pla".to_string(),
            quality: "standard".to_string(),
            infill: 20.0,
            scale: 1.0,
            quantity: 1,
        }
    }
}

/// Result of a price calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Weight after scale and infill, in grams
    pub scaled_weight: f64,
    pub material_cost: f64,
    pub labor_cost: f64,
    pub setup_fee: f64,
    /// Price of a single copy
    pub unit_price: f64,
    /// Price of all copies, floored at the minimum order value
    pub total_price: f64,
    /// Printer time for a single copy, in hours
    pub estimated_hours: f64,
}

/// A price breakdown together with the geometry it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Model extents after scaling, in millimetres
    pub dimensions: Dimensions,
    /// Model volume before scaling, in cm³
    pub volume: f64,
    /// Estimated weight before scale and infill, in grams
    pub base_weight: f64,
    pub breakdown: PriceBreakdown,
    pub config: PrintConfig,
}

/// Computes the price for a print.
///
/// `base_weight` is the solid weight of the unscaled model in grams.
///
/// # Errors
/// Returns [`Error::Validation`] when the material or quality id is unknown.
pub fn calculate_price(
    base_weight: f64,
    material_id: &str,
    quality_id: &str,
    infill: f64,
    scale: f64,
    quantity: i32,
) -> Result<PriceBreakdown> {
    let material = catalog::find_material(material_id)
        .ok_or_else(|| Error::validation(format!("Unknown material '{material_id}'")))?;
    let quality = catalog::find_quality(quality_id)
        .ok_or_else(|| Error::validation(format!("Unknown quality '{quality_id}'")))?;

    let infill_multiplier = 0.3 + (infill / 100.0) * 0.7;
    let scaled_weight = base_weight * scale.powi(3) * infill_multiplier;
    let material_cost = scaled_weight * material.price_per_gram;

    let base_time_hours = scaled_weight / GRAMS_PER_HOUR;
    let adjusted_time_hours = base_time_hours * quality.time_multiplier;
    let labor_cost = adjusted_time_hours * LABOR_RATE_PER_HOUR;

    let setup_fee = if material_cost + labor_cost > SETUP_FEE_WAIVER_THRESHOLD {
        0.0
    } else {
        SETUP_FEE
    };

    let unit_price = material_cost + labor_cost + setup_fee;
    let total_price = (unit_price * f64::from(quantity)).max(MIN_ORDER_VALUE);

    Ok(PriceBreakdown {
        scaled_weight,
        material_cost,
        labor_cost,
        setup_fee,
        unit_price,
        total_price,
        estimated_hours: adjusted_time_hours,
    })
}

/// Validates the parts of a configuration the formula itself does not constrain.
///
/// Infill outside the presets is accepted, as is any positive scale.
///
/// # Errors
/// Returns [`Error::Validation`] for non-finite inputs, infill outside 0-100,
/// non-positive scale or a quantity outside `1..=MAX_QUANTITY`.
pub fn validate_config(config: &PrintConfig) -> Result<()> {
    if !config.infill.is_finite() || !(0.0..=100.0).contains(&config.infill) {
        return Err(Error::validation("Infill must be between 0 and 100"));
    }
    if !config.scale.is_finite() || config.scale <= 0.0 {
        return Err(Error::validation("Scale must be a positive number"));
    }
    if !(1..=MAX_QUANTITY).contains(&config.quantity) {
        return Err(Error::validation(format!(
            "Quantity must be between 1 and {MAX_QUANTITY}"
        )));
    }
    Ok(())
}

/// Turns an inspected model and print settings into a quote.
///
/// # Errors
/// Returns [`Error::Validation`] for an invalid configuration or unknown catalog ids.
pub fn quote(model: &ModelInfo, config: &PrintConfig) -> Result<Quote> {
    validate_config(config)?;

    let base_weight = model.volume * DEFAULT_DENSITY;
    let breakdown = calculate_price(
        base_weight,
        &config.material,
        &config.quality,
        config.infill,
        config.scale,
        config.quantity,
    )?;

    Ok(Quote {
        dimensions: model.dimensions.scaled(config.scale),
        volume: model.volume,
        base_weight,
        breakdown,
        config: config.clone(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_small_pla_print_hits_minimum_order_value() {
        let price = calculate_price(10.0, "pla", "standard", 20.0, 1.0, 1).unwrap();

        assert!(close(price.scaled_weight, 4.4));
        assert!(close(price.material_cost, 15.4));
        assert!(close(price.estimated_hours, 0.22));
        assert!(close(price.labor_cost, 33.0));
        assert_eq!(price.setup_fee, SETUP_FEE);
        assert!(close(price.unit_price, 98.4));
        assert_eq!(price.total_price, 199.0);
    }

    #[test]
    fn test_quantity_ten_exceeds_minimum() {
        let price = calculate_price(10.0, "pla", "standard", 20.0, 1.0, 10).unwrap();

        assert!(close(price.unit_price, 98.4));
        assert!(close(price.total_price, 984.0));
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let a = calculate_price(37.3, "petg", "high", 35.0, 1.7, 3).unwrap();
        let b = calculate_price(37.3, "petg", "high", 35.0, 1.7, 3).unwrap();
        assert_eq!(a.total_price.to_bits(), b.total_price.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn test_setup_fee_waived_above_threshold() {
        // 200g solid PLA at 100% infill: 700 material + 1500 labor
        let price = calculate_price(200.0, "pla", "standard", 100.0, 1.0, 1).unwrap();
        assert!(price.material_cost + price.labor_cost > SETUP_FEE_WAIVER_THRESHOLD);
        assert_eq!(price.setup_fee, 0.0);
    }

    #[test]
    fn test_setup_fee_charged_at_threshold() {
        let price = calculate_price(0.0, "pla", "standard", 20.0, 1.0, 1).unwrap();
        assert_eq!(price.setup_fee, SETUP_FEE);
        assert_eq!(price.unit_price, SETUP_FEE);
    }

    #[test]
    fn test_total_never_below_minimum() {
        for weight in [0.0, 0.5, 3.0, 12.0] {
            for quantity in [1, 2, 100] {
                let price = calculate_price(weight, "pla", "draft", 10.0, 0.5, quantity).unwrap();
                assert!(price.total_price >= MIN_ORDER_VALUE);
            }
        }
    }

    #[test]
    fn test_scale_grows_weight_cubically() {
        let base = calculate_price(10.0, "pla", "standard", 20.0, 1.0, 1).unwrap();
        let tripled = calculate_price(10.0, "pla", "standard", 20.0, 3.0, 1).unwrap();
        assert!(close(tripled.scaled_weight, base.scaled_weight * 27.0));
    }

    #[test]
    fn test_unknown_material_is_rejected() {
        let result = calculate_price(10.0, "wood", "standard", 20.0, 1.0, 1);
        assert!(matches!(result, Err(Error::Validation { .. })));
        let result = calculate_price(10.0, "pla", "blurry", 20.0, 1.0, 1);
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_validate_config_bounds() {
        assert!(validate_config(&PrintConfig::default()).is_ok());

        let odd_infill = PrintConfig {
            infill: 33.0,
            ..PrintConfig::default()
        };
        assert!(validate_config(&odd_infill).is_ok());

        for bad in [
            PrintConfig { quantity: 0, ..PrintConfig::default() },
            PrintConfig { quantity: 101, ..PrintConfig::default() },
            PrintConfig { scale: 0.0, ..PrintConfig::default() },
            PrintConfig { infill: 120.0, ..PrintConfig::default() },
            PrintConfig { infill: f64::NAN, ..PrintConfig::default() },
        ] {
            assert!(validate_config(&bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_quote_uses_density_and_scales_dimensions() {
        let model = ModelInfo::placeholder(&crate::core::mesh::BoundingBoxHeuristic);
        let config = PrintConfig {
            scale: 2.0,
            ..PrintConfig::default()
        };
        let quote = quote(&model, &config).unwrap();

        assert!(close(quote.base_weight, 50.0 * DEFAULT_DENSITY));
        assert_eq!(quote.dimensions.x, 100.0);
        let expected = calculate_price(quote.base_weight, "pla", "standard", 20.0, 2.0, 1).unwrap();
        assert_eq!(quote.breakdown, expected);
    }
}
