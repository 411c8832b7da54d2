//! Material and quality catalog.
//!
//! Static reference data used by the pricing calculator and surfaced by the
//! `/materials` endpoint. Orders only store the chosen identifiers.

use serde::Serialize;

/// Labor charged per hour of printer time, in rupees
pub const LABOR_RATE_PER_HOUR: f64 = 150.0;
/// Flat setup fee for small jobs, in rupees
pub const SETUP_FEE: f64 = 50.0;
/// Material plus labor above which the setup fee is waived
pub const SETUP_FEE_WAIVER_THRESHOLD: f64 = 500.0;
/// Floor applied to every order total, in rupees
pub const MIN_ORDER_VALUE: f64 = 199.0;
/// Largest quantity accepted for a single print line
pub const MAX_QUANTITY: i32 = 100;
/// Grams extruded per printer hour
pub const GRAMS_PER_HOUR: f64 = 20.0;
/// Density assumed when turning a volume into a weight, in g/cm³
pub const DEFAULT_DENSITY: f64 = 1.24;
/// Infill percentages offered by the storefront
pub const INFILL_PRESETS: [u8; 5] = [10, 20, 50, 80, 100];
/// Currency symbol used for display
pub const CURRENCY_SYMBOL: &str = "₹";

/// Inclusive temperature range in °C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemperatureRange {
    /// Lower bound
    pub min: u16,
    /// Upper bound
    pub max: u16,
}

/// A color offered for a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaterialColor {
    /// Display name
    pub name: &'static str,
    /// Hex swatch
    pub hex: &'static str,
    /// Whether the spool is in stock
    pub available: bool,
}

/// Printable material
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Material {
    /// Identifier stored on orders
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price_per_gram: f64,
    /// 1-5 scores
    pub strength: u8,
    pub flexibility: u8,
    pub durability: u8,
    pub ease_of_print: u8,
    pub nozzle_temp: TemperatureRange,
    pub bed_temp: TemperatureRange,
    pub colors: &'static [MaterialColor],
}

/// Print quality tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quality {
    pub id: &'static str,
    pub name: &'static str,
    /// Layer height in millimetres
    pub layer_height: f64,
    /// Factor applied to the base print time
    pub time_multiplier: f64,
    pub description: &'static str,
}

const BASIC_COLORS: &[MaterialColor] = &[
    MaterialColor { name: "White", hex: "#FFFFFF", available: true },
    MaterialColor { name: "Black", hex: "#000000", available: true },
    MaterialColor { name: "Red", hex: "#E53935", available: true },
    MaterialColor { name: "Blue", hex: "#1E88E5", available: true },
    MaterialColor { name: "Green", hex: "#43A047", available: true },
    MaterialColor { name: "Yellow", hex: "#FDD835", available: false },
];

const ENGINEERING_COLORS: &[MaterialColor] = &[
    MaterialColor { name: "Black", hex: "#000000", available: true },
    MaterialColor { name: "Grey", hex: "#757575", available: true },
    MaterialColor { name: "Natural", hex: "#F5F0E1", available: false },
];

const FLEX_COLORS: &[MaterialColor] = &[
    MaterialColor { name: "Black", hex: "#000000", available: true },
    MaterialColor { name: "Clear", hex: "#E0F7FA", available: true },
];

/// Every material the print farm stocks
pub const MATERIALS: &[Material] = &[
    Material {
        id: "pla",
        name: "PLA",
        description: "Easy-printing biodegradable plastic for prototypes and decor",
        price_per_gram: 3.5,
        strength: 3,
        flexibility: 2,
        durability: 3,
        ease_of_print: 5,
        nozzle_temp: TemperatureRange { min: 190, max: 220 },
        bed_temp: TemperatureRange { min: 50, max: 60 },
        colors: BASIC_COLORS,
    },
    Material {
        id: "petg",
        name: "PETG",
        description: "Tough, food-safe and moisture resistant",
        price_per_gram: 4.5,
        strength: 4,
        flexibility: 3,
        durability: 4,
        ease_of_print: 4,
        nozzle_temp: TemperatureRange { min: 230, max: 250 },
        bed_temp: TemperatureRange { min: 70, max: 80 },
        colors: BASIC_COLORS,
    },
    Material {
        id: "abs",
        name: "ABS",
        description: "Heat resistant engineering plastic for functional parts",
        price_per_gram: 4.0,
        strength: 4,
        flexibility: 3,
        durability: 4,
        ease_of_print: 2,
        nozzle_temp: TemperatureRange { min: 230, max: 260 },
        bed_temp: TemperatureRange { min: 95, max: 110 },
        colors: ENGINEERING_COLORS,
    },
    Material {
        id: "tpu",
        name: "TPU",
        description: "Flexible rubber-like filament for grips, seals and cases",
        price_per_gram: 6.0,
        strength: 3,
        flexibility: 5,
        durability: 5,
        ease_of_print: 2,
        nozzle_temp: TemperatureRange { min: 210, max: 230 },
        bed_temp: TemperatureRange { min: 40, max: 60 },
        colors: FLEX_COLORS,
    },
    Material {
        id: "nylon",
        name: "Nylon",
        description: "High strength and wear resistance for gears and hinges",
        price_per_gram: 8.0,
        strength: 5,
        flexibility: 4,
        durability: 5,
        ease_of_print: 1,
        nozzle_temp: TemperatureRange { min: 240, max: 270 },
        bed_temp: TemperatureRange { min: 70, max: 90 },
        colors: ENGINEERING_COLORS,
    },
];

/// Quality tiers, fastest first
pub const QUALITIES: &[Quality] = &[
    Quality {
        id: "draft",
        name: "Draft",
        layer_height: 0.3,
        time_multiplier: 0.7,
        description: "Visible layers, fastest turnaround",
    },
    Quality {
        id: "standard",
        name: "Standard",
        layer_height: 0.2,
        time_multiplier: 1.0,
        description: "Balanced finish for most parts",
    },
    Quality {
        id: "high",
        name: "High",
        layer_height: 0.12,
        time_multiplier: 1.5,
        description: "Fine detail for display pieces",
    },
    Quality {
        id: "ultra",
        name: "Ultra",
        layer_height: 0.08,
        time_multiplier: 2.2,
        description: "Miniatures and smooth curved surfaces",
    },
];

/// Looks up a material by id (case-insensitive).
#[must_use]
pub fn find_material(id: &str) -> Option<&'static Material> {
    MATERIALS.iter().find(|m| m.id.eq_ignore_ascii_case(id.trim()))
}

/// Looks up a quality tier by id (case-insensitive).
#[must_use]
pub fn find_quality(id: &str) -> Option<&'static Quality> {
    QUALITIES.iter().find(|q| q.id.eq_ignore_ascii_case(id.trim()))
}

impl Material {
    /// Colors currently in stock
    pub fn available_colors(&self) -> impl Iterator<Item = &'static MaterialColor> {
        self.colors.iter().filter(|c| c.available)
    }
}

/// Formats an amount in rupees with two decimals, e.g. `₹199.00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{amount:.2}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_find_material_is_case_insensitive() {
        let pla = find_material("PLA").unwrap();
        assert_eq!(pla.id, "pla");
        assert_eq!(pla.price_per_gram, 3.5);
        assert!(find_material("unobtainium").is_none());
    }

    #[test]
    fn test_standard_quality_has_unit_multiplier() {
        let standard = find_quality("standard").unwrap();
        assert_eq!(standard.time_multiplier, 1.0);
    }

    #[test]
    fn test_material_scores_are_in_range() {
        for m in MATERIALS {
            for score in [m.strength, m.flexibility, m.durability, m.ease_of_print] {
                assert!((1..=5).contains(&score), "{} has score {score}", m.id);
            }
            assert!(m.nozzle_temp.min <= m.nozzle_temp.max);
            assert!(m.bed_temp.min <= m.bed_temp.max);
        }
    }

    #[test]
    fn test_available_colors_skips_out_of_stock() {
        let pla = find_material("pla").unwrap();
        assert!(pla.available_colors().all(|c| c.available));
        assert!(pla.available_colors().count() < pla.colors.len());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(199.0), "₹199.00");
        assert_eq!(format_currency(98.4), "₹98.40");
    }
}
