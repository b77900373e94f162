use super::feature::FeatureSnapshot;

pub const PRICE: &str = "price";
pub const CLOSE: &str = "close";
pub const VOLATILITY: &str = "volatility";
pub const VOLUME: &str = "volume";
pub const PRICE_CHANGE: &str = "price_change";
pub const MARKET_CAP: &str = "market_cap";

/// Names that can anchor a prediction, in lookup order.
pub const BASE_VALUE_FEATURES: &[&str] = &[PRICE, CLOSE];

/// Resolves the base value of a prediction: `price` wins over `close`.
pub fn base_value(snapshot: &FeatureSnapshot) -> Option<f64> {
    BASE_VALUE_FEATURES
        .iter()
        .find_map(|name| snapshot.get(*name).copied())
}

/// Number of `required` names present in `snapshot`.
pub fn present_count(required: &[String], snapshot: &FeatureSnapshot) -> usize {
    required
        .iter()
        .filter(|name| snapshot.contains_key(name.as_str()))
        .count()
}

/// Fraction of `required` present in `snapshot`, in [0, 1].
/// Extra snapshot entries do not count towards completeness.
pub fn completeness(required: &[String], snapshot: &FeatureSnapshot) -> f64 {
    if required.is_empty() {
        return 0.0;
    }
    present_count(required, snapshot) as f64 / required.len() as f64
}
