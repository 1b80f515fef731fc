//! Color definitions for charts

/// Common colors
pub(super) const COLOR_BACKGROUND: &str = "#0A0A0C"; // Near black
pub(super) const COLOR_TEXT: &str = "#FFFFFF"; // White
pub(super) const COLOR_SUBTEXT: &str = "#A0A0A0"; // Grey
pub(super) const COLOR_GRID: &str = "#505050"; // Grid lines

/// Score bands
pub(super) const COLOR_FAVORABLE: &str = "#2ECC71"; // Green, score >= 70
pub(super) const COLOR_UNFAVORABLE: &str = "#E74C3C"; // Red, score < 40

/// Core (annual-conflict) marker
pub(super) const COLOR_CORE_FILL: &str = "#8B0000"; // Dark red
pub(super) const COLOR_CORE_HALO: &str = "rgba(255, 0, 0, 0.8)";

/// `#RRGGBB` to a css `rgba()` string. Malformed input is returned unchanged.
pub(super) fn rgba(hex: &str, alpha: f64) -> String {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (hex.len(), channel(1..3), channel(3..5), channel(5..7)) {
        (7, Some(r), Some(g), Some(b)) if hex.starts_with('#') => {
            format!("rgba({}, {}, {}, {})", r, g, b, alpha)
        }
        _ => hex.to_string(),
    }
}
