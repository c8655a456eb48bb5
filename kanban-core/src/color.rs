/// Random pastel card colors.
///
/// Hue is drawn uniformly; saturation and lightness are fixed so every card
/// stays readable with dark text.
use rand::Rng;

const SATURATION: u8 = 70;
const LIGHTNESS: u8 = 85;

/// A fresh random pastel color as a CSS `hsl()` value.
pub fn random_color() -> String {
    hsl(rand::rng().random_range(0..360))
}

/// The pastel color for a given hue (degrees, wrapped to `0..360`).
pub fn hsl(hue: u16) -> String {
    format!("hsl({} {}% {}%)", hue % 360, SATURATION, LIGHTNESS)
}
