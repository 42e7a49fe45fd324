/// Straight-alpha RGBA color, each channel in `[0, 1]`.
///
/// Plain value type. Equality is exact per-channel comparison, which is what the
/// quad renderer relies on to detect the unset tint ([`Color::UNSET`]).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// All-zero color. As a tint it means "not set" and resolves to [`Color::WHITE`].
    pub const UNSET: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0, 1.0);
    pub const CYAN: Color = Color::new(0.0, 1.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0, 1.0);
    pub const GRAY: Color = Color::new(0.5, 0.5, 0.5, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Creates a color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    #[inline]
    pub fn is_unset(self) -> bool {
        self == Self::UNSET
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// CSS `rgba()` string for canvas fill/stroke styles.
    ///
    /// RGB channels are clamped and rounded to `0..=255`; alpha keeps two decimals.
    pub fn to_css_rgba(self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {:.2})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0),
        )
    }
}

impl From<Color> for [f32; 4] {
    #[inline]
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unset() {
        assert!(Color::default().is_unset());
        assert!(!Color::BLACK.is_unset());
    }

    #[test]
    fn transparent_non_black_is_not_unset() {
        assert!(!Color::new(1.0, 0.0, 0.0, 0.0).is_unset());
    }

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(0.2, 0.4, 0.6).a, 1.0);
    }

    #[test]
    fn css_rgba_formatting() {
        assert_eq!(Color::RED.to_css_rgba(), "rgba(255, 0, 0, 1.00)");
        assert_eq!(Color::new(0.5, 0.5, 0.5, 0.25).to_css_rgba(), "rgba(128, 128, 128, 0.25)");
    }

    #[test]
    fn css_rgba_rounds_to_nearest() {
        assert_eq!(Color::GRAY.to_css_rgba(), "rgba(128, 128, 128, 1.00)");
        assert_eq!(Color::new(0.499, 0.001, 0.998, 1.0).to_css_rgba(), "rgba(127, 0, 254, 1.00)");
    }

    #[test]
    fn css_rgba_clamps_out_of_range() {
        assert_eq!(Color::new(2.0, -1.0, 0.0, 3.0).to_css_rgba(), "rgba(255, 0, 0, 1.00)");
    }

    #[test]
    fn from_u8_maps_full_range() {
        let c = Color::from_u8(255, 0, 255, 255);
        assert_eq!(c, Color::MAGENTA);
    }
}
