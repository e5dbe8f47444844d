//! Hex color parsing.

use crate::Config;
use crate::error::ConfigError;

/// Parses `#rrggbb` (the `#` is optional) into linear RGB.
pub fn parse_hex_color(s: &str) -> Result<[f32; 3], ConfigError> {
    let invalid = || ConfigError::InvalidColor(s.to_string());
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let mut rgb = [0.0; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let pair = &hex[i * 2..i * 2 + 2];
        let byte = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        *channel = srgb_to_linear(byte as f32 / 255.0);
    }
    Ok(rgb)
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Decoded branch and leaf colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub base: [f32; 3],
    pub tip: [f32; 3],
    pub leaf: [f32; 3],
}

impl Config {
    /// Decodes the configured colors.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        Ok(Palette {
            base: parse_hex_color(&self.render.base_color)?,
            tip: parse_hex_color(&self.render.tip_color)?,
            leaf: parse_hex_color(&self.render.leaf_color)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_and_white() {
        assert_eq!(parse_hex_color("#000000").unwrap(), [0.0; 3]);
        let white = parse_hex_color("#ffffff").unwrap();
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_srgb_midpoint_is_darker_in_linear() {
        let [r, g, b] = parse_hex_color("808080").unwrap();
        assert!((r - 0.2158).abs() < 1e-3);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            parse_hex_color("#22C55E").unwrap(),
            parse_hex_color("#22c55e").unwrap()
        );
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "#fff", "#1234567", "#gg0000", "#+f+f+f", "#ééé"] {
            assert!(
                matches!(parse_hex_color(bad), Err(ConfigError::InvalidColor(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_default_palette_parses() {
        assert!(Config::default().palette().is_ok());
    }

    #[test]
    fn test_palette_reports_bad_color() {
        let mut config = Config::default();
        config.render.tip_color = "green".to_string();
        assert!(config.palette().is_err());
    }
}
