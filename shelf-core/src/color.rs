//! RGB(A) colors with channels in `[0, 1]`, stored as hex strings.

use std::fmt;

/// One 8-bit step of a channel.
pub const CHANNEL_EPSILON: f32 = 1.0 / 255.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// `None` for a 3-channel color.
    pub a: Option<f32>,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: None }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Build from 3 or 4 channels. Any other length is rejected.
    pub fn from_channels(channels: &[f32]) -> Option<Self> {
        match *channels {
            [r, g, b] => Some(Self::rgb(r, g, b)),
            [r, g, b, a] => Some(Self::rgba(r, g, b, a)),
            _ => None,
        }
    }

    pub fn channels(&self) -> Vec<f32> {
        let mut out = vec![self.r, self.g, self.b];
        out.extend(self.a);
        out
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when an alpha channel is present.
    pub fn to_hex(&self) -> String {
        let mut hex = String::with_capacity(9);
        hex.push('#');
        for channel in self.channels() {
            hex.push_str(&format!("{:02X}", to_byte(channel)));
        }
        hex
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (either case).
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if !(digits.len() == 6 || digits.len() == 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return None;
        }
        let channels: Vec<f32> = (0..digits.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).map(|b| b as f32 / 255.0))
            .collect::<Result<_, _>>()
            .ok()?;
        Self::from_channels(&channels)
    }

    /// Equal within one 8-bit step per channel, with matching channel count.
    pub fn approx_eq(&self, other: &Color) -> bool {
        let (lhs, rhs) = (self.channels(), other.channels());
        lhs.len() == rhs.len()
            && lhs
                .iter()
                .zip(&rhs)
                .all(|(a, b)| (a - b).abs() <= CHANNEL_EPSILON + f32::EPSILON)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_rounds_to_nearest_step() {
        assert_eq!(Color::rgb(0.1, 0.69, 0.95).to_hex(), "#1AB0F2");
        assert_eq!(Color::rgba(1.0, 0.0, 0.0, 0.5).to_hex(), "#FF000080");
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        assert_eq!(Color::rgb(-1.0, 2.0, 0.0).to_hex(), "#00FF00");
    }

    #[test]
    fn parse_accepts_both_lengths_and_cases() {
        let c = Color::from_hex("#ff8000").unwrap();
        assert!(c.a.is_none());
        assert!(c.approx_eq(&Color::rgb(1.0, 0.5, 0.0)));

        let c = Color::from_hex("#696969FF").unwrap();
        assert_eq!(c.a, Some(1.0));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Color::from_hex("696969").is_none());
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#GGGGGG").is_none());
        assert!(Color::from_hex("#1234567890").is_none());
        assert!(Color::from_hex("").is_none());
    }

    #[test]
    fn approx_eq_requires_same_channel_count() {
        assert!(!Color::rgb(0.0, 0.0, 0.0).approx_eq(&Color::rgba(0.0, 0.0, 0.0, 1.0)));
    }
}
