//! HSB colour values and the partition palettes.
//!
//! Sketch state keeps colours as [`Hsb`] with every channel in [0, 1];
//! conversion to RGB happens only when rasterising.

use rand::Rng;

/// Seven-colour palettes the partition sketch picks from on each reset
pub const PARTITION_PALETTES: [[&str; 7]; 5] = [
    ["#4f501e", "#507c37", "#329888", "#40a6e0", "#c697f7", "#fbaca8", "#e5de41"],
    ["#205750", "#277a85", "#3d88d8", "#bd77ee", "#f88c91", "#e4c237", "#52f5d9"],
    ["#244e80", "#5d5bce", "#bf4eca", "#ee6d6e", "#d3ab31", "#44e3ae", "#bcdbfd"],
    ["#702d72", "#b33679", "#d25d3d", "#b5992d", "#45cc94", "#89cdfb", "#f2c6f7"],
    ["#773823", "#975f24", "#8c8b2c", "#3eb38a", "#56bcf0", "#dab0f9", "#fdcabd"],
];

/// Hue, saturation, brightness, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub h: f32,
    pub s: f32,
    pub b: f32,
}

impl Hsb {
    pub fn new(h: f32, s: f32, b: f32) -> Self {
        Self {
            h: h.clamp(0.0, 1.0),
            s: s.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::from_rgb([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            ((g - b) / delta).rem_euclid(6.0) / 6.0
        } else if max == g {
            ((b - r) / delta + 2.0) / 6.0
        } else {
            ((r - g) / delta + 4.0) / 6.0
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };

        Self::new(h, s, max)
    }

    pub fn to_rgb(self) -> [u8; 3] {
        let h = (self.h - self.h.floor()) * 6.0;
        let i = h.floor() as i32;
        let f = h - i as f32;
        let v = self.b;
        let p = v * (1.0 - self.s);
        let q = v * (1.0 - f * self.s);
        let t = v * (1.0 - (1.0 - f) * self.s);
        let (r, g, b) = match i.rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        [to_byte(r), to_byte(g), to_byte(b)]
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Nudge every channel by up to `amount` either way, clamped to [0, 1]
    pub fn jitter<R: Rng>(self, rng: &mut R, amount: f32) -> Self {
        if amount <= 0.0 {
            return self;
        }
        let mut nudge = |c: f32| c + rng.gen_range(-amount..amount);
        Self::new(nudge(self.h), nudge(self.s), nudge(self.b))
    }
}

fn to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Random colour from a random partition palette
pub fn random_palette_color<R: Rng>(rng: &mut R) -> Hsb {
    let palette = &PARTITION_PALETTES[rng.gen_range(0..PARTITION_PALETTES.len())];
    let hex = palette[rng.gen_range(0..palette.len())];
    // Palette entries are compile-time constants
    Hsb::from_hex(hex).unwrap_or(Hsb::new(0.0, 0.0, 0.5))
}
