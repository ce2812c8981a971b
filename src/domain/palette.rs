/// Level cosmetics: background colors and obstacle glyphs.
/// Pure data; the random picks live in `sim::level`.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Componentwise `255 - channel`. Used for text drawn over the background.
    pub fn opposite(self) -> Self {
        Rgb::new(255 - self.r, 255 - self.g, 255 - self.b)
    }
}

/// Decorative glyphs an obstacle can be drawn with. One is picked per level.
pub const OBSTACLE_GLYPHS: &[&str] = &[
    "🌳", "🌴", "🌵", "🍄", "🌸", "🌀", "🌙", "🌈", "🔮", "🕷️", "🔥", "💀", "👀",
    "⚡", "🪨", "🌊", "🔪", "🌚", "♟", "👾", "🧩", "🌓", "🦴", "💿", "✡", "🛖",
];

/// Plain standing person; the gendered ZWJ sequence renders at
/// inconsistent widths across terminals.
pub const PLAYER_GLYPH: &str = "🧍";
pub const GOAL_GLYPH: &str = "🚪";
