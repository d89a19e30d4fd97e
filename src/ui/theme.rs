use crate::animation::AnimationVerb;
use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub highlight: Color,  // Yellow
    pub structure: Color,  // Teal for element boxes
    pub edge_weight: Color, // Pink
}

impl Theme {
    /// Accent for an instruction verb
    pub fn verb_color(&self, verb: AnimationVerb) -> Color {
        match verb {
            AnimationVerb::Insert | AnimationVerb::FadeIn => self.success,
            AnimationVerb::Delete | AnimationVerb::FadeOut => self.error,
            AnimationVerb::Update | AnimationVerb::Scale => self.secondary,
            AnimationVerb::Move | AnimationVerb::PathDraw => self.primary,
            AnimationVerb::Highlight => self.highlight,
        }
    }
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    highlight: Color::Rgb(249, 226, 175),
    structure: Color::Rgb(148, 226, 213),
    edge_weight: Color::Rgb(245, 194, 231),
};
