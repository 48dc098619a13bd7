use ratatui::style::Color;

/// Color theme for the demo composer.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub accent: Color,
    pub mention: Color,
    pub group_mention: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x10, 0x1C),
            text: Color::Rgb(0xC8, 0xC8, 0xDC),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6E, 0x6E, 0x8A),
            accent: Color::Rgb(0x5F, 0xB0, 0xFF),
            mention: Color::Rgb(0x52, 0xD8, 0xA8),
            group_mention: Color::Rgb(0xC0, 0x7E, 0xF0),
            selection_bg: Color::Rgb(0x2A, 0x2A, 0x46),
        }
    }
}
