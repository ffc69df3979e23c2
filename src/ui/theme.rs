use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub surface_bg: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub border: Color,
    pub header_accent_fg: Color,
    pub header_accent_bg: Color,
    pub changed_fg: Color,
    pub changed_bg: Color,
    pub cpu_line: Color,
    pub memory_line: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub pill_desc_fg: Color,
    pub statusbar_bg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            surface_bg: Color::Rgb(30, 30, 46),
            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(147, 153, 178),
            border: Color::Rgb(88, 91, 112),
            header_accent_fg: Color::Rgb(17, 17, 27),
            header_accent_bg: Color::Rgb(137, 180, 250),
            changed_fg: Color::Black,
            changed_bg: Color::LightGreen,
            cpu_line: Color::Blue,
            memory_line: Color::Rgb(255, 165, 0),
            pill_key_fg: Color::Rgb(17, 17, 27),
            pill_key_bg: Color::Rgb(166, 227, 161),
            pill_desc_fg: Color::Rgb(186, 194, 222),
            statusbar_bg: Color::Rgb(24, 24, 37),
        }
    }

    pub fn light() -> Self {
        Theme {
            surface_bg: Color::Rgb(239, 241, 245),
            text_primary: Color::Rgb(76, 79, 105),
            text_secondary: Color::Rgb(108, 111, 133),
            border: Color::Rgb(172, 176, 190),
            header_accent_fg: Color::Rgb(239, 241, 245),
            header_accent_bg: Color::Rgb(30, 102, 245),
            changed_fg: Color::Black,
            changed_bg: Color::LightGreen,
            cpu_line: Color::Blue,
            memory_line: Color::Rgb(254, 100, 11),
            pill_key_fg: Color::Rgb(239, 241, 245),
            pill_key_bg: Color::Rgb(64, 160, 43),
            pill_desc_fg: Color::Rgb(92, 95, 119),
            statusbar_bg: Color::Rgb(220, 224, 232),
        }
    }

    pub fn from_config(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Theme::light(),
            _ => Theme::dark(),
        }
    }
}
