use dailyusage_core::Theme;
use ratatui::style::Color;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Colours for one theme. `System` leaves text at the terminal default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: Color,
    pub muted: Color,
    pub text: Color,
    pub cost: Color,
    pub cart: Color,
    pub warn: Color,
    pub highlight: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                primary: Color::Cyan,
                muted: Color::DarkGray,
                text: Color::White,
                cost: Color::Green,
                cart: Color::Yellow,
                warn: Color::Red,
                highlight: Color::DarkGray,
            },
            Theme::Light => Palette {
                primary: Color::Blue,
                muted: Color::Gray,
                text: Color::Black,
                cost: Color::Green,
                cart: Color::Magenta,
                warn: Color::Red,
                highlight: Color::LightBlue,
            },
            Theme::System => Palette {
                primary: Color::Cyan,
                muted: Color::DarkGray,
                text: Color::Reset,
                cost: Color::Green,
                cart: Color::Yellow,
                warn: Color::Red,
                highlight: Color::DarkGray,
            },
        }
    }
}

/// Cuts `text` to at most `width` terminal columns, ending in `…` when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Milk", 10), "Milk");
        assert_eq!(truncate("Newspaper", 5), "News…");
        assert_eq!(truncate("Newspaper", 0), "");
        // wide characters take two columns
        assert_eq!(truncate("牛乳とパン", 5), "牛乳…");
    }

    #[test]
    fn test_themes_differ() {
        assert_ne!(Palette::for_theme(Theme::Light), Palette::for_theme(Theme::Dark));
        assert_eq!(Palette::for_theme(Theme::System).text, Color::Reset);
    }
}
