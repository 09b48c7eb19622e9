//! Theme support with auto-detection for dark/light terminals.

use ratatui::style::Color;
use seedwiz_core::ThemeConfig;

/// Application theme (dark or light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Resolve the configured preference, probing the terminal for `System`.
    pub fn from_config(config: ThemeConfig) -> Self {
        match config {
            ThemeConfig::System => Self::detect(),
            ThemeConfig::Light => Theme::Light,
            ThemeConfig::Dark => Theme::Dark,
        }
    }

    /// Detect the terminal theme based on background luminance.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => {
                tracing::info!("Detected light terminal (luma: {:.2})", luma);
                Theme::Light
            }
            Ok(luma) => {
                tracing::info!("Detected dark terminal (luma: {:.2})", luma);
                Theme::Dark
            }
            Err(e) => {
                tracing::debug!("Could not detect terminal theme: {}, defaulting to dark", e);
                Theme::Dark
            }
        }
    }

    /// Get the color palette for this theme.
    pub fn palette(&self) -> Palette {
        match self {
            Theme::Dark => Palette::dark(),
            Theme::Light => Palette::light(),
        }
    }
}

/// Color palette for the wizard.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub fg_dim: Color,
    pub bg: Color,
    pub border: Color,

    pub primary: Color,
    pub accent: Color,

    pub success: Color,
    pub warning: Color,
    pub error: Color,

    /// Focused field border.
    pub focus: Color,
    pub selection: Color,
    pub muted: Color,
    /// Next button while the step cannot be confirmed.
    pub disabled: Color,
}

impl Palette {
    /// Dark theme palette (for dark terminal backgrounds).
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            fg_dim: Color::Gray,
            bg: Color::Reset,
            border: Color::DarkGray,

            primary: Color::Cyan,
            accent: Color::Magenta,

            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,

            focus: Color::Yellow,
            selection: Color::LightBlue,
            muted: Color::DarkGray,
            disabled: Color::DarkGray,
        }
    }

    /// Light theme palette (for light terminal backgrounds).
    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            fg_dim: Color::DarkGray,
            bg: Color::Reset,
            border: Color::Gray,

            primary: Color::Rgb(0, 128, 128), // Teal
            accent: Color::Rgb(128, 0, 128),  // Purple

            success: Color::Rgb(0, 128, 0),    // Dark green
            warning: Color::Rgb(184, 134, 11), // Dark goldenrod
            error: Color::Rgb(178, 34, 34),    // Firebrick

            focus: Color::Rgb(184, 134, 11),
            selection: Color::Rgb(70, 130, 180), // Steel blue
            muted: Color::Gray,
            disabled: Color::Gray,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_forced_theme_from_config() {
        assert_eq!(Theme::from_config(ThemeConfig::Light), Theme::Light);
        assert_eq!(Theme::from_config(ThemeConfig::Dark), Theme::Dark);
    }

    #[test]
    fn test_dark_palette() {
        let palette = Theme::Dark.palette();
        assert_eq!(palette.fg, Color::White);
        assert_eq!(palette.error, Color::Red);
    }

    #[test]
    fn test_palettes_have_different_fg() {
        assert_ne!(Palette::dark().fg, Palette::light().fg);
    }
}
