//! Dark and light themes for MovieManager
//!
//! Color palettes and style helpers for the TUI. The active palette follows
//! the persisted [`ThemeMode`].

use ratatui::style::{Color, Modifier, Style};

use crate::store::ThemeMode;

/// One color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    /// Panels and input fields
    pub surface: Color,
    pub primary: Color,
    pub accent: Color,
    pub text: Color,
    pub dim: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub border: Color,
}

/// Dark palette
pub const DARK: Palette = Palette {
    background: Color::Rgb(0x12, 0x12, 0x16),
    surface: Color::Rgb(0x1e, 0x1e, 0x26),
    primary: Color::Rgb(0x64, 0xb5, 0xf6),
    accent: Color::Rgb(0xff, 0xd5, 0x4f),
    text: Color::Rgb(0xe6, 0xe6, 0xe6),
    dim: Color::Rgb(0x8a, 0x8a, 0x99),
    success: Color::Rgb(0x81, 0xc7, 0x84),
    warning: Color::Rgb(0xff, 0xb7, 0x4d),
    error: Color::Rgb(0xef, 0x53, 0x50),
    border: Color::Rgb(0x45, 0x5a, 0x64),
};

/// Light palette
pub const LIGHT: Palette = Palette {
    background: Color::Rgb(0xfa, 0xfa, 0xfa),
    surface: Color::Rgb(0xec, 0xef, 0xf1),
    primary: Color::Rgb(0x15, 0x65, 0xc0),
    accent: Color::Rgb(0x8e, 0x24, 0xaa),
    text: Color::Rgb(0x21, 0x21, 0x21),
    dim: Color::Rgb(0x61, 0x61, 0x61),
    success: Color::Rgb(0x2e, 0x7d, 0x32),
    warning: Color::Rgb(0xa0, 0x4a, 0x00),
    error: Color::Rgb(0xc6, 0x28, 0x28),
    border: Color::Rgb(0x90, 0xa4, 0xae),
};

/// Style source for every widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub mode: ThemeMode,
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        let palette = if mode.is_dark() { DARK } else { LIGHT };
        Self { mode, palette }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default()
            .fg(self.palette.text)
            .bg(self.palette.background)
    }

    /// Title/header style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Dimmed/muted text
    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.palette.dim)
    }

    /// Controls that do not accept input right now
    pub fn disabled(&self) -> Style {
        Style::default()
            .fg(self.palette.dim)
            .add_modifier(Modifier::DIM)
    }

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.palette.error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default()
            .fg(self.palette.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning(&self) -> Style {
        Style::default()
            .fg(self.palette.warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Accent text (checked boxes, active page)
    pub fn accent(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Normal/unfocused border
    pub fn border(&self) -> Style {
        Style::default().fg(self.palette.border)
    }

    /// Focused border
    pub fn border_focused(&self) -> Style {
        Style::default()
            .fg(self.palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    /// Style for list items (normal state)
    pub fn list_item(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    /// Style for the list item under the cursor
    pub fn list_item_selected(&self) -> Style {
        Style::default()
            .fg(self.palette.background)
            .bg(self.palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// The movie currently being edited
    pub fn list_item_active(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for input fields
    pub fn input(&self) -> Style {
        Style::default()
            .fg(self.palette.text)
            .bg(self.palette.surface)
    }

    /// Style for input cursor
    pub fn input_cursor(&self) -> Style {
        Style::default()
            .fg(self.palette.background)
            .bg(self.palette.primary)
    }

    /// Form field label
    pub fn label(&self) -> Style {
        Style::default().fg(self.palette.dim)
    }

    /// Keybinding hint style
    pub fn keybind(&self) -> Style {
        Style::default().fg(self.palette.accent)
    }

    /// Keybinding description style
    pub fn keybind_desc(&self) -> Style {
        Style::default().fg(self.palette.dim)
    }

    /// Status bar style
    pub fn status_bar(&self) -> Style {
        Style::default()
            .fg(self.palette.text)
            .bg(self.palette.surface)
    }

    /// Loading indicator
    pub fn loading(&self) -> Style {
        Style::default()
            .fg(self.palette.primary)
            .add_modifier(Modifier::BOLD)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Calculate relative luminance for a color (used in contrast ratio)
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Calculate contrast ratio between two colors
/// Returns a value between 1 (same color) and 21 (black/white)
/// WCAG AA requires >= 4.5:1 for normal text, >= 3:1 for large text
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

/// Check if a foreground/background pair meets WCAG AA for normal text
pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// Check if a foreground/background pair meets WCAG AA for large text
pub fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
