//! Colors and text styles for the Heartwise screens.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::PredictionLabel;

/// Palette and style presets shared by every view.
pub struct HeartwiseTheme;

impl HeartwiseTheme {
    /// Cardiac red, used for accents and the active sidebar entry.
    pub const ACCENT: Color = Color::Rgb(220, 38, 38); // #DC2626
    pub const ACCENT_SOFT: Color = Color::Rgb(252, 165, 165); // #FCA5A5

    pub const LOW_RISK: Color = Color::Rgb(34, 197, 94); // #22C55E
    pub const HIGH_RISK: Color = Color::Rgb(239, 68, 68); // #EF4444
    pub const GAUGE: Color = Color::Rgb(96, 165, 250); // #60A5FA

    pub const FRAME: Color = Color::Rgb(113, 113, 122); // #71717A
    pub const BACKGROUND: Color = Color::Rgb(24, 24, 27); // #18181B

    pub const FOREGROUND: Color = Color::Rgb(244, 244, 245); // #F4F4F5
    pub const FOREGROUND_DIM: Color = Color::Rgb(161, 161, 170); // #A1A1AA
    pub const FOREGROUND_FAINT: Color = Color::Rgb(113, 113, 122); // #71717A

    /// Page heading.
    #[must_use]
    pub fn heading() -> Style {
        Style::default()
            .fg(Self::FOREGROUND)
            .add_modifier(Modifier::BOLD)
    }

    /// Title set into a panel border.
    #[must_use]
    pub fn panel_title() -> Style {
        Style::default()
            .fg(Self::ACCENT_SOFT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn body() -> Style {
        Style::default().fg(Self::FOREGROUND)
    }

    #[must_use]
    pub fn label() -> Style {
        Style::default().fg(Self::FOREGROUND_DIM)
    }

    #[must_use]
    pub fn faint() -> Style {
        Style::default().fg(Self::FOREGROUND_FAINT)
    }

    /// Panel border; the form field under the cursor gets the accent.
    #[must_use]
    pub fn frame(active: bool) -> Style {
        if active {
            Style::default().fg(Self::ACCENT)
        } else {
            Style::default().fg(Self::FRAME)
        }
    }

    /// Label of the form field under the cursor.
    #[must_use]
    pub fn field_active() -> Style {
        Style::default()
            .fg(Self::ACCENT_SOFT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::ACCENT_SOFT)
    }

    #[must_use]
    pub fn sidebar_title() -> Style {
        Style::default()
            .fg(Self::FOREGROUND)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn sidebar_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::ACCENT_SOFT)
            .add_modifier(Modifier::BOLD)
    }

    /// Key name in a hint bar, e.g. `[Enter]`.
    #[must_use]
    pub fn key() -> Style {
        Style::default()
            .fg(Self::ACCENT_SOFT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_action() -> Style {
        Style::default().fg(Self::FOREGROUND_DIM)
    }

    #[must_use]
    pub fn gauge() -> Style {
        Style::default().fg(Self::GAUGE)
    }

    /// Errors and failed status checks.
    #[must_use]
    pub fn alert() -> Style {
        Style::default().fg(Self::HIGH_RISK)
    }

    #[must_use]
    pub fn status(ok: bool) -> Style {
        if ok {
            Style::default().fg(Self::LOW_RISK)
        } else {
            Self::alert()
        }
    }

    /// Colour of a prediction label.
    #[must_use]
    pub fn risk(label: PredictionLabel) -> Style {
        let color = match label {
            PredictionLabel::Negative => Self::LOW_RISK,
            PredictionLabel::Positive => Self::HIGH_RISK,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_colours_follow_the_label() {
        assert_eq!(
            HeartwiseTheme::risk(PredictionLabel::Positive).fg,
            Some(HeartwiseTheme::HIGH_RISK)
        );
        assert_eq!(
            HeartwiseTheme::risk(PredictionLabel::Negative).fg,
            Some(HeartwiseTheme::LOW_RISK)
        );
        assert_ne!(HeartwiseTheme::frame(true), HeartwiseTheme::frame(false));
    }
}
