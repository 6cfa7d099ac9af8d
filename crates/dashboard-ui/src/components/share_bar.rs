use crate::themes::Theme;
use dashboard_core::formatting::percentage;
use ratatui::text::{Line, Span};

/// Configuration controlling the visual appearance of a share bar.
#[derive(Debug, Clone, Copy)]
pub struct ShareBarConfig {
    /// Width in terminal columns of the bar portion (excluding the label).
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
    /// Append the percentage after the bar.
    pub show_percentage: bool,
}

impl Default for ShareBarConfig {
    fn default() -> Self {
        Self {
            width: 20,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
            show_percentage: true,
        }
    }
}

// ── ShareBar ──────────────────────────────────────────────────────────────────

/// Horizontal bar showing one group's share of a total.
///
/// Renders a filled and an empty portion followed by ` 12.3%`.
pub struct ShareBar<'a> {
    /// Share of the total, clamped to `[0.0, 100.0]`.
    pub percentage: f64,
    pub theme: &'a Theme,
    pub config: ShareBarConfig,
}

impl<'a> ShareBar<'a> {
    /// Construct a bar for `part` out of `whole`; a zero `whole` gives 0 %.
    pub fn new(part: f64, whole: f64, theme: &'a Theme) -> Self {
        Self {
            percentage: percentage(part, whole, 1).clamp(0.0, 100.0),
            theme,
            config: ShareBarConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ShareBarConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of filled cells for the current percentage.
    pub fn filled_cells(&self) -> u16 {
        ((self.percentage / 100.0) * self.config.width as f64).round() as u16
    }

    /// Render the bar as a [`Line`].
    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled_cells().min(self.config.width);
        let empty = self.config.width - filled;

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        let mut spans = vec![
            Span::styled(filled_str, self.theme.share_filled),
            Span::styled(empty_str, self.theme.share_empty),
        ];
        if self.config.show_percentage {
            spans.push(Span::styled(
                format!(" {:>5.1}%", self.percentage),
                self.theme.label,
            ));
        }
        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
