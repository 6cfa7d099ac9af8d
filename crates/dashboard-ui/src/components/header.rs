use crate::themes::Theme;
use dashboard_core::formatting::Currency;
use dashboard_core::models::DateRange;
use ratatui::text::{Line, Span};

/// Decorative marks placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

pub const TITLE: &str = " OLIST E-COMMERCE SALES DASHBOARD ";

/// Dashboard header rendering four lines:
///
/// 1. Application title with sparkle decorations.
/// 2. A 60-column `=` separator.
/// 3. Date range and currency in `[ start → end | BRL ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Effective range of the snapshot, `None` when no data was selected.
    pub range: Option<DateRange>,
    pub currency: Currency,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(range: Option<DateRange>, currency: Currency, theme: &'a Theme) -> Self {
        Self {
            range,
            currency,
            theme,
        }
    }

    /// Range as shown in the info line.
    pub fn range_label(&self) -> String {
        match self.range {
            Some(r) => format!("{} → {}", r.start.format("%Y-%m-%d"), r.end.format("%Y-%m-%d")),
            None => "no data".to_string(),
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let range_style = match self.range {
            Some(r) if r.is_inverted() => self.theme.warning,
            Some(_) => self.theme.value,
            None => self.theme.dim,
        };

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_accent),
                Span::styled(TITLE, self.theme.header),
                Span::styled(SPARKLES, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.range_label(), range_style),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.currency.code(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
