//! Ranking tables for the Categories and Seller Cities tabs.
//!
//! Each table is a bordered [`ratatui::widgets::Table`] with one row per
//! group: rank, group label, formatted value and a share-of-total bar.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use dashboard_core::formatting::{self, Currency};
use dashboard_core::models::{GroupCount, GroupSum};
use dashboard_data::snapshot::{DimensionBreakdown, Ranked, Ranking};

use crate::components::share_bar::{ShareBar, ShareBarConfig};
use crate::themes::Theme;

/// Label shown for rows whose group key is null.
pub const UNKNOWN_LABEL: &str = "(unknown)";

const RANK_WIDTH: u16 = 4;
const VALUE_WIDTH: u16 = 18;
const BAR_WIDTH: u16 = 16;
/// Share column: bar plus the ` 100.0%` label.
const SHARE_WIDTH: u16 = BAR_WIDTH + 8;

/// Which end of a ranking a table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Best,
    Worst,
}

impl Side {
    pub fn title(&self) -> &'static str {
        match self {
            Side::Best => "Top",
            Side::Worst => "Bottom",
        }
    }
}

/// One table row ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    /// 1-based position in the full descending rollup.
    pub rank: usize,
    pub key: Option<String>,
    /// Raw value used for the share bar.
    pub value: f64,
    /// `value` formatted for display.
    pub formatted: String,
}

impl RankingRow {
    pub fn label(&self) -> &str {
        display_key(self.key.as_deref())
    }
}

/// Display form of a group key.
pub fn display_key(key: Option<&str>) -> &str {
    key.unwrap_or(UNKNOWN_LABEL)
}

/// Cut `s` to at most `max_width` terminal columns, ending in `…` when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

// ── Row builders ──────────────────────────────────────────────────────────────

fn ranking_rows<T: Ranked>(
    ranking: &Ranking<T>,
    side: Side,
    format: impl Fn(f64) -> String,
) -> Vec<RankingRow> {
    let items = match side {
        Side::Best => &ranking.best,
        Side::Worst => &ranking.worst,
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| RankingRow {
            rank: match side {
                Side::Best => i + 1,
                Side::Worst => ranking.groups - i,
            },
            key: item.group_key().map(str::to_string),
            value: item.value(),
            formatted: format(item.value()),
        })
        .collect()
}

/// Rows of a by-sales ranking, counts formatted for `currency`'s locale.
pub fn sales_rows(ranking: &Ranking<GroupCount>, side: Side, currency: Currency) -> Vec<RankingRow> {
    ranking_rows(ranking, side, |v| formatting::format_count(v as u64, currency))
}

/// Rows of a by-revenue ranking, values formatted as money.
pub fn revenue_rows(ranking: &Ranking<GroupSum>, side: Side, currency: Currency) -> Vec<RankingRow> {
    ranking_rows(ranking, side, |v| formatting::format_currency(v, currency))
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Render one ranking table into `area`.
///
/// `whole` is the total the share bars are measured against.
pub fn render_ranking_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[RankingRow],
    whole: f64,
    theme: &Theme,
) {
    // Borders, column spacing and the fixed columns leave this for the label.
    let label_width = area
        .width
        .saturating_sub(2 + 3 + RANK_WIDTH + VALUE_WIDTH + SHARE_WIDTH)
        .max(8) as usize;

    let header = Row::new(
        ["#", "Group", "Value", "Share"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let bar_config = ShareBarConfig {
        width: BAR_WIDTH,
        ..ShareBarConfig::default()
    };

    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let label_style = if row.key.is_none() {
                theme.table_unknown
            } else {
                theme.row_style(i)
            };
            Row::new(vec![
                Cell::from(format!("{:>3}", row.rank)),
                Cell::from(truncate_to_width(row.label(), label_width)).style(label_style),
                Cell::from(Line::from(row.formatted.clone()).right_aligned()),
                Cell::from(
                    ShareBar::new(row.value, whole, theme)
                        .with_config(bar_config)
                        .to_line(),
                ),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(RANK_WIDTH),
        Constraint::Min(label_width as u16),
        Constraint::Length(VALUE_WIDTH),
        Constraint::Length(SHARE_WIDTH),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render the four rankings of one dimension as a 2×2 grid.
///
/// Sales shares are measured against `item_rows`, revenue shares against
/// `total_revenue`.
pub fn render_breakdown(
    frame: &mut Frame,
    area: Rect,
    breakdown: &DimensionBreakdown,
    item_rows: usize,
    total_revenue: f64,
    currency: Currency,
    theme: &Theme,
) {
    let halves = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[0]);
    let bottom = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[1]);

    for (side, cell) in [(Side::Best, top[0]), (Side::Worst, top[1])] {
        let rows = sales_rows(&breakdown.by_sales, side, currency);
        let title = format!("{} {} by sales", side.title(), rows.len());
        render_ranking_table(frame, cell, &title, &rows, item_rows as f64, theme);
    }
    for (side, cell) in [(Side::Best, bottom[0]), (Side::Worst, bottom[1])] {
        let rows = revenue_rows(&breakdown.by_revenue, side, currency);
        let title = format!("{} {} by revenue", side.title(), rows.len());
        render_ranking_table(frame, cell, &title, &rows, total_revenue, theme);
    }
}

/// Render a "no data" placeholder when the range selects no rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No orders in the selected range", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Adjust --start-date / --end-date, or press 'r' to reload the dataset.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Olist Dashboard "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn count(key: Option<&str>, n: u64) -> GroupCount {
        GroupCount {
            group_key: key.map(str::to_string),
            order_count: n,
        }
    }

    fn sum(key: Option<&str>, v: f64) -> GroupSum {
        GroupSum {
            group_key: key.map(str::to_string),
            revenue: v,
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    #[test]
    fn test_display_key() {
        assert_eq!(display_key(Some("toys")), "toys");
        assert_eq!(display_key(None), UNKNOWN_LABEL);
    }

    #[test]
    fn test_truncate_to_width_ascii() {
        assert_eq!(truncate_to_width("health_beauty", 20), "health_beauty");
        assert_eq!(truncate_to_width("health_beauty", 7), "health…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_truncate_to_width_wide_chars() {
        // Each CJK character is two columns wide.
        let cut = truncate_to_width("産品類別", 5);
        assert_eq!(cut, "産品…");
        assert!(cut.width() <= 5);
    }

    // ── Row builders ──────────────────────────────────────────────────────────

    #[test]
    fn test_sales_rows_rank_numbering() {
        let sorted = vec![
            count(Some("a"), 1200),
            count(Some("b"), 30),
            count(None, 20),
            count(Some("d"), 1),
        ];
        let ranking = Ranking::from_descending(&sorted, 2);

        let best = sales_rows(&ranking, Side::Best, Currency::Brl);
        assert_eq!(best[0].rank, 1);
        assert_eq!(best[0].formatted, "1.200");
        assert_eq!(best[1].rank, 2);

        let worst = sales_rows(&ranking, Side::Worst, Currency::Usd);
        assert_eq!(worst[0].rank, 4);
        assert_eq!(worst[0].label(), "d");
        assert_eq!(worst[1].rank, 3);
        assert_eq!(worst[1].label(), UNKNOWN_LABEL);
    }

    #[test]
    fn test_worst_rows_rank_ties_by_position() {
        let sorted = vec![count(Some("a"), 5), count(Some("b"), 1), count(Some("c"), 1)];
        let ranking = Ranking::from_descending(&sorted, 2);

        let worst = sales_rows(&ranking, Side::Worst, Currency::Usd);
        let ranked: Vec<(usize, &str)> = worst.iter().map(|r| (r.rank, r.label())).collect();
        assert_eq!(ranked, vec![(3, "c"), (2, "b")]);
    }

    #[test]
    fn test_revenue_rows_currency_formatting() {
        let sorted = vec![sum(Some("x"), 1234.56), sum(Some("y"), 9.5)];
        let ranking = Ranking::from_descending(&sorted, 10);

        let brl = revenue_rows(&ranking, Side::Best, Currency::Brl);
        assert_eq!(brl[0].formatted, "R$ 1.234,56");
        let usd = revenue_rows(&ranking, Side::Best, Currency::Usd);
        assert_eq!(usd[1].formatted, "$9.50");
    }

    #[test]
    fn test_side_title() {
        assert_eq!(Side::Best.title(), "Top");
        assert_eq!(Side::Worst.title(), "Bottom");
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_ranking_table_shows_unknown_label() {
        let backend = TestBackend::new(100, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let sorted = vec![count(Some("toys"), 3), count(None, 1)];
        let rows = sales_rows(&Ranking::from_descending(&sorted, 10), Side::Best, Currency::Brl);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_ranking_table(frame, area, "Top 10 by sales", &rows, 4.0, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Top 10 by sales"));
        assert!(text.contains("toys"));
        assert!(text.contains(UNKNOWN_LABEL));
    }

    #[test]
    fn test_render_ranking_table_empty_and_narrow_does_not_panic() {
        let backend = TestBackend::new(30, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_ranking_table(frame, area, "Bottom 10 by revenue", &[], 0.0, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_breakdown_titles() {
        let backend = TestBackend::new(160, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let counts = vec![count(Some("toys"), 3), count(Some("books"), 1)];
        let sums = vec![sum(Some("books"), 20.0), sum(Some("toys"), 15.0)];
        let breakdown = DimensionBreakdown {
            column: "product_category_name_english".to_string(),
            by_sales: Ranking::from_descending(&counts, 10),
            by_revenue: Ranking::from_descending(&sums, 10),
        };

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_breakdown(frame, area, &breakdown, 4, 35.0, Currency::Brl, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Top 2 by sales"));
        assert!(text.contains("Bottom 2 by sales"));
        assert!(text.contains("Top 2 by revenue"));
        assert!(text.contains("R$ 20,00"));
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("No orders in the selected range"));
    }
}
