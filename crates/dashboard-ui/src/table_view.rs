//! Monthly orders table for the dashboard.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per month
//! plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dashboard_core::models::{MonthlySummary, OrderTotals};

use crate::app::DisplayOptions;
use crate::themes::Theme;

/// Table rows (months then totals) as plain cell text.
pub fn monthly_cells(
    monthly: &[MonthlySummary],
    totals: &OrderTotals,
    options: &DisplayOptions,
) -> Vec<[String; 3]> {
    let mut rows: Vec<[String; 3]> = monthly
        .iter()
        .map(|m| {
            [
                m.month.clone(),
                options.number(m.order_count as f64, 0),
                options.money(m.revenue),
            ]
        })
        .collect();
    rows.push([
        format!(
            "TOTAL ({} month{})",
            totals.months,
            if totals.months == 1 { "" } else { "s" }
        ),
        options.number(totals.total_orders as f64, 0),
        options.money(totals.total_revenue),
    ]);
    rows
}

/// Render the monthly table into `area`.
pub fn render_monthly_table(
    frame: &mut Frame,
    area: Rect,
    monthly: &[MonthlySummary],
    totals: &OrderTotals,
    options: &DisplayOptions,
    theme: &Theme,
) {
    let header = Row::new(
        ["Month", "Orders", "Revenue"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let cells = monthly_cells(monthly, totals, options);
    let last = cells.len() - 1;
    let rows: Vec<Row> = cells
        .into_iter()
        .enumerate()
        .map(|(i, [month, orders, revenue])| {
            let style = if i == last {
                theme.table_total
            } else if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(month),
                Cell::from(Text::from(orders).right_aligned()),
                Cell::from(Text::from(revenue).right_aligned()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(18),
        Constraint::Length(12),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Monthly Orders "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

pub const NO_ORDERS: &str = "No orders in the selected date range";

/// Render a "no orders" placeholder for an empty date range.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    render_message(frame, area, title, NO_ORDERS, theme);
}

/// Render a bordered placeholder carrying `message`.
pub fn render_message(frame: &mut Frame, area: Rect, title: &str, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Widen the range with the arrow keys or press 'r' to reset.",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::formatting::NumberLocale;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_rows() -> Vec<MonthlySummary> {
        vec![
            MonthlySummary {
                month: "2023-01".to_string(),
                order_count: 1_200,
                revenue: 15_300.5,
            },
            MonthlySummary {
                month: "2023-02".to_string(),
                order_count: 980,
                revenue: 12_001.0,
            },
        ]
    }

    fn make_totals() -> OrderTotals {
        OrderTotals {
            total_orders: 2_180,
            total_revenue: 27_301.5,
            months: 2,
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

    #[test]
    fn test_monthly_cells_with_totals_row() {
        let cells = monthly_cells(&make_rows(), &make_totals(), &DisplayOptions::default());
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], ["2023-01", "1,200", "$15,300.50"]);
        assert_eq!(cells[2][0], "TOTAL (2 months)");
        assert_eq!(cells[2][1], "2,180");
        assert_eq!(cells[2][2], "$27,301.50");
    }

    #[test]
    fn test_monthly_cells_locale() {
        let options = DisplayOptions {
            locale: NumberLocale::EsCo,
            ..DisplayOptions::default()
        };
        let cells = monthly_cells(&make_rows(), &make_totals(), &options);
        assert_eq!(cells[0][1], "1.200");
        assert_eq!(cells[0][2], "US$ 15.300,50");
    }

    #[test]
    fn test_render_monthly_table_shows_months() {
        let backend = TestBackend::new(60, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let rows = make_rows();
        let totals = make_totals();
        let options = DisplayOptions::default();

        terminal
            .draw(|frame| {
                render_monthly_table(frame, frame.area(), &rows, &totals, &options, &theme)
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("2023-01"));
        assert!(text.contains("2023-02"));
        assert!(text.contains("TOTAL"));
    }

    #[test]
    fn test_render_monthly_table_empty_rows_does_not_panic() {
        let backend = TestBackend::new(60, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();

        terminal
            .draw(|frame| {
                render_monthly_table(
                    frame,
                    frame.area(),
                    &[],
                    &OrderTotals::default(),
                    &DisplayOptions::default(),
                    &theme,
                )
            })
            .unwrap();
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let backend = TestBackend::new(80, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| render_no_data(frame, frame.area(), "Monthly Orders", &theme))
            .unwrap();
        assert!(buffer_text(&terminal).contains("No orders in the selected date range"));
    }
}
