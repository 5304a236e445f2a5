//! "Top Product Categories" section.

use ratatui::{
    layout::Rect,
    text::{Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use dashboard_core::models::{category_label, CategorySales};
use dashboard_data::analysis::{top_categories, DashboardReport};

use crate::app::DisplayOptions;
use crate::components::bars::{BarItem, HorizontalBars};
use crate::table_view;
use crate::themes::Theme;

/// Bars for the best sellers, highest quantity first.
pub fn category_bars(categories: &[CategorySales], options: &DisplayOptions) -> Vec<BarItem> {
    top_categories(categories, options.top_categories)
        .iter()
        .map(|c| {
            BarItem::new(
                category_label(&c.category),
                c.quantity as f64,
                options.number(c.quantity as f64, 0),
            )
        })
        .collect()
}

pub fn render_category_view(
    frame: &mut Frame,
    area: Rect,
    report: &DashboardReport,
    options: &DisplayOptions,
    theme: &Theme,
) {
    let title = "Top Product Categories";
    if report.categories.is_empty() {
        table_view::render_no_data(frame, area, title, theme);
        return;
    }

    let items = category_bars(&report.categories, options);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(
            format!(" {} (top {} by quantity) ", title, items.len()),
            theme.header,
        ));
    let inner = block.inner(area);
    let lines = HorizontalBars::new(&items, theme)
        .fit_width(inner.width)
        .to_lines();

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}
