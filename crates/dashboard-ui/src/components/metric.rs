use crate::themes::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// A headline figure: small label above a bold value.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn to_lines<'a>(&self, theme: &Theme) -> Vec<Line<'a>> {
        vec![
            Line::from(Span::styled(self.label.clone(), theme.label)),
            Line::from(Span::styled(self.value.clone(), theme.value)),
        ]
    }
}

/// Render `metrics` side by side in equal-width bordered cards.
pub fn render_metrics(frame: &mut Frame, area: Rect, metrics: &[Metric], theme: &Theme) {
    if metrics.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, metrics.len() as u32); metrics.len()];
    let cells = Layout::horizontal(constraints).split(area);

    for (metric, cell) in metrics.iter().zip(cells.iter()) {
        let card = Paragraph::new(Text::from(metric.to_lines(theme))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border),
        );
        frame.render_widget(card, *cell);
    }
}

/// Height of a row of metric cards, borders included.
pub const METRIC_ROW_HEIGHT: u16 = 4;

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_metric_lines() {
        let theme = Theme::dark();
        let lines = Metric::new("Total orders", "1,234").to_lines(&theme);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "Total orders");
        assert_eq!(lines[1].spans[0].content, "1,234");
        assert_eq!(lines[1].spans[0].style, theme.value);
    }

    #[test]
    fn test_render_metrics_writes_values() {
        let backend = TestBackend::new(60, METRIC_ROW_HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let metrics = vec![
            Metric::new("Total orders", "42"),
            Metric::new("Total Revenue", "$1,000.00"),
        ];

        terminal
            .draw(|frame| render_metrics(frame, frame.area(), &metrics, &theme))
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Total orders"));
        assert!(content.contains("$1,000.00"));
    }

    #[test]
    fn test_render_no_metrics_does_not_panic() {
        let backend = TestBackend::new(20, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_metrics(frame, frame.area(), &[], &theme))
            .unwrap();
    }
}
