use crate::themes::Theme;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const FILLED: char = '\u{2588}'; // █  FULL BLOCK
const ELLIPSIS: char = '…';

/// One bar of a [`HorizontalBars`] chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarItem {
    pub label: String,
    /// Drives the bar length.
    pub value: f64,
    /// Text printed after the bar.
    pub display: String,
}

impl BarItem {
    pub fn new(label: impl Into<String>, value: f64, display: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            display: display.into(),
        }
    }
}

/// Horizontal bar chart drawn with block characters, one line per item:
///
/// ```text
/// <label padded>  ████████████ <display>
/// ```
///
/// Bar lengths are proportional to the largest value. With
/// `highlight_first` the first bar uses the highlight colour and the rest
/// are muted, otherwise every bar uses the regular chart colour.
pub struct HorizontalBars<'a> {
    pub items: &'a [BarItem],
    pub theme: &'a Theme,
    /// Columns reserved for the label.
    pub label_width: usize,
    /// Columns for the longest bar.
    pub bar_width: usize,
    pub highlight_first: bool,
}

impl<'a> HorizontalBars<'a> {
    pub fn new(items: &'a [BarItem], theme: &'a Theme) -> Self {
        Self {
            items,
            theme,
            label_width: 24,
            bar_width: 40,
            highlight_first: true,
        }
    }

    /// Fit the label and bar columns into `width` terminal columns.
    pub fn fit_width(mut self, width: u16) -> Self {
        let width = width as usize;
        let display_width = self
            .items
            .iter()
            .map(|i| i.display.width())
            .max()
            .unwrap_or(0);
        self.label_width = self.label_width.min(width / 3).max(4);
        self.bar_width = width
            .saturating_sub(self.label_width + display_width + 3)
            .max(1);
        self
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let max = self
            .items
            .iter()
            .map(|i| i.value)
            .fold(0.0_f64, f64::max);

        self.items
            .iter()
            .enumerate()
            .map(|(rank, item)| {
                let len = bar_length(item.value, max, self.bar_width);
                let style = if self.highlight_first {
                    self.theme.ranked_bar_style(rank)
                } else {
                    self.theme.chart_bar
                };
                Line::from(vec![
                    Span::styled(fit_label(&item.label, self.label_width), self.theme.label),
                    Span::raw("  "),
                    Span::styled(FILLED.to_string().repeat(len), style),
                    Span::raw(" "),
                    Span::styled(item.display.clone(), self.theme.value),
                ])
            })
            .collect()
    }
}

/// Columns filled for `value` when `max` fills `width`. Any positive value
/// gets at least one column.
fn bar_length(value: f64, max: f64, width: usize) -> usize {
    if width == 0 || max <= 0.0 || value <= 0.0 {
        return 0;
    }
    (((value / max) * width as f64).round() as usize).clamp(1, width)
}

/// Truncate or pad `label` to exactly `width` display columns.
pub fn fit_label(label: &str, width: usize) -> String {
    if label.width() <= width {
        let mut out = label.to_string();
        out.push_str(&" ".repeat(width - label.width()));
        return out;
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push(ELLIPSIS);
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
