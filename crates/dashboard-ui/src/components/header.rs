use crate::app::RangeBound;
use crate::themes::Theme;
use dashboard_core::models::DateRange;
use ratatui::text::{Line, Span};

/// Decorative marker placed either side of the dashboard title.
pub const TITLE_MARKER: &str = "◆";

/// Dashboard header rendering four lines:
///
/// 1. Title between markers.
/// 2. A 60-column `=` separator.
/// 3. The active date range as `[ start to end | N days ]`, with the bound
///    the arrow keys move highlighted.
/// 4. An empty line.
pub struct Header<'a> {
    pub title: &'a str,
    pub range: &'a DateRange,
    /// `None` in non-interactive output.
    pub selected: Option<RangeBound>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        title: &'a str,
        range: &'a DateRange,
        selected: Option<RangeBound>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            range,
            selected,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let bound_style = |bound: RangeBound| {
            if self.selected == Some(bound) {
                self.theme.selected_bound
            } else {
                self.theme.value
            }
        };
        let days = self.range.days();

        vec![
            Line::from(vec![
                Span::styled(TITLE_MARKER, self.theme.header_accent),
                Span::styled(format!(" {} ", self.title.to_uppercase()), self.theme.header),
                Span::styled(TITLE_MARKER, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(
                    self.range.start().to_string(),
                    bound_style(RangeBound::Start),
                ),
                Span::styled(" to ", self.theme.label),
                Span::styled(self.range.end().to_string(), bound_style(RangeBound::End)),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} day{}", days, if days == 1 { "" } else { "s" }),
                    self.theme.dim,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
