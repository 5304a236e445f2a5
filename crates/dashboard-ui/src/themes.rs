use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0-6 are dark, 7-15 light. Anything else reports `Unknown`.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .map(background_from_colorfgbg)
        .unwrap_or(BackgroundType::Unknown)
}

fn background_from_colorfgbg(value: &str) -> BackgroundType {
    match value.split(';').next_back().map(str::parse::<u8>) {
        Some(Ok(bg)) if bg <= 6 => BackgroundType::Dark,
        Some(Ok(bg)) if bg <= 15 => BackgroundType::Light,
        _ => BackgroundType::Unknown,
    }
}

/// Steel blue used for regular chart bars and lines.
pub const CHART_PRIMARY: Color = Color::Rgb(0x90, 0xCA, 0xF9);
/// Teal used for the highlighted (best) bar.
pub const CHART_HIGHLIGHT: Color = Color::Rgb(0x72, 0xBC, 0xD4);
/// Light grey for the bars that trail the best one.
pub const CHART_MUTED: Color = Color::Rgb(0xD3, 0xD3, 0xD3);

/// All styles used by the dashboard widgets.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,
    /// The date bound currently moved by the arrow keys.
    pub selected_bound: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub warning: Style,

    // ── Tabs ─────────────────────────────────────────────────────────────────
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub chart_line: Style,
    pub chart_bar: Style,
    pub chart_bar_best: Style,
    pub chart_bar_rest: Style,
    pub chart_axis: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),
            selected_bound: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),

            tab_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::Gray),

            chart_line: Style::default().fg(CHART_PRIMARY),
            chart_bar: Style::default().fg(CHART_PRIMARY),
            chart_bar_best: Style::default().fg(CHART_HIGHLIGHT),
            chart_bar_rest: Style::default().fg(CHART_MUTED),
            chart_axis: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Text goes dark; the chart palette is kept but the muted bars drop to
    /// dark grey so they stay visible on a white canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),
            selected_bound: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Red),

            tab_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::DarkGray),

            chart_line: Style::default().fg(Color::Blue),
            chart_bar: Style::default().fg(Color::Blue),
            chart_bar_best: Style::default().fg(CHART_HIGHLIGHT),
            chart_bar_rest: Style::default().fg(Color::DarkGray),
            chart_axis: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Choose a theme from the detected terminal background. Unknown
    /// backgrounds get the dark theme.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Falls back to `auto_detect` for `"auto"`
    /// and unknown names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            _ => Self::auto_detect(),
        }
    }

    /// Bar style for the `rank`-th bar of a ranked chart: the first bar is
    /// highlighted, the rest are muted.
    pub fn ranked_bar_style(&self, rank: usize) -> Style {
        if rank == 0 {
            self.chart_bar_best
        } else {
            self.chart_bar_rest
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.chart_bar.fg, Some(CHART_PRIMARY));
        assert_eq!(t.chart_bar_best.fg, Some(CHART_HIGHLIGHT));
        assert_eq!(t.chart_bar_rest.fg, Some(CHART_MUTED));
        assert!(t.table_total.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.chart_bar_rest.fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        // "auto" and unknown names must not panic.
        assert!(Theme::from_name("auto").header.fg.is_some());
        assert!(Theme::from_name("neon").header.fg.is_some());
    }

    #[test]
    fn test_ranked_bar_style_highlights_first() {
        let t = Theme::dark();
        assert_eq!(t.ranked_bar_style(0), t.chart_bar_best);
        assert_eq!(t.ranked_bar_style(1), t.chart_bar_rest);
        assert_eq!(t.ranked_bar_style(9), t.chart_bar_rest);
    }

    #[test]
    fn test_background_from_colorfgbg() {
        assert_eq!(background_from_colorfgbg("15;0"), BackgroundType::Dark);
        assert_eq!(background_from_colorfgbg("0;15"), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg("0;7"), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg("0;99"), BackgroundType::Unknown);
        assert_eq!(background_from_colorfgbg("garbage"), BackgroundType::Unknown);
    }
}
