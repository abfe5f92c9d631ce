mod format;

use chrono::{DateTime, Local};
use crossterm::style::{Attribute, Color, Stylize, style};
use gauge_core::{ModelQuotaRecord, QuotaSnapshot, ResourceStatus, Tier};
use unicode_width::UnicodeWidthStr;

pub use format::{BarLevel, bar_level, filled_cells, group_thousands};

const TOP_LEFT: &str = "╔";
const TOP_RIGHT: &str = "╗";
const BOTTOM_LEFT: &str = "╚";
const BOTTOM_RIGHT: &str = "╝";
const HORIZONTAL: &str = "═";
const VERTICAL: &str = "║";
const T_RIGHT: &str = "╠";
const T_LEFT: &str = "╣";
const BAR_FILLED: &str = "█";
const BAR_EMPTY: &str = "░";

pub const DEFAULT_WIDTH: usize = 70;
pub const DEFAULT_BAR_WIDTH: usize = 20;
pub const DEFAULT_TITLE: &str = "Quota Gauge";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    Plain,
    Bold,
    Dim,
    Red,
    Yellow,
    Green,
}

/// Builds the dashboard frame as text. Has no terminal side effects; the only
/// time-dependent input is `updated_at`.
#[derive(Debug, Clone)]
pub struct DashboardRenderer {
    pub width: usize,
    pub bar_width: usize,
    pub color: bool,
    pub title: String,
}

impl Default for DashboardRenderer {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            bar_width: DEFAULT_BAR_WIDTH,
            color: true,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl DashboardRenderer {
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }

    pub fn render(
        &self,
        snapshot: &QuotaSnapshot,
        status: &ResourceStatus,
        updated_at: DateTime<Local>,
    ) -> String {
        let mut lines = vec![self.title_line(), self.blank()];
        if snapshot.records.is_empty() {
            lines.push(self.row(
                self.line()
                    .push(" No recognized models found in the store", Paint::Dim),
            ));
            lines.push(self.blank());
        }
        for record in &snapshot.records {
            lines.extend(self.model_block(record));
            lines.push(self.blank());
        }
        lines.push(self.rule(T_RIGHT, T_LEFT));
        lines.extend(self.status_block(status));
        lines.push(self.rule(T_RIGHT, T_LEFT));
        lines.push(self.row(self.line().push(
            &format!(" Last Updated: {}", updated_at.format("%Y-%m-%d %H:%M:%S")),
            Paint::Plain,
        )));
        lines.push(self.row(
            self.line()
                .push(" Data Source: ", Paint::Plain)
                .push(&snapshot.source, Paint::Dim),
        ));
        lines.push(self.rule(BOTTOM_LEFT, BOTTOM_RIGHT));
        lines.join("\n")
    }

    fn model_block(&self, record: &ModelQuotaRecord) -> Vec<String> {
        let remaining = record
            .remaining
            .map(group_thousands)
            .unwrap_or_else(|| "unknown".to_string());
        let quota = record
            .limit
            .map(group_thousands)
            .unwrap_or_else(|| "unknown".to_string());
        let percent = record.percent_used();

        let mut progress = self.line().push("   Progress:  [", Paint::Plain);
        let filled = percent.map_or(0, |value| filled_cells(value, self.bar_width));
        let fill_paint = match percent.map(bar_level) {
            Some(BarLevel::Warning) => Paint::Red,
            Some(BarLevel::Caution) => Paint::Yellow,
            _ => Paint::Green,
        };
        progress = progress
            .push(&BAR_FILLED.repeat(filled), fill_paint)
            .push(&BAR_EMPTY.repeat(self.bar_width - filled), Paint::Dim)
            .push("] ", Paint::Plain)
            .push(
                &percent.map_or_else(|| "n/a".to_string(), |value| format!("{value:.1}% used")),
                Paint::Plain,
            );

        vec![
            self.row(
                self.line()
                    .push(" ", Paint::Plain)
                    .push(&record.identity, Paint::Bold),
            ),
            self.row(
                self.line()
                    .push("   Remaining: ", Paint::Plain)
                    .push(&remaining, Paint::Green)
                    .push(&format!(" / Quota: {} {}", quota, record.units), Paint::Plain),
            ),
            self.row(progress),
        ]
    }

    fn status_block(&self, status: &ResourceStatus) -> Vec<String> {
        let tier_paint = match status.tier {
            Tier::Green => Paint::Green,
            Tier::Yellow => Paint::Yellow,
            Tier::Red => Paint::Red,
            Tier::Unknown => Paint::Dim,
        };
        let mut headline = self
            .line()
            .push(" Status: ", Paint::Plain)
            .push(status.tier.as_str(), tier_paint);
        if status.tier != Tier::Unknown {
            headline = headline.push(
                &format!("  (high-tier quota {})", group_thousands(status.high_quota)),
                Paint::Plain,
            );
        }
        vec![
            self.row(headline),
            self.row(self.line().push(
                &format!(" Recommendation: {}", status.recommendation),
                Paint::Bold,
            )),
            self.row(
                self.line()
                    .push(" Reasoning: ", Paint::Plain)
                    .push(&status.reasoning, Paint::Dim),
            ),
        ]
    }

    fn inner_width(&self) -> usize {
        self.width.saturating_sub(2)
    }

    fn line(&self) -> Line {
        Line {
            text: String::new(),
            width: 0,
            color: self.color,
        }
    }

    fn row(&self, line: Line) -> String {
        let pad = self.inner_width().saturating_sub(line.width);
        format!("{VERTICAL}{}{}{VERTICAL}", line.text, " ".repeat(pad))
    }

    fn blank(&self) -> String {
        self.row(self.line())
    }

    fn rule(&self, left: &str, right: &str) -> String {
        format!("{left}{}{right}", HORIZONTAL.repeat(self.inner_width()))
    }

    fn title_line(&self) -> String {
        let title_width = self.title.width() + 2;
        let remaining = self.inner_width().saturating_sub(title_width);
        let left = remaining / 2;
        let right = remaining - left;
        let title = self.line().push(&format!(" {} ", self.title), Paint::Bold);
        format!(
            "{TOP_LEFT}{}{}{}{TOP_RIGHT}",
            HORIZONTAL.repeat(left),
            title.text,
            HORIZONTAL.repeat(right)
        )
    }
}

/// Row content plus its display width, so padding ignores escape codes.
struct Line {
    text: String,
    width: usize,
    color: bool,
}

impl Line {
    fn push(mut self, segment: &str, paint: Paint) -> Self {
        self.width += segment.width();
        if !self.color || paint == Paint::Plain || segment.is_empty() {
            self.text.push_str(segment);
            return self;
        }
        let styled = match paint {
            Paint::Bold => style(segment).attribute(Attribute::Bold),
            Paint::Dim => style(segment).attribute(Attribute::Dim),
            Paint::Red => style(segment).with(Color::Red),
            Paint::Yellow => style(segment).with(Color::Yellow),
            Paint::Green => style(segment).with(Color::Green),
            Paint::Plain => style(segment),
        };
        self.text.push_str(&styled.to_string());
        self
    }
}
