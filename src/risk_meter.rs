//! Risk meter: a percentage bar with a categorical badge.

use crate::html_view::html_escape;

/// Width, in cells, of the text rendering of the bar.
pub const TEXT_BAR_WIDTH: usize = 30;

/// Clamps `x` into [0, 1]. NaN is treated as 0.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

/// A rendered-ready view of a risk score and level.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskMeter {
    percent: u8,
    level: String,
}

impl RiskMeter {
    pub fn new(score: f64, level: &str) -> Self {
        // floor(x + 0.5) rounds halves up, matching the usual percentage display.
        let percent = (clamp01(score) * 100.0 + 0.5).floor() as u8;
        Self {
            percent,
            level: level.to_string(),
        }
    }

    /// Integer percentage in 0..=100.
    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    /// Text shown in the badge.
    pub fn badge(&self) -> String {
        self.level.to_uppercase()
    }

    /// Number of filled cells out of `width`.
    pub fn filled_cells(&self, width: usize) -> usize {
        (usize::from(self.percent) * width + 50) / 100
    }

    pub fn render_text(&self) -> String {
        let filled = self.filled_cells(TEXT_BAR_WIDTH);
        format!(
            "Risk score  [{badge}]\n[{bar}{rest}]\n0%{pct:>width$}%{end:>6}",
            badge = self.badge(),
            bar = "█".repeat(filled),
            rest = "░".repeat(TEXT_BAR_WIDTH - filled),
            pct = self.percent,
            width = TEXT_BAR_WIDTH / 2,
            end = "100%",
        )
    }

    pub fn render_html(&self) -> String {
        format!(
            r#"<div class="meter">
  <div class="meterHeader">
    <div class="meterTitle">Risk score</div>
    <div class="pill pill-{level}">{badge}</div>
  </div>
  <div class="barOuter">
    <div class="barInner" style="width: {pct}%"></div>
  </div>
  <div class="meterFooter">
    <span>0%</span>
    <span class="pct">{pct}%</span>
    <span>100%</span>
  </div>
</div>"#,
            level = html_escape(&self.level),
            badge = html_escape(&self.badge()),
            pct = self.percent,
        )
    }
}
