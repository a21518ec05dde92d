//! Plain-text presentation of a [`DashboardView`].

use indicator_engine::{EnrichedBar, SummaryMetrics};

use crate::pipeline::DashboardView;

const LABEL_WIDTH: usize = 20;
const MISSING: &str = "-";

/// The four headline figures, one per line.
pub fn render_metrics(metrics: &SummaryMetrics) -> String {
    let volatility = metrics
        .annualized_volatility_pct
        .map(|v| format!("{v:.2}%"))
        .unwrap_or_else(|| "n/a".to_string());

    [
        ("Latest close", format!("${:.2}", metrics.latest_close)),
        ("Daily change", format!("{:+.2}%", metrics.daily_change_pct)),
        ("Volatility (annual)", volatility),
        ("Trading days", metrics.trading_day_count.to_string()),
    ]
    .iter()
    .map(|(label, value)| format!("{label:<LABEL_WIDTH$} {value}"))
    .collect::<Vec<_>>()
    .join("\n")
}

fn optional(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    value.map(render).unwrap_or_else(|| MISSING.to_string())
}

/// Table of enriched rows; the MA columns follow the display toggles.
pub fn render_table(rows: &[EnrichedBar], show_ma20: bool, show_ma50: bool) -> String {
    let mut header = format!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    if show_ma20 {
        header.push_str(&format!(" {:>10}", "MA20"));
    }
    if show_ma50 {
        header.push_str(&format!(" {:>10}", "MA50"));
    }
    header.push_str(&format!(" {:>9}", "Return"));

    let mut out = header;
    for row in rows {
        let bar = &row.bar;
        out.push_str(&format!(
            "\n{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
        if show_ma20 {
            out.push_str(&format!(" {:>10}", optional(row.ma20, |v| format!("{v:.2}"))));
        }
        if show_ma50 {
            out.push_str(&format!(" {:>10}", optional(row.ma50, |v| format!("{v:.2}"))));
        }
        out.push_str(&format!(
            " {:>9}",
            optional(row.daily_return, |r| format!("{:+.2}%", r * 100.0))
        ));
    }
    out
}

/// Title, metrics panel, and the trailing `preview_rows` of the table.
pub fn render_dashboard(view: &DashboardView, preview_rows: usize) -> String {
    let params = &view.params;
    let preview = view.preview(preview_rows);

    format!(
        "{} daily prices, {} to {}\n\n{}\n\nLast {} of {} trading days\n{}\n",
        view.enriched.symbol(),
        params.start,
        params.end,
        render_metrics(&view.metrics),
        preview.len(),
        view.enriched.len(),
        render_table(preview, params.show_ma20, params.show_ma50),
    )
}
