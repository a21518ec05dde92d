use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::{config::DashboardSection, pipeline::DashboardParams};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Daily price dashboard: moving averages, returns and volatility for one ticker"
)]
pub struct Cli {
    /// Path to a TOML config file (falls back to $STOCK_DASHBOARD_CONFIG)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ticker symbol (e.g. "AAPL", "VOLV-B.ST")
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// First day to include, YYYY-MM-DD
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// First day to exclude, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Leave the 20-day moving average out of the table
    #[arg(long)]
    pub hide_ma20: bool,

    /// Leave the 50-day moving average out of the table
    #[arg(long)]
    pub hide_ma50: bool,

    /// Number of trailing rows in the table preview
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Also write the full enriched series and metrics as JSON
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

impl Cli {
    /// Merges flags over config values; `today` fills in a missing end date.
    pub fn params(&self, defaults: &DashboardSection, today: NaiveDate) -> DashboardParams {
        DashboardParams {
            ticker: self.ticker.clone().unwrap_or_else(|| defaults.ticker.clone()),
            start: self.start.unwrap_or(defaults.start),
            end: self.end.or(defaults.end).unwrap_or(today),
            show_ma20: defaults.show_ma20 && !self.hide_ma20,
            show_ma50: defaults.show_ma50 && !self.hide_ma50,
        }
    }

    pub fn preview_rows(&self, defaults: &DashboardSection) -> usize {
        self.rows.unwrap_or(defaults.preview_rows)
    }
}
