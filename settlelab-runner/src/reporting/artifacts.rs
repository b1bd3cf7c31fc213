//! Artifact export: result JSON, trade tape CSV, and the markdown report,
//! written into a per-run output directory.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use settlelab_core::domain::{TradeDirection, TradeRecord};

use crate::reporting::markdown::render_report;
use crate::runner::BacktestResult;

/// Paths of everything one run export produced.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub run_dir: PathBuf,
    pub result_json: PathBuf,
    pub trades_csv: PathBuf,
    pub report_markdown: PathBuf,
}

/// Write the full artifact set under `output_dir/<run-id-prefix>/`.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<ArtifactPaths> {
    let run_dir = output_dir.join(&result.run_id[..result.run_id.len().min(12)]);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create run directory {}", run_dir.display()))?;

    let result_json = run_dir.join("result.json");
    let json = serde_json::to_string_pretty(result).context("failed to serialize result")?;
    std::fs::write(&result_json, json)
        .with_context(|| format!("failed to write {}", result_json.display()))?;

    let trades_csv = run_dir.join("trades.csv");
    write_trades_csv(&trades_csv, &result.trades)?;

    let report_markdown = run_dir.join("report.md");
    std::fs::write(&report_markdown, render_report(result))
        .with_context(|| format!("failed to write {}", report_markdown.display()))?;

    Ok(ArtifactPaths {
        run_dir,
        result_json,
        trades_csv,
        report_markdown,
    })
}

fn write_trades_csv(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create trades CSV {}", path.display()))?;

    writeln!(
        file,
        "event_date,event_kind,opening_day,previous_day,direction,opening_price,previous_close,\
trend_indicator,entry_price,exit_price,pnl_percent,prior_candle_bullish,gapped_up,body_to_range_ratio"
    )?;

    for trade in trades {
        let direction = match trade.direction {
            TradeDirection::Long => "long",
            TradeDirection::Short => "short",
            TradeDirection::NoTrade => "no_trade",
        };
        writeln!(
            file,
            "{},{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.4},{},{},{:.4}",
            trade.event_date,
            trade.event_kind.label(),
            trade.opening_day,
            trade.previous_day,
            direction,
            trade.opening_price,
            trade.previous_close,
            trade.trend_indicator,
            trade.entry_price,
            trade.exit_price,
            trade.pnl_percent,
            trade.prior_candle_bullish,
            trade.gapped_up,
            trade.body_to_range_ratio
        )?;
    }

    Ok(())
}
