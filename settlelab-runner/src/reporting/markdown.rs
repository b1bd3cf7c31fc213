//! Markdown report generator.
//!
//! Pure formatting over a `BacktestResult` — every number here was already
//! computed and rounded by the statistics engines; this layer only adds
//! labels, percent signs, and table plumbing.

use crate::benchmark::BenchmarkEntry;
use crate::metrics::PerformanceStats;
use crate::runner::BacktestResult;

/// Render the full run report.
pub fn render_report(result: &BacktestResult) -> String {
    let mut report = format!(
        "# Settlement-Day Pattern Backtest Report\n\n\
Run ID: `{}`\n\n\
Period: {} to {}\n\n",
        result.run_id, result.start_date, result.end_date
    );

    if result.is_synthetic {
        report.push_str("**WARNING: results based on SYNTHETIC data.**\n\n");
    }

    report.push_str(&format!(
        "## Summary\n\
- Events: {} ({} skipped)\n\
- Trades: {}\n\
- Net Profit: {:+.2}%\n\
- Win Rate: {:.1}%\n\
- Kelly: {:.1}%\n\
- Max Drawdown: {:.1}%\n",
        result.event_count,
        result.skipped_events,
        result.stats.trade_count,
        result.stats.net_profit,
        result.stats.win_rate,
        result.stats.kelly,
        result.stats.max_drawdown,
    ));

    if result.stats.is_empty() {
        report.push_str("\nNo trades were generated in this window.\n");
        return report;
    }

    report.push_str("\n## Performance\n\n");
    report.push_str("| Metric | Value |\n|--------|-------|\n");
    let stats = &result.stats;
    for (label, value) in [
        ("Net Profit", format!("{:+.2}%", stats.net_profit)),
        ("Total Profit", format!("{:+.2}%", stats.total_profit)),
        ("Total Loss", format!("{:+.2}%", stats.total_loss)),
        ("Max Single Profit", format!("{:+.2}%", stats.max_profit)),
        ("Max Single Loss", format!("{:+.2}%", stats.max_loss)),
        ("Wins / Losses / Breakeven", format!(
            "{} / {} / {}",
            stats.win_count, stats.loss_count, stats.breakeven_count
        )),
        ("Avg Win", format!("{:+.2}%", stats.avg_win)),
        ("Avg Loss", format!("{:+.2}%", stats.avg_loss)),
        ("Avg Trade", format!("{:+.2}%", stats.avg_trade)),
        ("Win Rate", format!("{:.1}%", stats.win_rate)),
        ("Profit/Loss Ratio", format!("{:.3}", stats.profit_loss_ratio)),
        ("Kelly", format!("{:.1}%", stats.kelly)),
        ("Max Drawdown", format!("{:.1}%", stats.max_drawdown)),
        ("Event Rate", format!("{:.1}%", stats.event_rate)),
    ] {
        report.push_str(&format!("| {label} | {value} |\n"));
    }

    report.push_str("\n## Risk\n\n");
    report.push_str("| Metric | Value |\n|--------|-------|\n");
    let risk = &result.risk;
    for (label, value) in [
        ("Annualized Return", format!("{:+.2}%", risk.annualized_return)),
        ("Volatility", format!("{:.2}%", risk.volatility)),
        ("Sharpe", format!("{:.3}", risk.sharpe_ratio)),
        ("Sortino", format_ratio(risk.sortino_ratio)),
        ("Calmar", format!("{:.3}", risk.calmar_ratio)),
        ("VaR 95%", format!("{:.2}%", risk.var_95)),
        ("CVaR 95%", format!("{:.2}%", risk.cvar_95)),
        (
            "Max Consecutive Losses",
            format!("{}", risk.max_consecutive_losses),
        ),
    ] {
        report.push_str(&format!("| {label} | {value} |\n"));
    }

    report.push_str("\n## Filter Analysis\n");
    for (dimension, categories) in &result.filters {
        report.push_str(&format!("\n### {}\n\n", title_case(dimension)));
        report.push_str("| Condition | Win Rate | Avg Trade | Trades |\n");
        report.push_str("|-----------|----------|-----------|--------|\n");
        for (label, stats) in categories {
            report.push_str(&format_filter_row(label, stats));
        }
    }

    if !result.seasonal.monthly.is_empty() {
        report.push_str("\n## Seasonal\n\n### Monthly\n\n");
        report.push_str("| Month | Win Rate | Avg P&L | Trades |\n");
        report.push_str("|-------|----------|---------|--------|\n");
        for (month, bucket) in &result.seasonal.monthly {
            report.push_str(&format!(
                "| {} | {:.1}% | {:+.2}% | {} |\n",
                month, bucket.win_rate, bucket.avg_pnl, bucket.trade_count
            ));
        }
        report.push_str("\n### Quarterly\n\n");
        report.push_str("| Quarter | Win Rate | Avg P&L | Trades |\n");
        report.push_str("|---------|----------|---------|--------|\n");
        for (quarter, bucket) in &result.seasonal.quarterly {
            report.push_str(&format!(
                "| Q{} | {:.1}% | {:+.2}% | {} |\n",
                quarter, bucket.win_rate, bucket.avg_pnl, bucket.trade_count
            ));
        }
    }

    report.push_str(&format!(
        "\n## Volatility\n\n\
- Event-day volatility: {:.2}%\n\
- Baseline volatility: {:.2}%\n\
- Ratio: {:.2}\n",
        result.volatility.event_day_volatility,
        result.volatility.baseline_volatility,
        result.volatility.ratio,
    ));

    report.push_str(
        "\n## Notes\n\
- The full trade ledger is exported alongside this report.\n",
    );

    report
}

/// Render the weekday benchmark comparison, settlement row first.
pub fn render_benchmark_table(
    settlement: &PerformanceStats,
    entries: &[BenchmarkEntry],
) -> String {
    let mut table = String::from(
        "| Pattern | Net Profit | Win Rate | Avg Trade | P/L Ratio | Trades | Kelly |\n\
|---------|-----------|----------|-----------|-----------|--------|-------|\n",
    );
    table.push_str(&format_benchmark_row("settlement", settlement));
    for entry in entries {
        table.push_str(&format_benchmark_row(&entry.weekday, &entry.stats));
    }
    table
}

fn format_benchmark_row(label: &str, stats: &PerformanceStats) -> String {
    format!(
        "| {} | {:+.2}% | {:.1}% | {:+.2}% | {:.3} | {} | {:.1}% |\n",
        label,
        stats.net_profit,
        stats.win_rate,
        stats.avg_trade,
        stats.profit_loss_ratio,
        stats.trade_count,
        stats.kelly
    )
}

fn format_filter_row(label: &str, stats: &PerformanceStats) -> String {
    if stats.is_empty() {
        return format!("| {label} | - | - | 0 |\n");
    }
    format!(
        "| {} | {:.1}% | {:+.2}% | {} |\n",
        label, stats.win_rate, stats.avg_trade, stats.trade_count
    )
}

fn format_ratio(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{value:.3}")
    }
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
