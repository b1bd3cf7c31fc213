//! SettleLab CLI — settlement-day pattern backtesting.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config file or inline flags
//! - `benchmark` — compare the settlement pattern against every other weekday
//! - `max-pain` — compute the max-pain strike from an open-interest CSV

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use settlelab_core::data::BarTable;
use settlelab_runner::max_pain::{load_open_interest_csv, max_pain_strike, DEFAULT_STRIKE_STEP};
use settlelab_runner::{
    load_bars, render_benchmark_table, run_single_backtest, run_weekday_benchmarks,
    save_artifacts, BacktestConfig, BacktestResult, LoadOptions,
};

#[derive(Parser)]
#[command(
    name = "settlelab",
    about = "SettleLab — settlement-day pattern backtest engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file or inline flags.
    Run {
        #[command(flatten)]
        common: CommonArgs,

        /// Output directory for artifacts (result.json, trades.csv, report.md).
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Skip artifact export and only print the console summary.
        #[arg(long, default_value_t = false)]
        no_artifacts: bool,
    },
    /// Replay the strategy on every other weekday and compare.
    Benchmark {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Compute the max-pain strike from an open-interest CSV.
    MaxPain {
        /// Normalized CSV with columns date,strike,option_type,open_interest.
        file: PathBuf,

        /// Strike grid spacing.
        #[arg(long, default_value_t = DEFAULT_STRIKE_STEP)]
        strike_step: f64,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Path to a TOML config file. Inline flags below are ignored when set.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Normalized bar CSV (date,session,open,high,low,close,volume).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Start date (YYYY-MM-DD).
    #[arg(long, default_value = "2017-05-16")]
    start: String,

    /// End date (YYYY-MM-DD).
    #[arg(long, default_value = "2024-12-31")]
    end: String,

    /// Settlement weekday (mon..sun).
    #[arg(long, default_value = "wed")]
    weekday: String,

    /// Settlement counting period: weekly, monthly.
    #[arg(long, default_value = "weekly")]
    counting_period: String,

    /// Opening price calculation: standard, night.
    #[arg(long, default_value = "standard")]
    opening_price_calc: String,

    /// Previous close calculation: standard, night, settlement_open.
    #[arg(long, default_value = "standard")]
    prev_close_calc: String,

    /// Event cadence for risk annualization.
    #[arg(long, default_value_t = 52.0)]
    periods_per_year: f64,

    /// Use deterministic synthetic bars when no data file is given.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            common,
            output_dir,
            no_artifacts,
        } => run_cmd(common, output_dir, no_artifacts),
        Commands::Benchmark { common } => benchmark_cmd(common),
        Commands::MaxPain { file, strike_step } => max_pain_cmd(file, strike_step),
    }
}

fn build_config(common: &CommonArgs) -> Result<BacktestConfig> {
    if let Some(path) = &common.config {
        return Ok(BacktestConfig::from_file(path)?);
    }

    // Route inline flags through the same TOML path as config files.
    let data_line = match &common.data {
        Some(path) => format!("data = {:?}\n", path.display().to_string()),
        None => String::new(),
    };
    let toml = format!(
        "[backtest]\n\
start_date = \"{}\"\n\
end_date = \"{}\"\n\
event_weekday = \"{}\"\n\
counting_period = \"{}\"\n\
opening_price_calc = \"{}\"\n\
prev_close_calc = \"{}\"\n\
periods_per_year = {}\n\
{}",
        common.start,
        common.end,
        common.weekday,
        common.counting_period,
        common.opening_price_calc,
        common.prev_close_calc,
        common.periods_per_year,
        data_line,
    );
    Ok(BacktestConfig::from_toml(&toml)?)
}

fn load_for(config: &BacktestConfig, common: &CommonArgs) -> Result<settlelab_runner::LoadedBars> {
    let resolved = config.resolve()?;
    let opts = LoadOptions {
        path: config.backtest.data.clone(),
        start: resolved.start_date,
        end: resolved.end_date,
        synthetic: common.synthetic,
    };
    Ok(load_bars(&opts)?)
}

fn run_cmd(common: CommonArgs, output_dir: PathBuf, no_artifacts: bool) -> Result<()> {
    let config = build_config(&common)?;
    let loaded = load_for(&config, &common)?;

    let result = run_single_backtest(&config, &loaded)?;
    print_summary(&result);

    if result.stats.is_empty() {
        println!("No trades were generated in this window.");
    }

    if !no_artifacts {
        let paths = save_artifacts(&result, &output_dir)?;
        println!("Artifacts saved to: {}", paths.run_dir.display());
    }

    Ok(())
}

fn benchmark_cmd(common: CommonArgs) -> Result<()> {
    let config = build_config(&common)?;
    let loaded = load_for(&config, &common)?;
    let resolved = config.resolve()?;

    let table = BarTable::from_bars(loaded.bars.clone(), resolved.start_date, resolved.end_date)?;
    let settlement = run_single_backtest(&config, &loaded)?;
    let entries = run_weekday_benchmarks(&table, &resolved.engine);

    println!();
    println!("=== Weekday Benchmark ===");
    println!(
        "Period:         {} to {}",
        settlement.start_date, settlement.end_date
    );
    println!();
    print!("{}", render_benchmark_table(&settlement.stats, &entries));

    // Is the settlement pattern actually special?
    let best = entries
        .iter()
        .max_by(|a, b| {
            a.stats
                .net_profit
                .partial_cmp(&b.stats.net_profit)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(best) = best {
        println!();
        if settlement.stats.net_profit > best.stats.net_profit {
            println!("Settlement day outperforms every fixed weekday.");
        } else {
            println!(
                "{} outperforms the settlement day ({:+.2}% vs {:+.2}%).",
                best.weekday, best.stats.net_profit, settlement.stats.net_profit
            );
        }
    }

    Ok(())
}

fn max_pain_cmd(file: PathBuf, strike_step: f64) -> Result<()> {
    if !file.exists() {
        bail!("file not found: {}", file.display());
    }

    let rows = load_open_interest_csv(&file)?;
    match max_pain_strike(&rows, strike_step)? {
        Some(strike) => {
            println!("Max pain strike: {strike:.0}");
            Ok(())
        }
        None => bail!("no open interest found in {}", file.display()),
    }
}

fn print_summary(result: &BacktestResult) {
    println!();
    println!("=== Backtest Result ===");
    println!("Run ID:         {}", &result.run_id[..12]);
    println!(
        "Period:         {} to {}",
        result.start_date, result.end_date
    );
    println!(
        "Events:         {} ({} skipped)",
        result.event_count, result.skipped_events
    );
    println!("Trades:         {}", result.stats.trade_count);
    println!();
    println!("--- Performance ---");
    println!("Net Profit:     {:+.2}%", result.stats.net_profit);
    println!("Win Rate:       {:.1}%", result.stats.win_rate);
    println!("Avg Trade:      {:+.2}%", result.stats.avg_trade);
    println!("P/L Ratio:      {:.3}", result.stats.profit_loss_ratio);
    println!("Kelly:          {:.1}%", result.stats.kelly);
    println!("Max Drawdown:   {:.1}%", result.stats.max_drawdown);
    println!("Event Rate:     {:.1}%", result.stats.event_rate);
    println!();
    println!("--- Risk ---");
    println!("Annual Return:  {:+.2}%", result.risk.annualized_return);
    println!("Volatility:     {:.2}%", result.risk.volatility);
    println!("Sharpe:         {:.3}", result.risk.sharpe_ratio);
    if result.risk.sortino_ratio.is_finite() {
        println!("Sortino:        {:.3}", result.risk.sortino_ratio);
    } else {
        println!("Sortino:        inf");
    }
    println!("Calmar:         {:.3}", result.risk.calmar_ratio);
    println!("VaR 95%:        {:.2}%", result.risk.var_95);
    println!("CVaR 95%:       {:.2}%", result.risk.cvar_95);
    println!("Max Loss Streak:{}", result.risk.max_consecutive_losses);
    if result.is_synthetic {
        println!();
        println!("WARNING: results based on SYNTHETIC data");
    }
    println!();
}
