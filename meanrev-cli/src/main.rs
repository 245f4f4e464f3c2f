//! MeanRev CLI — run a single backtest or a parameter sweep.
//!
//! Commands:
//! - `run` — one backtest over a CSV file or synthetic bars; prints the
//!   result record and optionally writes a JSON report
//! - `optimize` — grid sweep; prints the ranked table plus a failure
//!   listing and writes the ranked results as CSV

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use meanrev_core::ParamSet;
use meanrev_runner::{
    export, load_csv_bars, run_single_backtest, synthetic_bars, LoadOptions, LoadedBars,
    ParamSweep, RankingKey, SweepConfig,
};

#[derive(Parser)]
#[command(
    name = "meanrev",
    about = "MeanRev CLI — mean-reversion backtesting and grid optimization"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by both commands: where the bars come from and which
/// config file to apply.
#[derive(Args)]
struct CommonOpts {
    /// CSV file with Date,Open,High,Low,Close,Volume columns.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Generate this many synthetic bars instead of reading a CSV.
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for synthetic bar generation.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Keep only bars on or after this date (YYYY-MM-DD).
    #[arg(long)]
    start: Option<String>,

    /// Keep only bars on or before this date (YYYY-MM-DD).
    #[arg(long)]
    end: Option<String>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a single backtest and print the result record.
    Run {
        #[command(flatten)]
        common: CommonOpts,

        /// Write the full JSON report to this path.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Sweep the parameter grid and print the ranked result table.
    Optimize {
        #[command(flatten)]
        common: CommonOpts,

        /// Ranking key: end_capital, winrate, drawdown, or total_trades.
        #[arg(long)]
        rank_by: Option<String>,

        /// Run combinations sequentially instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Output CSV path for the ranked results.
        #[arg(long, default_value = "results/optimization_results.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { common, output } => run_cmd(common, output),
        Commands::Optimize {
            common,
            rank_by,
            sequential,
            output,
        } => optimize_cmd(common, rank_by, sequential, output),
    }
}

fn run_cmd(common: CommonOpts, output: Option<PathBuf>) -> Result<()> {
    let config = load_config(common.config.as_deref())?;
    let loaded = load_data(&common)?;

    let report = run_single_backtest(
        &loaded.bars,
        &config.strategy,
        &ParamSet::new(),
        &config.backtest,
        &loaded.dataset_hash,
    )
    .with_context(|| "backtest failed")?;

    println!(
        "bars: {} (warmup {}) | initial capital: {:.2}",
        report.bar_count, report.warmup_bars, report.initial_capital
    );
    println!("{}", export::format_backtest_record(&report.summary));
    println!("run id: {}", report.run_id);

    if let Some(path) = output {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create '{}'", parent.display()))?;
            }
        }
        std::fs::write(&path, export::export_json(&report)?)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        println!("report saved to {}", path.display());
    }

    Ok(())
}

fn optimize_cmd(
    common: CommonOpts,
    rank_by: Option<String>,
    sequential: bool,
    output: PathBuf,
) -> Result<()> {
    let config = load_config(common.config.as_deref())?;
    let loaded = load_data(&common)?;
    let grid = config.grid();

    let ranking = match rank_by {
        Some(key) => key
            .parse::<RankingKey>()
            .map_err(|message| anyhow::anyhow!(message))?,
        None => config.sweep.rank_by,
    };

    let sweep = ParamSweep::new(config.strategy.clone(), config.backtest.clone())
        .with_ranking(ranking)
        .with_parallelism(config.sweep.parallel && !sequential);

    println!(
        "sweeping {} combinations over {} bars",
        grid.size(),
        loaded.bars.len()
    );
    let outcome = sweep
        .sweep(&loaded.bars, &grid)
        .with_context(|| "sweep failed")?;

    let names = grid.names();
    if outcome.ranked.is_empty() {
        println!("no successful combinations");
    } else {
        println!("{}", export::format_results_table(&names, &outcome.ranked));
    }

    if !outcome.failures.is_empty() {
        println!("failed combinations:");
        print!("{}", export::format_failures(&outcome.failures));
    }

    export::write_results_csv(&output, &names, &outcome.ranked)?;
    println!("results saved to {}", output.display());

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SweepConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            Ok(SweepConfig::from_toml(&text)?)
        }
        None => Ok(SweepConfig::default()),
    }
}

fn load_data(common: &CommonOpts) -> Result<LoadedBars> {
    let opts = LoadOptions {
        start: parse_date(common.start.as_deref())?,
        end: parse_date(common.end.as_deref())?,
    };

    let loaded = match (&common.data, common.synthetic) {
        (Some(path), _) => load_csv_bars(path, &opts)
            .with_context(|| format!("failed to load bars from '{}'", path.display()))?,
        (None, Some(n)) => synthetic_bars(n, common.seed),
        (None, None) => bail!("provide --data <csv> or --synthetic <bars>"),
    };

    if loaded.dropped_rows > 0 {
        eprintln!(
            "WARNING: dropped {} malformed row(s) from input",
            loaded.dropped_rows
        );
    }

    Ok(loaded)
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{v}' (expected YYYY-MM-DD)"))
        })
        .transpose()
}
