// crates/slidewin-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use slidewin_core::AtomicInterrupt;
use slidewin_scheduler::MonoidKind;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "slidewin",
    about = "Sliding-window aggregation over a CSV column",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Positional windows: `[p - before, p + after]`, clamped to `[0, n)`.
    Positional {
        /// Input CSV; one numeric column is aggregated.
        #[arg(long)]
        input: PathBuf,

        /// Output CSV; the input plus a `result` column.
        #[arg(long)]
        output: PathBuf,

        /// Column holding the values to aggregate.
        #[arg(long, default_value = "value")]
        value_col: String,

        /// Statistic to compute.
        #[arg(value_enum, long)]
        stat: StatOpt,

        /// `N` or `inf` for unbounded.
        #[arg(long, default_value = "0")]
        before: String,

        /// `N` or `inf` for unbounded.
        #[arg(long, default_value = "0")]
        after: String,

        /// Only every `step`-th output position is computed.
        #[arg(long, default_value_t = 1)]
        step: usize,

        /// Fill edge-truncated windows with NaN instead of computing them.
        #[arg(long, default_value_t = false)]
        complete: bool,

        /// Skip NaN values instead of propagating them.
        #[arg(long, default_value_t = false)]
        na_rm: bool,
    },

    /// Index-anchored windows: `{ j : starts[k] <= i[j] <= stops[k] }`.
    Index {
        /// Input CSV; a value column and an index column.
        #[arg(long)]
        input: PathBuf,

        /// Windows CSV with `start` and `stop` columns, one row per output
        /// peer group.
        #[arg(long)]
        windows: PathBuf,

        /// Output CSV; the input plus a `result` column.
        #[arg(long)]
        output: PathBuf,

        /// Column holding the values to aggregate.
        #[arg(long, default_value = "value")]
        value_col: String,

        /// Column holding the (assumed sorted) index key.
        #[arg(long, default_value = "index")]
        index_col: String,

        /// Statistic to compute.
        #[arg(value_enum, long)]
        stat: StatOpt,

        /// Fill edge-truncated peer groups with NaN instead of computing them.
        #[arg(long, default_value_t = false)]
        complete: bool,

        /// Skip NaN values instead of propagating them.
        #[arg(long, default_value_t = false)]
        na_rm: bool,
    },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum StatOpt {
    Sum,
    Prod,
    Mean,
    Min,
    Max,
}

impl From<StatOpt> for MonoidKind {
    fn from(s: StatOpt) -> Self {
        match s {
            StatOpt::Sum => Self::Sum,
            StatOpt::Prod => Self::Prod,
            StatOpt::Mean => Self::Mean,
            StatOpt::Min => Self::Min,
            StatOpt::Max => Self::Max,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let interrupt = AtomicInterrupt::new();
    let flag = interrupt.flag();
    ctrlc::set_handler(move || {
        warn!("interrupt received, aborting after the current check point");
        flag.store(true, std::sync::atomic::Ordering::Relaxed);
    })
    .context("installing Ctrl-C handler")?;

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Positional {
            input,
            output,
            value_col,
            stat,
            before,
            after,
            step,
            complete,
            na_rm,
        } => run_positional(&input, &output, &value_col, stat, &before, &after, step, complete, na_rm, &interrupt),

        Cmd::Index {
            input,
            windows,
            output,
            value_col,
            index_col,
            stat,
            complete,
            na_rm,
        } => run_index(&input, &windows, &output, &value_col, &index_col, stat, complete, na_rm, &interrupt),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}

/// Parse a `before`/`after` bound: `inf` (any case) for unbounded, else a
/// non-negative integer.
fn parse_bound(raw: &str) -> Result<Option<usize>> {
    if raw.eq_ignore_ascii_case("inf") {
        Ok(None)
    } else {
        raw.parse::<usize>()
            .with_context(|| format!("`{raw}` is neither `inf` nor a non-negative integer"))
            .map(Some)
    }
}

#[allow(clippy::too_many_arguments)]
fn run_positional(
    input: &std::path::Path,
    output: &std::path::Path,
    value_col: &str,
    stat: StatOpt,
    before: &str,
    after: &str,
    step: usize,
    complete: bool,
    na_rm: bool,
    interrupt: &AtomicInterrupt,
) -> Result<()> {
    let before = parse_bound(before)?;
    let after = parse_bound(after)?;

    let mut reader = csv::Reader::from_path(input).with_context(|| format!("opening {}", input.display()))?;
    let headers = reader.headers()?.clone();
    let value_idx = headers
        .iter()
        .position(|h| h == value_col)
        .with_context(|| format!("column `{value_col}` not found in {}", input.display()))?;

    let mut rows = Vec::new();
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        let v: f64 = record
            .get(value_idx)
            .context("missing value cell")?
            .parse()
            .context("value column must be numeric")?;
        values.push(v);
        rows.push(record);
    }

    info!(n = values.len(), stat = ?stat, "running positional slide");
    let result: MonoidKind = stat.into();
    let out = result.slide_with_interrupt(&values, before, after, step, complete, na_rm, interrupt)?;

    write_with_result_column(&headers, &rows, &out, output)
}

#[allow(clippy::too_many_arguments)]
fn run_index(
    input: &std::path::Path,
    windows: &std::path::Path,
    output: &std::path::Path,
    value_col: &str,
    index_col: &str,
    stat: StatOpt,
    complete: bool,
    na_rm: bool,
    interrupt: &AtomicInterrupt,
) -> Result<()> {
    let mut reader = csv::Reader::from_path(input).with_context(|| format!("opening {}", input.display()))?;
    let headers = reader.headers()?.clone();
    let value_idx = headers
        .iter()
        .position(|h| h == value_col)
        .with_context(|| format!("column `{value_col}` not found in {}", input.display()))?;
    let index_idx = headers
        .iter()
        .position(|h| h == index_col)
        .with_context(|| format!("column `{index_col}` not found in {}", input.display()))?;

    let mut rows = Vec::new();
    let mut values = Vec::new();
    let mut index = Vec::new();
    for record in reader.records() {
        let record = record?;
        let v: f64 = record.get(value_idx).context("missing value cell")?.parse().context("value column must be numeric")?;
        let k: i64 = record.get(index_idx).context("missing index cell")?.parse().context("index column must be a sortable integer")?;
        values.push(v);
        index.push(k);
        rows.push(record);
    }
    if index.windows(2).any(|w| w[0] > w[1]) {
        bail!("index column in {} is not sorted non-decreasing", input.display());
    }

    let mut window_reader = csv::Reader::from_path(windows).with_context(|| format!("opening {}", windows.display()))?;
    let window_headers = window_reader.headers()?.clone();
    let start_idx = window_headers.iter().position(|h| h == "start").context("windows file missing `start` column")?;
    let stop_idx = window_headers.iter().position(|h| h == "stop").context("windows file missing `stop` column")?;
    let mut starts = Vec::new();
    let mut stops = Vec::new();
    for record in window_reader.records() {
        let record = record?;
        starts.push(record.get(start_idx).context("missing start cell")?.parse::<i64>().context("start must be an integer")?);
        stops.push(record.get(stop_idx).context("missing stop cell")?.parse::<i64>().context("stop must be an integer")?);
    }

    let peer_sizes = peer_sizes_from_sorted_index(&index);

    info!(n = values.len(), m = starts.len(), stat = ?stat, "running index slide");
    let kind: MonoidKind = stat.into();
    let out = kind.slide_index_with_interrupt(&values, &index, &starts, &stops, &peer_sizes, complete, na_rm, interrupt)?;

    write_with_result_column(&headers, &rows, &out, output)
}

/// Convenience derivation for the CLI only: the engine's public API still
/// takes `peer_sizes` explicitly, this just spares CLI users from computing
/// run lengths by hand.
fn peer_sizes_from_sorted_index(index: &[i64]) -> Vec<usize> {
    let n = index.len();
    let mut sizes = vec![0usize; n];
    let mut pos = 0;
    while pos < n {
        let mut end = pos + 1;
        while end < n && index[end] == index[pos] {
            end += 1;
        }
        sizes[pos] = end - pos;
        pos = end;
    }
    sizes
}

fn write_with_result_column(
    headers: &csv::StringRecord,
    rows: &[csv::StringRecord],
    result: &[f64],
    output: &std::path::Path,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(output).with_context(|| format!("creating {}", output.display()))?;

    let mut out_headers: Vec<String> = headers.iter().map(String::from).collect();
    out_headers.push("result".to_string());
    writer.write_record(&out_headers)?;

    for (row, &value) in rows.iter().zip(result.iter()) {
        let mut fields: Vec<String> = row.iter().map(String::from).collect();
        fields.push(if value.is_nan() { "NaN".to_string() } else { value.to_string() });
        writer.write_record(&fields)?;
    }

    writer.flush().context("flushing output CSV")?;
    Ok(())
}
