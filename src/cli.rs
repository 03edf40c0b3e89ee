//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;

use crate::adapters::csv_adapter::{CsvPriceAdapter, load_price_file};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{self, Analysis, CrossParams, format_date_for_display};
use crate::domain::error::SigdashError;
use crate::domain::params::{
    SIMULATION_SECTION, SimulationSettings, StrategyOverrides, StrategyParams,
};
use crate::domain::price::PriceSeries;
use crate::domain::signal::Signal;
use crate::domain::simulator::{SimulationReport, Simulator};
use crate::domain::summary::SimulationSummary;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "sigdash", about = "Trading signal dashboard and portfolio simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where price history comes from.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Ticker symbol
    #[arg(long)]
    pub symbol: Option<String>,
    /// Explicit price CSV file (timestamp,price columns)
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Directory holding <SYMBOL>.csv files
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
    /// Lookback period: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, max
    #[arg(long, default_value = "1y")]
    pub period: String,
    /// Fetch from Yahoo Finance instead of CSV files
    #[cfg(feature = "yahoo")]
    #[arg(long)]
    pub yahoo: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a price history through a strategy
    Simulate {
        #[command(flatten)]
        data: DataArgs,
        #[arg(short, long, default_value = "simple")]
        strategy: String,
        /// INI parameter file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Buy when price is this fraction below the moving average
        #[arg(long)]
        buy: Option<f64>,
        /// Sell when price is this fraction above the moving average
        #[arg(long)]
        sell: Option<f64>,
        /// Moving-average window
        #[arg(long)]
        window: Option<usize>,
        #[arg(long)]
        initial_balance: Option<f64>,
        #[arg(long)]
        user_id: Option<String>,
        /// Write the decision log as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute indicators and the signal overlay
    Analyze {
        #[command(flatten)]
        data: DataArgs,
        #[arg(short, long, default_value = "simple")]
        strategy: String,
        /// INI parameter file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Moving-average window
        #[arg(long)]
        sma_window: Option<usize>,
        /// Oscillator window
        #[arg(long)]
        rsi_window: Option<usize>,
        /// Oscillator level below which a rebound is a buy
        #[arg(long)]
        oversold: Option<f64>,
        /// Oscillator level above which a drop is a sell
        #[arg(long)]
        overbought: Option<f64>,
        /// Number of trailing rows to print
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Validate a strategy parameter file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long, default_value = "simple")]
        strategy: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Simulate {
            data,
            strategy,
            config,
            buy,
            sell,
            window,
            initial_balance,
            user_id,
            output,
        } => {
            let overrides = StrategyOverrides {
                buy_fraction: buy,
                sell_fraction: sell,
                window_size: window,
                ..Default::default()
            };
            run_simulate(
                &data,
                &strategy,
                config.as_deref(),
                &overrides,
                initial_balance,
                user_id.as_deref(),
                output.as_deref(),
            )
        }
        Command::Analyze {
            data,
            strategy,
            config,
            sma_window,
            rsi_window,
            oversold,
            overbought,
            rows,
        } => {
            let overrides = StrategyOverrides {
                sma_window,
                rsi_window,
                oversold,
                overbought,
                ..Default::default()
            };
            run_analyze(&data, &strategy, config.as_deref(), &overrides, rows)
        }
        Command::Validate { config, strategy } => run_validate(&config, &strategy),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load an optional parameter file. A path that does not exist is not an
/// error: the run falls back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<Option<FileConfigAdapter>, SigdashError> {
    let Some(path) = path else {
        return Ok(None);
    };
    if !path.exists() {
        warn!(path = %path.display(), "parameter file not found, using defaults");
        return Ok(None);
    }
    FileConfigAdapter::from_file(path).map(Some)
}

/// Resolve strategy parameters and run settings with the usual precedence.
pub fn build_run_config(
    strategy: &str,
    overrides: &StrategyOverrides,
    initial_balance: Option<f64>,
    user_id: Option<&str>,
    symbol: Option<&str>,
    config: Option<&dyn ConfigPort>,
) -> Result<(StrategyParams, SimulationSettings), SigdashError> {
    let params = StrategyParams::resolve(strategy, overrides, config)?;
    let settings = SimulationSettings::resolve(initial_balance, user_id, symbol, config)?;
    Ok((params, settings))
}

/// Fetch prices as directed by `data`, with `fallback_symbol` used when no
/// `--symbol` is given.
pub fn load_prices(data: &DataArgs, fallback_symbol: Option<&str>) -> Result<PriceSeries, SigdashError> {
    let symbol = data.symbol.as_deref().or(fallback_symbol);

    if let Some(path) = &data.csv {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("UNKNOWN");
        return load_price_file(symbol.unwrap_or(stem), path);
    }

    let symbol = symbol.ok_or_else(|| {
        SigdashError::invalid(SIMULATION_SECTION, "symbol", "a --symbol or --csv file is required")
    })?;

    #[cfg(feature = "yahoo")]
    {
        if data.yahoo {
            let adapter = crate::adapters::yahoo_adapter::YahooAdapter::new()?;
            return adapter.fetch_prices(symbol, &data.period);
        }
    }

    CsvPriceAdapter::new(data.data_dir.clone()).fetch_prices(symbol, &data.period)
}

fn run_simulate(
    data: &DataArgs,
    strategy: &str,
    config_path: Option<&Path>,
    overrides: &StrategyOverrides,
    initial_balance: Option<f64>,
    user_id: Option<&str>,
    output: Option<&Path>,
) -> Result<(), SigdashError> {
    if let Some(path) = config_path {
        eprintln!("Loading parameters from {}", path.display());
    }
    let config = load_config(config_path)?;
    let config_ref = config.as_ref().map(|c| c as &dyn ConfigPort);

    let (params, settings) = build_run_config(
        strategy,
        overrides,
        initial_balance,
        user_id,
        data.symbol.as_deref(),
        config_ref,
    )?;

    let prices = load_prices(data, settings.symbol.as_deref())?;
    eprintln!(
        "Simulating '{}' on {} ({} prices)",
        strategy,
        prices.symbol(),
        prices.len()
    );

    let Some(report) = Simulator::new(strategy, params, settings).run(&prices) else {
        println!("No result: price series is empty");
        return Ok(());
    };

    print_summary(&report);

    if let Some(path) = output {
        CsvReportAdapter.write(&report, path)?;
        eprintln!("Decision log written to {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &SimulationReport) {
    let s = SimulationSummary::compute(report);
    println!("Strategy:        {}", report.strategy);
    println!("Symbol:          {}", report.symbol);
    println!("Account:         {}", report.account);
    println!("Steps:           {}", s.steps);
    println!("Buys / Sells:    {} / {}", s.buys, s.sells);
    println!("Initial balance: {:.2}", report.initial_balance);
    println!("Final balance:   {:.2}", s.final_balance);
    println!("Final position:  {}", s.final_position);
    println!("Final value:     {:.2}", s.final_value);
    println!("Total return:    {:.2}%", s.total_return * 100.0);
    println!("Max drawdown:    {:.2}%", s.max_drawdown * 100.0);
    if let Some(last) = report.final_record() {
        println!("Last decision:   {} ({})", last.action, last.reason);
    }
}

/// Overlay parameters from flags, the strategy's file section and defaults.
pub fn build_cross_params(
    strategy: &str,
    overrides: &StrategyOverrides,
    config: Option<&dyn ConfigPort>,
) -> Result<CrossParams, SigdashError> {
    let params = StrategyParams::resolve(strategy, overrides, config)?;
    let cross = CrossParams::from(&params);
    cross.validate()?;
    Ok(cross)
}

fn run_analyze(
    data: &DataArgs,
    strategy: &str,
    config_path: Option<&Path>,
    overrides: &StrategyOverrides,
    rows: usize,
) -> Result<(), SigdashError> {
    let config = load_config(config_path)?;
    let config_ref = config.as_ref().map(|c| c as &dyn ConfigPort);
    let params = build_cross_params(strategy, overrides, config_ref)?;

    let fallback = config_ref.and_then(|c| c.get_string(SIMULATION_SECTION, "symbol"));
    let prices = load_prices(data, fallback.as_deref())?;
    let result = analysis::analyze(&prices, &params);
    print!("{}", render_analysis(prices.symbol(), &result, rows));
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Text report for `analyze`: latest readings, signal counts and the
/// trailing `rows` overlay rows.
pub fn render_analysis(symbol: &str, result: &Analysis, rows: usize) -> String {
    let mut out = String::new();
    let Some(latest) = result.latest() else {
        out.push_str(&format!("{symbol}: no prices\n"));
        return out;
    };

    out.push_str(&format!(
        "{symbol} as of {}\n",
        format_date_for_display(&latest.timestamp)
    ));
    out.push_str(&format!("  Close:  {:.2}\n", latest.price));
    out.push_str(&format!(
        "  {}: {}\n",
        result.moving_average.indicator_type,
        fmt_opt(latest.moving_average)
    ));
    out.push_str(&format!(
        "  {}: {}\n",
        result.oscillator.indicator_type,
        fmt_opt(latest.oscillator)
    ));
    out.push_str(&format!(
        "  Signals: {} buy, {} sell\n",
        result.points_with(Signal::Buy).count(),
        result.points_with(Signal::Sell).count()
    ));

    out.push_str(&format!(
        "\n{:<10} {:>10} {:>10} {:>10} {:>6}\n",
        "Date", "Close", "SMA", "RSI", "Signal"
    ));
    let start = result.signals.len().saturating_sub(rows);
    for (i, p) in result.signals.iter().enumerate().skip(start) {
        out.push_str(&format!(
            "{:<10} {:>10.2} {:>10} {:>10} {:>6}\n",
            format_date_for_display(&p.timestamp),
            p.price,
            fmt_opt(result.moving_average.value_at(i)),
            fmt_opt(result.oscillator.value_at(i)),
            p.signal
        ));
    }
    out
}

fn run_validate(config_path: &Path, strategy: &str) -> Result<(), SigdashError> {
    let config = FileConfigAdapter::from_file(config_path)?;
    if !config.has_section(strategy) {
        eprintln!(
            "warning: no [{}] section, strategy defaults apply",
            strategy.to_lowercase()
        );
    }
    let (params, settings) = build_run_config(
        strategy,
        &StrategyOverrides::default(),
        None,
        None,
        None,
        Some(&config),
    )?;

    println!("Parameter file is valid");
    println!("  strategy:        {strategy}");
    println!("  buy:             {}", params.buy_fraction);
    println!("  sell:            {}", params.sell_fraction);
    println!("  window_size:     {}", params.window_size);
    println!("  sma_window:      {}", params.sma_window);
    println!("  rsi_window:      {}", params.rsi_window);
    println!("  oversold:        {}", params.oversold);
    println!("  overbought:      {}", params.overbought);
    println!("  initial_balance: {:.2}", settings.initial_balance);
    println!("  user_id:         {}", settings.account);
    if let Some(symbol) = &settings.symbol {
        println!("  symbol:          {symbol}");
    }
    Ok(())
}
