//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_supertrend_screen, BacktestConfig, BacktestResult};
use crate::domain::error::TascreenError;
use crate::domain::indicator::{self, IndicatorSeries, IndicatorValue};
use crate::domain::indicator::supertrend::{calculate_supertrend, Trend};
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "tascreen", about = "Technical-analysis indicators and long/short screening")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the SuperTrend long/short screen over a symbol
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        exchange: String,
    },
    /// Compute an indicator series and print it
    Indicator {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        exchange: String,
        /// Indicator name (sma, ema, wma, rsi, atr, cmf, chop, adx, obv,
        /// macd, bollinger, vortex, ssl, supertrend)
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 14)]
        period: usize,
    },
    /// List available symbols on an exchange
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        exchange: String,
    },
    /// Show data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        exchange: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            code,
            exchange,
        } => run_backtest(&config, &code, &exchange),
        Command::Indicator {
            config,
            code,
            exchange,
            name,
            period,
        } => run_indicator(&config, &code, &exchange, &name, period),
        Command::ListSymbols { config, exchange } => run_list_symbols(&config, &exchange),
        Command::Info {
            config,
            code,
            exchange,
        } => run_info(&config, &code, &exchange),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TascreenError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn build_data_port(config: &dyn ConfigPort) -> Result<CsvAdapter, TascreenError> {
    let dir = config
        .get_string("data", "csv_dir")
        .ok_or_else(|| TascreenError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

fn date_range(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), TascreenError> {
    let parse = |key: &str, fallback: NaiveDate| -> Result<NaiveDate, TascreenError> {
        match config.get_string("backtest", key) {
            Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
                TascreenError::ConfigInvalid {
                    section: "backtest".into(),
                    key: key.into(),
                    reason: "invalid date format (expected YYYY-MM-DD)".into(),
                }
            }),
            None => Ok(fallback),
        }
    };
    let start = parse("start_date", NaiveDate::MIN)?;
    let end = parse("end_date", NaiveDate::MAX)?;
    Ok((start, end))
}

fn fetch_bars(
    config: &dyn ConfigPort,
    code: &str,
    exchange: &str,
) -> Result<Vec<OhlcvBar>, TascreenError> {
    let data_port = build_data_port(config)?;
    let (start, end) = date_range(config)?;
    let bars = data_port.fetch_ohlcv(code, exchange, start, end)?;
    if bars.is_empty() {
        return Err(TascreenError::NoData {
            code: code.to_string(),
            exchange: exchange.to_string(),
        });
    }
    Ok(bars)
}

fn run_backtest(config_path: &PathBuf, code: &str, exchange: &str) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = match BacktestConfig::from_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let bars = match fetch_bars(&adapter, code, exchange) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Running screen: {}.{}, {} bars, {} to {}",
        code,
        exchange,
        bars.len(),
        bars[0].date,
        bars[bars.len() - 1].date,
    );

    let result = match run_supertrend_screen(&bars, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&result, &bars);
    ExitCode::SUCCESS
}

fn print_summary(result: &BacktestResult, bars: &[OhlcvBar]) {
    for (label, metrics) in [
        ("Long", &result.long_metrics),
        ("Short", &result.short_metrics),
    ] {
        eprintln!("\n=== {} Side ===", label);
        eprintln!("Trades:           {}", metrics.trades);
        eprintln!("Win Rate:         {:.1}%", metrics.win_rate * 100.0);
        eprintln!("Avg Win:          ${:.2}", metrics.avg_win);
        eprintln!("Avg Loss:         ${:.2}", metrics.avg_loss);
        eprintln!("Reward/Risk:      {:.2}", metrics.reward_to_risk);
        eprintln!("Expectancy:       ${:.2}", metrics.expectancy);
        eprintln!("Avg Holding:      {:.1} days", metrics.avg_holding_days);
        eprintln!("Net PnL:          ${:.2}", metrics.net_pnl);
        eprintln!("Final Capital:    ${:.2}", metrics.final_capital);
        eprintln!("Gain:             {:.2}%", metrics.pct_gain);
    }

    eprintln!("\n=== Combined ===");
    eprintln!(
        "Final Equity:     {:.4}",
        result.equity_combined.last().copied().unwrap_or(1.0)
    );
    eprintln!(
        "Max Drawdown:     {:.2}%",
        result.drawdown.max_drawdown * 100.0
    );
    match result.drawdown_date {
        Some(date) => eprintln!("Drawdown Trough:  {}", date),
        None => eprintln!("Drawdown Trough:  n/a"),
    }
    eprintln!(
        "Drawdown Length:  {} bars",
        result.drawdown.max_duration
    );
    eprintln!("Sharpe Ratio:     {:.2}", result.sharpe_ratio);
    eprintln!("CAGR:             {:.2}%", result.cagr * 100.0);
    eprintln!("Bars:             {}", bars.len());
}

fn run_indicator(
    config_path: &PathBuf,
    code: &str,
    exchange: &str,
    name: &str,
    period: usize,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bars = match fetch_bars(&adapter, code, exchange) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if name.eq_ignore_ascii_case("supertrend") {
        let multiplier = adapter.get_double("supertrend", "multiplier", 3.0);
        let series = calculate_supertrend(&bars, period, (multiplier * 100.0).round() as u32);
        for point in &series.points {
            if !point.valid {
                continue;
            }
            let trend = match point.trend {
                Some(Trend::Bottom) => "bottom",
                Some(Trend::Top) => "top",
                None => continue,
            };
            println!("{},{:.4},{}", point.date, point.line, trend);
        }
        return ExitCode::SUCCESS;
    }

    let series = match compute_named_indicator(&bars, name, period) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    print_series(&series);
    ExitCode::SUCCESS
}

fn compute_named_indicator(
    bars: &[OhlcvBar],
    name: &str,
    period: usize,
) -> Result<IndicatorSeries, TascreenError> {
    let series = match name.to_lowercase().as_str() {
        "sma" => indicator::sma::calculate_sma(bars, period),
        "ema" => indicator::ema::calculate_ema(bars, period),
        "wma" => indicator::wma::calculate_wma(bars, period),
        "rsi" => indicator::rsi::calculate_rsi(bars, period),
        "atr" => indicator::atr::calculate_atr(bars, period),
        "cmf" => indicator::cmf::calculate_cmf(bars, period),
        "chop" => indicator::chop::calculate_chop(bars, period),
        "adx" => indicator::adx::calculate_adx(bars, period),
        "obv" => indicator::obv::calculate_obv(bars),
        "macd" => indicator::macd::calculate_macd_default(bars),
        "bollinger" => indicator::bollinger::calculate_bollinger(bars, period, 200),
        "vortex" => indicator::vortex::calculate_vortex(bars, period),
        "ssl" => indicator::ssl::calculate_ssl(bars, period),
        other => {
            return Err(TascreenError::InvalidInput {
                reason: format!("unknown indicator '{}'", other),
            })
        }
    };
    Ok(series)
}

fn print_series(series: &IndicatorSeries) {
    for point in &series.values {
        if !point.valid {
            continue;
        }
        match point.value {
            IndicatorValue::Simple(v) => println!("{},{:.4}", point.date, v),
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } => println!(
                "{},{:.4},{:.4},{:.4}",
                point.date, line, signal, histogram
            ),
            IndicatorValue::Bollinger { upper, lower } => {
                println!("{},{:.4},{:.4}", point.date, upper, lower)
            }
            IndicatorValue::Vortex { plus, minus } => {
                println!("{},{:.4},{:.4}", point.date, plus, minus)
            }
            IndicatorValue::Ssl { up, down } => {
                println!("{},{:.4},{:.4}", point.date, up, down)
            }
        }
    }
}

fn run_list_symbols(config_path: &PathBuf, exchange: &str) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match data_port.list_symbols(exchange) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found for exchange {}", exchange);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, code: &str, exchange: &str) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data_port.get_data_range(code, exchange) {
        Ok(Some((min_date, max_date, count))) => {
            println!(
                "{}.{}: {} bars, {} to {}",
                code, exchange, count, min_date, max_date
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}.{}: no data found", code, exchange);
            let err = TascreenError::NoData {
                code: code.to_string(),
                exchange: exchange.to_string(),
            };
            (&err).into()
        }
        Err(e) => {
            eprintln!("error querying {}.{}: {}", code, exchange, e);
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match BacktestConfig::from_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nSuperTrend:");
    eprintln!("  period:     {}", config.supertrend_period);
    eprintln!(
        "  multiplier: {:.2}",
        config.supertrend_multiplier_x100 as f64 / 100.0
    );
    eprintln!("Costs:");
    eprintln!("  spread: {}", config.spread);
    eprintln!("  fees:   {}", config.fees);
    eprintln!("Backtest:");
    eprintln!("  risk_free_rate:  {}", config.risk_free_rate);
    eprintln!("  initial_capital: {}", config.initial_capital);
    eprintln!("  size_per_trade:  {}", config.size_per_trade);

    if adapter.get_string("data", "csv_dir").is_none() {
        eprintln!("\nwarning: [data] csv_dir is not set; data commands will fail");
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
