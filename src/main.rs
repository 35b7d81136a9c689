//! solar-balance entry point: CLI wiring, record loading and reporting.

use std::path::Path;
use std::process;

use serde::Serialize;
use tracing::Level;

use solar_balance::analytics::{AnalyticsReport, analyze};
use solar_balance::config::AnalysisConfig;
use solar_balance::data::{
    DataSummary, HourlyAverage, MonthlySummary, SolarDataPoint, aggregate_by_hour,
    aggregate_by_month, filter, summarize,
};
use solar_balance::error::{Error, Result};
use solar_balance::io::{export_csv, import_csv};
use solar_balance::sample::SampleGenerator;

/// Parsed CLI arguments.
struct CliArgs {
    input: Option<String>,
    sample_days: Option<usize>,
    config_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    export: Option<String>,
    json: bool,
    verbose: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

/// Everything printed by a run, as one JSON document.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    summary: &'a DataSummary,
    monthly: &'a [MonthlySummary],
    hourly: &'a [HourlyAverage],
    analytics: &'a AnalyticsReport,
}

fn print_help() {
    eprintln!("solar-balance: solar production and demand analysis");
    eprintln!();
    eprintln!("Usage: solar-balance [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --input <path>           Load hourly records from CSV");
    eprintln!("  --sample-days <n>        Generate n days of sample data");
    eprintln!("  --config <path>          Load analysis config from TOML file");
    eprintln!("  --preset <name>          Use a built-in preset");
    eprintln!("  --seed <u64>             Override sample generator seed");
    eprintln!("  --export <path>          Write filtered records to CSV");
    eprintln!("  --json                   Print the report as JSON");
    eprintln!("  --verbose                Enable debug logging");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the report");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Presets: {}", AnalysisConfig::PRESETS.join(", "));
    eprintln!("Without --input, sample data is generated from the [sample] config.");
}

/// Returns the value following a flag, exiting if it is missing.
fn flag_value<'a>(args: &'a [String], i: usize, flag: &str, what: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v,
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        input: None,
        sample_days: None,
        config_path: None,
        preset: None,
        seed_override: None,
        export: None,
        json: false,
        verbose: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--input" => {
                i += 1;
                cli.input = Some(flag_value(&args, i, "--input", "a path argument").to_string());
            }
            "--sample-days" => {
                i += 1;
                let v = flag_value(&args, i, "--sample-days", "a day count");
                match v.parse::<usize>() {
                    Ok(n) if n > 0 => cli.sample_days = Some(n),
                    _ => {
                        eprintln!("error: --sample-days value \"{v}\" is not a positive integer");
                        process::exit(1);
                    }
                }
            }
            "--config" => {
                i += 1;
                cli.config_path =
                    Some(flag_value(&args, i, "--config", "a path argument").to_string());
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(flag_value(&args, i, "--preset", "a name argument").to_string());
            }
            "--seed" => {
                i += 1;
                let v = flag_value(&args, i, "--seed", "a u64 argument");
                if let Ok(s) = v.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{v}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--export" => {
                i += 1;
                cli.export = Some(flag_value(&args, i, "--export", "a path argument").to_string());
            }
            "--json" => cli.json = true,
            "--verbose" | "-v" => cli.verbose = true,
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let v = flag_value(&args, i, "--port", "a u16 argument");
                if let Ok(p) = v.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{v}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.input.is_some() && cli.sample_days.is_some() {
        eprintln!("error: --input and --sample-days are mutually exclusive");
        process::exit(1);
    }
    if cli.config_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --config and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to install log subscriber: {e}");
    }
}

/// Resolves the config source, applies CLI overrides and validates.
///
/// `--config` takes priority, then `--preset`, then the baseline default.
fn load_config(cli: &CliArgs) -> Result<AnalysisConfig> {
    let mut cfg = if let Some(ref path) = cli.config_path {
        AnalysisConfig::from_toml_file(Path::new(path))?
    } else if let Some(ref name) = cli.preset {
        AnalysisConfig::from_preset(name)?
    } else {
        AnalysisConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        cfg.sample.seed = seed;
    }
    if let Some(days) = cli.sample_days {
        cfg.sample.days = days;
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        return Err(Error::InvalidConfig(errors));
    }
    Ok(cfg)
}

/// Loads records from CSV or generates them from the sample config.
fn load_records(cli: &CliArgs, cfg: &AnalysisConfig) -> Result<Vec<SolarDataPoint>> {
    if let Some(ref path) = cli.input {
        return import_csv(Path::new(path));
    }
    Ok(SampleGenerator::new(&cfg.sample)?.generate())
}

fn print_monthly(monthly: &[MonthlySummary]) {
    println!("--- Monthly ---");
    println!(
        "{:<8} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8}",
        "month", "solar", "demand", "import", "export", "self%", "grid%"
    );
    for m in monthly {
        println!(
            "{:04}-{:02} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8.1} {:>8.1}",
            m.year,
            m.month,
            m.solar_production,
            m.energy_demand,
            m.grid_import,
            m.excess_export,
            m.self_consumption_percentage,
            m.grid_dependency_percentage,
        );
    }
}

fn print_hourly(hourly: &[HourlyAverage]) {
    println!("--- Hourly Profile (kWh avg) ---");
    println!(
        "{:>4} {:>8} {:>8} {:>8} {:>6}",
        "hour", "solar", "demand", "net", "n"
    );
    for h in hourly {
        println!(
            "{:>4} {:>8.3} {:>8.3} {:>8.3} {:>6}",
            h.hour, h.solar_production, h.energy_demand, h.net_energy, h.record_count
        );
    }
}

fn main() {
    let cli = parse_args();
    init_logging(cli.verbose);

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let all = match load_records(&cli, &cfg) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let records = filter(&all, &cfg.filter);
    tracing::info!(
        loaded = all.len(),
        selected = records.len(),
        "records ready"
    );

    let summary = summarize(&records);
    let monthly = aggregate_by_month(&records);
    let hourly = aggregate_by_hour(&records);
    let analytics = analyze(&records, &cfg.analytics_params());

    if cli.json {
        let report = JsonReport {
            summary: &summary,
            monthly: &monthly,
            hourly: &hourly,
            analytics: &analytics,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{summary}");
        println!();
        print_monthly(&monthly);
        println!();
        print_hourly(&hourly);
        println!();
        println!("{analytics}");
    }

    if let Some(ref path) = cli.export {
        if let Err(e) = export_csv(&records, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        tracing::info!(path = %path, records = records.len(), "records exported");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(solar_balance::api::AppState {
            config: cfg,
            records: all,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(solar_balance::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
