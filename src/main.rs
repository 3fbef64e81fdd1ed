//! Trains the tic-tac-toe outcome classifier, reports accuracy, shows the
//! confusion matrix and saves the model.

use std::path::PathBuf;

use ttt_outcome::config::{self, PipelineSettings};
use ttt_outcome::{logging, pipeline};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    let settings = resolve_settings(&options)?;
    tracing::info!(
        "Training on {} (max depth {}, test fraction {}, seed {})",
        settings.data_path.display(),
        settings.max_depth,
        settings.test_fraction,
        settings.seed
    );
    let mut stdout = std::io::stdout().lock();
    pipeline::run(&settings, &mut stdout).map_err(|err| err.to_string())?;
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq)]
struct CliOptions {
    config: Option<PathBuf>,
    data: Option<PathBuf>,
    model_out: Option<PathBuf>,
    report: Option<PathBuf>,
    max_depth: Option<usize>,
    test_fraction: Option<f64>,
    seed: Option<u64>,
    no_plot: bool,
}

fn resolve_settings(options: &CliOptions) -> Result<PipelineSettings, String> {
    let mut settings = match &options.config {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())?;
    apply_overrides(&mut settings, options);
    Ok(settings)
}

fn apply_overrides(settings: &mut PipelineSettings, options: &CliOptions) {
    if let Some(path) = &options.data {
        settings.data_path = path.clone();
    }
    if let Some(path) = &options.model_out {
        settings.model_path = path.clone();
    }
    if let Some(path) = &options.report {
        settings.report_path = Some(path.clone());
    }
    if let Some(depth) = options.max_depth {
        settings.max_depth = depth;
    }
    if let Some(fraction) = options.test_fraction {
        settings.test_fraction = fraction;
    }
    if let Some(seed) = options.seed {
        settings.seed = seed;
    }
    if options.no_plot {
        settings.show_plot = false;
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config = Some(PathBuf::from(value));
            }
            "--data" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--data requires a value".to_string())?;
                options.data = Some(PathBuf::from(value));
            }
            "--out" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--out requires a value".to_string())?;
                options.model_out = Some(PathBuf::from(value));
            }
            "--report" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--report requires a value".to_string())?;
                options.report = Some(PathBuf::from(value));
            }
            "--max-depth" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--max-depth requires a value".to_string())?;
                let depth = value
                    .parse::<usize>()
                    .ok()
                    .filter(|depth| *depth > 0)
                    .ok_or_else(|| format!("Invalid --max-depth value: {value}"))?;
                options.max_depth = Some(depth);
            }
            "--test-fraction" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--test-fraction requires a value".to_string())?;
                let fraction = value
                    .parse::<f64>()
                    .ok()
                    .filter(|fraction| *fraction > 0.0 && *fraction < 1.0)
                    .ok_or_else(|| format!("Invalid --test-fraction value: {value}"))?;
                options.test_fraction = Some(fraction);
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                let seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid --seed value: {value}"))?;
                options.seed = Some(seed);
            }
            "--no-plot" => options.no_plot = true,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    Ok(options)
}

fn help_text() -> String {
    [
        "ttt-outcome",
        "",
        "Trains a depth-bounded decision tree that predicts tic-tac-toe outcomes.",
        "",
        "Usage:",
        "  ttt-outcome [options]",
        "",
        "Options:",
        "  --config <file>          Settings TOML (default: config.toml in the app directory).",
        "  --data <file>            Dataset CSV with an Outcome column (default: xsitemoves.csv).",
        "  --out <file>             Model output path (default: tic_tac_toe_ai_model.pkl).",
        "  --report <file>          Also write a JSON evaluation report.",
        "  --max-depth <n>          Tree depth bound (default: 3).",
        "  --test-fraction <f64>    Held-out fraction (default: 0.2).",
        "  --seed <n>               Split seed (default: 42).",
        "  --no-plot                Skip the confusion-matrix window.",
    ]
    .join("\n")
}
