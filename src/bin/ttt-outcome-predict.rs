//! Predicts outcomes for board positions with a saved model.

use std::path::PathBuf;

use ttt_outcome::board::parse_board;
use ttt_outcome::config::DEFAULT_MODEL_PATH;
use ttt_outcome::ml::OutcomeModel;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let model = OutcomeModel::load(&options.model_path).map_err(|err| err.to_string())?;
    for line in predict_boards(&model, &options.boards)? {
        println!("{line}");
    }
    Ok(())
}

/// One `<board>: <class>` line per board, failing on the first board that cannot be read.
fn predict_boards(model: &OutcomeModel, boards: &[String]) -> Result<Vec<String>, String> {
    boards
        .iter()
        .map(|board| {
            let features = parse_board(board).map_err(|err| format!("{board}: {err}"))?;
            let label = model
                .predict_row(&features)
                .map_err(|err| format!("{board}: {err}"))?;
            Ok(format!("{board}: {}", model.class_name(label)))
        })
        .collect()
}

#[derive(Debug, Clone)]
struct CliOptions {
    model_path: PathBuf,
    boards: Vec<String>,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut model_path = PathBuf::from(DEFAULT_MODEL_PATH);
    let mut boards = Vec::new();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--model requires a value".to_string())?;
                model_path = PathBuf::from(value);
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            board => boards.push(board.to_string()),
        }
        idx += 1;
    }

    if boards.is_empty() {
        return Err(help_text());
    }
    Ok(CliOptions { model_path, boards })
}

fn help_text() -> String {
    [
        "ttt-outcome-predict",
        "",
        "Predicts Win/Lose for boards using a model saved by ttt-outcome.",
        "",
        "Usage:",
        "  ttt-outcome-predict [--model tic_tac_toe_ai_model.pkl] <board>...",
        "",
        "Boards list nine cells row by row: x, o or b (blank), either compact",
        "(xoxbbobxo) or comma-separated (x,o,x,b,b,o,b,x,o).",
    ]
    .join("\n")
}
