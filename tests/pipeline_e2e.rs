mod support;

use std::path::Path;

use tempfile::tempdir;
use ttt_outcome::board::parse_board;
use ttt_outcome::config::PipelineSettings;
use ttt_outcome::dataset::DatasetLoadError;
use ttt_outcome::ml::OutcomeModel;
use ttt_outcome::pipeline::{self, PipelineError};

use support::boards::{all_wins, noisy_top_row, write_board_csv};

fn headless_settings(dir: &Path) -> PipelineSettings {
    PipelineSettings {
        data_path: dir.join("xsitemoves.csv"),
        model_path: dir.join("tic_tac_toe_ai_model.pkl"),
        show_plot: false,
        ..PipelineSettings::default()
    }
}

#[test]
fn all_win_dataset_scores_perfectly() {
    let dir = tempdir().unwrap();
    let settings = headless_settings(dir.path());
    write_board_csv(&settings.data_path, &all_wins(50));

    let mut out = Vec::new();
    let run = pipeline::run(&settings, &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Training Accuracy: 100.00%\nTesting Accuracy: 100.00%\n"
    );
    assert_eq!(run.test.rows, 10);
    assert_eq!(run.train.rows, 40);
    assert_eq!(run.test.accuracy, 1.0);
    let cm = &run.test.confusion;
    assert_eq!(cm.get(0, 0), 0);
    assert_eq!(cm.get(0, 1), 0);
    assert_eq!(cm.get(1, 0), 0);
    assert_eq!(cm.get(1, 1), 10);
    assert!(settings.model_path.is_file());
}

#[test]
fn missing_outcome_column_fails_before_output() {
    let dir = tempdir().unwrap();
    let settings = headless_settings(dir.path());
    std::fs::write(&settings.data_path, "c0,c1,Result\n1,0,1\n0,1,0\n").unwrap();

    let mut out = Vec::new();
    let err = pipeline::run(&settings, &mut out).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Dataset(DatasetLoadError::MissingColumn(_))
    ));
    assert!(out.is_empty());
    assert!(!settings.model_path.exists());
}

#[test]
fn missing_data_file_fails() {
    let dir = tempdir().unwrap();
    let settings = headless_settings(dir.path());
    let mut out = Vec::new();
    let err = pipeline::run(&settings, &mut out).unwrap_err();
    assert!(matches!(err, PipelineError::Dataset(DatasetLoadError::Io { .. })));
    assert!(out.is_empty());
}

#[test]
fn repeated_runs_produce_identical_artifacts() {
    let dir = tempdir().unwrap();
    let mut first = headless_settings(dir.path());
    write_board_csv(&first.data_path, &noisy_top_row(200));
    let mut second = first.clone();
    first.model_path = dir.path().join("first.pkl");
    second.model_path = dir.path().join("second.pkl");

    let a = pipeline::run(&first, &mut Vec::new()).unwrap();
    let b = pipeline::run(&second, &mut Vec::new()).unwrap();

    assert_eq!(a.test_indices, b.test_indices);
    assert_eq!(a.test, b.test);
    assert_eq!(
        std::fs::read(&first.model_path).unwrap(),
        std::fs::read(&second.model_path).unwrap()
    );
}

#[test]
fn metrics_stay_in_range_on_noisy_labels() {
    let dir = tempdir().unwrap();
    let settings = headless_settings(dir.path());
    write_board_csv(&settings.data_path, &noisy_top_row(137));

    let run = pipeline::train_and_evaluate(&settings).unwrap();

    assert_eq!(run.test.rows, 27);
    assert_eq!(run.test.confusion.total(), 27);
    assert_eq!(run.train.confusion.total(), 110);
    for accuracy in [run.train.accuracy, run.test.accuracy] {
        assert!((0.0..=1.0).contains(&accuracy));
    }
    assert!(run.model.depth() <= settings.max_depth);
}

#[test]
fn existing_artifact_is_overwritten_and_report_written() {
    let dir = tempdir().unwrap();
    let mut settings = headless_settings(dir.path());
    settings.report_path = Some(dir.path().join("report.json"));
    write_board_csv(&settings.data_path, &noisy_top_row(80));
    std::fs::write(&settings.model_path, b"previous model").unwrap();

    let run = pipeline::run(&settings, &mut Vec::new()).unwrap();

    let loaded = OutcomeModel::load(&settings.model_path).unwrap();
    assert_eq!(loaded, run.model);

    let report: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(report["seed"], 42);
    assert_eq!(report["test"]["rows"], 16);
    assert_eq!(report["test_per_class"][1]["class_id"], "Win");
}

#[test]
fn saved_model_predicts_boards_like_the_trained_one() {
    let dir = tempdir().unwrap();
    let settings = headless_settings(dir.path());
    write_board_csv(&settings.data_path, &noisy_top_row(120));
    let run = pipeline::run(&settings, &mut Vec::new()).unwrap();
    let loaded = OutcomeModel::load(&settings.model_path).unwrap();

    for board in ["xxxbbbbbb", "bbbxxxbbb", "x,b,x,b,x,b,x,b,x"] {
        let features = parse_board(board).unwrap();
        assert_eq!(
            loaded.predict_row(&features).unwrap(),
            run.model.predict_row(&features).unwrap()
        );
    }
}
