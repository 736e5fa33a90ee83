use super::*;
use std::fs;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("vnnprop").chain(args.iter().copied()))
        .expect("arguments should parse")
}

fn written_path(outcome: Outcome) -> PathBuf {
    match outcome {
        Outcome::Written(written) => written.path,
        Outcome::Streamed(_) => panic!("expected a written property"),
    }
}

// ========== input tests ==========

#[test]
fn read_sample_accepts_bare_array() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("sample.json");
    fs::write(&path, "[0.1, 0.2, 0.3]").expect("write should succeed");

    let sample = input::read_sample(&path).expect("sample should load");
    assert_eq!(sample.pixels(), &[0.1, 0.2, 0.3]);
    assert_eq!(sample.label(), None);
    assert_eq!(sample.id(), None);
}

#[test]
fn read_sample_accepts_record() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("sample.json");
    fs::write(&path, r#"{"pixels": [0.5, 1], "label": 3, "id": 42}"#)
        .expect("write should succeed");

    let sample = input::read_sample(&path).expect("sample should load");
    assert_eq!(sample.pixels(), &[0.5, 1.0]);
    assert_eq!(sample.label(), Some(3));
    assert_eq!(sample.id(), Some(42));
}

#[test]
fn read_sample_rejects_empty_and_malformed() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let empty = dir.path().join("empty.json");
    fs::write(&empty, "[]").expect("write should succeed");
    let err = input::read_sample(&empty).unwrap_err().to_string();
    assert!(err.contains("contains no values"), "{err}");

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{not json").expect("write should succeed");
    let err = format!("{:#}", input::read_sample(&bad).unwrap_err());
    assert!(err.contains("Failed to parse sample file"), "{err}");
}

#[test]
fn read_prior_accepts_pairs_and_objects() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("prior.json");
    fs::write(&path, r#"[[0.2, 0.55], {"lower": 0.0, "upper": 0.1}]"#)
        .expect("write should succeed");

    let prior = input::read_prior(&path).expect("prior should load");
    assert_eq!(prior, vec![Bound::new(0.2, 0.55), Bound::new(0.0, 0.1)]);
}

#[test]
fn read_samples_mixes_formats() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("batch.json");
    fs::write(&path, r#"[[0.1, 0.2], {"pixels": [0.3, 0.4], "label": 1}]"#)
        .expect("write should succeed");

    let samples = input::read_samples(&path).expect("samples should load");
    assert_eq!(samples, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
}

#[test]
fn missing_input_file_fails() {
    let err = input::read_sample(Path::new("/nonexistent/sample.json")).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read sample file"));
}

// ========== argument tests ==========

#[test]
fn global_options_parse_after_subcommand() {
    let cli = parse(&[
        "plain",
        "--sample",
        "s.json",
        "--epsilon",
        "0.1",
        "--num-classes",
        "3",
        "--out-dir",
        "props",
        "-vv",
    ]);
    assert_eq!(cli.num_classes, 3);
    assert_eq!(cli.out_dir, PathBuf::from("props"));
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Plain { sample } => {
            assert_eq!(sample.epsilon, 0.1);
            assert_eq!(sample.label, None);
            assert!(!sample.strict_range);
        }
        _ => panic!("expected plain"),
    }
}

#[test]
fn join_requires_prior() {
    let result = Cli::try_parse_from(["vnnprop", "join", "--sample", "s.json", "-e", "0.1"]);
    assert!(result.is_err(), "join without --prior should not parse");
}

#[test]
fn export_rejects_samples_with_explicit_bounds() {
    let result = Cli::try_parse_from([
        "vnnprop",
        "export",
        "-l",
        "1",
        "-e",
        "0.1",
        "--samples",
        "b.json",
        "--lower",
        "l.json",
        "--upper",
        "u.json",
    ]);
    assert!(result.is_err());
}

// ========== run tests ==========

#[test]
fn run_plain_writes_named_file() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let sample = dir.path().join("sample.json");
    fs::write(&sample, "[1, 2, 3, 4]").expect("write should succeed");
    let out_dir = dir.path().join("vnnlib");

    let cli = parse(&[
        "plain",
        "--sample",
        sample.to_str().unwrap(),
        "--label",
        "5",
        "--epsilon",
        "0.1",
        "--out-dir",
        out_dir.to_str().unwrap(),
    ]);
    let path = written_path(run(&cli).expect("plain should succeed"));
    assert_eq!(path, out_dir.join("infinity_0_5_0.1.vnnlib"));

    let text = fs::read_to_string(&path).expect("property should exist");
    assert_eq!(text.matches("\t(and (>= Y_").count(), 9);
    assert!(!text.contains("(>= Y_5 Y_5)"));
}

#[test]
fn run_uses_label_and_id_from_sample_file() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let sample = dir.path().join("sample.json");
    fs::write(&sample, r#"{"pixels": [0.5], "label": 2, "id": 7}"#).expect("write should succeed");
    let prior = dir.path().join("prior.json");
    fs::write(&prior, "[[0.2, 0.55]]").expect("write should succeed");

    let cli = parse(&[
        "meet",
        "--sample",
        sample.to_str().unwrap(),
        "--prior",
        prior.to_str().unwrap(),
        "-e",
        "0.1",
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);
    let path = written_path(run(&cli).expect("meet should succeed"));
    assert_eq!(path, dir.path().join("infinity_7_2_0.1_meet.vnnlib"));
}

#[test]
fn run_without_label_fails() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let sample = dir.path().join("sample.json");
    fs::write(&sample, "[0.5]").expect("write should succeed");

    let cli = parse(&[
        "plain",
        "--sample",
        sample.to_str().unwrap(),
        "-e",
        "0.1",
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);
    let err = run(&cli).err().expect("missing label should fail");
    assert!(err.to_string().contains("No label given"));
}

#[test]
fn run_strict_range_rejects_out_of_range_sample() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let sample = dir.path().join("sample.json");
    fs::write(&sample, "[0.5, 2.0]").expect("write should succeed");
    let out_dir = dir.path().join("out");

    let cli = parse(&[
        "plain",
        "--sample",
        sample.to_str().unwrap(),
        "-l",
        "0",
        "-e",
        "0.1",
        "--strict-range",
        "--out-dir",
        out_dir.to_str().unwrap(),
    ]);
    let err = run(&cli).err().expect("strict range should fail");
    assert!(format!("{err:#}").contains("outside [0, 1]"));
    assert!(!out_dir.exists(), "no output directory should be created");
}

#[test]
fn run_disjoint_meet_leaves_no_file() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let sample = dir.path().join("sample.json");
    fs::write(&sample, "[0.9]").expect("write should succeed");
    let prior = dir.path().join("prior.json");
    fs::write(&prior, "[[0.1, 0.2]]").expect("write should succeed");
    let out_dir = dir.path().join("out");

    let cli = parse(&[
        "meet",
        "--sample",
        sample.to_str().unwrap(),
        "--prior",
        prior.to_str().unwrap(),
        "-l",
        "0",
        "-e",
        "0.05",
        "--out-dir",
        out_dir.to_str().unwrap(),
    ]);
    let err = run(&cli).err().expect("disjoint meet should fail");
    assert!(format!("{err:#}").contains("Invalid region"));
    assert!(!out_dir.exists(), "rejected property must not create the output directory");
}

#[test]
fn run_export_hull() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let batch = dir.path().join("batch.json");
    fs::write(&batch, "[[0.25], [0.75]]").expect("write should succeed");

    let cli = parse(&[
        "export",
        "-l",
        "4",
        "-e",
        "0.125",
        "--samples",
        batch.to_str().unwrap(),
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);
    let path = written_path(run(&cli).expect("export should succeed"));
    assert_eq!(path, dir.path().join("infinity_all_4_0.125_num2.vnnlib"));
    let text = fs::read_to_string(&path).expect("property should exist");
    assert!(text.contains("(assert (<= X_0 0.875))\n(assert (>= X_0 0.125))\n"));
}

#[test]
fn run_export_explicit_bounds() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let lower = dir.path().join("lower.json");
    let upper = dir.path().join("upper.json");
    fs::write(&lower, "[0.0, 0.5]").expect("write should succeed");
    fs::write(&upper, "[0.25, 1.0]").expect("write should succeed");

    let cli = parse(&[
        "export",
        "-l",
        "0",
        "-e",
        "0.1",
        "--lower",
        lower.to_str().unwrap(),
        "--upper",
        upper.to_str().unwrap(),
        "--num-samples",
        "30",
        "--out-dir",
        dir.path().to_str().unwrap(),
    ]);
    let path = written_path(run(&cli).expect("export should succeed"));
    assert_eq!(path, dir.path().join("infinity_all_0_0.1_num30.vnnlib"));
}
