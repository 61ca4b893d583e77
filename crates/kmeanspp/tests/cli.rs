use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn kmeans(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_kmeans"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut child_stdin = child.stdin.take().unwrap();
    if let Some(input) = stdin {
        child_stdin.write_all(input.as_bytes()).unwrap();
    }
    drop(child_stdin);

    child.wait_with_output().unwrap()
}

fn grid_csv() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/grid.csv")
        .display()
        .to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn reads_stdin_when_no_file_is_given() {
    let output = kmeans(&["2", "4", "2", "10"], Some("0,0\n10,0\n0,2\n10,2\n"));
    assert!(output.status.success());
    assert_eq!(stdout(&output), "0.00,1.00\n10.00,1.00\n");
}

#[test]
fn reads_the_given_file() {
    let output = kmeans(&["2", "4", "2", "10", &grid_csv()], None);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "5.00,0.00\n5.00,2.00\n");
}

#[test]
fn plus_plus_prints_seed_indices_first() {
    let output = kmeans(&["2", "4", "2", "10", &grid_csv(), "--init", "plus-plus"], None);
    assert!(output.status.success());

    let out = stdout(&output);
    let lines = out.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);

    let indices = lines[0]
        .split(',')
        .map(|i| i.parse::<usize>().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(indices.len(), 2);
    assert_ne!(indices[0], indices[1]);
    assert!(indices.iter().all(|&i| i < 4));

    for line in &lines[1..] {
        assert_eq!(line.split(',').count(), 2);
    }

    // Same input, same picks
    let again = kmeans(&["2", "4", "2", "10", &grid_csv(), "--init", "plus-plus"], None);
    assert_eq!(stdout(&again), out);
}

#[test]
fn rejects_k_not_below_n() {
    let output = kmeans(&["3", "3", "2", "10"], None);
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "");

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("number of clusters (3) must be less than the number of observations (3)"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn rejects_non_finite_input() {
    let output = kmeans(&["1", "2", "2", "10"], Some("0,0\nnan,1\n"));
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("line 2: nan is not a finite number"),
        "unexpected stderr: {stderr}"
    );
}
