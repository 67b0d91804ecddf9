//! Integration tests for the seaway console binary.
//!
//! Tests full console sessions by spawning the binary, sending commands via
//! stdin, and verifying stdout responses.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Sends a sequence of commands to the console and collects stdout lines.
fn run_console(commands: &[&str]) -> Vec<String> {
    run_console_with_args(&[], commands)
}

fn run_console_with_args(args: &[&str], commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_seaway");
    let mut child = Command::new(exe)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start seaway");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

/// Two continents separated by a strait, with a closed lagoon on the west.
///
/// ```text
/// ##########~~~~~#####
/// ##~~~#####~~~~~#####
/// ##~~~#####~~~~~#####
/// ##########~~~~~#####
/// ```
const STRAIT: &str = "##########~~~~~#####/##~~~#####~~~~~#####/##~~~#####~~~~~#####/##########~~~~~#####";

#[test]
fn isready_response() {
    let lines = run_console(&["isready", "quit"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn unknown_commands_are_ignored() {
    let lines = run_console(&["foobar", "nonsense 1 2", "claim x", "quit"]);
    assert!(lines.is_empty());
}

#[test]
fn empty_lines_are_ignored() {
    let lines = run_console(&["", "  ", "isready", "quit"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn eof_exits_cleanly() {
    let lines = run_console(&["isready"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn queries_need_a_map() {
    let lines = run_console(&["landing 0 0", "map ~~~/~~", "quit"]);
    assert_eq!(lines, vec!["nomap", "maperror"]);
}

#[test]
fn option_produces_no_output() {
    let lines = run_console(&[
        "option MaxCandidates 4",
        "option Bogus 1",
        "option Connectivity 5",
        "isready",
        "quit",
    ]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn full_transport_session() {
    let map = format!("map {}", STRAIT);
    let lines = run_console(&[
        &map,
        "claim 1 0 0 9 3",
        "claim 2 15 0 19 3",
        "landing 18 1",
        "closest 1 15 1",
        "plan 1 18 1",
        "step 9 1 15 1",
        "step 14 1 15 1",
        "quit",
    ]);
    assert_eq!(
        lines,
        vec![
            "map 20x4 shores 18",
            "claimed 1 34",
            "claimed 2 20",
            "landing 15,1",
            "closest 9,1",
            r#"plan {"destination":[18,1],"embark":[9,1],"landing":[15,1],"player":1}"#,
            "advance 10,1",
            "land 15,1",
        ]
    );
}

/// A closed lagoon behind the north coast and open sea to the east and south.
///
/// ```text
/// ######~~~~
/// #~~~##~~~~
/// ######~~~~
/// ~~~~~~~~~~
/// ```
const LAGOON: &str = "######~~~~/#~~~##~~~~/######~~~~/~~~~~~~~~~";

#[test]
fn lagoon_shore_is_skipped_by_optimised_deploy() {
    let map = format!("map {}", LAGOON);
    // Player 1 holds a lagoon rim tile and one south-coast tile.
    let lines = run_console(&[
        &map,
        "option BiasOffshore false",
        "conquer 1 3 0",
        "conquer 1 0 2",
        "closest 1 7 1",
        "candidates 1 7 1",
        "deploy 1 7 1",
        "search 3 0 7 1",
        "search 0 2 7 1",
        "option EmbarkStrategy optimized",
        "plan 1 7 1",
        "quit",
    ]);
    assert_eq!(
        lines,
        vec![
            "map 10x4 shores 13",
            "ok",
            "ok",
            "closest 3,0",
            "candidates 3,0 0,2",
            "deploy 0,2",
            "unreachable nopath 4",
            "path 10 0,2 0,3 1,3 2,3 3,3 4,3 5,3 6,3 6,2 6,1 7,1",
            r#"plan {"destination":[7,1],"embark":[0,2],"landing":[5,1],"player":1}"#,
        ]
    );
}

#[test]
fn config_file_argument_is_loaded() {
    let path = std::env::temp_dir().join(format!("seaway-it-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"bias_offshore": false, "deploy_node_budget": 3}"#).unwrap();
    let path_arg = path.to_string_lossy().into_owned();
    let lines = run_console_with_args(
        &[&path_arg],
        &["map ~~~~~~~~", "search 0 0 7 0", "search 0 0 2 0", "quit"],
    );
    std::fs::remove_file(&path).unwrap();
    assert_eq!(
        lines,
        vec![
            "map 8x1 shores 0",
            "unreachable exhausted 3",
            "path 2 0,0 1,0 2,0",
        ]
    );
}

#[test]
fn missing_config_file_fails() {
    let exe = env!("CARGO_BIN_EXE_seaway");
    let status = Command::new(exe)
        .arg("/nonexistent/seaway.json")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("failed to start seaway");
    assert!(!status.success());
}
