// ABOUTME: End-to-end farm tests against scripted sh engine subprocesses
// ABOUTME: Verifies spawn, the genmove/play lockstep, transcripts, and teardown

use gofarm_core::{run_session, Farm, FarmOptions};
use tempfile::TempDir;

/// Master engine: answers `genmove` with a fixed move.
const MASTER_ENGINE: &str = r#"
while IFS= read -r line; do
    [ -z "$line" ] && continue
    case "$line" in
        quit) printf '=\n\n'; exit 0;;
        genmove*) printf '= E5\n\n';;
        *) printf '= ok\n\n';;
    esac
done
"#;

/// Slave engine: records every received command to `$1.$3`, where $1
/// is the log base path and $3 the value of the -Process flag the farm
/// appends, so each slave gets its own file.
const SLAVE_ENGINE: &str = r#"
log="$1.$3"
while IFS= read -r line; do
    [ -z "$line" ] && continue
    printf '%s\n' "$line" >> "$log"
    case "$line" in
        quit) printf '=\n\n'; exit 0;;
        reg_genmove*) printf '= D3\n\n';;
        *) printf '= ok\n\n';;
    esac
done
"#;

fn write_script(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    format!("sh {}", path.display())
}

fn options(dir: &TempDir, processes: usize) -> FarmOptions {
    let recv_base = dir.path().join("recv");
    FarmOptions {
        processes,
        master_command: write_script(dir, "master.sh", MASTER_ENGINE),
        slave_command: format!(
            "{} {}",
            write_script(dir, "slave.sh", SLAVE_ENGINE),
            recv_base.display()
        ),
        engine_args: String::new(),
        verbose: false,
        transcript: None,
    }
}

fn slave_log(dir: &TempDir, ordinal: usize) -> Vec<String> {
    let path = dir.path().join(format!("recv.{ordinal}"));
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_session_keeps_slaves_in_lockstep() {
    let dir = TempDir::new().unwrap();
    let mut farm = Farm::spawn(&options(&dir, 3)).unwrap();

    let input: &[u8] = b"boardsize 9\ngenmove b\nquit\n";
    let mut output: Vec<u8> = Vec::new();
    run_session(&mut farm, input, &mut output).await.unwrap();

    // The operator only ever sees the master's replies.
    assert_eq!(String::from_utf8(output).unwrap(), "= ok\n\n= E5\n\n");

    // Each slave saw the verbatim broadcast, the non-committing move
    // generation, and the echo of the master's move.
    for ordinal in [1, 2] {
        assert_eq!(
            slave_log(&dir, ordinal),
            vec!["boardsize 9", "reg_genmove b", "play b E5", "quit"]
        );
    }
}

#[tokio::test]
async fn test_transcript_mirrors_master_commands() {
    let dir = TempDir::new().unwrap();
    let mut opts = options(&dir, 2);
    opts.transcript = Some(dir.path().join("transcript"));
    let mut farm = Farm::spawn(&opts).unwrap();

    let input: &[u8] = b"boardsize 9\ngenmove w\nquit\n";
    let mut output: Vec<u8> = Vec::new();
    run_session(&mut farm, input, &mut output).await.unwrap();

    let master = std::fs::read_to_string(dir.path().join("transcript.0")).unwrap();
    assert_eq!(master, "boardsize 9\ngenmove w\nquit\n");
    let slave = std::fs::read_to_string(dir.path().join("transcript.1")).unwrap();
    assert_eq!(slave, "boardsize 9\nreg_genmove w\nplay w E5\nquit\n");
}

#[tokio::test]
async fn test_spawn_is_atomic() {
    let dir = TempDir::new().unwrap();
    let mut opts = options(&dir, 2);
    opts.slave_command = "/nonexistent/engine".to_string();
    assert!(Farm::spawn(&opts).is_err());
}

#[tokio::test]
async fn test_zero_processes_rejected() {
    let dir = TempDir::new().unwrap();
    let mut opts = options(&dir, 2);
    opts.processes = 0;
    assert!(Farm::spawn(&opts).is_err());
}
