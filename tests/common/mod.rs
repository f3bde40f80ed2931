use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use assert_cmd::Command;

/// Writes `source` to a uniquely named temp file and runs it through the
/// `rift` binary (file mode), returning `(stdout, stderr, exit success)`.
/// Running the real binary, rather than calling the library in-process, is
/// what lets these tests also exercise argv dispatch and process exit codes.
pub fn run(source: &str) -> (String, String, bool) {
    let path = temp_source_path();
    fs::write(&path, source).expect("failed to write temp source file");

    let output = Command::cargo_bin("rift")
        .expect("rift binary to build")
        .arg(&path)
        .output()
        .expect("failed to run rift binary");

    let _ = fs::remove_file(&path);

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn temp_source_path() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("rift_test_{}_{}.rf", std::process::id(), n))
}
