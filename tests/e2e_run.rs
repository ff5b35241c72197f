mod support;

use std::fs;

use tempfile::tempdir;

use support::{ServerMode, run_meshbench, spawn_http_server};

fn write_config(
    dir: &std::path::Path,
    base_url: &str,
    body: &str,
) -> Result<std::path::PathBuf, String> {
    let config_path = dir.join("meshbench.yaml");
    let config = format!("base-url: \"{}\"\n{}", base_url, body);
    fs::write(&config_path, config).map_err(|err| format!("write config failed: {}", err))?;
    Ok(config_path)
}

fn read_report(path: &std::path::Path) -> Result<serde_json::Value, String> {
    let bytes = fs::read(path).map_err(|err| format!("read report failed: {}", err))?;
    serde_json::from_slice(&bytes).map_err(|err| format!("parse report failed: {}", err))
}

#[test]
fn e2e_block_range_run_writes_report() -> Result<(), String> {
    let (url, _server) = spawn_http_server(ServerMode::Ok)?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let config_path = write_config(
        dir.path(),
        &url,
        r#"test-name: e2e-block-range
block-range:
  enabled: true
  start: 1
  end: 2
performance:
  concurrent-requests: 2
  total-requests: 4
  timeout-seconds: 5
  warm-up-requests: 1
endpoints:
  - path: /block
    method: POST
    uses-block-index: true
    payload:
      network_identifier:
        blockchain: example
      block_identifier:
        index: 0
"#,
    )?;
    let report_path = dir.path().join("report.json");

    let output = run_meshbench([
        "--config".to_owned(),
        config_path.to_string_lossy().into_owned(),
        "--output".to_owned(),
        report_path.to_string_lossy().into_owned(),
        "--verbose".to_owned(),
    ])?;
    if !output.status.success() {
        return Err(format!(
            "stdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let report = read_report(&report_path)?;
    let block = report
        .pointer("/endpoints/~1block")
        .ok_or("Expected /block aggregate in report")?;
    if block.pointer("/request_count").and_then(serde_json::Value::as_u64) != Some(4) {
        return Err("Expected request_count 4".to_owned());
    }
    if block.pointer("/success_count").and_then(serde_json::Value::as_u64) != Some(4) {
        return Err("Expected success_count 4".to_owned());
    }
    if block.pointer("/avg_response_time").map(serde_json::Value::is_null) != Some(false) {
        return Err("Expected a non-null avg".to_owned());
    }

    let timings = report
        .pointer("/individual_timings")
        .and_then(serde_json::Value::as_array)
        .ok_or("Expected individual_timings in verbose mode")?;
    if timings.len() != 4 {
        return Err(format!("Expected 4 timings, got {}", timings.len()));
    }
    let mut ids: Vec<u64> = timings
        .iter()
        .filter_map(|timing| timing.pointer("/request_id").and_then(serde_json::Value::as_u64))
        .collect();
    ids.sort_unstable();
    if ids != [1, 2, 3, 4] {
        return Err(format!("Expected ids 1..=4, got {:?}", ids));
    }
    Ok(())
}

#[test]
fn e2e_timed_out_endpoint_still_exits_zero() -> Result<(), String> {
    let (url, _server) = spawn_http_server(ServerMode::Hang)?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let config_path = write_config(
        dir.path(),
        &url,
        r#"test-name: e2e-timeout
performance:
  concurrent-requests: 1
  total-requests: 1
  timeout-seconds: 1
  warm-up-requests: 0
endpoints:
  - path: /block
    method: POST
"#,
    )?;
    let report_path = dir.path().join("report.json");

    let output = run_meshbench([
        "--config".to_owned(),
        config_path.to_string_lossy().into_owned(),
        "--output".to_owned(),
        report_path.to_string_lossy().into_owned(),
    ])?;
    if !output.status.success() {
        return Err("Expected exit code 0 despite request failures".to_owned());
    }

    let report = read_report(&report_path)?;
    let block = report
        .pointer("/endpoints/~1block")
        .ok_or("Expected /block aggregate in report")?;
    if block.pointer("/success_count").and_then(serde_json::Value::as_u64) != Some(0) {
        return Err("Expected zero successes".to_owned());
    }
    if block.pointer("/avg_response_time").map(serde_json::Value::is_null) != Some(true) {
        return Err("Expected a null avg with zero successes".to_owned());
    }
    let errors = block
        .pointer("/errors")
        .and_then(serde_json::Value::as_array)
        .ok_or("Expected error messages in the aggregate")?;
    if errors.is_empty() {
        return Err("Expected at least one error message".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_invalid_block_range_fails_before_running() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let config_path = write_config(
        dir.path(),
        "http://127.0.0.1:9",
        r#"block-range:
  enabled: true
  start: 10
  end: 2
endpoints:
  - path: /block
    uses-block-index: true
"#,
    )?;

    let output = run_meshbench([
        "--config".to_owned(),
        config_path.to_string_lossy().into_owned(),
    ])?;
    if output.status.success() {
        return Err("Expected a non-zero exit for an inverted block range".to_owned());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("start") {
        return Err(format!("Expected a block range message, got: {}", stderr));
    }
    Ok(())
}
