mod support;

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use support::run_meshbench;

fn write_report(path: &Path, test_name: &str, p95_seconds: f64) -> Result<(), String> {
    let aggregate = |endpoint: &str| {
        serde_json::json!({
            "endpoint": endpoint,
            "request_count": 10,
            "success_count": 10,
            "failure_count": 0,
            "avg_response_time": p95_seconds,
            "min_response_time": p95_seconds,
            "max_response_time": p95_seconds,
            "p50_response_time": p95_seconds,
            "p95_response_time": p95_seconds,
            "p99_response_time": p95_seconds,
            "throughput": 20.0,
            "success_rate": 1.0,
            "error_rate": 0.0
        })
    };
    let report = serde_json::json!({
        "test_name": test_name,
        "base_url": "http://127.0.0.1:8080",
        "started_at": "2025-01-01T00:00:00+00:00",
        "finished_at": "2025-01-01T00:00:10+00:00",
        "config": {
            "concurrent_requests": 2,
            "total_requests": 10,
            "timeout_seconds": 5,
            "warm_up_requests": 0
        },
        "endpoints": { "foo": aggregate("foo") },
        "overall": aggregate("overall")
    });
    let bytes = serde_json::to_vec_pretty(&report)
        .map_err(|err| format!("serialize report failed: {}", err))?;
    fs::write(path, bytes).map_err(|err| format!("write report failed: {}", err))
}

#[test]
fn e2e_compare_classifies_p95_improvement() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let left_path = dir.path().join("before.json");
    let right_path = dir.path().join("after.json");
    write_report(&left_path, "before", 0.100)?;
    write_report(&right_path, "after", 0.090)?;

    let comparison_path = dir.path().join("comparison.txt");
    let output = run_meshbench([
        "compare".to_owned(),
        left_path.to_string_lossy().into_owned(),
        right_path.to_string_lossy().into_owned(),
        "--output".to_owned(),
        comparison_path.to_string_lossy().into_owned(),
    ])?;
    if !output.status.success() {
        return Err(format!(
            "stdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    let rendered =
        fs::read_to_string(&comparison_path).map_err(|err| format!("read failed: {}", err))?;
    if !rendered.contains("↓ Improved") {
        return Err(format!("Expected an improvement marker, got:\n{}", rendered));
    }
    if !rendered.contains("-10.0%") {
        return Err(format!("Expected a -10% delta, got:\n{}", rendered));
    }
    if !rendered.contains("Test 1: before") || !rendered.contains("Test 2: after") {
        return Err("Expected both test names in the header".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_compare_missing_report_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let left_path = dir.path().join("before.json");
    write_report(&left_path, "before", 0.100)?;

    let output = run_meshbench([
        "compare".to_owned(),
        left_path.to_string_lossy().into_owned(),
        dir.path().join("missing.json").to_string_lossy().into_owned(),
    ])?;
    if output.status.success() {
        return Err("Expected a non-zero exit for a missing report".to_owned());
    }
    Ok(())
}
