use std::fs;

use bench_viewer::config::{FileFailurePolicy, ViewerConfig};
use bench_viewer::reporting::{report, ReportOptions};
use httptest::{
    matchers::{eq, request},
    responders::{json_encoded, status_code},
    Expectation, Server,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn catch2_report(test_cases: &[(&str, &str)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Catch2TestRun>\n");
    for (name, mean) in test_cases {
        xml.push_str(&format!(
            "<TestCase name=\"{name}\"><BenchmarkResults name=\"{name}\"><mean value=\"{mean}\"/></BenchmarkResults></TestCase>\n"
        ));
    }
    xml.push_str("</Catch2TestRun>\n");
    xml
}

fn expect_listing(server: &Server, os_label: &str, files: &[&str]) {
    let entries: Vec<Value> = files
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "type": "file",
                "download_url": server.url_str(&format!("/raw/{}/{}", os_label, name)),
            })
        })
        .collect();
    server.expect(
        Expectation::matching(request::method_path(
            "GET",
            eq(format!("/repos/GRIS-UdeM/AlgoGRIS/contents/{}", os_label)),
        ))
        .respond_with(json_encoded(entries)),
    );
}

fn expect_file(server: &Server, os_label: &str, name: &str, content: String) {
    server.expect(
        Expectation::matching(request::method_path(
            "GET",
            eq(format!("/raw/{}/{}", os_label, name)),
        ))
        .respond_with(status_code(200).body(content)),
    );
}

fn expect_missing_listing(server: &Server, os_label: &str) {
    server.expect(
        Expectation::matching(request::method_path(
            "GET",
            eq(format!("/repos/GRIS-UdeM/AlgoGRIS/contents/{}", os_label)),
        ))
        .respond_with(status_code(404)),
    );
}

fn config_for(server: &Server) -> ViewerConfig {
    ViewerConfig {
        api_base_url: server.url_str(""),
        ..Default::default()
    }
}

/// Linux has two commits, macOS one, Windows has no directory yet
fn serve_partial_coverage(server: &Server) {
    expect_listing(server, "Linux", &["c1.xml", "c2.xml", "README.md"]);
    expect_file(
        server,
        "Linux",
        "c1.xml",
        catch2_report(&[("Hrtf spat", "10"), ("Vbap spat", "3.5e2")]),
    );
    expect_file(server, "Linux", "c2.xml", catch2_report(&[("Hrtf spat", "20")]));
    expect_listing(server, "macOS", &["c1.xml"]);
    expect_file(server, "macOS", "c1.xml", catch2_report(&[("Hrtf spat", "15")]));
    expect_missing_listing(server, "Windows");
}

#[test]
fn test_json_report_aligns_platforms_per_commit() {
    let server = Server::run();
    serve_partial_coverage(&server);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("charts.json");

    report(output.clone(), &config_for(&server), ReportOptions::default()).unwrap();

    let charts: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        charts,
        json!([
            {
                "test_name": "Hrtf spat",
                "commits": ["c1", "c2"],
                "series": [
                    {"label": "Linux", "values": [10.0, 20.0]},
                    {"label": "macOS", "values": [15.0, null]},
                    {"label": "Windows", "values": [null, null]},
                ],
            },
            {
                "test_name": "Vbap spat",
                "commits": ["c1"],
                "series": [
                    {"label": "Linux", "values": [350.0]},
                    {"label": "macOS", "values": [null]},
                    {"label": "Windows", "values": [null]},
                ],
            },
        ])
    );
}

#[test]
fn test_html_report_has_one_chart_per_test() {
    let server = Server::run();
    serve_partial_coverage(&server);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("benchmarks.html");
    let options = ReportOptions {
        title: Some("AlgoGRIS".to_string()),
        ..Default::default()
    };

    report(output.clone(), &config_for(&server), options).unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<title>AlgoGRIS</title>"));
    assert!(html.contains("chart-Hrtf-spat"));
    assert!(html.contains("chart-Vbap-spat"));
    assert!(html.contains("Hrtf spat Mean Time"));
}

#[test]
fn test_filtered_csv_report() {
    let server = Server::run();
    serve_partial_coverage(&server);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("results.csv");
    let options = ReportOptions {
        filters: vec!["^Vbap".to_string()],
        ..Default::default()
    };

    report(output.clone(), &config_for(&server), options).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Vbap spat\tc1\tLinux\t350.0\n"
    );
}

#[test]
fn test_download_failure_aborts_report() {
    let server = Server::run();
    expect_listing(&server, "Linux", &["c1.xml"]);
    server.expect(
        Expectation::matching(request::method_path("GET", "/raw/Linux/c1.xml"))
            .respond_with(status_code(500)),
    );
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("benchmarks.html");
    let config = ViewerConfig {
        os_labels: vec!["Linux".to_string()],
        ..config_for(&server)
    };

    let error = report(output.clone(), &config, ReportOptions::default()).unwrap_err();

    assert!(format!("{:#}", error).contains("Linux/c1.xml"));
    assert!(!output.exists());
}

#[test]
fn test_skip_policy_ignores_unparsable_file() {
    let server = Server::run();
    expect_listing(&server, "Linux", &["c1.xml", "c2.xml"]);
    expect_file(&server, "Linux", "c1.xml", "<Catch2TestRun><TestCase".to_string());
    expect_file(&server, "Linux", "c2.xml", catch2_report(&[("Hrtf spat", "7")]));
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("results.csv");
    let config = ViewerConfig {
        os_labels: vec!["Linux".to_string()],
        on_file_error: FileFailurePolicy::Skip,
        ..config_for(&server)
    };

    report(output.clone(), &config, ReportOptions::default()).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Hrtf spat\tc2\tLinux\t7.0\n"
    );
}
