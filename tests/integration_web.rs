//! End-to-end tests for `sasb web`.

mod common;

use common::TestProject;
use predicates::prelude::*;

fn web_project(server_type: &str) -> TestProject {
    let project = TestProject::bare();
    project.write_config(&format!(
        r#"{{
            "streamConfig": {{
                "streamWeb": true,
                "streamWebFolder": "web",
                "webSourcePath": "src/web",
                "streamServiceName": "clickme"
            }},
            "targets": [
                {{
                    "name": "t",
                    "serverUrl": "https://server.example.com",
                    "serverType": "{server_type}",
                    "appLoc": "/Public/app"
                }}
            ]
        }}"#
    ));
    project.write_file(
        "src/web/index.html",
        "<html><head><link rel=\"stylesheet\" href=\"style.css\"></head></html>\n",
    );
    project.write_file("src/web/style.css", "body { color: #333; }\n");
    project
}

#[test]
fn viya_web_build_copies_assets_and_entry_point() {
    let project = web_project("SASVIYA");
    project.sasb().arg("web").assert().success();

    assert!(project.path().join("sasbbuild/services/web/style.css").is_file());
    let html = project.read_file("sasbbuild/services/web/clickme.html");
    assert!(html.contains("/SASJobExecution?_FILE=/Public/app/services/web/style.css"));
}

#[test]
fn sas9_web_build_generates_streaming_services() {
    let project = web_project("SAS9");
    project.sasb().arg("web").assert().success();

    let css_service = project.read_file("sasbbuild/services/web/style_css.sas");
    assert!(css_service.contains("%sasbout(CSS64)"));

    let entry = project.read_file("sasbbuild/services/web/clickme.sas");
    assert!(entry.contains("%sasbout(HTML)"));
    assert!(entry.contains("_PROGRAM=/Public/app/services/web/style_css"));
}

#[test]
fn web_build_without_stream_config_names_the_missing_field() {
    let project = TestProject::new();
    project
        .sasb()
        .arg("web")
        .assert()
        .failure()
        .stderr(predicate::str::contains("webSourcePath"));
}
