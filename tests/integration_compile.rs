//! End-to-end tests for `sasb compile`.

mod common;

use common::TestProject;
use predicates::prelude::*;

#[test]
fn compile_inlines_dependencies_ahead_of_the_service() {
    let project = TestProject::new();
    project.write_file("macros/mf_getvalue.sas", "%macro mf_getvalue; %mend;\n");
    project.write_file(
        "services/common/getdata.sas",
        "/**\n  @file getdata.sas\n  <h4> SAS Macros </h4>\n  @li mf_getvalue.sas\n**/\n%put getdata;\n",
    );

    project.sasb().args(["compile", "services/common/getdata.sas"]).assert().success();

    let compiled = project.read_file("sasbbuild/services/common/getdata.sas");
    let macro_pos = compiled.find("%macro mf_getvalue").expect("macro inlined");
    let service_pos = compiled.find("%put getdata").expect("service body kept");
    assert!(macro_pos < service_pos, "dependency must precede the service");
}

#[test]
fn compile_collects_transitive_dependencies_once() {
    let project = TestProject::new();
    project.write_file(
        "macros/mp_outer.sas",
        "/**\n  @li mf_inner.sas\n**/\n%macro mp_outer; %mend;\n",
    );
    project.write_file("macros/mf_inner.sas", "%macro mf_inner; %mend;\n");
    project.write_file(
        "services/run.sas",
        "/**\n  @li mp_outer.sas\n  @li mf_inner.sas\n**/\n%put run;\n",
    );

    project.sasb().args(["compile", "services/run.sas"]).assert().success();

    let compiled = project.read_file("sasbbuild/services/services/run.sas");
    assert_eq!(compiled.matches("%macro mf_inner;").count(), 1);
    let inner = compiled.find("%macro mf_inner").unwrap();
    let outer = compiled.find("%macro mp_outer").unwrap();
    assert!(inner < outer, "mf_inner is referenced by mp_outer and must come first");
}

#[test]
fn compile_reports_every_missing_dependency_at_once() {
    let project = TestProject::new();
    project.write_file(
        "services/bad.sas",
        "/**\n  @li examplemacro.sas\n  @li yetanothermacro.sas\n**/\n",
    );

    project
        .sasb()
        .args(["compile", "services/bad.sas"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Unable to locate dependencies: examplemacro.sas, yetanothermacro.sas",
        ));

    assert!(!project.path().join("sasbbuild/services/services/bad.sas").exists());
}

#[test]
fn project_macros_override_the_core_library() {
    let project = TestProject::new();
    project.write_file("macros/mf_abort.sas", "%macro mf_abort; %put project; %mend;\n");
    project.write_file("sasbcore/mf_abort.sas", "%macro mf_abort; %put core; %mend;\n");
    project.write_file("services/s.sas", "/**\n  @li mf_abort.sas\n**/\n%put s;\n");

    project.sasb().args(["compile", "services/s.sas"]).assert().success();

    let compiled = project.read_file("sasbbuild/services/services/s.sas");
    assert!(compiled.contains("%put project;"));
    assert!(!compiled.contains("%put core;"));
}

#[test]
fn preferred_folders_win_ties_between_candidates() {
    let project = TestProject::new();
    project.write_config(
        r#"{
            "macroFolders": ["macros", "sas9macros"],
            "targets": [
                {
                    "name": "sas9",
                    "serverUrl": "https://sas9.example.com",
                    "serverType": "SAS9",
                    "appLoc": "/Public/app",
                    "preferredMacroFolders": ["sas9macros"]
                }
            ]
        }"#,
    );
    project.write_file("macros/mx_dedupe.sas", "%macro mx_dedupe; %put generic; %mend;\n");
    project.write_file("sas9macros/mx_dedupe.sas", "%macro mx_dedupe; %put sas9; %mend;\n");
    project.write_file("services/s.sas", "/**\n  @li mx_dedupe.sas\n**/\n%put s;\n");

    project.sasb().args(["compile", "services/s.sas", "--target", "sas9"]).assert().success();

    let compiled = project.read_file("sasbbuild/services/services/s.sas");
    assert!(compiled.contains("%put sas9;"));
    assert!(!compiled.contains("%put generic;"));
}

#[test]
fn compile_outside_a_project_suggests_init() {
    let project = TestProject::bare();
    project
        .sasb()
        .args(["compile", "whatever.sas"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a sasb project directory"))
        .stderr(predicate::str::contains("sasb init"));
}

#[test]
fn unknown_target_is_rejected() {
    let project = TestProject::new();
    project.write_file("services/s.sas", "%put s;\n");
    project
        .sasb()
        .args(["compile", "services/s.sas", "--target", "nosuch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Target 'nosuch' was not found"));
}

#[test]
fn explicit_output_path_is_respected() {
    let project = TestProject::new();
    project.write_file("services/s.sas", "%put s;\n");
    project
        .sasb()
        .args(["compile", "services/s.sas", "--output", "custom/out.sas"])
        .assert()
        .success();
    assert!(project.path().join("custom/out.sas").is_file());
}
