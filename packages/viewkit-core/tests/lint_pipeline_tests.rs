//! Lint pipeline integration tests
//!
//! Files on disk through discovery, the orchestrator and rendering.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use viewkit_core::features::discovery::{find_addons_paths, find_project_root, view_files_of};
use viewkit_core::features::schema_cache::{SchemaCache, SchemaCategory};
use viewkit_core::features::schema_validation::SchemaValidatorAdapter;
use viewkit_core::pipeline::{render_json, render_text, FileReport, LintMode, LintOrchestrator};
use viewkit_core::{FindingKind, ToolkitConfig};

fn count(report: &FileReport, kind: FindingKind) -> usize {
    report.findings.iter().filter(|f| f.kind == kind).count()
}

fn conventions_only() -> LintOrchestrator {
    LintOrchestrator::new(LintMode::Views, 2, None).unwrap()
}

fn with_source(source: Arc<StaticSource>) -> LintOrchestrator {
    let adapter = SchemaValidatorAdapter::new(Arc::new(SchemaCache::new(source)));
    LintOrchestrator::new(LintMode::Views, 4, Some(Arc::new(adapter))).unwrap()
}

#[test]
fn test_minimal_tree_view_scenario() {
    let project = TestProject::new();
    project.add_module("sale_ext");
    let file = project.write_view("sale_ext", "tree.xml", MINIMAL_TREE_VIEW);

    let report = conventions_only().lint_paths(&[file]);
    let file_report = &report.files()[0];

    assert_eq!(count(file_report, FindingKind::DeprecatedTag), 1);
    assert_eq!(count(file_report, FindingKind::MissingRecordId), 1);
    let missing_fields: Vec<&str> = file_report
        .findings
        .iter()
        .filter(|f| f.kind == FindingKind::MissingRecordField)
        .map(|f| f.message.as_str())
        .collect();
    assert_eq!(
        missing_fields,
        vec![
            "View record missing required field 'name'",
            "View record missing required field 'model'",
        ]
    );
    assert!(!report.passed());
}

#[test]
fn test_one_missing_id_finding_per_record() {
    let records: String = (0..3)
        .map(|i| {
            format!(
                "<record model=\"ir.ui.view\"><field name=\"name\">v{i}</field><field name=\"model\">m</field><field name=\"arch\" type=\"xml\"><form string=\"F\"/></field></record>"
            )
        })
        .collect();
    let source = format!("<odoo>{}</odoo>", records);

    let report = conventions_only().lint_source("views.xml".as_ref(), &source);
    assert_eq!(count(&report, FindingKind::MissingRecordId), 3);
}

#[test]
fn test_tree_reported_once_regardless_of_siblings() {
    let fields: String = (0..25).map(|i| format!("<field name=\"f{i}\"/>")).collect();
    let source = list_view("partner_tree", &format!("<tree string=\"P\">{}</tree>", fields));

    let report = conventions_only().lint_source("tree.xml".as_ref(), &source);
    assert_eq!(count(&report, FindingKind::DeprecatedTag), 1);
}

#[test]
fn test_lint_is_idempotent() {
    let orchestrator = conventions_only();
    let first = orchestrator.lint_source("v.xml".as_ref(), MINIMAL_TREE_VIEW);
    let second = orchestrator.lint_source("v.xml".as_ref(), MINIMAL_TREE_VIEW);
    assert_eq!(first, second);
}

#[test]
fn test_fetch_failure_downgrades_to_skip() {
    let source = Arc::new(StaticSource::new());
    let orchestrator = with_source(source.clone());

    let report = orchestrator.lint_source(
        "list.xml".as_ref(),
        &list_view("partner_list", "<list><field/></list>"),
    );

    assert_eq!(count(&report, FindingKind::SchemaSkipped), 1);
    assert_eq!(count(&report, FindingKind::MissingViewString), 1);
    assert_eq!(count(&report, FindingKind::FieldWithoutName), 1);
    assert_eq!(count(&report, FindingKind::SchemaViolation), 0);
    assert!(source.calls(SchemaCategory::Common) >= 1);
}

#[test]
fn test_schema_violations_reported_per_subtree() {
    let source = Arc::new(StaticSource::list_schemas());
    let orchestrator = with_source(source);

    let valid = orchestrator.lint_source(
        "ok.xml".as_ref(),
        &list_view("ok", "<list string=\"P\"><field name=\"name\"/><button name=\"go\"/></list>"),
    );
    assert!(valid.is_clean(), "{:?}", valid.findings);

    let invalid = orchestrator.lint_source(
        "bad.xml".as_ref(),
        &list_view("bad", "<list string=\"P\"><field name=\"name\"/><group/></list>"),
    );
    assert_eq!(count(&invalid, FindingKind::SchemaViolation), 1);
    assert!(invalid.findings[0].message.starts_with("RNG validation error: "));
}

#[test]
fn test_schemas_fetched_once_per_run() {
    let project = TestProject::new();
    project.add_module("sale_ext");
    let files: Vec<_> = (0..20)
        .map(|i| {
            project.write_view(
                "sale_ext",
                &format!("list_{i:02}.xml"),
                &list_view(&format!("list_{i}"), "<list string=\"L\"><field name=\"a\"/></list>"),
            )
        })
        .collect();

    let source = Arc::new(StaticSource::list_schemas());
    let report = with_source(source.clone()).lint_paths(&files);

    assert!(report.passed());
    assert_eq!(report.files_checked(), 20);
    assert_eq!(source.calls(SchemaCategory::Common), 1);
    assert_eq!(source.calls(SchemaCategory::List), 1);
    assert_eq!(source.total_calls(), 2);
}

#[test]
fn test_discovered_project_with_local_schemas() {
    let project = TestProject::new();
    project.add_module("sale_ext");
    project.add_module("crm_ext");
    project.write_view("sale_ext", "a_tree.xml", MINIMAL_TREE_VIEW);
    project.write_view(
        "crm_ext",
        "lead.xml",
        &list_view("lead_list", "<list string=\"Leads\"><field name=\"name\"/></list>"),
    );
    project.write_view("crm_ext", "broken.xml", "<odoo><record>");

    let root = find_project_root(&project.addons()).unwrap();
    let files = view_files_of(&find_addons_paths(&root));
    assert_eq!(files.len(), 3);

    let mut config = ToolkitConfig::default();
    config.schema.local_dir = Some(project.write_schemas());
    config.lint.parallelism = 3;
    let orchestrator = LintOrchestrator::from_config(&config, LintMode::Views).unwrap();
    let report = orchestrator.lint_paths(&files);

    assert_eq!(report.files_checked(), 3);
    assert_eq!(report.files_with_findings(), 2);
    let failing: Vec<_> = report
        .failing_files()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(failing, vec!["broken.xml", "a_tree.xml"]);

    let text = render_text(&report, LintMode::Views, Some(&root));
    assert!(text.contains("✗ addons/sale_ext/views/a_tree.xml"));
    assert!(text.contains("  - L1: XML Syntax Error"));
    assert!(text.ends_with(&format!(
        "Validation finished with {} errors in 2 files.\n",
        report.total_findings()
    )));

    let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
    assert_eq!(json["files_with_findings"], 2);
}

#[test]
fn test_basic_mode_flags_only_syntax_and_ampersands() {
    let orchestrator = LintOrchestrator::new(LintMode::Basic, 1, None).unwrap();

    let clean = orchestrator.lint_source("tree.xml".as_ref(), MINIMAL_TREE_VIEW);
    assert!(clean.is_clean());

    let amp = orchestrator.lint_source(
        "menu.xml".as_ref(),
        "<odoo>\n<menuitem name=\"x\"/>\n<record id=\"a\" model=\"m\"><field name=\"name\">R & D</field></record>\n</odoo>",
    );
    assert_eq!(count(&amp, FindingKind::UnescapedAmpersand), 1);
    assert_eq!(amp.findings[0].line, viewkit_core::SourceLine::Known(3));
}

#[test]
fn test_offline_run_fetches_each_schema_once() {
    let project = TestProject::new();
    project.add_module("sale_ext");
    let files: Vec<_> = (0..10)
        .map(|i| {
            project.write_view(
                "sale_ext",
                &format!("list_{i:02}.xml"),
                &list_view(&format!("list_{i}"), "<list string=\"L\"><field name=\"a\"/></list>"),
            )
        })
        .collect();

    let source = Arc::new(StaticSource::new());
    let report = with_source(source.clone()).lint_paths(&files);

    assert_eq!(report.files_with_findings(), 10);
    assert!(report
        .files()
        .iter()
        .all(|f| count(f, FindingKind::SchemaSkipped) == 1));
    assert_eq!(source.calls(SchemaCategory::Common), 1);
    assert_eq!(source.total_calls(), 1);
}
