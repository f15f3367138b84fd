//! FILENAME: tests/test_projects_screen.rs
//! Integration tests for the projects screen.

mod common;

use common::{cell, TestHarness};
use dashboard_lib::{ModalState, ScreenKind, ViewAction};
use view_engine::{FieldFilter, FilterCondition};

const PROJECTS: ScreenKind = ScreenKind::Projects;

fn names(snapshot: &dashboard_lib::ScreenSnapshot) -> Vec<String> {
    snapshot
        .rows
        .iter()
        .filter_map(|r| cell(r, "name"))
        .collect()
}

#[test]
fn test_default_sort_is_earliest_due_first() {
    let harness = TestHarness::new();
    let snapshot = harness.screen(PROJECTS);

    assert_eq!(snapshot.total_matches, 6);
    assert_eq!(names(&snapshot).first().map(String::as_str), Some("Staff Uniform Refresh"));
    assert!(snapshot.rows.iter().all(|r| r.group_key.is_none()));
}

#[test]
fn test_project_kpis() {
    let harness = TestHarness::new();
    let snapshot = harness.screen(PROJECTS);

    assert_eq!(snapshot.metric("totalProjects"), Some(6.0));
    assert_eq!(snapshot.metric("activeProjects"), Some(5.0));
    assert_eq!(snapshot.metric("completedProjects"), Some(1.0));
    assert_eq!(snapshot.metric("totalBudget"), Some(55_200.0));
    let progress = snapshot.metric("averageProgress").unwrap();
    assert!((progress - 290.0 / 6.0).abs() < 1e-9);
}

#[test]
fn test_status_filter() {
    let harness = TestHarness::new();
    let snapshot = harness.apply(
        PROJECTS,
        ViewAction::ApplyFilter(FieldFilter::new(
            "status",
            FilterCondition::Equals("In Progress".into()),
        )),
    );
    assert_eq!(snapshot.total_matches, 2);

    let cleared = harness.apply(PROJECTS, ViewAction::ClearFilter("status".into()));
    assert_eq!(cleared.total_matches, 6);
}

#[test]
fn test_unknown_status_falls_back() {
    let harness = TestHarness::new();
    let snapshot = harness.apply(
        PROJECTS,
        ViewAction::ApplyFilter(FieldFilter::new(
            "status",
            FilterCondition::Equals("Abandoned".into()),
        )),
    );
    assert!(snapshot.fell_back);
    assert_eq!(snapshot.total_matches, 6);
}

#[test]
fn test_search_reaches_optional_scope() {
    let harness = TestHarness::new();
    let snapshot = harness.apply(PROJECTS, ViewAction::SetSearch("LOGO".into()));
    assert_eq!(names(&snapshot), vec!["Cafe Rebrand Merch"]);
}

#[test]
fn test_absent_optional_fields_render_blank() {
    let harness = TestHarness::new();
    let snapshot = harness.apply(PROJECTS, ViewAction::SetSearch("climbing gym launch".into()));
    let row = &snapshot.rows[0];

    assert_eq!(cell(row, "scope").as_deref(), Some(""));
    assert_eq!(cell(row, "contacts").as_deref(), Some(""));
    assert_eq!(cell(row, "nextSteps").as_deref(), Some(""));
}

#[test]
fn test_brand_guidelines_modal() {
    let harness = TestHarness::new();
    let snapshot = harness.apply(
        PROJECTS,
        ViewAction::OpenModal(ModalState::BrandGuidelines {
            customer: "Harbor Street Cafe".into(),
        }),
    );
    assert_eq!(
        snapshot.state.modal,
        ModalState::BrandGuidelines {
            customer: "Harbor Street Cafe".into()
        }
    );

    let closed = harness.apply(PROJECTS, ViewAction::CloseModal);
    assert_eq!(closed.state.modal, ModalState::Closed);
    assert_eq!(closed.total_matches, 6);
}

#[test]
fn test_screens_keep_separate_state() {
    let harness = TestHarness::new();
    harness.apply(PROJECTS, ViewAction::SetSearch("logo".into()));
    let apparel = harness.screen(ScreenKind::Apparel);
    assert!(apparel.state.search.is_empty());
}
