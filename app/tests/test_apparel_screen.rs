//! FILENAME: tests/test_apparel_screen.rs
//! Integration tests for the apparel orders screen.

mod common;

use common::{aggregate, find_group, group_keys, member_cell, OrderFixture, TestHarness};
use dashboard_lib::{commands, ScreenKind, ViewAction};
use records::SortDirection;
use view_engine::{FieldFilter, FilterCondition, SortSpec};

const APPAREL: ScreenKind = ScreenKind::Apparel;

// ============================================================================
// GROUPING
// ============================================================================

#[test]
fn test_lines_fold_into_orders() {
    let harness = TestHarness::new();
    let snapshot = harness.apply(APPAREL, ViewAction::SetPage(1));

    assert_eq!(snapshot.total_matches, 9);

    let all = harness.apply(
        APPAREL,
        ViewAction::SetSort(SortSpec::new("orderNumber", SortDirection::Ascending)),
    );
    let first_page = group_keys(&all);
    assert_eq!(first_page, vec!["ORD-001", "ORD-002", "ORD-003", "ORD-004", "ORD-005"]);

    for (key, quantity, lines) in OrderFixture::totals().into_iter().take(5) {
        let row = find_group(&all, key).unwrap();
        assert_eq!(aggregate(row, "totalQuantity"), Some(quantity), "{}", key);
        assert_eq!(row.record_count, lines, "{}", key);
    }
}

#[test]
fn test_sort_by_aggregate_both_directions() {
    let harness = TestHarness::new();

    let desc = harness.apply(
        APPAREL,
        ViewAction::SetSort(SortSpec::new("totalQuantity", SortDirection::Descending)),
    );
    assert_eq!(group_keys(&desc), vec!["ORD-006", "ORD-003", "ORD-009", "ORD-001", "ORD-005"]);

    let asc = harness.apply(
        APPAREL,
        ViewAction::SetSort(SortSpec::new("totalQuantity", SortDirection::Ascending)),
    );
    assert_eq!(group_keys(&asc), vec!["ORD-007", "ORD-002", "ORD-004", "ORD-008", "ORD-001"]);
}

#[test]
fn test_default_sort_is_newest_first() {
    let harness = TestHarness::new();
    let snapshot = harness.screen(APPAREL);
    assert_eq!(group_keys(&snapshot).first().map(String::as_str), Some("ORD-009"));
    assert!(!snapshot.fell_back);
}

// ============================================================================
// SEARCH / FILTER
// ============================================================================

#[test]
fn test_search_is_case_insensitive() {
    let harness = TestHarness::new();
    let lower = harness.apply(APPAREL, ViewAction::SetSearch("bluebird".into()));
    let upper = harness.apply(APPAREL, ViewAction::SetSearch("BLUEBIRD".into()));

    assert_eq!(lower.total_matches, 2);
    assert_eq!(group_keys(&lower), group_keys(&upper));
}

#[test]
fn test_search_matches_any_line_of_an_order() {
    let harness = TestHarness::new();
    let snapshot = harness.apply(APPAREL, ViewAction::SetSearch("embroidered".into()));
    assert_eq!(group_keys(&snapshot), vec!["ORD-003"]);
}

#[test]
fn test_filter_on_aggregate() {
    let harness = TestHarness::new();
    let snapshot = harness.apply(
        APPAREL,
        ViewAction::ApplyFilter(FieldFilter::new(
            "totalQuantity",
            FilterCondition::Range {
                min: Some(100.0.into()),
                max: None,
            },
        )),
    );
    assert_eq!(snapshot.total_matches, 5);
}

#[test]
fn test_kpis_ignore_filters() {
    let harness = TestHarness::new();
    let base = harness.screen(APPAREL);
    let searched = harness.apply(APPAREL, ViewAction::SetSearch("riverbend".into()));

    assert_eq!(searched.total_matches, 1);
    assert_eq!(base.summary, searched.summary);
    assert_eq!(base.metric("totalOrders"), Some(9.0));
    assert_eq!(base.metric("totalUnits"), Some(OrderFixture::total_units()));
    assert_eq!(base.metric("customers"), Some(7.0));
}

#[test]
fn test_no_results_is_not_an_error() {
    let harness = TestHarness::new();
    let snapshot = harness.apply(APPAREL, ViewAction::SetSearch("no such customer".into()));
    assert_eq!(snapshot.total_matches, 0);
    assert!(snapshot.rows.is_empty());
    assert!(!snapshot.fell_back);
}

// ============================================================================
// PAGING / EXPANSION / FALLBACK
// ============================================================================

#[test]
fn test_pagination() {
    let harness = TestHarness::new();
    let first = harness.screen(APPAREL);
    assert_eq!(first.rows.len(), 5);
    assert_eq!(first.page.map(|p| p.total_pages), Some(2));

    let second = harness.apply(APPAREL, ViewAction::SetPage(2));
    assert_eq!(second.rows.len(), 4);

    let past_end = harness.apply(APPAREL, ViewAction::SetPage(3));
    assert!(past_end.rows.is_empty());
    assert_eq!(past_end.total_matches, 9);
}

#[test]
fn test_expand_shows_member_lines() {
    let harness = TestHarness::new();
    let snapshot = harness.apply_all(
        APPAREL,
        vec![
            ViewAction::SetSort(SortSpec::new("orderNumber", SortDirection::Ascending)),
            ViewAction::ToggleExpand("ORD-001".into()),
        ],
    );

    let expanded = find_group(&snapshot, "ORD-001").unwrap();
    assert!(expanded.expanded);
    assert_eq!(expanded.members.len(), 2);
    assert_eq!(member_cell(&expanded.members[1], "quantity").as_deref(), Some("75"));

    let collapsed = find_group(&snapshot, "ORD-002").unwrap();
    assert!(!collapsed.expanded);
    assert!(collapsed.members.is_empty());
}

#[test]
fn test_rejected_state_falls_back_to_base_view() {
    let harness = TestHarness::new();
    let snapshot = harness.apply(
        APPAREL,
        ViewAction::SetSort(SortSpec::new("warehouse", SortDirection::Ascending)),
    );

    assert!(snapshot.fell_back);
    assert_eq!(snapshot.total_matches, 9);
    assert_eq!(snapshot.state.sort, Some(SortSpec::new("warehouse", SortDirection::Ascending)));

    let recovered = harness.apply(APPAREL, ViewAction::ClearAll);
    assert!(!recovered.fell_back);
}

#[test]
fn test_repeated_render_is_identical() {
    let harness = TestHarness::new();
    harness.apply(APPAREL, ViewAction::SetSearch("tee".into()));
    let a = harness.screen(APPAREL);
    let b = harness.screen(APPAREL);
    assert_eq!(a, b);
}

#[test]
fn test_reload_keeps_view_state() {
    let harness = TestHarness::new();
    let before = harness.apply_all(
        APPAREL,
        vec![
            ViewAction::SetSearch("northwind".into()),
            ViewAction::ToggleExpand("ORD-001".into()),
        ],
    );

    let reloaded = commands::reload_screen(&harness.state, APPAREL).unwrap();
    assert_eq!(reloaded.state.search, "northwind");
    assert!(reloaded.state.expanded.contains("ORD-001"));
    assert_eq!(reloaded.total_matches, 2);
    assert_eq!(reloaded, before);
    assert_eq!(harness.screen(APPAREL), before);

    for kind in ScreenKind::ALL {
        assert!(commands::reload_screen(&harness.state, kind).is_ok());
    }
}

#[test]
fn test_action_from_json() {
    let harness = TestHarness::new();
    let snapshot = commands::apply_action_json(
        &harness.state,
        APPAREL,
        r#"{"type": "setSearch", "value": "cedar"}"#,
    )
    .unwrap();
    assert_eq!(group_keys(&snapshot), vec!["ORD-003"]);

    let unknown = commands::apply_action_json(&harness.state, APPAREL, r#"{"type": "dance"}"#);
    assert!(unknown.is_err());
}
