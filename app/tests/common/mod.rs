//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for dashboard integration tests.

#![allow(dead_code)]

use dashboard_lib::{
    commands, create_dashboard_state, CellData, DashboardConfig, DashboardState, RowData,
    ScreenKind, ScreenSnapshot, ViewAction,
};

/// Anchor every chart and revenue window ends at.
pub const ANCHOR: &str = "2024-03-10";

/// Test harness for creating and managing test state.
pub struct TestHarness {
    pub state: DashboardState,
}

impl TestHarness {
    /// Create a harness with deterministic settings: seed 42, page size 5,
    /// strict aggregation and a fixed anchor date.
    pub fn new() -> Self {
        Self::with_config(Self::config())
    }

    pub fn with_config(config: DashboardConfig) -> Self {
        TestHarness {
            state: create_dashboard_state(config).expect("dashboard state"),
        }
    }

    pub fn config() -> DashboardConfig {
        DashboardConfig::from_json_str(&format!(
            r#"{{
                "engine": {{ "aggregationPolicy": "strict" }},
                "screens": {{ "pageSize": 5, "seed": 42, "anchorDate": "{}" }},
                "reminders": {{ "timeoutMs": 1000, "simulatedDelayMs": 1 }}
            }}"#,
            ANCHOR
        ))
        .expect("test config")
    }

    pub fn screen(&self, kind: ScreenKind) -> ScreenSnapshot {
        commands::get_screen(&self.state, kind).expect("get_screen")
    }

    pub fn apply(&self, kind: ScreenKind, action: ViewAction) -> ScreenSnapshot {
        commands::apply_action(&self.state, kind, action).expect("apply_action")
    }

    /// Apply several actions, returning the last snapshot.
    pub fn apply_all(&self, kind: ScreenKind, actions: Vec<ViewAction>) -> ScreenSnapshot {
        let mut last = self.screen(kind);
        for action in actions {
            last = self.apply(kind, action);
        }
        last
    }
}

// ============================================================================
// FIXTURE HELPERS
// ============================================================================

/// Group keys of the rows, in order.
pub fn group_keys(snapshot: &ScreenSnapshot) -> Vec<String> {
    snapshot
        .rows
        .iter()
        .filter_map(|r| r.group_key.clone())
        .collect()
}

pub fn find_group<'a>(snapshot: &'a ScreenSnapshot, key: &str) -> Option<&'a RowData> {
    snapshot.rows.iter().find(|r| r.group_key.as_deref() == Some(key))
}

pub fn aggregate(row: &RowData, name: &str) -> Option<f64> {
    row.aggregates.iter().find(|a| a.name == name).map(|a| a.value)
}

/// Display text of `field` in a row.
pub fn cell(row: &RowData, field: &str) -> Option<String> {
    member_cell(&row.cells, field)
}

/// Display text of `field` in one member line of an expanded group.
pub fn member_cell(cells: &[CellData], field: &str) -> Option<String> {
    cells.iter().find(|c| c.field == field).map(|c| c.display.clone())
}

/// Apparel order fixture: (orderNumber, total quantity, line count).
pub struct OrderFixture;

impl OrderFixture {
    pub fn totals() -> Vec<(&'static str, f64, usize)> {
        vec![
            ("ORD-001", 125.0, 2),
            ("ORD-002", 25.0, 1),
            ("ORD-003", 180.0, 2),
            ("ORD-004", 30.0, 1),
            ("ORD-005", 125.0, 3),
            ("ORD-006", 300.0, 1),
            ("ORD-007", 18.0, 1),
            ("ORD-008", 35.0, 1),
            ("ORD-009", 175.0, 2),
        ]
    }

    pub fn total_units() -> f64 {
        Self::totals().iter().map(|(_, q, _)| q).sum()
    }
}
