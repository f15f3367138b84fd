//! FILENAME: app/src/commands.rs
// PURPOSE: Commands the presentation layer calls.
// CONTEXT: Every command returns `Result<T, String>`. A user-driven state the
// engine rejects never reaches the caller as an error: the screen shows its
// base view instead and the snapshot is flagged `fellBack`.

use records::Record;
use view_engine::{
    compute_summary, derive_view, generate_time_series, series_from_records, SeriesMetric,
    SeriesRequest, SummaryPlan, TimeRange, ViewError,
};

use crate::api_types::{row_data, ReminderResult, ScreenSnapshot, SeriesData};
use crate::datasets::RecordSource;
use crate::logging::{log_enter, log_exit, log_info, log_warn};
use crate::reminders::{send_reminder, ReminderDispatcher, Tone};
use crate::screens::{ScreenDefinition, ScreenKind};
use crate::view_state::{ModalState, ViewAction, ViewState};
use crate::DashboardState;

// ============================================================================
// SNAPSHOTS
// ============================================================================

fn build_snapshot(
    state: &DashboardState,
    screen: &ScreenDefinition,
    records: &[Record],
    view_state: &ViewState,
) -> Result<ScreenSnapshot, String> {
    let schema = screen.source.schema();
    let policy = state.config.engine.policy();

    let spec = view_state.to_view_spec(&screen.base_view);
    let (compiled, fell_back) = match spec.compile(schema, policy) {
        Ok(compiled) => (compiled, false),
        Err(ViewError::Configuration(reason)) => {
            log_warn!("VIEW", "{:?} state rejected ({}), showing base view", screen.kind, reason);
            let base = ViewState::new(view_state.page_size).to_view_spec(&screen.base_view);
            let compiled = base.compile(schema, policy).map_err(|e| e.to_string())?;
            (compiled, true)
        }
        Err(e) => return Err(e.to_string()),
    };

    let view = derive_view(records, &compiled);
    let plan = SummaryPlan::compile(&screen.metrics, schema, policy).map_err(|e| e.to_string())?;
    let summary = compute_summary(records, &plan);

    Ok(ScreenSnapshot {
        screen: screen.kind,
        title: screen.kind.title().to_string(),
        rows: view.iter().map(|row| row_data(row, schema, view_state)).collect(),
        total_matches: view.total_matches,
        page: view.page,
        summary: summary.metrics,
        state: view_state.clone(),
        fell_back,
    })
}

fn snapshot_for(
    state: &DashboardState,
    kind: ScreenKind,
    view_state: &ViewState,
) -> Result<ScreenSnapshot, String> {
    let screen = state.screen(kind)?;
    let records = state.records.lock().map_err(|e| e.to_string())?;
    let rows = records
        .get(&kind)
        .ok_or_else(|| format!("No records loaded for {:?}", kind))?;
    build_snapshot(state, screen, rows, view_state)
}

fn current_state(state: &DashboardState, kind: ScreenKind) -> Result<ViewState, String> {
    let states = state.view_states.lock().map_err(|e| e.to_string())?;
    Ok(states
        .get(&kind)
        .cloned()
        .unwrap_or_else(|| ViewState::new(state.config.screens.page_size)))
}

/// Renders a screen in its current state.
pub fn get_screen(state: &DashboardState, kind: ScreenKind) -> Result<ScreenSnapshot, String> {
    log_enter!("CMD", "get_screen", "{:?}", kind);
    let view_state = current_state(state, kind)?;
    let snapshot = snapshot_for(state, kind, &view_state)?;
    log_exit!(
        "CMD",
        "get_screen",
        "rows={} matches={}",
        snapshot.rows.len(),
        snapshot.total_matches
    );
    Ok(snapshot)
}

/// Applies one user action to a screen and renders the result.
pub fn apply_action(
    state: &DashboardState,
    kind: ScreenKind,
    action: ViewAction,
) -> Result<ScreenSnapshot, String> {
    log_enter!("CMD", "apply_action", "{:?} {:?}", kind, action);
    let next = {
        let mut states = state.view_states.lock().map_err(|e| e.to_string())?;
        let current = states
            .remove(&kind)
            .unwrap_or_else(|| ViewState::new(state.config.screens.page_size));
        let next = current.reduce(action);
        states.insert(kind, next.clone());
        next
    };
    let snapshot = snapshot_for(state, kind, &next)?;
    log_exit!("CMD", "apply_action", "matches={}", snapshot.total_matches);
    Ok(snapshot)
}

/// Parses a JSON-encoded action, then applies it.
pub fn apply_action_json(
    state: &DashboardState,
    kind: ScreenKind,
    json: &str,
) -> Result<ScreenSnapshot, String> {
    let action: ViewAction =
        serde_json::from_str(json).map_err(|e| format!("Invalid action: {}", e))?;
    apply_action(state, kind, action)
}

/// Reloads a screen's records from its source.
pub fn reload_screen(state: &DashboardState, kind: ScreenKind) -> Result<ScreenSnapshot, String> {
    let screen = state.screen(kind)?;
    let fresh = screen.source.load().map_err(|e| e.to_string())?;
    log_info!("DATA", "Reloaded {} ({} records)", screen.source.name(), fresh.len());
    state
        .records
        .lock()
        .map_err(|e| e.to_string())?
        .insert(kind, fresh);
    get_screen(state, kind)
}

// ============================================================================
// SERIES
// ============================================================================

/// Seeded chart series. Without an explicit metric, an open analytics modal
/// picks it, then the screen's default.
pub fn get_series(
    state: &DashboardState,
    kind: ScreenKind,
    range: &str,
    metric: Option<&str>,
) -> Result<SeriesData, String> {
    let range = TimeRange::from_name(range).map_err(|e| e.to_string())?;
    let metric = match metric {
        Some(name) => SeriesMetric::from_name(name).map_err(|e| e.to_string())?,
        None => match current_state(state, kind)?.modal {
            ModalState::Analytics(chart) => chart.metric(),
            _ => state.screen(kind)?.series_metric,
        },
    };

    let request = SeriesRequest {
        range,
        metric,
        anchor: state.anchor,
        seed: state.config.screens.seed,
    };
    Ok(SeriesData::from_series(metric.label(), generate_time_series(&request)))
}

/// Chart series bucketed from the screen's own records.
pub fn get_record_series(
    state: &DashboardState,
    kind: ScreenKind,
    range: &str,
) -> Result<SeriesData, String> {
    let range = TimeRange::from_name(range).map_err(|e| e.to_string())?;
    let screen = state.screen(kind)?;
    let records = state.records.lock().map_err(|e| e.to_string())?;
    let rows = records
        .get(&kind)
        .ok_or_else(|| format!("No records loaded for {:?}", kind))?;

    let schema = screen.source.schema();
    let series = series_from_records(rows, schema, &screen.series_source, range, state.anchor)
        .map_err(|e| e.to_string())?;
    Ok(SeriesData::from_series(screen.series_metric.label(), series))
}

// ============================================================================
// REMINDERS
// ============================================================================

/// Sends a reminder for an apparel order to the order's customer.
/// Dispatch failures are reported in the result, not as an error.
pub async fn send_order_reminder(
    state: &DashboardState,
    dispatcher: &dyn ReminderDispatcher,
    order_id: &str,
    tone: Tone,
) -> Result<ReminderResult, String> {
    let customer = {
        let screen = state.screen(ScreenKind::Apparel)?;
        let schema = screen.source.schema();
        let fields = (schema.field_index("orderNumber"), schema.field_index("customer"));
        let (number, customer) = match fields {
            (Some(n), Some(c)) => (n, c),
            _ => return Err("Apparel schema has no order/customer fields".to_string()),
        };
        let records = state.records.lock().map_err(|e| e.to_string())?;
        records
            .get(&ScreenKind::Apparel)
            .and_then(|rows| {
                rows.iter()
                    .find(|r| r.get(number).as_text() == Some(order_id.trim()))
            })
            .map(|r| r.get(customer).display_text())
            .ok_or_else(|| format!("Unknown order: {}", order_id))?
    };

    let timeout = state.config.reminders.timeout();
    let result = send_reminder(dispatcher, &customer, order_id, tone, timeout).await;
    Ok(match result {
        Ok(receipt) => ReminderResult {
            success: true,
            reminder_id: Some(receipt.reminder_id.to_string()),
            message: format!("Reminder sent to {} for {}", customer, receipt.order_id),
        },
        Err(e) => ReminderResult {
            success: false,
            reminder_id: None,
            message: e.to_string(),
        },
    })
}
