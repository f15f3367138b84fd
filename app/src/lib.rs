//! FILENAME: app/src/lib.rs
// PURPOSE: Main library entry point for the dashboard backend.
// CONTEXT: Owns the screens, their record collections and their UI state. The
// view engine is called fresh on every command; nothing derived is cached.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use records::Record;

pub mod api_types;
pub mod commands;
pub mod config;
pub mod datasets;
pub mod logging;
pub mod reminders;
pub mod screens;
pub mod view_state;

pub use api_types::{CellData, ReminderResult, RowData, ScreenSnapshot, SeriesData};
pub use config::{ConfigError, DashboardConfig};
pub use datasets::{InMemorySource, RecordSource};
pub use logging::{init_logging, next_seq};
pub use reminders::{send_reminder, ReminderDispatcher, ReminderError, SimulatedDispatcher, Tone};
pub use screens::{ScreenDefinition, ScreenKind};
pub use view_state::{AnalyticsKind, ModalState, ViewAction, ViewState};

pub struct DashboardState {
    pub config: DashboardConfig,
    /// Date the chart labels end at.
    pub anchor: NaiveDate,
    /// In `ScreenKind::ALL` order.
    pub screens: Vec<ScreenDefinition>,
    /// Loaded record collection per screen
    pub records: Mutex<HashMap<ScreenKind, Vec<Record>>>,
    pub view_states: Mutex<HashMap<ScreenKind, ViewState>>,
}

impl DashboardState {
    pub fn screen(&self, kind: ScreenKind) -> Result<&ScreenDefinition, String> {
        self.screens
            .iter()
            .find(|s| s.kind == kind)
            .ok_or_else(|| format!("Screen not configured: {:?}", kind))
    }
}

pub fn create_dashboard_state(config: DashboardConfig) -> Result<DashboardState, String> {
    log_info!("SYS", "Creating DashboardState");
    let anchor = config.screens.anchor().map_err(|e| e.to_string())?;
    let screens = screens::default_screens(config.screens.seed, anchor).map_err(|e| e.to_string())?;

    let mut records = HashMap::new();
    let mut view_states = HashMap::new();
    for screen in &screens {
        let loaded = screen.source.load().map_err(|e| e.to_string())?;
        log_info!("DATA", "Loaded {} ({} records)", screen.source.name(), loaded.len());
        records.insert(screen.kind, loaded);
        view_states.insert(screen.kind, ViewState::new(config.screens.page_size));
    }

    Ok(DashboardState {
        config,
        anchor,
        screens,
        records: Mutex::new(records),
        view_states: Mutex::new(view_states),
    })
}

fn load_config() -> Result<DashboardConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => DashboardConfig::load(Path::new(&path)),
        None => Ok(DashboardConfig::default()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn render_all(state: &DashboardState) -> Result<(), String> {
    for kind in ScreenKind::ALL {
        print_json(&commands::get_screen(state, kind)?)?;
        print_json(&commands::get_series(state, kind, "week", None)?)?;
    }

    let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    let dispatcher = SimulatedDispatcher::new(state.config.reminders.simulated_delay());
    let reminder = commands::send_order_reminder(state, &dispatcher, "ORD-001", Tone::Friendly);
    let result = runtime.block_on(reminder)?;
    print_json(&result)
}

/// Loads configuration (path from the first argument), then prints a JSON
/// snapshot of every screen.
pub fn run() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[CONFIG] {}", e);
            std::process::exit(2);
        }
    };

    match init_logging(&config.logging) {
        Ok(Some(path)) => log_info!("SYS", "Dashboard starting, log={}", path.display()),
        Ok(None) => log_info!("SYS", "Dashboard starting, console-only logging"),
        Err(e) => eprintln!("[LOG_INIT] FAILED: {}", e),
    }

    let outcome = create_dashboard_state(config).and_then(|state| render_all(&state));
    if let Err(e) = outcome {
        log_error!("SYS", "{}", e);
        std::process::exit(1);
    }
}
