//! FILENAME: app/src/view_state.rs
// PURPOSE: Per-screen UI state with pure transitions.
// CONTEXT: Screens never mutate state in place. Every user input becomes a
// `ViewAction`, `reduce` returns the next state, and `to_view_spec` turns the
// state into the view definition handed to the engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use view_engine::{
    FieldFilter, PageRequest, SearchSpec, SeriesMetric, SortDirection, SortSpec, ViewSpec,
};

use crate::logging::log_warn;

// ============================================================================
// MODALS
// ============================================================================

/// Charts reachable from the analytics modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalyticsKind {
    SalesOverview,
    OrderVolume,
    ProductionUnits,
    ProjectPipeline,
}

impl AnalyticsKind {
    pub fn metric(&self) -> SeriesMetric {
        match self {
            AnalyticsKind::SalesOverview => SeriesMetric::Revenue,
            AnalyticsKind::OrderVolume => SeriesMetric::Orders,
            AnalyticsKind::ProductionUnits => SeriesMetric::Units,
            AnalyticsKind::ProjectPipeline => SeriesMetric::Projects,
        }
    }
}

/// At most one modal is open per screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum ModalState {
    #[default]
    Closed,
    Faq,
    Notifications,
    Analytics(AnalyticsKind),
    BrandGuidelines { customer: String },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ViewAction {
    SetSearch(String),
    /// Replaces any filter already set on the same field.
    ApplyFilter(FieldFilter),
    ClearFilter(String),
    /// Resets search, filters, sort, paging and expansion.
    ClearAll,
    SetSort(SortSpec),
    /// Same field flips the direction; a new field starts ascending.
    ToggleSort(String),
    /// Expands or collapses the group with this key.
    ToggleExpand(String),
    SetPage(usize),
    OpenModal(ModalState),
    CloseModal,
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub search: String,
    pub filters: Vec<FieldFilter>,
    pub sort: Option<SortSpec>,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub expanded: BTreeSet<String>,
    pub modal: ModalState,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        ViewState {
            search: String::new(),
            filters: Vec::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
            expanded: BTreeSet::new(),
            modal: ModalState::Closed,
        }
    }

    /// Returns the state after `action`. Anything that changes the result set
    /// returns to the first page.
    pub fn reduce(mut self, action: ViewAction) -> ViewState {
        match action {
            ViewAction::SetSearch(term) => {
                self.search = term;
                self.page = 1;
            }
            ViewAction::ApplyFilter(filter) => {
                self.filters.retain(|f| f.field != filter.field);
                self.filters.push(filter);
                self.page = 1;
            }
            ViewAction::ClearFilter(field) => {
                self.filters.retain(|f| f.field != field);
                self.page = 1;
            }
            ViewAction::ClearAll => {
                self.search.clear();
                self.filters.clear();
                self.sort = None;
                self.expanded.clear();
                self.page = 1;
            }
            ViewAction::SetSort(sort) => {
                self.sort = Some(sort);
            }
            ViewAction::ToggleSort(field) => {
                let direction = match &self.sort {
                    Some(current) if current.field == field => current.direction.reversed(),
                    _ => SortDirection::Ascending,
                };
                self.sort = Some(SortSpec { field, direction });
            }
            ViewAction::ToggleExpand(key) => {
                if !self.expanded.remove(&key) {
                    self.expanded.insert(key);
                }
            }
            ViewAction::SetPage(page) => {
                self.page = page.max(1);
            }
            ViewAction::OpenModal(modal) => match &modal {
                ModalState::BrandGuidelines { customer } if customer.trim().is_empty() => {
                    log_warn!("VIEW", "Ignoring brand guidelines modal without a customer");
                }
                _ => self.modal = modal,
            },
            ViewAction::CloseModal => {
                self.modal = ModalState::Closed;
            }
        }
        self
    }

    /// Layers this state over a screen's base view.
    pub fn to_view_spec(&self, base: &ViewSpec) -> ViewSpec {
        let mut spec = base.clone();
        spec.filters.extend(self.filters.iter().cloned());

        let term = self.search.trim();
        if !term.is_empty() {
            let fields = base.search.as_ref().and_then(|s| s.fields.clone());
            spec.search = Some(SearchSpec {
                term: term.to_string(),
                fields,
            });
        }

        if let Some(sort) = &self.sort {
            spec.sort = Some(sort.clone());
        }

        spec.page = Some(PageRequest {
            page: self.page,
            page_size: self.page_size,
        });
        spec
    }
}
