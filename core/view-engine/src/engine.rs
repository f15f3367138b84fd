//! FILENAME: core/view-engine/src/engine.rs
//! View Engine - Transforms a record collection into a derived view.
//!
//! This module takes a CompiledView (configuration) and a record slice (data)
//! and produces a DerivedView (ordered rows ready for rendering).
//!
//! Algorithm (fixed order, so output is reproducible):
//! 1. Group records sharing the group key, first-seen order, with aggregates
//! 2. Filter rows; groups answer from their aggregates or representative
//! 3. Search the searchable fields, case-insensitively
//! 4. Stable sort by the requested field, or the schema default
//! 5. Cut the requested page

use std::collections::hash_map::Entry;
use rustc_hash::FxHashMap;
use records::{compare_values, Record, ValueKey};
use crate::accumulator::AggregateAccumulator;
use crate::compile::{CompiledGroup, CompiledSearch, CompiledView};
use crate::definition::PageRequest;
use crate::view::{DerivedView, Group, PageInfo, ViewRow};

/// Derives the view of `records` described by `view`.
///
/// Pure and total: the input is never mutated, nothing is cached between
/// calls, and a view that matches nothing is simply empty.
pub fn derive_view<'a>(records: &'a [Record], view: &'a CompiledView) -> DerivedView<'a> {
    // Step 1: Grouping
    let mut rows: Vec<ViewRow<'a>> = match &view.group {
        Some(group) => group_records(records, group, &view.aggregate_names)
            .into_iter()
            .map(ViewRow::Group)
            .collect(),
        None => records.iter().map(ViewRow::Record).collect(),
    };

    // Step 2: Filters (ANDed)
    if !view.filters.is_empty() {
        rows.retain(|row| {
            view.filters
                .iter()
                .all(|filter| filter.condition.matches(&row.value(filter.target)))
        });
    }

    // Step 3: Search
    if let Some(search) = &view.search {
        rows.retain(|row| row_matches_search(row, search));
    }

    // Step 4: Stable sort; ties keep their prior relative order
    if let Some((target, direction)) = view.sort {
        rows.sort_by(|a, b| compare_values(&a.value(target), &b.value(target), direction));
    }

    let total_matches = rows.len();

    // Step 5: Pagination
    let page = view.page.map(|request| paginate(&mut rows, request, total_matches));

    log::debug!(
        "derived view: {} input records, {} matches, {} rows returned",
        records.len(),
        total_matches,
        rows.len()
    );

    DerivedView {
        rows,
        total_matches,
        page,
    }
}

/// Merges records into groups keyed by the group field, in first-seen order.
fn group_records<'a>(
    records: &'a [Record],
    group: &CompiledGroup,
    names: &'a [String],
) -> Vec<Group<'a>> {
    let mut index: FxHashMap<ValueKey, usize> = FxHashMap::default();
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut accumulators: Vec<Vec<AggregateAccumulator>> = Vec::new();

    for record in records {
        let key_value = record.get(group.key);

        let slot = match index.entry(ValueKey::from(key_value)) {
            Entry::Occupied(entry) => {
                let slot = *entry.get();
                groups[slot].members.push(record);
                slot
            }
            Entry::Vacant(entry) => {
                let slot = groups.len();
                entry.insert(slot);
                groups.push(Group::new(key_value.clone(), record, names));
                accumulators.push(
                    group
                        .aggregates
                        .iter()
                        .map(|a| AggregateAccumulator::for_aggregation(a.aggregation))
                        .collect(),
                );
                slot
            }
        };

        for (acc, aggregate) in accumulators[slot].iter_mut().zip(&group.aggregates) {
            match aggregate.field {
                Some(field) if !aggregate.degraded => acc.add(record.get(field)),
                _ => acc.add_row(),
            }
        }
    }

    for (g, accs) in groups.iter_mut().zip(&accumulators) {
        g.aggregates = accs
            .iter()
            .zip(&group.aggregates)
            .map(|(acc, aggregate)| {
                if aggregate.degraded {
                    0.0
                } else {
                    acc.compute(aggregate.aggregation)
                }
            })
            .collect();
    }

    groups
}

fn record_matches_search(record: &Record, search: &CompiledSearch) -> bool {
    search.fields.iter().any(|&field| {
        record
            .get(field)
            .display_text()
            .to_lowercase()
            .contains(&search.needle)
    })
}

/// A group matches when any of its members does.
fn row_matches_search(row: &ViewRow<'_>, search: &CompiledSearch) -> bool {
    match row {
        ViewRow::Record(record) => record_matches_search(record, search),
        ViewRow::Group(group) => group
            .members
            .iter()
            .any(|member| record_matches_search(member, search)),
    }
}

fn paginate(rows: &mut Vec<ViewRow<'_>>, request: PageRequest, total: usize) -> PageInfo {
    let size = request.page_size.max(1);
    let total_pages = total.div_ceil(size);
    let start = request.page.saturating_sub(1).saturating_mul(size);

    if start >= rows.len() {
        rows.clear();
    } else {
        rows.truncate(start.saturating_add(size));
        rows.drain(..start);
    }

    PageInfo {
        page: request.page,
        page_size: size,
        total_pages,
    }
}
