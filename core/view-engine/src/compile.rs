//! FILENAME: core/view-engine/src/compile.rs
//! PURPOSE: Resolves a ViewSpec against a RecordSchema before any data is processed.
//! CONTEXT: Every field name is turned into an index and every filter value is
//! coerced to its field's kind here, so deriving a view cannot fail halfway
//! through a sort comparator.

use records::{compare_present, FieldIndex, FieldKind, FieldValue, RecordSchema, SortDirection};
use crate::definition::{
    AggregationPolicy, AggregationType, FieldFilter, FilterCondition, GroupSpec, PageRequest,
    ViewSpec,
};
use crate::error::ViewError;

/// A resolved reference to the value a filter or sort reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    /// A schema field (read from the representative record for groups).
    Field(FieldIndex),
    /// The n-th group aggregate.
    Aggregate(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledAggregate {
    pub name: String,
    pub field: Option<FieldIndex>,
    pub aggregation: AggregationType,
    /// Set when a lenient policy accepted a numeric reducer on a non-numeric field.
    pub degraded: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledGroup {
    pub key: FieldIndex,
    pub aggregates: Vec<CompiledAggregate>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CompiledCondition {
    Equals(FieldValue),
    OneOf(Vec<FieldValue>),
    Range {
        min: Option<FieldValue>,
        max: Option<FieldValue>,
    },
}

impl CompiledCondition {
    pub fn matches(&self, value: &FieldValue) -> bool {
        match self {
            CompiledCondition::Equals(expected) => value == expected,
            CompiledCondition::OneOf(options) => options.iter().any(|o| o == value),
            CompiledCondition::Range { min, max } => {
                if value.is_missing() {
                    return false;
                }
                let above_min = min
                    .as_ref()
                    .map_or(true, |m| compare_present(value, m).is_ge());
                let below_max = max
                    .as_ref()
                    .map_or(true, |m| compare_present(value, m).is_le());
                above_min && below_max
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledFilter {
    pub target: FieldRef,
    pub condition: CompiledCondition,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledSearch {
    /// Lowercased, trimmed search term.
    pub needle: String,
    pub fields: Vec<FieldIndex>,
}

/// A view definition with every reference resolved against a schema.
///
/// Built once per state change with `ViewSpec::compile`, then handed to
/// `derive_view` any number of times.
#[derive(Debug, Clone)]
pub struct CompiledView {
    pub(crate) group: Option<CompiledGroup>,
    pub(crate) filters: Vec<CompiledFilter>,
    pub(crate) search: Option<CompiledSearch>,
    pub(crate) sort: Option<(FieldRef, SortDirection)>,
    pub(crate) page: Option<PageRequest>,
    /// Aggregate names in output order, shared by every group of a view.
    pub(crate) aggregate_names: Vec<String>,
}

impl CompiledView {
    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }

    pub fn aggregate_names(&self) -> &[String] {
        &self.aggregate_names
    }

    /// The effective sort, after falling back to the schema default.
    pub fn sort(&self) -> Option<(FieldRef, SortDirection)> {
        self.sort
    }

    pub fn page(&self) -> Option<PageRequest> {
        self.page
    }
}

impl ViewSpec {
    /// Validates the definition against `schema` and resolves it for `derive_view`.
    pub fn compile(
        &self,
        schema: &RecordSchema,
        policy: AggregationPolicy,
    ) -> Result<CompiledView, ViewError> {
        let group = match &self.group {
            Some(spec) => Some(compile_group(spec, schema, policy)?),
            None => None,
        };
        let aggregate_names: Vec<String> = group
            .as_ref()
            .map(|g| g.aggregates.iter().map(|a| a.name.clone()).collect())
            .unwrap_or_default();

        let filters = self
            .filters
            .iter()
            .map(|f| compile_filter(f, schema, &aggregate_names))
            .collect::<Result<Vec<_>, _>>()?;

        let search = match &self.search {
            Some(search) if !search.term.trim().is_empty() => {
                let fields = match &search.fields {
                    Some(names) => names
                        .iter()
                        .map(|n| resolve_field(schema, n, "search"))
                        .collect::<Result<Vec<_>, _>>()?,
                    None => schema.searchable_fields(),
                };
                if fields.is_empty() {
                    return Err(ViewError::config(
                        "search requested but no searchable fields are configured",
                    ));
                }
                Some(CompiledSearch {
                    needle: search.term.trim().to_lowercase(),
                    fields,
                })
            }
            _ => None,
        };

        let sort = match &self.sort {
            Some(spec) => Some((
                resolve_ref(schema, &aggregate_names, &spec.field, "sort")?,
                spec.direction,
            )),
            None => schema
                .default_sort()
                .map(|(idx, direction)| (FieldRef::Field(idx), direction)),
        };

        if let Some(page) = self.page {
            if page.page == 0 || page.page_size == 0 {
                return Err(ViewError::config(format!(
                    "page and pageSize must be at least 1 (got page {} of size {})",
                    page.page, page.page_size
                )));
            }
        }

        Ok(CompiledView {
            group,
            filters,
            search,
            sort,
            page: self.page,
            aggregate_names,
        })
    }
}

fn resolve_field(schema: &RecordSchema, name: &str, usage: &str) -> Result<FieldIndex, ViewError> {
    schema
        .field_index(name)
        .ok_or_else(|| ViewError::config(format!("{} references unknown field '{}'", usage, name)))
}

/// Resolves a name to an aggregate (when grouped) or a schema field.
/// Aggregate names shadow schema fields of the same name.
fn resolve_ref(
    schema: &RecordSchema,
    aggregate_names: &[String],
    name: &str,
    usage: &str,
) -> Result<FieldRef, ViewError> {
    if let Some(i) = aggregate_names.iter().position(|a| a == name) {
        return Ok(FieldRef::Aggregate(i));
    }
    resolve_field(schema, name, usage).map(FieldRef::Field)
}

pub(crate) fn compile_group(
    spec: &GroupSpec,
    schema: &RecordSchema,
    policy: AggregationPolicy,
) -> Result<CompiledGroup, ViewError> {
    let key = resolve_field(schema, &spec.key, "group key")?;
    let mut aggregates = Vec::with_capacity(spec.aggregates.len());

    for aggregate in &spec.aggregates {
        if aggregates
            .iter()
            .any(|a: &CompiledAggregate| a.name == aggregate.name)
        {
            return Err(ViewError::config(format!(
                "duplicate aggregate name '{}'",
                aggregate.name
            )));
        }

        let field = match &aggregate.field {
            Some(name) => Some(resolve_field(schema, name, "aggregate")?),
            None if aggregate.aggregation == AggregationType::Count => None,
            None => {
                return Err(ViewError::config(format!(
                    "aggregate '{}' needs a source field",
                    aggregate.name
                )))
            }
        };

        let degraded = match field {
            Some(idx) => check_numeric(schema, idx, aggregate.aggregation, policy)?,
            None => false,
        };

        aggregates.push(CompiledAggregate {
            name: aggregate.name.clone(),
            field,
            aggregation: aggregate.aggregation,
            degraded,
        });
    }

    Ok(CompiledGroup { key, aggregates })
}

/// Returns whether the reducer must degrade to zero, or fails under a strict policy.
pub(crate) fn check_numeric(
    schema: &RecordSchema,
    field: FieldIndex,
    aggregation: AggregationType,
    policy: AggregationPolicy,
) -> Result<bool, ViewError> {
    let Some(field_schema) = schema.field(field) else {
        return Err(ViewError::config(format!("field index {} out of range", field)));
    };
    if !aggregation.requires_numeric() || field_schema.kind.is_numeric() {
        return Ok(false);
    }
    match policy {
        AggregationPolicy::Strict => Err(ViewError::AggregationTypeMismatch {
            field: field_schema.name.clone(),
            aggregation,
        }),
        AggregationPolicy::Lenient => {
            log::warn!(
                "{:?} over non-numeric field '{}' degrades to zero",
                aggregation,
                field_schema.name
            );
            Ok(true)
        }
    }
}

fn compile_filter(
    filter: &FieldFilter,
    schema: &RecordSchema,
    aggregate_names: &[String],
) -> Result<CompiledFilter, ViewError> {
    let target = resolve_ref(schema, aggregate_names, &filter.field, "filter")?;
    let kind = match target {
        FieldRef::Aggregate(_) => FieldKind::Number,
        FieldRef::Field(idx) => schema
            .field(idx)
            .map(|f| f.kind.clone())
            .ok_or_else(|| ViewError::config(format!("field index {} out of range", idx)))?,
    };
    let condition = compile_condition(&filter.field, &kind, &filter.condition)?;
    Ok(CompiledFilter { target, condition })
}

pub(crate) fn compile_condition(
    field: &str,
    kind: &FieldKind,
    condition: &FilterCondition,
) -> Result<CompiledCondition, ViewError> {
    let coerce = |value: &FieldValue| {
        kind.coerce(value.clone())
            .map_err(|reason| ViewError::config(format!("filter on '{}': {}", field, reason)))
    };

    match condition {
        FilterCondition::Equals(value) => Ok(CompiledCondition::Equals(coerce(value)?)),
        FilterCondition::OneOf(values) => Ok(CompiledCondition::OneOf(
            values.iter().map(coerce).collect::<Result<Vec<_>, _>>()?,
        )),
        FilterCondition::Range { min, max } => {
            if !kind.is_orderable() {
                return Err(ViewError::config(format!(
                    "range filter on '{}' needs an orderable field, found {}",
                    field,
                    kind.name()
                )));
            }
            let min = min.as_ref().map(coerce).transpose()?.filter(|v| !v.is_missing());
            let max = max.as_ref().map(coerce).transpose()?.filter(|v| !v.is_missing());
            if let (Some(lo), Some(hi)) = (&min, &max) {
                if compare_present(lo, hi).is_gt() {
                    return Err(ViewError::config(format!(
                        "range filter on '{}' has min {} above max {}",
                        field,
                        lo.display_text(),
                        hi.display_text()
                    )));
                }
            }
            Ok(CompiledCondition::Range { min, max })
        }
    }
}
