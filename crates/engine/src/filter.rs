//! Query filters for list endpoints.
//!
//! Each entity declares a static table of recognized filter keys, mapped to
//! a typed column. A single value becomes an equality filter; comma-separated
//! values OR together on that one field; distinct fields AND together.
//! Unrecognized params are silently ignored so callers may pass incidental
//! fields such as pagination controls.

use std::collections::HashMap;

use sea_orm::{Condition, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, accounts, expenses, expenses::parse_date};

/// How the raw query-string value must be parsed before comparison.
#[derive(Copy, Clone, Debug)]
enum FieldKind {
    Int,
    Text,
}

/// Recognized filter fields for accounts.
const ACCOUNT_FIELDS: &[(&str, accounts::Column, FieldKind)] = &[
    ("name", accounts::Column::Name, FieldKind::Text),
    ("account_id", accounts::Column::AccountId, FieldKind::Int),
];

/// Recognized filter fields for expenses; date bounds are handled apart.
const EXPENSE_FIELDS: &[(&str, expenses::Column, FieldKind)] = &[
    ("category", expenses::Column::Category, FieldKind::Text),
    ("account_id", expenses::Column::AccountId, FieldKind::Int),
];

fn equality_condition<C>(column: C, kind: FieldKind, raw: &str) -> ResultEngine<Condition>
where
    C: ColumnTrait + Copy,
{
    // Multiple comma-separated values OR together on this one field only,
    // never across fields.
    let mut any = Condition::any();
    for value in raw.split(',') {
        any = match kind {
            FieldKind::Int => {
                let value: i32 = value.trim().parse().map_err(|_| {
                    EngineError::MalformedFilter(format!("invalid integer: {value}"))
                })?;
                any.add(column.eq(value))
            }
            FieldKind::Text => any.add(column.eq(value)),
        };
    }
    Ok(any)
}

fn apply_fields<S, C>(
    mut query: S,
    fields: &[(&str, C, FieldKind)],
    params: &HashMap<String, String>,
) -> ResultEngine<S>
where
    S: QueryFilter,
    C: ColumnTrait + Copy,
{
    for (key, column, kind) in fields {
        if let Some(raw) = params.get(*key) {
            query = query.filter(equality_condition(*column, *kind, raw)?);
        }
    }
    Ok(query)
}

/// Apply the recognized account filters from `params`.
pub fn account_filters<S>(query: S, params: &HashMap<String, String>) -> ResultEngine<S>
where
    S: QueryFilter,
{
    apply_fields(query, ACCOUNT_FIELDS, params)
}

/// Apply the recognized expense filters from `params`.
///
/// Date bounds come in two schemes, both supported:
///
/// - legacy `dateBetween=d1,d2`: inclusive `[min, max]`, order-insensitive;
/// - `from`/`to`: independent inclusive single bounds, each optional.
pub fn expense_filters<S>(query: S, params: &HashMap<String, String>) -> ResultEngine<S>
where
    S: QueryFilter,
{
    let mut query = apply_fields(query, EXPENSE_FIELDS, params)?;

    if let Some(raw) = params.get("dateBetween") {
        let dates = raw
            .split(',')
            .map(parse_date)
            .collect::<ResultEngine<Vec<_>>>()?;
        let (Some(min), Some(max)) = (dates.iter().min(), dates.iter().max()) else {
            return Err(EngineError::MalformedFilter(
                "dateBetween requires at least one date".to_string(),
            ));
        };
        query = query
            .filter(expenses::Column::Date.gte(*min))
            .filter(expenses::Column::Date.lte(*max));
    }

    if let Some(raw) = params.get("from") {
        query = query.filter(expenses::Column::Date.gte(parse_date(raw)?));
    }
    if let Some(raw) = params.get("to") {
        query = query.filter(expenses::Column::Date.lte(parse_date(raw)?));
    }

    Ok(query)
}
