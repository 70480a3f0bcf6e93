//! SQL restriction building for server-side filtering.
//!
//! Each group becomes one parenthesised condition; each category inside it a
//! `"field" = ANY($pN)` test bound to the category's values. Conditions are
//! meant to be joined with AND, matching the in-memory matcher except for its
//! substring rule, which a database would express differently.

use super::{group, FieldMapping};
use crate::error::Result;
use crate::ir::DemographicOption;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterQuery {
    /// The selections the query was built from.
    pub filters: Vec<DemographicOption>,
    /// One condition per group.
    pub sql_conditions: Vec<String>,
    /// Parameter name to bound values.
    pub query_params: BTreeMap<String, Vec<String>>,
}

impl FilterQuery {
    /// Conditions joined with AND, or `None` when there is nothing to filter.
    pub fn where_clause(&self) -> Option<String> {
        if self.sql_conditions.is_empty() {
            None
        } else {
            Some(self.sql_conditions.join(" AND "))
        }
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Build a parameterised restriction for `selections`.
///
/// Parameter names are `p1`, `p2`, ... in selection order so the output is
/// deterministic. Fails when an `options` category has no field mapping.
pub fn build_query(selections: &[DemographicOption], mapping: &FieldMapping) -> Result<FilterQuery> {
    let grouped = group(selections);
    let mut sql_conditions = Vec::with_capacity(grouped.group_count());
    let mut query_params = BTreeMap::new();
    let mut next_param = 1usize;

    for g in grouped.groups() {
        let mut category_conditions = Vec::with_capacity(g.categories.len());
        for c in &g.categories {
            let field = mapping.resolve(&g.group, &c.category)?;
            let param = format!("p{next_param}");
            next_param += 1;
            category_conditions.push(format!("{} = ANY(${param})", quote_identifier(&field)));
            query_params.insert(param, c.values.clone());
        }
        if !category_conditions.is_empty() {
            sql_conditions.push(format!("({})", category_conditions.join(" AND ")));
        }
    }

    Ok(FilterQuery {
        filters: selections.to_vec(),
        sql_conditions,
        query_params,
    })
}
