// Store adapter trait — the abstraction every backing store implements.
//
// The store executes one statement at a time; there is no multi-statement
// transaction surface here. Callers that need all-or-nothing semantics
// across several statements compensate explicitly (see the carousel
// creation handler).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Result type for adapter operations.
pub type AdapterResult<T> = std::result::Result<T, StoreError>;

// ─── Where Clause ────────────────────────────────────────────────

/// Comparison operators for WHERE clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Equal (default).
    Eq,
    /// Not equal.
    Ne,
    /// Value is in the given list.
    In,
    /// String starts with prefix.
    StartsWith,
}

impl Default for Operator {
    fn default() -> Self {
        Self::Eq
    }
}

/// A single WHERE condition. Clauses in a list are ANDed together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhereClause {
    /// The column to filter on.
    pub field: String,
    /// The comparison value.
    pub value: serde_json::Value,
    /// The comparison operator (default: Eq).
    #[serde(default)]
    pub operator: Operator,
}

impl WhereClause {
    /// Simple equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator: Operator::Eq,
        }
    }

    /// Membership filter (`field IN values`).
    pub fn is_in(field: impl Into<String>, values: Vec<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            value: serde_json::Value::Array(values),
            operator: Operator::In,
        }
    }
}

// ─── Sort / Pagination ───────────────────────────────────────────

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort key (column + direction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortBy {
    pub field: String,
    pub direction: SortDirection,
}

/// Query parameters for `find_many`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindManyQuery {
    pub where_clauses: Vec<WhereClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

// ─── Adapter Trait ───────────────────────────────────────────────

/// The store adapter trait.
///
/// Rows are `serde_json::Value` objects keyed by column name, so the trait
/// stays schema-agnostic; handlers own the shape of what they write.
#[async_trait]
pub trait Adapter: Send + Sync + fmt::Debug {
    /// Insert a row into the given model/table.
    /// Returns the stored row, with an `id` generated if the caller
    /// did not supply one.
    async fn create(&self, model: &str, data: serde_json::Value) -> AdapterResult<serde_json::Value>;

    /// Find a single row matching the WHERE clauses, or `None`.
    async fn find_one(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
    ) -> AdapterResult<Option<serde_json::Value>>;

    /// Find all rows matching the query parameters.
    async fn find_many(&self, model: &str, query: FindManyQuery) -> AdapterResult<Vec<serde_json::Value>>;

    /// Count rows matching the WHERE clauses.
    async fn count(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<i64>;

    /// Update the first row matching the WHERE clauses.
    /// Returns the updated row, or `None` when nothing matched.
    async fn update(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
        data: serde_json::Value,
    ) -> AdapterResult<Option<serde_json::Value>>;

    /// Update every row matching the WHERE clauses.
    /// Returns the number of affected rows; zero matches is not an error.
    async fn update_many(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
        data: serde_json::Value,
    ) -> AdapterResult<i64>;

    /// Delete the first row matching the WHERE clauses, if any.
    async fn delete(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<()>;

    /// Delete every row matching the WHERE clauses.
    /// Returns the number of deleted rows.
    async fn delete_many(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<i64>;
}
