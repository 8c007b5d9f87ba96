// Store abstraction: the adapter trait plus the model names the service
// reads and writes. Schema ownership lives with the hosting platform; the
// adapter only moves rows in and out as JSON objects with snake_case keys.

pub mod adapter;
pub mod models;

pub use adapter::{Adapter, AdapterResult, FindManyQuery, Operator, SortBy, SortDirection, WhereClause};
