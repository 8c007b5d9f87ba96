// In-memory store adapter — HashMap-based rows behind a tokio RwLock.
//
// Rows live in `HashMap<String, Vec<serde_json::Value>>` keyed by model
// name. Mirrors the per-statement semantics of the hosted store: each call
// is independent and there is no multi-statement transaction surface.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use slideworks_core::db::adapter::{
    Adapter, AdapterResult, FindManyQuery, Operator, SortDirection, WhereClause,
};

/// Type alias for the in-memory store.
type Store = HashMap<String, Vec<serde_json::Value>>;

/// In-memory store adapter.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    store: Arc<RwLock<Store>>,
}

impl MemoryAdapter {
    /// Create a new empty in-memory adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of all data (for debugging/testing).
    pub async fn snapshot(&self) -> Store {
        self.store.read().await.clone()
    }

    /// Clear all data.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Row count for a specific model.
    pub async fn model_count(&self, model: &str) -> usize {
        self.store
            .read()
            .await
            .get(model)
            .map(|rows| rows.len())
            .unwrap_or(0)
    }
}

/// Check whether a row matches every WHERE clause (clauses are ANDed).
fn matches_where(row: &serde_json::Value, clauses: &[WhereClause]) -> bool {
    clauses.iter().all(|clause| {
        let field_val = row.get(&clause.field).cloned().unwrap_or(serde_json::Value::Null);
        match clause.operator {
            Operator::Eq => field_val == clause.value,
            Operator::Ne => field_val != clause.value,
            Operator::In => match &clause.value {
                serde_json::Value::Array(candidates) => candidates.contains(&field_val),
                _ => false,
            },
            Operator::StartsWith => {
                let fs = field_val.as_str().unwrap_or("");
                let ts = clause.value.as_str().unwrap_or("");
                fs.starts_with(ts)
            }
        }
    })
}

/// Compare two JSON values numerically or lexicographically.
fn compare_json(a: &serde_json::Value, b: &serde_json::Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (serde_json::Value::Number(an), serde_json::Value::Number(bn)) => {
            an.as_f64()?.partial_cmp(&bn.as_f64()?)
        }
        (serde_json::Value::String(a_s), serde_json::Value::String(b_s)) => Some(a_s.cmp(b_s)),
        _ => None,
    }
}

/// Merge update data into an existing row.
fn merge_update(row: &mut serde_json::Value, data: &serde_json::Value) {
    if let (Some(row_obj), Some(data_obj)) = (row.as_object_mut(), data.as_object()) {
        for (k, v) in data_obj {
            row_obj.insert(k.clone(), v.clone());
        }
    }
}

#[async_trait]
impl Adapter for MemoryAdapter {
    async fn create(&self, model: &str, data: serde_json::Value) -> AdapterResult<serde_json::Value> {
        let mut row = data;

        // Auto-generate an id if the caller did not supply one
        if row.get("id").is_none() || row.get("id") == Some(&serde_json::Value::Null) {
            if let Some(obj) = row.as_object_mut() {
                obj.insert(
                    "id".to_string(),
                    serde_json::Value::String(uuid::Uuid::new_v4().to_string()),
                );
            }
        }

        let mut store = self.store.write().await;
        store.entry(model.to_string()).or_default().push(row.clone());

        Ok(row)
    }

    async fn find_one(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
    ) -> AdapterResult<Option<serde_json::Value>> {
        let store = self.store.read().await;
        Ok(store
            .get(model)
            .and_then(|rows| rows.iter().find(|r| matches_where(r, where_clauses)).cloned()))
    }

    async fn find_many(&self, model: &str, query: FindManyQuery) -> AdapterResult<Vec<serde_json::Value>> {
        let store = self.store.read().await;
        let empty = Vec::new();
        let rows = store.get(model).unwrap_or(&empty);

        let mut result: Vec<serde_json::Value> = rows
            .iter()
            .filter(|r| matches_where(r, &query.where_clauses))
            .cloned()
            .collect();

        if let Some(ref sort) = query.sort_by {
            result.sort_by(|a, b| {
                let cmp = match (a.get(&sort.field), b.get(&sort.field)) {
                    (Some(av), Some(bv)) => compare_json(av, bv).unwrap_or(std::cmp::Ordering::Equal),
                    (Some(_), None) => std::cmp::Ordering::Greater,
                    (None, Some(_)) => std::cmp::Ordering::Less,
                    (None, None) => std::cmp::Ordering::Equal,
                };
                match sort.direction {
                    SortDirection::Asc => cmp,
                    SortDirection::Desc => cmp.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            result.truncate(limit as usize);
        }

        Ok(result)
    }

    async fn count(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<i64> {
        let store = self.store.read().await;
        let count = store
            .get(model)
            .map(|rows| rows.iter().filter(|r| matches_where(r, where_clauses)).count())
            .unwrap_or(0);
        Ok(count as i64)
    }

    async fn update(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
        data: serde_json::Value,
    ) -> AdapterResult<Option<serde_json::Value>> {
        let mut store = self.store.write().await;
        if let Some(rows) = store.get_mut(model) {
            if let Some(row) = rows.iter_mut().find(|r| matches_where(r, where_clauses)) {
                merge_update(row, &data);
                return Ok(Some(row.clone()));
            }
        }
        Ok(None)
    }

    async fn update_many(
        &self,
        model: &str,
        where_clauses: &[WhereClause],
        data: serde_json::Value,
    ) -> AdapterResult<i64> {
        let mut store = self.store.write().await;
        let mut count = 0i64;
        if let Some(rows) = store.get_mut(model) {
            for row in rows.iter_mut() {
                if matches_where(row, where_clauses) {
                    merge_update(row, &data);
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    async fn delete(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<()> {
        let mut store = self.store.write().await;
        if let Some(rows) = store.get_mut(model) {
            if let Some(pos) = rows.iter().position(|r| matches_where(r, where_clauses)) {
                rows.remove(pos);
            }
        }
        Ok(())
    }

    async fn delete_many(&self, model: &str, where_clauses: &[WhereClause]) -> AdapterResult<i64> {
        let mut store = self.store.write().await;
        if let Some(rows) = store.get_mut(model) {
            let before = rows.len();
            rows.retain(|r| !matches_where(r, where_clauses));
            Ok((before - rows.len()) as i64)
        } else {
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use slideworks_core::db::adapter::SortBy;
    use slideworks_core::db::models;

    #[tokio::test]
    async fn create_and_find_one() {
        let adapter = MemoryAdapter::new();
        adapter
            .create(models::MEDIA, json!({"id": "m1", "path": "user_1/a.png", "user_id": "1"}))
            .await
            .unwrap();

        let found = adapter
            .find_one(models::MEDIA, &[WhereClause::eq("id", "m1")])
            .await
            .unwrap();
        assert_eq!(found.unwrap()["path"], "user_1/a.png");
    }

    #[tokio::test]
    async fn create_auto_generates_id() {
        let adapter = MemoryAdapter::new();
        let row = adapter
            .create(models::MEDIA, json!({"path": "user_1/b.png"}))
            .await
            .unwrap();
        assert!(row["id"].is_string());
    }

    #[tokio::test]
    async fn find_one_not_found() {
        let adapter = MemoryAdapter::new();
        let found = adapter
            .find_one(models::CAROUSEL, &[WhereClause::eq("id", "missing")])
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_many_sorted_by_position() {
        let adapter = MemoryAdapter::new();
        for (id, position) in [("s3", 3), ("s1", 1), ("s2", 2)] {
            adapter
                .create(
                    models::CAROUSEL_SLIDE,
                    json!({"id": id, "carousel_id": "c1", "position": position}),
                )
                .await
                .unwrap();
        }

        let slides = adapter
            .find_many(
                models::CAROUSEL_SLIDE,
                FindManyQuery {
                    where_clauses: vec![WhereClause::eq("carousel_id", "c1")],
                    sort_by: Some(SortBy {
                        field: "position".into(),
                        direction: SortDirection::Asc,
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let order: Vec<&str> = slides.iter().map(|s| s["id"].as_str().unwrap()).collect();
        assert_eq!(order, ["s1", "s2", "s3"]);
    }

    #[tokio::test]
    async fn find_many_with_limit() {
        let adapter = MemoryAdapter::new();
        for i in 0..5 {
            adapter
                .create(models::MEDIA, json!({"id": format!("m{i}"), "user_id": "1"}))
                .await
                .unwrap();
        }
        let result = adapter
            .find_many(
                models::MEDIA,
                FindManyQuery {
                    limit: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn count_with_filter() {
        let adapter = MemoryAdapter::new();
        adapter
            .create(models::MEDIA, json!({"id": "m1", "user_id": "1"}))
            .await
            .unwrap();
        adapter
            .create(models::MEDIA, json!({"id": "m2", "user_id": "2"}))
            .await
            .unwrap();

        assert_eq!(adapter.count(models::MEDIA, &[]).await.unwrap(), 2);
        assert_eq!(
            adapter
                .count(models::MEDIA, &[WhereClause::eq("user_id", "1")])
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let adapter = MemoryAdapter::new();
        adapter
            .create(
                models::SUBSCRIPTIONS,
                json!({"id": "sub1", "user_id": "1", "status": "active", "plan": "premium"}),
            )
            .await
            .unwrap();

        let updated = adapter
            .update(
                models::SUBSCRIPTIONS,
                &[WhereClause::eq("user_id", "1")],
                json!({"status": "past_due"}),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["status"], "past_due");
        assert_eq!(updated["plan"], "premium");
    }

    #[tokio::test]
    async fn update_many_returns_zero_on_no_match() {
        let adapter = MemoryAdapter::new();
        let count = adapter
            .update_many(
                models::SUBSCRIPTIONS,
                &[WhereClause::eq("stripe_customer_id", "cus_missing")],
                json!({"status": "canceled"}),
            )
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn delete_removes_first_match() {
        let adapter = MemoryAdapter::new();
        adapter.create(models::CAROUSEL, json!({"id": "c1"})).await.unwrap();
        adapter.create(models::CAROUSEL, json!({"id": "c2"})).await.unwrap();

        adapter
            .delete(models::CAROUSEL, &[WhereClause::eq("id", "c1")])
            .await
            .unwrap();
        assert_eq!(adapter.model_count(models::CAROUSEL).await, 1);
    }

    #[tokio::test]
    async fn delete_many_by_id_list() {
        let adapter = MemoryAdapter::new();
        for id in ["m1", "m2", "m3"] {
            adapter.create(models::MEDIA, json!({"id": id})).await.unwrap();
        }

        let deleted = adapter
            .delete_many(
                models::MEDIA,
                &[WhereClause::is_in("id", vec!["m1".into(), "m3".into()])],
            )
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(adapter.model_count(models::MEDIA).await, 1);
    }

    #[tokio::test]
    async fn operator_ne() {
        let adapter = MemoryAdapter::new();
        adapter
            .create(models::MEDIA, json!({"id": "m1", "is_library": true}))
            .await
            .unwrap();
        adapter
            .create(models::MEDIA, json!({"id": "m2", "is_library": false}))
            .await
            .unwrap();

        let clause = WhereClause {
            field: "is_library".into(),
            value: json!(true),
            operator: Operator::Ne,
        };
        let rows = adapter
            .find_many(
                models::MEDIA,
                FindManyQuery {
                    where_clauses: vec![clause],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "m2");
    }

    #[tokio::test]
    async fn operator_starts_with() {
        let adapter = MemoryAdapter::new();
        adapter
            .create(models::MEDIA, json!({"id": "m1", "path": "user_1/a.png"}))
            .await
            .unwrap();
        adapter
            .create(models::MEDIA, json!({"id": "m2", "path": "user_2/b.png"}))
            .await
            .unwrap();

        let clause = WhereClause {
            field: "path".into(),
            value: json!("user_1/"),
            operator: Operator::StartsWith,
        };
        let rows = adapter
            .find_many(
                models::MEDIA,
                FindManyQuery {
                    where_clauses: vec![clause],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "m1");
    }

    #[tokio::test]
    async fn snapshot_and_clear() {
        let adapter = MemoryAdapter::new();
        adapter.create(models::CAROUSEL, json!({"id": "c1"})).await.unwrap();

        let snap = adapter.snapshot().await;
        assert_eq!(snap[models::CAROUSEL].len(), 1);

        adapter.clear().await;
        assert_eq!(adapter.model_count(models::CAROUSEL).await, 0);
    }
}
