//! [`RecordStore`] over the REST contract.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::traits::RecordStore;
use sharedrop_core::types::RecordQuery;

use super::HttpBackend;

/// Header asking the service to echo affected rows.
const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Render a query as `field=eq.value` / `order=field.dir` parameters.
pub(crate) fn query_params(query: &RecordQuery) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = query
        .filters
        .iter()
        .map(|f| (f.field.clone(), format!("eq.{}", f.param_value())))
        .collect();
    if let Some(order) = &query.order {
        params.push((
            "order".to_string(),
            format!("{}.{}", order.field, order.direction.as_param()),
        ));
    }
    params
}

impl HttpBackend {
    fn records_request(
        &self,
        method: Method,
        collection: &str,
        query: &RecordQuery,
    ) -> AppResult<RequestBuilder> {
        let url = self.endpoint(&["api", "database", "records", collection])?;
        Ok(self.request(method, url).query(&query_params(query)))
    }
}

#[async_trait]
impl RecordStore for HttpBackend {
    async fn select(&self, collection: &str, query: &RecordQuery) -> AppResult<Vec<Value>> {
        let builder = self.records_request(Method::GET, collection, query)?;
        self.send_json(builder).await
    }

    async fn select_single(
        &self,
        collection: &str,
        query: &RecordQuery,
    ) -> AppResult<Option<Value>> {
        let builder = self
            .records_request(Method::GET, collection, query)?
            .query(&[("limit", "2")]);
        let mut rows: Vec<Value> = self.send_json(builder).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            _ => Err(AppError::database(
                "Expected a single row but the query matched several",
            )),
        }
    }

    async fn insert(&self, collection: &str, rows: Vec<Value>) -> AppResult<Vec<Value>> {
        let url = self.endpoint(&["api", "database", "records", collection])?;
        let builder = self
            .request(Method::POST, url)
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(&rows);
        self.send_json(builder).await
    }

    async fn update(
        &self,
        collection: &str,
        query: &RecordQuery,
        patch: Value,
    ) -> AppResult<Vec<Value>> {
        let builder = self
            .records_request(Method::PATCH, collection, query)?
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(&patch);
        self.send_json(builder).await
    }

    async fn delete(&self, collection: &str, query: &RecordQuery) -> AppResult<()> {
        let builder = self.records_request(Method::DELETE, collection, query)?;
        self.send(builder).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use sharedrop_core::types::SortField;

    use super::*;

    #[test]
    fn test_query_params() {
        let query = RecordQuery::new()
            .eq("user_id", "u1")
            .eq("is_public", true)
            .order(SortField::desc("created_at"));
        assert_eq!(
            query_params(&query),
            vec![
                ("user_id".to_string(), "eq.u1".to_string()),
                ("is_public".to_string(), "eq.true".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(query_params(&RecordQuery::new()).is_empty());
    }
}
