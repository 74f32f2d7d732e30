use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::backend::MigrationBackend;
use crate::error::{DataError, Result};
use crate::types::{OrgSchemaStatus, Organization};

/// Thin client for the hosted database's PostgREST query + RPC surface.
///
/// One instance per credential level (anonymous or service-role); holds no
/// state beyond the base URL and an authenticated reqwest client.
#[derive(Clone)]
pub struct PostgrestClient {
    base_url: String,
    http: reqwest::Client,
}

impl PostgrestClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| DataError::Config("api key contains invalid header characters".into()))?;
        key.set_sensitive(true);
        headers.insert("apikey", key);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| DataError::Config("api key contains invalid header characters".into()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    /// GET rows from a table or view.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = self.table_url(table);
        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Api {
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// POST a named remote procedure with JSON arguments.
    ///
    /// Functions returning `void` produce an empty body; mapped to `Null`.
    async fn rpc(&self, function: &str, args: Value) -> Result<Value> {
        let url = self.rpc_url(function);
        let response = self.http.post(&url).json(&args).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Api {
                url,
                status: status.as_u16(),
                body,
            });
        }
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| DataError::Decode {
            name: function.to_string(),
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl MigrationBackend for PostgrestClient {
    async fn fetch_organizations(&self, limit: Option<u32>) -> Result<Vec<Organization>> {
        let mut query = vec![
            ("select", "id,name,created_at".to_string()),
            ("order", "created_at.asc".to_string()),
        ];
        if let Some(n) = limit {
            query.push(("limit", n.to_string()));
        }
        self.select("organizations", &query).await
    }

    async fn fetch_schema_statuses(&self) -> Result<Vec<OrgSchemaStatus>> {
        self.select("organization_schemas", &[("select", "*".to_string())])
            .await
    }

    async fn schema_differentiation_enabled(&self) -> Result<bool> {
        let value = self.rpc("is_schema_differentiation_enabled", json!({})).await?;
        value.as_bool().ok_or_else(|| DataError::Decode {
            name: "is_schema_differentiation_enabled".to_string(),
            detail: format!("expected boolean, got {value}"),
        })
    }

    async fn create_organization_schema(&self, org_id: &str) -> Result<String> {
        let value = self
            .rpc("create_organization_schema", json!({ "org_id": org_id }))
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DataError::Decode {
                name: "create_organization_schema".to_string(),
                detail: format!("expected schema name string, got {value}"),
            })
    }

    async fn migrate_organization_data(&self, org_id: &str) -> Result<()> {
        self.rpc("migrate_organization_data", json!({ "org_id": org_id }))
            .await?;
        Ok(())
    }
}
