use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Display;
use std::time::Duration;
use uuid::Uuid;

use crate::models::{
    ApprovalStatus, ContactMessage, ContactRequest, DocumentAccessRequest, DocumentRequest, GpRecord,
    InvestorMessage, LpRecord, NewGp, NewLp, PipelineStage,
};
use crate::services::store::{RecordStore, StoreError};

/// Table names in the hosted datastore
#[derive(Debug, Clone)]
pub struct HostedTables {
    pub gp_registrations: String,
    pub lp_registrations: String,
    pub contact_messages: String,
    pub document_requests: String,
    pub investor_messages: String,
}

/// Select query in the hosted REST dialect
///
/// Supports equality filters and a single order column, which is all the
/// service needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
}

impl Query {
    pub fn table(name: &str) -> Self {
        Self {
            table: name.to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    /// e.g. `select=*&id=eq.42&order=created_at.desc`
    pub fn to_query_string(&self) -> String {
        let mut parts = vec!["select=*".to_string()];
        for (column, value) in &self.filters {
            parts.push(format!("{}=eq.{}", column, urlencoding::encode(value)));
        }
        if let Some((column, ascending)) = &self.order {
            let direction = if *ascending { "asc" } else { "desc" };
            parts.push(format!("order={}.{}", column, direction));
        }
        parts.join("&")
    }
}

/// Client for the hosted relational datastore's REST interface
pub struct HostedClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: HostedTables,
}

impl HostedClient {
    /// Create a new hosted datastore client
    pub fn new(base_url: String, api_key: String, tables: HostedTables) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check(response: Response, action: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Hosted datastore failed to {}: {} - {}", action, status, body);
        Err(StoreError::ApiError(format!("Failed to {}: {}", action, status)))
    }

    /// Select every row matching the query
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, StoreError> {
        let url = format!("{}?{}", self.table_url(&query.table), query.to_query_string());
        tracing::debug!("Selecting from: {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check(response, &format!("select from {}", query.table)).await?;

        let rows: Vec<Value> = response.json().await?;
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse {} row: {}", query.table, e)))
            })
            .collect()
    }

    /// Insert one row and return it as stored
    pub async fn insert<T: DeserializeOwned, B: Serialize + ?Sized>(&self, table: &str, body: &B) -> Result<T, StoreError> {
        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let response = Self::check(response, &format!("insert into {}", table)).await?;

        let mut rows: Vec<T> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse inserted {} row: {}", table, e)))?;
        if rows.is_empty() {
            return Err(StoreError::InvalidResponse(format!("Insert into {} returned no row", table)));
        }
        Ok(rows.swap_remove(0))
    }

    /// Patch every row matching the query, returning the updated rows
    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(&self, query: &Query, body: &B) -> Result<Vec<T>, StoreError> {
        let url = format!("{}?{}", self.table_url(&query.table), query.to_query_string());

        let response = self
            .authorized(self.client.patch(&url))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let response = Self::check(response, &format!("update {}", query.table)).await?;

        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse updated {} rows: {}", query.table, e)))
    }

    /// Delete every row matching the query, returning how many went
    pub async fn delete(&self, query: &Query) -> Result<usize, StoreError> {
        let url = format!("{}?{}", self.table_url(&query.table), query.to_query_string());

        let response = self
            .authorized(self.client.delete(&url))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let response = Self::check(response, &format!("delete from {}", query.table)).await?;

        let rows: Vec<Value> = response.json().await?;
        Ok(rows.len())
    }

    async fn update_one<T: DeserializeOwned>(&self, table: &str, id: Uuid, body: Value) -> Result<T, StoreError> {
        let mut rows: Vec<T> = self.update(&Query::table(table).eq("id", id), &body).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("{} {}", table, id)));
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete_one(&self, table: &str, id: Uuid) -> Result<(), StoreError> {
        match self.delete(&Query::table(table).eq("id", id)).await? {
            0 => Err(StoreError::NotFound(format!("{} {}", table, id))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for HostedClient {
    async fn insert_gp(&self, gp: NewGp) -> Result<GpRecord, StoreError> {
        let payload = json!({
            "id": Uuid::new_v4(),
            "name": gp.name,
            "email": gp.email,
            "firm": gp.firm,
            "aum_bracket": gp.aum_bracket,
            "strategies": gp.strategies,
            "fund_in_market": gp.fund_in_market,
            "approval": ApprovalStatus::Pending,
        });
        self.insert(&self.tables.gp_registrations, &payload).await
    }

    async fn list_gps(&self) -> Result<Vec<GpRecord>, StoreError> {
        self.select(&Query::table(&self.tables.gp_registrations).order_by("created_at", false))
            .await
    }

    async fn update_gp_approval(&self, id: Uuid, approval: ApprovalStatus) -> Result<GpRecord, StoreError> {
        self.update_one(&self.tables.gp_registrations, id, json!({ "approval": approval }))
            .await
    }

    async fn delete_gp(&self, id: Uuid) -> Result<(), StoreError> {
        self.delete_one(&self.tables.gp_registrations, id).await
    }

    async fn insert_lp(&self, lp: NewLp) -> Result<LpRecord, StoreError> {
        let payload = json!({
            "id": Uuid::new_v4(),
            "name": lp.name,
            "email": lp.email,
            "organization": lp.organization,
            "investor_type": lp.investor_type,
            "interests": lp.interests,
            "jurisdiction": lp.jurisdiction,
            "stage": PipelineStage::ToContact,
            "approval": ApprovalStatus::Pending,
        });
        self.insert(&self.tables.lp_registrations, &payload).await
    }

    async fn list_lps(&self) -> Result<Vec<LpRecord>, StoreError> {
        self.select(&Query::table(&self.tables.lp_registrations).order_by("created_at", false))
            .await
    }

    async fn get_lp(&self, id: Uuid) -> Result<LpRecord, StoreError> {
        let mut rows: Vec<LpRecord> = self
            .select(&Query::table(&self.tables.lp_registrations).eq("id", id))
            .await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("LP {}", id)));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update_lp_stage(&self, id: Uuid, stage: PipelineStage) -> Result<(), StoreError> {
        let _: LpRecord = self
            .update_one(&self.tables.lp_registrations, id, json!({ "stage": stage }))
            .await?;
        Ok(())
    }

    async fn update_lp_approval(&self, id: Uuid, approval: ApprovalStatus) -> Result<(), StoreError> {
        let _: LpRecord = self
            .update_one(&self.tables.lp_registrations, id, json!({ "approval": approval }))
            .await?;
        Ok(())
    }

    async fn delete_lp(&self, id: Uuid) -> Result<(), StoreError> {
        self.delete_one(&self.tables.lp_registrations, id).await
    }

    async fn insert_contact(&self, contact: ContactRequest) -> Result<ContactMessage, StoreError> {
        let payload = json!({
            "id": Uuid::new_v4(),
            "name": contact.name,
            "email": contact.email,
            "company": contact.company,
            "message": contact.message,
        });
        self.insert(&self.tables.contact_messages, &payload).await
    }

    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError> {
        self.select(&Query::table(&self.tables.contact_messages).order_by("created_at", false))
            .await
    }

    async fn insert_document_request(&self, request: DocumentAccessRequest) -> Result<DocumentRequest, StoreError> {
        let payload = json!({
            "id": Uuid::new_v4(),
            "name": request.name,
            "email": request.email,
            "company": request.company,
            "document": request.document,
        });
        self.insert(&self.tables.document_requests, &payload).await
    }

    async fn list_document_requests(&self) -> Result<Vec<DocumentRequest>, StoreError> {
        self.select(&Query::table(&self.tables.document_requests).order_by("created_at", false))
            .await
    }

    async fn insert_message(&self, lp_id: Uuid, author_id: &str, body: &str) -> Result<InvestorMessage, StoreError> {
        let payload = json!({
            "id": Uuid::new_v4(),
            "lp_id": lp_id,
            "author_id": author_id,
            "body": body,
        });
        self.insert(&self.tables.investor_messages, &payload).await
    }

    async fn list_messages(&self, lp_id: Uuid) -> Result<Vec<InvestorMessage>, StoreError> {
        self.select(
            &Query::table(&self.tables.investor_messages)
                .eq("lp_id", lp_id)
                .order_by("created_at", true),
        )
        .await
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let url = format!("{}?select=id&limit=1", self.table_url(&self.tables.gp_registrations));
        let response = self.authorized(self.client.get(&url)).send().await?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_tables() -> HostedTables {
        HostedTables {
            gp_registrations: "gp_registrations".to_string(),
            lp_registrations: "lp_registrations".to_string(),
            contact_messages: "contact_messages".to_string(),
            document_requests: "document_requests".to_string(),
            investor_messages: "investor_messages".to_string(),
        }
    }

    #[test]
    fn test_query_string() {
        let query = Query::table("lp_registrations")
            .eq("stage", "To Contact")
            .order_by("created_at", false);

        assert_eq!(
            query.to_query_string(),
            "select=*&stage=eq.To%20Contact&order=created_at.desc"
        );
    }

    #[tokio::test]
    async fn test_list_lps_sends_order_and_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/lp_registrations")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("select".into(), "*".into()),
                mockito::Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            ]))
            .match_header("apikey", "service-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":"0d6f0c4a-2f7e-4c1b-8f7e-0a4b9c1d2e3f","name":"Ada","email":"ada@example.com",
                    "organization":"Northwind","investor_type":"Pension","interests":["AI"],
                    "jurisdiction":"UK","stage":"Contacted","approval":"approved",
                    "created_at":"2026-02-01T12:00:00Z"}]"#,
            )
            .create_async()
            .await;

        let client = HostedClient::new(server.url(), "service-key".to_string(), test_tables()).unwrap();
        let lps = client.list_lps().await.unwrap();

        mock.assert_async().await;
        assert_eq!(lps.len(), 1);
        assert_eq!(lps[0].stage, PipelineStage::Contacted);
        assert_eq!(lps[0].investor_type.as_deref(), Some("Pension"));
    }

    #[tokio::test]
    async fn test_update_with_no_rows_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PATCH", "/rest/v1/lp_registrations")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = HostedClient::new(server.url(), "service-key".to_string(), test_tables()).unwrap();
        let result = client.update_lp_stage(Uuid::new_v4(), PipelineStage::Closed).await;

        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/gp_registrations")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = HostedClient::new(server.url(), "bad-key".to_string(), test_tables()).unwrap();
        assert!(matches!(client.list_gps().await, Err(StoreError::Unauthorized)));
    }
}
