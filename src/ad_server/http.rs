use super::AdServer;
use crate::config::AdServerSettings;
use crate::error::{SetupError, SetupResult};
use crate::models::creative::{LineItemCreativeAssociation, ThirdPartyCreative};
use crate::models::inventory::{Advertiser, InventoryItem, Order, User};
use crate::models::line_item::LineItem;
use crate::models::targeting::{CustomTargetingKey, CustomTargetingValue};
use crate::models::ObjectId;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Page of a list call
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchCreateRequest<'a, T> {
    objects: &'a [T],
}

#[derive(Debug, Deserialize)]
struct Created {
    id: ObjectId,
}

#[derive(Debug, Deserialize)]
struct Named {
    id: ObjectId,
    name: String,
}

/// Ad Manager client speaking JSON over HTTP
///
/// Collections live under `{base_url}/networks/{network_code}/`. Lookups are
/// `GET` with a `filter` query, creates are `POST {collection}:batchCreate`
/// with `{"objects": [...]}` and answer with the created objects in order.
pub struct HttpAdServer {
    client: Client,
    base_url: String,
    network_code: String,
    access_token: Option<String>,
}

impl HttpAdServer {
    pub fn new(settings: &AdServerSettings) -> SetupResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            network_code: settings.network_code.clone(),
            access_token: settings.access_token.clone(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/networks/{}/{}",
            self.base_url, self.network_code, collection
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> SetupResult<T> {
        let response = self
            .authorize(request)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SetupError::Upstream { status, message });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Every object of `collection` matching `filter`, following page tokens
    async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Option<&str>,
    ) -> SetupResult<Vec<T>> {
        let url = self.collection_url(collection);
        let mut results = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = Vec::new();
            if let Some(filter) = filter {
                query.push(("filter", filter));
            }
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            debug!(collection, ?filter, "Listing");
            let page: ListResponse<T> = self.send(self.client.get(&url).query(&query)).await?;
            results.extend(page.results);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(results)
    }

    async fn batch_create<T: Serialize + Sync>(
        &self,
        collection: &str,
        objects: &[T],
    ) -> SetupResult<Vec<ObjectId>> {
        if objects.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}:batchCreate", self.collection_url(collection));
        debug!(collection, count = objects.len(), "Creating");

        let created: ListResponse<Created> = self
            .send(self.client.post(&url).json(&BatchCreateRequest { objects }))
            .await?;

        if created.results.len() != objects.len() {
            return Err(SetupError::Decode(format!(
                "{} objects sent to {} but {} created",
                objects.len(),
                collection,
                created.results.len()
            )));
        }
        Ok(created.results.into_iter().map(|c| c.id).collect())
    }

    async fn create_one<T: Serialize + Sync>(&self, collection: &str, object: T) -> SetupResult<ObjectId> {
        let ids = self.batch_create(collection, std::slice::from_ref(&object)).await?;
        ids.into_iter()
            .next()
            .ok_or_else(|| SetupError::Decode(format!("No id returned from {}", collection)))
    }

    async fn find_by_name(&self, collection: &str, name: &str) -> SetupResult<Option<ObjectId>> {
        let items: Vec<Named> = self.list(collection, Some(&name_filter(name))).await?;
        Ok(items.into_iter().find(|item| item.name == name).map(|item| item.id))
    }

    async fn ids_by_name(
        &self,
        collection: &str,
        kind: &'static str,
        names: &[String],
    ) -> SetupResult<Vec<ObjectId>> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let items: Vec<InventoryItem> = self.list(collection, Some(&name_filter(name))).await?;
            let item = items
                .into_iter()
                .find(|item| &item.name == name)
                .ok_or_else(|| SetupError::not_found(kind, name.as_str()))?;
            ids.push(item.id);
        }
        Ok(ids)
    }
}

/// `name = "..."` with embedded quotes escaped
fn name_filter(name: &str) -> String {
    format!("name = \"{}\"", escape(name))
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[async_trait]
impl AdServer for HttpAdServer {
    async fn get_user_id_by_email(&self, email: &str) -> SetupResult<ObjectId> {
        let filter = format!("email = \"{}\"", escape(email));
        let users: Vec<User> = self.list("users", Some(&filter)).await?;
        users
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .map(|user| user.id)
            .ok_or_else(|| SetupError::not_found("User", email))
    }

    async fn get_placement_ids_by_name(&self, names: &[String]) -> SetupResult<Vec<ObjectId>> {
        self.ids_by_name("placements", "Placement", names).await
    }

    async fn get_ad_unit_ids_by_name(&self, names: &[String]) -> SetupResult<Vec<ObjectId>> {
        self.ids_by_name("adUnits", "Ad unit", names).await
    }

    async fn find_advertiser(&self, name: &str) -> SetupResult<Option<ObjectId>> {
        let filter = format!("{} AND type = \"ADVERTISER\"", name_filter(name));
        let companies: Vec<Named> = self.list("companies", Some(&filter)).await?;
        Ok(companies
            .into_iter()
            .find(|company| company.name == name)
            .map(|company| company.id))
    }

    async fn create_advertiser(&self, name: &str) -> SetupResult<ObjectId> {
        self.create_one("companies", Advertiser::new(name)).await
    }

    async fn find_order(&self, name: &str) -> SetupResult<Option<ObjectId>> {
        self.find_by_name("orders", name).await
    }

    async fn create_order(&self, order: &Order) -> SetupResult<ObjectId> {
        self.create_one("orders", order).await
    }

    async fn create_creatives(
        &self,
        creatives: &[ThirdPartyCreative],
    ) -> SetupResult<Vec<ObjectId>> {
        self.batch_create("creatives", creatives).await
    }

    async fn find_targeting_key(&self, name: &str) -> SetupResult<Option<ObjectId>> {
        self.find_by_name("customTargetingKeys", name).await
    }

    async fn create_targeting_key(&self, name: &str) -> SetupResult<ObjectId> {
        self.create_one("customTargetingKeys", CustomTargetingKey::freeform(name))
            .await
    }

    async fn get_targeting_values(
        &self,
        key_id: ObjectId,
    ) -> SetupResult<Vec<CustomTargetingValue>> {
        self.list(&format!("customTargetingKeys/{}/values", key_id), None)
            .await
    }

    async fn create_targeting_value(&self, key_id: ObjectId, name: &str) -> SetupResult<ObjectId> {
        self.create_one("customTargetingValues", CustomTargetingValue::exact(key_id, name))
            .await
    }

    async fn create_line_items(&self, line_items: &[LineItem]) -> SetupResult<Vec<ObjectId>> {
        self.batch_create("lineItems", line_items).await
    }

    async fn create_licas(&self, licas: &[LineItemCreativeAssociation]) -> SetupResult<()> {
        self.batch_create("lineItemCreativeAssociations", licas)
            .await
            .map(|_| ())
    }
}
