//! Custom targeting keys and values
//!
//! Prebid sets `hb_bidder`, `hb_pb` (and optionally `hb_size`) on the ad
//! request; each line item targets one value of each key.

use crate::ad_server::AdServer;
use crate::error::SetupResult;
use crate::models::ObjectId;
use std::collections::HashMap;
use tracing::{debug, info};

pub const HB_BIDDER_KEY: &str = "hb_bidder";
pub const HB_PB_KEY: &str = "hb_pb";
pub const HB_SIZE_KEY: &str = "hb_size";

/// Id of the targeting key `name`, creating the key if it does not exist
pub async fn get_or_create_key(server: &dyn AdServer, name: &str) -> SetupResult<ObjectId> {
    if let Some(id) = server.find_targeting_key(name).await? {
        debug!(key = name, id, "Found targeting key");
        return Ok(id);
    }

    let id = server.create_targeting_key(name).await?;
    info!(key = name, id, "Created targeting key");
    Ok(id)
}

/// Resolves value names of one key to ids.
///
/// The first lookup bulk-fetches every existing value of the key; names not
/// found there are created on the ad server and remembered, so each name
/// costs at most one remote call over the resolver's lifetime.
pub struct TargetingValueResolver<'a> {
    server: &'a dyn AdServer,
    key_name: String,
    key_id: ObjectId,
    cache: Option<HashMap<String, ObjectId>>,
}

impl<'a> TargetingValueResolver<'a> {
    pub fn new(server: &'a dyn AdServer, key_name: impl Into<String>, key_id: ObjectId) -> Self {
        Self {
            server,
            key_name: key_name.into(),
            key_id,
            cache: None,
        }
    }

    pub async fn resolve(&mut self, value_name: &str) -> SetupResult<ObjectId> {
        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => self.fetch_existing().await?,
        };
        let cache = self.cache.insert(cache);

        if let Some(id) = cache.get(value_name) {
            return Ok(*id);
        }

        let id = self
            .server
            .create_targeting_value(self.key_id, value_name)
            .await?;
        debug!(key = %self.key_name, value = value_name, id, "Created targeting value");
        cache.insert(value_name.to_string(), id);
        Ok(id)
    }

    pub async fn resolve_all(&mut self, value_names: &[String]) -> SetupResult<Vec<ObjectId>> {
        let mut ids = Vec::with_capacity(value_names.len());
        for name in value_names {
            ids.push(self.resolve(name).await?);
        }
        Ok(ids)
    }

    async fn fetch_existing(&self) -> SetupResult<HashMap<String, ObjectId>> {
        let values = self.server.get_targeting_values(self.key_id).await?;
        debug!(key = %self.key_name, count = values.len(), "Fetched existing targeting values");

        Ok(values
            .into_iter()
            .filter_map(|value| value.id.map(|id| (value.name, id)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad_server::testing::FakeAdServer;

    #[tokio::test]
    async fn test_get_or_create_key_reuses_existing() {
        let server = FakeAdServer::default();
        server.state.lock().unwrap().keys.insert(HB_PB_KEY.to_string(), 77);

        assert_eq!(get_or_create_key(&server, HB_PB_KEY).await.unwrap(), 77);
        assert_eq!(server.state.lock().unwrap().keys.len(), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_key_creates_missing() {
        let server = FakeAdServer::default();

        let id = get_or_create_key(&server, HB_BIDDER_KEY).await.unwrap();
        assert_eq!(server.state.lock().unwrap().keys.get(HB_BIDDER_KEY), Some(&id));
    }

    #[tokio::test]
    async fn test_resolver_fetches_once_and_creates_on_miss() {
        let server = FakeAdServer::default();
        server.add_value(5, "0.50", 500);
        server.add_value(5, "1.00", 501);
        server.add_value(6, "0.50", 600);

        let mut resolver = TargetingValueResolver::new(&server, HB_PB_KEY, 5);
        assert_eq!(resolver.resolve("0.50").await.unwrap(), 500);
        assert_eq!(resolver.resolve("1.00").await.unwrap(), 501);

        let created = resolver.resolve("1.50").await.unwrap();
        // cached after creation
        assert_eq!(resolver.resolve("1.50").await.unwrap(), created);

        let state = server.state.lock().unwrap();
        assert_eq!(state.value_fetches, 1);
        assert_eq!(state.value_creates, 1);
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_order() {
        let server = FakeAdServer::default();
        server.add_value(9, "728x90", 90);

        let mut resolver = TargetingValueResolver::new(&server, HB_SIZE_KEY, 9);
        let ids = resolver
            .resolve_all(&["300x250".to_string(), "728x90".to_string()])
            .await
            .unwrap();

        assert_eq!(ids.len(), 2);
        assert_eq!(ids[1], 90);
        assert_ne!(ids[0], 90);
    }
}
