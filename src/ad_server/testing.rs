use super::AdServer;
use crate::error::{SetupError, SetupResult};
use crate::models::creative::{LineItemCreativeAssociation, ThirdPartyCreative};
use crate::models::inventory::Order;
use crate::models::line_item::LineItem;
use crate::models::targeting::CustomTargetingValue;
use crate::models::ObjectId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct FakeState {
    next_id: ObjectId,
    pub users: HashMap<String, ObjectId>,
    pub placements: HashMap<String, ObjectId>,
    pub ad_units: HashMap<String, ObjectId>,
    pub advertisers: HashMap<String, ObjectId>,
    pub orders: HashMap<String, ObjectId>,
    pub keys: HashMap<String, ObjectId>,
    pub values: Vec<CustomTargetingValue>,
    pub creatives: Vec<ThirdPartyCreative>,
    pub line_items: Vec<LineItem>,
    pub licas: Vec<LineItemCreativeAssociation>,
    pub value_fetches: usize,
    pub value_creates: usize,
}

impl FakeState {
    fn next(&mut self) -> ObjectId {
        self.next_id += 1;
        1000 + self.next_id
    }
}

/// In-memory ad server recording everything created
#[derive(Default)]
pub(crate) struct FakeAdServer {
    pub state: Mutex<FakeState>,
}

impl FakeAdServer {
    pub fn with_inventory() -> Self {
        let server = Self::default();
        {
            let mut state = server.state.lock().unwrap();
            state.users.insert("trafficker@example.com".to_string(), 1);
            state.placements.insert("OnlineNowLeaderboard".to_string(), 11);
            state.ad_units.insert("TouchSearchAds".to_string(), 21);
            state.ad_units.insert("Leaderboard".to_string(), 22);
            state.advertisers.insert("Rubicon".to_string(), 31);
        }
        server
    }

    pub fn add_value(&self, key_id: ObjectId, name: &str, id: ObjectId) {
        let mut value = CustomTargetingValue::exact(key_id, name);
        value.id = Some(id);
        self.state.lock().unwrap().values.push(value);
    }
}

fn lookup(map: &HashMap<String, ObjectId>, kind: &'static str, names: &[String]) -> SetupResult<Vec<ObjectId>> {
    names
        .iter()
        .map(|name| {
            map.get(name)
                .copied()
                .ok_or_else(|| SetupError::not_found(kind, name.as_str()))
        })
        .collect()
}

#[async_trait]
impl AdServer for FakeAdServer {
    async fn get_user_id_by_email(&self, email: &str) -> SetupResult<ObjectId> {
        let state = self.state.lock().unwrap();
        state
            .users
            .get(email)
            .copied()
            .ok_or_else(|| SetupError::not_found("User", email))
    }

    async fn get_placement_ids_by_name(&self, names: &[String]) -> SetupResult<Vec<ObjectId>> {
        lookup(&self.state.lock().unwrap().placements, "Placement", names)
    }

    async fn get_ad_unit_ids_by_name(&self, names: &[String]) -> SetupResult<Vec<ObjectId>> {
        lookup(&self.state.lock().unwrap().ad_units, "Ad unit", names)
    }

    async fn find_advertiser(&self, name: &str) -> SetupResult<Option<ObjectId>> {
        Ok(self.state.lock().unwrap().advertisers.get(name).copied())
    }

    async fn create_advertiser(&self, name: &str) -> SetupResult<ObjectId> {
        let mut state = self.state.lock().unwrap();
        let id = state.next();
        state.advertisers.insert(name.to_string(), id);
        Ok(id)
    }

    async fn find_order(&self, name: &str) -> SetupResult<Option<ObjectId>> {
        Ok(self.state.lock().unwrap().orders.get(name).copied())
    }

    async fn create_order(&self, order: &Order) -> SetupResult<ObjectId> {
        let mut state = self.state.lock().unwrap();
        let id = state.next();
        state.orders.insert(order.name.clone(), id);
        Ok(id)
    }

    async fn create_creatives(
        &self,
        creatives: &[ThirdPartyCreative],
    ) -> SetupResult<Vec<ObjectId>> {
        let mut state = self.state.lock().unwrap();
        let ids = creatives.iter().map(|_| state.next()).collect();
        state.creatives.extend_from_slice(creatives);
        Ok(ids)
    }

    async fn find_targeting_key(&self, name: &str) -> SetupResult<Option<ObjectId>> {
        Ok(self.state.lock().unwrap().keys.get(name).copied())
    }

    async fn create_targeting_key(&self, name: &str) -> SetupResult<ObjectId> {
        let mut state = self.state.lock().unwrap();
        let id = state.next();
        state.keys.insert(name.to_string(), id);
        Ok(id)
    }

    async fn get_targeting_values(
        &self,
        key_id: ObjectId,
    ) -> SetupResult<Vec<CustomTargetingValue>> {
        let mut state = self.state.lock().unwrap();
        state.value_fetches += 1;
        Ok(state
            .values
            .iter()
            .filter(|v| v.custom_targeting_key_id == key_id)
            .cloned()
            .collect())
    }

    async fn create_targeting_value(&self, key_id: ObjectId, name: &str) -> SetupResult<ObjectId> {
        let mut state = self.state.lock().unwrap();
        let id = state.next();
        state.value_creates += 1;
        let mut value = CustomTargetingValue::exact(key_id, name);
        value.id = Some(id);
        state.values.push(value);
        Ok(id)
    }

    async fn create_line_items(&self, line_items: &[LineItem]) -> SetupResult<Vec<ObjectId>> {
        let mut state = self.state.lock().unwrap();
        let ids = line_items.iter().map(|_| state.next()).collect();
        state.line_items.extend_from_slice(line_items);
        Ok(ids)
    }

    async fn create_licas(&self, licas: &[LineItemCreativeAssociation]) -> SetupResult<()> {
        self.state.lock().unwrap().licas.extend_from_slice(licas);
        Ok(())
    }
}
