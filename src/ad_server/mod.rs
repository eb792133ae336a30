//! Ad server capability
//!
//! Every remote operation the setup needs goes through [`AdServer`], so the
//! orchestration can run against the HTTP client or an in-memory fake.

mod http;
#[cfg(test)]
pub(crate) mod testing;

pub use http::HttpAdServer;

use crate::error::SetupResult;
use crate::models::creative::{LineItemCreativeAssociation, ThirdPartyCreative};
use crate::models::inventory::Order;
use crate::models::line_item::LineItem;
use crate::models::targeting::CustomTargetingValue;
use crate::models::ObjectId;
use async_trait::async_trait;

#[async_trait]
pub trait AdServer: Send + Sync {
    /// Id of the user with this email; `ObjectNotFound` if there is none
    async fn get_user_id_by_email(&self, email: &str) -> SetupResult<ObjectId>;

    /// Ids of the named placements, in the given order
    async fn get_placement_ids_by_name(&self, names: &[String]) -> SetupResult<Vec<ObjectId>>;

    /// Ids of the named ad units, in the given order
    async fn get_ad_unit_ids_by_name(&self, names: &[String]) -> SetupResult<Vec<ObjectId>>;

    async fn find_advertiser(&self, name: &str) -> SetupResult<Option<ObjectId>>;

    async fn create_advertiser(&self, name: &str) -> SetupResult<ObjectId>;

    async fn find_order(&self, name: &str) -> SetupResult<Option<ObjectId>>;

    async fn create_order(&self, order: &Order) -> SetupResult<ObjectId>;

    /// Returns created ids in request order
    async fn create_creatives(&self, creatives: &[ThirdPartyCreative])
        -> SetupResult<Vec<ObjectId>>;

    async fn find_targeting_key(&self, name: &str) -> SetupResult<Option<ObjectId>>;

    /// Creates a freeform key
    async fn create_targeting_key(&self, name: &str) -> SetupResult<ObjectId>;

    /// All values currently defined for a key
    async fn get_targeting_values(&self, key_id: ObjectId)
        -> SetupResult<Vec<CustomTargetingValue>>;

    async fn create_targeting_value(&self, key_id: ObjectId, name: &str) -> SetupResult<ObjectId>;

    /// Returns created ids in request order
    async fn create_line_items(&self, line_items: &[LineItem]) -> SetupResult<Vec<ObjectId>>;

    async fn create_licas(&self, licas: &[LineItemCreativeAssociation]) -> SetupResult<()>;
}
