//! Partner setup: the ordered sequence of ad server calls that provisions an
//! order, its creatives, targeting and one line item per price.

use crate::ad_server::AdServer;
use crate::config::{InventoryTarget, SetupConfig};
use crate::creatives::duplicate_creative_configs;
use crate::error::{SetupError, SetupResult};
use crate::line_items::{create_line_item_configs, InventoryIds, LineItemTemplate};
use crate::models::creative::LineItemCreativeAssociation;
use crate::models::inventory::Order;
use crate::models::ObjectId;
use crate::price_buckets::{expand_points, summarize_points, PricePoint};
use crate::targeting::{
    get_or_create_key, TargetingValueResolver, HB_BIDDER_KEY, HB_PB_KEY, HB_SIZE_KEY,
};
use tracing::info;

/// What a run will create, computed before any remote call
#[derive(Debug, Clone, PartialEq)]
pub struct SetupPlan {
    pub prices: Vec<PricePoint>,
    /// Short `hb_pb` synopsis for the confirmation screen
    pub summary: String,
}

impl SetupPlan {
    pub fn from_config(config: &SetupConfig) -> SetupResult<Self> {
        let prices = expand_points(&config.prebid.price_buckets, config.prebid.price_precision)?;
        let summary = summarize_points(&prices);

        Ok(Self { prices, summary })
    }

    pub fn line_item_count(&self) -> usize {
        self.prices.len()
    }
}

/// Ids of everything a setup run touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub user_id: ObjectId,
    pub advertiser_id: ObjectId,
    pub order_id: ObjectId,
    pub creative_ids: Vec<ObjectId>,
    pub line_item_ids: Vec<ObjectId>,
    pub lica_count: usize,
}

pub async fn setup_partner(
    server: &dyn AdServer,
    config: &SetupConfig,
    plan: &SetupPlan,
) -> SetupResult<SetupReport> {
    let dfp = &config.dfp;
    let bidder_code = &config.prebid.bidder_code;

    let user_id = server.get_user_id_by_email(&dfp.user_email_address).await?;
    info!(email = %dfp.user_email_address, user_id, "Found trafficker");

    let inventory = match &dfp.inventory {
        InventoryTarget::Placements(names) => {
            InventoryIds::Placements(server.get_placement_ids_by_name(names).await?)
        }
        InventoryTarget::AdUnits(names) => {
            InventoryIds::AdUnits(server.get_ad_unit_ids_by_name(names).await?)
        }
    };

    let advertiser_id = get_or_create_advertiser(server, config).await?;
    let order_id = get_or_create_order(server, config, advertiser_id, user_id).await?;

    let creative_configs =
        duplicate_creative_configs(bidder_code, &dfp.order_name, advertiser_id, dfp.num_creatives);
    let creative_ids = server.create_creatives(&creative_configs).await?;
    info!(count = creative_ids.len(), "Created creatives");

    let hb_bidder_key_id = get_or_create_key(server, HB_BIDDER_KEY).await?;
    let hb_pb_key_id = get_or_create_key(server, HB_PB_KEY).await?;

    let mut hb_bidder_values = TargetingValueResolver::new(server, HB_BIDDER_KEY, hb_bidder_key_id);
    let mut hb_pb_values = TargetingValueResolver::new(server, HB_PB_KEY, hb_pb_key_id);
    let hb_bidder_value_id = hb_bidder_values.resolve(bidder_code).await?;

    let hb_size = if dfp.target_hb_size {
        let key_id = get_or_create_key(server, HB_SIZE_KEY).await?;
        let labels: Vec<String> = dfp.sizes.iter().map(|s| s.to_string()).collect();
        let value_ids = TargetingValueResolver::new(server, HB_SIZE_KEY, key_id)
            .resolve_all(&labels)
            .await?;
        Some((key_id, value_ids))
    } else {
        None
    };

    let template = LineItemTemplate {
        order_id,
        inventory,
        sizes: dfp.sizes.clone(),
        currency_code: dfp.currency_code.clone(),
        bidder_code: bidder_code.clone(),
        name_prefix: dfp.line_item_prefix.clone(),
        hb_bidder_key_id,
        hb_bidder_value_id,
        hb_pb_key_id,
        hb_size,
    };

    info!("Creating line items...");
    let line_items = create_line_item_configs(&plan.prices, &template, &mut hb_pb_values).await?;
    let line_item_ids = server.create_line_items(&line_items).await?;
    info!(count = line_item_ids.len(), order_id, "Created line items");

    let licas = associations(&line_item_ids, &creative_ids, &dfp.sizes);
    server.create_licas(&licas).await?;
    info!(count = licas.len(), "Associated creatives with line items");

    Ok(SetupReport {
        user_id,
        advertiser_id,
        order_id,
        creative_ids,
        line_item_ids,
        lica_count: licas.len(),
    })
}

async fn get_or_create_advertiser(
    server: &dyn AdServer,
    config: &SetupConfig,
) -> SetupResult<ObjectId> {
    let name = &config.dfp.advertiser_name;

    if let Some(id) = server.find_advertiser(name).await? {
        info!(advertiser = %name, id, "Found advertiser");
        return Ok(id);
    }
    if !config.dfp.create_advertiser_if_missing {
        return Err(SetupError::not_found("Advertiser", name.as_str()));
    }

    let id = server.create_advertiser(name).await?;
    info!(advertiser = %name, id, "Created advertiser");
    Ok(id)
}

async fn get_or_create_order(
    server: &dyn AdServer,
    config: &SetupConfig,
    advertiser_id: ObjectId,
    trafficker_id: ObjectId,
) -> SetupResult<ObjectId> {
    let name = &config.dfp.order_name;

    if let Some(id) = server.find_order(name).await? {
        if !config.dfp.use_existing_order {
            return Err(SetupError::ObjectExists {
                kind: "Order",
                name: name.clone(),
            });
        }
        info!(order = %name, id, "Adding line items to existing order");
        return Ok(id);
    }

    let id = server
        .create_order(&Order::new(name.as_str(), advertiser_id, trafficker_id))
        .await?;
    info!(order = %name, id, "Created order");
    Ok(id)
}

/// Every line item paired with every creative, overriding the creative size
/// with the slot sizes
fn associations(
    line_item_ids: &[ObjectId],
    creative_ids: &[ObjectId],
    sizes: &[crate::models::Size],
) -> Vec<LineItemCreativeAssociation> {
    line_item_ids
        .iter()
        .flat_map(|&line_item_id| {
            creative_ids
                .iter()
                .map(move |&creative_id| LineItemCreativeAssociation {
                    line_item_id,
                    creative_id,
                    size_overrides: sizes.to_vec(),
                })
        })
        .collect()
}
