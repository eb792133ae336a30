//! Line item configs, one per price point

use crate::error::SetupResult;
use crate::models::line_item::{
    AdUnitTargeting, CostType, CreativePlaceholder, CreativeRotationType, Goal, GoalType,
    InventoryTargeting, LineItem, LineItemType, StartDateTimeType, Targeting,
};
use crate::models::targeting::{CustomCriteria, CustomCriteriaSet, LogicalOperator};
use crate::models::{Money, ObjectId, Size};
use crate::price_buckets::PricePoint;
use crate::targeting::TargetingValueResolver;

/// Resolved inventory the line items target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryIds {
    Placements(Vec<ObjectId>),
    AdUnits(Vec<ObjectId>),
}

impl InventoryIds {
    fn targeting(&self) -> InventoryTargeting {
        match self {
            Self::Placements(ids) => InventoryTargeting {
                targeted_placement_ids: Some(ids.clone()),
                targeted_ad_units: None,
            },
            Self::AdUnits(ids) => InventoryTargeting {
                targeted_placement_ids: None,
                targeted_ad_units: Some(
                    ids.iter()
                        .map(|&ad_unit_id| AdUnitTargeting { ad_unit_id })
                        .collect(),
                ),
            },
        }
    }
}

/// Everything shared by the line items of one order
#[derive(Debug, Clone)]
pub struct LineItemTemplate {
    pub order_id: ObjectId,
    pub inventory: InventoryIds,
    pub sizes: Vec<Size>,
    pub currency_code: String,
    pub bidder_code: String,
    /// Names become `{prefix}{price}` instead of `{bidder}: HB ${price}`
    pub name_prefix: Option<String>,
    pub hb_bidder_key_id: ObjectId,
    pub hb_bidder_value_id: ObjectId,
    pub hb_pb_key_id: ObjectId,
    /// `hb_size` key id and the value ids of the targeted sizes
    pub hb_size: Option<(ObjectId, Vec<ObjectId>)>,
}

impl LineItemTemplate {
    pub fn line_item_name(&self, price: &str) -> String {
        match &self.name_prefix {
            Some(prefix) => format!("{}{}", prefix, price),
            None => format!("{}: HB ${}", self.bidder_code, price),
        }
    }

    /// `hb_bidder IS bidder AND hb_pb IS price [AND hb_size IS sizes]`
    fn custom_targeting(&self, hb_pb_value_id: ObjectId) -> CustomCriteriaSet {
        let mut children = vec![
            CustomCriteria::is(self.hb_bidder_key_id, vec![self.hb_bidder_value_id]),
            CustomCriteria::is(self.hb_pb_key_id, vec![hb_pb_value_id]),
        ];
        if let Some((key_id, value_ids)) = &self.hb_size {
            children.push(CustomCriteria::is(*key_id, value_ids.clone()));
        }

        CustomCriteriaSet {
            logical_operator: LogicalOperator::And,
            children,
        }
    }

    /// Config for a single price-priority CPM line item
    pub fn line_item_config(
        &self,
        name: String,
        cpm_micro_amount: i64,
        hb_pb_value_id: ObjectId,
    ) -> LineItem {
        LineItem {
            id: None,
            name,
            order_id: self.order_id,
            targeting: Targeting {
                inventory_targeting: self.inventory.targeting(),
                custom_targeting: self.custom_targeting(hb_pb_value_id),
            },
            start_date_time_type: StartDateTimeType::Immediately,
            unlimited_end_date_time: true,
            line_item_type: LineItemType::PricePriority,
            cost_type: CostType::Cpm,
            cost_per_unit: Money {
                currency_code: self.currency_code.clone(),
                micro_amount: cpm_micro_amount,
            },
            creative_rotation_type: CreativeRotationType::Even,
            primary_goal: Goal {
                goal_type: GoalType::NoGoal,
            },
            creative_placeholders: self
                .sizes
                .iter()
                .map(|&size| CreativePlaceholder { size })
                .collect(),
        }
    }
}

/// One line item config per price, resolving (or creating) each `hb_pb` value
pub async fn create_line_item_configs(
    prices: &[PricePoint],
    template: &LineItemTemplate,
    hb_pb_values: &mut TargetingValueResolver<'_>,
) -> SetupResult<Vec<LineItem>> {
    let mut configs = Vec::with_capacity(prices.len());

    for price in prices {
        let price_str = price.label();
        let hb_pb_value_id = hb_pb_values.resolve(&price_str).await?;

        configs.push(template.line_item_config(
            template.line_item_name(&price_str),
            price.micro_amount,
            hb_pb_value_id,
        ));
    }

    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad_server::testing::FakeAdServer;

    fn create_test_template() -> LineItemTemplate {
        LineItemTemplate {
            order_id: 4242,
            inventory: InventoryIds::AdUnits(vec![21, 22]),
            sizes: vec![Size::new(728, 90)],
            currency_code: "USD".to_string(),
            bidder_code: "rubicon".to_string(),
            name_prefix: None,
            hb_bidder_key_id: 1,
            hb_bidder_value_id: 10,
            hb_pb_key_id: 2,
            hb_size: None,
        }
    }

    #[test]
    fn test_line_item_name() {
        let mut template = create_test_template();
        assert_eq!(template.line_item_name("1.50"), "rubicon: HB $1.50");

        template.name_prefix = Some("Rubicon_728x90_$".to_string());
        assert_eq!(template.line_item_name("1.50"), "Rubicon_728x90_$1.50");
    }

    #[test]
    fn test_line_item_config_ad_units() {
        let template = create_test_template();
        let item = template.line_item_config("rubicon: HB $0.50".to_string(), 500_000, 20);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["orderId"], 4242);
        assert_eq!(json["lineItemType"], "PRICE_PRIORITY");
        assert_eq!(json["costType"], "CPM");
        assert_eq!(json["startDateTimeType"], "IMMEDIATELY");
        assert_eq!(json["creativeRotationType"], "EVEN");
        assert_eq!(json["primaryGoal"]["goalType"], "NONE");
        assert_eq!(json["unlimitedEndDateTime"], true);
        assert_eq!(json["costPerUnit"]["microAmount"], 500_000);
        assert_eq!(json["creativePlaceholders"][0]["size"]["width"], 728);

        let inventory = &json["targeting"]["inventoryTargeting"];
        assert_eq!(inventory["targetedAdUnits"][1]["adUnitId"], 22);
        assert!(inventory.get("targetedPlacementIds").is_none());

        let custom = &json["targeting"]["customTargeting"];
        assert_eq!(custom["logicalOperator"], "AND");
        assert_eq!(custom["children"].as_array().unwrap().len(), 2);
        assert_eq!(custom["children"][1]["keyId"], 2);
        assert_eq!(custom["children"][1]["valueIds"][0], 20);
    }

    #[test]
    fn test_line_item_config_placements_and_sizes() {
        let mut template = create_test_template();
        template.inventory = InventoryIds::Placements(vec![11]);
        template.hb_size = Some((3, vec![30, 31]));

        let item = template.line_item_config("x".to_string(), 1, 20);

        assert_eq!(
            item.targeting.inventory_targeting.targeted_placement_ids,
            Some(vec![11])
        );
        assert!(item.targeting.inventory_targeting.targeted_ad_units.is_none());
        assert_eq!(
            item.targeting.custom_targeting.children[2],
            CustomCriteria::is(3, vec![30, 31])
        );
    }

    #[tokio::test]
    async fn test_create_line_item_configs_resolves_prices() {
        let server = FakeAdServer::default();
        server.add_value(2, "0.50", 20);
        let template = create_test_template();
        let mut resolver = TargetingValueResolver::new(&server, "hb_pb", 2);

        let prices = [
            PricePoint {
                micro_amount: 500_000,
                precision: 2,
            },
            PricePoint {
                micro_amount: 1_000_000,
                precision: 2,
            },
        ];
        let configs = create_line_item_configs(&prices, &template, &mut resolver)
            .await
            .unwrap();

        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].name, "rubicon: HB $0.50");
        assert_eq!(configs[1].name, "rubicon: HB $1.00");
        assert_eq!(configs[0].targeting.custom_targeting.children[1].value_ids, vec![20]);
        assert_eq!(server.state.lock().unwrap().value_creates, 1);
    }
}
