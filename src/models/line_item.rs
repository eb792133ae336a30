use super::targeting::CustomCriteriaSet;
use super::{Money, ObjectId, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineItemType {
    PricePriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostType {
    Cpm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartDateTimeType {
    Immediately,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreativeRotationType {
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    #[serde(rename = "NONE")]
    NoGoal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub goal_type: GoalType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativePlaceholder {
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdUnitTargeting {
    pub ad_unit_id: ObjectId,
}

/// Exactly one of the two lists is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTargeting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeted_placement_ids: Option<Vec<ObjectId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeted_ad_units: Option<Vec<AdUnitTargeting>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Targeting {
    pub inventory_targeting: InventoryTargeting,
    pub custom_targeting: CustomCriteriaSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub order_id: ObjectId,
    pub targeting: Targeting,
    pub start_date_time_type: StartDateTimeType,
    pub unlimited_end_date_time: bool,
    pub line_item_type: LineItemType,
    pub cost_type: CostType,
    pub cost_per_unit: Money,
    pub creative_rotation_type: CreativeRotationType,
    pub primary_goal: Goal,
    pub creative_placeholders: Vec<CreativePlaceholder>,
}
