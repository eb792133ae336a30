use super::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyType {
    Freeform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Exact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTargetingKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub key_type: KeyType,
}

impl CustomTargetingKey {
    pub fn freeform(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: None,
            display_name: Some(name.clone()),
            name,
            key_type: KeyType::Freeform,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTargetingValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub custom_targeting_key_id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub match_type: MatchType,
}

impl CustomTargetingValue {
    pub fn exact(key_id: ObjectId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: None,
            custom_targeting_key_id: key_id,
            display_name: Some(name.clone()),
            name,
            match_type: MatchType::Exact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOperator {
    Is,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalOperator {
    And,
}

/// `key IS value[, value...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCriteria {
    pub key_id: ObjectId,
    pub value_ids: Vec<ObjectId>,
    pub operator: ComparisonOperator,
}

impl CustomCriteria {
    pub fn is(key_id: ObjectId, value_ids: Vec<ObjectId>) -> Self {
        Self {
            key_id,
            value_ids,
            operator: ComparisonOperator::Is,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCriteriaSet {
    pub logical_operator: LogicalOperator,
    pub children: Vec<CustomCriteria>,
}
