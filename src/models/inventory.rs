use super::ObjectId;
use serde::{Deserialize, Serialize};

/// Ad Manager user (the order's trafficker)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: ObjectId,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

/// Placement or ad unit, looked up by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ObjectId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyType {
    Advertiser,
}

/// Company of type advertiser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advertiser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

impl Advertiser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            company_type: CompanyType::Advertiser,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub advertiser_id: ObjectId,
    pub trafficker_id: ObjectId,
}

impl Order {
    pub fn new(name: impl Into<String>, advertiser_id: ObjectId, trafficker_id: ObjectId) -> Self {
        Self {
            id: None,
            name: name.into(),
            advertiser_id,
            trafficker_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advertiser_serializes_type() {
        let json = serde_json::to_value(Advertiser::new("Rubicon")).unwrap();
        assert_eq!(json["type"], "ADVERTISER");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_order_wire_format() {
        let json = serde_json::to_value(Order::new("Prebid rubicon", 12, 34)).unwrap();
        assert_eq!(json["advertiserId"], 12);
        assert_eq!(json["traffickerId"], 34);
    }
}
