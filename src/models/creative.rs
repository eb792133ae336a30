use super::{ObjectId, Size};
use serde::{Deserialize, Serialize};

/// Third-party creative carrying an HTML snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyCreative {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub advertiser_id: ObjectId,
    pub size: Size,
    pub snippet: String,
    pub is_safe_frame_compatible: bool,
}

/// Line item / creative association
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemCreativeAssociation {
    pub line_item_id: ObjectId,
    pub creative_id: ObjectId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub size_overrides: Vec<Size>,
}
