use crate::models::creative::ThirdPartyCreative;
use crate::models::{ObjectId, Size};

/// Prebid universal render snippet; the winning bid's ad id arrives in `hb_adid`
pub const PREBID_CREATIVE_SNIPPET: &str = r#"<script>
var w = window;
for (i = 0; i < 10; i++) {
  w = w.parent;
  if (w.pbjs) {
    try {
      w.pbjs.renderAd(document, '%%PATTERN:hb_adid%%');
      break;
    } catch (e) {
      continue;
    }
  }
}
</script>
"#;

/// Creative size; line-item associations override it with the real slot sizes
const CREATIVE_SIZE: Size = Size {
    width: 1,
    height: 1,
};

pub fn creative_config(name: String, advertiser_id: ObjectId) -> ThirdPartyCreative {
    ThirdPartyCreative {
        id: None,
        name,
        advertiser_id,
        size: CREATIVE_SIZE,
        snippet: PREBID_CREATIVE_SNIPPET.to_string(),
        is_safe_frame_compatible: true,
    }
}

/// `count` identical Prebid creatives named `"{bidder}: HB {order}, #{n}"`.
///
/// A creative can serve once per page, so a line item needs one per ad slot
/// it may fill on the same page.
pub fn duplicate_creative_configs(
    bidder_code: &str,
    order_name: &str,
    advertiser_id: ObjectId,
    count: usize,
) -> Vec<ThirdPartyCreative> {
    (1..=count)
        .map(|n| {
            creative_config(
                format!("{}: HB {}, #{}", bidder_code, order_name, n),
                advertiser_id,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_creative_configs() {
        let creatives = duplicate_creative_configs("rubicon", "Prebid rubicon", 31, 3);

        assert_eq!(creatives.len(), 3);
        assert_eq!(creatives[0].name, "rubicon: HB Prebid rubicon, #1");
        assert_eq!(creatives[2].name, "rubicon: HB Prebid rubicon, #3");
        assert!(creatives.iter().all(|c| c.advertiser_id == 31));
        assert!(creatives.iter().all(|c| c.size == Size::new(1, 1)));
        assert!(creatives[0].snippet.contains("%%PATTERN:hb_adid%%"));
    }

    #[test]
    fn test_zero_creatives() {
        assert!(duplicate_creative_configs("rubicon", "order", 1, 0).is_empty());
    }
}
