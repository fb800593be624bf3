// src/record/builder.rs
// =============================================================================
// Merges the profile payload and the extended-info payload into a UserRecord.
//
// Profile payload (user container):
//   { "ok": 1, "data": { "userInfo": { "screen_name": "...", "gender": "f",
//     "followers_count": "1.2万", "verified": true, ... } } }
//
// Extended payload (info container): a list of cards, each with a
// card_group of label/content items:
//   { "ok": 1, "data": { "cards": [
//       { "card_group": [ { "item_name": "生日", "item_content": "1990-01-01" } ] },
//       { "card_group": [ { "item_name": "大学", "item_content": "北京大学" } ] } ] } }
//
// Only the first two cards are read. The four schooling labels all land in
// the single `education` column; the last matching item wins.
// =============================================================================

use crate::api::ApiResponse;
use crate::error::CrawlError;
use crate::normalize::{parse_count_value, TextSanitizer};
use crate::record::UserRecord;
use serde_json::Value;
use tracing::{debug, warn};

// Extended-info slots
#[derive(Debug, Default)]
struct ExtendedFields {
    birthday: String,
    location: String,
    education: String,
    company: String,
    registration_time: String,
    sunshine_credit: String,
}

impl ExtendedFields {
    fn slot(&mut self, label: &str) -> Option<&mut String> {
        match label {
            "生日" => Some(&mut self.birthday),
            "所在地" => Some(&mut self.location),
            "小学" | "初中" | "高中" | "大学" => Some(&mut self.education),
            "公司" => Some(&mut self.company),
            "注册时间" => Some(&mut self.registration_time),
            "阳光信用" => Some(&mut self.sunshine_credit),
            _ => None,
        }
    }

    // Missing, failed or oddly shaped payloads just leave everything empty
    fn from_response(extended: Option<&ApiResponse>) -> Self {
        let mut fields = Self::default();

        let Some(extended) = extended.filter(|r| r.status == 200 && r.is_ok()) else {
            return fields;
        };
        let Some(cards) = extended.body.pointer("/data/cards").and_then(Value::as_array) else {
            return fields;
        };
        if cards.len() < 2 {
            return fields;
        }

        let items = cards[..2]
            .iter()
            .filter_map(|card| card.get("card_group").and_then(Value::as_array))
            .flatten();

        for item in items {
            let Some(label) = item.get("item_name").and_then(Value::as_str) else {
                continue;
            };
            if let Some(slot) = fields.slot(label) {
                *slot = text(item, "item_content");
            }
        }

        fields
    }
}

/// Returns `data.userInfo` of a profile payload, or InvalidUser when the API
/// said no
pub fn user_info<'a>(uid: &str, profile: &'a ApiResponse) -> Result<&'a Value, CrawlError> {
    if !profile.is_ok() {
        return Err(CrawlError::InvalidUser {
            uid: uid.to_string(),
        });
    }

    profile
        .body
        .pointer("/data/userInfo")
        .filter(|info| info.is_object())
        .ok_or_else(|| CrawlError::InvalidUser {
            uid: uid.to_string(),
        })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserRecordBuilder {
    sanitizer: TextSanitizer,
}

impl UserRecordBuilder {
    pub fn new(sanitizer: TextSanitizer) -> Self {
        Self { sanitizer }
    }

    pub fn build(
        &self,
        uid: &str,
        profile: &ApiResponse,
        extended: Option<&ApiResponse>,
    ) -> Result<UserRecord, CrawlError> {
        let info = user_info(uid, profile)?;
        let extra = ExtendedFields::from_response(extended);
        let clean = |s: String| self.sanitizer.clean(&s);

        let record = UserRecord {
            id: clean(uid.to_string()),
            screen_name: clean(text(info, "screen_name")),
            gender: clean(text(info, "gender")),
            birthday: clean(extra.birthday),
            location: clean(extra.location),
            education: clean(extra.education),
            company: clean(extra.company),
            registration_time: clean(extra.registration_time),
            sunshine_credit: clean(extra.sunshine_credit),
            statuses_count: count(uid, info, "statuses_count"),
            followers_count: count(uid, info, "followers_count"),
            follow_count: count(uid, info, "follow_count"),
            description: clean(text(info, "description")),
            profile_url: clean(text(info, "profile_url")),
            profile_image_url: clean(text(info, "profile_image_url")),
            avatar_hd_url: clean(text(info, "avatar_hd")),
            user_rank: count(uid, info, "urank"),
            member_rank: count(uid, info, "mbrank"),
            verified: info.get("verified").and_then(Value::as_bool).unwrap_or(false),
            verified_type: verified_type(info),
            verified_reason: clean(text(info, "verified_reason")),
        };

        debug!(uid, screen_name = %record.screen_name, "built user record");
        Ok(record)
    }
}

// String field; numbers are rendered, null/missing is empty
fn text(object: &Value, key: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn count(uid: &str, info: &Value, key: &str) -> u64 {
    let raw = info.get(key).unwrap_or(&Value::Null);
    parse_count_value(raw).unwrap_or_else(|e| {
        warn!(uid, field = key, error = %e, "unparseable count, recording 0");
        0
    })
}

fn verified_type(info: &Value) -> i64 {
    match info.get("verified_type") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(-1),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(-1),
        _ => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::OutputCharset;
    use serde_json::json;

    fn profile() -> ApiResponse {
        ApiResponse::new(
            200,
            json!({
                "ok": 1,
                "data": { "userInfo": {
                    "screen_name": "测\u{200B}试用户",
                    "gender": "f",
                    "statuses_count": 1234,
                    "followers_count": "1.2万",
                    "follow_count": "300",
                    "description": "hello\u{200B}",
                    "profile_url": "https://m.weibo.cn/u/100",
                    "profile_image_url": "https://tva1.sinaimg.cn/small.jpg",
                    "avatar_hd": "https://tva1.sinaimg.cn/large.jpg",
                    "urank": 12,
                    "mbrank": 3,
                    "verified": true,
                    "verified_type": 0,
                    "verified_reason": "知名博主"
                }}
            }),
        )
    }

    fn extended() -> ApiResponse {
        ApiResponse::new(
            200,
            json!({
                "ok": 1,
                "data": { "cards": [
                    { "card_group": [
                        { "item_name": "生日", "item_content": "1990-01-01" },
                        { "item_name": "所在地", "item_content": "北京 海淀区" },
                        { "item_name": "高中", "item_content": "北京四中" },
                        { "item_name": "标签", "item_content": "ignored" }
                    ]},
                    { "card_group": [
                        { "item_name": "大学", "item_content": "北京大学" },
                        { "item_name": "公司", "item_content": "新浪" },
                        { "item_name": "注册时间", "item_content": "2010-05-06" },
                        { "item_name": "阳光信用", "item_content": "信用极好" }
                    ]},
                    { "card_group": [
                        { "item_name": "生日", "item_content": "third card is not read" }
                    ]}
                ]}
            }),
        )
    }

    #[test]
    fn test_build_merges_both_payloads() {
        let record = UserRecordBuilder::default()
            .build("100", &profile(), Some(&extended()))
            .unwrap();

        assert_eq!(record.id, "100");
        assert_eq!(record.screen_name, "测试用户");
        assert_eq!(record.gender, "f");
        assert_eq!(record.birthday, "1990-01-01");
        assert_eq!(record.location, "北京 海淀区");
        assert_eq!(record.education, "北京大学");
        assert_eq!(record.company, "新浪");
        assert_eq!(record.registration_time, "2010-05-06");
        assert_eq!(record.sunshine_credit, "信用极好");
        assert_eq!(record.statuses_count, 1234);
        assert_eq!(record.followers_count, 12_000);
        assert_eq!(record.follow_count, 300);
        assert_eq!(record.description, "hello");
        assert_eq!(record.avatar_hd_url, "https://tva1.sinaimg.cn/large.jpg");
        assert_eq!(record.user_rank, 12);
        assert_eq!(record.member_rank, 3);
        assert!(record.verified);
        assert_eq!(record.verified_type, 0);
        assert_eq!(record.verified_reason, "知名博主");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let profile = ApiResponse::new(200, json!({"ok": 1, "data": {"userInfo": {}}}));
        let record = UserRecordBuilder::default().build("7", &profile, None).unwrap();

        assert_eq!(record.screen_name, "");
        assert_eq!(record.statuses_count, 0);
        assert_eq!(record.user_rank, 0);
        assert!(!record.verified);
        assert_eq!(record.verified_type, -1);
        assert_eq!(record.birthday, "");
    }

    #[test]
    fn test_broken_extended_payload_leaves_fields_empty() {
        let cases = [
            ApiResponse::new(200, json!({"ok": 0})),
            ApiResponse::new(500, Value::Null),
            ApiResponse::new(200, json!({"ok": 1, "data": {"cards": "nope"}})),
            ApiResponse::new(200, json!({"ok": 1, "data": {"cards": [{"card_group": []}]}})),
        ];
        for extended in cases {
            let record = UserRecordBuilder::default()
                .build("100", &profile(), Some(&extended))
                .unwrap();
            assert_eq!(record.birthday, "");
            assert_eq!(record.education, "");
            assert_eq!(record.screen_name, "测试用户");
        }
    }

    #[test]
    fn test_not_ok_profile_is_an_error() {
        let profile = ApiResponse::new(200, json!({"ok": 0, "msg": "用户不存在"}));
        let err = UserRecordBuilder::default().build("404", &profile, None).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidUser { uid } if uid == "404"));
    }

    #[test]
    fn test_ok_without_user_info_is_an_error() {
        let profile = ApiResponse::new(200, json!({"ok": 1, "data": {}}));
        assert!(user_info("1", &profile).is_err());
    }

    #[test]
    fn test_unparseable_count_recorded_as_zero() {
        let profile = ApiResponse::new(
            200,
            json!({"ok": 1, "data": {"userInfo": {"followers_count": "很多", "follow_count": 5}}}),
        );
        let record = UserRecordBuilder::default().build("1", &profile, None).unwrap();
        assert_eq!(record.followers_count, 0);
        assert_eq!(record.follow_count, 5);
    }

    #[test]
    fn test_charset_applies_to_text_fields_only() {
        let builder = UserRecordBuilder::new(TextSanitizer::new(OutputCharset::Ascii));
        let record = builder.build("100", &profile(), Some(&extended())).unwrap();
        assert_eq!(record.screen_name, "");
        assert_eq!(record.location, " ");
        assert_eq!(record.followers_count, 12_000);
        assert_eq!(record.profile_url, "https://m.weibo.cn/u/100");
    }
}
