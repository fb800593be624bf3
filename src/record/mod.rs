// src/record/mod.rs
// =============================================================================
// One dataset row per crawled user.
//
// UserRecord has a fixed set of columns in a fixed order. The builder
// submodule assembles it from the two API payloads; the store writes it.
// =============================================================================

mod builder;

pub use builder::{user_info, UserRecordBuilder};

/// Column labels, in row order, as existing consumers of the CSV expect them
pub const COLUMN_LABELS: [&str; 21] = [
    "用户id",
    "昵称",
    "性别",
    "生日",
    "所在地",
    "学习经历",
    "公司",
    "注册时间",
    "阳光信用",
    "微博数",
    "粉丝数",
    "关注数",
    "简介",
    "主页",
    "头像",
    "高清头像",
    "微博等级",
    "会员等级",
    "是否认证",
    "认证类型",
    "认证信息",
];

/// A normalized profile. Built once, never mutated, written once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub screen_name: String,
    pub gender: String,
    pub birthday: String,
    pub location: String,
    pub education: String,
    pub company: String,
    pub registration_time: String,
    pub sunshine_credit: String,
    pub statuses_count: u64,
    pub followers_count: u64,
    pub follow_count: u64,
    pub description: String,
    pub profile_url: String,
    pub profile_image_url: String,
    pub avatar_hd_url: String,
    pub user_rank: u64,
    pub member_rank: u64,
    pub verified: bool,
    /// -1 when the account isn't verified
    pub verified_type: i64,
    pub verified_reason: String,
}

impl UserRecord {
    /// The record as CSV cells, in COLUMN_LABELS order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.screen_name.clone(),
            self.gender.clone(),
            self.birthday.clone(),
            self.location.clone(),
            self.education.clone(),
            self.company.clone(),
            self.registration_time.clone(),
            self.sunshine_credit.clone(),
            self.statuses_count.to_string(),
            self.followers_count.to_string(),
            self.follow_count.to_string(),
            self.description.clone(),
            self.profile_url.clone(),
            self.profile_image_url.clone(),
            self.avatar_hd_url.clone(),
            self.user_rank.to_string(),
            self.member_rank.to_string(),
            // Capitalized, matching rows written by earlier versions
            if self.verified { "True" } else { "False" }.to_string(),
            self.verified_type.to_string(),
            self.verified_reason.clone(),
        ]
    }
}
