// src/api/followers.rs
// =============================================================================
// Extracts follower uids from the legacy weibo.cn fans page.
//
// Each fan row has an action link whose text is 关注他 / 关注她 ("follow
// him/her") or 移除 ("remove", when the page belongs to the logged-in user):
//
//   <a href="/attention/add?uid=1234567890&rl=1&st=abc">关注他</a>
//
// We keep only those links and read the uid= query parameter, so profile
// links, paging links and ads on the same page are ignored.
// =============================================================================

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;

const ACTION_TEXTS: [&str; 3] = ["关注他", "关注她", "移除"];

fn uid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // The pattern is a constant, so it is known to compile
    PATTERN.get_or_init(|| Regex::new(r"uid=(\d+)").expect("valid uid regex"))
}

// Returns the uids found on the page, in page order, each at most once
pub fn extract_follower_uids(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // Constant selector, known to be valid
    let selector = Selector::parse("a[href]").expect("valid anchor selector");

    let mut seen = HashSet::new();
    let mut uids = Vec::new();

    for element in document.select(&selector) {
        let text = element.text().collect::<String>();
        if !ACTION_TEXTS.contains(&text.trim()) {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        for capture in uid_pattern().captures_iter(href) {
            let uid = capture[1].to_string();
            if seen.insert(uid.clone()) {
                uids.push(uid);
            }
        }
    }

    uids
}

#[cfg(test)]
mod tests {
    use super::*;

    const FANS_PAGE: &str = r#"
        <html><body>
          <table><tr>
            <td><a href="/u/111">Alice</a></td>
            <td><a href="/attention/add?uid=111&amp;rl=1&amp;st=x">关注她</a></td>
          </tr></table>
          <table><tr>
            <td><a href="/u/222">Bob</a></td>
            <td><a href="/attention/add?uid=222&amp;rl=1&amp;st=x">关注他</a></td>
          </tr></table>
          <table><tr>
            <td><a href="/attention/remove?uid=333&amp;st=x">移除</a></td>
          </tr></table>
          <a href="/attention/add?uid=222&amp;rl=1">关注他</a>
          <a href="/ad?uid=999">广告</a>
          <a href="/fans?page=2&amp;uid=888">下页</a>
        </body></html>
    "#;

    #[test]
    fn test_extracts_action_links_in_page_order() {
        assert_eq!(extract_follower_uids(FANS_PAGE), vec!["111", "222", "333"]);
    }

    #[test]
    fn test_ignores_links_without_action_text() {
        let html = r#"<a href="/u?uid=1">Profile</a><a href="/x?uid=2">关注</a>"#;
        assert!(extract_follower_uids(html).is_empty());
    }

    #[test]
    fn test_login_page_yields_nothing() {
        let html = "<html><body><form action='/login'></form></body></html>";
        assert!(extract_follower_uids(html).is_empty());
    }
}
