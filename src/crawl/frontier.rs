// src/crawl/frontier.rs
// =============================================================================
// The crawl frontier: uids waiting to be crawled, in order.
//
// It is a work queue and a dedup set at the same time:
// - `order` keeps insertion order (that's the crawl order)
// - `members` answers "have we seen this uid?" in O(1)
// - `cursor` points at the next uid to hand out
//
// Nothing is ever removed. A uid that has been handed out stays a member,
// so follower discovery can never queue it a second time.
// =============================================================================

use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct Frontier {
    order: Vec<String>,
    members: HashSet<String>,
    cursor: usize,
}

impl Frontier {
    /// Builds a frontier from the seed list; repeated seeds are collapsed
    pub fn new(seed: impl IntoIterator<Item = String>) -> Self {
        let mut frontier = Self::default();
        for uid in seed {
            frontier.push(uid);
        }
        frontier
    }

    /// Appends `uid` unless it's already a member. Returns whether it was added.
    pub fn push(&mut self, uid: String) -> bool {
        if self.members.contains(&uid) {
            return false;
        }
        self.members.insert(uid.clone());
        self.order.push(uid);
        true
    }

    /// Appends new uids in the given order, stopping once the frontier holds
    /// `cap` uids. Returns how many were added.
    pub fn extend_up_to(&mut self, uids: impl IntoIterator<Item = String>, cap: usize) -> usize {
        let mut added = 0;
        for uid in uids {
            if self.order.len() >= cap {
                break;
            }
            if self.push(uid) {
                added += 1;
            }
        }
        added
    }

    /// Hands out the next uid in insertion order
    pub fn next_uid(&mut self) -> Option<String> {
        let uid = self.order.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(uid)
    }

    /// Total number of uids ever queued (handed out or not)
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Uids not handed out yet
    pub fn pending(&self) -> usize {
        self.order.len() - self.cursor
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seed_order_kept_and_duplicates_collapsed() {
        let frontier = Frontier::new(uids(&["3", "1", "3", "2", "1"]));
        assert_eq!(frontier.into_vec(), uids(&["3", "1", "2"]));
    }

    #[test]
    fn test_next_uid_walks_in_order_while_growing() {
        let mut frontier = Frontier::new(uids(&["a"]));
        assert_eq!(frontier.next_uid().as_deref(), Some("a"));
        assert_eq!(frontier.next_uid(), None);

        frontier.push("b".to_string());
        assert_eq!(frontier.pending(), 1);
        assert_eq!(frontier.next_uid().as_deref(), Some("b"));
        assert_eq!(frontier.pending(), 0);
    }

    #[test]
    fn test_handed_out_uids_are_never_queued_again() {
        let mut frontier = Frontier::new(uids(&["a", "b"]));
        frontier.next_uid();
        assert!(!frontier.push("a".to_string()));
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.pending(), 1);
    }

    #[test]
    fn test_extend_stops_at_cap() {
        let mut frontier = Frontier::new(uids(&["1", "2"]));
        let added = frontier.extend_up_to(uids(&["1", "3", "4", "5", "6"]), 5);
        assert_eq!(added, 3);
        assert_eq!(frontier.into_vec(), uids(&["1", "2", "3", "4", "5"]));
    }

    #[test]
    fn test_no_duplicates_after_many_expansions() {
        let mut frontier = Frontier::new(uids(&["1"]));
        for batch in [&["1", "2", "3"][..], &["3", "2", "4"], &["4", "5", "1", "5"]] {
            frontier.extend_up_to(uids(batch), usize::MAX);
        }
        let all = frontier.into_vec();
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
        assert_eq!(all, uids(&["1", "2", "3", "4", "5"]));
    }
}
