// src/crawl/mod.rs
// =============================================================================
// This module drives the crawl.
//
// Features:
// - Ordered, de-duplicated frontier seeded from the config
// - Frontier expansion through each user's followers until the population
//   target is covered
// - Random pause before every profile request
// - Stops on the first ban signal
//
// Rust concepts:
// - Generics: the orchestrator works with any WeiboApi implementation
// - Ownership: the orchestrator owns the frontier, the store and the client,
//   and gives them back as a CrawlReport when the run ends
// =============================================================================

mod frontier;
mod orchestrator;
mod throttle;

pub use orchestrator::{AbortReason, CrawlOrchestrator, CrawlOutcome, CrawlReport, CrawlSettings};

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not a VecDeque for the frontier?
//    - A VecDeque pops items off the front, so they'd be gone
//    - We need to remember every uid ever queued for de-duplication
//    - A Vec plus a cursor keeps the order AND the history
//
// 2. Why a trait for the API?
//    - The crawl loop doesn't care where responses come from
//    - Tests plug in a scripted fake and never touch the network
//
// 3. Why is there no concurrency here?
//    - Weibo bans callers that request too fast
//    - One request at a time with a pause in between is the whole point
// -----------------------------------------------------------------------------
