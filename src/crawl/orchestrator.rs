// src/crawl/orchestrator.rs
// =============================================================================
// The crawl loop.
//
// How it works, for every uid taken from the frontier in order:
// 1. Throttle: sleep a random 3-10s
// 2. Fetch the profile. Non-200 means we've been banned: stop everything.
// 3. `ok: false` means the uid is invalid or blocked: stop, or skip it,
//    depending on the configured policy
// 4. Expand: while the frontier is smaller than the population target,
//    queue this user's followers (first fans page only)
// 5. Fetch extended info, build the record, append it to the dataset
// 6. Stop once `target` users have been written
//
// If the frontier runs dry first we finish early with fewer users than
// asked for.
//
// Everything is sequential: one request in flight at a time. Running
// requests in parallel would only get us banned faster.
// =============================================================================

use super::frontier::Frontier;
use super::throttle::Throttle;
use crate::api::WeiboApi;
use crate::config::{Config, InvalidUserPolicy};
use crate::record::{user_info, UserRecordBuilder};
use crate::store::CsvStore;
use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

/// Knobs of a single crawl
#[derive(Debug, Clone, Copy)]
pub struct CrawlSettings {
    /// Number of users to write before finishing
    pub target: usize,
    pub on_invalid_user: InvalidUserPolicy,
    /// Skip uids the dataset already has a row for
    pub skip_recorded: bool,
}

impl CrawlSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target: config.population_target(),
            on_invalid_user: config.on_invalid_user,
            skip_recorded: config.skip_recorded,
        }
    }
}

/// Why a crawl stopped before finishing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// Profile endpoint answered with a non-200 status
    Banned { status: u16 },
    /// Profile came back `ok: false` under the abort policy
    InvalidUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Target reached, or the frontier ran out
    Finished,
    Aborted { uid: String, reason: AbortReason },
}

/// What a crawl did
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub outcome: CrawlOutcome,
    /// Users written to the dataset during this run
    pub processed: usize,
    pub target: usize,
    /// Uids passed over (invalid under the skip policy, or already recorded)
    pub skipped: Vec<String>,
    /// Every uid queued during the run, in crawl order
    pub frontier: Vec<String>,
}

impl CrawlReport {
    pub fn is_aborted(&self) -> bool {
        matches!(self.outcome, CrawlOutcome::Aborted { .. })
    }

    /// Finished with everything that was asked for
    pub fn is_complete(&self) -> bool {
        !self.is_aborted() && self.processed >= self.target
    }
}

// Mutable state of one run, owned by the orchestrator
#[derive(Debug, Default)]
struct CrawlState {
    frontier: Frontier,
    processed: usize,
    skipped: Vec<String>,
}

pub struct CrawlOrchestrator<A: WeiboApi> {
    api: A,
    store: CsvStore,
    builder: UserRecordBuilder,
    throttle: Throttle,
    settings: CrawlSettings,
    state: CrawlState,
}

impl<A: WeiboApi> CrawlOrchestrator<A> {
    pub fn new(
        api: A,
        store: CsvStore,
        builder: UserRecordBuilder,
        seed: Vec<String>,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            api,
            store,
            builder,
            throttle: Throttle::default(),
            settings,
            state: CrawlState {
                frontier: Frontier::new(seed),
                ..CrawlState::default()
            },
        }
    }

    /// Runs the crawl to completion
    ///
    /// Ok(report) for both finished and aborted crawls; Err only for
    /// transport or I/O failures.
    pub async fn run(mut self) -> Result<CrawlReport> {
        let target = self.settings.target;
        info!(
            population_target = target,
            seeds = self.state.frontier.len(),
            path = %self.store.path().display(),
            "crawl started"
        );

        // Nothing asked for, or nothing to start from
        if target == 0 || self.state.frontier.is_empty() {
            return Ok(self.finish(CrawlOutcome::Finished));
        }

        // The frontier can grow while we walk it, so pull one uid at a time
        // instead of iterating over a snapshot
        while let Some(uid) = self.state.frontier.next_uid() {
            // Already in the dataset from an earlier run: no request at all
            if self.settings.skip_recorded && self.store.contains(&uid) {
                info!(uid = %uid, "already in dataset, skipping");
                self.state.skipped.push(uid);
                continue;
            }

            // Some(reason) means this uid ended the whole run
            if let Some(reason) = self.crawl_user(&uid).await? {
                return Ok(self.finish(CrawlOutcome::Aborted { uid, reason }));
            }

            // Skipped uids don't count, so compare against what was written
            if self.state.processed == target {
                return Ok(self.finish(CrawlOutcome::Finished));
            }
        }

        // Ran out of uids: best effort, we keep what we have
        warn!(
            processed = self.state.processed,
            population_target = target,
            "frontier exhausted before reaching the target"
        );
        Ok(self.finish(CrawlOutcome::Finished))
    }

    // One uid, start to finish. Returns Some(reason) when the run must stop.
    async fn crawl_user(&mut self, uid: &str) -> Result<Option<AbortReason>> {
        // Step 1: wait before every profile request, no exceptions
        self.throttle.pause().await;

        // Step 2: the profile call. A transport error (DNS, connection reset)
        // is not a ban, it's a plain error for the caller
        debug!(uid, "fetching profile");
        let profile = self
            .api
            .fetch_profile(uid)
            .await
            .with_context(|| format!("Failed to fetch profile of {}", uid))?;

        // Any non-200 here means Weibo is refusing us; every following
        // request would fail too, so the whole run stops
        if profile.is_ban_signal() {
            error!(uid, status = profile.status, "profile request rejected, we are probably banned; stopping");
            return Ok(Some(AbortReason::Banned {
                status: profile.status,
            }));
        }

        // Step 3: `ok: false` is about this uid only; the policy decides
        // whether that ends the run
        if let Err(e) = user_info(uid, &profile) {
            match self.settings.on_invalid_user {
                InvalidUserPolicy::Abort => {
                    error!(uid, error = %e, "invalid user; stopping");
                    return Ok(Some(AbortReason::InvalidUser));
                }
                InvalidUserPolicy::Skip => {
                    warn!(uid, error = %e, "invalid user; skipping");
                    self.state.skipped.push(uid.to_string());
                    return Ok(None);
                }
            }
        }

        // Step 4: only look for more users while we're short of the target
        if self.state.frontier.len() < self.settings.target {
            self.expand(uid).await;
        }

        // Step 5: extended info is optional, a failed call just means
        // empty birthday/location/... columns
        let extended = match self.api.fetch_extended_info(uid).await {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(uid, error = %e, "extended info unavailable, leaving those fields empty");
                None
            }
        };

        // Step 6: normalize and write; the row is on disk before we move on
        let record = self.builder.build(uid, &profile, extended.as_ref())?;
        self.store.append(&record)?;
        self.state.processed += 1;

        info!(
            processed = self.state.processed,
            population_target = self.settings.target,
            "progress"
        );
        Ok(None)
    }

    // Queues the user's followers, never past the population target
    async fn expand(&mut self, uid: &str) {
        match self.api.fetch_followers(uid).await {
            Ok(followers) => {
                // extend_up_to drops uids already queued and stops at the target
                let found = followers.len();
                let added = self
                    .state
                    .frontier
                    .extend_up_to(followers, self.settings.target);
                debug!(
                    uid,
                    found,
                    added,
                    frontier = self.state.frontier.len(),
                    pending = self.state.frontier.pending(),
                    "expanded frontier"
                );
            }
            // Not fatal: the crawl just continues with what's queued
            Err(e) => {
                warn!(uid, error = %e, "could not list followers, frontier not expanded");
            }
        }
    }

    fn finish(self, outcome: CrawlOutcome) -> CrawlReport {
        match &outcome {
            CrawlOutcome::Finished => info!(processed = self.state.processed, "crawl finished"),
            CrawlOutcome::Aborted { uid, reason } => {
                error!(uid = %uid, ?reason, processed = self.state.processed, "crawl aborted")
            }
        }

        CrawlReport {
            outcome,
            processed: self.state.processed,
            target: self.settings.target,
            skipped: self.state.skipped,
            frontier: self.state.frontier.into_vec(),
        }
    }
}
