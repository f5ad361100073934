// SPDX-License-Identifier: MIT

//! The daemon loop (§4.I): one ordered pass over inbox dispatch, liveness,
//! completed-car switching, dependency unblock, epic sweep, stale-branch
//! reconciliation, and rebalance.

use std::path::{Path, PathBuf};

use railyard_adapters::{EngineCollaborator, NotifyAdapter, OracleAdapter, OrchestratorAdapter, VcsAdapter};
use railyard_core::CarStatus;
use railyard_storage::Store;
use railyard_yardmaster::{
    dispatch_inbox, liveness_sweep, run_escalation, switch, try_close_epic, DispatchOutcome,
    EscalationRequest, FailureCategory, Rebalancer, SwitchOptions, TrackConfig,
};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::DaemonError;

/// The full set of collaborators a daemon-loop tick needs. Bundled into one
/// struct so `tick`'s signature stays readable.
#[derive(Clone)]
pub struct Adapters<V, N, O, R, C> {
    pub vcs: V,
    pub notify: N,
    pub orchestrator: O,
    pub oracle: R,
    pub collaborator: C,
}

/// Materializes (or reuses) the dedicated working directory the switch
/// engine operates against, falling back to `repo_dir` on failure.
pub async fn resolve_switch_dir<C: EngineCollaborator>(collaborator: &C, repo_dir: &Path) -> PathBuf {
    match collaborator.ensure_yardmaster_worktree(repo_dir).await {
        Ok(dir) => dir,
        Err(e) => {
            warn!(error = %e, "falling back to repo_dir for switch operations");
            repo_dir.to_path_buf()
        }
    }
}

/// Runs one full iteration of the daemon loop's phases. Returns
/// `DispatchOutcome::Draining` when the caller should stop the loop after
/// this tick; the remaining phases are skipped in that case, matching
/// "if it returns draining, stop".
pub async fn tick<V, N, O, R, C>(
    store: &Store,
    config: &Config,
    ym_dir: &Path,
    adapters: &Adapters<V, N, O, R, C>,
    rebalancer: &mut Rebalancer,
    daemon_start_ms: u64,
    now_ms: u64,
) -> Result<DispatchOutcome, DaemonError>
where
    V: VcsAdapter,
    N: NotifyAdapter,
    O: OrchestratorAdapter,
    R: OracleAdapter,
    C: EngineCollaborator,
{
    // 1. Inbox dispatch
    let outcome = dispatch_inbox(
        store,
        &adapters.orchestrator,
        &adapters.oracle,
        &adapters.notify,
        daemon_start_ms,
    )
    .await?;
    if outcome == DispatchOutcome::Draining {
        info!("inbox dispatch signaled draining, stopping before remaining phases");
        return Ok(outcome);
    }

    // 2. Liveness sweep
    if let Err(e) = liveness_sweep(store, &adapters.collaborator, &adapters.orchestrator, &adapters.notify).await {
        warn!(error = %e, "liveness sweep failed");
    }

    // 3. Completed-car switching
    switch_completed_cars(store, config, ym_dir, adapters).await;

    // 4. Safety-net dependency unblock over {done, merged}
    safety_net_unblock(store, CarStatus::Done);
    safety_net_unblock(store, CarStatus::Merged);

    // 5. Open-epic sweep
    for epic in store.cars_by_status(CarStatus::Open) {
        if !epic.is_epic() {
            continue;
        }
        if let Err(e) = try_close_epic(store, &epic.id) {
            warn!(epic_id = %epic.id, error = %e, "open-epic sweep failed to close epic");
        }
    }

    // 6. Stale-branch reconciliation
    reconcile_stale_branches(store, config, &adapters.vcs).await;

    // 7. Rebalance
    let tracks: Vec<TrackConfig> = config
        .tracks
        .iter()
        .map(|(name, settings)| TrackConfig {
            name: name.clone(),
            max_slots: settings.max_slots,
        })
        .collect();
    if let Err(e) = rebalancer.tick(store, &adapters.orchestrator, &tracks, now_ms).await {
        warn!(error = %e, "rebalance tick failed");
    }

    Ok(outcome)
}

async fn switch_completed_cars<V, N, O, R, C>(
    store: &Store,
    config: &Config,
    ym_dir: &Path,
    adapters: &Adapters<V, N, O, R, C>,
) where
    V: VcsAdapter,
    N: NotifyAdapter,
    O: OrchestratorAdapter,
    R: OracleAdapter,
    C: EngineCollaborator,
{
    for car in store.cars_by_status(CarStatus::Done) {
        if ym_dir != config.repo_dir.as_path() {
            if let Err(e) = adapters.collaborator.sync_worktree_to_branch(ym_dir, &car.base_branch).await {
                warn!(car_id = %car.id, error = %e, "failed to reset switch worktree to base branch");
            }
        }

        let track = config.track_settings(&car.track);
        let opts = SwitchOptions {
            repo_dir: ym_dir.to_path_buf(),
            base_branch: car.base_branch.clone(),
            pre_test_command: track.pre_test_command.clone(),
            test_command: track.test_command.clone(),
            require_pr: config.require_pr,
            dry_run: false,
        };

        let result = switch(store, &adapters.vcs, &adapters.notify, &car.id, &opts).await;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(car_id = %car.id, error = %e, "switch failed");
                continue;
            }
        };

        let category = outcome.failure_category.unwrap_or(FailureCategory::None);
        if category != FailureCategory::None {
            if let Err(e) = store.add_progress(&car.id, "yardmaster", &format!("switch:{}:", category.as_str()), vec![]) {
                warn!(car_id = %car.id, error = %e, "failed to write switch progress note");
            }

            if let Err(e) = switch_escalation_policy(
                store,
                &adapters.oracle,
                &adapters.notify,
                &car.id,
                category,
                config.max_switch_failures,
            )
            .await
            {
                warn!(car_id = %car.id, error = %e, "switch-escalation policy failed");
            }
        }

        if outcome.merged && !outcome.already_merged {
            adapters.collaborator.cleanup_overlay(&car.assignee).await;

            match adapters.vcs.head_commit(ym_dir).await {
                Ok(head_commit) => {
                    if let Err(e) = store.enqueue_reindex(&car.track, &head_commit) {
                        warn!(car_id = %car.id, error = %e, "failed to enqueue reindex job");
                    }
                }
                Err(e) => warn!(car_id = %car.id, error = %e, "failed to read head commit for reindex job"),
            }
        }
    }
}

/// §4.I phase 3's escalation policy: `infra-failed` escalates immediately;
/// every other category escalates once the car has accumulated
/// `max_switch_failures` matching `switch:%` progress notes.
async fn switch_escalation_policy<R: OracleAdapter, N: NotifyAdapter>(
    store: &Store,
    oracle: &R,
    notify: &N,
    car_id: &str,
    category: FailureCategory,
    max_switch_failures: u32,
) -> Result<(), DaemonError> {
    if category == FailureCategory::InfraFailed {
        let request = EscalationRequest {
            car_id: Some(car_id.to_string()),
            engine_id: None,
            reason: "infrastructure-test-failure".to_string(),
            details: String::new(),
        };
        run_escalation(store, oracle, notify, &request).await?;
        return Ok(());
    }

    if store.switch_failure_count(car_id) < max_switch_failures as usize {
        return Ok(());
    }

    let reason = match category {
        FailureCategory::TestFailed | FailureCategory::PreTestFailed => "repeated-test-failure",
        FailureCategory::MergeConflict => "repeated-merge-conflict",
        FailureCategory::PushFailed => "repeated-push-failure",
        FailureCategory::PrFailed => "repeated-pr-failure",
        FailureCategory::FetchFailed => "repeated-fetch-failure",
        FailureCategory::None | FailureCategory::InfraFailed => return Ok(()),
    };

    let request = EscalationRequest {
        car_id: Some(car_id.to_string()),
        engine_id: None,
        reason: reason.to_string(),
        details: String::new(),
    };
    run_escalation(store, oracle, notify, &request).await?;
    Ok(())
}

/// Unblocks dependents of every car at `status` and auto-closes any epic
/// among them whose children are now all resolved.
fn safety_net_unblock(store: &Store, status: CarStatus) {
    for car in store.cars_by_status(status) {
        let unblocked = match store.unblock_dependents(&car.id) {
            Ok(u) => u,
            Err(e) => {
                warn!(car_id = %car.id, error = %e, "safety-net unblock failed");
                continue;
            }
        };
        for dependent in unblocked {
            if dependent.is_epic() {
                if let Err(e) = try_close_epic(store, &dependent.id) {
                    warn!(epic_id = %dependent.id, error = %e, "failed to auto-close unblocked epic");
                }
            }
        }
    }
}

async fn reconcile_stale_branches<V: VcsAdapter>(store: &Store, config: &Config, vcs: &V) {
    if let Err(e) = vcs.fetch(&config.repo_dir).await {
        warn!(error = %e, "stale-branch reconciliation fetch failed");
        return;
    }

    let active: Vec<_> = store
        .with_state(|state| state.cars.values().cloned().collect::<Vec<_>>())
        .into_iter()
        .filter(|c| !c.status.is_terminal() && !c.branch.is_empty())
        .collect();

    let mut bases: Vec<String> = active.iter().map(|c| c.base_branch.clone()).collect();
    bases.sort();
    bases.dedup();

    for base in bases {
        let target = format!("origin/{base}");
        let merged = match vcs.merged_branches(&config.repo_dir, &target).await {
            Ok(set) => set,
            Err(e) => {
                warn!(base_branch = %base, error = %e, "failed to list merged branches");
                continue;
            }
        };

        for car in active.iter().filter(|c| c.base_branch == base) {
            if merged.contains(&car.branch) {
                if let Err(e) = store.set_car_status(&car.id, CarStatus::Merged) {
                    warn!(car_id = %car.id, error = %e, "failed to mark stale branch merged");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "daemon_loop_tests.rs"]
mod tests;
