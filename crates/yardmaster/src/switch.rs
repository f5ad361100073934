// SPDX-License-Identifier: MIT

//! The switch engine (§4.E): fetches a car's branch, gates on tests, and
//! integrates it into a base branch.

use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

use railyard_adapters::{NotifyAdapter, NotifyContext, VcsAdapter};
use railyard_core::{Car, CarStatus};
use railyard_storage::Store;
use tracing::{info, instrument, warn};

use crate::defaults::{INFRA_FAILURE_PATTERNS, NO_TESTS_PATTERNS};
use crate::YardmasterError;

/// First-class failure category, exposed so outer phases can attribute
/// escalation reasons without re-parsing switch internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    None,
    FetchFailed,
    PreTestFailed,
    TestFailed,
    InfraFailed,
    MergeConflict,
    PushFailed,
    PrFailed,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::None => "none",
            FailureCategory::FetchFailed => "fetch-failed",
            FailureCategory::PreTestFailed => "pre-test-failed",
            FailureCategory::TestFailed => "test-failed",
            FailureCategory::InfraFailed => "infra-failed",
            FailureCategory::MergeConflict => "merge-conflict",
            FailureCategory::PushFailed => "push-failed",
            FailureCategory::PrFailed => "pr-failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SwitchOptions {
    pub repo_dir: PathBuf,
    pub base_branch: String,
    pub pre_test_command: Option<String>,
    pub test_command: String,
    pub require_pr: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SwitchOutcome {
    pub merged: bool,
    pub already_merged: bool,
    pub tests_passed: bool,
    pub failure_category: Option<FailureCategory>,
    pub pr_url: Option<String>,
}

/// True if the process exit code (126/127) or the output substring-matches
/// one of the infrastructure-failure patterns.
fn is_infra_failure(exit_code: Option<i32>, output: &str) -> bool {
    if matches!(exit_code, Some(126) | Some(127)) {
        return true;
    }
    let lower = output.to_lowercase();
    INFRA_FAILURE_PATTERNS
        .iter()
        .any(|pat| lower.contains(&pat.to_lowercase()))
}

fn is_no_tests_output(output: &str) -> bool {
    NO_TESTS_PATTERNS.iter().any(|pat| output.contains(pat))
}

fn truncate(output: &str, max_chars: usize) -> String {
    if output.chars().count() <= max_chars {
        output.to_string()
    } else {
        let truncated: String = output.chars().take(max_chars).collect();
        format!("{truncated}... (truncated)")
    }
}

/// Runs a shell command in `dir`, returning `(exit_code, combined_output)`.
fn run_shell(dir: &Path, command: &str) -> (Option<i32>, String) {
    let output = StdCommand::new("sh").arg("-c").arg(command).current_dir(dir).output();
    match output {
        Ok(out) => {
            let mut combined = String::from_utf8_lossy(&out.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&out.stderr));
            (out.status.code(), combined)
        }
        Err(e) => (None, e.to_string()),
    }
}

#[instrument(skip(store, vcs, notify), fields(car_id = %car_id))]
pub async fn switch<V, N>(
    store: &Store,
    vcs: &V,
    notify: &N,
    car_id: &str,
    opts: &SwitchOptions,
) -> Result<SwitchOutcome, YardmasterError>
where
    V: VcsAdapter,
    N: NotifyAdapter,
{
    // LOAD
    let car = store
        .get_car(car_id)
        .ok_or_else(|| YardmasterError::NotFound(format!("car {car_id}")))?;
    if car.branch.is_empty() {
        return Err(YardmasterError::Validation(format!(
            "car {car_id} has no branch to switch"
        )));
    }

    // FETCH
    info!(phase = "fetch", "fetching repo");
    if vcs.fetch(&opts.repo_dir).await.is_err() {
        return Ok(SwitchOutcome {
            failure_category: Some(FailureCategory::FetchFailed),
            ..Default::default()
        });
    }

    // DETACH
    if !car.assignee.is_empty() {
        vcs.detach_worktree(&opts.repo_dir, &car.assignee).await;
    }

    // TEST
    let tests_passed = run_tests(store, vcs, notify, &car, opts).await?;
    if let RunTestsResult::Failed(category) = tests_passed {
        return Ok(SwitchOutcome {
            tests_passed: false,
            failure_category: Some(category),
            ..Default::default()
        });
    }

    // ANCESTRY_CHECK
    if vcs
        .is_ancestor(&opts.repo_dir, &car.branch, &opts.base_branch)
        .await?
    {
        info!(phase = "ancestry_check", "branch already merged");
        store.set_car_status(car_id, CarStatus::Merged)?;
        post_merge(store, car_id)?;
        return Ok(SwitchOutcome {
            merged: true,
            already_merged: true,
            tests_passed: true,
            failure_category: Some(FailureCategory::None),
            pr_url: None,
        });
    }

    if opts.dry_run {
        return Ok(SwitchOutcome {
            tests_passed: true,
            failure_category: Some(FailureCategory::None),
            ..Default::default()
        });
    }

    if opts.require_pr {
        return pr_path(store, vcs, car_id, &car, opts).await;
    }

    merge_path(store, vcs, car_id, &car, opts).await
}

enum RunTestsResult {
    Passed,
    Failed(FailureCategory),
}

async fn run_tests<V, N>(
    store: &Store,
    vcs: &V,
    notify: &N,
    car: &Car,
    opts: &SwitchOptions,
) -> Result<RunTestsResult, YardmasterError>
where
    V: VcsAdapter,
    N: NotifyAdapter,
{
    if car.skip_tests {
        info!("tests skipped (skip_tests=true on car)");
        return Ok(RunTestsResult::Passed);
    }

    vcs.checkout(&opts.repo_dir, &car.branch).await?;

    if let Some(pre_test) = &opts.pre_test_command {
        let (code, _output) = run_shell(&opts.repo_dir, pre_test);
        if code != Some(0) {
            warn!(phase = "pre_test", "pre-test command failed");
            vcs.checkout(&opts.repo_dir, "main").await?;
            return Ok(RunTestsResult::Failed(FailureCategory::PreTestFailed));
        }
    }

    let (code, output) = run_shell(&opts.repo_dir, &opts.test_command);
    vcs.checkout(&opts.repo_dir, "main").await?;

    let passed = code == Some(0) || (code != Some(0) && is_no_tests_output(&output));
    if passed {
        return Ok(RunTestsResult::Passed);
    }

    let category = if is_infra_failure(code, &output) {
        FailureCategory::InfraFailed
    } else {
        FailureCategory::TestFailed
    };

    store.set_car_status(&car.id, CarStatus::Blocked)?;
    if !car.assignee.is_empty() {
        let body = truncate(&output, 2000);
        let opts_send = railyard_storage::SendOptions {
            car_id: car.id.clone(),
            priority: railyard_core::Priority::Urgent,
            ..Default::default()
        };
        let msg = store.send("yardmaster", &car.assignee, "test-failure", &body, opts_send)?;
        let _ = notify
            .notify(&NotifyContext {
                from: "yardmaster".to_string(),
                to: car.assignee.clone(),
                subject: msg.subject.clone(),
                body: msg.body.clone(),
                car_id: car.id.clone(),
                priority: "urgent".to_string(),
            })
            .await;
    }

    Ok(RunTestsResult::Failed(category))
}

async fn pr_path<V>(
    store: &Store,
    vcs: &V,
    car_id: &str,
    car: &Car,
    opts: &SwitchOptions,
) -> Result<SwitchOutcome, YardmasterError>
where
    V: VcsAdapter,
{
    if vcs.push_branch(&opts.repo_dir, &car.branch).await.is_err() {
        return Ok(SwitchOutcome {
            failure_category: Some(FailureCategory::PushFailed),
            ..Default::default()
        });
    }

    let diff_stat = vcs.diff_stat(&opts.repo_dir, &car.branch).await.unwrap_or_default();
    let progress = store.progress_for(car_id);
    let notes: String = progress.iter().map(|p| format!("- {}\n", p.note)).collect();
    let body = format!("{}\n\n## Progress\n{}\n## Diff\n```\n{}\n```", car.description, notes, diff_stat);

    match vcs
        .create_draft_pr(&opts.repo_dir, &car.title, &body, &car.branch)
        .await
    {
        Ok(pr_url) => {
            store.set_car_status(car_id, CarStatus::PrOpen)?;
            Ok(SwitchOutcome {
                tests_passed: true,
                failure_category: Some(FailureCategory::None),
                pr_url: Some(pr_url),
                ..Default::default()
            })
        }
        Err(_) => Ok(SwitchOutcome {
            failure_category: Some(FailureCategory::PrFailed),
            ..Default::default()
        }),
    }
}

async fn merge_path<V>(
    store: &Store,
    vcs: &V,
    car_id: &str,
    car: &Car,
    opts: &SwitchOptions,
) -> Result<SwitchOutcome, YardmasterError>
where
    V: VcsAdapter,
{
    vcs.checkout(&opts.repo_dir, &opts.base_branch).await?;

    let message = format!(
        "Switch: merge {} to main\n\nCo-Authored-By: Railyard Yardmaster <railyard-yardmaster@noreply>",
        car.branch
    );

    if vcs.merge_no_ff(&opts.repo_dir, &car.branch, &message).await.is_err() {
        return Ok(SwitchOutcome {
            failure_category: Some(FailureCategory::MergeConflict),
            ..Default::default()
        });
    }

    if vcs.push_current(&opts.repo_dir).await.is_err() {
        return Ok(SwitchOutcome {
            failure_category: Some(FailureCategory::PushFailed),
            ..Default::default()
        });
    }

    store.set_car_status(car_id, CarStatus::Merged)?;
    post_merge(store, car_id)?;

    Ok(SwitchOutcome {
        merged: true,
        tests_passed: true,
        failure_category: Some(FailureCategory::None),
        ..Default::default()
    })
}

/// POST_MERGE: run dependency unblock, try to auto-close unblocked epics and
/// the car's own parent, broadcast `deps-unblocked`.
fn post_merge(store: &Store, car_id: &str) -> Result<(), YardmasterError> {
    let unblocked = store.unblock_dependents(car_id)?;

    let mut unblocked_ids = Vec::new();
    for dependent in &unblocked {
        unblocked_ids.push(dependent.id.clone());
        if dependent.is_epic() {
            crate::epic::try_close_epic(store, &dependent.id)?;
        }
    }

    if let Some(car) = store.get_car(car_id) {
        if let Some(parent) = &car.parent {
            crate::epic::try_close_epic(store, parent)?;
        }
    }

    if !unblocked_ids.is_empty() {
        let opts = railyard_storage::SendOptions {
            car_id: car_id.to_string(),
            ..Default::default()
        };
        store.send(
            "yardmaster",
            railyard_core::BROADCAST,
            "deps-unblocked",
            &unblocked_ids.join(", "),
            opts,
        )?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "switch_tests.rs"]
mod tests;
