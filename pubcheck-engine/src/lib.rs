//! The generic check-execution engine.
//!
//! A check inspects a sequence of items and exposes the
//! validate → show → diff → fix lifecycle; [`run_check`] drives it:
//!
//! - every item goes through [`Check::validate`]; a `false` return or an
//!   `Err` marks the item failed (the error is logged, the run continues);
//! - a failed item gets [`Check::show`] unconditionally, then
//!   [`Check::diff`] and/or [`Check::fix`] depending on [`RunOptions`];
//! - an `Err` from `fix` is unrecoverable (a manifest or filesystem write
//!   went wrong) and propagates; earlier fixes in the same run are not
//!   rolled back.
//!
//! Items are visited in the order the check produces them; the engine never
//! sorts, retries, or revisits. An empty item sequence passes vacuously.

use std::fmt::Display;

use anyhow::Context;
use tracing::{debug, info, warn};

/// What to do with items that fail validation, beyond showing the diagnosis.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Log a proposed remediation diff for each failing item.
    pub diff: bool,
    /// Apply the remediation, mutating the package and/or filesystem.
    pub fix: bool,
}

/// Terminal report for one check run.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub check: &'static str,
    /// Number of items inspected.
    pub checked: usize,
    /// Items that failed validation, in iteration order.
    pub failures: Vec<String>,
    /// Number of failing items a fix was applied to.
    pub fixed: usize,
}

impl CheckReport {
    fn new(check: &'static str) -> Self {
        Self {
            check,
            checked: 0,
            failures: Vec::new(),
            fixed: 0,
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One check over one package: an item source plus the lifecycle methods.
///
/// Checks that need bookkeeping across lifecycle calls (candidate maps,
/// resolution caches) keep it in instance fields, constructed fresh per run
/// and never shared across checks or packages.
pub trait Check {
    type Item: Display;

    fn name(&self) -> &'static str;

    /// Produce the items to inspect, in their natural order (filesystem
    /// traversal order for file checks, manifest insertion order for
    /// dependency checks).
    fn items(&mut self) -> anyhow::Result<Vec<Self::Item>>;

    /// Decide whether the item is acceptable. `Ok(false)` and `Err` both
    /// mean failure; `Err` additionally gets logged.
    fn validate(&mut self, item: &Self::Item) -> anyhow::Result<bool>;

    /// Diagnose a failing item (logging only).
    fn show(&mut self, item: &Self::Item);

    /// Describe the proposed remediation (logging only, no mutation).
    fn diff(&mut self, item: &Self::Item);

    /// Apply the remediation. Mutates the package state and/or filesystem
    /// and persists what it changed.
    fn fix(&mut self, item: &Self::Item) -> anyhow::Result<()>;
}

/// Drive one check to completion and report the aggregate outcome.
pub fn run_check<C: Check>(check: &mut C, opts: RunOptions) -> anyhow::Result<CheckReport> {
    let name = check.name();
    let items = check
        .items()
        .with_context(|| format!("enumerate items for check '{name}'"))?;
    debug!(check = name, "inspecting {} item(s)", items.len());

    let mut report = CheckReport::new(name);
    for item in &items {
        report.checked += 1;

        let valid = match check.validate(item) {
            Ok(valid) => valid,
            Err(err) => {
                warn!(check = name, "validation of '{item}' errored: {err:#}");
                false
            }
        };
        if valid {
            continue;
        }

        report.failures.push(item.to_string());
        check.show(item);
        if opts.diff {
            check.diff(item);
        }
        if opts.fix {
            check
                .fix(item)
                .with_context(|| format!("fix '{item}' (check '{name}')"))?;
            report.fixed += 1;
        }
    }

    if report.passed() {
        info!(check = name, "passed ({} item(s))", report.checked);
    } else {
        info!(
            check = name,
            "failed: {}/{} item(s)",
            report.failures.len(),
            report.checked
        );
    }
    Ok(report)
}
