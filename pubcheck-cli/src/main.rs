use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pubcheck_checks::{
    DepsSolverCheck, DescriptionCheck, DuplicateDepsCheck, DuplicateFilesCheck, ElfInspector,
    ExecutableCheck, VersionCheck,
};
use pubcheck_engine::{CheckReport, RunOptions, run_check};
use pubcheck_manifest::Package;
use pubcheck_search::HttpSearchClient;

#[derive(Debug, Parser)]
#[command(
    name = "pubcheck",
    version,
    about = "Pre-publication validator and repair tool for package trees."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the check suite against a package directory.
    Check(CheckArgs),
    /// List the available checks.
    ListChecks,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Package root (default: current directory).
    #[arg(long, default_value = ".")]
    package: Utf8PathBuf,

    /// Configuration file (default: pubcheck.toml in the package root).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Log a proposed remediation diff for each failing item.
    #[arg(long, default_value_t = false)]
    diff: bool,

    /// Apply remediations, mutating the manifest and filesystem.
    #[arg(long, default_value_t = false)]
    fix: bool,

    /// Also search every package file against every repository (one request
    /// per file per repository).
    #[arg(long, default_value_t = false)]
    with_duplicate_files: bool,

    /// Skip a check by name (repeatable; see list-checks).
    #[arg(long)]
    skip: Vec<String>,
}

/// Check names and one-line descriptions, in execution order.
const CHECKS: &[(&str, &str)] = &[
    (
        ExecutableCheck::NAME,
        "installed binaries must be executable",
    ),
    (
        DescriptionCheck::NAME,
        "the manifest description must be well-formed",
    ),
    (
        VersionCheck::NAME,
        "the manifest version must be a valid semantic version",
    ),
    (
        DuplicateDepsCheck::NAME,
        "a package must not be declared under several repositories",
    ),
    (
        DepsSolverCheck::NAME,
        "every needed shared library must be provided by a dependency",
    ),
    (
        DuplicateFilesCheck::NAME,
        "package files must not already be published elsewhere (opt-in)",
    ),
];

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => match cmd_check(args) {
            Ok(true) => ExitCode::SUCCESS,
            // Validation failures are findings, not tool errors.
            Ok(false) => ExitCode::from(2),
            Err(e) => {
                error!("{:?}", e);
                ExitCode::from(1)
            }
        },
        Command::ListChecks => {
            cmd_list_checks();
            ExitCode::SUCCESS
        }
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<bool> {
    let config = match &args.config {
        Some(path) => pubcheck_registry::load_config(path)
            .with_context(|| format!("load config {path}"))?,
        None => pubcheck_registry::load_or_default(&args.package)?,
    };
    let registry = config.into_registry();
    if registry.is_empty() {
        warn!("no repositories configured; remote lookups will find nothing");
    }

    let mut pkg = Package::load(&args.package)
        .with_context(|| format!("load package at {}", args.package))?;
    info!("checking package {}", pkg.spec());

    let search = HttpSearchClient::new()?;
    let inspector = ElfInspector;
    let opts = RunOptions {
        diff: args.diff,
        fix: args.fix,
    };
    let skipped = |name: &str| args.skip.iter().any(|s| s == name);

    let mut reports: Vec<CheckReport> = Vec::new();

    if !skipped(ExecutableCheck::NAME) {
        let mut check = ExecutableCheck::new(pkg.root().to_owned());
        reports.push(run_check(&mut check, opts)?);
    }
    if !skipped(DescriptionCheck::NAME) {
        let mut check = DescriptionCheck::new(&mut pkg);
        reports.push(run_check(&mut check, opts)?);
    }
    if !skipped(VersionCheck::NAME) {
        let mut check = VersionCheck::new(&mut pkg);
        reports.push(run_check(&mut check, opts)?);
    }
    if !skipped(DuplicateDepsCheck::NAME) {
        let mut check = DuplicateDepsCheck::new(&mut pkg, &registry);
        reports.push(run_check(&mut check, opts)?);
    }
    if !skipped(DepsSolverCheck::NAME) {
        info!("looking for missing shared-library dependencies");
        let mut check = DepsSolverCheck::new(&mut pkg, &registry, &search, &inspector);
        reports.push(run_check(&mut check, opts)?);
    }
    if args.with_duplicate_files && !skipped(DuplicateFilesCheck::NAME) {
        info!("checking whether package files are already published elsewhere");
        let mut check = DuplicateFilesCheck::new(&pkg, &registry, &search);
        reports.push(run_check(&mut check, opts)?);
    }

    println!();
    println!("{:<24} {:>6} {:>6}  STATUS", "CHECK", "ITEMS", "FAILED");
    for report in &reports {
        println!(
            "{:<24} {:>6} {:>6}  {}",
            report.check,
            report.checked,
            report.failures.len(),
            if report.passed() { "pass" } else { "FAIL" }
        );
    }

    Ok(reports.iter().all(CheckReport::passed))
}

fn cmd_list_checks() {
    println!("Available checks:\n");
    for (name, description) in CHECKS {
        println!("  {:<24} {}", name, description);
    }
    println!();
    println!("Use 'pubcheck check --skip <name>' to skip a check.");
}
