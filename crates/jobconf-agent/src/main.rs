mod cli;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use jobconf_core::prelude::*;
use jobconf_lookup::MySqlMembershipLookup;
use jobconf_model::{LINK_PROPERTIES, PropertySet};
use jobconf_observe::{LoggerConfig, init_local_offset, init_logger};

use cli::{Cli, Command};

fn main() -> ExitCode {
    // 1) logger; the local offset must be read while single-threaded
    init_local_offset();
    let cfg = logger_config(|key| std::env::var(key).ok());
    if let Err(e) = init_logger(&cfg) {
        eprintln!("jobconf-agent: logger: {e}");
    }

    // 2) command
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "jobconf-agent failed");
            ExitCode::FAILURE
        }
    }
}

/// Logger settings from the environment, or the defaults when they are invalid.
fn logger_config<F>(lookup: F) -> LoggerConfig
where
    F: Fn(&str) -> Option<String>,
{
    LoggerConfig::from_lookup(lookup).unwrap_or_else(|e| {
        eprintln!("jobconf-agent: ignoring logger environment: {e}");
        LoggerConfig::default()
    })
}

fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Prepare {
            job,
            sys,
            working_dir,
            policy,
        } => prepare(&job, &sys, &working_dir, policy.as_deref()),
        Command::Resolve {
            job,
            working_dir,
            site_dirs,
        } => resolve(&job, &working_dir, &site_dirs),
    }
}

/// Never fails once the inputs are read: a job without an injected
/// resource still launches with the cluster defaults.
fn prepare(job: &Path, sys: &Path, working_dir: &Path, policy: Option<&Path>) -> anyhow::Result<()> {
    let job = read_props(job)?;
    let sys = read_props(sys)?;

    let injector = build_injector(policy);
    match injector.prepare(&job, &sys, working_dir) {
        Some(path) => println!("{}", path.display()),
        None => warn!("no configuration resource written, job keeps cluster defaults"),
    }
    Ok(())
}

fn build_injector(policy: Option<&Path>) -> ConfigurationInjector {
    let injector = ConfigurationInjector::new();

    let lookup = match MySqlMembershipLookup::new() {
        Ok(lookup) => lookup,
        Err(e) => {
            warn!(error = %e, "membership lookup unavailable, placement disabled");
            return injector;
        }
    };

    let advisor = PlacementAdvisor::new(Arc::new(lookup)).with_policy(load_policy(policy));
    injector.with_advisor(advisor)
}

/// Policy from `path`, or the default policy when unset or unusable.
fn load_policy(path: Option<&Path>) -> PlacementPolicy {
    let Some(path) = path else {
        return PlacementPolicy::default();
    };

    let loaded = fs::read_to_string(path)
        .with_context(|| format!("reading placement policy {}", path.display()))
        .and_then(|raw| {
            serde_json::from_str::<PlacementPolicy>(&raw)
                .with_context(|| format!("parsing placement policy {}", path.display()))
        });

    match loaded {
        Ok(policy) => {
            info!(?policy, "placement policy loaded");
            policy
        }
        Err(e) => {
            warn!(error = ?e, "ignoring placement policy, using defaults");
            PlacementPolicy::default()
        }
    }
}

fn resolve(job: &Path, working_dir: &Path, site_dirs: &[PathBuf]) -> anyhow::Result<()> {
    let job = read_props(job)?;
    let conf = resolve_configuration(&job, working_dir, site_dirs)?;

    let out = serde_json::json!({
        "resources": conf.loaded_resources().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        "values": conf
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
            .collect::<serde_json::Map<_, _>>(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// What the job process sees: registered resources from the per-job directory
/// first, then from each site directory. Link properties of the job fill in
/// keys no resource set.
fn resolve_configuration(
    job: &PropertySet,
    working_dir: &Path,
    site_dirs: &[PathBuf],
) -> anyhow::Result<RuntimeConfiguration> {
    let mut builder = ConfigurationBuilder::new(ResourceRegistry::for_job(job))
        .search_dir(resource_path(job, working_dir)?);
    for dir in site_dirs {
        builder = builder.search_dir(dir);
    }

    let mut conf = builder.build()?;
    for name in LINK_PROPERTIES {
        if !conf.contains_key(name) {
            conf.load_prop(job, name);
        }
    }
    Ok(conf)
}

fn read_props(path: &Path) -> anyhow::Result<PropertySet> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
