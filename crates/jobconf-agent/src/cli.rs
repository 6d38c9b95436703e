use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Prepares and inspects the configuration injected into a job launch.
#[derive(Debug, Parser)]
#[command(name = "jobconf-agent", version)]
#[command(about = "Injects job properties into the job's cluster configuration", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Write the injected resource for one job launch.
    Prepare {
        /// Job properties as a JSON object.
        job: PathBuf,

        /// System properties as a JSON object.
        sys: PathBuf,

        /// Working directory of the job.
        working_dir: PathBuf,

        /// JSON placement policy; defaults apply when unset or unreadable.
        #[arg(long, env = "JOBCONF_PLACEMENT_POLICY")]
        policy: Option<PathBuf>,
    },

    /// Print the configuration the job process would see.
    Resolve {
        /// Job properties as a JSON object.
        job: PathBuf,

        /// Working directory of the job.
        working_dir: PathBuf,

        /// Directories holding the cluster's site resources, searched in order.
        site_dirs: Vec<PathBuf>,
    },
}
