//! Where the injected resource lives, and which resources the job loads.
//!
//! Each job gets its own directory under the working directory so that
//! resources of sibling jobs never shadow each other on the search path.
mod registry;
pub use registry::{CORE_RESOURCES, ResourceRegistry, SITE_RESOURCES};

use std::{
    fs,
    path::{Path, PathBuf},
};

use jobconf_model::{JOB_ID, NESTED_FLOW_PATH, PropertySet, RESOURCE_DIR_PREFIX};

use crate::error::{CoreError, CoreResult};

/// Name of the per-job resource directory.
///
/// Uses the nested flow path, falling back to the job id; `:` separators
/// become `_`. Fails when neither is set.
pub fn resource_dir_name(job: &PropertySet) -> CoreResult<String> {
    let suffix = job
        .get_non_empty(NESTED_FLOW_PATH)
        .or_else(|| job.get_non_empty(JOB_ID))
        .ok_or(CoreError::MissingDirName)?;

    Ok(format!("{RESOURCE_DIR_PREFIX}{}", suffix.replace(':', "_")))
}

/// Per-job resource directory inside `working_dir`.
pub fn resource_path(job: &PropertySet, working_dir: &Path) -> CoreResult<PathBuf> {
    Ok(working_dir.join(resource_dir_name(job)?))
}

/// Path of `file_name` in the per-job directory, creating the directory if needed.
pub fn conf_file(job: &PropertySet, working_dir: &Path, file_name: &str) -> CoreResult<PathBuf> {
    let dir = resource_path(job, working_dir)?;
    fs::create_dir_all(&dir).map_err(|e| CoreError::io(&dir, e))?;
    Ok(dir.join(file_name))
}
