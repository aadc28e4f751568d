//! Precondition probing for script-runner invocations.
//!
//! `npm run lint` against a package that declares no `lint` script is not a
//! lint failure; the scheduler asks [`script_exists`] first and records a
//! skip instead.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

/// Manifest read by the prober.
pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

/// Whether `script` is declared in `<dir>/package.json`.
///
/// Returns `false` when the manifest is missing, unparsable or lacks the key.
pub fn script_exists(dir: &Path, script: &str) -> bool {
    let path = dir.join(MANIFEST_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "manifest unreadable");
            return false;
        }
    };

    match serde_json::from_str::<Manifest>(&content) {
        Ok(manifest) => manifest.scripts.contains_key(script),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "manifest unparsable");
            false
        }
    }
}
