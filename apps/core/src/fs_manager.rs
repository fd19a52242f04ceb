use std::path::PathBuf;
use tracing::warn;

/// Resolves the artifact locations relative to the application root.
///
/// The data-preparation and training scripts write their outputs under `resources/`;
/// the chat engine only ever reads from there.
pub struct PortablePathManager;

impl PortablePathManager {
    /// Application root directory (where the executable lives).
    pub fn root_dir() -> PathBuf {
        #[cfg(debug_assertions)]
        {
            // In development the executable sits in target/debug at the workspace root
            if let Ok(mut path) = std::env::current_exe() {
                path.pop(); // exe name
                path.pop(); // debug
                path.pop(); // target

                let core_path = path.join("apps").join("core");
                if core_path.exists() {
                    return core_path;
                }
                return path;
            }
        }

        match std::env::current_exe() {
            Ok(mut path) => {
                path.pop();
                path
            }
            Err(e) => {
                warn!(
                    "Failed to get current exe path: {}. Falling back to current_dir.",
                    e
                );
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
        }
    }

    /// Artifact directory (./resources).
    pub fn resources_dir() -> PathBuf {
        Self::root_dir().join("resources")
    }

    /// Processed dataset export inside a resources directory.
    pub fn dataset_file(resources: &std::path::Path) -> PathBuf {
        resources.join("processed_apple_quality.json")
    }

    /// Training metrics summary inside a resources directory.
    pub fn metrics_file(resources: &std::path::Path) -> PathBuf {
        resources
            .join("artifacts_models")
            .join("model_metrics.json")
    }
}
