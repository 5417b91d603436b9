macro_rules! debug_path {
    ($description: expr, $path: expr) => {
        tracing::debug!(
            "{} exists at {:?}: {}",
            $description,
            $path,
            $path.exists()
        );
    };
}
pub(crate) use debug_path;

macro_rules! warn_fallback {
    ($description: expr, $path: expr, $reason: expr) => {
        tracing::warn!(
            "{} at {:?} could not be loaded, falling back to defaults: {}",
            $description,
            $path,
            $reason
        );
    };
}
pub(crate) use warn_fallback;
