//! Log output for host applications.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered by `directives`
/// (e.g. `"med_lookup_core=debug"`).
///
/// Returns `Ok(false)` if a subscriber was already installed.
pub fn init(directives: &str) -> Result<bool, tracing_subscriber::filter::ParseError> {
    let filter = EnvFilter::try_new(directives)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(directives, "Logging initialized");
    }
    Ok(installed)
}
