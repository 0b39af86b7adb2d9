/// Recommended error type for a scenario `main` function. Compatible with [crate::types::HookResult]
/// so `?` propagates either way.
pub type GustResult<T> = anyhow::Result<T>;

/// The result type of setup hooks and virtual-user behaviour functions.
pub type HookResult = anyhow::Result<()>;
