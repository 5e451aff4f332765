//! Progress notification port
//!
//! Defines the interface for reporting progress while providers are queried.

use fiesta_domain::ProviderKey;

/// Callback for progress updates during a fan-out
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain text, ...).
pub trait ProgressNotifier: Send + Sync {
    /// Called once all providers have been dispatched
    fn on_dispatch(&self, providers: &[ProviderKey]);

    /// Called when one provider has resolved
    fn on_provider_complete(&self, provider: ProviderKey, success: bool);

    /// Called when the merged result is ready
    fn on_complete(&self);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_dispatch(&self, _providers: &[ProviderKey]) {}
    fn on_provider_complete(&self, _provider: ProviderKey, _success: bool) {}
    fn on_complete(&self) {}
}
