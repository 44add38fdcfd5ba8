//! Notification channel port trait.

/// Fire-and-forget text messages to a configured recipient.
///
/// Implementations must not panic; an unconfigured sink returns `false`.
pub trait NotifyPort {
    fn notify(&self, message: &str) -> bool;

    fn is_configured(&self) -> bool;
}
