mod desktop;

pub use desktop::DesktopNotifier;

use crate::error::NotifyError;

/// Out-of-band alert delivery.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}
