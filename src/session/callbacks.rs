use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Returns true while the recognizer is still alive.
pub type HealthCheckCallback = Arc<dyn Fn() -> bool + Send + Sync>;

/// Restarts the recognizer. May take arbitrary time.
pub type RestartCallback = Arc<dyn Fn() -> BoxFuture<anyhow::Result<()>> + Send + Sync>;

/// Platform hook for record-while-backgrounded audio sessions.
///
/// Enabled once when a continuous session starts, disabled once when it stops.
pub trait BackgroundAudio: Send + Sync {
    fn set_background_capture(&self, enabled: bool) -> anyhow::Result<()>;
}
