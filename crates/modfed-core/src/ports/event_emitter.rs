//! Loader event emitter port.
//!
//! This port abstracts loader event emission, letting the loader report
//! attempts, exhaustion, and fallback activation without coupling to
//! transport details (channels, SSE, UI toasts).

use crate::events::LoaderEvent;

/// Port for emitting loader events.
///
/// This trait abstracts away the transport mechanism for loader events.
/// Implementations handle the actual event delivery.
///
/// # Implementations
///
/// - [`NoopLoaderEmitter`] - For tests and contexts that only need logs
/// - Adapter-specific implementations (channels, SSE, etc.)
pub trait LoaderEventEmitterPort: Send + Sync {
    /// Emit a loader event.
    ///
    /// Implementations should handle the event asynchronously or buffer it.
    /// This method should not block.
    fn emit(&self, event: LoaderEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// This enables cloning of `Arc<dyn LoaderEventEmitterPort>` without
    /// requiring the underlying type to implement Clone.
    fn clone_box(&self) -> Box<dyn LoaderEventEmitterPort>;
}

/// A no-op loader event emitter for tests and CLI contexts.
///
/// This implementation discards all events, making it suitable for:
/// - Unit tests that don't need to verify event emission
/// - Contexts where the tracing logs are signal enough
#[derive(Debug, Clone, Default)]
pub struct NoopLoaderEmitter;

impl NoopLoaderEmitter {
    /// Create a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LoaderEventEmitterPort for NoopLoaderEmitter {
    fn emit(&self, _event: LoaderEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn LoaderEventEmitterPort> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::DependencyName;
    use std::sync::Arc;

    #[test]
    fn test_noop_emitter() {
        let emitter = NoopLoaderEmitter::new();

        // Should not panic
        emitter.emit(LoaderEvent::fallback_activated(DependencyName::Store));
    }

    #[test]
    fn test_noop_emitter_clone_box() {
        let emitter = NoopLoaderEmitter::new();
        let _boxed: Box<dyn LoaderEventEmitterPort> = emitter.clone_box();
    }

    #[test]
    fn test_arc_emitter() {
        let emitter: Arc<dyn LoaderEventEmitterPort> = Arc::new(NoopLoaderEmitter::new());
        emitter.emit(LoaderEvent::fallback_activated(DependencyName::Utils));
    }
}
