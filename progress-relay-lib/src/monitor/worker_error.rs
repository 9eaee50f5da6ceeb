use core::any::Any;
use core::error::Error;
use core::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Boxed error accepted from worker functions.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Shared handle to the error raised by a worker.
///
/// The original error value is kept intact, so callers can recover its concrete
/// type with [`WorkerError::downcast_ref`]. Cloning only bumps a reference count.
#[derive(Clone)]
pub struct WorkerError(Arc<dyn Error + Send + Sync + 'static>);

impl WorkerError {
    /// Wrap an error value.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// Wrap anything convertible into a boxed error, such as `String`, `&str`, or any error type.
    pub fn from_boxed(error: impl Into<BoxError>) -> Self {
        Self(Arc::from(error.into()))
    }

    /// Record an error that is still owned elsewhere by capturing its type name and message.
    pub fn captured<E>(error: &E) -> Self
    where
        E: Error + ?Sized,
    {
        Self::new(CapturedError {
            type_name: core::any::type_name::<E>(),
            message: error.to_string(),
        })
    }

    /// Build an error from a panic payload caught on the worker thread.
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "worker panicked with a non-string payload".to_string());

        Self::new(WorkerPanic { message })
    }

    /// Returns a reference to the original error if it is of type `E`.
    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    /// Returns `true` if the original error is of type `E`.
    #[must_use]
    pub fn is<E: Error + 'static>(&self) -> bool {
        self.0.is::<E>()
    }

    /// Returns `true` if both handles refer to the same error value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Access the shared original error.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn Error + Send + Sync + 'static> {
        &self.0
    }
}

impl Display for WorkerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for WorkerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Error for WorkerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

/// A panic that unwound out of a worker function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("worker panicked: {message}")]
pub struct WorkerPanic {
    pub message: String,
}

/// Copy of an error that was relayed while its owner kept the original value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CapturedError {
    pub type_name: &'static str,
    pub message: String,
}
