//! Session refresh after an authorization failure
//!
//! A protected request that comes back 401 triggers one refresh of the
//! session cookie and one retry. When several requests fail at once they
//! share the refresh: each request remembers the refresh generation it was
//! sent under, and only refreshes if nobody else has finished one since.
//! A finished refresh that failed is remembered too, so the waiters give up
//! instead of asking again.

use super::{ClientError, RequestDescriptor, RequestGate};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// No refresh has failed yet
const NO_FAILURE: u64 = 0;

/// Whether a failed request should go through refresh-and-retry
pub fn should_refresh(error: &ClientError, request: &RequestDescriptor, gate: &RequestGate) -> bool {
    matches!(error, ClientError::Status { .. })
        && error.is_unauthorized()
        && !request.retried
        && !gate.is_public(request)
}

/// Serializes session refreshes between concurrent requests
#[derive(Debug)]
pub struct RefreshCoordinator {
    coalesce: bool,
    generation: AtomicU64,
    /// Generation produced by the most recent failed refresh
    failed_generation: AtomicU64,
    in_flight: Mutex<()>,
}

impl RefreshCoordinator {
    /// With `coalesce` off every caller performs its own refresh
    pub fn new(coalesce: bool) -> Self {
        Self {
            coalesce,
            generation: AtomicU64::new(0),
            failed_generation: AtomicU64::new(NO_FAILURE),
            in_flight: Mutex::new(()),
        }
    }

    /// Number of refreshes finished so far, successful or not
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Refresh the session unless another caller already did so after
    /// `observed` was read
    ///
    /// # Errors
    ///
    /// Returns the error produced by `refresh`, or
    /// [`ClientError::SessionExpired`] when the refresh another caller
    /// finished meanwhile failed
    pub async fn refresh<F, Fut>(&self, observed: u64, refresh: F) -> Result<(), ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ClientError>>,
    {
        if !self.coalesce {
            return self.finish(refresh().await);
        }

        let _guard = self.in_flight.lock().await;
        let current = self.generation();
        if current != observed {
            if self.failed_generation.load(Ordering::Acquire) == current {
                debug!("Concurrent session refresh failed, not retrying it");
                return Err(ClientError::SessionExpired);
            }
            debug!("Session already refreshed by a concurrent request");
            return Ok(());
        }

        self.finish(refresh().await)
    }

    fn finish(&self, result: Result<(), ClientError>) -> Result<(), ClientError> {
        let finished = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if result.is_err() {
            self.failed_generation.store(finished, Ordering::Release);
        }
        result
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_stale_generation_skips_refresh() {
        let coordinator = RefreshCoordinator::new(true);
        let calls = AtomicUsize::new(0);

        let observed = coordinator.generation();
        coordinator
            .refresh(observed, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();

        // A second caller that was sent before the first refresh completed
        coordinator
            .refresh(observed, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.generation(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_is_not_repeated_for_same_generation() {
        let coordinator = RefreshCoordinator::new(true);
        let calls = AtomicUsize::new(0);

        let result = coordinator
            .refresh(0, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::Configuration("boom".into()))
            })
            .await;
        assert!(matches!(result, Err(ClientError::Configuration(_))));
        assert_eq!(coordinator.generation(), 1);

        // A caller sent before the failure learns about it without a new call
        let result = coordinator
            .refresh(0, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(ClientError::SessionExpired)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_after_failure_is_attempted_again() {
        let coordinator = RefreshCoordinator::new(true);
        let _ = coordinator
            .refresh(0, || async { Err(ClientError::Configuration("boom".into())) })
            .await;

        // Sent after the failure, e.g. following a new login
        let observed = coordinator.generation();
        coordinator
            .refresh(observed, || async { Ok(()) })
            .await
            .unwrap();
        assert_eq!(coordinator.generation(), 2);
    }

    #[tokio::test]
    async fn test_without_coalescing_every_caller_refreshes() {
        let coordinator = RefreshCoordinator::new(false);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            coordinator
                .refresh(0, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
