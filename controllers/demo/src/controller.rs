//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the reconciler
//! into the `kube-runtime` controller loop. The runtime owns watching,
//! queueing and deduplication; this module supplies the reconcile function
//! and the error policy.

use crate::backoff::BackoffTracker;
use crate::client::KubeDemoApi;
use crate::config::ControllerConfig;
use crate::context::ReconcileContext;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crds::{Demo, Scheme};
use futures::StreamExt;
use kube::{Api, Client};
use kube_runtime::controller::{Action, Controller as RuntimeController, Error as RuntimeError};
use kube_runtime::reflector::{Lookup, ObjectRef};
use kube_runtime::watcher;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shared state handed to every reconciliation.
pub struct State {
    reconciler: Reconciler,
    backoff: BackoffTracker,
    reconcile_timeout: Duration,
    shutdown: CancellationToken,
}

impl State {
    pub fn new(reconciler: Reconciler, reconcile_timeout: Duration, shutdown: CancellationToken) -> Self {
        Self {
            reconciler,
            backoff: BackoffTracker::new(),
            reconcile_timeout,
            shutdown,
        }
    }

    fn context(&self) -> ReconcileContext {
        ReconcileContext::new(self.reconcile_timeout, self.shutdown.child_token())
    }
}

/// Item yielded by the runtime controller stream
type RunResult = Result<(ObjectRef<Demo>, Action), RuntimeError<ControllerError, watcher::Error>>;

fn object_key<K: Lookup + ?Sized>(key: &ObjectRef<K>) -> String {
    format!("{}/{}", key.namespace.as_deref().unwrap_or_default(), key.name)
}

/// Reconcile entry point called by the runtime.
pub async fn reconcile(demo: Arc<Demo>, state: Arc<State>) -> Result<Action, ControllerError> {
    let key = ObjectRef::from_obj(demo.as_ref());
    let ctx = state.context();

    let action = state.reconciler.reconcile(&key, &ctx).await?;
    state.backoff.reset(&object_key(&key));
    Ok(action)
}

/// Requeue policy for failed reconciliations.
pub fn error_policy(demo: Arc<Demo>, error: &ControllerError, state: Arc<State>) -> Action {
    let key = object_key(&ObjectRef::from_obj(demo.as_ref()));
    let delay = state.backoff.next(&key);
    warn!(
        "Reconciliation of Demo {} failed: {} (retrying in {}s)",
        key,
        error,
        delay.as_secs()
    );
    Action::requeue(delay)
}

/// Logs one outcome of the controller loop.
///
/// The runtime never calls `reconcile` for an object that left its store, so
/// the backoff state of such an object is dropped here.
fn observe_result(state: &State, result: RunResult) {
    match result {
        Ok((obj, action)) => {
            debug!("Reconciled Demo {}: {:?}", object_key(&obj), action);
        }
        Err(RuntimeError::ObjectNotFound(obj)) => {
            let key = object_key(&obj);
            debug!("Demo {} no longer exists, dropping backoff state", key);
            state.backoff.reset(&key);
        }
        Err(e) => {
            warn!("Demo controller error: {}", e);
        }
    }
}

/// Main controller for Demo resources.
pub struct Controller {
    demo_api: Api<Demo>,
    state: Arc<State>,
    shutdown: CancellationToken,
}

impl Controller {
    /// Creates a new controller instance.
    ///
    /// `Demo` must already be registered in `scheme`.
    pub async fn new(config: &ControllerConfig, scheme: &Scheme) -> Result<Self, ControllerError> {
        info!("Initializing Demo Controller");

        if !scheme.is_registered::<Demo>() {
            return Err(ControllerError::InvalidConfig(
                "Demo kind is not registered in the scheme".to_string(),
            ));
        }

        let kube_client = Client::try_default().await?;

        let demo_api: Api<Demo> = match config.namespace.as_deref() {
            Some(ns) => Api::namespaced(kube_client.clone(), ns),
            None => Api::all(kube_client.clone()),
        };

        let reconciler = Reconciler::new(Box::new(KubeDemoApi::new(kube_client)));
        let shutdown = CancellationToken::new();
        let state = Arc::new(State::new(reconciler, config.reconcile_timeout, shutdown.clone()));

        Ok(Self {
            demo_api,
            state,
            shutdown,
        })
    }

    /// Runs the controller until a shutdown signal is received.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("Demo Controller running");

        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            info!("Shutdown signal received, cancelling in-flight reconciliations");
            shutdown.cancel();
        });

        let state = self.state.clone();
        RuntimeController::new(self.demo_api, watcher::Config::default())
            .shutdown_on_signal()
            .run(reconcile, error_policy, self.state)
            .for_each(move |result| {
                observe_result(&state, result);
                futures::future::ready(())
            })
            .await;

        info!("Demo Controller stopped");
        Ok(())
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
