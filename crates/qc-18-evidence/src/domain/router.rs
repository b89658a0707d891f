//! # Evidence Router
//!
//! Maps an evidence kind to the handler that adjudicates it. Routes are
//! registered during wiring, then the router is sealed and becomes
//! read-only for the lifetime of the node.
//!
//! ```text
//! [OPEN] ──add_route*──→ [OPEN] ──seal──→ [SEALED]
//!                                             │
//!                      add_route / seal ──────┴──→ panic
//! ```

use crate::context::Context;
use crate::domain::evidence::Evidence;
use crate::error::EvidenceResult;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Adjudicates one evidence kind.
pub trait EvidenceHandler: Send + Sync {
    fn handle(&self, ctx: &mut Context<'_>, evidence: &Evidence) -> EvidenceResult<()>;
}

impl<F> EvidenceHandler for F
where
    F: Fn(&mut Context<'_>, &Evidence) -> EvidenceResult<()> + Send + Sync,
{
    fn handle(&self, ctx: &mut Context<'_>, evidence: &Evidence) -> EvidenceResult<()> {
        self(ctx, evidence)
    }
}

/// Rejected route registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("router sealed; cannot register {kind} route handler")]
    Sealed { kind: String },

    #[error("route expressions can only contain alphanumeric characters, got {kind:?}")]
    InvalidKind { kind: String },

    #[error("route {kind} has already been registered")]
    DuplicateRoute { kind: String },
}

#[derive(Default)]
pub struct Router {
    routes: BTreeMap<String, Arc<dyn EvidenceHandler>>,
    sealed: bool,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, reporting misuse as an error.
    pub fn try_add_route(
        &mut self,
        kind: &str,
        handler: Arc<dyn EvidenceHandler>,
    ) -> Result<&mut Self, RouterError> {
        if self.sealed {
            return Err(RouterError::Sealed {
                kind: kind.to_string(),
            });
        }
        if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RouterError::InvalidKind {
                kind: kind.to_string(),
            });
        }
        if self.routes.contains_key(kind) {
            return Err(RouterError::DuplicateRoute {
                kind: kind.to_string(),
            });
        }
        self.routes.insert(kind.to_string(), handler);
        Ok(self)
    }

    /// Register `handler` for `kind`.
    ///
    /// # Panics
    ///
    /// If the router is sealed, `kind` is not alphanumeric, or `kind` is
    /// already registered.
    pub fn add_route(&mut self, kind: &str, handler: Arc<dyn EvidenceHandler>) -> &mut Self {
        if let Err(err) = self.try_add_route(kind, handler) {
            panic!("{err}");
        }
        self
    }

    pub fn has_route(&self, kind: &str) -> bool {
        self.routes.contains_key(kind)
    }

    /// Non-panicking lookup.
    pub fn route(&self, kind: &str) -> Option<&Arc<dyn EvidenceHandler>> {
        self.routes.get(kind)
    }

    /// # Panics
    ///
    /// If no handler is registered for `kind`. Probe with
    /// [`Router::has_route`] first.
    pub fn get_route(&self, kind: &str) -> Arc<dyn EvidenceHandler> {
        match self.routes.get(kind) {
            Some(handler) => Arc::clone(handler),
            None => panic!("route \"{kind}\" does not exist"),
        }
    }

    /// # Panics
    ///
    /// If the router is already sealed.
    pub fn seal(&mut self) {
        if self.sealed {
            panic!("router already sealed");
        }
        self.sealed = true;
    }

    pub fn sealed(&self) -> bool {
        self.sealed
    }

    /// Registered kinds in ascending order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .field("sealed", &self.sealed)
            .finish()
    }
}
