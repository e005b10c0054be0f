//! Caller allow-list for the mutating endpoints.
//!
//! The list is supplied by deployment configuration and checked against
//! the connecting peer address before a claim or audit handler runs.
//! Read endpoints stay open; they expose nothing a mesh member does not
//! already hold.

use crate::api::ApiError;
use crate::node::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::warn;

/// Set of caller addresses permitted to claim and audit.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    callers: HashSet<IpAddr>,
}

impl AllowList {
    pub fn new(callers: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            callers: callers.into_iter().collect(),
        }
    }

    pub fn permits(&self, addr: IpAddr) -> bool {
        self.callers.contains(&addr)
    }

    pub fn len(&self) -> usize {
        self.callers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callers.is_empty()
    }
}

/// Middleware rejecting callers that are not on the allow-list.
pub async fn require_authorized(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if !state.allowed.permits(peer.ip()) {
        warn!(%peer, "rejected unauthorized caller");
        return ApiError::forbidden(peer.ip()).into_response();
    }
    next.run(request).await
}
