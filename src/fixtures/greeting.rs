//! Greeting backend.
//!
//! `GET /` answers with a fixed greeting plus the platform's instance index
//! and GUID, so samples of a shared route can be attributed to an app and to
//! an instance of it.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

pub const INSTANCE_INDEX_ENV: &str = "CF_INSTANCE_INDEX";
pub const INSTANCE_GUID_ENV: &str = "CF_INSTANCE_GUID";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    pub greeting: String,
    pub instance_index: String,
    pub instance_guid: String,
}

impl Greeting {
    pub fn new(
        greeting: impl Into<String>,
        instance_index: impl Into<String>,
        instance_guid: impl Into<String>,
    ) -> Self {
        Self {
            greeting: greeting.into(),
            instance_index: instance_index.into(),
            instance_guid: instance_guid.into(),
        }
    }

    /// Instance identity from the platform environment; blank when unset.
    pub fn from_env(greeting: impl Into<String>) -> Self {
        Self::new(
            greeting,
            std::env::var(INSTANCE_INDEX_ENV).unwrap_or_default(),
            std::env::var(INSTANCE_GUID_ENV).unwrap_or_default(),
        )
    }
}

pub fn router(greeting: Greeting) -> Router {
    Router::new()
        .route("/", get(greet))
        .with_state(Arc::new(greeting))
}

async fn greet(State(greeting): State<Arc<Greeting>>) -> Json<Greeting> {
    Json(greeting.as_ref().clone())
}
