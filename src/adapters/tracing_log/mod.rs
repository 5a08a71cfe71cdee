// Tracing log adapter - Structured logging using tracing crate

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::ports::*;

/// Tracing log adapter; the subscriber is installed by the binary
#[derive(Debug, Default, Clone)]
pub struct TracingLogAdapter {
    component: &'static str,
}

impl TracingLogAdapter {
    /// Create new tracing log adapter tagging events with `component`
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn info(&self, message: &str) {
        info!(component = self.component, "{}", message);
    }

    async fn warn(&self, message: &str) {
        warn!(component = self.component, "{}", message);
    }

    async fn error(&self, message: &str) {
        error!(component = self.component, "{}", message);
    }

    async fn debug(&self, message: &str) {
        debug!(component = self.component, "{}", message);
    }
}
