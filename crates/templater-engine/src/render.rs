use async_trait::async_trait;

use crate::run::{ContextMode, RunningConfig};

/// Evaluates template syntax, turning template text into document text
///
/// Errors are opaque to the engine and handed back to the caller untouched.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(
        &self,
        template: &str,
        config: &RunningConfig,
        mode: ContextMode,
    ) -> anyhow::Result<String>;
}

/// Returns templates verbatim, leaving cursor markers in place
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRenderer;

#[async_trait]
impl Renderer for PassthroughRenderer {
    async fn render(
        &self,
        template: &str,
        _config: &RunningConfig,
        _mode: ContextMode,
    ) -> anyhow::Result<String> {
        Ok(template.to_string())
    }
}
