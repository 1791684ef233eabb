use async_trait::async_trait;

use super::{GenerationService, ResponseSchema};

/// Stand-in used when no generation backend is configured. Every call fails, so the
/// interpreter always answers from its local heuristics.
pub struct OfflineProvider;

#[async_trait]
impl GenerationService for OfflineProvider {
    async fn generate(
        &self,
        _prompt: &str,
        _schema: &ResponseSchema,
        _model: &str,
    ) -> anyhow::Result<String> {
        anyhow::bail!("no generation provider configured")
    }
}
