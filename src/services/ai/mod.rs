pub mod fallback;
pub mod gemini;
pub mod interpreter;
pub mod offline;
pub mod ollama;
pub mod schema;

use async_trait::async_trait;

pub use interpreter::Interpreter;
pub use schema::ResponseSchema;

/// A structured-generation backend: returns raw text that should be a JSON object
/// matching `schema`.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
        model: &str,
    ) -> anyhow::Result<String>;
}
