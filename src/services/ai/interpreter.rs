use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use super::schema::{assistant_schema, search_schema};
use super::{fallback, GenerationService, ResponseSchema};
use crate::errors::GenerationError;
use crate::models::{AssistantIntent, RemoteAssistantReply, RemoteSearchReply, SearchCriteria};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const SEARCH_INSTRUCTIONS: &str = r#"Analiza la siguiente petición de un usuario para encontrar un espacio de coworking y extrae los criterios de búsqueda.

Instrucciones:
- Si mencionan una ciudad específica (Madrid, Barcelona, Valencia, etc.), inclúyela en "city"
- Si mencionan servicios como "café", "wifi", "parking", "sala de reuniones", "24/7", "escritorio de pie", inclúyelos en "amenities"
- Los amenities válidos son: "wifi", "cafe", "sala-reuniones", "acceso-24-7", "parking", "escritorio-de-pie"
- Si no encuentras criterios específicos, devuelve un objeto vacío {}

Responde SOLO con un objeto JSON válido. Ejemplo:
{"city": "Madrid", "amenities": ["wifi", "cafe"]}"#;

const ASSISTANT_INSTRUCTIONS: &str = r#"Eres un asistente de coworking. Analiza lo que el usuario quiere hacer y responde con una acción específica.

Acciones posibles:
- "search": El usuario quiere buscar espacios (ej: "busca coworking en Madrid")
- "book": El usuario quiere hacer una reserva (ej: "reserva para el 26/07/2025 en BCN Hub Creativo")
- "help": El usuario pide ayuda o no está claro
- "unknown": No entiendes la petición

Si es una reserva (action: "book"):
- Extrae el nombre del espacio mencionado
- Extrae la fecha en formato YYYY-MM-DD
- Genera un mensaje confirmando los detalles

Si es una búsqueda (action: "search"):
- Extrae ciudad y servicios mencionados
- Genera un mensaje explicando qué buscas

Responde SOLO con JSON válido. Ejemplo:
{"action": "book", "spaceName": "BCN Hub Creativo", "date": "2025-07-26", "message": "Entendido, quieres reservar en BCN Hub Creativo para el 26 de julio de 2025. ¿Confirmas la reserva?"}"#;

/// Turns free text into search filters or an assistant intent.
///
/// Each call is one remote generation request raced against `timeout`. Any failure on
/// that path is logged and answered from the local heuristics instead, so neither
/// public method has an error case. When the timeout wins, the pending request future
/// is dropped, which aborts the underlying HTTP call.
#[derive(Clone)]
pub struct Interpreter {
    generator: Arc<dyn GenerationService>,
    model: String,
    timeout: Duration,
}

impl Interpreter {
    pub fn new(generator: Arc<dyn GenerationService>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn interpret_search(&self, prompt: &str) -> SearchCriteria {
        match self.remote_search(prompt).await {
            Ok(criteria) => {
                tracing::debug!(?criteria, "interpreted search remotely");
                criteria
            }
            Err(e) => {
                tracing::warn!(error = %e, "search interpretation failed, using fallback");
                let criteria = fallback::search_criteria(prompt);
                tracing::debug!(?criteria, "fallback search criteria");
                criteria
            }
        }
    }

    pub async fn interpret_intent(&self, prompt: &str) -> AssistantIntent {
        match self.remote_intent(prompt).await {
            Ok(intent) => {
                tracing::debug!(action = intent.action(), "interpreted intent remotely");
                intent
            }
            Err(e) => {
                tracing::warn!(error = %e, "intent interpretation failed, using fallback");
                let intent = fallback::intent(prompt);
                tracing::debug!(?intent, "fallback intent");
                intent
            }
        }
    }

    async fn remote_search(&self, prompt: &str) -> Result<SearchCriteria, GenerationError> {
        let contents = format!("{SEARCH_INSTRUCTIONS}\n\nPetición: \"{prompt}\"");
        let text = self.generate(&contents, &search_schema()).await?;
        let reply: RemoteSearchReply = parse_reply(&text)?;
        Ok(reply.into_criteria())
    }

    async fn remote_intent(&self, prompt: &str) -> Result<AssistantIntent, GenerationError> {
        let contents = format!("{ASSISTANT_INSTRUCTIONS}\n\nPetición del usuario: \"{prompt}\"");
        let text = self.generate(&contents, &assistant_schema()).await?;
        let reply: RemoteAssistantReply = parse_reply(&text)?;
        Ok(intent_from_reply(reply))
    }

    async fn generate(
        &self,
        contents: &str,
        schema: &ResponseSchema,
    ) -> Result<String, GenerationError> {
        let call = self.generator.generate(contents, schema, &self.model);

        let text = match tokio::time::timeout(self.timeout, call).await {
            Err(_) => return Err(GenerationError::Timeout(self.timeout)),
            Ok(result) => result?,
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

fn intent_from_reply(reply: RemoteAssistantReply) -> AssistantIntent {
    let message = reply
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    match reply.action.as_deref().map(str::trim) {
        Some("search") => {
            let criteria = RemoteSearchReply {
                city: reply.city,
                amenities: reply.amenities,
            }
            .into_criteria();
            AssistantIntent::Search {
                criteria,
                message: message.unwrap_or_else(|| fallback::SEARCH_MESSAGE.to_string()),
            }
        }
        Some("book") => {
            let space_name_hint = reply
                .space_name
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            let date_hint = reply.date.as_deref().map(normalize_date).unwrap_or_default();
            let message = message.unwrap_or_else(|| {
                if space_name_hint.is_empty() || date_hint.is_empty() {
                    fallback::BOOK_CLARIFY_MESSAGE.to_string()
                } else {
                    fallback::book_confirm_message(&space_name_hint, &date_hint)
                }
            });
            AssistantIntent::Book {
                space_name_hint,
                date_hint,
                message,
            }
        }
        Some("help") => AssistantIntent::Help {
            message: message.unwrap_or_else(|| fallback::HELP_MESSAGE.to_string()),
        },
        _ => AssistantIntent::Unknown {
            message: message.unwrap_or_else(|| fallback::UNKNOWN_MESSAGE.to_string()),
        },
    }
}

/// Keeps `YYYY-MM-DD` dates, rescues `D/M/YYYY` ones, and blanks anything else.
fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() == 10 && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok() {
        return raw.to_string();
    }
    fallback::extract_date(raw).unwrap_or_default()
}

fn parse_reply<T: DeserializeOwned>(response: &str) -> Result<T, GenerationError> {
    if let Ok(reply) = serde_json::from_str::<T>(response) {
        return Ok(reply);
    }

    // Strip markdown code fences
    let cleaned = response
        .trim()
        .strip_prefix("```json")
        .or_else(|| response.trim().strip_prefix("```"))
        .unwrap_or(response.trim());
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned).trim();

    // Otherwise look for the outermost JSON object in surrounding prose
    let json_str = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => cleaned,
    };

    serde_json::from_str::<T>(json_str).map_err(|e| GenerationError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct FixedReply(&'static str);

    #[async_trait]
    impl GenerationService for FixedReply {
        async fn generate(
            &self,
            _prompt: &str,
            _schema: &ResponseSchema,
            _model: &str,
        ) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerationService for Failing {
        async fn generate(
            &self,
            _prompt: &str,
            _schema: &ResponseSchema,
            _model: &str,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("connection refused")
        }
    }

    struct Slow;

    #[async_trait]
    impl GenerationService for Slow {
        async fn generate(
            &self,
            _prompt: &str,
            _schema: &ResponseSchema,
            _model: &str,
        ) -> anyhow::Result<String> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(r#"{"city":"Valencia"}"#.to_string())
        }
    }

    fn interpreter(generator: impl GenerationService + 'static) -> Interpreter {
        Interpreter::new(Arc::new(generator), "test-model")
    }

    #[tokio::test]
    async fn test_remote_search_reply_is_used() {
        let interp = interpreter(FixedReply(r#"{"city":"Barcelona","amenities":["wifi","café"]}"#));
        let criteria = interp.interpret_search("lo que sea").await;
        assert_eq!(criteria.city.as_deref(), Some("Barcelona"));
        assert_eq!(criteria.amenity_list(), ["wifi", "cafe"]);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back() {
        let failing = Arc::new(Failing {
            calls: AtomicUsize::new(0),
        });
        let interp = Interpreter::new(failing.clone(), "test-model");
        let criteria = interp
            .interpret_search("busca coworking en Madrid con café y parking")
            .await;
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(criteria.city.as_deref(), Some("Madrid"));
        assert_eq!(criteria.amenity_list(), ["cafe", "parking"]);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let interp = interpreter(Slow).with_timeout(Duration::from_millis(20));
        let criteria = interp.interpret_search("algo en Madrid").await;
        assert_eq!(criteria.city.as_deref(), Some("Madrid"));

        let intent = interp.interpret_intent("hola").await;
        assert_eq!(intent.action(), "help");
    }

    #[tokio::test]
    async fn test_empty_response_falls_back() {
        let interp = interpreter(FixedReply("   "));
        let intent = interp
            .interpret_intent("reserva para el 26/07/2025 en BCN Hub Creativo")
            .await;
        match intent {
            AssistantIntent::Book {
                space_name_hint,
                date_hint,
                ..
            } => {
                assert_eq!(space_name_hint, "BCN Hub Creativo");
                assert_eq!(date_hint, "2025-07-26");
            }
            other => panic!("expected book intent, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_response_falls_back() {
        let interp = interpreter(FixedReply("I can't help with that"));
        let criteria = interp.interpret_search("coworking en Valencia con wifi").await;
        assert_eq!(criteria.city.as_deref(), Some("Valencia"));
        assert_eq!(criteria.amenity_list(), ["wifi"]);
    }

    #[tokio::test]
    async fn test_wrong_shape_falls_back() {
        let interp = interpreter(FixedReply(r#"{"city": 42}"#));
        let criteria = interp.interpret_search("nada concreto").await;
        assert!(criteria.is_empty());
    }

    #[tokio::test]
    async fn test_remote_book_intent() {
        let interp = interpreter(FixedReply(
            r#"{"action":"book","spaceName":"Madrid Connect","date":"2025-09-02","message":"¿Confirmas?"}"#,
        ));
        let intent = interp.interpret_intent("reserva").await;
        assert_eq!(
            intent,
            AssistantIntent::Book {
                space_name_hint: "Madrid Connect".to_string(),
                date_hint: "2025-09-02".to_string(),
                message: "¿Confirmas?".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_remote_book_date_is_normalized() {
        let interp = interpreter(FixedReply(
            r#"{"action":"book","spaceName":"Madrid Connect","date":"2/9/2025"}"#,
        ));
        match interp.interpret_intent("reserva").await {
            AssistantIntent::Book {
                date_hint, message, ..
            } => {
                assert_eq!(date_hint, "2025-09-02");
                assert!(message.contains("Madrid Connect"));
            }
            other => panic!("expected book intent, got {other:?}"),
        }

        let interp = interpreter(FixedReply(
            r#"{"action":"book","spaceName":"Madrid Connect","date":"next friday"}"#,
        ));
        match interp.interpret_intent("reserva").await {
            AssistantIntent::Book {
                date_hint, message, ..
            } => {
                assert_eq!(date_hint, "");
                assert_eq!(message, fallback::BOOK_CLARIFY_MESSAGE);
            }
            other => panic!("expected book intent, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remote_unrecognized_action_is_unknown() {
        let interp = interpreter(FixedReply("```json\n{\"action\":\"dance\"}\n```"));
        let intent = interp.interpret_intent("baila").await;
        assert_eq!(
            intent,
            AssistantIntent::Unknown {
                message: fallback::UNKNOWN_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_remote_search_intent_in_prose() {
        let interp = interpreter(FixedReply(
            r#"Aquí tienes: {"action":"search","city":"Madrid","amenities":["parking"],"message":"Buscando en Madrid"} ¡suerte!"#,
        ));
        match interp.interpret_intent("busca en Madrid").await {
            AssistantIntent::Search { criteria, message } => {
                assert_eq!(criteria.city.as_deref(), Some("Madrid"));
                assert_eq!(criteria.amenity_list(), ["parking"]);
                assert_eq!(message, "Buscando en Madrid");
            }
            other => panic!("expected search intent, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_total_fallback_never_errors() {
        let failing = Failing {
            calls: AtomicUsize::new(0),
        };
        let interp = interpreter(failing);
        for prompt in ["", "   ", "🙂", "reserva", "busca", "26/07/2025", "\"\""] {
            let _ = interp.interpret_search(prompt).await;
            assert!(!interp.interpret_intent(prompt).await.message().is_empty());
        }
    }
}
