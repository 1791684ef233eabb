use serde::Serialize;

use crate::models::{AssistantIntent, CatalogEntry, SearchCriteria};
use crate::services::booking::{attempt_booking, BookingOutcome, LOGIN_REQUIRED_MESSAGE};
use crate::services::resolver::resolve_space;
use crate::state::AppState;

const APOLOGY_MESSAGE: &str =
    "Lo siento, hubo un error procesando tu petición. Inténtalo de nuevo.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub intent: AssistantIntent,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spaces: Option<Vec<CatalogEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_names: Option<Vec<String>>,
}

impl AssistantReply {
    fn message_only(intent: AssistantIntent, message: String) -> Self {
        Self {
            intent,
            message,
            spaces: None,
            booking: None,
            available_names: None,
        }
    }
}

/// Runs one assistant turn: interpret the prompt, then search the catalog or resolve
/// and book a space depending on the intent.
pub async fn handle_query(state: &AppState, prompt: &str, actor_id: Option<i64>) -> AssistantReply {
    let intent = state.interpreter.interpret_intent(prompt).await;

    tracing::info!(action = intent.action(), actor_id = ?actor_id, "processing assistant query");

    match &intent {
        AssistantIntent::Search { criteria, message } => {
            match state.catalog.list_spaces(criteria).await {
                Ok(spaces) => AssistantReply {
                    message: message.clone(),
                    spaces: Some(spaces),
                    ..AssistantReply::message_only(intent, String::new())
                },
                Err(e) => {
                    tracing::error!(error = %e, "catalog search failed");
                    AssistantReply::message_only(intent, APOLOGY_MESSAGE.to_string())
                }
            }
        }
        AssistantIntent::Book {
            space_name_hint,
            date_hint,
            ..
        } if !space_name_hint.is_empty() && !date_hint.is_empty() => {
            let (hint, date) = (space_name_hint.clone(), date_hint.clone());
            book(state, intent, &hint, &date, actor_id).await
        }
        AssistantIntent::Book { .. } if actor_id.is_none() => {
            AssistantReply::message_only(intent, LOGIN_REQUIRED_MESSAGE.to_string())
        }
        _ => {
            let message = intent.message().to_string();
            AssistantReply::message_only(intent, message)
        }
    }
}

async fn book(
    state: &AppState,
    intent: AssistantIntent,
    hint: &str,
    date: &str,
    actor_id: Option<i64>,
) -> AssistantReply {
    let snapshot = match state.catalog.list_spaces(&SearchCriteria::default()).await {
        Ok(spaces) => spaces,
        Err(e) => {
            tracing::error!(error = %e, "failed to load catalog for booking");
            return AssistantReply::message_only(intent, APOLOGY_MESSAGE.to_string());
        }
    };

    match resolve_space(hint, &snapshot).into_target(date) {
        Ok(target) => {
            let outcome = attempt_booking(state.bookings.as_ref(), &target, actor_id).await;
            AssistantReply {
                message: outcome.message().to_string(),
                booking: Some(outcome),
                ..AssistantReply::message_only(intent, String::new())
            }
        }
        Err(available_names) => {
            tracing::info!(hint, "no catalog entry matched space name");
            AssistantReply {
                message: format!(
                    "No encontré un espacio llamado \"{hint}\". Los espacios disponibles son: {}",
                    available_names.join(", ")
                ),
                available_names: Some(available_names),
                ..AssistantReply::message_only(intent, String::new())
            }
        }
    }
}
