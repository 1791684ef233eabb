//! Local heuristics used whenever the generation service cannot produce an answer.
//!
//! Everything here is a pure function of the prompt: the same input always yields the
//! same result.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{AssistantIntent, SearchCriteria};

/// Checked in order; the first city found wins.
const KNOWN_CITIES: &[(&str, &str)] = &[
    ("madrid", "Madrid"),
    ("barcelona", "Barcelona"),
    ("valencia", "Valencia"),
];

/// Amenity id and the lowercase keywords that trigger it. Rows are checked
/// independently, so one prompt can yield several amenities.
const AMENITY_KEYWORDS: &[(&str, &[&str])] = &[
    ("cafe", &["café", "cafe"]),
    ("wifi", &["wifi"]),
    ("parking", &["parking"]),
    ("sala-reuniones", &["sala", "reunión"]),
    ("acceso-24-7", &["24", "24/7"]),
    ("escritorio-de-pie", &["pie", "standing"]),
];

const BOOK_KEYWORDS: &[&str] = &["reserva", "reservar", "book"];
const SEARCH_KEYWORDS: &[&str] = &["busca", "buscar", "encuentra"];

pub const SEARCH_MESSAGE: &str = "Voy a buscar espacios de coworking para ti.";
pub const BOOK_CLARIFY_MESSAGE: &str =
    "Quieres hacer una reserva. ¿Puedes especificar el espacio y la fecha?";
pub const HELP_MESSAGE: &str = "Puedo ayudarte a buscar espacios de coworking o hacer reservas. \
     Prueba con: \"busca coworking en Madrid\" o \"reserva para el 26/07/2025 en BCN Hub Creativo\"";
pub const UNKNOWN_MESSAGE: &str =
    "Lo siento, no pude entender tu petición. ¿Puedes ser más específico?";

pub fn book_confirm_message(space_name: &str, date: &str) -> String {
    format!("Entendido, quieres reservar en {space_name} para el {date}. ¿Confirmas la reserva?")
}

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,2})[/-]([0-9]{1,2})[/-]([0-9]{4})").unwrap());

static AFTER_EN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)en\s+([^,]+?)(?:\s+para|\s+el|\s*$)").unwrap());

static AFTER_EN_ANY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)en\s+(.+?)(?:\s+para|\s+el|\s*$)").unwrap());

static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

static CAPITALIZED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:reserva).*?(?:(?i:en)\s+)?([A-Z][^,\n]+)").unwrap()
});

pub type SpaceNameExtractor = fn(&str) -> Option<String>;

/// Space-name strategies in precedence order. Only the first one that yields a
/// non-empty name is used; results are never combined.
pub const SPACE_NAME_EXTRACTORS: &[(&str, SpaceNameExtractor)] = &[
    ("after-en", after_en),
    ("after-en-any", after_en_any),
    ("quoted", quoted),
    ("capitalized-after-reserva", capitalized_after_reserva),
];

pub fn search_criteria(prompt: &str) -> SearchCriteria {
    let lower = prompt.to_lowercase();

    let city = KNOWN_CITIES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, city)| city.to_string());

    let amenities = AMENITY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(id, _)| id.to_string())
        .collect();

    SearchCriteria::new(city, amenities)
}

/// Booking keywords take precedence over search keywords; anything else is a help request.
pub fn intent(prompt: &str) -> AssistantIntent {
    let lower = prompt.to_lowercase();

    if contains_any(&lower, BOOK_KEYWORDS) {
        let date_hint = extract_date(prompt).unwrap_or_default();
        let space_name_hint = extract_space_name(prompt).unwrap_or_default();

        let message = if !date_hint.is_empty() && !space_name_hint.is_empty() {
            book_confirm_message(&space_name_hint, &date_hint)
        } else {
            BOOK_CLARIFY_MESSAGE.to_string()
        };

        return AssistantIntent::Book {
            space_name_hint,
            date_hint,
            message,
        };
    }

    if contains_any(&lower, SEARCH_KEYWORDS) {
        return AssistantIntent::Search {
            criteria: search_criteria(prompt),
            message: SEARCH_MESSAGE.to_string(),
        };
    }

    AssistantIntent::Help {
        message: HELP_MESSAGE.to_string(),
    }
}

/// Finds a `D/M/YYYY` (or `-` separated) date and returns it as `YYYY-MM-DD`.
pub fn extract_date(text: &str) -> Option<String> {
    let caps = DATE_RE.captures(text)?;
    let (day, month, year) = (&caps[1], &caps[2], &caps[3]);
    Some(format!("{year}-{month:0>2}-{day:0>2}"))
}

pub fn extract_space_name(prompt: &str) -> Option<String> {
    SPACE_NAME_EXTRACTORS
        .iter()
        .find_map(|(_, extract)| extract(prompt))
}

fn after_en(prompt: &str) -> Option<String> {
    first_capture(&AFTER_EN_RE, prompt)
}

fn after_en_any(prompt: &str) -> Option<String> {
    first_capture(&AFTER_EN_ANY_RE, prompt)
}

fn quoted(prompt: &str) -> Option<String> {
    first_capture(&QUOTED_RE, prompt)
}

fn capitalized_after_reserva(prompt: &str) -> Option<String> {
    first_capture(&CAPITALIZED_RE, prompt)
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_city_and_amenities() {
        let criteria = search_criteria("busca coworking en Madrid con café y parking");
        assert_eq!(criteria.city.as_deref(), Some("Madrid"));
        let amenities = criteria.amenity_list();
        assert_eq!(amenities.len(), 2);
        assert_eq!(amenities.iter().filter(|a| *a == "cafe").count(), 1);
        assert_eq!(amenities.iter().filter(|a| *a == "parking").count(), 1);
    }

    #[test]
    fn test_search_first_city_wins() {
        let criteria = search_criteria("algo entre Barcelona y Madrid");
        assert_eq!(criteria.city.as_deref(), Some("Madrid"));
    }

    #[test]
    fn test_search_amenity_synonyms() {
        let criteria = search_criteria("Escritorio de pie, sala de reunión y acceso 24/7");
        let amenities = criteria.amenity_list();
        assert!(amenities.contains(&"escritorio-de-pie".to_string()));
        assert!(amenities.contains(&"sala-reuniones".to_string()));
        assert!(amenities.contains(&"acceso-24-7".to_string()));
        assert!(criteria.city.is_none());
    }

    #[test]
    fn test_search_nothing_found_is_empty() {
        let criteria = search_criteria("hola, ¿qué tal?");
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_extract_date_pads_and_reorders() {
        assert_eq!(extract_date("el 26/07/2025").as_deref(), Some("2025-07-26"));
        assert_eq!(extract_date("para 1-8-2025 por favor").as_deref(), Some("2025-08-01"));
        assert_eq!(extract_date("sin fecha"), None);
        assert_eq!(extract_date("el 26/07/25"), None);
    }

    #[test]
    fn test_space_name_after_en_stops_at_para() {
        assert_eq!(
            extract_space_name("reserva en Valencia Tech Place para el 01/08/2025").as_deref(),
            Some("Valencia Tech Place")
        );
    }

    #[test]
    fn test_space_name_at_end_of_prompt() {
        assert_eq!(
            extract_space_name("reserva para el 26/07/2025 en BCN Hub Creativo").as_deref(),
            Some("BCN Hub Creativo")
        );
    }

    #[test]
    fn test_space_name_across_comma_uses_second_pattern() {
        assert_eq!(after_en("reserva en Hub, Creativo"), None);
        assert_eq!(
            extract_space_name("reserva en Hub, Creativo").as_deref(),
            Some("Hub, Creativo")
        );
    }

    #[test]
    fn test_space_name_quoted() {
        assert_eq!(
            extract_space_name("reservar \"Madrid Connect\" el 02/09/2025").as_deref(),
            Some("Madrid Connect")
        );
    }

    #[test]
    fn test_space_name_capitalized_after_reserva() {
        assert_eq!(
            extract_space_name("Quiero reservar Madrid Connect, gracias").as_deref(),
            Some("Madrid Connect")
        );
    }

    #[test]
    fn test_space_name_extractor_order() {
        let names: Vec<&str> = SPACE_NAME_EXTRACTORS.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            ["after-en", "after-en-any", "quoted", "capitalized-after-reserva"]
        );
    }

    #[test]
    fn test_intent_book_with_date_and_space() {
        let intent = intent("reserva para el 26/07/2025 en BCN Hub Creativo");
        match intent {
            AssistantIntent::Book {
                space_name_hint,
                date_hint,
                message,
            } => {
                assert_eq!(space_name_hint, "BCN Hub Creativo");
                assert_eq!(date_hint, "2025-07-26");
                assert!(message.contains("BCN Hub Creativo"));
                assert!(message.contains("2025-07-26"));
            }
            other => panic!("expected book intent, got {other:?}"),
        }
    }

    #[test]
    fn test_intent_book_missing_date_asks_for_clarification() {
        let intent = intent("quiero reservar en Madrid Connect");
        match intent {
            AssistantIntent::Book {
                space_name_hint,
                date_hint,
                message,
            } => {
                assert_eq!(space_name_hint, "Madrid Connect");
                assert_eq!(date_hint, "");
                assert_eq!(message, BOOK_CLARIFY_MESSAGE);
            }
            other => panic!("expected book intent, got {other:?}"),
        }
    }

    #[test]
    fn test_intent_booking_beats_search() {
        let intent = intent("busca y reserva algo");
        assert_eq!(intent.action(), "book");
    }

    #[test]
    fn test_intent_search_fills_criteria() {
        let intent = intent("Busca coworking en Barcelona con wifi");
        match intent {
            AssistantIntent::Search { criteria, message } => {
                assert_eq!(criteria.city.as_deref(), Some("Barcelona"));
                assert_eq!(criteria.amenity_list(), ["wifi"]);
                assert_eq!(message, SEARCH_MESSAGE);
            }
            other => panic!("expected search intent, got {other:?}"),
        }
    }

    #[test]
    fn test_intent_defaults_to_help() {
        let intent = intent("hola");
        assert_eq!(
            intent,
            AssistantIntent::Help {
                message: HELP_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_fallback_is_deterministic() {
        for prompt in [
            "reserva para el 26/07/2025 en BCN Hub Creativo",
            "busca coworking en Madrid con café y parking",
            "???",
        ] {
            assert_eq!(intent(prompt), intent(prompt));
            assert_eq!(search_criteria(prompt), search_criteria(prompt));
        }
    }
}
