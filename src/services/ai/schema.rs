use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    String,
    StringArray,
}

#[derive(Debug, Clone)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

/// Output schema for a constrained-generation request: a flat JSON object whose
/// properties are strings or arrays of strings.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    fields: Vec<SchemaField>,
}

impl ResponseSchema {
    pub fn new() -> Self {
        Self { fields: vec![] }
    }

    pub fn string(mut self, name: &'static str, description: &'static str) -> Self {
        self.fields.push(SchemaField {
            name,
            kind: FieldKind::String,
            description,
        });
        self
    }

    pub fn string_array(mut self, name: &'static str, description: &'static str) -> Self {
        self.fields.push(SchemaField {
            name,
            kind: FieldKind::StringArray,
            description,
        });
        self
    }

    /// Gemini `responseSchema` dialect (upper-case OpenAPI types).
    pub fn to_gemini(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let prop = match field.kind {
                FieldKind::String => json!({
                    "type": "STRING",
                    "description": field.description,
                }),
                FieldKind::StringArray => json!({
                    "type": "ARRAY",
                    "description": field.description,
                    "items": { "type": "STRING" },
                }),
            };
            properties.insert(field.name.to_string(), prop);
        }
        json!({ "type": "OBJECT", "properties": properties })
    }

    /// Plain JSON Schema, as accepted by Ollama's `format` option.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let prop = match field.kind {
                FieldKind::String => json!({
                    "type": "string",
                    "description": field.description,
                }),
                FieldKind::StringArray => json!({
                    "type": "array",
                    "description": field.description,
                    "items": { "type": "string" },
                }),
            };
            properties.insert(field.name.to_string(), prop);
        }
        json!({
            "type": "object",
            "properties": properties,
            "additionalProperties": false,
        })
    }
}

impl Default for ResponseSchema {
    fn default() -> Self {
        Self::new()
    }
}

pub fn search_schema() -> ResponseSchema {
    ResponseSchema::new()
        .string(
            "city",
            "La ciudad que el usuario quiere buscar. Por ejemplo, 'Madrid', 'Barcelona'.",
        )
        .string_array(
            "amenities",
            "Una lista de servicios que el usuario solicita. Valores posibles: 'wifi', 'cafe', \
             'sala-reuniones', 'acceso-24-7', 'parking', 'escritorio-de-pie'.",
        )
}

pub fn assistant_schema() -> ResponseSchema {
    ResponseSchema::new()
        .string(
            "action",
            "Acción que el usuario quiere realizar: 'search', 'book', 'help', 'unknown'",
        )
        .string("spaceName", "Nombre del espacio de coworking mencionado")
        .string("date", "Fecha mencionada en formato YYYY-MM-DD")
        .string("city", "Ciudad mencionada para búsqueda")
        .string_array("amenities", "Servicios mencionados")
        .string("message", "Mensaje de respuesta para el usuario")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_dialect() {
        let schema = search_schema().to_gemini();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["city"]["type"], "STRING");
        assert_eq!(schema["properties"]["amenities"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["amenities"]["items"]["type"], "STRING");
    }

    #[test]
    fn test_json_schema_dialect() {
        let schema = assistant_schema().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        let props = schema["properties"].as_object().unwrap();
        for name in ["action", "spaceName", "date", "city", "amenities", "message"] {
            assert!(props.contains_key(name), "missing {name}");
        }
    }
}
