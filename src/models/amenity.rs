use serde::{Deserialize, Serialize};

/// Display metadata for an amenity tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Amenity {
    pub id: String,
    pub name: String,
}

/// Closed vocabulary of amenity identifiers with their display names.
pub const KNOWN_AMENITIES: &[(&str, &str)] = &[
    ("wifi", "WiFi de Alta Velocidad"),
    ("cafe", "Café Incluido"),
    ("sala-reuniones", "Salas de Reuniones"),
    ("acceso-24-7", "Acceso 24/7"),
    ("parking", "Parking Gratuito"),
    ("escritorio-de-pie", "Escritorios de Pie"),
];

const ALIASES: &[(&str, &str)] = &[
    ("wi-fi", "wifi"),
    ("sala-de-reuniones", "sala-reuniones"),
    ("salas-de-reuniones", "sala-reuniones"),
    ("24-7", "acceso-24-7"),
    ("acceso-24h", "acceso-24-7"),
    ("escritorios-de-pie", "escritorio-de-pie"),
    ("standing-desk", "escritorio-de-pie"),
];

pub fn is_known(id: &str) -> bool {
    KNOWN_AMENITIES.iter().any(|(known, _)| *known == id)
}

/// Unknown tags are passed through with the tag as their display name.
pub fn amenity_for(tag: &str) -> Amenity {
    let name = KNOWN_AMENITIES
        .iter()
        .find(|(id, _)| *id == tag)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| tag.to_string());

    Amenity {
        id: tag.to_string(),
        name,
    }
}

/// Canonicalizes a free-form amenity label ("Café", "sala de reuniones", "acceso 24/7")
/// into a vocabulary identifier. Labels that map to nothing known come back slugified.
pub fn normalize_tag(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    if let Some((id, _)) = KNOWN_AMENITIES
        .iter()
        .find(|(_, name)| name.to_lowercase() == lowered)
    {
        return id.to_string();
    }

    let slug = slugify(&lowered);

    if is_known(&slug) {
        return slug;
    }

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == slug)
        .map(|(_, id)| id.to_string())
        .unwrap_or(slug)
}

fn slugify(lowered: &str) -> String {
    let mut slug = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        let c = match c {
            'á' | 'à' => 'a',
            'é' | 'è' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            c if c.is_alphanumeric() => c,
            _ => '-',
        };
        if c == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(c);
    }
    slug.trim_end_matches('-').to_string()
}
