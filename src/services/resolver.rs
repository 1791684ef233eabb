use crate::models::CatalogEntry;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(CatalogEntry),
    NotFound { available_names: Vec<String> },
}

/// A catalog entry paired with the date to book it for. Only obtainable from a
/// successful [`Resolution`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBookingTarget {
    entry: CatalogEntry,
    date: String,
}

impl ResolvedBookingTarget {
    pub fn entry(&self) -> &CatalogEntry {
        &self.entry
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

impl Resolution {
    /// `Err` carries the catalog names to offer as alternatives.
    pub fn into_target(self, date: &str) -> Result<ResolvedBookingTarget, Vec<String>> {
        match self {
            Resolution::Found(entry) => Ok(ResolvedBookingTarget {
                entry,
                date: date.to_string(),
            }),
            Resolution::NotFound { available_names } => Err(available_names),
        }
    }
}

/// Matches a free-text space name against the catalog.
///
/// An entry matches when, ignoring case, its name contains the hint or the hint contains
/// its name. The first match in catalog order wins; there is no ranking between several
/// matches, so an exact name listed later loses to a longer name listed earlier.
pub fn resolve_space(hint: &str, catalog: &[CatalogEntry]) -> Resolution {
    let needle = hint.trim().to_lowercase();

    let found = if needle.is_empty() {
        None
    } else {
        catalog.iter().find(|entry| {
            let name = entry.name.to_lowercase();
            name.contains(&needle) || needle.contains(&name)
        })
    };

    match found {
        Some(entry) => Resolution::Found(entry.clone()),
        None => Resolution::NotFound {
            available_names: catalog.iter().map(|e| e.name.clone()).collect(),
        },
    }
}
