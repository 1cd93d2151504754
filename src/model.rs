//! Point dataset: places on the map and the offices located in each.
//!
//! The JSON shape is an object keyed by place name, with coordinates given in
//! percent of the untransformed map image.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LoadError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
}

/// Holder values that mark an office as vacant (matched case-insensitively).
const VACANCY_KEYWORDS: [&str; 4] = ["VAGO", "VAGA", "SEM TITULAR", "VACANTE"];

pub const ADDRESS_KEY: &str = "Endereço";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawOffice")]
pub struct Office {
    #[serde(rename = "entrancia")]
    pub tier: String,
    #[serde(rename = "cargo")]
    pub title: String,
    #[serde(
        rename = "Promotor de Justiça Titular",
        skip_serializing_if = "Option::is_none"
    )]
    pub holder: Option<String>,
    /// Every other field, shown verbatim in the detail view.
    #[serde(flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

/// Office as stored in the dataset file. Tier and holder come under several
/// spellings, any of which may appear together in one record.
#[derive(Deserialize)]
struct RawOffice {
    entrancia: Option<serde_json::Value>,
    #[serde(rename = "entrância")]
    entrancia_accented: Option<serde_json::Value>,
    cargo: Option<String>,
    #[serde(rename = "Promotor de Justiça Titular")]
    holder_full: Option<String>,
    promotor: Option<String>,
    titular: Option<String>,
    #[serde(flatten)]
    details: BTreeMap<String, serde_json::Value>,
}

fn tier_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl From<RawOffice> for Office {
    /// Tier: first key present. Holder: first non-blank key.
    fn from(raw: RawOffice) -> Self {
        let tier = [raw.entrancia, raw.entrancia_accented]
            .into_iter()
            .flatten()
            .find_map(tier_text)
            .unwrap_or_default();
        let holder = [raw.holder_full, raw.promotor, raw.titular]
            .into_iter()
            .flatten()
            .find(|h| !h.trim().is_empty());
        Office {
            tier,
            title: raw.cargo.unwrap_or_default(),
            holder,
            details: raw.details,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailKind {
    Text,
    Address,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
    pub kind: DetailKind,
}

impl Office {
    pub fn is_vacant(&self) -> bool {
        match self.holder.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(h) => {
                let upper = h.to_uppercase();
                VACANCY_KEYWORDS.iter().any(|k| upper.contains(k))
            }
        }
    }

    /// Non-empty fields in display order: tier, title, holder, then the rest
    /// sorted by key.
    pub fn detail_rows(&self) -> Vec<DetailRow> {
        let mut rows = Vec::new();
        let mut push = |key: &str, value: String| {
            if value.trim().is_empty() {
                return;
            }
            rows.push(DetailRow {
                label: field_label(key),
                kind: if key == ADDRESS_KEY {
                    DetailKind::Address
                } else {
                    DetailKind::Text
                },
                value,
            });
        };
        push("entrancia", self.tier.clone());
        push("cargo", self.title.clone());
        push(
            "Promotor de Justiça Titular",
            self.holder.clone().unwrap_or_default(),
        );
        for (key, value) in &self.details {
            let text = match value {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            push(key, text);
        }
        rows
    }
}

/// Display label for a raw dataset key.
pub fn field_label(key: &str) -> String {
    let known = match key {
        "entrancia" | "entrância" => Some("Entrância"),
        "cargo" => Some("Cargo"),
        "atuação" => Some("Atuação"),
        "atribuição" => Some("Atribuição"),
        "Promotor de Justiça Titular" => Some("Promotor Titular"),
        "Endereço" => Some("Endereço"),
        "E-mail" => Some("E-mail"),
        "Telefone" => Some("Telefone"),
        _ => None,
    };
    match known {
        Some(label) => label.to_string(),
        None => {
            let mut chars = key.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "coordenadas")]
    pub coords: Coords,
    #[serde(rename = "promotorias", default)]
    pub offices: Vec<Office>,
}

impl Place {
    pub fn has_offices(&self) -> bool {
        !self.offices.is_empty()
    }

    pub fn has_vacancy(&self) -> bool {
        self.offices.iter().any(Office::is_vacant)
    }

    /// Offices grouped by tier, tiers in ascending order.
    pub fn offices_by_tier(&self) -> Vec<(String, Vec<&Office>)> {
        let mut groups: BTreeMap<&str, Vec<&Office>> = BTreeMap::new();
        for office in &self.offices {
            groups.entry(office.tier.as_str()).or_default().push(office);
        }
        groups
            .into_iter()
            .map(|(tier, offices)| (tier.to_string(), offices))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DatasetStats {
    pub places: usize,
    pub offices: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    pub places: BTreeMap<String, Place>,
}

impl Dataset {
    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Minimal data used when the dataset file cannot be loaded.
    pub fn fallback() -> Self {
        let place = |x: f64, y: f64, tier: &str, title: &str| Place {
            coords: Coords { x, y },
            offices: vec![Office {
                tier: tier.to_string(),
                title: title.to_string(),
                ..Default::default()
            }],
        };
        let mut places = BTreeMap::new();
        places.insert(
            "Recife".to_string(),
            place(94.922, 39.172, "3", "Promotor de Justica Civel"),
        );
        places.insert(
            "Caruaru".to_string(),
            place(78.750, 47.747, "2", "Promotor de Justica"),
        );
        Self { places }
    }

    pub fn place(&self, name: &str) -> Option<&Place> {
        self.places.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.places.keys().map(String::as_str)
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            places: self.places.len(),
            offices: self.places.values().map(|p| p.offices.len()).sum(),
        }
    }
}
