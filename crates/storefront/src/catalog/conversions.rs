//! Conversions between the remote catalog's JSON records and domain types.
//!
//! The remote service is loosely typed: numeric fields may come back as JSON
//! numbers or as strings, and optional fields may be missing or null. Records
//! are checked here so that nothing past the client sees an unvalidated item.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use techstore_core::{Item, ItemDraft, ItemId};

use super::client::CatalogClientError;

/// An item exactly as the remote service stores it.
#[derive(Debug, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub precio: Option<Value>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub marca: Option<String>,
    #[serde(default)]
    pub imagen: Option<String>,
    #[serde(default)]
    pub stock: Option<Value>,
    #[serde(default)]
    pub puntuacion: Option<Value>,
    #[serde(default)]
    pub caracteristicas: Option<String>,
    #[serde(default)]
    pub disponible: Option<bool>,
}

/// Body sent on create and full replacement.
///
/// Every field is always present. Unset optional fields are sent as empty
/// strings so that a replacement clears them on the service.
#[derive(Debug, Serialize)]
pub struct ItemPayload<'a> {
    pub nombre: &'a str,
    pub descripcion: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub precio: Decimal,
    pub categoria: &'a str,
    pub marca: &'a str,
    pub imagen: &'a str,
    pub stock: u32,
    pub puntuacion: f64,
    pub caracteristicas: &'a str,
    pub disponible: bool,
}

impl<'a> From<&'a ItemDraft> for ItemPayload<'a> {
    fn from(draft: &'a ItemDraft) -> Self {
        Self {
            nombre: &draft.name,
            descripcion: &draft.description,
            precio: draft.price,
            categoria: &draft.category,
            marca: draft.brand.as_deref().unwrap_or_default(),
            imagen: &draft.image_url,
            stock: draft.stock,
            puntuacion: draft.rating,
            caracteristicas: draft.features.as_deref().unwrap_or_default(),
            disponible: draft.available,
        }
    }
}

impl TryFrom<ItemRecord> for Item {
    type Error = CatalogClientError;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        let invalid = |field: &str, detail: String| {
            CatalogClientError::InvalidItem(format!("item {}: {field} {detail}", record.id))
        };

        let price = match &record.precio {
            None | Some(Value::Null) => Decimal::ZERO,
            Some(value) => {
                decimal_from_value(value).ok_or_else(|| invalid("precio", format!("{value}")))?
            }
        };

        let stock = match &record.stock {
            None | Some(Value::Null) => 0,
            Some(value) => stock_from_value(value).ok_or_else(|| invalid("stock", format!("{value}")))?,
        };

        let rating = match &record.puntuacion {
            None | Some(Value::Null) => 0.0,
            Some(value) => float_from_value(value)
                .filter(|r| (0.0..=f64::from(ItemDraft::MAX_RATING)).contains(r))
                .ok_or_else(|| invalid("puntuacion", format!("{value}")))?,
        };

        Ok(Self {
            id: record.id,
            name: record.nombre.unwrap_or_default(),
            description: record.descripcion.unwrap_or_default(),
            price,
            category: record.categoria.unwrap_or_default(),
            brand: record.marca.filter(|b| !b.is_empty()),
            image_url: record.imagen.unwrap_or_default(),
            stock,
            rating,
            available: record.disponible.unwrap_or(true),
            features: record.caracteristicas.filter(|f| !f.is_empty()),
        })
    }
}

/// Convert a list response, dropping records that fail to parse or validate.
///
/// Records arrive as raw JSON so that a single malformed record does not hide
/// the rest of the catalog.
pub fn convert_item_list(records: Vec<Value>) -> Vec<Item> {
    records
        .into_iter()
        .filter_map(|raw| {
            let converted = serde_json::from_value::<ItemRecord>(raw)
                .map_err(CatalogClientError::from)
                .and_then(Item::try_from);
            match converted {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping invalid catalog record");
                    None
                }
            }
        })
        .collect()
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok(),
        Value::String(_) => Some(Decimal::ZERO),
        _ => None,
    }
}

fn stock_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok(),
        Value::String(_) => Some(0),
        _ => None,
    }
}

fn float_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok(),
        Value::String(_) => Some(0.0),
        _ => None,
    }
}
