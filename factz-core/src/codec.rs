//! Textual encodings for leaf value kinds.
//!
//! Every cell exposes `format` for diagnostics and a `save`/`load` pair a
//! higher-level persistence engine round-trips through. The encodings are
//! per-kind and deliberately boring; anything without a real encoding falls
//! back to the [`PLACEHOLDER`].
//!
//! Formatting never panics and costs time proportional to the value's size.

use crate::error::{FactzError, Result};
use crate::types::{EntityId, SpawnRef};
use uuid::Uuid;

/// Textual stand-in for kinds with no real encoding.
pub const PLACEHOLDER: &str = "?";

/// Marker used by [`Option<EntityId>`]'s encoding for the empty reference.
const NO_ENTITY: &str = "-";

/// Display and persistence encoding for one value kind.
pub trait ValueCodec: Sized {
    /// Human-readable rendering for diagnostics and UI.
    fn format(&self) -> String {
        PLACEHOLDER.to_string()
    }

    /// Machine-readable rendering for the persistence round-trip.
    fn save(&self) -> String {
        PLACEHOLDER.to_string()
    }

    /// Parse a previously saved rendering.
    ///
    /// # Errors
    /// Kinds without an encoding reject every payload; kinds with one reject
    /// malformed payloads. Nothing is mutated on failure.
    fn parse(raw: &str) -> Result<Self> {
        Err(FactzError::Parse {
            kind: "opaque",
            raw: raw.to_string(),
        })
    }
}

fn parse_error(kind: &'static str, raw: &str) -> FactzError {
    FactzError::Parse {
        kind,
        raw: raw.to_string(),
    }
}

impl ValueCodec for u8 {
    fn format(&self) -> String {
        self.to_string()
    }

    fn save(&self) -> String {
        self.to_string()
    }

    fn parse(raw: &str) -> Result<Self> {
        raw.trim().parse().map_err(|_| parse_error("u8", raw))
    }
}

impl ValueCodec for u32 {
    fn format(&self) -> String {
        self.to_string()
    }

    fn save(&self) -> String {
        self.to_string()
    }

    fn parse(raw: &str) -> Result<Self> {
        raw.trim().parse().map_err(|_| parse_error("u32", raw))
    }
}

impl ValueCodec for f32 {
    fn format(&self) -> String {
        format!("{self:.2}")
    }

    fn save(&self) -> String {
        self.to_string()
    }

    fn parse(raw: &str) -> Result<Self> {
        raw.trim().parse().map_err(|_| parse_error("f32", raw))
    }
}

impl ValueCodec for bool {
    fn format(&self) -> String {
        self.to_string()
    }

    fn save(&self) -> String {
        self.to_string()
    }

    fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(parse_error("bool", raw)),
        }
    }
}

impl ValueCodec for Option<EntityId> {
    fn format(&self) -> String {
        match self {
            Some(id) => id.to_string(),
            None => NO_ENTITY.to_string(),
        }
    }

    fn save(&self) -> String {
        self.format()
    }

    fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw == NO_ENTITY {
            return Ok(None);
        }
        Uuid::parse_str(raw)
            .map(|id| Some(EntityId(id)))
            .map_err(|_| parse_error("entity reference", raw))
    }
}

impl ValueCodec for Vec<EntityId> {
    fn format(&self) -> String {
        let ids: Vec<String> = self.iter().map(EntityId::to_string).collect();
        ids.join(",")
    }

    fn save(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| PLACEHOLDER.to_string())
    }

    fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|_| parse_error("entity list", raw))
    }
}

impl ValueCodec for SpawnRef {
    fn format(&self) -> String {
        self.to_string()
    }

    fn save(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| PLACEHOLDER.to_string())
    }

    fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|_| parse_error("spawn reference", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_payloads_round_trip() {
        assert_eq!(u32::parse(&42_u32.save()).expect("u32"), 42);
        assert_eq!(u8::parse(" 7 ").expect("u8 with padding"), 7);
        assert!((f32::parse(&1.5_f32.save()).expect("f32") - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn float_formats_with_two_decimals() {
        assert_eq!(0.5_f32.format(), "0.50");
    }

    #[test]
    fn missing_entity_is_a_dash() {
        let none: Option<EntityId> = None;
        assert_eq!(none.format(), "-");
        assert_eq!(Option::<EntityId>::parse("-").expect("dash"), None);

        let id = EntityId::new();
        let parsed = Option::<EntityId>::parse(&Some(id).save()).expect("uuid");
        assert_eq!(parsed, Some(id));
    }

    #[test]
    fn entity_list_saves_as_json() {
        let ids = vec![EntityId::new(), EntityId::new()];
        let parsed = Vec::<EntityId>::parse(&ids.save()).expect("json list");
        assert_eq!(parsed, ids);
        assert_eq!(ids.format().matches(',').count(), 1);
    }

    #[test]
    fn garbage_payloads_are_rejected() {
        assert!(u32::parse("twelve").is_err());
        assert!(bool::parse("yes").is_err());
        assert!(SpawnRef::parse("{").is_err());
    }
}
