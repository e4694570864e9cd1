//! Field widgets looked up by name.

use anyhow::{Result, anyhow, bail};
use rustc_hash::FxHashMap;

use crate::codec::FieldValue;
use crate::host::FieldType;
use crate::style::NumberStyle;

pub const NULL_FLOAT: &str = "null_float";

/// The format/parse/validate triple a registered widget provides.
pub trait FieldCodec: Send + Sync {
    fn format(&self, value: FieldValue) -> String;
    fn parse(&self, text: &str) -> f64;
    /// Whether `text` would be read as a number rather than coerced to zero.
    fn validate(&self, text: &str) -> bool;
}

impl FieldCodec for NumberStyle {
    fn format(&self, value: FieldValue) -> String {
        Self::format(self, value)
    }

    fn parse(&self, text: &str) -> f64 {
        Self::parse(self, text)
    }

    fn validate(&self, text: &str) -> bool {
        self.parse_outcome(text).kind != crate::codec::ParseKind::Invalid
    }
}

pub struct FieldDescriptor {
    pub codec: Box<dyn FieldCodec>,
    pub supported_types: Vec<FieldType>,
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("supported_types", &self.supported_types)
            .finish_non_exhaustive()
    }
}

impl FieldDescriptor {
    #[must_use]
    pub fn supports(&self, field_type: FieldType) -> bool {
        self.supported_types.contains(&field_type)
    }
}

#[derive(Debug, Default)]
pub struct FieldRegistry {
    entries: FxHashMap<String, FieldDescriptor>,
}

impl FieldRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `null_float` with the given style.
    #[must_use]
    pub fn with_defaults(style: NumberStyle) -> Self {
        let mut registry = Self::new();
        registry.entries.insert(
            NULL_FLOAT.to_string(),
            FieldDescriptor {
                codec: Box::new(style),
                supported_types: FieldType::ALL.to_vec(),
            },
        );
        registry
    }

    /// Registers a widget. An existing name is only replaced when `force` is set.
    pub fn add(&mut self, name: &str, descriptor: FieldDescriptor, force: bool) -> Result<()> {
        if !force && self.entries.contains_key(name) {
            bail!("field widget {name:?} is already registered");
        }
        self.entries.insert(name.to_string(), descriptor);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.entries.get(name)
    }

    pub fn resolve(&self, name: &str, field_type: FieldType) -> Result<&dyn FieldCodec> {
        let descriptor = self
            .get(name)
            .ok_or_else(|| anyhow!("no field widget registered as {name:?}"))?;
        if !descriptor.supports(field_type) {
            bail!("field widget {name:?} does not support {field_type} fields");
        }
        Ok(descriptor.codec.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_for_every_numeric_type() {
        let registry = FieldRegistry::with_defaults(NumberStyle::default());
        for field_type in FieldType::ALL {
            let codec = registry.resolve(NULL_FLOAT, field_type).unwrap();
            assert_eq!(codec.format(FieldValue::Set(0.055)), "5,50%");
        }
    }

    #[test]
    fn codec_validates_numeric_text() {
        let registry = FieldRegistry::with_defaults(NumberStyle::default());
        let codec = registry.resolve(NULL_FLOAT, FieldType::Float).unwrap();
        assert!(codec.validate("1.234,5"));
        assert!(codec.validate(""));
        assert!(!codec.validate("abc"));
        assert!((codec.parse("55") - 0.55).abs() < 1e-12);
    }

    #[test]
    fn unknown_and_unsupported_lookups_fail() {
        let mut registry = FieldRegistry::new();
        assert!(registry.resolve(NULL_FLOAT, FieldType::Float).is_err());

        registry
            .add(
                "rate_only",
                FieldDescriptor {
                    codec: Box::new(NumberStyle::default()),
                    supported_types: vec![FieldType::Float],
                },
                false,
            )
            .unwrap();
        assert!(registry.resolve("rate_only", FieldType::Float).is_ok());
        let Err(err) = registry.resolve("rate_only", FieldType::Integer) else {
            panic!("integer fields must not resolve to a float-only widget");
        };
        assert!(err.to_string().contains("does not support integer"));
    }

    #[test]
    fn duplicate_names_need_force() {
        let mut registry = FieldRegistry::with_defaults(NumberStyle::default());
        let descriptor = || FieldDescriptor {
            codec: Box::new(NumberStyle::default().with_auto_percent(false)),
            supported_types: vec![FieldType::Float],
        };
        assert!(registry.add(NULL_FLOAT, descriptor(), false).is_err());
        registry.add(NULL_FLOAT, descriptor(), true).unwrap();
        let codec = registry.resolve(NULL_FLOAT, FieldType::Float).unwrap();
        assert!((codec.parse("55") - 55.0).abs() < 1e-12);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec![NULL_FLOAT]);
    }
}
