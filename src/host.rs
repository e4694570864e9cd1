//! Services a field widget borrows from its host application.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::codec::FieldValue;

/// Declared storage type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Float,
    Integer,
    Monetary,
}

impl FieldType {
    pub const ALL: [Self; 3] = [Self::Float, Self::Integer, Self::Monetary];

    /// Converts a parsed number into a value of this type.
    ///
    /// Integers round to the nearest whole number and saturate at the `i64`
    /// range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn coerce(self, value: f64) -> RecordValue {
        match self {
            Self::Float => RecordValue::Float(value),
            Self::Integer => RecordValue::Integer(value.round() as i64),
            Self::Monetary => RecordValue::Monetary(value),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Monetary => "monetary",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("unknown field type {name:?}; expected float, integer or monetary"))
    }
}

/// A typed value written back into a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordValue {
    Float(f64),
    Integer(i64),
    Monetary(f64),
}

impl RecordValue {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Float(value) | Self::Monetary(value) => value,
            Self::Integer(value) => value as f64,
        }
    }

    #[must_use]
    pub fn to_json(self) -> Value {
        match self {
            Self::Float(value) | Self::Monetary(value) => json!(value),
            Self::Integer(value) => json!(value),
        }
    }
}

pub trait Record {
    fn value(&self, field: &str) -> FieldValue;
    fn update(&mut self, field: &str, value: RecordValue) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// User-facing notification bus.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// Sends notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => info!(?severity, "{message}"),
            Severity::Warning | Severity::Danger => warn!(?severity, "{message}"),
        }
    }
}

/// Remote model proxy: `call("res.partner", "write", [[7], {...}])`.
pub trait OrmService {
    fn call(&self, model: &str, method: &str, args: Value) -> Result<Value>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryRecord {
    values: FxHashMap<String, RecordValue>,
}

impl MemoryRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(mut self, field: &str, value: RecordValue) -> Self {
        self.values.insert(field.to_string(), value);
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<RecordValue> {
        self.values.get(field).copied()
    }

    pub fn clear(&mut self, field: &str) {
        self.values.remove(field);
    }
}

impl Record for MemoryRecord {
    fn value(&self, field: &str) -> FieldValue {
        self.get(field).map(RecordValue::as_f64).into()
    }

    fn update(&mut self, field: &str, value: RecordValue) -> Result<()> {
        self.values.insert(field.to_string(), value);
        Ok(())
    }
}

/// A single database row behind an [`OrmService`]. Reads are served from the
/// values loaded by [`OrmRecord::load`]; writes go straight through.
pub struct OrmRecord<'a> {
    orm: &'a dyn OrmService,
    model: String,
    id: i64,
    cache: MemoryRecord,
}

impl fmt::Debug for OrmRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrmRecord")
            .field("model", &self.model)
            .field("id", &self.id)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<'a> OrmRecord<'a> {
    pub fn load(
        orm: &'a dyn OrmService,
        model: &str,
        id: i64,
        fields: &[(&str, FieldType)],
    ) -> Result<Self> {
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        let response = orm
            .call(model, "read", json!([[id], names]))
            .with_context(|| format!("failed to read {model}({id})"))?;
        let Some(row) = response.as_array().and_then(|rows| rows.first()) else {
            bail!("{model}({id}) does not exist");
        };

        let mut cache = MemoryRecord::new();
        for (name, kind) in fields {
            // Unset fields come back as `false` or `null`.
            if let Some(number) = row.get(*name).and_then(Value::as_f64) {
                cache.values.insert((*name).to_string(), kind.coerce(number));
            }
        }

        Ok(Self {
            orm,
            model: model.to_string(),
            id,
            cache,
        })
    }
}

impl Record for OrmRecord<'_> {
    fn value(&self, field: &str) -> FieldValue {
        self.cache.value(field)
    }

    fn update(&mut self, field: &str, value: RecordValue) -> Result<()> {
        let mut changes = serde_json::Map::new();
        changes.insert(field.to_string(), value.to_json());
        self.orm
            .call(&self.model, "write", json!([[self.id], changes]))
            .with_context(|| format!("failed to write {field} on {}({})", self.model, self.id))?;
        self.cache.update(field, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeOrm {
        calls: RefCell<Vec<(String, String, Value)>>,
        fail_writes: bool,
    }

    impl OrmService for FakeOrm {
        fn call(&self, model: &str, method: &str, args: Value) -> Result<Value> {
            self.calls
                .borrow_mut()
                .push((model.to_string(), method.to_string(), args));
            match method {
                "read" => Ok(json!([{ "id": 7, "rate": 0.055, "bonus": false }])),
                "write" if self.fail_writes => bail!("access denied"),
                "write" => Ok(json!(true)),
                other => bail!("unexpected method {other}"),
            }
        }
    }

    #[test]
    fn integer_coercion_rounds() {
        assert_eq!(FieldType::Integer.coerce(2.5), RecordValue::Integer(3));
        assert_eq!(FieldType::Integer.coerce(-0.4), RecordValue::Integer(0));
        assert_eq!(FieldType::Monetary.coerce(1.5), RecordValue::Monetary(1.5));
    }

    #[test]
    fn field_type_parses_case_insensitively() {
        assert_eq!("Monetary".parse::<FieldType>().unwrap(), FieldType::Monetary);
        assert!("text".parse::<FieldType>().is_err());
    }

    #[test]
    fn memory_record_distinguishes_unset_from_zero() {
        let mut record = MemoryRecord::new().with_value("rate", RecordValue::Float(0.0));
        assert_eq!(record.value("rate"), FieldValue::Set(0.0));
        assert_eq!(record.value("missing"), FieldValue::Unset);
        record.clear("rate");
        assert!(record.value("rate").is_unset());
    }

    #[test]
    fn orm_record_loads_and_writes_through() {
        let orm = FakeOrm::default();
        let mut record = OrmRecord::load(
            &orm,
            "hr.salary.policy",
            7,
            &[("rate", FieldType::Float), ("bonus", FieldType::Monetary)],
        )
        .unwrap();
        assert_eq!(record.value("rate"), FieldValue::Set(0.055));
        assert_eq!(record.value("bonus"), FieldValue::Unset);

        record.update("bonus", RecordValue::Monetary(1500.0)).unwrap();
        assert_eq!(record.value("bonus"), FieldValue::Set(1500.0));

        let calls = orm.calls.borrow();
        let (model, method, args) = &calls[1];
        assert_eq!(model, "hr.salary.policy");
        assert_eq!(method, "write");
        assert_eq!(args, &json!([[7], { "bonus": 1500.0 }]));
    }

    #[test]
    fn failed_write_leaves_cache_untouched() {
        let orm = FakeOrm {
            fail_writes: true,
            ..FakeOrm::default()
        };
        let mut record =
            OrmRecord::load(&orm, "hr.salary.policy", 7, &[("rate", FieldType::Float)]).unwrap();
        let err = record.update("rate", RecordValue::Float(0.1)).unwrap_err();
        assert!(err.to_string().contains("failed to write rate"));
        assert_eq!(record.value("rate"), FieldValue::Set(0.055));
    }
}
