//! Nullable numeric field codec with Vietnamese number formatting.
//!
//! ```
//! use vi_numeric::{format_value, parse_text};
//!
//! assert_eq!(format_value(0.055), "5,50%");
//! assert_eq!(format_value(1234.5), "1.234,5");
//! assert!((parse_text("1.234,5") - 1234.5).abs() < 1e-9);
//! ```

pub mod codec;
pub mod field;
pub mod host;
pub mod keys;
pub mod registry;
pub mod style;

pub use codec::{FieldValue, ParseKind, Parsed, format_value, parse_text};
pub use field::{FocusEffect, NumericField};
pub use host::{FieldType, MemoryRecord, Notifier, OrmRecord, OrmService, Record, RecordValue, Severity};
pub use keys::{Key, KeyAction};
pub use registry::{FieldCodec, FieldDescriptor, FieldRegistry};
pub use style::NumberStyle;
