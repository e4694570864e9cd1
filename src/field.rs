//! The nullable numeric field widget.
//!
//! The host calls the lifecycle and event methods; the widget keeps the text
//! shown in the input and writes parsed values back into the record.

use tracing::{debug, warn};

use crate::codec::FieldValue;
use crate::host::{FieldType, Notifier, Record, Severity};
use crate::keys::{Key, KeyAction};
use crate::style::NumberStyle;

/// Side effect the host should apply after a focus event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEffect {
    SelectAll,
    None,
}

#[derive(Debug, Clone)]
pub struct NumericField {
    name: String,
    field_type: FieldType,
    style: NumberStyle,
    readonly: bool,
    focused: bool,
    text: String,
}

impl NumericField {
    #[must_use]
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            style: NumberStyle::default(),
            readonly: false,
            focused: false,
            text: String::new(),
        }
    }

    #[must_use]
    pub const fn with_style(mut self, style: NumberStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub const fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Text currently in the input element.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self, record: &dyn Record) -> FieldValue {
        record.value(&self.name)
    }

    pub fn formatted_value(&self, record: &dyn Record) -> String {
        self.style.format(self.value(record))
    }

    pub fn on_mounted(&mut self, record: &dyn Record) {
        self.refresh(record);
    }

    pub fn on_patched(&mut self, record: &dyn Record) {
        self.refresh(record);
    }

    pub fn on_focus(&mut self) -> FocusEffect {
        if self.readonly {
            return FocusEffect::None;
        }
        self.focused = true;
        FocusEffect::SelectAll
    }

    /// The input element's text changed while the user was typing.
    pub fn on_input(&mut self, text: &str) {
        if self.readonly {
            return;
        }
        text.clone_into(&mut self.text);
    }

    /// Filters a keystroke. [`KeyAction::Commit`] means the host should blur
    /// the input, which lands in [`Self::on_blur`].
    #[must_use]
    pub fn on_keydown(&self, key: &Key) -> KeyAction {
        if self.readonly {
            return KeyAction::Pass;
        }
        key.action()
    }

    pub fn on_change(&mut self, record: &mut dyn Record, notifier: &dyn Notifier) {
        if self.readonly {
            return;
        }
        self.commit(record, notifier);
    }

    pub fn on_blur(&mut self, record: &mut dyn Record, notifier: &dyn Notifier) {
        if self.readonly {
            return;
        }
        self.focused = false;
        self.commit(record, notifier);
        self.text = self.formatted_value(record);
    }

    fn refresh(&mut self, record: &dyn Record) {
        if !self.focused {
            self.text = self.formatted_value(record);
        }
    }

    fn commit(&self, record: &mut dyn Record, notifier: &dyn Notifier) {
        let parsed = self.style.parse_outcome(&self.text);
        let value = self.field_type.coerce(parsed.value);
        debug!(field = %self.name, text = %self.text, kind = parsed.kind.label(), ?value, "commit");

        if let Err(err) = record.update(&self.name, value) {
            warn!(field = %self.name, error = %format!("{err:#}"), "record update failed");
            notifier.notify(
                &format!("Could not save {}: {err:#}", self.name),
                Severity::Danger,
            );
        }
    }
}
