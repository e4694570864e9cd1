use vi_numeric::host::LogNotifier;
use vi_numeric::{
    FieldType, FieldValue, FocusEffect, Key, KeyAction, MemoryRecord, NumberStyle, NumericField,
};

const FIELD_NAME: &str = "value";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditStep {
    pub event: String,
    pub action: String,
    pub text: String,
    pub record: String,
}

/// A text input holding a [`NumericField`], with just enough caret handling
/// to replay key presses typed at the end of the text.
struct Session {
    field: NumericField,
    record: MemoryRecord,
    selected: bool,
    steps: Vec<EditStep>,
}

impl Session {
    fn record_step(&mut self, event: &str, action: &str) {
        let record = self
            .record
            .get(FIELD_NAME)
            .map_or_else(|| "unset".to_string(), |value| value.as_f64().to_string());
        self.steps.push(EditStep {
            event: event.to_string(),
            action: action.to_string(),
            text: self.field.text().to_string(),
            record,
        });
    }

    fn focus(&mut self) {
        self.selected = self.field.on_focus() == FocusEffect::SelectAll;
        self.record_step("focus", "-");
    }

    fn blur(&mut self, event: &str, action: &str) {
        self.field.on_blur(&mut self.record, &LogNotifier);
        self.selected = false;
        self.record_step(event, action);
    }

    fn edit_text(&mut self, edit: impl FnOnce(&mut String)) {
        let mut text = if self.selected {
            String::new()
        } else {
            self.field.text().to_string()
        };
        edit(&mut text);
        self.selected = false;
        self.field.on_input(&text);
    }

    fn press(&mut self, key: &Key, readonly: bool) {
        if !readonly && !self.field.is_focused() {
            self.focus();
        }

        let event = key.to_string();
        match self.field.on_keydown(key) {
            KeyAction::Insert => {
                if let Key::Char(ch) = key {
                    let ch = *ch;
                    self.edit_text(|text| text.push(ch));
                }
                self.record_step(&event, "insert");
            }
            KeyAction::Commit => self.blur(&event, "commit"),
            KeyAction::Reject => self.record_step(&event, "reject"),
            KeyAction::Pass => {
                if !readonly {
                    match key {
                        Key::Backspace => self.edit_text(|text| {
                            text.pop();
                        }),
                        Key::Delete if self.selected => self.edit_text(String::clear),
                        Key::Tab => return self.blur(&event, "pass"),
                        _ => self.selected = false,
                    }
                }
                self.record_step(&event, "pass");
            }
        }
    }
}

pub fn replay(
    style: NumberStyle,
    field_type: FieldType,
    initial: FieldValue,
    readonly: bool,
    keys: &[Key],
) -> Vec<EditStep> {
    let mut record = MemoryRecord::new();
    if let FieldValue::Set(value) = initial {
        record = record.with_value(FIELD_NAME, field_type.coerce(value));
    }

    let mut session = Session {
        field: NumericField::new(FIELD_NAME, field_type)
            .with_style(style)
            .readonly(readonly),
        record,
        selected: false,
        steps: Vec::new(),
    };
    session.field.on_mounted(&session.record);
    session.record_step("mount", "-");

    for key in keys {
        session.press(key, readonly);
    }
    if session.field.is_focused() {
        session.blur("(leave)", "commit");
    }
    session.steps
}
