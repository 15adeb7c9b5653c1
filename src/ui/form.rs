use crossterm::event::{KeyCode, KeyEvent};

use crate::ui::line_input::{InputResult, LineInput};

pub const PROCESSING: &str = "Processing...";
pub const MISSING_FIELDS: &str = "Please fill in all fields";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
}

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            FormKind::Login => "Log In",
            FormKind::Register => "Sign Up",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Submit,
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormStatus {
    pub message: String,
    pub is_error: bool,
}

pub struct FormField {
    pub label: &'static str,
    pub input: LineInput,
}

pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focused: usize,
    pub status: Option<FormStatus>,
    /// Set while a request is in flight; edits are ignored until it settles.
    pub pending: bool,
}

impl Form {
    pub fn login() -> Self {
        Self::with_fields(
            FormKind::Login,
            vec![
                FormField { label: "Username", input: LineInput::new("") },
                FormField { label: "Password", input: LineInput::new("").masked() },
            ],
        )
    }

    pub fn register() -> Self {
        Self::with_fields(
            FormKind::Register,
            vec![
                FormField { label: "Full Name", input: LineInput::new("") },
                FormField { label: "Username", input: LineInput::new("") },
                FormField { label: "Password", input: LineInput::new("").masked() },
            ],
        )
    }

    fn with_fields(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            fields,
            focused: 0,
            status: None,
            pending: false,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.input.value()).unwrap_or("")
    }

    pub fn values(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| f.input.value().trim().to_string())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(|f| !f.input.value().trim().is_empty())
    }

    pub fn handle(&mut self, key: KeyEvent) -> FormAction {
        if self.pending {
            return match key.code {
                KeyCode::Esc => FormAction::Cancel,
                _ => FormAction::Continue,
            };
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                FormAction::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                FormAction::Continue
            }
            _ => {
                let Some(field) = self.fields.get_mut(self.focused) else {
                    return FormAction::Continue;
                };
                match field.input.handle(key) {
                    InputResult::Continue => FormAction::Continue,
                    InputResult::Cancel => FormAction::Cancel,
                    InputResult::Submit if self.is_complete() => {
                        self.pending = true;
                        self.set_status(PROCESSING, false);
                        FormAction::Submit
                    }
                    InputResult::Submit => {
                        self.set_status(MISSING_FIELDS, true);
                        FormAction::Continue
                    }
                }
            }
        }
    }

    pub fn set_status(&mut self, message: &str, is_error: bool) {
        self.status = Some(FormStatus {
            message: message.to_string(),
            is_error,
        });
    }

    /// Settle an in-flight request with the server's message.
    pub fn finish(&mut self, message: &str, success: bool) {
        self.pending = false;
        self.set_status(message, !success);
    }

    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.input.clear();
        }
        self.focused = 0;
        self.status = None;
        self.pending = false;
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut Form, text: &str) {
        for ch in text.chars() {
            form.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut form = Form::register();
        form.handle(key(KeyCode::Tab));
        form.handle(key(KeyCode::Tab));
        assert_eq!(form.focused, 2);
        form.handle(key(KeyCode::Tab));
        assert_eq!(form.focused, 0);
        form.handle(key(KeyCode::BackTab));
        assert_eq!(form.focused, 2);
    }

    #[test]
    fn test_password_field_is_masked() {
        let form = Form::login();
        assert!(!form.fields[0].input.is_masked());
        assert!(form.fields[1].input.is_masked());
    }

    #[test]
    fn test_incomplete_submit_is_rejected() {
        let mut form = Form::login();
        type_str(&mut form, "ada");
        assert_eq!(form.handle(key(KeyCode::Enter)), FormAction::Continue);
        assert!(!form.pending);
        assert_eq!(
            form.status,
            Some(FormStatus { message: MISSING_FIELDS.to_string(), is_error: true })
        );
    }

    #[test]
    fn test_submit_goes_pending_until_finished() {
        let mut form = Form::login();
        type_str(&mut form, "ada");
        form.handle(key(KeyCode::Tab));
        type_str(&mut form, "secret");
        assert_eq!(form.handle(key(KeyCode::Enter)), FormAction::Submit);
        assert!(form.pending);
        assert_eq!(form.status.as_ref().map(|s| s.message.as_str()), Some(PROCESSING));

        // Typing is ignored while pending.
        type_str(&mut form, "zzz");
        assert_eq!(form.value(1), "secret");

        form.finish("Invalid credentials", false);
        assert!(!form.pending);
        assert_eq!(form.status.as_ref().map(|s| s.is_error), Some(true));
        assert_eq!(form.values(), vec!["ada".to_string(), "secret".to_string()]);
    }

    #[test]
    fn test_esc_cancels_even_when_pending() {
        let mut form = Form::login();
        form.pending = true;
        assert_eq!(form.handle(key(KeyCode::Esc)), FormAction::Cancel);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = Form::register();
        type_str(&mut form, "Ada");
        form.set_status("oops", true);
        form.reset();
        assert_eq!(form.value(0), "");
        assert!(form.status.is_none());
    }
}
