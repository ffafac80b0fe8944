use std::time::Instant;

use color_eyre::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tracing::{debug, info, warn};
use tui_input::{backend::crossterm::EventHandler, Input};

use user_form::{
    messages,
    user_info::{ADDRESS, ADDRESS_FIELDS, CONFIRM_EMAIL, EMAIL_ADDRESS, FIRST_NAME, LAST_NAME},
    FieldId, FormError, FormEvent, UserInfoForm,
};

use super::Component;
use crate::{
    action::Action,
    tui::{EventResponse, Frame},
};

/// Where a row's error text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
    /// Debounced message slot of a tracked input.
    Tracked(FieldId),
    /// Email / confirm-email mismatch.
    EmailGroup,
    /// Phone entry at `index`, resolved directly from its own state.
    Phone(usize),
    None,
}

/// One editable line of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub path: String,
    pub label: String,
    pub error: RowError,
}

impl Row {
    fn new(path: impl Into<String>, label: impl Into<String>, error: RowError) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            error,
        }
    }
}

/// Flatten the form tree into display order. Phone rows follow the current list length.
pub fn rows(form: &UserInfoForm) -> Vec<Row> {
    let mut rows = vec![
        Row::new(FIRST_NAME, "First Name", RowError::Tracked(FieldId::FirstName)),
        Row::new(LAST_NAME, "Last Name", RowError::Tracked(FieldId::LastName)),
        Row::new(
            EMAIL_ADDRESS,
            "Email Address",
            RowError::Tracked(FieldId::EmailAddress),
        ),
        Row::new(CONFIRM_EMAIL, "Confirm Email", RowError::EmailGroup),
    ];
    for i in 0..form.phone_count() {
        rows.push(Row::new(
            format!("phoneNumbers.{i}"),
            format!("Phone Number {}", i + 1),
            RowError::Phone(i),
        ));
    }
    for key in ADDRESS_FIELDS {
        rows.push(Row::new(
            format!("{ADDRESS}.{key}"),
            humanize(key),
            RowError::None,
        ));
    }
    rows
}

/// `houseNo` -> `House No`
fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

pub struct FormPage {
    form: UserInfoForm,
    rows: Vec<Row>,
    focused: usize,
    input: Input,
    status: String,
    submitted: Option<serde_json::Value>,
}

impl FormPage {
    pub fn new(form: UserInfoForm) -> Self {
        let rows = rows(&form);
        let mut page = Self {
            form,
            rows,
            focused: 0,
            input: Input::default(),
            status: String::new(),
            submitted: None,
        };
        page.load_input();
        page
    }

    pub fn form(&self) -> &UserInfoForm {
        &self.form
    }

    pub fn focused_path(&self) -> Option<&str> {
        self.rows.get(self.focused).map(|r| r.path.as_str())
    }

    /// Snapshot of the last successful submit.
    pub fn submitted(&self) -> Option<&serde_json::Value> {
        self.submitted.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn load_input(&mut self) {
        let value = self
            .focused_path()
            .and_then(|p| self.form.value(p).ok())
            .unwrap_or_default()
            .to_string();
        self.input = Input::default().with_value(value);
    }

    fn blur_focused(&mut self) -> Result<()> {
        if let Some(path) = self.focused_path().map(str::to_string) {
            self.form.handle(FormEvent::blur(path), Instant::now())?;
        }
        Ok(())
    }

    fn move_focus(&mut self, forward: bool) -> Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        self.blur_focused()?;
        let len = self.rows.len();
        self.focused = if forward {
            (self.focused + 1) % len
        } else {
            (self.focused + len - 1) % len
        };
        self.load_input();
        Ok(())
    }

    /// Rebuild rows after the phone list changed, keeping focus on the same path when possible.
    fn refresh_rows(&mut self) {
        let path = self.focused_path().map(str::to_string);
        self.rows = rows(&self.form);
        self.focused = path
            .and_then(|p| self.rows.iter().position(|r| r.path == p))
            .unwrap_or_else(|| self.focused.min(self.rows.len().saturating_sub(1)));
        self.load_input();
    }

    fn edit_focused(&mut self) -> Result<()> {
        if let Some(path) = self.focused_path().map(str::to_string) {
            let value = self.input.value().to_string();
            self.form.handle(FormEvent::edit(path, value), Instant::now())?;
        }
        Ok(())
    }

    fn submit(&mut self) -> Result<()> {
        match self.form.submit() {
            Ok(json) => {
                info!("submitted user info");
                self.status = format!("Submitted: {json}");
                self.submitted = Some(json);
            }
            Err(FormError::Invalid { fields }) => {
                debug!(?fields, "submit rejected");
                self.status = format!("{} field(s) need attention", fields.len());
                self.submitted = None;
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }

    fn row_error(&self, row: &Row) -> String {
        match row.error {
            RowError::Tracked(id) => self.form.error_message(id).to_string(),
            RowError::EmailGroup => self.form.email_group_error().to_string(),
            RowError::Phone(i) => {
                if self.form.config().phone_debounce {
                    // one message for the whole list, shown under the first entry
                    if i == 0 {
                        self.form.error_message(FieldId::PhoneNumbers).to_string()
                    } else {
                        String::new()
                    }
                } else {
                    self.form
                        .root()
                        .field(&row.path)
                        .map(|field| {
                            messages::display(
                                FieldId::PhoneNumbers,
                                field,
                                messages::default_mode(FieldId::PhoneNumbers),
                            )
                        })
                        .unwrap_or_default()
                }
            }
            RowError::None => String::new(),
        }
    }
}

impl Component for FormPage {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<EventResponse<Action>>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Char('z') if ctrl => Action::Suspend,
            KeyCode::Char('s') if ctrl => Action::Submit,
            KeyCode::Char('r') if ctrl => Action::Reset,
            KeyCode::Char('n') if ctrl => Action::AddPhone,
            KeyCode::Char('d') if ctrl => Action::RemovePhone,
            KeyCode::Enter if self.focused + 1 == self.rows.len() => Action::Submit,
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => Action::FocusNext,
            KeyCode::BackTab | KeyCode::Up => Action::FocusPrev,
            _ => {
                if self.input.handle_event(&CrosstermEvent::Key(key)).is_some() {
                    self.edit_focused()?;
                }
                return Ok(Some(EventResponse::Stop(Action::Render)));
            }
        };
        Ok(Some(EventResponse::Stop(action)))
    }

    fn handle_paste(&mut self, text: String) -> Result<Option<EventResponse<Action>>> {
        let value = format!("{}{}", self.input.value(), text.trim_end_matches(['\r', '\n']));
        self.input = Input::default().with_value(value);
        self.edit_focused()?;
        Ok(Some(EventResponse::Stop(Action::Render)))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                for report in self.form.on_tick(Instant::now()) {
                    debug!(field = %report.field, message = %report.message, "debounced validation");
                }
            }
            Action::FocusNext => self.move_focus(true)?,
            Action::FocusPrev => self.move_focus(false)?,
            Action::AddPhone => {
                self.form.handle(FormEvent::AddPhone, Instant::now())?;
                self.refresh_rows();
            }
            Action::RemovePhone => {
                if !self.form.remove_phone()? {
                    self.status = "At least one phone number is required".into();
                }
                self.refresh_rows();
            }
            Action::Reset => {
                self.form.handle(FormEvent::Reset, Instant::now())?;
                self.status.clear();
                self.submitted = None;
                self.focused = 0;
                self.refresh_rows();
            }
            Action::Submit => self.submit()?,
            Action::Status(text) => self.status = text,
            Action::Error(err) => {
                warn!("{err}");
                self.status = err;
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [body, footer] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" User Info ");
        let inner = block.inner(body);

        let label_width = self.rows.iter().map(|r| r.label.len()).max().unwrap_or(0) + 2;
        let mut lines: Vec<Line> = Vec::new();
        let mut cursor_line = 0usize;
        for (idx, row) in self.rows.iter().enumerate() {
            let focused = idx == self.focused;
            let value = if focused {
                cursor_line = lines.len();
                self.input.value().to_string()
            } else {
                self.form.value(&row.path).unwrap_or_default().to_string()
            };
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if focused { "> " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{:<label_width$}", row.label), label_style),
                Span::raw(value),
            ]));

            let error = self.row_error(row);
            if !error.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {error}"),
                    Style::default().fg(Color::Red),
                )));
            }
        }

        let height = inner.height as usize;
        let scroll = if height > 0 && cursor_line >= height {
            cursor_line + 1 - height
        } else {
            0
        };
        f.render_widget(
            Paragraph::new(lines).block(block).scroll((scroll as u16, 0)),
            body,
        );

        // 2 for the focus marker
        let x = inner.x + 2 + label_width as u16 + self.input.visual_cursor() as u16;
        let y = inner.y + (cursor_line - scroll) as u16;
        if x < inner.right() && y < inner.bottom() {
            f.set_cursor_position((x, y));
        }

        let help = "Tab/↓ next  Shift+Tab/↑ prev  Ctrl+N add phone  Ctrl+D remove phone  Ctrl+S submit  Ctrl+R reset  Esc quit";
        let footer_text = if self.status.is_empty() {
            vec![Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)))]
        } else {
            vec![
                Line::from(self.status.as_str()),
                Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
            ]
        };
        f.render_widget(
            Paragraph::new(footer_text)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::TOP)),
            footer,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use user_form::FormConfig;

    fn page() -> FormPage {
        FormPage::new(UserInfoForm::new(FormConfig::default()).expect("form builds"))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn dispatch(page: &mut FormPage, key: KeyEvent) {
        if let Some(EventResponse::Stop(action)) = page.handle_key_events(key).expect("key") {
            page.update(action).expect("update");
        }
    }

    #[test]
    fn rows_follow_form_layout() {
        let p = page();
        let paths: Vec<&str> = p.rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(&paths[..5], &[
            FIRST_NAME,
            LAST_NAME,
            EMAIL_ADDRESS,
            CONFIRM_EMAIL,
            "phoneNumbers.0"
        ]);
        assert_eq!(paths.len(), 5 + ADDRESS_FIELDS.len());
        assert_eq!(p.rows[5].label, "Land Mark");
    }

    #[test]
    fn humanize_splits_camel_case() {
        assert_eq!(humanize("houseNo"), "House No");
        assert_eq!(humanize("city"), "City");
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut p = page();
        for c in "Ann".chars() {
            dispatch(&mut p, key(KeyCode::Char(c)));
        }
        assert_eq!(p.form().value(FIRST_NAME).ok(), Some("Ann"));
        assert!(p.form().is_pending(FieldId::FirstName));

        dispatch(&mut p, key(KeyCode::Tab));
        assert_eq!(p.focused_path(), Some(LAST_NAME));
        assert!(p.form().root().field(FIRST_NAME).expect("field").is_touched());
    }

    #[test]
    fn phone_rows_grow_and_shrink() {
        let mut p = page();
        dispatch(&mut p, ctrl('n'));
        assert_eq!(p.form().phone_count(), 2);
        assert!(p.rows.iter().any(|r| r.path == "phoneNumbers.1"));

        dispatch(&mut p, ctrl('d'));
        dispatch(&mut p, ctrl('d'));
        assert_eq!(p.form().phone_count(), 1);
        assert_eq!(p.status(), "At least one phone number is required");
    }

    #[test]
    fn submit_on_empty_form_reports_invalid_fields() {
        let mut p = page();
        dispatch(&mut p, ctrl('s'));
        assert!(p.submitted().is_none());
        assert!(p.status().ends_with("field(s) need attention"));
        assert_eq!(p.row_error(&p.rows[0].clone()), "First Name field is required ");
    }

    #[test]
    fn enter_on_last_row_submits() {
        let mut p = page();
        dispatch(&mut p, key(KeyCode::BackTab));
        dispatch(&mut p, key(KeyCode::Enter));
        assert!(p.status().ends_with("field(s) need attention"));
    }

    #[test]
    fn focus_wraps_backwards() {
        let mut p = page();
        dispatch(&mut p, key(KeyCode::BackTab));
        assert_eq!(p.focused_path(), Some("address.society"));
    }
}
