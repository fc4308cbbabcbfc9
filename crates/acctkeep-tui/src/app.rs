//! Application state management.

use acctkeep_core::{
    AccountFormData, AccountStore, KeyValueStorage, RecordType, UpdateOutcome, ValidationError,
};
use std::collections::HashSet;

/// Application state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Accepting input.
    Running,
    /// Application should quit.
    Quit,
}

/// Input mode for the application.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Normal list navigation mode.
    Normal,
    /// Editing an account form.
    Editing,
    /// Search mode.
    Search,
}

/// A field of the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Label,
    RecordType,
    Login,
    Password,
}

impl FormField {
    /// Name used by validation errors for this field.
    pub fn name(self) -> &'static str {
        match self {
            FormField::Label => "label",
            FormField::RecordType => "recordType",
            FormField::Login => "login",
            FormField::Password => "password",
        }
    }

    /// Fields shown for the given record type, in tab order.
    pub fn visible(record_type: RecordType) -> &'static [FormField] {
        match record_type {
            RecordType::Local => &[
                FormField::Label,
                FormField::RecordType,
                FormField::Login,
                FormField::Password,
            ],
            RecordType::Ldap => &[FormField::Label, FormField::RecordType, FormField::Login],
        }
    }
}

/// An in-progress edit of one account.
#[derive(Debug, Clone)]
pub struct EditForm {
    pub data: AccountFormData,
    pub focus: FormField,
    /// The account was just created by `add`.
    pub is_new: bool,
}

impl EditForm {
    fn step_focus(&mut self, forward: bool) {
        let fields = FormField::visible(self.data.record_type);
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Label => Some(&mut self.data.label),
            FormField::Login => Some(&mut self.data.login),
            FormField::Password => Some(&mut self.data.password),
            FormField::RecordType => None,
        }
    }
}

/// A search result.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Id of the matched account.
    pub account_id: String,
    /// Text shown for the match.
    pub display: String,
    /// Match score for sorting.
    pub score: i64,
}

/// Main application model.
pub struct App<S> {
    /// Current application state.
    pub state: AppState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// The account store.
    pub store: AccountStore<S>,
    /// Index of the selected account in the list.
    pub selected_index: usize,
    /// Ids of accounts marked for bulk deletion.
    pub marked: HashSet<String>,
    /// The open edit form, if any.
    pub form: Option<EditForm>,
    /// Whether passwords are masked when rendered.
    pub mask_passwords: bool,
    /// One-line feedback for the last action.
    pub status_message: Option<String>,

    // Search state
    /// Search query.
    pub search_query: String,
    /// Search results.
    pub search_results: Vec<SearchResult>,
    /// Selected search result index.
    pub search_selected_index: usize,
}

impl<S: KeyValueStorage> App<S> {
    /// Create a new application instance around an initialized store.
    pub fn new(store: AccountStore<S>, mask_passwords: bool) -> Self {
        Self {
            state: AppState::Running,
            input_mode: InputMode::Normal,
            store,
            selected_index: 0,
            marked: HashSet::new(),
            form: None,
            mask_passwords,
            status_message: None,
            search_query: String::new(),
            search_results: Vec::new(),
            search_selected_index: 0,
        }
    }

    /// Id of the account under the cursor.
    pub fn selected_id(&self) -> Option<&str> {
        self.store
            .accounts()
            .get(self.selected_index)
            .map(|acc| acc.id.as_str())
    }

    /// Validation errors for the account being edited.
    pub fn form_errors(&self) -> &[ValidationError] {
        match self.form {
            Some(ref form) => self.store.validation_errors_for(&form.data.id),
            None => &[],
        }
    }

    /// Move selection up in the list.
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Move selection down in the list.
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.store.accounts().len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.store.accounts().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    /// Create an empty account and open it for editing.
    pub fn add_account(&mut self) {
        let id = self.store.add_account();
        self.selected_index = self.store.accounts().len() - 1;
        if let Some(account) = self.store.get_account_by_id(&id) {
            self.form = Some(EditForm {
                data: self.store.account_to_form_data(account),
                focus: FormField::Label,
                is_new: true,
            });
            self.input_mode = InputMode::Editing;
        }
    }

    /// Open the selected account for editing.
    pub fn edit_selected(&mut self) {
        let Some(account) = self.store.accounts().get(self.selected_index) else {
            return;
        };
        self.form = Some(EditForm {
            data: self.store.account_to_form_data(account),
            focus: FormField::Label,
            is_new: false,
        });
        self.input_mode = InputMode::Editing;
    }

    /// Delete the selected account.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return;
        };
        self.store.delete_account(&id);
        self.marked.remove(&id);
        self.clamp_selection();
        self.status_message = Some("Account deleted".to_string());
    }

    /// Toggle the bulk-delete mark on the selected account.
    pub fn toggle_mark(&mut self) {
        let Some(id) = self.selected_id().map(str::to_string) else {
            return;
        };
        if !self.marked.remove(&id) {
            self.marked.insert(id);
        }
    }

    /// Delete every marked account.
    pub fn delete_marked(&mut self) {
        if self.marked.is_empty() {
            self.status_message = Some("No accounts marked".to_string());
            return;
        }
        let ids: Vec<String> = self.marked.drain().collect();
        self.store.bulk_delete_accounts(&ids);
        self.clamp_selection();
        self.status_message = Some(format!("Deleted {} accounts", ids.len()));
    }

    /// Type a character into the focused form field.
    pub fn form_input(&mut self, c: char) {
        let Some(ref mut form) = self.form else {
            return;
        };
        if form.focus == FormField::RecordType {
            if c == ' ' {
                form.data.record_type = form.data.record_type.toggled();
            }
        } else if let Some(text) = form.focused_text() {
            text.push(c);
        }
    }

    /// Delete the last character of the focused form field.
    pub fn form_backspace(&mut self) {
        if let Some(text) = self.form.as_mut().and_then(EditForm::focused_text) {
            text.pop();
        }
    }

    /// Move form focus to the next (or previous) visible field.
    pub fn form_step(&mut self, forward: bool) {
        if let Some(ref mut form) = self.form {
            form.step_focus(forward);
        }
    }

    /// Flip the record type when it is focused.
    pub fn toggle_record_type(&mut self) {
        if let Some(ref mut form) = self.form {
            if form.focus == FormField::RecordType {
                form.data.record_type = form.data.record_type.toggled();
            }
        }
    }

    /// Submit the form to the store. Returns true when it was saved.
    pub fn submit_form(&mut self) -> bool {
        let Some(form) = self.form.as_ref() else {
            return false;
        };
        match self.store.update_account(&form.data) {
            UpdateOutcome::Updated => {
                self.status_message = Some("Account saved".to_string());
                self.close_form();
                true
            }
            UpdateOutcome::Invalid(errors) => {
                self.status_message = Some(format!("{} field(s) need attention", errors.len()));
                false
            }
            UpdateOutcome::NotFound => {
                self.status_message = Some("Account no longer exists".to_string());
                self.close_form();
                false
            }
        }
    }

    /// Abandon the form and its validation errors.
    pub fn cancel_form(&mut self) {
        if let Some(ref form) = self.form {
            self.store.clear_validation_errors(&form.data.id);
        }
        self.close_form();
    }

    fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    /// Start search mode.
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_query.clear();
        self.search_results.clear();
        self.search_selected_index = 0;
    }

    /// Exit search mode.
    pub fn exit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_query.clear();
        self.search_results.clear();
    }

    /// Perform fuzzy search over labels and logins.
    pub fn perform_search(&mut self) {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        self.search_results.clear();

        if self.search_query.trim().is_empty() {
            return;
        }

        let matcher = SkimMatcherV2::default();

        let mut scored: Vec<_> = self
            .store
            .accounts()
            .iter()
            .filter_map(|acc| {
                let display = format!("{} {}", acc.login, acc.label_text());
                matcher
                    .fuzzy_match(&display, &self.search_query)
                    .map(|score| SearchResult {
                        account_id: acc.id.clone(),
                        display,
                        score,
                    })
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        self.search_results = scored.into_iter().take(10).collect();
        self.search_selected_index = 0;
    }

    /// Select a search result.
    pub fn select_search_result(&mut self) {
        let Some(result) = self.search_results.get(self.search_selected_index) else {
            return;
        };

        if let Some(index) = self
            .store
            .accounts()
            .iter()
            .position(|acc| acc.id == result.account_id)
        {
            self.selected_index = index;
        }

        self.exit_search();
    }
}
