//! Keyboard event handling.

use crate::app::{App, AppState, InputMode};
use acctkeep_core::KeyValueStorage;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key<S: KeyValueStorage>(app: &mut App<S>, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Editing => handle_form_key(app, key),
        InputMode::Search => handle_search_key(app, key),
    }
}

fn handle_normal_key<S: KeyValueStorage>(app: &mut App<S>, key: KeyEvent) -> bool {
    // Ctrl+C to quit
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.state = AppState::Quit;
        return true;
    }

    // Ctrl+P to search
    if key.code == KeyCode::Char('p') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.start_search();
        return false;
    }

    app.status_message = None;

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quit;
            true
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
            false
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
            false
        }
        KeyCode::Char('a') => {
            app.add_account();
            false
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            app.edit_selected();
            false
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.delete_selected();
            false
        }
        KeyCode::Char(' ') => {
            app.toggle_mark();
            false
        }
        KeyCode::Char('D') => {
            app.delete_marked();
            false
        }
        KeyCode::Char('/') => {
            app.start_search();
            false
        }
        _ => false,
    }
}

fn handle_form_key<S: KeyValueStorage>(app: &mut App<S>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.cancel_form();
            false
        }
        KeyCode::Enter => {
            app.submit_form();
            false
        }
        KeyCode::Tab | KeyCode::Down => {
            app.form_step(true);
            false
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form_step(false);
            false
        }
        KeyCode::Left | KeyCode::Right => {
            app.toggle_record_type();
            false
        }
        KeyCode::Char(c) => {
            app.form_input(c);
            false
        }
        KeyCode::Backspace => {
            app.form_backspace();
            false
        }
        _ => false,
    }
}

fn handle_search_key<S: KeyValueStorage>(app: &mut App<S>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.exit_search();
            false
        }
        KeyCode::Enter => {
            app.select_search_result();
            false
        }
        KeyCode::Up => {
            if app.search_selected_index > 0 {
                app.search_selected_index -= 1;
            }
            false
        }
        KeyCode::Down => {
            if app.search_selected_index + 1 < app.search_results.len() {
                app.search_selected_index += 1;
            }
            false
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.perform_search();
            false
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.perform_search();
            false
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acctkeep_core::{AccountStore, MemoryStorage, RecordType};

    fn press(app: &mut App<MemoryStorage>, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App<MemoryStorage>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn add_edit_and_save_via_keys() {
        let mut app = App::new(AccountStore::new(MemoryStorage::new()), true);

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "ops");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "svc-user");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        let account = &app.store.accounts()[0];
        assert_eq!(account.record_type, RecordType::Ldap);
        assert_eq!(account.login, "svc-user");
        assert_eq!(account.label_text(), "ops");
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        let mut app = App::new(AccountStore::new(MemoryStorage::new()), true);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::Quit);

        let mut app = App::new(AccountStore::new(MemoryStorage::new()), true);
        assert!(handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
    }

    #[test]
    fn q_is_text_while_editing() {
        let mut app = App::new(AccountStore::new(MemoryStorage::new()), true);
        press(&mut app, KeyCode::Char('a'));

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.form.as_ref().unwrap().data.label, "q");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.as_ref().unwrap().data.label, "");
    }
}
