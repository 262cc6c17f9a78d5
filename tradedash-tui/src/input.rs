//! Keyboard input dispatch: global keys → panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, FilterRow, Panel};

const PAGE_JUMP: isize = 10;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            if let Some(panel) = Panel::from_index(index) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('t') => {
            app.toggle_theme();
            return;
        }
        KeyCode::Char('r') => {
            app.request_vault_refresh();
            return;
        }
        KeyCode::Char('s') => {
            app.cycle_sort(1);
            return;
        }
        KeyCode::Char('S') => {
            app.cycle_sort(-1);
            return;
        }
        KeyCode::Char('R') => {
            app.reset_filters();
            return;
        }
        KeyCode::Char('x') => {
            app.remove_focused_filter();
            return;
        }
        _ => {}
    }

    // 2. Panel-specific keys.
    match app.active_panel {
        Panel::Positions => handle_positions_key(app, key),
        Panel::Filters => handle_filters_key(app, key),
        Panel::Overview | Panel::Vault | Panel::Help => {}
    }
}

fn handle_positions_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_position(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_position(-1),
        KeyCode::PageDown => app.move_position(PAGE_JUMP),
        KeyCode::PageUp => app.move_position(-PAGE_JUMP),
        KeyCode::Char('g') | KeyCode::Home => app.move_position(isize::MIN / 2),
        _ => {}
    }
}

fn handle_filters_key(app: &mut AppState, key: KeyEvent) {
    let rows = FilterRow::ALL.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.filter_cursor + 1 < rows {
                app.filter_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.filter_cursor = app.filter_cursor.saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left => cycle_focused(app, -1),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => cycle_focused(app, 1),
        _ => {}
    }
}

fn cycle_focused(app: &mut AppState, step: isize) {
    match app.filter_row() {
        FilterRow::Filter(key) => app.cycle_filter(key, step),
        FilterRow::Sort => app.cycle_sort(step),
    }
}
