//! Modal dialog state and input handling.

use crossterm::event::{KeyCode, KeyModifiers};

use crate::prompt::{Confirmation, Menu};

/// What a key press did to a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction<T> {
    /// Keep showing the modal.
    Continue,
    /// Close the modal with a result.
    Close(T),
}

/// State for the menu picker.
#[derive(Debug, Clone)]
pub struct PickerState {
    pub menu: Menu,
    /// Text typed to narrow the list.
    pub filter: String,
    /// Indices into `menu.items` that match the filter, in menu order.
    pub visible: Vec<usize>,
    /// Position within `visible`.
    pub selected: usize,
    /// First visible row of the list.
    pub scroll_offset: usize,
}

impl PickerState {
    pub fn new(menu: &Menu) -> Self {
        let visible = (0..menu.items.len()).collect();
        Self {
            menu: menu.clone(),
            filter: String::new(),
            visible,
            selected: 0,
            scroll_offset: 0,
        }
    }

    /// Recompute the visible items after the filter changed.
    fn apply_filter(&mut self) {
        let previous = self.selected_index();
        self.visible = self
            .menu
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.matches(&self.filter))
            .map(|(i, _)| i)
            .collect();
        self.selected = previous
            .and_then(|idx| self.visible.iter().position(|&v| v == idx))
            .unwrap_or(0);
        self.scroll_offset = 0;
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.apply_filter();
    }

    pub fn pop_filter(&mut self) {
        if self.filter.pop().is_some() {
            self.apply_filter();
        }
    }

    pub fn clear_filter(&mut self) {
        if !self.filter.is_empty() {
            self.filter.clear();
            self.apply_filter();
        }
    }

    /// Index into `menu.items` of the highlighted item.
    pub fn selected_index(&self) -> Option<usize> {
        self.visible.get(self.selected).copied()
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_next(&mut self) {
        if !self.visible.is_empty() && self.selected < self.visible.len() - 1 {
            self.selected += 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    /// Ensure selected item is visible, adjusting scroll_offset if needed.
    pub fn ensure_visible(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected - visible_height + 1;
        }
    }
}

/// Handle keyboard input for the picker. Closes with the chosen item index, or `None` on Esc.
pub fn handle_picker_input(
    state: &mut PickerState,
    key_code: KeyCode,
    modifiers: KeyModifiers,
) -> ModalAction<Option<usize>> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match key_code {
            KeyCode::Char('c') => ModalAction::Close(None),
            KeyCode::Char('u') => {
                state.clear_filter();
                ModalAction::Continue
            }
            KeyCode::Char('p') => {
                state.select_prev();
                ModalAction::Continue
            }
            KeyCode::Char('n') => {
                state.select_next();
                ModalAction::Continue
            }
            _ => ModalAction::Continue,
        };
    }

    match key_code {
        KeyCode::Esc => {
            // First Esc clears an active filter, second dismisses.
            if state.filter.is_empty() {
                ModalAction::Close(None)
            } else {
                state.clear_filter();
                ModalAction::Continue
            }
        }
        KeyCode::Enter => match state.selected_index() {
            Some(index) => ModalAction::Close(Some(index)),
            None => ModalAction::Continue,
        },
        KeyCode::Up => {
            state.select_prev();
            ModalAction::Continue
        }
        KeyCode::Down | KeyCode::Tab => {
            state.select_next();
            ModalAction::Continue
        }
        KeyCode::BackTab => {
            state.select_prev();
            ModalAction::Continue
        }
        KeyCode::Home => {
            state.select_first();
            ModalAction::Continue
        }
        KeyCode::End => {
            state.select_last();
            ModalAction::Continue
        }
        KeyCode::Backspace => {
            state.pop_filter();
            ModalAction::Continue
        }
        KeyCode::Char(c) => {
            state.push_filter(c);
            ModalAction::Continue
        }
        _ => ModalAction::Continue,
    }
}

/// Which button is focused in the confirm modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmField {
    AcceptButton,
    RejectButton,
}

impl ConfirmField {
    pub fn next(self) -> Self {
        match self {
            Self::AcceptButton => Self::RejectButton,
            Self::RejectButton => Self::AcceptButton,
        }
    }

    pub fn prev(self) -> Self {
        self.next() // Only two options, so prev == next
    }
}

/// State for the confirm modal.
#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub request: Confirmation,
    pub focus: ConfirmField,
}

impl ConfirmState {
    /// Focus starts on the reject button so a stray Enter never overwrites anything.
    pub fn new(request: &Confirmation) -> Self {
        Self {
            request: request.clone(),
            focus: ConfirmField::RejectButton,
        }
    }
}

/// Handle keyboard input for the confirm modal.
pub fn handle_confirm_input(
    state: &mut ConfirmState,
    key_code: KeyCode,
    modifiers: KeyModifiers,
) -> ModalAction<bool> {
    match key_code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => ModalAction::Close(false),
        KeyCode::Tab | KeyCode::Right => {
            state.focus = state.focus.next();
            ModalAction::Continue
        }
        KeyCode::BackTab | KeyCode::Left => {
            state.focus = state.focus.prev();
            ModalAction::Continue
        }
        KeyCode::Enter => ModalAction::Close(state.focus == ConfirmField::AcceptButton),
        KeyCode::Char('y') | KeyCode::Char('Y') => ModalAction::Close(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ModalAction::Close(false),
        _ => ModalAction::Continue,
    }
}

/// State for the read-only document viewer.
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub title: String,
    pub lines: Vec<String>,
    pub scroll_offset: usize,
    /// Rows available for text, updated on every draw.
    pub page_height: usize,
}

impl ViewerState {
    pub fn new(title: impl Into<String>, text: &str) -> Self {
        Self {
            title: title.into(),
            lines: text.lines().map(String::from).collect(),
            scroll_offset: 0,
            page_height: 1,
        }
    }

    pub fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.page_height)
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = (self.scroll_offset + amount).min(self.max_scroll());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }
}

/// Handle keyboard input for the viewer. Closes on `q` or Esc.
pub fn handle_viewer_input(
    state: &mut ViewerState,
    key_code: KeyCode,
    modifiers: KeyModifiers,
) -> ModalAction<()> {
    let page = state.page_height.max(1);
    match key_code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => ModalAction::Close(()),
        KeyCode::Esc | KeyCode::Char('q') => ModalAction::Close(()),
        KeyCode::Up | KeyCode::Char('k') => {
            state.scroll_up(1);
            ModalAction::Continue
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.scroll_down(1);
            ModalAction::Continue
        }
        KeyCode::PageUp => {
            state.scroll_up(page);
            ModalAction::Continue
        }
        KeyCode::PageDown | KeyCode::Char(' ') => {
            state.scroll_down(page);
            ModalAction::Continue
        }
        KeyCode::Home | KeyCode::Char('g') => {
            state.scroll_to_top();
            ModalAction::Continue
        }
        KeyCode::End | KeyCode::Char('G') => {
            state.scroll_to_bottom();
            ModalAction::Continue
        }
        _ => ModalAction::Continue,
    }
}
