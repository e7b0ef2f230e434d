//! Modal dialog flow of the overlay.
//!
//! ```text
//! Normal ⇄ PauseMenu
//! PauseMenu → SaveDialog → (OverwriteConfirm) → PostSaveDialog → Normal
//! PauseMenu → LoadDialog → Normal
//! ```
//!
//! The flow renders nothing. It only tracks which dialog is open and the
//! filename intents staged for the owning loop.
use presentation_core::{FileExists, SaveFileInfo};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
pub enum DialogState {
    #[default]
    Normal,
    PauseMenu,
    SaveDialog,
    OverwriteConfirm,
    PostSaveDialog,
    LoadDialog,
}

/// Why `submit_save_name` refused a name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveNameError {
    Empty,
    /// The save dialog is not open.
    NotEditing,
}

#[derive(Default)]
pub struct DialogFlow {
    state: DialogState,
    draft: String,
    last_saved: Option<String>,
    pending_save: Option<String>,
    pending_load: Option<String>,
    quit_requested: bool,
    save_files: Vec<SaveFileInfo>,
    selected_load: Option<usize>,
    file_exists: Option<FileExists>,
}

impl DialogFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_modal(&self) -> bool {
        self.state != DialogState::Normal
    }

    fn transition(&mut self, to: DialogState) {
        tracing::debug!(from = %self.state, %to, "overlay dialog transition");
        self.state = to;
    }

    /// `Normal → PauseMenu` or back; ignored while another dialog is open.
    pub fn toggle_pause_menu(&mut self) -> bool {
        match self.state {
            DialogState::Normal => self.transition(DialogState::PauseMenu),
            DialogState::PauseMenu => self.transition(DialogState::Normal),
            _ => return false,
        }
        true
    }

    pub fn open_save_dialog(&mut self) -> bool {
        if self.state != DialogState::PauseMenu {
            return false;
        }
        self.transition(DialogState::SaveDialog);
        true
    }

    pub fn open_load_dialog(&mut self) -> bool {
        if self.state != DialogState::PauseMenu {
            return false;
        }
        self.selected_load = None;
        self.transition(DialogState::LoadDialog);
        true
    }

    /// Name being edited in the save dialog.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Submits a save name. An existing name asks for confirmation first;
    /// otherwise the save is staged right away.
    pub fn submit_save_name(&mut self, name: &str) -> Result<(), SaveNameError> {
        if self.state != DialogState::SaveDialog {
            return Err(SaveNameError::NotEditing);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(SaveNameError::Empty);
        }

        self.draft = name.to_string();
        let exists = self.file_exists.as_ref().is_some_and(|exists| exists(name));
        if exists {
            self.transition(DialogState::OverwriteConfirm);
        } else {
            self.stage_save();
        }
        Ok(())
    }

    pub fn confirm_overwrite(&mut self) -> bool {
        if self.state != DialogState::OverwriteConfirm {
            return false;
        }
        self.stage_save();
        true
    }

    pub fn cancel_overwrite(&mut self) -> bool {
        if self.state != DialogState::OverwriteConfirm {
            return false;
        }
        self.transition(DialogState::SaveDialog);
        true
    }

    fn stage_save(&mut self) {
        self.pending_save = Some(self.draft.clone());
        self.last_saved = Some(self.draft.clone());
        self.transition(DialogState::PostSaveDialog);
    }

    /// Name shown by the post-save dialog.
    pub fn last_saved(&self) -> Option<&str> {
        self.last_saved.as_deref()
    }

    pub fn dismiss_post_save(&mut self) -> bool {
        if self.state != DialogState::PostSaveDialog {
            return false;
        }
        self.transition(DialogState::Normal);
        true
    }

    pub fn save_files(&self) -> &[SaveFileInfo] {
        &self.save_files
    }

    pub fn set_save_files(&mut self, files: Vec<SaveFileInfo>) {
        if self.selected_load.is_some_and(|idx| idx >= files.len()) {
            self.selected_load = None;
        }
        self.save_files = files;
    }

    pub fn set_file_exists(&mut self, predicate: FileExists) {
        self.file_exists = Some(predicate);
    }

    pub fn selected_load(&self) -> Option<usize> {
        self.selected_load
    }

    pub fn select_load(&mut self, index: usize) -> bool {
        if self.state != DialogState::LoadDialog || index >= self.save_files.len() {
            return false;
        }
        self.selected_load = Some(index);
        true
    }

    /// Stages the selected save for loading and closes the dialog.
    pub fn confirm_load(&mut self) -> bool {
        if self.state != DialogState::LoadDialog {
            return false;
        }
        let Some(file) = self.selected_load.and_then(|idx| self.save_files.get(idx)) else {
            return false;
        };
        self.pending_load = Some(file.filename.clone());
        self.selected_load = None;
        self.transition(DialogState::Normal);
        true
    }

    /// Steps back one dialog.
    pub fn cancel(&mut self) -> bool {
        let to = match self.state {
            DialogState::Normal => return false,
            DialogState::PauseMenu | DialogState::PostSaveDialog => DialogState::Normal,
            DialogState::SaveDialog | DialogState::LoadDialog => DialogState::PauseMenu,
            DialogState::OverwriteConfirm => DialogState::SaveDialog,
        };
        self.transition(to);
        true
    }

    pub fn request_quit(&mut self) -> bool {
        if self.state != DialogState::PauseMenu {
            return false;
        }
        self.quit_requested = true;
        self.transition(DialogState::Normal);
        true
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_save.is_some()
    }

    pub fn save_filename(&self) -> Option<&str> {
        self.pending_save.as_deref()
    }

    pub fn clear_save_filename(&mut self) {
        self.pending_save = None;
    }

    pub fn has_pending_load(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn load_filename(&self) -> Option<&str> {
        self.pending_load.as_deref()
    }

    pub fn clear_load_filename(&mut self) {
        self.pending_load = None;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn clear_quit_request(&mut self) {
        self.quit_requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_save_dialog(existing: &'static [&'static str]) -> DialogFlow {
        let mut flow = DialogFlow::new();
        flow.set_file_exists(Box::new(move |name: &str| existing.iter().any(|e| *e == name)));
        assert!(flow.toggle_pause_menu());
        assert!(flow.open_save_dialog());
        flow
    }

    #[test]
    fn overwrite_confirmation_flow() {
        let mut flow = in_save_dialog(&["run1"]);

        flow.submit_save_name("run1").unwrap();
        assert_eq!(flow.state(), DialogState::OverwriteConfirm);
        assert!(!flow.has_pending_save());

        assert!(flow.confirm_overwrite());
        assert!(flow.has_pending_save());
        assert_eq!(flow.save_filename(), Some("run1"));
        assert_eq!(flow.state(), DialogState::PostSaveDialog);

        // Intent survives until the caller clears it.
        assert!(flow.dismiss_post_save());
        assert!(flow.has_pending_save());
        flow.clear_save_filename();
        assert!(!flow.has_pending_save());
        assert_eq!(flow.state(), DialogState::Normal);
    }

    #[test]
    fn fresh_name_is_staged_immediately() {
        let mut flow = in_save_dialog(&["run1"]);
        flow.submit_save_name("  run2 ").unwrap();
        assert_eq!(flow.save_filename(), Some("run2"));
        assert_eq!(flow.state(), DialogState::PostSaveDialog);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut flow = in_save_dialog(&[]);
        assert_eq!(flow.submit_save_name("   "), Err(SaveNameError::Empty));
        assert_eq!(flow.state(), DialogState::SaveDialog);
        assert!(!flow.has_pending_save());
    }

    #[test]
    fn declining_overwrite_returns_to_editing() {
        let mut flow = in_save_dialog(&["run1"]);
        flow.submit_save_name("run1").unwrap();
        assert!(flow.cancel_overwrite());
        assert_eq!(flow.state(), DialogState::SaveDialog);
        assert_eq!(flow.draft(), "run1");
        assert!(!flow.has_pending_save());
    }

    #[test]
    fn missing_predicate_means_nothing_exists() {
        let mut flow = DialogFlow::new();
        flow.toggle_pause_menu();
        flow.open_save_dialog();
        flow.submit_save_name("run1").unwrap();
        assert!(flow.has_pending_save());
    }

    #[test]
    fn load_requires_a_selection() {
        let mut flow = DialogFlow::new();
        flow.set_save_files(vec![SaveFileInfo::new("a.sav"), SaveFileInfo::new("b.sav")]);
        flow.toggle_pause_menu();
        assert!(flow.open_load_dialog());

        assert!(!flow.confirm_load());
        assert!(!flow.select_load(5));
        assert!(flow.select_load(1));
        assert!(flow.confirm_load());

        assert_eq!(flow.load_filename(), Some("b.sav"));
        assert_eq!(flow.state(), DialogState::Normal);
        flow.clear_load_filename();
        assert!(!flow.has_pending_load());
    }

    #[test]
    fn cancel_steps_back_one_dialog() {
        let mut flow = in_save_dialog(&["run1"]);
        flow.submit_save_name("run1").unwrap();

        assert!(flow.cancel());
        assert_eq!(flow.state(), DialogState::SaveDialog);
        assert!(flow.cancel());
        assert_eq!(flow.state(), DialogState::PauseMenu);
        assert!(flow.cancel());
        assert_eq!(flow.state(), DialogState::Normal);
        assert!(!flow.cancel());
    }

    #[test]
    fn transitions_from_wrong_state_are_refused() {
        let mut flow = DialogFlow::new();
        assert!(!flow.open_save_dialog());
        assert!(!flow.open_load_dialog());
        assert!(!flow.request_quit());
        assert_eq!(flow.submit_save_name("x"), Err(SaveNameError::NotEditing));

        flow.toggle_pause_menu();
        flow.open_load_dialog();
        assert!(!flow.toggle_pause_menu());
        assert_eq!(flow.state(), DialogState::LoadDialog);
    }

    #[test]
    fn quit_is_an_intent() {
        let mut flow = DialogFlow::new();
        flow.toggle_pause_menu();
        assert!(flow.request_quit());
        assert!(flow.quit_requested());
        assert!(!flow.is_modal());
        flow.clear_quit_request();
        assert!(!flow.quit_requested());
    }
}
