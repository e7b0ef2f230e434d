//! Contract between an auxiliary UI overlay and the owning loop.
//!
//! Overlays never perform persistence or move a viewport themselves. They stage
//! intents that the loop reads, acts on, and clears explicitly:
//!
//! 1. the overlay sets an intent (`has_pending_save() == true`),
//! 2. the loop consumes it and calls the matching `clear_*` method.
//!
//! Intents are never cleared automatically.

/// Save slot metadata supplied by the persistence collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveFileInfo {
    pub filename: String,
    /// Human-readable modification stamp, if the collaborator has one.
    pub modified: Option<String>,
}

impl SaveFileInfo {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            modified: None,
        }
    }
}

/// Predicate answering "does a save with this name already exist".
///
/// The only filesystem capability an overlay is granted.
pub type FileExists = Box<dyn Fn(&str) -> bool>;

/// Staged intents exposed by an overlay.
pub trait OverlayIntents {
    fn has_pending_save(&self) -> bool;
    fn save_filename(&self) -> Option<&str>;
    fn clear_save_filename(&mut self);

    fn has_pending_load(&self) -> bool;
    fn load_filename(&self) -> Option<&str>;
    fn clear_load_filename(&mut self);

    /// World position an inspector asked the loop to centre on.
    fn pending_recenter(&self) -> Option<(i32, i32)>;
    fn clear_pending_recenter(&mut self);

    /// Quit chosen from the overlay's pause menu.
    fn quit_requested(&self) -> bool;
    fn clear_quit_request(&mut self);

    /// True while any overlay dialog is open.
    fn is_modal(&self) -> bool;

    /// Opens the overlay's pause menu, or closes it when it is the open dialog.
    fn toggle_pause_menu(&mut self);

    /// Replaces the list shown by the load dialog.
    fn set_save_files(&mut self, files: Vec<SaveFileInfo>);
    /// Injects the predicate consulted before overwriting a save.
    fn set_file_exists(&mut self, predicate: FileExists);
}
