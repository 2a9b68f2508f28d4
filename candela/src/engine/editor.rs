use crate::engine::scene::Scene;

/// Play state of an attached editor.
///
/// `Next` means "advance exactly one frame"; the orchestrator decays it back
/// to `Paused` at the end of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Play,
    Paused,
    Next,
    Preview,
}

impl EditorState {
    /// Scene and system updates are skipped in these states; layer updates
    /// (e.g. editor UI) still run.
    pub fn blocks_world_updates(self) -> bool {
        matches!(self, EditorState::Paused | EditorState::Preview)
    }
}

/// Seam for an in-process editor, selected at construction time.
///
/// The default host is a no-op; a real editor supplies its own play state and
/// reacts to scene changes.
#[allow(unused)]
pub trait EditorHost {
    fn state(&self) -> EditorState {
        EditorState::Play
    }

    fn set_state(&mut self, state: EditorState) {}

    fn on_init(&mut self) {}

    fn on_new_scene(&mut self, scene: &dyn Scene) {}
}

#[derive(Debug, Default)]
pub struct NullEditor;

impl EditorHost for NullEditor {}
