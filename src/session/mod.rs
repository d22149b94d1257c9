//! Session state and the region-of-interest editor
//!
//! The editor manages two rectangles: the committed region actually used for
//! OCR cropping, and the working region being interactively dragged. It is a
//! two-state machine; while `Selecting` the pipeline is paused and pointer
//! input redefines the working region, while `Live` pointer input is ignored.

use crate::geometry::Rect;

/// Editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Pipeline runs; pointer input is ignored.
    Live,
    /// Pipeline paused; pointer input defines the working region.
    Selecting,
}

/// Interactive editor for the OCR region of interest.
#[derive(Debug, Clone)]
pub struct RegionEditor {
    canvas: Rect,
    committed: Rect,
    working: Rect,
    anchor: Option<(i32, i32)>,
    mode: EditorMode,
}

impl RegionEditor {
    /// Start in `Live` with both regions covering the full canvas.
    pub fn new(canvas: Rect) -> Self {
        Self {
            canvas,
            committed: canvas,
            working: canvas,
            anchor: None,
            mode: EditorMode::Live,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_live(&self) -> bool {
        self.mode == EditorMode::Live
    }

    /// The region OCR crops to. Only changes on [`RegionEditor::confirm`].
    pub fn committed(&self) -> Rect {
        self.committed
    }

    /// The region currently being edited; shown as the selection outline.
    pub fn working(&self) -> Rect {
        self.working
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    /// `Live -> Selecting`. No geometry change.
    pub fn begin_selection(&mut self) {
        if self.mode == EditorMode::Live {
            self.mode = EditorMode::Selecting;
            self.anchor = None;
        }
    }

    /// Record the drag anchor. Ignored while live or outside the canvas.
    pub fn pointer_press(&mut self, x: i32, y: i32) {
        if self.mode == EditorMode::Live {
            return;
        }
        if !self.on_canvas(x, y) {
            return;
        }
        self.anchor = Some((x, y));
    }

    /// Update the working region from the anchor and the current pointer
    /// position. Ignored while live, before a press, or when the pointer has
    /// left the canvas.
    pub fn pointer_drag(&mut self, x: i32, y: i32) {
        if self.mode == EditorMode::Live {
            return;
        }
        if !self.on_canvas(x, y) {
            return;
        }
        if let Some(anchor) = self.anchor {
            self.working = Rect::from_drag(anchor, (x, y)).clamped_to(self.canvas);
        }
    }

    /// Reset the working region to the full canvas extent.
    pub fn clear(&mut self) {
        if self.mode == EditorMode::Selecting {
            self.working = self.canvas;
        }
    }

    /// Commit the working region and resume live mode.
    pub fn confirm(&mut self) {
        if self.mode == EditorMode::Selecting {
            self.committed = self.working;
            self.anchor = None;
            self.mode = EditorMode::Live;
        }
    }

    /// Discard the working region, reverting to the committed one, and
    /// resume live mode.
    pub fn cancel(&mut self) {
        if self.mode == EditorMode::Selecting {
            self.working = self.committed;
            self.anchor = None;
            self.mode = EditorMode::Live;
        }
    }

    fn on_canvas(&self, x: i32, y: i32) -> bool {
        // Inclusive on all edges so a drag can reach the far canvas border.
        self.canvas.left <= x && x <= self.canvas.right && self.canvas.top <= y && y <= self.canvas.bottom
    }
}

/// Process-lifetime session state, owned by the shell.
///
/// Single writer per field: the editor mutates only from input handlers, the
/// camera index only from the camera selector.
#[derive(Debug)]
pub struct SessionState {
    pub editor: RegionEditor,
    pub camera_index: u32,
}

impl SessionState {
    pub fn new(canvas: Rect, camera_index: u32) -> Self {
        Self {
            editor: RegionEditor::new(canvas),
            camera_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Rect = Rect {
        left: 0,
        top: 0,
        right: 640,
        bottom: 480,
    };

    #[test]
    fn test_initial_state() {
        let editor = RegionEditor::new(CANVAS);
        assert!(editor.is_live());
        assert_eq!(editor.committed(), CANVAS);
        assert_eq!(editor.working(), CANVAS);
    }

    #[test]
    fn test_pointer_ignored_while_live() {
        let mut editor = RegionEditor::new(CANVAS);
        editor.pointer_press(10, 10);
        editor.pointer_drag(50, 50);
        assert_eq!(editor.working(), CANVAS);
    }

    #[test]
    fn test_reversed_drag_is_canonicalized() {
        let mut editor = RegionEditor::new(CANVAS);
        editor.begin_selection();
        editor.pointer_press(10, 10);
        editor.pointer_drag(5, 5);
        assert_eq!(editor.working(), Rect::new(5, 5, 10, 10));
    }

    #[test]
    fn test_drag_outside_canvas_is_ignored() {
        let mut editor = RegionEditor::new(CANVAS);
        editor.begin_selection();
        editor.pointer_press(100, 100);
        editor.pointer_drag(200, 200);
        let before = editor.working();
        editor.pointer_drag(700, 200);
        assert_eq!(editor.working(), before);
    }

    #[test]
    fn test_press_outside_canvas_is_ignored() {
        let mut editor = RegionEditor::new(CANVAS);
        editor.begin_selection();
        editor.pointer_press(-5, 10);
        editor.pointer_drag(50, 50);
        // No anchor was recorded, so the drag does nothing
        assert_eq!(editor.working(), CANVAS);
    }

    #[test]
    fn test_confirm_commits_working() {
        let mut editor = RegionEditor::new(CANVAS);
        editor.begin_selection();
        editor.pointer_press(10, 20);
        editor.pointer_drag(110, 220);
        editor.confirm();

        assert!(editor.is_live());
        assert_eq!(editor.committed(), Rect::new(10, 20, 110, 220));
        assert_eq!(editor.working(), Rect::new(10, 20, 110, 220));
    }

    #[test]
    fn test_cancel_reverts_working() {
        let mut editor = RegionEditor::new(CANVAS);
        editor.begin_selection();
        editor.pointer_press(10, 20);
        editor.pointer_drag(110, 220);
        editor.cancel();

        assert!(editor.is_live());
        assert_eq!(editor.committed(), CANVAS);
        assert_eq!(editor.working(), CANVAS);
    }

    #[test]
    fn test_confirm_does_not_alias() {
        let mut editor = RegionEditor::new(CANVAS);
        editor.begin_selection();
        editor.pointer_press(10, 10);
        editor.pointer_drag(100, 100);
        editor.confirm();
        let committed = editor.committed();

        // Further edits to the working region leave the committed copy alone
        editor.begin_selection();
        editor.pointer_press(200, 200);
        editor.pointer_drag(300, 300);
        assert_eq!(editor.committed(), committed);
        assert_ne!(editor.working(), committed);
    }

    #[test]
    fn test_clear_resets_working_to_canvas() {
        let mut editor = RegionEditor::new(CANVAS);
        editor.begin_selection();
        editor.pointer_press(10, 10);
        editor.pointer_drag(100, 100);
        editor.clear();
        assert_eq!(editor.working(), CANVAS);
        // Clear does not leave selection mode
        assert_eq!(editor.mode(), EditorMode::Selecting);
    }

    #[test]
    fn test_clear_ignored_while_live() {
        let mut editor = RegionEditor::new(CANVAS);
        editor.begin_selection();
        editor.pointer_press(10, 10);
        editor.pointer_drag(100, 100);
        editor.confirm();
        editor.clear();
        assert_eq!(editor.working(), Rect::new(10, 10, 100, 100));
    }
}
