//! Gesture State Machine
//!
//! Pointer-event agnostic drag tracking. Callers feed transitions and the
//! machine decides whether a drop yields a new ordering.

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Where a pointer-down originated inside a draggable row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOrigin {
    /// The row itself or passive content inside it
    Row,
    /// A nested interactive control (button, input, menu, ...)
    Control,
}

/// Current phase of a drag gesture
#[derive(Clone, Debug, PartialEq)]
pub enum DragPhase<Id> {
    Idle,
    /// Pointer is down but has not moved past the threshold yet
    Pending { source: Id, start_x: i32, start_y: i32 },
    Dragging { source: Id, target: Option<usize> },
    /// A new ordering was handed off and the reorder is being dispatched
    Committing { source: Id },
}

/// Drag-and-drop gesture tracker
#[derive(Clone, Debug, PartialEq)]
pub struct GestureTracker<Id> {
    phase: DragPhase<Id>,
    threshold: i32,
}

impl<Id> Default for GestureTracker<Id> {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
            threshold: DRAG_THRESHOLD_PX,
        }
    }
}

impl<Id: Clone + PartialEq> GestureTracker<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(threshold: i32) -> Self {
        Self {
            phase: DragPhase::Idle,
            threshold,
        }
    }

    pub fn phase(&self) -> &DragPhase<Id> {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DragPhase::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, DragPhase::Pending { .. })
    }

    /// Item currently being dragged (not set while merely pending)
    pub fn dragging(&self) -> Option<&Id> {
        match &self.phase {
            DragPhase::Dragging { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Current drop-target slot index
    pub fn target(&self) -> Option<usize> {
        match &self.phase {
            DragPhase::Dragging { target, .. } => *target,
            _ => None,
        }
    }

    /// Record a pointer-down on a draggable item.
    ///
    /// Returns false when the press is ignored (nested control, or a gesture
    /// already in progress).
    pub fn pointer_down(&mut self, source: Id, x: i32, y: i32, origin: PointerOrigin) -> bool {
        if origin == PointerOrigin::Control || !self.is_idle() {
            return false;
        }
        self.phase = DragPhase::Pending {
            source,
            start_x: x,
            start_y: y,
        };
        true
    }

    /// Feed a pointer move. Returns true when this move started the drag.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> bool {
        let DragPhase::Pending { source, start_x, start_y } = &self.phase else {
            return false;
        };
        let dx = (x - start_x).abs();
        let dy = (y - start_y).abs();
        if dx > self.threshold || dy > self.threshold {
            self.phase = DragPhase::Dragging {
                source: source.clone(),
                target: None,
            };
            return true;
        }
        false
    }

    /// Pointer entered a candidate slot; preview only
    pub fn enter_slot(&mut self, index: usize) {
        if let DragPhase::Dragging { target, .. } = &mut self.phase {
            *target = Some(index);
        }
    }

    pub fn leave_slot(&mut self) {
        if let DragPhase::Dragging { target, .. } = &mut self.phase {
            *target = None;
        }
    }

    /// Pointer released.
    ///
    /// Returns the new ordering when the drop moves the source item; the
    /// tracker is then `Committing` until [`commit_dispatched`] is called.
    /// Any other release returns to `Idle` without an ordering.
    ///
    /// [`commit_dispatched`]: GestureTracker::commit_dispatched
    pub fn drop_on(&mut self, order: &[Id]) -> Option<Vec<Id>> {
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        let DragPhase::Dragging {
            source,
            target: Some(target),
        } = phase
        else {
            return None;
        };
        let reordered = move_to_index(order, &source, target)?;
        self.phase = DragPhase::Committing { source };
        Some(reordered)
    }

    /// The reorder was handed to the persistence layer; reset regardless of
    /// its eventual outcome.
    pub fn commit_dispatched(&mut self) {
        if matches!(self.phase, DragPhase::Committing { .. }) {
            self.phase = DragPhase::Idle;
        }
    }

    /// Abort whatever gesture is in progress
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }
}

/// Remove `source` from `order` and reinsert it at `target`.
///
/// `target` indexes the resulting list and is clamped to its end. Returns
/// `None` when the source is absent or already sits at `target`.
pub fn move_to_index<Id: Clone + PartialEq>(order: &[Id], source: &Id, target: usize) -> Option<Vec<Id>> {
    let from = order.iter().position(|id| id == source)?;
    let target = target.min(order.len().saturating_sub(1));
    if from == target {
        return None;
    }
    let mut reordered = order.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(target, moved);
    Some(reordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<&'static str> {
        vec!["A", "B", "C"]
    }

    fn dragging(tracker: &mut GestureTracker<&'static str>, source: &'static str) {
        assert!(tracker.pointer_down(source, 10, 10, PointerOrigin::Row));
        assert!(tracker.pointer_move(10, 30));
    }

    #[test]
    fn test_move_last_to_front() {
        assert_eq!(move_to_index(&abc(), &"C", 0), Some(vec!["C", "A", "B"]));
    }

    #[test]
    fn test_move_first_to_end() {
        assert_eq!(move_to_index(&abc(), &"A", 2), Some(vec!["B", "C", "A"]));
        // Past the end clamps to the last slot
        assert_eq!(move_to_index(&abc(), &"A", 9), Some(vec!["B", "C", "A"]));
    }

    #[test]
    fn test_move_to_own_slot_is_none() {
        assert_eq!(move_to_index(&abc(), &"B", 1), None);
        assert_eq!(move_to_index(&abc(), &"Z", 0), None);
    }

    #[test]
    fn test_click_below_threshold_never_drags() {
        let mut tracker = GestureTracker::new();
        tracker.pointer_down("A", 100, 100, PointerOrigin::Row);
        assert!(!tracker.pointer_move(103, 104));
        assert!(tracker.is_pending());
        assert_eq!(tracker.dragging(), None);

        assert_eq!(tracker.drop_on(&abc()), None);
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_nested_control_is_ignored() {
        let mut tracker = GestureTracker::new();
        assert!(!tracker.pointer_down("A", 0, 0, PointerOrigin::Control));
        assert!(!tracker.pointer_move(50, 50));
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_full_gesture_commits_and_resets() {
        let mut tracker = GestureTracker::new();
        dragging(&mut tracker, "C");
        assert_eq!(tracker.dragging(), Some(&"C"));

        tracker.enter_slot(2);
        tracker.enter_slot(1);
        tracker.enter_slot(0);
        assert_eq!(tracker.target(), Some(0));

        let order = tracker.drop_on(&abc());
        assert_eq!(order, Some(vec!["C", "A", "B"]));
        assert_eq!(tracker.phase(), &DragPhase::Committing { source: "C" });

        tracker.commit_dispatched();
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_drop_on_own_slot_goes_idle() {
        let mut tracker = GestureTracker::new();
        dragging(&mut tracker, "B");
        tracker.enter_slot(1);
        assert_eq!(tracker.drop_on(&abc()), None);
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_drop_without_target_goes_idle() {
        let mut tracker = GestureTracker::new();
        dragging(&mut tracker, "A");
        tracker.enter_slot(2);
        tracker.leave_slot();
        assert_eq!(tracker.drop_on(&abc()), None);
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_second_press_during_drag_is_ignored() {
        let mut tracker = GestureTracker::new();
        dragging(&mut tracker, "A");
        assert!(!tracker.pointer_down("B", 0, 0, PointerOrigin::Row));
        assert_eq!(tracker.dragging(), Some(&"A"));
    }

    #[test]
    fn test_custom_threshold() {
        let mut tracker = GestureTracker::with_threshold(20);
        tracker.pointer_down("A", 0, 0, PointerOrigin::Row);
        assert!(!tracker.pointer_move(15, 0));
        assert!(tracker.pointer_move(21, 0));
    }
}
