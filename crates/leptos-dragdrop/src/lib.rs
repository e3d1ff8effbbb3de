//! Leptos DragDrop Utilities
//!
//! Drag-and-drop reordering for Leptos using mouse events.
//! The gesture itself lives in [`GestureTracker`]; this module only binds
//! DOM mouse events to its transitions.

mod machine;

pub use machine::{move_to_index, DragPhase, GestureTracker, PointerOrigin, DRAG_THRESHOLD_PX};

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Elements inside a draggable row that keep their own click behavior
pub const INTERACTIVE_SELECTOR: &str =
    "button, input, select, textarea, a, [role=menu], [role=menuitem], [data-no-drag]";

/// DnD state signals
pub struct DndSignals<Id: Send + Sync + 'static> {
    pub tracker: RwSignal<GestureTracker<Id>>,
    /// Set briefly after a drop so the trailing click can be swallowed
    pub drag_just_ended: RwSignal<bool>,
}

impl<Id: Send + Sync + 'static> Clone for DndSignals<Id> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Id: Send + Sync + 'static> Copy for DndSignals<Id> {}

impl<Id> DndSignals<Id>
where
    Id: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn is_dragging(&self, id: &Id) -> bool {
        self.tracker.with(|t| t.dragging() == Some(id))
    }

    pub fn is_drag_active(&self) -> bool {
        self.tracker.with(|t| t.dragging().is_some())
    }

    pub fn is_target(&self, index: usize) -> bool {
        self.tracker.with(|t| t.target() == Some(index))
    }
}

pub fn create_dnd_signals<Id>() -> DndSignals<Id>
where
    Id: Clone + PartialEq + Send + Sync + 'static,
{
    DndSignals {
        tracker: RwSignal::new(GestureTracker::new()),
        drag_just_ended: RwSignal::new(false),
    }
}

/// End drag operation
pub fn end_drag<Id>(dnd: &DndSignals<Id>)
where
    Id: Clone + PartialEq + Send + Sync + 'static,
{
    dnd.tracker.update(|t| {
        t.commit_dispatched();
        if !t.is_idle() {
            t.cancel();
        }
    });
    dnd.drag_just_ended.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Classify where a mouse event started
pub fn pointer_origin(ev: &web_sys::MouseEvent) -> PointerOrigin {
    let element = ev.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok());
    match element.map(|el| el.closest(INTERACTIVE_SELECTOR)) {
        Some(Ok(Some(_))) => PointerOrigin::Control,
        _ => PointerOrigin::Row,
    }
}

/// Create mousedown handler for draggable items
/// Records pending drag with start position
pub fn make_on_mousedown<Id>(dnd: DndSignals<Id>, item_id: Id) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    Id: Clone + PartialEq + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        let origin = pointer_origin(&ev);
        let (x, y) = (ev.client_x(), ev.client_y());
        dnd.tracker.update(|t| {
            t.pointer_down(item_id.clone(), x, y, origin);
        });
    }
}

/// Bind mousemove on the document - starts drag if moved enough
pub fn bind_global_mousemove<Id>(dnd: DndSignals<Id>)
where
    Id: Clone + PartialEq + Send + Sync + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        // Only pending gestures care about movement; skip signal writes otherwise
        if !dnd.tracker.with_untracked(|t| t.is_pending()) {
            return;
        }
        let (x, y) = (ev.client_x(), ev.client_y());
        dnd.tracker.update(|t| {
            t.pointer_move(x, y);
        });
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Create mouseenter handler for a slot at `index` in the current order
pub fn make_on_slot_mouseenter<Id>(dnd: DndSignals<Id>, index: usize) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    Id: Clone + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.tracker.with_untracked(|t| t.dragging().is_some()) {
            dnd.tracker.update(|t| t.enter_slot(index));
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave<Id>(dnd: DndSignals<Id>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    Id: Clone + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.tracker.with_untracked(|t| t.target().is_some()) {
            dnd.tracker.update(|t| t.leave_slot());
        }
    }
}

/// Bind global mouseup handler for drop detection.
///
/// `order` yields the current ordering at drop time; `on_drop` receives the
/// new ordering only when the drop actually moved something.
pub fn bind_global_mouseup<Id, O, F>(dnd: DndSignals<Id>, order: O, on_drop: F)
where
    Id: Clone + PartialEq + Send + Sync + 'static,
    O: Fn() -> Vec<Id> + 'static,
    F: Fn(Vec<Id>) + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        if dnd.tracker.with_untracked(|t| t.is_idle()) {
            return;
        }
        let current = order();
        let mut reordered = None;
        dnd.tracker.update(|t| reordered = t.drop_on(&current));

        if let Some(reordered) = reordered {
            on_drop(reordered);
        }
        // Fire-and-forget: reset no matter how persistence turns out
        end_drag(&dnd);
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();

    // Also bind global mousemove
    bind_global_mousemove(dnd);
}
