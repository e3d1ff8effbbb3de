//! Note Board Component
//!
//! Note cards reordered by dragging. A drop applies the new order locally
//! right away; persisting it is fire-and-forget.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::*;

use crate::cache::QueryKey;
use crate::context::AppContext;

#[component]
pub fn NoteBoard() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let dnd = create_dnd_signals::<String>();

    let current_order = move || {
        ctx.notes
            .snapshot(&QueryKey::Notes)
            .into_iter()
            .map(|note| note.id)
            .collect::<Vec<_>>()
    };
    bind_global_mouseup(dnd, current_order, move |reordered| {
        log::debug!("[DND] Drop: new order {:?}", reordered);
        let coordinator = ctx.coordinator();
        spawn_local(async move {
            if let Err(e) = coordinator.reorder(&reordered).await {
                log::debug!("[DND] Reorder not persisted: {}", e);
            }
        });
    });

    let on_refresh = move |_: web_sys::MouseEvent| {
        let coordinator = ctx.coordinator();
        spawn_local(async move {
            coordinator.refresh_stale().await;
        });
    };

    view! {
        <section class="note-board">
            <h2>"Notes"</h2>
            // Set when a reorder could not be saved
            <Show when={move || ctx.notes.is_loaded(&QueryKey::Notes) && ctx.notes.needs_refresh(&QueryKey::Notes)}>
                <p class="stale-hint">
                    "Order not saved. "
                    <button class="refresh-btn" on:click=on_refresh>"Refresh"</button>
                </p>
            </Show>
            <div class="note-cards">
                <For
                    each={move || ctx.note_list().into_iter().enumerate().collect::<Vec<_>>()}
                    key=|(index, note)| (*index, note.id.clone(), note.title.clone())
                    children=move |(index, note)| {
                        let id = note.id.clone();

                        let on_mousedown = make_on_mousedown(dnd, id.clone());
                        let on_mouseenter = make_on_slot_mouseenter(dnd, index);
                        let on_mouseleave = make_on_mouseleave(dnd);

                        let card_class = move || {
                            let mut c = String::from("note-card");
                            if dnd.is_dragging(&id) { c.push_str(" dragging"); }
                            if dnd.is_target(index) { c.push_str(" drop-target"); }
                            c
                        };

                        view! {
                            <div
                                class=card_class
                                on:mousedown=on_mousedown
                                on:mouseenter=on_mouseenter
                                on:mouseleave=on_mouseleave
                            >
                                <h3 class="note-title">{note.title}</h3>
                                <p class="note-content">{note.content}</p>
                            </div>
                        }
                    }
                />
            </div>
            <p class="item-count">{move || format!("{} notes", ctx.note_list().len())}</p>
        </section>
    }
}
