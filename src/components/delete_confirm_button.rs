//! Delete Confirm Button Component
//!
//! Inline delete confirmation that locks itself while the delete is in
//! flight, so a second confirm cannot fire a duplicate request.

use leptos::prelude::*;

/// Inline delete confirmation button
///
/// Shows a × button initially. When clicked, shows "Delete?" with ✓/✗ buttons.
/// While `busy` is true only a disabled "Deleting..." marker is shown.
///
/// # Arguments
/// * `button_class` - CSS class for the initial delete button
/// * `on_confirm` - Callback to execute when user confirms deletion
/// * `busy` - A delete for this row is pending
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(optional, into)] busy: MaybeProp<bool>,
) -> impl IntoView {
    let (confirm_delete, set_confirm_delete) = signal(false);
    let is_busy = move || busy.get().unwrap_or(false);

    view! {
        <Show
            when=is_busy
            fallback=move || {
                let button_class = button_class.clone();
                view! {
                    <Show when=move || !confirm_delete.get()>
                        <button
                            class=button_class.clone()
                            title="Delete"
                            on:click=move |ev| {
                                ev.stop_propagation();
                                set_confirm_delete.set(true);
                            }
                        >
                            "×"
                        </button>
                    </Show>
                    <Show when=move || confirm_delete.get()>
                        <span class="delete-confirm">
                            <span class="delete-confirm-text">"Delete?"</span>
                            <button
                                class="confirm-btn"
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    set_confirm_delete.set(false);
                                    if !is_busy() {
                                        on_confirm.run(());
                                    }
                                }
                            >
                                "✓"
                            </button>
                            <button
                                class="cancel-btn"
                                on:click=move |ev| {
                                    ev.stop_propagation();
                                    set_confirm_delete.set(false);
                                }
                            >
                                "✗"
                            </button>
                        </span>
                    </Show>
                }
            }
        >
            <button class="delete-btn pending" disabled=true>"Deleting..."</button>
        </Show>
    }
}
