//! Taskdeck Frontend App
//!
//! Main application component: notices on top, tasks and notes side by side.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{NoteBoard, NoticeBar, TaskList};
use crate::config::ClientConfig;
use crate::context::AppContext;

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    let ctx = AppContext::new(&config);

    // Provide context to all children
    provide_context(ctx);

    // Load every collection on mount and on each reload
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        log::info!("[APP] Loading collections, trigger={}", trigger);
        let coordinator = ctx.coordinator();
        spawn_local(async move {
            coordinator.refresh_all().await;
        });
    });

    view! {
        <div class="app-layout">
            <NoticeBar />

            <header class="app-header">
                <h1>"Taskdeck"</h1>
                <button class="reload-btn" title="Reload" on:click=move |_| ctx.reload()>"⟳"</button>
            </header>

            <main class="main-content">
                <TaskList />
                <NoteBoard />
            </main>
        </div>
    }
}
