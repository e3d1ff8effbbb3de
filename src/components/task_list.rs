//! Task List Component
//!
//! All cached tasks, one editable row each.

use leptos::prelude::*;

use crate::cache::QueryKey;
use crate::context::AppContext;

use super::TaskRow;

#[component]
pub fn TaskList() -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    view! {
        <section class="task-list">
            <h2>"Tasks"</h2>
            <Show
                when=move || ctx.tasks.is_loaded(&QueryKey::Tasks)
                fallback=|| view! { <p class="loading">"Loading tasks..."</p> }
            >
                <For
                    each=move || ctx.task_list()
                    key=|task| task.id.clone()
                    children=move |task| view! { <TaskRow task_id=task.id /> }
                />
            </Show>
            <p class="item-count">{move || format!("{} tasks", ctx.task_list().len())}</p>
        </section>
    }
}
