//! Task Row Component
//!
//! One task with inline editors. Every change goes through the coordinator,
//! so the row re-renders from the optimistic cache write.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::AppContext;
use crate::error::MutationError;
use crate::models::{Task, TaskField};
use crate::notice::{NoticeKind, Notifier};

use super::DeleteConfirmButton;

fn format_date(task: &Task, field: TaskField) -> String {
    let date = match field {
        TaskField::EstimatedDate => task.estimated_date,
        TaskField::DueDate => task.due_date,
        TaskField::Title => None,
    };
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Local rejections are shown here; transport failures were already
/// surfaced by the coordinator
fn report_outcome(ctx: AppContext, action: &str, result: Result<(), MutationError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_local() => {
            log::warn!("[TASK] {} rejected: {}", action, e);
            ctx.notices.notify(NoticeKind::Warning, e.to_string());
        }
        Err(e) => log::debug!("[TASK] {} failed: {}", action, e),
    }
}

/// Date input bound to one date field
#[component]
fn DateField(task_id: String, field: TaskField, task: Memo<Option<Task>>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    view! {
        <label class="task-date">
            <span class="task-date-label">{field.to_string()}</span>
            <input
                type="date"
                prop:value=move || task.with(|t| t.as_ref().map(|t| format_date(t, field)).unwrap_or_default())
                on:change=move |ev| {
                    let raw = event_target_value(&ev);
                    let id = task_id.clone();
                    let coordinator = ctx.coordinator();
                    spawn_local(async move {
                        let result = coordinator.edit_field_raw(&id, field, &raw).await;
                        report_outcome(ctx, "date edit", result);
                    });
                }
            />
        </label>
    }
}

#[component]
pub fn TaskRow(task_id: String) -> impl IntoView {
    let ctx = expect_context::<AppContext>();

    let lookup_id = task_id.clone();
    let task = Memo::new(move |_| ctx.task_list().into_iter().find(|t| t.id == lookup_id));
    let (new_subtask, set_new_subtask) = signal(String::new());
    let deleting = RwSignal::new(false);

    let status_id = task_id.clone();
    let on_status_change = move |ev: web_sys::Event| {
        let status = event_target_value(&ev);
        let id = status_id.clone();
        let coordinator = ctx.coordinator();
        spawn_local(async move {
            let result = coordinator.change_status(&id, &status).await;
            report_outcome(ctx, "status change", result);
        });
    };

    let title_id = task_id.clone();
    let on_title_change = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let title = input.value();
        let id = title_id.clone();
        let coordinator = ctx.coordinator();
        spawn_local(async move {
            let result = coordinator.edit_field_raw(&id, TaskField::Title, &title).await;
            if result.is_err() {
                // The cache holds the last good title; the input may not
                if let Some(cached) = task.with_untracked(|t| t.as_ref().map(|t| t.title.clone())) {
                    input.set_value(&cached);
                }
            }
            report_outcome(ctx, "title edit", result);
        });
    };

    let copy_id = task_id.clone();
    let on_copy = move |_: web_sys::MouseEvent| {
        let id = copy_id.clone();
        let coordinator = ctx.coordinator();
        spawn_local(async move {
            match coordinator.copy_task(&id).await {
                Ok(copy) => log::info!("[TASK] Copied {} as {}", id, copy.id),
                Err(e) => report_outcome(ctx, "copy", Err(e)),
            }
        });
    };

    let delete_id = task_id.clone();
    let on_delete = Callback::new(move |_: ()| {
        let id = delete_id.clone();
        let coordinator = ctx.coordinator();
        deleting.set(true);
        spawn_local(async move {
            let result = coordinator.delete_task(&id).await;
            // The row is gone after a successful delete
            let _ = deleting.try_set(false);
            report_outcome(ctx, "delete", result);
        });
    });

    let subtask_id = task_id.clone();
    let on_add_subtask = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let title = new_subtask.get();
        let id = subtask_id.clone();
        let coordinator = ctx.coordinator();
        spawn_local(async move {
            match coordinator.create_subtask(&id, &title, None).await {
                Ok(_) => set_new_subtask.set(String::new()),
                Err(e) => report_outcome(ctx, "add subtask", Err(e)),
            }
        });
    };

    let status_options = move || {
        let current = task.with(|t| t.as_ref().map(|t| t.status.clone()));
        let mut statuses = ctx.status_list();
        if let Some(current) = &current {
            if !statuses.iter().any(|s| s.id == current.id) {
                statuses.push(current.clone());
            }
        }
        let current_id = current.map(|s| s.id).unwrap_or_default();
        statuses
            .into_iter()
            .map(|status| {
                let selected = status.id == current_id;
                view! { <option value=status.id selected=selected>{status.title}</option> }
            })
            .collect_view()
    };

    view! {
        <div class="task-row">
            <div class="task-main">
                <select class="task-status" on:change=on_status_change>
                    {status_options}
                </select>

                <input
                    type="text"
                    class="task-title"
                    prop:value=move || task.with(|t| t.as_ref().map(|t| t.title.clone()).unwrap_or_default())
                    on:change=on_title_change
                />

                <DateField task_id=task_id.clone() field=TaskField::EstimatedDate task=task />
                <DateField task_id=task_id.clone() field=TaskField::DueDate task=task />

                <button class="copy-btn" title="Copy" on:click=on_copy>"⧉"</button>
                <DeleteConfirmButton button_class="delete-btn" on_confirm=on_delete busy=deleting />
            </div>

            <ul class="subtask-list">
                <For
                    each=move || task.with(|t| t.as_ref().map(|t| t.subtasks.clone()).unwrap_or_default())
                    key=|subtask| subtask.id.clone()
                    children=move |subtask| {
                        let class = if subtask.completed { "subtask completed" } else { "subtask" };
                        view! {
                            <li class=class>
                                {subtask.title}
                            </li>
                        }
                    }
                />
            </ul>

            <form class="subtask-form" on:submit=on_add_subtask>
                <input
                    type="text"
                    placeholder="Add subtask..."
                    prop:value=move || new_subtask.get()
                    on:input=move |ev| set_new_subtask.set(event_target_value(&ev))
                />
                <button type="submit">"+"</button>
            </form>
        </div>
    }
}
