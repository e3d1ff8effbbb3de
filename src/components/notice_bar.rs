//! Notice Bar Component
//!
//! Stack of transient failure notices.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::notice::NoticeKind;

fn notice_class(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Error => "notice notice-error",
        NoticeKind::Warning => "notice notice-warning",
        NoticeKind::Info => "notice notice-info",
    }
}

#[component]
pub fn NoticeBar() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let queue = ctx.notices;

    view! {
        <div class="notice-bar" role="status">
            <For
                each=move || queue.notices()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div class=notice_class(notice.kind)>
                            <span class="notice-text">{notice.message}</span>
                            <button class="notice-dismiss" on:click=move |_| queue.dismiss(id)>"×"</button>
                        </div>
                    }
                }
            />
        </div>
    }
}
