//! Taskdeck Frontend Entry Point

use leptos::prelude::*;
use taskdeck_ui::{logging, App, ClientConfig};

fn main() {
    console_error_panic_hook::set_once();

    let mut config = ClientConfig::from_build_env();
    if let Some(origin) = web_sys::window().and_then(|win| win.location().origin().ok()) {
        config = config.with_origin(&origin);
    }
    logging::init(&config);
    if let Err(e) = config.validate() {
        log::error!("[APP] {}", e);
    }

    mount_to_body(move || view! { <App config=config.clone() /> });
}
