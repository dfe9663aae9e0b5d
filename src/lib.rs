use {app::App, tap::TapFallible as _, wasm_bindgen::prelude::*};

mod app;
mod config;
mod loader;
mod progress_bar;
mod util;
mod webview;

#[cfg_attr(not(test), wasm_bindgen(start))]
pub async fn main() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    tracing_wasm::set_as_global_default();

    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .run_with(App::boot)
        .tap_err(|err| tracing::error!(?err, "iced app failed"))
        .ok();
}
