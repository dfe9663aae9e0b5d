use {tap::TapFallible as _, wasm_bindgen::JsValue};

/// Resolves after `delay` milliseconds. Resolves immediately when there's no
/// global `window` to schedule the timer on.
pub async fn sleep(delay: i32) {
    let mut cb = |resolve: js_sys::Function, _: js_sys::Function| {
        let scheduled = web_sys::window().is_some_and(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay)
                .tap_err(|err| tracing::warn!(?err, "failed to schedule timer"))
                .is_ok()
        });

        if !scheduled {
            let _ = resolve.call0(&JsValue::NULL);
        }
    };

    let _ = wasm_bindgen_futures::JsFuture::from(js_sys::Promise::new(&mut cb)).await;
}

/// Formats a JS exception for logs and error payloads.
pub fn js_error_text(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::JSON::stringify(err)
                .ok()
                .and_then(|s| s.as_string())
        })
        .unwrap_or_else(|| "<no data>".to_owned())
}
