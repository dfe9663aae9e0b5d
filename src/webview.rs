use {
    crate::{loader, util},
    tap::TapFallible as _,
    wasm_bindgen::{JsCast as _, JsValue, closure::Closure},
    web_sys::{HtmlIFrameElement, Window},
};

const FRAME_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; border: \
                           none; margin: 0; padding: 0;";
const Z_INDEX_FRONT: &str = "10";
const Z_INDEX_BACK: &str = "-1";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No global `window` object")]
    NoWindow,

    #[error("No `document` object")]
    NoDocument,

    #[error("No `body` object")]
    NoBody,

    #[error("Failed to set up web view: {0}")]
    SetupFailed(String),
}

impl From<Error> for loader::Error {
    fn from(err: Error) -> Self {
        loader::Error::WebView(err.to_string())
    }
}

fn setup_failed(err: JsValue) -> Error {
    Error::SetupFailed(util::js_error_text(&err))
}

/// The content surface: an `<iframe>` stretched over the viewport.
///
/// The element and every listener it registered are removed on drop.
pub struct WebView {
    window: Window,
    frame: HtmlIFrameElement,
    on_load: Closure<dyn FnMut()>,
    on_error: Closure<dyn FnMut()>,
    on_online: Closure<dyn FnMut()>,
    on_offline: Closure<dyn FnMut()>,
}

impl WebView {
    pub fn mount<F>(url: &str, emit: F) -> Result<Self, Error>
    where
        F: Fn(loader::Event) + Clone + 'static,
    {
        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let document = window.document().ok_or(Error::NoDocument)?;
        let body = document.body().ok_or(Error::NoBody)?;

        let frame = document
            .create_element("iframe")
            .map_err(setup_failed)?
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|_| Error::SetupFailed("element is not an iframe".to_owned()))?;

        frame.set_attribute("style", FRAME_STYLE).map_err(setup_failed)?;

        let failure = loader::Error::Navigation(format!("failed to load {url}"));

        let view = Self {
            on_load: callback(&emit, loader::Event::Loaded),
            on_error: callback(&emit, loader::Event::Failed(failure)),
            on_online: callback(&emit, loader::Event::Online),
            on_offline: callback(&emit, loader::Event::Offline),
            window,
            frame,
        };

        // Dropping `view` on any error below detaches whatever got attached.
        view.attach()?;
        view.navigate(url);
        body.append_child(&view.frame).map_err(setup_failed)?;

        tracing::info!(%url, "web view mounted");

        Ok(view)
    }

    /// Whether the browser currently reports network connectivity.
    pub fn is_online(&self) -> bool {
        self.window.navigator().on_line()
    }

    pub fn navigate(&self, url: &str) {
        self.frame.set_src(url);
    }

    /// Sets the content opacity. An interactive view is raised above the
    /// shell canvas so that it receives input.
    pub fn set_presentation(&self, opacity: f32, interactive: bool) {
        let style = self.frame.style();
        let z_index = if interactive {
            Z_INDEX_FRONT
        } else {
            Z_INDEX_BACK
        };

        let _ = style
            .set_property("opacity", &format!("{opacity}"))
            .and_then(|_| style.set_property("z-index", z_index))
            .tap_err(|err| tracing::warn!(?err, "failed to update web view style"));
    }

    fn attach(&self) -> Result<(), Error> {
        self.frame
            .set_onload(Some(self.on_load.as_ref().unchecked_ref()));
        self.frame
            .set_onerror(Some(self.on_error.as_ref().unchecked_ref()));

        self.window
            .add_event_listener_with_callback("online", self.on_online.as_ref().unchecked_ref())
            .map_err(setup_failed)?;
        self.window
            .add_event_listener_with_callback("offline", self.on_offline.as_ref().unchecked_ref())
            .map_err(setup_failed)?;

        Ok(())
    }
}

impl Drop for WebView {
    fn drop(&mut self) {
        self.frame.set_onload(None);
        self.frame.set_onerror(None);

        let _ = self
            .window
            .remove_event_listener_with_callback("online", self.on_online.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("offline", self.on_offline.as_ref().unchecked_ref());

        self.frame.remove();
        tracing::info!("web view unmounted");
    }
}

fn callback<F>(emit: &F, event: loader::Event) -> Closure<dyn FnMut()>
where
    F: Fn(loader::Event) + Clone + 'static,
{
    let emit = emit.clone();
    Closure::<dyn FnMut()>::new(move || emit(event.clone()))
}
