use {
    super::{
        Message,
        overlay::{self, Ambient},
    },
    crate::loader,
    iced::{
        Color,
        Element,
        Length,
        widget::{self, container},
    },
    instant::Instant,
};

const DIMMED_OPACITY: f32 = 0.5;
const FULL_OPACITY: f32 = 1.0;

const ERROR_PREFIX: &str = "Error: ";
const OFFLINE_TEXT: &str = "No connection";
const ERROR_COLOR: Color = Color::from_rgb(0.9, 0.2, 0.2);
const OFFLINE_COLOR: Color = Color::from_rgb(0.55, 0.55, 0.55);

/// The one thing drawn over the content view.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Loading { progress: f32 },
    Error { message: String },
    Offline,
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub overlay: Overlay,
    pub content_opacity: f32,
}

impl Presentation {
    /// Content that nothing is drawn over is raised so it can take input.
    pub fn content_interactive(&self) -> bool {
        self.overlay == Overlay::Empty
    }

    /// Whether the load is still in progress. Anything else has nothing left
    /// to tick for.
    pub fn is_loading(&self) -> bool {
        matches!(self.overlay, Overlay::Loading { .. })
    }
}

/// Maps the loader state to what the screen shows. Every state has exactly
/// one overlay; the error is flattened to text only here.
pub fn present(state: &loader::State) -> Presentation {
    let (overlay, content_opacity) = match state {
        loader::State::Progressing(progress) => (
            Overlay::Loading {
                progress: *progress,
            },
            DIMMED_OPACITY,
        ),

        loader::State::Failure(err) => (
            Overlay::Error {
                message: err.to_string(),
            },
            DIMMED_OPACITY,
        ),

        loader::State::NoConnection => (Overlay::Offline, DIMMED_OPACITY),

        loader::State::Finished => (Overlay::Empty, FULL_OPACITY),

        loader::State::Other => (Overlay::Empty, DIMMED_OPACITY),
    };

    Presentation {
        overlay,
        content_opacity,
    }
}

pub fn error_text(message: &str) -> String {
    format!("{ERROR_PREFIX}{message}")
}

/// The entry screen. Owns the loader's state tracker and the decorative
/// animation clock of the loading overlay.
pub struct Screen {
    loader: loader::Tracker,
    ambient: Ambient,
}

impl Screen {
    pub fn new(loader: loader::Tracker) -> Self {
        Self {
            loader,
            ambient: Ambient::default(),
        }
    }

    pub fn presentation(&self) -> Presentation {
        present(self.loader.state())
    }

    /// Feeds a loader event. Returns the new presentation when the state
    /// changed.
    pub fn on_loader_event(&mut self, event: loader::Event, now: Instant) -> Option<Presentation> {
        if !self.loader.apply(event, now) {
            return None;
        }

        let presentation = self.presentation();

        if presentation.is_loading() {
            self.ambient.start(now);
        } else {
            self.ambient.stop();
        }

        Some(presentation)
    }

    pub fn tick(&mut self, now: Instant) {
        self.ambient.tick(now);
    }

    pub fn is_animating(&self) -> bool {
        self.ambient.is_running()
    }

    pub fn view(&self) -> Element<'_, Message> {
        match self.presentation().overlay {
            Overlay::Loading { progress } => overlay::view(progress, self.ambient.phase()),

            Overlay::Error { message } => {
                centered(widget::text(error_text(&message)).color(ERROR_COLOR))
            }

            Overlay::Offline => centered(widget::text(OFFLINE_TEXT).color(OFFLINE_COLOR)),

            Overlay::Empty => widget::Space::new(Length::Fill, Length::Fill).into(),
        }
    }
}

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

#[cfg(test)]
mod test {
    use {super::*, std::time::Duration, wasm_bindgen_test::*};

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn screen() -> Screen {
        Screen::new(loader::Tracker::new(TIMEOUT))
    }

    #[wasm_bindgen_test]
    fn every_state_has_one_overlay() {
        let cases = [
            (
                loader::State::Progressing(0.4),
                Overlay::Loading { progress: 0.4 },
                DIMMED_OPACITY,
            ),
            (
                loader::State::Failure(loader::Error::Timeout),
                Overlay::Error {
                    message: "Timeout".to_owned(),
                },
                DIMMED_OPACITY,
            ),
            (loader::State::NoConnection, Overlay::Offline, DIMMED_OPACITY),
            (loader::State::Finished, Overlay::Empty, FULL_OPACITY),
            (loader::State::Other, Overlay::Empty, DIMMED_OPACITY),
        ];

        for (state, overlay, opacity) in cases {
            assert_eq!(present(&state), Presentation {
                overlay,
                content_opacity: opacity,
            });
        }
    }

    #[wasm_bindgen_test]
    fn error_message_is_verbatim() {
        let state = loader::State::Failure("Timeout".into());
        let Overlay::Error { message } = present(&state).overlay else {
            panic!("expected error overlay");
        };

        assert_eq!(message, "Timeout");
        assert!(error_text(&message).contains("Timeout"));

        let raw = "<b>net::ERR_NAME_NOT_RESOLVED</b> ünïcode";
        let state = loader::State::Failure(raw.into());
        assert_eq!(present(&state).overlay, Overlay::Error {
            message: raw.to_owned()
        });
    }

    #[wasm_bindgen_test]
    fn progress_then_finish_sequence() {
        let states = [
            loader::State::Progressing(0.1),
            loader::State::Progressing(0.9),
            loader::State::Finished,
        ];

        let shown: Vec<_> = states.iter().map(present).collect();

        assert_eq!(shown[0].overlay, Overlay::Loading { progress: 0.1 });
        assert_eq!(shown[0].content_opacity, DIMMED_OPACITY);
        assert_eq!(shown[1].overlay, Overlay::Loading { progress: 0.9 });
        assert_eq!(shown[1].content_opacity, DIMMED_OPACITY);
        assert_eq!(shown[2].overlay, Overlay::Empty);
        assert_eq!(shown[2].content_opacity, FULL_OPACITY);
        assert!(shown[2].content_interactive());
        assert!(!shown[0].content_interactive());
    }

    #[wasm_bindgen_test]
    fn ambient_follows_loading_overlay() {
        let now = Instant::now();
        let mut screen = screen();

        assert!(!screen.is_animating());
        assert_eq!(screen.presentation().content_opacity, DIMMED_OPACITY);

        let shown = screen.on_loader_event(loader::Event::Started, now);
        assert_eq!(
            shown.map(|p| p.overlay),
            Some(Overlay::Loading { progress: 0.0 })
        );
        assert!(screen.is_animating());

        let shown = screen.on_loader_event(loader::Event::Loaded, now + Duration::from_secs(1));
        assert_eq!(shown, Some(Presentation {
            overlay: Overlay::Empty,
            content_opacity: FULL_OPACITY,
        }));
        assert!(!screen.is_animating());

        // Nothing changes, nothing is reported.
        assert_eq!(
            screen.on_loader_event(loader::Event::Tick, now + Duration::from_secs(2)),
            None
        );
    }

    #[wasm_bindgen_test]
    fn finished_back_to_progressing() {
        let now = Instant::now();
        let mut screen = screen();

        screen.on_loader_event(loader::Event::Started, now);
        screen.on_loader_event(loader::Event::Loaded, now);
        screen.on_loader_event(loader::Event::Started, now);

        assert_eq!(screen.presentation().overlay, Overlay::Loading {
            progress: 0.0
        });
        assert!(screen.is_animating());
    }

    #[wasm_bindgen_test]
    fn offline_stops_animation() {
        let now = Instant::now();
        let mut screen = screen();

        screen.on_loader_event(loader::Event::Started, now);
        screen.on_loader_event(loader::Event::Offline, now);

        assert_eq!(screen.presentation().overlay, Overlay::Offline);
        assert!(!screen.is_animating());
    }

    #[wasm_bindgen_test]
    fn timeout_and_offline_end_loading() {
        let now = Instant::now();
        let mut screen = screen();

        let shown = screen.on_loader_event(loader::Event::Started, now);
        assert!(shown.is_some_and(|p| p.is_loading()));

        let shown = screen.on_loader_event(loader::Event::Tick, now + TIMEOUT + Duration::from_secs(1));
        assert!(shown.is_some_and(|p| !p.is_loading()));

        screen.on_loader_event(loader::Event::Started, now);
        let shown = screen.on_loader_event(loader::Event::Offline, now);
        assert!(shown.is_some_and(|p| !p.is_loading()));
        assert!(!screen.presentation().content_interactive());
    }
}
