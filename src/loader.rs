use {
    crate::{app::Message, util, webview::WebView},
    futures_util::stream,
    iced::futures::{
        SinkExt,
        Stream,
        StreamExt,
        channel::{
            mpsc::{self, UnboundedSender},
            oneshot,
        },
    },
    instant::Instant,
    std::{cell::Cell, rc::Rc, time::Duration},
};

const TICK_INTERVAL_MS: i32 = 100;

/// Estimated progress approaches this value but never reaches it. Only a
/// `Loaded` event completes the bar.
const PROGRESS_CEILING: f32 = 0.95;
const PROGRESS_TIME_CONSTANT: Duration = Duration::from_millis(2500);

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    #[error("Timeout")]
    Timeout,

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Web view is not available: {0}")]
    WebView(String),

    #[error("Loader worker is not available")]
    WorkerNotAvailable,

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_owned())
    }
}

/// What the page load currently looks like from the outside.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum State {
    Progressing(f32),
    Failure(Error),
    NoConnection,
    Finished,
    #[default]
    Other,
}

/// Raw signals coming from the content surface, the browser, and the timer.
#[derive(Debug, Clone)]
pub enum Event {
    Started,
    Tick,
    Loaded,
    Failed(Error),
    Offline,
    Online,
}

/// Folds load events into the current [`State`]. This is the only place
/// where the state changes.
#[derive(Debug)]
pub struct Tracker {
    state: State,
    started_at: Option<Instant>,
    timeout: Duration,
}

impl Tracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: State::default(),
            started_at: None,
            timeout,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Applies `event` observed at `now`. Returns `true` if the state changed.
    pub fn apply(&mut self, event: Event, now: Instant) -> bool {
        let next = match (event, &self.state) {
            (Event::Started, _) => {
                self.started_at = Some(now);
                State::Progressing(0.0)
            }

            (Event::Tick, State::Progressing(current)) => {
                let elapsed = self
                    .started_at
                    .map(|started_at| elapsed_between(started_at, now))
                    .unwrap_or_default();

                if elapsed > self.timeout {
                    tracing::warn!(?elapsed, "page load timed out");
                    State::Failure(Error::Timeout)
                } else {
                    State::Progressing(estimate(elapsed).max(*current))
                }
            }

            (Event::Tick, _) => return false,

            (Event::Loaded, _) => State::Finished,

            (Event::Failed(err), _) => {
                tracing::warn!(?err, "page load failed");
                State::Failure(err)
            }

            (Event::Offline, State::Finished) => return false,

            (Event::Offline, _) => State::NoConnection,

            (Event::Online, State::NoConnection) => State::Other,

            (Event::Online, _) => return false,
        };

        if next == self.state {
            return false;
        }

        tracing::debug!(from = ?self.state, to = ?next, "load state changed");
        self.state = next;
        true
    }
}

/// Estimated load progress after `elapsed`. Strictly increasing and bounded
/// by [`PROGRESS_CEILING`].
pub fn estimate(elapsed: Duration) -> f32 {
    let t = elapsed.as_secs_f32() / PROGRESS_TIME_CONSTANT.as_secs_f32();
    PROGRESS_CEILING * (1.0 - (-t).exp())
}

fn elapsed_between(earlier: Instant, later: Instant) -> Duration {
    if later > earlier {
        later - earlier
    } else {
        Duration::ZERO
    }
}

#[derive(Debug)]
enum Command {
    Load {
        url: String,
        resp: oneshot::Sender<Result<(), Error>>,
    },
    Present {
        opacity: f32,
        interactive: bool,
    },
    Settle,
}

/// Handle to the loader worker, announced with [`Message::LoaderReady`].
#[derive(Debug, Clone)]
pub struct Connector(UnboundedSender<Command>);

impl Connector {
    /// Starts loading `url`, mounting the web view on first use.
    pub async fn load(self, url: String) -> Result<(), Error> {
        let (tx, rx) = oneshot::channel();
        let worker_tx = self.0;

        if worker_tx.unbounded_send(Command::Load { url, resp: tx }).is_err() {
            return Err(Error::WorkerNotAvailable);
        }

        rx.await.map_err(|_| Error::WorkerNotAvailable)??;

        Ok(())
    }

    pub fn present(&self, opacity: f32, interactive: bool) {
        let cmd = Command::Present {
            opacity,
            interactive,
        };

        if self.0.unbounded_send(cmd).is_err() {
            tracing::warn!("loader worker is gone, presentation not applied");
        }
    }

    /// Stops the progress ticker of the current load. The next `load` starts
    /// a fresh one.
    pub fn settle(&self) {
        if self.0.unbounded_send(Command::Settle).is_err() {
            tracing::warn!("loader worker is gone, ticker not settled");
        }
    }
}

/// Shared between the worker, the web view callbacks and the progress ticker.
#[derive(Default)]
struct Session {
    generation: Cell<u32>,
    settled: Cell<bool>,
}

impl Session {
    /// Starts a new load and returns its generation.
    fn begin(&self) -> u32 {
        let generation = self.generation.get().wrapping_add(1);

        self.generation.set(generation);
        self.settled.set(false);
        generation
    }

    fn settle(&self) {
        self.settled.set(true);
    }

    fn keeps_ticking(&self, generation: u32) -> bool {
        !self.settled.get() && self.generation.get() == generation
    }
}

pub fn worker() -> impl Stream<Item = Message> {
    let (mut out_tx, out_rx) = mpsc::unbounded();
    let (worker_tx, mut worker_rx) = mpsc::unbounded();

    stream::select(
        out_rx,
        stream::once(async move {
            let _ = out_tx
                .send(Message::LoaderReady(Connector(worker_tx)))
                .await;

            let session = Rc::new(Session::default());
            let mut view = None;

            while let Some(cmd) = worker_rx.next().await {
                match cmd {
                    Command::Load { url, resp } => {
                        let result = load(&mut view, &url, &session, &out_tx);
                        let _ = resp.send(result);
                    }

                    Command::Present {
                        opacity,
                        interactive,
                    } => {
                        if let Some(view) = &view {
                            view.set_presentation(opacity, interactive);
                        }
                    }

                    Command::Settle => session.settle(),
                }
            }
        })
        .filter_map(|_| async { None }),
    )
}

fn load(
    view: &mut Option<WebView>,
    url: &str,
    session: &Rc<Session>,
    out_tx: &UnboundedSender<Message>,
) -> Result<(), Error> {
    let generation = session.begin();

    if let Some(existing) = view.as_ref() {
        existing.navigate(url);
    } else {
        *view = Some(WebView::mount(url, emitter(session, out_tx))?);
    }

    emit(out_tx, Event::Started);

    if !view.as_ref().is_none_or(WebView::is_online) {
        emit(out_tx, Event::Offline);
    }

    spawn_ticker(session.clone(), generation, out_tx.clone());

    Ok(())
}

fn emitter(
    session: &Rc<Session>,
    out_tx: &UnboundedSender<Message>,
) -> impl Fn(Event) + Clone + 'static {
    let session = session.clone();
    let out_tx = out_tx.clone();

    move |event| {
        if matches!(event, Event::Loaded | Event::Failed(_)) {
            session.settle();
        }

        emit(&out_tx, event);
    }
}

fn emit(out_tx: &UnboundedSender<Message>, event: Event) {
    let _ = out_tx.unbounded_send(Message::Loader(event));
}

fn spawn_ticker(session: Rc<Session>, generation: u32, out_tx: UnboundedSender<Message>) {
    wasm_bindgen_futures::spawn_local(async move {
        loop {
            util::sleep(TICK_INTERVAL_MS).await;

            if !session.keeps_ticking(generation) {
                break;
            }

            if out_tx.unbounded_send(Message::Loader(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Simulated page load for running the shell without a content page.
pub mod mock {
    use super::*;

    const LOAD_DURATION_MS: i32 = 4_000;

    pub fn worker() -> impl Stream<Item = Message> {
        let ticks = stream::unfold(0, |elapsed| async move {
            if elapsed >= LOAD_DURATION_MS {
                return None;
            }

            util::sleep(TICK_INTERVAL_MS).await;
            Some((Message::Loader(Event::Tick), elapsed + TICK_INTERVAL_MS))
        });

        stream::once(async { Message::Loader(Event::Started) })
            .chain(ticks)
            .chain(stream::once(async { Message::Loader(Event::Loaded) }))
    }
}

#[cfg(test)]
mod test {
    use {super::*, wasm_bindgen_test::*};

    const TIMEOUT: Duration = Duration::from_secs(30);

    #[wasm_bindgen_test]
    fn estimate_is_increasing_and_bounded() {
        assert_eq!(estimate(Duration::ZERO), 0.0);

        let mut prev = 0.0;

        for ms in (100..60_000).step_by(100) {
            let value = estimate(Duration::from_millis(ms));
            assert!(value > prev);
            assert!(value < PROGRESS_CEILING);
            prev = value;
        }
    }

    #[wasm_bindgen_test]
    fn starts_in_other_state() {
        let tracker = Tracker::new(TIMEOUT);
        assert_eq!(tracker.state(), &State::Other);
    }

    #[wasm_bindgen_test]
    fn progress_then_finish() {
        let start = Instant::now();
        let mut tracker = Tracker::new(TIMEOUT);

        assert!(tracker.apply(Event::Started, start));
        assert_eq!(tracker.state(), &State::Progressing(0.0));

        let mut prev = 0.0;

        for secs in 1..10 {
            tracker.apply(Event::Tick, start + Duration::from_secs(secs));

            let State::Progressing(value) = *tracker.state() else {
                panic!("unexpected state: {:?}", tracker.state());
            };

            assert!(value >= prev);
            prev = value;
        }

        assert!(tracker.apply(Event::Loaded, start + Duration::from_secs(10)));
        assert_eq!(tracker.state(), &State::Finished);

        // Late ticks don't resurrect the progress state.
        assert!(!tracker.apply(Event::Tick, start + Duration::from_secs(11)));
        assert_eq!(tracker.state(), &State::Finished);
    }

    #[wasm_bindgen_test]
    fn ticks_before_start_are_ignored() {
        let mut tracker = Tracker::new(TIMEOUT);
        assert!(!tracker.apply(Event::Tick, Instant::now()));
        assert_eq!(tracker.state(), &State::Other);
    }

    #[wasm_bindgen_test]
    fn timeout_fails_the_load() {
        let start = Instant::now();
        let mut tracker = Tracker::new(Duration::from_secs(5));

        tracker.apply(Event::Started, start);
        tracker.apply(Event::Tick, start + Duration::from_secs(6));

        assert_eq!(tracker.state(), &State::Failure(Error::Timeout));
    }

    #[wasm_bindgen_test]
    fn failure_keeps_structured_error() {
        let mut tracker = Tracker::new(TIMEOUT);
        let err = Error::Navigation("dns lookup failed".to_owned());

        tracker.apply(Event::Started, Instant::now());
        tracker.apply(Event::Failed(err.clone()), Instant::now());

        assert_eq!(tracker.state(), &State::Failure(err));
    }

    #[wasm_bindgen_test]
    fn connectivity_changes() {
        let now = Instant::now();
        let mut tracker = Tracker::new(TIMEOUT);

        tracker.apply(Event::Started, now);
        assert!(tracker.apply(Event::Offline, now));
        assert_eq!(tracker.state(), &State::NoConnection);

        assert!(tracker.apply(Event::Online, now));
        assert_eq!(tracker.state(), &State::Other);

        // Coming online while not offline changes nothing.
        assert!(!tracker.apply(Event::Online, now));

        tracker.apply(Event::Loaded, now);
        assert!(!tracker.apply(Event::Offline, now));
        assert_eq!(tracker.state(), &State::Finished);
    }

    #[wasm_bindgen_test]
    fn restart_after_finish_is_accepted() {
        let now = Instant::now();
        let mut tracker = Tracker::new(TIMEOUT);

        tracker.apply(Event::Started, now);
        tracker.apply(Event::Loaded, now);
        assert!(tracker.apply(Event::Started, now));
        assert_eq!(tracker.state(), &State::Progressing(0.0));
    }

    #[wasm_bindgen_test]
    fn settling_stops_the_ticker() {
        let session = Session::default();
        let generation = session.begin();
        assert!(session.keeps_ticking(generation));

        // Timed out or offline: the app settles the session and the ticker
        // exits on its next wake-up.
        session.settle();
        assert!(!session.keeps_ticking(generation));

        // A reload starts ticking again, but not the stale ticker.
        let next = session.begin();
        assert!(session.keeps_ticking(next));
        assert!(!session.keeps_ticking(generation));
    }

    #[wasm_bindgen_test]
    fn error_display() {
        assert_eq!(Error::Timeout.to_string(), "Timeout");
        assert_eq!(Error::from("Timeout").to_string(), "Timeout");
        assert_eq!(
            Error::Navigation("refused".to_owned()).to_string(),
            "Navigation failed: refused"
        );
    }
}
