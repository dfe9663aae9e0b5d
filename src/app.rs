use {
    crate::{config::Config, loader},
    derive_more::From,
    iced::{
        Color,
        Element,
        Subscription,
        Task,
        Theme,
        theme::Palette,
        window,
    },
    instant::Instant,
};

mod entry;
mod overlay;

pub struct App {
    config: Config,
    screen: entry::Screen,
    connector: Option<loader::Connector>,
    theme: Theme,
}

#[derive(From, Debug, Clone)]
pub enum Message {
    LoaderReady(loader::Connector),
    Loader(#[from] loader::Event),
    AnimationFrame,
}

impl App {
    pub fn boot() -> (Self, Task<Message>) {
        let config = Config::load();
        let tracker = loader::Tracker::new(config.load_timeout());

        tracing::info!(url = %config.url, mock = config.mock_loader, "booting shell");

        (
            Self {
                config,
                screen: entry::Screen::new(tracker),
                connector: None,
                theme: shell_theme(),
            },
            Task::none(),
        )
    }

    pub fn title(&self) -> String {
        self.config.title.clone()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LoaderReady(connector) => {
                self.connector = Some(connector.clone());
                return load_page(connector, self.config.url.clone());
            }

            Message::Loader(event) => {
                let reconnected = matches!(event, loader::Event::Online);

                let Some(presentation) = self.screen.on_loader_event(event, Instant::now()) else {
                    return Task::none();
                };

                let Some(connector) = &self.connector else {
                    return Task::none();
                };

                connector.present(
                    presentation.content_opacity,
                    presentation.content_interactive(),
                );

                if !presentation.is_loading() {
                    connector.settle();
                }

                if reconnected {
                    tracing::info!("connection restored, reloading");
                    return load_page(connector.clone(), self.config.url.clone());
                }
            }

            Message::AnimationFrame => {
                self.screen.tick(Instant::now());
            }
        }

        Task::none()
    }

    pub fn view(&self) -> Element<Message> {
        self.screen.view()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let loader = if self.config.mock_loader {
            Subscription::run(loader::mock::worker)
        } else {
            Subscription::run(loader::worker)
        };

        let frames = if self.screen.is_animating() {
            window::frames().map(|_| Message::AnimationFrame)
        } else {
            Subscription::none()
        };

        Subscription::batch([loader, frames])
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }
}

/// Dark palette over a transparent window, so the dimmed web view beneath the
/// shell canvas stays visible around the error and offline text.
fn shell_theme() -> Theme {
    Theme::custom("Bold Moves".to_owned(), Palette {
        background: Color::TRANSPARENT,
        ..Palette::DARK
    })
}

fn load_page(connector: loader::Connector, url: String) -> Task<Message> {
    Task::future(async move {
        match connector.load(url).await {
            Ok(()) => None,

            Err(err) => {
                tracing::warn!(?err, "failed to start page load");
                Some(Message::Loader(loader::Event::Failed(err)))
            }
        }
    })
    .and_then(Task::done)
}
