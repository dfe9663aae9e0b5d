use {
    crate::app::Message,
    iced::{
        Color,
        Element,
        Length,
        Point,
        Renderer,
        Size,
        Theme,
        mouse,
        widget::{
            Canvas,
            canvas::{self, Frame, Path, Stroke, gradient},
        },
    },
};

/// The fill never gets narrower than this, so that an almost empty bar is
/// still visible.
pub const MIN_FILL_WIDTH: f32 = 12.0;
pub const HANDLE_DIAMETER: f32 = 16.0;
pub const BAR_HEIGHT: f32 = 12.0;

const TRACK_COLOR: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.15);
const TRACK_OUTLINE_COLOR: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.25);
const HANDLE_COLOR: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.9);
const FILL_COLORS: [Color; 3] = [
    Color::from_rgb(0.2, 0.85, 0.95),
    Color::from_rgb(0.0, 0.48, 1.0),
    Color::from_rgb(0.69, 0.32, 0.87),
];

/// Width of the filled part of a track that is `track_width` pixels wide.
///
/// Any input is accepted: the result is clamped to `[MIN_FILL_WIDTH,
/// track_width]`, and to the track itself when the track is narrower than the
/// minimum.
pub fn fill_width(progress: f32, track_width: f32) -> f32 {
    let track_width = track_width.max(0.0);
    (progress * track_width).max(MIN_FILL_WIDTH).min(track_width)
}

/// Left edge of the handle, centered on the right edge of the fill.
pub fn handle_offset(fill_width: f32) -> f32 {
    fill_width - HANDLE_DIAMETER / 2.0
}

pub struct ProgressBar {
    progress: f32,
}

impl ProgressBar {
    pub fn new(progress: f32) -> Self {
        Self { progress }
    }

    pub fn view<'a>(self) -> Element<'a, Message> {
        Canvas::new(self)
            .width(Length::Fill)
            .height(HANDLE_DIAMETER)
            .into()
    }
}

impl canvas::Program<Message> for ProgressBar {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<Renderer>> {
        let mut frame = Frame::new(renderer, bounds.size());
        let track_width = bounds.width;
        let top = (bounds.height - BAR_HEIGHT) / 2.0;
        let radius = BAR_HEIGHT / 2.0;

        let track = Path::rounded_rectangle(
            Point::new(0.0, top),
            Size::new(track_width, BAR_HEIGHT),
            radius.into(),
        );

        frame.fill(&track, TRACK_COLOR);
        frame.stroke(
            &track,
            Stroke::default()
                .with_width(1.0)
                .with_color(TRACK_OUTLINE_COLOR),
        );

        let width = fill_width(self.progress, track_width);
        let fill = Path::rounded_rectangle(
            Point::new(0.0, top),
            Size::new(width, BAR_HEIGHT),
            radius.into(),
        );
        let [start, middle, end] = FILL_COLORS;
        let fill_gradient = gradient::Linear::new(Point::ORIGIN, Point::new(width, 0.0))
            .add_stop(0.0, start)
            .add_stop(0.5, middle)
            .add_stop(1.0, end);

        frame.fill(&fill, fill_gradient);

        let handle_radius = HANDLE_DIAMETER / 2.0;
        let handle = Path::circle(
            Point::new(handle_offset(width) + handle_radius, bounds.height / 2.0),
            handle_radius,
        );

        frame.fill(&handle, HANDLE_COLOR);

        vec![frame.into_geometry()]
    }
}
