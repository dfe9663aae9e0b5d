use {
    super::ambient::Phase,
    crate::app::Message,
    iced::{
        Color,
        Point,
        Rectangle,
        Renderer,
        Size,
        Theme,
        Vector,
        mouse,
        widget::canvas::{self, Frame, Path, Stroke, gradient, stroke},
    },
};

const BACKDROP_BASE: Color = Color::from_rgb(0.04, 0.03, 0.1);
const BACKDROP_WASH: [Color; 5] = [
    Color::from_rgba(1.0, 0.18, 0.33, 0.4),
    Color::from_rgba(0.69, 0.32, 0.87, 0.4),
    Color::from_rgba(0.0, 0.48, 1.0, 0.4),
    Color::from_rgba(0.2, 0.85, 0.95, 0.4),
    Color::from_rgba(1.0, 0.18, 0.33, 0.4),
];
const GLOW_LAYERS: usize = 6;

const STRIPE_HEIGHT: f32 = 12.0;
const STRIPE_COLORS: [Color; 3] = [
    Color::from_rgb(1.0, 0.18, 0.33),
    Color::from_rgb(0.69, 0.32, 0.87),
    Color::from_rgb(0.0, 0.48, 1.0),
];
const SHIMMER_SPAN: f32 = 0.3;

pub const HERO_HEIGHT: f32 = 200.0;
pub const BADGE_SIZE: Size = Size::new(160.0, 64.0);
const HALO_RADIUS: f32 = 90.0;
const ORB_RADIUS: f32 = 70.0;
const BADGE_RADIUS: f32 = 28.0;

/// Full-screen backdrop: a dark base, a slowly turning colour wash and two
/// soft glows.
pub struct Backdrop {
    pub phase: Phase,
}

impl canvas::Program<Message> for Backdrop {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<Renderer>> {
        let mut frame = Frame::new(renderer, bounds.size());
        let size = bounds.size();
        let center = frame.center();

        frame.fill_rectangle(Point::ORIGIN, size, BACKDROP_BASE);

        let angle = self.phase.backdrop_angle();
        let reach = size.width.max(size.height) * 0.5;
        let dir = Vector::new(angle.cos() * reach, angle.sin() * reach);
        let wash = BACKDROP_WASH.iter().enumerate().fold(
            gradient::Linear::new(center - dir, center + dir),
            |wash, (idx, color)| wash.add_stop(idx as f32 / 4.0, *color),
        );

        frame.fill_rectangle(Point::ORIGIN, size, wash);

        fill_glow(
            &mut frame,
            center + Vector::new(-140.0, -220.0),
            210.0,
            Color::from_rgb(0.2, 0.85, 0.95),
        );
        fill_glow(
            &mut frame,
            center + Vector::new(160.0, 200.0),
            190.0,
            Color::from_rgb(1.0, 0.18, 0.33),
        );

        vec![frame.into_geometry()]
    }
}

/// The hero behind the "Leveling up vibes" badge: a breathing halo, a
/// swaying orb and the badge outline. The badge label is laid on top by the
/// overlay.
pub struct Hero {
    pub phase: Phase,
}

impl canvas::Program<Message> for Hero {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<Renderer>> {
        let mut frame = Frame::new(renderer, bounds.size());
        let center = frame.center();

        fill_glow(
            &mut frame,
            center,
            HALO_RADIUS * self.phase.halo_scale(),
            Color::from_rgb(0.55, 0.35, 0.95),
        );
        fill_glow(
            &mut frame,
            center + self.phase.orb_offset(),
            ORB_RADIUS,
            Color::from_rgb(1.0, 0.45, 0.4),
        );

        let badge = Path::rounded_rectangle(
            Point::new(
                center.x - BADGE_SIZE.width / 2.0,
                center.y - BADGE_SIZE.height / 2.0 + 2.0,
            ),
            BADGE_SIZE,
            BADGE_RADIUS.into(),
        );
        let outline = gradient::Linear::new(
            Point::new(center.x - BADGE_SIZE.width / 2.0, center.y - BADGE_SIZE.height / 2.0),
            Point::new(center.x + BADGE_SIZE.width / 2.0, center.y + BADGE_SIZE.height / 2.0),
        )
        .add_stop(0.0, Color::from_rgba(1.0, 1.0, 1.0, 0.9))
        .add_stop(1.0, Color::from_rgba(1.0, 1.0, 1.0, 0.2));

        frame.fill(&badge, Color::from_rgba(1.0, 1.0, 1.0, 0.08));
        frame.stroke(
            &badge,
            Stroke {
                style: stroke::Style::Gradient(outline.into()),
                width: 2.0,
                ..Stroke::default()
            },
        );

        vec![frame.into_geometry()]
    }
}

/// Gradient strip anchoring the bottom of the overlay, with a highlight
/// sweeping back and forth.
pub struct GroundStripe {
    pub phase: Phase,
}

impl canvas::Program<Message> for GroundStripe {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<Renderer>> {
        let mut frame = Frame::new(renderer, bounds.size());
        let width = bounds.width;
        let top = (bounds.height - STRIPE_HEIGHT) / 2.0;
        let radius = STRIPE_HEIGHT / 2.0;

        let shadow = Path::rounded_rectangle(
            Point::new(0.0, top + radius),
            Size::new(width, STRIPE_HEIGHT - 2.0),
            radius.into(),
        );
        frame.fill(&shadow, Color::from_rgba(1.0, 1.0, 1.0, 0.08));

        let stripe = Path::rounded_rectangle(
            Point::new(0.0, top),
            Size::new(width, STRIPE_HEIGHT),
            radius.into(),
        );
        let [start, middle, end] = STRIPE_COLORS;
        let base = gradient::Linear::new(Point::ORIGIN, Point::new(width, 0.0))
            .add_stop(0.0, start)
            .add_stop(0.5, middle)
            .add_stop(1.0, end);

        frame.fill(&stripe, base);

        let highlight_x = self.phase.shimmer() * width;
        let span = width * SHIMMER_SPAN;
        let highlight = gradient::Linear::new(
            Point::new(highlight_x - span / 2.0, 0.0),
            Point::new(highlight_x + span / 2.0, 0.0),
        )
        .add_stop(0.0, Color::TRANSPARENT)
        .add_stop(0.5, Color::from_rgba(1.0, 1.0, 1.0, 0.45))
        .add_stop(1.0, Color::TRANSPARENT);

        frame.fill(&stripe, highlight);
        frame.stroke(
            &stripe,
            Stroke::default()
                .with_width(1.0)
                .with_color(Color::from_rgba(1.0, 1.0, 1.0, 0.25)),
        );

        vec![frame.into_geometry()]
    }
}

/// Approximates a blurred disc with concentric translucent circles.
fn fill_glow(frame: &mut Frame, center: Point, radius: f32, color: Color) {
    for layer in 0..GLOW_LAYERS {
        let k = 1.0 - layer as f32 / GLOW_LAYERS as f32;
        let circle = Path::circle(center, radius * k);

        frame.fill(&circle, Color { a: 0.08, ..color });
    }
}
