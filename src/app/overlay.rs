use {
    super::Message,
    crate::progress_bar::ProgressBar,
    iced::{
        Border,
        Color,
        Element,
        Font,
        Length,
        Padding,
        Shadow,
        Theme,
        Vector,
        alignment,
        font,
        widget::{self, Canvas, container},
    },
};

mod ambient;
mod decor;

pub use ambient::{Ambient, Phase};

const TITLE: &str = "Bold Moves Loading…";
const HERO_LABEL: &str = "Leveling up vibes";
const CARD_CAPTION: &str = "Summoning bold magic…";

const TITLE_COLOR: Color = Color::from_rgb(0.85, 0.45, 0.95);
const CARD_MAX_WIDTH: f32 = 480.0;
const CARD_RADIUS: f32 = 18.0;
const STRIPE_AREA_HEIGHT: f32 = 40.0;

const FONT_BLACK: Font = Font {
    weight: font::Weight::Black,
    ..Font::DEFAULT
};

const FONT_SEMIBOLD: Font = Font {
    weight: font::Weight::Semibold,
    ..Font::DEFAULT
};

/// Whole-number percentage shown under the progress bar.
pub fn percent_label(progress: f32) -> String {
    let percent = (progress.clamp(0.0, 1.0) * 100.0).round() as u8;
    format!("{percent}%")
}

/// The loading overlay. The percentage and the bar depend on `progress` only;
/// everything else is decoration driven by `phase`.
pub fn view<'a>(progress: f32, phase: Phase) -> Element<'a, Message> {
    let backdrop = Canvas::new(decor::Backdrop { phase })
        .width(Length::Fill)
        .height(Length::Fill);

    let title = widget::text(TITLE)
        .size(32)
        .font(FONT_BLACK)
        .color(TITLE_COLOR)
        .align_x(alignment::Horizontal::Center);

    let hero = widget::stack![
        Canvas::new(decor::Hero { phase })
            .width(Length::Fill)
            .height(decor::HERO_HEIGHT),
        container(
            widget::text(HERO_LABEL)
                .size(16)
                .font(FONT_SEMIBOLD)
                .color(Color::WHITE)
        )
        .center_x(Length::Fill)
        .center_y(Length::Fill),
    ]
    .width(Length::Fill)
    .height(decor::HERO_HEIGHT);

    let content = widget::column![
        widget::vertical_space(),
        title,
        hero,
        card(progress),
        widget::vertical_space(),
    ]
    .spacing(24)
    .padding(Padding {
        top: 30.0,
        right: 32.0,
        bottom: 20.0 + STRIPE_AREA_HEIGHT,
        left: 32.0,
    })
    .width(Length::Fill)
    .height(Length::Fill)
    .align_x(alignment::Horizontal::Center);

    let ground = widget::column![
        widget::vertical_space(),
        Canvas::new(decor::GroundStripe { phase })
            .width(Length::Fill)
            .height(STRIPE_AREA_HEIGHT),
    ]
    .width(Length::Fill)
    .height(Length::Fill);

    widget::stack![backdrop, content, ground]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn card<'a>(progress: f32) -> Element<'a, Message> {
    let body = widget::column![
        widget::text(CARD_CAPTION)
            .size(18)
            .font(FONT_SEMIBOLD)
            .color(Color::WHITE),
        ProgressBar::new(progress).view(),
        widget::text(percent_label(progress))
            .size(14)
            .color(Color::from_rgba(1.0, 1.0, 1.0, 0.8)),
    ]
    .spacing(12)
    .align_x(alignment::Horizontal::Center);

    container(body)
        .padding([20, 24])
        .width(Length::Fill)
        .max_width(CARD_MAX_WIDTH)
        .style(card_style)
        .into()
}

fn card_style(_: &Theme) -> container::Style {
    container::Style {
        background: Some(Color::from_rgba(1.0, 1.0, 1.0, 0.12).into()),
        border: Border {
            color: Color::from_rgba(1.0, 1.0, 1.0, 0.25),
            width: 1.0,
            radius: CARD_RADIUS.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.25),
            offset: Vector::new(0.0, 10.0),
            blur_radius: 20.0,
        },
        ..container::Style::default()
    }
}

#[cfg(test)]
mod test {
    use {super::*, wasm_bindgen_test::*};

    #[wasm_bindgen_test]
    fn percent_label_rounds() {
        assert_eq!(percent_label(0.0), "0%");
        assert_eq!(percent_label(0.2), "20%");
        assert_eq!(percent_label(0.004), "0%");
        assert_eq!(percent_label(0.016), "2%");
        assert_eq!(percent_label(0.554), "55%");
        assert_eq!(percent_label(0.999), "100%");
        assert_eq!(percent_label(1.0), "100%");
    }

    #[wasm_bindgen_test]
    fn percent_label_clamps() {
        assert_eq!(percent_label(-0.3), "0%");
        assert_eq!(percent_label(7.0), "100%");
        assert_eq!(percent_label(f32::NAN), "0%");
    }
}
