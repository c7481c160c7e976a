// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Checks the raster backend against real pixels.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use assert_matches::assert_matches;
use trellis_core::color::{BlendMode, Color, GradientStop, LinearGradient, RadialGradient};
use trellis_core::error::{ErrorKind, ErrorRecord, ErrorSink};
use trellis_core::geometry::{Point, Rect, Size};
use trellis_core::render::{FitMode, ImageSource, PixelBuffer, RenderContext, TextStyle, shapes};
use trellis_raster::{RasterBackend, save_png};

struct Canvas {
    render: RenderContext,
    errors: Rc<RefCell<Vec<ErrorRecord>>>,
}

impl Canvas {
    fn new(width: i32, height: i32) -> Self {
        let backend = RasterBackend::new(Size::new(width, height)).unwrap();
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = ErrorSink::new();
        let errors_clone = errors.clone();
        sink.set(move |record| errors_clone.borrow_mut().push(record.clone()));
        let mut render = RenderContext::new(Box::new(backend), sink);
        render.begin_frame();
        render.clear(Some(Color::WHITE));
        Self { render, errors }
    }

    fn pixel(&self, x: i32, y: i32) -> Color {
        self.render
            .capture_buffer(Rect::new(x, y, 1, 1))
            .unwrap()
            .pixel(0, 0)
            .unwrap()
    }
}

#[track_caller]
fn assert_close(actual: Color, expected: Color, tolerance: u8) {
    let channels = |c: Color| [c.r, c.g, c.b, c.a];
    let close = channels(actual)
        .iter()
        .zip(channels(expected))
        .all(|(a, e)| a.abs_diff(e) <= tolerance);
    assert!(close, "{actual:?} is not within {tolerance} of {expected:?}");
}

fn temp_png(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "trellis_raster_{}_{name}.png",
        std::process::id()
    ))
}

#[test]
fn saved_state_isolates_transforms() {
    let mut canvas = Canvas::new(200, 200);
    let render = &mut canvas.render;
    render.set_fill(Color::RED);
    render.push_state();
    render.translate(50., 50.);
    shapes::fill_rect(render, Rect::new(0., 0., 100., 100.));
    render.pop_state().unwrap();
    render.set_fill(Color::BLUE);
    shapes::fill_rect(render, Rect::new(0., 0., 100., 100.));
    render.end_frame().unwrap();

    assert_eq!(canvas.pixel(25, 25), Color::BLUE);
    assert_eq!(canvas.pixel(75, 75), Color::BLUE);
    assert_eq!(canvas.pixel(125, 125), Color::RED);
    assert_eq!(canvas.pixel(175, 175), Color::WHITE);
    assert_eq!(canvas.pixel(125, 25), Color::WHITE);
    assert!(canvas.errors.borrow().is_empty(), "balanced frame");
}

#[test]
fn clip_rects_intersect() {
    let mut canvas = Canvas::new(100, 100);
    let render = &mut canvas.render;
    render.clip_rect(Rect::new(10., 10., 50., 50.));
    render.clip_rect(Rect::new(30., 30., 50., 50.));
    render.set_fill(Color::GREEN);
    shapes::fill_rect(render, Rect::new(0., 0., 100., 100.));

    assert_eq!(canvas.pixel(40, 40), Color::GREEN);
    assert_eq!(canvas.pixel(59, 59), Color::GREEN);
    assert_eq!(canvas.pixel(20, 20), Color::WHITE);
    assert_eq!(canvas.pixel(60, 60), Color::WHITE);
    assert_eq!(canvas.pixel(90, 40), Color::WHITE);
}

#[test]
fn clip_follows_the_transform() {
    let mut canvas = Canvas::new(100, 100);
    let render = &mut canvas.render;
    render.translate(40., 0.);
    render.clip_rect(Rect::new(0., 0., 20., 100.));
    render.reset_transform();
    render.set_fill(Color::BLACK);
    shapes::fill_rect(render, Rect::new(0., 0., 100., 100.));

    assert_eq!(canvas.pixel(10, 50), Color::WHITE);
    assert_eq!(canvas.pixel(45, 50), Color::BLACK);
    assert_eq!(canvas.pixel(70, 50), Color::WHITE);
}

#[test]
fn global_alpha_blends_over_the_background() {
    let mut canvas = Canvas::new(20, 20);
    let render = &mut canvas.render;
    render.set_alpha(0.5);
    render.set_fill(Color::RED);
    shapes::fill_rect(render, Rect::new(0., 0., 20., 20.));

    assert_close(canvas.pixel(10, 10), Color::from_rgb8(255, 128, 128), 2);
}

#[test]
fn blend_modes_combine_with_the_destination() {
    let mut canvas = Canvas::new(40, 20);
    let render = &mut canvas.render;
    render.set_fill(Color::from_rgb8(255, 255, 0));
    shapes::fill_rect(render, Rect::new(0., 0., 20., 20.));

    render.set_blend_mode(BlendMode::Multiply);
    render.set_fill(Color::from_rgb8(0, 255, 255));
    shapes::fill_rect(render, Rect::new(0., 0., 20., 20.));

    render.set_blend_mode(BlendMode::Difference);
    render.set_fill(Color::RED);
    shapes::fill_rect(render, Rect::new(20., 0., 20., 20.));

    assert_close(canvas.pixel(10, 10), Color::GREEN, 2);
    assert_close(canvas.pixel(30, 10), Color::from_rgb8(0, 255, 255), 2);
}

#[test]
fn linear_gradient_runs_between_its_points() {
    let mut canvas = Canvas::new(100, 10);
    let render = &mut canvas.render;
    render.set_fill(LinearGradient::new(
        Point::new(0., 0.),
        Point::new(100., 0.),
        [
            GradientStop::new(0., Color::BLACK),
            GradientStop::new(1., Color::WHITE),
        ],
    ));
    shapes::fill_rect(render, Rect::new(0., 0., 100., 10.));

    let reds: Vec<u8> = [0, 25, 50, 75, 99]
        .into_iter()
        .map(|x| canvas.pixel(x, 5).r)
        .collect();
    assert!(reds[0] < 10, "starts black: {reds:?}");
    assert!(reds[4] > 245, "ends white: {reds:?}");
    assert!(reds[2].abs_diff(128) < 10, "midpoint is grey: {reds:?}");
    assert!(reds.is_sorted(), "monotonic: {reds:?}");
}

#[test]
fn radial_gradient_radiates_from_its_center() {
    let mut canvas = Canvas::new(100, 100);
    let render = &mut canvas.render;
    render.set_fill(RadialGradient::new(
        Point::new(50., 50.),
        40.,
        [
            GradientStop::new(0., Color::RED),
            GradientStop::new(1., Color::BLUE),
        ],
    ));
    shapes::fill_rect(render, Rect::new(0., 0., 100., 100.));

    assert_close(canvas.pixel(50, 50), Color::RED, 8);
    // Beyond the radius the last stop is padded out.
    assert_close(canvas.pixel(2, 2), Color::BLUE, 2);
}

#[test]
fn strokes_straddle_the_outline() {
    let mut canvas = Canvas::new(60, 60);
    let render = &mut canvas.render;
    render.set_stroke(Color::BLACK);
    render.set_line_width(4.);
    shapes::stroke_rect(render, Rect::new(10., 10., 40., 40.));

    assert_eq!(canvas.pixel(10, 30), Color::BLACK);
    assert_eq!(canvas.pixel(8, 30), Color::BLACK);
    assert_eq!(canvas.pixel(30, 30), Color::WHITE);
    assert_eq!(canvas.pixel(4, 30), Color::WHITE);
}

#[test]
fn text_draws_a_box_per_character() {
    let mut canvas = Canvas::new(60, 40);
    let render = &mut canvas.render;
    render.set_text_style(TextStyle::new("monospace", 20.).with_color(Color::BLACK));
    render.draw_text("a b", kurbo::Point::new(10., 30.));

    // Boxes are 9.6 wide, 14 tall, and advance by 12.
    assert_eq!(canvas.pixel(15, 25), Color::BLACK);
    assert_eq!(canvas.pixel(22, 25), Color::WHITE);
    assert_eq!(canvas.pixel(28, 25), Color::WHITE);
    assert_eq!(canvas.pixel(40, 25), Color::BLACK);
    assert_eq!(canvas.pixel(15, 10), Color::WHITE);
    assert!(canvas.errors.borrow().is_empty(), "monospace is a known family");
}

#[test]
fn unknown_font_family_is_reported_once() {
    let mut canvas = Canvas::new(60, 40);
    let render = &mut canvas.render;
    render.set_text_style(TextStyle::new("Nonexistent Sans", 20.));
    render.draw_text("x", kurbo::Point::new(10., 30.));
    render.draw_text("y", kurbo::Point::new(30., 30.));

    // It still draws with the default family.
    assert_eq!(canvas.pixel(15, 25), Color::BLACK);
    let errors = canvas.errors.borrow();
    assert_matches!(&errors[..], [record] if record.kind == ErrorKind::ResourceMiss);
}

fn quadrants() -> PixelBuffer {
    let mut buffer = PixelBuffer::new(2, 2);
    buffer.set_pixel(0, 0, Color::RED);
    buffer.set_pixel(1, 0, Color::GREEN);
    buffer.set_pixel(0, 1, Color::BLUE);
    buffer.set_pixel(1, 1, Color::BLACK);
    buffer
}

#[test]
fn images_are_scaled_into_their_destination() {
    let mut canvas = Canvas::new(40, 40);
    let image = quadrants();
    canvas.render.draw_image(
        ImageSource::Buffer(&image),
        Rect::new(10., 10., 20., 20.),
        FitMode::Stretch,
    );

    assert_close(canvas.pixel(13, 13), Color::RED, 2);
    assert_close(canvas.pixel(26, 13), Color::GREEN, 2);
    assert_close(canvas.pixel(13, 26), Color::BLUE, 2);
    assert_close(canvas.pixel(26, 26), Color::BLACK, 2);
    assert_eq!(canvas.pixel(5, 5), Color::WHITE);
    assert_eq!(canvas.pixel(35, 35), Color::WHITE);
}

#[test]
fn cropping_fit_modes_stay_inside_the_destination() {
    let mut canvas = Canvas::new(40, 40);
    let image = quadrants();
    // Natural size at the origin: a 2x2 image in a 1x1 destination shows only red.
    canvas.render.draw_image(
        ImageSource::Buffer(&image),
        Rect::new(5., 5., 1., 1.),
        FitMode::None,
    );
    assert_eq!(canvas.pixel(5, 5), Color::RED);
    assert_eq!(canvas.pixel(6, 5), Color::WHITE);
    assert_eq!(canvas.pixel(5, 6), Color::WHITE);
}

#[test]
fn image_files_are_loaded_and_missing_ones_reported_once() {
    let path = temp_png("file_round_trip");
    save_png(&quadrants(), &path).unwrap();

    let mut canvas = Canvas::new(40, 40);
    let render = &mut canvas.render;
    render.draw_image(
        ImageSource::Path(&path),
        Rect::new(0., 0., 20., 20.),
        FitMode::Stretch,
    );
    let missing = temp_png("does_not_exist");
    for _ in 0..3 {
        render.draw_image(
            ImageSource::Path(&missing),
            Rect::new(20., 20., 20., 20.),
            FitMode::Stretch,
        );
    }
    let _ = std::fs::remove_file(&path);

    assert_close(canvas.pixel(3, 3), Color::RED, 2);
    assert_close(canvas.pixel(16, 16), Color::BLACK, 2);
    assert_eq!(canvas.pixel(30, 30), Color::WHITE);
    let errors = canvas.errors.borrow();
    assert_matches!(&errors[..], [record] if record.kind == ErrorKind::ResourceMiss);
}

#[test]
fn swapping_presents_the_back_buffer() {
    let mut canvas = Canvas::new(10, 10);
    let render = &mut canvas.render;
    render.set_fill(Color::RED);
    shapes::fill_rect(render, Rect::new(0., 0., 10., 10.));

    let front = render.front_buffer().unwrap();
    assert_eq!(front.pixel(5, 5), Some(Color::TRANSPARENT));

    render.end_frame().unwrap();
    render.swap_buffers().unwrap();
    let front = render.front_buffer().unwrap();
    assert_eq!(front.pixel(5, 5), Some(Color::RED));
    // The new back buffer starts from the presented frame.
    assert_eq!(canvas.pixel(5, 5), Color::RED);

    let render = &mut canvas.render;
    render.begin_frame();
    render.set_fill(Color::BLUE);
    shapes::fill_rect(render, Rect::new(0., 0., 5., 10.));
    assert_eq!(canvas.pixel(2, 5), Color::BLUE);
    assert_eq!(
        canvas.render.front_buffer().unwrap().pixel(2, 5),
        Some(Color::RED)
    );
}

#[test]
fn reading_outside_the_surface_is_transparent() {
    let canvas = Canvas::new(10, 10);
    let region = canvas.render.capture_buffer(Rect::new(8, 8, 4, 4)).unwrap();
    assert_eq!((region.width(), region.height()), (4, 4));
    assert_eq!(region.pixel(0, 0), Some(Color::WHITE));
    assert_eq!(region.pixel(1, 1), Some(Color::WHITE));
    assert_eq!(region.pixel(2, 2), Some(Color::TRANSPARENT));
}

#[test]
fn resizing_discards_the_content() {
    let mut canvas = Canvas::new(10, 10);
    canvas.render.resize(Size::new(20, 5));
    assert_eq!(canvas.render.size(), Size::new(20, 5));
    assert_eq!(canvas.pixel(2, 2), Color::TRANSPARENT);
    assert_eq!(canvas.pixel(15, 2), Color::TRANSPARENT);
}
