use std::path::PathBuf;
use std::time::Duration;

use quadra_engine::backend::canvas::CanvasCommand;
use quadra_engine::input::{ButtonState, InputEvent};
use quadra_engine::image::{decode_file, TextureOrigin};
use quadra_engine::time::{Clock, ManualClock};
use quadra_engine::{
    AppControl, Backend, CanvasBackend, Color, DrawOptions, EngineConfig, FontAtlasConfig, GlyphGrid, Key,
    LoadError, RecordingCanvas, RenderContext,
};

type Ctx = RenderContext<CanvasBackend<RecordingCanvas>>;

fn context_with(config: EngineConfig) -> (Ctx, ManualClock) {
    let clock = ManualClock::new();
    let backend = CanvasBackend::new(RecordingCanvas::new(800.0, 600.0));
    let ctx = RenderContext::with_clock(backend, config, Box::new(clock.clone()));
    (ctx, clock)
}

fn context() -> (Ctx, ManualClock) {
    context_with(EngineConfig::default().without_font_atlas())
}

/// Fresh directory under the system temp dir, unique per test name.
fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quadra-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// `w × h` PNG: red top row, blue below.
fn write_png(path: &std::path::Path, w: u32, h: u32) {
    let img = image::RgbaImage::from_fn(w, h, |_, y| {
        if y == 0 { image::Rgba([255, 0, 0, 255]) } else { image::Rgba([0, 0, 255, 255]) }
    });
    img.save(path).unwrap();
}

fn key(key: Key, state: ButtonState) -> InputEvent {
    InputEvent::Key { key, state, repeat: false }
}

#[test]
fn missing_file_is_a_load_error_and_null_draw_is_a_no_op() {
    let (mut ctx, _) = context();
    let err = ctx.load_image("/nonexistent.png").unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert_eq!(err.path(), std::path::Path::new("/nonexistent.png"));

    ctx.canvas_mut().take_commands();
    ctx.draw_quad(None, DrawOptions::at(10.0, 10.0));
    assert!(ctx.canvas().commands().is_empty());
    assert_eq!(ctx.canvas().live_images(), 0);
}

#[test]
fn undecodable_bytes_are_a_decode_error() {
    let (mut ctx, _) = context();
    let err = ctx.load_image_from_memory(b"not an image", "junk.png").unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }));
    assert_eq!(err.path(), std::path::Path::new("junk.png"));
}

#[test]
fn canvas_loads_images_without_flipping_rows() {
    let dir = temp_dir("noflip");
    let path = dir.join("two_tone.png");
    write_png(&path, 4, 3);

    let (mut ctx, _) = context();
    let origin = ctx.backend().texture_origin();
    assert_eq!(origin, TextureOrigin::TopLeft);

    // First uploaded row is the file's top row; a GPU upload would start at the bottom.
    let canvas_rows = decode_file(&path, origin).unwrap();
    assert_eq!(canvas_rows.pixel(0, 0), Some([255, 0, 0, 255]));
    let gpu_rows = decode_file(&path, TextureOrigin::BottomLeft).unwrap();
    assert_eq!(gpu_rows.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(gpu_rows.pixel(0, 2), Some([255, 0, 0, 255]));

    let img = ctx.load_image(&path).unwrap();
    assert_eq!((img.width(), img.height()), (4, 3));
    assert_eq!(img.path(), path.as_path());

    // The source rectangle is addressed from the top as well.
    ctx.draw_image(&img, 0.0, 0.0);
    let draws: Vec<_> = ctx.canvas().image_draws().collect();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].1, [0.0, 0.0, 4.0, 3.0]);

    // What the canvas received starts with the top row.
    assert_eq!(ctx.canvas().first_pixel(draws[0].0), Some([255, 0, 0, 255]));

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn delete_twice_releases_once() {
    let dir = temp_dir("delete");
    let path = dir.join("img.png");
    write_png(&path, 2, 2);

    let (mut ctx, _) = context();
    let img = ctx.load_image(&path).unwrap();
    assert_eq!(ctx.canvas().live_images(), 1);

    ctx.delete_image(&img);
    ctx.delete_image(&img);
    assert_eq!(ctx.canvas().live_images(), 0);
    assert_eq!(ctx.canvas().released_images(), 1);

    // Stale handle: skipped.
    ctx.canvas_mut().take_commands();
    ctx.draw_image(&img, 0.0, 0.0);
    assert_eq!(ctx.canvas().image_draws().count(), 0);

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn unset_tint_draws_like_white() {
    let dir = temp_dir("tint");
    let path = dir.join("img.png");
    write_png(&path, 8, 8);

    let (mut ctx, _) = context();
    let img = ctx.load_image(&path).unwrap();

    ctx.canvas_mut().take_commands();
    ctx.draw_quad(Some(&img), DrawOptions::at(3.0, 4.0).with_tint(Color::UNSET));
    let unset = ctx.canvas_mut().take_commands();

    ctx.draw_quad(Some(&img), DrawOptions::at(3.0, 4.0).with_tint(Color::WHITE));
    let white = ctx.canvas_mut().take_commands();

    assert!(!unset.is_empty());
    assert_eq!(unset, white);

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn sugar_calls_lower_to_native_or_scaled_size() {
    let dir = temp_dir("sugar");
    let path = dir.join("img.png");
    write_png(&path, 64, 32);

    let (mut ctx, _) = context();
    let img = ctx.load_image(&path).unwrap();
    ctx.canvas_mut().take_commands();

    ctx.draw_image_scaled(&img, 10.0, 20.0, 2.0, 0.5);
    let transform = ctx
        .canvas()
        .commands()
        .iter()
        .find_map(|c| match c {
            CanvasCommand::SetTransform(m) => Some(*m),
            _ => None,
        })
        .unwrap();
    assert_eq!(transform, [1.0, 0.0, 0.0, 1.0, 10.0, 20.0]);
    let draws: Vec<_> = ctx.canvas().image_draws().collect();
    assert_eq!(draws[0].2, [0.0, 0.0, 128.0, 16.0]);

    ctx.canvas_mut().take_commands();
    ctx.draw_image_tinted(&img, 0.0, 0.0, Color::RED);
    assert!(ctx.canvas().commands().contains(&CanvasCommand::FillRect([0.0, 0.0, 64.0, 32.0])));

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn text_skips_unsupported_chars_but_keeps_their_slot() {
    let dir = temp_dir("text");
    let path = dir.join("atlas.png");
    let grid = GlyphGrid::default();
    let (w, h) = grid.atlas_size();
    write_png(&path, w, h);

    let config = EngineConfig::default().with_font_atlas(FontAtlasConfig { path, grid });
    let (mut ctx, _) = context_with(config);
    ctx.canvas_mut().take_commands();

    ctx.draw_text("A\u{e9}B", 0.0, 0.0, 1.0, Color::WHITE);
    let xs: Vec<f64> = ctx
        .canvas()
        .commands()
        .iter()
        .filter_map(|c| match c {
            CanvasCommand::SetTransform(m) => Some(m[4]),
            _ => None,
        })
        .collect();
    assert_eq!(xs, vec![0.0, 20.0]);

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn replacing_the_font_atlas_releases_the_old_one() {
    let dir = temp_dir("atlas-swap");
    let path = dir.join("atlas.png");
    let grid = GlyphGrid::default();
    let (w, h) = grid.atlas_size();
    write_png(&path, w, h);

    let config = EngineConfig::default().with_font_atlas(FontAtlasConfig { path: path.clone(), grid: grid.clone() });
    let (mut ctx, _) = context_with(config);
    assert_eq!(ctx.canvas().live_images(), 1);

    let replacement = ctx.load_image(&path).unwrap();
    ctx.set_font_atlas(replacement, grid);
    assert_eq!(ctx.canvas().live_images(), 1);
    assert_eq!(ctx.canvas().released_images(), 1);

    // Glyphs now come from the replacement image.
    ctx.canvas_mut().take_commands();
    ctx.draw_text("A", 0.0, 0.0, 1.0, Color::WHITE);
    let draws: Vec<_> = ctx.canvas().image_draws().collect();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].0, 2);

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn text_without_atlas_draws_nothing() {
    let (mut ctx, _) = context_with(
        EngineConfig::default().with_font_atlas(FontAtlasConfig {
            path: "/nonexistent/atlas.png".into(),
            grid: GlyphGrid::default(),
        }),
    );
    ctx.canvas_mut().take_commands();
    ctx.draw_text("hello", 0.0, 0.0, 1.0, Color::WHITE);
    ctx.draw_text_centered("hello", 100.0, 100.0, 1.0, Color::WHITE);
    ctx.draw_text_outline("hello", 0.0, 0.0, 1.0, Color::WHITE, Color::BLACK);
    assert!(ctx.canvas().commands().is_empty());
}

#[test]
fn key_press_is_an_edge_through_present() {
    let (mut ctx, _) = context();

    ctx.canvas_mut().push_event(key(Key::ArrowUp, ButtonState::Pressed));
    ctx.present();
    assert!(ctx.is_key_pressed(Key::ArrowUp));
    assert!(ctx.is_key_just_pressed(Key::ArrowUp));
    assert!(ctx.is_key_down(Key::ArrowUp));

    for _ in 0..3 {
        ctx.present();
        assert!(!ctx.is_key_pressed(Key::ArrowUp));
        assert!(ctx.is_key_down(Key::ArrowUp));
    }

    ctx.canvas_mut().push_event(key(Key::ArrowUp, ButtonState::Released));
    ctx.present();
    assert!(ctx.is_key_released(Key::ArrowUp));
    assert!(!ctx.is_key_down(Key::ArrowUp));
}

#[test]
fn mouse_motion_and_scroll_last_one_frame() {
    let (mut ctx, _) = context();
    ctx.canvas_mut().push_event(InputEvent::PointerMoved(quadra_engine::coords::Vec2::new(10.0, 10.0)));
    ctx.present();
    ctx.canvas_mut().push_event(InputEvent::PointerMoved(quadra_engine::coords::Vec2::new(15.0, 12.0)));
    ctx.canvas_mut().push_event(InputEvent::Scroll { x: 0.0, y: -1.0 });
    ctx.present();

    assert_eq!(ctx.mouse_position(), (15.0, 12.0));
    assert_eq!(ctx.mouse_delta(), (5.0, 2.0));
    assert!(ctx.is_mouse_moved());
    assert!(ctx.is_scroll_moved());

    ctx.present();
    assert!(!ctx.is_mouse_moved());
    assert!(!ctx.is_scroll_moved());
}

#[test]
fn game_loop_paces_frames_and_stops_on_close() {
    let (mut ctx, clock) = context_with(EngineConfig::default().without_font_atlas().with_target_fps(50));
    let mut frames = 0;
    ctx.run_game_loop(|ctx| {
        frames += 1;
        ctx.clear_background(Color::GRAY);
        if frames == 5 {
            ctx.canvas_mut().request_close();
        }
        AppControl::Continue
    });

    assert_eq!(frames, 5);
    assert_eq!(clock.now(), Duration::from_millis(100));
    let presents = ctx
        .canvas()
        .commands()
        .iter()
        .filter(|c| matches!(c, CanvasCommand::Present))
        .count();
    assert_eq!(presents, 5);
}

#[test]
fn exit_from_callback_ends_loop_immediately() {
    let (mut ctx, _) = context();
    let mut frames = 0;
    ctx.run_game_loop(|_| {
        frames += 1;
        AppControl::Exit
    });
    assert_eq!(frames, 1);
    assert!(ctx.should_continue());
}

#[test]
fn stepped_frames_measure_delta_without_sleeping() {
    let (mut ctx, clock) = context_with(EngineConfig::default().without_font_atlas().with_target_fps(60));
    let mut frames = 0;
    let mut deltas = Vec::new();
    let mut frame = |ctx: &mut Ctx| {
        frames += 1;
        deltas.push(ctx.delta_time());
        AppControl::Continue
    };

    // Paced by the caller, faster than the target rate.
    clock.advance(Duration::from_millis(5));
    assert!(ctx.step_frame(&mut frame));
    clock.advance(Duration::from_millis(8));
    assert!(ctx.step_frame(&mut frame));
    assert_eq!(clock.now(), Duration::from_millis(13));

    ctx.canvas_mut().request_close();
    assert!(!ctx.step_frame(&mut frame));

    assert_eq!(frames, 2);
    assert!((deltas[0] - 0.005).abs() < 1e-6);
    assert!((deltas[1] - 0.008).abs() < 1e-6);
    assert!(!ctx.should_continue());
}

#[test]
fn close_releases_images_and_stops_the_loop() {
    let dir = temp_dir("close");
    let path = dir.join("img.png");
    write_png(&path, 2, 2);

    let (mut ctx, _) = context();
    ctx.load_image(&path).unwrap();
    ctx.load_image(&path).unwrap();
    assert_eq!(ctx.canvas().live_images(), 2);

    ctx.close();
    ctx.close();
    assert!(!ctx.should_continue());
    assert_eq!(ctx.canvas().live_images(), 0);
    assert!(ctx.load_image(&path).is_err());

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn window_size_follows_the_canvas() {
    let (mut ctx, _) = context();
    assert_eq!(ctx.window_size(), (800.0, 600.0));
    ctx.canvas_mut().resize(1024.0, 768.0);
    assert_eq!(ctx.window_size(), (1024.0, 768.0));
}
