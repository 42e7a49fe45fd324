use anyhow::Result;
use quadra_engine::{
    init_logging, AppControl, Color, DrawOptions, EngineConfig, Key, LoggingConfig, RenderContext,
};

/// Pixels per second.
const PLAYER_SPEED: f32 = 240.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut ctx = RenderContext::open(EngineConfig::new(800, 600, "Simple Graphics"))?;

    let background = match ctx.load_image("image.jpg") {
        Ok(img) => Some(img),
        Err(e) => {
            log::warn!("failed to load background: {e}");
            None
        }
    };

    let (mut player_x, mut player_y) = (400.0_f32, 300.0_f32);

    ctx.run_game_loop(|ctx| {
        if ctx.is_key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let step = PLAYER_SPEED * ctx.delta_time();
        if ctx.is_key_down(Key::ArrowUp) {
            player_y -= step;
        }
        if ctx.is_key_down(Key::ArrowDown) {
            player_y += step;
        }
        if ctx.is_key_down(Key::ArrowLeft) {
            player_x -= step;
        }
        if ctx.is_key_down(Key::ArrowRight) {
            player_x += step;
        }

        ctx.clear_background(Color::GRAY);

        if let Some(img) = &background {
            ctx.draw_image(img, 0.0, 0.0);
            ctx.draw_image_rotated(img, 100.0, 100.0, 180.0);
            ctx.draw_image_scaled(img, 200.0, 200.0, 2.0, 2.0);
            ctx.draw_image_tinted(img, 300.0, 300.0, Color::RED);
            ctx.draw_quad(
                Some(img),
                DrawOptions::at(400.0, 400.0)
                    .with_size(100.0, 100.0)
                    .with_rotation(45.0)
                    .with_tint(Color::BLUE)
                    .with_source(0.0, 0.0, 100.0, 100.0),
            );
        }

        ctx.draw_line(100.0, 100.0, 300.0, 200.0, Color::RED);
        ctx.draw_triangle(400.0, 100.0, 350.0, 200.0, 450.0, 200.0, Color::GREEN);
        ctx.draw_rectangle(500.0, 150.0, 100.0, 80.0, Color::BLUE);
        ctx.draw_rectangle_outline(490.0, 140.0, 120.0, 100.0, Color::WHITE);
        ctx.draw_circle(player_x, player_y, 50.0, Color::YELLOW);

        let fps = ctx.fps();
        ctx.draw_text(&format!("FPS: {fps}"), 10.0, 10.0, 1.0, Color::RED);
        ctx.draw_text_centered("GAME OVER", 400.0, 200.0, 1.0, Color::GREEN);
        ctx.draw_text_with_background("RESTART", 300.0, 400.0, 1.0, Color::RED, Color::GREEN, 5.0, 5.0);
        ctx.draw_text_outline("EPIC!", 400.0, 500.0, 1.0, Color::YELLOW, Color::RED);

        AppControl::Continue
    });

    if let Some(img) = background {
        ctx.delete_image(&img);
    }
    ctx.close();
    Ok(())
}
