//! Canvas renderer: sky, clouds, sun, ocean, bird and splash.
//!
//! Pure read side: given the machine snapshot, the canvas and a wall-clock
//! timestamp it produces one frame. Nothing here feeds back into game state.

use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::animation::Splash;
use super::scenery::Cloud;
use super::state::GameStateMachine;

pub fn draw(
    ctx: &CanvasRenderingContext2d,
    canvas: &HtmlCanvasElement,
    machine: &GameStateMachine,
    now: f64,
) {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, width, height);

    draw_background(ctx, width, height);
    draw_clouds(ctx, machine.clouds(), width, height);
    draw_sun(ctx, machine, width, height, now);
    draw_ocean(ctx, width, height, now);

    // The bird is hidden for the whole splash; the ripple marks the spot.
    match machine.splash() {
        None => draw_bird(ctx, machine, width, height, now),
        Some(splash) => draw_splash(ctx, splash, machine.config().grid_rows, width, height, now),
    }
}

fn draw_background(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
    gradient.add_color_stop(0.0, "#87CEEB").ok();
    gradient.add_color_stop(0.7, "#B0E2FF").ok();
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_clouds(ctx: &CanvasRenderingContext2d, clouds: &[Cloud], width: f64, height: f64) {
    ctx.set_fill_style_str("#FFF");
    for cloud in clouds {
        let x = cloud.x * width;
        let y = cloud.y * height;
        let w = width * 0.12 * cloud.size;
        let h = w * 0.6;
        ctx.begin_path();
        // Four puff layouts; which one a cloud uses is fixed at spawn.
        match cloud.kind {
            0 => {
                ctx.arc(x, y, h * 0.5, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.2, y - h * 0.1, h * 0.4, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.4, y, h * 0.5, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.6, y - h * 0.1, h * 0.4, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.8, y, h * 0.5, 0.0, PI * 2.0).ok();
            }
            1 => {
                ctx.arc(x, y, h * 0.4, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.15, y - h * 0.2, h * 0.35, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.3, y, h * 0.45, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.5, y - h * 0.15, h * 0.5, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.7, y + h * 0.1, h * 0.4, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.85, y - h * 0.1, h * 0.35, 0.0, PI * 2.0).ok();
            }
            2 => {
                ctx.arc(x, y, h * 0.3, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.25, y - h * 0.05, h * 0.4, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.5, y, h * 0.45, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.75, y - h * 0.05, h * 0.4, 0.0, PI * 2.0).ok();
                ctx.arc(x + w, y, h * 0.3, 0.0, PI * 2.0).ok();
            }
            _ => {
                ctx.arc(x, y, h * 0.3, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.2, y - h * 0.2, h * 0.5, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.5, y - h * 0.1, h * 0.4, 0.0, PI * 2.0).ok();
                ctx.arc(x + w * 0.7, y + h * 0.1, h * 0.35, 0.0, PI * 2.0).ok();
            }
        }
        ctx.fill();
    }
}

fn draw_sun(
    ctx: &CanvasRenderingContext2d,
    machine: &GameStateMachine,
    width: f64,
    height: f64,
    now: f64,
) {
    let session = machine.session();
    let sun_x = width * session.sun_position;
    let sun_y = height * 0.2;
    let radius = 50.0;

    // Rays rotate slowly and pulse with a sine beat.
    let rotation = now * 0.0006;
    let scale = 1.0 + (now / 600.0).sin() * 0.1;
    ctx.save();
    ctx.translate(sun_x, sun_y).ok();
    ctx.rotate(rotation).ok();
    ctx.scale(scale, scale).ok();
    ctx.set_fill_style_str("#FFFF66");
    for _ in 0..12 {
        ctx.rotate(PI / 6.0).ok();
        ctx.begin_path();
        ctx.move_to(radius * 0.9, 0.0);
        ctx.line_to(radius * 1.5, 0.0);
        ctx.line_to(radius * 1.2, radius * 0.2);
        ctx.close_path();
        ctx.fill();
    }
    ctx.restore();

    let gradient = ctx
        .create_radial_gradient(sun_x, sun_y, 0.0, sun_x, sun_y, radius)
        .ok();
    if let Some(gradient) = gradient {
        gradient.add_color_stop(0.0, "#FFFFA1").ok();
        gradient.add_color_stop(1.0, "#FFCC00").ok();
        ctx.set_fill_style_canvas_gradient(&gradient);
    } else {
        ctx.set_fill_style_str("#FFCC00");
    }
    ctx.begin_path();
    ctx.arc(sun_x, sun_y, radius, 0.0, PI * 2.0).ok();
    ctx.fill();

    // Eyes.
    ctx.set_fill_style_str("#FF6600");
    ctx.begin_path();
    ctx.ellipse(
        sun_x - radius * 0.2,
        sun_y - radius * 0.2,
        radius * 0.08,
        radius * 0.12,
        0.0,
        0.0,
        PI * 2.0,
    )
    .ok();
    ctx.ellipse(
        sun_x + radius * 0.2,
        sun_y - radius * 0.2,
        radius * 0.08,
        radius * 0.12,
        0.0,
        0.0,
        PI * 2.0,
    )
    .ok();
    ctx.fill();
    ctx.set_fill_style_str("#FFF");
    ctx.begin_path();
    ctx.arc(sun_x - radius * 0.18, sun_y - radius * 0.22, radius * 0.03, 0.0, PI * 2.0)
        .ok();
    ctx.arc(sun_x + radius * 0.22, sun_y - radius * 0.22, radius * 0.03, 0.0, PI * 2.0)
        .ok();
    ctx.fill();

    // Mouth brightens with progress: flat line, smile, open grin.
    ctx.set_line_width(3.0);
    ctx.set_stroke_style_str("#FF6600");
    ctx.begin_path();
    match session.sun_expression {
        0 => {
            ctx.move_to(sun_x - radius * 0.3, sun_y + radius * 0.3);
            ctx.line_to(sun_x + radius * 0.3, sun_y + radius * 0.3);
        }
        1 => {
            ctx.arc(sun_x, sun_y + radius * 0.1, radius * 0.3, 0.1 * PI, 0.9 * PI)
                .ok();
        }
        _ => {
            ctx.arc(sun_x, sun_y + radius * 0.1, radius * 0.4, 0.0, PI).ok();
        }
    }
    ctx.stroke();
}

fn wave_y(base: f64, x: f64, time: f64) -> f64 {
    base + (x / 200.0 + time).sin() * 10.0
        + (x / 100.0 - time * 0.5).sin() * 5.0
        + (x / 50.0 + time * 0.2).sin() * 3.0
}

fn draw_ocean(ctx: &CanvasRenderingContext2d, width: f64, height: f64, now: f64) {
    let ocean_height = height * 0.3;
    let ocean_y = height - ocean_height;
    let time = now / 1_000.0;

    let gradient = ctx.create_linear_gradient(0.0, ocean_y, 0.0, height);
    gradient.add_color_stop(0.0, "#4A90E2").ok();
    gradient.add_color_stop(1.0, "#2C3E50").ok();
    ctx.set_fill_style_canvas_gradient(&gradient);

    ctx.begin_path();
    ctx.move_to(0.0, ocean_y);
    let step = (width / 200.0).floor().max(1.0);
    let mut x = 0.0;
    while x <= width {
        ctx.line_to(x, wave_y(ocean_y, x, time));
        x += step;
    }
    ctx.line_to(width, height);
    ctx.line_to(0.0, height);
    ctx.close_path();
    ctx.fill();

    // Foam line riding the first two wave components.
    ctx.set_stroke_style_str("rgba(255, 255, 255, 0.5)");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(0.0, ocean_y);
    let foam_step = (width / 40.0).floor().max(10.0);
    let mut x = 0.0;
    while x <= width {
        let y1 = ocean_y
            + (x / 200.0 + time).sin() * 10.0
            + (x / 100.0 - time * 0.5).sin() * 5.0;
        let next_x = x + foam_step;
        let next_y = ocean_y
            + (next_x / 200.0 + time).sin() * 10.0
            + (next_x / 100.0 - time * 0.5).sin() * 5.0;
        let control_x = x + foam_step / 2.0;
        let control_y = y1.min(next_y) - 5.0 - ((x * 0.37 + time * 2.1).sin().abs() * 10.0);
        ctx.quadratic_curve_to(control_x, control_y, next_x, next_y);
        x = next_x;
    }
    ctx.stroke();
}

fn bird_pixel_position(
    grid_rows: u32,
    row: u32,
    position: f64,
    width: f64,
    height: f64,
) -> (f64, f64) {
    let grid_height = height / grid_rows as f64;
    let y = grid_height * row as f64 + grid_height / 2.0;
    let x = width * 0.2 + width * 0.6 * position;
    (x, y)
}

fn draw_bird(
    ctx: &CanvasRenderingContext2d,
    machine: &GameStateMachine,
    width: f64,
    height: f64,
    now: f64,
) {
    let session = machine.session();
    // Flown off after a win: nothing left to draw.
    if session.game_won && session.bird_position > 1.1 {
        return;
    }
    let (bird_x, bird_y) = bird_pixel_position(
        machine.config().grid_rows,
        session.bird_row,
        session.bird_position,
        width,
        height,
    );
    let size = (height * 0.06).min(40.0);
    if bird_x < -size || bird_x > width + size {
        return;
    }

    let wing_offset = (now / 200.0).sin() * 15.0;
    let wing_scale = 0.5;

    ctx.save();
    ctx.translate(bird_x, bird_y).ok();
    ctx.set_line_width(1.0);

    // Tail.
    ctx.set_fill_style_str("#4CAF50");
    ctx.set_stroke_style_str("#388E3C");
    ctx.begin_path();
    ctx.move_to(0.0, 0.0);
    ctx.line_to(-size * 0.8, -size * 0.25);
    ctx.line_to(-size * 0.9, 0.0);
    ctx.line_to(-size * 0.8, size * 0.25);
    ctx.close_path();
    ctx.fill();
    ctx.stroke();

    // Body.
    ctx.set_fill_style_str("#E91E63");
    ctx.set_stroke_style_str("#C2185B");
    ctx.begin_path();
    ctx.arc(0.0, 0.0, size / 2.0, 0.0, PI * 2.0).ok();
    ctx.fill();
    ctx.stroke();

    // Wings, flapping around a joint slightly up and left of center.
    let joint_x = -size * 0.1;
    let joint_top_y = -size * 0.2;
    let joint_bottom_y = size * 0.05;
    let wing_gradient = ctx.create_linear_gradient(0.0, -size * 0.6, 0.0, size * 0.4);
    wing_gradient.add_color_stop(0.0, "#9C27B0").ok();
    wing_gradient.add_color_stop(1.0, "#4A148C").ok();
    ctx.set_fill_style_canvas_gradient(&wing_gradient);
    ctx.set_stroke_style_str("#7B1FA2");

    ctx.begin_path();
    ctx.move_to(joint_x, joint_top_y);
    ctx.quadratic_curve_to(
        -size * 0.3,
        -size * 0.5 - wing_offset * wing_scale,
        -size * 0.5,
        -size * 0.3 - wing_offset * wing_scale,
    );
    ctx.line_to(-size * 0.2, -size * 0.2);
    ctx.close_path();
    ctx.fill();
    ctx.stroke();

    ctx.begin_path();
    ctx.move_to(joint_x, joint_bottom_y);
    ctx.quadratic_curve_to(
        -size * 0.3,
        size * 0.5 + wing_offset * wing_scale,
        -size * 0.5,
        size * 0.3 + wing_offset * wing_scale,
    );
    ctx.line_to(-size * 0.2, size * 0.2);
    ctx.close_path();
    ctx.fill();
    ctx.stroke();

    // Feather lines on both wings.
    ctx.set_stroke_style_str("#6A1B9A");
    for i in 1..=3 {
        let i = i as f64;
        ctx.begin_path();
        ctx.move_to(joint_x, joint_top_y);
        ctx.quadratic_curve_to(
            -size * 0.2,
            -size * (0.2 + i * 0.1) - wing_offset * wing_scale * 0.8,
            -size * 0.4,
            -size * (0.2 + i * 0.05) - wing_offset * wing_scale * 0.6,
        );
        ctx.stroke();
        ctx.begin_path();
        ctx.move_to(joint_x, joint_bottom_y);
        ctx.quadratic_curve_to(
            -size * 0.2,
            size * (0.2 + i * 0.1) + wing_offset * wing_scale * 0.8,
            -size * 0.4,
            size * (0.2 + i * 0.05) + wing_offset * wing_scale * 0.6,
        );
        ctx.stroke();
    }

    // Head.
    ctx.set_fill_style_str("#FF9800");
    ctx.set_stroke_style_str("#F57C00");
    ctx.begin_path();
    ctx.arc(size * 0.3, -size * 0.2, size / 3.0, 0.0, PI * 2.0).ok();
    ctx.fill();
    ctx.stroke();

    // Beak.
    ctx.set_fill_style_str("#FFEB3B");
    ctx.set_stroke_style_str("#FBC02D");
    ctx.begin_path();
    ctx.move_to(size * 0.5, -size * 0.2);
    ctx.line_to(size * 0.8, -size * 0.1);
    ctx.line_to(size * 0.5, 0.0);
    ctx.close_path();
    ctx.fill();
    ctx.stroke();

    // Eye with highlight.
    ctx.set_fill_style_str("#000");
    ctx.begin_path();
    ctx.arc(size * 0.4, -size * 0.25, size * 0.08, 0.0, PI * 2.0).ok();
    ctx.fill();
    ctx.set_fill_style_str("#FFF");
    ctx.begin_path();
    ctx.arc(size * 0.42, -size * 0.27, size * 0.04, 0.0, PI * 2.0).ok();
    ctx.fill();

    ctx.restore();
}

fn draw_splash(
    ctx: &CanvasRenderingContext2d,
    splash: &Splash,
    grid_rows: u32,
    width: f64,
    height: f64,
    now: f64,
) {
    let (bird_x, bird_y) =
        bird_pixel_position(grid_rows, splash.bird_row, splash.bird_position, width, height);
    let splash_size = (height * 0.06).min(40.0);
    let ripple_size = splash_size * splash.ripple_scale(now);
    let alpha = splash.ripple_alpha(now);
    if alpha <= 0.0 {
        return;
    }
    let center_y = bird_y + splash_size;

    ctx.save();

    // Elliptical ripple with a white-to-blue falloff.
    let gradient = ctx
        .create_radial_gradient(bird_x, center_y, 0.0, bird_x, center_y, ripple_size)
        .ok();
    if let Some(gradient) = gradient {
        gradient
            .add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha * 0.9))
            .ok();
        gradient
            .add_color_stop(0.5, &format!("rgba(200, 230, 255, {})", alpha * 0.7))
            .ok();
        gradient
            .add_color_stop(1.0, &format!("rgba(150, 200, 255, {})", alpha * 0.3))
            .ok();
        ctx.set_fill_style_canvas_gradient(&gradient);
    } else {
        ctx.set_fill_style_str(&format!("rgba(200, 230, 255, {})", alpha * 0.7));
    }
    ctx.begin_path();
    ctx.ellipse(bird_x, center_y, ripple_size, ripple_size * 0.4, 0.0, 0.0, PI * 2.0)
        .ok();
    ctx.fill();

    // Two concentric ring outlines inside the ripple.
    ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
    ctx.set_line_width(2.0);
    for factor in [0.7, 0.4] {
        ctx.begin_path();
        ctx.ellipse(
            bird_x,
            center_y,
            ripple_size * factor,
            ripple_size * 0.4 * factor,
            0.0,
            0.0,
            PI * 2.0,
        )
        .ok();
        ctx.stroke();
    }

    // Three spray arcs above the ripple, widest and flattest on top.
    ctx.set_line_width(2.5);
    let wave_distance = ripple_size * 0.7;
    for i in 0..3 {
        let reversed = (2 - i) as f64;
        let wave_yy = center_y - wave_distance - i as f64 * 8.0;
        let wave_width = ripple_size * (1.5 - reversed * 0.2);
        let wave_height = 6.0 + reversed * 2.0;
        ctx.begin_path();
        ctx.move_to(bird_x - wave_width, wave_yy);
        ctx.quadratic_curve_to(bird_x, wave_yy - wave_height, bird_x + wave_width, wave_yy);
        ctx.stroke();
    }

    ctx.restore();
}
