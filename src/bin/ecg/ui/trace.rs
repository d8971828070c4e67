//! Sweep canvas - grid, trace and write head

use ratatui::{
    layout::Rect,
    style::Color,
    symbols,
    widgets::{
        canvas::{Canvas, Circle, Context, Line},
        Block, Borders,
    },
    Frame,
};

use saavy_ecg::scroll::{FrameRecord, Viewport};

/// Major grid spacing in distance units (five minor squares of 8)
const GRID_SPACING: f64 = 40.0;

/// Radius of the write head marker
const MARKER_RADIUS: f64 = 6.0;

/// Render the last recorded frame.
///
/// Engine coordinates grow downward while the canvas grows upward, so every
/// y is flipped against the viewport height.
pub fn render_trace(frame: &mut Frame, area: Rect, record: &FrameRecord, viewport: Viewport) {
    let (width, height) = (viewport.width, viewport.height);

    let canvas = Canvas::default()
        .block(Block::default().title(" Lead II ").borders(Borders::ALL))
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            draw_grid(ctx, viewport);
            ctx.layer();

            for polyline in &record.polylines {
                for pair in polyline.windows(2) {
                    ctx.draw(&Line::new(
                        pair[0].x,
                        height - pair[0].y,
                        pair[1].x,
                        height - pair[1].y,
                        Color::Green,
                    ));
                }
            }

            if let Some(head) = record.marker {
                ctx.draw(&Circle {
                    x: head.x,
                    y: height - head.y,
                    radius: MARKER_RADIUS,
                    color: Color::White,
                });
            }
        });

    frame.render_widget(canvas, area);
}

// Minor squares are too dense for a terminal grid and are left out.
fn draw_grid(ctx: &mut Context, viewport: Viewport) {
    let (width, height) = (viewport.width, viewport.height);

    let mut x = 0.0;
    while x <= width {
        ctx.draw(&Line::new(x, 0.0, x, height, Color::DarkGray));
        x += GRID_SPACING;
    }

    let mut y = 0.0;
    while y <= height {
        ctx.draw(&Line::new(0.0, y, width, y, Color::DarkGray));
        y += GRID_SPACING;
    }
}
