use image::{Rgb, RgbImage};
use imageproc::drawing::{BresenhamLineIter, draw_filled_circle_mut};

/// Draw a line of `thickness` pixels with round caps between two pixel positions.
///
/// Endpoints are rounded to whole pixels. Any part of the line outside the canvas is clipped,
/// including coordinates far outside it; non-finite coordinates draw nothing.
pub fn draw_thick_line(
    canvas: &mut RgbImage,
    from: (f32, f32),
    to: (f32, f32),
    thickness: u32,
    color: Rgb<u8>,
) {
    let radius = stroke_radius(thickness);
    let from = (from.0.round(), from.1.round());
    let to = (to.0.round(), to.1.round());
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return;
    }

    // Margin keeps caps of endpoints just outside the canvas visible.
    let margin = radius as f32 + 1.0;
    let min = (-margin, -margin);
    let max = (
        canvas.width() as f32 - 1.0 + margin,
        canvas.height() as f32 - 1.0 + margin,
    );
    let Some((a, b)) = clip_segment(from, to, min, max) else {
        return;
    };

    for (x, y) in BresenhamLineIter::new(a, b) {
        stamp(canvas, x, y, radius, color);
    }
    // The iterator excludes its end point on some slopes; stamp it explicitly.
    stamp(canvas, b.0.round() as i32, b.1.round() as i32, radius, color);
}

/// Draw a filled disc equivalent to a zero-length line of `thickness` pixels.
pub fn draw_disc(canvas: &mut RgbImage, center: (f32, f32), thickness: u32, color: Rgb<u8>) {
    let radius = stroke_radius(thickness);
    let (x, y) = (center.0.round(), center.1.round());
    if !x.is_finite() || !y.is_finite() {
        return;
    }
    let r = radius as f32;
    if x < -r || y < -r || x > canvas.width() as f32 + r || y > canvas.height() as f32 + r {
        return;
    }
    stamp(canvas, x as i32, y as i32, radius, color);
}

fn stroke_radius(thickness: u32) -> i32 {
    (thickness / 2).min(i32::MAX as u32) as i32
}

fn stamp(canvas: &mut RgbImage, x: i32, y: i32, radius: i32, color: Rgb<u8>) {
    if radius == 0 {
        if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
            canvas.put_pixel(x as u32, y as u32, color);
        }
        return;
    }
    draw_filled_circle_mut(canvas, (x, y), radius, color);
}

/// Liang-Barsky clip of segment `p0 -> p1` against the box `min..=max`.
pub(crate) fn clip_segment(
    p0: (f32, f32),
    p1: (f32, f32),
    min: (f32, f32),
    max: (f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    let dx = p1.0 - p0.0;
    let dy = p1.1 - p0.1;
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }

    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    for (p, q) in [
        (-dx, p0.0 - min.0),
        (dx, max.0 - p0.0),
        (-dy, p0.1 - min.1),
        (dy, max.1 - p0.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        (p0.0 + t0 * dx, p0.1 + t0 * dy),
        (p0.0 + t1 * dx, p0.1 + t1 * dy),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/draw.rs"]
mod tests;
