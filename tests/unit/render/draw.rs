use super::*;

const RED: Rgb<u8> = Rgb([255, 0, 0]);

fn painted(img: &RgbImage) -> usize {
    img.pixels().filter(|p| p.0 != [0, 0, 0]).count()
}

#[test]
fn one_pixel_horizontal_line_covers_span() {
    let mut img = RgbImage::new(10, 5);
    draw_thick_line(&mut img, (1.0, 2.0), (6.0, 2.0), 1, RED);
    for x in 1..=6 {
        assert_eq!(*img.get_pixel(x, 2), RED, "x={x}");
    }
    assert_eq!(painted(&img), 6);
}

#[test]
fn thicker_lines_cover_more_pixels() {
    let mut thin = RgbImage::new(20, 20);
    let mut thick = RgbImage::new(20, 20);
    draw_thick_line(&mut thin, (2.0, 10.0), (17.0, 10.0), 2, RED);
    draw_thick_line(&mut thick, (2.0, 10.0), (17.0, 10.0), 8, RED);
    assert!(painted(&thick) > painted(&thin));
    assert_eq!(*thick.get_pixel(10, 13), RED);
    assert_eq!(*thin.get_pixel(10, 13), Rgb([0, 0, 0]));
}

#[test]
fn endpoints_are_rounded() {
    let mut img = RgbImage::new(5, 5);
    draw_thick_line(&mut img, (1.6, 1.4), (1.6, 1.4), 1, RED);
    assert_eq!(*img.get_pixel(2, 1), RED);
    assert_eq!(painted(&img), 1);
}

#[test]
fn out_of_range_coordinates_never_panic() {
    let mut img = RgbImage::new(16, 16);
    draw_thick_line(&mut img, (-1.0e9, -1.0e9), (1.0e9, 1.0e9), 8, RED);
    assert!(painted(&img) > 0);

    let mut img = RgbImage::new(16, 16);
    draw_thick_line(&mut img, (-500.0, 3.0), (-400.0, 3.0), 4, RED);
    draw_thick_line(&mut img, (f32::NAN, 0.0), (3.0, 3.0), 4, RED);
    draw_thick_line(&mut img, (f32::INFINITY, 0.0), (3.0, 3.0), 4, RED);
    draw_disc(&mut img, (1.0e12, -1.0e12), 20, RED);
    draw_disc(&mut img, (f32::NAN, 2.0), 20, RED);
    assert_eq!(painted(&img), 0);
}

#[test]
fn disc_matches_zero_length_line() {
    let mut disc = RgbImage::new(20, 20);
    let mut line = RgbImage::new(20, 20);
    draw_disc(&mut disc, (10.0, 10.0), 5, RED);
    draw_thick_line(&mut line, (10.0, 10.0), (10.0, 10.0), 5, RED);
    assert_eq!(disc, line);
    assert_eq!(*disc.get_pixel(12, 10), RED);
}

#[test]
fn clip_segment_trims_to_box() {
    let (a, b) = clip_segment((-10.0, 5.0), (20.0, 5.0), (0.0, 0.0), (10.0, 10.0)).unwrap();
    assert!((a.0 - 0.0).abs() < 1e-4 && a.1 == 5.0);
    assert!((b.0 - 10.0).abs() < 1e-4 && b.1 == 5.0);
    assert!(clip_segment((-10.0, -5.0), (-1.0, -5.0), (0.0, 0.0), (10.0, 10.0)).is_none());
}
