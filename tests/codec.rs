use pretty_assertions::assert_eq;

use posterize::{CodecError, Color, ImageBuffer, Transfer};

fn sample_image() -> ImageBuffer {
    let mut img = ImageBuffer::new(5, 3);
    for y in 0..img.height() {
        for x in 0..img.width() {
            img.set(x, y, Color::new(x as f32 / 4.0, y as f32 / 2.0, 0.37));
        }
    }
    img
}

#[test]
fn tga_header_for_single_pixel() {
    let img = ImageBuffer::from_pixels(1, 1, vec![Color::new(1.0, 0.5, 0.0)]);
    let mut out = Vec::new();
    img.encode_tga(&mut out, Transfer::Linear).unwrap();

    let mut expected = vec![0u8; 18];
    expected[2] = 3;
    expected[12] = 1;
    expected[14] = 1;
    expected[16] = 24;
    expected[17] = 0x20;
    // B, G, R
    expected.extend_from_slice(&[0, 127, 255]);
    assert_eq!(out, expected);
}

#[test]
fn tga_rows_are_top_down_and_dimensions_little_endian() {
    let mut img = ImageBuffer::new(300, 2);
    img.set(0, 0, Color::new(0.0, 0.0, 1.0));
    img.set(0, 1, Color::new(1.0, 0.0, 0.0));
    let mut out = Vec::new();
    img.encode_tga(&mut out, Transfer::Linear).unwrap();

    assert_eq!(out.len(), 18 + 300 * 2 * 3);
    assert_eq!(&out[12..16], &[44, 1, 2, 0]);
    assert_eq!(&out[18..21], &[255, 0, 0]);
    assert_eq!(&out[18 + 900..18 + 903], &[0, 0, 255]);
}

#[test]
fn ppm_layout_is_header_then_rgb() {
    let img = ImageBuffer::from_pixels(2, 1,
        vec![Color::new(1.0, 0.0, 0.0), Color::new(0.0, 0.0, 1.0)]);
    let mut out = Vec::new();
    img.encode_ppm(&mut out, Transfer::Linear).unwrap();
    assert_eq!(out, b"P6\n2 1\n255\n\xff\x00\x00\x00\x00\xff".to_vec());
}

#[test]
fn ppm_round_trip_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.ppm");
    let img = sample_image();

    img.write_ppm(&path, Transfer::Linear).unwrap();
    let back = ImageBuffer::read_ppm(&path, Transfer::Linear).unwrap();

    assert_eq!((back.width(), back.height()), (img.width(), img.height()));
    for (a, b) in img.pixels().iter().zip(back.pixels()) {
        for (p, q) in a.to_array().iter().zip(b.to_array().iter()) {
            assert!((p - q).abs() <= 1.0 / 255.0, "{} vs {}", p, q);
        }
    }
}

#[test]
fn gamma_round_trip_is_stable_after_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.ppm");
    let second = dir.path().join("second.ppm");

    sample_image().write_ppm(&first, Transfer::Gamma22).unwrap();
    let back = ImageBuffer::read_ppm(&first, Transfer::Gamma22).unwrap();
    back.write_ppm(&second, Transfer::Gamma22).unwrap();

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!(x.abs_diff(*y) <= 1);
    }
}

#[test]
fn save_picks_format_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let img = sample_image();

    let tga = dir.path().join("out.TGA");
    img.save(&tga, Transfer::Linear).unwrap();
    let bytes = std::fs::read(&tga).unwrap();
    assert_eq!(bytes.len(), 18 + 5 * 3 * 3);
    assert_eq!(bytes[2], 3);

    let ppm = dir.path().join("out.img");
    img.save(&ppm, Transfer::Linear).unwrap();
    assert!(std::fs::read(&ppm).unwrap().starts_with(b"P6\n5 3\n255\n"));
}

#[test]
fn open_decodes_other_formats_with_the_image_crate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pixel.png");
    let mut png = image::RgbImage::new(2, 1);
    png.put_pixel(0, 0, image::Rgb([255, 0, 0]));
    png.put_pixel(1, 0, image::Rgb([0, 0, 255]));
    png.save(&path).unwrap();

    let img = ImageBuffer::open(&path, Transfer::Linear).unwrap();
    assert_eq!(img.pixels(), &[Color::new(1.0, 0.0, 0.0), Color::new(0.0, 0.0, 1.0)]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ImageBuffer::read_ppm(dir.path().join("nope.ppm"), Transfer::Linear);
    assert!(matches!(result, Err(CodecError::Io(_))));
}

#[test]
fn write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.tga");
    let result = ImageBuffer::new(1, 1).write_tga(&path, Transfer::Linear);
    assert!(matches!(result, Err(CodecError::Io(_))));
}

#[test]
fn truncated_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.ppm");
    std::fs::write(&path, b"P6\n# comment\n4 4\n255\n\x00\x01\x02").unwrap();
    let result = ImageBuffer::open(&path, Transfer::Linear);
    assert!(matches!(result, Err(CodecError::Truncated { expected: 48, actual: 3 })));
}
