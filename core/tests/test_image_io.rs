#[cfg(test)]
mod image_io_tests {
    use std::fs;
    use std::path::Path;

    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::tempdir;

    use pixel_rsa_core::image_io::{decode, encode, ImageIoError};
    use pixel_rsa_core::pixel::{PixelBuffer, Samples};

    fn gradient_rgb(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x * 7) as u8, (y * 11) as u8, (x + y) as u8]))
    }

    #[test]
    fn decode_keeps_native_channel_count() {
        let dir = tempdir().unwrap();

        let rgb = dir.path().join("rgb.png");
        gradient_rgb(5, 4).save(&rgb).unwrap();
        let buf = decode(&rgb).unwrap();
        assert_eq!((buf.width, buf.height, buf.channels), (5, 4, 3));
        assert_eq!(buf.samples, Samples::Plain(gradient_rgb(5, 4).into_raw()));

        let gray = dir.path().join("gray.png");
        GrayImage::from_fn(3, 3, |x, _| Luma([x as u8 * 40])).save(&gray).unwrap();
        assert_eq!(decode(&gray).unwrap().channels, 1);

        let rgba = dir.path().join("rgba.png");
        RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4])).save(&rgba).unwrap();
        assert_eq!(decode(&rgba).unwrap().channels, 4);
    }

    #[test]
    fn decode_sniffs_content_not_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("actually_png.bmp");
        gradient_rgb(2, 2).save_with_format(&path, image::ImageFormat::Png).unwrap();
        assert_eq!(decode(&path).unwrap().channels, 3);
    }

    #[test]
    fn garbage_and_missing_files_fail_to_load() {
        let dir = tempdir().unwrap();
        let junk = dir.path().join("junk.png");
        fs::write(&junk, b"definitely not an image").unwrap();

        let err = decode(&junk).unwrap_err();
        assert!(err.is_load());
        assert!(decode(&dir.path().join("missing.png")).unwrap_err().is_load());
    }

    #[test]
    fn lossless_formats_round_trip() {
        let dir = tempdir().unwrap();
        let plain = PixelBuffer::plain(4, 3, 3, gradient_rgb(4, 3).into_raw());
        for ext in ["png", "bmp", "tga"] {
            let path = dir.path().join(format!("out.{ext}"));
            encode(&path, &plain).unwrap();
            assert_eq!(decode(&path).unwrap(), plain, "{ext} changed the samples");
        }
    }

    #[test]
    fn unsupported_extension_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xyz");
        let plain = PixelBuffer::plain(1, 1, 1, vec![5]);
        assert!(matches!(encode(&path, &plain), Err(ImageIoError::UnsupportedFormat { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn jpeg_drops_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let rgba = PixelBuffer::plain(8, 8, 4, vec![200; 8 * 8 * 4]);
        encode(&path, &rgba).unwrap();
        let back = decode(&path).unwrap();
        assert_eq!((back.width, back.height, back.channels), (8, 8, 3));
    }

    #[test]
    fn cipher_buffers_save_their_low_byte_preview() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let cipher = PixelBuffer::cipher(2, 1, 1, vec![0x0102, 0xABCD]);
        encode(&path, &cipher).unwrap();
        assert_eq!(decode(&path).unwrap().samples, Samples::Plain(vec![0x02, 0xCD]));
    }

    #[test]
    fn inconsistent_geometry_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let bad = PixelBuffer::plain(3, 3, 3, vec![0; 5]);
        assert!(matches!(encode(&path, &bad), Err(ImageIoError::InvalidBuffer { .. })));
        assert!(!Path::new(&path).exists());
    }
}
