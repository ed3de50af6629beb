#[cfg(test)]
mod naming_tests {
    use std::path::{Path, PathBuf};

    use pixel_rsa_core::image_io::{container_path, decrypted_path, output_path, OutputFormat};

    #[test]
    fn prefix_is_applied_beside_the_input() {
        let out = output_path(Path::new("imgs/cat.png"), "RSA_", None);
        assert_eq!(out, PathBuf::from("imgs/RSA_cat.png"));
    }

    #[test]
    fn target_directory_relocates_output() {
        let out = output_path(Path::new("imgs/sub/dog.JPG"), "RSA_", Some(Path::new("out")));
        assert_eq!(out, PathBuf::from("out/RSA_dog.JPG"));
    }

    #[test]
    fn custom_prefix() {
        let out = output_path(Path::new("a.bmp"), "DEC_", None);
        assert_eq!(out, PathBuf::from("DEC_a.bmp"));
    }

    #[test]
    fn container_keeps_the_image_extension() {
        assert_eq!(
            container_path(Path::new("out/RSA_cat.png")),
            PathBuf::from("out/RSA_cat.png.rsai")
        );
        assert_ne!(
            container_path(Path::new("RSA_a.png")),
            container_path(Path::new("RSA_a.jpg"))
        );
    }

    #[test]
    fn decrypted_name_drops_container_extension_and_prefix() {
        assert_eq!(
            decrypted_path(Path::new("out/RSA_cat.png.rsai"), "RSA_", None),
            PathBuf::from("out/DEC_cat.png")
        );
        assert_eq!(
            decrypted_path(Path::new("out/RSA_cat.png.RSAI"), "RSA_", Some(Path::new("dec"))),
            PathBuf::from("dec/DEC_cat.png")
        );
        // A foreign prefix is kept.
        assert_eq!(
            decrypted_path(Path::new("ENC_cat.png.rsai"), "RSA_", None),
            PathBuf::from("DEC_ENC_cat.png")
        );
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("x.png")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("x.PNG")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("x.bmp")), Some(OutputFormat::Bmp));
        assert_eq!(OutputFormat::from_path(Path::new("x.tga")), Some(OutputFormat::Tga));
        assert_eq!(OutputFormat::from_path(Path::new("x.jpg")), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_path(Path::new("x.jpeg")), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_path(Path::new("x.gif")), None);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }
}
