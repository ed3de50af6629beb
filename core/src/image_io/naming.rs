use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::constants::{CONTAINER_EXTENSION, DECRYPTED_OUTPUT_PREFIX};

/// `dir/name.ext` → `dir/<prefix>name.ext`, or `target/<prefix>name.ext` when a target
/// directory is given.
pub fn output_path(input: &Path, prefix: &str, target_dir: Option<&Path>) -> PathBuf {
    let mut name = OsString::from(prefix);
    if let Some(file_name) = input.file_name() {
        name.push(file_name);
    }
    match target_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Image path for a decrypted container: `RSA_name.png.rsai` → `DEC_name.png`, beside the
/// container or in `target_dir`. `output_prefix` is the prefix the container was written with.
pub fn decrypted_path(container: &Path, output_prefix: &str, target_dir: Option<&Path>) -> PathBuf {
    let is_container = container
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CONTAINER_EXTENSION));
    let stored = if is_container { container.with_extension("") } else { container.to_path_buf() };

    let name = stored
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let original = name.strip_prefix(output_prefix).unwrap_or(&name);
    output_path(&stored.with_file_name(original), DECRYPTED_OUTPUT_PREFIX, target_dir)
}

/// Container path for an encrypted output: `RSA_name.png` → `RSA_name.png.rsai`.
/// The original extension is kept so `a.png` and `a.jpg` never collide.
pub fn container_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".");
    name.push(CONTAINER_EXTENSION);
    PathBuf::from(name)
}
