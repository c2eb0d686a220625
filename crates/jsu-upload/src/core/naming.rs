/// Apply an upload filename suffix.
///
/// The suffix goes before the last `.` of `name`. Names without an extension
/// (or whose only dot starts the name) become `file{suffix}.tmp`.
///
/// # Examples
///
/// ```
/// use jsu_upload::core::suffixed_file_name;
///
/// assert_eq!(suffixed_file_name("video.mp4", Some("_raw")), "video_raw.mp4");
/// assert_eq!(suffixed_file_name("README", Some("_raw")), "file_raw.tmp");
/// assert_eq!(suffixed_file_name("video.mp4", None), "video.mp4");
/// ```
pub fn suffixed_file_name(name: &str, suffix: Option<&str>) -> String {
    let Some(suffix) = suffix.filter(|s| !s.is_empty()) else {
        return name.to_string();
    };
    match name.rfind('.') {
        Some(index) if index > 0 => format!("{}{}{}", &name[..index], suffix, &name[index..]),
        _ => format!("file{suffix}.tmp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_before_last_dot() {
        assert_eq!(suffixed_file_name("archive.tar.gz", Some("_v2")), "archive.tar_v2.gz");
    }

    #[test]
    fn test_no_extension_falls_back() {
        assert_eq!(suffixed_file_name("test no extension", Some("_suffix")), "file_suffix.tmp");
    }

    #[test]
    fn test_leading_dot_falls_back() {
        assert_eq!(suffixed_file_name(".bashrc", Some("_x")), "file_x.tmp");
    }

    #[test]
    fn test_empty_suffix_keeps_name() {
        assert_eq!(suffixed_file_name("test-name.txt", Some("")), "test-name.txt");
    }

    #[test]
    fn test_multibyte_name() {
        assert_eq!(suffixed_file_name("vidéo.mp4", Some("_é")), "vidéo_é.mp4");
    }
}
