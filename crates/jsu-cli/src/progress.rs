use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const PB_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos:>3}% {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

/// Percent bar for one upload.
///
/// A chunk resumed at an earlier offset reports less than what was shown;
/// the bar keeps the highest value.
#[derive(Clone)]
pub(crate) struct UploadBar {
    pb: ProgressBar,
}

impl UploadBar {
    pub fn new(prefix: &str) -> Self {
        let pb = ProgressBar::new(100);
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        pb.set_prefix(prefix.to_string());
        Self { pb }
    }

    pub fn set(&self, percent: u8) {
        let percent = u64::from(percent.min(100));
        if percent > self.pb.position() {
            self.pb.set_position(percent);
        }
    }

    pub fn message(&self, msg: String) { self.pb.set_message(msg); }

    pub fn finish(&self, msg: String) { self.pb.finish_with_message(msg); }

    pub fn abandon(&self, msg: String) { self.pb.abandon_with_message(msg); }
}
