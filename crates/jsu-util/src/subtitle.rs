//! WebVTT/SRT cue parsing.

use serde::Serialize;

/// One timed block of a subtitle file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cue {
    /// Index of the block in the file, counting blocks that were skipped.
    pub id: usize,
    /// Text lines joined with spaces.
    pub content: String,
    pub time_start: String,
    pub time_end: String,
}

/// Split a subtitle file into cues.
///
/// Blocks are separated by a blank line. A leading identifier line is
/// dropped; blocks without a `start --> end` line or without text are
/// skipped.
///
/// # Examples
///
/// ```
/// use jsu_util::subtitle::parse_subtitle;
///
/// let cues = parse_subtitle("WEBVTT\n\n1\n00:00:01.000 --> 00:00:02.000\nHello there\n");
/// assert_eq!(cues.len(), 1);
/// assert_eq!(cues[0].content, "Hello there");
/// ```
pub fn parse_subtitle(subtitle: &str) -> Vec<Cue> {
    let normalized = subtitle.replace('\r', "");
    normalized
        .split("\n\n")
        .enumerate()
        .filter_map(|(id, block)| {
            let mut lines: Vec<&str> = block.split('\n').collect();
            if !lines[0].contains(" --> ") {
                lines.remove(0);
            }
            if lines.len() < 2 {
                return None;
            }
            let (time_start, time_end) = lines[0].split_once(" --> ")?;
            if time_end.contains(" --> ") {
                return None;
            }
            Some(Cue {
                id,
                content: lines[1..].join(" ").trim().to_string(),
                time_start: time_start.to_string(),
                time_end: time_end.to_string(),
            })
        })
        .collect()
}

/// Cue texts as prose: sentences ending a cue end the line.
pub fn subtitle_to_text(subtitle: &str) -> String {
    parse_subtitle(subtitle)
        .into_iter()
        .map(|cue| {
            let mut content = cue.content;
            if content.ends_with(['.', '?', '!']) {
                content.push('\n');
            }
            content
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VTT: &str = "WEBVTT\r\n\r\n1\r\n00:00:02.827 --> 00:00:06.383\r\nFirst line\r\nsecond line.\r\n\r\n00:00:07.000 --> 00:00:08.000\r\nNo id here\r\n\r\n3\r\n00:00:09.000 --> 00:00:10.000\r\nReally?";

    #[test]
    fn test_parse_blocks() {
        let cues = parse_subtitle(VTT);
        assert_eq!(cues.len(), 3);
        assert_eq!(
            cues[0],
            Cue {
                id: 1,
                content: "First line second line.".to_string(),
                time_start: "00:00:02.827".to_string(),
                time_end: "00:00:06.383".to_string(),
            }
        );
        assert_eq!(cues[1].id, 2);
        assert_eq!(cues[1].content, "No id here");
        assert_eq!(cues[2].time_end, "00:00:10.000");
    }

    #[test]
    fn test_block_without_text_is_skipped() {
        assert!(parse_subtitle("1\n00:00:01.000 --> 00:00:02.000").is_empty());
        assert!(parse_subtitle("").is_empty());
    }

    #[test]
    fn test_to_text_breaks_after_sentences() {
        assert_eq!(subtitle_to_text(VTT), "First line second line.\nNo id hereReally?\n");
    }
}
