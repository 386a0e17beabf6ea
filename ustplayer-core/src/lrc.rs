use encoding_rs::{Encoding, GBK, SHIFT_JIS, UTF_8};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// External timed-lyric track parsed from an LRC file
#[derive(Debug, Clone, Default)]
pub struct LyricTrack {
    cues: Vec<LyricCue>,
}

/// A single timed lyric line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricCue {
    /// Offset from session start
    pub timestamp: Duration,
    pub text: String,
}

impl LyricCue {
    #[must_use]
    pub fn new(timestamp: Duration, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }
}

impl LyricTrack {
    /// Parse LRC text into a track, skipping anything that is not a timed lyric.
    ///
    /// Each `[mm:ss.xx]` or `[mm:ss.xxx]` tag owns the text up to the next tag on
    /// the same line. Tags directly followed by another tag share the next text
    /// run, so `[00:05.00][00:15.00]chorus` yields two cues. Cues whose text is
    /// empty are dropped.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut cues = Vec::new();

        for line in input.lines() {
            parse_lyric_line(line, &mut cues);
        }

        // Stable sort keeps file order for equal timestamps
        cues.sort_by_key(|cue| cue.timestamp);

        Self { cues }
    }

    /// Load and parse an LRC file.
    ///
    /// The file is decoded as UTF-8 (a BOM is honored), then GBK, then
    /// Shift_JIS; the first encoding that decodes without errors wins. An
    /// unreadable or undecodable file yields an empty track; lyric display is
    /// optional and must never block playback.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read lyric file {:?}: {}", path, e);
                return Self::default();
            }
        };

        let Some((content, encoding)) = decode_lyrics(&bytes) else {
            warn!("Lyric file {:?} is not UTF-8, GBK or Shift_JIS text", path);
            return Self::default();
        };

        let track = Self::parse(&content);
        info!(
            "Loaded {} lyric cues from {:?} ({})",
            track.len(),
            path,
            encoding.name()
        );
        track
    }

    #[must_use]
    pub fn cues(&self) -> &[LyricCue] {
        &self.cues
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    #[must_use]
    pub fn cue(&self, index: usize) -> Option<&LyricCue> {
        self.cues.get(index)
    }

    /// Index of the last cue at or before `elapsed`, `None` before the first cue.
    ///
    /// `previous` is the index returned by the last call. It is only reused after
    /// checking it against `elapsed`, so callers may pass a stale cursor (for
    /// example after a restart) and still get the right answer.
    #[must_use]
    pub fn active_index(&self, elapsed: Duration, previous: Option<usize>) -> Option<usize> {
        if let Some(index) = previous {
            if self.is_active(index, elapsed) {
                return Some(index);
            }
            // Typical forward step to the next cue
            if self.is_active(index + 1, elapsed) {
                return Some(index + 1);
            }
        }

        self.cues
            .partition_point(|cue| cue.timestamp <= elapsed)
            .checked_sub(1)
    }

    fn is_active(&self, index: usize, elapsed: Duration) -> bool {
        let Some(cue) = self.cues.get(index) else {
            return false;
        };
        cue.timestamp <= elapsed
            && self
                .cues
                .get(index + 1)
                .is_none_or(|next| next.timestamp > elapsed)
    }
}

/// Decode raw lyric bytes, returning the text and the encoding that worked
fn decode_lyrics(bytes: &[u8]) -> Option<(String, &'static Encoding)> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return encoding
            .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            .map(|text| (text.into_owned(), encoding));
    }

    [UTF_8, GBK, SHIFT_JIS].into_iter().find_map(|encoding| {
        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| (text.into_owned(), encoding))
    })
}

/// Parse every timestamp tag on one line, appending the resulting cues
fn parse_lyric_line(line: &str, cues: &mut Vec<LyricCue>) {
    let tags = find_timestamp_tags(line);
    let mut pending: Vec<Duration> = Vec::new();

    for (i, tag) in tags.iter().enumerate() {
        pending.push(tag.timestamp);

        let text_end = tags.get(i + 1).map_or(line.len(), |next| next.start);
        let text = line[tag.end..text_end].trim();
        if text.is_empty() {
            // Shares the next tag's text, or is dropped at end of line
            continue;
        }

        for timestamp in pending.drain(..) {
            cues.push(LyricCue::new(timestamp, text));
        }
    }
}

/// Position and value of one `[mm:ss.xx]` tag within a line
struct TimestampTag {
    start: usize,
    end: usize,
    timestamp: Duration,
}

fn find_timestamp_tags(line: &str) -> Vec<TimestampTag> {
    let mut tags = Vec::new();
    let mut search_from = 0;

    while let Some(offset) = line[search_from..].find('[') {
        let start = search_from + offset;
        if let Some((timestamp, len)) = parse_timestamp_tag(&line[start..]) {
            tags.push(TimestampTag {
                start,
                end: start + len,
                timestamp,
            });
            search_from = start + len;
        } else {
            search_from = start + 1;
        }
    }

    tags
}

/// Parse a tag like `[01:02.50]` or `[1:2.500]` at the start of `s`.
///
/// Returns the timestamp and the byte length of the tag.
fn parse_timestamp_tag(s: &str) -> Option<(Duration, usize)> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }

    let (minutes, pos, _) = take_digits(bytes, 1, 1, 2)?;
    if bytes.get(pos) != Some(&b':') {
        return None;
    }
    let (seconds, pos, _) = take_digits(bytes, pos + 1, 1, 2)?;
    if bytes.get(pos) != Some(&b'.') {
        return None;
    }
    let (fraction, pos, fraction_digits) = take_digits(bytes, pos + 1, 2, 3)?;
    if bytes.get(pos) != Some(&b']') {
        return None;
    }

    // Hundredths are normalized to milliseconds
    let millis = if fraction_digits == 2 {
        fraction * 10
    } else {
        fraction
    };

    let timestamp = Duration::from_secs(minutes * 60 + seconds) + Duration::from_millis(millis);
    Some((timestamp, pos + 1))
}

/// Read between `min` and `max` ASCII digits starting at `pos`.
///
/// Returns the value, the position after the digits and the digit count.
fn take_digits(bytes: &[u8], pos: usize, min: usize, max: usize) -> Option<(u64, usize, usize)> {
    let count = bytes
        .get(pos..)?
        .iter()
        .take(max)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if count < min {
        return None;
    }

    let value = bytes[pos..pos + count]
        .iter()
        .fold(0_u64, |acc, b| acc * 10 + u64::from(b - b'0'));
    Some((value, pos + count, count))
}
