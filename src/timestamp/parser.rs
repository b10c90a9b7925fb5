//! `[MM:SS]` marker scanning.
//!
//! Produces a typed event stream (byte spans + parsed seconds) so the
//! dedup/rewrite rules in the reconciler never touch string matching.

use std::ops::Range;

/// A well-formed timestamp marker found in chunk text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Byte range of the whole `[MM:SS]` token, brackets included.
    pub span: Range<usize>,
    /// Seconds relative to the start of the chunk's audio.
    pub rel_seconds: u32,
}

/// One scanned bracket token that concerns the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerEvent {
    Valid(Marker),
    /// Timestamp-shaped token that violates the `MM:SS` format. Reported so
    /// the reconciler can log it; the text is left untouched.
    Malformed { span: Range<usize>, raw: String },
}

/// Longest bracket token still considered a marker candidate. Anything
/// longer is prose in brackets, not a timestamp.
const MAX_TOKEN_LEN: usize = 12;

/// Scan text for timestamp markers, left to right.
///
/// Bracketed tokens that are not timestamp-shaped at all (speaker tags,
/// `[BLANK_AUDIO]` and friends) are ignored silently. Spans never overlap
/// and arrive in increasing order.
pub fn scan_markers(text: &str) -> Vec<MarkerEvent> {
    let bytes = text.as_bytes();
    let mut events = Vec::new();
    let mut pos = 0;

    while let Some(open) = find_byte(bytes, pos, b'[') {
        let Some(close) = find_byte(bytes, open + 1, b']') else {
            break;
        };
        let token = &text[open + 1..close];

        if let Some(rel_seconds) = parse_mm_ss(token) {
            events.push(MarkerEvent::Valid(Marker {
                span: open..close + 1,
                rel_seconds,
            }));
        } else if is_timestamp_shaped(token) {
            events.push(MarkerEvent::Malformed {
                span: open..close + 1,
                raw: text[open..close + 1].to_string(),
            });
        }

        pos = close + 1;
    }

    events
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}

/// Parse a strict `MM:SS` token: 1-2 digit minutes, exactly 2 digit seconds.
fn parse_mm_ss(token: &str) -> Option<u32> {
    let (minutes, seconds) = token.split_once(':')?;
    if minutes.is_empty() || minutes.len() > 2 || seconds.len() != 2 {
        return None;
    }
    if !minutes.bytes().all(|b| b.is_ascii_digit()) || !seconds.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    // Parse cannot fail after the digit check; widths cap the value at 99:99
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    Some(minutes * 60 + seconds)
}

/// A token made of digits and colons reads as an attempted timestamp.
fn is_timestamp_shaped(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_TOKEN_LEN
        && token.contains(':')
        && token.bytes().any(|b| b.is_ascii_digit())
        && token.bytes().all(|b| b.is_ascii_digit() || b == b':')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_markers(text: &str) -> Vec<(usize, u32)> {
        scan_markers(text)
            .into_iter()
            .filter_map(|e| match e {
                MarkerEvent::Valid(m) => Some((m.span.start, m.rel_seconds)),
                MarkerEvent::Malformed { .. } => None,
            })
            .collect()
    }

    #[test]
    fn finds_single_marker_with_span() {
        let text = "intro [03:25] speech";
        let events = scan_markers(text);

        assert_eq!(events.len(), 1);
        match &events[0] {
            MarkerEvent::Valid(m) => {
                assert_eq!(m.rel_seconds, 3 * 60 + 25);
                assert_eq!(&text[m.span.clone()], "[03:25]");
            }
            other => panic!("expected valid marker, got {:?}", other),
        }
    }

    #[test]
    fn finds_markers_in_order() {
        let markers = valid_markers("[00:00] a [1:30] b [12:59] c");

        assert_eq!(
            markers.iter().map(|&(_, s)| s).collect::<Vec<_>>(),
            vec![0, 90, 779]
        );
        assert!(markers.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn single_digit_minutes_are_valid() {
        assert_eq!(valid_markers("[5:07]"), vec![(0, 307)]);
    }

    #[test]
    fn two_digit_seconds_above_59_still_parse() {
        // The format is shape-checked, not range-checked; mirrors the
        // model's occasional [05:99]-style output which still orders
        // correctly after offsetting.
        assert_eq!(valid_markers("[05:99]"), vec![(0, 399)]);
    }

    #[test]
    fn speaker_tags_and_noise_markers_are_ignored() {
        assert!(scan_markers("[Speaker A] hello [BLANK_AUDIO] [MUSIC]").is_empty());
    }

    #[test]
    fn empty_brackets_are_ignored() {
        assert!(scan_markers("a [] b").is_empty());
    }

    #[test]
    fn unclosed_bracket_is_ignored() {
        assert!(scan_markers("tail [12:3").is_empty());
    }

    #[test]
    fn malformed_timestamps_are_reported() {
        for bad in ["[5:7]", "[123:45]", "[12:345]", "[1:2:3]", "[:30]", "[12:]"] {
            let events = scan_markers(bad);
            assert_eq!(events.len(), 1, "{}", bad);
            match &events[0] {
                MarkerEvent::Malformed { raw, .. } => assert_eq!(raw, bad),
                other => panic!("{} should be malformed, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn mixed_valid_and_malformed() {
        let events = scan_markers("[00:10] ok [0:1] bad [02:00] ok");

        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], MarkerEvent::Valid(_)));
        assert!(matches!(events[1], MarkerEvent::Malformed { .. }));
        assert!(matches!(events[2], MarkerEvent::Valid(_)));
    }

    #[test]
    fn long_bracketed_digit_runs_are_not_marker_candidates() {
        assert!(scan_markers("[1234567890123:45]").is_empty());
    }

    #[test]
    fn handles_multibyte_text_around_markers() {
        let text = "講者一：你好 [01:00] 講者二：早安";
        let markers = valid_markers(text);

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].1, 60);
    }
}
