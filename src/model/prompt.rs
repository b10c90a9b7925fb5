//! Prompt assembly for chunked transcription requests.

/// Fixed transcription conventions sent with every chunk.
pub const SYSTEM_INSTRUCTION: &str = "\
You are a professional verbatim transcriber.
Follow these rules strictly:
1. Speaker continuity: this is one continuous recording delivered in parts. \
Keep speaker labels (Speaker A, Speaker B, ...) consistent; when an overlap \
reference is provided, match voices against it before labeling.
2. Timestamps: insert a [MM:SS] marker every 1-2 minutes and on every \
speaker change, measured from the start of the audio you received.
3. Completeness: transcribe the dialogue in full. Do not summarize, \
paraphrase, or skip passages.";

/// Build the per-chunk prompt.
///
/// For every chunk after the first this carries the overlap-calibration
/// instruction: the leading seconds of the audio duplicate the previous
/// chunk's tail and exist only to re-identify speakers, with transcription
/// resuming after the duplicated span. `calibration` is the bounded excerpt
/// of the previous chunk's raw output, quoted as ground truth.
pub fn chunk_prompt(
    index: usize,
    total: usize,
    overlap_secs: f64,
    calibration: Option<&str>,
) -> String {
    let mut prompt = format!("Part {}/{} of the recording.\n", index + 1, total);

    if index == 0 {
        prompt.push_str("This is the first part. Transcribe it in full, starting at [00:00].\n");
    } else {
        prompt.push_str(&format!(
            "Speaker calibration: the first {:.0} seconds of this audio duplicate \
the tail of the previous part. Use them only to re-identify the speakers, \
then resume transcription after the duplicated span.\n",
            overlap_secs
        ));
    }

    if let Some(excerpt) = calibration {
        prompt.push_str(&format!(
            "\nOverlap reference (end of the previous part):\n\"\"\"\n{}\n\"\"\"\n",
            excerpt
        ));
    }

    prompt.push_str("\nBegin the transcription.");
    prompt
}
