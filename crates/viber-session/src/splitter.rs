use viber_core::GeneratedFile;

/// Marker opening a new file in the combined output stream:
/// `---FILE:<name>---` on its own line.
pub const FILE_SEPARATOR: &str = "---FILE:";

/// Optional marker closing the whole stream, after the last file's content.
pub const STREAM_TERMINATOR: &str = "---END---";

/// Filename used when the output was never split into files.
pub const DEFAULT_FILENAME: &str = "output.md";

/// Split the accumulated output buffer into named files.
///
/// Re-run over the full buffer on every chunk arrival; the result is a pure
/// function of the buffer, so partial separator lines and missing terminators
/// only ever degrade the output, never fail it. Duplicate filenames are kept
/// as separate entries: a provider repeating a name signals a malformed
/// generation and is surfaced, not merged. There is no escaping: a literal
/// `---FILE:` inside a document body will split it.
///
/// Entries with empty content (a separator that arrived before its body) are
/// kept; whether they are displayable is the caller's decision.
pub fn parse_files(buffer: &str) -> Vec<GeneratedFile> {
    if !buffer.contains(FILE_SEPARATOR) {
        // Single-file output, or the earliest chunks of a multi-file stream
        // before the first separator has arrived.
        return vec![GeneratedFile::new(
            DEFAULT_FILENAME,
            strip_terminator(buffer).trim(),
        )];
    }

    let mut files = Vec::new();
    // The first segment is preamble before any separator.
    for segment in buffer.split(FILE_SEPARATOR).skip(1) {
        match segment.find('\n') {
            None => {
                // Separator line still streaming in; the filename itself may
                // be incomplete. Surface the file with no content yet.
                files.push(GeneratedFile::new(
                    strip_marker_close(segment).trim(),
                    "",
                ));
            }
            Some(newline) => {
                let filename = strip_marker_close(&segment[..newline]).trim();
                let content = strip_terminator(&segment[newline + 1..]).trim();
                files.push(GeneratedFile::new(filename, content));
            }
        }
    }
    files
}

/// Drop a trailing `---END---` (plus trailing whitespace) if present.
fn strip_terminator(content: &str) -> &str {
    let trimmed = content.trim_end();
    trimmed.strip_suffix(STREAM_TERMINATOR).unwrap_or(trimmed)
}

/// Drop the closing `---` of a separator line if it has arrived.
fn strip_marker_close(line: &str) -> &str {
    let trimmed = line.trim_end();
    trimmed.strip_suffix("---").unwrap_or(trimmed)
}
