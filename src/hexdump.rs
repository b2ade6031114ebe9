//! Classic 16-bytes-per-line hex dump rendering.

use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Renders `buf` as hex dump lines, without trailing newlines.
///
/// Each line is a 4-digit offset, the hex bytes (missing bytes padded with
/// blanks) and the printable ASCII rendering. An empty buffer still renders
/// one all-blank line at offset `0000`.
pub fn hex_dump_lines(buf: &[u8]) -> Vec<String> {
    if buf.is_empty() {
        return vec![render_line(0, &[])];
    }
    buf.chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(i, chunk)| render_line(i * BYTES_PER_LINE, chunk))
        .collect()
}

fn render_line(offset: usize, chunk: &[u8]) -> String {
    let mut line = String::with_capacity(72);
    // Writing into a String cannot fail.
    let _ = write!(line, "{:04x} ", offset);
    for slot in 0..BYTES_PER_LINE {
        match chunk.get(slot) {
            Some(byte) => {
                let _ = write!(line, " {:02x}", byte);
            }
            None => line.push_str("   "),
        }
    }
    line.push_str("  ");
    line.extend(chunk.iter().map(|&b| printable(b)));
    line
}

fn printable(byte: u8) -> char {
    if (0x20..=0x7e).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}
