/// Convert a byte offset into (line, col), both 1-indexed.
///
/// Offsets past the end of the buffer clamp to the final position, so a
/// diagnostic anchored at EOF still maps to a real line.
pub fn offset_to_line_col(offset: usize, source: &str) -> (usize, usize) {
    let bytes = source.as_bytes();
    let end = offset.min(bytes.len());
    let mut line = 1;
    let mut line_start = 0;
    for (i, &b) in bytes[..end].iter().enumerate() {
        if b == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    (line, end - line_start + 1)
}
