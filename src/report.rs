use ariadne::{Color, Config, Label, Report, ReportKind, Source};

/// Build a human readable report pointing at the place where JSON decoding failed.
pub fn malformed_input(src: &str, err: &serde_json::Error) -> String {
    let offset = byte_offset(src, err.line(), err.column());
    // Point at a single character, or at nothing when the input ended early.
    let end = offset + src[offset..].chars().next().map_or(0, char::len_utf8);
    // ariadne spans count chars, not bytes
    let span = char_index(src, offset)..char_index(src, end);

    let mut out = Vec::new();
    let written = Report::build(ReportKind::Error, /* filename */ (), span.start)
        .with_config(Config::default().with_color(false))
        .with_message("Invalid JSON")
        .with_label(
            Label::new((/* filename */ (), span))
                .with_message(err.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .write(Source::from(src), &mut out);

    match written {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(e) => {
            tracing::warn!("Failed to write report: {e}");
            format!("Invalid JSON: {err}")
        }
    }
}

/// serde_json reports 1-based lines and 1-based columns (0 when at line start).
fn byte_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_len = src[line_start..]
        .find('\n')
        .unwrap_or(src.len() - line_start);

    // Columns count bytes; clamp onto a char boundary inside the line.
    let mut offset = line_start + column.saturating_sub(1).min(line_len);
    while !src.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn char_index(src: &str, byte_offset: usize) -> usize {
    src[..byte_offset].chars().count()
}
