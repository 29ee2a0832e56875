use crate::{Error, Result};

/// Splits one comma-separated line into fields.
///
/// Double-quoted spans are atomic: commas inside them don't split, and the
/// surrounding quotes are stripped from the result. Everything outside
/// quotes is trimmed of whitespace, so `a, "b,c" ,d` becomes
/// `["a", "b,c", "d"]`. Consecutive commas yield empty fields.
pub fn split_line(line: &str) -> Result<Vec<String>> {
    // First pass: pull out every quoted span, masking each one with a NUL
    // sentinel so the comma split below can't see its contents.
    let mut spans = Vec::new();
    let mut masked = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find('"') {
        masked.push_str(&rest[..start]);
        let after_quote = &rest[start + 1..];
        let end = after_quote.find('"').ok_or(Error::UnterminatedQuote)?;
        spans.push(&after_quote[..end]);
        masked.push('\0');
        rest = &after_quote[end + 1..];
    }
    masked.push_str(rest);

    // Second pass: plain comma split, substituting the spans back in
    // left-to-right order wherever a field is exactly the sentinel. A field
    // that mixes a sentinel with other characters passes through untouched.
    let mut spans = spans.iter();
    Ok(masked
        .split(',')
        .map(|raw| {
            let field = raw.trim();
            if field == "\0" {
                spans.next().copied().unwrap_or("").to_string()
            } else {
                field.to_string()
            }
        })
        .collect())
}
