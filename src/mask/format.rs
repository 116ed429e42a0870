use super::model::{MaskTemplate, MaskToken};

/// Interleaves literals and raw chars. Stops at the first placeholder that
/// has no raw char, so literals leading up to it are shown but no
/// placeholder glyphs ever are.
pub fn render(template: &MaskTemplate, raw: &str) -> String {
    let mut raw_chars = raw.chars();
    let mut out = String::with_capacity(template.len());
    for token in template.tokens() {
        match token {
            MaskToken::Literal(ch) => out.push(*ch),
            MaskToken::Placeholder(_) => match raw_chars.next() {
                Some(ch) => out.push(ch),
                None => break,
            },
        }
    }
    out
}

/// Recovers the raw value from a display string produced by [`render`].
pub fn extract_raw(template: &MaskTemplate, display: &str) -> String {
    template
        .tokens()
        .iter()
        .zip(display.chars())
        .filter_map(|(token, ch)| token.is_placeholder().then_some(ch))
        .collect()
}

/// Display offset of the placeholder that holds raw index `raw_offset`,
/// counting every literal before it.
pub fn raw_to_display(template: &MaskTemplate, raw_offset: usize) -> usize {
    let mut seen = 0usize;
    for (idx, token) in template.tokens().iter().enumerate() {
        if token.is_placeholder() {
            if seen == raw_offset {
                return idx;
            }
            seen += 1;
        }
    }
    template.len()
}

/// Number of placeholders left of `display_offset`, clamped to `raw_len`.
pub fn display_to_raw(template: &MaskTemplate, raw_len: usize, display_offset: usize) -> usize {
    let end = display_offset.min(template.len());
    template.tokens()[..end]
        .iter()
        .filter(|token| token.is_placeholder())
        .count()
        .min(raw_len)
}
