//! Emoji shorthand normalization.
//!
//! Expands `:shortcode:` tokens to their glyphs before text reaches the
//! screen. Total function with no failure mode; unknown shortcodes pass
//! through verbatim.

/// Expand `:shortcode:` tokens in `text` to emoji glyphs.
///
/// Idempotent: glyphs contain no `:`, so normalizing an already-normalized
/// string is a no-op.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        match tail.find(':') {
            Some(end) if end > 0 => {
                let name = &tail[..end];
                if let Some(glyph) = emojis::get_by_shortcode(name) {
                    out.push_str(glyph.as_str());
                    rest = &tail[end + 1..];
                } else {
                    // Not a shortcode; keep the colon and rescan from the
                    // next character so `:b:smile:` still finds `:smile:`.
                    out.push(':');
                    rest = tail;
                }
            },
            _ => {
                out.push(':');
                rest = tail;
            },
        }
    }

    out.push_str(rest);
    out
}
