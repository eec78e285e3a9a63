// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Turns the raw text pieces under a DOM node into the single
// "cleaned visible text" line used for features and for the
// title / kicker fields of a record.
//
// Rendered listing pages routinely contain:
//   - Non-breaking spaces (U+00A0) between words
//   - Zero-width spaces (U+200B) and byte order marks
//   - Newlines and tabs from template indentation
//   - Runs of spaces around inline elements
//
// Cleaning steps (applied in order):
//   1. Trim every text piece and drop the empty ones
//   2. Join the remaining pieces with a single space
//   3. Map Unicode whitespace variants and control characters
//      to a plain space
//   4. Collapse runs of spaces into one and trim the ends

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Join text pieces (as yielded by a DOM text iterator) into
    /// one cleaned line.
    pub fn join_pieces<'a>(&self, pieces: impl IntoIterator<Item = &'a str>) -> String {
        let joined = pieces
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self.clean(&joined)
    }

    /// Clean a single string into one normalised line.
    pub fn clean(&self, text: &str) -> String {

        // ── Step 1: Normalise individual characters ───────────────────────────
        let mapped = text.chars().map(|c| match c {
            '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
            c if c.is_control() || c.is_whitespace() => ' ',
            c => c,
        });

        // ── Step 2: Collapse runs of spaces ──────────────────────────────────
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true; // swallows leading spaces

        for c in mapped {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        // ── Step 3: Drop the trailing space, if any ──────────────────────────
        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
