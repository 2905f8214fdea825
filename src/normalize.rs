use regex::Regex;
use std::sync::LazyLock;

/// Dash look-alikes that PDF/DOCX extraction leaves behind:
/// hyphen, non-breaking hyphen, figure dash, en dash, em dash,
/// horizontal bar, minus sign.
const DASHES: &[char] = &[
    '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2212}',
];

// Two or more horizontal whitespace characters (anything but a newline).
static RE_HSPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]{2,}").expect("hspace regex"));

/// Canonicalize raw extracted text before any pattern matching.
///
/// Every byte offset computed downstream refers to the returned string,
/// never to the raw input.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                // \r\n and lone \r both become \n
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{00A0}' | '\u{202F}' => out.push(' '),
            c if DASHES.contains(&c) => out.push('-'),
            c => out.push(c),
        }
    }

    RE_HSPACE_RUN.replace_all(&out, " ").into_owned()
}

/// Lines of normalized text paired with the byte offset of their first
/// character.
pub fn lines_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    text.split('\n')
        .map(|line| {
            let start = offset;
            offset += line.len() + 1;
            (start, line)
        })
        .collect()
}
