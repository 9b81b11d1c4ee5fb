use std::ops::RangeInclusive;

/// Characters after which a line may be broken, sorted by range start.
///
/// Scripts written without spaces get whole blocks so every glyph is a
/// candidate break point.
pub const WORD_DELIMITERS: &[RangeInclusive<char>] = &[
    ' '..=' ',
    '-'..='-',
    // CJK symbols, punctuation, kana and bopomofo
    '\u{3000}'..='\u{31FF}',
    // CJK unified ideographs (with extension A)
    '\u{3400}'..='\u{9FFF}',
];

/// Returns the sorted byte offsets into `raw` at which a line may break.
///
/// The result always starts with `0` and ends with `raw.len()`. A newline
/// contributes a break before and after itself so it always forms its own
/// segment.
pub fn word_boundaries(raw: &str) -> Vec<usize> {
    let mut words = vec![0];

    for (offset, ch) in raw.char_indices() {
        let next = offset + ch.len_utf8();

        if ch == '\n' {
            words.push(offset);
            words.push(next);
            continue;
        }

        for range in WORD_DELIMITERS {
            if ch <= *range.end() {
                if ch >= *range.start() {
                    words.push(next);
                }
                break;
            }
        }
    }

    words.push(raw.len());

    // keep both sentinels for empty input
    if words.len() > 2 {
        words.dedup();
    }

    words
}
