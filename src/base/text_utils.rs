//! Text search helpers for locating keywords inside statement text.

/// Check if a character is considered part of a word (identifier).
///
/// Uses Unicode Standard Annex #31 rules for identifier characters.
#[inline]
pub fn is_word_character(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Whether `text[start..end]` is delimited by non-word characters (or text edges).
pub fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_character) && !after.is_some_and(is_word_character)
}

/// Byte offset of the last whole-word occurrence of `keyword` in `text[..limit]`.
///
/// `limit` is clamped to the text length and to a character boundary, so an
/// occurrence is only reported if it lies entirely before `limit`.
///
/// # Example
/// ```
/// use ecsact::base::text_utils::find_keyword_before;
///
/// let text = "package main main;";
/// assert_eq!(find_keyword_before(text, "main", 13), Some(8));
/// assert_eq!(find_keyword_before(text, "pack", 13), None);
/// ```
pub fn find_keyword_before(text: &str, keyword: &str, limit: usize) -> Option<usize> {
    let mut limit = limit.min(text.len());
    while !text.is_char_boundary(limit) {
        limit -= 1;
    }
    let haystack = &text[..limit];

    haystack
        .rmatch_indices(keyword)
        .map(|(idx, _)| idx)
        .find(|&idx| is_whole_word(text, idx, idx + keyword.len()))
}
