//! Word-boundary excerpt truncation for listing previews.

pub const ELLIPSIS: &str = "...";

/// Preview length used by the post listing.
pub const LISTING_EXCERPT_CHARS: usize = 200;

/// Shorten `text` to at most `max_len` characters plus an ellipsis.
///
/// Text that already fits is returned unchanged. Otherwise the cut is moved back
/// to the last space inside the window when there is one.
pub fn truncate(text: &str, max_len: usize) -> String {
    let cut = match text.char_indices().nth(max_len) {
        Some((byte_index, _)) => byte_index,
        None => return text.to_string(),
    };

    let window = &text[..cut];
    let kept = match window.rfind(' ') {
        Some(space) => &window[..space],
        None => window,
    };

    format!("{}{ELLIPSIS}", kept.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn cuts_back_to_last_space() {
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("the quick brown fox", 12), "the quick...");
    }

    #[test]
    fn hard_cuts_when_no_space_in_window() {
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn trims_whitespace_before_ellipsis() {
        assert_eq!(truncate("  a   b  c", 6), "a...");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(truncate("日本語のテキスト", 3), "日本語...");
    }
}
