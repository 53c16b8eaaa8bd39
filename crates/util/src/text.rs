use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string to the given display width, appending `…` when
/// anything was cut. Widths are terminal cells, not bytes, so wide
/// characters count as two.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > max_width.saturating_sub(1) {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
    }

    #[test]
    fn long_strings_cut_and_mark() {
        assert_eq!(truncate_with_ellipsis("hello world", 8), "hello w…");
    }

    #[test]
    fn wide_characters_count_double() {
        // Each ideograph occupies two cells.
        assert_eq!(truncate_with_ellipsis("日本語テスト", 5), "日本…");
    }

    #[test]
    fn zero_width_budget_yields_empty() {
        assert_eq!(truncate_with_ellipsis("abc", 0), "");
    }
}
