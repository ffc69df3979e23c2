use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_megabytes(mb: f64) -> String {
    if mb >= 1024.0 {
        format!("{:.2} GB", mb / 1024.0)
    } else {
        format!("{mb:.1} MB")
    }
}

pub fn format_percent(value: f32) -> String {
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate_unicode("short", 10), "short");
        assert_eq!(truncate_unicode("firefox-esr", 6), "firef\u{2026}");
    }

    #[test]
    fn megabytes_switch_to_gigabytes() {
        assert_eq!(format_megabytes(12.34), "12.3 MB");
        assert_eq!(format_megabytes(2048.0), "2.00 GB");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(7.26), "7.3%");
        assert_eq!(format_percent(100.0), "100.0%");
    }
}
