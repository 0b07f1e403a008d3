use chrono::{DateTime, Utc};

/// Minor units + lowercase currency code -> "25.50 USD".
pub fn format_amount(amount_minor: i64, currency: &str) -> String {
    let major = amount_minor as f64 / 100.0;
    format!("{:.2} {}", major, currency.to_uppercase())
}

/// Fixed UTC rendering so packet content does not depend on server locale.
pub fn format_datetime(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn format_bytes(bytes: i64) -> String {
    if bytes <= 0 {
        return "N/A".to_string();
    }
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    }
}

/// Underscore codes ("product_not_received") read as prose in the packet.
pub fn humanize(code: &str) -> String {
    let text = code.replace('_', " ").trim().to_string();
    if text.is_empty() {
        "N/A".to_string()
    } else {
        text
    }
}

/// Greedy word wrap to a character budget, hard-splitting words longer
/// than one line. Blank input lines survive as paragraph breaks.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        if raw_line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let word_len = word.chars().count();
            if current.is_empty() {
                if word_len <= max_chars {
                    current.push_str(word);
                } else {
                    hard_split(word, max_chars, &mut lines, &mut current);
                }
            } else if current.chars().count() + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                if word_len <= max_chars {
                    current.push_str(word);
                } else {
                    hard_split(word, max_chars, &mut lines, &mut current);
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn hard_split(word: &str, max_chars: usize, lines: &mut Vec<String>, current: &mut String) {
    let chars: Vec<char> = word.chars().collect();
    for chunk in chars.chunks(max_chars) {
        let piece: String = chunk.iter().collect();
        if chunk.len() == max_chars {
            lines.push(piece);
        } else {
            *current = piece;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn amount_renders_major_units_and_uppercase_currency() {
        assert_eq!(format_amount(2550, "usd"), "25.50 USD");
        assert_eq!(format_amount(100, "eur"), "1.00 EUR");
        assert_eq!(format_amount(5, "gbp"), "0.05 GBP");
        assert_eq!(format_amount(0, "usd"), "0.00 USD");
    }

    #[test]
    fn datetime_is_fixed_format_utc() {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(format_datetime(ts), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn bytes_scale_through_units() {
        assert_eq!(format_bytes(0), "N/A");
        assert_eq!(format_bytes(-5), "N/A");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn humanize_replaces_underscores() {
        assert_eq!(humanize("product_not_received"), "product not received");
        assert_eq!(humanize("won"), "won");
        assert_eq!(humanize(""), "N/A");
        assert_eq!(humanize("___"), "N/A");
    }

    #[test]
    fn wrap_respects_budget_and_preserves_words() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.iter().all(|l| l.chars().count() <= 15));
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_hard_splits_oversize_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_paragraph_breaks() {
        let lines = wrap_text("first paragraph\n\nsecond one", 40);
        assert_eq!(lines, vec!["first paragraph", "", "second one"]);
    }
}
