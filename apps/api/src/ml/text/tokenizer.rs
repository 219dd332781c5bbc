use super::stop_words::is_stop_word;

/// Lowercased word tokens of at least two characters, stop words removed.
///
/// A word is a maximal run of alphanumeric characters or underscores, so
/// "UI/UX" yields `ui` and `ux`, and single digits disappear.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// Contiguous n-grams for every `n` in `min_n..=max_n`, words joined by a space.
pub fn ngrams(tokens: &[String], min_n: usize, max_n: usize) -> Vec<String> {
    let mut out = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n > tokens.len() {
            break;
        }
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}

/// Tokenize then expand into n-grams.
pub fn analyze(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    ngrams(&tokenize(text), min_n, max_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_short_and_stop_words() {
        assert_eq!(
            tokenize("Experience in UI/UX and 3 years of SQL"),
            vec!["experience", "ui", "ux", "years", "sql"]
        );
    }

    #[test]
    fn test_tokenize_keeps_underscores() {
        assert_eq!(tokenize("power_bi dashboards"), vec!["power_bi", "dashboards"]);
    }

    #[test]
    fn test_unigrams_and_bigrams() {
        let tokens = tokenize("python sql statistics");
        assert_eq!(
            ngrams(&tokens, 1, 2),
            vec!["python", "sql", "statistics", "python sql", "sql statistics"]
        );
    }

    #[test]
    fn test_bigrams_skip_removed_stop_words() {
        // "and" is removed before pairing
        assert_eq!(analyze("excel and sql", 2, 2), vec!["excel sql"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(analyze("", 1, 2).is_empty());
        assert!(analyze("a I", 1, 2).is_empty());
    }
}
