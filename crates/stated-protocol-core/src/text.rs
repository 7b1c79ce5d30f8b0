//! Line-framing helpers and the forbidden-character predicate.

/// Characters hosts refuse to interpolate into queries built from
/// untrusted statement text.
const FORBIDDEN_CHARS: [char; 8] = [';', '>', '<', '=', '"', '\'', '’', '\\'];

/// Whether `s` contains characters (or the `--` sequence) that hosts must
/// not interpolate into constructed queries.
///
/// The codec itself never applies this check; content round-trips any
/// Unicode text.
pub fn contains_forbidden_chars(s: &str) -> bool {
    s.contains(FORBIDDEN_CHARS) || s.contains("--")
}

/// Values from `values` that contain forbidden characters and are not a
/// 256-bit base64 value (hashes legitimately contain `=`, `-` and `/`).
pub fn forbidden_strings<'a>(values: &[&'a str]) -> Vec<&'a str> {
    values
        .iter()
        .copied()
        .filter(|v| contains_forbidden_chars(v) && !looks_like_base64_hash(v))
        .collect()
}

fn looks_like_base64_hash(s: &str) -> bool {
    let body = s.trim_end_matches('=');
    let padding = s.len() - body.len();
    padding <= 2
        && (30..=60).contains(&body.len())
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'-' | b'_'))
}

/// Whether `s` is a language code: two or three lower-case ASCII letters.
pub fn is_language_code(s: &str) -> bool {
    (2..=3).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_lowercase())
}

/// If `line` opens a translation block, the language it declares.
pub(crate) fn translation_marker(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("Translation ")?;
    let (lang, _) = rest.split_once(": ")?;
    is_language_code(lang).then_some(lang)
}

/// The marker line that opens the translation block for `lang`.
pub(crate) fn translation_prefix(lang: &str) -> String {
    format!("Translation {lang}: ")
}

pub(crate) fn with_trailing_newline(s: &str) -> String {
    if s.ends_with('\n') {
        s.to_string()
    } else {
        format!("{s}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_chars() {
        for bad in ["a;b", "x > y", "<script>", "a=b", "\"q\"", "it's", "it’s", "a\\b", "--"] {
            assert!(contains_forbidden_chars(bad), "{bad}");
        }
        for ok in ["plain text", "Zürich", "a-b", "1/2", "ünïcödé 字"] {
            assert!(!contains_forbidden_chars(ok), "{ok}");
        }
    }

    #[test]
    fn test_forbidden_strings_exempts_hashes() {
        let hash = "uU0nuZNNPgilLlLX2n2r+sSE7+N6U4DukIj3rOLvzek=";
        let url_hash = "ab--cdEFghIJklMNopQRstUVwxYZ0123456789abcde";
        let values = [hash, url_hash, "drop table;", "fine"];
        assert_eq!(forbidden_strings(&values), vec!["drop table;"]);
    }

    #[test]
    fn test_translation_marker() {
        assert_eq!(translation_marker("Translation de: Hallo"), Some("de"));
        assert_eq!(translation_marker("Translation zho: "), Some("zho"));
        assert_eq!(translation_marker("Translation DE: Hallo"), None);
        assert_eq!(translation_marker("Translation german: Hallo"), None);
        assert_eq!(translation_marker("Translations: de"), None);
    }

    #[test]
    fn test_language_codes() {
        assert!(is_language_code("en"));
        assert!(is_language_code("zho"));
        assert!(!is_language_code("e"));
        assert!(!is_language_code("engl"));
        assert!(!is_language_code("EN"));
    }
}
