use regex::Regex;

const VERSION_PATTERN: &str = r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)";

/// Text-level extraction shared by the scraping modes.
pub struct Extractor {
    version_regex: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            version_regex: Regex::new(VERSION_PATTERN).expect("version pattern is valid"),
        }
    }

    /// `"Python 3.10 (stable)"` -> `("3.10", "stable")`; anything else -> `(text, "")`.
    pub fn version_and_status(&self, text: &str) -> (String, String) {
        match self.version_regex.captures(text) {
            Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
            None => (text.to_string(), String::new()),
        }
    }
}

/// Replaces every line break with a single space.
pub fn flatten_lines(text: &str) -> String {
    text.replace('\n', " ")
}

/// Status code from the first PEP index cell: everything after the leading type letter.
pub fn status_code(cell_text: &str) -> String {
    cell_text.chars().skip(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_with_status() {
        let extractor = Extractor::new();
        assert_eq!(
            extractor.version_and_status("Python 3.10 (stable)"),
            ("3.10".to_string(), "stable".to_string())
        );
        assert_eq!(
            extractor.version_and_status("Python 3.14 (in development)"),
            ("3.14".to_string(), "in development".to_string())
        );
    }

    #[test]
    fn version_is_searched_inside_longer_text() {
        let extractor = Extractor::new();
        let (version, status) = extractor.version_and_status("Docs for Python 2.7 (EOL) here");
        assert_eq!(version, "2.7");
        assert_eq!(status, "EOL");
    }

    #[test]
    fn text_without_version_shape_is_kept_whole() {
        let extractor = Extractor::new();
        assert_eq!(
            extractor.version_and_status("All versions"),
            ("All versions".to_string(), String::new())
        );
        assert_eq!(
            extractor.version_and_status("Python 3 (stable)"),
            ("Python 3 (stable)".to_string(), String::new())
        );
    }

    #[test]
    fn status_code_drops_type_letter() {
        assert_eq!(status_code("SF"), "F");
        assert_eq!(status_code("I"), "");
        assert_eq!(status_code(""), "");
    }

    #[test]
    fn flatten_lines_joins_with_spaces() {
        assert_eq!(flatten_lines("\nEditor:\nA. Person\n"), " Editor: A. Person ");
    }
}
