//! Plain text to HTML post-processing for rendered email views

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINE_BREAK_REGEX: Regex = Regex::new(r"(\r\n|\n\r|\n|\r)").unwrap();

    // Group 1 is the whitespace (or start of text) in front of the URL, group 2 the URL.
    static ref URL_REGEX: Regex = Regex::new(concat!(
        r"(^|[\t\n\x0B\x0C\r ])",
        r"((?:ht|f)tps?://",
        r"(?:[a-z0-9][-a-z0-9]*[a-z0-9]\.)*[a-z][-a-z0-9]*[a-z]",
        r"(?::[0-9]+)?",
        r#"(?:/[^?<>#"\t\n\x0B\x0C\r ]+)?"#,
        r#"(?:\?[^<>#"\t\n\x0B\x0C\r ]+)?)"#,
    ))
    .unwrap();
}

/// Inserts `<br />` in front of every line break.
///
/// `\r\n` and `\n\r` count as a single break. The break itself is kept.
pub fn nl2br(text: &str) -> String {
    LINE_BREAK_REGEX.replace_all(text, "<br />${1}").into_owned()
}

/// Wraps every bare URL in `text` in an anchor that opens in a new tab.
///
/// A URL is only recognised at the start of the text or directly after a
/// whitespace character, and only for the `http`, `https`, `ftp` and `ftps`
/// schemes with a lowercase domain name host.
///
/// Running this twice over the same text is not supported: annotate raw text
/// exactly once.
pub fn annotate_links(text: &str) -> String {
    URL_REGEX
        .replace_all(text, r#"${1}<a href="${2}" target="_blank">${2}</a>"#)
        .into_owned()
}
