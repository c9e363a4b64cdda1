//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Elements whose boundaries separate words
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "ul", "ol", "li", "br", "div", "img",
    "figure", "blockquote",
];

/// Extract the text of an HTML fragment
///
/// Block-level tags are replaced by a space so that `<p>a</p><p>b</p>`
/// yields two words. Inline tags vanish without a trace.
pub fn html_to_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut tag: Option<String> = None;

    for c in s.chars() {
        if let Some(name) = tag.as_mut() {
            if c == '>' {
                if is_block_tag(name) {
                    result.push(' ');
                }
                tag = None;
            } else {
                name.push(c);
            }
        } else if c == '<' {
            tag = Some(String::new());
        } else {
            result.push(c);
        }
    }

    result
}

fn is_block_tag(raw: &str) -> bool {
    let name: String = raw
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCK_ELEMENTS.contains(&name.as_str())
}
