//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Path of a post detail page
///
/// # Examples
/// ```ignore
/// post_path("como-utilizar-hooks") // -> "/post/como-utilizar-hooks"
/// ```
pub fn post_path(uid: &str) -> String {
    format!("/post/{}", utf8_percent_encode(uid, SEGMENT))
}

/// Path of the listing after `pages` pages have been loaded (live server)
pub fn listing_path(pages: usize) -> String {
    if pages <= 1 {
        "/".to_string()
    } else {
        format!("/?pages={}", pages)
    }
}

/// Path of the listing after `pages` pages have been loaded (static output)
pub fn static_listing_path(pages: usize) -> String {
    if pages <= 1 {
        "/".to_string()
    } else {
        format!("/page/{}/", pages)
    }
}
