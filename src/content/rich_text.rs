//! Structured rich text and its HTML serialization
//!
//! A rich text field is a list of blocks (paragraphs, headings, list items,
//! images, embeds). Each text block carries inline spans addressed by
//! UTF-16 offsets into the block text.

use serde::{Deserialize, Serialize};

use crate::helpers::html_escape;

/// A rich text document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<RichTextBlock>);

impl RichText {
    pub fn blocks(&self) -> &[RichTextBlock] {
        &self.0
    }
}

/// A single block of rich text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub text: String,
    pub spans: Vec<Span>,
    /// Custom block label
    pub label: Option<String>,

    // Image blocks
    pub url: Option<String>,
    pub alt: Option<String>,

    // Embed blocks
    pub oembed: Option<Embed>,
}

impl RichTextBlock {
    /// Create a text block without spans
    pub fn text(kind: BlockKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
            ..Default::default()
        }
    }

    /// Add an inline span
    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    #[serde(rename = "heading1")]
    Heading1,
    #[serde(rename = "heading2")]
    Heading2,
    #[serde(rename = "heading3")]
    Heading3,
    #[serde(rename = "heading4")]
    Heading4,
    #[serde(rename = "heading5")]
    Heading5,
    #[serde(rename = "heading6")]
    Heading6,
    #[default]
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "preformatted")]
    Preformatted,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "o-list-item")]
    OrderedListItem,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "embed")]
    Embed,
    #[serde(other)]
    Unknown,
}

impl BlockKind {
    /// Element name for text blocks
    fn element(self) -> Option<&'static str> {
        match self {
            BlockKind::Heading1 => Some("h1"),
            BlockKind::Heading2 => Some("h2"),
            BlockKind::Heading3 => Some("h3"),
            BlockKind::Heading4 => Some("h4"),
            BlockKind::Heading5 => Some("h5"),
            BlockKind::Heading6 => Some("h6"),
            BlockKind::Paragraph => Some("p"),
            BlockKind::Preformatted => Some("pre"),
            BlockKind::ListItem | BlockKind::OrderedListItem => Some("li"),
            BlockKind::Image | BlockKind::Embed | BlockKind::Unknown => None,
        }
    }

    /// Wrapping list element, if this block is a list item
    fn list_element(self) -> Option<&'static str> {
        match self {
            BlockKind::ListItem => Some("ul"),
            BlockKind::OrderedListItem => Some("ol"),
            _ => None,
        }
    }
}

/// oEmbed payload of an embed block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Embed {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub embed_url: Option<String>,
    pub provider_name: Option<String>,
    pub html: Option<String>,
}

/// Inline formatting over `[start, end)` of the block text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    pub data: Option<SpanData>,
}

impl Span {
    pub fn new(kind: SpanKind, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind,
            data: None,
        }
    }

    /// A hyperlink to an external URL
    pub fn web_link(start: usize, end: usize, url: &str) -> Self {
        Self {
            start,
            end,
            kind: SpanKind::Hyperlink,
            data: Some(SpanData {
                link_type: Some("Web".to_string()),
                url: Some(url.to_string()),
                ..Default::default()
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink,
    Label,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Payload of hyperlink and label spans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanData {
    pub link_type: Option<String>,
    pub url: Option<String>,
    pub target: Option<String>,
    /// Linked document uid (document links)
    pub uid: Option<String>,
    pub label: Option<String>,
}

/// Serializes rich text to HTML
#[derive(Debug, Clone)]
pub struct RichTextRenderer {
    document_prefix: String,
}

impl RichTextRenderer {
    /// Create a renderer resolving document links to `/post/<uid>`
    pub fn new() -> Self {
        Self::with_document_prefix("/post/")
    }

    /// Create a renderer resolving document links to `<prefix><uid>`
    pub fn with_document_prefix(prefix: &str) -> Self {
        Self {
            document_prefix: prefix.to_string(),
        }
    }

    /// Render a rich text document as HTML
    pub fn render(&self, rich_text: &RichText) -> String {
        let mut html = String::new();
        let mut open_list: Option<&'static str> = None;

        for block in rich_text.blocks() {
            let list = block.kind.list_element();
            if open_list != list {
                if let Some(tag) = open_list {
                    html.push_str(&format!("</{}>", tag));
                }
                if let Some(tag) = list {
                    html.push_str(&format!("<{}>", tag));
                }
                open_list = list;
            }
            self.render_block(block, &mut html);
        }

        if let Some(tag) = open_list {
            html.push_str(&format!("</{}>", tag));
        }

        html
    }

    fn render_block(&self, block: &RichTextBlock, out: &mut String) {
        match block.kind {
            BlockKind::Image => {
                let src = block.url.as_deref().unwrap_or_default();
                let alt = block.alt.as_deref().unwrap_or_default();
                out.push_str(&format!(
                    r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                    html_escape(src),
                    html_escape(alt)
                ));
            }
            BlockKind::Embed => {
                let embed = block.oembed.clone().unwrap_or_default();
                out.push_str(&format!(
                    r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}">{}</div>"#,
                    html_escape(embed.embed_url.as_deref().unwrap_or_default()),
                    html_escape(embed.kind.as_deref().unwrap_or_default()),
                    html_escape(embed.provider_name.as_deref().unwrap_or_default()),
                    embed.html.as_deref().unwrap_or_default()
                ));
            }
            BlockKind::Unknown => {
                tracing::debug!("Skipping rich text block of unknown type");
            }
            kind => {
                // Text blocks always have an element
                let tag = kind.element().unwrap_or("p");
                let class = block
                    .label
                    .as_deref()
                    .map(|l| format!(r#" class="{}""#, html_escape(l)))
                    .unwrap_or_default();
                out.push_str(&format!("<{}{}>", tag, class));
                self.render_inline(&block.text, &block.spans, out);
                out.push_str(&format!("</{}>", tag));
            }
        }
    }

    /// Render block text with its spans, keeping the markup well nested
    fn render_inline(&self, text: &str, spans: &[Span], out: &mut String) {
        let offsets = Utf16Offsets::new(text);
        let len = offsets.len();

        let mut ordered: Vec<&Span> = spans
            .iter()
            .filter(|s| s.start < s.end && s.start < len)
            .collect();
        ordered.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut boundaries: Vec<usize> = vec![0, len];
        for span in &ordered {
            boundaries.push(span.start);
            boundaries.push(span.end.min(len));
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut stack: Vec<usize> = Vec::new();
        for window in boundaries.windows(2) {
            let (from, to) = (window[0], window[1]);
            let active: Vec<usize> = ordered
                .iter()
                .enumerate()
                .filter(|(_, s)| s.start <= from && s.end >= to)
                .map(|(i, _)| i)
                .collect();

            let common = stack
                .iter()
                .zip(active.iter())
                .take_while(|(a, b)| a == b)
                .count();
            for &i in stack[common..].iter().rev() {
                out.push_str(&self.close_tag(ordered[i]));
            }
            for &i in &active[common..] {
                out.push_str(&self.open_tag(ordered[i]));
            }
            stack = active;

            out.push_str(&escape_text(offsets.slice(text, from, to)));
        }

        for &i in stack.iter().rev() {
            out.push_str(&self.close_tag(ordered[i]));
        }
    }

    fn open_tag(&self, span: &Span) -> String {
        match span.kind {
            SpanKind::Strong => "<strong>".to_string(),
            SpanKind::Em => "<em>".to_string(),
            SpanKind::Label => {
                let label = span
                    .data
                    .as_ref()
                    .and_then(|d| d.label.as_deref())
                    .unwrap_or_default();
                format!(r#"<span class="{}">"#, html_escape(label))
            }
            SpanKind::Hyperlink => match self.resolve_link(span.data.as_ref()) {
                Some(href) => {
                    let target = span
                        .data
                        .as_ref()
                        .and_then(|d| d.target.as_deref())
                        .map(|t| format!(r#" target="{}" rel="noopener""#, html_escape(t)))
                        .unwrap_or_default();
                    format!(r#"<a href="{}"{}>"#, html_escape(&href), target)
                }
                None => String::new(),
            },
            SpanKind::Unknown => String::new(),
        }
    }

    fn close_tag(&self, span: &Span) -> String {
        match span.kind {
            SpanKind::Strong => "</strong>".to_string(),
            SpanKind::Em => "</em>".to_string(),
            SpanKind::Label => "</span>".to_string(),
            SpanKind::Hyperlink if self.resolve_link(span.data.as_ref()).is_some() => {
                "</a>".to_string()
            }
            SpanKind::Hyperlink | SpanKind::Unknown => String::new(),
        }
    }

    /// Resolve the href of a hyperlink span
    fn resolve_link(&self, data: Option<&SpanData>) -> Option<String> {
        let data = data?;
        match data.link_type.as_deref() {
            Some("Document") => data
                .uid
                .as_deref()
                .map(|uid| format!("{}{}", self.document_prefix, uid)),
            _ => data.url.clone(),
        }
    }
}

impl Default for RichTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape block text, turning line breaks into `<br />`
fn escape_text(s: &str) -> String {
    html_escape(s).replace('\n', "<br />")
}

/// Maps UTF-16 offsets onto byte offsets of a `str`
struct Utf16Offsets {
    /// (utf16 offset, byte offset) of every char start, plus the end
    positions: Vec<(usize, usize)>,
}

impl Utf16Offsets {
    fn new(text: &str) -> Self {
        let mut positions = Vec::with_capacity(text.len() + 1);
        let mut unit = 0;
        for (byte, c) in text.char_indices() {
            positions.push((unit, byte));
            unit += c.len_utf16();
        }
        positions.push((unit, text.len()));
        Self { positions }
    }

    /// Length in UTF-16 code units
    fn len(&self) -> usize {
        self.positions.last().map(|p| p.0).unwrap_or(0)
    }

    /// Byte offset of the first char starting at or after `unit`
    fn byte(&self, unit: usize) -> usize {
        let idx = self.positions.partition_point(|p| p.0 < unit);
        self.positions
            .get(idx)
            .or(self.positions.last())
            .map(|p| p.1)
            .unwrap_or(0)
    }

    fn slice<'t>(&self, text: &'t str, from: usize, to: usize) -> &'t str {
        &text[self.byte(from)..self.byte(to)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(blocks: Vec<RichTextBlock>) -> String {
        RichTextRenderer::new().render(&RichText(blocks))
    }

    #[test]
    fn test_render_paragraphs_and_headings() {
        let html = render(vec![
            RichTextBlock::text(BlockKind::Heading3, "Title"),
            RichTextBlock::text(BlockKind::Paragraph, "First."),
            RichTextBlock::text(BlockKind::Paragraph, "Second."),
        ]);
        assert_eq!(html, "<h3>Title</h3><p>First.</p><p>Second.</p>");
    }

    #[test]
    fn test_render_groups_list_items() {
        let html = render(vec![
            RichTextBlock::text(BlockKind::ListItem, "a"),
            RichTextBlock::text(BlockKind::ListItem, "b"),
            RichTextBlock::text(BlockKind::OrderedListItem, "one"),
            RichTextBlock::text(BlockKind::Paragraph, "end"),
        ]);
        assert_eq!(
            html,
            "<ul><li>a</li><li>b</li></ul><ol><li>one</li></ol><p>end</p>"
        );
    }

    #[test]
    fn test_render_spans() {
        let block = RichTextBlock::text(BlockKind::Paragraph, "Hello bold world")
            .with_span(Span::new(SpanKind::Strong, 6, 10))
            .with_span(Span::web_link(11, 16, "https://example.com"));
        assert_eq!(
            render(vec![block]),
            r#"<p>Hello <strong>bold</strong> <a href="https://example.com">world</a></p>"#
        );
    }

    #[test]
    fn test_render_nested_and_overlapping_spans() {
        let nested = RichTextBlock::text(BlockKind::Paragraph, "abcdef")
            .with_span(Span::new(SpanKind::Strong, 0, 6))
            .with_span(Span::new(SpanKind::Em, 2, 4));
        assert_eq!(
            render(vec![nested]),
            "<p><strong>ab<em>cd</em>ef</strong></p>"
        );

        let overlapping = RichTextBlock::text(BlockKind::Paragraph, "abcdef")
            .with_span(Span::new(SpanKind::Strong, 0, 4))
            .with_span(Span::new(SpanKind::Em, 2, 6));
        assert_eq!(
            render(vec![overlapping]),
            "<p><strong>ab<em>cd</em></strong><em>ef</em></p>"
        );
    }

    #[test]
    fn test_span_offsets_are_utf16() {
        // "é" is one UTF-16 unit, the emoji is two
        let block = RichTextBlock::text(BlockKind::Paragraph, "é😀 ok")
            .with_span(Span::new(SpanKind::Em, 4, 6));
        assert_eq!(render(vec![block]), "<p>é😀 <em>ok</em></p>");
    }

    #[test]
    fn test_escapes_text_and_line_breaks() {
        let html = render(vec![RichTextBlock::text(
            BlockKind::Preformatted,
            "a < b\nc & d",
        )]);
        assert_eq!(html, "<pre>a &lt; b<br />c &amp; d</pre>");
    }

    #[test]
    fn test_document_links_resolve_to_post_path() {
        let mut span = Span::new(SpanKind::Hyperlink, 0, 4);
        span.data = Some(SpanData {
            link_type: Some("Document".to_string()),
            uid: Some("other-post".to_string()),
            ..Default::default()
        });
        let block = RichTextBlock::text(BlockKind::Paragraph, "next").with_span(span);
        assert_eq!(
            render(vec![block]),
            r#"<p><a href="/post/other-post">next</a></p>"#
        );
    }

    #[test]
    fn test_image_and_unknown_blocks() {
        let image = RichTextBlock {
            kind: BlockKind::Image,
            url: Some("https://images.prismic.io/a.png".to_string()),
            alt: Some("A".to_string()),
            ..Default::default()
        };
        let html = render(vec![image, RichTextBlock::text(BlockKind::Unknown, "x")]);
        assert_eq!(
            html,
            r#"<p class="block-img"><img src="https://images.prismic.io/a.png" alt="A" /></p>"#
        );
    }

    #[test]
    fn test_decode_prismic_json() {
        let json = r#"[
            {"type": "paragraph", "text": "Some text", "spans": [{"start": 0, "end": 4, "type": "em"}]},
            {"type": "list-item", "text": "item", "spans": []},
            {"type": "slice-thing", "text": "?", "spans": []}
        ]"#;
        let rich_text: RichText = serde_json::from_str(json).unwrap();
        assert_eq!(rich_text.blocks().len(), 3);
        assert_eq!(rich_text.blocks()[2].kind, BlockKind::Unknown);
        assert_eq!(
            RichTextRenderer::new().render(&rich_text),
            "<p><em>Some</em> text</p><ul><li>item</li></ul>"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let rich_text = RichText(vec![RichTextBlock::text(BlockKind::Paragraph, "abc")
            .with_span(Span::new(SpanKind::Strong, 0, 2))
            .with_span(Span::new(SpanKind::Em, 1, 3))]);
        let renderer = RichTextRenderer::new();
        assert_eq!(renderer.render(&rich_text), renderer.render(&rich_text));
    }
}
