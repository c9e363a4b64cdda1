//! Content module - raw documents, post models and rich text processing

mod detail;
mod post;
mod raw;
mod reading_time;
mod rich_text;

pub use detail::{DetailAssembler, DetailStatus};
pub use post::{ContentBlock, PostDetail, PostSummary, RenderedBlock};
pub use raw::{RawContent, RawImage, RawPage, RawPost, RawPostData};
pub use reading_time::{count_words, ReadingTime, WORDS_PER_MINUTE};
pub use rich_text::{
    BlockKind, Embed, RichText, RichTextBlock, RichTextRenderer, Span, SpanData, SpanKind,
};
