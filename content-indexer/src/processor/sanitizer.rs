//! Text clean-up applied to headlines, bylines and bodies before indexing.
//!
//! Each transform is a plain function over a string; pipelines apply them
//! left to right. Entity decoding runs before tag stripping and whitespace
//! collapsing always runs last.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref INTERACTIVE_GRAPHICS_REGEXP: Regex =
        Regex::new(r#"(?s)<div[\s]*class="interactive-comp">(.*?)</div>"#).unwrap();
    static ref PULL_QUOTE_REGEXP: Regex =
        Regex::new(r"(?s)<pull-quote(\s|>).*?</pull-quote>").unwrap();
    static ref NBSP_REGEXP: Regex = Regex::new(r"&nbsp;?").unwrap();
    static ref ENTITY_REGEXP: Regex =
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*)(;?)").unwrap();
    static ref SCRIPT_REGEXP: Regex = Regex::new(r"(?i)(?s)<script[^>]*>(.*?)</script>").unwrap();
    static ref TAG_REGEXP: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref EMBED_REGEXP: Regex = Regex::new(r"embed\d+").unwrap();
    static ref SQUARED_CAPTION_REGEXP: Regex = Regex::new(r"\[/?caption[^\]]*\]").unwrap();
    static ref DUPLICATE_WHITESPACE_REGEXP: Regex = Regex::new(r"\s+").unwrap();
}

/// Named entities that are also decoded without a trailing semicolon.
const LEGACY_ENTITIES: &[&str] = &["amp", "lt", "gt", "quot", "copy", "reg"];

/// A single text transform.
pub type TextTransform = fn(&str) -> String;

/// Transforms applied to headlines and bylines.
pub const SHORT_PIPELINE: &[TextTransform] = &[
    html_entity_decoder,
    tags_remover,
    outer_space_trimmer,
    duplicate_whitespace_remover,
];

/// Transforms applied to bodies.
pub const BODY_PIPELINE: &[TextTransform] = &[
    interactive_graphics_remover,
    pull_quote_remover,
    html_entity_decoder,
    script_tag_remover,
    tags_remover,
    outer_space_trimmer,
    embed_remover,
    squared_caption_remover,
    duplicate_whitespace_remover,
];

/// Apply `transforms` to `text` in order.
pub fn transform_text(text: &str, transforms: &[TextTransform]) -> String {
    transforms
        .iter()
        .fold(text.to_string(), |current, transform| transform(&current))
}

pub fn sanitize_short(text: &str) -> String {
    transform_text(text, SHORT_PIPELINE)
}

pub fn sanitize_body(text: &str) -> String {
    transform_text(text, BODY_PIPELINE)
}

pub fn interactive_graphics_remover(input: &str) -> String {
    INTERACTIVE_GRAPHICS_REGEXP.replace_all(input, "").into_owned()
}

pub fn pull_quote_remover(input: &str) -> String {
    PULL_QUOTE_REGEXP.replace_all(input, "").into_owned()
}

/// Decode HTML entities. `&nbsp;` becomes a plain space.
/// Decodes entities in a single pass, so `&amp;lt;` becomes `&lt;`.
///
/// Numeric and legacy named entities are decoded with or without the
/// semicolon. Any other name needs it, and unknown names are kept as written.
pub fn html_entity_decoder(input: &str) -> String {
    let text = NBSP_REGEXP.replace_all(input, " ");
    ENTITY_REGEXP
        .replace_all(&text, |caps: &Captures| {
            let name = &caps[1];
            let terminated = !caps[2].is_empty();
            if !terminated && !name.starts_with('#') && !LEGACY_ENTITIES.contains(&name) {
                return caps[0].to_string();
            }
            html_escape::decode_html_entities(&format!("&{};", name)).into_owned()
        })
        .into_owned()
}

pub fn script_tag_remover(input: &str) -> String {
    SCRIPT_REGEXP.replace_all(input, "").into_owned()
}

pub fn tags_remover(input: &str) -> String {
    TAG_REGEXP.replace_all(input, "").into_owned()
}

pub fn outer_space_trimmer(input: &str) -> String {
    input.trim().to_string()
}

pub fn embed_remover(input: &str) -> String {
    EMBED_REGEXP.replace_all(input, "").into_owned()
}

pub fn squared_caption_remover(input: &str) -> String {
    SQUARED_CAPTION_REGEXP.replace_all(input, "").into_owned()
}

pub fn duplicate_whitespace_remover(input: &str) -> String {
    DUPLICATE_WHITESPACE_REGEXP.replace_all(input, " ").into_owned()
}
