//! Content block renderer.
//!
//! Every block maps to a markup fragment through one exhaustive match. Authored
//! text is HTML-escaped and attribute values are attribute-escaped; the only
//! markup passed through verbatim is an inline SVG payload.

mod escape;
mod markup;
mod math;
mod media;
mod phoneme;

use lesson_core::model::{ContentBlock, VectorGraphic};

pub use escape::{escape_attr, escape_html, escape_url};
pub use markup::{ExternalGraphic, GraphicResolution, LessonMarkup};
pub use phoneme::AUDIO_SRC_ATTR;

fn list(tag: &str, items: &[String]) -> String {
    let mut html = format!("<{tag}>");
    for item in items {
        html.push_str("<li>");
        html.push_str(&escape_html(item));
        html.push_str("</li>");
    }
    html.push_str(&format!("</{tag}>"));
    html
}

fn render_into(markup: &mut LessonMarkup, block: &ContentBlock) {
    let html = match block {
        ContentBlock::Paragraph { text } => format!("<p>{}</p>", escape_html(text)),
        ContentBlock::UnorderedList { items } => list("ul", items),
        ContentBlock::OrderedList { items } => list("ol", items),
        ContentBlock::Code { code } => format!("<pre><code>{}</code></pre>", escape_html(code)),
        ContentBlock::Heading { text } => format!("<h3>{}</h3>", escape_html(text)),
        ContentBlock::Link(link) => media::link(link),
        ContentBlock::Image(image) => media::image(image),
        ContentBlock::VectorGraphic(VectorGraphic::Inline { svg }) => {
            format!(r#"<figure class="svg-block">{svg}</figure>"#)
        }
        ContentBlock::VectorGraphic(VectorGraphic::External { src, alt }) => {
            markup.push_graphic(ExternalGraphic {
                src: src.clone(),
                alt: alt.clone(),
            });
            return;
        }
        ContentBlock::Audio(audio) => media::audio(audio),
        ContentBlock::NumberLine(line) => math::number_line(line),
        ContentBlock::TenFrame { value } => math::ten_frame(*value),
        ContentBlock::PhonemePair(pair) => phoneme::phoneme_pair(pair),
        ContentBlock::Unknown { kind } => {
            log::debug!("skipping content block of unknown kind {kind:?}");
            String::new()
        }
    };
    markup.push_html(html);
}

/// Render one block. External graphics appear in their pending form.
#[must_use]
pub fn render_block(block: &ContentBlock) -> String {
    let mut markup = LessonMarkup::default();
    render_into(&mut markup, block);
    markup.initial_html()
}

/// Render a lesson's blocks in order.
#[must_use]
pub fn render_blocks(blocks: &[ContentBlock]) -> LessonMarkup {
    let mut markup = LessonMarkup::default();
    for block in blocks {
        render_into(&mut markup, block);
    }
    markup
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(value: serde_json::Value) -> ContentBlock {
        ContentBlock::from_value(value)
    }

    #[test]
    fn text_blocks_are_escaped() {
        assert_eq!(
            render_block(&block(json!({"type": "p", "text": "1 < 2 & \"3\" > 'x'"}))),
            "<p>1 &lt; 2 &amp; &quot;3&quot; &gt; &#039;x&#039;</p>"
        );
        assert_eq!(
            render_block(&block(json!({"type": "h3", "text": "<script>"}))),
            "<h3>&lt;script&gt;</h3>"
        );
        assert_eq!(
            render_block(&block(json!({"type": "code", "code": "if a < b {}"}))),
            "<pre><code>if a &lt; b {}</code></pre>"
        );
    }

    #[test]
    fn lists_preserve_order() {
        assert_eq!(
            render_block(&block(json!({"type": "ol", "items": ["b", "a", "<c>"]}))),
            "<ol><li>b</li><li>a</li><li>&lt;c&gt;</li></ol>"
        );
        assert_eq!(
            render_block(&block(json!({"type": "ul", "items": []}))),
            "<ul></ul>"
        );
    }

    #[test]
    fn unknown_and_malformed_blocks_render_nothing() {
        assert_eq!(render_block(&block(json!({"type": "marquee", "text": "hi"}))), "");
        assert_eq!(render_block(&block(json!({"type": "p"}))), "");
        assert_eq!(render_block(&block(json!("just a string"))), "");
        assert_eq!(
            render_block(&block(json!({"type": "<script>", "text": "<script>alert(1)</script>"}))),
            ""
        );
    }

    #[test]
    fn number_line_labels_are_plain_numbers() {
        let html = render_block(&block(json!({
            "type": "number_line", "min": "<b>", "max": 2, "label": "<script>"
        })));
        assert_eq!(html, "");

        let html = render_block(&block(json!({
            "type": "number_line", "min": 0, "max": 2, "target": 1, "showTargetLabel": true
        })));
        assert!(!html.contains("<script>"));
        assert!(html.contains(">1</text>"));
        assert!(html.contains(r#"aria-label="Number line from 0 to 2""#));
    }

    #[test]
    fn inline_svg_is_verbatim_and_external_is_deferred() {
        let blocks = vec![
            block(json!({"type": "svg", "svg": "<svg><rect/></svg>"})),
            block(json!({"type": "svg", "src": "/img/a.svg", "alt": "A"})),
            block(json!({"type": "p", "text": "after"})),
        ];
        let markup = render_blocks(&blocks);
        let graphics: Vec<_> = markup.external_graphics().map(|g| g.src.as_str()).collect();
        assert_eq!(graphics, vec!["/img/a.svg"]);
        let html = markup.initial_html();
        assert!(html.starts_with(r#"<figure class="svg-block"><svg><rect/></svg></figure>"#));
        assert!(html.ends_with("<p>after</p>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let blocks = vec![
            block(json!({"type": "number_line", "min": 0, "max": 5, "target": 3})),
            block(json!({"type": "ten_frame", "value": 7})),
        ];
        assert_eq!(render_blocks(&blocks), render_blocks(&blocks));
    }
}
