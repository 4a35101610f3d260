use std::collections::HashMap;

use super::escape::{escape_attr, escape_html, escape_url};

/// External SVG referenced by a lesson, fetched after the content is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalGraphic {
    pub src: String,
    pub alt: Option<String>,
}

/// Outcome of fetching an external graphic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicResolution {
    Pending,
    Inline(String),
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Html(String),
    Graphic(ExternalGraphic),
}

/// Rendered lesson content whose external graphics are resolved late.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonMarkup {
    segments: Vec<Segment>,
}

impl LessonMarkup {
    pub(crate) fn push_html(&mut self, html: String) {
        if html.is_empty() {
            return;
        }
        if let Some(Segment::Html(last)) = self.segments.last_mut() {
            last.push_str(&html);
        } else {
            self.segments.push(Segment::Html(html));
        }
    }

    pub(crate) fn push_graphic(&mut self, graphic: ExternalGraphic) {
        self.segments.push(Segment::Graphic(graphic));
    }

    pub fn external_graphics(&self) -> impl Iterator<Item = &ExternalGraphic> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Graphic(graphic) => Some(graphic),
            Segment::Html(_) => None,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Markup with every external graphic still pending.
    #[must_use]
    pub fn initial_html(&self) -> String {
        self.to_html(&HashMap::new())
    }

    /// Markup with graphics substituted by their resolution, keyed by `src`.
    #[must_use]
    pub fn to_html(&self, resolved: &HashMap<String, GraphicResolution>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Html(html) => out.push_str(html),
                Segment::Graphic(graphic) => {
                    let resolution = resolved
                        .get(&graphic.src)
                        .unwrap_or(&GraphicResolution::Pending);
                    out.push_str(&graphic_html(graphic, resolution));
                }
            }
        }
        out
    }
}

fn graphic_html(graphic: &ExternalGraphic, resolution: &GraphicResolution) -> String {
    let src = escape_url(Some(&graphic.src));
    let alt = escape_attr(graphic.alt.as_deref().unwrap_or(""));
    match resolution {
        GraphicResolution::Pending => format!(
            r#"<figure class="svg-block" data-svg-src="{src}" aria-busy="true"><span class="note">{}</span></figure>"#,
            escape_html(graphic.alt.as_deref().unwrap_or("Loading figure..."))
        ),
        GraphicResolution::Inline(svg) => format!(r#"<figure class="svg-block">{svg}</figure>"#),
        GraphicResolution::Fallback => format!(
            r#"<figure class="svg-block"><img src="{src}" alt="{alt}" style="max-width:100%; height:auto"></figure>"#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup() -> LessonMarkup {
        let mut markup = LessonMarkup::default();
        markup.push_html("<p>a</p>".into());
        markup.push_html("<p>b</p>".into());
        markup.push_graphic(ExternalGraphic {
            src: "/img/chart.svg".into(),
            alt: Some("Chart".into()),
        });
        markup
    }

    #[test]
    fn adjacent_html_is_merged_and_graphics_start_pending() {
        let markup = markup();
        assert_eq!(markup.external_graphics().count(), 1);
        let html = markup.initial_html();
        assert!(html.starts_with("<p>a</p><p>b</p>"));
        assert!(html.contains(r#"data-svg-src="/img/chart.svg""#));
        assert!(html.contains(r#"aria-busy="true""#));
    }

    #[test]
    fn resolved_graphics_inline_or_fall_back() {
        let markup = markup();
        let mut resolved = HashMap::new();
        resolved.insert(
            "/img/chart.svg".to_owned(),
            GraphicResolution::Inline("<svg><circle r=\"1\"/></svg>".into()),
        );
        assert!(markup.to_html(&resolved).contains("<svg><circle r=\"1\"/></svg>"));

        resolved.insert("/img/chart.svg".to_owned(), GraphicResolution::Fallback);
        assert!(
            markup
                .to_html(&resolved)
                .contains(r#"<img src="/img/chart.svg" alt="Chart" style="max-width:100%; height:auto">"#)
        );
    }
}
