use lesson_core::model::{AudioBlock, ImageBlock, LinkBlock};

use super::escape::{escape_attr, escape_html, escape_url};

pub(crate) fn link(block: &LinkBlock) -> String {
    let href = escape_url(block.href.as_deref());
    let download = if block.download { " download" } else { "" };
    let target = if block.new_tab {
        r#" target="_blank" rel="noopener noreferrer""#
    } else {
        ""
    };
    let label = match block.text.as_deref().filter(|text| !text.is_empty()) {
        Some(text) => escape_html(text),
        None => href.clone(),
    };
    format!(r#"<p><a href="{href}"{download}{target}>{label}</a></p>"#)
}

pub(crate) fn image(block: &ImageBlock) -> String {
    format!(
        r#"<img src="{}" alt="{}" style="max-width:100%; height:auto">"#,
        escape_url(Some(&block.src)),
        escape_attr(block.alt.as_deref().unwrap_or(""))
    )
}

pub(crate) fn audio(block: &AudioBlock) -> String {
    let caption = block
        .caption
        .as_deref()
        .filter(|caption| !caption.is_empty())
        .map(|caption| format!("<figcaption>{}</figcaption>", escape_html(caption)))
        .unwrap_or_default();
    format!(
        r#"<figure class="audio-block"><audio controls preload="none" src="{}"></audio>{caption}</figure>"#,
        escape_url(Some(&block.src))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_defaults_and_flags() {
        assert_eq!(link(&LinkBlock::default()), r##"<p><a href="#">#</a></p>"##);

        let block = LinkBlock {
            href: Some("/files/sheet.pdf".into()),
            text: Some("Worksheet <PDF>".into()),
            download: true,
            new_tab: true,
        };
        assert_eq!(
            link(&block),
            r#"<p><a href="/files/sheet.pdf" download target="_blank" rel="noopener noreferrer">Worksheet &lt;PDF&gt;</a></p>"#
        );
    }

    #[test]
    fn link_uses_href_as_label() {
        let block = LinkBlock {
            href: Some("https://example.org/?a=1&b=2".into()),
            ..LinkBlock::default()
        };
        assert!(link(&block).ends_with(">https://example.org/?a=1&amp;b=2</a></p>"));
    }

    #[test]
    fn image_and_audio_escape_attributes() {
        let img = image(&ImageBlock {
            src: "/img/a\".png".into(),
            alt: Some("A 'cat'".into()),
        });
        assert_eq!(
            img,
            r#"<img src="/img/a&quot;.png" alt="A &#039;cat&#039;" style="max-width:100%; height:auto">"#
        );

        let clip = audio(&AudioBlock {
            src: "/audio/a.ogg".into(),
            caption: Some("Say <a>".into()),
        });
        assert!(clip.contains("<audio controls"));
        assert!(clip.contains("<figcaption>Say &lt;a&gt;</figcaption>"));
    }

    #[test]
    fn image_and_audio_sources_reject_script_urls() {
        let img = image(&ImageBlock {
            src: "javascript:alert(1)".into(),
            alt: None,
        });
        assert!(img.starts_with(r##"<img src="#""##), "{img}");

        let clip = audio(&AudioBlock {
            src: " data:audio/ogg;base64,AAAA".into(),
            caption: None,
        });
        assert!(clip.contains(r##"src="#""##), "{clip}");
        assert!(!clip.contains("data:"));

        let remote = audio(&AudioBlock {
            src: "https://cdn.example.org/a.ogg".into(),
            caption: None,
        });
        assert!(remote.contains(r#"src="https://cdn.example.org/a.ogg""#));
    }
}
