use lesson_core::model::{PhonemePair, WordAudio};

use super::escape::{escape_attr, escape_html, escape_url};

/// Attribute read by the audio script to find a button's clip.
pub const AUDIO_SRC_ATTR: &str = "data-audio-src";

fn word_list(class: &str, words: &[WordAudio]) -> String {
    let mut html = format!(r#"<ul class="{class}">"#);
    for word in words {
        html.push_str(&format!(
            r#"<li><span class="word">{}</span> <button type="button" class="audio-btn" {AUDIO_SRC_ATTR}="{}" aria-label="Play {}">Play</button></li>"#,
            escape_html(&word.word),
            escape_url(Some(&word.audio)),
            escape_attr(&word.word),
        ));
    }
    html.push_str("</ul>");
    html
}

pub(crate) fn phoneme_pair(pair: &PhonemePair) -> String {
    let mut html = String::from(r#"<div class="phoneme-pair">"#);
    html.push_str(&format!(
        r#"<p class="grapheme">{}</p>"#,
        escape_html(&pair.grapheme)
    ));
    if let Some(ipa) = pair.ipa.as_deref().filter(|ipa| !ipa.is_empty()) {
        html.push_str(&format!(r#"<p class="ipa">/{}/</p>"#, escape_html(ipa)));
    }
    if !pair.examples.is_empty() {
        html.push_str("<h4>Examples</h4>");
        html.push_str(&word_list("examples", &pair.examples));
    }
    if !pair.minimal_pairs.is_empty() {
        html.push_str("<h4>Minimal pairs</h4>");
        html.push_str(&word_list("minimal-pairs", &pair.minimal_pairs));
    }
    html.push_str("</div>");
    html
}
