// SPDX-License-Identifier: PMPL-1.0-or-later
//! Time-based media - WCAG 1.2.2 Captions (Prerecorded) (Level A)

use super::{Rule, RuleContext};
use crate::document::Node;
use crate::violation::{Severity, Violation};

/// Audio and video without captions or a described alternative
pub struct MediaAlternatives;

impl Rule for MediaAlternatives {
    fn id(&self) -> &'static str {
        "media-alternatives"
    }

    fn description(&self) -> &'static str {
        "Audio and video content is missing captions or a text alternative."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("audio, video")
            .iter()
            .filter(|media| !has_captions(media) && media.non_empty_attr("aria-describedby").is_none())
            .map(|media| ctx.affected(media, format!("<{}> has no captions track", media.tag_name())))
            .collect();
        self.violation(nodes)
    }
}

fn has_captions(media: &Node<'_>) -> bool {
    media.descendants().any(|d| {
        d.tag_name() == "track"
            && d.attr("kind")
                .is_some_and(|kind| kind.trim().eq_ignore_ascii_case("captions"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::run_rule;

    #[test]
    fn test_media_alternatives() {
        let html = r#"
            <video src="a.mp4"><track kind="captions" src="a.vtt"></video>
            <video src="b.mp4"><track kind="CAPTIONS" src="b.vtt"></video>
            <video src="c.mp4"><track kind="subtitles" src="c.vtt"></video>
            <audio src="d.mp3" aria-describedby="transcript"></audio>
            <audio src="e.mp3"></audio>"#;
        let violations = run_rule(&MediaAlternatives, html);
        assert_eq!(violations.len(), 1);
        let nodes = &violations[0].nodes;
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].element.contains("c.mp4"));
        assert_eq!(nodes[1].description.as_deref(), Some("<audio> has no captions track"));
    }
}
