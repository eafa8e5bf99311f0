//! Cleanup of model output into plain narration.

use std::sync::LazyLock;

use regex::Regex;

static HORIZONTAL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:-{3,}|\*{3,}|_{3,})[ \t]*$").expect("valid rule regex")
});

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]*").expect("valid heading regex"));

static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-*+•]|\d{1,2}[.)])[ \t]+").expect("valid bullet regex")
});

static SPEAKER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:anchor|host|narrator|presenter)[ \t]*:[ \t]*")
        .expect("valid speaker regex")
});

static STAGE_DIRECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]\n]*\]").expect("valid stage direction regex"));

static SOUND_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\((?:pause|music|sound|sfx|beat|intro|outro|laughs?|sighs?)[^)\n]*\)")
        .expect("valid cue regex")
});

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}|_{2,3}|`+").expect("valid emphasis regex"));

/// Strip markdown structure, bracketed stage directions, sound cues, and
/// speaker labels, then collapse all whitespace to single spaces.
///
/// Returns an empty string when nothing speakable is left.
#[must_use]
pub fn sanitize_for_speech(raw: &str) -> String {
    let text = HORIZONTAL_RULE.replace_all(raw, "");
    let text = HEADING.replace_all(&text, "");
    let text = BULLET.replace_all(&text, "");
    let text = SPEAKER_LABEL.replace_all(&text, "");
    let text = STAGE_DIRECTION.replace_all(&text, " ");
    let text = SOUND_CUE.replace_all(&text, " ");
    let text = EMPHASIS.replace_all(&text, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
