//! Markdown clean-up applied to every generated summary.
//!
//! All transforms are pure and idempotent, so running [`post_process`] on its
//! own output is a no-op. They run in a fixed order:
//!
//! 1. `%videotitle%` substitution (left verbatim when no title is known)
//! 2. unordered list marker spacing (`-item` -> `- item`)
//! 3. ordered list marker spacing (`1.item` -> `1. item`)
//! 4. a blank line before a list that directly follows a paragraph line
//! 5. zero-padded minutes in `M:SS` timestamps

use std::sync::LazyLock;

use regex::{Captures, Regex};

pub const TITLE_PLACEHOLDER: &str = "%videotitle%";

// Marker followed by something other than whitespace or another marker char,
// so `---` rules and `**bold**` lines are not treated as lists.
static UNORDERED_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*[-*+])([^\s*+\-])").unwrap());

// Digit after the dot is a decimal, not a list.
static ORDERED_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*[0-9]+\.)([^\s0-9])").unwrap());

static LIST_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[-*+](?:[^*+\-]|$)|[0-9]+\.(?:[^0-9]|$))").unwrap()
});

// A token that follows a word char or a colon is the tail of a longer
// timestamp (`1:5:30`) and is left alone. No lookbehind, so the leading
// char is captured and written back.
static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w:])([0-9]{1,2}):([0-9]{2})\b").unwrap());

pub fn post_process(markdown: &str, title: Option<&str>) -> String {
    let substituted = substitute_title(markdown, title);
    let unordered = fix_unordered_markers(&substituted);
    let ordered = fix_ordered_markers(&unordered);
    let spaced = blank_line_before_lists(&ordered);
    pad_timestamps(&spaced)
}

/// Replace the title placeholder. Without a usable title the token is kept.
pub fn substitute_title(markdown: &str, title: Option<&str>) -> String {
    let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) else {
        return markdown.to_string();
    };
    let title = title.replace(TITLE_PLACEHOLDER, "");
    markdown.replace(TITLE_PLACEHOLDER, &title)
}

pub fn fix_unordered_markers(markdown: &str) -> String {
    UNORDERED_MARKER_RE
        .replace_all(markdown, "$1 $2")
        .into_owned()
}

pub fn fix_ordered_markers(markdown: &str) -> String {
    ORDERED_MARKER_RE.replace_all(markdown, "$1 $2").into_owned()
}

pub fn is_list_line(line: &str) -> bool {
    LIST_LINE_RE.is_match(line)
}

pub fn blank_line_before_lists(markdown: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let mut previous: Option<&str> = None;

    for line in markdown.split('\n') {
        if let Some(prev) = previous {
            if is_list_line(line) && !prev.trim().is_empty() && !is_list_line(prev) {
                output.push("");
            }
        }
        output.push(line);
        previous = Some(line);
    }

    output.join("\n")
}

pub fn pad_timestamps(markdown: &str) -> String {
    TIMESTAMP_RE
        .replace_all(markdown, |caps: &Captures| {
            format!("{}{:0>2}:{}", &caps[1], &caps[2], &caps[3])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "plain text",
        "Summary of %videotitle%\n-item",
        "Intro\n-one\n-two\n\nOutro\n1.first\n2.second",
        "**Summary:**\nText here\n---\n* star",
        "5:30 - 🚀 **Start**\n12:07 - 💡 **Middle**\n1:05:30 long",
        "  -nested\n\t+tabbed\n1.5 million views",
        "para\n- already fine\n- next\n",
        "%videotitle% at 7:45\n+x\n3.y",
        "1:5:30",
        "0:0:51 +5",
        " 0:5:00",
        "a*5:1:00\n",
        "1:5:05:0",
        "9:30,1:45 and 2:15:07",
    ];

    #[test]
    fn substitutes_every_placeholder() {
        assert_eq!(
            post_process("Welcome to %videotitle%!", Some("My Video")),
            "Welcome to My Video!"
        );
        assert_eq!(
            substitute_title("%videotitle% / %videotitle%", Some("A")),
            "A / A"
        );
    }

    #[test]
    fn placeholder_kept_without_title() {
        assert_eq!(
            post_process("Welcome to %videotitle%!", None),
            "Welcome to %videotitle%!"
        );
        assert_eq!(
            post_process("Welcome to %videotitle%!", Some("   ")),
            "Welcome to %videotitle%!"
        );
    }

    #[test]
    fn title_containing_placeholder_does_not_rearm() {
        let once = post_process("T: %videotitle%", Some("x %videotitle% y"));
        assert_eq!(once, "T: x  y");
        assert_eq!(post_process(&once, Some("x %videotitle% y")), once);
    }

    #[test]
    fn list_markers_get_one_space() {
        assert_eq!(fix_unordered_markers("-item\n*star\n+plus"), "- item\n* star\n+ plus");
        assert_eq!(fix_unordered_markers("- ok\n  -nested"), "- ok\n  - nested");
        assert_eq!(fix_ordered_markers("1.first\n10.tenth"), "1. first\n10. tenth");
    }

    #[test]
    fn rules_and_bold_are_not_lists() {
        assert_eq!(fix_unordered_markers("---\n**Bold:**"), "---\n**Bold:**");
        assert_eq!(fix_ordered_markers("1.5 million"), "1.5 million");
        assert!(!is_list_line("**Summary:**"));
        assert!(!is_list_line("---"));
        assert!(is_list_line("-"));
        assert!(is_list_line("  12. item"));
    }

    #[test]
    fn blank_line_inserted_before_list_only() {
        assert_eq!(
            blank_line_before_lists("Intro\n- a\n- b\nafter"),
            "Intro\n\n- a\n- b\nafter"
        );
        assert_eq!(blank_line_before_lists("Intro\n\n- a"), "Intro\n\n- a");
        assert_eq!(blank_line_before_lists("- a\n- b"), "- a\n- b");
        assert_eq!(blank_line_before_lists("Steps\n1. one"), "Steps\n\n1. one");
    }

    #[test]
    fn timestamps_are_padded() {
        assert!(post_process("at 5:30 we start", None).contains("05:30"));
        assert_eq!(post_process("at 12:07", None), "at 12:07");
        assert_eq!(pad_timestamps("1:05:30"), "01:05:30");
        assert_eq!(pad_timestamps("123:45"), "123:45");
        assert_eq!(pad_timestamps("9:30,1:45\n2:15"), "09:30,01:45\n02:15");
    }

    #[test]
    fn chained_colon_tokens_pad_only_the_head() {
        assert_eq!(pad_timestamps("1:5:30"), "1:5:30");
        assert_eq!(pad_timestamps("0:0:51 +5"), "0:0:51 +5");
        assert_eq!(pad_timestamps("1:05:30:00"), "01:05:30:00");
        assert_eq!(pad_timestamps("x5:30"), "x5:30");

        let once = post_process("a*5:1:00\n", None);
        assert_eq!(post_process(&once, None), once);
    }

    #[test]
    fn end_to_end_shape() {
        assert_eq!(
            post_process("Summary of %videotitle%\n-item", Some("Test Video")),
            "Summary of Test Video\n\n- item"
        );
    }

    #[test]
    fn post_process_is_idempotent() {
        for sample in SAMPLES {
            for title in [None, Some("My 5:30 Video"), Some("-dash title")] {
                let once = post_process(sample, title);
                let twice = post_process(&once, title);
                assert_eq!(once, twice, "not idempotent for {sample:?} / {title:?}");
            }
        }
    }

    #[test]
    fn trailing_newline_is_preserved() {
        assert_eq!(post_process("text\n", None), "text\n");
    }
}
