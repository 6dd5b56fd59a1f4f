//! Team member title tags
//!
//! Titles may carry an assignment such as "Team Member 2: Build API". These
//! helpers are the only place that inspects or builds that tag.

use std::sync::OnceLock;

use regex::Regex;

/// Marker that flags a title as already assigned
const MEMBER_MARKER: &str = "Team Member";

/// Highest member numeral read back out of a title
pub const MAX_TAGGED_MEMBER: u32 = 5;

fn member_tag_regex() -> &'static Regex {
    static MEMBER_TAG_RE: OnceLock<Regex> = OnceLock::new();
    MEMBER_TAG_RE.get_or_init(|| {
        let pattern = format!(r"{} ([1-{}]):", MEMBER_MARKER, MAX_TAGGED_MEMBER);
        Regex::new(&pattern).expect("member tag regex must compile")
    })
}

/// Member assigned by the title, if the title mentions a team member at all
///
/// Reads numerals 1 to [`MAX_TAGGED_MEMBER`] from a "Team Member N:" tag. A
/// title that mentions "Team Member" without a readable tag is treated as
/// member 1.
pub fn assigned_member(title: &str) -> Option<u32> {
    if !title.contains(MEMBER_MARKER) {
        return None;
    }

    let member = member_tag_regex()
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(1);

    Some(member)
}

/// Title with every "Team Member N:" tag removed
pub fn base_title(title: &str) -> String {
    member_tag_regex().replace_all(title, "").trim().to_string()
}

/// Build an assigned title, e.g. "Team Member 3: Write Docs"
pub fn member_title(member: u32, base: &str) -> String {
    format!("{} {}: {}", MEMBER_MARKER, member, base)
}
