//! Autogenerated block markers

/// First line of a generated block
pub const CONFIG_HEADER: &str = "# ~~~ Autogenerated config start - Do not touch! ~~~";

/// Last line of a generated block
pub const CONFIG_FOOTER: &str = "# ~~~ Autogenerated config end ~~~";

/// Wrap a rendered body in the markers
pub fn wrap(body: &str) -> String {
    let mut block = String::with_capacity(CONFIG_HEADER.len() + body.len() + CONFIG_FOOTER.len() + 4);
    block.push_str(CONFIG_HEADER);
    block.push_str("\n\n");
    block.push_str(body);
    if !body.is_empty() && !body.ends_with("\n\n") {
        block.push('\n');
    }
    block.push_str(CONFIG_FOOTER);
    block
}

/// Replace the marker delimited region of `existing` with `block`.
///
/// Returns `None` when `existing` has no complete header/footer pair.
pub fn splice(existing: &str, block: &str) -> Option<String> {
    let start = existing.find(CONFIG_HEADER)?;
    let footer = existing[start..].find(CONFIG_FOOTER)? + start;
    let end = footer + CONFIG_FOOTER.len();

    let mut spliced = String::with_capacity(existing.len() + block.len());
    spliced.push_str(&existing[..start]);
    spliced.push_str(block);
    spliced.push_str(&existing[end..]);
    Some(spliced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_empty_body() {
        assert_eq!(wrap(""), format!("{CONFIG_HEADER}\n\n{CONFIG_FOOTER}"));
    }

    #[test]
    fn test_wrap_adds_blank_line_before_footer() {
        let block = wrap("a = 1\n");
        assert_eq!(block, format!("{CONFIG_HEADER}\n\na = 1\n\n{CONFIG_FOOTER}"));
    }

    #[test]
    fn test_splice_preserves_surroundings() {
        let existing = format!(
            "[entryPoints]\n  https = true\n\n{CONFIG_HEADER}\n\nold\n\n{CONFIG_FOOTER}\n\n[api]\n"
        );
        let spliced = splice(&existing, "NEW").unwrap();
        assert_eq!(spliced, "[entryPoints]\n  https = true\n\nNEW\n\n[api]\n");
    }

    #[test]
    fn test_splice_requires_both_markers() {
        assert!(splice("plain file", "NEW").is_none());
        assert!(splice(&format!("{CONFIG_HEADER}\nno end"), "NEW").is_none());
        assert!(splice(&format!("{CONFIG_FOOTER}\n{CONFIG_HEADER}"), "NEW").is_none());
    }
}
