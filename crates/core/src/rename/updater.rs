//! Reference rewriting for moved media files.
//!
//! Rewrites one note's references to a media file: the full vault path, the
//! old resource locator, and embeds written with the bare basename.

use regex::{Captures, Regex};

use crate::media::basename;

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Rewrite references to `old_path` (and `old_key`) in `content`.
///
/// All replacements happen in one pass, so a new path that contains the old
/// one is never rewritten twice. Path matches must not be glued to other
/// path characters (`data.png` is not a reference to `a.png`).
pub fn rewrite_media_references(
    content: &str,
    old_path: &str,
    new_path: &str,
    old_key: Option<&str>,
    new_key: Option<&str>,
) -> String {
    if old_path.is_empty() || old_path == new_path {
        return content.to_string();
    }

    let mut alternatives = Vec::new();
    if let (Some(old_key), Some(_)) = (old_key, new_key) {
        alternatives.push(format!("(?P<key>{})", regex::escape(old_key)));
    }
    alternatives.push(format!("(?P<path>{})", regex::escape(old_path)));
    let old_base = basename(old_path);
    if old_base != old_path {
        alternatives.push(format!(
            r"(?P<pre>!\[\[|!\[[^\]]*\]\(<?)(?P<base>{})(?P<post>[\]|#)>])",
            regex::escape(old_base)
        ));
    }

    let Ok(re) = Regex::new(&alternatives.join("|")) else {
        return content.to_string();
    };

    re.replace_all(content, |caps: &Captures| {
        let whole = &caps[0];
        if caps.name("key").is_some() {
            return new_key.unwrap_or(whole).to_string();
        }
        if let Some(m) = caps.name("path") {
            let before = content[..m.start()].chars().next_back();
            let after = content[m.end()..].chars().next();
            if before.is_some_and(is_path_char) || after.is_some_and(is_path_char) {
                return whole.to_string();
            }
            return new_path.to_string();
        }
        format!("{}{}{}", &caps["pre"], new_path, &caps["post"])
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_full_path_embeds() {
        let content = "---\nsource: art/cat.png\n---\n![[art/cat.png]]\n";
        let out = rewrite_media_references(content, "art/cat.png", "pets/kitty.png", None, None);
        assert_eq!(out, "---\nsource: pets/kitty.png\n---\n![[pets/kitty.png]]\n");
    }

    #[test]
    fn rewrites_basename_embeds() {
        let content = "![[cat.png|300]] and ![a](cat.png)";
        let out = rewrite_media_references(content, "art/cat.png", "art/dog.png", None, None);
        assert_eq!(out, "![[art/dog.png|300]] and ![a](art/dog.png)");
    }

    #[test]
    fn rewrites_locator() {
        let content = "<img src=\"app://local/a.png?1\">";
        let out = rewrite_media_references(
            content,
            "a.png",
            "b.png",
            Some("app://local/a.png?1"),
            Some("app://local/b.png?2"),
        );
        assert_eq!(out, "<img src=\"app://local/b.png?2\">");
    }

    #[test]
    fn new_path_containing_old_is_not_doubled() {
        let content = "![[a.png]]";
        let out = rewrite_media_references(content, "a.png", "x/a.png", None, None);
        assert_eq!(out, "![[x/a.png]]");
    }

    #[test]
    fn does_not_touch_longer_names() {
        let content = "![[data.png]] ![[a.png]]";
        let out = rewrite_media_references(content, "a.png", "b.png", None, None);
        assert_eq!(out, "![[data.png]] ![[b.png]]");
    }
}
