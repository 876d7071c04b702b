use std::sync::OnceLock;

use regex::Regex;

fn img_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<img\b[^>]*>").expect("img regex"))
}

fn loading_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\sloading\s*=").expect("loading regex"))
}

/// Mark every `<img>` without an explicit `loading` attribute as
/// `loading="lazy"` so the browser defers offscreen images.
pub fn defer_images(html: &str) -> String {
    img_tag()
        .replace_all(html, |caps: &regex::Captures| {
            let tag = &caps[0];
            if loading_attr().is_match(tag) {
                return tag.to_string();
            }
            let (head, tail) = if tag.ends_with("/>") {
                (tag[..tag.len() - 2].trim_end(), " />")
            } else {
                (tag[..tag.len() - 1].trim_end(), ">")
            };
            format!(r#"{} loading="lazy"{}"#, head, tail)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_loading_lazy() {
        assert_eq!(
            defer_images(r#"<img src="a.png" alt="a">"#),
            r#"<img src="a.png" alt="a" loading="lazy">"#
        );
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(
            defer_images(r#"<img src="a.png"/>"#),
            r#"<img src="a.png" loading="lazy" />"#
        );
    }

    #[test]
    fn test_explicit_loading_kept() {
        let html = r#"<img src="hero.png" loading="eager">"#;
        assert_eq!(defer_images(html), html);
    }

    #[test]
    fn test_other_tags_untouched() {
        let html = r#"<p>image</p><imgur>x</imgur>"#;
        assert_eq!(defer_images(html), html);
    }
}
