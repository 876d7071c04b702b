use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::{NoExpand, Regex};

fn hits_open_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<([a-zA-Z][a-zA-Z0-9]*)\b[^>]*\bclass\s*=\s*"[^"]*\bhits\b[^"]*"[^>]*>"#)
            .expect("hits tag regex")
    })
}

fn feeling() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"feeling: [a-zA-Z]+").expect("feeling regex"))
}

/// Swap the `feeling: <word>` text inside every `class="hits"` element for a
/// randomly drawn mood. Each element draws independently; elements without
/// `feeling:` are left alone.
pub fn randomize<R: Rng + ?Sized>(html: &str, moods: &[String], rng: &mut R) -> String {
    if moods.is_empty() {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;

    for caps in hits_open_tag().captures_iter(html) {
        let (Some(open), Some(tag)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        // Skip tags nested inside an element we already rewrote
        if open.start() < cursor {
            continue;
        }
        let body_start = open.end();
        let body_end = match matching_close(html, body_start, tag.as_str()) {
            Some(end) => end,
            None => continue,
        };

        let body = &html[body_start..body_end];
        if !body.contains("feeling:") {
            continue;
        }
        let mood = match moods.choose(rng) {
            Some(m) => m,
            None => continue,
        };

        out.push_str(&html[cursor..body_start]);
        let replacement = format!("feeling: {}", mood);
        out.push_str(&feeling().replace(body, NoExpand(&replacement)));
        cursor = body_end;
    }

    out.push_str(&html[cursor..]);
    out
}

/// Offset of the `</tag>` that closes an element whose body starts at
/// `from`, counting nested elements of the same name.
fn matching_close(html: &str, from: usize, tag: &str) -> Option<usize> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut depth = 1;
    let mut pos = from;

    loop {
        let next_close = pos + html[pos..].find(&close)?;
        let next_open = html[pos..next_close]
            .match_indices(&open)
            .map(|(i, _)| pos + i)
            .find(|&i| {
                html[i + open.len()..]
                    .chars()
                    .next()
                    .map(|c| c == '>' || c.is_ascii_whitespace())
                    .unwrap_or(false)
            });

        match next_open {
            Some(o) => {
                depth += 1;
                pos = o + open.len();
            }
            None => {
                depth -= 1;
                if depth == 0 {
                    return Some(next_close);
                }
                pos = next_close + close.len();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn moods() -> Vec<String> {
        vec!["sleepy".to_string()]
    }

    #[test]
    fn test_replaces_feeling_in_hits() {
        let mut rng = StdRng::seed_from_u64(7);
        let html = r#"<div class="hits">visitors: 12 · feeling: happy</div>"#;
        let out = randomize(html, &moods(), &mut rng);
        assert_eq!(out, r#"<div class="hits">visitors: 12 · feeling: sleepy</div>"#);
    }

    #[test]
    fn test_ignores_other_elements() {
        let mut rng = StdRng::seed_from_u64(7);
        let html = r#"<p class="bio">feeling: happy</p><span class="hits big">feeling: okay</span>"#;
        let out = randomize(html, &moods(), &mut rng);
        assert!(out.contains(r#"<p class="bio">feeling: happy</p>"#));
        assert!(out.contains(r#"<span class="hits big">feeling: sleepy</span>"#));
    }

    #[test]
    fn test_hits_without_feeling_untouched() {
        let mut rng = StdRng::seed_from_u64(7);
        let html = r#"<div class="hits">visitors: 3</div>"#;
        assert_eq!(randomize(html, &moods(), &mut rng), html);
    }

    #[test]
    fn test_draws_from_configured_list() {
        let list: Vec<String> = ["happy", "sad", "okay"].iter().map(|s| s.to_string()).collect();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let out = randomize(r#"<b class="hits">feeling: x</b>"#, &list, &mut rng);
            assert!(list.iter().any(|m| out.contains(&format!("feeling: {}</b>", m))));
        }
    }

    #[test]
    fn test_nested_same_name_element() {
        let mut rng = StdRng::seed_from_u64(7);
        let html = r#"<div class="hits"><div>visitors</div> feeling: happy</div><div>feeling: calm</div>"#;
        let out = randomize(html, &moods(), &mut rng);
        assert_eq!(
            out,
            r#"<div class="hits"><div>visitors</div> feeling: sleepy</div><div>feeling: calm</div>"#
        );
    }

    #[test]
    fn test_empty_mood_list_is_noop() {
        let mut rng = StdRng::seed_from_u64(1);
        let html = r#"<div class="hits">feeling: happy</div>"#;
        assert_eq!(randomize(html, &[], &mut rng), html);
    }
}
