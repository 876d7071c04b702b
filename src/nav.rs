use crate::config::NavLink;
use crate::render::html_escape;

/// Page name for a URL path: last segment without `.html`, `index` for `/`.
pub fn current_page(path: &str) -> String {
    let last = path.rsplit('/').next().unwrap_or("");
    let page = if last.is_empty() { "index.html" } else { last };
    page.replace(".html", "")
}

/// Whether a nav link points at the current page. `index` and the bare
/// site root are the same page.
pub fn is_active(href: &str, current: &str) -> bool {
    let link = href.replace(".html", "");
    link == current || (link == "index" && current.is_empty()) || (link.is_empty() && current == "index")
}

pub fn render_nav(links: &[NavLink], path: &str) -> String {
    let current = current_page(path);
    let mut html = String::from(r#"<nav class="button-animated-menu">"#);
    for link in links {
        let class = if is_active(&link.href, &current) { r#" class="active""# } else { "" };
        html.push_str(&format!(
            r#"<a href="{}"{}>{}</a>"#,
            html_escape(&link.href),
            class,
            html_escape(&link.label)
        ));
    }
    html.push_str("</nav>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(label: &str, href: &str) -> NavLink {
        NavLink { label: label.to_string(), href: href.to_string() }
    }

    #[test]
    fn test_current_page() {
        assert_eq!(current_page("/"), "index");
        assert_eq!(current_page(""), "index");
        assert_eq!(current_page("/about.html"), "about");
        assert_eq!(current_page("/blog/post.html"), "post");
        assert_eq!(current_page("/guestbook"), "guestbook");
    }

    #[test]
    fn test_index_matches_root() {
        assert!(is_active("index.html", "index"));
        assert!(is_active("index.html", ""));
        assert!(is_active("", "index"));
        assert!(!is_active("about.html", "index"));
    }

    #[test]
    fn test_render_marks_only_current() {
        let links = vec![link("home", "index.html"), link("about", "about.html")];
        let html = render_nav(&links, "/about.html");
        assert!(html.contains(r#"<a href="index.html">home</a>"#));
        assert!(html.contains(r#"<a href="about.html" class="active">about</a>"#));
    }

    #[test]
    fn test_render_escapes_labels() {
        let links = vec![link("<me>", "me.html")];
        let html = render_nav(&links, "/");
        assert!(html.contains("&lt;me&gt;"));
    }
}
