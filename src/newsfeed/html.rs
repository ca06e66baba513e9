use std::sync::OnceLock;

use regex::Regex;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("static regex"))
}

fn space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<h[23]\b[^>]*>(.*?)</h[23]\s*>").expect("static regex"))
}

fn anchor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a\s*>"#)
            .expect("static regex")
    })
}

/// Drops tags, decodes the handful of entities WordPress emits in titles and
/// collapses whitespace.
pub fn strip_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = tag_re().replace_all(text, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#8217;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    space_re().replace_all(&text, " ").trim().to_string()
}

/// `(title, href)` pairs for anchors inside `h2`/`h3` headings.
pub fn heading_links(html: &str) -> Vec<(String, String)> {
    heading_re()
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .flat_map(|inner| any_links(inner.as_str()))
        .collect()
}

/// `(title, href)` pairs for every anchor with non-empty text.
pub fn any_links(html: &str) -> Vec<(String, String)> {
    anchor_re()
        .captures_iter(html)
        .filter_map(|c| {
            let href = c.get(1)?.as_str().trim();
            let title = strip_html(c.get(2)?.as_str());
            if href.is_empty() || title.is_empty() {
                return None;
            }
            Some((title, href.to_string()))
        })
        .collect()
}

/// Makes protocol-relative and root-relative links absolute against `site`.
pub fn normalize_link(site: &str, href: &str) -> String {
    let href = href.trim();
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{rest}");
    }
    if href.starts_with('/') {
        return format!("{}{}", site.trim_end_matches('/'), href);
    }
    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_decodes_and_collapses() {
        assert_eq!(
            strip_html("<p>Olmué&nbsp;2026:\n <b>la  parrilla</b> &amp; &quot;más&quot;</p>"),
            "Olmué 2026: la parrilla & \"más\""
        );
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn strip_html_decodes_ampersand_once() {
        assert_eq!(strip_html("a &amp;lt;b&amp;gt;"), "a &lt;b&gt;");
        assert_eq!(strip_html("Olmué&#8217;s"), "Olmué's");
    }

    #[test]
    fn heading_links_ignore_menu_anchors() {
        let html = r#"
            <nav><a href="/contacto">Contacto</a></nav>
            <h2 class="entry-title"><a href="https://www.epicentrochile.com/2026/01/a/">Nota <em>A</em></a></h2>
            <h3><a href='/2026/01/b/'>Nota B</a></h3>
        "#;
        let links = heading_links(html);
        assert_eq!(
            links,
            vec![
                (
                    "Nota A".to_string(),
                    "https://www.epicentrochile.com/2026/01/a/".to_string()
                ),
                ("Nota B".to_string(), "/2026/01/b/".to_string()),
            ]
        );
    }

    #[test]
    fn any_links_skips_empty_text() {
        let links = any_links(r#"<a href="/x"><img src="i.png"></a><a href="/y">Y</a>"#);
        assert_eq!(links, vec![("Y".to_string(), "/y".to_string())]);
    }

    #[test]
    fn normalize_relative_links() {
        let site = "https://www.epicentrochile.com";
        assert_eq!(
            normalize_link(site, "//www.epicentrochile.com/a"),
            "https://www.epicentrochile.com/a"
        );
        assert_eq!(
            normalize_link(site, "/b"),
            "https://www.epicentrochile.com/b"
        );
        assert_eq!(normalize_link(site, "https://x.cl/c"), "https://x.cl/c");
    }
}
