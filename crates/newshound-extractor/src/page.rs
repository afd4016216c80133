//! Parsed article page plus the cleaned HTML sent to the generation client.

use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

/// Boilerplate containers removed wholesale before HTML is handed to the
/// generation client. Their contents never hold article fields and they
/// dominate the byte count of most news pages.
const STRIPPED_TAGS: &[&str] = &[
    "script", "style", "iframe", "noscript", "svg", "nav", "header", "footer", "aside",
];

static TAG_STRIPPERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    STRIPPED_TAGS
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                .unwrap_or_else(|e| panic!("invalid strip pattern for <{tag}>: {e}"))
        })
        .collect()
});

static COMMENT_STRIPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->").unwrap_or_else(|e| panic!("invalid comment pattern: {e}"))
});

/// One fetched article page: the parsed DOM for selector evaluation and
/// the cleaned markup for prompt construction.
///
/// Selector evaluation always runs against the full, unmodified document;
/// only the text shipped to the generation client is cleaned.
pub struct Page {
    document: Html,
    cleaned: String,
}

impl Page {
    /// Parse raw HTML into a page.
    pub fn parse(raw_html: &str) -> Self {
        Self {
            document: Html::parse_document(raw_html),
            cleaned: clean_for_llm(raw_html),
        }
    }

    /// The parsed document.
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Markup with boilerplate containers and comments stripped, suitable
    /// for inclusion in a generation prompt. Not length-limited; callers
    /// clamp to their own prompt budget.
    pub fn cleaned_html(&self) -> &str {
        &self.cleaned
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("cleaned_len", &self.cleaned.len())
            .finish()
    }
}

/// Strip boilerplate tags and comments, then collapse blank runs.
fn clean_for_llm(raw_html: &str) -> String {
    let mut cleaned = COMMENT_STRIPPER.replace_all(raw_html, "").into_owned();
    for stripper in TAG_STRIPPERS.iter() {
        cleaned = stripper.replace_all(&cleaned, "").into_owned();
    }
    // Collapse the whitespace holes the removals leave behind.
    let mut out = String::with_capacity(cleaned.len());
    let mut blank_run = 0usize;
    for line in cleaned.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_and_styles_are_stripped() {
        let page = Page::parse(
            "<html><head><style>.x{color:red}</style>\
             <script>var tracker = 1;</script></head>\
             <body><h1>Headline</h1></body></html>",
        );
        assert!(!page.cleaned_html().contains("tracker"));
        assert!(!page.cleaned_html().contains("color:red"));
        assert!(page.cleaned_html().contains("<h1>Headline</h1>"));
    }

    #[test]
    fn navigation_chrome_is_stripped() {
        let page = Page::parse(
            "<body><nav><a href='/'>Home</a></nav>\
             <article>Body text</article>\
             <footer>© Example</footer></body>",
        );
        assert!(!page.cleaned_html().contains("Home"));
        assert!(!page.cleaned_html().contains("Example"));
        assert!(page.cleaned_html().contains("Body text"));
    }

    #[test]
    fn comments_are_stripped() {
        let page = Page::parse("<body><!-- ad slot 3 --><p>kept</p></body>");
        assert!(!page.cleaned_html().contains("ad slot"));
        assert!(page.cleaned_html().contains("kept"));
    }

    #[test]
    fn document_remains_fully_queryable() {
        use scraper::Selector;
        let page = Page::parse("<body><nav id='menu'>Home</nav><p>kept</p></body>");
        let sel = Selector::parse("#menu").unwrap();
        // Cleanup only affects the prompt copy, never the DOM.
        assert_eq!(page.document().select(&sel).count(), 1);
    }

    #[test]
    fn blank_runs_collapse() {
        let page = Page::parse("<body>\n\n\n\n<p>a</p>\n\n\n<p>b</p>\n</body>");
        assert!(!page.cleaned_html().contains("\n\n\n"));
    }
}
