//! Branding and SEO injection into HTML documents.
//!
//! A fixed block (verification meta tag, CSS hiding backend UI controls,
//! and a script pinning title/description) is spliced in front of the first
//! `</head>`. The insertion is textual; the document is never parsed.

use std::borrow::Cow;

use crate::config::SiteConfig;

const HEAD_CLOSE: &[u8] = b"</head>";

const HIDE_CONTROLS_CSS: &str = r#"
	<style>
		/* Hide the "More actions" button and the button after it */
		.notion-topbar [role="button"][tabindex="0"][aria-label],
		.notion-topbar [role="button"][tabindex="0"][style*="border: 1px solid"] {
			display: none !important;
		}
		/* Hide the mobile version of the buttons if they exist */
		.notion-topbar-mobile [role="button"][tabindex="0"][aria-label],
		.notion-topbar-mobile [role="button"][tabindex="0"][style*="border: 1px solid"] {
			display: none !important;
		}
		/* Hide the upsell button, identified by its accent background */
		.notion-topbar [role="button"][style*="background: var(--c-bacAccPri)"],
		.notion-topbar-mobile [role="button"][style*="background: var(--c-bacAccPri)"] {
			display: none !important;
		}
	</style>"#;

const PIN_METADATA_JS: &str = r#"
		const observer = new MutationObserver(() => {
			const titleElement = document.querySelector("title");
			const metaDescriptions = [
				document.querySelector('meta[name="description"]'),
				document.querySelector('meta[property="og:description"]')
			];

			if (titleElement && titleElement.textContent !== PAGE_TITLE) {
				titleElement.textContent = PAGE_TITLE;
			}

			metaDescriptions.forEach(meta => {
				if (meta && meta.getAttribute("content") !== PAGE_DESCRIPTION) {
					meta.setAttribute("content", PAGE_DESCRIPTION);
				}
			});

			if (!document.querySelector('meta[name="description"]') && document.head) {
				const meta = document.createElement("meta");
				meta.setAttribute("name", "description");
				meta.setAttribute("content", PAGE_DESCRIPTION);
				document.head.appendChild(meta);
			}
			if (!document.querySelector('meta[property="og:description"]') && document.head) {
				const meta = document.createElement("meta");
				meta.setAttribute("property", "og:description");
				meta.setAttribute("content", PAGE_DESCRIPTION);
				document.head.appendChild(meta);
			}
		});

		observer.observe(document.head, {
			childList: true,
			subtree: true,
			characterData: true
		});

		// Titles can also be added dynamically under <body>
		observer.observe(document.body, {
			childList: true,
			subtree: true,
			characterData: true
		});
	</script>"#;

/// Splices the branding block into HTML documents.
///
/// The block is rendered once from configuration, so output is a pure
/// function of the input document.
#[derive(Debug, Clone)]
pub struct HtmlInjector {
    block: String,
}

impl HtmlInjector {
    /// Render the block for a verification token, title and description.
    pub fn new(verification_token: &str, page_title: &str, page_description: &str) -> Self {
        let capacity = HIDE_CONTROLS_CSS.len() + PIN_METADATA_JS.len() + 256;
        let mut block = String::with_capacity(capacity);
        block.push_str("\n\t<meta name=\"google-site-verification\" content=\"");
        block.push_str(&escape_markup(verification_token));
        block.push_str("\" />");
        block.push_str(HIDE_CONTROLS_CSS);
        block.push_str("\n\t<script>\n\t\tconst PAGE_TITLE = ");
        block.push_str(&js_string_literal(page_title));
        block.push_str(";\n\t\tconst PAGE_DESCRIPTION = ");
        block.push_str(&js_string_literal(page_description));
        block.push(';');
        block.push_str(PIN_METADATA_JS);

        Self { block }
    }

    pub fn from_site(site: &SiteConfig) -> Self {
        Self::new(
            &site.google_site_verification,
            &site.page_title,
            &site.page_description,
        )
    }

    /// Insert the block before the first `</head>`.
    ///
    /// Documents without a closing head tag are returned unchanged.
    pub fn inject<'a>(&self, html: &'a [u8]) -> Cow<'a, [u8]> {
        let Some(at) = find(html, HEAD_CLOSE) else {
            return Cow::Borrowed(html);
        };

        let mut out = Vec::with_capacity(html.len() + self.block.len());
        out.extend_from_slice(&html[..at]);
        out.extend_from_slice(self.block.as_bytes());
        out.extend_from_slice(&html[at..]);
        Cow::Owned(out)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Escape a value for HTML or XML text and quoted attribute values.
pub fn escape_markup(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Quote a value as a JavaScript string literal safe inside `<script>`.
fn js_string_literal(value: &str) -> String {
    // A JSON string is a valid JS literal; `</` must not close the script element
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}
