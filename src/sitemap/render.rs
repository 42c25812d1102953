//! XML rendering of a URL set.

use std::fmt::Write;

use crate::sitemap::types::SitemapEntry;
use crate::transform::html::escape_markup;

pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Render entries as a sitemap document with two-space indentation.
pub fn render_urlset(entries: &[SitemapEntry]) -> Result<String, std::fmt::Error> {
    let mut out = String::with_capacity(128 + entries.len() * 160);
    out.push_str(XML_HEADER);
    writeln!(out, "<urlset xmlns=\"{}\">", SITEMAP_NAMESPACE)?;

    for entry in entries {
        out.push_str("  <url>\n");
        writeln!(out, "    <loc>{}</loc>", escape_markup(&entry.location))?;
        writeln!(out, "    <lastmod>{}</lastmod>", entry.last_modified.format("%Y-%m-%d"))?;
        writeln!(out, "    <changefreq>{}</changefreq>", entry.change_frequency.as_str())?;
        writeln!(out, "    <priority>{:.1}</priority>", entry.priority)?;
        out.push_str("  </url>\n");
    }

    out.push_str("</urlset>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_renders_document() {
        let entries = vec![
            SitemapEntry::root("http://example.com/blog".into(), date()),
            SitemapEntry::page("http://example.com/abc".into(), date()),
        ];
        let xml = render_urlset(&entries).unwrap();

        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">
  <url>
    <loc>http://example.com/blog</loc>
    <lastmod>2024-03-09</lastmod>
    <changefreq>daily</changefreq>
    <priority>1.0</priority>
  </url>
  <url>
    <loc>http://example.com/abc</loc>
    <lastmod>2024-03-09</lastmod>
    <changefreq>daily</changefreq>
    <priority>0.8</priority>
  </url>
</urlset>
";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_escapes_location() {
        let entries = vec![SitemapEntry::root("http://example.com/a?b=1&c=<2>".into(), date())];
        let xml = render_urlset(&entries).unwrap();
        assert!(xml.contains("<loc>http://example.com/a?b=1&amp;c=&lt;2&gt;</loc>"));
    }
}
