//! Notification summary cleaning and truncation.
//!
//! Summaries are either a comma-joined subject list ("Nike, Adidas") or a
//! pipe-joined set of per-channel sections ("Walmart: Nike, Adidas |
//! Home Depot: example.com"). Before delivery, URLs are reduced to their
//! bare domain and the whole summary is capped at [`MAX_SUMMARY_LEN`]
//! characters with a trailing ellipsis marker.

/// Maximum summary length before truncation, excluding the "..." marker.
pub const MAX_SUMMARY_LEN: usize = 250;

/// Clean and truncate a raw summary for delivery.
pub fn prepare(raw: &str) -> String {
    truncate(&clean(raw))
}

/// Reduce URLs to bare domains while preserving the section structure.
pub fn clean(raw: &str) -> String {
    if raw.contains(" | ") {
        let sections: Vec<String> = raw
            .split(" | ")
            .map(|section| match section.split_once(':') {
                Some((channel, values)) => {
                    let values = values.trim();
                    let values = if values.contains("http") {
                        clean_values(values)
                    } else {
                        values.to_string()
                    };
                    format!("{channel}: {values}")
                }
                None => section.trim().to_string(),
            })
            .collect();
        sections.join(" | ")
    } else if raw.contains("http") {
        clean_values(raw)
    } else {
        raw.trim().to_string()
    }
}

/// Truncate to [`MAX_SUMMARY_LEN`] characters, appending "..." if cut.
pub fn truncate(summary: &str) -> String {
    if summary.chars().count() > MAX_SUMMARY_LEN {
        let mut out: String = summary.chars().take(MAX_SUMMARY_LEN).collect();
        out.push_str("...");
        out
    } else {
        summary.to_string()
    }
}

/// Clean a comma-joined value list, reducing any URLs to their domain.
fn clean_values(values: &str) -> String {
    values
        .split(", ")
        .map(|value| {
            if value.contains("http") {
                strip_url(value)
            } else {
                value.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strip the scheme and path from a URL, keeping only the domain.
fn strip_url(url: &str) -> String {
    let after_scheme = url.rsplit("//").next().unwrap_or(url);
    after_scheme
        .split('/')
        .next()
        .unwrap_or(after_scheme)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_brand_list_passes_through() {
        assert_eq!(clean("Nike, Adidas"), "Nike, Adidas");
        assert_eq!(clean("  Nike  "), "Nike");
    }

    #[test]
    fn url_reduced_to_domain() {
        assert_eq!(
            clean("https://brand.example.com/page"),
            "brand.example.com"
        );
        assert_eq!(
            clean("https://a.example.com/x, https://b.example.com/y/z"),
            "a.example.com, b.example.com"
        );
    }

    #[test]
    fn channel_sections_preserved() {
        let raw = "Walmart: Nike, Adidas | Home Depot: https://www.homedepot.com/b/brand";
        assert_eq!(
            clean(raw),
            "Walmart: Nike, Adidas | Home Depot: www.homedepot.com"
        );
    }

    #[test]
    fn truncation_appends_marker() {
        let long = "x".repeat(300);
        let prepared = prepare(&long);
        assert_eq!(prepared.chars().count(), MAX_SUMMARY_LEN + 3);
        assert!(prepared.ends_with("..."));
    }

    #[test]
    fn short_summary_not_truncated() {
        let short = "Nike, Adidas";
        assert_eq!(prepare(short), short);

        let exact = "y".repeat(MAX_SUMMARY_LEN);
        assert_eq!(prepare(&exact), exact);
    }
}
