//! Request and query classification.
//!
//! `request_type` is the descriptive label stored on ledger rows;
//! `query_type` is the classification the downstream poller consumes from
//! the queue. Both derive mechanically from the subject kind, channel, and
//! provenance, so every entry form funnels through the same mapping.

use brandgate_shared::{Channel, Provenance, SubjectKind};

/// Derive the ledger `request_type` label.
///
/// Company submissions carry a fixed label regardless of provenance.
/// Manually-entered ("New") variants exist only for Amazon, Walmart, and
/// Target; HomeDepot and Lowes are URL-only channels without one.
pub fn request_type(kind: SubjectKind, channel: Channel, provenance: Provenance) -> String {
    match kind {
        SubjectKind::Company => "Amazon Company Name".to_string(),
        SubjectKind::Brand | SubjectKind::RetailerUrl => {
            let base = match channel {
                Channel::Amazon => "Amazon Brand Name".to_string(),
                other => format!("{} Brand", other.label()),
            };
            if provenance == Provenance::Manual && !channel.is_url_only() {
                format!("{base} New")
            } else {
                base
            }
        }
    }
}

/// Derive the queue `query_type` classification.
pub fn query_type(kind: SubjectKind, channel: Channel) -> &'static str {
    if kind == SubjectKind::Company {
        return "manufacturer_only";
    }
    match channel {
        Channel::Amazon => "brand",
        Channel::Walmart => "walmart_brand",
        Channel::Target => "target_brand",
        Channel::HomeDepot => "homedepot_brand",
        Channel::Lowes => "lowes_brand",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amazon_brand_labels() {
        assert_eq!(
            request_type(SubjectKind::Brand, Channel::Amazon, Provenance::Directory),
            "Amazon Brand Name"
        );
        assert_eq!(
            request_type(SubjectKind::Brand, Channel::Amazon, Provenance::Manual),
            "Amazon Brand Name New"
        );
    }

    #[test]
    fn company_label_ignores_provenance() {
        for provenance in [Provenance::Directory, Provenance::Manual] {
            assert_eq!(
                request_type(SubjectKind::Company, Channel::Amazon, provenance),
                "Amazon Company Name"
            );
        }
    }

    #[test]
    fn retail_channel_labels() {
        assert_eq!(
            request_type(SubjectKind::Brand, Channel::Walmart, Provenance::Directory),
            "Walmart Brand"
        );
        assert_eq!(
            request_type(SubjectKind::Brand, Channel::Walmart, Provenance::Manual),
            "Walmart Brand New"
        );
        assert_eq!(
            request_type(SubjectKind::Brand, Channel::Target, Provenance::Manual),
            "Target Brand New"
        );
    }

    #[test]
    fn url_only_channels_have_no_new_variant() {
        for provenance in [Provenance::Directory, Provenance::Manual] {
            assert_eq!(
                request_type(SubjectKind::RetailerUrl, Channel::HomeDepot, provenance),
                "HomeDepot Brand"
            );
            assert_eq!(
                request_type(SubjectKind::RetailerUrl, Channel::Lowes, provenance),
                "Lowes Brand"
            );
        }
    }

    #[test]
    fn query_type_mapping() {
        assert_eq!(query_type(SubjectKind::Brand, Channel::Amazon), "brand");
        assert_eq!(
            query_type(SubjectKind::Company, Channel::Amazon),
            "manufacturer_only"
        );
        assert_eq!(
            query_type(SubjectKind::Brand, Channel::Walmart),
            "walmart_brand"
        );
        assert_eq!(
            query_type(SubjectKind::Brand, Channel::Target),
            "target_brand"
        );
        assert_eq!(
            query_type(SubjectKind::RetailerUrl, Channel::HomeDepot),
            "homedepot_brand"
        );
        assert_eq!(
            query_type(SubjectKind::RetailerUrl, Channel::Lowes),
            "lowes_brand"
        );
    }
}
