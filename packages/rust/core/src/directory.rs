//! Directory lookup seam.
//!
//! The brand/company directory is an external, read-only collaborator. The
//! workflow itself never queries it — callers search ahead of time and hand
//! the cached company candidates to [`SubmitContext`](crate::SubmitContext)
//! so the not-found check runs against exactly what the requestor saw.

use brandgate_shared::{CompanyCandidate, Result};

/// Directory search results are capped, matching the upstream directory's
/// page size.
pub const MAX_RESULTS: usize = 100;

/// A single directory search hit.
#[derive(Debug, Clone)]
pub enum Candidate {
    /// A brand display name.
    Brand(String),
    /// A company record; see [`CompanyCandidate`] for field semantics.
    Company(CompanyCandidate),
}

/// What to search the directory for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Brand,
    Company,
}

/// Read-only search against the brand/company directory.
pub trait DirectoryLookup {
    /// Case-insensitive substring search, capped at [`MAX_RESULTS`].
    fn search(
        &self,
        term: &str,
        kind: LookupKind,
    ) -> impl Future<Output = Result<Vec<Candidate>>> + Send;
}

/// In-memory directory over a pre-loaded candidate set.
///
/// Used by the CLI (candidates loaded from a JSON export) and by tests.
/// The live directory query belongs to an external system.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    brands: Vec<String>,
    companies: Vec<CompanyCandidate>,
}

impl StaticDirectory {
    pub fn new(brands: Vec<String>, companies: Vec<CompanyCandidate>) -> Self {
        Self { brands, companies }
    }

    /// All loaded company candidates, for seeding a submission context.
    pub fn companies(&self) -> &[CompanyCandidate] {
        &self.companies
    }
}

impl DirectoryLookup for StaticDirectory {
    async fn search(&self, term: &str, kind: LookupKind) -> Result<Vec<Candidate>> {
        let needle = term.to_uppercase();
        let results = match kind {
            LookupKind::Brand => self
                .brands
                .iter()
                .filter(|b| b.to_uppercase().contains(&needle))
                .take(MAX_RESULTS)
                .cloned()
                .map(Candidate::Brand)
                .collect(),
            LookupKind::Company => self
                .companies
                .iter()
                .filter(|c| c.name.to_uppercase().contains(&needle))
                .take(MAX_RESULTS)
                .cloned()
                .map(Candidate::Company)
                .collect(),
        };
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> StaticDirectory {
        StaticDirectory::new(
            vec!["Nike".into(), "Adidas".into(), "Nikon".into()],
            vec![CompanyCandidate {
                id: "c-1".into(),
                name: "Acme Corp".into(),
                list_name: "ACME".into(),
                lead_list_name: "ACME-LEADLIST-7".into(),
            }],
        )
    }

    #[tokio::test]
    async fn brand_search_is_case_insensitive_substring() {
        let dir = directory();
        let results = dir.search("nik", LookupKind::Brand).await.unwrap();
        let names: Vec<_> = results
            .iter()
            .map(|c| match c {
                Candidate::Brand(name) => name.as_str(),
                Candidate::Company(_) => panic!("expected brand candidates"),
            })
            .collect();
        assert_eq!(names, vec!["Nike", "Nikon"]);
    }

    #[tokio::test]
    async fn company_search_returns_full_record() {
        let dir = directory();
        let results = dir.search("acme", LookupKind::Company).await.unwrap();
        assert_eq!(results.len(), 1);
        match &results[0] {
            Candidate::Company(c) => assert_eq!(c.lead_list_name, "ACME-LEADLIST-7"),
            Candidate::Brand(_) => panic!("expected a company candidate"),
        }
    }

    #[tokio::test]
    async fn results_are_capped() {
        let brands = (0..150).map(|i| format!("Brand {i}")).collect();
        let dir = StaticDirectory::new(brands, vec![]);
        let results = dir.search("brand", LookupKind::Brand).await.unwrap();
        assert_eq!(results.len(), MAX_RESULTS);
    }
}
