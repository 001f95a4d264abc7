use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    error::{StageError, error_chain},
    search::WebSearch,
    types::{EvidenceSet, SearchQuery},
};

/// Turns a search query into evidence. Never fails: a failed search degrades
/// to a sentinel entry so synthesis still runs.
pub struct EvidenceRetriever {
    search: Arc<dyn WebSearch>,
    result_count: u8,
}

impl EvidenceRetriever {
    pub fn new(search: Arc<dyn WebSearch>, result_count: u8) -> Self {
        Self {
            search,
            result_count,
        }
    }

    pub async fn retrieve(&self, query: &SearchQuery) -> EvidenceSet {
        match self.search_sources(query).await {
            Ok(evidence) => {
                info!(sources = evidence.source_count(), "Evidence retrieved");
                evidence
            }
            Err(e) => {
                warn!(error = %error_chain(&e), "Search failed, continuing without sources");
                EvidenceSet::Unavailable
            }
        }
    }

    async fn search_sources(&self, query: &SearchQuery) -> Result<EvidenceSet, StageError> {
        let items = self.search.search(query.as_str(), self.result_count).await?;
        Ok(EvidenceSet::from_sources(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockSearch, SearchReply, source};

    fn query() -> SearchQuery {
        SearchQuery::new("apollo 11 moon landing evidence")
    }

    #[tokio::test]
    async fn results_keep_search_order() {
        let search = Arc::new(MockSearch::new(SearchReply::Items(vec![
            source("NASA"),
            source("Smithsonian"),
        ])));
        let retriever = EvidenceRetriever::new(search.clone(), 10);

        let evidence = retriever.retrieve(&query()).await;

        assert_eq!(
            evidence.lines(),
            vec![
                "NASA: https://nasa.example - NASA snippet".to_string(),
                "Smithsonian: https://smithsonian.example - Smithsonian snippet".to_string(),
            ]
        );
        assert_eq!(
            search.queries(),
            vec![("apollo 11 moon landing evidence".to_string(), 10)]
        );
    }

    #[tokio::test]
    async fn zero_results_yield_no_sources_sentinel() {
        let search = Arc::new(MockSearch::new(SearchReply::Items(Vec::new())));
        let retriever = EvidenceRetriever::new(search, 10);

        let evidence = retriever.retrieve(&query()).await;

        assert_eq!(evidence.lines(), vec!["No reliable sources found".to_string()]);
    }

    #[tokio::test]
    async fn failed_search_yields_error_sentinel() {
        let search = Arc::new(MockSearch::new(SearchReply::Status(403)));
        let retriever = EvidenceRetriever::new(search, 10);

        let evidence = retriever.retrieve(&query()).await;

        assert_eq!(evidence, EvidenceSet::Unavailable);
        assert_eq!(evidence.render(), "Error fetching search results");
    }
}
