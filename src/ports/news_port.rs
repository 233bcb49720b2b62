//! News headline port trait.

use crate::domain::error::StockSageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub description: String,
}

pub trait NewsPort {
    /// Most recent headlines first, at most `limit` of them.
    fn fetch_headlines(
        &self,
        company_name: &str,
        limit: usize,
    ) -> Result<Vec<Headline>, StockSageError>;
}
