use serde::{Deserialize, Serialize};

use super::ReviewRecord;

/// Source tag attached to every review document
pub const REVIEW_SOURCE: &str = "flipkart_reviews";

/// Metadata stored alongside each review in the vector store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    pub product_name: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

/// A retrievable unit: review text plus the product it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub page_content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(page_content: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: DocumentMetadata {
                product_name: product_name.into(),
                source: REVIEW_SOURCE.to_string(),
                rating: None,
            },
        }
    }

    pub fn with_rating(mut self, rating: Option<f32>) -> Self {
        self.metadata.rating = rating;
        self
    }
}

impl ReviewRecord {
    /// Builds the document for this row, or `None` when the title or review is unusable
    pub fn to_document(&self) -> Option<Document> {
        let title = self.title()?;
        let review = self.review_text()?;
        Some(Document::new(review, title).with_rating(self.rating))
    }
}
