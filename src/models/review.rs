use serde::Deserialize;

/// Columns every review CSV must carry
pub const REQUIRED_COLUMNS: [&str; 2] = ["product_title", "review"];

/// Reviews this short (in characters, after trimming) carry no useful signal
pub const MIN_REVIEW_CHARS: usize = 10;

/// One row of the product review CSV.
///
/// Empty cells deserialize as `None`. Columns other than these are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReviewRecord {
    pub product_title: Option<String>,
    pub review: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub rating: Option<f32>,
}

impl ReviewRecord {
    /// Trimmed product title, if present and not blank
    pub fn title(&self) -> Option<&str> {
        non_blank(self.product_title.as_deref())
    }

    /// Trimmed review text, if long enough to be worth indexing
    pub fn review_text(&self) -> Option<&str> {
        non_blank(self.review.as_deref()).filter(|text| text.chars().count() > MIN_REVIEW_CHARS)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: Option<&str>, review: Option<&str>) -> ReviewRecord {
        ReviewRecord {
            product_title: title.map(String::from),
            review: review.map(String::from),
            rating: None,
        }
    }

    #[test]
    fn test_title_trims_and_rejects_blank() {
        assert_eq!(record(Some("  boAt Rockerz  "), None).title(), Some("boAt Rockerz"));
        assert_eq!(record(Some("   "), None).title(), None);
        assert_eq!(record(None, None).title(), None);
    }

    #[test]
    fn test_review_text_length_threshold() {
        // Exactly ten characters is too short.
        assert_eq!(record(None, Some("0123456789")).review_text(), None);
        assert_eq!(
            record(None, Some(" 01234567890 ")).review_text(),
            Some("01234567890")
        );
    }

    #[test]
    fn test_review_text_counts_characters_not_bytes() {
        // 11 characters, 33 bytes
        let review = "这是一个很好的产品评论";
        assert_eq!(record(None, Some(review)).review_text(), Some(review));
        // 5 characters, 15 bytes
        assert_eq!(record(None, Some("很好的产品")).review_text(), None);
    }
}
