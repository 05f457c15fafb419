use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::{
    error::{AppError, AppResult},
    models::{review::REQUIRED_COLUMNS, Document, ReviewRecord},
};

/// Converts a product review CSV into retrievable documents
///
/// Each row with a usable product title and a review longer than ten
/// characters becomes one document. Everything else is dropped.
#[derive(Debug, Clone)]
pub struct DataConverter {
    file_path: PathBuf,
}

impl DataConverter {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Reads the configured CSV file
    pub fn convert(&self) -> AppResult<Vec<Document>> {
        let file = File::open(&self.file_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                AppError::NotFound(format!("CSV file not found at: {}", self.file_path.display()))
            }
            _ => AppError::Io(e),
        })?;

        let documents = Self::convert_reader(file)?;

        tracing::info!(
            path = %self.file_path.display(),
            documents = documents.len(),
            "CSV converted to documents"
        );

        Ok(documents)
    }

    /// Converts CSV data from any reader
    pub fn convert_reader<R: Read>(reader: R) -> AppResult<Vec<Document>> {
        let mut reader = csv::Reader::from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(AppError::InvalidInput(format!(
                    "CSV is missing required column: {}",
                    column
                )));
            }
        }

        let mut documents = Vec::new();
        let mut skipped = 0usize;

        for record in reader.deserialize::<ReviewRecord>() {
            match record?.to_document() {
                Some(doc) => documents.push(doc),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, kept = documents.len(), "Dropped unusable review rows");
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn convert(csv: &str) -> AppResult<Vec<Document>> {
        DataConverter::convert_reader(Cursor::new(csv.as_bytes().to_vec()))
    }

    #[test]
    fn test_converts_valid_rows() {
        let csv = "product_title,rating,review\n\
                   boAt Rockerz 450,5,Amazing sound quality for the price\n\
                   Realme Narzo 50,4,Battery backup is really good\n";

        let docs = convert(csv).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].page_content, "Amazing sound quality for the price");
        assert_eq!(docs[0].metadata.product_name, "boAt Rockerz 450");
        assert_eq!(docs[0].metadata.source, "flipkart_reviews");
        assert_eq!(docs[0].metadata.rating, Some(5.0));
        assert_eq!(docs[1].metadata.product_name, "Realme Narzo 50");
    }

    #[test]
    fn test_headers_only_yields_nothing() {
        let docs = convert("product_title,review\n").unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let err = convert("product_title,rating\nPhone,5\n").unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains("review"));
    }

    #[test]
    fn test_drops_blank_and_short_rows() {
        let csv = "product_title,review\n\
                   ,Title is missing but review is long enough\n\
                   Phone,\n\
                   Phone,   \n\
                   Phone,Too short\n\
                   Phone,Works exactly as described\n";

        let docs = convert(csv).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page_content, "Works exactly as described");
    }

    #[test]
    fn test_trims_whitespace() {
        let csv = "product_title,review\n\"  Product with spaces  \",\"  Review with leading spaces  \"\n";

        let docs = convert(csv).unwrap();

        assert_eq!(docs[0].metadata.product_name, "Product with spaces");
        assert_eq!(docs[0].page_content, "Review with leading spaces");
    }

    #[test]
    fn test_special_and_unicode_characters() {
        let csv = "product_title,review\n\
                   \"Product with \"\"quotes\"\" & symbols\",\"Review with émojis 🎉 and ñ characters\"\n\
                   商品名称,这是一个很好的产品评论\n";

        let docs = convert(csv).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].metadata.product_name, "Product with \"quotes\" & symbols");
        assert!(docs[0].page_content.contains("émojis 🎉 and ñ characters"));
        assert_eq!(docs[1].page_content, "这是一个很好的产品评论");
        assert_eq!(docs[1].metadata.product_name, "商品名称");
    }

    #[test]
    fn test_extra_columns_and_bad_rating_are_ignored() {
        let csv = "product_title,price,review,rating,category\n\
                   Laptop,45000,Keyboard feels solid and sturdy,five,Electronics\n";

        let docs = convert(csv).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata.rating, None);
        let metadata = serde_json::to_value(&docs[0].metadata).unwrap();
        assert!(metadata.get("price").is_none());
        assert!(metadata.get("category").is_none());
    }

    #[test]
    fn test_malformed_csv() {
        let csv = "product_title,review\nPhone,Great value for money,unexpected\n";

        let err = convert(csv).unwrap_err();
        assert!(matches!(err, AppError::Csv(_)));
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        let bytes: &[u8] = b"product_title,review\nPhone,Great \xff\xfe value for money\n";

        let err = DataConverter::convert_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, AppError::Csv(_)));
    }

    #[test]
    fn test_nonexistent_file() {
        let converter = DataConverter::new("does/not/exist.csv");

        let err = converter.convert().unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(converter.file_path(), Path::new("does/not/exist.csv"));
    }

    #[test]
    fn test_convert_from_file() {
        let path = std::env::temp_dir().join(format!("reviews-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "product_title,review,rating\nSamsung Galaxy M14,Display is bright and crisp,4\n",
        )
        .unwrap();

        let docs = DataConverter::new(&path).convert().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata.product_name, "Samsung Galaxy M14");
    }
}
