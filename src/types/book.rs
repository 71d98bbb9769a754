use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A bibliographic record, keyed by its ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Book {
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub isbn: String,
    #[validate(url(message = "Must be a valid URL"))]
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    #[validate(range(min = 1, message = "Must be a positive number"))]
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

/// Every field of a [`Book`] except the ISBN, which is taken from the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct BookUpdate {
    #[validate(url(message = "Must be a valid URL"))]
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    #[validate(range(min = 1, message = "Must be a positive number"))]
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

impl Book {
    pub fn from_update(isbn: String, update: BookUpdate) -> Self {
        Book {
            isbn,
            amazon_url: update.amazon_url,
            author: update.author,
            language: update.language,
            pages: update.pages,
            publisher: update.publisher,
            title: update.title,
            year: update.year,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_book() -> Book {
    Book {
        isbn: "1234567890".to_string(),
        amazon_url: "http://a.co/newbook".to_string(),
        author: "Jimmys Johns".to_string(),
        language: "english".to_string(),
        pages: 150,
        publisher: "Example Publisher".to_string(),
        title: "New Book Title".to_string(),
        year: 2021,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_book_is_valid() {
        assert!(sample_book().validate().is_ok());
    }

    #[test]
    fn zero_pages_and_bad_url_are_invalid() {
        let book = Book {
            pages: 0,
            amazon_url: "not a url".to_string(),
            ..sample_book()
        };

        let errors = book.validate().expect_err("Book should be invalid");
        let fields = errors.field_errors();

        assert!(fields.contains_key("pages"));
        assert!(fields.contains_key("amazon_url"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn empty_isbn_is_invalid() {
        let book = Book {
            isbn: String::new(),
            ..sample_book()
        };

        assert!(book.validate().is_err());
    }

    #[test]
    fn missing_language_fails_to_deserialize() {
        let json = serde_json::json!({
            "isbn": "1234567891",
            "amazon_url": "http://a.co/newbook",
            "author": "Jimmys Johns",
            "pages": 150,
            "publisher": "Example Publisher",
            "title": "New Book Title",
            "year": 2021,
        });

        let err = serde_json::from_value::<Book>(json).expect_err("Missing field must be rejected");

        assert!(err.to_string().contains("language"));
    }

    #[test]
    fn update_keeps_path_isbn() {
        let update = BookUpdate {
            amazon_url: "http://a.co/updated".to_string(),
            author: "Someone Else".to_string(),
            language: "german".to_string(),
            pages: 320,
            publisher: "Other Publisher".to_string(),
            title: "Updated Title".to_string(),
            year: 1999,
        };

        let book = Book::from_update("1234567890".to_string(), update);

        assert_eq!(book.isbn, "1234567890");
        assert_eq!(book.title, "Updated Title");
        assert_eq!(book.pages, 320);
    }
}
