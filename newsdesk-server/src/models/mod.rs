//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod category;
pub mod article;
pub mod pagination;

pub use validation::ValidationError;
pub use category::Category;
pub use article::{
    AgencyName, Article, ArticlePayload, ArticleText, ArticleTitle, AuthorName, UserSubmitted,
};
pub use pagination::{total_pages, CategoryPage, Page, PAGE_SIZE};
