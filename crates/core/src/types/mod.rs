//! Core types for Terry Store.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! parse-style constructors that enforce the form constraints for each
//! entity before anything touches the network.

pub mod article;
pub mod email;
pub mod id;
pub mod product;
pub mod role;
pub mod topic;

pub use article::{Article, ArticleStatus, ArticleValidationError, NewArticle};
pub use email::{Email, EmailError};
pub use id::*;
pub use product::{NewProduct, Product, ProductLabel, ProductValidationError};
pub use role::Role;
pub use topic::{TopicRequest, TopicValidationError};
