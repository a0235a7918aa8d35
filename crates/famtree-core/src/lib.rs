//! Core types and pure tree logic for the famtree genealogy editor.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Everything that derives a view of the record (the hierarchy, lineage
//! flags, search results) is a pure function over a `&[Person]` snapshot.
//! Persistence goes through the [`store::FamilyStore`] trait, and the
//! [`editor`] module holds the editing rules shared by every frontend.

pub mod editor;
pub mod error;
pub mod exchange;
pub mod hierarchy;
pub mod lineage;
pub mod person;
pub mod sample;
pub mod search;
pub mod store;

pub use error::{Error, Result};
pub use hierarchy::{TreeNode, build_hierarchy, build_hierarchy_labeled};
pub use lineage::compute_is_main_lineage;
pub use person::{Gender, NewPerson, Person, PersonId};
pub use search::search_family_data;
