//! # Recipe Table View
//!
//! The paginated recipe table with its filter inputs and detail drawer.
//!
//! - [`state`] - UI state and its transitions, including request sequencing
//! - [`render`] - Text rendering of table, pagination and drawer
//! - [`table`] - [`RecipeTable`], which ties the state to a [`RecipeSource`](crate::client::RecipeSource)

pub mod render;
pub mod state;
pub mod table;

pub use state::{Completion, LoadStatus, ResultOrigin, TableState, Ticket};
pub use table::RecipeTable;
