//! The `ContactStore` trait, where the shell keeps the collection between
//! runs.
//!
//! The trait is implemented by storage backends (e.g. `gestor-store-sqlite`).
//! The engine never calls it: the shell loads a snapshot, passes it through
//! the pure operations, and saves the result.

use std::future::Future;

use crate::contact::Contact;

/// Abstraction over an opaque snapshot store for the contact collection.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load the saved collection in its saved order. An empty vec when nothing
  /// has been saved yet.
  fn load(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Replace the saved collection with `contacts`.
  fn save<'a>(
    &'a self,
    contacts: &'a [Contact],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
