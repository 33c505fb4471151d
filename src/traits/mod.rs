//! Core traits for the component container.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
