//! Error types for the component container.

use std::fmt;

/// Container errors
///
/// Represents the error conditions that can occur while registering
/// descriptors, constructing components, or resolving them afterwards.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ComponentCollection, IocError, ResolverCore};
///
/// let container = ComponentCollection::new().build().unwrap();
/// match container.resolve_by_name("personService") {
///     Err(IocError::NotFound(name)) => assert_eq!(name, "personService"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_ioc::IocError;
///
/// let duplicate = IocError::DuplicateDescriptor("personService".to_string());
/// let conflict = IocError::ConcurrentConstructionConflict("personService".to_string());
///
/// // All errors implement Display
/// println!("Error: {}", duplicate);
/// println!("Error: {}", conflict);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IocError {
    /// Two descriptors share a name
    DuplicateDescriptor(String),
    /// Full construction was re-entered for a name that is already being built
    /// and has no early reference to hand out
    ConcurrentConstructionConflict(String),
    /// A type lookup matched more than one descriptor
    AmbiguousType {
        type_name: &'static str,
        candidates: Vec<String>,
    },
    /// No descriptor (or no component type) for the requested name
    NotFound(String),
    /// A resolved dependency could not be assigned into its slot
    InjectionFailure {
        component: String,
        field: &'static str,
        reason: String,
    },
    /// A resolved instance is not of the requested type
    TypeMismatch {
        name: String,
        expected: &'static str,
    },
    /// Configuration could not be loaded
    Config(String),
}

impl fmt::Display for IocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IocError::DuplicateDescriptor(name) => {
                write!(f, "Duplicate component descriptor: {}", name)
            }
            IocError::ConcurrentConstructionConflict(name) => {
                write!(f, "Component is already in construction: {}", name)
            }
            IocError::AmbiguousType { type_name, candidates } => write!(
                f,
                "{} components of type {}: {}",
                candidates.len(),
                type_name,
                candidates.join(", ")
            ),
            IocError::NotFound(name) => write!(f, "Component not found: {}", name),
            IocError::InjectionFailure { component, field, reason } => {
                write!(f, "Injection into {}.{} failed: {}", component, field, reason)
            }
            IocError::TypeMismatch { name, expected } => {
                write!(f, "Component {} is not a {}", name, expected)
            }
            IocError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for IocError {}

/// Result type for container operations
///
/// A convenience alias for `Result<T, IocError>` used throughout ferrous-ioc.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{IocResult, IocError};
///
/// fn lookup(name: &str) -> IocResult<()> {
///     Err(IocError::NotFound(name.to_string()))
/// }
///
/// assert!(lookup("missing").is_err());
/// ```
pub type IocResult<T> = Result<T, IocError>;
