use std::fmt;
use std::sync::Arc;

/// An address of another value.
///
/// The data model only carries links around; resolving them is left to
/// whatever storage layer produced them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link(Arc<str>);

impl Link {
    pub fn new(target: impl Into<Arc<str>>) -> Self {
        Link(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Link {
    fn from(target: &str) -> Self {
        Link::new(target)
    }
}
