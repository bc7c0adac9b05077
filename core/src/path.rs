use std::fmt;

/// One step through a node: a map key or a list index.
///
/// Carried by [`Error::NotExists`](crate::Error::NotExists) and accepted by
/// [`Node::lookup_segment`](crate::Node::lookup_segment).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// The segment as a list index. Key segments are parsed; non-numeric
    /// keys yield `None`.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Key(key) => key.parse().ok(),
            PathSegment::Index(index) => Some(*index),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_index() {
        assert_eq!(PathSegment::from(3).as_index(), Some(3));
        assert_eq!(PathSegment::from("12").as_index(), Some(12));
        assert_eq!(PathSegment::from("x").as_index(), None);
        assert_eq!(PathSegment::from("-1").as_index(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(PathSegment::from("name").to_string(), "name");
        assert_eq!(PathSegment::from(7).to_string(), "7");
    }
}
