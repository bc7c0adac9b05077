use core::fmt;

use bitflags::bitflags;

/// The dynamic shape of a node.
///
/// Every completed node reports one of the concrete kinds. `Invalid` only
/// describes an assembler that has not been shaped yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Kind {
    /// Not yet decided. Never reported by a built node.
    #[default]
    Invalid,

    /// Ordered string-keyed container.
    Map,

    /// Ordered sequence.
    List,

    Null,
    Bool,
    Int,
    Float,
    String,
    Bytes,

    /// Reference to another value by address.
    Link,
}

static_assertions::assert_eq_size!(Kind, u8);

impl Kind {
    /// All kinds a completed node can report.
    pub const CONCRETE: [Kind; 9] = [
        Kind::Map,
        Kind::List,
        Kind::Null,
        Kind::Bool,
        Kind::Int,
        Kind::Float,
        Kind::String,
        Kind::Bytes,
        Kind::Link,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Kind::Invalid => "Invalid",
            Kind::Map => "Map",
            Kind::List => "List",
            Kind::Null => "Null",
            Kind::Bool => "Bool",
            Kind::Int => "Int",
            Kind::Float => "Float",
            Kind::String => "String",
            Kind::Bytes => "Bytes",
            Kind::Link => "Link",
        }
    }

    /// Maps and lists need staged assembly; everything else is assigned in one step.
    pub const fn is_recursive(self) -> bool {
        matches!(self, Kind::Map | Kind::List)
    }

    pub const fn is_scalar(self) -> bool {
        !self.is_recursive() && !matches!(self, Kind::Invalid)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// A set of kinds.
    ///
    /// Used by [`Error::WrongKind`](crate::Error::WrongKind) to name the kinds
    /// an operation would have accepted.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct KindSet: u16 {
        const MAP = 1 << 0;
        const LIST = 1 << 1;
        const NULL = 1 << 2;
        const BOOL = 1 << 3;
        const INT = 1 << 4;
        const FLOAT = 1 << 5;
        const STRING = 1 << 6;
        const BYTES = 1 << 7;
        const LINK = 1 << 8;

        const RECURSIVE = Self::MAP.bits() | Self::LIST.bits();
        const SCALAR = Self::NULL.bits()
            | Self::BOOL.bits()
            | Self::INT.bits()
            | Self::FLOAT.bits()
            | Self::STRING.bits()
            | Self::BYTES.bits()
            | Self::LINK.bits();
    }
}

impl KindSet {
    pub const fn contains_kind(self, kind: Kind) -> bool {
        self.contains(KindSet::of(kind)) && !matches!(kind, Kind::Invalid)
    }

    /// The singleton set for `kind`; empty for `Invalid`.
    pub const fn of(kind: Kind) -> KindSet {
        match kind {
            Kind::Invalid => KindSet::empty(),
            Kind::Map => KindSet::MAP,
            Kind::List => KindSet::LIST,
            Kind::Null => KindSet::NULL,
            Kind::Bool => KindSet::BOOL,
            Kind::Int => KindSet::INT,
            Kind::Float => KindSet::FLOAT,
            Kind::String => KindSet::STRING,
            Kind::Bytes => KindSet::BYTES,
            Kind::Link => KindSet::LINK,
        }
    }
}

impl From<Kind> for KindSet {
    fn from(kind: Kind) -> Self {
        KindSet::of(kind)
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in Kind::CONCRETE {
            if self.contains_kind(kind) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(kind.name())?;
                first = false;
            }
        }
        if first {
            f.write_str("(none)")?;
        }
        Ok(())
    }
}
