use core::mem;

use datamodel_core::NodeRef;

/// Lifecycle of a top-level builder.
///
/// `Begun` is only used by map and list builders, whose payload lives in
/// their embedded assembler until `build`.
#[derive(Debug, Default)]
pub(crate) enum Phase {
    #[default]
    Fresh,
    Begun,
    Assigned(NodeRef),
    Built,
}

impl Phase {
    /// Why a shaping call is refused, if it is.
    pub(crate) fn shaping_misuse(&self) -> Option<&'static str> {
        match self {
            Phase::Fresh => None,
            Phase::Begun => Some("after the value was already begun"),
            Phase::Assigned(_) => Some("on an assembler that's already finished"),
            Phase::Built => Some("on a builder that was already built"),
        }
    }

    /// Hand out an assigned node, leaving the builder spent.
    pub(crate) fn take_built(&mut self) -> Result<NodeRef, &'static str> {
        match mem::replace(self, Phase::Built) {
            Phase::Assigned(node) => Ok(node),
            other => {
                let detail = other.build_misuse();
                *self = other;
                Err(detail)
            }
        }
    }

    pub(crate) fn build_misuse(&self) -> &'static str {
        match self {
            Phase::Fresh => "before any value was assigned",
            Phase::Begun => "before the value was finished",
            Phase::Assigned(_) => "on an assembler that's already finished",
            Phase::Built => "twice without a reset",
        }
    }
}
