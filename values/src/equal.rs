use datamodel_core::{Kind, Node, Result};

/// Structural equality across representations.
///
/// Maps compare entry by entry in iteration order, so two maps with the same
/// entries inserted in a different order are not equal. Floats compare with
/// `==`.
pub fn deep_equal(a: &dyn Node, b: &dyn Node) -> Result<bool> {
    if a.kind() != b.kind() {
        return Ok(false);
    }
    let equal = match a.kind() {
        Kind::Null | Kind::Invalid => true,
        Kind::Bool => a.as_bool()? == b.as_bool()?,
        Kind::Int => a.as_int()? == b.as_int()?,
        Kind::Float => a.as_float()? == b.as_float()?,
        Kind::String => a.as_str()? == b.as_str()?,
        Kind::Bytes => a.as_bytes()? == b.as_bytes()?,
        Kind::Link => a.as_link()? == b.as_link()?,
        Kind::Map => {
            if a.length()? != b.length()? {
                return Ok(false);
            }
            let (mut left, mut right) = (a.map_iter()?, b.map_iter()?);
            while !left.done() && !right.done() {
                let (ka, va) = left.next()?;
                let (kb, vb) = right.next()?;
                if !deep_equal(&*ka, &*kb)? || !deep_equal(&*va, &*vb)? {
                    return Ok(false);
                }
            }
            left.done() && right.done()
        }
        Kind::List => {
            if a.length()? != b.length()? {
                return Ok(false);
            }
            let (mut left, mut right) = (a.list_iter()?, b.list_iter()?);
            while !left.done() && !right.done() {
                let (_, va) = left.next()?;
                let (_, vb) = right.next()?;
                if !deep_equal(&*va, &*vb)? {
                    return Ok(false);
                }
            }
            left.done() && right.done()
        }
    };
    Ok(equal)
}
