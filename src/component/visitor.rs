use super::ComponentRef;
use crate::property::Property;

/// Callbacks for `ComponentRef::accept`.
///
/// A component is visited before its properties, which are visited before
/// its children. Returning an error stops the walk.
pub trait Visitor {
    type Error;

    fn visit_component(&mut self, component: ComponentRef<'_>) -> Result<(), Self::Error>;

    fn visit_property(
        &mut self,
        _owner: ComponentRef<'_>,
        _property: &Property,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `false` for visitors that only look at the component `accept` was
    /// called on.
    fn descend(&self) -> bool {
        true
    }
}
