use crate::types::ClassSchema;
use std::any::Any;

/// A type whose instances can be written to and read from the binary
/// settings format.
///
/// Implementors expose their registered [`ClassSchema`] and the `Any`
/// casts the authored accessors need. The codec never inspects an instance
/// directly; everything goes through the schema's getter/setter pairs.
pub trait BinObject: Any {
    fn schema(&self) -> &'static ClassSchema;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Downcast helper for authored field getters.
pub fn cast<T: BinObject>(obj: &dyn BinObject) -> Option<&T> {
    obj.as_any().downcast_ref::<T>()
}

/// Downcast helper for authored field setters.
pub fn cast_mut<T: BinObject>(obj: &mut dyn BinObject) -> Option<&mut T> {
    obj.as_any_mut().downcast_mut::<T>()
}

/// Downcast helper for setters of nested-object fields, which receive the
/// decoded instance by value.
pub fn cast_owned<T: BinObject>(obj: Box<dyn BinObject>) -> Option<Box<T>> {
    obj.into_any().downcast::<T>().ok()
}
