//! Opaque handles for worlds, bodies and shapes
//!
//! Handles are generational keys: once the object behind a handle is
//! removed, the handle never resolves again, even if its slot is reused.

use slotmap::{new_key_type, Key, KeyData};

new_key_type! {
    /// Handle to a [`World`](crate::World)
    pub struct WorldHandle;

    /// Handle to a [`Body`](crate::Body)
    pub struct BodyHandle;

    /// Handle to a [`Shape`](crate::Shape)
    pub struct ShapeHandle;
}

/// Conversion of handles to and from plain integers for host boundaries
pub trait RawHandle: Key {
    /// Pack the handle into a `u64`
    fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Rebuild a handle from [`RawHandle::to_raw`] output
    fn from_raw(raw: u64) -> Self {
        KeyData::from_ffi(raw).into()
    }
}

impl RawHandle for WorldHandle {}
impl RawHandle for BodyHandle {}
impl RawHandle for ShapeHandle {}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_raw_round_trip() {
        let mut map: SlotMap<ShapeHandle, u32> = SlotMap::with_key();
        let handle = map.insert(7);
        let raw = handle.to_raw();
        assert_eq!(ShapeHandle::from_raw(raw), handle);
    }

    #[test]
    fn test_stale_handle_does_not_resolve() {
        let mut map: SlotMap<BodyHandle, u32> = SlotMap::with_key();
        let old = map.insert(1);
        map.remove(old);
        let new = map.insert(2);

        assert!(map.get(old).is_none());
        assert_ne!(old, new);
    }
}
