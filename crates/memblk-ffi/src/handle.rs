//! Kind-tagged handle registries for configs and stores.
//!
//! A handle is `kind << 56 | serial`. Serials start at 1 and are never
//! reused, so a destroyed handle stays dead forever and handle 0 is never
//! valid. The kind tag makes a config handle passed to a store entry point
//! (or the reverse) fail as `InvalidHandle` instead of resolving to an
//! unrelated object.

use std::collections::BTreeMap;
use std::sync::Arc;

const KIND_SHIFT: u32 = 56;
const SERIAL_MASK: u64 = (1 << KIND_SHIFT) - 1;

/// What a handle refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum HandleKind {
    Config = 1,
    Store = 2,
}

impl HandleKind {
    fn tag(self) -> u64 {
        u64::from(self as u8) << KIND_SHIFT
    }
}

/// Live objects of one kind, addressed by tagged handles.
pub(crate) struct Registry<T> {
    kind: HandleKind,
    last_serial: u64,
    live: BTreeMap<u64, T>,
}

impl<T> Registry<T> {
    pub const fn new(kind: HandleKind) -> Self {
        Self {
            kind,
            last_serial: 0,
            live: BTreeMap::new(),
        }
    }

    /// Store `value` under a fresh handle. `None` once the serial space
    /// is used up.
    pub fn insert(&mut self, value: T) -> Option<u64> {
        let serial = self.last_serial.checked_add(1).filter(|s| *s <= SERIAL_MASK)?;
        self.last_serial = serial;
        self.live.insert(serial, value);
        Some(self.kind.tag() | serial)
    }

    fn serial(&self, handle: u64) -> Option<u64> {
        (handle & !SERIAL_MASK == self.kind.tag()).then_some(handle & SERIAL_MASK)
    }

    pub fn get(&self, handle: u64) -> Option<&T> {
        self.live.get(&self.serial(handle)?)
    }

    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let serial = self.serial(handle)?;
        self.live.get_mut(&serial)
    }

    /// Take the value out; `handle` never resolves again.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let serial = self.serial(handle)?;
        self.live.remove(&serial)
    }
}

impl<T> Registry<Arc<T>> {
    /// Share the value behind `handle` so the caller can drop the table
    /// lock before using it. A concurrent `remove` only drops the table's
    /// reference; calls already holding one finish normally.
    pub fn resolve(&self, handle: u64) -> Option<Arc<T>> {
        self.get(handle).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_carry_their_kind() {
        let mut stores = Registry::new(HandleKind::Store);
        let h = stores.insert("ram0").unwrap();
        assert_eq!(h >> KIND_SHIFT, HandleKind::Store as u64);
        assert_eq!(stores.get(h), Some(&"ram0"));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut configs = Registry::new(HandleKind::Config);
        let mut stores = Registry::new(HandleKind::Store);
        let c = configs.insert(1u64).unwrap();
        let s = stores.insert(2u64).unwrap();
        assert_eq!(c & SERIAL_MASK, s & SERIAL_MASK);
        assert_eq!(stores.get(c), None);
        assert_eq!(configs.remove(s), None);
        assert_eq!(configs.get(c), Some(&1));
    }

    #[test]
    fn zero_handle_never_resolves() {
        let mut reg = Registry::new(HandleKind::Config);
        reg.insert(()).unwrap();
        assert!(reg.get(0).is_none());
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut reg = Registry::new(HandleKind::Config);
        let h = reg.insert(4096u64).unwrap();
        *reg.get_mut(h).unwrap() = 8192;
        assert_eq!(reg.get(h), Some(&8192));
    }

    #[test]
    fn removed_handle_is_never_reissued() {
        let mut reg = Registry::new(HandleKind::Store);
        let first = reg.insert('a').unwrap();
        assert_eq!(reg.remove(first), Some('a'));
        let second = reg.insert('b').unwrap();
        assert_ne!(first, second);
        assert_eq!(reg.get(first), None);
        assert_eq!(reg.get_mut(first), None);
        assert_eq!(reg.remove(first), None);
        assert_eq!(reg.get(second), Some(&'b'));
    }

    #[test]
    fn resolved_value_outlives_removal() {
        let mut reg = Registry::new(HandleKind::Store);
        let h = reg.insert(Arc::new(vec![1u8, 2, 3])).unwrap();
        let held = reg.resolve(h).unwrap();
        assert_eq!(Arc::strong_count(&held), 2);
        reg.remove(h);
        assert!(reg.resolve(h).is_none());
        assert_eq!(*held, vec![1, 2, 3]);
        assert_eq!(Arc::strong_count(&held), 1);
    }

    #[test]
    fn exhausted_serials_refuse_insert() {
        let mut reg = Registry::new(HandleKind::Config);
        reg.last_serial = SERIAL_MASK - 1;
        let last = reg.insert(0u8).unwrap();
        assert_eq!(last & SERIAL_MASK, SERIAL_MASK);
        assert_eq!(reg.insert(1u8), None);
        assert_eq!(reg.get(last), Some(&0));
    }
}
