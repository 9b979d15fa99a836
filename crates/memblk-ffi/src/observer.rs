//! C callback observer: bridges `MemblkObserverDef` to [`StoreObserver`].
//!
//! C code registers an event callback through
//! `memblk_config_set_observer`; every store operation then delivers a
//! flat [`MemblkEvent`] to it.

use std::ffi::c_void;

use memblk_core::{StoreError, StoreEvent, StoreObserver};

use crate::status::MemblkStatus;
use crate::types::MemblkEventKind;

/// Flat, C-compatible view of a [`StoreEvent`].
///
/// For `Size` events `length` carries the capacity. For rejected
/// operations `status` is the negative status code and `offset`/`length`
/// describe the rejected range when known.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemblkEvent {
    /// Start of the range (0 when not applicable).
    pub offset: u64,
    /// Length of the range (0 when not applicable).
    pub length: u64,
    /// Operation kind as a `MemblkEventKind` value.
    pub kind: i32,
    /// `MEMBLK_OK` for completed operations, a negative status otherwise.
    pub status: i32,
}

// u64 + u64 + i32 + i32 = 24 bytes, align 8.
const _: () = assert!(std::mem::size_of::<MemblkEvent>() == 24);
const _: () = assert!(std::mem::align_of::<MemblkEvent>() == 8);

impl MemblkEvent {
    pub(crate) fn from_rust(event: &StoreEvent) -> Self {
        let kind = MemblkEventKind::from(event.op()) as i32;
        let ok = MemblkStatus::Ok as i32;
        match event {
            StoreEvent::Read { offset, length } | StoreEvent::Write { offset, length } => Self {
                offset: *offset,
                length: *length,
                kind,
                status: ok,
            },
            StoreEvent::Trim { offset, length, .. } => Self {
                offset: *offset,
                length: *length,
                kind,
                status: ok,
            },
            StoreEvent::Size { capacity } => Self {
                offset: 0,
                length: *capacity,
                kind,
                status: ok,
            },
            StoreEvent::Flush | StoreEvent::Disconnect => Self {
                kind,
                status: ok,
                ..Self::default()
            },
            StoreEvent::Rejected { error, .. } => {
                let (offset, length) = match error {
                    StoreError::OutOfRange { offset, length, .. } => (*offset, *length),
                    _ => (0, 0),
                };
                Self {
                    offset,
                    length,
                    kind,
                    status: MemblkStatus::from(error) as i32,
                }
            }
        }
    }
}

/// C-side observer definition.
///
/// `on_event` and `user_data` must stay valid for the lifetime of every
/// store built from the config that received this definition. The
/// callback may be invoked concurrently from any thread that drives the
/// store, so it must be thread-safe.
#[repr(C)]
pub struct MemblkObserverDef {
    /// Event callback (must not be null).
    pub on_event: Option<unsafe extern "C" fn(*mut c_void, *const MemblkEvent)>,
    /// User data pointer passed to `on_event`.
    pub user_data: *mut c_void,
}

/// Rust-side wrapper that implements [`StoreObserver`] by calling into C.
pub(crate) struct CallbackObserver {
    on_event: unsafe extern "C" fn(*mut c_void, *const MemblkEvent),
    user_data: *mut c_void,
}

// SAFETY: the FFI contract on MemblkObserverDef requires the callback and
// user_data to be usable from any thread, concurrently.
#[allow(unsafe_code)]
unsafe impl Send for CallbackObserver {}
#[allow(unsafe_code)]
unsafe impl Sync for CallbackObserver {}

impl CallbackObserver {
    /// Build from a C definition. Returns `None` if `on_event` is null.
    pub(crate) fn from_def(def: &MemblkObserverDef) -> Option<Self> {
        Some(Self {
            on_event: def.on_event?,
            user_data: def.user_data,
        })
    }
}

impl StoreObserver for CallbackObserver {
    #[allow(unsafe_code)]
    fn on_event(&self, event: &StoreEvent) {
        let c_event = MemblkEvent::from_rust(event);
        // SAFETY: on_event and user_data are valid per the definition's contract.
        unsafe { (self.on_event)(self.user_data, &c_event) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memblk_core::Op;
    use std::sync::Mutex;

    #[test]
    fn read_event_keeps_range() {
        let e = MemblkEvent::from_rust(&StoreEvent::Read {
            offset: 8,
            length: 4,
        });
        assert_eq!(
            e,
            MemblkEvent {
                offset: 8,
                length: 4,
                kind: MemblkEventKind::Read as i32,
                status: 0
            }
        );
    }

    #[test]
    fn size_event_carries_capacity_in_length() {
        let e = MemblkEvent::from_rust(&StoreEvent::Size { capacity: 1024 });
        assert_eq!(e.length, 1024);
        assert_eq!(e.kind, MemblkEventKind::Size as i32);
    }

    #[test]
    fn rejected_event_carries_status_and_range() {
        let e = MemblkEvent::from_rust(&StoreEvent::Rejected {
            op: Op::Write,
            error: StoreError::OutOfRange {
                offset: 1022,
                length: 4,
                capacity: 1024,
            },
        });
        assert_eq!(e.kind, MemblkEventKind::Write as i32);
        assert_eq!(e.status, MemblkStatus::OutOfRange as i32);
        assert_eq!((e.offset, e.length), (1022, 4));
    }

    #[test]
    fn null_callback_is_rejected() {
        let def = MemblkObserverDef {
            on_event: None,
            user_data: std::ptr::null_mut(),
        };
        assert!(CallbackObserver::from_def(&def).is_none());
    }

    #[allow(unsafe_code)]
    unsafe extern "C" fn collect(user_data: *mut c_void, event: *const MemblkEvent) {
        let sink = &*(user_data as *const Mutex<Vec<MemblkEvent>>);
        sink.lock().unwrap().push(*event);
    }

    #[test]
    fn callback_receives_flattened_event() {
        let sink: Mutex<Vec<MemblkEvent>> = Mutex::new(Vec::new());
        let def = MemblkObserverDef {
            on_event: Some(collect),
            user_data: &sink as *const _ as *mut c_void,
        };
        let obs = CallbackObserver::from_def(&def).unwrap();
        obs.on_event(&StoreEvent::Disconnect);
        let got = sink.lock().unwrap().clone();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].kind, MemblkEventKind::Disconnect as i32);
    }
}
