//! Runtime byte-buffer values.
//!
//! Synthesized struct accessors define their semantics in terms of raw
//! bytes: a struct value is a flat buffer, a getter copies `field_size`
//! bytes out of it, and an ander produces a pointer aliasing the original
//! storage at a field offset. This module provides the small value model
//! those implementations (and their tests) run against.
//!
//! The front end is single-threaded, so shared mutable storage is plain
//! `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared, mutable byte storage backing a runtime value.
///
/// Cloning a `Storage` shares the underlying buffer; writes through one
/// handle are visible through every other.
#[derive(Debug, Clone)]
pub struct Storage(Rc<RefCell<Vec<u8>>>);

impl Storage {
    /// Wrap a byte buffer in shared storage.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Rc::new(RefCell::new(bytes)))
    }

    /// Allocate zeroed storage of the given size.
    pub fn zeroed(size: usize) -> Self {
        Self::new(vec![0; size])
    }

    /// Size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `len` bytes starting at `offset` out of the buffer.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds; accessor layout guarantees
    /// in-bounds ranges for well-formed data.
    pub fn read(&self, offset: usize, len: usize) -> Vec<u8> {
        self.0.borrow()[offset..offset + len].to_vec()
    }

    /// Overwrite the bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn write(&self, offset: usize, bytes: &[u8]) {
        self.0.borrow_mut()[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Copy the whole buffer out.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    /// Whether two handles share the same underlying buffer.
    pub fn same_buffer(&self, other: &Storage) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A pointer into shared storage: a base buffer plus a byte offset.
///
/// Anders return these. No bytes are copied; the pointer aliases the
/// storage it was derived from.
#[derive(Debug, Clone)]
pub struct Pointer {
    storage: Storage,
    offset: usize,
}

impl Pointer {
    /// Point at `offset` within `storage`.
    pub fn new(storage: Storage, offset: usize) -> Self {
        Self { storage, offset }
    }

    /// The storage this pointer aliases.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Byte offset from the base of the storage.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// A new pointer `delta` bytes further into the same storage.
    pub fn offset_by(&self, delta: usize) -> Pointer {
        Pointer {
            storage: self.storage.clone(),
            offset: self.offset + delta,
        }
    }

    /// Read `len` bytes through the pointer.
    pub fn read(&self, len: usize) -> Vec<u8> {
        self.storage.read(self.offset, len)
    }

    /// Write bytes through the pointer.
    pub fn write(&self, bytes: &[u8]) {
        self.storage.write(self.offset, bytes);
    }
}

/// A runtime value as seen by synthesized accessor implementations.
#[derive(Debug, Clone)]
pub enum Value {
    /// A flat by-value buffer (structs, scalars).
    Bytes(Vec<u8>),
    /// A possibly-null pointer into shared storage.
    Ptr(Option<Pointer>),
}

impl Value {
    /// The byte payload, if this is a by-value buffer.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            Value::Ptr(_) => None,
        }
    }

    /// The pointer payload, if this is a pointer value. `Some(None)` is a
    /// null pointer.
    pub fn as_ptr(&self) -> Option<Option<&Pointer>> {
        match self {
            Value::Bytes(_) => None,
            Value::Ptr(ptr) => Some(ptr.as_ref()),
        }
    }

    /// A null pointer value.
    pub fn null() -> Value {
        Value::Ptr(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_read_write_round_trip() {
        let storage = Storage::new(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(storage.read(4, 4), vec![5, 6, 7, 8]);

        storage.write(4, &[9, 9, 9, 9]);
        assert_eq!(storage.read(0, 8), vec![1, 2, 3, 4, 9, 9, 9, 9]);
    }

    #[test]
    fn storage_clone_shares_buffer() {
        let a = Storage::new(vec![0; 4]);
        let b = a.clone();
        b.write(0, &[7, 7, 7, 7]);
        assert_eq!(a.read(0, 4), vec![7, 7, 7, 7]);
        assert!(a.same_buffer(&b));
    }

    #[test]
    fn pointer_aliases_storage_at_offset() {
        let storage = Storage::new(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let ptr = Pointer::new(storage.clone(), 4);
        assert_eq!(ptr.read(4), vec![5, 6, 7, 8]);

        ptr.write(&[0, 0, 0, 0]);
        assert_eq!(storage.read(0, 8), vec![1, 2, 3, 4, 0, 0, 0, 0]);
    }

    #[test]
    fn pointer_offset_by_advances_within_same_storage() {
        let storage = Storage::new(vec![10, 20, 30, 40]);
        let base = Pointer::new(storage.clone(), 0);
        let advanced = base.offset_by(2);
        assert_eq!(advanced.offset(), 2);
        assert_eq!(advanced.read(2), vec![30, 40]);
        assert!(advanced.storage().same_buffer(&storage));
    }

    #[test]
    fn value_accessors_discriminate_kinds() {
        let bytes = Value::Bytes(vec![1, 2]);
        assert_eq!(bytes.as_bytes(), Some(&[1u8, 2][..]));
        assert!(bytes.as_ptr().is_none());

        let null = Value::null();
        assert!(matches!(null.as_ptr(), Some(None)));
    }
}
