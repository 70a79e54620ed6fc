//! Reference-counted, identity-carrying storage for composite values.

use core::fmt;

use triomphe::Arc;

/// Read guard returned by [`SharedCell::read`].
pub type SharedReadGuard<'a, T> = spin::RwLockReadGuard<'a, T>;

/// Write guard returned by [`SharedCell::write`].
pub type SharedWriteGuard<'a, T> = spin::RwLockWriteGuard<'a, T>;

/// The identity of a [`SharedCell`] allocation.
///
/// Two cells have the same identity exactly when they are clones of each
/// other. The identity stays valid for as long as any clone of the cell is
/// alive; after the last clone is dropped the address may be reused.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

impl Identity {
    /// Returns the raw address this identity was derived from.
    #[must_use]
    pub const fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({:#x})", self.0)
    }
}

/// A shared, interior-mutable node.
///
/// Cloning a `SharedCell` creates another handle to the same node, which is
/// what allows value graphs to alias and to contain cycles. Reference cycles
/// are never reclaimed automatically.
pub struct SharedCell<T>(Arc<spin::RwLock<T>>);

impl<T> SharedCell<T> {
    /// Allocates a new node holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Arc::new(spin::RwLock::new(value)))
    }

    /// Returns the identity of the node.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity(Arc::as_ptr(&self.0).addr())
    }

    /// Returns `true` if both handles point to the same node.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Acquires shared access to the node contents.
    ///
    /// Any number of read guards may be held at once, including several for
    /// the same node on the same thread.
    #[inline]
    pub fn read(&self) -> SharedReadGuard<'_, T> {
        self.0.read()
    }

    /// Acquires exclusive access to the node contents.
    ///
    /// Spins until every outstanding read guard for this node has been
    /// dropped. Calling this while the current thread holds a read guard for
    /// the same node never returns.
    #[inline]
    pub fn write(&self) -> SharedWriteGuard<'_, T> {
        self.0.write()
    }
}

impl<T> Clone for SharedCell<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for SharedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedCell").field(&self.identity()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_cell_send_sync() {
        static_assertions::assert_impl_all!(SharedCell<u32>: Send, Sync, Clone);
        static_assertions::assert_not_impl_any!(SharedCell<core::cell::Cell<u32>>: Sync);
        static_assertions::assert_impl_all!(Identity: Send, Sync, Copy);
    }

    #[test]
    fn test_clone_shares_identity() {
        let a = SharedCell::new(1_u32);
        let b = a.clone();
        let c = SharedCell::new(1_u32);
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), c.identity());
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn test_nested_reads() {
        let cell = SharedCell::new([1_u8, 2, 3]);
        let first = cell.read();
        let second = cell.read();
        assert_eq!(first[0], second[0]);
    }
}
