use {
    crate::{
        execution_unit::ExecutionUnit,
        guard::{ExclusiveGuard, SharedGuard},
    },
    parking_lot::{Condvar, Mutex},
    static_assertions::assert_impl_all,
    std::{
        fmt::{Debug, Formatter},
        ptr,
        sync::Arc,
    },
    tracing::trace,
};

#[cfg(test)]
mod tests;

/// A reader-writer lock whose writer may also read.
///
/// The lock itself does not contain the data it protects. Access is represented by
/// [`SharedGuard`] and [`ExclusiveGuard`] objects which can be created with
/// [`SharedMutex::shared`] and [`SharedMutex::exclusive`] respectively.
///
/// Cloning a [`SharedMutex`] creates a new handle to the same lock. Two handles compare
/// equal if and only if they refer to the same lock.
///
/// # Example
///
/// ```
/// use std::thread;
/// use shared_mutex::SharedMutex;
///
/// let mutex = SharedMutex::default();
/// thread::scope(|scope| {
///     for _ in 0..4 {
///         scope.spawn(|| {
///             let _reader = mutex.shared();
///         });
///     }
/// });
/// let _writer = mutex.exclusive();
/// ```
#[derive(Clone, Default)]
pub struct SharedMutex {
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    // Waited on with the state mutex. Notified whenever a release might make a
    // predicate true.
    condvar: Condvar,
}

#[derive(Default)]
struct State {
    // The number of held SharedGuards, including those of the exclusive owner.
    readers: usize,
    // Some if and only if an ExclusiveGuard is held.
    exclusive_owner: Option<ExecutionUnit>,
}

assert_impl_all!(SharedMutex: Send, Sync);

impl State {
    fn admits_reader(&self, unit: ExecutionUnit) -> bool {
        match self.exclusive_owner {
            None => true,
            Some(owner) => owner == unit,
        }
    }

    fn admits_writer(&self) -> bool {
        self.readers == 0 && self.exclusive_owner.is_none()
    }
}

impl SharedMutex {
    /// Creates a new, unlocked mutex.
    ///
    /// # Example
    ///
    /// ```
    /// use shared_mutex::SharedMutex;
    ///
    /// let mutex = SharedMutex::new();
    /// let _guard = mutex.exclusive();
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the current thread may read, then registers a reader.
    ///
    /// The current thread may read if no thread holds exclusive access or if the
    /// current thread itself holds it.
    pub(crate) fn acquire_shared(&self) {
        let unit = ExecutionUnit::current();
        let shared = &*self.shared;
        let mut state = shared.state.lock();
        if !state.admits_reader(unit) {
            trace!(mutex = ?self.addr(), "waiting for shared access");
            shared
                .condvar
                .wait_while(&mut state, |state| !state.admits_reader(unit));
        }
        state.readers = match state.readers.checked_add(1) {
            Some(readers) => readers,
            None => too_many_readers(),
        };
    }

    /// Unregisters a reader.
    ///
    /// The caller must have registered a reader with [`Self::acquire_shared`] that has
    /// not yet been unregistered.
    pub(crate) fn release_shared(&self) {
        let shared = &*self.shared;
        let mut state = shared.state.lock();
        debug_assert!(state.readers > 0);
        state.readers -= 1;
        if state.readers == 0 {
            trace!(mutex = ?self.addr(), "last reader released");
            shared.condvar.notify_one();
        }
    }

    /// Blocks until no thread reads or writes, then makes the current thread the
    /// exclusive owner.
    ///
    /// # Panic
    ///
    /// Panics if the current thread is already the exclusive owner.
    pub(crate) fn acquire_exclusive(&self) {
        let unit = ExecutionUnit::current();
        let shared = &*self.shared;
        let mut state = shared.state.lock();
        assert!(
            state.exclusive_owner != Some(unit),
            "exclusive access is not reentrant",
        );
        if !state.admits_writer() {
            trace!(
                mutex = ?self.addr(),
                readers = state.readers,
                "waiting for exclusive access"
            );
            shared
                .condvar
                .wait_while(&mut state, |state| !state.admits_writer());
        }
        state.exclusive_owner = Some(unit);
    }

    /// Gives up exclusive ownership and wakes all waiters.
    ///
    /// The current thread must be the exclusive owner.
    pub(crate) fn release_exclusive(&self) {
        let shared = &*self.shared;
        let mut state = shared.state.lock();
        debug_assert_eq!(state.exclusive_owner, Some(ExecutionUnit::current()));
        state.exclusive_owner = None;
        trace!(mutex = ?self.addr(), "exclusive access released");
        shared.condvar.notify_all();
    }

    /// Acquires shared access to this mutex.
    ///
    /// This is the same as calling [`SharedGuard::new`].
    ///
    /// If another thread holds exclusive access, then this function blocks until that
    /// access has been released. If the current thread holds exclusive access, this
    /// function returns immediately.
    ///
    /// # Example
    ///
    /// ```
    /// use shared_mutex::SharedMutex;
    ///
    /// let mutex = SharedMutex::default();
    /// let _reader1 = mutex.shared();
    /// let _reader2 = mutex.shared();
    /// ```
    #[inline]
    pub fn shared(&self) -> SharedGuard<'_> {
        SharedGuard::new(self)
    }

    /// Acquires exclusive access to this mutex.
    ///
    /// This is the same as calling [`ExclusiveGuard::new`].
    ///
    /// This function blocks until no thread holds shared or exclusive access. If the
    /// current thread holds shared access, this function never returns.
    ///
    /// # Panic
    ///
    /// Panics if the current thread already holds exclusive access. Exclusive access is
    /// not reentrant.
    ///
    /// # Example
    ///
    /// ```
    /// use shared_mutex::SharedMutex;
    ///
    /// let mutex = SharedMutex::default();
    /// let _writer = mutex.exclusive();
    /// // The writer can still read.
    /// let _reader = mutex.shared();
    /// ```
    #[inline]
    pub fn exclusive(&self) -> ExclusiveGuard<'_> {
        ExclusiveGuard::new(self)
    }

    #[cfg(test)]
    pub(crate) fn readers(&self) -> usize {
        self.shared.state.lock().readers
    }

    #[cfg(test)]
    pub(crate) fn set_readers(&self, readers: usize) {
        self.shared.state.lock().readers = readers;
    }

    #[cfg(test)]
    pub(crate) fn exclusive_owner(&self) -> Option<ExecutionUnit> {
        self.shared.state.lock().exclusive_owner
    }

    #[inline]
    pub(crate) fn addr(&self) -> *const u8 {
        let addr: *const Shared = &*self.shared;
        addr.cast()
    }
}

#[cold]
fn too_many_readers() -> ! {
    panic!("too many readers");
}

impl Debug for SharedMutex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedMutex")
            .field("id", &self.addr())
            .finish_non_exhaustive()
    }
}

impl PartialEq for SharedMutex {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq::<Shared>(&*self.shared, &*other.shared)
    }
}

impl Eq for SharedMutex {}
