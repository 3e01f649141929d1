use {
    crate::mutex::SharedMutex,
    opera::PhantomNotSend,
    static_assertions::assert_not_impl_any,
    std::fmt::{Debug, Formatter},
};


/// Shared access to a [`SharedMutex`].
///
/// This object is created by calling [`SharedGuard::new`] or [`SharedMutex::shared`].
///
/// Any number of threads can hold shared access at the same time as long as no thread
/// holds exclusive access. The thread holding exclusive access can additionally hold
/// shared access.
///
/// The guard can give up its access with [`SharedGuard::unlock`] and re-acquire it with
/// [`SharedGuard::lock`]. Both functions are idempotent. Dropping the guard gives up the
/// access if it is held.
///
/// # Example
///
/// ```
/// use shared_mutex::{SharedGuard, SharedMutex};
///
/// let mutex = SharedMutex::default();
/// let mut guard = SharedGuard::new(&mutex);
/// guard.unlock();
/// guard.lock();
/// ```
pub struct SharedGuard<'a> {
    mutex: &'a SharedMutex,
    held: bool,
    _phantom_not_send: PhantomNotSend,
}

/// Exclusive access to a [`SharedMutex`].
///
/// This object is created by calling [`ExclusiveGuard::new`] or
/// [`SharedMutex::exclusive`].
///
/// While a thread holds exclusive access, no other thread can hold shared or exclusive
/// access. The owning thread itself can acquire shared access without blocking.
///
/// Exclusive access is not reentrant. Acquiring exclusive access on a thread that
/// already holds it panics.
///
/// The guard can give up its access with [`ExclusiveGuard::unlock`] and re-acquire it
/// with [`ExclusiveGuard::lock`]. Both functions are idempotent. Dropping the guard gives
/// up the access if it is held.
///
/// # Example
///
/// ```
/// use shared_mutex::{ExclusiveGuard, SharedMutex};
///
/// let mutex = SharedMutex::default();
/// let mut guard = ExclusiveGuard::new(&mutex);
/// guard.unlock();
/// guard.lock();
/// ```
pub struct ExclusiveGuard<'a> {
    mutex: &'a SharedMutex,
    held: bool,
    _phantom_not_send: PhantomNotSend,
}

assert_not_impl_any!(SharedGuard<'_>: Send);
assert_not_impl_any!(ExclusiveGuard<'_>: Send);

impl<'a> SharedGuard<'a> {
    /// Acquires shared access to the mutex.
    ///
    /// If another thread holds exclusive access, then this function blocks until that
    /// access has been released. There is no bound on the waiting time and no ordering
    /// between waiting threads.
    ///
    /// # Example
    ///
    /// ```
    /// use std::thread;
    /// use shared_mutex::{SharedGuard, SharedMutex};
    ///
    /// let mutex = SharedMutex::default();
    /// let _guard = SharedGuard::new(&mutex);
    ///
    /// thread::scope(|scope| {
    ///     scope.spawn(|| {
    ///         // Readers don't block each other.
    ///         let _guard = SharedGuard::new(&mutex);
    ///     });
    /// });
    /// ```
    #[inline]
    pub fn new(mutex: &'a SharedMutex) -> Self {
        let mut guard = Self {
            mutex,
            held: false,
            _phantom_not_send: Default::default(),
        };
        guard.lock();
        guard
    }

    /// Re-acquires shared access if it is not held.
    ///
    /// This function does nothing if the guard already holds shared access. Otherwise
    /// it blocks like [`SharedGuard::new`].
    ///
    /// # Example
    ///
    /// ```
    /// use shared_mutex::SharedMutex;
    ///
    /// let mutex = SharedMutex::default();
    /// let mut guard = mutex.shared();
    /// // Already held, nothing happens.
    /// guard.lock();
    /// guard.unlock();
    /// guard.lock();
    /// ```
    #[inline]
    pub fn lock(&mut self) {
        if !self.held {
            self.mutex.acquire_shared();
            self.held = true;
        }
    }

    /// Gives up shared access if it is held.
    ///
    /// This function does nothing if the guard does not hold shared access.
    ///
    /// # Example
    ///
    /// ```
    /// use shared_mutex::{SharedGuard, SharedMutex};
    ///
    /// let mutex = SharedMutex::default();
    /// let mut guard = SharedGuard::new(&mutex);
    /// guard.unlock();
    /// guard.unlock();
    /// // No readers are left, so exclusive access is available.
    /// let _writer = mutex.exclusive();
    /// ```
    #[inline]
    pub fn unlock(&mut self) {
        if self.held {
            self.held = false;
            self.mutex.release_shared();
        }
    }
}

impl Drop for SharedGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.unlock();
    }
}

impl Debug for SharedGuard<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedGuard")
            .field("mutex_id", &self.mutex.addr())
            .field("held", &self.held)
            .finish_non_exhaustive()
    }
}

impl<'a> ExclusiveGuard<'a> {
    /// Acquires exclusive access to the mutex.
    ///
    /// This function blocks until no thread holds shared or exclusive access. There is
    /// no bound on the waiting time and no ordering between waiting threads.
    ///
    /// If the current thread holds shared access to the same mutex, this function never
    /// returns.
    ///
    /// # Panic
    ///
    /// Panics if the current thread already holds exclusive access to the mutex.
    ///
    /// # Example
    ///
    /// ```
    /// use shared_mutex::{ExclusiveGuard, SharedGuard, SharedMutex};
    ///
    /// let mutex = SharedMutex::default();
    /// let _writer = ExclusiveGuard::new(&mutex);
    /// // Reentrant read access for the writer.
    /// let _reader = SharedGuard::new(&mutex);
    /// ```
    #[inline]
    pub fn new(mutex: &'a SharedMutex) -> Self {
        let mut guard = Self {
            mutex,
            held: false,
            _phantom_not_send: Default::default(),
        };
        guard.lock();
        guard
    }

    /// Re-acquires exclusive access if it is not held.
    ///
    /// This function does nothing if the guard already holds exclusive access.
    /// Otherwise it blocks and panics like [`ExclusiveGuard::new`].
    ///
    /// # Example
    ///
    /// ```
    /// use shared_mutex::SharedMutex;
    ///
    /// let mutex = SharedMutex::default();
    /// let mut guard = mutex.exclusive();
    /// // Already held, so this does not panic.
    /// guard.lock();
    /// guard.unlock();
    /// guard.lock();
    /// ```
    #[inline]
    pub fn lock(&mut self) {
        if !self.held {
            self.mutex.acquire_exclusive();
            self.held = true;
        }
    }

    /// Gives up exclusive access if it is held.
    ///
    /// This function does nothing if the guard does not hold exclusive access.
    ///
    /// # Example
    ///
    /// ```
    /// use std::thread;
    /// use shared_mutex::{ExclusiveGuard, SharedMutex};
    ///
    /// let mutex = SharedMutex::default();
    /// let mut guard = ExclusiveGuard::new(&mutex);
    /// guard.unlock();
    ///
    /// thread::scope(|scope| {
    ///     scope.spawn(|| {
    ///         let _guard = ExclusiveGuard::new(&mutex);
    ///     });
    /// });
    /// ```
    #[inline]
    pub fn unlock(&mut self) {
        if self.held {
            self.held = false;
            self.mutex.release_exclusive();
        }
    }
}

impl Drop for ExclusiveGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.unlock();
    }
}

impl Debug for ExclusiveGuard<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExclusiveGuard")
            .field("mutex_id", &self.mutex.addr())
            .field("held", &self.held)
            .finish_non_exhaustive()
    }
}
