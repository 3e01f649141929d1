//! This crate provides the [`SharedMutex`] type, a reader-writer lock whose writer may
//! also read, together with the [`SharedGuard`] and [`ExclusiveGuard`] access tokens.
//!
//! # Motivation
//!
//! A common pattern is a resource that is read by many threads and occasionally
//! modified. Code that modifies the resource often calls helper functions that only need
//! read access:
//!
//! ```
//! use shared_mutex::{SharedGuard, SharedMutex};
//!
//! fn inspect(mutex: &SharedMutex) {
//!     let _reader = SharedGuard::new(mutex);
//!     // read the resource
//! }
//!
//! fn modify(mutex: &SharedMutex) {
//!     let _writer = mutex.exclusive();
//!     // modify the resource
//!     inspect(mutex);
//! }
//!
//! let mutex = SharedMutex::default();
//! modify(&mutex);
//! inspect(&mutex);
//! ```
//!
//! With a regular reader-writer lock such as [`std::sync::RwLock`], the call to
//! `inspect` inside of `modify` would deadlock. [`SharedMutex`] instead allows the
//! thread holding exclusive access to acquire shared access without blocking.
//!
//! # Semantics
//!
//! - Any number of threads can hold shared access at the same time as long as no thread
//!   holds exclusive access.
//! - At most one thread holds exclusive access. While it does, no other thread can hold
//!   shared or exclusive access.
//! - The thread holding exclusive access can acquire any number of [`SharedGuard`]s.
//! - Exclusive access is not reentrant. Acquiring exclusive access on a thread that
//!   already holds it panics. Acquiring exclusive access on a thread that holds shared
//!   access never returns.
//! - Acquisition cannot time out and cannot be cancelled.
//!
//! # Fairness
//!
//! There is no ordering between waiting threads. When the last reader releases its
//! access, a single waiting thread is woken. When the writer releases its access, all
//! waiting threads are woken and race for the lock. A steady stream of overlapping
//! readers can therefore starve a writer indefinitely.
//!
//! # Guards
//!
//! Both guard types are scoped: dropping a guard releases the access it holds, including
//! during unwinding. A guard can temporarily give up its access with `unlock` and
//! re-acquire it with `lock`. Both operations are idempotent and only affect the state of
//! the mutex once.
//!
//! Guards cannot be sent to other threads. Access is always released by the thread that
//! acquired it.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events at the `trace` level whenever a thread has to wait
//! for access and whenever access is released in a way that wakes waiting threads.

pub use {
    guard::{ExclusiveGuard, SharedGuard},
    mutex::SharedMutex,
};

mod execution_unit;
mod guard;
mod mutex;
