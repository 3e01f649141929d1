use std::{
    fmt::{Debug, Formatter},
    num::NonZeroUsize,
};


/// The identity of an execution unit.
///
/// At any time, an execution unit is either active or inactive. It is active if there is
/// a thread for which [`ExecutionUnit::current`] returns it and inactive otherwise.
///
/// If there are two threads for which [`ExecutionUnit::current`] returns the same value,
/// then the termination of one of the threads happens before the start of the other
/// thread.
///
/// # Informal explanation
///
/// An execution unit is morally a single thread except that it might span across multiple
/// threads that are connected by a happens-before relationship.
///
/// For the exclusive owner of a [`SharedMutex`](crate::SharedMutex) this only matters if
/// a thread leaks its [`ExclusiveGuard`](crate::ExclusiveGuard) and terminates. A thread
/// started afterwards might then re-use the thread-local storage and be treated as the
/// owner. The monitor is wedged in that situation anyway.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) struct ExecutionUnit(NonZeroUsize);

impl ExecutionUnit {
    /// Returns the current execution unit.
    #[inline(always)]
    pub(crate) fn current() -> Self {
        thread_local!(static EXECUTION_UNIT: u8 = const { 0 });
        EXECUTION_UNIT.with(|unit| {
            let addr: *const u8 = unit;
            match NonZeroUsize::new(addr as usize) {
                Some(id) => Self(id),
                None => unreachable!("thread-local storage at address 0"),
            }
        })
    }
}

impl Debug for ExecutionUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExecutionUnit({:#x})", self.0.get())
    }
}
