use {
    crate::{SharedMutex, execution_unit::ExecutionUnit},
    std::{
        panic::{self, AssertUnwindSafe},
        thread,
    },
};

fn assert_default(mutex: &SharedMutex) {
    assert_eq!(mutex.readers(), 0);
    assert_eq!(mutex.exclusive_owner(), None);
}

fn run_in_thread<T: Send>(f: impl FnOnce() -> T + Send) -> T {
    thread::scope(|s| s.spawn(|| f()).join().unwrap())
}

#[test]
fn default() {
    let mutex = SharedMutex::default();
    assert_default(&mutex);
}

#[test]
fn new() {
    let mutex = SharedMutex::new();
    assert_default(&mutex);
}

#[test]
fn acquire_release_shared() {
    let mutex = SharedMutex::default();
    mutex.acquire_shared();
    assert_eq!(mutex.readers(), 1);
    mutex.acquire_shared();
    assert_eq!(mutex.readers(), 2);
    run_in_thread(|| {
        mutex.acquire_shared();
        assert_eq!(mutex.readers(), 3);
        mutex.release_shared();
    });
    assert_eq!(mutex.readers(), 2);
    mutex.release_shared();
    mutex.release_shared();
    assert_default(&mutex);
}

#[test]
fn acquire_release_exclusive() {
    let mutex = SharedMutex::default();
    mutex.acquire_exclusive();
    assert_eq!(mutex.exclusive_owner(), Some(ExecutionUnit::current()));
    assert_eq!(mutex.readers(), 0);
    mutex.release_exclusive();
    assert_default(&mutex);
    run_in_thread(|| {
        mutex.acquire_exclusive();
        assert_eq!(mutex.exclusive_owner(), Some(ExecutionUnit::current()));
        mutex.release_exclusive();
    });
    assert_default(&mutex);
}

#[test]
fn owner_reads_while_exclusive() {
    let mutex = SharedMutex::default();
    mutex.acquire_exclusive();
    mutex.acquire_shared();
    mutex.acquire_shared();
    assert_eq!(mutex.readers(), 2);
    assert_eq!(mutex.exclusive_owner(), Some(ExecutionUnit::current()));
    mutex.release_shared();
    mutex.release_shared();
    assert_eq!(mutex.exclusive_owner(), Some(ExecutionUnit::current()));
    mutex.release_exclusive();
    assert_default(&mutex);
}

#[test]
fn exclusive_released_before_shared() {
    let mutex = SharedMutex::default();
    mutex.acquire_exclusive();
    mutex.acquire_shared();
    mutex.release_exclusive();
    assert_eq!(mutex.readers(), 1);
    assert_eq!(mutex.exclusive_owner(), None);
    run_in_thread(|| {
        mutex.acquire_shared();
        assert_eq!(mutex.readers(), 2);
        mutex.release_shared();
    });
    mutex.release_shared();
    assert_default(&mutex);
}

#[test]
#[should_panic(expected = "exclusive access is not reentrant")]
fn nested_exclusive() {
    let mutex = SharedMutex::default();
    mutex.acquire_exclusive();
    mutex.acquire_exclusive();
}

#[test]
fn nested_exclusive_keeps_owner() {
    let mutex = SharedMutex::default();
    mutex.acquire_exclusive();
    let res = panic::catch_unwind(AssertUnwindSafe(|| mutex.acquire_exclusive()));
    assert!(res.is_err());
    assert_eq!(mutex.exclusive_owner(), Some(ExecutionUnit::current()));
    mutex.release_exclusive();
    assert_default(&mutex);
    run_in_thread(|| {
        mutex.acquire_exclusive();
        mutex.release_exclusive();
    });
}

#[test]
fn too_many_readers() {
    let mutex = SharedMutex::default();
    mutex.set_readers(usize::MAX);
    let res = panic::catch_unwind(AssertUnwindSafe(|| mutex.acquire_shared()));
    let payload = res.unwrap_err();
    let msg = match payload.downcast_ref::<&str>() {
        Some(msg) => msg.to_string(),
        None => payload.downcast_ref::<String>().cloned().unwrap_or_default(),
    };
    assert_eq!(msg, "too many readers");
    assert_eq!(mutex.readers(), usize::MAX);
    assert_eq!(mutex.exclusive_owner(), None);
    mutex.set_readers(0);
    mutex.acquire_exclusive();
    assert_eq!(mutex.exclusive_owner(), Some(ExecutionUnit::current()));
    mutex.release_exclusive();
    mutex.acquire_shared();
    assert_eq!(mutex.readers(), 1);
    mutex.release_shared();
    assert_default(&mutex);
}

#[test]
fn clone_eq() {
    let mutex1 = SharedMutex::default();
    let mutex2 = SharedMutex::default();
    let clone = mutex1.clone();
    assert_eq!(mutex1, mutex1);
    assert_eq!(mutex1, clone);
    assert_ne!(mutex1, mutex2);
    assert_ne!(clone, mutex2);
    clone.acquire_shared();
    assert_eq!(mutex1.readers(), 1);
    assert_eq!(mutex2.readers(), 0);
    mutex1.release_shared();
    assert_default(&clone);
}

#[test]
fn debug() {
    let mutex = SharedMutex::default();
    let debug = format!("{:?}", mutex);
    assert!(debug.starts_with("SharedMutex { id: "));
    assert_eq!(debug, format!("{:?}", mutex.clone()));
}
