//! Access-discipline cells.
//!
//! Every shared variable in a scenario lives in a cell whose type names
//! the read/write contract it is raced under:
//!
//! - [`PlainCell`]: no ordering, no happens-before. Loads and stores are
//!   `Relaxed`, so the probe itself stays data-race free at the language
//!   level while providing none of the guarantees under test. A plain
//!   64-bit value is stored as two independent 32-bit halves and can tear.
//! - [`SyncCell`]: `Acquire` loads, `Release` stores. A load that
//!   observes a store establishes a happens-before edge; this is the
//!   primitive every ordering scenario is built from.
//! - [`ScCell`]: `SeqCst` on both sides. Used by the store-load families
//!   whose forbidden outcomes only a total store order rules out.
//! - [`GuardedCell`]: data owned by a mutex; the critical section is a
//!   closure run under the guard. Co-guarded state shares one cell.
//!
//! The discipline is part of the cell's type, so mixing disciplines on a
//! single location is a construction-time error rather than a runtime one.
//!
//! # Ordering rationale
//!
//! ```text
//! PlainCell:   store(Relaxed)            load(Relaxed)
//! SyncCell:    store(Release)  --sw-->   load(Acquire)
//! ScCell:      store(SeqCst)   --S-->    load(SeqCst)
//! GuardedCell: unlock          --sw-->   lock
//! ```

#[cfg(not(loom))]
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
#[cfg(not(loom))]
use std::sync::Mutex;

#[cfg(loom)]
use loom::sync::atomic::{AtomicU32, AtomicU64, Ordering};
#[cfg(loom)]
use loom::sync::Mutex;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Scalar types that can live in a racing cell.
///
/// The associated representations pin down what each discipline means at
/// a given width: a 32-bit scalar is a single machine word everywhere,
/// while a plain 64-bit scalar is two independent halves (see
/// [`SplitU64`]) and an ordered 64-bit scalar is one `AtomicU64`.
pub trait RaceWord:
    sealed::Sealed + Copy + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    #[doc(hidden)]
    type Plain: PlainRepr<Self>;
    #[doc(hidden)]
    type Ordered: OrderedRepr<Self>;
}

/// Storage for the plain discipline.
#[doc(hidden)]
pub trait PlainRepr<T>: Send + Sync {
    fn new(value: T) -> Self;
    fn load(&self) -> T;
    fn store(&self, value: T);
}

/// Storage for the ordered disciplines (acquire-release and SeqCst).
#[doc(hidden)]
pub trait OrderedRepr<T>: Send + Sync {
    fn new(value: T) -> Self;
    fn load(&self, order: Ordering) -> T;
    fn store(&self, value: T, order: Ordering);
}

impl RaceWord for u32 {
    type Plain = AtomicU32;
    type Ordered = AtomicU32;
}

impl RaceWord for u64 {
    type Plain = SplitU64;
    type Ordered = AtomicU64;
}

impl PlainRepr<u32> for AtomicU32 {
    fn new(value: u32) -> Self {
        AtomicU32::new(value)
    }

    fn load(&self) -> u32 {
        self.load(Ordering::Relaxed)
    }

    fn store(&self, value: u32) {
        self.store(value, Ordering::Relaxed);
    }
}

impl OrderedRepr<u32> for AtomicU32 {
    fn new(value: u32) -> Self {
        AtomicU32::new(value)
    }

    fn load(&self, order: Ordering) -> u32 {
        self.load(order)
    }

    fn store(&self, value: u32, order: Ordering) {
        self.store(value, order);
    }
}

impl OrderedRepr<u64> for AtomicU64 {
    fn new(value: u64) -> Self {
        AtomicU64::new(value)
    }

    fn load(&self, order: Ordering) -> u64 {
        self.load(order)
    }

    fn store(&self, value: u64, order: Ordering) {
        self.store(value, order);
    }
}

/// Plain 64-bit storage as two independent 32-bit halves.
///
/// Stores write the low half, then the high half, with no ordering
/// between the two. A concurrent load can observe halves from two
/// different writes - the torn read the plain discipline permits.
pub struct SplitU64 {
    hi: AtomicU32,
    lo: AtomicU32,
}

impl PlainRepr<u64> for SplitU64 {
    fn new(value: u64) -> Self {
        Self {
            hi: AtomicU32::new((value >> 32) as u32),
            lo: AtomicU32::new(value as u32),
        }
    }

    fn load(&self) -> u64 {
        let hi = self.hi.load(Ordering::Relaxed);
        let lo = self.lo.load(Ordering::Relaxed);
        (u64::from(hi) << 32) | u64::from(lo)
    }

    fn store(&self, value: u64) {
        self.lo.store(value as u32, Ordering::Relaxed);
        self.hi.store((value >> 32) as u32, Ordering::Relaxed);
    }
}

/// A variable raced under the plain discipline.
///
/// No visibility or ordering guarantee beyond the platform's natural
/// access granularity for each half-word. Probes worst-case absence of
/// guarantees; observing stale or torn values through this cell is an
/// expected outcome, not a defect.
pub struct PlainCell<T: RaceWord> {
    repr: T::Plain,
}

impl<T: RaceWord> PlainCell<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            repr: T::Plain::new(value),
        }
    }

    pub fn load(&self) -> T {
        self.repr.load()
    }

    pub fn store(&self, value: T) {
        self.repr.store(value);
    }
}

impl<T: RaceWord> Default for PlainCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A variable raced under the acquire-release discipline.
///
/// A load that observes a store through this cell orders everything
/// before the store (in the writer's program order) before everything
/// after the load (in the reader's program order).
pub struct SyncCell<T: RaceWord> {
    repr: T::Ordered,
}

impl<T: RaceWord> SyncCell<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            repr: T::Ordered::new(value),
        }
    }

    pub fn load(&self) -> T {
        self.repr.load(Ordering::Acquire)
    }

    pub fn store(&self, value: T) {
        self.repr.store(value, Ordering::Release);
    }
}

impl<T: RaceWord> Default for SyncCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A variable raced under the sequentially-consistent discipline.
///
/// All accesses through `ScCell`s participate in one total order. Only
/// the store-load scenario families need this: their forbidden outcomes
/// (both readers stale, a read running backward in the global order) are
/// legal under acquire-release alone.
pub struct ScCell<T: RaceWord> {
    repr: T::Ordered,
}

impl<T: RaceWord> ScCell<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            repr: T::Ordered::new(value),
        }
    }

    pub fn load(&self) -> T {
        self.repr.load(Ordering::SeqCst)
    }

    pub fn store(&self, value: T) {
        self.repr.store(value, Ordering::SeqCst);
    }
}

impl<T: RaceWord> Default for ScCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A variable raced under the mutex-guarded discipline.
///
/// Access is only possible inside [`GuardedCell::with`], which holds the
/// lock for the duration of the closure. At most one actor is inside the
/// section at a time, and section executions form a single total order.
/// State that must be updated atomically together belongs in one cell.
pub struct GuardedCell<T> {
    slot: Mutex<T>,
}

impl<T> GuardedCell<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            slot: Mutex::new(value),
        }
    }

    /// Run `section` as a critical section over the guarded value.
    pub fn with<R>(&self, section: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.slot.lock().unwrap();
        section(&mut guard)
    }
}

impl<T: Copy> GuardedCell<T> {
    /// Read the guarded value. Takes the lock.
    pub fn read(&self) -> T {
        self.with(|value| *value)
    }
}

impl<T: Default> Default for GuardedCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn plain_u32_roundtrip() {
        let cell = PlainCell::<u32>::new(7);
        assert_eq!(cell.load(), 7);
        cell.store(13);
        assert_eq!(cell.load(), 13);
    }

    #[test]
    fn plain_u64_roundtrip_both_halves() {
        let cell = PlainCell::<u64>::new(0);
        let value = (56u64 << 32) | 98;
        cell.store(value);
        assert_eq!(cell.load(), value);
        assert_eq!(cell.load() >> 32, 56);
        assert_eq!(cell.load() & 0xffff_ffff, 98);
    }

    #[test]
    fn sync_u64_roundtrip() {
        let cell = SyncCell::<u64>::new(u64::MAX);
        assert_eq!(cell.load(), u64::MAX);
        cell.store(1);
        assert_eq!(cell.load(), 1);
    }

    #[test]
    fn sc_cell_roundtrip() {
        let cell = ScCell::<u32>::default();
        assert_eq!(cell.load(), 0);
        cell.store(42);
        assert_eq!(cell.load(), 42);
    }

    #[test]
    fn guarded_cell_sections_compose() {
        let cell = GuardedCell::new(0u32);
        cell.with(|v| *v += 5);
        let doubled = cell.with(|v| {
            *v *= 2;
            *v
        });
        assert_eq!(doubled, 10);
        assert_eq!(cell.read(), 10);
    }
}
