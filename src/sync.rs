//! Synchronisation fabric shared by the game tasks.
//!
//! Binary signals and mutexes come straight from `embassy-sync`. The one
//! primitive embassy does not ship is an event-flag group: a word of flag
//! bits that tasks post to and pend on, either until *any* or until *all* of
//! a mask is set. A satisfied pend consumes the matched bits, so a second
//! waiter on the same condition does not fire again on a stale post.
//!
//! Flags are typed per group. A [`FlagSet<PhysicsEvent>`] can never be
//! tested against a feedback flag by accident.

use core::cell::RefCell;
use core::future::poll_fn;
use core::marker::PhantomData;
use core::task::Poll;

use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_sync::waitqueue::MultiWakerRegistration;

/// Raw mutex used by every primitive in the game: safe from interrupts and
/// across executors.
pub type RawMutex = CriticalSectionRawMutex;

/// Async mutex over a piece of shared state.
pub type Mutex<T> = embassy_sync::mutex::Mutex<RawMutex, T>;

/// Binary wake-up signal without payload.
pub type Wake = Signal<RawMutex, ()>;

/// Most tasks that may pend on one group at the same time.
const MAX_WAITERS: usize = 4;

/// A single flag of an event-flag group.
pub trait Flag: Copy + Eq {
    /// Bit position, below 32.
    fn bit(self) -> u8;

    fn mask(self) -> u32 {
        1 << self.bit()
    }
}

/// A set of flags of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSet<F> {
    bits: u32,
    _flag: PhantomData<F>,
}

impl<F: Flag> FlagSet<F> {
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    const fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            _flag: PhantomData,
        }
    }

    pub fn of(flags: &[F]) -> Self {
        flags.iter().fold(Self::empty(), |set, &flag| set.with(flag))
    }

    #[must_use]
    pub fn with(self, flag: F) -> Self {
        Self::from_bits(self.bits | flag.mask())
    }

    pub fn contains(self, flag: F) -> bool {
        self.bits & flag.mask() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub const fn bits(self) -> u32 {
        self.bits
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self::from_bits(self.bits & other.bits)
    }
}

impl<F: Flag> From<F> for FlagSet<F> {
    fn from(flag: F) -> Self {
        Self::empty().with(flag)
    }
}

impl<F: Flag> core::ops::BitOr<F> for FlagSet<F> {
    type Output = Self;

    fn bitor(self, flag: F) -> Self {
        self.with(flag)
    }
}

/// Wait condition for [`EventFlags::pend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pend {
    /// Satisfied as soon as one bit of the mask is set.
    Any,
    /// Satisfied once every bit of the mask is set.
    All,
}

struct FlagsState {
    bits: u32,
    waiters: MultiWakerRegistration<MAX_WAITERS>,
}

/// Event-flag group with consume-on-read pends.
pub struct EventFlags<F> {
    state: BlockingMutex<RawMutex, RefCell<FlagsState>>,
    _flag: PhantomData<F>,
}

impl<F: Flag> EventFlags<F> {
    pub const fn new() -> Self {
        Self {
            state: BlockingMutex::new(RefCell::new(FlagsState {
                bits: 0,
                waiters: MultiWakerRegistration::new(),
            })),
            _flag: PhantomData,
        }
    }

    /// Set one flag and wake the waiters.
    pub fn post(&self, flag: F) {
        self.update(0, flag.mask());
    }

    /// Set every flag of `set`.
    pub fn post_all(&self, set: FlagSet<F>) {
        self.update(0, set.bits());
    }

    /// Set `flag` and clear `opposite` in one step.
    ///
    /// Used for on/off pairs so a waiter that has not run yet only ever sees
    /// the most recent of the two.
    pub fn post_exclusive(&self, flag: F, opposite: F) {
        self.update(opposite.mask(), flag.mask());
    }

    /// Clear flags without waking anyone.
    pub fn clear(&self, set: FlagSet<F>) {
        self.state.lock(|state| state.borrow_mut().bits &= !set.bits());
    }

    /// Flags currently set, without consuming them.
    pub fn peek(&self) -> FlagSet<F> {
        FlagSet::from_bits(self.state.lock(|state| state.borrow().bits))
    }

    /// Non-blocking pend: consume and return the matched flags if `mode` is
    /// already satisfied for `mask`.
    pub fn try_pend(&self, mask: FlagSet<F>, mode: Pend) -> Option<FlagSet<F>> {
        self.state.lock(|state| Self::take(&mut state.borrow_mut(), mask, mode))
    }

    /// Wait until `mode` is satisfied for `mask`, consuming the matched flags.
    pub async fn pend(&self, mask: FlagSet<F>, mode: Pend) -> FlagSet<F> {
        poll_fn(|cx| {
            self.state.lock(|state| {
                let mut state = state.borrow_mut();
                match Self::take(&mut state, mask, mode) {
                    Some(matched) => Poll::Ready(matched),
                    None => {
                        state.waiters.register(cx.waker());
                        Poll::Pending
                    }
                }
            })
        })
        .await
    }

    fn update(&self, clear: u32, set: u32) {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();
            state.bits = (state.bits & !clear) | set;
            state.waiters.wake();
        });
    }

    fn take(state: &mut FlagsState, mask: FlagSet<F>, mode: Pend) -> Option<FlagSet<F>> {
        let matched = state.bits & mask.bits();
        let satisfied = match mode {
            Pend::Any => matched != 0,
            Pend::All => mask.bits() != 0 && matched == mask.bits(),
        };
        if !satisfied {
            return None;
        }
        state.bits &= !matched;
        Some(FlagSet::from_bits(matched))
    }
}

impl<F: Flag> Default for EventFlags<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embassy_futures::select::{
        Either,
        select,
    };

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Probe {
        A,
        B,
        C,
    }

    impl Flag for Probe {
        fn bit(self) -> u8 {
            self as u8
        }
    }

    #[test]
    fn pend_any_consumes_only_matched_bits() {
        let flags = EventFlags::<Probe>::new();
        flags.post(Probe::A);
        flags.post(Probe::C);

        let matched = block_on(flags.pend(FlagSet::of(&[Probe::A, Probe::B]), Pend::Any));
        assert!(matched.contains(Probe::A));
        assert!(!matched.contains(Probe::C));

        assert_eq!(flags.peek(), FlagSet::from(Probe::C));
        assert_eq!(flags.try_pend(Probe::A.into(), Pend::Any), None);
    }

    #[test]
    fn pend_all_waits_for_every_bit() {
        let flags = EventFlags::<Probe>::new();
        let mask = FlagSet::of(&[Probe::A, Probe::B]);

        flags.post(Probe::A);
        assert_eq!(flags.try_pend(mask, Pend::All), None);
        assert!(flags.peek().contains(Probe::A));

        flags.post(Probe::B);
        assert_eq!(flags.try_pend(mask, Pend::All), Some(mask));
        assert!(flags.peek().is_empty());
    }

    #[test]
    fn pending_waiter_wakes_on_post() {
        let flags = EventFlags::<Probe>::new();
        let waiter = flags.pend(Probe::B.into(), Pend::Any);
        let poster = async {
            flags.post(Probe::B);
            core::future::pending::<()>().await
        };
        match block_on(select(waiter, poster)) {
            Either::First(matched) => assert_eq!(matched, FlagSet::from(Probe::B)),
            Either::Second(()) => unreachable!(),
        }
    }

    #[test]
    fn exclusive_post_replaces_opposite() {
        let flags = EventFlags::<Probe>::new();
        flags.post(Probe::A);
        flags.post_exclusive(Probe::B, Probe::A);
        assert_eq!(flags.peek(), FlagSet::from(Probe::B));
    }

    #[test]
    fn consumed_flags_do_not_retrigger() {
        let flags = EventFlags::<Probe>::new();
        flags.post(Probe::A);
        assert!(flags.try_pend(Probe::A.into(), Pend::Any).is_some());
        assert!(flags.try_pend(Probe::A.into(), Pend::Any).is_none());
    }
}
