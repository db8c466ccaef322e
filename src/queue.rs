//! Button event queues between the edge watchers and the input task.
//!
//! Each button has its own bounded FIFO. Both live behind one
//! critical-section mutex so the input task can take "one event from each"
//! as a single atomic step, and the producer side never blocks.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;
use heapless::Deque;

use crate::config::{
    BUTTON_QUEUE_CAPACITY,
    BUTTON_SETTLE_MS,
};
use crate::state::{
    Button,
    ButtonState,
};
use crate::sync::{
    RawMutex,
    Wake,
};

/// A push hit a full queue; the event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull;

/// Bounded FIFO of button levels.
#[derive(Debug, Clone)]
pub struct ButtonQueue {
    events: Deque<ButtonState, BUTTON_QUEUE_CAPACITY>,
}

impl ButtonQueue {
    pub const fn new() -> Self {
        Self { events: Deque::new() }
    }

    /// Append a level. O(1); fails without touching the queue when full.
    pub fn push(&mut self, state: ButtonState) -> Result<(), QueueFull> {
        self.events.push_back(state).map_err(|_| QueueFull)
    }

    /// Oldest level, or `None` when nothing changed since the last pop.
    pub fn pop(&mut self) -> Option<ButtonState> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for ButtonQueue {
    fn default() -> Self {
        Self::new()
    }
}

struct Queues {
    railgun: ButtonQueue,
    shield: ButtonQueue,
}

impl Queues {
    fn get(&mut self, button: Button) -> &mut ButtonQueue {
        match button {
            Button::Railgun => &mut self.railgun,
            Button::Shield => &mut self.shield,
        }
    }
}

/// Both button queues plus the signal that wakes the input task.
pub struct ButtonInbox {
    queues: BlockingMutex<RawMutex, RefCell<Queues>>,
    wake: Wake,
}

impl ButtonInbox {
    pub const fn new() -> Self {
        Self {
            queues: BlockingMutex::new(RefCell::new(Queues {
                railgun: ButtonQueue::new(),
                shield: ButtonQueue::new(),
            })),
            wake: Wake::new(),
        }
    }

    /// Producer side: queue a level and wake the consumer.
    ///
    /// The consumer is woken even when the event was dropped, so it can drain
    /// what is already queued.
    pub fn record(&self, button: Button, state: ButtonState) -> Result<(), QueueFull> {
        let pushed = self.queues.lock(|queues| queues.borrow_mut().get(button).push(state));
        self.wake.signal(());
        pushed
    }

    /// Pop one level from each queue in a single critical section.
    pub fn pop_pair(&self) -> (Option<ButtonState>, Option<ButtonState>) {
        self.queues.lock(|queues| {
            let mut queues = queues.borrow_mut();
            (queues.railgun.pop(), queues.shield.pop())
        })
    }

    /// Pop one level from a single queue.
    pub fn pop(&self, button: Button) -> Option<ButtonState> {
        self.queues.lock(|queues| queues.borrow_mut().get(button).pop())
    }

    /// Drop every queued event.
    pub fn clear(&self) {
        self.queues.lock(|queues| {
            let mut queues = queues.borrow_mut();
            queues.railgun.clear();
            queues.shield.clear();
        });
        self.wake.reset();
    }

    pub fn pending(&self, button: Button) -> usize {
        self.queues.lock(|queues| queues.borrow_mut().get(button).len())
    }

    /// Wait for the next recorded event.
    pub async fn wait(&self) {
        self.wake.wait().await;
    }
}

impl Default for ButtonInbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Edge watcher for one active-low button: the interrupt-side producer.
///
/// Waits for any edge, lets the contact settle, then records the level. A
/// full queue drops the event with a warning.
pub async fn watch_button<P>(mut pin: P, button: Button, inbox: &ButtonInbox) -> !
where
    P: InputPin + Wait,
{
    loop {
        if pin.wait_for_any_edge().await.is_err() {
            warn!("button edge wait failed");
            continue;
        }
        embassy_time::Timer::after_millis(BUTTON_SETTLE_MS).await;

        let state = match pin.is_low() {
            Ok(true) => ButtonState::Pressed,
            Ok(false) => ButtonState::Released,
            Err(_) => {
                warn!("button level read failed");
                continue;
            }
        };
        trace!("button {} -> {}", button, state);

        if inbox.record(button, state).is_err() {
            warn!("button queue full, dropped {}", state);
        }
    }
}
