//! Reactive runtime and the `ReadSignal` / `WriteSignal` pair.
//!
//! Single-threaded, synchronous, thread-local. A signal stores a value; reading
//! it while an effect runs subscribes that effect; writing it schedules every
//! subscriber. Scheduling is a FIFO queue that is flushed immediately unless a
//! batch or another flush is already in progress.

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifies a signal slot inside the runtime.
    pub struct SignalId;
    /// Identifies an effect slot inside the runtime.
    pub struct EffectId;
}

/// Upper bound on effect runs in a single flush. Exceeding it means effects
/// keep re-triggering each other.
const MAX_FLUSH_RUNS: usize = 10_000;

// ---------------------------------------------------------------------------
// Runtime internals
// ---------------------------------------------------------------------------

pub(crate) struct SignalState {
    value: Box<dyn Any>,
    /// Subscribed effects in subscription order.
    subscribers: Vec<EffectId>,
}

pub(crate) struct EffectState {
    /// Taken out while the effect runs so no runtime borrow is held across the
    /// user callback.
    pub(crate) callback: Option<Box<dyn FnMut()>>,
    pub(crate) dependencies: Vec<SignalId>,
    pub(crate) cleanups: Vec<Box<dyn FnOnce()>>,
    /// Set when the effect is disposed from inside its own run.
    pub(crate) disposed: bool,
}

pub(crate) struct Runtime {
    pub(crate) signals: SlotMap<SignalId, SignalState>,
    pub(crate) effects: SlotMap<EffectId, EffectState>,
    /// The effect currently executing; reads subscribe it.
    pub(crate) observer: Option<EffectId>,
    pub(crate) batch_depth: usize,
    pub(crate) queue: VecDeque<EffectId>,
    pub(crate) flushing: bool,
}

impl Runtime {
    fn new() -> Self {
        Self {
            signals: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            observer: None,
            batch_depth: 0,
            queue: VecDeque::new(),
            flushing: false,
        }
    }

    /// Remove `effect` from the subscriber lists of all its dependencies.
    pub(crate) fn unsubscribe(&mut self, effect: EffectId) {
        let deps = match self.effects.get_mut(effect) {
            Some(state) => std::mem::take(&mut state.dependencies),
            None => return,
        };
        for sid in deps {
            if let Some(signal) = self.signals.get_mut(sid) {
                signal.subscribers.retain(|e| *e != effect);
            }
        }
    }
}

thread_local! {
    pub(crate) static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

/// Drop every signal and effect on this thread without running cleanups.
#[cfg(test)]
pub(crate) fn reset_runtime() {
    RUNTIME.with(|rt| *rt.borrow_mut() = Runtime::new());
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

/// Queue `effects` and flush unless a batch or flush is already running.
pub(crate) fn schedule(effects: Vec<EffectId>) {
    let should_flush = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        for eid in effects {
            if !rt.queue.contains(&eid) {
                rt.queue.push_back(eid);
            }
        }
        if rt.batch_depth == 0 && !rt.flushing && !rt.queue.is_empty() {
            rt.flushing = true;
            true
        } else {
            false
        }
    });
    if should_flush {
        flush();
    }
}

/// Run queued effects until the queue is empty.
pub(crate) fn flush() {
    let mut runs = 0usize;
    loop {
        let next = RUNTIME.with(|rt| rt.borrow_mut().queue.pop_front());
        let Some(eid) = next else { break };
        runs += 1;
        if runs > MAX_FLUSH_RUNS {
            tracing::warn!(runs, "reactive flush aborted, effects keep re-triggering");
            RUNTIME.with(|rt| rt.borrow_mut().queue.clear());
            break;
        }
        super::effect::run_effect(eid);
    }
    RUNTIME.with(|rt| rt.borrow_mut().flushing = false);
}

// ---------------------------------------------------------------------------
// Signal creation
// ---------------------------------------------------------------------------

/// Create a reactive signal with the given initial value.
///
/// Returns a `(ReadSignal<T>, WriteSignal<T>)` pair. Both halves are `Copy`.
pub fn create_signal<T: 'static>(initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
    let id = RUNTIME.with(|rt| {
        rt.borrow_mut().signals.insert(SignalState {
            value: Box::new(initial),
            subscribers: Vec::new(),
        })
    });
    (
        ReadSignal { id, _marker: PhantomData },
        WriteSignal { id, _marker: PhantomData },
    )
}

// ---------------------------------------------------------------------------
// ReadSignal
// ---------------------------------------------------------------------------

/// Read-half of a signal.
pub struct ReadSignal<T: 'static> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for ReadSignal<T> {}
impl<T: 'static> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadSignal").field("id", &self.id).finish()
    }
}

impl<T: 'static> ReadSignal<T> {
    /// Read the current value, subscribing the running effect (if any).
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Read by reference, subscribing the running effect (if any).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        RUNTIME.with(|rt| {
            let mut guard = rt.borrow_mut();
            let rt = &mut *guard;
            if let Some(eid) = rt.observer {
                let alive = rt.effects.contains_key(eid);
                if let (true, Some(signal)) = (alive, rt.signals.get_mut(self.id)) {
                    if !signal.subscribers.contains(&eid) {
                        signal.subscribers.push(eid);
                    }
                    if let Some(effect) = rt.effects.get_mut(eid) {
                        if !effect.dependencies.contains(&self.id) {
                            effect.dependencies.push(self.id);
                        }
                    }
                }
            }
        });
        self.with_untracked(f)
    }

    /// Read without cloning or subscribing.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        RUNTIME.with(|rt| {
            let rt = rt.borrow();
            let value = rt
                .signals
                .get(self.id)
                .expect("signal read after its runtime was reset")
                .value
                .downcast_ref::<T>()
                .expect("signal type mismatch");
            f(value)
        })
    }

    /// Read a clone without subscribing.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.with_untracked(T::clone)
    }
}

// ---------------------------------------------------------------------------
// WriteSignal
// ---------------------------------------------------------------------------

/// Write-half of a signal.
pub struct WriteSignal<T: 'static> {
    id: SignalId,
    _marker: PhantomData<fn(T)>,
}

impl<T: 'static> Copy for WriteSignal<T> {}
impl<T: 'static> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteSignal").field("id", &self.id).finish()
    }
}

impl<T: 'static> WriteSignal<T> {
    /// Overwrite the value and notify subscribers.
    ///
    /// The old value is dropped after the runtime borrow is released, so a
    /// value whose `Drop` touches signals is safe to replace.
    pub fn set(&self, value: T) {
        let (old, subs) = RUNTIME.with(|rt| {
            let mut rt = rt.borrow_mut();
            let signal = rt
                .signals
                .get_mut(self.id)
                .expect("signal written after its runtime was reset");
            let old = std::mem::replace(&mut signal.value, Box::new(value));
            (old, signal.subscribers.clone())
        });
        drop(old);
        schedule(subs);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let subs = RUNTIME.with(|rt| {
            let mut rt = rt.borrow_mut();
            let signal = rt
                .signals
                .get_mut(self.id)
                .expect("signal written after its runtime was reset");
            let value = signal
                .value
                .downcast_mut::<T>()
                .expect("signal type mismatch");
            f(value);
            signal.subscribers.clone()
        });
        schedule(subs);
    }

    /// Replace the value without notifying anyone.
    pub fn set_untracked(&self, value: T) {
        let old = RUNTIME.with(|rt| {
            let mut rt = rt.borrow_mut();
            let signal = rt
                .signals
                .get_mut(self.id)
                .expect("signal written after its runtime was reset");
            std::mem::replace(&mut signal.value, Box::new(value))
        });
        drop(old);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
