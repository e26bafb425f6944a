//! Effects with cleanup, memos, batching.
//!
//! An effect is a closure that re-runs whenever a signal it read changes.
//! Cleanups registered with [`on_cleanup`] during a run fire right before the
//! next run and when the effect is disposed, which is how a subscription
//! acquired inside an effect gets released:
//!
//! ```ignore
//! let (regions, set_regions) = create_signal(vec!["header"]);
//! create_effect(move || {
//!     let observed = regions.get();
//!     println!("observing {observed:?}");
//!     on_cleanup(move || println!("released"));
//! });
//! set_regions.set(vec!["header", "form"]); // prints "released", then "observing ..."
//! ```

use super::signal::{create_signal, schedule, EffectId, EffectState, ReadSignal, RUNTIME};

/// Create a side effect that auto-tracks signal reads.
///
/// The closure runs once immediately, then again whenever a tracked signal is
/// written. Returns the id to pass to [`dispose_effect`].
pub fn create_effect(f: impl FnMut() + 'static) -> EffectId {
    let eid = RUNTIME.with(|rt| {
        rt.borrow_mut().effects.insert(EffectState {
            callback: Some(Box::new(f)),
            dependencies: Vec::new(),
            cleanups: Vec::new(),
            disposed: false,
        })
    });
    run_effect(eid);
    eid
}

/// Register `f` to run before the current effect's next run or on disposal.
///
/// Outside of a running effect there is no owner to attach to, so `f` is
/// dropped without being called.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        if let Some(eid) = rt.observer {
            if let Some(effect) = rt.effects.get_mut(eid) {
                effect.cleanups.push(Box::new(f));
            }
        }
    });
}

/// Stop an effect: unsubscribe it and run its pending cleanups.
///
/// Disposing twice, or disposing an unknown id, is a no-op. Disposing an
/// effect from inside its own run defers removal until the run returns.
pub fn dispose_effect(eid: EffectId) {
    let cleanups = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        rt.unsubscribe(eid);
        rt.queue.retain(|queued| *queued != eid);
        let running = match rt.effects.get_mut(eid) {
            Some(state) if state.callback.is_none() => {
                state.disposed = true;
                true
            }
            Some(_) => false,
            None => return Vec::new(),
        };
        if running {
            return Vec::new();
        }
        rt.effects
            .remove(eid)
            .map(|state| state.cleanups)
            .unwrap_or_default()
    });
    for cleanup in cleanups {
        cleanup();
    }
}

/// Whether `eid` refers to a live (not disposed) effect.
pub fn is_effect_alive(eid: EffectId) -> bool {
    RUNTIME.with(|rt| {
        rt.borrow()
            .effects
            .get(eid)
            .is_some_and(|state| !state.disposed)
    })
}

/// Run one effect: release the previous run, then re-track and call it.
pub(crate) fn run_effect(eid: EffectId) {
    let taken = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        rt.unsubscribe(eid);
        let state = rt.effects.get_mut(eid)?;
        if state.disposed {
            return None;
        }
        let callback = state.callback.take()?;
        Some((callback, std::mem::take(&mut state.cleanups)))
    });
    let Some((mut callback, cleanups)) = taken else {
        return;
    };

    for cleanup in cleanups {
        cleanup();
    }

    let previous = RUNTIME.with(|rt| rt.borrow_mut().observer.replace(eid));
    callback();
    let late_cleanups = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        rt.observer = previous;
        let disposed = match rt.effects.get_mut(eid) {
            Some(state) if state.disposed => true,
            Some(state) => {
                state.callback = Some(callback);
                false
            }
            None => false,
        };
        if disposed {
            rt.unsubscribe(eid);
            rt.effects
                .remove(eid)
                .map(|state| state.cleanups)
                .unwrap_or_default()
        } else {
            Vec::new()
        }
    });
    for cleanup in late_cleanups {
        cleanup();
    }
}

/// Run `f` without subscribing the current effect to anything it reads.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    let previous = RUNTIME.with(|rt| rt.borrow_mut().observer.take());
    let out = f();
    RUNTIME.with(|rt| rt.borrow_mut().observer = previous);
    out
}

/// Create a memoised derived computation.
///
/// The returned signal only notifies its subscribers when the computed value
/// changes by `PartialEq`.
pub fn create_memo<T: Clone + PartialEq + 'static>(f: impl FnMut() -> T + 'static) -> ReadSignal<T> {
    create_owned_memo(f).0
}

/// Like [`create_memo`], but also returns the id of the effect that keeps the
/// memo current, so the owner can [`dispose_effect`] it.
pub fn create_owned_memo<T: Clone + PartialEq + 'static>(
    mut f: impl FnMut() -> T + 'static,
) -> (ReadSignal<T>, EffectId) {
    let initial = untrack(&mut f);
    let (read, write) = create_signal(initial);
    let eid = create_effect(move || {
        let next = f();
        if read.with_untracked(|current| *current != next) {
            write.set(next);
        }
    });
    (read, eid)
}

/// Group several writes so dependent effects run once, after `f` returns.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    RUNTIME.with(|rt| rt.borrow_mut().batch_depth += 1);
    let out = f();
    let outermost = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        rt.batch_depth -= 1;
        rt.batch_depth == 0
    });
    if outermost {
        schedule(Vec::new());
    }
    out
}

// ===========================================================================
// Tests
// ===========================================================================
