//! Reactive state: signals, effects with cleanup, memos.
//!
//! - [`create_signal`]: create a read/write signal pair.
//! - [`create_effect`]: auto-tracking side effect; [`on_cleanup`] releases
//!   whatever a run acquired.
//! - [`create_memo`]: cached derived computation; [`create_owned_memo`] also
//!   returns its effect id for disposal.
//! - [`batch`]: coalesce multiple writes into one notification pass.

pub mod effect;
pub mod signal;

pub use effect::{
    batch, create_effect, create_memo, create_owned_memo, dispose_effect, is_effect_alive,
    on_cleanup, untrack,
};
pub use signal::{create_signal, EffectId, ReadSignal, SignalId, WriteSignal};
