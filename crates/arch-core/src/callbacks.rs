//! Read interception for instrumentation layers.
//!
//! Observers run in registration order right before a gated read returns.
//! Each one sees the pending target and value and may replace the value; the
//! store itself is never mutated. Writes are never gated.
//!
//! A read of a target whose observers are already running bypasses the gate
//! and returns the raw stored value. The in-flight set lives in the gate, so
//! the guard is scoped to one CPU instance.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;

use log::trace;

use crate::{ArchError, ConcreteValue, MemoryAccess, RegisterId, Result};

/// Slot being read through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ReadTarget {
    /// One or more memory bytes.
    Memory(MemoryAccess),
    /// A register or alias, by id.
    Register(RegisterId),
}

/// Handle returned when an observer is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Boxed read observer receiving the owning context.
pub type ReadObserver<C> = Box<dyn Fn(&C, &ReadTarget, &mut ConcreteValue) + Send>;

/// Ordered observer list plus the per-slot reentrancy guard.
pub struct CallbackGate<C> {
    observers: Vec<(ObserverId, ReadObserver<C>)>,
    next_id: u64,
    in_flight: RefCell<BTreeSet<ReadTarget>>,
}

impl<C> Default for CallbackGate<C> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
            in_flight: RefCell::new(BTreeSet::new()),
        }
    }
}

impl<C> fmt::Debug for CallbackGate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackGate")
            .field("observers", &self.observers.len())
            .field("in_flight", &self.in_flight.borrow().len())
            .finish()
    }
}

impl<C> CallbackGate<C> {
    /// Creates a gate with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an observer; it runs after every observer registered before it.
    pub fn register<F>(&mut self, observer: F) -> ObserverId
    where
        F: Fn(&C, &ReadTarget, &mut ConcreteValue) + Send + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        trace!("read observer {} registered", id.0);
        id
    }

    /// Unregisters one observer.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] when `id` is not registered.
    pub fn remove(&mut self, id: ObserverId) -> Result<()> {
        let position = self
            .observers
            .iter()
            .position(|(registered, _)| *registered == id)
            .ok_or_else(|| ArchError::NotFound(format!("read observer {}", id.0)))?;
        drop(self.observers.remove(position));
        trace!("read observer {} removed", id.0);
        Ok(())
    }

    /// Unregisters every observer.
    pub fn clear(&mut self) {
        self.observers.clear();
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// `true` when no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// `true` while observers for `target` are running.
    #[must_use]
    pub fn is_in_flight(&self, target: &ReadTarget) -> bool {
        self.in_flight.borrow().contains(target)
    }

    /// Runs every observer over `raw` and returns the final value.
    ///
    /// Reentrant reads of a target already in flight get `raw` back untouched.
    pub fn run(&self, context: &C, target: ReadTarget, raw: ConcreteValue) -> ConcreteValue {
        if self.observers.is_empty() {
            return raw;
        }
        let Some(_guard) = InFlight::enter(&self.in_flight, target) else {
            return raw;
        };

        let mut value = raw;
        for (_, observer) in &self.observers {
            observer(context, &target, &mut value);
        }
        value
    }
}

struct InFlight<'a> {
    slots: &'a RefCell<BTreeSet<ReadTarget>>,
    target: ReadTarget,
}

impl<'a> InFlight<'a> {
    fn enter(slots: &'a RefCell<BTreeSet<ReadTarget>>, target: ReadTarget) -> Option<Self> {
        slots
            .borrow_mut()
            .insert(target)
            .then_some(Self { slots, target })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.slots.borrow_mut().remove(&self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::{CallbackGate, ReadTarget};
    use crate::{ArchError, Architecture, ConcreteValue, MemoryAccess, RegisterId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Context;

    fn byte(address: u64) -> ReadTarget {
        ReadTarget::Memory(MemoryAccess::new(address, 1))
    }

    #[test]
    fn empty_gate_is_transparent() {
        let gate: CallbackGate<Context> = CallbackGate::new();
        let value = gate.run(&Context, byte(0), ConcreteValue::from(7u8));
        assert_eq!(value, ConcreteValue::from(7u8));
        assert!(gate.is_empty());
    }

    #[test]
    fn observers_run_in_registration_order() {
        let mut gate: CallbackGate<Context> = CallbackGate::new();
        gate.register(|_, _, value| *value = &*value * 2u8);
        gate.register(|_, _, value| *value = &*value + 1u8);

        let value = gate.run(&Context, byte(0), ConcreteValue::from(5u8));
        assert_eq!(value, ConcreteValue::from(11u8));
    }

    #[test]
    fn observers_see_the_target() {
        let mut gate: CallbackGate<Context> = CallbackGate::new();
        gate.register(|_, target, value| {
            if *target == ReadTarget::Register(RegisterId::new(Architecture::X86, 3)) {
                *value = ConcreteValue::from(0xAAu8);
            }
        });

        let register = gate.run(
            &Context,
            ReadTarget::Register(RegisterId::new(Architecture::X86, 3)),
            ConcreteValue::from(1u8),
        );
        let other = gate.run(&Context, byte(3), ConcreteValue::from(1u8));
        assert_eq!(register, ConcreteValue::from(0xAAu8));
        assert_eq!(other, ConcreteValue::from(1u8));
    }

    #[test]
    fn removed_observers_stop_running() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut gate: CallbackGate<Context> = CallbackGate::new();
        let counter = Arc::clone(&calls);
        let id = gate.register(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        gate.run(&Context, byte(0), ConcreteValue::from(0u8));
        gate.remove(id).expect("registered");
        // The closure and its captured counter are released on removal.
        assert_eq!(Arc::strong_count(&calls), 1);
        gate.run(&Context, byte(0), ConcreteValue::from(0u8));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(gate.remove(id), Err(ArchError::NotFound(_))));
    }

    #[test]
    fn guard_is_released_after_run() {
        let mut gate: CallbackGate<Context> = CallbackGate::new();
        gate.register(|_, _, _| {});
        gate.run(&Context, byte(9), ConcreteValue::from(0u8));
        assert!(!gate.is_in_flight(&byte(9)));
        assert_eq!(format!("{gate:?}"), "CallbackGate { observers: 1, in_flight: 0 }");
    }
}
