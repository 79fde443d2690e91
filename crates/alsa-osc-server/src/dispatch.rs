//! Message dispatch policy
//!
//! The route table only knows how to apply a matched message. This layer
//! decides what happens around it: unmapped addresses are ignored, malformed
//! arguments and actuator failures are logged, and everything is counted.

use alsa_osc_core::{Actuator, Error, RouteTable, Value};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of dispatching one message
#[derive(Debug)]
pub enum Dispatch {
    /// Exactly one actuator call succeeded
    Routed,
    /// No route for the address
    Unmapped,
    /// Arguments did not fit the route; the actuator was not called
    Rejected(Error),
    /// The actuator call failed
    Failed(Error),
}

/// Snapshot of server counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServerStats {
    pub datagrams: u64,
    pub decode_errors: u64,
    pub routed: u64,
    pub unmapped: u64,
    pub rejected: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) datagrams: AtomicU64,
    pub(crate) decode_errors: AtomicU64,
    routed: AtomicU64,
    unmapped: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    pub(crate) fn snapshot(&self) -> ServerStats {
        ServerStats {
            datagrams: self.datagrams.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            routed: self.routed.load(Ordering::Relaxed),
            unmapped: self.unmapped.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Shared, cloneable handle that routes messages to the actuator
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    actuator: Arc<dyn Actuator>,
    counters: Arc<Counters>,
}

impl Dispatcher {
    pub fn new(routes: Arc<RouteTable>, actuator: Arc<dyn Actuator>) -> Self {
        Self {
            routes,
            actuator,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn stats(&self) -> ServerStats {
        self.counters.snapshot()
    }

    pub(crate) fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Dispatch one message. Blocks for as long as the actuator does.
    pub fn dispatch(&self, address: &str, args: &[Value]) -> Dispatch {
        let Some(entry) = self.routes.lookup(address) else {
            debug!("No route for {}", address);
            self.counters.unmapped.fetch_add(1, Ordering::Relaxed);
            return Dispatch::Unmapped;
        };

        match entry.apply(args, self.actuator.as_ref()) {
            Ok(()) => {
                self.counters.routed.fetch_add(1, Ordering::Relaxed);
                Dispatch::Routed
            }
            Err(e @ Error::InvalidArgument(_)) => {
                warn!("Rejected message to {}: {}", address, e);
                self.counters.rejected.fetch_add(1, Ordering::Relaxed);
                Dispatch::Rejected(e)
            }
            Err(e) => {
                warn!("Failed to apply {} to {}: {}", address, entry.target, e);
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                Dispatch::Failed(e)
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes.len())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsa_osc_core::{
        CardInfo, CardSnapshot, ChannelSelector, ControlDescriptor, ControlTarget, Level, Root,
        Snapshot,
    };
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingActuator {
        calls: AtomicUsize,
    }

    impl Actuator for CountingActuator {
        fn set_volume(&self, _: &ControlTarget, _: ChannelSelector, _: Level) -> alsa_osc_core::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn set_mute(&self, target: &ControlTarget, _: bool) -> alsa_osc_core::Result<()> {
            Err(Error::Unsupported {
                control: target.control.clone(),
                operation: "mute".to_string(),
            })
        }

        fn set_record(&self, _: &ControlTarget, _: bool) -> alsa_osc_core::Result<()> {
            Ok(())
        }
    }

    fn dispatcher(actuator: Arc<CountingActuator>) -> Dispatcher {
        let snapshot = Snapshot::new(vec![CardSnapshot::new(
            CardInfo::new(0, "PCH"),
            vec![ControlDescriptor::new(0, "Master").with_mute(true)],
        )]);
        let routes = Arc::new(RouteTable::build(&Root::default(), &snapshot));
        Dispatcher::new(routes, actuator)
    }

    #[test]
    fn test_outcomes_are_counted() {
        let actuator = Arc::new(CountingActuator::default());
        let dispatcher = dispatcher(actuator.clone());

        assert!(matches!(
            dispatcher.dispatch("/alsa/interface/PCH/Master", &[Value::Float(0.5)]),
            Dispatch::Routed
        ));
        assert!(matches!(
            dispatcher.dispatch("/alsa/interface/PCH/Headphone", &[Value::Float(0.5)]),
            Dispatch::Unmapped
        ));
        assert!(matches!(
            dispatcher.dispatch("/alsa/interface/PCH/Master", &[Value::from("max")]),
            Dispatch::Rejected(_)
        ));
        assert!(matches!(
            dispatcher.dispatch("/alsa/interface/PCH/Master/mute", &[Value::Bool(true)]),
            Dispatch::Failed(Error::Unsupported { .. })
        ));

        assert_eq!(actuator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            dispatcher.stats(),
            ServerStats {
                routed: 1,
                unmapped: 1,
                rejected: 1,
                failed: 1,
                ..Default::default()
            }
        );
    }
}
