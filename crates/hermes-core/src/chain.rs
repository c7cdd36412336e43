//! Phase-sorted interceptor chains.
//!
//! A [`Chain`] is assembled once from any number of contribution lists
//! (binding, validation, fault handling) and is immutable afterwards.
//! Assembly is a pure function: it never mutates a contribution list in
//! place, so a binding's lists can be shared read-only across all concurrent
//! calls through that binding.

use crate::error::Fault;
use crate::interceptor::Interceptor;
use crate::message::Message;
use crate::phase::{Direction, PhaseRegistry};
use std::sync::Arc;

/// The result of running a chain together with its paired fault chain.
#[derive(Debug)]
pub enum ChainOutcome {
    /// Every interceptor completed; the call proceeds.
    Completed,
    /// An interceptor faulted and the fault chain completed. The call fails
    /// with this fault.
    Faulted(Fault),
    /// An interceptor faulted and the fault chain itself faulted. Fault
    /// processing is bounded at depth one; this outcome is terminal.
    Unrecoverable {
        /// The fault that halted the original chain.
        original: Fault,
        /// The fault raised while processing the fault chain.
        fault_chain_fault: Fault,
    },
}

impl ChainOutcome {
    /// Returns `true` if the chain completed without a fault.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// An ordered, phase-sorted, direction-scoped sequence of interceptors.
///
/// Chains are read-only once assembled; adding or removing interceptors
/// means assembling a new chain.
pub struct Chain {
    direction: Direction,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Chain {
    /// Assembles a chain for one direction from multiple contribution lists.
    ///
    /// Contributions are concatenated in the order given (list order, then
    /// position within each list) and stably sorted by phase position, so
    /// interceptors registered at the same phase keep their overall insertion
    /// order. An interceptor whose phase does not belong to the direction's
    /// table is dropped with a warning; assembly never fails.
    #[must_use]
    pub fn assemble(
        direction: Direction,
        registry: &PhaseRegistry,
        contributions: &[&[Arc<dyn Interceptor>]],
    ) -> Self {
        let mut entries: Vec<(usize, Arc<dyn Interceptor>)> = Vec::new();
        for list in contributions {
            for interceptor in list.iter() {
                match registry.position(direction, interceptor.phase()) {
                    Some(position) => entries.push((position, Arc::clone(interceptor))),
                    None => {
                        tracing::warn!(
                            interceptor = interceptor.name(),
                            phase = %interceptor.phase(),
                            direction = %direction,
                            "interceptor phase not in direction table, dropping"
                        );
                    }
                }
            }
        }
        // Vec::sort_by_key is stable, which is what keeps same-phase
        // contributions in insertion order.
        entries.sort_by_key(|(position, _)| *position);
        Self {
            direction,
            interceptors: entries.into_iter().map(|(_, i)| i).collect(),
        }
    }

    /// Returns the chain's direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the interceptors in execution order.
    #[must_use]
    pub fn interceptors(&self) -> &[Arc<dyn Interceptor>] {
        &self.interceptors
    }

    /// Executes the chain, halting at the first fault.
    pub async fn execute(&self, message: &mut Message) -> Result<(), Fault> {
        for interceptor in &self.interceptors {
            tracing::debug!(
                interceptor = interceptor.name(),
                phase = %interceptor.phase(),
                direction = %self.direction,
                exchange_id = %message.exchange().id(),
                "running interceptor"
            );
            if let Err(fault) = interceptor.handle(message).await {
                tracing::debug!(
                    interceptor = interceptor.name(),
                    fault.code = %fault.code,
                    "interceptor signaled fault, halting chain"
                );
                return Err(fault);
            }
        }
        Ok(())
    }

    /// Executes the chain; on a fault, stores the fault into the message's
    /// fault slot and transfers control to the paired fault chain.
    ///
    /// Fault processing is bounded at depth one: a fault raised while already
    /// on the fault chain yields [`ChainOutcome::Unrecoverable`] rather than
    /// recursing.
    pub async fn run(&self, message: &mut Message, fault_chain: &Chain) -> ChainOutcome {
        let fault = match self.execute(message).await {
            Ok(()) => return ChainOutcome::Completed,
            Err(fault) => fault,
        };

        message.set_fault(fault.clone());
        match fault_chain.execute(message).await {
            Ok(()) => ChainOutcome::Faulted(fault),
            Err(fault_chain_fault) => {
                tracing::error!(
                    original.code = %fault.code,
                    fault.code = %fault_chain_fault.code,
                    exchange_id = %message.exchange().id(),
                    "fault raised during fault-chain processing, terminal"
                );
                ChainOutcome::Unrecoverable {
                    original: fault,
                    fault_chain_fault,
                }
            }
        }
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("direction", &self.direction)
            .field(
                "interceptors",
                &self
                    .interceptors
                    .iter()
                    .map(|i| i.name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::Exchange;
    use crate::interceptor::BoxFuture;
    use crate::phase::Phase;
    use std::sync::Mutex;

    /// Records its name into a shared trace when run; optionally faults.
    struct Recording {
        name: &'static str,
        phase: Phase,
        trace: Arc<Mutex<Vec<&'static str>>>,
        fault: Option<Fault>,
    }

    impl Recording {
        fn ok(
            name: &'static str,
            phase: Phase,
            trace: &Arc<Mutex<Vec<&'static str>>>,
        ) -> Arc<dyn Interceptor> {
            Arc::new(Self {
                name,
                phase,
                trace: Arc::clone(trace),
                fault: None,
            })
        }

        fn faulting(
            name: &'static str,
            phase: Phase,
            trace: &Arc<Mutex<Vec<&'static str>>>,
            fault: Fault,
        ) -> Arc<dyn Interceptor> {
            Arc::new(Self {
                name,
                phase,
                trace: Arc::clone(trace),
                fault: Some(fault),
            })
        }
    }

    impl Interceptor for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn phase(&self) -> Phase {
            self.phase
        }

        fn handle<'a>(&'a self, _message: &'a mut Message) -> BoxFuture<'a, Result<(), Fault>> {
            Box::pin(async move {
                self.trace.lock().unwrap().push(self.name);
                match &self.fault {
                    Some(fault) => Err(fault.clone()),
                    None => Ok(()),
                }
            })
        }
    }

    fn inbound_message() -> Message {
        Message::new(Exchange::new(), Direction::In)
    }

    #[tokio::test]
    async fn test_chain_sorts_by_phase() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let contributions: Vec<Arc<dyn Interceptor>> = vec![
            Recording::ok("invoke", Phase::Invoke, &trace),
            Recording::ok("decode", Phase::Decode, &trace),
            Recording::ok("unmarshal", Phase::Unmarshal, &trace),
            Recording::ok("receive", Phase::Receive, &trace),
        ];

        let chain = Chain::assemble(Direction::In, &PhaseRegistry::new(), &[&contributions]);
        let mut message = inbound_message();
        chain.execute(&mut message).await.expect("chain completes");

        assert_eq!(
            *trace.lock().unwrap(),
            vec!["receive", "decode", "unmarshal", "invoke"]
        );
    }

    #[tokio::test]
    async fn test_same_phase_entries_keep_insertion_order() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        // Two sources both contribute at PreInvoke; the merged chain must
        // keep source order, then within-source order.
        let binding: Vec<Arc<dyn Interceptor>> = vec![
            Recording::ok("binding-a", Phase::PreInvoke, &trace),
            Recording::ok("binding-b", Phase::PreInvoke, &trace),
        ];
        let validation: Vec<Arc<dyn Interceptor>> =
            vec![Recording::ok("validation", Phase::PreInvoke, &trace)];

        let chain = Chain::assemble(
            Direction::In,
            &PhaseRegistry::new(),
            &[&binding, &validation],
        );
        let mut message = inbound_message();
        chain.execute(&mut message).await.expect("chain completes");

        assert_eq!(
            *trace.lock().unwrap(),
            vec!["binding-a", "binding-b", "validation"]
        );
    }

    #[tokio::test]
    async fn test_foreign_phase_interceptor_is_dropped() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let contributions: Vec<Arc<dyn Interceptor>> = vec![
            Recording::ok("decode", Phase::Decode, &trace),
            Recording::ok("marshal", Phase::Marshal, &trace),
        ];

        let chain = Chain::assemble(Direction::In, &PhaseRegistry::new(), &[&contributions]);
        assert_eq!(chain.interceptors().len(), 1);

        let mut message = inbound_message();
        chain.execute(&mut message).await.expect("chain completes");
        assert_eq!(*trace.lock().unwrap(), vec!["decode"]);
    }

    #[tokio::test]
    async fn test_fault_halts_chain_and_transfers() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let main: Vec<Arc<dyn Interceptor>> = vec![
            Recording::ok("decode", Phase::Decode, &trace),
            Recording::faulting(
                "validate",
                Phase::PreInvoke,
                &trace,
                Fault::validation("bad", serde_json::json!([])),
            ),
            Recording::ok("invoke", Phase::Invoke, &trace),
        ];
        let fault_handling: Vec<Arc<dyn Interceptor>> =
            vec![Recording::ok("fault-decode", Phase::Decode, &trace)];

        let registry = PhaseRegistry::new();
        let chain = Chain::assemble(Direction::In, &registry, &[&main]);
        let fault_chain = Chain::assemble(Direction::InFault, &registry, &[&fault_handling]);

        let mut message = inbound_message();
        let outcome = chain.run(&mut message, &fault_chain).await;

        match outcome {
            ChainOutcome::Faulted(fault) => assert_eq!(fault.message, "bad"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        // "invoke" never ran; the fault chain did.
        assert_eq!(
            *trace.lock().unwrap(),
            vec!["decode", "validate", "fault-decode"]
        );
        assert_eq!(message.fault().expect("fault stored").message, "bad");
    }

    #[tokio::test]
    async fn test_double_fault_is_terminal() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let main: Vec<Arc<dyn Interceptor>> = vec![Recording::faulting(
            "encode",
            Phase::Encode,
            &trace,
            Fault::protocol("encode failed"),
        )];
        let fault_handling: Vec<Arc<dyn Interceptor>> = vec![Recording::faulting(
            "fault-encode",
            Phase::Encode,
            &trace,
            Fault::protocol("fault encode failed"),
        )];

        let registry = PhaseRegistry::new();
        let chain = Chain::assemble(Direction::Out, &registry, &[&main]);
        let fault_chain = Chain::assemble(Direction::OutFault, &registry, &[&fault_handling]);

        let mut message = Message::new(Exchange::new(), Direction::Out);
        let outcome = chain.run(&mut message, &fault_chain).await;

        match outcome {
            ChainOutcome::Unrecoverable {
                original,
                fault_chain_fault,
            } => {
                assert_eq!(original.message, "encode failed");
                assert_eq!(fault_chain_fault.message, "fault encode failed");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_chain_completes() {
        let registry = PhaseRegistry::new();
        let chain = Chain::assemble(Direction::Out, &registry, &[]);
        let fault_chain = Chain::assemble(Direction::OutFault, &registry, &[]);
        let mut message = Message::new(Exchange::new(), Direction::Out);
        assert!(chain.run(&mut message, &fault_chain).await.is_completed());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const INBOUND_PHASES: [Phase; 5] = [
            Phase::Receive,
            Phase::Decode,
            Phase::Unmarshal,
            Phase::PreInvoke,
            Phase::Invoke,
        ];

        /// Interceptor names are leaked; fine for the bounded proptest runs.
        fn leak(name: String) -> &'static str {
            Box::leak(name.into_boxed_str())
        }

        proptest! {
            #[test]
            fn chain_executes_in_non_decreasing_phase_order(
                phase_indices in proptest::collection::vec(0usize..5, 0..24)
            ) {
                let trace = Arc::new(Mutex::new(Vec::new()));
                let contributions: Vec<Arc<dyn Interceptor>> = phase_indices
                    .iter()
                    .enumerate()
                    .map(|(n, i)| {
                        Recording::ok(leak(format!("i{n}-p{i}")), INBOUND_PHASES[*i], &trace)
                    })
                    .collect();

                let chain =
                    Chain::assemble(Direction::In, &PhaseRegistry::new(), &[&contributions]);

                // Executed phase positions never decrease.
                let positions: Vec<usize> = chain
                    .interceptors()
                    .iter()
                    .map(|i| {
                        PhaseRegistry::new()
                            .position(Direction::In, i.phase())
                            .expect("inbound phase")
                    })
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] <= w[1]));

                // Same-phase entries keep registration order: the numeric
                // name suffix increases within each phase.
                for phase in INBOUND_PHASES {
                    let order: Vec<&str> = chain
                        .interceptors()
                        .iter()
                        .filter(|i| i.phase() == phase)
                        .map(|i| i.name())
                        .collect();
                    let mut sorted = order.clone();
                    sorted.sort_by_key(|name| {
                        name[1..name.find('-').expect("separator")]
                            .parse::<usize>()
                            .expect("index")
                    });
                    prop_assert_eq!(order, sorted);
                }
            }
        }
    }
}
