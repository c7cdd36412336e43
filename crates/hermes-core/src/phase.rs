//! Processing phases and the phase registry.
//!
//! A [`Phase`] is a named point in the ordered processing timeline for one
//! message direction. Interceptors are tagged with a phase; the chain
//! assembler sorts them by the phase's position in the direction's canonical
//! table. The order is fixed at compile time and cannot be extended by
//! bindings or cross-cutting subsystems.

use serde::{Deserialize, Serialize};

/// The direction of a message through the pipeline.
///
/// Fault directions reuse the phase table of their non-fault counterpart:
/// an in-fault message still travels `Receive → Decode → …`, it just does so
/// through the binding's in-fault interceptor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Inbound: a request arriving at a destination, or a response arriving
    /// at a conduit.
    In,
    /// Outbound: a request leaving a conduit, or a response leaving a
    /// destination.
    Out,
    /// Fault processing for a halted inbound chain.
    InFault,
    /// Fault processing for a halted outbound chain.
    OutFault,
}

impl Direction {
    /// Returns the fault direction paired with this direction.
    ///
    /// Fault directions are their own pair: a fault raised while already on
    /// a fault chain has nowhere further to go (see `Chain::run`).
    #[must_use]
    pub const fn fault_direction(self) -> Self {
        match self {
            Self::In | Self::InFault => Self::InFault,
            Self::Out | Self::OutFault => Self::OutFault,
        }
    }

    /// Returns `true` if this is one of the two fault directions.
    #[must_use]
    pub const fn is_fault(self) -> bool {
        matches!(self, Self::InFault | Self::OutFault)
    }

    /// Returns the direction name used in logs and metrics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InFault => "in_fault",
            Self::OutFault => "out_fault",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A named point in the processing timeline for one direction.
///
/// The inbound table is `Receive < Decode < Unmarshal < PreInvoke < Invoke`;
/// the outbound table is `Setup < PreMarshal < Marshal < Encode < Send`.
/// A phase only has meaning within its direction's table; an interceptor
/// tagged with an outbound phase contributed to an inbound chain is dropped
/// at assembly time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Phase {
    /// Inbound: transport handoff, raw payload attached to the message.
    Receive,
    /// Inbound: protocol decode, payload to wire envelope.
    Decode,
    /// Inbound: envelope to call arguments.
    Unmarshal,
    /// Inbound: last stop before the target is invoked (validation lives
    /// here).
    PreInvoke,
    /// Inbound: dispatch to the target.
    Invoke,
    /// Outbound: chain setup, correlation bookkeeping.
    Setup,
    /// Outbound: last stop before serialization (return-value validation
    /// lives here).
    PreMarshal,
    /// Outbound: return value to wire envelope.
    Marshal,
    /// Outbound: protocol encode, envelope to payload.
    Encode,
    /// Outbound: transport handoff.
    Send,
}

impl Phase {
    /// Returns the phase name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Receive => "receive",
            Self::Decode => "decode",
            Self::Unmarshal => "unmarshal",
            Self::PreInvoke => "pre_invoke",
            Self::Invoke => "invoke",
            Self::Setup => "setup",
            Self::PreMarshal => "pre_marshal",
            Self::Marshal => "marshal",
            Self::Encode => "encode",
            Self::Send => "send",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The canonical ordered phase tables, one per direction category.
///
/// The registry is a value type so embedders can pass it down explicitly;
/// there is exactly one sensible instance and [`PhaseRegistry::default`]
/// produces it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseRegistry {
    _priv: (),
}

/// Inbound phase table, in execution order.
const INBOUND: [Phase; 5] = [
    Phase::Receive,
    Phase::Decode,
    Phase::Unmarshal,
    Phase::PreInvoke,
    Phase::Invoke,
];

/// Outbound phase table, in execution order.
const OUTBOUND: [Phase; 5] = [
    Phase::Setup,
    Phase::PreMarshal,
    Phase::Marshal,
    Phase::Encode,
    Phase::Send,
];

impl PhaseRegistry {
    /// Creates the canonical registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { _priv: () }
    }

    /// Returns the ordered phase table for a direction.
    ///
    /// Fault directions share their non-fault counterpart's table.
    #[must_use]
    pub const fn phases(&self, direction: Direction) -> &'static [Phase] {
        match direction {
            Direction::In | Direction::InFault => &INBOUND,
            Direction::Out | Direction::OutFault => &OUTBOUND,
        }
    }

    /// Returns the position of a phase within a direction's table, or `None`
    /// if the phase does not belong to that direction.
    #[must_use]
    pub fn position(&self, direction: Direction, phase: Phase) -> Option<usize> {
        self.phases(direction).iter().position(|p| *p == phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_table_order() {
        let registry = PhaseRegistry::new();
        let phases = registry.phases(Direction::In);
        assert_eq!(
            phases,
            &[
                Phase::Receive,
                Phase::Decode,
                Phase::Unmarshal,
                Phase::PreInvoke,
                Phase::Invoke,
            ]
        );
    }

    #[test]
    fn test_outbound_table_order() {
        let registry = PhaseRegistry::new();
        let phases = registry.phases(Direction::Out);
        assert_eq!(
            phases,
            &[
                Phase::Setup,
                Phase::PreMarshal,
                Phase::Marshal,
                Phase::Encode,
                Phase::Send,
            ]
        );
    }

    #[test]
    fn test_fault_directions_share_tables() {
        let registry = PhaseRegistry::new();
        assert_eq!(registry.phases(Direction::In), registry.phases(Direction::InFault));
        assert_eq!(registry.phases(Direction::Out), registry.phases(Direction::OutFault));
    }

    #[test]
    fn test_position_is_strictly_increasing() {
        let registry = PhaseRegistry::new();
        for direction in [Direction::In, Direction::Out] {
            let phases = registry.phases(direction);
            for (index, phase) in phases.iter().enumerate() {
                assert_eq!(registry.position(direction, *phase), Some(index));
            }
        }
    }

    #[test]
    fn test_foreign_phase_has_no_position() {
        let registry = PhaseRegistry::new();
        assert_eq!(registry.position(Direction::In, Phase::PreMarshal), None);
        assert_eq!(registry.position(Direction::Out, Phase::Unmarshal), None);
    }

    #[test]
    fn test_fault_direction_pairing() {
        assert_eq!(Direction::In.fault_direction(), Direction::InFault);
        assert_eq!(Direction::Out.fault_direction(), Direction::OutFault);
        assert_eq!(Direction::InFault.fault_direction(), Direction::InFault);
        assert_eq!(Direction::OutFault.fault_direction(), Direction::OutFault);
    }
}
