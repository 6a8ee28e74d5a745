//! Attack declaration, dispatch, and resolution
//!
//! An attack's life: declared as an [`AttackDeclaration`], dispatched
//! once to a [`ResolutionStrategy`], queued, then resolved by the
//! generic engine when a phase the strategy cares about runs. The
//! strategy is a closed enum; every behavioral fork in the engine is an
//! exhaustive match over it.

pub mod cluster;
pub mod declaration;
pub mod dispatch;
pub mod engine;
pub mod marking;
pub mod queue;
pub mod rapid;
pub mod special;
pub mod strategy;
pub mod swarm;
pub mod tohit;

pub use declaration::{AttackDeclaration, FiringMode, TargetRef};
pub use dispatch::select_strategy;
pub use engine::{ActivationOutcome, QueuedAttack, Resolution};
pub use queue::AttackQueue;
pub use strategy::ResolutionStrategy;
pub use tohit::{margin_of_success, ToHit, ToHitEvaluation};
