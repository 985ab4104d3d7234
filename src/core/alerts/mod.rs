// Alert condition subsystem: rules that watch moving sources against targets.
//
// Architecture:
// - model.rs: levels, statuses, ids and notifications
// - source.rs / target.rs: capabilities for "what is watched" and "what it is compared to"
// - triggers.rs: spatial and attribute predicates
// - condition.rs / condition_data.rs: rules and their per-source bindings
// - filter.rs: predicates deciding which triggered data are surfaced
// - list_model.rs: registry of all live condition data
// - queue.rs: bounded notification/event queues
// - engine.rs: owns everything and dispatches change notifications

pub mod condition;
pub mod condition_data;
pub mod engine;
pub mod filter;
pub mod list_model;
pub mod model;
pub mod queue;
pub mod source;
pub mod target;
pub mod triggers;
