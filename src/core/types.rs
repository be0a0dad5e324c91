/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type (creation order, starting at 0)
pub type Pid = u32;

/// Index of one resource instance in the resource table
pub type InstanceId = usize;

/// Count of instructions executed per scheduling turn
pub type Quantum = u32;
