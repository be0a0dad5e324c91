/*!
 * Scheduler Operations
 * Turns, post-turn queue maintenance and the run loop
 */

use super::dispatch::Step;
use super::types::{RunOutcome, SchedulingPolicy, Turn, TurnEnd};
use super::Scheduler;
use crate::core::types::Pid;
use crate::monitoring::{Event, RunSpan};
use crate::process::ProcessState;
use tracing::{debug, info, warn};

impl Scheduler {
    /// Run one scheduling turn for the head of the ready queue.
    ///
    /// Returns `None` when the ready queue is empty or the run has stalled.
    pub fn run_turn(&mut self) -> Option<Turn> {
        if self.stalled.is_some() {
            return None;
        }
        let pid = self.queues.ready.dequeue()?;
        self.processes.get_mut(pid)?.set_state(ProcessState::Running);
        self.stats.turns += 1;

        let budget = self.config.turn_budget();
        let mut executed = 0u32;
        let mut blocked = None;
        while budget.map_or(true, |quantum| executed < quantum) {
            match self.execute_next(pid) {
                Step::Continue => executed += 1,
                Step::Blocked(resource) => {
                    blocked = Some(resource);
                    break;
                }
                Step::Exhausted => break,
            }
        }
        self.stats.instructions += u64::from(executed);

        if let Some(resource) = blocked {
            let process = self.processes.get_mut(pid)?;
            self.queues.to_waiting(process);

            if self.config.policy == SchedulingPolicy::Fcfs {
                let name = process.name().clone();
                warn!(
                    process = %name,
                    resource = %resource,
                    "request blocked under FCFS; no other process can run to release it"
                );
                self.events.push(Event::Stalled {
                    process: name,
                    resource: resource.clone(),
                });
                self.stalled = Some((pid, resource));
                return Some(Turn {
                    pid,
                    executed,
                    end: TurnEnd::Stalled,
                });
            }
        }

        self.drain_waiting();
        let end = self.file_after_turn(pid);
        self.recover_deadlock();

        // A victim chosen during recovery reports as terminated
        let end = match self.processes.get(pid).map(|p| p.state()) {
            Some(ProcessState::Terminated) => TurnEnd::Terminated,
            _ => end,
        };
        debug!(pid, executed, end = ?end, "turn finished");
        Some(Turn { pid, executed, end })
    }

    /// Run turns until the ready queue is empty
    pub fn run(&mut self) -> RunOutcome {
        let span = RunSpan::new(
            self.config.policy.as_str(),
            self.config.effective_quantum(),
            self.processes.len(),
        );
        let _entered = span.enter();

        while self.run_turn().is_some() {}

        let outcome = match &self.stalled {
            Some((pid, resource)) => RunOutcome::Stalled {
                process: self
                    .processes
                    .get(*pid)
                    .map(|p| p.name().clone())
                    .unwrap_or_default(),
                resource: resource.clone(),
            },
            None => RunOutcome::Completed,
        };

        span.record_turns(self.stats.turns);
        span.record_outcome(outcome.as_str());
        info!(
            outcome = outcome.as_str(),
            turns = self.stats.turns,
            instructions = self.stats.instructions,
            terminated = self.queues.terminated.len(),
            exited = self.stats.exited,
            waiting = self.queues.waiting.len(),
            "run finished"
        );
        outcome
    }

    /// Re-file the dispatched process if it is still running
    ///
    /// Only a stream whose last instruction is a release terminates. A stream
    /// that ends on anything else leaves the queues still `Running`, so it
    /// never counts towards a deadlock and its waiters stay parked.
    fn file_after_turn(&mut self, pid: Pid) -> TurnEnd {
        let Some(process) = self.processes.get_mut(pid) else {
            return TurnEnd::Terminated;
        };
        match process.state() {
            ProcessState::Running if process.is_exhausted() && process.ends_with_release() => {
                self.queues.to_terminated(process);
                TurnEnd::Terminated
            }
            ProcessState::Running if process.is_exhausted() => {
                if !process.held().is_empty() {
                    warn!(
                        process = %process.name(),
                        held = process.held().len(),
                        "stream ended without a release; instances stay held"
                    );
                }
                self.stats.exited += 1;
                TurnEnd::Exited
            }
            ProcessState::Running => {
                self.queues.to_ready(process);
                TurnEnd::Requeued
            }
            ProcessState::Terminated => TurnEnd::Terminated,
            _ => TurnEnd::Blocked,
        }
    }

    fn drain_waiting(&mut self) {
        let promoted = self
            .resources
            .drain_waiting(&mut self.processes, &mut self.queues);
        self.stats.promotions += promoted.len() as u64;
    }

    fn recover_deadlock(&mut self) {
        let recovery = self
            .resources
            .recover(&mut self.processes, &mut self.queues, &mut self.events);
        if recovery.is_empty() {
            return;
        }
        self.stats.deadlocks += 1;
        self.stats.victims += recovery.victims.len() as u64;
        self.stats.promotions += recovery.promoted.len() as u64;
        self.drain_waiting();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadedModel;
    use crate::process::Instruction;
    use crate::scheduler::SchedulerConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contention_hands_resource_over() {
        let model = LoadedModel::builder()
            .with_resource("R")
            .with_process("P1", [Instruction::request("R"), Instruction::release("R")])
            .with_process("P2", [Instruction::request("R"), Instruction::release("R")])
            .build()
            .unwrap();
        let mut sched = Scheduler::new(&model, SchedulerConfig::round_robin(1));

        assert_eq!(
            sched.run_turn(),
            Some(Turn { pid: 0, executed: 1, end: TurnEnd::Requeued })
        );
        assert_eq!(
            sched.run_turn(),
            Some(Turn { pid: 1, executed: 0, end: TurnEnd::Blocked })
        );
        // P1's release lets the post-turn drain promote P2
        assert_eq!(
            sched.run_turn(),
            Some(Turn { pid: 0, executed: 1, end: TurnEnd::Terminated })
        );
        assert_eq!(sched.process(1).map(|p| p.state()), Some(ProcessState::Ready));

        assert_eq!(sched.run(), RunOutcome::Completed);
        assert_eq!(
            sched.events().lines(),
            vec![
                "P1 req R: acquired; Available: ",
                "P2 req R: waiting;",
                "P1 rel R: released; Available: R",
                "P2 req R: acquired; Available: ",
                "P2 rel R: released; Available: R",
            ]
        );
        assert_eq!(sched.stats().promotions, 1);
    }

    #[test]
    fn test_fcfs_runs_whole_stream_then_stalls_on_contention() {
        let model = LoadedModel::builder()
            .with_resource("R")
            .with_process("P1", [Instruction::request("R"), Instruction::send("M", "x")])
            .with_process("P2", [Instruction::request("R")])
            .with_process("P3", [])
            .build()
            .unwrap();
        let mut sched = Scheduler::new(&model, SchedulerConfig::fcfs());

        assert_eq!(
            sched.run_turn(),
            Some(Turn { pid: 0, executed: 2, end: TurnEnd::Exited })
        );
        assert_eq!(sched.run_turn().map(|t| t.end), Some(TurnEnd::Stalled));
        assert_eq!(sched.run_turn(), None);

        assert_eq!(
            sched.run(),
            RunOutcome::Stalled {
                process: "P2".into(),
                resource: "R".into(),
            }
        );
        // P3 never ran
        assert_eq!(sched.process(2).map(|p| p.state()), Some(ProcessState::Ready));
        assert_eq!(
            sched.events().last().map(ToString::to_string).as_deref(),
            Some("P2 req R: stalled under FCFS")
        );
    }

    #[test]
    fn test_empty_stream_exits_on_first_turn() {
        let model = LoadedModel::builder().with_process("P1", []).build().unwrap();
        let mut sched = Scheduler::new(&model, SchedulerConfig::round_robin(0));

        assert_eq!(
            sched.run_turn(),
            Some(Turn { pid: 0, executed: 0, end: TurnEnd::Exited })
        );
        assert_eq!(sched.run_turn(), None);
        assert!(sched.events().is_empty());
        assert_eq!(sched.process(0).map(|p| p.state()), Some(ProcessState::Running));
        assert!(sched.queues().terminated.is_empty());
        assert_eq!(sched.stats().exited, 1);
    }

    #[test]
    fn test_release_last_terminates_even_when_other_instances_remain() {
        let model = LoadedModel::builder()
            .with_resource("A")
            .with_resource("B")
            .with_process(
                "P1",
                [
                    Instruction::request("A"),
                    Instruction::request("B"),
                    Instruction::release("B"),
                ],
            )
            .build()
            .unwrap();
        let mut sched = Scheduler::new(&model, SchedulerConfig::round_robin(3));

        assert_eq!(
            sched.run_turn(),
            Some(Turn { pid: 0, executed: 3, end: TurnEnd::Terminated })
        );
        assert_eq!(sched.process(0).map(|p| p.held().len()), Some(1));
        assert_eq!(sched.queues().terminated.len(), 1);
    }

    #[test]
    fn test_deadlock_recovered_within_turn() {
        let model = LoadedModel::builder()
            .with_resource("R1")
            .with_resource("R2")
            .with_process(
                "P1",
                [Instruction::request("R1"), Instruction::request("R2")],
            )
            .with_process(
                "P2",
                [Instruction::request("R2"), Instruction::request("R1")],
            )
            .build()
            .unwrap();
        let mut sched = Scheduler::new(&model, SchedulerConfig::round_robin(1));

        sched.run_turn();
        sched.run_turn();
        assert_eq!(sched.run_turn().map(|t| t.end), Some(TurnEnd::Blocked));
        // P2 blocks last; the deadlock check in its turn terminates P1
        let turn = sched.run_turn();
        assert_eq!(turn.map(|t| t.pid), Some(1));
        assert_eq!(sched.stats().deadlocks, 1);
        assert_eq!(sched.stats().victims, 1);
        assert_eq!(sched.process(0).map(|p| p.state()), Some(ProcessState::Terminated));
        assert_eq!(sched.process(1).map(|p| p.state()), Some(ProcessState::Ready));
    }
}
