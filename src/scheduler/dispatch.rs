/*!
 * Instruction Dispatch
 * Executes one pending instruction against the resource and mailbox tables
 *
 * Every outcome is appended to the event log. Only a request that finds no
 * free instance leaves the cursor in place; everything else, including
 * configuration defects, consumes the instruction.
 */

use super::stats::SchedulerStats;
use super::Scheduler;
use crate::core::types::Pid;
use crate::core::{Name, SimError};
use crate::ipc::Received;
use crate::monitoring::{Event, MailboxOp, ResourceOp};
use crate::process::Instruction;
use crate::resources::{Acquire, Release};
use miette::Diagnostic;
use tracing::{debug, warn};

/// Result of executing one instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Step {
    /// Instruction consumed
    Continue,
    /// Request for this resource class must wait
    Blocked(Name),
    /// Nothing left to execute
    Exhausted,
}

impl Scheduler {
    pub(super) fn execute_next(&mut self, pid: Pid) -> Step {
        let Some(process) = self.processes.get_mut(pid) else {
            return Step::Exhausted;
        };
        let Some(instruction) = process.pending().cloned() else {
            return Step::Exhausted;
        };
        let name = process.name().clone();

        match instruction {
            Instruction::Request { resource } => {
                if !self.resources.contains(&resource) {
                    report_defect(&mut self.stats, &name, SimError::UnknownResource(resource.clone()));
                    self.events.push(Event::UnknownResource {
                        process: name,
                        op: ResourceOp::Request,
                        resource,
                    });
                    process.advance();
                    return Step::Continue;
                }

                match self.resources.acquire(process, &resource) {
                    Acquire::Acquired(instance) => {
                        process.advance();
                        debug!(process = %name, resource = %resource, instance, "acquired");
                        self.events.push(Event::Acquired {
                            process: name,
                            resource,
                            available: self.resources.available_names(),
                        });
                        Step::Continue
                    }
                    Acquire::Unavailable => {
                        debug!(process = %name, resource = %resource, "request blocked");
                        self.stats.blocked_requests += 1;
                        self.events.push(Event::RequestBlocked {
                            process: name,
                            resource: resource.clone(),
                        });
                        Step::Blocked(resource)
                    }
                }
            }

            Instruction::Release { resource } => {
                process.advance();
                if !self.resources.contains(&resource) {
                    report_defect(&mut self.stats, &name, SimError::UnknownResource(resource.clone()));
                    self.events.push(Event::UnknownResource {
                        process: name,
                        op: ResourceOp::Release,
                        resource,
                    });
                    return Step::Continue;
                }

                match self.resources.release(process, &resource) {
                    Release::Released(instance) => {
                        debug!(process = %name, resource = %resource, instance, "released");
                        self.events.push(Event::Released {
                            process: name,
                            resource,
                            available: self.resources.available_names(),
                        });
                    }
                    Release::NotHeld => {
                        let err = SimError::ResourceNotHeld {
                            process: name.clone(),
                            resource: resource.clone(),
                        };
                        report_defect(&mut self.stats, &name, err);
                        self.events.push(Event::NothingToRelease {
                            process: name,
                            resource,
                        });
                    }
                }
                Step::Continue
            }

            Instruction::Send { mailbox, message } => {
                process.advance();
                match self.mailboxes.send(&mailbox, message.clone()) {
                    Ok(displaced) => {
                        if let Some(lost) = displaced {
                            warn!(process = %name, mailbox = %mailbox, lost = %lost, "unread message overwritten");
                            self.stats.messages_overwritten += 1;
                        }
                        self.stats.messages_sent += 1;
                        debug!(process = %name, mailbox = %mailbox, "message sent");
                        self.events.push(Event::MessageSent {
                            process: name,
                            mailbox,
                            message,
                        });
                    }
                    Err(err) => {
                        report_defect(&mut self.stats, &name, err.into());
                        self.events.push(Event::UnknownMailbox {
                            process: name,
                            op: MailboxOp::Send,
                            mailbox,
                        });
                    }
                }
                Step::Continue
            }

            Instruction::Receive { mailbox, binding } => {
                process.advance();
                match self.mailboxes.receive(&mailbox) {
                    Ok(Received::Message(message)) => {
                        self.stats.messages_received += 1;
                        debug!(
                            process = %name,
                            mailbox = %mailbox,
                            binding = binding.as_deref().unwrap_or("-"),
                            "message received"
                        );
                        self.events.push(Event::MessageReceived {
                            process: name,
                            mailbox,
                            message,
                        });
                    }
                    Ok(Received::Empty) => {
                        self.stats.empty_receives += 1;
                        debug!(process = %name, mailbox = %mailbox, "mailbox empty");
                        self.events.push(Event::MailboxEmpty {
                            process: name,
                            mailbox,
                        });
                    }
                    Err(err) => {
                        report_defect(&mut self.stats, &name, err.into());
                        self.events.push(Event::UnknownMailbox {
                            process: name,
                            op: MailboxOp::Receive,
                            mailbox,
                        });
                    }
                }
                Step::Continue
            }
        }
    }
}

fn report_defect(stats: &mut SchedulerStats, process: &Name, err: SimError) {
    stats.config_defects += 1;
    let code = err.code().map(|c| c.to_string()).unwrap_or_default();
    warn!(process = %process, code = %code, "{}", err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadedModel;
    use crate::process::ProcessState;
    use crate::scheduler::SchedulerConfig;
    use pretty_assertions::assert_eq;

    fn scheduler(instructions: Vec<Instruction>) -> Scheduler {
        let model = LoadedModel::builder()
            .with_resource("R")
            .with_mailbox("M")
            .with_process("P1", instructions)
            .build()
            .unwrap();
        Scheduler::new(&model, SchedulerConfig::round_robin(1))
    }

    #[test]
    fn test_unknown_names_are_skipped() {
        let mut sched = scheduler(vec![
            Instruction::request("X"),
            Instruction::release("X"),
            Instruction::send("Q", "hi"),
            Instruction::receive("Q"),
        ]);

        for _ in 0..4 {
            assert_eq!(sched.execute_next(0), Step::Continue);
        }
        assert_eq!(sched.execute_next(0), Step::Exhausted);
        assert_eq!(sched.stats().config_defects, 4);
        assert_eq!(
            sched.events().lines(),
            vec![
                "P1 req X: ERROR: Unknown resource",
                "P1 rel X: ERROR: Unknown resource",
                "P1 send: ERROR: Unknown mailbox Q",
                "P1 recv: ERROR: Unknown mailbox Q",
            ]
        );
    }

    #[test]
    fn test_blocked_request_keeps_cursor() {
        let mut sched = scheduler(vec![Instruction::request("R"), Instruction::request("R")]);

        assert_eq!(sched.execute_next(0), Step::Continue);
        assert_eq!(sched.execute_next(0), Step::Blocked(Name::from("R")));
        assert_eq!(sched.process(0).map(|p| p.cursor()), Some(1));
        assert_eq!(sched.stats().blocked_requests, 1);
        assert_eq!(sched.events().last().map(ToString::to_string).as_deref(), Some("P1 req R: waiting;"));
    }

    #[test]
    fn test_unheld_release_changes_nothing_but_the_cursor() {
        let mut sched = scheduler(vec![Instruction::release("R")]);
        let before = sched.resources().instances().to_vec();

        assert_eq!(sched.execute_next(0), Step::Continue);

        assert_eq!(sched.resources().instances(), before.as_slice());
        assert_eq!(sched.process(0).map(|p| p.state()), Some(ProcessState::Ready));
        assert_eq!(
            sched.events().lines(),
            vec!["P1 rel R: ERROR: Nothing to release"]
        );
    }
}
