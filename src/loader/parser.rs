/*!
 * Process Definition Parser
 * Reads the line-oriented process definition format into a `LoadedModel`
 *
 * ```text
 * Processes
 * P1 P2
 * Resources
 * R1 R2 R2
 * Mailboxes
 * M1
 *
 * Process P1
 * req R1
 * send (M1, hello there)
 * rel R1
 * Process P2
 * recv (M1, msg)
 * ```
 */

use super::model::LoadedModel;
use crate::core::errors::{LoadError, LoadResult, SyntaxError};
use crate::core::Name;
use crate::process::Instruction;
use ahash::{AHashMap, AHashSet};
use miette::{NamedSource, SourceSpan};
use std::path::Path;
use tracing::{debug, warn};

const PROCESSES: &str = "Processes";
const RESOURCES: &str = "Resources";
const MAILBOXES: &str = "Mailboxes";
const PROCESS: &str = "Process";
const REQ: &str = "req";
const REL: &str = "rel";
const SEND: &str = "send";
const RECV: &str = "recv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Processes,
    Resources,
    Mailboxes,
    /// Instruction block for the process at this declaration index
    Block(usize),
}

/// Read and parse a process definition file
pub fn load_file(path: impl AsRef<Path>) -> LoadResult<LoadedModel> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&path.display().to_string(), &text)
}

/// Parse process definition text; `source_name` labels diagnostics
pub fn parse_str(source_name: &str, text: &str) -> LoadResult<LoadedModel> {
    Parser::new(source_name, text).parse()
}

struct Parser<'a> {
    source_name: &'a str,
    text: &'a str,
    section: Section,
    processes: Vec<(Name, Vec<Instruction>)>,
    process_index: AHashMap<Name, usize>,
    seen_blocks: AHashSet<usize>,
    resources: Vec<Name>,
    mailboxes: Vec<Name>,
}

impl<'a> Parser<'a> {
    fn new(source_name: &'a str, text: &'a str) -> Self {
        Self {
            source_name,
            text,
            section: Section::Preamble,
            processes: Vec::new(),
            process_index: AHashMap::new(),
            seen_blocks: AHashSet::new(),
            resources: Vec::new(),
            mailboxes: Vec::new(),
        }
    }

    fn parse(mut self) -> LoadResult<LoadedModel> {
        let text = self.text;
        let mut offset = 0;
        for raw in text.split_inclusive('\n') {
            let line_start = offset;
            offset += raw.len();

            let line = raw.trim_end_matches(['\n', '\r']);
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let lead = line.len() - line.trim_start().len();
            self.parse_line(trimmed, (line_start + lead, trimmed.len()))?;
        }

        self.finish()
    }

    fn parse_line(&mut self, line: &str, span: (usize, usize)) -> LoadResult<()> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(());
        };

        match keyword {
            PROCESSES | RESOURCES | MAILBOXES => {
                self.section = match keyword {
                    PROCESSES => Section::Processes,
                    RESOURCES => Section::Resources,
                    _ => Section::Mailboxes,
                };
                for name in tokens {
                    self.push_name(name, span)?;
                }
                Ok(())
            }
            PROCESS => self.open_block(tokens, span),
            REQ | REL => {
                let block = self.block(keyword, span)?;
                let resource = self.single_operand(keyword, tokens, span)?;
                let instruction = if keyword == REQ {
                    Instruction::request(resource)
                } else {
                    Instruction::release(resource)
                };
                self.processes[block].1.push(instruction);
                Ok(())
            }
            SEND | RECV => {
                let block = self.block(keyword, span)?;
                let (mailbox, second) = self.message_operands(keyword, &line[keyword.len()..], span)?;
                let instruction = if keyword == SEND {
                    let Some(message) = second else {
                        return Err(self.error(
                            span,
                            "send is missing its message",
                            Some("Write sends as: send (<mailbox>, <message>)"),
                        ));
                    };
                    Instruction::send(mailbox, message)
                } else {
                    Instruction::Receive {
                        mailbox: Name::from(mailbox),
                        binding: second.map(Name::from),
                    }
                };
                self.processes[block].1.push(instruction);
                Ok(())
            }
            _ => match self.section {
                Section::Processes | Section::Resources | Section::Mailboxes => {
                    self.push_name(keyword, span)?;
                    for name in tokens {
                        self.push_name(name, span)?;
                    }
                    Ok(())
                }
                Section::Block(_) => Err(self.error(
                    span,
                    format!("Unknown instruction `{}`", keyword),
                    Some("Instructions are req, rel, send and recv."),
                )),
                Section::Preamble => Err(self.error(
                    span,
                    format!("Unexpected `{}` before any section", keyword),
                    Some("Start the file with a Processes section."),
                )),
            },
        }
    }

    fn push_name(&mut self, name: &str, span: (usize, usize)) -> LoadResult<()> {
        let name = Name::from(name);
        match self.section {
            Section::Processes => {
                if self.process_index.contains_key(name.as_str()) {
                    return Err(LoadError::DuplicateProcess(name));
                }
                self.process_index.insert(name.clone(), self.processes.len());
                self.processes.push((name, Vec::new()));
            }
            Section::Resources => self.resources.push(name),
            Section::Mailboxes => self.mailboxes.push(name),
            Section::Preamble | Section::Block(_) => {
                return Err(self.error(span, "Name outside a declaration section", None));
            }
        }
        Ok(())
    }

    fn open_block<'t>(
        &mut self,
        mut tokens: impl Iterator<Item = &'t str>,
        span: (usize, usize),
    ) -> LoadResult<()> {
        let Some(name) = tokens.next() else {
            return Err(self.error(
                span,
                "Process block without a name",
                Some("Write blocks as: Process <name>"),
            ));
        };
        if tokens.next().is_some() {
            return Err(self.error(span, "Unexpected text after process name", None));
        }
        let Some(&index) = self.process_index.get(name) else {
            return Err(self.error(
                span,
                format!("Instructions given for undeclared process {}", name),
                Some("List every process in the Processes section before its instruction block."),
            ));
        };
        if !self.seen_blocks.insert(index) {
            return Err(self.error(
                span,
                format!("Process {} has more than one instruction block", name),
                None,
            ));
        }
        self.section = Section::Block(index);
        Ok(())
    }

    fn block(&self, keyword: &str, span: (usize, usize)) -> LoadResult<usize> {
        match self.section {
            Section::Block(index) => Ok(index),
            _ => Err(self.error(
                span,
                format!("`{}` outside a process block", keyword),
                Some("Instructions must follow a `Process <name>` line."),
            )),
        }
    }

    fn single_operand<'t>(
        &self,
        keyword: &str,
        mut tokens: impl Iterator<Item = &'t str>,
        span: (usize, usize),
    ) -> LoadResult<&'t str> {
        match (tokens.next(), tokens.next()) {
            (Some(operand), None) => Ok(operand),
            _ => Err(self.error(
                span,
                format!("`{}` takes exactly one resource name", keyword),
                None,
            )),
        }
    }

    /// Split `(<mailbox>, <rest>)`; the rest runs to the last `)`
    fn message_operands<'t>(
        &self,
        keyword: &str,
        args: &'t str,
        span: (usize, usize),
    ) -> LoadResult<(&'t str, Option<&'t str>)> {
        let args = args.trim();
        let inner = args
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'));
        let Some(inner) = inner else {
            return Err(self.error(
                span,
                format!("`{}` operands must be parenthesized", keyword),
                Some("Write mailbox operations as: send (M1, message) or recv (M1, var)"),
            ));
        };

        let (mailbox, second) = match inner.split_once(',') {
            Some((mailbox, rest)) => (mailbox.trim(), Some(rest.trim()).filter(|s| !s.is_empty())),
            None => (inner.trim(), None),
        };
        if mailbox.is_empty() || mailbox.contains(char::is_whitespace) {
            return Err(self.error(span, format!("`{}` needs a mailbox name", keyword), None));
        }
        Ok((mailbox, second))
    }

    fn finish(self) -> LoadResult<LoadedModel> {
        let mut builder = LoadedModel::builder();
        for name in &self.resources {
            builder = builder.with_resource(name);
        }
        for name in &self.mailboxes {
            builder = builder.with_mailbox(name);
        }
        for (name, instructions) in self.processes {
            builder = builder.with_process(name, instructions);
        }
        let model = builder.build()?;

        lint(&model);
        debug!(
            processes = model.processes().len(),
            resources = model.resources().len(),
            mailboxes = model.mailboxes().len(),
            instructions = model.instruction_count(),
            "process definition loaded"
        );
        Ok(model)
    }

    fn error(
        &self,
        span: (usize, usize),
        message: impl Into<String>,
        help: Option<&str>,
    ) -> LoadError {
        LoadError::Syntax(SyntaxError {
            message: message.into(),
            src: NamedSource::new(self.source_name, self.text.to_string()),
            span: SourceSpan::from(span),
            help: help.map(String::from),
        })
    }
}

/// Warn about names the run will treat as configuration defects
fn lint(model: &LoadedModel) {
    let resources: AHashSet<&str> = model.resources().iter().map(Name::as_str).collect();
    let mailboxes: AHashSet<&str> = model.mailboxes().iter().map(Name::as_str).collect();

    for spec in model.processes() {
        for instruction in spec.instructions.iter() {
            match instruction {
                Instruction::Request { resource } | Instruction::Release { resource }
                    if !resources.contains(resource.as_str()) =>
                {
                    warn!(process = %spec.name, resource = %resource, "undeclared resource");
                }
                Instruction::Send { mailbox, .. } | Instruction::Receive { mailbox, .. }
                    if !mailboxes.contains(mailbox.as_str()) =>
                {
                    warn!(process = %spec.name, mailbox = %mailbox, "undeclared mailbox");
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
Processes
P1 P2
Resources
R1 R2 R2
Mailboxes
M1

Process P1
req R1
send (M1, hello there)
rel R1
Process P2
recv (M1, msg)
";

    #[test]
    fn test_parse_sample() {
        let model = parse_str("sample", SAMPLE).unwrap();

        assert_eq!(model.processes().len(), 2);
        assert_eq!(model.resources().len(), 3);
        assert_eq!(model.mailboxes(), &[Name::from("M1")]);
        assert_eq!(
            model.processes()[0].instructions.to_vec(),
            vec![
                Instruction::request("R1"),
                Instruction::send("M1", "hello there"),
                Instruction::release("R1"),
            ]
        );
        assert_eq!(
            model.processes()[1].instructions.to_vec(),
            vec![Instruction::Receive {
                mailbox: Name::from("M1"),
                binding: Some(Name::from("msg")),
            }]
        );
    }

    #[test]
    fn test_process_without_block_has_no_instructions() {
        let model = parse_str("t", "Processes\nP1 P2\nResources\nR\nProcess P2\nreq R\n").unwrap();
        assert!(model.processes()[0].instructions.is_empty());
        assert_eq!(model.processes()[1].instructions.len(), 1);
        assert!(model.mailboxes().is_empty());
    }

    #[test]
    fn test_comments_and_crlf() {
        let text = "# demo\r\nProcesses\r\nP1\r\nResources\r\nR1\r\n\r\nProcess P1\r\n  req R1\r\n";
        let model = parse_str("t", text).unwrap();
        assert_eq!(
            model.processes()[0].instructions.to_vec(),
            vec![Instruction::request("R1")]
        );
    }

    #[test]
    fn test_unknown_instruction_points_at_line() {
        let text = "Processes\nP1\nProcess P1\nwait R1\n";
        let err = parse_str("t", text).unwrap_err();
        match err {
            LoadError::Syntax(syntax) => {
                assert_eq!(syntax.message, "Unknown instruction `wait`");
                assert_eq!(syntax.span.offset(), text.find("wait").unwrap());
                assert_eq!(syntax.span.len(), "wait R1".len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_process_block() {
        let err = parse_str("t", "Processes\nP1\nProcess P9\nreq R\n").unwrap_err();
        assert!(err.to_string().contains("undeclared process P9"));
    }

    #[test]
    fn test_malformed_send() {
        let err = parse_str("t", "Processes\nP1\nProcess P1\nsend M1 hi\n").unwrap_err();
        assert!(matches!(err, LoadError::Syntax(_)));

        let err = parse_str("t", "Processes\nP1\nProcess P1\nsend (M1)\n").unwrap_err();
        assert!(err.to_string().contains("missing its message"));
    }

    #[test]
    fn test_instruction_outside_block() {
        let err = parse_str("t", "Processes\nP1\nreq R1\n").unwrap_err();
        assert!(err.to_string().contains("outside a process block"));
    }

    #[test]
    fn test_duplicate_process_declaration() {
        let err = parse_str("t", "Processes\nP1 P1\n").unwrap_err();
        assert!(matches!(err, LoadError::DuplicateProcess(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file("/nonexistent/process.list").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
