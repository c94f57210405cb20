//! Operator command console
//!
//! Reads whitespace-delimited tokens from an input stream, one per prompt, and
//! dispatches each through a keyword table built once at construction. Every
//! handler is a plain function that receives the console context explicitly.
//!
//! | Command    | Effect                                     |
//! |------------|--------------------------------------------|
//! | `date`     | print the local date                       |
//! | `time`     | print the local time                       |
//! | `exit`     | stop the console                           |
//! | `faster`   | shorten the interval by 5000ms if above it |
//! | `slower`   | lengthen the interval by 10000ms           |
//! | `pause`    | stop producing events                      |
//! | `resume`   | produce events again                       |
//! | `level0-2` | select the verbosity tier                  |
//! | `stat`     | count lines in the tier-1 label file       |

use crate::control::ControlHandle;
use chrono::Local;
use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const PROMPT: &str = "Enter a command: ";
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// Whether the console keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Why [`CommandConsole::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleExit {
    /// The operator typed `exit`
    Command,
    /// The input stream was exhausted
    EndOfInput,
}

/// Everything a handler may touch.
#[derive(Debug, Clone)]
pub struct ConsoleContext {
    pub control: ControlHandle,
    /// File counted by `stat`
    pub stat_path: PathBuf,
}

pub type Handler = fn(&ConsoleContext, &mut dyn Write) -> io::Result<Flow>;

pub struct CommandTable {
    handlers: HashMap<&'static str, Handler>,
}

impl CommandTable {
    pub fn new() -> Self {
        let entries: [(&'static str, Handler); 11] = [
            ("date", cmd_date),
            ("time", cmd_time),
            ("exit", cmd_exit),
            ("faster", cmd_faster),
            ("slower", cmd_slower),
            ("pause", cmd_pause),
            ("resume", cmd_resume),
            ("level0", cmd_level0),
            ("level1", cmd_level1),
            ("level2", cmd_level2),
            ("stat", cmd_stat),
        ];

        Self {
            handlers: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<Handler> {
        self.handlers.get(keyword).copied()
    }

    /// Registered keywords, sorted.
    pub fn keywords(&self) -> Vec<&'static str> {
        let mut keywords: Vec<&'static str> = self.handlers.keys().copied().collect();
        keywords.sort_unstable();
        keywords
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CommandConsole {
    table: CommandTable,
    context: ConsoleContext,
}

impl CommandConsole {
    pub fn new(control: ControlHandle, stat_path: impl Into<PathBuf>) -> Self {
        Self {
            table: CommandTable::new(),
            context: ConsoleContext {
                control,
                stat_path: stat_path.into(),
            },
        }
    }

    pub fn context(&self) -> &ConsoleContext {
        &self.context
    }

    /// Execute a single token. Unknown tokens are reported and never stop the
    /// console.
    pub fn dispatch(&self, token: &str, out: &mut dyn Write) -> io::Result<Flow> {
        match self.table.get(token) {
            Some(handler) => {
                debug!(command = token, "Dispatching command");
                handler(&self.context, out)
            }
            None => {
                debug!(command = token, "Unknown command");
                writeln!(out, "{UNKNOWN_COMMAND}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Prompt, read and dispatch until `exit` or end of input. Tokens that
    /// follow `exit` on the same line are not executed. Bytes that are not
    /// UTF-8 decode lossily and end up as unknown commands.
    pub fn run<R: BufRead, W: Write>(
        &self,
        mut input: R,
        out: &mut W,
    ) -> io::Result<ConsoleExit> {
        let mut pending: VecDeque<String> = VecDeque::new();
        let mut line: Vec<u8> = Vec::new();

        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let token = loop {
                if let Some(token) = pending.pop_front() {
                    break Some(token);
                }
                line.clear();
                if input.read_until(b'\n', &mut line)? == 0 {
                    break None;
                }
                pending.extend(
                    line.split(u8::is_ascii_whitespace)
                        .filter(|token| !token.is_empty())
                        .map(|token| String::from_utf8_lossy(token).into_owned()),
                );
            };

            let Some(token) = token else {
                writeln!(out)?;
                info!("Console input closed");
                return Ok(ConsoleExit::EndOfInput);
            };

            if self.dispatch(&token, out)? == Flow::Exit {
                info!("Exit requested");
                return Ok(ConsoleExit::Command);
            }
        }
    }
}

/// Number of newline-delimited lines in `path`; a missing or unreadable file
/// counts as zero.
pub fn count_lines(path: &Path) -> usize {
    match File::open(path) {
        Ok(file) => BufReader::new(file)
            .split(b'\n')
            .map_while(Result::ok)
            .count(),
        Err(e) => {
            debug!(
                path = %path.display(),
                error = %e,
                "Cannot open stat file, counting zero lines"
            );
            0
        }
    }
}

// --- Handlers ---

fn cmd_date(_ctx: &ConsoleContext, out: &mut dyn Write) -> io::Result<Flow> {
    writeln!(out, "Current date: {}", Local::now().format("%Y-%m-%d"))?;
    Ok(Flow::Continue)
}

fn cmd_time(_ctx: &ConsoleContext, out: &mut dyn Write) -> io::Result<Flow> {
    writeln!(out, "Current time: {}", Local::now().format("%H:%M:%S"))?;
    Ok(Flow::Continue)
}

fn cmd_exit(_ctx: &ConsoleContext, _out: &mut dyn Write) -> io::Result<Flow> {
    Ok(Flow::Exit)
}

fn cmd_faster(ctx: &ConsoleContext, out: &mut dyn Write) -> io::Result<Flow> {
    if let Some(interval) = ctx.control.faster() {
        writeln!(
            out,
            "Interval decreased to {} milliseconds.",
            interval.as_millis()
        )?;
    }
    Ok(Flow::Continue)
}

fn cmd_slower(ctx: &ConsoleContext, out: &mut dyn Write) -> io::Result<Flow> {
    let interval = ctx.control.slower();
    writeln!(
        out,
        "Interval increased to {} milliseconds.",
        interval.as_millis()
    )?;
    Ok(Flow::Continue)
}

fn cmd_pause(ctx: &ConsoleContext, _out: &mut dyn Write) -> io::Result<Flow> {
    ctx.control.pause();
    Ok(Flow::Continue)
}

fn cmd_resume(ctx: &ConsoleContext, _out: &mut dyn Write) -> io::Result<Flow> {
    ctx.control.resume();
    Ok(Flow::Continue)
}

fn cmd_level0(ctx: &ConsoleContext, _out: &mut dyn Write) -> io::Result<Flow> {
    ctx.control.set_verbosity_level(0);
    Ok(Flow::Continue)
}

fn cmd_level1(ctx: &ConsoleContext, _out: &mut dyn Write) -> io::Result<Flow> {
    ctx.control.set_verbosity_level(1);
    Ok(Flow::Continue)
}

fn cmd_level2(ctx: &ConsoleContext, _out: &mut dyn Write) -> io::Result<Flow> {
    ctx.control.set_verbosity_level(2);
    Ok(Flow::Continue)
}

fn cmd_stat(ctx: &ConsoleContext, out: &mut dyn Write) -> io::Result<Flow> {
    let count = count_lines(&ctx.stat_path);
    writeln!(
        out,
        "Number of events in {}: {}",
        ctx.stat_path.display(),
        count
    )?;
    Ok(Flow::Continue)
}
