//! Command-line collaborators
//!
//! Recognition shells out to `tesseract`, dictionary lookups to a
//! user-configured command such as `myougiden -c %q`. Both are bounded by a
//! timeout and killed when it expires or the lookup is cancelled.

use crate::pipeline::{Dictionary, Recognizer, Segmentation};
use crate::{LookupError, Result};
use image::{DynamicImage, ImageFormat};
use std::io::{Cursor, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

const OCR_TIMEOUT: Duration = Duration::from_secs(30);
const DICTIONARY_TIMEOUT: Duration = Duration::from_secs(10);
const WAIT_STEP: Duration = Duration::from_millis(50);

/// Placeholder replaced by the query in dictionary templates
const QUERY_PLACEHOLDER: &str = "%q";

/// `tesseract stdin stdout -l <language> --psm <mode>`
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: String,
    language: String,
}

impl TesseractCli {
    pub fn new(program: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }
}

impl Recognizer for TesseractCli {
    fn recognize(
        &self,
        image: &DynamicImage,
        mode: Segmentation,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let mut command = Command::new(&self.program);
        command
            .args(["stdin", "stdout", "-l", &self.language, "--psm"])
            .arg(mode.psm().to_string());

        let output = run_with_timeout(command, Some(png), OCR_TIMEOUT, cancel)?;
        if !output.success {
            return Err(LookupError::Recognition(format!(
                "{} exited with an error: {}",
                self.program,
                output.stderr.trim()
            )));
        }
        Ok(output.stdout)
    }
}

/// Dictionary driven by a command template
#[derive(Debug, Clone)]
pub struct CommandDictionary {
    template: String,
}

impl CommandDictionary {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl Dictionary for CommandDictionary {
    fn lookup(&self, text: &str, cancel: &CancellationToken) -> Result<Option<String>> {
        let (program, args) = build_command(&self.template, text)?;
        let mut command = Command::new(&program);
        command.args(args);

        let output = run_with_timeout(command, None, DICTIONARY_TIMEOUT, cancel)?;
        if !output.success || output.stdout.trim().is_empty() {
            log::debug!("{} has no entry for {}", program, text);
            return Ok(None);
        }
        Ok(Some(output.stdout))
    }
}

/// Split a command template into program and arguments, substituting the
/// query for `%q`. Without a placeholder the query is appended.
pub fn build_command(template: &str, query: &str) -> Result<(String, Vec<String>)> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for c in template.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    parts.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(LookupError::Template(format!(
            "unmatched quote in '{}'",
            template
        )));
    }
    if in_word {
        parts.push(current);
    }

    let mut has_placeholder = false;
    for part in &mut parts {
        if part.contains(QUERY_PLACEHOLDER) {
            *part = part.replace(QUERY_PLACEHOLDER, query);
            has_placeholder = true;
        }
    }
    if !has_placeholder {
        parts.push(query.to_string());
    }

    if parts.len() < 2 || parts[0].is_empty() {
        return Err(LookupError::Template(format!(
            "no program in '{}'",
            template
        )));
    }
    let program = parts.remove(0);
    Ok((program, parts))
}

struct CommandOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

/// Run `command`, feeding `input` on stdin. The child is killed after
/// `timeout` or as soon as `cancel` fires.
fn run_with_timeout(
    mut command: Command,
    input: Option<Vec<u8>>,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<CommandOutput> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Pipes are served on their own threads so neither side can block the wait
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let writer = feed(child.stdin.take(), input);

    let status = wait_for_exit(&mut child, timeout, cancel).map_err(|e| match e {
        WaitError::Io(e) => LookupError::Io(e),
        WaitError::TimedOut => LookupError::Timeout {
            program: program.clone(),
            seconds: timeout.as_secs(),
        },
        WaitError::Cancelled => LookupError::Cancelled(program.clone()),
    })?;

    if let Some(Ok(Err(e))) = writer.map(JoinHandle::join) {
        // A child may exit without reading all of its input
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            return Err(LookupError::Io(e));
        }
        log::debug!("{} closed stdin early", program);
    }

    Ok(CommandOutput {
        success: status.success(),
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut bytes);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

/// Write `input` and close stdin
fn feed(
    stdin: Option<ChildStdin>,
    input: Option<Vec<u8>>,
) -> Option<JoinHandle<std::io::Result<()>>> {
    match (stdin, input) {
        (Some(mut stdin), Some(input)) => Some(std::thread::spawn(move || stdin.write_all(&input))),
        _ => None,
    }
}

enum WaitError {
    Io(std::io::Error),
    TimedOut,
    Cancelled,
}

/// Poll the child until it exits. On timeout or cancellation it is killed
/// and reaped before returning.
fn wait_for_exit(
    child: &mut Child,
    timeout: Duration,
    cancel: &CancellationToken,
) -> std::result::Result<std::process::ExitStatus, WaitError> {
    let start = Instant::now();
    loop {
        let polled = match child.try_wait() {
            Ok(polled) => polled,
            Err(e) => {
                stop(child);
                return Err(WaitError::Io(e));
            }
        };
        match polled {
            Some(status) => return Ok(status),
            None if cancel.is_cancelled() => {
                stop(child);
                return Err(WaitError::Cancelled);
            }
            None if start.elapsed() >= timeout => {
                stop(child);
                return Err(WaitError::TimedOut);
            }
            None => std::thread::sleep(WAIT_STEP),
        }
    }
}

fn stop(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::debug!("Failed to kill child {}: {}", child.id(), e);
    }
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command_replaces_placeholder() {
        let (program, args) = build_command("myougiden -c %q", "読む").unwrap();
        assert_eq!(program, "myougiden");
        assert_eq!(args, vec!["-c".to_string(), "読む".to_string()]);
    }

    #[test]
    fn test_build_command_appends_query() {
        let (program, args) = build_command("sdcv -n", "word").unwrap();
        assert_eq!(program, "sdcv");
        assert_eq!(args, vec!["-n".to_string(), "word".to_string()]);
    }

    #[test]
    fn test_build_command_quotes() {
        let (program, args) = build_command("sh -c 'dict \"%q\"'", "x").unwrap();
        assert_eq!(program, "sh");
        assert_eq!(args, vec!["-c".to_string(), "dict \"x\"".to_string()]);
    }

    #[test]
    fn test_build_command_errors() {
        assert!(build_command("dict 'oops", "x").is_err());
        assert!(build_command("   ", "x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_dictionary_command_output() {
        let cancel = CancellationToken::new();
        let dictionary = CommandDictionary::new("echo entry:%q");
        assert_eq!(
            dictionary.lookup("abc", &cancel).unwrap(),
            Some("entry:abc\n".to_string())
        );

        let missing = CommandDictionary::new("false");
        assert_eq!(missing.lookup("abc", &cancel).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_is_fed_to_command() {
        let output = run_with_timeout(
            Command::new("cat"),
            Some(b"page bytes".to_vec()),
            DICTIONARY_TIMEOUT,
            &CancellationToken::new(),
        )
        .unwrap();
        assert!(output.success);
        assert_eq!(output.stdout, "page bytes");
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_kills_running_command() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(format!("sleep 2; touch '{}'", marker.display()));

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(300));
            trigger.cancel();
        });

        let start = Instant::now();
        let result = run_with_timeout(command, None, DICTIONARY_TIMEOUT, &cancel);
        canceller.join().unwrap();

        assert!(matches!(result, Err(LookupError::Cancelled(_))));
        assert!(start.elapsed() < Duration::from_secs(2));

        std::thread::sleep(Duration::from_millis(2500));
        assert!(!marker.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_when_child_ignores_stdin() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("exec sleep 5");

        // Larger than a pipe buffer, so a blocking write would never return
        let input = vec![0u8; 1 << 20];
        let start = Instant::now();
        let result = run_with_timeout(
            command,
            Some(input),
            Duration::from_millis(300),
            &CancellationToken::new(),
        );

        assert!(matches!(result, Err(LookupError::Timeout { .. })));
        assert!(start.elapsed() < Duration::from_secs(4));
    }
}
