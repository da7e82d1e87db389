use std::collections::VecDeque;
use std::io::{Error, ErrorKind, Read, Result, Write};

/// A fake server connection for driving a [`Client`](crate::Client) in tests.
///
/// The greeting is readable right away. Each scripted reply becomes readable once the client has
/// written a complete command line, so a test that sends more commands than it scripted sees the
/// connection close.
#[derive(Debug, Default)]
pub struct MockStream {
    readable: VecDeque<u8>,
    replies: VecDeque<Vec<u8>>,
    line: Vec<u8>,
    commands: Vec<String>,
    trickle: usize,
    failure: Option<ErrorKind>,
}

impl MockStream {
    pub fn new() -> MockStream {
        MockStream::default()
    }

    /// Make `greeting` readable before any command is sent.
    pub fn greeting(mut self, greeting: &[u8]) -> MockStream {
        self.readable.extend(greeting);
        self
    }

    /// Queue the server's answer to the next command.
    pub fn reply(mut self, reply: &[u8]) -> MockStream {
        self.replies.push_back(reply.to_vec());
        self
    }

    /// Hand out the next `reads` reads one byte at a time.
    pub fn trickle(mut self, reads: usize) -> MockStream {
        self.trickle = reads;
        self
    }

    /// Fail every read once nothing is left to read, instead of reporting end of stream.
    pub fn failing(mut self, kind: ErrorKind) -> MockStream {
        self.failure = Some(kind);
        self
    }

    /// The command lines received so far, without line endings.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.readable.is_empty() {
            return match self.failure {
                Some(kind) => Err(Error::new(kind, "connection failed")),
                None => Ok(0),
            };
        }
        let mut n = buf.len().min(self.readable.len());
        if self.trickle > 0 {
            self.trickle -= 1;
            n = n.min(1);
        }
        for (slot, byte) in buf.iter_mut().zip(self.readable.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        for &byte in buf {
            self.line.push(byte);
            if self.line.ends_with(b"\r\n") {
                let line = String::from_utf8_lossy(&self.line[..self.line.len() - 2]).into_owned();
                self.commands.push(line);
                self.line.clear();
                if let Some(reply) = self.replies.pop_front() {
                    self.readable.extend(reply);
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
