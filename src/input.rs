// keys are read one blocking read at a time; arrows arrive as 3-byte escape
// sequences (27, 91, 65..68), a lone 27 is the escape key itself
use std::io::{self, Read};

use anyhow::Context;
use circular_buffer::CircularBuffer;
use log::trace;
use termios::{tcsetattr, Termios, ECHO, ICANON, TCSANOW, VMIN, VTIME};

type InputBuffer = CircularBuffer<1024, u8>; // 1024 bytes in input buffer

const ESC: u8 = 27;
const CSI: u8 = 91; // '['
const SS3: u8 = 79; // 'O', sent by some terminals in application mode

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Other,
}

/// Where key presses come from
pub trait KeySource {
    /// Wait for the next key press.
    fn read_key(&mut self) -> anyhow::Result<Key>;
}

/// Raw keyboard on stdin.
///
/// Echo and line buffering are switched off while the reader is alive and
/// restored when it is dropped.
pub struct KeyReader {
    old_termios: Termios,
    input_buffer: InputBuffer,
}

impl KeyReader {
    pub fn new() -> anyhow::Result<Self> {
        // 0 is file descriptor for stdin
        let old_termios = Termios::from_fd(0).context("stdin is not a terminal")?;
        let mut new_termios = old_termios; // clone the termios struct
        new_termios.c_lflag &= !(ICANON | ECHO);
        // block until at least one byte is there
        new_termios.c_cc[VMIN] = 1;
        new_termios.c_cc[VTIME] = 0;
        tcsetattr(0, TCSANOW, &new_termios).context("Could not set up the terminal")?;
        Ok(KeyReader {
            old_termios,
            input_buffer: InputBuffer::new(),
        })
    }
}

impl KeySource for KeyReader {
    fn read_key(&mut self) -> anyhow::Result<Key> {
        loop {
            if let Some(key) = decode_key(&mut self.input_buffer) {
                trace!("Key {:?}", key);
                return Ok(key);
            }
            let mut chunk = [0u8; 64];
            let read = io::stdin()
                .read(&mut chunk)
                .context("Could not read from stdin")?;
            if read == 0 {
                anyhow::bail!("stdin was closed");
            }
            fill_buffer(&mut self.input_buffer, &chunk[..read]);
        }
    }
}

impl Drop for KeyReader {
    fn drop(&mut self) {
        // reset stdin to default
        let _ = tcsetattr(0, TCSANOW, &self.old_termios);
    }
}

fn fill_buffer(buffer: &mut InputBuffer, bytes: &[u8]) {
    for &byte in bytes {
        // if the buffer is full, ignore the input
        if buffer.is_full() {
            return;
        }
        buffer.push_back(byte);
    }
}

/// Take one key off the front of the buffer.
///
/// Returns `None` when the buffer is empty or only holds the start of an
/// escape sequence.
fn decode_key(buffer: &mut InputBuffer) -> Option<Key> {
    let first = *buffer.front()?;
    if first != ESC {
        buffer.pop_front();
        return Some(Key::Other);
    }
    match buffer.nth_front(1).copied() {
        // a lone 27 is taken as the escape key right away; an arrow whose
        // bytes get split over two reads decodes as escape plus junk
        None => {
            buffer.pop_front();
            Some(Key::Escape)
        }
        Some(CSI) | Some(SS3) => {
            let third = *buffer.nth_front(2)?;
            for _ in 0..3 {
                buffer.pop_front();
            }
            Some(match third {
                65 => Key::Up,
                66 => Key::Down,
                67 => Key::Right,
                68 => Key::Left,
                _ => Key::Other, // not an arrow
            })
        }
        Some(_) => {
            // escape followed by something else: the escape key was pressed alone
            buffer.pop_front();
            Some(Key::Escape)
        }
    }
}
