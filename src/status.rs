//! Status sinks: where human readable state updates end up.
//!
//! The controllers only see the [`StatusSink`] trait. On the rover the
//! [`StatusBoard`] keeps the latest line for the web page, tests pass a
//! closure.
use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;
use log::info;

use crate::config::STATUS_CAPACITY;

pub type StatusLine = String<STATUS_CAPACITY>;

/// Fire-and-forget destination for status lines. Must not block the caller.
pub trait StatusSink {
    fn show(&mut self, status: &str);
}

impl<F> StatusSink for F
where
    F: FnMut(&str),
{
    fn show(&mut self, status: &str) {
        self(status)
    }
}

/// Holds the most recent status line. Stands in for the on-board display.
pub struct StatusBoard {
    line: Mutex<CriticalSectionRawMutex, RefCell<StatusLine>>,
}

pub static STATUS_BOARD: StatusBoard = StatusBoard::new();

impl StatusBoard {
    pub const fn new() -> Self {
        Self {
            line: Mutex::new(RefCell::new(String::new())),
        }
    }

    pub fn sink(&self) -> BoardSink<'_> {
        BoardSink(self)
    }

    pub fn current(&self) -> StatusLine {
        self.line.lock(|line| line.borrow().clone())
    }

    fn replace(&self, status: &str) {
        self.line
            .lock(|line| *line.borrow_mut() = bounded::<STATUS_CAPACITY>(status));
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink writing into a [`StatusBoard`] (and the log).
#[derive(Clone, Copy)]
pub struct BoardSink<'a>(&'a StatusBoard);

impl StatusSink for BoardSink<'_> {
    fn show(&mut self, status: &str) {
        info!("[STATUS] {status}");
        self.0.replace(status);
    }
}

/// Copies `text` into a fixed capacity string, cutting it on the last char
/// boundary that fits.
pub fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut end = text.len().min(N);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::new();
    // cannot fail: end <= N
    let _ = out.push_str(&text[..end]);
    out
}
