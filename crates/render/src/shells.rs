//! Shell pass ordering.
//!
//! One base mesh is drawn `count` times. Shell `i` is displaced outward by the
//! normalized height `i / (count - 1)`. Draws are emitted outermost first so
//! the layers composite correctly under the `Less` depth test.

use shellplanet_common::{MIN_SHELL_COUNT, shell_height};
use std::iter::FusedIterator;

/// Parameters of a single shell draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellDraw {
    /// Shell index in `[0, count)`. 0 is the base surface.
    pub index: u32,
    /// Normalized height in `[0, 1]`.
    pub height: f32,
}

/// Back-to-front iterator over the shells of one frame.
#[derive(Debug, Clone)]
pub struct ShellDraws {
    /// Index of the next shell plus one; 0 when exhausted.
    next: u32,
    count: u32,
}

/// Shells for one frame, from `count - 1` down to 0.
///
/// Requires `count >= 2`.
pub fn shell_draws(count: u32) -> ShellDraws {
    debug_assert!(count >= MIN_SHELL_COUNT, "shell count {count} < 2");
    ShellDraws {
        next: count,
        count,
    }
}

impl Iterator for ShellDraws {
    type Item = ShellDraw;

    fn next(&mut self) -> Option<ShellDraw> {
        if self.next == 0 {
            return None;
        }
        self.next -= 1;
        Some(ShellDraw {
            index: self.next,
            height: shell_height(self.next, self.count),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.next as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ShellDraws {}

impl FusedIterator for ShellDraws {}

/// Receives shell draws in submission order.
///
/// The GPU backend binds the per-shell uniform and issues a draw call; the
/// debug renderer records the sequence.
pub trait ShellSink {
    fn draw_shell(&mut self, draw: ShellDraw);
}

impl ShellSink for Vec<ShellDraw> {
    fn draw_shell(&mut self, draw: ShellDraw) {
        self.push(draw);
    }
}

/// Emit every shell of one frame into `sink`. Returns the number of draws.
pub fn submit_shells<S: ShellSink + ?Sized>(count: u32, sink: &mut S) -> u32 {
    let mut submitted = 0;
    for draw in shell_draws(count) {
        sink.draw_shell(draw);
        submitted += 1;
    }
    submitted
}
