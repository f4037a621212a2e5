/// Keys the demo reacts to. Everything else maps to [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Switch to wireframe rendering.
    W,
    /// Switch back to filled rendering.
    F,
    /// Quit.
    Q,
    /// Quit.
    Escape,
    /// Toggle the UI overlay.
    F1,
    Other,
}

impl Key {
    /// Whether pressing this key asks the application to close.
    pub fn requests_close(self) -> bool {
        matches!(self, Key::Escape | Key::Q)
    }
}

/// An input event, already translated out of the window library's types.
///
/// The frame loop consumes these, never raw window events, so update logic
/// can be driven from tests without a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key transitioned to pressed. Releases and repeats are not forwarded.
    KeyPressed(Key),
    /// Scroll offsets in lines. `dy > 0` scrolls up (zoom in).
    Scroll { dx: f32, dy: f32 },
    /// Framebuffer resized to the given size in pixels.
    Resized { width: u32, height: u32 },
    /// The window manager asked the window to close.
    CloseRequested,
}

impl InputEvent {
    /// Whether this event moves the frame loop towards closing.
    pub fn requests_close(&self) -> bool {
        match self {
            InputEvent::CloseRequested => true,
            InputEvent::KeyPressed(key) => key.requests_close(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_and_q_request_close() {
        assert!(InputEvent::KeyPressed(Key::Escape).requests_close());
        assert!(InputEvent::KeyPressed(Key::Q).requests_close());
        assert!(InputEvent::CloseRequested.requests_close());
    }

    #[test]
    fn other_events_do_not_close() {
        assert!(!InputEvent::KeyPressed(Key::W).requests_close());
        assert!(!InputEvent::KeyPressed(Key::Other).requests_close());
        assert!(!InputEvent::Scroll { dx: 0.0, dy: 1.0 }.requests_close());
        assert!(
            !InputEvent::Resized {
                width: 800,
                height: 600
            }
            .requests_close()
        );
    }
}
