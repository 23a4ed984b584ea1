/// Input event types the engine understands.
/// Generic, with no game-specific meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key went down. Codes follow the DOM `keyCode` numbering.
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
    /// A custom event from the host (gamepad state, UI buttons).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// The host pushes events between frames; the runner drains them once all of
/// the frame's fixed updates have seen them.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Custom events of one kind, in arrival order.
    pub fn custom(&self, kind: u32) -> impl Iterator<Item = (f32, f32, f32)> + '_ {
        self.events.iter().filter_map(move |e| match *e {
            InputEvent::Custom { kind: k, a, b, c } if k == kind => Some((a, b, c)),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::KeyDown { key_code: 32 });
        q.push(InputEvent::KeyUp { key_code: 32 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn custom_events_filtered_by_kind() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 });
        q.push(InputEvent::KeyDown { key_code: 90 });
        q.push(InputEvent::Custom { kind: 2, a: 0.0, b: 0.0, c: 0.0 });
        let sevens: Vec<_> = q.custom(7).collect();
        assert_eq!(sevens, vec![(1.5, 2.5, 3.5)]);
        assert_eq!(q.custom(3).count(), 0);
    }
}
