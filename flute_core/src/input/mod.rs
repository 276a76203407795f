pub mod events;

use self::events::InputEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};
use song_schema::{ControlElement, Requirement};

pub struct InputQueue {
    sender: Sender<InputEvent>,
    receiver: Receiver<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Pushes an event into the queue.
    /// This can be called from multiple threads through `sender()`.
    pub fn push(&self, event: InputEvent) {
        let _ = self.sender.send(event);
    }

    /// Pops an event from the queue.
    /// Non-blocking. Returns None if queue is empty.
    pub fn pop(&self) -> Option<InputEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns a clone of the sender, allowing it to be passed to other threads/structs.
    pub fn sender(&self) -> Sender<InputEvent> {
        self.sender.clone()
    }

    /// Applies every pending event to `set`, in arrival order.
    pub fn drain_into(&self, set: &mut ActiveInputSet) -> usize {
        let mut applied = 0;
        while let Some(event) = self.pop() {
            set.apply(&event);
            applied += 1;
        }
        applied
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Control elements currently held down.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveInputSet {
    held: Requirement,
}

impl ActiveInputSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &InputEvent) {
        if event.pressed {
            self.held.insert(event.element);
        } else {
            self.held.remove(&event.element);
        }
    }

    pub fn is_held(&self, element: ControlElement) -> bool {
        self.held.contains(&element)
    }

    pub fn held(&self) -> &Requirement {
        &self.held
    }

    pub fn snapshot(&self) -> Requirement {
        self.held.clone()
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}
