use crate::{
    album::{input::AlbumInput, key::SlotId},
    assets::encoded::EncodedImage,
    foundation::error::{AlbumError, AlbumResult},
};

/// Lifecycle of one slot. The image exists only when done, the message only on error.
#[derive(Clone, Debug, PartialEq)]
pub enum SlotStatus {
    Pending,
    Done(EncodedImage),
    Error(String),
}

impl SlotStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn image(&self) -> Option<&EncodedImage> {
        match self {
            Self::Done(img) => Some(img),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyledImageSlot {
    pub id: SlotId,
    pub status: SlotStatus,
    /// How many times this slot has been requested; results for older attempts are dropped.
    pub attempt: u64,
}

/// Style name to its slots, in declared style order and variation order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleCollection {
    styles: Vec<(String, Vec<StyledImageSlot>)>,
}

impl StyleCollection {
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn style_names(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|(name, _)| name.as_str())
    }

    pub fn slots_for(&self, style: &str) -> Option<&[StyledImageSlot]> {
        self.styles
            .iter()
            .find(|(name, _)| name == style)
            .map(|(_, slots)| slots.as_slice())
    }

    pub fn get(&self, id: &SlotId) -> Option<&StyledImageSlot> {
        self.slots_for(&id.style)?
            .iter()
            .find(|s| s.id.variation == id.variation)
    }

    fn get_mut(&mut self, id: &SlotId) -> Option<&mut StyledImageSlot> {
        self.styles
            .iter_mut()
            .find(|(name, _)| *name == id.style)?
            .1
            .iter_mut()
            .find(|s| s.id.variation == id.variation)
    }

    /// Every slot in display order.
    pub fn iter(&self) -> impl Iterator<Item = &StyledImageSlot> {
        self.styles.iter().flat_map(|(_, slots)| slots.iter())
    }
}

/// Inputs to [`SessionState::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Start over with one pending slot per style and variation.
    GenerationStarted { styles: Vec<String>, variations: u32 },
    /// The request for `slot` made at `attempt` finished.
    SlotSettled {
        slot: SlotId,
        attempt: u64,
        outcome: Result<EncodedImage, String>,
    },
    /// Put one slot back to pending ahead of a new request.
    ResetRequested { slot: SlotId },
}

/// Counts of slots per status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub done: usize,
    pub failed: usize,
    pub pending: usize,
}

/// Per-slot generation state, advanced only through [`SessionState::apply`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    collection: StyleCollection,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the state that follows `event`; `self` is left untouched.
    pub fn apply(&self, event: SessionEvent) -> Self {
        let mut next = self.clone();
        match event {
            SessionEvent::GenerationStarted { styles, variations } => {
                let mut fresh = StyleCollection::default();
                for style in styles {
                    if fresh.slots_for(&style).is_some() {
                        continue;
                    }
                    let slots = (1..=variations)
                        .map(|variation| {
                            let id = SlotId::new(style.clone(), variation);
                            let attempt = self.collection.get(&id).map_or(0, |s| s.attempt) + 1;
                            StyledImageSlot {
                                id,
                                status: SlotStatus::Pending,
                                attempt,
                            }
                        })
                        .collect();
                    fresh.styles.push((style, slots));
                }
                next.collection = fresh;
            }
            SessionEvent::SlotSettled {
                slot,
                attempt,
                outcome,
            } => {
                if let Some(s) = next.collection.get_mut(&slot)
                    && s.status.is_pending()
                    && s.attempt == attempt
                {
                    s.status = match outcome {
                        Ok(img) => SlotStatus::Done(img),
                        Err(msg) => SlotStatus::Error(msg),
                    };
                }
            }
            SessionEvent::ResetRequested { slot } => {
                if let Some(s) = next.collection.get_mut(&slot) {
                    s.status = SlotStatus::Pending;
                    s.attempt += 1;
                }
            }
        }
        next
    }

    pub fn collection(&self) -> &StyleCollection {
        &self.collection
    }

    pub fn slot(&self, id: &SlotId) -> Option<&StyledImageSlot> {
        self.collection.get(id)
    }

    pub fn slots(&self) -> impl Iterator<Item = &StyledImageSlot> {
        self.collection.iter()
    }

    pub fn progress(&self) -> Progress {
        let mut p = Progress::default();
        for s in self.slots() {
            p.total += 1;
            match s.status {
                SlotStatus::Pending => p.pending += 1,
                SlotStatus::Done(_) => p.done += 1,
                SlotStatus::Error(_) => p.failed += 1,
            }
        }
        p
    }

    /// `true` while any slot still waits for a result.
    pub fn is_generating(&self) -> bool {
        self.slots().any(|s| s.status.is_pending())
    }

    /// Album input holding every slot, or `NotReady` if any slot is not done.
    pub fn album_input(&self) -> AlbumResult<AlbumInput> {
        if self.collection.is_empty() {
            return Err(AlbumError::validation("no slots have been requested yet"));
        }
        let mut pending = Vec::new();
        let mut failed = Vec::new();
        let mut input = AlbumInput::new();
        for s in self.slots() {
            match &s.status {
                SlotStatus::Done(img) => {
                    input.insert_slot(&s.id, img.clone());
                }
                SlotStatus::Pending => pending.push(s.id.key()),
                SlotStatus::Error(_) => failed.push(s.id.key()),
            }
        }
        if !pending.is_empty() || !failed.is_empty() {
            return Err(AlbumError::NotReady { pending, failed });
        }
        Ok(input)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
