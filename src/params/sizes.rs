use std::collections::BTreeMap;

use super::bind::InputSize;
use super::param::{WrappedFrame, WrappedParam};

/// Storage-class directives registered with the driver before execution.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeDirectives {
    /// One slot per bind position; `None` leaves the driver's own inference.
    Positional(Vec<Option<InputSize>>),
    /// Only keys with a directive are present.
    Named(BTreeMap<String, InputSize>),
}

impl SizeDirectives {
    /// Returns true when no position carries a directive.
    pub fn is_empty(&self) -> bool {
        match self {
            SizeDirectives::Positional(sizes) => sizes.iter().all(Option::is_none),
            SizeDirectives::Named(sizes) => sizes.is_empty(),
        }
    }

    pub fn position(&self, index: usize) -> Option<InputSize> {
        match self {
            SizeDirectives::Positional(sizes) => sizes.get(index).copied().flatten(),
            SizeDirectives::Named(_) => None,
        }
    }

    pub fn key(&self, key: &str) -> Option<InputSize> {
        match self {
            SizeDirectives::Positional(_) => None,
            SizeDirectives::Named(sizes) => sizes.get(key).copied(),
        }
    }
}

/// Computes the directives for a batch of frames bound to the same statement.
///
/// The first frame fixes the shape; frames of a different shape and
/// positions past the first frame's length contribute nothing.
pub fn guess_input_sizes(frames: &[WrappedFrame]) -> SizeDirectives {
    match frames.first() {
        None => SizeDirectives::Positional(Vec::new()),
        Some(WrappedFrame::Positional(first)) => {
            let mut sizes: Vec<Option<InputSize>> = vec![None; first.len()];
            for frame in frames {
                if let WrappedFrame::Positional(params) = frame {
                    for (slot, param) in sizes.iter_mut().zip(params) {
                        widen_slot(slot, param);
                    }
                }
            }
            SizeDirectives::Positional(sizes)
        }
        Some(WrappedFrame::Named(_)) => {
            let mut sizes: BTreeMap<String, InputSize> = BTreeMap::new();
            for frame in frames {
                if let WrappedFrame::Named(params) = frame {
                    for (key, param) in params {
                        if let Some(size) = param.input_size {
                            sizes
                                .entry(key.clone())
                                .and_modify(|current| *current = current.widen(size))
                                .or_insert(size);
                        }
                    }
                }
            }
            SizeDirectives::Named(sizes)
        }
    }
}

fn widen_slot(slot: &mut Option<InputSize>, param: &WrappedParam) {
    if let Some(size) = param.input_size {
        *slot = Some(match *slot {
            Some(current) => current.widen(size),
            None => size,
        });
    }
}
