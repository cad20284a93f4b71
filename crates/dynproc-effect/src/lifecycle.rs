//! Effect lifecycle state machine.
//!
//! ```text
//!          open                start
//! Init -----------> Idle -----------> Processing
//!      <-----------      <-----------
//!          close            stop / reset
//! ```
//!
//! Repeating a transition that is already satisfied is a no-op. Closing
//! while processing and sending commands before `open` are errors.

use dynproc_core::{CommandId, EffectError, EffectResult, State};

/// Tracks the [`State`] of one effect instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    state: State,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != State::Init
    }

    /// Init -> Idle. Returns false if the instance was already open.
    pub fn open(&mut self) -> bool {
        if self.state != State::Init {
            return false;
        }
        self.set(State::Idle);
        true
    }

    /// Idle -> Init. Returns false if the instance was not open.
    pub fn close(&mut self) -> EffectResult<bool> {
        match self.state {
            State::Init => Ok(false),
            State::Processing => Err(EffectError::illegal_state("closeAtProcessing")),
            State::Idle => {
                self.set(State::Init);
                Ok(true)
            }
        }
    }

    /// Fail unless the instance is open.
    pub fn ensure_open(&self) -> EffectResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(EffectError::illegal_state("instanceNotOpen"))
        }
    }

    /// State after `command` has been carried out.
    pub fn apply_command(&mut self, command: CommandId) -> EffectResult<State> {
        self.ensure_open()?;
        match command {
            CommandId::Start => self.set(State::Processing),
            CommandId::Stop | CommandId::Reset => self.set(State::Idle),
            CommandId::Vendor(_) => {}
        }
        Ok(self.state)
    }

    fn set(&mut self, next: State) {
        if self.state != next {
            log::debug!("state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let mut lc = Lifecycle::new();
        assert_eq!(lc.state(), State::Init);
        assert!(lc.open());
        assert_eq!(lc.apply_command(CommandId::Start).unwrap(), State::Processing);
        assert_eq!(lc.apply_command(CommandId::Stop).unwrap(), State::Idle);
        assert!(lc.close().unwrap());
        assert_eq!(lc.state(), State::Init);
    }

    #[test]
    fn test_repeated_transitions_are_noops() {
        let mut lc = Lifecycle::new();
        assert!(!lc.close().unwrap());
        assert!(lc.open());
        assert!(!lc.open());
        lc.apply_command(CommandId::Start).unwrap();
        assert_eq!(lc.apply_command(CommandId::Start).unwrap(), State::Processing);
        lc.apply_command(CommandId::Reset).unwrap();
        assert_eq!(lc.apply_command(CommandId::Stop).unwrap(), State::Idle);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut lc = Lifecycle::new();
        let err = lc.apply_command(CommandId::Start).unwrap_err();
        assert_eq!(err, EffectError::illegal_state("instanceNotOpen"));

        lc.open();
        lc.apply_command(CommandId::Start).unwrap();
        assert!(matches!(lc.close(), Err(EffectError::IllegalState(_))));
        assert_eq!(lc.state(), State::Processing);
    }
}
