//! Type-to-confirm gate for destructive dialogs.
//!
//! Policy is arm-then-type: the first click on the destructive button only
//! arms the gate and reveals the text input; the action runs on a later
//! click once the typed phrase matches exactly. One policy everywhere —
//! a dead first click is a bug, not a variant.

/// The literal phrase that unlocks a destructive action.
/// Case-sensitive, no trimming: "Delete" and "delete " both stay locked.
pub const CONFIRM_PHRASE: &str = "delete";

/// What a click on the destructive button did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// First click: the gate armed and revealed the text input
    Armed,
    /// Click while the typed phrase does not match; nothing happens
    Ignored,
    /// Click with the exact phrase typed; perform the delete now
    Confirmed,
}

/// Per-dialog-instance confirm state. Not shared between dialogs;
/// reset when its dialog closes.
#[derive(Debug, Clone, Default)]
pub struct ConfirmGate {
    armed: bool,
    typed: String,
}

impl ConfirmGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Record input typed into the confirmation field
    pub fn set_typed(&mut self, text: impl Into<String>) {
        self.typed = text.into();
    }

    /// Whether the confirm control is currently enabled
    pub fn confirm_enabled(&self) -> bool {
        self.armed && self.typed == CONFIRM_PHRASE
    }

    /// Handle a click on the destructive button
    pub fn click(&mut self) -> GateAction {
        if !self.armed {
            self.armed = true;
            return GateAction::Armed;
        }
        if self.typed == CONFIRM_PHRASE {
            GateAction::Confirmed
        } else {
            GateAction::Ignored
        }
    }

    /// Clear the gate, e.g. when the dialog closes
    pub fn reset(&mut self) {
        self.armed = false;
        self.typed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_click_arms_without_deleting() {
        let mut gate = ConfirmGate::new();
        assert_eq!(gate.click(), GateAction::Armed);
        assert!(gate.is_armed());
        assert!(!gate.confirm_enabled());
    }

    #[test]
    fn test_only_exact_phrase_enables_confirm() {
        let mut gate = ConfirmGate::new();
        gate.click();

        for wrong in ["Delete", "delete ", "delet", " delete", "DELETE", ""] {
            gate.set_typed(wrong);
            assert!(!gate.confirm_enabled(), "{wrong:?} must stay disabled");
            assert_eq!(gate.click(), GateAction::Ignored, "{wrong:?} must not fire");
        }

        gate.set_typed("delete");
        assert!(gate.confirm_enabled());
        assert_eq!(gate.click(), GateAction::Confirmed);
    }

    #[test]
    fn test_typing_before_arming_does_not_skip_the_arm_step() {
        let mut gate = ConfirmGate::new();
        gate.set_typed("delete");
        assert!(!gate.confirm_enabled());
        assert_eq!(gate.click(), GateAction::Armed);
        assert_eq!(gate.click(), GateAction::Confirmed);
    }

    #[test]
    fn test_state_survives_a_failed_mutation() {
        // The dialog stays open on failure; the user must not retype.
        let mut gate = ConfirmGate::new();
        gate.click();
        gate.set_typed("delete");
        assert_eq!(gate.click(), GateAction::Confirmed);
        assert!(gate.confirm_enabled(), "gate is preserved for a retry");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut gate = ConfirmGate::new();
        gate.click();
        gate.set_typed("delete");
        gate.reset();
        assert!(!gate.is_armed());
        assert_eq!(gate.typed(), "");
    }
}
