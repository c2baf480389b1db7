use std::fmt;

/// Stages of a swap submission, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStage {
    Preparing,
    AwaitingApproval,
    Sending,
    Confirming,
}

impl SwapStage {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Preparing => "Preparing swap transaction...",
            Self::AwaitingApproval => "Waiting for wallet approval...",
            Self::Sending => "Sending transaction...",
            Self::Confirming => "Confirming transaction...",
        }
    }
}

impl fmt::Display for SwapStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}
