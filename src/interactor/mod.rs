pub mod swap_interactor;
pub mod swap_state;

pub use swap_interactor::{SwapInteractor, SwapInteractorImpl};
pub use swap_state::{Effect, QuoteRequest, SwapEvent, SwapPhase, SwapState, QUOTE_REFRESH_TICKS};
