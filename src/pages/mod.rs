pub mod confirmation;
pub mod landing;

pub use confirmation::{ConfirmationOutcome, ConfirmationPage, ConfirmationView};
pub use landing::{ClaimOutcome, LandingPage, LandingView};
