pub mod claims;
pub mod clock;
pub mod codec;
pub mod errors;

pub use claims::SessionClaims;
pub use clock::Clock;
pub use clock::SystemClock;
pub use codec::TokenCodec;
pub use errors::TokenError;
