mod session_rng;

pub mod omok;

pub use session_rng::SessionRng;
