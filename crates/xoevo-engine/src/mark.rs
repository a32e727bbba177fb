/// A player's symbol.
///
/// `X` always moves first. In state vectors `X` is encoded as `+1.0` and `O`
/// as `-1.0`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Mark {
    #[display("X")]
    X,
    #[display("O")]
    O,
}

impl Mark {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    #[must_use]
    pub const fn encode(self) -> f64 {
        match self {
            Mark::X => 1.0,
            Mark::O => -1.0,
        }
    }
}
