/// Side length of the square Omok board.
pub const BOARD_SIZE: usize = 15;

/// Stones in an unbroken line needed to win. Longer lines win too.
pub const WIN_LENGTH: usize = 5;
