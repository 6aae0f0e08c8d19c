//! Board-number to link-layer-address mapping.
//!
//! Pure function over a fixed table; no state. Boards are addressed
//! 1-indexed (`board_num` in `[1, N]`) — the source this core is grounded
//! on carried two inconsistent indexing schemes across its variants; this
//! module standardizes on `table[board_num - 1]`.

use crate::error::{ConfigError, Error};

/// Link-layer address for a board (e.g. the radio module's node id byte).
pub type LinkAddr = u8;

/// Fixed address table, indexed by `board_num - 1`.
///
/// This mirrors the source fleet's fixed five-board deployment; a larger
/// fleet would extend the table, not change the indexing convention.
pub const BOARD_ADDRESSES: [LinkAddr; 5] = [0xA0, 0xB3, 0xC6, 0xD9, 0xEC];

/// Resolve a 1-indexed board number to its link-layer address.
///
/// # Errors
/// Returns [`ConfigError::BadBoardId`] if `board_num` is `0` or exceeds the
/// table's length.
pub fn addr(board_num: u8) -> Result<LinkAddr, Error> {
    if board_num == 0 {
        return Err(ConfigError::BadBoardId(board_num).into());
    }
    BOARD_ADDRESSES
        .get(board_num as usize - 1)
        .copied()
        .ok_or(ConfigError::BadBoardId(board_num).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_one_maps_to_first_table_entry() {
        assert_eq!(addr(1).unwrap(), 0xA0);
    }

    #[test]
    fn board_five_maps_to_last_table_entry() {
        assert_eq!(addr(5).unwrap(), 0xEC);
    }

    #[test]
    fn board_zero_is_rejected() {
        assert!(addr(0).is_err());
    }

    #[test]
    fn board_beyond_table_is_rejected() {
        assert!(addr(6).is_err());
    }
}
