//! Kingdom experience awards.

/// Most RP that can be converted into XP in one turn.
pub const MAX_RP_XP: i32 = 120;

/// XP for resolving an event, by event level minus kingdom level.
///
/// Differences beyond four levels either way use the table's ends.
pub fn event_xp(level_difference: i32) -> i32 {
    match level_difference.clamp(-4, 4) {
        -4 => 10,
        -3 => 15,
        -2 => 20,
        -1 => 30,
        0 => 40,
        1 => 60,
        2 => 80,
        3 => 120,
        _ => 160,
    }
}

/// XP for claiming `hexes` hexes at kingdom size `size`.
///
/// The standard award is 10 XP a hex. The Vance and Kerenshara rules pay
/// more for the first hexes and less as the kingdom grows.
pub fn hex_xp(hexes: i32, size: i32, homebrew: bool) -> i32 {
    let hexes = hexes.max(0);
    if !homebrew {
        return hexes * 10;
    }
    let per_hex = if size < 10 {
        100
    } else if size < 25 {
        50
    } else if size < 50 {
        25
    } else if size < 100 {
        10
    } else {
        5
    };
    hexes * per_hex
}

/// XP for converting unspent resource points at the end of a turn.
///
/// The standard rules pay 1 XP per RP up to [`MAX_RP_XP`]. The Vance and
/// Kerenshara rules pay 1 XP per RP without a cap below level 20.
pub fn rp_xp(rp: i32, level: i32, homebrew: bool) -> i32 {
    let rp = rp.max(0);
    if homebrew && level < 20 {
        rp
    } else {
        rp.min(MAX_RP_XP)
    }
}

/// XP for unused creative and supernatural solutions.
pub fn solution_xp(creative: i32, supernatural: i32) -> i32 {
    (creative.max(0) + supernatural.max(0)) * 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_xp_table() {
        assert_eq!(event_xp(0), 40);
        assert_eq!(event_xp(-2), 20);
        assert_eq!(event_xp(3), 120);
        assert_eq!(event_xp(9), 160);
        assert_eq!(event_xp(-9), 10);
    }

    #[test]
    fn hex_xp_rules() {
        assert_eq!(hex_xp(2, 30, false), 20);
        assert_eq!(hex_xp(2, 5, true), 200);
        assert_eq!(hex_xp(1, 60, true), 10);
        assert_eq!(hex_xp(-1, 5, true), 0);
    }

    #[test]
    fn rp_xp_is_capped() {
        assert_eq!(rp_xp(50, 3, false), 50);
        assert_eq!(rp_xp(300, 3, false), 120);
        assert_eq!(rp_xp(300, 3, true), 300);
        assert_eq!(rp_xp(300, 20, true), 120);
    }

    #[test]
    fn solutions_pay_ten_each() {
        assert_eq!(solution_xp(1, 2), 30);
    }
}
