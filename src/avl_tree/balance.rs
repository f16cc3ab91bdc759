/// A restructuring that restores the avl invariant at a node whose subtrees differ in height by
/// two.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rotation {
    Left,
    Right,
    LeftRight,
    RightLeft,
}

impl Rotation {
    /// Picks the rotation for a node with balance factor `balance`, or `None` if the node is
    /// balanced. The balance factor of the heavy child is only computed when it is needed.
    ///
    /// A left heavy node whose left child leans right needs a double rotation, as does the mirror
    /// case. A heavy child with balance factor zero only happens during removal and is handled by
    /// a single rotation.
    pub fn select<L, R>(balance: i32, left_balance: L, right_balance: R) -> Option<Rotation>
    where
        L: FnOnce() -> i32,
        R: FnOnce() -> i32,
    {
        match balance {
            -1..=1 => None,
            2 => {
                if left_balance() >= 0 {
                    Some(Rotation::Right)
                } else {
                    Some(Rotation::LeftRight)
                }
            },
            -2 => {
                if right_balance() <= 0 {
                    Some(Rotation::Left)
                } else {
                    Some(Rotation::RightLeft)
                }
            },
            _ => panic!("Expected balance factor in [-2, 2], found {}.", balance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Rotation;

    fn unused() -> i32 {
        panic!("child balance should not be read");
    }

    #[test]
    fn test_balanced() {
        for balance in -1..=1 {
            assert_eq!(Rotation::select(balance, unused, unused), None);
        }
    }

    #[test]
    fn test_left_heavy() {
        assert_eq!(Rotation::select(2, || 1, unused), Some(Rotation::Right));
        assert_eq!(Rotation::select(2, || 0, unused), Some(Rotation::Right));
        assert_eq!(Rotation::select(2, || -1, unused), Some(Rotation::LeftRight));
    }

    #[test]
    fn test_right_heavy() {
        assert_eq!(Rotation::select(-2, unused, || -1), Some(Rotation::Left));
        assert_eq!(Rotation::select(-2, unused, || 0), Some(Rotation::Left));
        assert_eq!(Rotation::select(-2, unused, || 1), Some(Rotation::RightLeft));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range() {
        Rotation::select(3, || 0, || 0);
    }
}
