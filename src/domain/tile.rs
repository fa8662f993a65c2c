/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    Indestructible, // Border and even/even pillars, never changes
    Destructible,   // Breakable wall, becomes Empty when caught in a blast
}

impl Tile {
    /// Can an entity occupy this cell?
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Empty)
    }

    /// Does a blast turn this tile into Empty?
    pub fn is_destructible(self) -> bool {
        matches!(self, Tile::Destructible)
    }

    /// Does a blast stop here without affecting the cell at all?
    pub fn absorbs_blast(self) -> bool {
        matches!(self, Tile::Indestructible)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_empty_is_walkable() {
        assert!(Tile::Empty.is_walkable());
        assert!(!Tile::Destructible.is_walkable());
        assert!(!Tile::Indestructible.is_walkable());
    }

    #[test]
    fn blast_properties() {
        assert!(Tile::Destructible.is_destructible());
        assert!(!Tile::Indestructible.is_destructible());
        assert!(Tile::Indestructible.absorbs_blast());
        assert!(!Tile::Destructible.absorbs_blast());
        assert!(!Tile::Empty.absorbs_blast());
    }
}
