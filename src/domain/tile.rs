/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Obstacle,
}

impl Tile {
    /// Map the raw obstacle bit onto a tile.
    pub fn from_obstacle(obstacle: bool) -> Self {
        if obstacle { Tile::Obstacle } else { Tile::Empty }
    }

    /// Does this tile block movement?
    pub fn is_obstacle(self) -> bool {
        matches!(self, Tile::Obstacle)
    }

    /// Can the player or the goal occupy this cell?
    pub fn is_passable(self) -> bool {
        !self.is_obstacle()
    }
}
