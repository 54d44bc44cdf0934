use super::actor::Actor;
use super::geometry::TileCoord;
use super::tilemap::TileMap;

/// Something the player can talk to by facing its tile.
pub trait Interactable {
    fn occupied_tile(&self, tile_size: u32) -> TileCoord;
    fn dialogue(&self) -> &[String];
}

#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    name: String,
    actor: Actor,
    dialogue: Vec<String>,
}

impl Npc {
    pub fn new(name: impl Into<String>, actor: Actor, dialogue: Vec<String>) -> Self {
        Self {
            name: name.into(),
            actor,
            dialogue,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }
}

impl Interactable for Npc {
    fn occupied_tile(&self, tile_size: u32) -> TileCoord {
        self.actor.occupied_tile(tile_size)
    }

    fn dialogue(&self) -> &[String] {
        &self.dialogue
    }
}

/// Tile directly in front of `player`, or `None` when it lies off the map.
pub fn facing_tile(player: &Actor, tile_map: &TileMap) -> Option<TileCoord> {
    let target = player
        .occupied_tile(tile_map.tile_size())
        .offset(player.facing());
    tile_map.contains(target).then_some(target)
}

/// Dialogue of the first interactable (in slice order) standing on the
/// tile the player faces.
pub fn try_interact<'a, T: Interactable>(
    player: &Actor,
    npcs: &'a [T],
    tile_map: &TileMap,
) -> Option<&'a [String]> {
    let target = facing_tile(player, tile_map)?;
    npcs.iter()
        .find(|npc| npc.occupied_tile(tile_map.tile_size()) == target)
        .map(Interactable::dialogue)
}
