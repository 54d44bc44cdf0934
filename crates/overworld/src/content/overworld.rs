use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use roxmltree::{Document, Node};
use tracing::info;

use crate::world::{
    Actor, Facing, MovementMode, Npc, TileCoord, TileKind, TileMap, World, WorldConfig,
    DEFAULT_STEP_PX, DEFAULT_TILE_SIZE_PX,
};

use super::meadow::{generate_meadow, MEADOW_HEIGHT, MEADOW_WIDTH};

/// Smallest tile that still contains a whole actor box.
pub const MIN_TILE_SIZE_PX: u32 = 16;
pub const MAX_TILE_SIZE_PX: u32 = 256;
pub const MAX_MAP_SIDE_TILES: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownElement,
    UnknownField,
    DuplicateField,
    MissingField,
    InvalidValue,
}

#[derive(Debug, Clone)]
pub struct ContentError {
    pub code: ContentErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for ContentError {}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDef {
    pub tile: TileCoord,
    pub facing: Facing,
    pub movement: MovementMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NpcDef {
    pub name: String,
    pub tile: TileCoord,
    pub facing: Facing,
    pub dialogue: Vec<String>,
}

/// A fully validated overworld: the map plus where everyone stands.
#[derive(Debug, Clone, PartialEq)]
pub struct OverworldDef {
    pub tile_map: TileMap,
    pub player: PlayerDef,
    pub npcs: Vec<NpcDef>,
}

impl OverworldDef {
    pub fn into_world(self, config: WorldConfig) -> World {
        let tile_size = self.tile_map.tile_size();
        // Grid steps are one tile long on any tile size.
        let movement = match self.player.movement {
            MovementMode::GridStepped {
                step_duration_ms, ..
            } => MovementMode::GridStepped {
                step_px: tile_size as f32,
                step_duration_ms,
            },
            continuous => continuous,
        };
        let player = Actor::at_tile(self.player.tile, tile_size, movement)
            .with_facing(self.player.facing);
        let npcs = self
            .npcs
            .into_iter()
            .map(|npc| {
                let actor = Actor::at_tile(npc.tile, tile_size, MovementMode::continuous())
                    .with_facing(npc.facing);
                Npc::new(npc.name, actor, npc.dialogue)
            })
            .collect();
        World::new(self.tile_map, player, npcs, config)
    }
}

/// The meadow with the elder and the merchant, used when no content file
/// is available.
pub fn builtin_overworld() -> OverworldDef {
    OverworldDef {
        tile_map: generate_meadow(MEADOW_WIDTH, MEADOW_HEIGHT, DEFAULT_TILE_SIZE_PX, 0),
        player: PlayerDef {
            tile: TileCoord::new(10, 10),
            facing: Facing::Down,
            movement: MovementMode::continuous(),
        },
        npcs: vec![
            NpcDef {
                name: "elder".to_string(),
                tile: TileCoord::new(15, 9),
                facing: Facing::Down,
                dialogue: vec![
                    "Hello traveler!".to_string(),
                    "Be careful in the tall grass!".to_string(),
                    "Wild creatures lurk there...".to_string(),
                ],
            },
            NpcDef {
                name: "merchant".to_string(),
                tile: TileCoord::new(25, 20),
                facing: Facing::Down,
                dialogue: vec![
                    "I'm a merchant from afar.".to_string(),
                    "The water here has healing properties.".to_string(),
                ],
            },
        ],
    }
}

pub fn load_overworld(path: &Path) -> Result<OverworldDef, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError {
        code: ContentErrorCode::ReadFile,
        message: format!("failed to read overworld file: {source}"),
        file_path: path.to_path_buf(),
        location: None,
    })?;
    let def = parse_overworld(path, &raw)?;
    info!(
        path = %path.display(),
        width = def.tile_map.width(),
        height = def.tile_map.height(),
        npc_count = def.npcs.len(),
        "overworld_loaded"
    );
    Ok(def)
}

pub fn parse_overworld(file_path: &Path, raw: &str) -> Result<OverworldDef, ContentError> {
    let doc = Document::parse(raw).map_err(|error| ContentError {
        code: ContentErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;
    let ctx = ParseContext {
        file_path,
        doc: &doc,
    };

    let root = doc.root_element();
    if root.tag_name().name() != "Overworld" {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidRoot,
            "root element must be <Overworld>".to_string(),
            root,
        ));
    }

    let mut tile_map: Option<TileMap> = None;
    let mut player: Option<(PlayerDef, Node<'_, '_>)> = None;
    let mut npcs = Vec::<(NpcDef, Node<'_, '_>)>::new();

    for child in root.children().filter(|node| node.is_element()) {
        match child.tag_name().name() {
            "Map" => {
                if tile_map.is_some() {
                    return Err(ctx.error_at(
                        ContentErrorCode::DuplicateField,
                        "only one <Map> is allowed".to_string(),
                        child,
                    ));
                }
                tile_map = Some(parse_map(&ctx, child)?);
            }
            "Player" => {
                if player.is_some() {
                    return Err(ctx.error_at(
                        ContentErrorCode::DuplicateField,
                        "only one <Player> is allowed".to_string(),
                        child,
                    ));
                }
                player = Some((parse_player(&ctx, child)?, child));
            }
            "Npc" => npcs.push((parse_npc(&ctx, child)?, child)),
            other => {
                return Err(ctx.error_at(
                    ContentErrorCode::UnknownElement,
                    format!("unsupported element <{other}>; expected <Map>, <Player> or <Npc>"),
                    child,
                ))
            }
        }
    }

    let Some(tile_map) = tile_map else {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            "missing required element <Map>".to_string(),
            root,
        ));
    };
    let Some((player, player_node)) = player else {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            "missing required element <Player>".to_string(),
            root,
        ));
    };

    ensure_standable(&ctx, &tile_map, player.tile, "Player", player_node)?;
    let mut seen_names = HashSet::<String>::new();
    for (npc, node) in &npcs {
        ensure_standable(&ctx, &tile_map, npc.tile, "Npc", *node)?;
        if !seen_names.insert(npc.name.clone()) {
            return Err(ctx.error_at(
                ContentErrorCode::InvalidValue,
                format!("duplicate npc name '{}'", npc.name),
                *node,
            ));
        }
    }

    Ok(OverworldDef {
        tile_map,
        player,
        npcs: npcs.into_iter().map(|(npc, _)| npc).collect(),
    })
}

struct ParseContext<'a, 'input> {
    file_path: &'a Path,
    doc: &'a Document<'input>,
}

impl ParseContext<'_, '_> {
    fn error_at(&self, code: ContentErrorCode, message: String, node: Node<'_, '_>) -> ContentError {
        let pos = self.doc.text_pos_at(node.range().start);
        ContentError {
            code,
            message,
            file_path: self.file_path.to_path_buf(),
            location: Some(SourceLocation {
                line: pos.row as usize,
                column: pos.col as usize,
            }),
        }
    }

    fn required_text(&self, node: Node<'_, '_>, field_name: &str) -> Result<String, ContentError> {
        let value = node.text().map(str::trim).unwrap_or_default().to_string();
        if value.is_empty() {
            return Err(self.error_at(
                ContentErrorCode::MissingField,
                format!("field <{field_name}> must not be empty"),
                node,
            ));
        }
        Ok(value)
    }

    fn number<T: FromStr>(&self, node: Node<'_, '_>, field_name: &str) -> Result<T, ContentError> {
        let value = self.required_text(node, field_name)?;
        value.parse::<T>().map_err(|_| {
            self.error_at(
                ContentErrorCode::InvalidValue,
                format!("{field_name} '{value}' is not a valid number"),
                node,
            )
        })
    }

    fn positive_f32(&self, node: Node<'_, '_>, field_name: &str) -> Result<f32, ContentError> {
        let value: f32 = self.number(node, field_name)?;
        if !value.is_finite() || value <= 0.0 {
            return Err(self.error_at(
                ContentErrorCode::InvalidValue,
                format!("{field_name} must be finite and > 0"),
                node,
            ));
        }
        Ok(value)
    }

    fn facing(&self, node: Node<'_, '_>) -> Result<Facing, ContentError> {
        let value = self.required_text(node, "facing")?;
        Facing::parse(&value).ok_or_else(|| {
            self.error_at(
                ContentErrorCode::InvalidValue,
                format!("invalid facing '{value}'; allowed values: down, up, left, right"),
                node,
            )
        })
    }

    /// Tracks field names on one element and rejects repeats.
    fn check_duplicate(
        &self,
        seen: &mut HashSet<String>,
        field: Node<'_, '_>,
        owner: &str,
    ) -> Result<String, ContentError> {
        let field_name = field.tag_name().name().to_string();
        if !seen.insert(field_name.clone()) {
            return Err(self.error_at(
                ContentErrorCode::DuplicateField,
                format!("duplicate field <{field_name}> in <{owner}>"),
                field,
            ));
        }
        Ok(field_name)
    }

    fn unknown_field(&self, field: Node<'_, '_>, owner: &str) -> ContentError {
        self.error_at(
            ContentErrorCode::UnknownField,
            format!("unknown field <{}> in <{owner}>", field.tag_name().name()),
            field,
        )
    }

    fn list_items(&self, node: Node<'_, '_>, field_name: &str) -> Result<Vec<String>, ContentError> {
        let mut items = Vec::new();
        for item in node.children().filter(|child| child.is_element()) {
            if item.tag_name().name() != "li" {
                return Err(self.error_at(
                    ContentErrorCode::UnknownField,
                    format!("<{field_name}> may only contain <li> items"),
                    item,
                ));
            }
            items.push(item.text().map(str::trim).unwrap_or_default().to_string());
        }
        Ok(items)
    }
}

fn parse_map(ctx: &ParseContext<'_, '_>, node: Node<'_, '_>) -> Result<TileMap, ContentError> {
    let mut seen = HashSet::<String>::new();
    let mut tile_size: Option<u32> = None;
    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;
    let mut generator: Option<(String, Node<'_, '_>)> = None;
    let mut seed: Option<u64> = None;
    let mut rows: Option<(Vec<String>, Node<'_, '_>)> = None;

    for field in node.children().filter(|child| child.is_element()) {
        match ctx.check_duplicate(&mut seen, field, "Map")?.as_str() {
            "tileSize" => tile_size = Some(ctx.number(field, "tileSize")?),
            "width" => width = Some(ctx.number(field, "width")?),
            "height" => height = Some(ctx.number(field, "height")?),
            "generator" => generator = Some((ctx.required_text(field, "generator")?, field)),
            "seed" => seed = Some(ctx.number(field, "seed")?),
            "rows" => rows = Some((ctx.list_items(field, "rows")?, field)),
            _ => return Err(ctx.unknown_field(field, "Map")),
        }
    }

    let tile_size = tile_size.unwrap_or(DEFAULT_TILE_SIZE_PX);
    if !(MIN_TILE_SIZE_PX..=MAX_TILE_SIZE_PX).contains(&tile_size) {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!(
                "tileSize must be between {MIN_TILE_SIZE_PX} and {MAX_TILE_SIZE_PX}, got {tile_size}"
            ),
            node,
        ));
    }
    for (field_name, value) in [("width", width), ("height", height)] {
        if value.is_some_and(|value| value > MAX_MAP_SIDE_TILES) {
            return Err(ctx.error_at(
                ContentErrorCode::InvalidValue,
                format!("map {field_name} must be at most {MAX_MAP_SIDE_TILES} tiles"),
                node,
            ));
        }
    }

    match (generator, rows) {
        (Some(_), Some((_, rows_node))) => Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            "<Map> takes either <generator> or <rows>, not both".to_string(),
            rows_node,
        )),
        (Some((name, generator_node)), None) => {
            if name != "meadow" {
                return Err(ctx.error_at(
                    ContentErrorCode::InvalidValue,
                    format!("invalid generator '{name}'; allowed values: meadow"),
                    generator_node,
                ));
            }
            let width = width.unwrap_or(MEADOW_WIDTH);
            let height = height.unwrap_or(MEADOW_HEIGHT);
            if width == 0 || height == 0 {
                return Err(ctx.error_at(
                    ContentErrorCode::InvalidValue,
                    "map width and height must be > 0".to_string(),
                    node,
                ));
            }
            Ok(generate_meadow(width, height, tile_size, seed.unwrap_or(0)))
        }
        (None, Some((rows, rows_node))) => {
            parse_rows(ctx, rows_node, &rows, width, height, tile_size)
        }
        (None, None) => Err(ctx.error_at(
            ContentErrorCode::MissingField,
            "<Map> requires <generator> or <rows>".to_string(),
            node,
        )),
    }
}

fn parse_rows(
    ctx: &ParseContext<'_, '_>,
    rows_node: Node<'_, '_>,
    rows: &[String],
    width: Option<u32>,
    height: Option<u32>,
    tile_size: u32,
) -> Result<TileMap, ContentError> {
    let Some(first) = rows.first() else {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            "<rows> must contain at least one <li>".to_string(),
            rows_node,
        ));
    };
    let row_width = first.chars().count();
    let expected_width = width.map_or(row_width, |value| value as usize);
    let expected_height = height.map_or(rows.len(), |value| value as usize);
    let max_side = MAX_MAP_SIDE_TILES as usize;
    if expected_width > max_side || expected_height > max_side {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!("map sides must be at most {MAX_MAP_SIDE_TILES} tiles"),
            rows_node,
        ));
    }
    if rows.len() != expected_height {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!("expected {expected_height} rows, got {}", rows.len()),
            rows_node,
        ));
    }

    let mut tiles = Vec::with_capacity(expected_width * expected_height);
    for (y, row) in rows.iter().enumerate() {
        let count = row.chars().count();
        if count != expected_width {
            return Err(ctx.error_at(
                ContentErrorCode::InvalidValue,
                format!("row {y} has {count} tiles, expected {expected_width}"),
                rows_node,
            ));
        }
        for (x, glyph) in row.chars().enumerate() {
            let kind = glyph
                .to_digit(10)
                .and_then(|code| TileKind::from_code(code as u8))
                .ok_or_else(|| {
                    ctx.error_at(
                        ContentErrorCode::InvalidValue,
                        format!("invalid tile code '{glyph}' at row {y}, column {x}; allowed: 0-7"),
                        rows_node,
                    )
                })?;
            tiles.push(kind);
        }
    }

    TileMap::new(
        expected_width as u32,
        expected_height as u32,
        tile_size,
        tiles,
    )
    .map_err(|error| {
        ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!("invalid map: {error}"),
            rows_node,
        )
    })
}

fn parse_player(ctx: &ParseContext<'_, '_>, node: Node<'_, '_>) -> Result<PlayerDef, ContentError> {
    let mut seen = HashSet::<String>::new();
    let mut tile_x: Option<i32> = None;
    let mut tile_y: Option<i32> = None;
    let mut facing = Facing::Down;
    let mut movement_name: Option<(String, Node<'_, '_>)> = None;
    let mut walk_speed: Option<f32> = None;
    let mut step_duration_ms: Option<f32> = None;

    for field in node.children().filter(|child| child.is_element()) {
        match ctx.check_duplicate(&mut seen, field, "Player")?.as_str() {
            "tileX" => tile_x = Some(ctx.number(field, "tileX")?),
            "tileY" => tile_y = Some(ctx.number(field, "tileY")?),
            "facing" => facing = ctx.facing(field)?,
            "movement" => movement_name = Some((ctx.required_text(field, "movement")?, field)),
            "walkSpeed" => walk_speed = Some(ctx.positive_f32(field, "walkSpeed")?),
            "stepDurationMs" => {
                step_duration_ms = Some(ctx.positive_f32(field, "stepDurationMs")?)
            }
            _ => return Err(ctx.unknown_field(field, "Player")),
        }
    }

    let movement = match movement_name {
        None => MovementMode::continuous(),
        Some((name, field)) => match name.as_str() {
            "continuous" => MovementMode::continuous(),
            "gridStepped" => MovementMode::grid_stepped(),
            _ => {
                return Err(ctx.error_at(
                    ContentErrorCode::InvalidValue,
                    format!("invalid movement '{name}'; allowed values: continuous, gridStepped"),
                    field,
                ))
            }
        },
    };
    let movement = match movement {
        MovementMode::Continuous { speed_px_per_ms } => MovementMode::Continuous {
            speed_px_per_ms: walk_speed.unwrap_or(speed_px_per_ms),
        },
        MovementMode::GridStepped {
            step_duration_ms: default_duration,
            ..
        } => MovementMode::GridStepped {
            step_px: DEFAULT_STEP_PX,
            step_duration_ms: step_duration_ms.unwrap_or(default_duration),
        },
    };

    Ok(PlayerDef {
        tile: required_tile(ctx, node, "Player", tile_x, tile_y)?,
        facing,
        movement,
    })
}

fn parse_npc(ctx: &ParseContext<'_, '_>, node: Node<'_, '_>) -> Result<NpcDef, ContentError> {
    let mut seen = HashSet::<String>::new();
    let mut name: Option<String> = None;
    let mut tile_x: Option<i32> = None;
    let mut tile_y: Option<i32> = None;
    let mut facing = Facing::Down;
    let mut dialogue: Option<(Vec<String>, Node<'_, '_>)> = None;

    for field in node.children().filter(|child| child.is_element()) {
        match ctx.check_duplicate(&mut seen, field, "Npc")?.as_str() {
            "name" => name = Some(ctx.required_text(field, "name")?),
            "tileX" => tile_x = Some(ctx.number(field, "tileX")?),
            "tileY" => tile_y = Some(ctx.number(field, "tileY")?),
            "facing" => facing = ctx.facing(field)?,
            "dialogue" => dialogue = Some((ctx.list_items(field, "dialogue")?, field)),
            _ => return Err(ctx.unknown_field(field, "Npc")),
        }
    }

    let Some(name) = name else {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            "missing required field <name> in <Npc>".to_string(),
            node,
        ));
    };
    let Some((pages, dialogue_node)) = dialogue else {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            format!("missing required field <dialogue> in <Npc> '{name}'"),
            node,
        ));
    };
    let pages: Vec<String> = pages.into_iter().filter(|page| !page.is_empty()).collect();
    if pages.is_empty() {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!("<dialogue> of '{name}' needs at least one non-empty <li>"),
            dialogue_node,
        ));
    }

    Ok(NpcDef {
        tile: required_tile(ctx, node, "Npc", tile_x, tile_y)?,
        name,
        facing,
        dialogue: pages,
    })
}

fn required_tile(
    ctx: &ParseContext<'_, '_>,
    node: Node<'_, '_>,
    owner: &str,
    tile_x: Option<i32>,
    tile_y: Option<i32>,
) -> Result<TileCoord, ContentError> {
    match (tile_x, tile_y) {
        (Some(x), Some(y)) => Ok(TileCoord::new(x, y)),
        (None, _) => Err(ctx.error_at(
            ContentErrorCode::MissingField,
            format!("missing required field <tileX> in <{owner}>"),
            node,
        )),
        (_, None) => Err(ctx.error_at(
            ContentErrorCode::MissingField,
            format!("missing required field <tileY> in <{owner}>"),
            node,
        )),
    }
}

fn ensure_standable(
    ctx: &ParseContext<'_, '_>,
    tile_map: &TileMap,
    tile: TileCoord,
    owner: &str,
    node: Node<'_, '_>,
) -> Result<(), ContentError> {
    if tile_map.is_solid(tile.x, tile.y) {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!(
                "<{owner}> tile ({}, {}) is outside the map or on a solid tile",
                tile.x, tile.y
            ),
            node,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<OverworldDef, ContentError> {
        parse_overworld(Path::new("test/overworld.xml"), raw)
    }

    const SMALL: &str = r#"
<Overworld>
  <Map>
    <rows>
      <li>77777</li>
      <li>70107</li>
      <li>70047</li>
      <li>77777</li>
    </rows>
  </Map>
  <Player>
    <tileX>1</tileX>
    <tileY>1</tileY>
    <facing>right</facing>
    <movement>gridStepped</movement>
  </Player>
  <Npc>
    <name>guard</name>
    <tileX>3</tileX>
    <tileY>1</tileY>
    <dialogue>
      <li>Halt!</li>
      <li></li>
      <li>Move along.</li>
    </dialogue>
  </Npc>
</Overworld>
"#;

    #[test]
    fn parses_rows_player_and_npcs() {
        let def = parse(SMALL).expect("valid");
        assert_eq!(def.tile_map.width(), 5);
        assert_eq!(def.tile_map.height(), 4);
        assert_eq!(def.tile_map.tile_at(TileCoord::new(2, 1)), Some(TileKind::Path));
        assert_eq!(def.tile_map.tile_at(TileCoord::new(3, 2)), Some(TileKind::Water));
        assert_eq!(def.player.tile, TileCoord::new(1, 1));
        assert_eq!(def.player.facing, Facing::Right);
        assert_eq!(def.player.movement, MovementMode::grid_stepped());
        assert_eq!(def.npcs.len(), 1);
        assert_eq!(def.npcs[0].dialogue, vec!["Halt!", "Move along."]);
    }

    #[test]
    fn generator_map_uses_meadow_defaults() {
        let raw = r#"<Overworld>
  <Map><generator>meadow</generator><seed>5</seed></Map>
  <Player><tileX>10</tileX><tileY>10</tileY></Player>
</Overworld>"#;
        let def = parse(raw).expect("valid");
        assert_eq!(def.tile_map.width(), MEADOW_WIDTH);
        assert_eq!(def.tile_map, generate_meadow(MEADOW_WIDTH, MEADOW_HEIGHT, 16, 5));
        assert_eq!(def.player.movement, MovementMode::continuous());
    }

    #[test]
    fn malformed_xml_reports_location() {
        let err = parse("<Overworld><Map></Overworld>").expect_err("malformed");
        assert_eq!(err.code, ContentErrorCode::XmlMalformed);
        assert!(err.location.is_some());
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = parse("<Defs/>").expect_err("root");
        assert_eq!(err.code, ContentErrorCode::InvalidRoot);
    }

    #[test]
    fn unknown_and_duplicate_fields_are_rejected() {
        let unknown = r#"<Overworld>
  <Map><generator>meadow</generator><colour>red</colour></Map>
</Overworld>"#;
        let err = parse(unknown).expect_err("unknown");
        assert_eq!(err.code, ContentErrorCode::UnknownField);
        assert_eq!(err.location.map(|loc| loc.line), Some(2));

        let duplicate = r#"<Overworld>
  <Map><generator>meadow</generator></Map>
  <Player><tileX>10</tileX><tileX>11</tileX><tileY>10</tileY></Player>
</Overworld>"#;
        let err = parse(duplicate).expect_err("duplicate");
        assert_eq!(err.code, ContentErrorCode::DuplicateField);
    }

    #[test]
    fn ragged_rows_and_bad_codes_are_rejected() {
        let ragged = r#"<Overworld>
  <Map><rows><li>000</li><li>00</li></rows></Map>
  <Player><tileX>0</tileX><tileY>0</tileY></Player>
</Overworld>"#;
        let err = parse(ragged).expect_err("ragged");
        assert_eq!(err.code, ContentErrorCode::InvalidValue);
        assert!(err.message.contains("row 1"));

        let bad_code = r#"<Overworld>
  <Map><rows><li>009</li></rows></Map>
  <Player><tileX>0</tileX><tileY>0</tileY></Player>
</Overworld>"#;
        let err = parse(bad_code).expect_err("code");
        assert!(err.message.contains("'9'"));
    }

    #[test]
    fn tile_size_outside_supported_range_is_rejected() {
        for tile_size in ["4294967295", "65536", "300", "8", "0"] {
            let raw = format!(
                r#"<Overworld>
  <Map><tileSize>{tile_size}</tileSize><rows><li>00</li><li>00</li></rows></Map>
  <Player><tileX>0</tileX><tileY>0</tileY></Player>
</Overworld>"#
            );
            let err = parse(&raw).expect_err("tile size");
            assert_eq!(err.code, ContentErrorCode::InvalidValue, "{tile_size}");
            assert!(err.message.contains("tileSize must be between"), "{}", err.message);
        }
    }

    #[test]
    fn largest_tile_size_builds_a_world() {
        let raw = format!(
            r#"<Overworld>
  <Map><tileSize>{MAX_TILE_SIZE_PX}</tileSize><rows><li>00</li><li>00</li></rows></Map>
  <Player><tileX>1</tileX><tileY>1</tileY><movement>gridStepped</movement></Player>
</Overworld>"#
        );
        let world = parse(&raw).expect("parse").into_world(WorldConfig::default());
        assert_eq!(world.tile_map().pixel_width(), 512.0);
        assert_eq!(world.player().position().x, MAX_TILE_SIZE_PX as f32);
        assert!(matches!(
            world.player().movement_mode(),
            MovementMode::GridStepped { step_px, .. } if step_px == MAX_TILE_SIZE_PX as f32
        ));
    }

    #[test]
    fn oversized_maps_are_rejected() {
        let meadow = r#"<Overworld>
  <Map><generator>meadow</generator><width>100000</width><height>100000</height></Map>
  <Player><tileX>0</tileX><tileY>0</tileY></Player>
</Overworld>"#;
        let err = parse(meadow).expect_err("meadow size");
        assert_eq!(err.code, ContentErrorCode::InvalidValue);
        assert!(err.message.contains("width must be at most 1024"), "{}", err.message);

        let rows = "0".repeat(MAX_MAP_SIDE_TILES as usize + 1);
        let wide = format!(
            r#"<Overworld>
  <Map><rows><li>{rows}</li></rows></Map>
  <Player><tileX>0</tileX><tileY>0</tileY></Player>
</Overworld>"#
        );
        let err = parse(&wide).expect_err("row width");
        assert!(err.message.contains("at most 1024"), "{}", err.message);
    }

    #[test]
    fn player_on_solid_tile_is_rejected() {
        let raw = r#"<Overworld>
  <Map><rows><li>070</li></rows></Map>
  <Player><tileX>1</tileX><tileY>0</tileY></Player>
</Overworld>"#;
        let err = parse(raw).expect_err("solid");
        assert_eq!(err.code, ContentErrorCode::InvalidValue);
        assert_eq!(err.location.map(|loc| loc.line), Some(3));
    }

    #[test]
    fn missing_player_and_empty_dialogue_are_rejected() {
        let no_player = "<Overworld><Map><generator>meadow</generator></Map></Overworld>";
        assert_eq!(
            parse(no_player).expect_err("player").code,
            ContentErrorCode::MissingField
        );

        let empty_dialogue = r#"<Overworld>
  <Map><generator>meadow</generator></Map>
  <Player><tileX>10</tileX><tileY>10</tileY></Player>
  <Npc><name>mute</name><tileX>11</tileX><tileY>10</tileY><dialogue><li> </li></dialogue></Npc>
</Overworld>"#;
        assert_eq!(
            parse(empty_dialogue).expect_err("dialogue").code,
            ContentErrorCode::InvalidValue
        );
    }

    #[test]
    fn builtin_overworld_builds_a_world() {
        let world = builtin_overworld().into_world(WorldConfig::default());
        assert_eq!(world.npcs().len(), 2);
        assert_eq!(world.player().position(), TileCoord::new(10, 10).origin_px(16));
        assert!(!world.tile_map().is_solid(15, 9));
        assert!(!world.tile_map().is_solid(25, 20));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_overworld(Path::new("definitely/missing/overworld.xml")).expect_err("io");
        assert_eq!(err.code, ContentErrorCode::ReadFile);
        assert!(err.location.is_none());
    }

    #[test]
    fn shipped_asset_describes_builtin_overworld() {
        let def = parse(include_str!("../../../../assets/overworld.xml")).expect("asset");
        assert_eq!(def, builtin_overworld());
    }
}
