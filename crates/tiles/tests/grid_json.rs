use tiles::loader::grid_from_json;
use tiles::{prepare_tiles, DrawMode, Orientation, RoofPosition, TerrainSettings, TileGrid};

const SMALL_MAP: &str = r#"{
    "wSIZE": 2,
    "tiles": [
        [
            { "elevation": 1.0, "color": { "r": 200, "g": 180, "b": 90 } },
            { "elevation": 1.5, "texture1": "grass.png", "texture2": "dirt.png", "orientation": "diaga" },
            {}
        ],
        [
            { "elevation": 2.0, "shadow": true, "color": { "r": 10, "g": 10, "b": 10 } },
            {
                "elevation": 2.5,
                "texture1": "water.png",
                "water": { "flowX": 0.0, "flowY": -1.0, "flowSpeed": 2.0, "depth": 1.0 },
                "buildings": { "level0": { "roof": { "type": "slate", "position": "full" } } }
            },
            { "override": 9.0 }
        ],
        [ {}, {}, { "walkabilityOverriden": true } ]
    ]
}"#;

#[test]
fn test_grid_loads_x_major() {
    let grid = grid_from_json(SMALL_MAP).unwrap();
    assert_eq!(grid.size(), 2);
    assert_eq!(grid.elevation(1, 0), 2.0);
    assert_eq!(grid.elevation(0, 1), 1.5);
    assert_eq!(grid.tile(0, 1).orientation, Orientation::DiagA);
    assert_eq!(grid.tile(2, 1).orientation, Orientation::DiagB);
    assert_eq!(grid.tile(1, 1).roof_position("level0"), Some(RoofPosition::Full));
    assert!(grid.tile(2, 2).walkability_overriden);
}

#[test]
fn test_prepared_grid_hides_bare_tiles() {
    let mut grid = grid_from_json(SMALL_MAP).unwrap();
    let stats = prepare_tiles(&mut grid, &TerrainSettings::default());
    assert_eq!(stats.tiles, 9);
    assert_eq!(stats.water, 1);
    // (0,2), (1,2), (2,0), (2,1) and (2,2) carry neither color nor texture.
    assert_eq!(stats.hidden, 5);
    assert_eq!(grid.tile(0, 2).draw, DrawMode::Hidden);
    assert_eq!(grid.tile(1, 1).draw, DrawMode::Blend);
    assert!(grid.tile(1, 1).render.flow.is_some());
}

#[test]
fn test_grid_round_trips_through_json() {
    let grid = grid_from_json(SMALL_MAP).unwrap();
    let text = serde_json::to_string(&grid).unwrap();
    let again: TileGrid = grid_from_json(&text).unwrap();
    assert_eq!(grid, again);
}

#[test]
fn test_height_queries_on_loaded_grid() {
    let grid = grid_from_json(SMALL_MAP).unwrap();
    // y = 2 wraps back onto row 0, so the override on (1, 2) is never sampled.
    assert_eq!(grid.height_at(1.0, 2.0), grid.height_at(1.0, 0.0));
    assert_eq!(grid.height_at(0.0, 1.0), 1.5);
    assert_eq!(grid.tile_heights(0.5, 0.5), [1.0, 2.0, 1.5, 2.5]);
}
