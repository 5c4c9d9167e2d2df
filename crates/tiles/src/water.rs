use bevy::math::Vec2;

use crate::tile::WaterInfo;

/// Flow and depth of a water tile packed for the water shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterEncoding {
    /// Unit flow direction scaled by the flow speed.
    pub flow: Vec2,
    /// R/G: flow components around 128, B: depth.
    pub rgb: [u8; 3],
}

impl WaterEncoding {
    pub fn color(&self) -> [f32; 4] {
        [
            self.rgb[0] as f32 / 255.0,
            self.rgb[1] as f32 / 255.0,
            self.rgb[2] as f32 / 255.0,
            1.0,
        ]
    }
}

fn encode_component(value: f32, range: f32) -> u8 {
    (128.0 + (127.0 * value / range).floor()).clamp(0.0, 255.0) as u8
}

/// Encodes a tile's water into flow and color.
///
/// A zero-length flow direction encodes as no flow, both channels at 128.
pub fn encode_water(water: &WaterInfo, range: f32, max_depth: f32) -> WaterEncoding {
    let dir = Vec2::new(water.flow_x, water.flow_y);
    let flow = if dir.length() <= f32::EPSILON {
        Vec2::ZERO
    } else {
        dir.normalize() * water.flow_speed
    };

    let depth = water.depth.clamp(0.0, max_depth);
    let blue = (255.0 * depth / max_depth).floor().clamp(0.0, 255.0) as u8;

    WaterEncoding {
        flow,
        rgb: [
            encode_component(flow.x, range),
            encode_component(flow.y, range),
            blue,
        ],
    }
}
