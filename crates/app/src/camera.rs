use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

const PAN_SPEED: f32 = 0.8;
const ZOOM_SPEED: f32 = 0.15;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 600.0;
const MIN_PITCH: f32 = 5.0 * std::f32::consts::PI / 180.0;
const MAX_PITCH: f32 = 85.0 * std::f32::consts::PI / 180.0;
const ORBIT_SENSITIVITY: f32 = 0.005;

/// Camera orbiting a focus point on the terrain, in tile units.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Grid edge length; the focus stays within `[0, extent]` on X and Z.
    pub extent: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            yaw: 0.6,
            pitch: 50.0_f32.to_radians(),
            distance: 40.0,
            extent: 0.0,
        }
    }
}

impl OrbitCamera {
    /// Centers on a grid of `size` cells with the whole grid in view.
    pub fn frame_grid(&mut self, size: usize) {
        let extent = size as f32;
        self.extent = extent;
        self.focus = Vec3::new(extent / 2.0, 0.0, extent / 2.0);
        self.distance = (extent * 1.2).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    fn clamp_focus(&mut self) {
        self.focus.x = self.focus.x.clamp(0.0, self.extent);
        self.focus.z = self.focus.z.clamp(0.0, self.extent);
    }

    fn eye(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.focus + Vec3::new(x, y, z)
    }
}

#[derive(Resource, Default)]
struct OrbitDrag {
    dragging: bool,
    last_pos: Vec2,
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCamera>()
            .init_resource::<OrbitDrag>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (camera_pan_keyboard, camera_orbit_drag, camera_zoom, apply_orbit_camera).chain(),
            );
    }
}

fn setup_camera(mut commands: Commands, orbit: Res<OrbitCamera>) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(orbit.eye()).looking_at(orbit.focus, Vec3::Y),
    ));
}

fn apply_orbit_camera(orbit: Res<OrbitCamera>, mut query: Query<&mut Transform, With<Camera3d>>) {
    if !orbit.is_changed() {
        return;
    }
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    *transform = Transform::from_translation(orbit.eye()).looking_at(orbit.focus, Vec3::Y);
}

/// WASD/Arrow keys: pan the focus relative to the current yaw.
fn camera_pan_keyboard(keys: Res<ButtonInput<KeyCode>>, time: Res<Time>, mut orbit: ResMut<OrbitCamera>) {
    let mut dir = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        dir.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        dir.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    if dir == Vec2::ZERO {
        return;
    }

    let dir = dir.normalize();
    let delta = PAN_SPEED * orbit.distance * time.delta_secs();
    let (sin_yaw, cos_yaw) = orbit.yaw.sin_cos();
    orbit.focus.x += (dir.x * cos_yaw + dir.y * sin_yaw) * delta;
    orbit.focus.z += (-dir.x * sin_yaw + dir.y * cos_yaw) * delta;
    orbit.clamp_focus();
}

/// Right-mouse drag: horizontal motion turns, vertical motion tilts.
fn camera_orbit_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut drag: ResMut<OrbitDrag>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    if buttons.just_pressed(MouseButton::Right) {
        if let Some(pos) = window.cursor_position() {
            drag.dragging = true;
            drag.last_pos = pos;
        }
    }
    if buttons.just_released(MouseButton::Right) {
        drag.dragging = false;
    }

    if drag.dragging {
        if let Some(pos) = window.cursor_position() {
            let delta = pos - drag.last_pos;
            orbit.yaw += delta.x * ORBIT_SENSITIVITY;
            orbit.pitch = (orbit.pitch - delta.y * ORBIT_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
            drag.last_pos = pos;
        }
    }
}

fn camera_zoom(mut scroll_evts: EventReader<MouseWheel>, mut orbit: ResMut<OrbitCamera>) {
    for evt in scroll_evts.read() {
        let dy = match evt.unit {
            MouseScrollUnit::Line => evt.y,
            MouseScrollUnit::Pixel => evt.y / 100.0,
        };
        let factor = 1.0 - dy * ZOOM_SPEED;
        orbit.distance = (orbit.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}
