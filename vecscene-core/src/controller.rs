/// Third-person controller: keyboard and mouse state turned into a
/// velocity goal for the player
use nalgebra::{Vector2, Vector3};

/// Goal speed set by a held movement key
pub const MOVE_SPEED: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
}

impl Key {
    /// Map a DOM-style key name (`"w"`, `"W"`, `" "`) to a key
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "w" | "W" => Some(Key::W),
            "a" | "A" => Some(Key::A),
            "s" | "S" => Some(Key::S),
            "d" | "D" => Some(Key::D),
            " " | "Space" => Some(Key::Space),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct KeyState {
    w: bool,
    a: bool,
    s: bool,
    d: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub down: bool,
    pub origin: Vector2<f32>,
    pub last: Vector2<f32>,
    pub delta: Vector2<f32>,
}

/// Per-axis goal speeds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MoveState {
    forward: f32,
    right: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ThirdPersonController {
    keys: KeyState,
    mouse: MouseState,
    movement: MoveState,
    speed: f32,
}

impl ThirdPersonController {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::W => {
                self.keys.w = true;
                self.movement.forward = self.speed;
            }
            Key::A => {
                self.keys.a = true;
                self.movement.right = self.speed;
            }
            Key::S => {
                self.keys.s = true;
                self.movement.forward = -self.speed;
            }
            Key::D => {
                self.keys.d = true;
                self.movement.right = -self.speed;
            }
            // Reserved for jumping
            Key::Space => {}
        }
    }

    /// Releasing a key only stops movement on that axis when the opposite
    /// key is not held.
    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::W => {
                self.keys.w = false;
                if !self.keys.s {
                    self.movement.forward = 0.0;
                }
            }
            Key::A => {
                self.keys.a = false;
                if !self.keys.d {
                    self.movement.right = 0.0;
                }
            }
            Key::S => {
                self.keys.s = false;
                if !self.keys.w {
                    self.movement.forward = 0.0;
                }
            }
            Key::D => {
                self.keys.d = false;
                if !self.keys.a {
                    self.movement.right = 0.0;
                }
            }
            Key::Space => {}
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        match key {
            Key::W => self.keys.w,
            Key::A => self.keys.a,
            Key::S => self.keys.s,
            Key::D => self.keys.d,
            Key::Space => false,
        }
    }

    pub fn mouse_down(&mut self, x: f32, y: f32) {
        self.mouse.down = true;
        self.mouse.origin = Vector2::new(x, y);
        self.mouse.last = Vector2::new(x, y);
    }

    pub fn mouse_up(&mut self) {
        self.mouse.down = false;
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        let position = Vector2::new(x, y);
        self.mouse.delta += position - self.mouse.last;
        self.mouse.last = position;
    }

    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// Return the movement accumulated since the last call and reset it
    pub fn take_mouse_delta(&mut self) -> Vector2<f32> {
        std::mem::take(&mut self.mouse.delta)
    }

    /// Write the goal speeds into the horizontal components of `velocity_goal`
    pub fn update(&self, velocity_goal: &mut Vector3<f32>) {
        velocity_goal.x = self.movement.right;
        velocity_goal.z = self.movement.forward;
    }
}
