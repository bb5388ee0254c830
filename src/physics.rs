//! Minimal deterministic 2D rigid-body world.
//!
//! Covers exactly the simulator interface the demo consumes: static
//! rectangles, a dynamic circle with settable position and velocity, atomic
//! clear-and-replace of the body set, and per-step collision notifications
//! for the ball/ground and ball/obstacle pairs.
//!
//! Screen coordinates: y grows downward, gravity is a positive constant added
//! to vertical velocity each step, integration is semi-implicit Euler with a
//! unit timestep. Ground contact resolves with the body's restitution; the
//! ball keeps its full energy on bounce (restitution 1).

use serde::{Deserialize, Serialize};

/// 2D vector for positions and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Check if both components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Role of a body within the demo world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// Static ground plate spanning the field.
    Ground,
    /// Static obstacle resting on the ground.
    Obstacle,
    /// The dynamic ball.
    Ball,
}

/// Body geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned rectangle, dimensions centered on the position.
    Rect {
        /// Full width.
        width: f64,
        /// Full height.
        height: f64,
    },
    /// Circle centered on the position.
    Circle {
        /// Radius.
        radius: f64,
    },
}

/// A rigid body. Positions refer to the body center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Role of this body.
    pub kind: BodyKind,
    /// Geometry.
    pub shape: Shape,
    /// Center position.
    pub position: Vec2,
    /// Velocity, per step.
    pub velocity: Vec2,
    /// Static bodies are not integrated.
    pub is_static: bool,
    /// Energy retained on a resolved bounce, in [0, 1].
    pub restitution: f64,
}

impl Body {
    /// Create a static rectangle.
    #[must_use]
    pub const fn static_rect(kind: BodyKind, position: Vec2, width: f64, height: f64) -> Self {
        Self {
            kind,
            shape: Shape::Rect { width, height },
            position,
            velocity: Vec2::zero(),
            is_static: true,
            restitution: 0.0,
        }
    }

    /// Create a dynamic circle.
    #[must_use]
    pub const fn dynamic_circle(
        kind: BodyKind,
        position: Vec2,
        radius: f64,
        restitution: f64,
    ) -> Self {
        Self {
            kind,
            shape: Shape::Circle { radius },
            position,
            velocity: Vec2::zero(),
            is_static: false,
            restitution,
        }
    }
}

/// A collision notification raised during a step.
///
/// Covers both collision start and active contact: the pair is reported on
/// every step in which the bodies touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// The static body involved.
    pub with: BodyKind,
}

/// The live body set plus gravity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    gravity: f64,
    bodies: Vec<Body>,
}

impl World {
    /// Create an empty world with the given per-step gravity.
    #[must_use]
    pub const fn new(gravity: f64) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
        }
    }

    /// Atomically discard all bodies and install a new set.
    pub fn replace_bodies(&mut self, bodies: Vec<Body>) {
        self.bodies = bodies;
    }

    /// Number of live bodies.
    #[must_use]
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Get a body by role.
    #[must_use]
    pub fn body(&self, kind: BodyKind) -> Option<&Body> {
        self.bodies.iter().find(|b| b.kind == kind)
    }

    /// Get a body mutably by role.
    pub fn body_mut(&mut self, kind: BodyKind) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.kind == kind)
    }

    /// Advance dynamic bodies by one step and report contacts involving the
    /// ball. Ground contacts are resolved (position correction plus
    /// restitution bounce); obstacle contacts are reported only, the control
    /// loop decides the episode there.
    pub fn step(&mut self) -> Vec<Contact> {
        // Integrate
        for body in &mut self.bodies {
            if body.is_static {
                continue;
            }
            body.velocity.y += self.gravity;
            body.position = body.position + body.velocity;
        }

        let mut contacts = Vec::new();

        let Some(ball) = self.body(BodyKind::Ball).copied() else {
            return contacts;
        };
        let Shape::Circle { radius } = ball.shape else {
            return contacts;
        };

        let statics: Vec<Body> = self
            .bodies
            .iter()
            .filter(|b| b.is_static)
            .copied()
            .collect();

        for other in statics {
            let Shape::Rect { width, height } = other.shape else {
                continue;
            };
            if !circle_touches_rect(ball.position, radius, other.position, width, height) {
                continue;
            }
            contacts.push(Contact { with: other.kind });

            if other.kind == BodyKind::Ground {
                let top = other.position.y - height / 2.0;
                if let Some(b) = self.body_mut(BodyKind::Ball) {
                    if b.velocity.y > 0.0 {
                        b.velocity.y = -b.velocity.y * b.restitution;
                    }
                    b.position.y = top - radius;
                }
            }
        }

        contacts
    }
}

/// Inclusive circle-vs-AABB proximity test. Touching counts as contact so
/// resting ground contact keeps reporting.
fn circle_touches_rect(center: Vec2, radius: f64, rect_center: Vec2, width: f64, height: f64) -> bool {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let closest_x = center.x.clamp(rect_center.x - half_w, rect_center.x + half_w);
    let closest_y = center.y.clamp(rect_center.y - half_h, rect_center.y + half_h);
    let dx = center.x - closest_x;
    let dy = center.y - closest_y;
    dx * dx + dy * dy <= radius * radius
}
