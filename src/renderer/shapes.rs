//! Shape generation for 2D primitives
//!
//! Everything is built in field coordinates; the pipeline maps to NDC.

use super::vertex::{Vertex, colors};
use crate::sim::rect::Rect;
use crate::view::{Frame, ObstacleHalf, ObstacleSprite};

/// Height of the darker lip at the open end of each obstacle
const CAP_HEIGHT: f32 = 24.0;
/// How far the lip sticks out on each side
const CAP_OVERHANG: f32 = 4.0;

/// Two triangles covering `rect`
pub fn quad(rect: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    let (l, r, b, t) = (rect.left(), rect.right(), rect.bottom(), rect.top());
    [
        Vertex::new(l, b, color),
        Vertex::new(r, b, color),
        Vertex::new(l, t, color),
        Vertex::new(l, t, color),
        Vertex::new(r, b, color),
        Vertex::new(r, t, color),
    ]
}

/// Obstacle body plus the lip facing the gap
///
/// Upper obstacles are drawn flipped: their lip sits on the bottom edge.
pub fn obstacle(sprite: &ObstacleSprite) -> Vec<Vertex> {
    let rect = &sprite.rect;
    let mut vertices = Vec::with_capacity(12);
    vertices.extend(quad(rect, colors::PIPE));

    let cap_h = CAP_HEIGHT.min(rect.size.y);
    if cap_h > 0.0 {
        let cap_y = match sprite.half {
            ObstacleHalf::Lower => rect.top() - cap_h,
            ObstacleHalf::Upper => rect.bottom(),
        };
        let cap = Rect::new(
            rect.left() - CAP_OVERHANG,
            cap_y,
            rect.size.x + 2.0 * CAP_OVERHANG,
            cap_h,
        );
        vertices.extend(quad(&cap, colors::PIPE_CAP));
    }
    vertices
}

/// The actor: body, eye, beak
pub fn actor(body: &Rect) -> Vec<Vertex> {
    let (w, h) = (body.size.x, body.size.y);
    let eye = Rect::new(
        body.left() + w * 0.55,
        body.bottom() + h * 0.55,
        w * 0.25,
        h * 0.25,
    );
    let pupil = Rect::new(
        eye.left() + eye.size.x * 0.5,
        eye.bottom() + eye.size.y * 0.25,
        eye.size.x * 0.4,
        eye.size.y * 0.5,
    );
    let beak = Rect::new(
        body.right() - w * 0.1,
        body.bottom() + h * 0.3,
        w * 0.25,
        h * 0.18,
    );

    let mut vertices = Vec::with_capacity(24);
    vertices.extend(quad(body, colors::ACTOR));
    vertices.extend(quad(&eye, colors::ACTOR_EYE));
    vertices.extend(quad(&pupil, colors::ACTOR_PUPIL));
    vertices.extend(quad(&beak, colors::ACTOR_BEAK));
    vertices
}

/// All geometry for one frame, back to front
pub fn frame_vertices(frame: &Frame) -> Vec<Vertex> {
    let field = Rect::new(0.0, 0.0, frame.field[0], frame.field[1]);

    let mut vertices = Vec::with_capacity(6 + frame.obstacles.len() * 12 + 24 + 6);
    vertices.extend(quad(&field, colors::SKY));
    for sprite in &frame.obstacles {
        vertices.extend(obstacle(sprite));
    }
    vertices.extend(actor(&frame.actor));
    if frame.is_game_over() {
        vertices.extend(quad(&field, colors::GAME_OVER_SHADE));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::spawner::spawn_with_center;
    use crate::sim::state::{FailureCause, GameState};

    #[test]
    fn test_quad_covers_rect() {
        let v = quad(&Rect::new(1.0, 2.0, 3.0, 4.0), colors::PIPE);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 4.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 2.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 6.0);
    }

    #[test]
    fn test_caps_face_the_gap() {
        let lower = ObstacleSprite {
            rect: Rect::new(100.0, 0.0, 80.0, 210.0),
            half: ObstacleHalf::Lower,
        };
        let cap = &obstacle(&lower)[6..];
        assert!(cap.iter().all(|v| v.position[1] >= 210.0 - CAP_HEIGHT));

        let upper = ObstacleSprite {
            rect: Rect::new(100.0, 390.0, 80.0, 250.0),
            half: ObstacleHalf::Upper,
        };
        let cap = &obstacle(&upper)[6..];
        assert!(cap.iter().all(|v| v.position[1] <= 390.0 + CAP_HEIGHT));
    }

    #[test]
    fn test_frame_vertex_count() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        spawn_with_center(&mut state, 300);
        let playing = frame_vertices(&Frame::capture(&state));
        // sky + 2 obstacles with caps + actor (4 quads)
        assert_eq!(playing.len(), 6 + 2 * 12 + 24);

        state.end_run(FailureCause::Collision);
        let over = frame_vertices(&Frame::capture(&state));
        assert_eq!(over.len(), playing.len() + 6);
    }
}
