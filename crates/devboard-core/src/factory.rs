//! Creation of new items with scattered placement.

use crate::camera::BoardBounds;
use crate::config::EngineConfig;
use crate::model::{
    BoardId, DEFAULT_STACKING, Item, ItemKind, ItemPayload, NOTE_COLORS, PIN_COLORS, Picture,
};
use kurbo::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rotation jitter amplitudes (rx, ry, rz) for sticky notes.
const NOTE_TILT: [f64; 3] = [0.075, 0.075, 0.1];
/// Rotation jitter amplitudes for cards and pictures.
const CARD_TILT: [f64; 3] = [0.05, 0.05, 0.075];

/// Builds items with fresh ids, a random spot inside the spawn area, a small
/// tilt and a random pin.
#[derive(Debug)]
pub struct ItemFactory {
    rng: StdRng,
    spawn_half_width: f64,
    spawn_half_height: f64,
    bounds: BoardBounds,
}

impl ItemFactory {
    pub fn new(config: &EngineConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            spawn_half_width: config.spawn_half_width.abs(),
            spawn_half_height: config.spawn_half_height.abs(),
            bounds: config.bounds(),
        }
    }

    /// A new item of `kind` with default payload.
    pub fn create(&mut self, kind: ItemKind, board_id: BoardId) -> Item {
        self.create_with(ItemPayload::default_for(kind), board_id)
    }

    /// A new sticky note with the given text and a random paper color.
    pub fn note(&mut self, text: impl Into<String>, board_id: BoardId) -> Item {
        let mut payload = ItemPayload::default_for(ItemKind::Note);
        if let ItemPayload::Note(note) = &mut payload {
            note.text = text.into();
            note.color = self.pick(&NOTE_COLORS).to_string();
        }
        self.create_with(payload, board_id)
    }

    /// A new photo showing an already resolved image.
    pub fn photo(
        &mut self,
        image_url: impl Into<String>,
        caption: impl Into<String>,
        board_id: BoardId,
    ) -> Item {
        let payload = ItemPayload::Photo(Picture {
            image_url: image_url.into(),
            caption: caption.into(),
            ..Picture::default()
        });
        self.create_with(payload, board_id)
    }

    /// Place an arbitrary payload.
    pub fn create_with(&mut self, payload: ItemPayload, board_id: BoardId) -> Item {
        let tilt = match payload.kind() {
            ItemKind::Note => NOTE_TILT,
            _ => CARD_TILT,
        };
        let mut item = Item::new(board_id, payload);
        let x = self.jitter(self.spawn_half_width);
        let y = self.jitter(self.spawn_half_height);
        let spot = self.bounds.clamp(Point::new(x, y));
        item.position = [spot.x, spot.y, DEFAULT_STACKING];
        item.rotation = [
            self.jitter(tilt[0]),
            self.jitter(tilt[1]),
            self.jitter(tilt[2]),
        ];
        item.pin_color = self.pick(&PIN_COLORS).to_string();
        item
    }

    /// Uniform value in `[-amplitude, amplitude)`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(-amplitude..amplitude)
    }

    fn pick<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.random_range(0..choices.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_spawn_within_area() {
        let mut factory = ItemFactory::new(&EngineConfig::default().with_seed(7));
        let board = Uuid::new_v4();
        for kind in ItemKind::ALL {
            let item = factory.create(kind, board);
            assert_eq!(item.kind(), kind);
            assert_eq!(item.board_id, board);
            assert!(item.position[0].abs() <= 3.0);
            assert!(item.position[1].abs() <= 1.5);
            assert!((item.stacking() - DEFAULT_STACKING).abs() < f64::EPSILON);
            assert!(item.rotation[2].abs() <= 0.1);
            assert!(PIN_COLORS.contains(&item.pin_color.as_str()));
            assert_eq!((item.width, item.height), kind.default_size());
        }
    }

    #[test]
    fn test_seeded_factories_agree() {
        let board = Uuid::new_v4();
        let config = EngineConfig::default().with_seed(42);
        let a = ItemFactory::new(&config).create(ItemKind::Task, board);
        let b = ItemFactory::new(&config).create(ItemKind::Task, board);
        assert_eq!(a.position, b.position);
        assert_eq!(a.rotation, b.rotation);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_note_uses_palette() {
        let mut factory = ItemFactory::new(&EngineConfig::default());
        let item = factory.note("hello", Uuid::new_v4());
        match &item.payload {
            ItemPayload::Note(note) => {
                assert_eq!(note.text, "hello");
                assert!(NOTE_COLORS.contains(&note.color.as_str()));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
